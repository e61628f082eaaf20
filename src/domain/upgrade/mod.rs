//! Contextual upgrade prompts.
//!
//! When a gate denies an action, the prompt selector maps the blocked
//! feature or resource to a contextual message and a recommended target
//! plan. The selector sits on the critical path of otherwise-unrelated user
//! actions, so an unknown trigger key resolves to the generic fallback
//! instead of erroring.

use serde::{Deserialize, Serialize};

use crate::domain::catalog::PlanCatalog;

/// What the upgrade call-to-action should show.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UpgradeContext {
    /// Modal title.
    pub title: String,

    /// Supporting line under the title.
    pub subtitle: String,

    /// Feature to highlight in the plan comparison, if any.
    pub highlight_feature: Option<String>,

    /// Plan to recommend: the next tier up from the user's current plan,
    /// not necessarily the top tier.
    pub recommended_plan: String,
}

struct PromptTemplate {
    triggers: &'static [&'static str],
    title: &'static str,
    subtitle: &'static str,
    highlight: Option<&'static str>,
}

/// Static trigger-key table. Resource-limit keys accept both the bare
/// resource name (as emitted by limit gates) and the explicit `_limit` form.
const PROMPTS: &[PromptTemplate] = &[
    PromptTemplate {
        triggers: &["devis", "devis_limit"],
        title: "Limite de devis atteinte",
        subtitle: "Passez au plan Pro pour créer des devis illimités",
        highlight: Some("devis"),
    },
    PromptTemplate {
        triggers: &["clients", "clients_limit"],
        title: "Limite de clients atteinte",
        subtitle: "Passez au plan Pro pour gérer des clients illimités",
        highlight: Some("clients"),
    },
    PromptTemplate {
        triggers: &["signatures"],
        title: "Signatures électroniques",
        subtitle: "Signez directement vos devis et factures avec vos clients",
        highlight: Some("signatures"),
    },
    PromptTemplate {
        triggers: &["ia_devis"],
        title: "Analyse IA — Débloquez en plan Pro",
        subtitle: "Générez des devis automatiquement à partir de photos et descriptions",
        highlight: Some("ia_devis"),
    },
    PromptTemplate {
        triggers: &["export_comptable", "export_fec"],
        title: "Export FEC — Plan Pro requis",
        subtitle: "Exportez vos données comptables au format FEC pour votre expert-comptable",
        highlight: Some("export_comptable"),
    },
    PromptTemplate {
        triggers: &["equipe"],
        title: "Gestion d'équipe",
        subtitle: "Invitez vos collaborateurs et gérez les permissions",
        highlight: Some("equipe"),
    },
    PromptTemplate {
        triggers: &["tresorerie"],
        title: "Trésorerie & Bilan — Plan Pro requis",
        subtitle: "Suivez votre trésorerie et vos bilans de chantiers en temps réel",
        highlight: Some("tresorerie"),
    },
    PromptTemplate {
        triggers: &["analytics"],
        title: "Statistiques avancées — Plan Pro requis",
        subtitle: "Analysez vos performances et prenez de meilleures décisions",
        highlight: Some("analytics"),
    },
];

/// Page id → feature required to view it. Route guards look the page up
/// here and feed the result to a feature gate; pages absent from the table
/// are not gated.
const PAGE_FEATURES: &[(&str, &str)] = &[
    ("signatures", "signatures"),
    ("export", "export_comptable"),
    ("tresorerie", "tresorerie"),
    ("ia-devis", "ia_devis"),
    ("soustraitants", "sous_traitants"),
    ("commandes", "commandes"),
    ("entretien", "entretien"),
];

/// Feature required to view `page_id`, if the page is gated at all.
pub fn page_required_feature(page_id: &str) -> Option<&'static str> {
    PAGE_FEATURES
        .iter()
        .find(|(page, _)| *page == page_id)
        .map(|(_, feature)| *feature)
}

const GENERIC: PromptTemplate = PromptTemplate {
    triggers: &[],
    title: "Passez au plan Pro",
    subtitle: "Débloquez toutes les fonctionnalités de ChantierPro",
    highlight: None,
};

/// Selects the upgrade context for a trigger key.
///
/// `trigger` is a feature key or resource name; anything unrecognized maps
/// to the generic prompt. The recommendation is the next tier above
/// `current_plan` (or the current plan itself when already on top).
pub fn select_context(trigger: &str, current_plan: &str, catalog: &PlanCatalog) -> UpgradeContext {
    let template = PROMPTS
        .iter()
        .find(|p| p.triggers.contains(&trigger))
        .unwrap_or(&GENERIC);

    let recommended_plan = catalog
        .next_tier_up(current_plan)
        .map(|p| p.id.clone())
        .unwrap_or_else(|| catalog.get(current_plan).id.clone());

    UpgradeContext {
        title: template.title.to_string(),
        subtitle: template.subtitle.to_string(),
        highlight_feature: template.highlight.map(str::to_string),
        recommended_plan,
    }
}
