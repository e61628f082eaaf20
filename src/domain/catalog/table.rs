//! The plan catalog table.
//!
//! Plans are totally ordered by their declaration position (the tier
//! sequence), never by price, so a promotional tier can be inserted without
//! breaking comparisons. The feature → minimum-plan index is computed once at
//! build time: tiers are scanned in order and the first tier containing a
//! feature wins.

use once_cell::sync::Lazy;
use std::cmp::Ordering;
use std::collections::HashMap;

use super::{FeatureLabel, Plan, UNLIMITED};

/// Discount applied to the yearly price, for display.
pub const YEARLY_DISCOUNT_PERCENT: u8 = 17;

static BUILTIN: Lazy<PlanCatalog> = Lazy::new(|| PlanCatalog::new(builtin_plans()));

/// Immutable, tier-ordered table of plan definitions.
///
/// Lookups with an unrecognized plan identifier fail closed to the lowest
/// tier: entitlement checks sit on hot paths and must never error out of an
/// unrelated user action.
#[derive(Debug, Clone)]
pub struct PlanCatalog {
    plans: Vec<Plan>,
    positions: HashMap<String, usize>,
    feature_min_plan: HashMap<String, String>,
}

impl PlanCatalog {
    /// Builds a catalog from plans listed in tier order (lowest first).
    ///
    /// # Panics
    ///
    /// Panics if `plans` is empty or contains duplicate identifiers. The
    /// catalog is constructed once at startup from static data, so a bad
    /// definition is a programming error, not a runtime condition.
    pub fn new(plans: Vec<Plan>) -> Self {
        assert!(!plans.is_empty(), "plan catalog cannot be empty");

        let mut positions = HashMap::new();
        let mut feature_min_plan = HashMap::new();
        for (idx, plan) in plans.iter().enumerate() {
            let previous = positions.insert(plan.id.clone(), idx);
            assert!(previous.is_none(), "duplicate plan id '{}'", plan.id);

            for feature in &plan.features {
                feature_min_plan
                    .entry(feature.clone())
                    .or_insert_with(|| plan.id.clone());
            }
        }

        Self { plans, positions, feature_min_plan }
    }

    /// The built-in catalog, constructed once per process.
    pub fn builtin() -> &'static PlanCatalog {
        &BUILTIN
    }

    /// All plans in tier order.
    pub fn plans(&self) -> &[Plan] {
        &self.plans
    }

    /// The lowest (most restrictive) tier.
    pub fn lowest(&self) -> &Plan {
        &self.plans[0]
    }

    /// Looks up a plan, falling back to the lowest tier for unknown ids.
    pub fn get(&self, plan_id: &str) -> &Plan {
        match self.positions.get(plan_id) {
            Some(&idx) => &self.plans[idx],
            None => self.lowest(),
        }
    }

    /// Returns true if the identifier names a catalog plan.
    pub fn contains(&self, plan_id: &str) -> bool {
        self.positions.contains_key(plan_id)
    }

    /// Tier position; unknown ids resolve to the lowest tier's position.
    fn position(&self, plan_id: &str) -> usize {
        self.positions.get(plan_id).copied().unwrap_or(0)
    }

    /// Orders two plan identifiers by tier position.
    pub fn compare(&self, a: &str, b: &str) -> Ordering {
        self.position(a).cmp(&self.position(b))
    }

    /// Returns true if plan `a` is at least as good as plan `b`.
    pub fn is_at_least(&self, a: &str, b: &str) -> bool {
        self.compare(a, b) != Ordering::Less
    }

    /// Minimum plan whose feature set contains `feature`, if any.
    ///
    /// Pure lookup into the index built at construction time.
    pub fn min_plan_for_feature(&self, feature: &str) -> Option<&str> {
        self.feature_min_plan.get(feature).map(String::as_str)
    }

    /// The next tier above `plan_id`, or `None` if already on the top tier.
    pub fn next_tier_up(&self, plan_id: &str) -> Option<&Plan> {
        self.plans.get(self.position(plan_id) + 1)
    }
}

/// Static plan definitions, matching the backend seed data.
fn builtin_plans() -> Vec<Plan> {
    vec![
        Plan {
            id: "gratuit".to_string(),
            name: "Gratuit".to_string(),
            description: "Pour démarrer avec ChantierPro".to_string(),
            target: "Artisans qui découvrent".to_string(),
            price_monthly_cents: 0,
            price_yearly_cents: 0,
            limits: HashMap::from([
                ("devis".to_string(), 3),
                ("clients".to_string(), 5),
                ("chantiers".to_string(), 1),
                ("catalogue".to_string(), 20),
                ("signatures".to_string(), 0),
                ("ia_analyses".to_string(), 0),
                ("photos".to_string(), 50),
                ("storage_mb".to_string(), 500),
                ("equipe".to_string(), 0),
            ]),
            features: vec![
                "devis_basic".to_string(),
                "clients_basic".to_string(),
                "chantiers_basic".to_string(),
                "catalogue".to_string(),
                "planning".to_string(),
            ],
            feature_labels: vec![
                FeatureLabel::included("3 devis par mois"),
                FeatureLabel::included("5 clients"),
                FeatureLabel::included("1 chantier actif"),
                FeatureLabel::included("20 articles catalogue"),
                FeatureLabel::included("Planning"),
                FeatureLabel::excluded("Signatures électroniques"),
                FeatureLabel::excluded("Export comptable"),
                FeatureLabel::excluded("Trésorerie"),
                FeatureLabel::excluded("IA Devis"),
                FeatureLabel::excluded("Statistiques avancées"),
                FeatureLabel::excluded("Support prioritaire"),
            ],
            badge: None,
            color: "#6B7280".to_string(),
            support: "email".to_string(),
        },
        Plan {
            id: "pro".to_string(),
            name: "Pro".to_string(),
            description: "Toute la puissance ChantierPro".to_string(),
            target: "Artisans et PME".to_string(),
            price_monthly_cents: 1490,
            price_yearly_cents: 14900,
            limits: HashMap::from([
                ("devis".to_string(), UNLIMITED),
                ("clients".to_string(), UNLIMITED),
                ("chantiers".to_string(), UNLIMITED),
                ("catalogue".to_string(), UNLIMITED),
                ("signatures".to_string(), UNLIMITED),
                ("ia_analyses".to_string(), 5),
                ("photos".to_string(), UNLIMITED),
                ("storage_mb".to_string(), 10240),
                ("equipe".to_string(), 5),
            ]),
            features: vec![
                "devis_basic".to_string(),
                "clients_basic".to_string(),
                "chantiers_basic".to_string(),
                "catalogue".to_string(),
                "planning".to_string(),
                "signatures".to_string(),
                "export_comptable".to_string(),
                "rapports_pdf".to_string(),
                "relances".to_string(),
                "portal_client".to_string(),
                "tresorerie".to_string(),
                "ia_devis".to_string(),
                "sous_traitants".to_string(),
                "commandes".to_string(),
                "entretien".to_string(),
                "analytics".to_string(),
            ],
            feature_labels: vec![
                FeatureLabel::included("Devis & factures illimités"),
                FeatureLabel::included("Clients illimités"),
                FeatureLabel::included("Chantiers illimités"),
                FeatureLabel::included("Catalogue illimité"),
                FeatureLabel::included("Planning"),
                FeatureLabel::included("Signatures électroniques"),
                FeatureLabel::included("Export comptable (FEC)"),
                FeatureLabel::included("Trésorerie & Bilan"),
                FeatureLabel::included("IA Devis (5/mois)"),
                FeatureLabel::included("Statistiques avancées"),
                FeatureLabel::included("Jusqu'à 5 utilisateurs"),
                FeatureLabel::included("10 Go stockage"),
                FeatureLabel::included("Support prioritaire"),
            ],
            badge: Some("RECOMMANDÉ".to_string()),
            color: "#F97316".to_string(),
            support: "prioritaire".to_string(),
        },
    ]
}
