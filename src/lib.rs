//! ChantierPro Core - Subscription entitlement engine
//!
//! This crate implements the plan catalog, entitlement evaluation, and
//! subscription lifecycle behind ChantierPro's freemium model, with billing
//! and usage state driven through pluggable gateway and backend adapters.

pub mod adapters;
pub mod application;
pub mod config;
pub mod domain;
pub mod ports;
