//! Treequote pricing engine.
//!
//! Turns raw resource costs into a customer price, leaf-first:
//!
//! - **equipment**: hourly ownership + operating cost of one machine
//! - **labor**: true hourly cost of one crew member
//! - **loadout**: aggregation of machines and crew into frozen snapshots
//! - **margin**: cost to billing rate for a target profit margin
//! - **project**: job size to hours, cost, price and profit; status lifecycle
//! - **roi**: ranking of alternatives by cost per unit of output
//!
//! Every operation is a pure function of its inputs. Errors are returned
//! whole; no operation hands back a partially computed result.
//!
//! # Example
//!
//! ```
//! use treequote_engine::{convert_margin, price_project, ProjectInput};
//!
//! let conversion = convert_margin(286.16, 50.0).unwrap();
//! assert_eq!(conversion.billing_rate_per_hour, 572.32);
//!
//! let pricing = price_project(&ProjectInput {
//!     loadout_cost_per_hour: 286.16,
//!     billing_rate_per_hour: conversion.billing_rate_per_hour,
//!     job_size: 10.0,
//!     job_unit: "acres".into(),
//!     production_rate: 2.0,
//!     production_unit: "acres".into(),
//!     transport_hours: 1.0,
//!     buffer_fraction: 0.10,
//! })
//! .unwrap();
//! assert_eq!(pricing.work_hours, 5.0);
//! ```

pub mod config;
pub mod equipment;
pub mod error;
pub mod labor;
pub mod loadout;
pub mod margin;
pub mod presentation;
pub mod project;
pub mod roi;
mod validate;

pub use config::PricingDefaults;
pub use equipment::{compute_equipment_cost, verify_cached_cost, CachedCostCheck};
pub use error::{PricingError, Result};
pub use labor::compute_labor_cost;
pub use loadout::{
    aggregate_loadout, assign_default, rebuild_snapshot, snapshot_drift, snapshot_loadout,
    CostLibrary, SnapshotDrift,
};
pub use margin::{convert_margin, margin_for_rate, MarginConversion};
pub use presentation::{
    format_currency, present_pricing, round_currency, PresentedPricing, MAX_CURRENCY_DECIMALS,
};
pub use project::{
    price_project, quote_project, record_progress, reprice_project, transition_project,
    ProjectInput, QuoteRequest,
};
pub use roi::{compare_candidates, Candidate, CandidateKind, RankedCandidate};
