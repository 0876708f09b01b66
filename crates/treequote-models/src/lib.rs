//! Core data records for Treequote.
//!
//! This crate provides the plain records exchanged with the pricing engine:
//! equipment and crew inputs, loadout snapshots, projects and their status
//! lifecycle. Records carry no storage or presentation concerns.

pub mod builders;
pub mod crew;
pub mod equipment;
pub mod ids;
pub mod loadout;
pub mod project;

// Re-export main types
pub use builders::EquipmentBuilder;
pub use crew::{CrewMember, LaborCost, LaborInput};
pub use equipment::{Equipment, EquipmentCost, EquipmentInput, Financing};
pub use ids::{CrewMemberId, EquipmentId, LoadoutId, ProjectId};
pub use loadout::{Loadout, LoadoutLine, LoadoutSnapshot, LoadoutTotals};
pub use project::{JobSpec, Project, ProjectPricing, ProjectStatus};
