//! Crew member records.

use serde::{Deserialize, Serialize};

use crate::ids::CrewMemberId;

/// Inputs of the labor cost model.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LaborInput {
    /// Base hourly wage.
    pub base_wage: f64,
    /// Multiplier covering payroll taxes, insurance and overhead (>= 1.0).
    pub burden_multiplier: f64,
}

/// True hourly cost of one crew member.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LaborCost {
    /// Wage as paid.
    pub base_wage: f64,
    /// Overhead on top of the wage.
    pub burden_cost_per_hour: f64,
    /// Wage times burden.
    pub true_cost_per_hour: f64,
}

/// A member of the crew library.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CrewMember {
    /// Unique identifier.
    pub id: CrewMemberId,

    /// Display name or role (e.g., "Climber").
    pub name: String,

    /// Cost model inputs.
    #[serde(flatten)]
    pub input: LaborInput,
}

impl CrewMember {
    /// Creates a new crew member.
    pub fn new(name: impl Into<String>, base_wage: f64, burden_multiplier: f64) -> Self {
        Self {
            id: CrewMemberId::new(),
            name: name.into(),
            input: LaborInput {
                base_wage,
                burden_multiplier,
            },
        }
    }
}
