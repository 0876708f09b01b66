//! Loadout records.
//!
//! A [`Loadout`] is the editable definition: which machines and which crew
//! members make up a bundle. A [`LoadoutSnapshot`] is the frozen, owned copy
//! of the costs that a project is quoted against. Snapshots never point back
//! into the library, so later library edits cannot change a past quote.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::ids::{CrewMemberId, EquipmentId, LoadoutId};

/// A bundle of equipment and crew assigned to a service type.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Loadout {
    /// Unique identifier.
    pub id: LoadoutId,

    /// Display name (e.g., "Mulching crew A").
    pub name: String,

    /// Service this loadout performs (e.g., "forestry mulching").
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub service_type: Option<String>,

    /// Machines in the bundle. Repeated ids are separately costed units.
    #[serde(default)]
    pub equipment_ids: Vec<EquipmentId>,

    /// Crew members in the bundle.
    #[serde(default)]
    pub crew_ids: Vec<CrewMemberId>,

    /// Output per hour; absent until the loadout is tied to a service.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub production_rate: Option<f64>,

    /// Unit of the production rate (e.g., "acres").
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub production_unit: Option<String>,

    /// Whether this is the organization's default loadout.
    #[serde(default)]
    pub is_default: bool,
}

impl Loadout {
    /// Creates an empty loadout.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            id: LoadoutId::new(),
            name: name.into(),
            service_type: None,
            equipment_ids: Vec::new(),
            crew_ids: Vec::new(),
            production_rate: None,
            production_unit: None,
            is_default: false,
        }
    }

    /// Adds a machine to the bundle.
    pub fn add_equipment(mut self, id: impl Into<EquipmentId>) -> Self {
        self.equipment_ids.push(id.into());
        self
    }

    /// Adds a crew member to the bundle.
    pub fn add_crew(mut self, id: impl Into<CrewMemberId>) -> Self {
        self.crew_ids.push(id.into());
        self
    }

    /// Sets the production rate and its unit.
    pub fn with_production(mut self, rate: f64, unit: impl Into<String>) -> Self {
        self.production_rate = Some(rate);
        self.production_unit = Some(unit.into());
        self
    }
}

/// Aggregated hourly figures of a loadout.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct LoadoutTotals {
    /// Sum of every machine's total cost per hour.
    pub total_equipment_cost_per_hour: f64,
    /// Sum of every crew member's true cost per hour.
    pub total_labor_cost_per_hour: f64,
    /// Equipment plus labor.
    pub total_loadout_cost_per_hour: f64,
    /// Number of machines, counting repeats.
    pub equipment_count: usize,
    /// Number of crew entries.
    pub crew_size: usize,
    /// Output per hour, when known.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub production_rate: Option<f64>,
    /// Unit of the production rate.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub production_unit: Option<String>,
}

/// One costed member of a snapshot.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoadoutLine {
    /// Library id of the member at capture time.
    pub id: String,
    /// Name at capture time.
    pub name: String,
    /// Hourly cost at capture time.
    pub cost_per_hour: f64,
}

/// Frozen copy of a loadout's costs.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoadoutSnapshot {
    /// Loadout this snapshot was captured from.
    pub loadout_id: LoadoutId,

    /// Loadout name at capture time.
    pub name: String,

    /// Costed machines.
    pub equipment: Vec<LoadoutLine>,

    /// Costed crew.
    pub crew: Vec<LoadoutLine>,

    /// Aggregated totals.
    pub totals: LoadoutTotals,

    /// When the snapshot was taken.
    pub captured_at: DateTime<Utc>,
}

impl LoadoutSnapshot {
    /// Total hourly cost of the bundle.
    pub fn cost_per_hour(&self) -> f64 {
        self.totals.total_loadout_cost_per_hour
    }

    /// Production rate captured with the snapshot.
    pub fn production_rate(&self) -> Option<f64> {
        self.totals.production_rate
    }

    /// Production unit captured with the snapshot.
    pub fn production_unit(&self) -> Option<&str> {
        self.totals.production_unit.as_deref()
    }
}
