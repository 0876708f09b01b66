//! Loadout aggregation and snapshots.
//!
//! Aggregation is a plain sum over the members of a bundle. A snapshot is the
//! aggregated result captured as an owned value, with one line per member, so
//! a project quoted against it stays reproducible however the library changes
//! afterwards. Rebuilding never mutates a snapshot; it returns a new one.

use chrono::Utc;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};
use treequote_models::{
    CrewMember, Equipment, Loadout, LoadoutId, LoadoutLine, LoadoutSnapshot, LoadoutTotals,
};

use crate::equipment::compute_equipment_cost;
use crate::error::{PricingError, Result};
use crate::labor::compute_labor_cost;
use crate::validate::{non_negative, same_unit};

/// Tolerance below which two hourly costs are considered equal.
const DRIFT_TOLERANCE: f64 = 1e-9;

/// Current equipment and crew records, as handed over by the storage layer.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CostLibrary {
    /// Equipment records.
    #[serde(default)]
    pub equipment: Vec<Equipment>,

    /// Crew records.
    #[serde(default)]
    pub crew: Vec<CrewMember>,
}

impl CostLibrary {
    /// Creates a library from the given records.
    pub fn new(equipment: Vec<Equipment>, crew: Vec<CrewMember>) -> Self {
        Self { equipment, crew }
    }

    /// Finds a machine by id.
    pub fn find_equipment(&self, id: &str) -> Option<&Equipment> {
        self.equipment.iter().find(|e| e.id.as_str() == id)
    }

    /// Finds a crew member by id.
    pub fn find_crew(&self, id: &str) -> Option<&CrewMember> {
        self.crew.iter().find(|c| c.id.as_str() == id)
    }
}

/// Sums equipment and labor costs into loadout totals.
///
/// Repeated entries are counted once per occurrence.
pub fn aggregate_loadout(
    equipment_costs: &[f64],
    labor_costs: &[f64],
    production_rate: Option<f64>,
    production_unit: Option<&str>,
) -> LoadoutTotals {
    let total_equipment_cost_per_hour: f64 = equipment_costs.iter().sum();
    let total_labor_cost_per_hour: f64 = labor_costs.iter().sum();

    LoadoutTotals {
        total_equipment_cost_per_hour,
        total_labor_cost_per_hour,
        total_loadout_cost_per_hour: total_equipment_cost_per_hour + total_labor_cost_per_hour,
        equipment_count: equipment_costs.len(),
        crew_size: labor_costs.len(),
        production_rate,
        production_unit: production_unit.map(String::from),
    }
}

/// Costs every member of a loadout against the current library and captures
/// the result as a snapshot.
///
/// # Errors
/// Returns a validation error when a referenced id is missing from the
/// library, a member's inputs are invalid, or the production rate is negative.
pub fn snapshot_loadout(loadout: &Loadout, library: &CostLibrary) -> Result<LoadoutSnapshot> {
    if let Some(rate) = loadout.production_rate {
        non_negative("production_rate", rate)?;
    }

    let mut equipment = Vec::with_capacity(loadout.equipment_ids.len());
    for id in &loadout.equipment_ids {
        let record = library.find_equipment(id.as_str()).ok_or_else(|| {
            PricingError::validation("equipment_ids", format!("unknown equipment: {}", id))
        })?;
        let cost = compute_equipment_cost(&record.input)?;
        equipment.push(LoadoutLine {
            id: record.id.to_string(),
            name: record.name.clone(),
            cost_per_hour: cost.total_cost_per_hour,
        });
    }

    let mut crew = Vec::with_capacity(loadout.crew_ids.len());
    for id in &loadout.crew_ids {
        let record = library.find_crew(id.as_str()).ok_or_else(|| {
            PricingError::validation("crew_ids", format!("unknown crew member: {}", id))
        })?;
        let cost = compute_labor_cost(&record.input)?;
        crew.push(LoadoutLine {
            id: record.id.to_string(),
            name: record.name.clone(),
            cost_per_hour: cost.true_cost_per_hour,
        });
    }

    let equipment_costs: Vec<f64> = equipment.iter().map(|l| l.cost_per_hour).collect();
    let labor_costs: Vec<f64> = crew.iter().map(|l| l.cost_per_hour).collect();
    let totals = aggregate_loadout(
        &equipment_costs,
        &labor_costs,
        loadout.production_rate,
        loadout.production_unit.as_deref(),
    );

    debug!(
        loadout_id = %loadout.id,
        total_loadout_cost_per_hour = totals.total_loadout_cost_per_hour,
        crew_size = totals.crew_size,
        "Captured loadout snapshot"
    );

    Ok(LoadoutSnapshot {
        loadout_id: loadout.id.clone(),
        name: loadout.name.clone(),
        equipment,
        crew,
        totals,
        captured_at: Utc::now(),
    })
}

/// Captures a fresh snapshot for the loadout a previous snapshot came from.
///
/// The previous snapshot is left as is; callers attach the new one explicitly.
pub fn rebuild_snapshot(
    previous: &LoadoutSnapshot,
    loadout: &Loadout,
    library: &CostLibrary,
) -> Result<LoadoutSnapshot> {
    ensure_same_loadout(&previous.loadout_id, &loadout.id)?;
    let rebuilt = snapshot_loadout(loadout, library)?;

    info!(
        loadout_id = %loadout.id,
        previous_cost_per_hour = previous.cost_per_hour(),
        rebuilt_cost_per_hour = rebuilt.cost_per_hour(),
        "Rebuilt loadout snapshot"
    );

    Ok(rebuilt)
}

/// Difference between a frozen snapshot and the current library.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SnapshotDrift {
    /// Loadout cost per hour in the frozen snapshot.
    pub frozen_cost_per_hour: f64,
    /// Loadout cost per hour a rebuild would produce.
    pub current_cost_per_hour: f64,
    /// Current minus frozen.
    pub difference_per_hour: f64,
    /// Production rate in the frozen snapshot.
    pub frozen_production_rate: Option<f64>,
    /// Production rate a rebuild would produce.
    pub current_production_rate: Option<f64>,
    /// Production unit in the frozen snapshot.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub frozen_production_unit: Option<String>,
    /// Production unit a rebuild would produce.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub current_production_unit: Option<String>,
}

impl SnapshotDrift {
    /// Returns true if a rebuild would change the quote inputs.
    pub fn has_drift(&self) -> bool {
        self.difference_per_hour.abs() > DRIFT_TOLERANCE
            || self.frozen_production_rate != self.current_production_rate
            || self.unit_changed()
    }

    fn unit_changed(&self) -> bool {
        match (&self.frozen_production_unit, &self.current_production_unit) {
            (Some(frozen), Some(current)) => !same_unit(frozen, current),
            (frozen, current) => frozen.is_some() != current.is_some(),
        }
    }
}

/// Compares a frozen snapshot with what a rebuild would produce now.
pub fn snapshot_drift(
    snapshot: &LoadoutSnapshot,
    loadout: &Loadout,
    library: &CostLibrary,
) -> Result<SnapshotDrift> {
    ensure_same_loadout(&snapshot.loadout_id, &loadout.id)?;
    let current = snapshot_loadout(loadout, library)?;

    Ok(SnapshotDrift {
        frozen_cost_per_hour: snapshot.cost_per_hour(),
        current_cost_per_hour: current.cost_per_hour(),
        difference_per_hour: current.cost_per_hour() - snapshot.cost_per_hour(),
        frozen_production_rate: snapshot.production_rate(),
        current_production_rate: current.production_rate(),
        frozen_production_unit: snapshot.totals.production_unit.clone(),
        current_production_unit: current.totals.production_unit,
    })
}

/// Returns copies of `loadouts` with exactly the loadout `id` flagged default.
///
/// Writing the result atomically is the storage layer's job.
pub fn assign_default(loadouts: &[Loadout], id: &LoadoutId) -> Result<Vec<Loadout>> {
    if !loadouts.iter().any(|l| &l.id == id) {
        return Err(PricingError::validation(
            "loadout_id",
            format!("unknown loadout: {}", id),
        ));
    }

    Ok(loadouts
        .iter()
        .map(|l| Loadout {
            is_default: &l.id == id,
            ..l.clone()
        })
        .collect())
}

fn ensure_same_loadout(snapshot_id: &LoadoutId, loadout_id: &LoadoutId) -> Result<()> {
    if snapshot_id != loadout_id {
        return Err(PricingError::validation(
            "loadout_id",
            format!(
                "snapshot belongs to {}, not {}",
                snapshot_id, loadout_id
            ),
        ));
    }
    Ok(())
}
