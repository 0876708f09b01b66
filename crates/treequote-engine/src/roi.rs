//! ROI comparison of alternative machines or loadouts.
//!
//! Candidates are ranked by cost per unit of output. Ties go to the candidate
//! with the lower hourly cost; remaining ties keep their input order.

use serde::{Deserialize, Serialize};
use tracing::debug;
use treequote_models::{Equipment, LoadoutSnapshot};

use crate::equipment::compute_equipment_cost;
use crate::error::{PricingError, Result};
use crate::validate::{non_negative, positive, same_unit};

/// What a candidate stands for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CandidateKind {
    /// A single machine.
    Equipment,
    /// A full loadout.
    Loadout,
}

/// One alternative under comparison.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Candidate {
    /// Id of the underlying record.
    pub id: String,
    /// Display name.
    pub name: String,
    /// Machine or loadout.
    pub kind: CandidateKind,
    /// Total hourly cost.
    pub total_cost_per_hour: f64,
    /// Output per hour.
    pub production_rate: f64,
    /// Unit of the production rate.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub production_unit: Option<String>,
}

impl Candidate {
    /// Builds a candidate from a machine, costing it from its inputs.
    pub fn from_equipment(equipment: &Equipment) -> Result<Self> {
        let cost = compute_equipment_cost(&equipment.input)?;
        Ok(Self {
            id: equipment.id.to_string(),
            name: equipment.name.clone(),
            kind: CandidateKind::Equipment,
            total_cost_per_hour: cost.total_cost_per_hour,
            production_rate: equipment.production_rate.unwrap_or(0.0),
            production_unit: equipment.production_unit.clone(),
        })
    }

    /// Builds a candidate from a loadout snapshot.
    pub fn from_snapshot(snapshot: &LoadoutSnapshot) -> Self {
        Self {
            id: snapshot.loadout_id.to_string(),
            name: snapshot.name.clone(),
            kind: CandidateKind::Loadout,
            total_cost_per_hour: snapshot.cost_per_hour(),
            production_rate: snapshot.production_rate().unwrap_or(0.0),
            production_unit: snapshot.totals.production_unit.clone(),
        }
    }
}

/// A candidate with its position in the ranking.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RankedCandidate {
    /// 1-based rank; 1 is the most cost-efficient.
    pub rank: usize,
    /// The candidate.
    pub candidate: Candidate,
    /// Hourly cost divided by production rate.
    pub cost_per_unit_output: f64,
    /// Hours needed to produce the target.
    pub hours_for_target: f64,
    /// Cost of producing the target.
    pub cost_for_target: f64,
    /// How much cheaper than the worst candidate this one produces the target.
    pub savings_vs_worst: f64,
}

/// Ranks candidates by cost per unit of output for a shared production target.
///
/// # Errors
/// Returns a validation error when fewer than two candidates are given, the
/// target is not positive, a candidate has no positive production rate or a
/// negative cost, or candidates measure output in different units.
pub fn compare_candidates(
    candidates: &[Candidate],
    production_target: f64,
) -> Result<Vec<RankedCandidate>> {
    if candidates.len() < 2 {
        return Err(PricingError::validation(
            "candidates",
            format!("need at least two candidates, got {}", candidates.len()),
        ));
    }
    let production_target = positive("production_target", production_target)?;

    let mut unit: Option<&str> = None;
    for candidate in candidates {
        positive(&format!("{}.production_rate", candidate.id), candidate.production_rate)?;
        non_negative(
            &format!("{}.total_cost_per_hour", candidate.id),
            candidate.total_cost_per_hour,
        )?;

        if let Some(candidate_unit) = candidate.production_unit.as_deref() {
            match unit {
                None => unit = Some(candidate_unit),
                Some(u) if !same_unit(u, candidate_unit) => {
                    return Err(PricingError::validation(
                        "production_unit",
                        format!(
                            "cannot compare {} with {} ({})",
                            u, candidate_unit, candidate.id
                        ),
                    ));
                }
                Some(_) => {}
            }
        }
    }

    let mut ranked: Vec<RankedCandidate> = candidates
        .iter()
        .map(|candidate| {
            let hours_for_target = production_target / candidate.production_rate;
            RankedCandidate {
                rank: 0,
                candidate: candidate.clone(),
                cost_per_unit_output: candidate.total_cost_per_hour / candidate.production_rate,
                hours_for_target,
                cost_for_target: hours_for_target * candidate.total_cost_per_hour,
                savings_vs_worst: 0.0,
            }
        })
        .collect();

    ranked.sort_by(|a, b| {
        a.cost_per_unit_output
            .total_cmp(&b.cost_per_unit_output)
            .then_with(|| {
                a.candidate
                    .total_cost_per_hour
                    .total_cmp(&b.candidate.total_cost_per_hour)
            })
    });

    let worst_cost = ranked
        .iter()
        .map(|r| r.cost_for_target)
        .fold(f64::MIN, f64::max);

    for (index, entry) in ranked.iter_mut().enumerate() {
        entry.rank = index + 1;
        entry.savings_vs_worst = worst_cost - entry.cost_for_target;
    }

    debug!(
        candidates = ranked.len(),
        best = %ranked[0].candidate.id,
        "Ranked candidates"
    );

    Ok(ranked)
}
