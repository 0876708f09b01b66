//! Project records and the project status lifecycle.
//!
//! A project is a quoted job. It owns the frozen loadout snapshot it was
//! priced against, the job inputs, and the full hour/cost/price breakdown.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::ids::ProjectId;
use crate::loadout::LoadoutSnapshot;

/// Status of a project.
///
/// ```text
/// quoted -> approved -> in_progress -> completed
///    \          \
///     +----------+--> cancelled
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum ProjectStatus {
    /// A price has been issued to the customer.
    #[default]
    Quoted,
    /// The customer accepted the quote.
    Approved,
    /// Work has started.
    InProgress,
    /// Work is finished.
    Completed,
    /// The job was called off before work started.
    Cancelled,
}

impl ProjectStatus {
    /// All statuses in lifecycle order.
    pub const ALL: [ProjectStatus; 5] = [
        ProjectStatus::Quoted,
        ProjectStatus::Approved,
        ProjectStatus::InProgress,
        ProjectStatus::Completed,
        ProjectStatus::Cancelled,
    ];

    /// Statuses reachable from this one in a single step.
    pub fn allowed_transitions(&self) -> &'static [ProjectStatus] {
        match self {
            ProjectStatus::Quoted => &[ProjectStatus::Approved, ProjectStatus::Cancelled],
            ProjectStatus::Approved => &[ProjectStatus::InProgress, ProjectStatus::Cancelled],
            ProjectStatus::InProgress => &[ProjectStatus::Completed],
            ProjectStatus::Completed | ProjectStatus::Cancelled => &[],
        }
    }

    /// Returns true if `next` is reachable from this status in one step.
    pub fn can_transition_to(&self, next: ProjectStatus) -> bool {
        self.allowed_transitions().contains(&next)
    }

    /// Returns true if no further transition is possible.
    pub fn is_terminal(&self) -> bool {
        self.allowed_transitions().is_empty()
    }

    /// Snake-case name used in records and on the command line.
    pub fn as_str(&self) -> &'static str {
        match self {
            ProjectStatus::Quoted => "quoted",
            ProjectStatus::Approved => "approved",
            ProjectStatus::InProgress => "in_progress",
            ProjectStatus::Completed => "completed",
            ProjectStatus::Cancelled => "cancelled",
        }
    }
}

impl fmt::Display for ProjectStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ProjectStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_ascii_lowercase().replace('-', "_");
        ProjectStatus::ALL
            .into_iter()
            .find(|status| status.as_str() == normalized)
            .ok_or_else(|| format!("unknown project status: {}", s))
    }
}

/// Size and logistics of a job.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JobSpec {
    /// Amount of work (e.g., 10 acres).
    pub job_size: f64,

    /// Unit of the job size; must match the loadout's production unit.
    pub job_unit: String,

    /// Round-trip travel time supplied by the distance collaborator.
    #[serde(default)]
    pub transport_hours: f64,

    /// Contingency as a fraction of work plus transport (0.10 = 10%).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub buffer_fraction: Option<f64>,
}

/// Full pricing breakdown of a project.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ProjectPricing {
    /// Job size divided by production rate.
    pub work_hours: f64,
    /// Travel time.
    pub transport_hours: f64,
    /// Contingency hours.
    pub buffer_hours: f64,
    /// Work plus transport plus buffer.
    pub total_hours: f64,
    /// Loadout cost per hour the quote was priced with.
    pub loadout_cost_per_hour: f64,
    /// Billing rate per hour the quote was priced with.
    pub billing_rate_per_hour: f64,
    /// Hours times loadout cost.
    pub total_cost: f64,
    /// Hours times billing rate.
    pub total_price: f64,
    /// Price minus cost.
    pub total_profit: f64,
    /// Profit as a percentage of price.
    pub effective_margin_percent: f64,
    /// Total cost per unit of job size.
    pub cost_per_unit: f64,
}

/// A quoted job.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Project {
    /// Unique identifier.
    pub id: ProjectId,

    /// Display name (e.g., "Smith lot clearing").
    pub name: String,

    /// Customer the quote was issued to.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub customer: Option<String>,

    /// Frozen loadout costs the job was priced against.
    pub loadout: LoadoutSnapshot,

    /// Target profit margin percentage.
    pub margin_percent: f64,

    /// Job inputs.
    pub job: JobSpec,

    /// Pricing breakdown.
    pub pricing: ProjectPricing,

    /// Current status.
    #[serde(default)]
    pub status: ProjectStatus,

    /// Percent of work done, tracked while in progress.
    #[serde(default)]
    pub completion_percentage: f64,

    /// When the project was quoted.
    pub created_at: DateTime<Utc>,

    /// When the project record last changed.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime<Utc>>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_default() {
        assert_eq!(ProjectStatus::default(), ProjectStatus::Quoted);
    }

    #[test]
    fn test_forward_transitions() {
        assert!(ProjectStatus::Quoted.can_transition_to(ProjectStatus::Approved));
        assert!(ProjectStatus::Approved.can_transition_to(ProjectStatus::InProgress));
        assert!(ProjectStatus::InProgress.can_transition_to(ProjectStatus::Completed));
    }

    #[test]
    fn test_cancel_transitions() {
        assert!(ProjectStatus::Quoted.can_transition_to(ProjectStatus::Cancelled));
        assert!(ProjectStatus::Approved.can_transition_to(ProjectStatus::Cancelled));
        assert!(!ProjectStatus::InProgress.can_transition_to(ProjectStatus::Cancelled));
        assert!(!ProjectStatus::Completed.can_transition_to(ProjectStatus::Cancelled));
    }

    #[test]
    fn test_no_skipping_or_going_back() {
        assert!(!ProjectStatus::Quoted.can_transition_to(ProjectStatus::InProgress));
        assert!(!ProjectStatus::Quoted.can_transition_to(ProjectStatus::Completed));
        assert!(!ProjectStatus::Completed.can_transition_to(ProjectStatus::InProgress));
        assert!(!ProjectStatus::Approved.can_transition_to(ProjectStatus::Quoted));
        assert!(!ProjectStatus::Quoted.can_transition_to(ProjectStatus::Quoted));
    }

    #[test]
    fn test_terminal_statuses() {
        assert!(ProjectStatus::Completed.is_terminal());
        assert!(ProjectStatus::Cancelled.is_terminal());
        assert!(!ProjectStatus::InProgress.is_terminal());
    }

    #[test]
    fn test_status_serialization() {
        let json = serde_json::to_string(&ProjectStatus::InProgress).unwrap();
        assert_eq!(json, "\"in_progress\"");

        let deserialized: ProjectStatus = serde_json::from_str("\"cancelled\"").unwrap();
        assert_eq!(deserialized, ProjectStatus::Cancelled);
    }

    #[test]
    fn test_status_from_str() {
        assert_eq!("in-progress".parse::<ProjectStatus>(), Ok(ProjectStatus::InProgress));
        assert_eq!(" Approved ".parse::<ProjectStatus>(), Ok(ProjectStatus::Approved));
        assert!("archived".parse::<ProjectStatus>().is_err());
    }

    #[test]
    fn test_status_display_matches_serde() {
        for status in ProjectStatus::ALL {
            let json = serde_json::to_string(&status).unwrap();
            assert_eq!(json, format!("\"{}\"", status));
        }
    }

    #[test]
    fn test_job_spec_defaults() {
        let job: JobSpec = serde_json::from_str(r#"{"job_size":10,"job_unit":"acres"}"#).unwrap();

        assert_eq!(job.transport_hours, 0.0);
        assert!(job.buffer_fraction.is_none());
    }
}
