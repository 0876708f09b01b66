//! Project pricing and status lifecycle.
//!
//! Pricing expands a job size into hours and multiplies them by the loadout
//! cost and the billing rate:
//!
//! ```text
//! work_hours   = job_size / production_rate
//! buffer_hours = buffer_fraction * (work_hours + transport_hours)
//! total_hours  = work_hours + transport_hours + buffer_hours
//! total_cost   = total_hours * loadout_cost_per_hour
//! total_price  = total_hours * billing_rate_per_hour
//! total_profit = total_price - total_cost
//! ```
//!
//! Every intermediate figure is returned. Nothing is rounded here; rounding
//! happens in [`crate::presentation`].

use chrono::Utc;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};
use treequote_models::{
    JobSpec, LoadoutSnapshot, Project, ProjectId, ProjectPricing, ProjectStatus,
};

use crate::config::PricingDefaults;
use crate::error::{PricingError, Result};
use crate::margin::convert_margin;
use crate::validate::{finite, non_negative, positive, same_unit};

/// Inputs of a single pricing computation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProjectInput {
    /// Loadout cost per hour.
    pub loadout_cost_per_hour: f64,
    /// Billing rate per hour.
    pub billing_rate_per_hour: f64,
    /// Amount of work.
    pub job_size: f64,
    /// Unit of the job size.
    pub job_unit: String,
    /// Output per hour of the loadout.
    pub production_rate: f64,
    /// Unit of the production rate.
    pub production_unit: String,
    /// Travel hours.
    pub transport_hours: f64,
    /// Contingency as a fraction of work plus transport.
    pub buffer_fraction: f64,
}

impl ProjectInput {
    /// Builds pricing inputs from a frozen snapshot and a job.
    ///
    /// A job without a buffer uses `default_buffer`.
    pub fn from_snapshot(
        snapshot: &LoadoutSnapshot,
        billing_rate_per_hour: f64,
        job: &JobSpec,
        default_buffer: f64,
    ) -> Result<Self> {
        let production_rate = snapshot.production_rate().ok_or_else(|| {
            PricingError::validation(
                "production_rate",
                format!("loadout {} has no production rate", snapshot.loadout_id),
            )
        })?;
        let production_unit = snapshot.production_unit().unwrap_or(&job.job_unit);

        Ok(Self {
            loadout_cost_per_hour: snapshot.cost_per_hour(),
            billing_rate_per_hour,
            job_size: job.job_size,
            job_unit: job.job_unit.clone(),
            production_rate,
            production_unit: production_unit.to_string(),
            transport_hours: job.transport_hours,
            buffer_fraction: job.buffer_fraction.unwrap_or(default_buffer),
        })
    }
}

/// Prices a job.
///
/// # Errors
/// Returns a validation error when the job size or production rate is not
/// positive, the units differ, any hour, rate or cost input is negative, or
/// the totals overflow.
pub fn price_project(input: &ProjectInput) -> Result<ProjectPricing> {
    let loadout_cost_per_hour = non_negative("loadout_cost_per_hour", input.loadout_cost_per_hour)?;
    let billing_rate_per_hour = non_negative("billing_rate_per_hour", input.billing_rate_per_hour)?;
    let job_size = positive("job_size", input.job_size)?;
    let production_rate = positive("production_rate", input.production_rate)?;
    let transport_hours = non_negative("transport_hours", input.transport_hours)?;
    let buffer_fraction = non_negative("buffer_fraction", input.buffer_fraction)?;

    if !same_unit(&input.job_unit, &input.production_unit) {
        return Err(PricingError::validation(
            "job_unit",
            format!(
                "job measured in {} but loadout produces {}",
                input.job_unit, input.production_unit
            ),
        ));
    }

    let work_hours = job_size / production_rate;
    let buffer_hours = buffer_fraction * (work_hours + transport_hours);
    let total_hours = finite("total_hours", work_hours + transport_hours + buffer_hours)?;

    let total_cost = finite("total_cost", total_hours * loadout_cost_per_hour)?;
    let total_price = finite("total_price", total_hours * billing_rate_per_hour)?;
    let total_profit = total_price - total_cost;

    let effective_margin_percent = if total_price > 0.0 {
        total_profit / total_price * 100.0
    } else {
        0.0
    };

    debug!(
        work_hours,
        transport_hours,
        buffer_hours,
        total_hours,
        total_cost,
        total_price,
        "Priced project"
    );

    Ok(ProjectPricing {
        work_hours,
        transport_hours,
        buffer_hours,
        total_hours,
        loadout_cost_per_hour,
        billing_rate_per_hour,
        total_cost,
        total_price,
        total_profit,
        effective_margin_percent,
        cost_per_unit: total_cost / job_size,
    })
}

/// What the caller wants quoted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QuoteRequest {
    /// Project name.
    pub name: String,

    /// Customer, if known.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub customer: Option<String>,

    /// Target margin; the configured default when absent.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub margin_percent: Option<f64>,

    /// Job inputs.
    pub job: JobSpec,
}

/// Quotes a job against a frozen snapshot, returning a new project in
/// `quoted` status.
pub fn quote_project(
    snapshot: &LoadoutSnapshot,
    request: &QuoteRequest,
    defaults: &PricingDefaults,
) -> Result<Project> {
    defaults.validate()?;
    let margin_percent = request.margin_percent.unwrap_or(defaults.margin_percent);
    let pricing = price_with_margin(snapshot, margin_percent, &request.job, defaults)?;

    let mut job = request.job.clone();
    job.buffer_fraction = Some(job.buffer_fraction.unwrap_or(defaults.buffer_fraction));

    let project = Project {
        id: ProjectId::new(),
        name: request.name.clone(),
        customer: request.customer.clone(),
        loadout: snapshot.clone(),
        margin_percent,
        job,
        pricing,
        status: ProjectStatus::Quoted,
        completion_percentage: 0.0,
        created_at: Utc::now(),
        updated_at: None,
    };

    info!(
        project_id = %project.id,
        loadout_id = %snapshot.loadout_id,
        total_price = pricing.total_price,
        "Quoted project"
    );

    Ok(project)
}

/// Prices a quoted project again against a rebuilt snapshot, keeping its
/// margin and job inputs.
///
/// # Errors
/// Only `quoted` projects can be repriced, and only against a snapshot of the
/// same loadout.
pub fn reprice_project(
    project: &Project,
    snapshot: &LoadoutSnapshot,
    defaults: &PricingDefaults,
) -> Result<Project> {
    if project.status != ProjectStatus::Quoted {
        return Err(PricingError::validation(
            "status",
            format!("only quoted projects can be repriced, project is {}", project.status),
        ));
    }
    if project.loadout.loadout_id != snapshot.loadout_id {
        return Err(PricingError::validation(
            "loadout_id",
            format!(
                "project was quoted with {}, not {}",
                project.loadout.loadout_id, snapshot.loadout_id
            ),
        ));
    }

    let pricing = price_with_margin(snapshot, project.margin_percent, &project.job, defaults)?;

    info!(
        project_id = %project.id,
        previous_price = project.pricing.total_price,
        total_price = pricing.total_price,
        "Repriced project"
    );

    Ok(Project {
        loadout: snapshot.clone(),
        pricing,
        updated_at: Some(Utc::now()),
        ..project.clone()
    })
}

fn price_with_margin(
    snapshot: &LoadoutSnapshot,
    margin_percent: f64,
    job: &JobSpec,
    defaults: &PricingDefaults,
) -> Result<ProjectPricing> {
    let conversion = convert_margin(snapshot.cost_per_hour(), margin_percent)?;
    let input = ProjectInput::from_snapshot(
        snapshot,
        conversion.billing_rate_per_hour,
        job,
        defaults.buffer_fraction,
    )?;
    price_project(&input)
}

/// Moves a project to a new status, returning the updated copy.
///
/// Entering `completed` sets completion to 100%.
///
/// # Errors
/// Returns `InvalidTransition` for any change outside the lifecycle table.
pub fn transition_project(project: &Project, to: ProjectStatus) -> Result<Project> {
    let from = project.status;
    if !from.can_transition_to(to) {
        return Err(PricingError::InvalidTransition { from, to });
    }

    let completion_percentage = if to == ProjectStatus::Completed {
        100.0
    } else {
        project.completion_percentage
    };

    info!(project_id = %project.id, %from, %to, "Project status changed");

    Ok(Project {
        status: to,
        completion_percentage,
        updated_at: Some(Utc::now()),
        ..project.clone()
    })
}

/// Records work progress on an in-progress project.
///
/// # Errors
/// Returns a validation error when the project is not in progress, the
/// percentage is outside `[0, 100]`, or it is lower than the current value.
pub fn record_progress(project: &Project, completion_percentage: f64) -> Result<Project> {
    if project.status != ProjectStatus::InProgress {
        return Err(PricingError::validation(
            "status",
            format!(
                "progress can only be recorded while in_progress, project is {}",
                project.status
            ),
        ));
    }
    let pct = finite("completion_percentage", completion_percentage)?;
    if !(0.0..=100.0).contains(&pct) {
        return Err(PricingError::validation(
            "completion_percentage",
            format!("must be between 0 and 100, got {}", pct),
        ));
    }
    if pct < project.completion_percentage {
        return Err(PricingError::validation(
            "completion_percentage",
            format!(
                "cannot decrease from {} to {}",
                project.completion_percentage, pct
            ),
        ));
    }

    Ok(Project {
        completion_percentage: pct,
        updated_at: Some(Utc::now()),
        ..project.clone()
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use treequote_models::{LoadoutId, LoadoutTotals};

    fn input() -> ProjectInput {
        ProjectInput {
            loadout_cost_per_hour: 100.0,
            billing_rate_per_hour: 200.0,
            job_size: 10.0,
            job_unit: "acres".to_string(),
            production_rate: 2.0,
            production_unit: "acres".to_string(),
            transport_hours: 1.0,
            buffer_fraction: 0.10,
        }
    }

    fn snapshot(cost_per_hour: f64, rate: Option<f64>) -> LoadoutSnapshot {
        LoadoutSnapshot {
            loadout_id: LoadoutId::from("lo-a"),
            name: "Crew A".to_string(),
            equipment: Vec::new(),
            crew: Vec::new(),
            totals: LoadoutTotals {
                total_loadout_cost_per_hour: cost_per_hour,
                production_rate: rate,
                production_unit: Some("acres".to_string()),
                ..Default::default()
            },
            captured_at: Utc::now(),
        }
    }

    fn request() -> QuoteRequest {
        QuoteRequest {
            name: "Smith lot".to_string(),
            customer: Some("Smith".to_string()),
            margin_percent: Some(50.0),
            job: JobSpec {
                job_size: 10.0,
                job_unit: "acres".to_string(),
                transport_hours: 1.0,
                buffer_fraction: None,
            },
        }
    }

    fn quoted() -> Project {
        quote_project(&snapshot(100.0, Some(2.0)), &request(), &PricingDefaults::default()).unwrap()
    }

    #[test]
    fn test_hour_expansion() {
        let pricing = price_project(&input()).unwrap();

        assert_eq!(pricing.work_hours, 5.0);
        assert_eq!(pricing.transport_hours, 1.0);
        assert_relative_eq!(pricing.buffer_hours, 0.6, epsilon = 1e-12);
        assert_relative_eq!(pricing.total_hours, 6.6, epsilon = 1e-12);
    }

    #[test]
    fn test_cost_price_profit() {
        let pricing = price_project(&input()).unwrap();

        assert_relative_eq!(pricing.total_cost, 660.0, epsilon = 1e-9);
        assert_relative_eq!(pricing.total_price, 1320.0, epsilon = 1e-9);
        assert_relative_eq!(pricing.total_profit, 660.0, epsilon = 1e-9);
        assert_relative_eq!(pricing.effective_margin_percent, 50.0, epsilon = 1e-9);
        assert_relative_eq!(pricing.cost_per_unit, 66.0, epsilon = 1e-9);
    }

    #[test]
    fn test_profit_is_price_minus_cost() {
        let mut i = input();
        i.loadout_cost_per_hour = 286.16;
        i.billing_rate_per_hour = 412.77;
        let pricing = price_project(&i).unwrap();

        assert_eq!(pricing.total_profit, pricing.total_price - pricing.total_cost);
    }

    #[test]
    fn test_no_buffer_no_transport() {
        let mut i = input();
        i.transport_hours = 0.0;
        i.buffer_fraction = 0.0;
        let pricing = price_project(&i).unwrap();

        assert_eq!(pricing.buffer_hours, 0.0);
        assert_eq!(pricing.total_hours, 5.0);
    }

    #[test]
    fn test_zero_billing_rate_has_zero_margin() {
        let mut i = input();
        i.billing_rate_per_hour = 0.0;
        let pricing = price_project(&i).unwrap();

        assert_eq!(pricing.total_price, 0.0);
        assert_eq!(pricing.effective_margin_percent, 0.0);
    }

    #[test]
    fn test_invalid_inputs_rejected() {
        let cases: [(&str, fn(&mut ProjectInput)); 6] = [
            ("production_rate", |i| i.production_rate = 0.0),
            ("job_size", |i| i.job_size = 0.0),
            ("transport_hours", |i| i.transport_hours = -1.0),
            ("buffer_fraction", |i| i.buffer_fraction = -0.1),
            ("billing_rate_per_hour", |i| i.billing_rate_per_hour = -5.0),
            ("job_unit", |i| i.production_unit = "trees".to_string()),
        ];

        for (expected, mutate) in cases {
            let mut i = input();
            mutate(&mut i);
            let err = price_project(&i).unwrap_err();
            assert!(
                matches!(err, PricingError::Validation { ref field, .. } if field == expected),
                "{}: {:?}",
                expected,
                err
            );
        }
    }

    #[test]
    fn test_overflowing_totals_rejected() {
        let mut i = input();
        i.loadout_cost_per_hour = 1e300;
        i.billing_rate_per_hour = 1e300;
        i.job_size = 1e10;
        i.production_rate = 1.0;

        let err = price_project(&i).unwrap_err();
        assert!(matches!(err, PricingError::Validation { ref field, .. } if field == "total_cost"));
    }

    #[test]
    fn test_units_compared_loosely() {
        let mut i = input();
        i.production_unit = " Acres".to_string();

        assert!(price_project(&i).is_ok());
    }

    #[test]
    fn test_from_snapshot_requires_production_rate() {
        let job = request().job;
        let err = ProjectInput::from_snapshot(&snapshot(100.0, None), 150.0, &job, 0.1).unwrap_err();

        assert!(matches!(err, PricingError::Validation { ref field, .. } if field == "production_rate"));
    }

    #[test]
    fn test_from_snapshot_uses_default_buffer() {
        let job = request().job;
        let i = ProjectInput::from_snapshot(&snapshot(100.0, Some(2.0)), 150.0, &job, 0.25).unwrap();

        assert_eq!(i.buffer_fraction, 0.25);
        assert_eq!(i.production_unit, "acres");
    }

    #[test]
    fn test_quote_project() {
        let project = quoted();

        assert!(project.id.as_str().starts_with("proj-"));
        assert_eq!(project.status, ProjectStatus::Quoted);
        assert_eq!(project.margin_percent, 50.0);
        assert_eq!(project.pricing.billing_rate_per_hour, 200.0);
        assert_eq!(project.job.buffer_fraction, Some(0.10));
        assert_relative_eq!(project.pricing.total_price, 1320.0, epsilon = 1e-9);
        assert_eq!(project.loadout.cost_per_hour(), 100.0);
    }

    #[test]
    fn test_quote_uses_default_margin() {
        let mut req = request();
        req.margin_percent = None;
        let defaults = PricingDefaults::default().with_margin_percent(20.0);

        let project = quote_project(&snapshot(100.0, Some(2.0)), &req, &defaults).unwrap();
        assert_eq!(project.margin_percent, 20.0);
        assert_relative_eq!(project.pricing.billing_rate_per_hour, 125.0, epsilon = 1e-9);
    }

    #[test]
    fn test_quote_invalid_margin_returns_no_project() {
        let mut req = request();
        req.margin_percent = Some(100.0);

        let result = quote_project(&snapshot(100.0, Some(2.0)), &req, &PricingDefaults::default());
        assert_eq!(result.unwrap_err(), PricingError::InvalidMargin(100.0));
    }

    #[test]
    fn test_full_lifecycle() {
        let project = quoted();
        let project = transition_project(&project, ProjectStatus::Approved).unwrap();
        let project = transition_project(&project, ProjectStatus::InProgress).unwrap();
        let project = record_progress(&project, 40.0).unwrap();
        let project = record_progress(&project, 40.0).unwrap();
        let project = transition_project(&project, ProjectStatus::Completed).unwrap();

        assert_eq!(project.status, ProjectStatus::Completed);
        assert_eq!(project.completion_percentage, 100.0);
        assert!(project.updated_at.is_some());
    }

    #[test]
    fn test_completed_to_in_progress_rejected() {
        let mut project = quoted();
        project.status = ProjectStatus::Completed;

        let err = transition_project(&project, ProjectStatus::InProgress).unwrap_err();
        assert_eq!(
            err,
            PricingError::InvalidTransition {
                from: ProjectStatus::Completed,
                to: ProjectStatus::InProgress,
            }
        );
    }

    #[test]
    fn test_cancel_paths() {
        let project = quoted();
        assert!(transition_project(&project, ProjectStatus::Cancelled).is_ok());

        let approved = transition_project(&project, ProjectStatus::Approved).unwrap();
        assert!(transition_project(&approved, ProjectStatus::Cancelled).is_ok());

        let started = transition_project(&approved, ProjectStatus::InProgress).unwrap();
        assert!(matches!(
            transition_project(&started, ProjectStatus::Cancelled),
            Err(PricingError::InvalidTransition { .. })
        ));
    }

    #[test]
    fn test_skipping_rejected() {
        let project = quoted();
        assert!(transition_project(&project, ProjectStatus::InProgress).is_err());
        assert!(transition_project(&project, ProjectStatus::Completed).is_err());
    }

    #[test]
    fn test_transition_leaves_original_untouched() {
        let project = quoted();
        let approved = transition_project(&project, ProjectStatus::Approved).unwrap();

        assert_eq!(project.status, ProjectStatus::Quoted);
        assert_eq!(approved.status, ProjectStatus::Approved);
        assert_eq!(approved.id, project.id);
    }

    #[test]
    fn test_progress_cannot_decrease() {
        let project = quoted();
        let project = transition_project(&project, ProjectStatus::Approved).unwrap();
        let project = transition_project(&project, ProjectStatus::InProgress).unwrap();
        let project = record_progress(&project, 60.0).unwrap();

        assert!(record_progress(&project, 59.0).is_err());
        assert_eq!(project.completion_percentage, 60.0);
    }

    #[test]
    fn test_progress_range() {
        let project = quoted();
        let project = transition_project(&project, ProjectStatus::Approved).unwrap();
        let project = transition_project(&project, ProjectStatus::InProgress).unwrap();

        assert!(record_progress(&project, 100.5).is_err());
        assert!(record_progress(&project, -1.0).is_err());
        assert!(record_progress(&project, 100.0).is_ok());
    }

    #[test]
    fn test_progress_requires_in_progress() {
        let project = quoted();
        let err = record_progress(&project, 10.0).unwrap_err();

        assert!(matches!(err, PricingError::Validation { ref field, .. } if field == "status"));
    }

    #[test]
    fn test_reprice_quoted_project() {
        let project = quoted();
        let rebuilt = snapshot(120.0, Some(2.0));

        let repriced = reprice_project(&project, &rebuilt, &PricingDefaults::default()).unwrap();

        assert_eq!(repriced.id, project.id);
        assert_eq!(repriced.pricing.billing_rate_per_hour, 240.0);
        assert_relative_eq!(repriced.pricing.total_cost, 792.0, epsilon = 1e-9);
        assert_eq!(project.pricing.loadout_cost_per_hour, 100.0);
    }

    #[test]
    fn test_reprice_approved_project_rejected() {
        let project = transition_project(&quoted(), ProjectStatus::Approved).unwrap();

        assert!(reprice_project(&project, &snapshot(120.0, Some(2.0)), &PricingDefaults::default())
            .is_err());
    }

    #[test]
    fn test_reprice_other_loadout_rejected() {
        let project = quoted();
        let mut other = snapshot(120.0, Some(2.0));
        other.loadout_id = LoadoutId::from("lo-b");

        assert!(reprice_project(&project, &other, &PricingDefaults::default()).is_err());
    }
}
