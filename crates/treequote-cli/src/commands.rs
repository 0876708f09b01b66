//! Command handlers for CLI subcommands.
//!
//! Handlers write to any `Write` sink so they can be exercised without a
//! terminal; [`execute`] points them at stdout.

use std::io::{self, Write};
use std::path::Path;

use serde_json::json;
use tracing::info;
use treequote_engine::{
    assign_default, compare_candidates, compute_equipment_cost, compute_labor_cost, convert_margin,
    format_currency, present_pricing, quote_project, rebuild_snapshot, record_progress,
    reprice_project, snapshot_drift, snapshot_loadout, transition_project, verify_cached_cost,
    Candidate, PricingDefaults, RankedCandidate,
};
use treequote_models::{
    Equipment, LaborInput, Loadout, LoadoutId, LoadoutSnapshot, Project, ProjectStatus,
};

use crate::cli::{Commands, OutputFormat};
use crate::config::{config_dir, load_defaults, resolve_defaults};
use crate::error::{CliError, Result};
use crate::files::{read_json, write_json_atomic, CompareFile, LoadoutFile, QuoteFile};

/// Execute a CLI command.
pub fn execute(command: Commands, config_override: Option<&Path>) -> Result<()> {
    let defaults = load_defaults(&config_dir(config_override))?;
    let stdout = io::stdout();
    let mut out = stdout.lock();
    run(command, &defaults, &mut out)
}

/// Runs a command against loaded defaults, writing its report to `out`.
pub fn run(command: Commands, defaults: &PricingDefaults, out: &mut impl Write) -> Result<()> {
    match command {
        Commands::Equipment { file, format } => cmd_equipment(&file, format, defaults, out),
        Commands::Labor { wage, burden } => cmd_labor(wage, burden, defaults, out),
        Commands::Margin { cost, margin } => cmd_margin(cost, margin, defaults, out),
        Commands::Loadout { file, format } => cmd_loadout(&file, format, defaults, out),
        Commands::Quote {
            file,
            margin,
            buffer,
            format,
        } => {
            let defaults = resolve_defaults(defaults.clone(), margin, buffer)?;
            cmd_quote(&file, format, &defaults, out)
        }
        Commands::Compare {
            file,
            target,
            format,
        } => cmd_compare(&file, target, format, defaults, out),
        Commands::Transition { file, to, write } => cmd_transition(&file, to, write, out),
        Commands::Progress {
            file,
            percent,
            write,
        } => cmd_progress(&file, percent, write, out),
        Commands::Reprice {
            project,
            loadout,
            write,
        } => cmd_reprice(&project, &loadout, write, defaults, out),
        Commands::SetDefault {
            file,
            loadout,
            write,
        } => cmd_set_default(&file, &loadout, write, out),
    }
}

fn cmd_equipment(
    path: &Path,
    format: OutputFormat,
    defaults: &PricingDefaults,
    out: &mut impl Write,
) -> Result<()> {
    let equipment: Equipment = read_json(path)?;
    let cost = compute_equipment_cost(&equipment.input)?;
    let cache = match equipment.cached_total_cost_per_hour {
        Some(_) => Some(verify_cached_cost(&equipment)?),
        None => None,
    };
    let money = |v: f64| format_currency(v, defaults.currency_decimals);

    match format {
        OutputFormat::Table => {
            writeln!(out, "Equipment: {} ({})", equipment.name, equipment.id)?;
            writeln!(out, "  Depreciation     {:>12}/hr", money(cost.depreciation_per_hour))?;
            writeln!(out, "  Financing        {:>12}/hr", money(cost.financing_per_hour))?;
            writeln!(out, "  Ownership        {:>12}/hr", money(cost.ownership_cost_per_hour))?;
            writeln!(out, "  Fuel             {:>12}/hr", money(cost.fuel_cost_per_hour))?;
            writeln!(out, "  Operating        {:>12}/hr", money(cost.operating_cost_per_hour))?;
            writeln!(out, "  Total            {:>12}/hr", money(cost.total_cost_per_hour))?;
            if let Some(check) = cache {
                match check.cached {
                    Some(cached) if !check.in_sync => writeln!(
                        out,
                        "  Cached cost is stale: {}/hr recorded, {}/hr now",
                        money(cached),
                        money(check.computed)
                    )?,
                    _ => writeln!(out, "  Cached cost matches")?,
                }
            }
        }
        OutputFormat::Json => {
            let report = json!({ "equipment": equipment, "cost": cost, "cache": cache });
            writeln!(out, "{}", serde_json::to_string_pretty(&report)?)?;
        }
        OutputFormat::Brief => {
            writeln!(
                out,
                "{}\t{}",
                equipment.id,
                money(cost.total_cost_per_hour)
            )?;
        }
    }

    Ok(())
}

fn cmd_labor(
    wage: f64,
    burden: f64,
    defaults: &PricingDefaults,
    out: &mut impl Write,
) -> Result<()> {
    let cost = compute_labor_cost(&LaborInput {
        base_wage: wage,
        burden_multiplier: burden,
    })?;
    let money = |v: f64| format_currency(v, defaults.currency_decimals);

    writeln!(out, "Base wage        {:>12}/hr", money(cost.base_wage))?;
    writeln!(out, "Burden           {:>12}/hr", money(cost.burden_cost_per_hour))?;
    writeln!(out, "True cost        {:>12}/hr", money(cost.true_cost_per_hour))?;
    Ok(())
}

fn cmd_margin(
    cost: f64,
    margin: f64,
    defaults: &PricingDefaults,
    out: &mut impl Write,
) -> Result<()> {
    let conversion = convert_margin(cost, margin)?;

    writeln!(
        out,
        "Cost             {:>12}/hr",
        format_currency(conversion.cost_per_hour, defaults.currency_decimals)
    )?;
    writeln!(out, "Margin           {:>12}%", conversion.margin_percent)?;
    writeln!(out, "Divisor          {:>12}", conversion.divisor)?;
    writeln!(
        out,
        "Billing rate     {:>12}/hr",
        format_currency(conversion.billing_rate_per_hour, defaults.currency_decimals)
    )?;
    Ok(())
}

fn cmd_loadout(
    path: &Path,
    format: OutputFormat,
    defaults: &PricingDefaults,
    out: &mut impl Write,
) -> Result<()> {
    let file: LoadoutFile = read_json(path)?;
    let snapshot = snapshot_loadout(&file.loadout, &file.library)?;

    match format {
        OutputFormat::Table => print_snapshot(&snapshot, defaults, out)?,
        OutputFormat::Json => {
            writeln!(out, "{}", serde_json::to_string_pretty(&snapshot)?)?;
        }
        OutputFormat::Brief => {
            writeln!(
                out,
                "{}\t{}",
                snapshot.loadout_id,
                format_currency(snapshot.cost_per_hour(), defaults.currency_decimals)
            )?;
        }
    }
    Ok(())
}

fn print_snapshot(
    snapshot: &LoadoutSnapshot,
    defaults: &PricingDefaults,
    out: &mut impl Write,
) -> Result<()> {
    let money = |v: f64| format_currency(v, defaults.currency_decimals);
    let totals = &snapshot.totals;

    writeln!(out, "Loadout: {} ({})", snapshot.name, snapshot.loadout_id)?;
    for line in snapshot.equipment.iter().chain(snapshot.crew.iter()) {
        writeln!(
            out,
            "  {:<24} {:>12}/hr",
            truncate(&line.name, 24),
            money(line.cost_per_hour)
        )?;
    }
    writeln!(out, "  {}", "-".repeat(40))?;
    writeln!(
        out,
        "  {:<24} {:>12}/hr",
        "Equipment",
        money(totals.total_equipment_cost_per_hour)
    )?;
    writeln!(
        out,
        "  {:<24} {:>12}/hr",
        "Labor",
        money(totals.total_labor_cost_per_hour)
    )?;
    writeln!(
        out,
        "  {:<24} {:>12}/hr",
        "Total",
        money(totals.total_loadout_cost_per_hour)
    )?;
    if let (Some(rate), Some(unit)) = (snapshot.production_rate(), snapshot.production_unit()) {
        writeln!(out, "  Production: {} {}/hr", rate, unit)?;
    }
    Ok(())
}

fn cmd_quote(
    path: &Path,
    format: OutputFormat,
    defaults: &PricingDefaults,
    out: &mut impl Write,
) -> Result<()> {
    let file: QuoteFile = read_json(path)?;
    let snapshot = snapshot_loadout(&file.loadout, &file.library)?;
    let project = quote_project(&snapshot, &file.request, defaults)?;

    match format {
        OutputFormat::Table => print_project(&project, defaults, out)?,
        OutputFormat::Json => {
            writeln!(out, "{}", serde_json::to_string_pretty(&project)?)?;
        }
        OutputFormat::Brief => {
            writeln!(
                out,
                "{}\t{}\t{}",
                project.id,
                project.name,
                format_currency(project.pricing.total_price, defaults.currency_decimals)
            )?;
        }
    }
    Ok(())
}

fn print_project(project: &Project, defaults: &PricingDefaults, out: &mut impl Write) -> Result<()> {
    let shown = present_pricing(&project.pricing, defaults);
    let money = |v: f64| format_currency(v, defaults.currency_decimals);

    writeln!(out, "Project: {} ({})", project.name, project.id)?;
    if let Some(customer) = &project.customer {
        writeln!(out, "  Customer: {}", customer)?;
    }
    writeln!(out, "  Status: {}", project.status)?;
    writeln!(
        out,
        "  Loadout: {} at {}/hr",
        project.loadout.name,
        money(shown.loadout_cost_per_hour)
    )?;
    writeln!(
        out,
        "  Job: {} {}",
        project.job.job_size, project.job.job_unit
    )?;
    writeln!(out)?;
    writeln!(out, "  Work hours       {:>12}", shown.work_hours)?;
    writeln!(out, "  Transport hours  {:>12}", shown.transport_hours)?;
    writeln!(out, "  Buffer hours     {:>12}", shown.buffer_hours)?;
    writeln!(out, "  Total hours      {:>12}", shown.total_hours)?;
    writeln!(out)?;
    writeln!(out, "  Billing rate     {:>12}/hr", money(shown.billing_rate_per_hour))?;
    writeln!(out, "  Total cost       {:>12}", money(shown.total_cost))?;
    writeln!(out, "  Total price      {:>12}", money(shown.total_price))?;
    writeln!(
        out,
        "  Profit           {:>12} ({}%)",
        money(shown.total_profit),
        shown.effective_margin_percent
    )?;
    writeln!(
        out,
        "  Cost per {:<8} {:>12}",
        truncate(&project.job.job_unit, 8),
        money(shown.cost_per_unit)
    )?;
    Ok(())
}

fn cmd_compare(
    path: &Path,
    target: f64,
    format: OutputFormat,
    defaults: &PricingDefaults,
    out: &mut impl Write,
) -> Result<()> {
    let file: CompareFile = read_json(path)?;

    let mut candidates = Vec::with_capacity(file.loadouts.len() + file.equipment.len());
    for loadout in &file.loadouts {
        let snapshot = snapshot_loadout(loadout, &file.library)?;
        candidates.push(Candidate::from_snapshot(&snapshot));
    }
    for id in &file.equipment {
        let equipment = file
            .library
            .find_equipment(id.as_str())
            .ok_or_else(|| CliError::NotFound(format!("equipment {}", id)))?;
        candidates.push(Candidate::from_equipment(equipment)?);
    }

    let ranked = compare_candidates(&candidates, target)?;

    match format {
        OutputFormat::Table => print_ranking(&ranked, defaults, out)?,
        OutputFormat::Json => {
            writeln!(out, "{}", serde_json::to_string_pretty(&ranked)?)?;
        }
        OutputFormat::Brief => {
            for entry in &ranked {
                writeln!(out, "{}\t{}", entry.rank, entry.candidate.id)?;
            }
        }
    }
    Ok(())
}

fn print_ranking(
    ranked: &[RankedCandidate],
    defaults: &PricingDefaults,
    out: &mut impl Write,
) -> Result<()> {
    let money = |v: f64| format_currency(v, defaults.currency_decimals);

    writeln!(
        out,
        "{:<4}  {:<24}  {:>12}  {:>8}  {:>12}  {:>12}",
        "RANK", "NAME", "PER UNIT", "HOURS", "COST", "SAVINGS"
    )?;
    writeln!(out, "{}", "-".repeat(82))?;
    for entry in ranked {
        writeln!(
            out,
            "{:<4}  {:<24}  {:>12}  {:>8.2}  {:>12}  {:>12}",
            entry.rank,
            truncate(&entry.candidate.name, 24),
            money(entry.cost_per_unit_output),
            entry.hours_for_target,
            money(entry.cost_for_target),
            money(entry.savings_vs_worst)
        )?;
    }
    Ok(())
}

fn cmd_transition(path: &Path, to: ProjectStatus, write: bool, out: &mut impl Write) -> Result<()> {
    let project: Project = read_json(path)?;
    let updated = transition_project(&project, to)?;
    finish_record(path, &updated, write, out)
}

fn cmd_progress(path: &Path, percent: f64, write: bool, out: &mut impl Write) -> Result<()> {
    let project: Project = read_json(path)?;
    let updated = record_progress(&project, percent)?;
    finish_record(path, &updated, write, out)
}

fn cmd_reprice(
    project_path: &Path,
    loadout_path: &Path,
    write: bool,
    defaults: &PricingDefaults,
    out: &mut impl Write,
) -> Result<()> {
    let project: Project = read_json(project_path)?;
    let file: LoadoutFile = read_json(loadout_path)?;
    let money = |v: f64| format_currency(v, defaults.currency_decimals);

    let drift = snapshot_drift(&project.loadout, &file.loadout, &file.library)?;
    let snapshot = rebuild_snapshot(&project.loadout, &file.loadout, &file.library)?;
    let repriced = reprice_project(&project, &snapshot, defaults)?;

    if drift.has_drift() {
        writeln!(
            out,
            "Costs changed since this quote: {}/hr quoted, {}/hr now",
            money(drift.frozen_cost_per_hour),
            money(drift.current_cost_per_hour)
        )?;
    } else {
        writeln!(out, "Costs unchanged since this quote")?;
    }
    writeln!(
        out,
        "Price: {} -> {}",
        money(project.pricing.total_price),
        money(repriced.pricing.total_price)
    )?;

    finish_record(project_path, &repriced, write, out)
}

fn cmd_set_default(path: &Path, loadout_id: &str, write: bool, out: &mut impl Write) -> Result<()> {
    let loadouts: Vec<Loadout> = read_json(path)?;
    let updated = assign_default(&loadouts, &LoadoutId::from_string(loadout_id))?;

    if write {
        write_json_atomic(path, &updated)?;
        info!(loadout_id, path = %path.display(), "Saved default loadout");
    }
    for loadout in &updated {
        let marker = if loadout.is_default { "*" } else { " " };
        writeln!(out, "{} {}\t{}", marker, loadout.id, loadout.name)?;
    }
    Ok(())
}

/// Prints an updated project record, replacing the file when asked.
fn finish_record(path: &Path, project: &Project, write: bool, out: &mut impl Write) -> Result<()> {
    if write {
        write_json_atomic(path, project)?;
        info!(project_id = %project.id, path = %path.display(), "Saved project record");
    }
    writeln!(out, "{}", serde_json::to_string_pretty(project)?)?;
    Ok(())
}

/// Truncate a string to max length.
fn truncate(s: &str, max: usize) -> String {
    if s.chars().count() <= max {
        s.to_string()
    } else {
        let cut: String = s.chars().take(max.saturating_sub(3)).collect();
        format!("{}...", cut)
    }
}
