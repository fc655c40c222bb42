//! Planning orchestrator: load → validate → compute → check → report.
//!
//! This is the main workflow that ties together all components.

use chrono::{DateTime, Utc};
use fireplan::{Action, Allocation, compute};
use log::{debug, info, warn};
use serde::Serialize;

use crate::audit::{self, AuditLog};
use crate::checks::{self, CheckReport};
use crate::config::Config;
use crate::drift::{self, DriftReport};
use crate::error::{Error, Result};
use crate::report::{AssetTable, ClassTable, SortKey};
use crate::snapshot::{Inputs, SnapshotRepository};

/// Options for a planning run.
#[derive(Debug, Clone, Copy, Default)]
pub struct PlanOptions {
    pub sort: SortKey,
    /// Print one JSON document instead of tables.
    pub json: bool,
}

/// Everything a planning run produced.
#[derive(Debug, Clone)]
pub struct PlanOutcome {
    pub as_of: Option<DateTime<Utc>>,
    pub allocation: Allocation,
    pub checks: CheckReport,
    pub drift: DriftReport,
}

impl PlanOutcome {
    /// Number of assets that need a BUY/SELL/SAVE/INVEST.
    pub fn actionable(&self) -> usize {
        self.allocation
            .deltas
            .iter()
            .filter(|d| d.action.is_actionable())
            .count()
    }

    pub fn excluded(&self) -> usize {
        self.allocation
            .deltas
            .iter()
            .filter(|d| d.action == Action::Excluded)
            .count()
    }
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct PlanDocument<'a> {
    #[serde(skip_serializing_if = "Option::is_none")]
    as_of: Option<DateTime<Utc>>,
    allocation: &'a Allocation,
    checks: &'a CheckReport,
    drift: &'a DriftReport,
}

/// Execute a full planning run.
pub fn run_plan(
    config: &Config,
    repo: &dyn SnapshotRepository,
    opts: &PlanOptions,
) -> Result<PlanOutcome> {
    // 1. Open audit log
    let mut audit = AuditLog::open(&config.audit_path())?;
    let source = repo.describe();
    audit::log_run_started(&mut audit, "plan", &source)?;

    // 2. Load and validate
    let (as_of, inputs) = load_inputs(repo, Some(&mut audit))?;

    // 3. Compute
    let allocation = match compute(
        &inputs.assets,
        &inputs.class_targets,
        &config.engine_options(),
    ) {
        Ok(a) => a,
        Err(e) => {
            audit::log_validation_failed(&mut audit, &e.to_string())?;
            return Err(e.into());
        }
    };
    warn_missing_classes(&allocation);
    audit::log_allocation(&mut audit, &allocation)?;

    // 4. Target checks and drift
    let check_report =
        checks::run_checks(&inputs.assets, &inputs.class_targets, &allocation, &config.checks);
    audit::log_checks(&mut audit, &check_report)?;
    let drift_report = drift::drift(&allocation, config.checks.drift_band_pct);

    // 5. Display
    if opts.json {
        let doc = PlanDocument {
            as_of,
            allocation: &allocation,
            checks: &check_report,
            drift: &drift_report,
        };
        println!(
            "{}",
            serde_json::to_string_pretty(&doc).map_err(Error::Output)?
        );
    } else {
        print!("{}", ClassTable(&allocation));
        println!();
        print!(
            "{}",
            AssetTable {
                allocation: &allocation,
                assets: &inputs.assets,
                sort: opts.sort,
            }
        );
        println!();
        print!("{check_report}");
        println!();
        print!("{drift_report}");
        if allocation.is_balanced() {
            println!("\nNo rebalancing needed, portfolio matches target.");
        }
    }

    if check_report.has_failures() {
        return Err(Error::ChecksFailed(check_report.failure_summary()));
    }

    let outcome = PlanOutcome {
        as_of,
        allocation,
        checks: check_report,
        drift: drift_report,
    };

    // 6. Log completion
    audit::log_run_completed(&mut audit, outcome.actionable(), outcome.excluded())?;
    info!(
        "{} actionable, {} excluded. Audit logged to {}",
        outcome.actionable(),
        outcome.excluded(),
        config.audit_path().display()
    );

    Ok(outcome)
}

/// Load and validate a snapshot without computing a plan.
pub fn run_validate(repo: &dyn SnapshotRepository) -> Result<Inputs> {
    let (_, inputs) = load_inputs(repo, None)?;
    fireplan::engine::validate(&inputs.assets, &inputs.class_targets)?;

    let total: f64 = inputs.assets.iter().map(|a| a.current_value).sum();
    println!(
        "{}: {} assets, {} class targets, ${total:.2} total. OK",
        repo.describe(),
        inputs.assets.len(),
        inputs.class_targets.len(),
    );
    Ok(inputs)
}

/// Print class drift for a snapshot.
pub fn run_drift(config: &Config, repo: &dyn SnapshotRepository) -> Result<DriftReport> {
    let (_, inputs) = load_inputs(repo, None)?;
    let allocation = compute(
        &inputs.assets,
        &inputs.class_targets,
        &config.engine_options(),
    )?;
    warn_missing_classes(&allocation);

    let report = drift::drift(&allocation, config.checks.drift_band_pct);
    print!("{report}");
    if report.needs_rebalance() {
        info!("Drift exceeds ±{:.1}% band", report.band_pct);
    }
    Ok(report)
}

// === Helpers ===

fn load_inputs(
    repo: &dyn SnapshotRepository,
    audit: Option<&mut AuditLog>,
) -> Result<(Option<DateTime<Utc>>, Inputs)> {
    info!("Loading snapshot from {}", repo.describe());
    let snapshot = repo.load()?;
    debug!(
        "{} asset records, {} class target records",
        snapshot.assets.len(),
        snapshot.class_targets.len()
    );

    let as_of = snapshot.as_of;
    match audit {
        Some(audit) => {
            audit::log_snapshot(audit, &snapshot)?;
            match snapshot.into_inputs() {
                Ok(inputs) => Ok((as_of, inputs)),
                Err(e) => {
                    audit::log_validation_failed(audit, &e.to_string())?;
                    Err(e)
                }
            }
        }
        None => Ok((as_of, snapshot.into_inputs()?)),
    }
}

fn warn_missing_classes(allocation: &Allocation) {
    for class in &allocation.missing_class_targets {
        warn!("No class target for {class}; its assets are excluded from rebalancing");
    }
}
