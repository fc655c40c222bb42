//! Target sanity checks.
//!
//! Inspects class and asset targets against the computed allocation and
//! flags configurations that can never be satisfied or silently drop value.

use fireplan::{Action, Allocation, Asset, AssetClass, ClassTargets, TargetKind, percent_of};
use rustc_hash::FxHashMap;
use serde::Serialize;

use crate::config::ChecksConfig;

/// Rounding slack for money comparisons: one cent.
const MONEY_SLACK: f64 = 0.01;

/// Result of running all checks.
#[derive(Debug, Clone, Serialize)]
pub struct CheckReport {
    pub checks: Vec<Check>,
}

/// A single check result.
#[derive(Debug, Clone, Serialize)]
pub struct Check {
    pub name: &'static str,
    pub status: CheckStatus,
    pub detail: String,
}

/// Whether a check passed, warned, or failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum CheckStatus {
    Pass,
    Warn,
    Fail,
}

impl std::fmt::Display for CheckStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CheckStatus::Pass => write!(f, "PASS"),
            CheckStatus::Warn => write!(f, "WARN"),
            CheckStatus::Fail => write!(f, "FAIL"),
        }
    }
}

impl CheckReport {
    /// True if any check failed (not just warned).
    pub fn has_failures(&self) -> bool {
        self.checks.iter().any(|c| c.status == CheckStatus::Fail)
    }

    /// True if any check warned.
    pub fn has_warnings(&self) -> bool {
        self.checks.iter().any(|c| c.status == CheckStatus::Warn)
    }

    /// Names of failed checks, comma separated.
    pub fn failure_summary(&self) -> String {
        self.checks
            .iter()
            .filter(|c| c.status == CheckStatus::Fail)
            .map(|c| c.name)
            .collect::<Vec<_>>()
            .join(", ")
    }
}

impl std::fmt::Display for CheckReport {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "TARGET CHECKS:")?;
        for check in &self.checks {
            writeln!(f, "  [{}] {}: {}", check.status, check.name, check.detail)?;
        }
        Ok(())
    }
}

/// Run all target checks.
///
/// # Arguments
/// - `assets`: The validated assets the allocation was computed from
/// - `class_targets`: Class targets the allocation was computed from
/// - `allocation`: Engine output for the same snapshot
/// - `config`: Check thresholds
pub fn run_checks(
    assets: &[Asset],
    class_targets: &ClassTargets,
    allocation: &Allocation,
    config: &ChecksConfig,
) -> CheckReport {
    let tol = config.percent_tolerance;
    let mut checks = Vec::new();

    // 1. Class percentages must not exceed 100%, and must reach it when
    //    nothing else absorbs the remainder
    let percent_sum: f64 = class_targets.values().filter_map(|t| t.percent()).sum();
    let has_percent = class_targets
        .values()
        .any(|t| t.kind() == TargetKind::Percentage);
    let all_percent = !allocation.classes.is_empty()
        && allocation
            .classes
            .iter()
            .all(|c| c.target_kind == TargetKind::Percentage);
    let (status, detail) = if !has_percent {
        (CheckStatus::Pass, "no percentage class targets".to_string())
    } else if percent_sum > 100.0 + tol {
        (
            CheckStatus::Warn,
            format!("{percent_sum:.2}% targeted, over-allocated by {:.2}%", percent_sum - 100.0),
        )
    } else if percent_sum < 100.0 - tol && all_percent {
        (
            CheckStatus::Warn,
            format!("{percent_sum:.2}% targeted, {:.2}% unallocated", 100.0 - percent_sum),
        )
    } else {
        (CheckStatus::Pass, format!("{percent_sum:.2}% targeted"))
    };
    checks.push(Check {
        name: "Class target sum",
        status,
        detail,
    });

    // 2. Every held class should have a target entry
    if allocation.missing_class_targets.is_empty() {
        checks.push(Check {
            name: "Class coverage",
            status: CheckStatus::Pass,
            detail: format!("{} classes targeted", allocation.classes.len()),
        });
    } else {
        let status = if config.fail_on_missing_class_target {
            CheckStatus::Fail
        } else {
            CheckStatus::Warn
        };
        for &class in &allocation.missing_class_targets {
            let held = allocation.class(class).map_or(0.0, |c| c.current_total);
            checks.push(Check {
                name: "Class coverage",
                status,
                detail: format!("{class} holds ${held:.2} but has no target; its assets are excluded"),
            });
        }
    }

    // 3. Fixed class amounts cannot exceed what the portfolio holds
    let fixed_sum: f64 = allocation
        .classes
        .iter()
        .filter(|c| c.target_kind == TargetKind::FixedAmount)
        .filter_map(|c| c.target_total)
        .sum();
    let fixed_status = if fixed_sum > allocation.total_value + MONEY_SLACK {
        CheckStatus::Warn
    } else {
        CheckStatus::Pass
    };
    checks.push(Check {
        name: "Fixed amounts",
        status: fixed_status,
        detail: format!(
            "${fixed_sum:.2} fixed {} ${:.2} portfolio",
            if fixed_status == CheckStatus::Pass {
                "<="
            } else {
                ">"
            },
            allocation.total_value,
        ),
    });

    // 4. Asset percentages within a class should fit the class percentage
    let mut asset_percent: FxHashMap<AssetClass, f64> = FxHashMap::default();
    for asset in assets {
        if let Some(p) = asset.target.percent() {
            *asset_percent.entry(asset.asset_class).or_insert(0.0) += p;
        }
    }
    let mut flagged = false;
    for class in AssetClass::ALL {
        let (Some(&assets_sum), Some(class_pct)) = (
            asset_percent.get(&class),
            class_targets.get(&class).and_then(|t| t.percent()),
        ) else {
            continue;
        };
        if assets_sum > class_pct + tol {
            flagged = true;
            checks.push(Check {
                name: "Asset target sum",
                status: CheckStatus::Warn,
                detail: format!(
                    "{class}: assets target {assets_sum:.2}% > class target {class_pct:.2}%"
                ),
            });
        }
    }
    if !flagged {
        checks.push(Check {
            name: "Asset target sum",
            status: CheckStatus::Pass,
            detail: "asset targets fit their class targets".into(),
        });
    }

    // 5. Informational: value not covered by any target
    let excluded: f64 = allocation
        .deltas
        .iter()
        .filter(|d| d.action == Action::Excluded)
        .map(|d| d.current_value)
        .sum();
    checks.push(Check {
        name: "Excluded value",
        status: CheckStatus::Pass,
        detail: format!(
            "${excluded:.2} ({:.1}%) excluded from rebalancing",
            percent_of(excluded, allocation.total_value)
        ),
    });

    CheckReport { checks }
}
