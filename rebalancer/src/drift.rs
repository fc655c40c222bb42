//! Class drift: how far each class's share has wandered from its target share.

use fireplan::{Allocation, AssetClass, percent_of};
use serde::Serialize;

/// Drift report across all targeted classes.
#[derive(Debug, Clone, Serialize)]
pub struct DriftReport {
    pub entries: Vec<DriftEntry>,
    /// Root-mean-square of class drifts, in percentage points.
    pub tracking_error_pct: f64,
    pub band_pct: f64,
}

/// One class's drift entry.
#[derive(Debug, Clone, Serialize)]
pub struct DriftEntry {
    pub asset_class: AssetClass,
    pub target_percent: f64,
    pub current_percent: f64,
    /// `current - target`, percentage points.
    pub drift_pct: f64,
    pub outside_band: bool,
}

impl DriftReport {
    /// True if any class drifted beyond the band.
    pub fn needs_rebalance(&self) -> bool {
        self.entries.iter().any(|e| e.outside_band)
    }
}

/// Compare each class's current share against its resolved target share.
///
/// Classes without a resolvable target (off or missing) are skipped.
pub fn drift(allocation: &Allocation, band_pct: f64) -> DriftReport {
    let total = allocation.total_value;
    let mut entries = Vec::new();
    let mut sum_sq = 0.0_f64;

    for class in &allocation.classes {
        let Some(target_total) = class.target_total else {
            continue;
        };
        let target_percent = percent_of(target_total, total);
        let drift_pct = class.current_percent - target_percent;
        sum_sq += drift_pct * drift_pct;
        entries.push(DriftEntry {
            asset_class: class.asset_class,
            target_percent,
            current_percent: class.current_percent,
            drift_pct,
            outside_band: drift_pct.abs() > band_pct,
        });
    }

    let tracking_error_pct = (sum_sq / entries.len().max(1) as f64).sqrt();

    DriftReport {
        entries,
        tracking_error_pct,
        band_pct,
    }
}

impl std::fmt::Display for DriftReport {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "CLASS DRIFT (band ±{:.1}%):", self.band_pct)?;
        writeln!(
            f,
            "  {:12} {:>10} {:>10} {:>10}",
            "Class", "Target%", "Actual%", "Drift%"
        )?;
        for e in &self.entries {
            writeln!(
                f,
                "  {:12} {:>9.2}% {:>9.2}% {:>+9.2}%{}",
                e.asset_class.as_str(),
                e.target_percent,
                e.current_percent,
                e.drift_pct,
                if e.outside_band { "  !" } else { "" },
            )?;
        }
        writeln!(f, "\n  Tracking error: {:.3}%", self.tracking_error_pct)?;
        Ok(())
    }
}
