//! JSONL audit trail logging.
//!
//! Each planning run appends events to an audit.jsonl file,
//! one JSON object per line.

use std::fs::{self, OpenOptions};
use std::io::{BufWriter, Write};
use std::path::Path;

use chrono::{DateTime, Utc};
use fireplan::Allocation;
use serde::Serialize;

use crate::checks::CheckReport;
use crate::error::Result;
use crate::snapshot::Snapshot;

/// An audit event written to the JSONL trail.
#[derive(Debug, Clone, Serialize)]
pub struct AuditEvent {
    pub event: &'static str,
    pub ts: DateTime<Utc>,
    #[serde(flatten)]
    pub data: serde_json::Value,
}

/// Append-only audit logger.
pub struct AuditLog {
    writer: BufWriter<std::fs::File>,
}

impl AuditLog {
    /// Open (or create) the audit log file for appending.
    pub fn open(path: &Path) -> Result<Self> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }

        let file = OpenOptions::new().create(true).append(true).open(path)?;

        Ok(Self {
            writer: BufWriter::new(file),
        })
    }

    /// Log an event with arbitrary JSON data.
    pub fn log(&mut self, event: &'static str, data: serde_json::Value) -> Result<()> {
        let entry = AuditEvent {
            event,
            ts: Utc::now(),
            data,
        };
        let json = serde_json::to_string(&entry)
            .map_err(|e| std::io::Error::new(std::io::ErrorKind::InvalidData, e))?;
        writeln!(self.writer, "{json}")?;
        self.writer.flush()?;
        Ok(())
    }

    /// Log a simple event with no additional data.
    pub fn log_simple(&mut self, event: &'static str) -> Result<()> {
        self.log(event, serde_json::json!({}))
    }
}

pub fn log_run_started(audit: &mut AuditLog, command: &str, source: &str) -> Result<()> {
    audit.log(
        "run_started",
        serde_json::json!({
            "command": command,
            "source": source,
        }),
    )
}

pub fn log_snapshot(audit: &mut AuditLog, snapshot: &Snapshot) -> Result<()> {
    audit.log(
        "snapshot_loaded",
        serde_json::json!({
            "as_of": snapshot.as_of,
            "assets": snapshot.assets.len(),
            "class_targets": snapshot.class_targets.len(),
        }),
    )
}

pub fn log_validation_failed(audit: &mut AuditLog, reason: &str) -> Result<()> {
    audit.log("validation_failed", serde_json::json!({ "reason": reason }))
}

/// Log the computed allocation: totals per class and the actionable assets.
pub fn log_allocation(audit: &mut AuditLog, allocation: &Allocation) -> Result<()> {
    let class_data: Vec<_> = allocation
        .classes
        .iter()
        .map(|c| {
            serde_json::json!({
                "class": c.asset_class.as_str(),
                "current": c.current_total,
                "target": c.target_total,
                "delta": c.delta,
                "action": c.action.to_string(),
            })
        })
        .collect();
    let action_data: Vec<_> = allocation
        .deltas
        .iter()
        .filter(|d| d.action.is_actionable())
        .map(|d| {
            serde_json::json!({
                "asset": d.asset_id.as_str(),
                "action": d.action.to_string(),
                "delta": d.delta,
            })
        })
        .collect();

    audit.log(
        "allocation_computed",
        serde_json::json!({
            "total": allocation.total_value,
            "classes": class_data,
            "actions": action_data,
            "missing_class_targets": allocation
                .missing_class_targets
                .iter()
                .map(|c| c.as_str())
                .collect::<Vec<_>>(),
        }),
    )
}

pub fn log_checks(audit: &mut AuditLog, report: &CheckReport) -> Result<()> {
    let check_data: Vec<_> = report
        .checks
        .iter()
        .map(|c| {
            serde_json::json!({
                "name": c.name,
                "status": c.status.to_string(),
                "detail": c.detail,
            })
        })
        .collect();

    audit.log(
        "checks",
        serde_json::json!({
            "passed": !report.has_failures(),
            "checks": check_data,
        }),
    )
}

pub fn log_run_completed(audit: &mut AuditLog, actionable: usize, excluded: usize) -> Result<()> {
    audit.log(
        "run_completed",
        serde_json::json!({
            "actionable": actionable,
            "excluded": excluded,
        }),
    )
}
