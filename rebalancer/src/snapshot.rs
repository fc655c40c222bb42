//! Positions/targets snapshot and the repositories that supply it.

use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use fireplan::{Asset, AssetRecord, ClassTargetRecord, ClassTargets, ValidationError};
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// One consistent view of holdings and class targets, as stored.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Snapshot {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub as_of: Option<DateTime<Utc>>,
    #[serde(default)]
    pub assets: Vec<AssetRecord>,
    #[serde(default)]
    pub class_targets: Vec<ClassTargetRecord>,
}

/// Validated engine inputs.
#[derive(Debug, Clone)]
pub struct Inputs {
    pub assets: Vec<Asset>,
    pub class_targets: ClassTargets,
}

impl Snapshot {
    /// Parse from a JSON string.
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Convert records into engine inputs. The first invalid record aborts.
    pub fn into_inputs(self) -> Result<Inputs> {
        let assets = self
            .assets
            .into_iter()
            .map(Asset::try_from)
            .collect::<std::result::Result<Vec<_>, _>>()?;

        let mut class_targets = ClassTargets::default();
        for record in self.class_targets {
            let (class, target) = record.into_target()?;
            if class_targets.insert(class, target).is_some() {
                return Err(ValidationError::DuplicateClassTarget(class).into());
            }
        }

        Ok(Inputs {
            assets,
            class_targets,
        })
    }
}

/// Source of snapshots. Implementations must hand out an internally
/// consistent snapshot per call.
pub trait SnapshotRepository {
    fn load(&self) -> Result<Snapshot>;

    /// Human-readable origin, for logs and the audit trail.
    fn describe(&self) -> String;
}

/// Snapshot stored as a single JSON file.
#[derive(Debug, Clone)]
pub struct JsonFileRepository {
    path: PathBuf,
}

impl JsonFileRepository {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl SnapshotRepository for JsonFileRepository {
    fn load(&self) -> Result<Snapshot> {
        let contents = std::fs::read_to_string(&self.path).map_err(|e| Error::SnapshotRead {
            path: self.path.clone(),
            source: e,
        })?;
        if contents.trim().is_empty() {
            return Err(Error::Snapshot(format!(
                "{} is empty",
                self.path.display()
            )));
        }
        Snapshot::from_json(&contents)
    }

    fn describe(&self) -> String {
        self.path.display().to_string()
    }
}

/// Snapshot held in memory, for embedding and tests.
#[derive(Debug, Clone, Default)]
pub struct InMemoryRepository {
    snapshot: Snapshot,
}

impl InMemoryRepository {
    pub fn new(snapshot: Snapshot) -> Self {
        Self { snapshot }
    }
}

impl SnapshotRepository for InMemoryRepository {
    fn load(&self) -> Result<Snapshot> {
        Ok(self.snapshot.clone())
    }

    fn describe(&self) -> String {
        "<memory>".into()
    }
}
