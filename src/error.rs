//! Validation errors raised at the engine boundary.

use crate::target::TargetKind;
use crate::types::AssetClass;

/// Why a snapshot was rejected before any computation happened.
///
/// `subject` names the offending entity, e.g. `asset "vwce"` or `class bonds`.
#[derive(Clone, Debug, PartialEq, thiserror::Error)]
pub enum ValidationError {
    /// Asset id is empty or whitespace.
    #[error("asset id must not be empty")]
    EmptyId,

    /// Two assets share one id.
    #[error("duplicate asset id \"{0}\"")]
    DuplicateId(String),

    /// Two class-target entries for the same class.
    #[error("duplicate target for class {0}")]
    DuplicateClassTarget(AssetClass),

    #[error("{subject}: current value {value} is negative")]
    NegativeValue { subject: String, value: f64 },

    #[error("{subject}: {field} is not a finite number")]
    NonFinite {
        subject: String,
        field: &'static str,
    },

    #[error("{subject}: target percent {percent} is outside 0..=100")]
    PercentOutOfRange { subject: String, percent: f64 },

    #[error("{subject}: target value {value} is negative")]
    NegativeTarget { subject: String, value: f64 },

    #[error("{subject}: percentage mode requires targetPercent")]
    MissingTargetPercent { subject: String },

    #[error("{subject}: fixed-amount mode requires targetValue")]
    MissingTargetValue { subject: String },

    #[error("{subject}: targetPercent and targetValue are both set")]
    ConflictingTargets { subject: String },

    /// The payload field present does not belong to the declared mode.
    #[error("{subject}: {mode} mode does not take {field}")]
    UnexpectedTargetField {
        subject: String,
        mode: TargetKind,
        field: &'static str,
    },

    #[error("{subject}: mode is off but a target is set")]
    TargetWhileOff { subject: String },

    #[error("{subject}: unknown target mode '{mode}'")]
    UnknownTargetMode { subject: String, mode: String },
}

/// Subject label for an asset.
pub(crate) fn asset_subject(id: &str) -> String {
    format!("asset \"{id}\"")
}

/// Subject label for a class target.
pub(crate) fn class_subject(class: AssetClass) -> String {
    format!("class {class}")
}
