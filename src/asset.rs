//! A held position: identity, class, current value and its own target.

use crate::error::{ValidationError, asset_subject};
use crate::target::TargetMode;
use crate::types::{AssetClass, AssetId, Money};

/// A single held asset.
///
/// Construct with [`Asset::new`] and refine with the `with_*` builders, or
/// convert from an [`AssetRecord`](crate::record::AssetRecord).
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "camelCase"))]
pub struct Asset {
    pub id: AssetId,
    pub name: String,
    pub ticker: String,
    /// Optional external identifier (ISIN, WKN, ...).
    pub identifier: Option<String>,
    pub asset_class: AssetClass,
    /// Current market value in currency units. Never negative.
    pub current_value: Money,
    pub target: TargetMode,
}

impl Asset {
    /// New asset with no target (mode off). Name and ticker default to the id.
    pub fn new(id: impl Into<AssetId>, asset_class: AssetClass, current_value: Money) -> Self {
        let id = id.into();
        Self {
            name: id.as_str().to_string(),
            ticker: id.as_str().to_uppercase(),
            id,
            identifier: None,
            asset_class,
            current_value,
            target: TargetMode::Off,
        }
    }

    pub fn with_target(mut self, target: TargetMode) -> Self {
        self.target = target;
        self
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    pub fn with_ticker(mut self, ticker: impl Into<String>) -> Self {
        self.ticker = ticker.into();
        self
    }

    pub fn with_identifier(mut self, identifier: impl Into<String>) -> Self {
        self.identifier = Some(identifier.into());
        self
    }

    /// Check the boundary invariants: non-empty id, finite non-negative
    /// value, and a target payload consistent with its mode.
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.id.is_empty() {
            return Err(ValidationError::EmptyId);
        }
        let subject = asset_subject(self.id.as_str());
        if !self.current_value.is_finite() {
            return Err(ValidationError::NonFinite {
                subject,
                field: "currentValue",
            });
        }
        if self.current_value < 0.0 {
            return Err(ValidationError::NegativeValue {
                subject,
                value: self.current_value,
            });
        }
        self.target.validate(&subject)
    }
}
