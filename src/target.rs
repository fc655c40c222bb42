//! Target modes: how an asset's or a class's desired allocation is expressed.
//!
//! Each variant carries exactly the payload it needs, so "percentage without
//! a percent" cannot be represented once a record has been validated.

use std::fmt;
use std::str::FromStr;

use crate::error::ValidationError;
use crate::types::{Money, Percent};

/// Payload-free discriminant of a target, reported in engine output and
/// used by the action classifier.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "kebab-case"))]
pub enum TargetKind {
    Percentage,
    FixedAmount,
    Off,
}

impl TargetKind {
    pub fn as_str(self) -> &'static str {
        match self {
            TargetKind::Percentage => "percentage",
            TargetKind::FixedAmount => "fixed-amount",
            TargetKind::Off => "off",
        }
    }
}

impl fmt::Display for TargetKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TargetKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "percentage" | "percent" => Ok(TargetKind::Percentage),
            "fixed-amount" | "fixed_amount" | "fixedamount" | "fixed" => {
                Ok(TargetKind::FixedAmount)
            }
            "off" => Ok(TargetKind::Off),
            other => Err(other.to_string()),
        }
    }
}

/// Target of a single asset.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(
    feature = "serde",
    serde(tag = "mode", content = "value", rename_all = "kebab-case")
)]
pub enum TargetMode {
    /// Share of the whole portfolio, 0..=100.
    Percentage(Percent),
    /// Absolute amount in currency units.
    FixedAmount(Money),
    /// Excluded from rebalancing.
    Off,
}

impl TargetMode {
    #[inline]
    pub fn kind(&self) -> TargetKind {
        match self {
            TargetMode::Percentage(_) => TargetKind::Percentage,
            TargetMode::FixedAmount(_) => TargetKind::FixedAmount,
            TargetMode::Off => TargetKind::Off,
        }
    }

    /// Target percent, if this is a percentage target.
    pub fn percent(&self) -> Option<Percent> {
        match *self {
            TargetMode::Percentage(p) => Some(p),
            _ => None,
        }
    }

    /// Resolve to an absolute target value.
    ///
    /// Percentage targets are anchored at the portfolio total regardless of
    /// how the asset's class is targeted.
    pub fn resolve(&self, portfolio_total: Money) -> Option<Money> {
        match *self {
            TargetMode::Percentage(p) => Some(share_of(portfolio_total, p)),
            TargetMode::FixedAmount(v) => Some(v),
            TargetMode::Off => None,
        }
    }

    pub(crate) fn validate(&self, subject: &str) -> Result<(), ValidationError> {
        match *self {
            TargetMode::Percentage(p) => check_percent(subject, p),
            TargetMode::FixedAmount(v) => check_amount(subject, v),
            TargetMode::Off => Ok(()),
        }
    }
}

/// Target of an asset class, set independently of its assets' targets.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(
    feature = "serde",
    serde(tag = "mode", content = "value", rename_all = "kebab-case")
)]
pub enum ClassTarget {
    /// Share of the whole portfolio, 0..=100.
    Percentage(Percent),
    /// Absolute amount. `None` holds the class at its current total, so no
    /// drift is ever signalled for it.
    FixedAmount(Option<Money>),
    /// Excluded from rebalancing.
    Off,
}

impl ClassTarget {
    #[inline]
    pub fn kind(&self) -> TargetKind {
        match self {
            ClassTarget::Percentage(_) => TargetKind::Percentage,
            ClassTarget::FixedAmount(_) => TargetKind::FixedAmount,
            ClassTarget::Off => TargetKind::Off,
        }
    }

    pub fn percent(&self) -> Option<Percent> {
        match *self {
            ClassTarget::Percentage(p) => Some(p),
            _ => None,
        }
    }

    /// Resolve the class's target total.
    pub fn resolve(&self, portfolio_total: Money, current_total: Money) -> Option<Money> {
        match *self {
            ClassTarget::Percentage(p) => Some(share_of(portfolio_total, p)),
            ClassTarget::FixedAmount(v) => Some(v.unwrap_or(current_total)),
            ClassTarget::Off => None,
        }
    }

    pub(crate) fn validate(&self, subject: &str) -> Result<(), ValidationError> {
        match *self {
            ClassTarget::Percentage(p) => check_percent(subject, p),
            ClassTarget::FixedAmount(Some(v)) => check_amount(subject, v),
            ClassTarget::FixedAmount(None) | ClassTarget::Off => Ok(()),
        }
    }
}

fn check_percent(subject: &str, percent: f64) -> Result<(), ValidationError> {
    if !percent.is_finite() {
        return Err(ValidationError::NonFinite {
            subject: subject.to_string(),
            field: "targetPercent",
        });
    }
    if !(0.0..=100.0).contains(&percent) {
        return Err(ValidationError::PercentOutOfRange {
            subject: subject.to_string(),
            percent,
        });
    }
    Ok(())
}

fn check_amount(subject: &str, value: f64) -> Result<(), ValidationError> {
    if !value.is_finite() {
        return Err(ValidationError::NonFinite {
            subject: subject.to_string(),
            field: "targetValue",
        });
    }
    if value < 0.0 {
        return Err(ValidationError::NegativeTarget {
            subject: subject.to_string(),
            value,
        });
    }
    Ok(())
}

/// `total * percent / 100`. Scales the percent first only when the plain
/// product would overflow.
fn share_of(total: Money, percent: Percent) -> Money {
    let product = total * percent;
    if product.is_finite() {
        product / 100.0
    } else {
        total * (percent / 100.0)
    }
}
