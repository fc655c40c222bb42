//! Action classifier: signed delta + target kind → recommended action.

use std::fmt;

use crate::target::TargetKind;
use crate::types::{AssetClass, Money};

/// Deltas within this many currency units of zero are treated as balanced.
///
/// Half of the smallest cent, so float noise from percentage math never
/// flips an asset between BUY and SELL.
pub const DEFAULT_HOLD_EPSILON: Money = 0.005;

/// Recommended action for an asset or class.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "SCREAMING_SNAKE_CASE"))]
pub enum Action {
    Buy,
    Sell,
    /// Cash below target: set more aside.
    Save,
    /// Cash above target: deploy the excess.
    Invest,
    Hold,
    Excluded,
}

impl Action {
    /// True if following the action changes the portfolio.
    #[inline]
    pub fn is_actionable(self) -> bool {
        !matches!(self, Action::Hold | Action::Excluded)
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Action::Buy => write!(f, "BUY"),
            Action::Sell => write!(f, "SELL"),
            Action::Save => write!(f, "SAVE"),
            Action::Invest => write!(f, "INVEST"),
            Action::Hold => write!(f, "HOLD"),
            Action::Excluded => write!(f, "EXCLUDED"),
        }
    }
}

/// Labels for the two directional outcomes.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct LabelSet {
    /// Used when the target exceeds the current value.
    pub underweight: Action,
    /// Used when the current value exceeds the target.
    pub overweight: Action,
}

impl LabelSet {
    pub const INVESTABLE: LabelSet = LabelSet {
        underweight: Action::Buy,
        overweight: Action::Sell,
    };

    pub const CASH: LabelSet = LabelSet {
        underweight: Action::Save,
        overweight: Action::Invest,
    };
}

/// Which label set each table uses.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Vocabulary {
    pub assets: LabelSet,
    pub classes: LabelSet,
    /// Cash-like assets and the cash class summary.
    pub cash: LabelSet,
}

impl Vocabulary {
    pub fn for_asset(&self, class: AssetClass) -> LabelSet {
        if class.is_cash_like() {
            self.cash
        } else {
            self.assets
        }
    }

    pub fn for_class(&self, class: AssetClass) -> LabelSet {
        if class.is_cash_like() {
            self.cash
        } else {
            self.classes
        }
    }
}

impl Default for Vocabulary {
    fn default() -> Self {
        Self {
            assets: LabelSet::INVESTABLE,
            classes: LabelSet::INVESTABLE,
            cash: LabelSet::CASH,
        }
    }
}

/// Classify a delta (`target - current`).
///
/// Decision order: off → `Excluded`; `|delta| <= epsilon` → `Hold`;
/// positive → underweight label; negative → overweight label.
/// A non-finite delta is never actionable and yields `Hold`.
pub fn classify(delta: Money, kind: TargetKind, labels: LabelSet, epsilon: Money) -> Action {
    if kind == TargetKind::Off {
        return Action::Excluded;
    }
    if !delta.is_finite() {
        return Action::Hold;
    }
    if delta > epsilon {
        labels.underweight
    } else if delta < -epsilon {
        labels.overweight
    } else {
        Action::Hold
    }
}
