//! Allocation engine: (assets, class targets) → deltas, class summaries, total.
//!
//! Pure and deterministic. Every call validates the whole snapshot first and
//! then builds a fresh [`Allocation`]; nothing is cached between calls.

use rustc_hash::{FxHashMap, FxHashSet};

use crate::action::{self, Action, DEFAULT_HOLD_EPSILON, Vocabulary};
use crate::asset::Asset;
use crate::error::{ValidationError, class_subject};
use crate::target::{ClassTarget, TargetKind};
use crate::types::{AssetClass, AssetId, Money, Percent};

/// Class targets keyed by asset class.
pub type ClassTargets = FxHashMap<AssetClass, ClassTarget>;

/// Tunables for one computation.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct EngineOptions {
    /// Deltas with `|delta| <= hold_epsilon` are classified `Hold`.
    pub hold_epsilon: Money,
    pub vocabulary: Vocabulary,
}

impl Default for EngineOptions {
    fn default() -> Self {
        Self {
            hold_epsilon: DEFAULT_HOLD_EPSILON,
            vocabulary: Vocabulary::default(),
        }
    }
}

/// Per-asset result.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "camelCase"))]
pub struct AllocationDelta {
    pub asset_id: AssetId,
    pub asset_class: AssetClass,
    pub current_value: Money,
    /// Share of the portfolio total.
    pub current_percent: Percent,
    /// Share of the asset's class total.
    pub current_percent_in_class: Percent,
    /// The asset's own target mode.
    pub target_kind: TargetKind,
    /// `None` for off-mode assets and assets whose class has no target.
    pub target_value: Option<Money>,
    /// `target_value - current_value`, or 0 without a target.
    pub delta: Money,
    pub action: Action,
}

/// Per-class result.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "camelCase"))]
pub struct ClassSummary {
    pub asset_class: AssetClass,
    /// `Off` when the class has no target entry.
    pub target_kind: TargetKind,
    pub target_percent: Option<Percent>,
    pub current_percent: Percent,
    pub current_total: Money,
    pub target_total: Option<Money>,
    pub delta: Money,
    pub action: Action,
    pub asset_count: usize,
}

/// Full engine output.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "camelCase"))]
pub struct Allocation {
    pub total_value: Money,
    /// One entry per class holding at least one asset, in canonical class order.
    pub classes: Vec<ClassSummary>,
    /// One entry per asset, in input order.
    pub deltas: Vec<AllocationDelta>,
    /// Classes held by some asset but absent from the class-target map.
    /// Their assets and summaries are reported as `Excluded`.
    pub missing_class_targets: Vec<AssetClass>,
}

impl Allocation {
    pub fn delta_for(&self, id: &AssetId) -> Option<&AllocationDelta> {
        self.deltas.iter().find(|d| &d.asset_id == id)
    }

    pub fn class(&self, class: AssetClass) -> Option<&ClassSummary> {
        self.classes.iter().find(|c| c.asset_class == class)
    }

    /// True when no asset and no class needs action.
    pub fn is_balanced(&self) -> bool {
        self.deltas.iter().all(|d| !d.action.is_actionable())
            && self.classes.iter().all(|c| !c.action.is_actionable())
    }

    /// True if any class-target entry was missing.
    pub fn has_configuration_issues(&self) -> bool {
        !self.missing_class_targets.is_empty()
    }
}

/// `part / whole * 100`, or 0 when `whole` is not positive.
#[inline]
pub fn percent_of(part: Money, whole: Money) -> Percent {
    if whole > 0.0 {
        part / whole * 100.0
    } else {
        0.0
    }
}

/// Validate the whole snapshot. The first failure aborts.
pub fn validate(assets: &[Asset], class_targets: &ClassTargets) -> Result<(), ValidationError> {
    let mut seen: FxHashSet<&str> = FxHashSet::default();
    for asset in assets {
        asset.validate()?;
        if !seen.insert(asset.id.as_str()) {
            return Err(ValidationError::DuplicateId(asset.id.to_string()));
        }
    }
    let total: Money = assets.iter().map(|a| a.current_value).sum();
    if !total.is_finite() {
        return Err(ValidationError::NonFinite {
            subject: "portfolio".into(),
            field: "total value",
        });
    }
    for (class, target) in class_targets {
        target.validate(&class_subject(*class))?;
    }
    Ok(())
}

/// Compute the allocation for a snapshot.
///
/// Class totals are built first, then class summaries, then per-asset
/// deltas. Percentage-mode asset targets are anchored at the portfolio
/// total. An asset whose class has no entry in `class_targets` gets no
/// target and is `Excluded`, whatever its own mode.
pub fn compute(
    assets: &[Asset],
    class_targets: &ClassTargets,
    options: &EngineOptions,
) -> Result<Allocation, ValidationError> {
    validate(assets, class_targets)?;

    let total_value: Money = assets.iter().map(|a| a.current_value).sum();

    // 1. Per-class totals
    let mut totals: FxHashMap<AssetClass, (Money, usize)> = FxHashMap::default();
    for asset in assets {
        let entry = totals.entry(asset.asset_class).or_insert((0.0, 0));
        entry.0 += asset.current_value;
        entry.1 += 1;
    }

    // 2. Class summaries, canonical order
    let mut classes = Vec::with_capacity(totals.len());
    let mut missing_class_targets = Vec::new();
    for class in AssetClass::ALL {
        let Some(&(current_total, asset_count)) = totals.get(&class) else {
            continue;
        };
        let target = match class_targets.get(&class) {
            Some(t) => *t,
            None => {
                missing_class_targets.push(class);
                ClassTarget::Off
            }
        };
        let target_total = target.resolve(total_value, current_total);
        let delta = target_total.map_or(0.0, |t| t - current_total);
        classes.push(ClassSummary {
            asset_class: class,
            target_kind: target.kind(),
            target_percent: target.percent(),
            current_percent: percent_of(current_total, total_value),
            current_total,
            target_total,
            delta,
            action: action::classify(
                delta,
                target.kind(),
                options.vocabulary.for_class(class),
                options.hold_epsilon,
            ),
            asset_count,
        });
    }

    // 3. Per-asset deltas, input order
    let deltas = assets
        .iter()
        .map(|asset| {
            let class_total = totals.get(&asset.asset_class).map_or(0.0, |t| t.0);
            let class_known = class_targets.contains_key(&asset.asset_class);
            let kind = asset.target.kind();
            let target_value = if class_known {
                asset.target.resolve(total_value)
            } else {
                None
            };
            let delta = target_value.map_or(0.0, |t| t - asset.current_value);
            let effective_kind = if class_known { kind } else { TargetKind::Off };
            AllocationDelta {
                asset_id: asset.id.clone(),
                asset_class: asset.asset_class,
                current_value: asset.current_value,
                current_percent: percent_of(asset.current_value, total_value),
                current_percent_in_class: percent_of(asset.current_value, class_total),
                target_kind: kind,
                target_value,
                delta,
                action: action::classify(
                    delta,
                    effective_kind,
                    options.vocabulary.for_asset(asset.asset_class),
                    options.hold_epsilon,
                ),
            }
        })
        .collect();

    Ok(Allocation {
        total_value,
        classes,
        deltas,
        missing_class_targets,
    })
}
