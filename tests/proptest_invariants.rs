//! Property-based tests for allocation invariants.
//!
//! These tests use proptest to verify that the engine's reconciliation and
//! classification guarantees hold across randomly generated snapshots.

use fireplan::{
    Action, Asset, AssetClass, ClassTarget, ClassTargets, EngineOptions, TargetMode, compute,
};
use proptest::prelude::*;

/// Generate an asset class
fn class_strategy() -> impl Strategy<Value = AssetClass> {
    prop_oneof![
        Just(AssetClass::Stocks),
        Just(AssetClass::Bonds),
        Just(AssetClass::Cash),
        Just(AssetClass::Crypto),
        Just(AssetClass::RealEstate),
    ]
}

/// Generate a non-negative current value (whole cents)
fn value_strategy() -> impl Strategy<Value = f64> {
    (0u64..=100_000_000u64).prop_map(|cents| cents as f64 / 100.0)
}

/// Generate an asset target
fn target_strategy() -> impl Strategy<Value = TargetMode> {
    prop_oneof![
        (0u32..=100u32).prop_map(|p| TargetMode::Percentage(p as f64)),
        value_strategy().prop_map(TargetMode::FixedAmount),
        Just(TargetMode::Off),
    ]
}

/// Generate a class target (None = missing entry)
fn class_target_strategy() -> impl Strategy<Value = Option<ClassTarget>> {
    prop_oneof![
        (0u32..=100u32).prop_map(|p| Some(ClassTarget::Percentage(p as f64))),
        prop::option::of(value_strategy()).prop_map(|v| Some(ClassTarget::FixedAmount(v))),
        Just(Some(ClassTarget::Off)),
        Just(None),
    ]
}

fn assets_strategy() -> impl Strategy<Value = Vec<Asset>> {
    prop::collection::vec((class_strategy(), value_strategy(), target_strategy()), 0..40)
        .prop_map(|rows| {
            rows.into_iter()
                .enumerate()
                .map(|(i, (class, value, target))| {
                    Asset::new(format!("A{i:03}"), class, value).with_target(target)
                })
                .collect()
        })
}

fn class_targets_strategy() -> impl Strategy<Value = ClassTargets> {
    prop::collection::vec(class_target_strategy(), 5).prop_map(|targets| {
        AssetClass::ALL
            .into_iter()
            .zip(targets)
            .filter_map(|(class, t)| t.map(|t| (class, t)))
            .collect()
    })
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(500))]

    // ========================================================================
    // RECONCILIATION INVARIANTS
    // ========================================================================

    /// Per-asset current values sum to the portfolio total
    #[test]
    fn asset_values_sum_to_total(
        assets in assets_strategy(),
        targets in class_targets_strategy(),
    ) {
        let alloc = compute(&assets, &targets, &EngineOptions::default()).unwrap();
        let sum: f64 = alloc.deltas.iter().map(|d| d.current_value).sum();
        prop_assert!((sum - alloc.total_value).abs() <= 1e-6 * alloc.total_value.max(1.0));
        prop_assert_eq!(alloc.deltas.len(), assets.len());
    }

    /// Class percentages sum to 100, or are all zero on an empty portfolio
    #[test]
    fn class_percents_sum_to_hundred(
        assets in assets_strategy(),
        targets in class_targets_strategy(),
    ) {
        let alloc = compute(&assets, &targets, &EngineOptions::default()).unwrap();
        let sum: f64 = alloc.classes.iter().map(|c| c.current_percent).sum();
        if alloc.total_value > 0.0 {
            prop_assert!((sum - 100.0).abs() < 1e-6, "class percents sum to {}", sum);
        } else {
            prop_assert!(alloc.classes.iter().all(|c| c.current_percent == 0.0));
            prop_assert!(alloc.deltas.iter().all(|d| d.current_percent == 0.0));
        }
    }

    /// Class totals reconcile to the portfolio total
    #[test]
    fn class_totals_sum_to_total(
        assets in assets_strategy(),
        targets in class_targets_strategy(),
    ) {
        let alloc = compute(&assets, &targets, &EngineOptions::default()).unwrap();
        let sum: f64 = alloc.classes.iter().map(|c| c.current_total).sum();
        prop_assert!((sum - alloc.total_value).abs() <= 1e-6 * alloc.total_value.max(1.0));
        let count: usize = alloc.classes.iter().map(|c| c.asset_count).sum();
        prop_assert_eq!(count, assets.len());
    }

    // ========================================================================
    // CLASSIFICATION INVARIANTS
    // ========================================================================

    /// Off-mode assets are always excluded and carry no target
    #[test]
    fn off_assets_excluded(
        assets in assets_strategy(),
        targets in class_targets_strategy(),
    ) {
        let alloc = compute(&assets, &targets, &EngineOptions::default()).unwrap();
        for (asset, d) in assets.iter().zip(&alloc.deltas) {
            if asset.target == TargetMode::Off {
                prop_assert_eq!(d.action, Action::Excluded);
                prop_assert_eq!(d.target_value, None);
                prop_assert_eq!(d.delta, 0.0);
            }
        }
    }

    /// Assets of a class without a target entry are excluded
    #[test]
    fn missing_class_target_excludes(
        assets in assets_strategy(),
        targets in class_targets_strategy(),
    ) {
        let alloc = compute(&assets, &targets, &EngineOptions::default()).unwrap();
        for d in &alloc.deltas {
            if !targets.contains_key(&d.asset_class) {
                prop_assert_eq!(d.action, Action::Excluded);
                prop_assert!(alloc.missing_class_targets.contains(&d.asset_class));
            }
        }
    }

    /// Action direction agrees with the delta sign
    #[test]
    fn action_matches_delta_sign(
        assets in assets_strategy(),
        targets in class_targets_strategy(),
    ) {
        let opts = EngineOptions::default();
        let alloc = compute(&assets, &targets, &opts).unwrap();
        for d in &alloc.deltas {
            match d.action {
                Action::Buy | Action::Save => prop_assert!(d.delta > opts.hold_epsilon),
                Action::Sell | Action::Invest => prop_assert!(d.delta < -opts.hold_epsilon),
                Action::Hold => prop_assert!(d.delta.abs() <= opts.hold_epsilon),
                Action::Excluded => prop_assert!(d.target_value.is_none()),
            }
        }
    }

    /// Raising a percentage-mode asset's value never raises its delta
    #[test]
    fn percentage_delta_non_increasing_in_value(
        others in assets_strategy(),
        percent in 0u32..=100u32,
        base in value_strategy(),
        bump in 1u64..=10_000_000u64,
    ) {
        let mut targets = ClassTargets::default();
        targets.insert(AssetClass::Stocks, ClassTarget::Percentage(50.0));
        for class in AssetClass::ALL {
            targets.entry(class).or_insert(ClassTarget::Off);
        }

        let build = |value: f64| {
            let mut assets = vec![
                Asset::new("subject", AssetClass::Stocks, value)
                    .with_target(TargetMode::Percentage(percent as f64)),
            ];
            assets.extend(others.iter().cloned());
            assets
        };

        let low = compute(&build(base), &targets, &EngineOptions::default()).unwrap();
        let high = compute(&build(base + bump as f64 / 100.0), &targets, &EngineOptions::default()).unwrap();
        prop_assert!(high.deltas[0].delta <= low.deltas[0].delta + 1e-6);
    }

    // ========================================================================
    // DETERMINISM
    // ========================================================================

    /// Two computations over the same snapshot are identical
    #[test]
    fn idempotent(
        assets in assets_strategy(),
        targets in class_targets_strategy(),
    ) {
        let a = compute(&assets, &targets, &EngineOptions::default()).unwrap();
        let b = compute(&assets, &targets, &EngineOptions::default()).unwrap();
        prop_assert_eq!(a, b);
    }
}
