//! # fireplan
//!
//! A deterministic asset-allocation engine for FIRE planning.
//!
//! Given a snapshot of held assets and per-class targets, it computes how far
//! each asset and each asset class is from its target and recommends an
//! action that would close the gap.
//!
//! ## Features
//!
//! - **Two aggregation levels**: asset → asset class → portfolio total
//! - **Three target modes**: percentage of total, fixed amount, or off
//! - **Directional actions**: BUY/SELL for investable assets, SAVE/INVEST for cash
//! - **Pure**: no I/O, no shared state; identical inputs give identical outputs
//!
//! ## Quick Start
//!
//! ```
//! use fireplan::{Action, Asset, AssetClass, ClassTarget, ClassTargets, EngineOptions, TargetMode};
//!
//! let assets = vec![
//!     Asset::new("vti", AssetClass::Stocks, 14_000.0).with_target(TargetMode::Percentage(40.0)),
//!     Asset::new("bnd", AssetClass::Bonds, 9_450.0).with_target(TargetMode::Percentage(27.0)),
//! ];
//! let mut targets = ClassTargets::default();
//! targets.insert(AssetClass::Stocks, ClassTarget::Percentage(60.0));
//! targets.insert(AssetClass::Bonds, ClassTarget::Percentage(40.0));
//!
//! let allocation = fireplan::compute(&assets, &targets, &EngineOptions::default()).unwrap();
//!
//! assert_eq!(allocation.total_value, 23_450.0);
//! let vti = &allocation.deltas[0];
//! assert_eq!(vti.target_value, Some(9_380.0));
//! assert_eq!(vti.delta, -4_620.0);
//! assert_eq!(vti.action, Action::Sell);
//! ```
//!
//! ## Target Modes
//!
//! | Mode | Asset target | Class target |
//! |------|--------------|--------------|
//! | **Percentage** | `total × percent / 100` | `total × percent / 100` |
//! | **FixedAmount** | the literal amount | the literal amount, or the current total if unset |
//! | **Off** | none, action `EXCLUDED` | none, action `EXCLUDED` |
//!
//! An asset whose class has no entry in the class-target map is treated as
//! off and its class is listed in [`Allocation::missing_class_targets`].
//!
//! ## Degenerate Portfolios
//!
//! An empty or zero-value portfolio is not an error: every percentage is 0.
//!
//! ```
//! use fireplan::{ClassTargets, EngineOptions};
//!
//! let allocation = fireplan::compute(&[], &ClassTargets::default(), &EngineOptions::default()).unwrap();
//! assert_eq!(allocation.total_value, 0.0);
//! assert!(allocation.deltas.is_empty());
//! assert!(allocation.classes.is_empty());
//! ```

pub mod action;
pub mod asset;
pub mod engine;
pub mod error;
pub mod record;
pub mod target;
pub mod types;

pub use action::{Action, DEFAULT_HOLD_EPSILON, LabelSet, Vocabulary, classify};
pub use asset::Asset;
pub use engine::{
    Allocation, AllocationDelta, ClassSummary, ClassTargets, EngineOptions, compute, percent_of,
};
pub use error::ValidationError;
pub use record::{AssetRecord, ClassTargetRecord};
pub use target::{ClassTarget, TargetKind, TargetMode};
pub use types::{AssetClass, AssetId, Money, Percent};
