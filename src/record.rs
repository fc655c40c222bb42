//! Boundary records: the mode-tag-plus-optional-fields shape handed over by
//! storage, converted into the validated sum types.

use crate::asset::Asset;
use crate::error::{ValidationError, asset_subject, class_subject};
use crate::target::{ClassTarget, TargetKind, TargetMode};
use crate::types::{AssetClass, AssetId, Money, Percent};

/// An asset as stored: `target_mode` is a tag and the payload fields are
/// optional.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "camelCase"))]
pub struct AssetRecord {
    pub id: String,
    #[cfg_attr(feature = "serde", serde(default))]
    pub name: String,
    #[cfg_attr(feature = "serde", serde(default))]
    pub ticker: String,
    #[cfg_attr(
        feature = "serde",
        serde(default, skip_serializing_if = "Option::is_none")
    )]
    pub identifier: Option<String>,
    pub asset_class: AssetClass,
    pub current_value: Money,
    pub target_mode: String,
    #[cfg_attr(
        feature = "serde",
        serde(default, skip_serializing_if = "Option::is_none")
    )]
    pub target_percent: Option<Percent>,
    #[cfg_attr(
        feature = "serde",
        serde(default, skip_serializing_if = "Option::is_none")
    )]
    pub target_value: Option<Money>,
}

/// A class target as stored.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "camelCase"))]
pub struct ClassTargetRecord {
    pub asset_class: AssetClass,
    pub target_mode: String,
    #[cfg_attr(
        feature = "serde",
        serde(default, skip_serializing_if = "Option::is_none")
    )]
    pub target_percent: Option<Percent>,
    #[cfg_attr(
        feature = "serde",
        serde(default, skip_serializing_if = "Option::is_none")
    )]
    pub target_value: Option<Money>,
}

fn parse_kind(subject: &str, mode: &str) -> Result<TargetKind, ValidationError> {
    mode.parse().map_err(|_| ValidationError::UnknownTargetMode {
        subject: subject.to_string(),
        mode: mode.to_string(),
    })
}

impl TryFrom<AssetRecord> for Asset {
    type Error = ValidationError;

    fn try_from(r: AssetRecord) -> Result<Self, Self::Error> {
        if r.id.trim().is_empty() {
            return Err(ValidationError::EmptyId);
        }
        let subject = asset_subject(&r.id);
        let kind = parse_kind(&subject, &r.target_mode)?;

        let target = match (kind, r.target_percent, r.target_value) {
            (_, Some(_), Some(_)) => {
                return Err(ValidationError::ConflictingTargets { subject });
            }
            (TargetKind::Percentage, Some(p), None) => TargetMode::Percentage(p),
            (TargetKind::Percentage, None, _) => {
                return Err(ValidationError::MissingTargetPercent { subject });
            }
            (TargetKind::FixedAmount, None, Some(v)) => TargetMode::FixedAmount(v),
            (TargetKind::FixedAmount, _, None) => {
                return Err(ValidationError::MissingTargetValue { subject });
            }
            (TargetKind::Off, None, None) => TargetMode::Off,
            (TargetKind::Off, _, _) => {
                return Err(ValidationError::TargetWhileOff { subject });
            }
        };

        let id = AssetId::new(r.id);
        let asset = Asset {
            name: if r.name.is_empty() {
                id.as_str().to_string()
            } else {
                r.name
            },
            ticker: r.ticker,
            identifier: r.identifier.filter(|s| !s.trim().is_empty()),
            asset_class: r.asset_class,
            current_value: r.current_value,
            target,
            id,
        };
        asset.validate()?;
        Ok(asset)
    }
}

impl From<&Asset> for AssetRecord {
    fn from(a: &Asset) -> Self {
        let (target_percent, target_value) = match a.target {
            TargetMode::Percentage(p) => (Some(p), None),
            TargetMode::FixedAmount(v) => (None, Some(v)),
            TargetMode::Off => (None, None),
        };
        Self {
            id: a.id.to_string(),
            name: a.name.clone(),
            ticker: a.ticker.clone(),
            identifier: a.identifier.clone(),
            asset_class: a.asset_class,
            current_value: a.current_value,
            target_mode: a.target.kind().as_str().to_string(),
            target_percent,
            target_value,
        }
    }
}

impl ClassTargetRecord {
    /// Convert into a validated class target.
    ///
    /// Unlike assets, fixed-amount without a value is accepted and means
    /// "hold the class at its current total".
    pub fn into_target(self) -> Result<(AssetClass, ClassTarget), ValidationError> {
        let subject = class_subject(self.asset_class);
        let kind = parse_kind(&subject, &self.target_mode)?;

        let target = match (kind, self.target_percent, self.target_value) {
            (_, Some(_), Some(_)) => {
                return Err(ValidationError::ConflictingTargets { subject });
            }
            (TargetKind::Percentage, Some(p), None) => ClassTarget::Percentage(p),
            (TargetKind::Percentage, None, _) => {
                return Err(ValidationError::MissingTargetPercent { subject });
            }
            (TargetKind::FixedAmount, None, v) => ClassTarget::FixedAmount(v),
            (TargetKind::FixedAmount, Some(_), None) => {
                return Err(ValidationError::UnexpectedTargetField {
                    subject,
                    mode: kind,
                    field: "targetPercent",
                });
            }
            (TargetKind::Off, None, None) => ClassTarget::Off,
            (TargetKind::Off, _, _) => {
                return Err(ValidationError::TargetWhileOff { subject });
            }
        };
        target.validate(&subject)?;
        Ok((self.asset_class, target))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(mode: &str, percent: Option<f64>, value: Option<f64>) -> AssetRecord {
        AssetRecord {
            id: "vwce".into(),
            name: "All-World".into(),
            ticker: "VWCE".into(),
            identifier: None,
            asset_class: AssetClass::Stocks,
            current_value: 1_000.0,
            target_mode: mode.into(),
            target_percent: percent,
            target_value: value,
        }
    }

    fn class_record(mode: &str, percent: Option<f64>, value: Option<f64>) -> ClassTargetRecord {
        ClassTargetRecord {
            asset_class: AssetClass::Bonds,
            target_mode: mode.into(),
            target_percent: percent,
            target_value: value,
        }
    }

    #[test]
    fn percentage_record() {
        let a = Asset::try_from(record("percentage", Some(40.0), None)).unwrap();
        assert_eq!(a.target, TargetMode::Percentage(40.0));
        assert_eq!(a.name, "All-World");
    }

    #[test]
    fn fixed_amount_record() {
        let a = Asset::try_from(record("fixed-amount", None, Some(5_000.0))).unwrap();
        assert_eq!(a.target, TargetMode::FixedAmount(5_000.0));
    }

    #[test]
    fn off_record() {
        let a = Asset::try_from(record("off", None, None)).unwrap();
        assert_eq!(a.target, TargetMode::Off);
    }

    #[test]
    fn missing_percent() {
        assert!(matches!(
            Asset::try_from(record("percentage", None, None)),
            Err(ValidationError::MissingTargetPercent { .. })
        ));
    }

    #[test]
    fn percent_given_for_fixed_amount_is_missing_value() {
        assert!(matches!(
            Asset::try_from(record("fixed-amount", Some(10.0), None)),
            Err(ValidationError::MissingTargetValue { .. })
        ));
    }

    #[test]
    fn both_targets_conflict() {
        assert!(matches!(
            Asset::try_from(record("percentage", Some(10.0), Some(10.0))),
            Err(ValidationError::ConflictingTargets { .. })
        ));
    }

    #[test]
    fn off_with_payload() {
        assert!(matches!(
            Asset::try_from(record("off", Some(10.0), None)),
            Err(ValidationError::TargetWhileOff { .. })
        ));
    }

    #[test]
    fn unknown_mode() {
        assert!(matches!(
            Asset::try_from(record("", None, None)),
            Err(ValidationError::UnknownTargetMode { .. })
        ));
    }

    #[test]
    fn negative_current_value() {
        let mut r = record("off", None, None);
        r.current_value = -5.0;
        assert!(matches!(
            Asset::try_from(r),
            Err(ValidationError::NegativeValue { .. })
        ));
    }

    #[test]
    fn empty_name_falls_back_to_id() {
        let mut r = record("off", None, None);
        r.name.clear();
        r.identifier = Some("  ".into());
        let a = Asset::try_from(r).unwrap();
        assert_eq!(a.name, "vwce");
        assert_eq!(a.identifier, None);
    }

    #[test]
    fn asset_to_record_and_back() {
        let a = Asset::new("btc", AssetClass::Crypto, 3_000.0)
            .with_target(TargetMode::FixedAmount(5_000.0));
        let r = AssetRecord::from(&a);
        assert_eq!(r.target_mode, "fixed-amount");
        assert_eq!(r.target_value, Some(5_000.0));
        assert_eq!(r.target_percent, None);
        assert_eq!(Asset::try_from(r).unwrap(), a);
    }

    #[test]
    fn class_fixed_amount_without_value_is_accepted() {
        let (class, t) = class_record("fixed-amount", None, None).into_target().unwrap();
        assert_eq!(class, AssetClass::Bonds);
        assert_eq!(t, ClassTarget::FixedAmount(None));
    }

    #[test]
    fn class_percentage_requires_percent() {
        assert!(matches!(
            class_record("percentage", None, Some(1.0)).into_target(),
            Err(ValidationError::MissingTargetPercent { .. })
        ));
    }

    #[test]
    fn class_percent_range_checked() {
        assert!(matches!(
            class_record("percentage", Some(101.0), None).into_target(),
            Err(ValidationError::PercentOutOfRange { .. })
        ));
    }

    #[test]
    fn class_fixed_amount_with_percent_names_the_field() {
        let err = class_record("fixed-amount", Some(20.0), None)
            .into_target()
            .unwrap_err();
        assert_eq!(
            err,
            ValidationError::UnexpectedTargetField {
                subject: "class bonds".into(),
                mode: TargetKind::FixedAmount,
                field: "targetPercent",
            }
        );
        assert_eq!(
            err.to_string(),
            "class bonds: fixed-amount mode does not take targetPercent"
        );
    }
}
