//! Core types: AssetClass, AssetId, Money, Percent

use std::fmt;
use std::str::FromStr;

/// Monetary amount in currency units (e.g. 1234.56 = $1,234.56).
///
/// Currency is implicit: every value handed to one computation must be in
/// the same currency.
pub type Money = f64;

/// Percentage on the 0..=100 scale (40.0 = 40%).
pub type Percent = f64;

/// Top-level bucket an asset belongs to for allocation purposes.
///
/// The declaration order is the canonical output order of class summaries.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "kebab-case"))]
pub enum AssetClass {
    Stocks,
    Bonds,
    Cash,
    Crypto,
    RealEstate,
}

impl AssetClass {
    /// All classes in canonical order.
    pub const ALL: [AssetClass; 5] = [
        AssetClass::Stocks,
        AssetClass::Bonds,
        AssetClass::Cash,
        AssetClass::Crypto,
        AssetClass::RealEstate,
    ];

    /// Stable lowercase tag, as used in snapshot files.
    pub fn as_str(self) -> &'static str {
        match self {
            AssetClass::Stocks => "stocks",
            AssetClass::Bonds => "bonds",
            AssetClass::Cash => "cash",
            AssetClass::Crypto => "crypto",
            AssetClass::RealEstate => "real-estate",
        }
    }

    /// True for classes whose rebalancing vocabulary is save/invest rather
    /// than buy/sell.
    #[inline]
    pub fn is_cash_like(self) -> bool {
        matches!(self, AssetClass::Cash)
    }
}

impl fmt::Display for AssetClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error returned when parsing an unknown asset class tag.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
#[error("unknown asset class '{0}'")]
pub struct ParseAssetClassError(pub String);

impl FromStr for AssetClass {
    type Err = ParseAssetClassError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "stocks" | "stock" | "equities" => Ok(AssetClass::Stocks),
            "bonds" | "bond" => Ok(AssetClass::Bonds),
            "cash" => Ok(AssetClass::Cash),
            "crypto" => Ok(AssetClass::Crypto),
            "real-estate" | "real_estate" | "realestate" | "real estate" => {
                Ok(AssetClass::RealEstate)
            }
            other => Err(ParseAssetClassError(other.to_string())),
        }
    }
}

/// Opaque identifier of a held asset, unique within one snapshot.
#[derive(Clone, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(transparent))]
pub struct AssetId(String);

impl AssetId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    #[inline]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.0.trim().is_empty()
    }
}

impl From<&str> for AssetId {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}

impl From<String> for AssetId {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl fmt::Display for AssetId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn class_ordering_is_canonical() {
        let mut shuffled = vec![
            AssetClass::RealEstate,
            AssetClass::Cash,
            AssetClass::Stocks,
            AssetClass::Crypto,
            AssetClass::Bonds,
        ];
        shuffled.sort();
        assert_eq!(shuffled, AssetClass::ALL.to_vec());
    }

    #[test]
    fn class_display_roundtrips_through_from_str() {
        for class in AssetClass::ALL {
            assert_eq!(class.to_string().parse::<AssetClass>(), Ok(class));
        }
    }

    #[test]
    fn class_from_str_is_lenient_on_case_and_spelling() {
        assert_eq!("STOCKS".parse::<AssetClass>(), Ok(AssetClass::Stocks));
        assert_eq!("real estate".parse::<AssetClass>(), Ok(AssetClass::RealEstate));
        assert_eq!("real_estate".parse::<AssetClass>(), Ok(AssetClass::RealEstate));
        assert!("gold".parse::<AssetClass>().is_err());
    }

    #[test]
    fn only_cash_is_cash_like() {
        let cash_like: Vec<_> = AssetClass::ALL
            .into_iter()
            .filter(|c| c.is_cash_like())
            .collect();
        assert_eq!(cash_like, vec![AssetClass::Cash]);
    }

    #[test]
    fn asset_id_empty() {
        assert!(AssetId::new("").is_empty());
        assert!(AssetId::new("   ").is_empty());
        assert!(!AssetId::new("vwce").is_empty());
        assert_eq!(format!("{}", AssetId::from("vwce")), "vwce");
    }
}
