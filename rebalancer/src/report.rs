//! Terminal tables for engine output.
//!
//! Sorting works on borrowed rows; the allocation itself is never touched.

use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

use fireplan::{Allocation, AllocationDelta, Asset, AssetId};
use rustc_hash::FxHashMap;

/// Row order for the asset table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortKey {
    /// Snapshot order.
    #[default]
    Input,
    /// Largest current value first.
    Value,
    /// Largest absolute delta first.
    Delta,
    /// Asset name, A→Z.
    Name,
    /// Class, then largest current value.
    Class,
}

impl FromStr for SortKey {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "input" => Ok(SortKey::Input),
            "value" => Ok(SortKey::Value),
            "delta" => Ok(SortKey::Delta),
            "name" => Ok(SortKey::Name),
            "class" => Ok(SortKey::Class),
            other => Err(format!("unknown sort key '{other}'")),
        }
    }
}

fn desc(a: f64, b: f64) -> Ordering {
    b.partial_cmp(&a).unwrap_or(Ordering::Equal)
}

/// Asset rows in the requested order.
pub fn sorted_deltas<'a>(
    allocation: &'a Allocation,
    names: &FxHashMap<&AssetId, &'a Asset>,
    key: SortKey,
) -> Vec<&'a AllocationDelta> {
    let mut rows: Vec<&AllocationDelta> = allocation.deltas.iter().collect();
    let name_of = |d: &AllocationDelta| names.get(&d.asset_id).map(|a| a.name.to_lowercase());
    match key {
        SortKey::Input => {}
        SortKey::Value => rows.sort_by(|a, b| desc(a.current_value, b.current_value)),
        SortKey::Delta => rows.sort_by(|a, b| desc(a.delta.abs(), b.delta.abs())),
        SortKey::Name => rows.sort_by_key(|d| name_of(*d)),
        SortKey::Class => rows.sort_by(|a, b| {
            a.asset_class
                .cmp(&b.asset_class)
                .then_with(|| desc(a.current_value, b.current_value))
        }),
    }
    rows
}

/// Per-class table.
pub struct ClassTable<'a>(pub &'a Allocation);

impl fmt::Display for ClassTable<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let alloc = self.0;
        writeln!(f, "ASSET CLASSES (total ${:.2}):", alloc.total_value)?;
        writeln!(
            f,
            "  {:12} {:12} {:>8} {:>14} {:>14} {:>14}  {}",
            "Class", "Mode", "Now%", "Current", "Target", "Delta", "Action"
        )?;
        for c in &alloc.classes {
            let target = match c.target_total {
                Some(t) => format!("${t:.2}"),
                None => "-".into(),
            };
            let mode = match c.target_percent {
                Some(p) => format!("{p:.1}%"),
                None => c.target_kind.to_string(),
            };
            writeln!(
                f,
                "  {:12} {:12} {:>7.2}% {:>14} {:>14} {:>14}  {}",
                c.asset_class.as_str(),
                mode,
                c.current_percent,
                format!("${:.2}", c.current_total),
                target,
                format!("{:+.2}", c.delta),
                c.action,
            )?;
        }
        for class in &alloc.missing_class_targets {
            writeln!(f, "  note: {class} has no class target; treated as off")?;
        }
        Ok(())
    }
}

/// Per-asset table.
pub struct AssetTable<'a> {
    pub allocation: &'a Allocation,
    pub assets: &'a [Asset],
    pub sort: SortKey,
}

impl fmt::Display for AssetTable<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let names: FxHashMap<&AssetId, &Asset> =
            self.assets.iter().map(|a| (&a.id, a)).collect();

        writeln!(f, "ASSETS:")?;
        writeln!(
            f,
            "  {:10} {:24} {:12} {:>8} {:>8} {:>14} {:>14} {:>14}  {}",
            "Ticker", "Name", "Class", "Now%", "InCls%", "Current", "Target", "Delta", "Action"
        )?;
        for d in sorted_deltas(self.allocation, &names, self.sort) {
            let (ticker, name) = match names.get(&d.asset_id) {
                Some(a) => (a.ticker.as_str(), a.name.as_str()),
                None => ("", d.asset_id.as_str()),
            };
            let target = match d.target_value {
                Some(t) => format!("${t:.2}"),
                None => "-".into(),
            };
            writeln!(
                f,
                "  {:10} {:24} {:12} {:>7.2}% {:>7.2}% {:>14} {:>14} {:>14}  {}",
                ticker,
                truncate(name, 24),
                d.asset_class.as_str(),
                d.current_percent,
                d.current_percent_in_class,
                format!("${:.2}", d.current_value),
                target,
                format!("{:+.2}", d.delta),
                d.action,
            )?;
        }
        Ok(())
    }
}

fn truncate(s: &str, max: usize) -> String {
    if s.chars().count() <= max {
        s.to_string()
    } else {
        let mut out: String = s.chars().take(max - 1).collect();
        out.push('…');
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use fireplan::{AssetClass, ClassTarget, ClassTargets, EngineOptions, TargetMode, compute};

    fn fixture() -> (Vec<Asset>, Allocation) {
        let assets = vec![
            Asset::new("b", AssetClass::Bonds, 300.0)
                .with_name("Zeta Bonds")
                .with_target(TargetMode::Percentage(50.0)),
            Asset::new("a", AssetClass::Stocks, 700.0)
                .with_name("alpha stocks")
                .with_target(TargetMode::Percentage(50.0)),
            Asset::new("c", AssetClass::Stocks, 0.0).with_name("Mid"),
        ];
        let mut t = ClassTargets::default();
        t.insert(AssetClass::Stocks, ClassTarget::Percentage(50.0));
        t.insert(AssetClass::Bonds, ClassTarget::Percentage(50.0));
        let alloc = compute(&assets, &t, &EngineOptions::default()).unwrap();
        (assets, alloc)
    }

    fn ids(rows: &[&AllocationDelta]) -> Vec<String> {
        rows.iter().map(|d| d.asset_id.to_string()).collect()
    }

    #[test]
    fn sort_orders() {
        let (assets, alloc) = fixture();
        let names: FxHashMap<&AssetId, &Asset> = assets.iter().map(|a| (&a.id, a)).collect();

        assert_eq!(ids(&sorted_deltas(&alloc, &names, SortKey::Input)), ["b", "a", "c"]);
        assert_eq!(ids(&sorted_deltas(&alloc, &names, SortKey::Value)), ["a", "b", "c"]);
        assert_eq!(ids(&sorted_deltas(&alloc, &names, SortKey::Name)), ["a", "c", "b"]);
        assert_eq!(ids(&sorted_deltas(&alloc, &names, SortKey::Class)), ["a", "c", "b"]);
        // |a| = 200, |b| = 200, c excluded → stable: b before a
        assert_eq!(ids(&sorted_deltas(&alloc, &names, SortKey::Delta)), ["b", "a", "c"]);
    }

    #[test]
    fn sorting_leaves_allocation_untouched() {
        let (assets, alloc) = fixture();
        let before = alloc.clone();
        let names: FxHashMap<&AssetId, &Asset> = assets.iter().map(|a| (&a.id, a)).collect();
        let _ = sorted_deltas(&alloc, &names, SortKey::Value);
        assert_eq!(alloc, before);
    }

    #[test]
    fn sort_key_from_str() {
        assert_eq!("Delta".parse(), Ok(SortKey::Delta));
        assert!("size".parse::<SortKey>().is_err());
    }

    #[test]
    fn class_table_renders() {
        let (_, alloc) = fixture();
        let s = ClassTable(&alloc).to_string();
        assert!(s.contains("total $1000.00"));
        assert!(s.contains("stocks"));
        assert!(s.contains("SELL"));
    }

    #[test]
    fn asset_table_renders() {
        let (assets, alloc) = fixture();
        let s = AssetTable {
            allocation: &alloc,
            assets: &assets,
            sort: SortKey::Input,
        }
        .to_string();
        assert!(s.contains("Zeta Bonds"));
        assert!(s.contains("EXCLUDED"));
        assert!(s.contains("+200.00"));
    }

    #[test]
    fn truncate_long_names() {
        assert_eq!(truncate("short", 10), "short");
        assert_eq!(truncate("abcdefghijkl", 5), "abcd…");
    }
}
