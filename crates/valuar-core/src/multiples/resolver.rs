use once_cell::sync::Lazy;
use regex::Regex;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::error::ValuarError;
use crate::types::{Money, Multiple};
use crate::ValuarResult;

/// Fixed metric tag attached to every resolved band.
pub const EBITDA_METRIC: &str = "EV/EBITDA";

// ---------------------------------------------------------------------------
// Types
// ---------------------------------------------------------------------------

/// One EBITDA band of a sector's multiple table.
///
/// Thresholds are expressed in millions; rows within a sector are kept
/// sorted ascending by threshold.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SectorMultipleRow {
    pub ebitda_threshold_m: Decimal,
    pub low: Multiple,
    pub high: Multiple,
}

/// Resolved low/high multiple band for a sector.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MultipleBand {
    pub low: Multiple,
    pub high: Multiple,
    pub metric: String,
}

/// Per-sector multiple matrix, keyed by canonical (lowercase) sector name.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SectorMultipleTable {
    sectors: BTreeMap<String, Vec<SectorMultipleRow>>,
}

/// Maps a free-text sector name plus an EBITDA amount to a multiple band.
#[derive(Debug, Clone)]
pub struct SectorMultipleResolver {
    table: SectorMultipleTable,
}

// ---------------------------------------------------------------------------
// Alias matching
// ---------------------------------------------------------------------------

/// Ordered sector aliases. The first matching pattern wins, so broader
/// patterns must come after more specific ones.
static SECTOR_ALIASES: Lazy<Vec<(Regex, &'static str)>> = Lazy::new(|| {
    [
        (r"(?i)aliment|distribu|bebida|food", "alimentacion-distribucion"),
        (r"(?i)log[ií]st|transport", "logistica-transporte"),
        (r"(?i)tecno|software|inform[aá]tic|digital|saas", "tecnologia"),
        (r"(?i)salud|sanit|m[eé]dic|cl[ií]nic|farma|health", "salud"),
        (r"(?i)industr|fabric|manufact|maquinar", "industrial"),
        (r"(?i)retail|comercio|tienda|moda", "retail"),
        (r"(?i)construc|inmobili|obra", "construccion"),
        (r"(?i)hostel|restaur|turis|hotel|ocio", "hosteleria-turismo"),
        (r"(?i)energ[ií]|renovab|solar|e[oó]lic", "energia"),
        (r"(?i)servici|consultor[ií]|agencia|gestor", "servicios"),
    ]
    .into_iter()
    .map(|(pattern, key)| {
        (
            Regex::new(pattern).expect("static sector alias pattern must compile"),
            key,
        )
    })
    .collect()
});

// ---------------------------------------------------------------------------
// SectorMultipleTable
// ---------------------------------------------------------------------------

impl SectorMultipleTable {
    /// Build a table from per-sector row lists, validating the matrix
    /// invariants: non-empty sectors, `low <= high` on every row, rows
    /// strictly ascending by threshold.
    pub fn new(sectors: BTreeMap<String, Vec<SectorMultipleRow>>) -> ValuarResult<Self> {
        for (sector, rows) in &sectors {
            if rows.is_empty() {
                return Err(ValuarError::InvalidInput {
                    field: format!("sectors.{sector}"),
                    reason: "Sector must have at least one multiple row".into(),
                });
            }
            for row in rows {
                if row.low > row.high {
                    return Err(ValuarError::InvalidInput {
                        field: format!("sectors.{sector}"),
                        reason: format!(
                            "Row at threshold {} has low {} > high {}",
                            row.ebitda_threshold_m, row.low, row.high
                        ),
                    });
                }
            }
            for pair in rows.windows(2) {
                if pair[0].ebitda_threshold_m >= pair[1].ebitda_threshold_m {
                    return Err(ValuarError::InvalidInput {
                        field: format!("sectors.{sector}"),
                        reason: format!(
                            "Thresholds must be strictly ascending ({} then {})",
                            pair[0].ebitda_threshold_m, pair[1].ebitda_threshold_m
                        ),
                    });
                }
            }
        }
        Ok(Self { sectors })
    }

    /// An empty table; every resolve returns None. This is the degraded
    /// state when the external dataset fetch fails.
    pub fn empty() -> Self {
        Self {
            sectors: BTreeMap::new(),
        }
    }

    /// The built-in per-sector matrix used when no external dataset is
    /// supplied. Thresholds in millions of EBITDA.
    pub fn builtin() -> Self {
        fn row(threshold: Decimal, low: Decimal, high: Decimal) -> SectorMultipleRow {
            SectorMultipleRow {
                ebitda_threshold_m: threshold,
                low,
                high,
            }
        }

        let mut sectors: BTreeMap<String, Vec<SectorMultipleRow>> = BTreeMap::new();
        sectors.insert(
            "tecnologia".into(),
            vec![
                row(dec!(0.5), dec!(6.0), dec!(9.0)),
                row(dec!(1.0), dec!(7.0), dec!(10.0)),
                row(dec!(2.0), dec!(8.0), dec!(11.5)),
                row(dec!(5.0), dec!(9.0), dec!(13.0)),
                row(dec!(10.0), dec!(10.0), dec!(14.5)),
            ],
        );
        sectors.insert(
            "alimentacion-distribucion".into(),
            vec![
                row(dec!(0.5), dec!(4.0), dec!(6.0)),
                row(dec!(1.0), dec!(4.5), dec!(6.8)),
                row(dec!(2.0), dec!(5.0), dec!(7.5)),
                row(dec!(5.0), dec!(5.5), dec!(8.2)),
                row(dec!(10.0), dec!(6.0), dec!(9.0)),
            ],
        );
        sectors.insert(
            "logistica-transporte".into(),
            vec![
                row(dec!(0.5), dec!(5.2), dec!(8.0)),
                row(dec!(0.8), dec!(5.8), dec!(8.8)),
                row(dec!(1.0), dec!(6.2), dec!(9.2)),
                row(dec!(2.0), dec!(6.8), dec!(9.8)),
                row(dec!(5.0), dec!(7.4), dec!(10.6)),
            ],
        );
        sectors.insert(
            "salud".into(),
            vec![
                row(dec!(0.5), dec!(5.5), dec!(8.5)),
                row(dec!(1.0), dec!(6.5), dec!(9.5)),
                row(dec!(2.0), dec!(7.5), dec!(10.5)),
                row(dec!(5.0), dec!(8.5), dec!(12.0)),
            ],
        );
        sectors.insert(
            "industrial".into(),
            vec![
                row(dec!(0.5), dec!(4.2), dec!(6.5)),
                row(dec!(1.0), dec!(4.8), dec!(7.2)),
                row(dec!(2.0), dec!(5.4), dec!(8.0)),
                row(dec!(5.0), dec!(6.0), dec!(8.8)),
                row(dec!(10.0), dec!(6.6), dec!(9.6)),
            ],
        );
        sectors.insert(
            "retail".into(),
            vec![
                row(dec!(0.5), dec!(3.5), dec!(5.5)),
                row(dec!(1.0), dec!(4.0), dec!(6.0)),
                row(dec!(2.0), dec!(4.5), dec!(6.8)),
                row(dec!(5.0), dec!(5.0), dec!(7.5)),
            ],
        );
        sectors.insert(
            "servicios".into(),
            vec![
                row(dec!(0.5), dec!(4.0), dec!(6.2)),
                row(dec!(1.0), dec!(4.6), dec!(7.0)),
                row(dec!(2.0), dec!(5.2), dec!(7.8)),
                row(dec!(5.0), dec!(5.8), dec!(8.6)),
            ],
        );
        sectors.insert(
            "construccion".into(),
            vec![
                row(dec!(0.5), dec!(3.0), dec!(5.0)),
                row(dec!(1.0), dec!(3.5), dec!(5.6)),
                row(dec!(2.0), dec!(4.0), dec!(6.2)),
                row(dec!(5.0), dec!(4.5), dec!(7.0)),
            ],
        );
        sectors.insert(
            "hosteleria-turismo".into(),
            vec![
                row(dec!(0.5), dec!(3.8), dec!(6.0)),
                row(dec!(1.0), dec!(4.4), dec!(6.8)),
                row(dec!(2.0), dec!(5.0), dec!(7.6)),
                row(dec!(5.0), dec!(5.6), dec!(8.4)),
            ],
        );
        sectors.insert(
            "energia".into(),
            vec![
                row(dec!(0.5), dec!(5.0), dec!(7.5)),
                row(dec!(1.0), dec!(5.6), dec!(8.2)),
                row(dec!(2.0), dec!(6.2), dec!(9.0)),
                row(dec!(5.0), dec!(7.0), dec!(10.0)),
                row(dec!(10.0), dec!(7.8), dec!(11.0)),
            ],
        );

        Self { sectors }
    }

    pub fn is_empty(&self) -> bool {
        self.sectors.is_empty()
    }

    pub fn sector_keys(&self) -> impl Iterator<Item = &str> {
        self.sectors.keys().map(|k| k.as_str())
    }

    pub fn rows(&self, sector_key: &str) -> Option<&[SectorMultipleRow]> {
        self.sectors.get(sector_key).map(|v| v.as_slice())
    }
}

// ---------------------------------------------------------------------------
// SectorMultipleResolver
// ---------------------------------------------------------------------------

impl Default for SectorMultipleResolver {
    fn default() -> Self {
        Self::new(SectorMultipleTable::builtin())
    }
}

impl SectorMultipleResolver {
    pub fn new(table: SectorMultipleTable) -> Self {
        Self { table }
    }

    pub fn table(&self) -> &SectorMultipleTable {
        &self.table
    }

    /// Resolve a free-text sector name plus an EBITDA amount to a multiple
    /// band. Unknown sectors return None; callers fall back to their default
    /// multiple table.
    pub fn resolve(&self, sector_name: &str, ebitda: Money) -> Option<MultipleBand> {
        let key = self.canonical_sector(sector_name)?;
        let rows = self.table.sectors.get(key)?;

        // Clamp EBITDA (in millions) to the sector's threshold range.
        let ebitda_m = ebitda / dec!(1_000_000);
        let min = rows.first()?.ebitda_threshold_m;
        let max = rows.last()?.ebitda_threshold_m;
        let clamped = ebitda_m.clamp(min, max);

        // Nearest threshold wins; the strict `<` keeps the first-encountered
        // (lower-threshold) row on equidistant ties.
        let mut best = &rows[0];
        let mut best_diff = (clamped - best.ebitda_threshold_m).abs();
        for candidate in &rows[1..] {
            let diff = (clamped - candidate.ebitda_threshold_m).abs();
            if diff < best_diff {
                best = candidate;
                best_diff = diff;
            }
        }

        Some(MultipleBand {
            low: best.low,
            high: best.high,
            metric: EBITDA_METRIC.into(),
        })
    }

    /// Normalize a free-text sector name to a canonical table key: exact
    /// case-insensitive match first, then the ordered alias patterns.
    fn canonical_sector(&self, name: &str) -> Option<&str> {
        let trimmed = name.trim();
        if trimmed.is_empty() {
            return None;
        }

        let lowered = trimmed.to_lowercase();
        if let Some((key, _)) = self.table.sectors.get_key_value(lowered.as_str()) {
            return Some(key.as_str());
        }

        for (pattern, key) in SECTOR_ALIASES.iter() {
            if pattern.is_match(trimmed) && self.table.sectors.contains_key(*key) {
                return Some(*key);
            }
        }

        None
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
