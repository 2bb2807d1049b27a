use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::multiples::resolver::{SectorMultipleRow, SectorMultipleTable};
use crate::types::Multiple;
use crate::ValuarResult;

/// One row of the externally sourced sector-multiple dataset.
///
/// The dataset is fetched once per session by an external collaborator; the
/// core only ingests the rows it is handed. Inactive rows are excluded.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SectorDatasetRow {
    pub sector_name: String,
    pub is_active: bool,
    pub ebitda_threshold_m: Decimal,
    pub multiple_low: Multiple,
    pub multiple_high: Multiple,
}

impl SectorMultipleTable {
    /// Build a table from raw dataset rows.
    ///
    /// Rows with `is_active = false` are dropped, the remainder grouped by
    /// normalized sector name and sorted ascending by threshold. Malformed
    /// bands (`low > high`) are a contract violation and propagate as an
    /// error rather than being silently skipped.
    pub fn from_dataset(rows: Vec<SectorDatasetRow>) -> ValuarResult<Self> {
        let mut grouped: BTreeMap<String, Vec<SectorMultipleRow>> = BTreeMap::new();

        for row in rows {
            if !row.is_active {
                continue;
            }
            let key = row.sector_name.trim().to_lowercase();
            if key.is_empty() {
                continue;
            }
            grouped.entry(key).or_default().push(SectorMultipleRow {
                ebitda_threshold_m: row.ebitda_threshold_m,
                low: row.multiple_low,
                high: row.multiple_high,
            });
        }

        for rows in grouped.values_mut() {
            rows.sort_by(|a, b| a.ebitda_threshold_m.cmp(&b.ebitda_threshold_m));
            rows.dedup_by(|a, b| a.ebitda_threshold_m == b.ebitda_threshold_m);
        }

        SectorMultipleTable::new(grouped)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::multiples::resolver::SectorMultipleResolver;
    use pretty_assertions::assert_eq;
    use rust_decimal_macros::dec;

    fn dataset_row(
        sector: &str,
        active: bool,
        threshold: Decimal,
        low: Decimal,
        high: Decimal,
    ) -> SectorDatasetRow {
        SectorDatasetRow {
            sector_name: sector.to_string(),
            is_active: active,
            ebitda_threshold_m: threshold,
            multiple_low: low,
            multiple_high: high,
        }
    }

    #[test]
    fn test_inactive_rows_excluded() {
        let table = SectorMultipleTable::from_dataset(vec![
            dataset_row("Tecnologia", true, dec!(1.0), dec!(7.0), dec!(10.0)),
            dataset_row("Tecnologia", false, dec!(2.0), dec!(8.0), dec!(11.0)),
        ])
        .unwrap();

        let rows = table.rows("tecnologia").unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].ebitda_threshold_m, dec!(1.0));
    }

    #[test]
    fn test_rows_grouped_and_sorted() {
        let table = SectorMultipleTable::from_dataset(vec![
            dataset_row("Retail", true, dec!(5.0), dec!(5.0), dec!(7.5)),
            dataset_row("retail", true, dec!(0.5), dec!(3.5), dec!(5.5)),
            dataset_row("RETAIL", true, dec!(1.0), dec!(4.0), dec!(6.0)),
        ])
        .unwrap();

        let rows = table.rows("retail").unwrap();
        let thresholds: Vec<Decimal> =
            rows.iter().map(|r| r.ebitda_threshold_m).collect();
        assert_eq!(thresholds, vec![dec!(0.5), dec!(1.0), dec!(5.0)]);
    }

    #[test]
    fn test_malformed_band_is_an_error() {
        let result = SectorMultipleTable::from_dataset(vec![dataset_row(
            "retail",
            true,
            dec!(1.0),
            dec!(6.0),
            dec!(4.0),
        )]);
        assert!(result.is_err());
    }

    #[test]
    fn test_all_rows_inactive_yields_empty_table() {
        let table = SectorMultipleTable::from_dataset(vec![
            dataset_row("retail", false, dec!(1.0), dec!(4.0), dec!(6.0)),
        ])
        .unwrap();
        assert!(table.is_empty());

        // Degraded state: resolver finds nothing, callers fall back.
        let resolver = SectorMultipleResolver::new(table);
        assert_eq!(resolver.resolve("retail", dec!(1_000_000)), None);
    }

    #[test]
    fn test_duplicate_thresholds_deduped() {
        let table = SectorMultipleTable::from_dataset(vec![
            dataset_row("salud", true, dec!(1.0), dec!(6.5), dec!(9.5)),
            dataset_row("salud", true, dec!(1.0), dec!(6.6), dec!(9.6)),
        ])
        .unwrap();
        assert_eq!(table.rows("salud").unwrap().len(), 1);
    }
}
