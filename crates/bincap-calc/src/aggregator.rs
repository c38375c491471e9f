//! 多層級彙總（儲位、產品、結構）
//!
//! 所有累加都使用未四捨五入的數值，四捨五入只在報表輸出時進行。

use std::collections::BTreeMap;

use bincap_core::allocation::bins_difference;
use bincap_core::{AllocationError, AllocationRecord};
use rust_decimal::Decimal;
use serde::Serialize;

/// 產品 × 結構 彙總列
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SummaryRow {
    pub structure_code: String,
    pub structure_description: Option<String>,
    pub position_id: String,
    pub product_id: String,
    pub product_description: Option<String>,
    pub bin_type_id: Option<String>,

    /// 需要料箱數（組內加總）
    pub bins_needed: u64,

    /// 可用料箱數（儲位常數，取組內第一筆）
    pub bins_available: u64,

    /// 可滿足數量（組內加總）
    pub quantity_fulfilled: u64,

    /// 可滿足體積（組內加總）
    pub volume_fulfilled: Decimal,

    /// 最大容積（組內加總）
    pub max_capacity_volume: Decimal,

    /// 組內明細筆數
    pub line_count: usize,
}

impl SummaryRow {
    /// 差額：以彙總後的數值重新計算
    pub fn difference(&self) -> i64 {
        bins_difference(self.bins_available, self.bins_needed)
    }
}

/// 產品 × 結構 彙總結果：彙總列在前，錯誤記錄原樣附在後
#[derive(Debug, Clone, Default, Serialize)]
pub struct ProductStructureSummary {
    pub rows: Vec<SummaryRow>,
    pub errors: Vec<AllocationRecord>,
}

/// 儲位狀態
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum PositionStatus {
    /// 可用 ≥ 需要
    Ok,
    /// 可用 < 需要
    Shortage,
}

/// 單一儲位的料箱收支
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PositionBalance {
    pub structure_code: String,
    pub position_id: String,
    pub bin_type_id: Option<String>,
    pub bins_needed: u64,
    pub bins_available: u64,
}

impl PositionBalance {
    pub fn difference(&self) -> i64 {
        bins_difference(self.bins_available, self.bins_needed)
    }

    pub fn status(&self) -> PositionStatus {
        if self.bins_available >= self.bins_needed {
            PositionStatus::Ok
        } else {
            PositionStatus::Shortage
        }
    }
}

/// 結構層級的儲位狀態統計
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StructureStatus {
    pub structure_code: String,
    pub ok_positions: usize,
    pub shortage_positions: usize,
}

impl StructureStatus {
    pub fn total_positions(&self) -> usize {
        self.ok_positions + self.shortage_positions
    }
}

/// 數值欄位合計
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct TotalsRow {
    pub bins_needed: u64,
    pub bins_available: u64,
    pub quantity_fulfilled: u64,
    pub volume_fulfilled: Decimal,
    pub max_capacity_volume: Decimal,
}

impl TotalsRow {
    fn add_row(&mut self, row: &SummaryRow) {
        self.bins_needed += row.bins_needed;
        self.bins_available += row.bins_available;
        self.quantity_fulfilled += row.quantity_fulfilled;
        self.volume_fulfilled += row.volume_fulfilled;
        self.max_capacity_volume += row.max_capacity_volume;
    }

    fn add_totals(&mut self, other: &TotalsRow) {
        self.bins_needed += other.bins_needed;
        self.bins_available += other.bins_available;
        self.quantity_fulfilled += other.quantity_fulfilled;
        self.volume_fulfilled += other.volume_fulfilled;
        self.max_capacity_volume += other.max_capacity_volume;
    }

    pub fn difference(&self) -> i64 {
        bins_difference(self.bins_available, self.bins_needed)
    }
}

/// 結構合計
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StructureTotals {
    pub structure_code: String,
    pub totals: TotalsRow,
}

/// 各結構合計與總計
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct TotalsRollup {
    pub by_structure: Vec<StructureTotals>,
    pub grand_total: TotalsRow,
}

/// 錯誤清單與成功/失敗計數
#[derive(Debug, Clone, Default, Serialize)]
pub struct ErrorListing {
    pub records: Vec<AllocationRecord>,
    pub success_count: usize,
    pub no_position_count: usize,
    pub no_capacity_count: usize,
}

/// 彙總分組鍵
type SummaryKey = (
    String,
    Option<String>,
    String,
    String,
    Option<String>,
    Option<String>,
);

/// 彙總計算器
pub struct Aggregator;

impl Aggregator {
    /// 產品 × 結構 彙總
    ///
    /// 可用料箱數是儲位常數，不可加總；差額在彙總後重新計算。
    pub fn summarize_by_product_structure(records: &[AllocationRecord]) -> ProductStructureSummary {
        let mut groups: BTreeMap<SummaryKey, SummaryRow> = BTreeMap::new();
        let mut errors = Vec::new();

        for record in records {
            let Some(fit) = record.fit() else {
                errors.push(record.clone());
                continue;
            };

            let key: SummaryKey = (
                record.structure_code.clone(),
                record.structure_description.clone(),
                record.position_id.clone().unwrap_or_default(),
                record.product_id.clone(),
                record.product_description.clone(),
                record.bin_type_id.clone(),
            );

            let row = groups.entry(key).or_insert_with(|| SummaryRow {
                structure_code: record.structure_code.clone(),
                structure_description: record.structure_description.clone(),
                position_id: record.position_id.clone().unwrap_or_default(),
                product_id: record.product_id.clone(),
                product_description: record.product_description.clone(),
                bin_type_id: record.bin_type_id.clone(),
                bins_needed: 0,
                bins_available: fit.bins_available,
                quantity_fulfilled: 0,
                volume_fulfilled: Decimal::ZERO,
                max_capacity_volume: Decimal::ZERO,
                line_count: 0,
            });

            row.bins_needed += fit.bins_needed;
            row.quantity_fulfilled += fit.quantity_fulfilled;
            row.volume_fulfilled += fit.volume_fulfilled;
            row.max_capacity_volume += fit.max_capacity_volume;
            row.line_count += 1;
        }

        ProductStructureSummary {
            rows: groups.into_values().collect(),
            errors,
        }
    }

    /// 各儲位料箱配置的收支：需要數加總，可用數只取一次
    ///
    /// 同一儲位有多種料箱類型時各自成為一筆收支，可用數在組內固定。
    pub fn position_balances(records: &[AllocationRecord]) -> Vec<PositionBalance> {
        let mut balances: BTreeMap<(String, String, Option<String>), PositionBalance> = BTreeMap::new();

        for record in records {
            let (Some(fit), Some(position_id)) = (record.fit(), record.position_id.as_deref()) else {
                continue;
            };

            let key = (
                record.structure_code.clone(),
                position_id.to_string(),
                record.bin_type_id.clone(),
            );
            let balance = balances
                .entry(key)
                .or_insert_with(|| PositionBalance {
                    structure_code: record.structure_code.clone(),
                    position_id: position_id.to_string(),
                    bin_type_id: record.bin_type_id.clone(),
                    bins_needed: 0,
                    bins_available: fit.bins_available,
                });
            balance.bins_needed = balance.bins_needed.saturating_add(fit.bins_needed);
        }

        balances.into_values().collect()
    }

    /// 各結構 OK / 短缺 儲位數
    pub fn structure_status(records: &[AllocationRecord]) -> Vec<StructureStatus> {
        let mut statuses: BTreeMap<String, StructureStatus> = BTreeMap::new();

        for balance in Self::position_balances(records) {
            let status = statuses
                .entry(balance.structure_code.clone())
                .or_insert_with(|| StructureStatus {
                    structure_code: balance.structure_code.clone(),
                    ok_positions: 0,
                    shortage_positions: 0,
                });
            match balance.status() {
                PositionStatus::Ok => status.ok_positions += 1,
                PositionStatus::Shortage => status.shortage_positions += 1,
            }
        }

        statuses.into_values().collect()
    }

    /// 各結構數值欄位合計與總計（以彙總列為基礎）
    pub fn structure_totals(summary: &ProductStructureSummary) -> TotalsRollup {
        let mut by_structure: BTreeMap<&str, TotalsRow> = BTreeMap::new();
        for row in &summary.rows {
            by_structure
                .entry(row.structure_code.as_str())
                .or_default()
                .add_row(row);
        }

        let mut grand_total = TotalsRow::default();
        for totals in by_structure.values() {
            grand_total.add_totals(totals);
        }

        TotalsRollup {
            by_structure: by_structure
                .into_iter()
                .map(|(code, totals)| StructureTotals {
                    structure_code: code.to_string(),
                    totals,
                })
                .collect(),
            grand_total,
        }
    }

    /// 錯誤清單（保持輸入順序）
    pub fn error_listing(records: &[AllocationRecord]) -> ErrorListing {
        let mut listing = ErrorListing::default();
        for record in records {
            match record.error() {
                None => listing.success_count += 1,
                Some(err) => {
                    match err {
                        AllocationError::NoPosition => listing.no_position_count += 1,
                        AllocationError::NoCapacity { .. } => listing.no_capacity_count += 1,
                    }
                    listing.records.push(record.clone());
                }
            }
        }
        listing
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bincap_core::{AllocationOutcome, CapacityFit};

    fn success(product: &str, position: &str, needed: u64, available: u64) -> AllocationRecord {
        AllocationRecord::new(
            product.to_string(),
            "00001".to_string(),
            "0001".to_string(),
            AllocationOutcome::Success(CapacityFit {
                bins_needed: needed,
                bins_available: available,
                quantity_fulfilled: if needed > 0 { 10 } else { 0 },
                volume_fulfilled: Decimal::new(1505, 2),
                max_capacity_volume: Decimal::from(available * 10),
            }),
        )
        .with_position_id(Some(position.to_string()))
        .with_bin_type_id(Some("B1".to_string()))
    }

    fn failure(product: &str, err: AllocationError) -> AllocationRecord {
        AllocationRecord::new(
            product.to_string(),
            "00001".to_string(),
            "0001".to_string(),
            AllocationOutcome::Error(err),
        )
    }

    #[test]
    fn test_summary_does_not_sum_bins_available() {
        let records = vec![
            success("P1", "POS-01", 2, 3),
            success("P1", "POS-01", 2, 3),
        ];

        let summary = Aggregator::summarize_by_product_structure(&records);
        assert_eq!(summary.rows.len(), 1);

        let row = &summary.rows[0];
        assert_eq!(row.bins_needed, 4);
        assert_eq!(row.bins_available, 3);
        assert_eq!(row.difference(), -1);
        assert_eq!(row.quantity_fulfilled, 20);
        assert_eq!(row.volume_fulfilled, Decimal::new(3010, 2));
        assert_eq!(row.max_capacity_volume, Decimal::from(60));
        assert_eq!(row.line_count, 2);
    }

    #[test]
    fn test_summary_appends_errors_after_rows() {
        let records = vec![
            failure("P9", AllocationError::NoPosition),
            success("P1", "POS-01", 1, 1),
            failure("P8", AllocationError::NoCapacity { bins_available: 2 }),
            success("P2", "POS-02", 1, 1),
        ];

        let summary = Aggregator::summarize_by_product_structure(&records);
        assert_eq!(summary.rows.len(), 2);
        assert_eq!(summary.errors.len(), 2);
        assert_eq!(summary.errors[0].product_id, "P9");
        assert_eq!(summary.errors[1].product_id, "P8");
    }

    #[test]
    fn test_summary_is_order_independent() {
        let mut records = vec![
            success("P1", "POS-01", 1, 2),
            success("P2", "POS-02", 3, 1),
            success("P1", "POS-01", 2, 2),
        ];
        let forward = Aggregator::summarize_by_product_structure(&records);
        records.reverse();
        let backward = Aggregator::summarize_by_product_structure(&records);

        assert_eq!(forward.rows, backward.rows);
    }

    #[test]
    fn test_group_constant_bins_available() {
        let records = vec![
            success("P1", "POS-01", 1, 5),
            success("P1", "POS-01", 4, 5),
            success("P1", "POS-01", 2, 5),
        ];

        let summary = Aggregator::summarize_by_product_structure(&records);
        for row in &summary.rows {
            for record in records.iter().filter(|r| r.product_id == row.product_id) {
                assert_eq!(record.fit().map(|f| f.bins_available), Some(row.bins_available));
            }
        }
    }

    #[test]
    fn test_structure_status_counts_distinct_positions() {
        let records = vec![
            // POS-01 兩個產品共用：需要 1 + 2 = 3，可用 3 → OK
            success("P1", "POS-01", 1, 3),
            success("P2", "POS-01", 2, 3),
            // POS-02：需要 2，可用 1 → 短缺
            success("P3", "POS-02", 2, 1),
            failure("P4", AllocationError::NoPosition),
        ];

        let balances = Aggregator::position_balances(&records);
        assert_eq!(balances.len(), 2);
        assert_eq!(balances[0].bins_needed, 3);
        assert_eq!(balances[0].status(), PositionStatus::Ok);
        assert_eq!(balances[1].difference(), -1);
        assert_eq!(balances[1].status(), PositionStatus::Shortage);

        let statuses = Aggregator::structure_status(&records);
        assert_eq!(
            statuses,
            vec![StructureStatus {
                structure_code: "0001".to_string(),
                ok_positions: 1,
                shortage_positions: 1,
            }]
        );
        assert_eq!(statuses[0].total_positions(), 2);
    }

    #[test]
    fn test_position_balances_split_by_bin_type() {
        // 同一儲位兩種料箱：B1 可用 1，B2 可用 5
        let small = success("P1", "POS-01", 2, 1);
        let large = success("P1", "POS-01", 1, 5).with_bin_type_id(Some("B2".to_string()));
        let mut records = vec![small, large];

        let forward = Aggregator::position_balances(&records);
        let forward_status = Aggregator::structure_status(&records);
        records.reverse();
        let backward = Aggregator::position_balances(&records);
        let backward_status = Aggregator::structure_status(&records);

        assert_eq!(forward, backward);
        assert_eq!(forward_status, backward_status);

        assert_eq!(forward.len(), 2);
        assert_eq!(forward[0].bin_type_id.as_deref(), Some("B1"));
        assert_eq!(forward[0].bins_needed, 2);
        assert_eq!(forward[0].bins_available, 1);
        assert_eq!(forward[0].status(), PositionStatus::Shortage);
        assert_eq!(forward[1].bin_type_id.as_deref(), Some("B2"));
        assert_eq!(forward[1].bins_available, 5);
        assert_eq!(forward[1].status(), PositionStatus::Ok);

        assert_eq!(forward_status[0].ok_positions, 1);
        assert_eq!(forward_status[0].shortage_positions, 1);
    }

    #[test]
    fn test_difference_saturates_on_huge_counts() {
        let row = PositionBalance {
            structure_code: "0001".to_string(),
            position_id: "POS-01".to_string(),
            bin_type_id: None,
            bins_needed: 0,
            bins_available: u64::MAX,
        };
        assert_eq!(row.difference(), i64::MAX);

        let totals = TotalsRow {
            bins_needed: u64::MAX,
            ..TotalsRow::default()
        };
        assert_eq!(totals.difference(), i64::MIN);
    }

    #[test]
    fn test_structure_totals() {
        let mut other = success("P5", "POS-09", 4, 2);
        other.structure_code = "0002".to_string();
        let records = vec![
            success("P1", "POS-01", 1, 3),
            success("P2", "POS-02", 2, 1),
            other,
        ];

        let summary = Aggregator::summarize_by_product_structure(&records);
        let rollup = Aggregator::structure_totals(&summary);

        assert_eq!(rollup.by_structure.len(), 2);
        assert_eq!(rollup.by_structure[0].structure_code, "0001");
        assert_eq!(rollup.by_structure[0].totals.bins_needed, 3);
        assert_eq!(rollup.by_structure[0].totals.bins_available, 4);
        assert_eq!(rollup.by_structure[0].totals.difference(), 1);
        assert_eq!(rollup.by_structure[1].totals.difference(), -2);

        assert_eq!(rollup.grand_total.bins_needed, 7);
        assert_eq!(rollup.grand_total.bins_available, 6);
        assert_eq!(rollup.grand_total.volume_fulfilled, Decimal::new(4515, 2));
        assert_eq!(rollup.grand_total.difference(), -1);
    }

    #[test]
    fn test_error_listing_counts() {
        let records = vec![
            success("P1", "POS-01", 1, 1),
            failure("P2", AllocationError::NoPosition),
            failure("P3", AllocationError::NoCapacity { bins_available: 0 }),
            failure("P4", AllocationError::NoPosition),
        ];

        let listing = Aggregator::error_listing(&records);
        assert_eq!(listing.success_count, 1);
        assert_eq!(listing.no_position_count, 2);
        assert_eq!(listing.no_capacity_count, 1);
        assert_eq!(listing.records.len(), 3);
        assert_eq!(listing.records[0].product_id, "P2");
    }
}
