//! 報表列

use bincap_calc::{StructureStatus, SummaryRow, TotalsRow};
use bincap_core::{AllocationOutcome, AllocationRecord};
use rust_decimal::Decimal;
use serde::Serialize;

use crate::format::{format_count, format_decimal, format_integer, round2};
use crate::{NOT_APPLICABLE, PLACEHOLDER};

/// 明細列（需求明細 × 儲位）
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DetailRow {
    pub product_id: String,
    pub receiver_id: String,
    pub structure_code: String,
    pub position_id: String,
    pub bin_type_id: String,
    pub bins_needed: Option<u64>,
    pub bins_available: Option<u64>,
    pub difference: Option<i64>,
    pub quantity_fulfilled: Option<u64>,
    #[serde(with = "rust_decimal::serde::float_option")]
    pub volume_fulfilled: Option<Decimal>,
    #[serde(with = "rust_decimal::serde::float_option")]
    pub max_capacity_volume: Option<Decimal>,
    /// 錯誤說明（成功列為空）
    pub error: Option<String>,
}

impl DetailRow {
    pub const HEADERS: [&'static str; 11] = [
        "產品",
        "收貨方",
        "結構",
        "儲位",
        "料箱類型",
        "需要料箱",
        "可用料箱",
        "差額",
        "可滿足數量",
        "可滿足體積",
        "最大容積",
    ];

    /// 由配置記錄建立
    pub fn from_record(record: &AllocationRecord) -> Self {
        let mut row = Self {
            product_id: record.product_id.clone(),
            receiver_id: record.receiver_id.clone(),
            structure_code: record.structure_code.clone(),
            position_id: record.position_id.clone().unwrap_or_else(|| NOT_APPLICABLE.to_string()),
            bin_type_id: record.bin_type_id.clone().unwrap_or_else(|| NOT_APPLICABLE.to_string()),
            bins_needed: None,
            bins_available: None,
            difference: None,
            quantity_fulfilled: None,
            volume_fulfilled: None,
            max_capacity_volume: None,
            error: None,
        };

        match &record.outcome {
            AllocationOutcome::Success(fit) => {
                row.bins_needed = Some(fit.bins_needed);
                row.bins_available = Some(fit.bins_available);
                row.difference = Some(fit.difference());
                row.quantity_fulfilled = Some(fit.quantity_fulfilled);
                row.volume_fulfilled = Some(round2(fit.volume_fulfilled));
                row.max_capacity_volume = Some(round2(fit.max_capacity_volume));
            }
            AllocationOutcome::Error(err) => {
                if let bincap_core::AllocationError::NoCapacity { bins_available } = err {
                    row.bins_available = Some(*bins_available);
                }
                row.error = Some(err.to_string());
            }
        }
        row
    }

    /// 畫面顯示儲存格；錯誤說明顯示在「需要料箱」欄
    pub fn display_cells(&self) -> Vec<String> {
        let needed = match (&self.error, self.bins_needed) {
            (Some(message), _) => message.clone(),
            (None, needed) => opt_count(needed),
        };

        vec![
            self.product_id.clone(),
            self.receiver_id.clone(),
            self.structure_code.clone(),
            self.position_id.clone(),
            self.bin_type_id.clone(),
            needed,
            opt_count(self.bins_available),
            opt_integer(self.difference),
            opt_count(self.quantity_fulfilled),
            opt_decimal(self.volume_fulfilled),
            opt_decimal(self.max_capacity_volume),
        ]
    }

    /// 是否為錯誤列
    pub fn is_error(&self) -> bool {
        self.error.is_some()
    }
}

/// 產品 × 結構 彙總列
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SummaryReportRow {
    pub structure_code: String,
    pub structure_description: String,
    pub position_id: String,
    pub product_id: String,
    pub product_description: String,
    pub bin_type_id: String,
    pub bins_needed: Option<u64>,
    pub bins_available: Option<u64>,
    pub difference: Option<i64>,
    pub quantity_fulfilled: Option<u64>,
    #[serde(with = "rust_decimal::serde::float_option")]
    pub volume_fulfilled: Option<Decimal>,
    #[serde(with = "rust_decimal::serde::float_option")]
    pub max_capacity_volume: Option<Decimal>,
    pub error: Option<String>,
}

impl SummaryReportRow {
    pub const HEADERS: [&'static str; 12] = [
        "結構",
        "結構說明",
        "儲位",
        "產品",
        "產品說明",
        "料箱類型",
        "需要料箱",
        "可用料箱",
        "差額",
        "可滿足數量",
        "可滿足體積",
        "最大容積",
    ];

    pub fn from_summary(row: &SummaryRow) -> Self {
        Self {
            structure_code: row.structure_code.clone(),
            structure_description: row.structure_description.clone().unwrap_or_default(),
            position_id: row.position_id.clone(),
            product_id: row.product_id.clone(),
            product_description: row.product_description.clone().unwrap_or_default(),
            bin_type_id: row.bin_type_id.clone().unwrap_or_else(|| NOT_APPLICABLE.to_string()),
            bins_needed: Some(row.bins_needed),
            bins_available: Some(row.bins_available),
            difference: Some(row.difference()),
            quantity_fulfilled: Some(row.quantity_fulfilled),
            volume_fulfilled: Some(round2(row.volume_fulfilled)),
            max_capacity_volume: Some(round2(row.max_capacity_volume)),
            error: None,
        }
    }

    /// 錯誤記錄不參與彙總，原樣附在最後
    pub fn from_error(record: &AllocationRecord) -> Self {
        let detail = DetailRow::from_record(record);
        Self {
            structure_code: detail.structure_code,
            structure_description: record.structure_description.clone().unwrap_or_default(),
            position_id: detail.position_id,
            product_id: detail.product_id,
            product_description: record.product_description.clone().unwrap_or_default(),
            bin_type_id: detail.bin_type_id,
            bins_needed: detail.bins_needed,
            bins_available: detail.bins_available,
            difference: detail.difference,
            quantity_fulfilled: detail.quantity_fulfilled,
            volume_fulfilled: detail.volume_fulfilled,
            max_capacity_volume: detail.max_capacity_volume,
            error: detail.error,
        }
    }

    pub fn display_cells(&self) -> Vec<String> {
        let needed = match (&self.error, self.bins_needed) {
            (Some(message), _) => message.clone(),
            (None, needed) => opt_count(needed),
        };

        vec![
            self.structure_code.clone(),
            self.structure_description.clone(),
            self.position_id.clone(),
            self.product_id.clone(),
            self.product_description.clone(),
            self.bin_type_id.clone(),
            needed,
            opt_count(self.bins_available),
            opt_integer(self.difference),
            opt_count(self.quantity_fulfilled),
            opt_decimal(self.volume_fulfilled),
            opt_decimal(self.max_capacity_volume),
        ]
    }
}

/// 結構儲位狀態列
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StatusRow {
    pub structure_code: String,
    pub ok_positions: usize,
    pub shortage_positions: usize,
    pub total_positions: usize,
}

impl StatusRow {
    pub const HEADERS: [&'static str; 4] = ["結構", "OK", "短缺", "合計"];

    pub fn from_status(status: &StructureStatus) -> Self {
        Self {
            structure_code: status.structure_code.clone(),
            ok_positions: status.ok_positions,
            shortage_positions: status.shortage_positions,
            total_positions: status.total_positions(),
        }
    }

    pub fn display_cells(&self) -> Vec<String> {
        vec![
            self.structure_code.clone(),
            format_count(self.ok_positions as u64),
            format_count(self.shortage_positions as u64),
            format_count(self.total_positions as u64),
        ]
    }
}

/// 結構合計列
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TotalsReportRow {
    pub structure_code: String,
    pub bins_needed: u64,
    pub bins_available: u64,
    pub difference: i64,
    pub quantity_fulfilled: u64,
    #[serde(with = "rust_decimal::serde::float")]
    pub volume_fulfilled: Decimal,
    #[serde(with = "rust_decimal::serde::float")]
    pub max_capacity_volume: Decimal,
}

impl TotalsReportRow {
    pub const HEADERS: [&'static str; 7] = [
        "結構",
        "需要料箱",
        "可用料箱",
        "差額",
        "可滿足數量",
        "可滿足體積",
        "最大容積",
    ];

    pub fn new(structure_code: &str, totals: &TotalsRow) -> Self {
        Self {
            structure_code: structure_code.to_string(),
            bins_needed: totals.bins_needed,
            bins_available: totals.bins_available,
            difference: totals.difference(),
            quantity_fulfilled: totals.quantity_fulfilled,
            volume_fulfilled: round2(totals.volume_fulfilled),
            max_capacity_volume: round2(totals.max_capacity_volume),
        }
    }

    pub fn display_cells(&self) -> Vec<String> {
        vec![
            self.structure_code.clone(),
            format_count(self.bins_needed),
            format_count(self.bins_available),
            format_integer(self.difference),
            format_count(self.quantity_fulfilled),
            format_decimal(self.volume_fulfilled),
            format_decimal(self.max_capacity_volume),
        ]
    }
}

fn opt_integer(value: Option<i64>) -> String {
    value.map(format_integer).unwrap_or_else(|| PLACEHOLDER.to_string())
}

fn opt_count(value: Option<u64>) -> String {
    value.map(format_count).unwrap_or_else(|| PLACEHOLDER.to_string())
}

fn opt_decimal(value: Option<Decimal>) -> String {
    value.map(format_decimal).unwrap_or_else(|| PLACEHOLDER.to_string())
}
