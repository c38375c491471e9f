//! # Bin Capacity Report
//!
//! 報表輸出層：錯誤標記在此才轉為文字，數值在此才四捨五入

pub mod format;
pub mod rows;

pub use rows::{DetailRow, StatusRow, SummaryReportRow, TotalsReportRow};

use bincap_calc::ReconcileResult;
use serde::Serialize;

/// 儲位不存在時的顯示值
pub const NOT_APPLICABLE: &str = "N/A";

/// 錯誤列數值欄位的顯示值
pub const PLACEHOLDER: &str = "-";

/// 完整報表
#[derive(Debug, Clone, Serialize)]
pub struct ReconcileReport {
    /// 明細（需求明細 × 儲位，含錯誤列）
    pub detail: Vec<DetailRow>,

    /// 產品 × 結構 彙總，錯誤列附在最後
    pub summary: Vec<SummaryReportRow>,

    /// 各結構 OK / 短缺 儲位數
    pub structure_status: Vec<StatusRow>,

    /// 各結構合計，最後一列為總計
    pub totals: Vec<TotalsReportRow>,

    /// 錯誤清單
    pub errors: Vec<DetailRow>,

    pub success_count: usize,
    pub error_count: usize,
}

impl ReconcileReport {
    /// 由核對結果建立報表
    pub fn from_result(result: &ReconcileResult) -> Self {
        let mut summary: Vec<SummaryReportRow> = result
            .summary
            .rows
            .iter()
            .map(SummaryReportRow::from_summary)
            .collect();
        summary.extend(result.summary.errors.iter().map(SummaryReportRow::from_error));

        let mut totals: Vec<TotalsReportRow> = result
            .totals
            .by_structure
            .iter()
            .map(|t| TotalsReportRow::new(&t.structure_code, &t.totals))
            .collect();
        totals.push(TotalsReportRow::new("TOTAL", &result.totals.grand_total));

        Self {
            detail: result.records.iter().map(DetailRow::from_record).collect(),
            summary,
            structure_status: result.structure_status.iter().map(StatusRow::from_status).collect(),
            totals,
            errors: result.errors.records.iter().map(DetailRow::from_record).collect(),
            success_count: result.errors.success_count,
            error_count: result.errors.records.len(),
        }
    }

    /// 匯出 JSON（數值保留為數字）
    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }

    /// 畫面顯示用文字（千分位、2 位小數）
    pub fn render_text(&self) -> String {
        let mut out = String::new();

        section(&mut out, "明細", &DetailRow::HEADERS, self.detail.iter().map(DetailRow::display_cells));
        section(
            &mut out,
            "產品 × 結構 彙總",
            &SummaryReportRow::HEADERS,
            self.summary.iter().map(SummaryReportRow::display_cells),
        );
        section(
            &mut out,
            "結構儲位狀態",
            &StatusRow::HEADERS,
            self.structure_status.iter().map(StatusRow::display_cells),
        );
        section(
            &mut out,
            "結構合計",
            &TotalsReportRow::HEADERS,
            self.totals.iter().map(TotalsReportRow::display_cells),
        );
        section(&mut out, "錯誤清單", &DetailRow::HEADERS, self.errors.iter().map(DetailRow::display_cells));

        out.push_str(&format!(
            "成功 {} 筆，錯誤 {} 筆\n",
            format::format_count(self.success_count as u64),
            format::format_count(self.error_count as u64)
        ));
        out
    }
}

fn section(out: &mut String, title: &str, headers: &[&str], rows: impl Iterator<Item = Vec<String>>) {
    out.push_str(&format!("== {} ==\n", title));
    out.push_str(&headers.join(" | "));
    out.push('\n');
    for cells in rows {
        out.push_str(&cells.join(" | "));
        out.push('\n');
    }
    out.push('\n');
}
