//! # Bin Capacity Calculation Engine
//!
//! 核心料箱容量核對引擎

pub mod aggregator;
pub mod evaluator;
pub mod normalizer;
pub mod reconciler;
pub mod resolver;
pub mod runner;

// Re-export 主要類型
pub use aggregator::{
    Aggregator, ErrorListing, PositionBalance, PositionStatus, ProductStructureSummary,
    StructureStatus, StructureTotals, SummaryRow, TotalsRollup, TotalsRow,
};
pub use evaluator::CapacityEvaluator;
pub use normalizer::{DemandNormalizer, Normalized};
pub use reconciler::BinCapacityReconciler;
pub use resolver::{CatalogEntry, PositionIndex};
pub use runner::RunController;

use chrono::{DateTime, Utc};
use serde::Serialize;
use uuid::Uuid;

/// 核對計算結果
#[derive(Debug, Clone, Serialize)]
pub struct ReconcileResult {
    /// 批次ID（由執行控制器指派）
    pub run_id: Option<Uuid>,

    /// 開始時間
    pub started_at: DateTime<Utc>,

    /// 明細記錄（需求明細 × 儲位，含錯誤列，依輸入順序）
    pub records: Vec<bincap_core::AllocationRecord>,

    /// 產品 × 結構彙總
    pub summary: ProductStructureSummary,

    /// 各結構的儲位狀態統計
    pub structure_status: Vec<StructureStatus>,

    /// 各結構合計與總計
    pub totals: TotalsRollup,

    /// 錯誤清單
    pub errors: ErrorListing,

    /// 警告信息
    pub warnings: Vec<ReconcileWarning>,

    /// 計算耗時（毫秒）
    pub calculation_time_ms: Option<u128>,
}

impl ReconcileResult {
    /// 添加警告
    pub fn add_warning(&mut self, warning: ReconcileWarning) {
        self.warnings.push(warning);
    }

    /// 成功記錄數
    pub fn success_count(&self) -> usize {
        self.errors.success_count
    }

    /// 錯誤記錄數
    pub fn error_count(&self) -> usize {
        self.errors.records.len()
    }
}

/// 核對警告（資料被修正但計算繼續）
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ReconcileWarning {
    pub subject: String,
    pub message: String,
    pub severity: WarningSeverity,
}

impl ReconcileWarning {
    pub fn new(subject: String, message: String, severity: WarningSeverity) -> Self {
        Self {
            subject,
            message,
            severity,
        }
    }

    pub fn info(subject: String, message: String) -> Self {
        Self::new(subject, message, WarningSeverity::Info)
    }

    pub fn warning(subject: String, message: String) -> Self {
        Self::new(subject, message, WarningSeverity::Warning)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum WarningSeverity {
    Info,
    Warning,
}
