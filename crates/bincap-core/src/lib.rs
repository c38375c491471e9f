//! # Bin Capacity Core
//!
//! 核心資料模型與類型定義

pub mod allocation;
pub mod catalog;
pub mod config;
pub mod demand;
pub mod run_state;
pub mod table;

// Re-export 主要類型
pub use allocation::{AllocationError, AllocationOutcome, AllocationRecord, CapacityFit};
pub use catalog::{BinType, PositionBinAssignment, ReferenceCatalog, StorageProductPosition};
pub use config::{ColumnMapping, ReconcileConfig};
pub use demand::DemandLine;
pub use run_state::RunState;
pub use table::Table;

/// 料箱容量核對錯誤類型
///
/// 這裡只列出會中止整批計算的錯誤。
/// 「產品無儲位」與「料箱無容積」屬於單筆記錄的結果，見 [`AllocationError`]。
#[derive(Debug, thiserror::Error)]
pub enum BinCapError {
    #[error("{relation} 缺少必要欄位: {column}")]
    MissingColumn { relation: String, column: String },

    #[error("{relation} 第 {row} 列欄位數不符：預期 {expected}，實際 {found}")]
    MalformedRow {
        relation: String,
        row: usize,
        expected: usize,
        found: usize,
    },

    #[error("計算錯誤: {0}")]
    CalculationError(String),

    #[error("已有批次正在執行，拒絕新的提交")]
    RunInProgress,

    #[error("無效的配置: {0}")]
    InvalidConfig(String),
}

pub type Result<T> = std::result::Result<T, BinCapError>;
