//! # bincap
//!
//! 料箱容量核對：需求明細 → 儲位 → 料箱容量 → 彙總報表

pub use bincap_calc;
pub use bincap_core;
pub use bincap_report;

pub use bincap_calc::{BinCapacityReconciler, ReconcileResult, RunController};
pub use bincap_core::{BinCapError, ReconcileConfig, ReferenceCatalog, Result, Table};
pub use bincap_report::ReconcileReport;
