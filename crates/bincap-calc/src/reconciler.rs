//! 料箱容量核對主流程

use bincap_core::{
    AllocationRecord, DemandLine, ReconcileConfig, ReferenceCatalog, StorageProductPosition, Table,
};
use chrono::Utc;
use rayon::prelude::*;

use crate::aggregator::Aggregator;
use crate::evaluator::CapacityEvaluator;
use crate::normalizer::DemandNormalizer;
use crate::resolver::PositionIndex;
use crate::ReconcileResult;

/// 料箱容量核對器
pub struct BinCapacityReconciler {
    /// 核對配置
    config: ReconcileConfig,

    /// 參考目錄快照（料箱類型、儲位料箱配置）
    catalog: ReferenceCatalog,
}

impl BinCapacityReconciler {
    /// 創建新的核對器
    pub fn new(config: ReconcileConfig, catalog: ReferenceCatalog) -> Self {
        Self { config, catalog }
    }

    /// 主核對入口：需求明細表 + 產品儲位表
    ///
    /// 任何致命錯誤都會中止整批，不回傳部分結果。
    pub fn reconcile(
        &self,
        lines: &Table,
        positions: &Table,
    ) -> bincap_core::Result<ReconcileResult> {
        tracing::info!(
            "開始容量核對：需求明細 {} 列，產品儲位 {} 列",
            lines.len(),
            positions.len()
        );

        // Step 1: 正規化
        tracing::debug!("Step 1: 正規化需求明細與產品儲位");
        let demand = DemandNormalizer::normalize_demand(lines, &self.config)?;
        let product_positions = DemandNormalizer::normalize_positions(positions, &self.config)?;

        let mut result = self.reconcile_normalized(&demand.items, &product_positions.items)?;

        let mut warnings = demand.warnings;
        warnings.extend(product_positions.warnings);
        warnings.append(&mut result.warnings);
        result.warnings = warnings;

        Ok(result)
    }

    /// 以已正規化的資料核對
    pub fn reconcile_normalized(
        &self,
        lines: &[DemandLine],
        positions: &[StorageProductPosition],
    ) -> bincap_core::Result<ReconcileResult> {
        let started_at = Utc::now();
        let start_time = std::time::Instant::now();

        // Step 2: 建立儲位索引
        tracing::debug!("Step 2: 建立儲位索引");
        let index = PositionIndex::build(positions, &self.catalog, self.config.structure_code_width);

        // Step 3: 逐筆評估（全部完成後才彙總）
        tracing::debug!("Step 3: 評估 {} 筆需求明細", lines.len());
        let records = self.evaluate_all(&index, lines)?;

        // Step 4: 彙總
        tracing::debug!("Step 4: 彙總 {} 筆配置記錄", records.len());
        let summary = Aggregator::summarize_by_product_structure(&records);
        let structure_status = Aggregator::structure_status(&records);
        let totals = Aggregator::structure_totals(&summary);
        let errors = Aggregator::error_listing(&records);

        tracing::info!(
            "容量核對完成，耗時 {:?}：成功 {} 筆，無儲位 {} 筆，無容積 {} 筆",
            start_time.elapsed(),
            errors.success_count,
            errors.no_position_count,
            errors.no_capacity_count
        );

        Ok(ReconcileResult {
            run_id: None,
            started_at,
            records,
            summary,
            structure_status,
            totals,
            errors,
            warnings: Vec::new(),
            calculation_time_ms: Some(start_time.elapsed().as_millis()),
        })
    }

    /// 評估所有需求明細，輸出保持輸入順序
    fn evaluate_all(
        &self,
        index: &PositionIndex,
        lines: &[DemandLine],
    ) -> bincap_core::Result<Vec<AllocationRecord>> {
        let per_line: Vec<Vec<AllocationRecord>> = if self.config.parallel {
            lines
                .par_iter()
                .map(|line| CapacityEvaluator::evaluate_line(line, index.candidates(line)))
                .collect::<bincap_core::Result<_>>()?
        } else {
            lines
                .iter()
                .map(|line| CapacityEvaluator::evaluate_line(line, index.candidates(line)))
                .collect::<bincap_core::Result<_>>()?
        };

        Ok(per_line.into_iter().flatten().collect())
    }

    /// 獲取配置引用
    pub fn config(&self) -> &ReconcileConfig {
        &self.config
    }

    /// 獲取目錄引用
    pub fn catalog(&self) -> &ReferenceCatalog {
        &self.catalog
    }
}
