//! 容量評估（需求明細 × 候選儲位）

use bincap_core::{
    AllocationError, AllocationOutcome, AllocationRecord, BinCapError, CapacityFit, DemandLine,
};
use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;

use crate::resolver::CatalogEntry;

/// 容量評估器
pub struct CapacityEvaluator;

impl CapacityEvaluator {
    /// 評估一筆需求明細
    ///
    /// 每個候選儲位產生一筆記錄；沒有候選時產生一筆「產品無儲位」。
    pub fn evaluate_line(
        line: &DemandLine,
        candidates: &[CatalogEntry],
    ) -> bincap_core::Result<Vec<AllocationRecord>> {
        if candidates.is_empty() {
            tracing::debug!(
                "產品 {} 在結構 {} 沒有儲位",
                line.product_id,
                line.structure_code
            );
            return Ok(vec![Self::base_record(
                line,
                AllocationOutcome::Error(AllocationError::NoPosition),
            )]);
        }

        candidates
            .iter()
            .map(|entry| Self::evaluate_pair(line, entry))
            .collect()
    }

    /// 評估單一 (需求明細, 儲位) 組合
    pub fn evaluate_pair(
        line: &DemandLine,
        entry: &CatalogEntry,
    ) -> bincap_core::Result<AllocationRecord> {
        let bins_available = entry.bins_available.unwrap_or(0);

        let outcome = match entry.usable_volume() {
            None => {
                tracing::debug!(
                    "儲位 {} 的料箱類型 {:?} 沒有有效容積",
                    entry.position.position_id,
                    entry.bin_type_id
                );
                AllocationOutcome::Error(AllocationError::NoCapacity { bins_available })
            }
            Some(max_volume) => {
                let bins_needed = Self::bins_needed(line.total_volume(), max_volume)?;
                let quantity_fulfilled = bins_needed
                    .saturating_mul(line.requested_qty)
                    .min(line.requested_qty);
                let max_capacity_volume = Decimal::from(bins_available)
                    .checked_mul(max_volume)
                    .ok_or_else(|| {
                        BinCapError::CalculationError(format!(
                            "儲位 {} 最大容積溢位",
                            entry.position.position_id
                        ))
                    })?;

                AllocationOutcome::Success(CapacityFit {
                    bins_needed,
                    bins_available,
                    quantity_fulfilled,
                    volume_fulfilled: line.volume_for(quantity_fulfilled),
                    max_capacity_volume,
                })
            }
        };

        Ok(Self::base_record(line, outcome)
            .with_position_id(Some(entry.position.position_id.clone()))
            .with_bin_type_id(entry.bin_type_id.clone())
            .with_descriptions(
                entry.structure_description.clone(),
                entry.position.product_description.clone(),
            ))
    }

    /// 需要料箱數：滿足 n × 單箱容積 ≥ 總體積 的最小整數 n
    pub fn bins_needed(total_volume: Decimal, max_volume: Decimal) -> bincap_core::Result<u64> {
        if max_volume <= Decimal::ZERO {
            return Err(BinCapError::CalculationError(format!(
                "單箱容積必須大於 0，實際 {}",
                max_volume
            )));
        }
        if total_volume <= Decimal::ZERO {
            return Ok(0);
        }

        total_volume
            .checked_div(max_volume)
            .and_then(|ratio| ratio.ceil().to_u64())
            .ok_or_else(|| {
                BinCapError::CalculationError(format!(
                    "料箱數計算溢位：總體積 {}，單箱容積 {}",
                    total_volume, max_volume
                ))
            })
    }

    fn base_record(line: &DemandLine, outcome: AllocationOutcome) -> AllocationRecord {
        AllocationRecord::new(
            line.product_id.clone(),
            line.receiver_id.clone(),
            line.structure_code.clone(),
            outcome,
        )
        .with_source_row(line.source_row)
    }
}
