//! 配置結果模型（核對計算輸出）

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// 容量核對成功時的數值
///
/// 差額不儲存，每次使用時由 可用 − 需要 重新推導。
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CapacityFit {
    /// 需要料箱數
    pub bins_needed: u64,

    /// 可用料箱數
    pub bins_available: u64,

    /// 可滿足數量
    pub quantity_fulfilled: u64,

    /// 可滿足體積（公升，未四捨五入）
    pub volume_fulfilled: Decimal,

    /// 儲位最大容積（公升，未四捨五入）
    pub max_capacity_volume: Decimal,
}

impl CapacityFit {
    /// 差額（正值為剩餘，負值為短缺）
    pub fn difference(&self) -> i64 {
        bins_difference(self.bins_available, self.bins_needed)
    }

    /// 是否短缺
    pub fn is_shortage(&self) -> bool {
        self.bins_available < self.bins_needed
    }
}

/// 料箱差額 可用 − 需要，超出 i64 範圍時取邊界值
pub fn bins_difference(bins_available: u64, bins_needed: u64) -> i64 {
    let diff = i128::from(bins_available) - i128::from(bins_needed);
    i64::try_from(diff).unwrap_or(if diff < 0 { i64::MIN } else { i64::MAX })
}

/// 單筆配置的可恢復錯誤
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, thiserror::Error)]
pub enum AllocationError {
    /// 產品在該結構下沒有任何儲位
    #[error("錯誤：產品無儲位")]
    NoPosition,

    /// 儲位的料箱類型沒有有效容積
    #[error("錯誤：料箱無容積")]
    NoCapacity {
        /// 已知的可用料箱數，未知時為 0
        bins_available: u64,
    },
}

/// 配置結果：成功數值或錯誤標記
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum AllocationOutcome {
    Success(CapacityFit),
    Error(AllocationError),
}

/// 需求明細 × 儲位 的配置記錄
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AllocationRecord {
    /// 產品ID
    pub product_id: String,

    /// 收貨方
    pub receiver_id: String,

    /// 結構代碼
    pub structure_code: String,

    /// 儲位ID（無儲位時為空，報表顯示為 N/A）
    pub position_id: Option<String>,

    /// 料箱類型ID
    pub bin_type_id: Option<String>,

    /// 結構說明
    pub structure_description: Option<String>,

    /// 產品說明
    pub product_description: Option<String>,

    /// 來源需求資料列
    pub source_row: Option<usize>,

    /// 配置結果
    pub outcome: AllocationOutcome,
}

impl AllocationRecord {
    /// 創建新的配置記錄
    pub fn new(
        product_id: String,
        receiver_id: String,
        structure_code: String,
        outcome: AllocationOutcome,
    ) -> Self {
        Self {
            product_id,
            receiver_id,
            structure_code,
            position_id: None,
            bin_type_id: None,
            structure_description: None,
            product_description: None,
            source_row: None,
            outcome,
        }
    }

    /// 建構器模式：設置儲位
    pub fn with_position_id(mut self, position_id: Option<String>) -> Self {
        self.position_id = position_id;
        self
    }

    /// 建構器模式：設置料箱類型
    pub fn with_bin_type_id(mut self, bin_type_id: Option<String>) -> Self {
        self.bin_type_id = bin_type_id;
        self
    }

    /// 建構器模式：設置結構與產品說明
    pub fn with_descriptions(
        mut self,
        structure_description: Option<String>,
        product_description: Option<String>,
    ) -> Self {
        self.structure_description = structure_description;
        self.product_description = product_description;
        self
    }

    /// 建構器模式：設置來源資料列
    pub fn with_source_row(mut self, row: Option<usize>) -> Self {
        self.source_row = row;
        self
    }

    /// 成功時的數值
    pub fn fit(&self) -> Option<&CapacityFit> {
        match &self.outcome {
            AllocationOutcome::Success(fit) => Some(fit),
            AllocationOutcome::Error(_) => None,
        }
    }

    /// 錯誤標記
    pub fn error(&self) -> Option<AllocationError> {
        match &self.outcome {
            AllocationOutcome::Success(_) => None,
            AllocationOutcome::Error(err) => Some(*err),
        }
    }

    /// 是否成功
    pub fn is_success(&self) -> bool {
        self.fit().is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fit(needed: u64, available: u64) -> CapacityFit {
        CapacityFit {
            bins_needed: needed,
            bins_available: available,
            quantity_fulfilled: 10,
            volume_fulfilled: Decimal::from(15),
            max_capacity_volume: Decimal::from(20),
        }
    }

    #[test]
    fn test_difference_is_derived() {
        assert_eq!(fit(2, 2).difference(), 0);
        assert_eq!(fit(2, 1).difference(), -1);
        assert_eq!(fit(0, 3).difference(), 3);
        assert!(fit(2, 1).is_shortage());
        assert!(!fit(2, 2).is_shortage());
    }

    #[test]
    fn test_record_accessors() {
        let ok = AllocationRecord::new(
            "P1".to_string(),
            "00001".to_string(),
            "0001".to_string(),
            AllocationOutcome::Success(fit(1, 1)),
        )
        .with_position_id(Some("POS-01".to_string()))
        .with_bin_type_id(Some("B1".to_string()));

        assert!(ok.is_success());
        assert_eq!(ok.error(), None);
        assert_eq!(ok.fit().map(|f| f.bins_needed), Some(1));

        let err = AllocationRecord::new(
            "P2".to_string(),
            "00001".to_string(),
            "0001".to_string(),
            AllocationOutcome::Error(AllocationError::NoPosition),
        );

        assert!(!err.is_success());
        assert_eq!(err.error(), Some(AllocationError::NoPosition));
        assert_eq!(err.position_id, None);
    }

    #[test]
    fn test_bins_difference_saturates() {
        assert_eq!(bins_difference(2, 3), -1);
        assert_eq!(bins_difference(u64::MAX, 0), i64::MAX);
        assert_eq!(bins_difference(0, u64::MAX), i64::MIN);

        let fit = CapacityFit {
            bins_needed: 1,
            bins_available: 10_000_000_000_000_000_000,
            quantity_fulfilled: 1,
            volume_fulfilled: Decimal::ONE,
            max_capacity_volume: Decimal::ONE,
        };
        assert_eq!(fit.difference(), i64::MAX);
    }

    #[test]
    fn test_error_messages() {
        assert_eq!(AllocationError::NoPosition.to_string(), "錯誤：產品無儲位");
        assert_eq!(
            AllocationError::NoCapacity { bins_available: 3 }.to_string(),
            "錯誤：料箱無容積"
        );
    }
}
