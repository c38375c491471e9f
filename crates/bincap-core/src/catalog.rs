//! 參考目錄模型（料箱類型、儲位料箱配置、產品儲位）

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// 料箱類型
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BinType {
    /// 料箱類型ID
    pub bin_type_id: String,

    /// 單箱最大容積（公升）
    pub max_volume_l: Decimal,
}

impl BinType {
    /// 創建新的料箱類型
    pub fn new(bin_type_id: String, max_volume_l: Decimal) -> Self {
        Self {
            bin_type_id,
            max_volume_l,
        }
    }

    /// 容積大於 0 才可用於計算
    pub fn is_usable(&self) -> bool {
        self.max_volume_l > Decimal::ZERO
    }
}

/// 儲位的料箱配置
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PositionBinAssignment {
    /// 儲位ID
    pub position_id: String,

    /// 結構代碼
    pub structure_code: String,

    /// 料箱類型ID
    pub bin_type_id: String,

    /// 可用料箱數（來源無法解析時為空）
    pub bins_available: Option<u64>,

    /// 結構說明
    pub structure_description: Option<String>,
}

impl PositionBinAssignment {
    /// 創建新的料箱配置
    pub fn new(
        position_id: String,
        structure_code: String,
        bin_type_id: String,
        bins_available: u64,
    ) -> Self {
        Self {
            position_id,
            structure_code,
            bin_type_id,
            bins_available: Some(bins_available),
            structure_description: None,
        }
    }

    /// 建構器模式：設置結構說明
    pub fn with_structure_description(mut self, description: String) -> Self {
        self.structure_description = Some(description);
        self
    }

    /// 建構器模式：設置可用料箱數（可為空）
    pub fn with_bins_available(mut self, bins: Option<u64>) -> Self {
        self.bins_available = bins;
        self
    }
}

/// 產品可存放的儲位
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StorageProductPosition {
    /// 產品ID
    pub product_id: String,

    /// 儲位ID
    pub position_id: String,

    /// 結構代碼
    pub structure_code: String,

    /// 儲存區
    pub storage_area: String,

    /// 產品說明
    pub product_description: Option<String>,
}

impl StorageProductPosition {
    /// 創建新的產品儲位
    pub fn new(
        product_id: String,
        position_id: String,
        structure_code: String,
        storage_area: String,
    ) -> Self {
        Self {
            product_id,
            position_id,
            structure_code,
            storage_area,
            product_description: None,
        }
    }

    /// 建構器模式：設置產品說明
    pub fn with_product_description(mut self, description: String) -> Self {
        self.product_description = Some(description);
        self
    }
}

/// 參考目錄快照
///
/// 由外部載入程序維護；單次批次計算期間唯讀。
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ReferenceCatalog {
    /// 料箱類型
    pub bin_types: Vec<BinType>,

    /// 儲位料箱配置
    pub assignments: Vec<PositionBinAssignment>,
}

impl ReferenceCatalog {
    /// 創建目錄快照
    pub fn new(bin_types: Vec<BinType>, assignments: Vec<PositionBinAssignment>) -> Self {
        Self {
            bin_types,
            assignments,
        }
    }

    /// 建構器模式：添加料箱類型
    pub fn with_bin_type(mut self, bin_type: BinType) -> Self {
        self.bin_types.push(bin_type);
        self
    }

    /// 建構器模式：添加料箱配置
    pub fn with_assignment(mut self, assignment: PositionBinAssignment) -> Self {
        self.assignments.push(assignment);
        self
    }

    /// 是否沒有任何資料
    pub fn is_empty(&self) -> bool {
        self.bin_types.is_empty() && self.assignments.is_empty()
    }
}
