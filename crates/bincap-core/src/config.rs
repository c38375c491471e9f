//! 核對配置模型

use serde::{Deserialize, Serialize};

use crate::{BinCapError, Result};

/// 容量核對配置
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ReconcileConfig {
    /// 欄位名稱對照
    pub columns: ColumnMapping,

    /// 收貨方代碼補零寬度
    pub receiver_id_width: usize,

    /// 作業區域取前幾個字元作為結構代碼
    pub structure_prefix_len: usize,

    /// 結構代碼補零寬度
    pub structure_code_width: usize,

    /// 重量以公克表示時的單位標記
    pub gram_marker: String,

    /// 體積以毫升表示時的單位標記
    pub millilitre_marker: String,

    /// 是否以多執行緒評估需求明細
    ///
    /// 各明細只讀共用的目錄資料，輸出順序不受影響。
    pub parallel: bool,
}

impl Default for ReconcileConfig {
    fn default() -> Self {
        Self {
            columns: ColumnMapping::default(),
            receiver_id_width: 5,
            structure_prefix_len: 2,
            structure_code_width: 4,
            gram_marker: "G".to_string(),
            millilitre_marker: "ML".to_string(),
            parallel: false,
        }
    }
}

impl ReconcileConfig {
    /// 創建預設配置
    pub fn new() -> Self {
        Self::default()
    }

    /// 從 JSON 讀取配置，缺少的欄位使用預設值
    pub fn from_json_str(json: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(json)
            .map_err(|e| BinCapError::InvalidConfig(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// 建構器模式：設置欄位對照
    pub fn with_columns(mut self, columns: ColumnMapping) -> Self {
        self.columns = columns;
        self
    }

    /// 建構器模式：設置是否平行評估
    pub fn with_parallel(mut self, parallel: bool) -> Self {
        self.parallel = parallel;
        self
    }

    /// 建構器模式：設置收貨方代碼寬度
    pub fn with_receiver_id_width(mut self, width: usize) -> Self {
        self.receiver_id_width = width;
        self
    }

    /// 建構器模式：設置結構代碼推導規則
    pub fn with_structure_rule(mut self, prefix_len: usize, width: usize) -> Self {
        self.structure_prefix_len = prefix_len;
        self.structure_code_width = width;
        self
    }

    /// 建構器模式：設置單位標記
    pub fn with_unit_markers(mut self, gram: &str, millilitre: &str) -> Self {
        self.gram_marker = gram.to_string();
        self.millilitre_marker = millilitre.to_string();
        self
    }

    /// 檢查配置是否可用
    pub fn validate(&self) -> Result<()> {
        if self.structure_prefix_len == 0 {
            return Err(BinCapError::InvalidConfig(
                "structure_prefix_len 必須大於 0".to_string(),
            ));
        }
        if self.structure_code_width == 0 {
            return Err(BinCapError::InvalidConfig(
                "structure_code_width 必須大於 0".to_string(),
            ));
        }
        Ok(())
    }
}

/// 輸入關聯的欄位名稱對照
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ColumnMapping {
    // 需求明細
    pub line_product_id: String,
    pub line_requested_qty: String,
    pub line_receiver_id: String,
    pub line_weight: String,
    pub line_weight_unit: String,
    pub line_volume: String,
    pub line_volume_unit: String,
    pub line_activity_area: String,

    // 產品儲位
    pub position_position_id: String,
    pub position_structure_code: String,
    pub position_storage_area: String,
    pub position_product_id: String,
    /// 選填欄位
    pub position_product_description: String,

    // 料箱類型目錄
    pub bin_type_id: String,
    pub bin_type_max_volume: String,

    // 儲位料箱配置
    pub assignment_position_id: String,
    pub assignment_structure_code: String,
    pub assignment_bin_type_id: String,
    pub assignment_bins_available: String,
    pub assignment_structure_description: String,
}

impl Default for ColumnMapping {
    fn default() -> Self {
        Self {
            line_product_id: "product_id".to_string(),
            line_requested_qty: "requested_qty".to_string(),
            line_receiver_id: "receiver_id".to_string(),
            line_weight: "weight".to_string(),
            line_weight_unit: "weight_unit".to_string(),
            line_volume: "volume".to_string(),
            line_volume_unit: "volume_unit".to_string(),
            line_activity_area: "activity_area".to_string(),

            position_position_id: "position_id".to_string(),
            position_structure_code: "structure_code".to_string(),
            position_storage_area: "storage_area".to_string(),
            position_product_id: "product_id".to_string(),
            position_product_description: "product_description".to_string(),

            bin_type_id: "bin_type_id".to_string(),
            bin_type_max_volume: "max_volume_l".to_string(),

            assignment_position_id: "position_id".to_string(),
            assignment_structure_code: "structure_code".to_string(),
            assignment_bin_type_id: "bin_type_id".to_string(),
            assignment_bins_available: "bins_available".to_string(),
            assignment_structure_description: "structure_description".to_string(),
        }
    }
}

impl ColumnMapping {
    /// 倉儲系統匯出試算表的原始欄位名稱
    ///
    /// 目錄表的標題在匯入時已將空白替換為底線。
    pub fn original_headers() -> Self {
        Self {
            line_product_id: "Produto".to_string(),
            line_requested_qty: "Qtd.solicitada total".to_string(),
            line_receiver_id: "Recebedor mercadoria".to_string(),
            line_weight: "Peso".to_string(),
            line_weight_unit: "UM peso".to_string(),
            line_volume: "Volume".to_string(),
            line_volume_unit: "UM volume".to_string(),
            line_activity_area: "Área de atividade".to_string(),

            position_position_id: "Posição no depósito".to_string(),
            position_structure_code: "Tipo de depósito".to_string(),
            position_storage_area: "Área armazmto".to_string(),
            position_product_id: "Produto".to_string(),
            position_product_description: "Descrição breve do produto".to_string(),

            bin_type_id: "Tipo".to_string(),
            bin_type_max_volume: "Volume_(L)".to_string(),

            assignment_position_id: "Posição_no_depósito".to_string(),
            assignment_structure_code: "Tipo_de_depósito".to_string(),
            assignment_bin_type_id: "Tipo".to_string(),
            assignment_bins_available: "Qtd._Caixas_BIN_ABASTECIMENTO".to_string(),
            assignment_structure_description: "Estrutura".to_string(),
        }
    }

    /// 需求明細的必要欄位（依檢查順序）
    pub fn required_line_columns(&self) -> [&str; 8] {
        [
            self.line_product_id.as_str(),
            self.line_requested_qty.as_str(),
            self.line_receiver_id.as_str(),
            self.line_weight.as_str(),
            self.line_weight_unit.as_str(),
            self.line_volume.as_str(),
            self.line_volume_unit.as_str(),
            self.line_activity_area.as_str(),
        ]
    }

    /// 產品儲位的必要欄位（依檢查順序）
    pub fn required_position_columns(&self) -> [&str; 4] {
        [
            self.position_position_id.as_str(),
            self.position_structure_code.as_str(),
            self.position_storage_area.as_str(),
            self.position_product_id.as_str(),
        ]
    }
}
