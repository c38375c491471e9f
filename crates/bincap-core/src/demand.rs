//! 需求明細模型

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// 正規化後的需求明細（標準單位：公斤、公升）
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DemandLine {
    /// 產品ID
    pub product_id: String,

    /// 收貨方（已補零）
    pub receiver_id: String,

    /// 結構代碼（已補零）
    pub structure_code: String,

    /// 需求數量（至少為 1）
    pub requested_qty: u64,

    /// 總重量（公斤）
    pub total_weight_kg: Decimal,

    /// 總體積（公升）
    pub total_volume_l: Decimal,

    /// 單位體積（公升）= 總體積 / 需求數量
    pub unit_volume_l: Decimal,

    /// 來源資料列（從 0 起算）
    pub source_row: Option<usize>,
}

impl DemandLine {
    /// 創建新的需求明細
    ///
    /// 需求數量為 0 時視為 1，負值的重量與體積視為 0。
    pub fn new(
        product_id: String,
        receiver_id: String,
        structure_code: String,
        requested_qty: u64,
        total_weight_kg: Decimal,
        total_volume_l: Decimal,
    ) -> Self {
        let requested_qty = requested_qty.max(1);
        let total_weight_kg = total_weight_kg.max(Decimal::ZERO);
        let total_volume_l = total_volume_l.max(Decimal::ZERO);
        let unit_volume_l = total_volume_l / Decimal::from(requested_qty);

        Self {
            product_id,
            receiver_id,
            structure_code,
            requested_qty,
            total_weight_kg,
            total_volume_l,
            unit_volume_l,
            source_row: None,
        }
    }

    /// 建構器模式：設置來源資料列
    pub fn with_source_row(mut self, row: usize) -> Self {
        self.source_row = Some(row);
        self
    }

    /// 整筆需求的總體積（單位體積 × 需求數量）
    ///
    /// 直接回傳正規化時的總體積，避免除法再乘回造成的尾數誤差。
    pub fn total_volume(&self) -> Decimal {
        self.total_volume_l
    }

    /// 指定數量對應的體積
    pub fn volume_for(&self, quantity: u64) -> Decimal {
        if quantity == self.requested_qty {
            self.total_volume_l
        } else {
            self.unit_volume_l * Decimal::from(quantity)
        }
    }

    /// 用於比對目錄的鍵（產品, 結構）
    pub fn position_key(&self) -> (&str, &str) {
        (&self.product_id, &self.structure_code)
    }
}

/// 左側補零到指定寬度；已達寬度則原樣返回
pub fn zero_pad(value: &str, width: usize) -> String {
    let len = value.chars().count();
    if len >= width {
        return value.to_string();
    }
    let mut padded = "0".repeat(width - len);
    padded.push_str(value);
    padded
}

/// 由作業區域推導結構代碼：取前 `prefix_len` 個字元再補零到 `width`
///
/// 取 2 補 4 的規則沿用現行業務資料，尚未確認是否為刻意設計。
/// 原始欄位不修剪空白，前導空白也計入前綴。
pub fn structure_code_from_activity_area(activity_area: &str, prefix_len: usize, width: usize) -> String {
    let prefix: String = activity_area.chars().take(prefix_len).collect();
    zero_pad(&prefix, width)
}
