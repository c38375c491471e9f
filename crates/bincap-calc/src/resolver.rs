//! 儲位解析（需求 → 候選儲位）

use std::collections::HashMap;

use bincap_core::demand::zero_pad;
use bincap_core::{
    BinType, DemandLine, PositionBinAssignment, ReferenceCatalog, StorageProductPosition,
};
use rust_decimal::Decimal;

/// 目錄連接後的一筆候選儲位
///
/// 產品儲位 ⟕ 料箱配置 ⟕ 料箱類型；右側缺失的欄位保持為空。
#[derive(Debug, Clone, PartialEq)]
pub struct CatalogEntry {
    /// 產品儲位（左表）
    pub position: StorageProductPosition,

    /// 料箱類型ID（無料箱配置時為空）
    pub bin_type_id: Option<String>,

    /// 可用料箱數
    pub bins_available: Option<u64>,

    /// 結構說明
    pub structure_description: Option<String>,

    /// 單箱最大容積（料箱類型不在目錄中時為空）
    pub max_volume_l: Option<Decimal>,
}

impl CatalogEntry {
    fn join(
        position: &StorageProductPosition,
        assignment: Option<&PositionBinAssignment>,
        bin_types: &HashMap<&str, &BinType>,
    ) -> Self {
        let max_volume_l = assignment
            .and_then(|a| bin_types.get(a.bin_type_id.as_str()))
            .map(|b| b.max_volume_l);

        Self {
            position: position.clone(),
            bin_type_id: assignment.map(|a| a.bin_type_id.clone()),
            bins_available: assignment.and_then(|a| a.bins_available),
            structure_description: assignment.and_then(|a| a.structure_description.clone()),
            max_volume_l,
        }
    }

    /// 可用於計算的容積（大於 0）
    pub fn usable_volume(&self) -> Option<Decimal> {
        self.max_volume_l.filter(|v| *v > Decimal::ZERO)
    }
}

/// (產品, 結構) → 候選儲位 索引
#[derive(Debug, Clone, Default)]
pub struct PositionIndex {
    entries: HashMap<(String, String), Vec<CatalogEntry>>,
    structure_code_width: usize,
}

impl PositionIndex {
    /// 建立索引
    ///
    /// 結構代碼兩側都補零到 `structure_code_width` 後再比對。
    /// 同一儲位有多筆料箱配置時各自成為一筆候選；
    /// 料箱類型ID重複時以第一筆為準。
    pub fn build(
        positions: &[StorageProductPosition],
        catalog: &ReferenceCatalog,
        structure_code_width: usize,
    ) -> Self {
        let mut bin_types: HashMap<&str, &BinType> = HashMap::new();
        for bin_type in &catalog.bin_types {
            if bin_types.contains_key(bin_type.bin_type_id.as_str()) {
                tracing::warn!("料箱類型 {} 重複，保留第一筆", bin_type.bin_type_id);
                continue;
            }
            bin_types.insert(bin_type.bin_type_id.as_str(), bin_type);
        }

        let mut assignments: HashMap<(&str, String), Vec<&PositionBinAssignment>> = HashMap::new();
        for assignment in &catalog.assignments {
            assignments
                .entry((
                    assignment.position_id.as_str(),
                    zero_pad(&assignment.structure_code, structure_code_width),
                ))
                .or_insert_with(Vec::new)
                .push(assignment);
        }

        let mut entries: HashMap<(String, String), Vec<CatalogEntry>> = HashMap::new();
        for position in positions {
            let structure = zero_pad(&position.structure_code, structure_code_width);
            let bucket = entries
                .entry((position.product_id.clone(), structure.clone()))
                .or_insert_with(Vec::new);

            match assignments.get(&(position.position_id.as_str(), structure)) {
                Some(matched) => {
                    for &assignment in matched {
                        bucket.push(CatalogEntry::join(position, Some(assignment), &bin_types));
                    }
                }
                None => {
                    tracing::debug!(
                        "儲位 {} 沒有料箱配置（產品 {}）",
                        position.position_id,
                        position.product_id
                    );
                    bucket.push(CatalogEntry::join(position, None, &bin_types));
                }
            }
        }

        tracing::debug!(
            "儲位索引建立完成: {} 組 (產品, 結構), {} 筆候選",
            entries.len(),
            entries.values().map(Vec::len).sum::<usize>()
        );

        Self {
            entries,
            structure_code_width,
        }
    }

    /// 查詢需求明細的候選儲位（依目錄順序）
    pub fn candidates(&self, line: &DemandLine) -> &[CatalogEntry] {
        let key = (
            line.product_id.clone(),
            zero_pad(&line.structure_code, self.structure_code_width),
        );
        self.entries.get(&key).map(Vec::as_slice).unwrap_or(&[])
    }

    /// 候選儲位總數
    pub fn len(&self) -> usize {
        self.entries.values().map(Vec::len).sum()
    }

    /// 是否沒有任何候選
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
