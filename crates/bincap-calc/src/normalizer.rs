//! 需求正規化（原始資料列 → 標準單位）

use std::str::FromStr;

use bincap_core::demand::{structure_code_from_activity_area, zero_pad};
use bincap_core::{
    BinType, DemandLine, PositionBinAssignment, ReconcileConfig, StorageProductPosition, Table,
};
use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;

use crate::ReconcileWarning;

/// 正規化輸出：資料與修正過程中的警告
#[derive(Debug, Clone)]
pub struct Normalized<T> {
    pub items: Vec<T>,
    pub warnings: Vec<ReconcileWarning>,
}

impl<T> Normalized<T> {
    fn new() -> Self {
        Self {
            items: Vec::new(),
            warnings: Vec::new(),
        }
    }

    fn warn(&mut self, relation: &str, row: usize, message: String) {
        tracing::warn!("{} 第 {} 列: {}", relation, row, message);
        self.warnings.push(ReconcileWarning::warning(
            format!("{}#{}", relation, row),
            message,
        ));
    }
}

/// 需求正規化器
pub struct DemandNormalizer;

impl DemandNormalizer {
    /// 正規化需求明細
    ///
    /// 缺少任何必要欄位即中止整批，錯誤訊息指出第一個缺少的欄位。
    pub fn normalize_demand(
        table: &Table,
        config: &ReconcileConfig,
    ) -> bincap_core::Result<Normalized<DemandLine>> {
        let cols = &config.columns;
        let idx = table.require_columns(&cols.required_line_columns())?;
        table.check_row_widths()?;

        let (product, qty, receiver, weight, weight_unit, volume, volume_unit, area) =
            (idx[0], idx[1], idx[2], idx[3], idx[4], idx[5], idx[6], idx[7]);

        let mut out = Normalized::new();
        for (row_no, row) in table.rows.iter().enumerate() {
            let requested_qty = match parse_quantity(&row[qty]) {
                Some(q) => q,
                None => {
                    if !row[qty].trim().is_empty() {
                        out.warn(
                            &table.name,
                            row_no,
                            format!("需求數量 '{}' 無法解析，以 1 計算", row[qty]),
                        );
                    }
                    1
                }
            };

            let mut weight_kg = Self::coerce_measure(&mut out, &table.name, row_no, "重量", &row[weight]);
            if row[weight_unit].trim() == config.gram_marker {
                weight_kg /= Decimal::ONE_THOUSAND;
            }

            let mut volume_l = Self::coerce_measure(&mut out, &table.name, row_no, "體積", &row[volume]);
            if row[volume_unit].trim() == config.millilitre_marker {
                volume_l /= Decimal::ONE_THOUSAND;
            }

            let line = DemandLine::new(
                row[product].trim().to_string(),
                zero_pad(row[receiver].trim(), config.receiver_id_width),
                structure_code_from_activity_area(
                    &row[area],
                    config.structure_prefix_len,
                    config.structure_code_width,
                ),
                requested_qty,
                weight_kg,
                volume_l,
            )
            .with_source_row(row_no);

            out.items.push(line);
        }

        tracing::debug!("需求明細正規化完成: {} 筆", out.items.len());
        Ok(out)
    }

    /// 正規化產品儲位
    pub fn normalize_positions(
        table: &Table,
        config: &ReconcileConfig,
    ) -> bincap_core::Result<Normalized<StorageProductPosition>> {
        let cols = &config.columns;
        let idx = table.require_columns(&cols.required_position_columns())?;
        let description = table.column_index(&cols.position_product_description);
        table.check_row_widths()?;

        let mut out = Normalized::new();
        for row in &table.rows {
            let mut position = StorageProductPosition::new(
                row[idx[3]].trim().to_string(),
                row[idx[0]].trim().to_string(),
                zero_pad(row[idx[1]].trim(), config.structure_code_width),
                row[idx[2]].trim().to_string(),
            );
            if let Some(desc) = description.map(|i| row[i].trim()).filter(|d| !d.is_empty()) {
                position = position.with_product_description(desc.to_string());
            }
            out.items.push(position);
        }

        tracing::debug!("產品儲位正規化完成: {} 筆", out.items.len());
        Ok(out)
    }

    /// 正規化料箱類型目錄
    ///
    /// 容積無法解析時視為 0，計算時會成為「料箱無容積」。
    pub fn normalize_bin_types(
        table: &Table,
        config: &ReconcileConfig,
    ) -> bincap_core::Result<Normalized<BinType>> {
        let cols = &config.columns;
        let idx = table.require_columns(&[cols.bin_type_id.as_str(), cols.bin_type_max_volume.as_str()])?;
        table.check_row_widths()?;

        let mut out = Normalized::new();
        for (row_no, row) in table.rows.iter().enumerate() {
            let max_volume = Self::coerce_measure(&mut out, &table.name, row_no, "容積", &row[idx[1]]);
            out.items
                .push(BinType::new(row[idx[0]].trim().to_string(), max_volume));
        }

        Ok(out)
    }

    /// 正規化儲位料箱配置
    pub fn normalize_assignments(
        table: &Table,
        config: &ReconcileConfig,
    ) -> bincap_core::Result<Normalized<PositionBinAssignment>> {
        let cols = &config.columns;
        let idx = table.require_columns(&[
            cols.assignment_position_id.as_str(),
            cols.assignment_structure_code.as_str(),
            cols.assignment_bin_type_id.as_str(),
            cols.assignment_bins_available.as_str(),
        ])?;
        let description = table.column_index(&cols.assignment_structure_description);
        table.check_row_widths()?;

        let mut out = Normalized::new();
        for (row_no, row) in table.rows.iter().enumerate() {
            let raw_bins = &row[idx[3]];
            let bins_available = parse_bin_count(raw_bins);
            if bins_available.is_none() && !raw_bins.trim().is_empty() {
                out.warn(
                    &table.name,
                    row_no,
                    format!("可用料箱數 '{}' 無法解析", raw_bins),
                );
            }

            let mut assignment = PositionBinAssignment::new(
                row[idx[0]].trim().to_string(),
                zero_pad(row[idx[1]].trim(), config.structure_code_width),
                row[idx[2]].trim().to_string(),
                0,
            )
            .with_bins_available(bins_available);
            if let Some(desc) = description.map(|i| row[i].trim()).filter(|d| !d.is_empty()) {
                assignment = assignment.with_structure_description(desc.to_string());
            }
            out.items.push(assignment);
        }

        Ok(out)
    }

    /// 重量、體積、容積：無法解析或為負值時視為 0
    fn coerce_measure<T>(
        out: &mut Normalized<T>,
        relation: &str,
        row: usize,
        field: &str,
        raw: &str,
    ) -> Decimal {
        match parse_decimal(raw) {
            Some(value) if value >= Decimal::ZERO => value,
            Some(value) => {
                out.warn(relation, row, format!("{} {} 為負值，以 0 計算", field, value));
                Decimal::ZERO
            }
            None => {
                if !raw.trim().is_empty() {
                    out.warn(relation, row, format!("{} '{}' 無法解析，以 0 計算", field, raw));
                }
                Decimal::ZERO
            }
        }
    }
}

/// 解析數值：允許小數逗號（"1,5"）與科學記號
pub fn parse_decimal(raw: &str) -> Option<Decimal> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return None;
    }
    let normalized = if trimmed.contains(',') && !trimmed.contains('.') {
        trimmed.replace(',', ".")
    } else {
        trimmed.to_string()
    };
    Decimal::from_str(&normalized)
        .or_else(|_| Decimal::from_scientific(&normalized))
        .ok()
}

/// 解析需求數量：小數無條件進位，小於 1 視為無效
pub fn parse_quantity(raw: &str) -> Option<u64> {
    let value = parse_decimal(raw)?;
    if value < Decimal::ONE {
        return None;
    }
    value.ceil().to_u64()
}

/// 解析料箱數：小數捨去，負值視為無效
pub fn parse_bin_count(raw: &str) -> Option<u64> {
    let value = parse_decimal(raw)?;
    if value < Decimal::ZERO {
        return None;
    }
    value.trunc().to_u64()
}

#[cfg(test)]
mod tests {
    use super::*;
    use bincap_core::{BinCapError, ColumnMapping};
    use rstest::rstest;

    const LINE_HEADERS: [&str; 8] = [
        "product_id",
        "requested_qty",
        "receiver_id",
        "weight",
        "weight_unit",
        "volume",
        "volume_unit",
        "activity_area",
    ];

    #[rstest]
    #[case("15", Some(Decimal::from(15)))]
    #[case(" 1.5 ", Some(Decimal::new(15, 1)))]
    #[case("1,5", Some(Decimal::new(15, 1)))]
    #[case("1e3", Some(Decimal::from(1000)))]
    #[case("abc", None)]
    #[case("", None)]
    fn test_parse_decimal(#[case] raw: &str, #[case] expected: Option<Decimal>) {
        assert_eq!(parse_decimal(raw), expected);
    }

    #[rstest]
    #[case("10", Some(10))]
    #[case("2.5", Some(3))]
    #[case("0", None)]
    #[case("-4", None)]
    #[case("n/a", None)]
    fn test_parse_quantity(#[case] raw: &str, #[case] expected: Option<u64>) {
        assert_eq!(parse_quantity(raw), expected);
    }

    #[test]
    fn test_normalize_demand_units_and_padding() {
        let table = Table::from_rows(
            "base_item_pacotes",
            &LINE_HEADERS,
            &[
                &["P1", "10", "42", "2500", "G", "15000", "ML", "12AB"],
                &["P2", "4", "12345", "3", "KG", "8", "L", "7"],
            ],
        );

        let out = DemandNormalizer::normalize_demand(&table, &ReconcileConfig::default()).unwrap();
        assert_eq!(out.items.len(), 2);
        assert!(out.warnings.is_empty());

        let first = &out.items[0];
        assert_eq!(first.receiver_id, "00042");
        assert_eq!(first.structure_code, "0012");
        assert_eq!(first.total_weight_kg, Decimal::new(25, 1));
        assert_eq!(first.total_volume_l, Decimal::from(15));
        assert_eq!(first.unit_volume_l, Decimal::new(15, 1));
        assert_eq!(first.source_row, Some(0));

        let second = &out.items[1];
        assert_eq!(second.receiver_id, "12345");
        assert_eq!(second.structure_code, "0007");
        assert_eq!(second.total_weight_kg, Decimal::from(3));
        assert_eq!(second.unit_volume_l, Decimal::from(2));
    }

    #[test]
    fn test_normalize_demand_fallbacks() {
        let table = Table::from_rows(
            "lines",
            &LINE_HEADERS,
            &[&["P1", "x", "1", "heavy", "KG", "", "L", "01"]],
        );

        let out = DemandNormalizer::normalize_demand(&table, &ReconcileConfig::default()).unwrap();
        let line = &out.items[0];

        assert_eq!(line.requested_qty, 1);
        assert_eq!(line.total_weight_kg, Decimal::ZERO);
        assert_eq!(line.total_volume_l, Decimal::ZERO);
        // 數量與重量無法解析；空白體積不產生警告
        assert_eq!(out.warnings.len(), 2);
    }

    #[test]
    fn test_missing_column_aborts() {
        let table = Table::from_rows(
            "lines",
            &["product_id", "requested_qty", "receiver_id", "weight"],
            &[&["P1", "1", "1", "1"]],
        );

        let err = DemandNormalizer::normalize_demand(&table, &ReconcileConfig::default()).unwrap_err();
        assert!(matches!(
            err,
            BinCapError::MissingColumn { ref column, .. } if column == "weight_unit"
        ));
    }

    #[test]
    fn test_original_headers() {
        let config = ReconcileConfig::default().with_columns(ColumnMapping::original_headers());
        let table = Table::from_rows(
            "base_item_pacotes",
            &[
                "Produto",
                "Qtd.solicitada total",
                "Recebedor mercadoria",
                "Peso",
                "UM peso",
                "Volume",
                "UM volume",
                "Área de atividade",
            ],
            &[&["100200", "6", "77", "1,2", "KG", "3", "L", "5A1"]],
        );

        let out = DemandNormalizer::normalize_demand(&table, &config).unwrap();
        assert_eq!(out.items[0].product_id, "100200");
        assert_eq!(out.items[0].receiver_id, "00077");
        assert_eq!(out.items[0].structure_code, "005A");
        assert_eq!(out.items[0].total_weight_kg, Decimal::new(12, 1));
    }

    #[test]
    fn test_normalize_positions() {
        let table = Table::from_rows(
            "info_posicao_produtos",
            &["position_id", "structure_code", "storage_area", "product_id", "product_description"],
            &[
                &["POS-01", "1", "A1", "P1", "Widget"],
                &["POS-02", "0002", "A2", "P2", ""],
            ],
        );

        let out = DemandNormalizer::normalize_positions(&table, &ReconcileConfig::default()).unwrap();
        assert_eq!(out.items[0].structure_code, "0001");
        assert_eq!(out.items[0].product_description.as_deref(), Some("Widget"));
        assert_eq!(out.items[1].structure_code, "0002");
        assert_eq!(out.items[1].product_description, None);
    }

    #[test]
    fn test_positions_without_description_column() {
        let table = Table::from_rows(
            "positions",
            &["position_id", "structure_code", "storage_area", "product_id"],
            &[&["POS-01", "0001", "A1", "P1"]],
        );

        let out = DemandNormalizer::normalize_positions(&table, &ReconcileConfig::default()).unwrap();
        assert_eq!(out.items.len(), 1);
        assert_eq!(out.items[0].product_description, None);
    }

    #[test]
    fn test_normalize_catalog_relations() {
        let config = ReconcileConfig::default();
        let bin_types = Table::from_rows(
            "info_tipo_bin",
            &["bin_type_id", "max_volume_l"],
            &[&[" B1 ", "10,5"], &["B2", "?"]],
        );
        let assignments = Table::from_rows(
            "info_posicao_bin",
            &["position_id", "structure_code", "bin_type_id", "bins_available", "structure_description"],
            &[&["POS-01", "1", "B1", "2", "Flow rack"], &["POS-02", "0001", "B2", "", ""]],
        );

        let types = DemandNormalizer::normalize_bin_types(&bin_types, &config).unwrap();
        assert_eq!(types.items[0].bin_type_id, "B1");
        assert_eq!(types.items[0].max_volume_l, Decimal::new(105, 1));
        assert_eq!(types.items[1].max_volume_l, Decimal::ZERO);
        assert_eq!(types.warnings.len(), 1);

        let assigned = DemandNormalizer::normalize_assignments(&assignments, &config).unwrap();
        assert_eq!(assigned.items[0].structure_code, "0001");
        assert_eq!(assigned.items[0].bins_available, Some(2));
        assert_eq!(assigned.items[0].structure_description.as_deref(), Some("Flow rack"));
        assert_eq!(assigned.items[1].bins_available, None);
        assert_eq!(assigned.items[1].structure_description, None);
    }
}
