//! 簡單料箱容量核對示例
//!
//! 執行：`RUST_LOG=debug cargo run --example simple_check`

use anyhow::Context;
use bincap::bincap_core::{BinType, PositionBinAssignment};
use bincap::{BinCapacityReconciler, ReconcileConfig, ReconcileReport, ReferenceCatalog, RunController, Table};
use rust_decimal::Decimal;
use tracing_subscriber::{fmt, EnvFilter};

fn main() -> anyhow::Result<()> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    fmt().with_env_filter(filter).with_target(true).init();

    println!("=== 簡單料箱容量核對示例 ===\n");

    // 參考目錄：料箱類型與儲位料箱配置
    let catalog = ReferenceCatalog::default()
        .with_bin_type(BinType::new("BIN-S".to_string(), Decimal::from(10)))
        .with_bin_type(BinType::new("BIN-X".to_string(), Decimal::ZERO))
        .with_assignment(
            PositionBinAssignment::new("01-01-A".to_string(), "1".to_string(), "BIN-S".to_string(), 2)
                .with_structure_description("Flow rack".to_string()),
        )
        .with_assignment(PositionBinAssignment::new(
            "01-02-A".to_string(),
            "1".to_string(),
            "BIN-S".to_string(),
            1,
        ))
        .with_assignment(PositionBinAssignment::new(
            "02-01-A".to_string(),
            "2".to_string(),
            "BIN-X".to_string(),
            4,
        ));

    let lines = Table::from_rows(
        "lines",
        &[
            "product_id",
            "requested_qty",
            "receiver_id",
            "weight",
            "weight_unit",
            "volume",
            "volume_unit",
            "activity_area",
        ],
        &[
            &["SKU-100", "10", "17", "3,5", "KG", "15", "L", "01-PICK"],
            &["SKU-200", "8", "17", "800", "G", "12000", "ML", "01-PICK"],
            &["SKU-300", "2", "23", "1", "KG", "4", "L", "02-BULK"],
            &["SKU-999", "1", "23", "1", "KG", "1", "L", "01-PICK"],
        ],
    );

    let positions = Table::from_rows(
        "positions",
        &["position_id", "structure_code", "storage_area", "product_id", "product_description"],
        &[
            &["01-01-A", "1", "001", "SKU-100", "Parafuso M6"],
            &["01-02-A", "1", "001", "SKU-200", "Arruela"],
            &["02-01-A", "2", "002", "SKU-300", "Caixa grande"],
        ],
    );

    let reconciler = BinCapacityReconciler::new(ReconcileConfig::default(), catalog);
    let controller = RunController::new();
    let result = controller
        .submit(&reconciler, &lines, &positions)
        .context("容量核對失敗")?;

    let report = ReconcileReport::from_result(&result);
    println!("{}", report.render_text());

    for warning in &result.warnings {
        println!("警告 [{}]: {}", warning.subject, warning.message);
    }

    Ok(())
}
