//! 批次執行控制（防止重入或重疊執行）

use std::sync::{Mutex, MutexGuard};

use bincap_core::{RunState, Table};
use uuid::Uuid;

use crate::reconciler::BinCapacityReconciler;
use crate::ReconcileResult;

/// 批次執行控制器，由宿主應用程式持有
///
/// 執行中收到的新批次直接拒絕，不排隊。
#[derive(Debug, Default)]
pub struct RunController {
    state: Mutex<RunState>,
}

impl RunController {
    /// 創建閒置的控制器
    pub fn new() -> Self {
        Self::default()
    }

    /// 目前狀態
    pub fn state(&self) -> RunState {
        self.lock().clone()
    }

    /// 是否正在執行
    pub fn is_running(&self) -> bool {
        self.lock().is_running()
    }

    /// 嘗試開始新批次
    pub fn try_begin(&self) -> bincap_core::Result<Uuid> {
        let result = self.lock().begin();
        if result.is_err() {
            tracing::warn!("已有批次正在執行，忽略新的提交");
        }
        result
    }

    /// 結束批次：依結果標記完成或失敗
    pub fn finish<T>(&self, outcome: &bincap_core::Result<T>) {
        let mut state = self.lock();
        match outcome {
            Ok(_) => state.complete(),
            Err(err) => {
                tracing::error!("批次執行失敗，捨棄所有輸出: {}", err);
                state.fail(err.to_string());
            }
        }
    }

    /// 提交一個批次並同步執行到結束
    pub fn submit(
        &self,
        reconciler: &BinCapacityReconciler,
        lines: &Table,
        positions: &Table,
    ) -> bincap_core::Result<ReconcileResult> {
        let run_id = self.try_begin()?;
        tracing::info!("批次 {} 開始", run_id);

        let outcome = reconciler.reconcile(lines, positions).map(|mut result| {
            result.run_id = Some(run_id);
            result
        });
        self.finish(&outcome);
        outcome
    }

    fn lock(&self) -> MutexGuard<'_, RunState> {
        // 狀態只做簡單賦值，鎖中毒時沿用內部值
        self.state.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}
