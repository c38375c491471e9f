//! 批次執行狀態

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{BinCapError, Result};

/// 批次執行狀態：Idle → Running → Completed | Failed
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum RunState {
    /// 尚未執行過
    #[default]
    Idle,

    /// 執行中
    Running {
        run_id: Uuid,
        started_at: DateTime<Utc>,
    },

    /// 上次執行完成
    Completed {
        run_id: Uuid,
        finished_at: DateTime<Utc>,
    },

    /// 上次執行失敗，沒有任何輸出
    Failed {
        run_id: Uuid,
        reason: String,
    },
}

impl RunState {
    /// 是否正在執行
    pub fn is_running(&self) -> bool {
        matches!(self, RunState::Running { .. })
    }

    /// 開始新的批次；執行中則拒絕
    pub fn begin(&mut self) -> Result<Uuid> {
        if self.is_running() {
            return Err(BinCapError::RunInProgress);
        }
        let run_id = Uuid::new_v4();
        *self = RunState::Running {
            run_id,
            started_at: Utc::now(),
        };
        Ok(run_id)
    }

    /// 標記完成
    pub fn complete(&mut self) {
        if let RunState::Running { run_id, .. } = *self {
            *self = RunState::Completed {
                run_id,
                finished_at: Utc::now(),
            };
        }
    }

    /// 標記失敗
    pub fn fail(&mut self, reason: String) {
        if let RunState::Running { run_id, .. } = *self {
            *self = RunState::Failed { run_id, reason };
        }
    }

    /// 目前或最近一次執行的ID
    pub fn run_id(&self) -> Option<Uuid> {
        match self {
            RunState::Idle => None,
            RunState::Running { run_id, .. }
            | RunState::Completed { run_id, .. }
            | RunState::Failed { run_id, .. } => Some(*run_id),
        }
    }
}
