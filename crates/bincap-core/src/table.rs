//! 表格輸入（已解析的關聯表）

use serde::{Deserialize, Serialize};

use crate::{BinCapError, Result};

/// 已解析的表格關聯（標題列 + 字串儲存格）
///
/// 檔案解析由外部負責，引擎只接收這種中性格式。
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Table {
    /// 關聯名稱（用於錯誤訊息）
    pub name: String,

    /// 欄位標題
    pub headers: Vec<String>,

    /// 資料列
    pub rows: Vec<Vec<String>>,
}

impl Table {
    /// 創建空表格
    pub fn new(name: impl Into<String>, headers: Vec<String>) -> Self {
        Self {
            name: name.into(),
            headers,
            rows: Vec::new(),
        }
    }

    /// 從字串切片建立（測試與示例使用）
    pub fn from_rows(name: &str, headers: &[&str], rows: &[&[&str]]) -> Self {
        Self {
            name: name.to_string(),
            headers: headers.iter().map(|h| h.to_string()).collect(),
            rows: rows
                .iter()
                .map(|r| r.iter().map(|c| c.to_string()).collect())
                .collect(),
        }
    }

    /// 建構器模式：添加一列
    pub fn with_row(mut self, row: Vec<String>) -> Self {
        self.rows.push(row);
        self
    }

    /// 查找欄位索引（標題前後空白忽略）
    pub fn column_index(&self, column: &str) -> Option<usize> {
        let wanted = column.trim();
        self.headers.iter().position(|h| h.trim() == wanted)
    }

    /// 查找必要欄位，缺少時回傳 SchemaError
    pub fn require_column(&self, column: &str) -> Result<usize> {
        self.column_index(column)
            .ok_or_else(|| BinCapError::MissingColumn {
                relation: self.name.clone(),
                column: column.to_string(),
            })
    }

    /// 依序檢查所有必要欄位，回報第一個缺少的欄位
    pub fn require_columns(&self, columns: &[&str]) -> Result<Vec<usize>> {
        columns.iter().map(|c| self.require_column(c)).collect()
    }

    /// 檢查每列欄位數與標題一致
    pub fn check_row_widths(&self) -> Result<()> {
        let expected = self.headers.len();
        for (row, cells) in self.rows.iter().enumerate() {
            if cells.len() != expected {
                return Err(BinCapError::MalformedRow {
                    relation: self.name.clone(),
                    row,
                    expected,
                    found: cells.len(),
                });
            }
        }
        Ok(())
    }

    /// 列數
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// 是否沒有資料列
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}
