//! 出力列の型設定
//!
//! 列ごとのSQL変換種別（文字列・浮動小数・整数）を起動時に一度だけ解決する。
//! 数値列が出力列に含まれない場合は設定エラー。

use crate::error::{Error, Result};
use std::collections::HashSet;
use std::fmt;

/// 列の変換種別
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColumnKind {
    Text,
    Float,
    Integer,
}

impl fmt::Display for ColumnKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ColumnKind::Text => "text",
            ColumnKind::Float => "float",
            ColumnKind::Integer => "integer",
        };
        f.pad(name)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutputColumn {
    pub name: String,
    pub kind: ColumnKind,
}

/// 解決済みの出力スキーマ（テーブル名 + 列順 + 変換種別）
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColumnSpec {
    table: String,
    columns: Vec<OutputColumn>,
}

impl ColumnSpec {
    /// 列設定を検証して解決する
    ///
    /// # Errors
    /// - テーブル名・列リストが空
    /// - 列名の重複
    /// - float/integer列が `columns` に含まれない
    /// - 同じ列がfloatとintegerの両方に指定されている
    pub fn resolve(
        table: &str,
        columns: &[String],
        float_columns: &[String],
        integer_columns: &[String],
    ) -> Result<Self> {
        if table.trim().is_empty() {
            return Err(Error::Configuration("table name is empty".into()));
        }
        if columns.is_empty() {
            return Err(Error::Configuration("no output columns configured".into()));
        }

        let mut seen = HashSet::new();
        for column in columns {
            if !seen.insert(column.as_str()) {
                return Err(Error::Configuration(format!(
                    "duplicate output column `{}`",
                    column
                )));
            }
        }

        check_subset("float", float_columns, &seen)?;
        check_subset("integer", integer_columns, &seen)?;

        if let Some(both) = float_columns.iter().find(|c| integer_columns.contains(c)) {
            return Err(Error::Configuration(format!(
                "column `{}` is declared both float and integer",
                both
            )));
        }

        let columns = columns
            .iter()
            .map(|name| {
                let kind = if float_columns.contains(name) {
                    ColumnKind::Float
                } else if integer_columns.contains(name) {
                    ColumnKind::Integer
                } else {
                    ColumnKind::Text
                };
                OutputColumn {
                    name: name.clone(),
                    kind,
                }
            })
            .collect();

        Ok(Self {
            table: table.to_string(),
            columns,
        })
    }

    pub fn table(&self) -> &str {
        &self.table
    }

    pub fn columns(&self) -> &[OutputColumn] {
        &self.columns
    }

    pub fn kind_of(&self, name: &str) -> Option<ColumnKind> {
        self.columns.iter().find(|c| c.name == name).map(|c| c.kind)
    }
}

fn check_subset(label: &str, declared: &[String], all: &HashSet<&str>) -> Result<()> {
    let missing: Vec<&str> = declared
        .iter()
        .map(String::as_str)
        .filter(|c| !all.contains(c))
        .collect();

    if missing.is_empty() {
        Ok(())
    } else {
        Err(Error::Configuration(format!(
            "{} columns not found in table columns: {}",
            label,
            missing.join(", ")
        )))
    }
}
