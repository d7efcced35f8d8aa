use crate::error::{CityLookupError, Result};
use chrono::Utc;
use std::path::Path;

/// 出力ファイルの内容（1行目はコメント）
pub fn render(statement: &str, rows: usize) -> String {
    format!(
        "-- generated by citylookup: {} rows, {}\n{}\n",
        rows,
        Utc::now().format("%Y-%m-%dT%H:%M:%SZ"),
        statement
    )
}

/// INSERT文をファイルに書き出す（再試行はしない）
pub fn write_sql(path: &Path, statement: &str, rows: usize) -> Result<()> {
    std::fs::write(path, render(statement, rows)).map_err(|source| CityLookupError::OutputWrite {
        path: path.to_path_buf(),
        source,
    })
}
