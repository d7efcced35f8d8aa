//! スプレッドシート読み込み
//!
//! 列は位置でヘッダ名に対応付ける（A列 → header[0] ...）。
//! ヘッダの列がすべて埋まっている行だけを返し、それ以外（タイトル行、注記、
//! 空行）とヘッダ行そのものは読み飛ばす。

use crate::config::SheetOptions;
use crate::error::{CityLookupError, Result};
use calamine::{open_workbook_auto, Data, Range, Reader};
use citylookup_common::RawRecord;
use std::path::Path;

pub fn read_rows(path: &Path, options: &SheetOptions) -> Result<Vec<RawRecord>> {
    if !path.exists() {
        return Err(CityLookupError::FileNotFound(path.display().to_string()));
    }

    let mut workbook = open_workbook_auto(path)
        .map_err(|e| CityLookupError::Spreadsheet(format!("{}: {}", path.display(), e)))?;

    let range = match &options.sheet_name {
        Some(name) => workbook
            .worksheet_range(name)
            .map_err(|e| CityLookupError::Spreadsheet(format!("シート `{}`: {}", name, e)))?,
        None => workbook
            .worksheet_range_at(0)
            .ok_or_else(|| CityLookupError::Spreadsheet("シートがありません".into()))?
            .map_err(|e| CityLookupError::Spreadsheet(e.to_string()))?,
    };

    let records = records_from_range(&range, &options.header);
    tracing::debug!(
        total_rows = range.height(),
        matched = records.len(),
        "spreadsheet loaded"
    );
    Ok(records)
}

fn records_from_range(range: &Range<Data>, header: &[String]) -> Vec<RawRecord> {
    let rows = range
        .rows()
        .map(|row| row.iter().map(cell_text).collect::<Vec<_>>())
        .collect();
    records_from_rows(rows, header)
}

/// セル値の行リストからRawRecordを組み立てる
pub fn records_from_rows(rows: Vec<Vec<Option<String>>>, header: &[String]) -> Vec<RawRecord> {
    rows.into_iter()
        .filter_map(|row| {
            let fields = header
                .iter()
                .enumerate()
                .map(|(i, key)| {
                    row.get(i)
                        .cloned()
                        .flatten()
                        .map(|value| (key.clone(), value))
                })
                .collect::<Option<Vec<_>>>()?;

            let is_header_row = fields.iter().all(|(k, v)| k.trim() == v.trim());
            (!is_header_row).then(|| RawRecord::new(fields))
        })
        .collect()
}

fn cell_text(cell: &Data) -> Option<String> {
    match cell {
        Data::Empty => None,
        Data::String(s) if s.is_empty() => None,
        Data::String(s) => Some(s.clone()),
        Data::Int(i) => Some(i.to_string()),
        // 整数値のセルは "35.0" ではなく "35" にする
        Data::Float(f) if f.is_finite() && f.fract() == 0.0 && f.abs() < 9.2e18 => {
            Some((*f as i64).to_string())
        }
        other => Some(other.to_string()),
    }
}
