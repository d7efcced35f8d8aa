//! INSERT文の生成
//!
//! 列ごとの変換種別に従って値をSQLリテラルに変換する。
//! 文字列のエスケープはシングルクォートの二重化のみ（信頼できない入力への対策ではない）。

use crate::columns::{ColumnKind, ColumnSpec};
use crate::types::{CellValue, EnrichedRecord};

const NULL: &str = "NULL";

/// 1セルをSQLリテラルに変換
///
/// - 値なし / Null → `NULL`
/// - Float列 → 数値リテラル（文字列は数値として解釈、解釈できなければ `NULL`）
/// - Integer列 → 整数リテラル（小数は切り捨て）。i64に収まらない整数表記はそのまま出力
/// - それ以外 → クォート付き文字列
pub fn format_value(kind: ColumnKind, value: Option<&CellValue>) -> String {
    let value = match value {
        None | Some(CellValue::Null) => return NULL.to_string(),
        Some(v) => v,
    };

    match kind {
        ColumnKind::Float => to_float(value).map_or_else(|| NULL.to_string(), |f| f.to_string()),
        ColumnKind::Integer => integer_literal(value).unwrap_or_else(|| NULL.to_string()),
        ColumnKind::Text => match value {
            CellValue::Text(s) => quote(s),
            CellValue::Float(f) => quote(&f.to_string()),
            CellValue::Integer(i) => quote(&i.to_string()),
            CellValue::Null => NULL.to_string(),
        },
    }
}

/// 全レコードを1つのINSERT文にまとめる
///
/// 行順は入力順のまま。レコードが0件の場合はNone。
pub fn build_insert(spec: &ColumnSpec, records: &[EnrichedRecord]) -> Option<String> {
    if records.is_empty() {
        return None;
    }

    let column_names = spec
        .columns()
        .iter()
        .map(|c| c.name.as_str())
        .collect::<Vec<_>>()
        .join(", ");

    let tuples = records
        .iter()
        .map(|record| {
            let values = spec
                .columns()
                .iter()
                .map(|c| format_value(c.kind, record.get(&c.name)))
                .collect::<Vec<_>>()
                .join(", ");
            format!("({})", values)
        })
        .collect::<Vec<_>>()
        .join(",\n\t");

    Some(format!(
        "INSERT INTO\n{} ({})\nVALUES\n{};",
        spec.table(),
        column_names,
        tuples
    ))
}

fn quote(text: &str) -> String {
    format!("'{}'", text.replace('\'', "''"))
}

fn to_float(value: &CellValue) -> Option<f64> {
    let f = match value {
        CellValue::Float(f) => *f,
        CellValue::Integer(i) => *i as f64,
        CellValue::Text(s) => s.trim().parse::<f64>().ok()?,
        CellValue::Null => return None,
    };
    f.is_finite().then_some(f)
}

fn to_integer(value: &CellValue) -> Option<i64> {
    match value {
        CellValue::Integer(i) => Some(*i),
        CellValue::Float(f) => truncate(*f),
        CellValue::Text(s) => {
            let s = s.trim();
            s.parse::<i64>()
                .ok()
                .or_else(|| s.parse::<f64>().ok().and_then(truncate))
        }
        CellValue::Null => None,
    }
}

fn integer_literal(value: &CellValue) -> Option<String> {
    if let Some(i) = to_integer(value) {
        return Some(i.to_string());
    }
    match value {
        CellValue::Text(s) if is_integer_text(s.trim()) => Some(s.trim().to_string()),
        _ => None,
    }
}

/// 符号付きの10進数字列か
fn is_integer_text(text: &str) -> bool {
    let digits = text.strip_prefix('-').unwrap_or(text);
    !digits.is_empty() && digits.bytes().all(|b| b.is_ascii_digit())
}

fn truncate(f: f64) -> Option<i64> {
    // i64の範囲外はNULL扱い
    if f.is_finite() && f.abs() < 9.2e18 {
        Some(f.trunc() as i64)
    } else {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn spec() -> ColumnSpec {
        let columns: Vec<String> = ["UF", "cityName", "lon", "lat", "id"]
            .iter()
            .map(|s| s.to_string())
            .collect();
        ColumnSpec::resolve(
            "YOUR_TABLE_NAME",
            &columns,
            &["lon".to_string(), "lat".to_string()],
            &["UF".to_string()],
        )
        .unwrap()
    }

    #[test]
    fn test_text_escapes_every_quote() {
        let value = CellValue::from("O'Brien d'Oeste");
        assert_eq!(
            format_value(ColumnKind::Text, Some(&value)),
            "'O''Brien d''Oeste'"
        );
    }

    #[test]
    fn test_integer_from_text() {
        assert_eq!(format_value(ColumnKind::Integer, Some(&CellValue::from("35"))), "35");
        assert_eq!(format_value(ColumnKind::Integer, Some(&CellValue::from(" 3509502.0 "))), "3509502");
        assert_eq!(format_value(ColumnKind::Integer, Some(&CellValue::from("35.9"))), "35");
        assert_eq!(format_value(ColumnKind::Integer, Some(&CellValue::from("SP"))), "NULL");
    }

    #[test]
    fn test_integer_text_beyond_i64_kept_verbatim() {
        assert_eq!(
            format_value(ColumnKind::Integer, Some(&CellValue::from("99999999999999999999"))),
            "99999999999999999999"
        );
        assert_eq!(
            format_value(ColumnKind::Integer, Some(&CellValue::from(" -99999999999999999999 "))),
            "-99999999999999999999"
        );
        assert_eq!(format_value(ColumnKind::Integer, Some(&CellValue::from("1e30"))), "NULL");
        assert_eq!(format_value(ColumnKind::Integer, Some(&CellValue::from("-"))), "NULL");
        assert_eq!(format_value(ColumnKind::Integer, Some(&CellValue::Float(1e30))), "NULL");
    }

    #[test]
    fn test_float_values() {
        assert_eq!(format_value(ColumnKind::Float, Some(&CellValue::Float(-23.55))), "-23.55");
        assert_eq!(format_value(ColumnKind::Float, Some(&CellValue::from("-46.63"))), "-46.63");
        assert_eq!(format_value(ColumnKind::Float, Some(&CellValue::Integer(2))), "2");
        assert_eq!(format_value(ColumnKind::Float, Some(&CellValue::Float(f64::NAN))), "NULL");
    }

    #[test]
    fn test_null_in_any_column() {
        for kind in [ColumnKind::Text, ColumnKind::Float, ColumnKind::Integer] {
            assert_eq!(format_value(kind, Some(&CellValue::Null)), "NULL");
            assert_eq!(format_value(kind, None), "NULL");
        }
    }

    #[test]
    fn test_build_insert_layout() {
        let mut first = EnrichedRecord::new();
        first.set("UF", "35");
        first.set("cityName", "São Paulo");
        first.set("lon", Some(-46.63));
        first.set("lat", Some(-23.55));
        first.set("id", "a1");

        let mut second = EnrichedRecord::new();
        second.set("UF", "35");
        second.set("cityName", "Santa Bárbara d'Oeste");
        second.set("lon", None::<f64>);
        second.set("lat", None::<f64>);
        second.set("id", "b2");

        let sql = build_insert(&spec(), &[first, second]).unwrap();
        assert_eq!(
            sql,
            "INSERT INTO\nYOUR_TABLE_NAME (UF, cityName, lon, lat, id)\nVALUES\n\
             (35, 'São Paulo', -46.63, -23.55, 'a1'),\n\t\
             (35, 'Santa Bárbara d''Oeste', NULL, NULL, 'b2');"
        );
    }

    #[test]
    fn test_build_insert_empty() {
        assert!(build_insert(&spec(), &[]).is_none());
    }
}
