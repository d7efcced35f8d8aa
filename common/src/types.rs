//! 入出力レコードの型定義
//!
//! - RawRecord: スプレッドシート1行分（ヘッダ名 → 文字列値）
//! - GeoCandidate: ジオコーディングAPIの検索結果1件
//! - Coordinates: 緯度経度（未検出時は両方None）
//! - EnrichedRecord: 出力列名 → 値（SQL生成の入力）

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// スプレッドシートの1行
///
/// ヘッダ順を保持する。読み込み後は変更しない。
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RawRecord {
    fields: Vec<(String, String)>,
}

impl RawRecord {
    pub fn new(fields: Vec<(String, String)>) -> Self {
        Self { fields }
    }

    /// ヘッダ名で値を取得（前後の空白は無視して照合）
    pub fn get(&self, key: &str) -> Option<&str> {
        let key = key.trim();
        self.fields
            .iter()
            .find(|(k, _)| k.trim() == key)
            .map(|(_, v)| v.as_str())
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

/// ジオコーディング検索結果
///
/// 緯度経度はAPIの返却どおり文字列で保持する。
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct GeoCandidate {
    pub display_name: String,
    pub lat: String,
    pub lon: String,
    #[serde(rename = "type")]
    pub kind: String,
    #[serde(rename = "addresstype")]
    pub address_type: String,
    pub class: String,
}

/// 緯度経度
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Coordinates {
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
}

impl Coordinates {
    /// 未検出を表す値（エラーではない）
    pub const NOT_FOUND: Coordinates = Coordinates {
        latitude: None,
        longitude: None,
    };

    pub fn new(latitude: f64, longitude: f64) -> Self {
        Self {
            latitude: Some(latitude),
            longitude: Some(longitude),
        }
    }

    pub fn is_found(&self) -> bool {
        self.latitude.is_some() && self.longitude.is_some()
    }
}

/// 出力セルの値
#[derive(Debug, Clone, PartialEq)]
pub enum CellValue {
    Null,
    Text(String),
    Float(f64),
    Integer(i64),
}

impl From<Option<f64>> for CellValue {
    fn from(value: Option<f64>) -> Self {
        value.map_or(CellValue::Null, CellValue::Float)
    }
}

impl From<&str> for CellValue {
    fn from(value: &str) -> Self {
        CellValue::Text(value.to_string())
    }
}

impl From<String> for CellValue {
    fn from(value: String) -> Self {
        CellValue::Text(value)
    }
}

/// 付加情報を含む出力レコード
#[derive(Debug, Clone, Default, PartialEq)]
pub struct EnrichedRecord {
    values: HashMap<String, CellValue>,
}

impl EnrichedRecord {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set(&mut self, column: impl Into<String>, value: impl Into<CellValue>) {
        self.values.insert(column.into(), value.into());
    }

    /// 列の値を取得（未設定の列はNone）
    pub fn get(&self, column: &str) -> Option<&CellValue> {
        self.values.get(column)
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}
