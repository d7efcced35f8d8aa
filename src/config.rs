use crate::error::{CityLookupError, Result};
use citylookup_common::{ColumnSpec, ValidationRules};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

/// 実行設定
///
/// 起動時に一度だけ構築し、各コンポーネントへ参照で渡す。
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
#[serde(default)]
pub struct Config {
    pub search: SearchOptions,
    pub validation: ValidationRules,
    pub sheet: SheetOptions,
    pub table: TableOptions,
}

/// 検索API設定（Nominatim Search API）
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct SearchOptions {
    pub base_url: String,
    pub format: String,
    /// country / state / city / settlement
    pub feature_type: String,
    pub result_limit: u32,
    /// 検索語の前に付ける地域（州略称など）。空なら付けない
    pub region: String,
    /// 検索対象の国コード（ISO 3166-1 alpha-2、カンマ区切り）
    pub country_codes: Option<String>,
    pub user_agent: String,
    pub timeout_seconds: u64,
    /// リクエスト間の最小間隔
    pub request_delay_ms: u64,
}

impl Default for SearchOptions {
    fn default() -> Self {
        Self {
            base_url: "https://nominatim.openstreetmap.org/search".into(),
            format: "json".into(),
            feature_type: "city".into(),
            result_limit: 1,
            region: "SP".into(),
            country_codes: Some("br".into()),
            user_agent: "citylookup/v1.0".into(),
            timeout_seconds: 30,
            request_delay_ms: 1001,
        }
    }
}

/// 入力スプレッドシート設定
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct SheetOptions {
    /// 期待するヘッダ（この列がすべて揃った行のみ処理）
    pub header: Vec<String>,
    /// 検索語として使う列
    pub search_column: String,
    /// 読み込むシート名（省略時は先頭シート）
    pub sheet_name: Option<String>,
}

impl Default for SheetOptions {
    fn default() -> Self {
        Self {
            header: vec![
                "UF".into(),
                "Nome_UF".into(),
                "Região Geográfica Intermediária".into(),
                "Nome Região Geográfica Intermediária".into(),
                "Código Município Completo".into(),
                "Nome_Município".into(),
            ],
            search_column: "Nome_Município".into(),
            sheet_name: None,
        }
    }
}

/// そのまま出力する列（出力列名 ← スプレッドシートのヘッダ名）
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ColumnMapping {
    pub name: String,
    pub source: String,
}

impl ColumnMapping {
    fn new(name: &str, source: &str) -> Self {
        Self {
            name: name.into(),
            source: source.into(),
        }
    }
}

/// 付加列の値
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum DerivedValue {
    Latitude,
    Longitude,
    UniqueId,
}

impl DerivedValue {
    fn label(self) -> &'static str {
        match self {
            DerivedValue::Latitude => "(緯度)",
            DerivedValue::Longitude => "(経度)",
            DerivedValue::UniqueId => "(ID)",
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct DerivedColumn {
    pub name: String,
    pub value: DerivedValue,
}

/// 出力テーブル設定
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct TableOptions {
    pub name: String,
    pub columns: Vec<ColumnMapping>,
    pub derived: Vec<DerivedColumn>,
    pub float_columns: Vec<String>,
    pub integer_columns: Vec<String>,
}

impl Default for TableOptions {
    fn default() -> Self {
        Self {
            name: "YOUR_TABLE_NAME".into(),
            columns: vec![
                ColumnMapping::new("UF", "UF"),
                ColumnMapping::new("StateName", "Nome_UF"),
                ColumnMapping::new(
                    "intermediateGeographicalRegionCode",
                    "Região Geográfica Intermediária",
                ),
                ColumnMapping::new(
                    "intermediateGeographicalRegionName",
                    "Nome Região Geográfica Intermediária",
                ),
                ColumnMapping::new("fullMunicipalityCode", "Código Município Completo"),
                ColumnMapping::new("cityName", "Nome_Município"),
            ],
            derived: vec![
                DerivedColumn {
                    name: "lon".into(),
                    value: DerivedValue::Longitude,
                },
                DerivedColumn {
                    name: "lat".into(),
                    value: DerivedValue::Latitude,
                },
                DerivedColumn {
                    name: "id".into(),
                    value: DerivedValue::UniqueId,
                },
            ],
            float_columns: vec!["lon".into(), "lat".into()],
            integer_columns: vec![
                "UF".into(),
                "intermediateGeographicalRegionCode".into(),
                "fullMunicipalityCode".into(),
            ],
        }
    }
}

impl TableOptions {
    /// 出力列名（そのまま出力する列 → 付加列の順）
    pub fn output_columns(&self) -> Vec<String> {
        self.columns
            .iter()
            .map(|c| c.name.clone())
            .chain(self.derived.iter().map(|d| d.name.clone()))
            .collect()
    }
}

impl Config {
    /// 設定を読み込む
    ///
    /// `path` 指定時はそのファイル、なければ `~/.config/citylookup/config.json`、
    /// どちらもなければデフォルト値。
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let config_path = match path {
            Some(p) => {
                if !p.exists() {
                    return Err(CityLookupError::FileNotFound(p.display().to_string()));
                }
                p.to_path_buf()
            }
            None => {
                let default_path = Self::config_path()?;
                if !default_path.exists() {
                    return Ok(Self::default());
                }
                default_path
            }
        };

        let content = std::fs::read_to_string(&config_path)?;
        let config: Config = serde_json::from_str(&content)?;
        Ok(config)
    }

    pub fn save(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let content = serde_json::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        Ok(())
    }

    /// デフォルト設定をファイルに書き出す
    ///
    /// 既存ファイルは中身を読まずに扱う（壊れていても `force` で上書きできる）。
    /// 書き出した場合は `true`。
    pub fn init_file(path: &Path, force: bool) -> Result<bool> {
        if path.exists() && !force {
            return Ok(false);
        }
        Self::default().save(path)?;
        Ok(true)
    }

    pub fn config_path() -> Result<PathBuf> {
        let home = dirs::home_dir()
            .ok_or_else(|| CityLookupError::Config("ホームディレクトリが見つかりません".into()))?;
        Ok(home.join(".config").join("citylookup").join("config.json"))
    }

    /// 列設定を検証し、出力スキーマを解決する
    ///
    /// 行の処理を始める前に呼ぶこと。
    pub fn validate(&self) -> Result<ColumnSpec> {
        let spec = ColumnSpec::resolve(
            &self.table.name,
            &self.table.output_columns(),
            &self.table.float_columns,
            &self.table.integer_columns,
        )?;

        let in_header = |label: &str| self.sheet.header.iter().any(|h| h.trim() == label.trim());

        if !in_header(&self.sheet.search_column) {
            return Err(CityLookupError::Config(format!(
                "検索列 `{}` がヘッダにありません",
                self.sheet.search_column
            )));
        }

        if let Some(mapping) = self.table.columns.iter().find(|c| !in_header(&c.source)) {
            return Err(CityLookupError::Config(format!(
                "列 `{}` の参照元 `{}` がヘッダにありません",
                mapping.name, mapping.source
            )));
        }

        if !self
            .table
            .derived
            .iter()
            .any(|d| d.value == DerivedValue::UniqueId)
        {
            return Err(CityLookupError::Config("ID列（unique_id）が設定されていません".into()));
        }

        if self.search.result_limit == 0 {
            return Err(CityLookupError::Config("result_limit は1以上".into()));
        }

        Ok(spec)
    }

    /// 出力列の一覧（列名・変換種別・値の出どころ）
    pub fn describe_columns(&self) -> Result<String> {
        let spec = self.validate()?;

        let mut text = format!("テーブル: {}\n", spec.table());
        for column in spec.columns() {
            let origin = self
                .table
                .columns
                .iter()
                .find(|c| c.name == column.name)
                .map(|c| format!("← {}", c.source))
                .or_else(|| {
                    self.table
                        .derived
                        .iter()
                        .find(|d| d.name == column.name)
                        .map(|d| d.value.label().to_string())
                })
                .unwrap_or_default();
            text.push_str(&format!(
                "  {:<40} {:<8} {}\n",
                column.name, column.kind, origin
            ));
        }
        Ok(text)
    }

    pub fn request_delay(&self) -> Duration {
        Duration::from_millis(self.search.request_delay_ms)
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.search.timeout_seconds)
    }
}
