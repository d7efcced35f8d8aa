use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum CityLookupError {
    #[error("設定エラー: {0}")]
    Config(String),

    #[error(transparent)]
    Common(#[from] citylookup_common::Error),

    #[error("ファイルが見つかりません: {0}")]
    FileNotFound(String),

    #[error("スプレッドシート読み込みエラー: {0}")]
    Spreadsheet(String),

    #[error("API呼び出しエラー: {0}")]
    ApiCall(String),

    #[error("APIレスポンスのパースに失敗: {0}")]
    ApiParse(String),

    #[error("JSON解析エラー: {0}")]
    JsonParse(#[from] serde_json::Error),

    #[error("IOエラー: {0}")]
    Io(#[from] std::io::Error),

    #[error("処理対象の行がありません: {0}")]
    NoRowsFound(String),

    #[error("SQLファイルの書き込みに失敗: {}: {source}", .path.display())]
    OutputWrite {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

pub type Result<T> = std::result::Result<T, CityLookupError>;
