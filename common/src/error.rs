//! エラー型定義

use thiserror::Error;

/// 共通エラー型
#[derive(Error, Debug)]
pub enum Error {
    /// 列設定の不整合（起動時に検出、致命的）
    #[error("Configuration error: {0}")]
    Configuration(String),
}

/// Result型エイリアス
pub type Result<T> = std::result::Result<T, Error>;
