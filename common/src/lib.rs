//! citylookup Common Library
//!
//! I/Oを持たない処理（型定義・列設定・結果チェック・座標抽出・SQL生成）

pub mod types;
pub mod columns;
pub mod error;
pub mod validator;
pub mod extractor;
pub mod sql;

pub use types::{CellValue, Coordinates, EnrichedRecord, GeoCandidate, RawRecord};
pub use columns::{ColumnKind, ColumnSpec, OutputColumn};
pub use error::{Error, Result};
pub use validator::{RestrictionReport, ValidationRules};
pub use extractor::{extract_coordinates, extract_top};
pub use sql::{build_insert, format_value};
