//! ジオコーディング
//!
//! 1回の検索で1リクエスト。通信・パースの失敗は未検出として扱い、
//! 処理全体は止めない。

mod nominatim;

pub use nominatim::NominatimClient;

use citylookup_common::Coordinates;

/// 1件の検索結果の分類
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum LookupOutcome {
    /// 検索語が空のためリクエストしなかった
    Skipped,
    /// 通信・レスポンス解析の失敗
    Failed,
    /// 検索結果0件
    NoResults,
    /// 結果を採用（`mismatch` はキーワード/種別チェックに失敗したか）
    Found {
        coordinates: Coordinates,
        mismatch: bool,
    },
    /// チェック失敗のため不採用（reject_mismatches有効時のみ）
    Rejected,
}

impl LookupOutcome {
    pub fn coordinates(&self) -> Coordinates {
        match self {
            LookupOutcome::Found { coordinates, .. } => *coordinates,
            _ => Coordinates::NOT_FOUND,
        }
    }
}

/// 地名 → 緯度経度
#[allow(async_fn_in_trait)]
pub trait Geocoder {
    async fn lookup_outcome(&self, query: &str, region: &str) -> LookupOutcome;

    async fn lookup(&self, query: &str, region: &str) -> Coordinates {
        self.lookup_outcome(query, region).await.coordinates()
    }
}

/// カンマ区切りを空白区切りに変換（URLエンコードで `+` になる）
pub fn normalize_query(query: &str) -> String {
    query
        .split(',')
        .map(str::trim)
        .filter(|part| !part.is_empty())
        .collect::<Vec<_>>()
        .join(" ")
}

/// 地域（州略称など）を先頭に付けた検索語
pub fn build_query(region: &str, query: &str) -> String {
    let normalized = normalize_query(query);
    let region = region.trim();
    if region.is_empty() {
        normalized
    } else {
        format!("{} {}", region, normalized)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_query_commas() {
        assert_eq!(normalize_query("São Paulo"), "São Paulo");
        assert_eq!(normalize_query("Campinas, SP,Brasil"), "Campinas SP Brasil");
        assert_eq!(normalize_query("Campinas,,"), "Campinas");
    }

    #[test]
    fn test_build_query_region_prefix() {
        assert_eq!(build_query("SP", "Campinas"), "SP Campinas");
        assert_eq!(build_query("", "Campinas, SP"), "Campinas SP");
    }

    #[test]
    fn test_outcome_coordinates() {
        let found = LookupOutcome::Found {
            coordinates: Coordinates::new(-22.9, -47.06),
            mismatch: true,
        };
        assert!(found.coordinates().is_found());
        assert_eq!(LookupOutcome::Rejected.coordinates(), Coordinates::NOT_FOUND);
        assert_eq!(LookupOutcome::Failed.coordinates(), Coordinates::NOT_FOUND);
    }
}
