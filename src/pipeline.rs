//! 行ごとの付加処理
//!
//! 1行ずつ順番に処理する（同時に発行するリクエストは常に1件）。
//! 検索の失敗は行単位で吸収し、処理全体は止めない。

use crate::config::Config;
use crate::enricher::RowEnricher;
use crate::error::{CityLookupError, Result};
use crate::geocoder::{Geocoder, LookupOutcome};
use crate::pacer::Pacer;
use crate::{output, reader};
use citylookup_common::{build_insert, EnrichedRecord, RawRecord};
use indicatif::ProgressBar;
use std::path::Path;

/// 実行結果の集計
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RunStats {
    pub rows: usize,
    pub found: usize,
    /// 採用したがキーワード/種別チェックに失敗した件数（foundの内数）
    pub mismatched: usize,
    pub no_results: usize,
    pub rejected: usize,
    pub failed: usize,
    pub skipped: usize,
}

impl RunStats {
    fn record(&mut self, outcome: &LookupOutcome) {
        self.rows += 1;
        match outcome {
            LookupOutcome::Found { mismatch, .. } => {
                self.found += 1;
                if *mismatch {
                    self.mismatched += 1;
                }
            }
            LookupOutcome::NoResults => self.no_results += 1,
            LookupOutcome::Rejected => self.rejected += 1,
            LookupOutcome::Failed => self.failed += 1,
            LookupOutcome::Skipped => self.skipped += 1,
        }
    }

    /// 緯度経度がNULLになった行数
    pub fn not_found(&self) -> usize {
        self.rows - self.found
    }
}

/// 全行を検索して出力レコードを作る
///
/// 出力の順序は入力の順序と同じ。
pub async fn enrich_rows<G: Geocoder>(
    rows: &[RawRecord],
    config: &Config,
    geocoder: &G,
    pacer: &mut Pacer,
    progress: Option<&ProgressBar>,
) -> (Vec<EnrichedRecord>, RunStats) {
    let enricher = RowEnricher::new(&config.table);
    let mut records = Vec::with_capacity(rows.len());
    let mut stats = RunStats::default();

    for (index, row) in rows.iter().enumerate() {
        let query = row.get(&config.sheet.search_column).unwrap_or_default();
        tracing::info!(row = index + 1, entry = query, "processing entry");

        pacer.wait().await;
        let outcome = geocoder.lookup_outcome(query, &config.search.region).await;
        stats.record(&outcome);

        records.push(enricher.enrich(row, outcome.coordinates()));

        if let Some(pb) = progress {
            pb.inc(1);
        }
    }

    tracing::info!(
        rows = stats.rows,
        found = stats.found,
        not_found = stats.not_found(),
        failed = stats.failed,
        mismatched = stats.mismatched,
        "enrichment finished"
    );

    (records, stats)
}

/// 設定検証 → 読み込み → 検索 → SQL出力 を通しで実行する
///
/// 列設定の誤りは行を読む前に返す。処理対象が0行なら `NoRowsFound` で、
/// ファイルは書き出さない。
pub async fn run<G: Geocoder>(
    config: &Config,
    input: &Path,
    output: &Path,
    limit: Option<usize>,
    geocoder: &G,
    progress: Option<&ProgressBar>,
) -> Result<RunStats> {
    let spec = config.validate()?;
    tracing::info!(
        table = spec.table(),
        columns = spec.columns().len(),
        region = %config.search.region,
        delay_ms = config.search.request_delay_ms,
        timeout_seconds = config.search.timeout_seconds,
        "configuration loaded"
    );

    let mut rows = reader::read_rows(input, &config.sheet)?;
    if let Some(limit) = limit {
        rows.truncate(limit);
    }
    if rows.is_empty() {
        return Err(CityLookupError::NoRowsFound(input.display().to_string()));
    }
    tracing::info!(rows = rows.len(), input = %input.display(), "rows loaded");

    if let Some(pb) = progress {
        pb.set_length(rows.len() as u64);
    }

    let mut pacer = Pacer::new(config.request_delay());
    let (records, stats) = enrich_rows(&rows, config, geocoder, &mut pacer, progress).await;

    let statement = build_insert(&spec, &records)
        .ok_or_else(|| CityLookupError::NoRowsFound(input.display().to_string()))?;
    output::write_sql(output, &statement, records.len())?;
    tracing::info!(output = %output.display(), rows = records.len(), "insert statement written");

    Ok(stats)
}

#[cfg(test)]
mod tests {
    use super::*;
    use citylookup_common::{CellValue, Coordinates};
    use std::cell::RefCell;
    use std::time::Duration;

    /// 検索語ごとに決まった結果を返す
    struct FixedGeocoder {
        calls: RefCell<Vec<(String, String)>>,
    }

    impl Geocoder for FixedGeocoder {
        async fn lookup_outcome(&self, query: &str, region: &str) -> LookupOutcome {
            self.calls
                .borrow_mut()
                .push((query.to_string(), region.to_string()));
            match query {
                "São Paulo" => LookupOutcome::Found {
                    coordinates: Coordinates::new(-23.55, -46.63),
                    mismatch: false,
                },
                "Campinas" => LookupOutcome::NoResults,
                "" => LookupOutcome::Skipped,
                _ => LookupOutcome::Failed,
            }
        }
    }

    fn row(city: &str) -> RawRecord {
        let header = crate::config::SheetOptions::default().header;
        let values = ["35", "São Paulo", "3501", "São Paulo", "3550308", city];
        RawRecord::new(
            header
                .into_iter()
                .zip(values.iter().map(|v| v.to_string()))
                .collect(),
        )
    }

    #[tokio::test(start_paused = true)]
    async fn test_enrich_rows_in_order() {
        let config = Config::default();
        let geocoder = FixedGeocoder {
            calls: RefCell::new(Vec::new()),
        };
        let mut pacer = Pacer::new(Duration::from_millis(1001));
        let rows = vec![row("São Paulo"), row("Campinas"), row("Atlantis"), row("")];

        let start = tokio::time::Instant::now();
        let (records, stats) = enrich_rows(&rows, &config, &geocoder, &mut pacer, None).await;

        assert_eq!(start.elapsed(), Duration::from_millis(3003));
        assert_eq!(records.len(), 4);
        assert_eq!(records[0].get("lat"), Some(&CellValue::Float(-23.55)));
        assert_eq!(records[1].get("lat"), Some(&CellValue::Null));
        assert_eq!(records[1].get("cityName"), Some(&CellValue::from("Campinas")));
        assert!(records.iter().all(|r| matches!(r.get("id"), Some(CellValue::Text(_)))));

        assert_eq!(
            stats,
            RunStats {
                rows: 4,
                found: 1,
                mismatched: 0,
                no_results: 1,
                rejected: 0,
                failed: 1,
                skipped: 1,
            }
        );
        assert_eq!(stats.not_found(), 3);

        let calls = geocoder.calls.borrow();
        assert_eq!(calls[0], ("São Paulo".to_string(), "SP".to_string()));
        assert_eq!(calls.len(), 4);
    }
}
