//! 検索結果から緯度経度を取り出す

use crate::types::{Coordinates, GeoCandidate};

/// 候補のlat/lon文字列を数値に変換
///
/// どちらかが数値として読めない場合は未検出（`Coordinates::NOT_FOUND`）を返す。
pub fn extract_coordinates(candidate: &GeoCandidate) -> Coordinates {
    let latitude = parse_coordinate(&candidate.lat);
    let longitude = parse_coordinate(&candidate.lon);

    match (latitude, longitude) {
        (Some(lat), Some(lon)) => Coordinates::new(lat, lon),
        _ => Coordinates::NOT_FOUND,
    }
}

/// 候補リストの先頭から取り出す（空なら未検出）
pub fn extract_top(candidates: &[GeoCandidate]) -> Coordinates {
    candidates
        .first()
        .map_or(Coordinates::NOT_FOUND, extract_coordinates)
}

fn parse_coordinate(text: &str) -> Option<f64> {
    text.trim().parse::<f64>().ok().filter(|v| v.is_finite())
}
