use crate::config::{DerivedValue, TableOptions};
use citylookup_common::{CellValue, Coordinates, EnrichedRecord, RawRecord};
use uuid::Uuid;

/// 入力行 + 検索結果 → 出力レコード
pub struct RowEnricher<'a> {
    table: &'a TableOptions,
}

impl<'a> RowEnricher<'a> {
    pub fn new(table: &'a TableOptions) -> Self {
        Self { table }
    }

    /// 1行分のレコードを作る
    ///
    /// IDは検索結果に関係なく毎回新しく発行する。
    pub fn enrich(&self, raw: &RawRecord, coordinates: Coordinates) -> EnrichedRecord {
        let mut record = EnrichedRecord::new();

        for mapping in &self.table.columns {
            let value = raw
                .get(&mapping.source)
                .map_or(CellValue::Null, CellValue::from);
            record.set(mapping.name.clone(), value);
        }

        for derived in &self.table.derived {
            let value = match derived.value {
                DerivedValue::Latitude => CellValue::from(coordinates.latitude),
                DerivedValue::Longitude => CellValue::from(coordinates.longitude),
                DerivedValue::UniqueId => CellValue::Text(Uuid::new_v4().to_string()),
            };
            record.set(derived.name.clone(), value);
        }

        record
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn raw() -> RawRecord {
        let values = ["35", "São Paulo", "3501", "São Paulo", "3550308", "São Paulo"];
        let header = crate::config::SheetOptions::default().header;
        RawRecord::new(
            header
                .into_iter()
                .zip(values.iter().map(|v| v.to_string()))
                .collect(),
        )
    }

    #[test]
    fn test_enrich_carries_columns_and_coordinates() {
        let table = TableOptions::default();
        let enricher = RowEnricher::new(&table);

        let record = enricher.enrich(&raw(), Coordinates::new(-23.55, -46.63));

        assert_eq!(record.len(), 9);
        assert_eq!(record.get("UF"), Some(&CellValue::from("35")));
        assert_eq!(record.get("cityName"), Some(&CellValue::from("São Paulo")));
        assert_eq!(record.get("lat"), Some(&CellValue::Float(-23.55)));
        assert_eq!(record.get("lon"), Some(&CellValue::Float(-46.63)));
    }

    #[test]
    fn test_enrich_not_found_still_has_id() {
        let table = TableOptions::default();
        let enricher = RowEnricher::new(&table);

        let record = enricher.enrich(&raw(), Coordinates::NOT_FOUND);

        assert_eq!(record.get("lat"), Some(&CellValue::Null));
        assert_eq!(record.get("lon"), Some(&CellValue::Null));
        match record.get("id") {
            Some(CellValue::Text(id)) => assert!(Uuid::parse_str(id).is_ok()),
            other => panic!("unexpected id: {:?}", other),
        }
    }

    #[test]
    fn test_enrich_ids_are_unique() {
        let table = TableOptions::default();
        let enricher = RowEnricher::new(&table);

        let a = enricher.enrich(&raw(), Coordinates::NOT_FOUND);
        let b = enricher.enrich(&raw(), Coordinates::NOT_FOUND);
        assert_ne!(a.get("id"), b.get("id"));
    }

    #[test]
    fn test_enrich_missing_source_is_null() {
        let table = TableOptions::default();
        let enricher = RowEnricher::new(&table);

        let record = enricher.enrich(&RawRecord::default(), Coordinates::NOT_FOUND);
        assert_eq!(record.get("StateName"), Some(&CellValue::Null));
    }
}
