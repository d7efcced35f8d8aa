//! Nominatim Search API クライアント
//!
//! https://nominatim.org/release-docs/develop/api/Search/

use super::{build_query, Geocoder, LookupOutcome};
use crate::config::{Config, SearchOptions};
use crate::error::{CityLookupError, Result};
use citylookup_common::{extract_top, GeoCandidate, ValidationRules};

pub struct NominatimClient {
    http: reqwest::Client,
    search: SearchOptions,
    rules: ValidationRules,
}

impl NominatimClient {
    pub fn new(config: &Config) -> Result<Self> {
        let http = reqwest::Client::builder()
            .user_agent(config.search.user_agent.clone())
            .timeout(config.timeout())
            .build()
            .map_err(|e| CityLookupError::ApiCall(e.to_string()))?;

        Ok(Self {
            http,
            search: config.search.clone(),
            rules: config.validation.clone(),
        })
    }

    /// 検索APIを1回呼び出す
    pub async fn search(&self, query: &str) -> Result<Vec<GeoCandidate>> {
        let mut params = vec![
            ("format", self.search.format.clone()),
            ("limit", self.search.result_limit.to_string()),
            ("featureType", self.search.feature_type.clone()),
            ("q", query.to_string()),
        ];
        if let Some(codes) = self.search.country_codes.as_ref().filter(|c| !c.is_empty()) {
            params.push(("countrycodes", codes.clone()));
        }

        let response = self
            .http
            .get(&self.search.base_url)
            .query(&params)
            .send()
            .await
            .and_then(reqwest::Response::error_for_status)
            .map_err(|e| CityLookupError::ApiCall(e.to_string()))?;

        let body = response
            .text()
            .await
            .map_err(|e| CityLookupError::ApiCall(e.to_string()))?;

        serde_json::from_str(&body).map_err(|e| CityLookupError::ApiParse(e.to_string()))
    }

    fn evaluate(&self, query: &str, candidates: &[GeoCandidate]) -> LookupOutcome {
        let Some(top) = candidates.first() else {
            tracing::info!(query, "query returned no results, using default values");
            return LookupOutcome::NoResults;
        };

        let keywords_ok = self.rules.check_keywords(candidates);
        if !keywords_ok {
            tracing::warn!(query, display_name = %top.display_name, "keywords not found for the search");
            log_response(candidates);
        }

        let report = self.rules.check_restrictions(top);
        tracing::debug!(
            query,
            type_valid = report.type_valid,
            address_type_valid = report.address_type_valid,
            class_valid = report.class_valid,
            "restriction check"
        );
        if !report.passed() {
            tracing::warn!(
                query,
                kind = %top.kind,
                address_type = %top.address_type,
                class = %top.class,
                "no results match the restrictions"
            );
            log_response(candidates);
        }

        let mismatch = !keywords_ok || !report.passed();
        if mismatch && self.rules.reject_mismatches {
            tracing::info!(query, "result rejected");
            return LookupOutcome::Rejected;
        }

        let coordinates = extract_top(candidates);
        if !coordinates.is_found() {
            tracing::warn!(query, lat = %top.lat, lon = %top.lon, "non-numeric coordinates in response");
            return LookupOutcome::Failed;
        }

        LookupOutcome::Found {
            coordinates,
            mismatch,
        }
    }
}

impl Geocoder for NominatimClient {
    async fn lookup_outcome(&self, query: &str, region: &str) -> LookupOutcome {
        if query.trim().is_empty() {
            tracing::warn!("invalid query string");
            return LookupOutcome::Skipped;
        }

        let q = build_query(region, query);
        match self.search(&q).await {
            Ok(candidates) => self.evaluate(query, &candidates),
            Err(e) => {
                tracing::error!(query, error = %e, "there was an error searching for the query");
                LookupOutcome::Failed
            }
        }
    }
}

fn log_response(candidates: &[GeoCandidate]) {
    if let Ok(json) = serde_json::to_string_pretty(candidates) {
        tracing::debug!(response = %json, "response");
    }
}
