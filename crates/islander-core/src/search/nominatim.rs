//! Geocoder backed by a Nominatim-compatible `search` endpoint.
//!
//! Request: `GET <url>?format=json&q=<text>`.
//! Response: a JSON array of objects with at least `lat`, `lon` and
//! `display_name`. Nominatim sends coordinates as strings; plain numbers
//! are accepted too.

use std::time::Duration;

use async_trait::async_trait;
use serde::Deserialize;
use serde_json::Value;

use super::{Geocoder, MAX_RESULTS};
use crate::error::ClientError;
use crate::model::SearchResult;

/// HTTP geocoder for Nominatim and services that mimic its JSON output.
#[derive(Debug, Clone)]
pub struct NominatimGeocoder {
    client: reqwest::Client,
    url: String,
}

#[derive(Debug, Deserialize)]
struct RawPlace {
    lat: Value,
    lon: Value,
    display_name: String,
}

impl NominatimGeocoder {
    /// Create a geocoder for the given search endpoint.
    ///
    /// Nominatim's usage policy requires an identifying `User-Agent`, so one
    /// is always sent.
    pub fn new(url: impl Into<String>, timeout: Duration) -> Result<Self, ClientError> {
        let url = url.into();
        let client = reqwest::Client::builder()
            .user_agent(concat!("islander/", env!("CARGO_PKG_VERSION")))
            .timeout(timeout)
            .build()
            .map_err(|e| ClientError::transport(&url, e))?;
        Ok(Self { client, url })
    }

    pub fn url(&self) -> &str {
        &self.url
    }
}

#[async_trait]
impl Geocoder for NominatimGeocoder {
    fn name(&self) -> &str {
        "nominatim"
    }

    async fn geocode(&self, query: &str) -> Result<Vec<SearchResult>, ClientError> {
        let resp = self
            .client
            .get(&self.url)
            .query(&[("format", "json"), ("q", query)])
            .send()
            .await
            .map_err(|e| ClientError::transport(&self.url, e))?;

        if !resp.status().is_success() {
            return Err(ClientError::Status {
                url: self.url.clone(),
                status: resp.status().as_u16(),
            });
        }

        let body = resp
            .text()
            .await
            .map_err(|e| ClientError::transport(&self.url, e))?;
        parse_results(&body, MAX_RESULTS).map_err(|reason| ClientError::decode(&self.url, reason))
    }
}

/// Parse the first `limit` entries of a Nominatim JSON body into search
/// results, keeping order. Entries past `limit` are never inspected.
pub fn parse_results(body: &str, limit: usize) -> Result<Vec<SearchResult>, String> {
    let raw: Vec<Value> = serde_json::from_str(body).map_err(|e| e.to_string())?;
    raw.into_iter()
        .take(limit)
        .map(|item| {
            let p: RawPlace = serde_json::from_value(item).map_err(|e| e.to_string())?;
            let latitude = coordinate(&p.lat)
                .ok_or_else(|| format!("bad lat {} for {:?}", p.lat, p.display_name))?;
            let longitude = coordinate(&p.lon)
                .ok_or_else(|| format!("bad lon {} for {:?}", p.lon, p.display_name))?;
            Ok(SearchResult {
                display_name: p.display_name,
                latitude,
                longitude,
            })
        })
        .collect()
}

fn coordinate(v: &Value) -> Option<f64> {
    match v {
        Value::String(s) => s.trim().parse().ok(),
        Value::Number(n) => n.as_f64(),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_string_coordinates() {
        let body = r#"[
            {"lat":"11.8316","lon":"93.0287","display_name":"Neil Island, South Andaman, India","place_id":1},
            {"lat":"11.98","lon":"92.99","display_name":"Havelock, India"}
        ]"#;
        let results = parse_results(body, MAX_RESULTS).unwrap();
        assert_eq!(results.len(), 2);
        assert_eq!(results[0].latitude, 11.8316);
        assert_eq!(results[0].longitude, 93.0287);
        assert_eq!(results[1].display_name, "Havelock, India");
    }

    #[test]
    fn parses_numeric_coordinates() {
        let body = r#"[{"lat":11.5,"lon":92.5,"display_name":"X"}]"#;
        let results = parse_results(body, MAX_RESULTS).unwrap();
        assert_eq!((results[0].latitude, results[0].longitude), (11.5, 92.5));
    }

    #[test]
    fn empty_array_is_ok() {
        assert!(parse_results("[]", MAX_RESULTS).unwrap().is_empty());
    }

    #[test]
    fn rejects_non_array_body() {
        assert!(parse_results(r#"{"error":"rate limited"}"#, MAX_RESULTS).is_err());
    }

    #[test]
    fn rejects_missing_display_name() {
        assert!(parse_results(r#"[{"lat":"1","lon":"2"}]"#, MAX_RESULTS).is_err());
    }

    #[test]
    fn rejects_unparsable_coordinate() {
        let err = parse_results(r#"[{"lat":"north","lon":"2","display_name":"Y"}]"#, MAX_RESULTS)
            .unwrap_err();
        assert!(err.contains("bad lat"), "unexpected error: {err}");
    }

    #[test]
    fn entries_past_the_limit_are_not_parsed() {
        let body = r#"[
            {"lat":"11.0","lon":"92.0","display_name":"A"},
            {"lat":"11.1","lon":"92.1","display_name":"B"},
            {"lat":"","lon":"92.2","display_name":"C"},
            {"lat":"11.3","lon":"92.3"}
        ]"#;
        let results = parse_results(body, 2).unwrap();
        let names: Vec<&str> = results.iter().map(|r| r.display_name.as_str()).collect();
        assert_eq!(names, ["A", "B"]);
        assert!(parse_results(body, 3).is_err());
    }
}
