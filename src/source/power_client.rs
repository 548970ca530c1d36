//! Client for the NASA POWER hourly point archive.

use crate::source::error::FetchError;
use crate::source::{DayQuery, ObservationSource};
use crate::types::observation::{HourKey, HourlyParameterTable};
use crate::types::parameter::Parameter;
use log::{debug, info, warn};
use reqwest::Client;
use serde::Deserialize;
use std::collections::BTreeMap;

pub const POWER_HOURLY_URL: &str = "https://power.larc.nasa.gov/api/temporal/hourly/point";
const COMMUNITY: &str = "RE";

#[derive(Debug, Deserialize)]
struct PowerResponse {
    properties: Option<PowerProperties>,
}

#[derive(Debug, Deserialize)]
struct PowerProperties {
    parameter: Option<BTreeMap<String, BTreeMap<String, Option<f64>>>>,
}

/// Fetches one day of hourly readings per request.
#[derive(Debug, Clone)]
pub struct PowerClient {
    client: Client,
    base_url: String,
}

impl Default for PowerClient {
    fn default() -> Self {
        Self::new()
    }
}

impl PowerClient {
    pub fn new() -> Self {
        Self::with_base_url(POWER_HOURLY_URL)
    }

    /// Points the client at another host serving the same API, such as a mirror.
    pub fn with_base_url(base_url: impl Into<String>) -> Self {
        Self {
            client: Client::new(),
            base_url: base_url.into(),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Query string for one day; `start` and `end` are the same date.
    pub fn query_pairs(query: &DayQuery) -> Vec<(&'static str, String)> {
        let stamp = query.date.format("%Y%m%d").to_string();
        vec![
            ("parameters", Parameter::join_codes(&query.parameters)),
            ("community", COMMUNITY.to_string()),
            ("longitude", query.location.1.to_string()),
            ("latitude", query.location.0.to_string()),
            ("start", stamp.clone()),
            ("end", stamp),
            ("format", "JSON".to_string()),
        ]
    }
}

/// Reads `properties.parameter.{CODE}.{YYYYMMDDHH}` into a table.
///
/// Unknown parameter codes and unreadable timestamps are skipped. A body without
/// that shape, or one without a single hour, is an error.
pub fn parse_power_response(
    url: &str,
    date: &str,
    body: &str,
) -> Result<HourlyParameterTable, FetchError> {
    let response: PowerResponse =
        serde_json::from_str(body).map_err(|source| FetchError::JsonParse {
            url: url.to_string(),
            source,
        })?;
    let parameters = response
        .properties
        .and_then(|p| p.parameter)
        .ok_or_else(|| FetchError::MalformedResponse {
            url: url.to_string(),
            reason: "missing properties.parameter".to_string(),
        })?;

    let mut table = HourlyParameterTable::new();
    for (code, series) in parameters {
        let Some(parameter) = Parameter::from_code(&code) else {
            debug!("Ignoring unrequested parameter {}", code);
            continue;
        };
        for (stamp, value) in series {
            let Some(key) = HourKey::parse(&stamp) else {
                debug!("Ignoring unreadable timestamp {} for {}", stamp, code);
                continue;
            };
            if let Some(value) = value {
                table.insert(key, parameter, value);
            }
        }
    }

    if table.is_empty() {
        return Err(FetchError::EmptyTable {
            date: date.to_string(),
        });
    }
    Ok(table)
}

impl ObservationSource for PowerClient {
    async fn fetch_day(&self, query: &DayQuery) -> Result<HourlyParameterTable, FetchError> {
        let request = self
            .client
            .get(&self.base_url)
            .query(&Self::query_pairs(query))
            .build()
            .map_err(|e| FetchError::NetworkRequest(self.base_url.clone(), e))?;
        let url = request.url().to_string();
        debug!("Requesting {}", url);

        let response = self
            .client
            .execute(request)
            .await
            .map_err(|e| FetchError::NetworkRequest(url.clone(), e))?;

        let response = match response.error_for_status() {
            Ok(resp) => resp,
            Err(e) => {
                warn!("HTTP error for {}: {:?}", url, e);
                return Err(if let Some(status) = e.status() {
                    FetchError::HttpStatus {
                        url,
                        status,
                        source: e,
                    }
                } else {
                    FetchError::NetworkRequest(url, e)
                });
            }
        };

        let body = response
            .text()
            .await
            .map_err(|e| FetchError::NetworkRequest(url.clone(), e))?;
        let table = parse_power_response(&url, &query.date.to_string(), &body)?;
        info!("Received {} hourly rows for {}", table.len(), query.date);
        Ok(table)
    }
}
