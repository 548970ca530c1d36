//! Concurrent fan-out of one request per sampled year.

use crate::engine::EngineConfig;
use crate::source::error::FetchError;
use crate::source::{DayQuery, ObservationSource};
use crate::types::observation::HourlyParameterTable;
use crate::types::parameter::Parameter;
use crate::types::request::SampleRequest;
use futures_util::{stream, StreamExt};
use log::{debug, warn};

/// The fetch result for one sampled year. `table` is `None` when the year could
/// not be retrieved; it then only lowers the confidence.
#[derive(Debug, Clone, PartialEq)]
pub struct YearSample {
    pub year: i32,
    pub table: Option<HourlyParameterTable>,
}

/// Fetches every sampled year of a request with bounded concurrency.
///
/// Each attempt has its own timeout. A failed year is retried up to the configured
/// attempt count and is then recorded as absent. Dropping the returned future drops
/// every in-flight request with it.
pub struct SampleFetcher<'a, S> {
    source: &'a S,
    config: &'a EngineConfig,
}

impl<'a, S: ObservationSource> SampleFetcher<'a, S> {
    pub fn new(source: &'a S, config: &'a EngineConfig) -> Self {
        Self { source, config }
    }

    /// One [`YearSample`] per year key, in completion order.
    pub async fn fetch_all(&self, request: &SampleRequest) -> Vec<YearSample> {
        let parameters = Parameter::for_request(request.dimensions(), request.include_solar());
        let years = request.year_keys();
        let parameters = &parameters;

        stream::iter(years)
            .map(|year| async move {
                let table = match self.fetch_year(request, year, parameters).await {
                    Ok(table) => Some(table),
                    Err(e) => {
                        warn!("Giving up on {}: {}", year, e);
                        None
                    }
                };
                YearSample { year, table }
            })
            .buffer_unordered(self.config.max_concurrent_fetches.max(1))
            .collect()
            .await
    }

    async fn fetch_year(
        &self,
        request: &SampleRequest,
        year: i32,
        parameters: &[Parameter],
    ) -> Result<HourlyParameterTable, FetchError> {
        let Some(date) = request.month_day().in_year(year) else {
            return Err(FetchError::EmptyTable {
                date: format!("{}-{}", year, request.month_day()),
            });
        };
        let query = DayQuery {
            location: request.location(),
            date,
            parameters: parameters.to_vec(),
        };
        self.fetch_with_retry(&query).await
    }

    async fn fetch_with_retry(&self, query: &DayQuery) -> Result<HourlyParameterTable, FetchError> {
        let attempts = self.config.retry_attempts.max(1);
        let mut attempt = 1;
        loop {
            let attempt_result =
                tokio::time::timeout(self.config.timeout, self.source.fetch_day(query)).await;
            let result = match attempt_result {
                Ok(result) => result,
                Err(_) => Err(FetchError::Timeout {
                    date: query.date.to_string(),
                    after: self.config.timeout,
                }),
            };
            match result {
                Ok(table) => {
                    debug!("Fetched {} on attempt {}", query.date, attempt);
                    return Ok(table);
                }
                Err(e) if attempt < attempts => {
                    warn!(
                        "Attempt {}/{} for {} failed: {}. Retrying in {:?}",
                        attempt, attempts, query.date, e, self.config.retry_backoff
                    );
                    tokio::time::sleep(self.config.retry_backoff).await;
                    attempt += 1;
                }
                Err(e) => return Err(e),
            }
        }
    }
}
