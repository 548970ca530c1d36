//! Main entry point: turns a location and calendar day into climatological odds.
//!
//! [`ClimateEngine`] fetches the same month and day for each of the last N years,
//! classifies every hour against the configured [`Thresholds`] and reduces the
//! result into a [`ProbabilityReport`](crate::ProbabilityReport).

use crate::error::ClimateError;
use crate::source::fetcher::SampleFetcher;
use crate::source::power_client::PowerClient;
use crate::source::ObservationSource;
use crate::stats::reducer::reduce;
use crate::types::dimension::Dimensions;
use crate::types::report::Outcome;
use crate::types::request::{InboundQuery, LatLon, MonthDay, SampleRequest};
use crate::types::thresholds::Thresholds;
use bon::{bon, Builder};
use log::info;
use std::time::Duration;

/// Tuning knobs of a [`ClimateEngine`].
///
/// # Examples
///
/// ```
/// use climate_odds::EngineConfig;
/// use std::time::Duration;
///
/// let config = EngineConfig::builder()
///     .retry_attempts(3)
///     .retry_backoff(Duration::from_secs(2))
///     .build();
/// assert_eq!(config.timeout, Duration::from_secs(10));
/// assert_eq!(config.max_concurrent_fetches, 8);
/// ```
#[derive(Debug, Clone, PartialEq, Builder)]
pub struct EngineConfig {
    /// Upper bound for a single retrieval attempt of one year.
    #[builder(default = Duration::from_secs(10))]
    pub timeout: Duration,
    /// How many years are fetched at the same time.
    #[builder(default = 8)]
    pub max_concurrent_fetches: usize,
    /// Attempts per year, including the first. `1` disables retrying.
    #[builder(default = 1)]
    pub retry_attempts: u32,
    /// Pause between attempts of the same year.
    #[builder(default = Duration::from_secs(5))]
    pub retry_backoff: Duration,
    #[builder(default)]
    pub thresholds: Thresholds,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self::builder().build()
    }
}

/// Computes historical odds of weather conditions for a place and calendar day.
///
/// The engine is generic over its [`ObservationSource`]; [`ClimateEngine::new`] uses
/// the NASA POWER archive through [`PowerClient`].
///
/// # Examples
///
/// ```rust,no_run
/// # use climate_odds::{ClimateEngine, ClimateError, LatLon, MonthDay};
/// # #[tokio::main]
/// # async fn main() -> Result<(), ClimateError> {
/// let engine = ClimateEngine::new();
/// let outcome = engine
///     .odds()
///     .location(LatLon(-15.79, -47.88))
///     .month_day(MonthDay::new(7, 15)?)
///     .range_years(10)
///     .call()
///     .await?;
///
/// if let Some(report) = outcome.report() {
///     println!("Confidence: {}%", report.meta.confidence);
/// }
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct ClimateEngine<S = PowerClient> {
    source: S,
    config: EngineConfig,
}

impl Default for ClimateEngine<PowerClient> {
    fn default() -> Self {
        Self::new()
    }
}

impl ClimateEngine<PowerClient> {
    /// An engine backed by NASA POWER with default settings.
    pub fn new() -> Self {
        Self::with_source(PowerClient::new(), EngineConfig::default())
    }

    pub fn with_config(config: EngineConfig) -> Self {
        Self::with_source(PowerClient::new(), config)
    }
}

#[bon]
impl<S: ObservationSource> ClimateEngine<S> {
    pub fn with_source(source: S, config: EngineConfig) -> Self {
        Self { source, config }
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Runs a full analysis for `request`.
    ///
    /// The request is validated before anything is fetched. Years that cannot be
    /// retrieved or carry no usable reading only lower the confidence; when none is
    /// left the result is [`Outcome::NoUsableData`].
    ///
    /// # Errors
    ///
    /// Returns [`ClimateError::NoDimensionsSelected`] when every dimension is disabled
    /// and [`ClimateError::InvalidRangeYears`] when the range is zero or past `i32::MAX`.
    pub async fn analyze(&self, request: &SampleRequest) -> Result<Outcome, ClimateError> {
        request.validate()?;
        info!(
            "Sampling {} at ({}, {}) over {} years",
            request.month_day(),
            request.location().0,
            request.location().1,
            request.range_years()
        );

        let samples = SampleFetcher::new(&self.source, &self.config)
            .fetch_all(request)
            .await;
        Ok(reduce(
            &samples,
            request.dimensions(),
            &self.config.thresholds,
            request.range_years(),
        ))
    }

    /// Same as [`ClimateEngine::analyze`] for a query received from a routing layer.
    ///
    /// # Errors
    ///
    /// Also returns [`ClimateError::InvalidDate`] when the date is not `YYYYMMDD`.
    pub async fn analyze_query(&self, query: InboundQuery) -> Result<Outcome, ClimateError> {
        let request = SampleRequest::try_from(query)?;
        self.analyze(&request).await
    }

    /// Builder-style shortcut for [`ClimateEngine::analyze`].
    ///
    /// # Arguments
    ///
    /// * `.location(LatLon)`: **Required.** Point to sample.
    /// * `.month_day(MonthDay)`: **Required.** Calendar day to sample in every year.
    /// * `.range_years(u32)`: Optional. Number of past years. Defaults to `1`.
    /// * `.dimensions(Dimensions)`: Optional. Defaults to [`Dimensions::ALL`].
    /// * `.include_solar(bool)`: Optional. Also fetch solar parameters. Defaults to `false`.
    /// * `.reference_year(i32)`: Optional. Year counted back from. Defaults to the current year.
    #[builder]
    pub async fn odds(
        &self,
        location: LatLon,
        month_day: MonthDay,
        range_years: Option<u32>,
        dimensions: Option<Dimensions>,
        include_solar: Option<bool>,
        reference_year: Option<i32>,
    ) -> Result<Outcome, ClimateError> {
        let request = SampleRequest::builder()
            .location(location)
            .month_day(month_day)
            .range_years(range_years.unwrap_or(1))
            .dimensions(dimensions.unwrap_or_default())
            .include_solar(include_solar.unwrap_or_default())
            .maybe_reference_year(reference_year)
            .build();
        self.analyze(&request).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::source::error::FetchError;
    use crate::source::DayQuery;
    use crate::types::category::TemperatureCategory;
    use crate::types::observation::{HourKey, HourlyParameterTable, MISSING_VALUE};
    use crate::types::parameter::Parameter;
    use chrono::Datelike;
    use std::collections::HashMap;
    use std::sync::atomic::{AtomicU32, Ordering};

    /// Serves a canned hourly temperature series per year; unknown years fail.
    #[derive(Default)]
    struct ArchiveStub {
        temperatures: HashMap<i32, Vec<f64>>,
        calls: AtomicU32,
    }

    impl ArchiveStub {
        fn new(temperatures: &[(i32, &[f64])]) -> Self {
            Self {
                temperatures: temperatures
                    .iter()
                    .map(|(year, temps)| (*year, temps.to_vec()))
                    .collect(),
                calls: AtomicU32::new(0),
            }
        }
    }

    impl ObservationSource for ArchiveStub {
        async fn fetch_day(&self, query: &DayQuery) -> Result<HourlyParameterTable, FetchError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            let year = query.date.year();
            let temps = self
                .temperatures
                .get(&year)
                .ok_or_else(|| FetchError::EmptyTable {
                    date: query.date.to_string(),
                })?;
            Ok(temps
                .iter()
                .enumerate()
                .map(|(hour, t)| {
                    let key = HourKey::new(year, query.date.month(), query.date.day(), hour as u32);
                    (key, Parameter::Temperature, *t)
                })
                .collect())
        }
    }

    fn engine(stub: ArchiveStub) -> ClimateEngine<ArchiveStub> {
        let config = EngineConfig::builder()
            .timeout(Duration::from_secs(1))
            .build();
        ClimateEngine::with_source(stub, config)
    }

    #[test]
    fn test_default_config() {
        let config = EngineConfig::default();
        assert_eq!(config.timeout, Duration::from_secs(10));
        assert_eq!(config.max_concurrent_fetches, 8);
        assert_eq!(config.retry_attempts, 1);
        assert_eq!(config.retry_backoff, Duration::from_secs(5));
        assert_eq!(config.thresholds, Thresholds::default());
    }

    #[tokio::test]
    async fn test_partial_failure_lowers_confidence() -> Result<(), ClimateError> {
        let engine = engine(ArchiveStub::new(&[
            (2024, &[24.0, 28.0, 31.0, 26.0]),
            (2023, &[27.0, 36.0, MISSING_VALUE]),
        ]));

        let outcome = engine
            .odds()
            .location(LatLon(-23.55, -46.63))
            .month_day(MonthDay::new(1, 20)?)
            .range_years(3)
            .dimensions(Dimensions::TEMPERATURE)
            .reference_year(2025)
            .call()
            .await?;

        let report = outcome.report().unwrap();
        assert_eq!(report.meta.valid_years, 2);
        assert_eq!(report.meta.requested_years, 3);
        assert_eq!(report.meta.confidence, 66.7);
        let temperature = report.conditions.temperature.as_ref().unwrap();
        assert_eq!(temperature.most_probable, TemperatureCategory::VeryHot);
        assert_eq!(temperature.percentage(TemperatureCategory::Hot), 50.0);
        assert_eq!(engine.source.calls.load(Ordering::SeqCst), 3);
        Ok(())
    }

    #[tokio::test]
    async fn test_all_years_failing_is_no_usable_data() -> Result<(), ClimateError> {
        let engine = engine(ArchiveStub::default());
        let request = SampleRequest::builder()
            .location(LatLon(0.0, 0.0))
            .month_day(MonthDay::new(6, 1)?)
            .range_years(2)
            .build();
        assert_eq!(
            engine.analyze(&request).await?,
            Outcome::NoUsableData { requested_years: 2 }
        );
        Ok(())
    }

    #[tokio::test]
    async fn test_rejected_requests_never_fetch() {
        let engine = engine(ArchiveStub::new(&[(2024, &[20.0])]));
        let no_dimensions = SampleRequest::builder()
            .location(LatLon(0.0, 0.0))
            .month_day(MonthDay::new(6, 1).unwrap())
            .dimensions(Dimensions::empty())
            .build();
        assert_eq!(
            engine.analyze(&no_dimensions).await,
            Err(ClimateError::NoDimensionsSelected)
        );

        let bad_date = InboundQuery {
            latitude: 0.0,
            longitude: 0.0,
            date: "2025-07-15".to_string(),
            range_years: 3,
            temperature: true,
            rain: true,
            wind: true,
            humidity: true,
        };
        assert!(matches!(
            engine.analyze_query(bad_date).await,
            Err(ClimateError::InvalidDate { .. })
        ));
        assert_eq!(engine.source.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_analyze_query() -> Result<(), ClimateError> {
        let engine = engine(ArchiveStub::new(&[(2024, &[15.0, 18.0, 22.0])]));
        let query: InboundQuery = serde_json::from_str(
            r#"{
                "latitude": 48.85, "longitude": 2.35, "date": "20250412", "rangeYears": 1,
                "rain": false, "wind": false, "humidity": false
            }"#,
        )
        .unwrap();

        // Without a reference year the current year is used, so only check the shape.
        let outcome = engine.analyze_query(query).await?;
        if let Some(report) = outcome.report() {
            assert_eq!(report.meta.requested_years, 1);
            assert!(report.conditions.rain.is_none());
        }
        assert_eq!(engine.source.calls.load(Ordering::SeqCst), 1);
        Ok(())
    }
}
