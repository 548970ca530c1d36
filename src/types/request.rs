//! Request types: where, which calendar day, how many years back and which dimensions.

use crate::error::ClimateError;
use crate::types::dimension::Dimensions;
use bon::Builder;
use chrono::{Datelike, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// A point as `(latitude, longitude)` in decimal degrees.
///
/// ```
/// use climate_odds::LatLon;
///
/// let vilhena = LatLon(-12.74, -60.15);
/// assert_eq!(vilhena.0, -12.74); // Latitude
/// assert_eq!(vilhena.1, -60.15); // Longitude
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LatLon(pub f64, pub f64);

/// A calendar day without a year.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct MonthDay {
    month: u32,
    day: u32,
}

impl MonthDay {
    /// Validates the pair against a leap year, so `02-29` is accepted.
    pub fn new(month: u32, day: u32) -> Result<Self, ClimateError> {
        NaiveDate::from_ymd_opt(2000, month, day)
            .map(|_| Self { month, day })
            .ok_or_else(|| ClimateError::InvalidDate {
                input: format!("{month:02}{day:02}"),
            })
    }

    /// Takes month and day from a `YYYYMMDD` string; the year part is ignored.
    ///
    /// ```
    /// use climate_odds::MonthDay;
    ///
    /// let md = MonthDay::parse_yyyymmdd("20250715").unwrap();
    /// assert_eq!((md.month(), md.day()), (7, 15));
    /// assert!(MonthDay::parse_yyyymmdd("2025-07-15").is_err());
    /// ```
    pub fn parse_yyyymmdd(input: &str) -> Result<Self, ClimateError> {
        let invalid = || ClimateError::InvalidDate {
            input: input.to_string(),
        };
        if input.len() != 8 || !input.bytes().all(|b| b.is_ascii_digit()) {
            return Err(invalid());
        }
        let date = NaiveDate::parse_from_str(input, "%Y%m%d").map_err(|_| invalid())?;
        Ok(Self {
            month: date.month(),
            day: date.day(),
        })
    }

    pub fn month(self) -> u32 {
        self.month
    }

    pub fn day(self) -> u32 {
        self.day
    }

    /// This day in `year`. February 29th falls back to the 28th in common years.
    pub fn in_year(self, year: i32) -> Option<NaiveDate> {
        NaiveDate::from_ymd_opt(year, self.month, self.day).or_else(|| {
            (self.month == 2 && self.day == 29)
                .then(|| NaiveDate::from_ymd_opt(year, 2, 28))
                .flatten()
        })
    }
}

impl fmt::Display for MonthDay {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:02}-{:02}", self.month, self.day)
    }
}

/// One analysis request. Immutable once built.
///
/// ```
/// use climate_odds::{Dimensions, LatLon, MonthDay, SampleRequest};
///
/// let request = SampleRequest::builder()
///     .location(LatLon(-12.74, -60.15))
///     .month_day(MonthDay::new(9, 15).unwrap())
///     .range_years(10)
///     .dimensions(Dimensions::TEMPERATURE | Dimensions::RAIN)
///     .build();
///
/// assert_eq!(request.year_keys_from(2025), (2015..=2024).rev().collect::<Vec<_>>());
/// ```
#[derive(Debug, Clone, PartialEq, Builder)]
pub struct SampleRequest {
    location: LatLon,
    month_day: MonthDay,
    #[builder(default = 1)]
    range_years: u32,
    #[builder(default)]
    dimensions: Dimensions,
    /// Also request solar radiation and clearness for the derived summary.
    #[builder(default)]
    include_solar: bool,
    /// Year counted back from; the current UTC year when unset.
    reference_year: Option<i32>,
}

impl SampleRequest {
    pub fn location(&self) -> LatLon {
        self.location
    }

    pub fn month_day(&self) -> MonthDay {
        self.month_day
    }

    pub fn range_years(&self) -> u32 {
        self.range_years
    }

    pub fn dimensions(&self) -> Dimensions {
        self.dimensions
    }

    pub fn include_solar(&self) -> bool {
        self.include_solar
    }

    pub fn reference_year(&self) -> i32 {
        self.reference_year.unwrap_or_else(|| Utc::now().year())
    }

    /// The sampled years, most recent first.
    pub fn year_keys(&self) -> Vec<i32> {
        self.year_keys_from(self.reference_year())
    }

    /// `reference - i` for `i` in `1..=range_years`, stopping before the year would underflow.
    ///
    /// Empty when the range does not pass [`SampleRequest::validate`].
    pub fn year_keys_from(&self, reference: i32) -> Vec<i32> {
        let Ok(count) = checked_range_years(self.range_years) else {
            return Vec::new();
        };
        (1..=count).map_while(|i| reference.checked_sub(i)).collect()
    }

    /// Rejects requests that must fail before any network call.
    pub fn validate(&self) -> Result<(), ClimateError> {
        if self.dimensions.is_empty() {
            return Err(ClimateError::NoDimensionsSelected);
        }
        checked_range_years(self.range_years)?;
        Ok(())
    }
}

/// The range as a year offset. Zero and ranges past `i32::MAX` are rejected.
fn checked_range_years(range_years: u32) -> Result<i32, ClimateError> {
    i32::try_from(range_years)
        .ok()
        .filter(|&years| years > 0)
        .ok_or(ClimateError::InvalidRangeYears(range_years))
}

fn enabled() -> bool {
    true
}

/// The query shape handed over by a routing layer.
///
/// The four dimension switches default to `true` when omitted.
///
/// ```
/// use climate_odds::{Dimensions, InboundQuery, SampleRequest};
///
/// let query: InboundQuery = serde_json::from_str(
///     r#"{
///         "latitude": -10.12, "longitude": -55.98,
///         "date": "20250715", "rangeYears": 5, "wind": false
///     }"#,
/// ).unwrap();
/// let request = SampleRequest::try_from(query).unwrap();
/// assert_eq!(request.range_years(), 5);
/// assert!(!request.dimensions().contains(Dimensions::WIND));
/// assert!(request.dimensions().contains(Dimensions::RAIN));
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InboundQuery {
    pub latitude: f64,
    pub longitude: f64,
    /// `YYYYMMDD`; only month and day are used.
    pub date: String,
    pub range_years: u32,
    #[serde(default = "enabled")]
    pub temperature: bool,
    #[serde(default = "enabled")]
    pub rain: bool,
    #[serde(default = "enabled")]
    pub wind: bool,
    #[serde(default = "enabled")]
    pub humidity: bool,
}

impl TryFrom<InboundQuery> for SampleRequest {
    type Error = ClimateError;

    fn try_from(query: InboundQuery) -> Result<Self, Self::Error> {
        let month_day = MonthDay::parse_yyyymmdd(&query.date)?;
        checked_range_years(query.range_years)?;
        Ok(SampleRequest::builder()
            .location(LatLon(query.latitude, query.longitude))
            .month_day(month_day)
            .range_years(query.range_years)
            .dimensions(Dimensions::from_switches(
                query.temperature,
                query.rain,
                query.wind,
                query.humidity,
            ))
            .build())
    }
}
