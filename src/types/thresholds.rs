//! Classification policy: every boundary the engine compares a reading against.

use bon::Builder;
use serde::{Deserialize, Serialize};

/// Threshold values used to classify hours and days.
///
/// All comparisons use the boundaries exactly as documented on each field.
/// Unset builder fields and missing JSON keys fall back to the defaults.
///
/// ```
/// use climate_odds::Thresholds;
///
/// let defaults = Thresholds::default();
/// assert_eq!(defaults.very_hot, 35.0);
///
/// let stricter = Thresholds::builder().hot(28.0).build();
/// assert_eq!(stricter.hot, 28.0);
/// assert_eq!(stricter.cold, 20.0);
///
/// let from_json: Thresholds = serde_json::from_str(r#"{ "windy": 6.5 }"#).unwrap();
/// assert_eq!(from_json.windy, 6.5);
/// assert_eq!(from_json.very_windy, 10.0);
/// ```
#[derive(Debug, Clone, PartialEq, Builder, Serialize, Deserialize)]
#[serde(default)]
pub struct Thresholds {
    /// Temperature strictly above this is very hot (°C).
    #[builder(default = 35.0)]
    pub very_hot: f64,
    /// Temperature strictly above this (and not very hot) is hot (°C).
    #[builder(default = 30.0)]
    pub hot: f64,
    /// Temperature strictly below this is cold (°C).
    #[builder(default = 20.0)]
    pub cold: f64,
    /// Wind strictly above this is very windy (m/s).
    #[builder(default = 10.0)]
    pub very_windy: f64,
    /// Wind strictly above this (and not very windy) is windy (m/s).
    #[builder(default = 5.0)]
    pub windy: f64,
    /// Hourly precipitation strictly above this is a rain hour (mm).
    #[builder(default = 0.1)]
    pub rain_hour: f64,
    /// Daily precipitation total strictly above this is a rainy day (mm).
    #[builder(default = 1.0)]
    pub rainy_day: f64,
    /// Heat index strictly above this is uncomfortable.
    #[builder(default = 35.0)]
    pub discomfort: f64,
    /// Below this temperature the heat index is the air temperature (°C).
    #[builder(default = 27.0)]
    pub heat_index_min_temperature: f64,
    /// Below this relative humidity the heat index is the air temperature (%).
    #[builder(default = 40.0)]
    pub heat_index_min_humidity: f64,
    /// Relative humidity strictly below this is dry (%).
    #[builder(default = 40.0)]
    pub humidity_dry: f64,
    /// Relative humidity at or above this is humid (%).
    #[builder(default = 70.0)]
    pub humidity_humid: f64,
    /// Lowest pleasant temperature, inclusive (°C).
    #[builder(default = 20.0)]
    pub pleasant_min_temperature: f64,
    /// Highest pleasant temperature, inclusive (°C).
    #[builder(default = 30.0)]
    pub pleasant_max_temperature: f64,
    /// Relative humidity must stay strictly below this for a pleasant hour (%).
    #[builder(default = 70.0)]
    pub pleasant_max_humidity: f64,
    /// A dry day is sunny when its hottest hour is strictly above this (°C).
    #[builder(default = 20.0)]
    pub sunny_min_temperature: f64,
}

impl Default for Thresholds {
    fn default() -> Self {
        Thresholds::builder().build()
    }
}
