//! Secondary indices computed from already extracted samples.
//!
//! Every function here is pure. Absent inputs propagate as `None`; nothing is
//! replaced by zero.

use crate::types::observation::HourlyParameterTable;
use crate::types::parameter::Parameter;
use crate::types::thresholds::Thresholds;
use crate::utils::{mean, round_to};
use serde::Serialize;

// Rothfusz regression expressed in °C and % relative humidity.
const HI_C1: f64 = -8.784_694_755_56;
const HI_C2: f64 = 1.611_394_11;
const HI_C3: f64 = 2.338_548_838_89;
const HI_C4: f64 = -0.146_116_05;
const HI_C5: f64 = -0.012_308_094;
const HI_C6: f64 = -0.016_424_827_777_8;
const HI_C7: f64 = 0.002_211_732;
const HI_C8: f64 = 0.000_725_46;
const HI_C9: f64 = -0.000_003_582;

const UV_SCALE: f64 = 40.0;
const UV_MAX: f64 = 12.0;
const RECENT_RAIN_SAMPLES: usize = 3;
const WH_PER_KWH: f64 = 1000.0;

/// Perceived temperature combining air temperature (°C) and relative humidity (%).
///
/// Below `heat_index_min_temperature` or `heat_index_min_humidity` the result is the
/// air temperature itself.
///
/// ```
/// use climate_odds::{heat_index, Thresholds};
///
/// let t = Thresholds::default();
/// assert_eq!(heat_index(26.999, 90.0, &t), 26.999);
/// assert_eq!(heat_index(33.0, 39.0, &t), 33.0);
/// assert!(heat_index(32.0, 60.0, &t) > 37.0);
/// ```
pub fn heat_index(temperature: f64, humidity: f64, thresholds: &Thresholds) -> f64 {
    if temperature < thresholds.heat_index_min_temperature
        || humidity < thresholds.heat_index_min_humidity
    {
        return temperature;
    }
    let (t, rh) = (temperature, humidity);
    HI_C1
        + HI_C2 * t
        + HI_C3 * rh
        + HI_C4 * t * rh
        + HI_C5 * t * t
        + HI_C6 * rh * rh
        + HI_C7 * t * t * rh
        + HI_C8 * t * rh * rh
        + HI_C9 * t * t * rh * rh
}

/// Thom's discomfort index, rounded to two decimals.
pub fn discomfort_index(temperature: Option<f64>, humidity: Option<f64>) -> Option<f64> {
    let (t, h) = (temperature?, humidity?);
    Some(round_to(t - 0.55 * (1.0 - h / 100.0) * (t - 14.5), 2))
}

/// Spread between the warmest and coldest sample, rounded to two decimals.
pub fn thermal_amplitude(temperatures: &[f64]) -> Option<f64> {
    let max = temperatures.iter().copied().reduce(f64::max)?;
    let min = temperatures.iter().copied().reduce(f64::min)?;
    Some(round_to(max - min, 2))
}

/// Number of `(temperature, humidity)` samples inside the pleasant band.
pub fn pleasant_hours(samples: &[(f64, f64)], thresholds: &Thresholds) -> u32 {
    samples
        .iter()
        .filter(|(t, h)| {
            *t >= thresholds.pleasant_min_temperature
                && *t <= thresholds.pleasant_max_temperature
                && *h < thresholds.pleasant_max_humidity
        })
        .count() as u32
}

/// Share of the last three samples with rain above `rain_hour`, as a percentage.
///
/// Fewer than three samples yields `0.0`.
pub fn recent_rain_probability(precipitation: &[f64], rain_hour: f64) -> f64 {
    if precipitation.len() < RECENT_RAIN_SAMPLES {
        return 0.0;
    }
    let recent = &precipitation[precipitation.len() - RECENT_RAIN_SAMPLES..];
    let events = recent.iter().filter(|p| **p > rain_hour).count();
    round_to(100.0 * events as f64 / RECENT_RAIN_SAMPLES as f64, 1)
}

/// Rough UV index estimate from solar radiation in kWh/m², capped at 12.
pub fn uv_proxy(radiation: Option<f64>) -> Option<f64> {
    let radiation = radiation.filter(|r| r.is_finite())?;
    Some(round_to(radiation * UV_SCALE, 1).min(UV_MAX))
}

/// Derived indices for one sampled day.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DerivedMetrics {
    pub year: i32,
    pub thermal_amplitude: Option<f64>,
    pub pleasant_hours: Option<u32>,
    pub uv_index: Option<f64>,
    pub rain_probability_3h: Option<f64>,
    pub discomfort_index: Option<f64>,
    pub max_heat_index: Option<f64>,
    pub clearness_pct: Option<f64>,
}

impl DerivedMetrics {
    /// Computes every index the table has inputs for.
    pub fn from_table(year: i32, table: &HourlyParameterTable, thresholds: &Thresholds) -> Self {
        let temperatures = table.series(Parameter::Temperature);
        let humidities = table.series(Parameter::RelativeHumidity);
        let paired: Vec<(f64, f64)> = table
            .observations()
            .filter_map(|o| Some((o.temperature?, o.relative_humidity?)))
            .collect();
        let has_humidity_column = table.has_any(Parameter::RelativeHumidity);
        let has_temperature_column = table.has_any(Parameter::Temperature);

        let precipitation = table.series(Parameter::Precipitation);
        let rain_probability_3h = table
            .has_any(Parameter::Precipitation)
            .then(|| recent_rain_probability(&precipitation, thresholds.rain_hour));

        let max_heat_index = paired
            .iter()
            .map(|(t, h)| heat_index(*t, *h, thresholds))
            .reduce(f64::max)
            .map(|hi| round_to(hi, 2));

        Self {
            year,
            thermal_amplitude: thermal_amplitude(&temperatures),
            pleasant_hours: (has_temperature_column && has_humidity_column)
                .then(|| pleasant_hours(&paired, thresholds)),
            // The hourly archive reports irradiance in Wh/m².
            uv_index: uv_proxy(
                mean(&table.series(Parameter::SolarRadiation)).map(|wh| wh / WH_PER_KWH),
            ),
            rain_probability_3h,
            discomfort_index: discomfort_index(mean(&temperatures), mean(&humidities)),
            max_heat_index,
            clearness_pct: mean(&table.series(Parameter::Clearness))
                .map(|kt| round_to(kt * 100.0, 1)),
        }
    }
}

/// Derived indices of every valid year plus their cross-year means.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DerivedSummary {
    pub per_year: Vec<DerivedMetrics>,
    pub mean_thermal_amplitude: Option<f64>,
    pub mean_pleasant_hours: Option<f64>,
    pub mean_uv_index: Option<f64>,
    pub mean_rain_probability_3h: Option<f64>,
    pub mean_discomfort_index: Option<f64>,
}

impl DerivedSummary {
    /// Sorts `per_year` chronologically and averages each index over the years that have it.
    pub fn new(mut per_year: Vec<DerivedMetrics>) -> Self {
        per_year.sort_by_key(|m| m.year);
        let average = |pick: fn(&DerivedMetrics) -> Option<f64>| {
            let values: Vec<f64> = per_year.iter().filter_map(pick).collect();
            mean(&values).map(|v| round_to(v, 2))
        };
        Self {
            mean_thermal_amplitude: average(|m| m.thermal_amplitude),
            mean_pleasant_hours: average(|m| m.pleasant_hours.map(f64::from)),
            mean_uv_index: average(|m| m.uv_index),
            mean_rain_probability_3h: average(|m| m.rain_probability_3h),
            mean_discomfort_index: average(|m| m.discomfort_index),
            per_year,
        }
    }
}
