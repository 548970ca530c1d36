//! Collapses one sampled day into day-level signals and a single category per dimension.

use crate::stats::derived::heat_index;
use crate::stats::tally::DimensionTallies;
use crate::types::category::{
    DiscomfortCategory, HumidityCategory, RainCategory, TemperatureCategory, WindCategory,
};
use crate::types::dimension::Dimensions;
use crate::types::observation::HourlyParameterTable;
use crate::types::parameter::Parameter;
use crate::types::thresholds::Thresholds;
use crate::utils::mean;
use ordered_float::OrderedFloat;
use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct TemperatureStats {
    pub max: f64,
    pub min: f64,
    pub mean: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct WindStats {
    pub max: f64,
    pub mean: f64,
}

/// Day-level extrema and totals of one year, over non-missing hours only.
///
/// A field is `None` when its dimension is disabled or had no usable hour.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DayAggregate {
    pub year: i32,
    pub temperature: Option<TemperatureStats>,
    pub rain_total: Option<f64>,
    pub wind: Option<WindStats>,
    pub humidity_mean: Option<f64>,
    pub max_heat_index: Option<f64>,
}

fn max_of(values: &[f64]) -> Option<f64> {
    values.iter().copied().map(OrderedFloat).max().map(OrderedFloat::into_inner)
}

fn min_of(values: &[f64]) -> Option<f64> {
    values.iter().copied().map(OrderedFloat).min().map(OrderedFloat::into_inner)
}

impl DayAggregate {
    pub fn reduce(
        year: i32,
        table: &HourlyParameterTable,
        dimensions: Dimensions,
        thresholds: &Thresholds,
    ) -> Self {
        let enabled = |d: Dimensions| dimensions.contains(d);

        let temperature = enabled(Dimensions::TEMPERATURE)
            .then(|| table.series(Parameter::Temperature))
            .and_then(|temps| {
                Some(TemperatureStats {
                    max: max_of(&temps)?,
                    min: min_of(&temps)?,
                    mean: mean(&temps)?,
                })
            });

        let rain_total = enabled(Dimensions::RAIN)
            .then(|| table.series(Parameter::Precipitation))
            .filter(|rain| !rain.is_empty())
            .map(|rain| rain.iter().sum());

        let wind = enabled(Dimensions::WIND)
            .then(|| table.series(Parameter::WindSpeed))
            .and_then(|speeds| {
                Some(WindStats {
                    max: max_of(&speeds)?,
                    mean: mean(&speeds)?,
                })
            });

        let humidity_mean = enabled(Dimensions::HUMIDITY)
            .then(|| mean(&table.series(Parameter::RelativeHumidity)))
            .flatten();

        let max_heat_index = dimensions
            .tracks_discomfort()
            .then(|| {
                let indices: Vec<f64> = table
                    .observations()
                    .filter_map(|o| {
                        Some(heat_index(o.temperature?, o.relative_humidity?, thresholds))
                    })
                    .collect();
                max_of(&indices)
            })
            .flatten();

        Self {
            year,
            temperature,
            rain_total,
            wind,
            humidity_mean,
            max_heat_index,
        }
    }

    pub fn is_rainy(&self, thresholds: &Thresholds) -> Option<bool> {
        self.rain_total.map(|total| total > thresholds.rainy_day)
    }

    pub fn is_windy(&self, thresholds: &Thresholds) -> Option<bool> {
        self.wind.map(|w| w.max > thresholds.windy)
    }

    pub fn is_uncomfortable(&self, thresholds: &Thresholds) -> Option<bool> {
        self.max_heat_index.map(|hi| hi > thresholds.discomfort)
    }

    /// A dry day whose hottest hour is warm enough.
    pub fn is_sunny(&self, thresholds: &Thresholds) -> Option<bool> {
        let temperature = self.temperature?;
        let rain = self.rain_total?;
        Some(temperature.max > thresholds.sunny_min_temperature && rain < thresholds.rainy_day)
    }

    /// One category per dimension with data, each counted once into a fresh tally set.
    ///
    /// The recorded value is the day's representative figure: mean temperature, rain
    /// total, peak wind, mean humidity and peak heat index.
    pub fn tallies(&self, thresholds: &Thresholds) -> DimensionTallies {
        let mut tallies = DimensionTallies::default();
        if let Some(t) = self.temperature {
            tallies
                .temperature
                .record(TemperatureCategory::classify_day(t.max, t.min, thresholds), t.mean);
        }
        if let Some(total) = self.rain_total {
            tallies
                .rain
                .record(RainCategory::classify(total, thresholds.rainy_day), total);
        }
        if let Some(w) = self.wind {
            tallies.wind.record(WindCategory::classify(w.max, thresholds), w.max);
        }
        if let Some(h) = self.humidity_mean {
            tallies.humidity.record(HumidityCategory::classify(h, thresholds), h);
        }
        if let Some(hi) = self.max_heat_index {
            tallies
                .discomfort
                .record(DiscomfortCategory::classify(hi, thresholds), hi);
        }
        tallies
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::observation::{HourKey, MISSING_VALUE};

    fn table(rows: &[(u32, f64, f64, f64, f64)]) -> HourlyParameterTable {
        let mut table = HourlyParameterTable::new();
        for &(hour, t, p, w, h) in rows {
            let key = HourKey::new(2022, 9, 15, hour);
            table.insert(key, Parameter::Temperature, t);
            table.insert(key, Parameter::Precipitation, p);
            table.insert(key, Parameter::WindSpeed, w);
            table.insert(key, Parameter::RelativeHumidity, h);
        }
        table
    }

    #[test]
    fn test_reduce_day() {
        let thresholds = Thresholds::default();
        let day = DayAggregate::reduce(
            2022,
            &table(&[
                (0, 19.0, 0.2, 3.0, 90.0),
                (6, 24.0, 0.5, 6.0, 70.0),
                (12, 31.0, 0.4, 4.0, 50.0),
                (18, 26.0, MISSING_VALUE, MISSING_VALUE, 60.0),
            ]),
            Dimensions::ALL,
            &thresholds,
        );

        assert_eq!(
            day.temperature,
            Some(TemperatureStats {
                max: 31.0,
                min: 19.0,
                mean: 25.0
            })
        );
        assert!((day.rain_total.unwrap() - 1.1).abs() < 1e-9);
        assert_eq!(day.wind.map(|w| w.max), Some(6.0));
        assert_eq!(day.humidity_mean, Some(67.5));
        assert_eq!(day.is_rainy(&thresholds), Some(true));
        assert_eq!(day.is_windy(&thresholds), Some(true));
        assert_eq!(day.is_sunny(&thresholds), Some(false));
        // 31 °C at 50 % is the worst hour, ~32.6.
        assert_eq!(day.is_uncomfortable(&thresholds), Some(false));
        assert!((day.max_heat_index.unwrap() - 32.617).abs() < 0.001);
    }

    #[test]
    fn test_sentinel_does_not_change_aggregates() {
        let thresholds = Thresholds::default();
        let rows = [
            (0, 21.0, 0.0, 2.0, 65.0),
            (1, 27.0, 0.6, 4.0, 55.0),
            (2, 33.0, 0.9, 8.0, 45.0),
        ];
        let clean = DayAggregate::reduce(2022, &table(&rows), Dimensions::ALL, &thresholds);

        let mut with_gap = rows.to_vec();
        with_gap.push((3, MISSING_VALUE, MISSING_VALUE, MISSING_VALUE, MISSING_VALUE));
        let gappy = DayAggregate::reduce(2022, &table(&with_gap), Dimensions::ALL, &thresholds);

        assert_eq!(clean, gappy);
        assert_eq!(clean.tallies(&thresholds), gappy.tallies(&thresholds));
    }

    #[test]
    fn test_disabled_dimensions_stay_empty() {
        let thresholds = Thresholds::default();
        let day = DayAggregate::reduce(
            2022,
            &table(&[(0, 36.0, 2.0, 12.0, 80.0)]),
            Dimensions::TEMPERATURE,
            &thresholds,
        );
        assert!(day.temperature.is_some());
        assert_eq!(day.rain_total, None);
        assert_eq!(day.wind, None);
        assert_eq!(day.humidity_mean, None);
        assert_eq!(day.max_heat_index, None);

        let tallies = day.tallies(&thresholds);
        assert_eq!(tallies.temperature.count(TemperatureCategory::VeryHot), 1);
        assert_eq!(tallies.rain.total(), 0);
    }

    #[test]
    fn test_day_categories() {
        let thresholds = Thresholds::default();
        let day = DayAggregate::reduce(
            2022,
            &table(&[(10, 28.0, 0.3, 11.0, 30.0), (11, 17.0, 0.4, 2.0, 35.0)]),
            Dimensions::ALL,
            &thresholds,
        );
        let tallies = day.tallies(&thresholds);
        assert_eq!(tallies.temperature.count(TemperatureCategory::Cold), 1);
        assert_eq!(tallies.rain.count(RainCategory::Dry), 1);
        assert_eq!(tallies.wind.count(WindCategory::VeryWindy), 1);
        assert_eq!(tallies.humidity.count(HumidityCategory::Dry), 1);
        assert_eq!(tallies.discomfort.count(DiscomfortCategory::Comfortable), 1);
        assert_eq!(tallies.wind.mean(), Some(11.0));
    }
}
