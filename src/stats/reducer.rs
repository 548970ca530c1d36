//! Folds the per-year samples into a [`ProbabilityReport`].
//!
//! Each year is reduced on its own into a [`YearOutcome`]; outcomes are then merged
//! with sums and counts only, so the order in which years arrive does not matter.

use crate::source::fetcher::YearSample;
use crate::stats::classify::{HourBuckets, HourlyClassifier};
use crate::stats::daily::DayAggregate;
use crate::stats::derived::{DerivedMetrics, DerivedSummary};
use crate::stats::tally::DimensionTallies;
use crate::types::dimension::Dimensions;
use crate::types::observation::HourlyParameterTable;
use crate::types::parameter::Parameter;
use crate::types::report::{
    hour_label, ConditionReport, Meta, Outcome, ProbabilityReport, YearStatus,
};
use crate::types::thresholds::Thresholds;
use crate::utils::{percentage, round_to};
use log::{debug, info};

/// Decides whether a fetched year counts at all. Chosen once per run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum YearGate {
    /// The year needs at least one usable temperature hour.
    Temperature,
    /// The year needs at least one usable reading in any of these dimensions.
    AnyOf(Dimensions),
}

impl YearGate {
    pub fn for_dimensions(dimensions: Dimensions) -> Self {
        if dimensions.contains(Dimensions::TEMPERATURE) {
            YearGate::Temperature
        } else {
            YearGate::AnyOf(dimensions)
        }
    }

    pub fn admits(self, table: &HourlyParameterTable) -> bool {
        match self {
            YearGate::Temperature => table.has_any(Parameter::Temperature),
            YearGate::AnyOf(dimensions) => Parameter::for_request(dimensions, false)
                .into_iter()
                .any(|p| table.has_any(p)),
        }
    }
}

/// Everything one valid year contributes.
#[derive(Debug, Clone, PartialEq)]
pub struct YearOutcome {
    pub day: DayAggregate,
    pub hours: HourBuckets,
    pub derived: DerivedMetrics,
}

impl YearOutcome {
    /// Reduces one year's table, or `None` if the gate rejects it.
    pub fn from_table(
        year: i32,
        table: &HourlyParameterTable,
        dimensions: Dimensions,
        thresholds: &Thresholds,
        gate: YearGate,
    ) -> Option<Self> {
        if !gate.admits(table) {
            debug!("Year {} has no usable sample for {:?}, skipping", year, gate);
            return None;
        }

        let classifier = HourlyClassifier::new(dimensions, thresholds);
        let mut hours = HourBuckets::default();
        for observation in table.observations() {
            let classification = classifier.classify(observation);
            if classification.is_empty() {
                debug!("Hour {} of {} has no usable reading", observation.key, year);
                continue;
            }
            hours.record(observation.key.hour, &classification);
        }

        Some(Self {
            day: DayAggregate::reduce(year, table, dimensions, thresholds),
            hours,
            derived: DerivedMetrics::from_table(year, table, thresholds),
        })
    }
}

/// Running totals over valid years.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ClimateAccumulator {
    valid_years: u32,
    daily: DimensionTallies,
    hourly: HourBuckets,
    years: Vec<YearStatus>,
    derived: Vec<DerivedMetrics>,
}

impl ClimateAccumulator {
    pub fn absorb(mut self, outcome: YearOutcome, thresholds: &Thresholds) -> Self {
        let day = &outcome.day;
        self.valid_years += 1;
        self.daily.merge(&day.tallies(thresholds));
        self.hourly.merge(&outcome.hours);
        self.years.push(YearStatus {
            year: day.year,
            rainy: day.is_rainy(thresholds),
            sunny: day.is_sunny(thresholds),
            mean_temperature: day.temperature.map(|t| round_to(t.mean, 1)),
        });
        self.derived.push(outcome.derived);
        self
    }

    pub fn valid_years(&self) -> u32 {
        self.valid_years
    }

    /// Turns the totals into odds. Zero valid years is reported as [`Outcome::NoUsableData`].
    pub fn finish(mut self, dimensions: Dimensions, requested_years: u32) -> Outcome {
        let Some(confidence) = percentage(self.valid_years, requested_years)
            .filter(|_| self.valid_years > 0)
        else {
            return Outcome::NoUsableData { requested_years };
        };

        let hourly = self
            .hourly
            .iter()
            .map(|(hour, tallies)| {
                (hour_label(hour), ConditionReport::from_tallies(tallies, dimensions))
            })
            .collect();
        self.years.sort_by_key(|y| y.year);

        Outcome::Report(ProbabilityReport {
            conditions: ConditionReport::from_tallies(&self.daily, dimensions),
            hourly,
            years: self.years,
            derived: DerivedSummary::new(self.derived),
            meta: Meta {
                confidence,
                valid_years: self.valid_years,
                requested_years,
            },
        })
    }
}

/// Reduces fetched samples into the final outcome.
///
/// Absent years only lower the confidence. `requested_years` is the denominator of
/// the confidence, normally the number of samples.
pub fn reduce(
    samples: &[YearSample],
    dimensions: Dimensions,
    thresholds: &Thresholds,
    requested_years: u32,
) -> Outcome {
    let gate = YearGate::for_dimensions(dimensions);
    let accumulator = samples
        .iter()
        .filter_map(|sample| {
            let table = sample.table.as_ref()?;
            YearOutcome::from_table(sample.year, table, dimensions, thresholds, gate)
        })
        .fold(ClimateAccumulator::default(), |acc, outcome| {
            acc.absorb(outcome, thresholds)
        });

    info!(
        "{} of {} sampled years usable",
        accumulator.valid_years(),
        requested_years
    );
    accumulator.finish(dimensions, requested_years)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::category::{
        Category, DiscomfortCategory, HumidityCategory, RainCategory, TemperatureCategory,
        WindCategory,
    };
    use crate::types::observation::{HourKey, MISSING_VALUE};
    use crate::types::report::DimensionReport;

    /// `(hour, temperature, precipitation, wind, humidity)` rows for one year.
    fn year(year: i32, rows: &[(u32, f64, f64, f64, f64)]) -> YearSample {
        let mut table = HourlyParameterTable::new();
        for &(hour, t, p, w, h) in rows {
            let key = HourKey::new(year, 9, 15, hour);
            table.insert(key, Parameter::Temperature, t);
            table.insert(key, Parameter::Precipitation, p);
            table.insert(key, Parameter::WindSpeed, w);
            table.insert(key, Parameter::RelativeHumidity, h);
        }
        YearSample {
            year,
            table: Some(table),
        }
    }

    fn absent(year: i32) -> YearSample {
        YearSample { year, table: None }
    }

    fn report(outcome: Outcome) -> ProbabilityReport {
        outcome.into_report().expect("expected a report")
    }

    fn assert_shares_sum_to_100<C: Category>(report: &Option<DimensionReport<C>>) {
        if let Some(report) = report {
            let sum: f64 = report.shares.iter().map(|(_, p)| p).sum();
            let slack = 0.05 * report.shares.len() as f64;
            assert!((sum - 100.0).abs() <= slack, "shares sum to {sum}");
            assert!(report.shares.iter().all(|(_, p)| (0.0..=100.0).contains(p)));
        }
    }

    #[test]
    fn test_failed_year_lowers_confidence_only() {
        let thresholds = Thresholds::default();
        let samples = [
            year(2024, &[(10, 25.0, 0.0, 2.0, 50.0), (14, 31.0, 0.0, 3.0, 45.0)]),
            year(2023, &[(10, 27.0, 0.0, 2.0, 50.0), (14, 36.0, 0.0, 3.0, 30.0)]),
            absent(2022),
        ];
        let report = report(reduce(&samples, Dimensions::TEMPERATURE, &thresholds, 3));

        assert_eq!(report.meta.valid_years, 2);
        assert_eq!(report.meta.confidence, 66.7);
        let temperature = report.conditions.temperature.as_ref().unwrap();
        assert_eq!(temperature.total, 2);
        assert_eq!(temperature.percentage(TemperatureCategory::VeryHot), 50.0);
        assert_eq!(temperature.percentage(TemperatureCategory::Hot), 50.0);
        assert_eq!(temperature.most_probable, TemperatureCategory::VeryHot);
        assert_eq!(
            report.years.iter().map(|y| y.year).collect::<Vec<_>>(),
            vec![2023, 2024]
        );
        assert!(report.conditions.rain.is_none());
    }

    #[test]
    fn test_report_json_uses_camel_case_keys() {
        let thresholds = Thresholds::default();
        let samples = [
            year(2024, &[(14, 31.0, 0.0, 3.0, 45.0)]),
            absent(2023),
        ];
        let outcome = reduce(&samples, Dimensions::TEMPERATURE, &thresholds, 2);
        let json = serde_json::to_value(&outcome).unwrap();

        assert_eq!(json["status"], "report");
        assert_eq!(json["meta"]["validYears"], 1);
        assert_eq!(json["meta"]["requestedYears"], 2);
        assert_eq!(json["meta"]["confidence"], 50.0);
        assert!(json["meta"].get("valid_years").is_none());
        assert_eq!(json["temperature"]["mostProbable"], "hot");
        assert_eq!(json["years"][0]["meanTemperature"], 31.0);
        assert!(json["derived"]["perYear"].is_array());
        assert!(json["hourly"]["14:00"]["temperature"]["percentages"].is_object());
    }

    #[test]
    fn test_no_valid_year_is_no_usable_data() {
        let thresholds = Thresholds::default();
        let samples = [
            absent(2024),
            year(2023, &[(0, MISSING_VALUE, 0.5, 3.0, 60.0)]),
        ];
        assert_eq!(
            reduce(&samples, Dimensions::ALL, &thresholds, 2),
            Outcome::NoUsableData { requested_years: 2 }
        );
        assert_eq!(
            reduce(&[], Dimensions::ALL, &thresholds, 0),
            Outcome::NoUsableData { requested_years: 0 }
        );
    }

    #[test]
    fn test_gate_without_temperature_uses_enabled_dimensions() {
        let thresholds = Thresholds::default();
        let samples = [year(2023, &[(0, MISSING_VALUE, 0.5, 3.0, 60.0)])];

        let outcome = reduce(&samples, Dimensions::RAIN | Dimensions::WIND, &thresholds, 1);
        assert_eq!(report(outcome).meta.valid_years, 1);

        let only_humidity = [year(2023, &[(0, 25.0, 0.5, 3.0, MISSING_VALUE)])];
        let outcome = reduce(&only_humidity, Dimensions::HUMIDITY, &thresholds, 1);
        assert_eq!(outcome, Outcome::NoUsableData { requested_years: 1 });
    }

    #[test]
    fn test_denominators_are_per_dimension() {
        let thresholds = Thresholds::default();
        let samples = [
            year(2024, &[(12, 28.0, 2.0, 6.0, 80.0)]),
            year(2023, &[(12, 22.0, 0.0, MISSING_VALUE, 50.0)]),
            year(2022, &[(12, 18.0, MISSING_VALUE, MISSING_VALUE, 90.0)]),
        ];
        let report = report(reduce(&samples, Dimensions::ALL, &thresholds, 3));

        assert_eq!(report.meta.confidence, 100.0);
        assert_eq!(report.conditions.temperature.as_ref().unwrap().total, 3);
        let rain = report.conditions.rain.as_ref().unwrap();
        assert_eq!(rain.total, 2);
        assert_eq!(rain.percentage(RainCategory::Rainy), 50.0);
        let wind = report.conditions.wind.as_ref().unwrap();
        assert_eq!(wind.total, 1);
        assert_eq!(wind.most_probable, WindCategory::Windy);
        assert_eq!(wind.percentage(WindCategory::Windy), 100.0);
        let humidity = report.conditions.humidity.as_ref().unwrap();
        assert_eq!(humidity.most_probable, HumidityCategory::Humid);
        assert_eq!(humidity.mean, Some(73.3));

        assert_shares_sum_to_100(&report.conditions.temperature);
        assert_shares_sum_to_100(&report.conditions.rain);
        assert_shares_sum_to_100(&report.conditions.wind);
        assert_shares_sum_to_100(&report.conditions.humidity);
        assert_shares_sum_to_100(&report.conditions.discomfort);
    }

    #[test]
    fn test_hourly_map_always_has_24_hours() {
        let thresholds = Thresholds::default();
        let samples = [
            year(2024, &[(15, 33.0, 0.4, 11.0, 65.0), (3, 19.0, 0.0, 1.0, 90.0)]),
            year(2023, &[(15, 29.0, 0.0, 4.0, 55.0)]),
        ];
        let report = report(reduce(&samples, Dimensions::ALL, &thresholds, 2));

        assert_eq!(report.hourly.len(), 24);
        assert_eq!(report.hourly.keys().next().map(String::as_str), Some("00:00"));
        assert_eq!(report.hourly.keys().last().map(String::as_str), Some("23:00"));
        assert_eq!(report.hour(0), Some(&ConditionReport::default()));

        let afternoon = report.hour(15).unwrap();
        let temperature = afternoon.temperature.as_ref().unwrap();
        assert_eq!(temperature.total, 2);
        assert_eq!(temperature.percentage(TemperatureCategory::Hot), 50.0);
        assert_eq!(temperature.mean, Some(31.0));
        assert_eq!(afternoon.rain.as_ref().unwrap().percentage(RainCategory::Rainy), 50.0);
        assert_eq!(afternoon.wind.as_ref().unwrap().percentage(WindCategory::VeryWindy), 50.0);
        // 33 °C at 65 % feels like ~39.
        let discomfort = afternoon.discomfort.as_ref().unwrap();
        assert_eq!(discomfort.percentage(DiscomfortCategory::Uncomfortable), 50.0);

        let night = report.hour(3).unwrap();
        assert_eq!(night.temperature.as_ref().unwrap().most_probable, TemperatureCategory::Cold);
    }

    #[test]
    fn test_sentinel_reading_changes_nothing() {
        let thresholds = Thresholds::default();
        let rows = [(8, 24.0, 0.0, 3.0, 70.0), (13, 32.0, 1.5, 9.0, 55.0)];
        let clean = reduce(&[year(2024, &rows)], Dimensions::ALL, &thresholds, 1);

        let mut with_sentinel = rows.to_vec();
        with_sentinel.push((20, MISSING_VALUE, MISSING_VALUE, MISSING_VALUE, MISSING_VALUE));
        let gappy = reduce(&[year(2024, &with_sentinel)], Dimensions::ALL, &thresholds, 1);

        assert_eq!(clean, gappy);
    }

    #[test]
    fn test_year_order_does_not_matter() {
        let thresholds = Thresholds::default();
        let a = year(2024, &[(9, 31.0, 0.3, 4.0, 60.0), (15, 35.5, 0.0, 7.0, 45.0)]);
        let b = year(2023, &[(9, 18.0, 2.0, 12.0, 95.0)]);
        let c = year(2022, &[(9, 24.0, 0.0, 1.0, 50.0)]);

        let forward = reduce(
            &[a.clone(), b.clone(), c.clone(), absent(2021)],
            Dimensions::ALL,
            &thresholds,
            4,
        );
        let shuffled = reduce(&[absent(2021), c, a, b], Dimensions::ALL, &thresholds, 4);
        assert_eq!(forward, shuffled);
    }

    #[test]
    fn test_year_status() {
        let thresholds = Thresholds::default();
        let samples = [
            year(2024, &[(12, 26.0, 0.2, 2.0, 50.0), (13, 27.0, 0.3, 2.0, 50.0)]),
            year(2023, &[(12, 21.0, 1.2, 2.0, 80.0)]),
        ];
        let report = report(reduce(&samples, Dimensions::ALL, &thresholds, 2));
        assert_eq!(
            report.years,
            vec![
                YearStatus {
                    year: 2023,
                    rainy: Some(true),
                    sunny: Some(false),
                    mean_temperature: Some(21.0),
                },
                YearStatus {
                    year: 2024,
                    rainy: Some(false),
                    sunny: Some(true),
                    mean_temperature: Some(26.5),
                },
            ]
        );
        assert_eq!(report.derived.per_year.len(), 2);
    }
}
