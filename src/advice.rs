//! Turns an [`Outcome`] into a short go/no-go recommendation.
//!
//! The [`AdviceGenerator`] trait is the seam for richer generators, such as one
//! backed by a language model. [`HeuristicAdvisor`] is a rule based implementation.

use crate::types::category::{Category, RainCategory, TemperatureCategory, WindCategory};
use crate::types::report::{Outcome, ProbabilityReport};
use chrono::NaiveDate;
use log::debug;
use serde::Serialize;
use std::future::Future;

/// Rain odds, in percent, from which an outdoor plan should be postponed.
pub const DELAY_RAIN_PROBABILITY: f64 = 60.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum AdviceStatus {
    Go,
    Adjust,
    Delay,
}

/// Where and when the plan takes place.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AdviceContext {
    pub lat: f64,
    pub lon: f64,
    pub date: NaiveDate,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Tips {
    pub hydration: String,
    pub clothing: String,
    pub route: String,
    pub shelter: String,
}

/// Figures the advice was based on.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Indicators {
    pub mean_temperature: Option<f64>,
    pub rain_probability: Option<f64>,
    pub mean_humidity: Option<f64>,
    pub temperature_category: Option<&'static str>,
    pub wind_category: Option<&'static str>,
    pub confidence: f64,
    pub valid_years: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Advice {
    pub status: AdviceStatus,
    pub summary: String,
    pub advice: Vec<String>,
    pub tips: Tips,
    pub indicators: Option<Indicators>,
    pub context: AdviceContext,
}

pub trait AdviceGenerator: Send + Sync {
    /// `question` is an optional free-text question from the user.
    fn advise(
        &self,
        outcome: &Outcome,
        context: &AdviceContext,
        question: Option<&str>,
    ) -> impl Future<Output = Advice> + Send;
}

/// Recommends delaying when rain is likely and going otherwise.
///
/// Falls back to [`AdviceStatus::Adjust`] when the outcome carries none of the
/// temperature, rain and humidity figures.
#[derive(Debug, Clone, Copy, Default)]
pub struct HeuristicAdvisor;

impl HeuristicAdvisor {
    fn indicators(report: &ProbabilityReport) -> Indicators {
        let conditions = &report.conditions;
        Indicators {
            mean_temperature: conditions.temperature.as_ref().and_then(|t| t.mean),
            rain_probability: conditions
                .rain
                .as_ref()
                .map(|r| r.percentage(RainCategory::Rainy)),
            mean_humidity: conditions.humidity.as_ref().and_then(|h| h.mean),
            temperature_category: conditions
                .temperature
                .as_ref()
                .map(|t| TemperatureCategory::label(t.most_probable)),
            wind_category: conditions
                .wind
                .as_ref()
                .map(|w| WindCategory::label(w.most_probable)),
            confidence: report.meta.confidence,
            valid_years: report.meta.valid_years,
        }
    }

    fn adjust(reason: &str, context: &AdviceContext) -> Advice {
        Advice {
            status: AdviceStatus::Adjust,
            summary: format!(
                "Incomplete climate data: {reason} Adjust the time or route and try again."
            ),
            advice: vec![
                "Double-check the weather data.".to_string(),
                "Watch for updates closer to the event.".to_string(),
            ],
            tips: Tips {
                hydration: "Drink water regularly.".to_string(),
                clothing: "Light, layered clothing.".to_string(),
                route: "Prefer places with cover nearby.".to_string(),
                shelter: "Consider tents or indoor areas.".to_string(),
            },
            indicators: None,
            context: *context,
        }
    }

    fn recommend(indicators: Indicators, context: &AdviceContext) -> Advice {
        let delay = indicators.rain_probability.unwrap_or_default() >= DELAY_RAIN_PROBABILITY;
        let (status, summary, advice, route, shelter) = if delay {
            let humidity = indicators
                .mean_humidity
                .map_or("high".to_string(), |h| format!("(~{h}%)"));
            let rain = indicators
                .rain_probability
                .map(|p| format!(" (~{p}%)"))
                .unwrap_or_default();
            (
                AdviceStatus::Delay,
                format!(
                    "Rain likely{rain} and humidity {humidity}. \
                     Consider postponing or using shelter."
                ),
                ["Have a covered plan B.", "Check the rain radar 1 to 2 hours before."],
                "Pick a route with shelters.",
                "Tent or covered porch.",
            )
        } else {
            let temperature = indicators
                .mean_temperature
                .map(|t| format!(" (~{t}°C)"))
                .unwrap_or_default();
            (
                AdviceStatus::Go,
                format!("Favourable weather{temperature}. Good window for outdoor activity."),
                ["Wear sunscreen.", "Avoid the midday heat peak (12:00 to 15:00)."],
                "Prefer shaded routes.",
                "Green, ventilated area.",
            )
        };

        Advice {
            status,
            summary,
            advice: advice.iter().map(|s| s.to_string()).collect(),
            tips: Tips {
                hydration: "Bring water.".to_string(),
                clothing: "Light clothing.".to_string(),
                route: route.to_string(),
                shelter: shelter.to_string(),
            },
            indicators: Some(indicators),
            context: *context,
        }
    }
}

impl AdviceGenerator for HeuristicAdvisor {
    async fn advise(
        &self,
        outcome: &Outcome,
        context: &AdviceContext,
        question: Option<&str>,
    ) -> Advice {
        if let Some(question) = question {
            debug!("Question ignored by heuristic advisor: {}", question);
        }
        let Some(report) = outcome.report() else {
            return Self::adjust("no usable year in the archive.", context);
        };
        let indicators = Self::indicators(report);
        if indicators.mean_temperature.is_none()
            && indicators.rain_probability.is_none()
            && indicators.mean_humidity.is_none()
        {
            return Self::adjust("no temperature, rain or humidity figures.", context);
        }
        Self::recommend(indicators, context)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::source::fetcher::YearSample;
    use crate::stats::reducer::reduce;
    use crate::types::dimension::Dimensions;
    use crate::types::observation::{HourKey, HourlyParameterTable};
    use crate::types::parameter::Parameter;
    use crate::types::thresholds::Thresholds;

    fn context() -> AdviceContext {
        AdviceContext {
            lat: -15.79,
            lon: -47.88,
            date: NaiveDate::from_ymd_opt(2025, 7, 15).unwrap(),
        }
    }

    /// One year per entry, each a single hour with `(temperature, rain)`.
    fn outcome(days: &[(f64, f64)], dimensions: Dimensions) -> Outcome {
        let samples: Vec<YearSample> = days
            .iter()
            .enumerate()
            .map(|(i, (t, p))| {
                let year = 2024 - i as i32;
                let key = HourKey::new(year, 7, 15, 12);
                let table: HourlyParameterTable = [
                    (key, Parameter::Temperature, *t),
                    (key, Parameter::Precipitation, *p),
                ]
                .into_iter()
                .collect();
                YearSample {
                    year,
                    table: Some(table),
                }
            })
            .collect();
        reduce(&samples, dimensions, &Thresholds::default(), days.len() as u32)
    }

    #[tokio::test]
    async fn test_likely_rain_delays() {
        let outcome = outcome(
            &[(22.0, 3.0), (23.0, 2.0), (24.0, 0.0)],
            Dimensions::TEMPERATURE | Dimensions::RAIN,
        );
        let advice = HeuristicAdvisor.advise(&outcome, &context(), None).await;
        assert_eq!(advice.status, AdviceStatus::Delay);
        let indicators = advice.indicators.unwrap();
        assert_eq!(indicators.rain_probability, Some(66.7));
        assert_eq!(indicators.valid_years, 3);
        assert!(advice.summary.contains("66.7%"));
    }

    #[tokio::test]
    async fn test_dry_days_go() {
        let outcome = outcome(
            &[(26.0, 0.0), (28.0, 2.0)],
            Dimensions::TEMPERATURE | Dimensions::RAIN,
        );
        let advice = HeuristicAdvisor
            .advise(&outcome, &context(), Some("Can I go for a run?"))
            .await;
        assert_eq!(advice.status, AdviceStatus::Go);
        assert_eq!(advice.indicators.as_ref().unwrap().temperature_category, Some("mild"));
        assert_eq!(advice.tips.route, "Prefer shaded routes.");
    }

    #[tokio::test]
    async fn test_missing_data_adjusts() {
        let none = Outcome::NoUsableData { requested_years: 5 };
        let advice = HeuristicAdvisor.advise(&none, &context(), None).await;
        assert_eq!(advice.status, AdviceStatus::Adjust);
        assert_eq!(advice.indicators, None);

        let json = serde_json::to_value(&advice).unwrap();
        assert_eq!(json["status"], "ADJUST");
        assert_eq!(json["context"]["date"], "2025-07-15");
    }
}
