//! The engine's output: per-dimension odds, per-hour odds, per-year status and confidence.

use crate::stats::derived::DerivedSummary;
use crate::stats::tally::{DimensionTallies, Tally};
use crate::types::category::{
    Category, DiscomfortCategory, HumidityCategory, RainCategory, TemperatureCategory,
    WindCategory,
};
use crate::types::dimension::Dimensions;
use crate::utils::{percentage, round_to};
use serde::ser::{SerializeMap, SerializeStruct};
use serde::{Serialize, Serializer};
use std::collections::BTreeMap;

/// Odds for one dimension, computed against that dimension's own denominator.
#[derive(Debug, Clone, PartialEq)]
pub struct DimensionReport<C: Category> {
    /// Percentage (0 to 100, one decimal) per category, in declaration order.
    pub shares: Vec<(C, f64)>,
    /// Highest count; the first declared category wins a tie.
    pub most_probable: C,
    /// Mean of the recorded values, one decimal.
    pub mean: Option<f64>,
    /// Number of samples behind the percentages.
    pub total: u32,
}

impl<C: Category> DimensionReport<C> {
    /// `None` when nothing was counted, so no percentage is ever made up.
    pub fn from_tally(tally: &Tally<C>) -> Option<Self> {
        let total = tally.total();
        if total == 0 {
            return None;
        }
        let mut most_probable: Option<(C, u32)> = None;
        let mut shares = Vec::with_capacity(C::ALL.len());
        for (category, count) in tally.counts() {
            if most_probable.map_or(true, |(_, best)| count > best) {
                most_probable = Some((category, count));
            }
            shares.push((category, percentage(count, total)?));
        }
        Some(Self {
            shares,
            most_probable: most_probable?.0,
            mean: tally.mean().map(|m| round_to(m, 1)),
            total,
        })
    }

    pub fn percentage(&self, category: C) -> f64 {
        self.shares
            .iter()
            .find(|(c, _)| *c == category)
            .map(|(_, p)| *p)
            .unwrap_or_default()
    }
}

struct Shares<'a, C: Category>(&'a [(C, f64)]);

impl<C: Category> Serialize for Shares<'_, C> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.0.len()))?;
        for (category, share) in self.0 {
            map.serialize_entry(category.label(), share)?;
        }
        map.end()
    }
}

impl<C: Category> Serialize for DimensionReport<C> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut state = serializer.serialize_struct("DimensionReport", 4)?;
        state.serialize_field("percentages", &Shares(&self.shares))?;
        state.serialize_field("mostProbable", self.most_probable.label())?;
        state.serialize_field("mean", &self.mean)?;
        state.serialize_field("total", &self.total)?;
        state.end()
    }
}

/// Odds for every enabled dimension. A dimension without countable data is `None`.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ConditionReport {
    pub temperature: Option<DimensionReport<TemperatureCategory>>,
    pub rain: Option<DimensionReport<RainCategory>>,
    pub wind: Option<DimensionReport<WindCategory>>,
    pub humidity: Option<DimensionReport<HumidityCategory>>,
    pub discomfort: Option<DimensionReport<DiscomfortCategory>>,
}

impl ConditionReport {
    pub fn from_tallies(tallies: &DimensionTallies, dimensions: Dimensions) -> Self {
        let enabled = |d: Dimensions| dimensions.contains(d);
        Self {
            temperature: enabled(Dimensions::TEMPERATURE)
                .then(|| DimensionReport::from_tally(&tallies.temperature))
                .flatten(),
            rain: enabled(Dimensions::RAIN)
                .then(|| DimensionReport::from_tally(&tallies.rain))
                .flatten(),
            wind: enabled(Dimensions::WIND)
                .then(|| DimensionReport::from_tally(&tallies.wind))
                .flatten(),
            humidity: enabled(Dimensions::HUMIDITY)
                .then(|| DimensionReport::from_tally(&tallies.humidity))
                .flatten(),
            discomfort: dimensions
                .tracks_discomfort()
                .then(|| DimensionReport::from_tally(&tallies.discomfort))
                .flatten(),
        }
    }
}

/// What one valid year looked like.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct YearStatus {
    pub year: i32,
    pub rainy: Option<bool>,
    pub sunny: Option<bool>,
    pub mean_temperature: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Meta {
    /// `100 * valid_years / requested_years`, one decimal.
    pub confidence: f64,
    pub valid_years: u32,
    pub requested_years: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProbabilityReport {
    /// Day-level odds, one sample per valid year.
    #[serde(flatten)]
    pub conditions: ConditionReport,
    /// Hour-level odds keyed `"00:00"` to `"23:00"`.
    pub hourly: BTreeMap<String, ConditionReport>,
    pub years: Vec<YearStatus>,
    pub derived: DerivedSummary,
    pub meta: Meta,
}

impl ProbabilityReport {
    pub fn hour(&self, hour: u32) -> Option<&ConditionReport> {
        self.hourly.get(&hour_label(hour))
    }
}

pub(crate) fn hour_label(hour: u32) -> String {
    format!("{hour:02}:00")
}

/// Result of a run: a report, or the explicit absence of any usable year.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case", rename_all_fields = "camelCase")]
pub enum Outcome {
    Report(ProbabilityReport),
    NoUsableData { requested_years: u32 },
}

impl Outcome {
    pub fn report(&self) -> Option<&ProbabilityReport> {
        match self {
            Outcome::Report(report) => Some(report),
            Outcome::NoUsableData { .. } => None,
        }
    }

    pub fn into_report(self) -> Option<ProbabilityReport> {
        match self {
            Outcome::Report(report) => Some(report),
            Outcome::NoUsableData { .. } => None,
        }
    }
}
