//! Per-hour classification and the 24 fixed hour slots it accumulates into.

use crate::stats::derived::heat_index;
use crate::stats::tally::DimensionTallies;
use crate::types::category::{
    DiscomfortCategory, HumidityCategory, RainCategory, TemperatureCategory, WindCategory,
};
use crate::types::dimension::Dimensions;
use crate::types::observation::HourlyObservation;
use crate::types::thresholds::Thresholds;

pub const HOURS_PER_DAY: usize = 24;

/// What one hour qualified as, per enabled dimension with a usable reading.
///
/// Each category is paired with the reading it came from.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct HourClassification {
    pub temperature: Option<(TemperatureCategory, f64)>,
    pub rain: Option<(RainCategory, f64)>,
    pub wind: Option<(WindCategory, f64)>,
    pub humidity: Option<(HumidityCategory, f64)>,
    /// Category and heat index.
    pub discomfort: Option<(DiscomfortCategory, f64)>,
}

impl HourClassification {
    pub fn is_empty(&self) -> bool {
        *self == HourClassification::default()
    }
}

/// Applies the threshold rules to single hours, looking only at enabled dimensions.
#[derive(Debug, Clone, Copy)]
pub struct HourlyClassifier<'a> {
    dimensions: Dimensions,
    thresholds: &'a Thresholds,
}

impl<'a> HourlyClassifier<'a> {
    pub fn new(dimensions: Dimensions, thresholds: &'a Thresholds) -> Self {
        Self {
            dimensions,
            thresholds,
        }
    }

    pub fn classify(&self, observation: &HourlyObservation) -> HourClassification {
        let t = self.thresholds;
        let enabled = |d: Dimensions| self.dimensions.contains(d);

        let temperature = observation
            .temperature
            .filter(|_| enabled(Dimensions::TEMPERATURE))
            .map(|v| (TemperatureCategory::classify(v, t), v));
        let rain = observation
            .precipitation
            .filter(|_| enabled(Dimensions::RAIN))
            .map(|v| (RainCategory::classify(v, t.rain_hour), v));
        let wind = observation
            .wind_speed
            .filter(|_| enabled(Dimensions::WIND))
            .map(|v| (WindCategory::classify(v, t), v));
        let humidity = observation
            .relative_humidity
            .filter(|_| enabled(Dimensions::HUMIDITY))
            .map(|v| (HumidityCategory::classify(v, t), v));

        let discomfort = match (temperature, humidity) {
            (Some((_, temp)), Some((_, rh))) if self.dimensions.tracks_discomfort() => {
                let hi = heat_index(temp, rh, t);
                Some((DiscomfortCategory::classify(hi, t), hi))
            }
            _ => None,
        };

        HourClassification {
            temperature,
            rain,
            wind,
            humidity,
            discomfort,
        }
    }
}

/// Counters for hours `00..=23`. All 24 slots exist even when no reading lands in them.
#[derive(Debug, Clone, PartialEq)]
pub struct HourBuckets {
    slots: Vec<DimensionTallies>,
}

impl Default for HourBuckets {
    fn default() -> Self {
        Self {
            slots: vec![DimensionTallies::default(); HOURS_PER_DAY],
        }
    }
}

impl HourBuckets {
    /// Counts `classification` into the slot for `hour`. Each dimension's total only
    /// moves when that dimension was classified.
    pub fn record(&mut self, hour: u32, classification: &HourClassification) {
        let Some(slot) = self.slots.get_mut(hour as usize) else {
            return;
        };
        if let Some((category, value)) = classification.temperature {
            slot.temperature.record(category, value);
        }
        if let Some((category, value)) = classification.rain {
            slot.rain.record(category, value);
        }
        if let Some((category, value)) = classification.wind {
            slot.wind.record(category, value);
        }
        if let Some((category, value)) = classification.humidity {
            slot.humidity.record(category, value);
        }
        if let Some((category, value)) = classification.discomfort {
            slot.discomfort.record(category, value);
        }
    }

    pub fn merge(&mut self, other: &HourBuckets) {
        for (mine, theirs) in self.slots.iter_mut().zip(&other.slots) {
            mine.merge(theirs);
        }
    }

    pub fn slot(&self, hour: u32) -> Option<&DimensionTallies> {
        self.slots.get(hour as usize)
    }

    /// `(hour, tallies)` for every hour of the day.
    pub fn iter(&self) -> impl Iterator<Item = (u32, &DimensionTallies)> {
        self.slots.iter().enumerate().map(|(h, s)| (h as u32, s))
    }
}
