//! Hourly observation rows as returned by the archive, with missing readings made explicit.

use crate::types::parameter::Parameter;
use std::collections::BTreeMap;
use std::fmt;

/// Out-of-band value the archive uses for a missing reading.
pub const MISSING_VALUE: f64 = -999.0;

/// Composite key of one hourly reading: `(year, month, day, hour)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct HourKey {
    pub year: i32,
    pub month: u32,
    pub day: u32,
    pub hour: u32,
}

impl HourKey {
    pub fn new(year: i32, month: u32, day: u32, hour: u32) -> Self {
        Self {
            year,
            month,
            day,
            hour,
        }
    }

    /// Parses the archive's `YYYYMMDDHH` timestamp.
    ///
    /// Returns `None` for anything that is not ten ASCII digits, or for an hour
    /// outside `0..=23`.
    pub fn parse(stamp: &str) -> Option<Self> {
        if stamp.len() != 10 || !stamp.bytes().all(|b| b.is_ascii_digit()) {
            return None;
        }
        let year = stamp[0..4].parse().ok()?;
        let month = stamp[4..6].parse().ok()?;
        let day = stamp[6..8].parse().ok()?;
        let hour = stamp[8..10].parse().ok()?;
        if hour > 23 {
            return None;
        }
        Some(Self::new(year, month, day, hour))
    }
}

impl fmt::Display for HourKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{:04}{:02}{:02}{:02}",
            self.year, self.month, self.day, self.hour
        )
    }
}

/// All readings for one hour. `None` means the archive had no usable value.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HourlyObservation {
    pub key: HourKey,
    pub temperature: Option<f64>,
    pub precipitation: Option<f64>,
    pub wind_speed: Option<f64>,
    pub relative_humidity: Option<f64>,
    pub solar_radiation: Option<f64>,
    pub clearness: Option<f64>,
}

impl HourlyObservation {
    pub fn empty(key: HourKey) -> Self {
        Self {
            key,
            temperature: None,
            precipitation: None,
            wind_speed: None,
            relative_humidity: None,
            solar_radiation: None,
            clearness: None,
        }
    }

    pub fn get(&self, parameter: Parameter) -> Option<f64> {
        match parameter {
            Parameter::Temperature => self.temperature,
            Parameter::Precipitation => self.precipitation,
            Parameter::WindSpeed => self.wind_speed,
            Parameter::RelativeHumidity => self.relative_humidity,
            Parameter::SolarRadiation => self.solar_radiation,
            Parameter::Clearness => self.clearness,
        }
    }

    fn slot(&mut self, parameter: Parameter) -> &mut Option<f64> {
        match parameter {
            Parameter::Temperature => &mut self.temperature,
            Parameter::Precipitation => &mut self.precipitation,
            Parameter::WindSpeed => &mut self.wind_speed,
            Parameter::RelativeHumidity => &mut self.relative_humidity,
            Parameter::SolarRadiation => &mut self.solar_radiation,
            Parameter::Clearness => &mut self.clearness,
        }
    }
}

/// Sparse table of hourly readings for one sampled day, ordered by [`HourKey`].
#[derive(Debug, Clone, Default, PartialEq)]
pub struct HourlyParameterTable {
    rows: BTreeMap<HourKey, HourlyObservation>,
}

impl HourlyParameterTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Stores one raw reading.
    ///
    /// The missing-value sentinel and non-finite numbers are recorded as absent,
    /// so nothing downstream ever sees them. The hour row is still created.
    pub fn insert(&mut self, key: HourKey, parameter: Parameter, value: f64) {
        let row = self
            .rows
            .entry(key)
            .or_insert_with(|| HourlyObservation::empty(key));
        *row.slot(parameter) = if value == MISSING_VALUE || !value.is_finite() {
            None
        } else {
            Some(value)
        };
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// Rows in chronological order.
    pub fn observations(&self) -> impl Iterator<Item = &HourlyObservation> {
        self.rows.values()
    }

    /// Chronological non-missing values of one parameter.
    pub fn series(&self, parameter: Parameter) -> Vec<f64> {
        self.observations()
            .filter_map(|o| o.get(parameter))
            .collect()
    }

    /// Whether at least one hour carries a usable value for `parameter`.
    pub fn has_any(&self, parameter: Parameter) -> bool {
        self.observations().any(|o| o.get(parameter).is_some())
    }
}

impl FromIterator<(HourKey, Parameter, f64)> for HourlyParameterTable {
    fn from_iter<I: IntoIterator<Item = (HourKey, Parameter, f64)>>(iter: I) -> Self {
        let mut table = HourlyParameterTable::new();
        for (key, parameter, value) in iter {
            table.insert(key, parameter, value);
        }
        table
    }
}
