//! Monotonic counters per category, plus the running sum behind each dimension's mean.

use crate::types::category::{
    Category, DiscomfortCategory, HumidityCategory, RainCategory, TemperatureCategory,
    WindCategory,
};
use std::marker::PhantomData;

/// Counts for one dimension with its own denominator.
#[derive(Debug, Clone, PartialEq)]
pub struct Tally<C: Category> {
    counts: Vec<u32>,
    total: u32,
    sum: f64,
    _category: PhantomData<C>,
}

impl<C: Category> Default for Tally<C> {
    fn default() -> Self {
        Self {
            counts: vec![0; C::ALL.len()],
            total: 0,
            sum: 0.0,
            _category: PhantomData,
        }
    }
}

impl<C: Category> Tally<C> {
    /// Counts one classified sample; `value` feeds the mean.
    pub fn record(&mut self, category: C, value: f64) {
        self.counts[category.index()] += 1;
        self.total += 1;
        self.sum += value;
    }

    /// Adds every counter of `other` into `self`.
    pub fn merge(&mut self, other: &Tally<C>) {
        for (mine, theirs) in self.counts.iter_mut().zip(&other.counts) {
            *mine += theirs;
        }
        self.total += other.total;
        self.sum += other.sum;
    }

    pub fn count(&self, category: C) -> u32 {
        self.counts[category.index()]
    }

    /// Number of samples classified for this dimension.
    pub fn total(&self) -> u32 {
        self.total
    }

    pub fn mean(&self) -> Option<f64> {
        (self.total > 0).then(|| self.sum / f64::from(self.total))
    }

    /// `(category, count)` pairs in declaration order.
    pub fn counts(&self) -> impl Iterator<Item = (C, u32)> + '_ {
        C::ALL.iter().copied().zip(self.counts.iter().copied())
    }
}

/// One tally per dimension. Used both for an hour slot and for the per-day yearly tally.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DimensionTallies {
    pub temperature: Tally<TemperatureCategory>,
    pub rain: Tally<RainCategory>,
    pub wind: Tally<WindCategory>,
    pub humidity: Tally<HumidityCategory>,
    pub discomfort: Tally<DiscomfortCategory>,
}

impl DimensionTallies {
    pub fn merge(&mut self, other: &DimensionTallies) {
        self.temperature.merge(&other.temperature);
        self.rain.merge(&other.rain);
        self.wind.merge(&other.wind);
        self.humidity.merge(&other.humidity);
        self.discomfort.merge(&other.discomfort);
    }
}
