//! Category sets per dimension.
//!
//! Every set is exhaustive: each classified sample lands in exactly one category.
//! Declaration order matters, it decides ties when picking the most probable category.

use crate::types::thresholds::Thresholds;
use serde::Serialize;
use std::fmt::Debug;

/// A closed, ordered set of labels for one dimension.
pub trait Category: Copy + Eq + Debug + Serialize + 'static {
    /// All variants in declaration order.
    const ALL: &'static [Self];

    fn label(self) -> &'static str;

    /// Position of `self` in [`Category::ALL`].
    fn index(self) -> usize {
        Self::ALL
            .iter()
            .position(|c| *c == self)
            .unwrap_or_default()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum TemperatureCategory {
    VeryHot,
    Hot,
    Cold,
    Mild,
}

impl TemperatureCategory {
    /// `> very_hot` very hot, `> hot` hot, `< cold` cold, otherwise mild.
    pub fn classify(temperature: f64, thresholds: &Thresholds) -> Self {
        if temperature > thresholds.very_hot {
            TemperatureCategory::VeryHot
        } else if temperature > thresholds.hot {
            TemperatureCategory::Hot
        } else if temperature < thresholds.cold {
            TemperatureCategory::Cold
        } else {
            TemperatureCategory::Mild
        }
    }

    /// Day-level category: the hottest hour decides heat, otherwise the coldest hour decides cold.
    pub fn classify_day(max: f64, min: f64, thresholds: &Thresholds) -> Self {
        match Self::classify(max, thresholds) {
            TemperatureCategory::VeryHot => TemperatureCategory::VeryHot,
            TemperatureCategory::Hot => TemperatureCategory::Hot,
            _ if min < thresholds.cold => TemperatureCategory::Cold,
            _ => TemperatureCategory::Mild,
        }
    }
}

impl Category for TemperatureCategory {
    const ALL: &'static [Self] = &[
        TemperatureCategory::VeryHot,
        TemperatureCategory::Hot,
        TemperatureCategory::Cold,
        TemperatureCategory::Mild,
    ];

    fn label(self) -> &'static str {
        match self {
            TemperatureCategory::VeryHot => "very_hot",
            TemperatureCategory::Hot => "hot",
            TemperatureCategory::Cold => "cold",
            TemperatureCategory::Mild => "mild",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum WindCategory {
    VeryWindy,
    Windy,
    Calm,
}

impl WindCategory {
    /// `> very_windy` very windy, `> windy` windy, otherwise calm.
    pub fn classify(speed: f64, thresholds: &Thresholds) -> Self {
        if speed > thresholds.very_windy {
            WindCategory::VeryWindy
        } else if speed > thresholds.windy {
            WindCategory::Windy
        } else {
            WindCategory::Calm
        }
    }
}

impl Category for WindCategory {
    const ALL: &'static [Self] = &[
        WindCategory::VeryWindy,
        WindCategory::Windy,
        WindCategory::Calm,
    ];

    fn label(self) -> &'static str {
        match self {
            WindCategory::VeryWindy => "very_windy",
            WindCategory::Windy => "windy",
            WindCategory::Calm => "calm",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RainCategory {
    Rainy,
    Dry,
}

impl RainCategory {
    /// Rainy when `amount` is strictly above `limit`.
    pub fn classify(amount: f64, limit: f64) -> Self {
        if amount > limit {
            RainCategory::Rainy
        } else {
            RainCategory::Dry
        }
    }
}

impl Category for RainCategory {
    const ALL: &'static [Self] = &[RainCategory::Rainy, RainCategory::Dry];

    fn label(self) -> &'static str {
        match self {
            RainCategory::Rainy => "rainy",
            RainCategory::Dry => "dry",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum HumidityCategory {
    Dry,
    Comfortable,
    Humid,
}

impl HumidityCategory {
    /// `< humidity_dry` dry, `>= humidity_humid` humid, otherwise comfortable.
    pub fn classify(humidity: f64, thresholds: &Thresholds) -> Self {
        if humidity < thresholds.humidity_dry {
            HumidityCategory::Dry
        } else if humidity >= thresholds.humidity_humid {
            HumidityCategory::Humid
        } else {
            HumidityCategory::Comfortable
        }
    }
}

impl Category for HumidityCategory {
    const ALL: &'static [Self] = &[
        HumidityCategory::Dry,
        HumidityCategory::Comfortable,
        HumidityCategory::Humid,
    ];

    fn label(self) -> &'static str {
        match self {
            HumidityCategory::Dry => "dry",
            HumidityCategory::Comfortable => "comfortable",
            HumidityCategory::Humid => "humid",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum DiscomfortCategory {
    Uncomfortable,
    Comfortable,
}

impl DiscomfortCategory {
    /// Uncomfortable when the heat index is strictly above the discomfort threshold.
    pub fn classify(heat_index: f64, thresholds: &Thresholds) -> Self {
        if heat_index > thresholds.discomfort {
            DiscomfortCategory::Uncomfortable
        } else {
            DiscomfortCategory::Comfortable
        }
    }
}

impl Category for DiscomfortCategory {
    const ALL: &'static [Self] = &[
        DiscomfortCategory::Uncomfortable,
        DiscomfortCategory::Comfortable,
    ];

    fn label(self) -> &'static str {
        match self {
            DiscomfortCategory::Uncomfortable => "uncomfortable",
            DiscomfortCategory::Comfortable => "comfortable",
        }
    }
}
