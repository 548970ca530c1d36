mod advice;
mod engine;
mod error;
mod source;
mod stats;
mod types;
mod utils;

pub use advice::*;
pub use engine::*;
pub use error::ClimateError;

pub use source::error::FetchError;
pub use source::fetcher::{SampleFetcher, YearSample};
pub use source::power_client::{parse_power_response, PowerClient, POWER_HOURLY_URL};
pub use source::{DayQuery, ObservationSource};

pub use stats::classify::{HourBuckets, HourClassification, HourlyClassifier, HOURS_PER_DAY};
pub use stats::daily::{DayAggregate, TemperatureStats, WindStats};
pub use stats::derived::{
    discomfort_index, heat_index, pleasant_hours, recent_rain_probability, thermal_amplitude,
    uv_proxy, DerivedMetrics, DerivedSummary,
};
pub use stats::reducer::{reduce, ClimateAccumulator, YearGate, YearOutcome};
pub use stats::tally::{DimensionTallies, Tally};

pub use types::category::*;
pub use types::dimension::Dimensions;
pub use types::observation::{HourKey, HourlyObservation, HourlyParameterTable, MISSING_VALUE};
pub use types::parameter::Parameter;
pub use types::report::*;
pub use types::request::{InboundQuery, LatLon, MonthDay, SampleRequest};
pub use types::thresholds::Thresholds;
