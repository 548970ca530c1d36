//! Where hourly observations come from.

pub mod error;
pub mod fetcher;
pub mod power_client;

use crate::source::error::FetchError;
use crate::types::observation::HourlyParameterTable;
use crate::types::parameter::Parameter;
use crate::types::request::LatLon;
use chrono::NaiveDate;
use std::future::Future;

/// One calendar day at one point, for a fixed set of parameters.
#[derive(Debug, Clone, PartialEq)]
pub struct DayQuery {
    pub location: LatLon,
    pub date: NaiveDate,
    pub parameters: Vec<Parameter>,
}

/// A provider of hourly observations for a single day.
///
/// [`power_client::PowerClient`] is the production implementation; anything that can
/// return an [`HourlyParameterTable`] for a [`DayQuery`] can stand in for it.
pub trait ObservationSource: Send + Sync {
    fn fetch_day(
        &self,
        query: &DayQuery,
    ) -> impl Future<Output = Result<HourlyParameterTable, FetchError>> + Send;
}
