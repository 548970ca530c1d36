use thiserror::Error;

/// Errors surfaced to callers of [`crate::ClimateEngine`].
///
/// Per-year retrieval failures are absorbed by the fetcher and only show up as a
/// lower confidence; they never reach this type.
#[derive(Debug, Error, PartialEq)]
pub enum ClimateError {
    #[error(
        "No weather dimension selected; enable at least one of temperature, rain, wind or humidity"
    )]
    NoDimensionsSelected,

    #[error("Invalid date '{input}', expected YYYYMMDD")]
    InvalidDate { input: String },

    #[error("Range of years must be between 1 and {max}, got {0}", max = i32::MAX)]
    InvalidRangeYears(u32),
}
