pub mod category;
pub mod dimension;
pub mod observation;
pub mod parameter;
pub mod report;
pub mod request;
pub mod thresholds;
