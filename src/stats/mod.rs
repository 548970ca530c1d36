pub mod classify;
pub mod daily;
pub mod derived;
pub mod reducer;
pub mod tally;
