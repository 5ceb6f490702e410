pub mod check;
pub mod coerce;
pub mod common;
pub mod edit;
pub mod sample;
pub mod show;
