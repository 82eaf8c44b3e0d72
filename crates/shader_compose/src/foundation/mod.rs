//! Foundation utilities shared across the crate

pub mod logging;
pub mod math;
