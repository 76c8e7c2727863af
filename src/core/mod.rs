//! Core processing building blocks: white balance parameters, the percentile
//! contrast stretch and no-data masking. These are consumed by the high-level
//! `api` module.
pub mod params;
pub mod processing;
