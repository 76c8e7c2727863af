//! Pixel-level algorithms: percentile estimation, white balance (percentile
//! contrast stretch) and no-data propagation.
pub mod nodata;
pub mod percentile;
pub mod white_balance;
