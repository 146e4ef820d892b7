//! Photographic calibration statistics
//!
//! This module estimates the white balance bias of a photo from its channel
//! means and the dynamic range of its brightness plane.

pub mod dynamic_range;
pub mod white_balance;

pub use dynamic_range::{DynamicRange, DynamicRangeEstimator, RangeClass};
pub use white_balance::{WhiteBalance, WhiteBalanceEstimator, WhiteBalanceTone};
