//! Color analysis and conversion module
//!
//! This module handles RGB→HSV conversion, hue histograms, the named hue
//! categories and the whole-image color statistics built on them.

pub mod analysis;
pub mod conversion;
pub mod histogram;
pub mod naming;

pub use analysis::{ColorStatistics, DominantColor};
pub use conversion::{ColorConverter, HsvColor};
pub use histogram::{HueBin, HueHistogram};
pub use naming::{ColorName, COLOR_NAME_TABLE};
