//! Window based denoising filters.
//!
//! Every filter reads a single channel source image and writes into a destination of the
//! same shape. Borders are handled by edge replication. [`apply_filter`] lifts any of them
//! to multi channel images.

/// kernel construction utilities.
pub mod kernels;

mod adaptive_median;
pub use adaptive_median::{adaptive_median_filter, ADAPTIVE_MEDIAN_MIN_WINDOW};

mod bilateral;
pub use bilateral::bilateral_filter;

mod dispatch;
pub use dispatch::{apply_filter, apply_filter_chain, apply_filter_chain_with_progress};

mod ops;
pub use ops::{gaussian_filter, max_filter, mean_filter, median_filter, min_filter};

mod params;
pub use params::{AdaptiveMedianParams, BilateralParams, Filter, GaussianParams, WindowParams};

mod window;
