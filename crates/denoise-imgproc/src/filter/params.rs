use std::fmt;

use denoise_image::Image;

use super::kernels::{check_kernel_size, check_sigma};
use super::{
    adaptive_median_filter, bilateral_filter, gaussian_filter, max_filter, mean_filter,
    median_filter, min_filter, ADAPTIVE_MEDIAN_MIN_WINDOW,
};
use crate::error::FilterError;

/// Parameters of the filters defined by a window size only.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(default)
)]
pub struct WindowParams {
    /// The side length of the window.
    pub kernel_size: usize,
}

impl Default for WindowParams {
    fn default() -> Self {
        Self { kernel_size: 3 }
    }
}

/// Parameters of the gaussian filter.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(default)
)]
pub struct GaussianParams {
    /// The side length of the kernel.
    pub kernel_size: usize,
    /// The standard deviation of the gaussian.
    pub sigma: f64,
}

impl Default for GaussianParams {
    fn default() -> Self {
        Self {
            kernel_size: 3,
            sigma: 1.0,
        }
    }
}

/// Parameters of the adaptive median filter.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(default)
)]
pub struct AdaptiveMedianParams {
    /// The largest window the filter may grow to.
    pub max_kernel_size: usize,
}

impl Default for AdaptiveMedianParams {
    fn default() -> Self {
        Self { max_kernel_size: 7 }
    }
}

/// Parameters of the bilateral filter.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(default)
)]
pub struct BilateralParams {
    /// The side length of the window.
    pub kernel_size: usize,
    /// The standard deviation of the spatial gaussian.
    pub sigma_spatial: f64,
    /// The standard deviation of the radiometric gaussian.
    pub sigma_intensity: f64,
}

impl Default for BilateralParams {
    fn default() -> Self {
        Self {
            kernel_size: 5,
            sigma_spatial: 2.0,
            sigma_intensity: 30.0,
        }
    }
}

/// A denoising filter together with its parameters.
///
/// With the `serde` feature a filter reads from and writes to JSON as
/// `{"type": "gaussian", "kernel_size": 5, "sigma": 1.5}`; missing parameters take
/// their default values.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(tag = "type", rename_all = "snake_case")
)]
pub enum Filter {
    /// Average of the window.
    Mean(WindowParams),
    /// Gaussian weighted average of the window.
    Gaussian(GaussianParams),
    /// Median of the window.
    Median(WindowParams),
    /// Median of a window grown until it is informative.
    AdaptiveMedian(AdaptiveMedianParams),
    /// Edge preserving weighted average.
    Bilateral(BilateralParams),
    /// Minimum of the window.
    Min(WindowParams),
    /// Maximum of the window.
    Max(WindowParams),
}

impl Filter {
    /// The names accepted by [`Filter::from_name`], in declaration order.
    pub const NAMES: [&'static str; 7] = [
        "mean",
        "gaussian",
        "median",
        "adaptive_median",
        "bilateral",
        "min",
        "max",
    ];

    /// The snake case name of the filter.
    pub fn name(&self) -> &'static str {
        match self {
            Filter::Mean(_) => "mean",
            Filter::Gaussian(_) => "gaussian",
            Filter::Median(_) => "median",
            Filter::AdaptiveMedian(_) => "adaptive_median",
            Filter::Bilateral(_) => "bilateral",
            Filter::Min(_) => "min",
            Filter::Max(_) => "max",
        }
    }

    /// Create a filter from its snake case name with default parameters.
    ///
    /// Returns `None` for unknown names.
    pub fn from_name(name: &str) -> Option<Self> {
        let filter = match name {
            "mean" => Filter::Mean(WindowParams::default()),
            "gaussian" => Filter::Gaussian(GaussianParams::default()),
            "median" => Filter::Median(WindowParams::default()),
            "adaptive_median" => Filter::AdaptiveMedian(AdaptiveMedianParams::default()),
            "bilateral" => Filter::Bilateral(BilateralParams::default()),
            "min" => Filter::Min(WindowParams::default()),
            "max" => Filter::Max(WindowParams::default()),
            _ => return None,
        };
        Some(filter)
    }

    /// Check the parameters without touching any image.
    pub fn validate(&self) -> Result<(), FilterError> {
        match self {
            Filter::Mean(p) | Filter::Median(p) | Filter::Min(p) | Filter::Max(p) => {
                check_kernel_size("kernel_size", p.kernel_size)
            }
            Filter::Gaussian(p) => {
                check_kernel_size("kernel_size", p.kernel_size)?;
                check_sigma("sigma", p.sigma)
            }
            Filter::AdaptiveMedian(p) => {
                if p.max_kernel_size < ADAPTIVE_MEDIAN_MIN_WINDOW {
                    return Err(FilterError::InvalidParameter(
                        "max_kernel_size",
                        format!(
                            "must be at least {ADAPTIVE_MEDIAN_MIN_WINDOW}, got {}",
                            p.max_kernel_size
                        ),
                    ));
                }
                Ok(())
            }
            Filter::Bilateral(p) => {
                check_kernel_size("kernel_size", p.kernel_size)?;
                check_sigma("sigma_spatial", p.sigma_spatial)?;
                check_sigma("sigma_intensity", p.sigma_intensity)
            }
        }
    }

    /// Run the filter on a single channel image.
    ///
    /// PRECONDITION: `src` and `dst` must have the same shape.
    pub fn apply_single(&self, src: &Image<u8, 1>, dst: &mut Image<u8, 1>) -> Result<(), FilterError> {
        match *self {
            Filter::Mean(p) => mean_filter(src, dst, p.kernel_size),
            Filter::Gaussian(p) => gaussian_filter(src, dst, p.kernel_size, p.sigma),
            Filter::Median(p) => median_filter(src, dst, p.kernel_size),
            Filter::AdaptiveMedian(p) => adaptive_median_filter(src, dst, p.max_kernel_size),
            Filter::Bilateral(p) => {
                bilateral_filter(src, dst, p.kernel_size, p.sigma_spatial, p.sigma_intensity)
            }
            Filter::Min(p) => min_filter(src, dst, p.kernel_size),
            Filter::Max(p) => max_filter(src, dst, p.kernel_size),
        }
    }
}

impl fmt::Display for Filter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Filter::Mean(p) | Filter::Median(p) | Filter::Min(p) | Filter::Max(p) => {
                write!(f, "{}(kernel_size={})", self.name(), p.kernel_size)
            }
            Filter::Gaussian(p) => write!(
                f,
                "gaussian(kernel_size={}, sigma={})",
                p.kernel_size, p.sigma
            ),
            Filter::AdaptiveMedian(p) => {
                write!(f, "adaptive_median(max_kernel_size={})", p.max_kernel_size)
            }
            Filter::Bilateral(p) => write!(
                f,
                "bilateral(kernel_size={}, sigma_spatial={}, sigma_intensity={})",
                p.kernel_size, p.sigma_spatial, p.sigma_intensity
            ),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        assert_eq!(WindowParams::default().kernel_size, 3);
        assert_eq!(
            GaussianParams::default(),
            GaussianParams {
                kernel_size: 3,
                sigma: 1.0
            }
        );
        assert_eq!(AdaptiveMedianParams::default().max_kernel_size, 7);
        assert_eq!(
            BilateralParams::default(),
            BilateralParams {
                kernel_size: 5,
                sigma_spatial: 2.0,
                sigma_intensity: 30.0
            }
        );
    }

    #[test]
    fn test_names_round_trip() {
        for name in Filter::NAMES {
            let filter = Filter::from_name(name).expect("known filter name");
            assert_eq!(filter.name(), name);
            assert!(filter.validate().is_ok());
        }
        assert_eq!(Filter::from_name("wiener"), None);
    }

    #[test]
    fn test_validate() {
        assert!(matches!(
            Filter::Mean(WindowParams { kernel_size: 0 }).validate(),
            Err(FilterError::InvalidParameter("kernel_size", _))
        ));
        assert!(matches!(
            Filter::Gaussian(GaussianParams {
                kernel_size: 3,
                sigma: -1.0
            })
            .validate(),
            Err(FilterError::InvalidParameter("sigma", _))
        ));
        assert!(matches!(
            Filter::AdaptiveMedian(AdaptiveMedianParams { max_kernel_size: 2 }).validate(),
            Err(FilterError::InvalidParameter("max_kernel_size", _))
        ));
        assert!(matches!(
            Filter::Bilateral(BilateralParams {
                sigma_intensity: f64::NAN,
                ..Default::default()
            })
            .validate(),
            Err(FilterError::InvalidParameter("sigma_intensity", _))
        ));
        assert!(matches!(
            Filter::Bilateral(BilateralParams {
                sigma_spatial: 1e-170,
                ..Default::default()
            })
            .validate(),
            Err(FilterError::InvalidParameter("sigma_spatial", _))
        ));
    }

    #[test]
    fn test_display() {
        let filter = Filter::Gaussian(GaussianParams {
            kernel_size: 5,
            sigma: 1.5,
        });
        assert_eq!(filter.to_string(), "gaussian(kernel_size=5, sigma=1.5)");
        assert_eq!(
            Filter::Median(WindowParams::default()).to_string(),
            "median(kernel_size=3)"
        );
    }

    #[cfg(feature = "serde")]
    #[test]
    fn test_filter_json() -> Result<(), serde_json::Error> {
        let filter: Filter =
            serde_json::from_str(r#"{"type": "gaussian", "kernel_size": 5, "sigma": 1.5}"#)?;
        assert_eq!(
            filter,
            Filter::Gaussian(GaussianParams {
                kernel_size: 5,
                sigma: 1.5
            })
        );

        let chain: Vec<Filter> = serde_json::from_str(
            r#"[{"type": "adaptive_median"}, {"type": "bilateral", "sigma_intensity": 20.0}]"#,
        )?;
        assert_eq!(
            chain,
            vec![
                Filter::AdaptiveMedian(AdaptiveMedianParams::default()),
                Filter::Bilateral(BilateralParams {
                    sigma_intensity: 20.0,
                    ..Default::default()
                }),
            ]
        );

        let json = serde_json::to_value(Filter::Min(WindowParams { kernel_size: 5 }))?;
        assert_eq!(json, serde_json::json!({"type": "min", "kernel_size": 5}));
        Ok(())
    }
}
