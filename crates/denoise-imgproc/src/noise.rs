use std::fmt;

use denoise_image::Image;
use rand::{rngs::StdRng, Rng, SeedableRng};
use rand_distr::{Distribution, Normal};

use crate::core::saturate_u8;
use crate::error::FilterError;

/// Synthetic corruption applied to an image.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(tag = "type", rename_all = "snake_case")
)]
pub enum Noise {
    /// Additive zero mean gaussian noise.
    Gaussian {
        /// The standard deviation of the noise, in intensity levels.
        amount: f64,
    },
    /// Impulse noise turning samples black or white.
    SaltPepper {
        /// The percentage of corrupted samples, in `[0, 100]`.
        amount: f64,
    },
}

impl Noise {
    /// The snake case name of the noise model.
    pub fn name(&self) -> &'static str {
        match self {
            Noise::Gaussian { .. } => "gaussian",
            Noise::SaltPepper { .. } => "salt_pepper",
        }
    }

    /// Create a noise model from its snake case name.
    ///
    /// Returns `None` for unknown names.
    pub fn from_name(name: &str, amount: f64) -> Option<Self> {
        match name {
            "gaussian" => Some(Noise::Gaussian { amount }),
            "salt_pepper" => Some(Noise::SaltPepper { amount }),
            _ => None,
        }
    }

    /// Check the amount without touching any image.
    pub fn validate(&self) -> Result<(), FilterError> {
        match *self {
            Noise::Gaussian { amount } if !(amount.is_finite() && amount >= 0.0) => {
                Err(FilterError::InvalidParameter(
                    "amount",
                    format!("gaussian noise needs a finite non-negative deviation, got {amount}"),
                ))
            }
            Noise::SaltPepper { amount } if !(0.0..=100.0).contains(&amount) => {
                Err(FilterError::InvalidParameter(
                    "amount",
                    format!("salt and pepper noise needs a percentage in [0, 100], got {amount}"),
                ))
            }
            _ => Ok(()),
        }
    }
}

impl fmt::Display for Noise {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Noise::Gaussian { amount } => write!(f, "gaussian(amount={amount})"),
            Noise::SaltPepper { amount } => write!(f, "salt_pepper(amount={amount})"),
        }
    }
}

/// Corrupt an image with synthetic noise.
///
/// Every sample of every channel gets its own draw from `rng`.
///
/// * Gaussian: adds `N(0, amount)` to the sample, then rounds and clamps to `[0, 255]`.
/// * Salt and pepper: with `p = amount / 100` and `u` uniform in `[0, 1)`, the sample
///   becomes 0 when `u < p / 2`, 255 when `u > 1 - p / 2` and is kept otherwise.
///
/// # Arguments
///
/// * `src` - The source image with shape (H, W, C).
/// * `noise` - The noise model and its amount.
/// * `rng` - The random source.
///
/// # Errors
///
/// Returns an error if the amount is out of range for the noise model.
pub fn add_noise<const C: usize, R: Rng + ?Sized>(
    src: &Image<u8, C>,
    noise: &Noise,
    rng: &mut R,
) -> Result<Image<u8, C>, FilterError> {
    noise.validate()?;
    let mut dst = src.clone();

    match *noise {
        Noise::Gaussian { amount } => {
            let normal = Normal::new(0.0, amount).map_err(|e| {
                FilterError::InvalidParameter("amount", format!("gaussian noise: {e}"))
            })?;
            for v in dst.as_slice_mut().iter_mut() {
                *v = saturate_u8(*v as f64 + normal.sample(&mut *rng));
            }
        }
        Noise::SaltPepper { amount } => {
            let half = amount / 200.0;
            for v in dst.as_slice_mut().iter_mut() {
                let u = rng.random::<f64>();
                if u < half {
                    *v = 0; // pepper
                } else if u > 1.0 - half {
                    *v = 255; // salt
                }
            }
        }
    }

    log::debug!("added {noise} to {} image", src.size());

    Ok(dst)
}

/// Corrupt an image with synthetic noise from a seeded generator.
///
/// `Some(seed)` makes the result reproducible, `None` seeds from the operating system.
pub fn add_noise_with_seed<const C: usize>(
    src: &Image<u8, C>,
    noise: &Noise,
    random_seed: Option<u64>,
) -> Result<Image<u8, C>, FilterError> {
    let mut rng: StdRng = match random_seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_os_rng(),
    };
    add_noise(src, noise, &mut rng)
}
