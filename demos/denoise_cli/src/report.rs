use std::fmt;
use std::path::PathBuf;
use std::time::Duration;

use denoise::imgproc::{core::variance_reduction, filter::Filter, noise::Noise};

/// Mean and variance of one channel.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ChannelStats {
    pub mean: f64,
    pub variance: f64,
}

impl ChannelStats {
    /// Percentage of variance removed going from `self` to `after`.
    pub fn variance_reduction(&self, after: &ChannelStats) -> f64 {
        variance_reduction(self.variance, after.variance)
    }
}

/// Summary of a run, written to `log.txt`.
#[derive(Debug)]
pub struct Report {
    pub input_path: PathBuf,
    pub chain: Vec<Filter>,
    pub noise: Option<Noise>,
    pub seed: Option<u64>,
    pub before: Vec<ChannelStats>,
    pub after: Vec<ChannelStats>,
    pub elapsed: Duration,
    pub noisy_path: Option<PathBuf>,
    pub output_path: PathBuf,
}

impl fmt::Display for Report {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "input: {}", self.input_path.display())?;

        writeln!(f, "filters:")?;
        for (i, filter) in self.chain.iter().enumerate() {
            writeln!(f, "  {}. {filter}", i + 1)?;
        }

        match (&self.noise, self.seed) {
            (Some(noise), Some(seed)) => writeln!(f, "noise: {noise}, seed {seed}")?,
            (Some(noise), None) => writeln!(f, "noise: {noise}, unseeded")?,
            (None, _) => writeln!(f, "noise: none")?,
        }

        writeln!(f, "statistics:")?;
        for (c, (before, after)) in self.before.iter().zip(self.after.iter()).enumerate() {
            writeln!(
                f,
                "  channel {c}: mean {:.2} -> {:.2}, variance {:.2} -> {:.2} ({:.2}% reduction)",
                before.mean,
                after.mean,
                before.variance,
                after.variance,
                before.variance_reduction(after)
            )?;
        }

        writeln!(f, "elapsed: {:.3} s", self.elapsed.as_secs_f64())?;

        if let Some(path) = &self.noisy_path {
            writeln!(f, "noisy image: {}", path.display())?;
        }
        writeln!(f, "output image: {}", self.output_path.display())
    }
}
