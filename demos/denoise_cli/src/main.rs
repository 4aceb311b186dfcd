use argh::FromArgs;
use std::path::{Path, PathBuf};
use std::time::Instant;

use denoise::{
    image::Image,
    imgproc::{
        core::mean_var,
        filter::{apply_filter_chain_with_progress, Filter},
        noise::{add_noise_with_seed, Noise},
    },
    io::{functional as F, GenericImage},
};

mod report;

use report::{ChannelStats, Report};

#[derive(FromArgs, Debug)]
/// Denoise an image with a chain of spatial filters
struct Args {
    /// path to the input image
    #[argh(option)]
    input: PathBuf,

    /// directory receiving noisy.png, output.png and log.txt
    #[argh(option, default = "PathBuf::from(\"output\")")]
    output_dir: PathBuf,

    /// load the input as a single channel image
    #[argh(switch)]
    grayscale: bool,

    /// noise injected before filtering: gaussian or salt_pepper
    #[argh(option)]
    noise: Option<String>,

    /// noise amount: standard deviation for gaussian, percentage for salt_pepper
    #[argh(option, default = "30.0")]
    amount: f64,

    /// seed of the noise generator
    #[argh(option)]
    seed: Option<u64>,

    /// filter to apply, repeat to build a chain: mean, gaussian, median, adaptive_median,
    /// bilateral, min, max
    #[argh(option)]
    filter: Vec<String>,

    /// window size of the mean, gaussian, median, bilateral, min and max filters
    #[argh(option)]
    kernel_size: Option<usize>,

    /// standard deviation of the gaussian filter
    #[argh(option)]
    sigma: Option<f64>,

    /// largest window of the adaptive median filter
    #[argh(option)]
    max_kernel_size: Option<usize>,

    /// spatial standard deviation of the bilateral filter
    #[argh(option)]
    sigma_spatial: Option<f64>,

    /// intensity standard deviation of the bilateral filter
    #[argh(option)]
    sigma_intensity: Option<f64>,

    /// JSON file holding an array of filters, overrides --filter
    #[argh(option)]
    chain: Option<PathBuf>,
}

/// Build a filter from its name and the parameters given on the command line.
fn filter_from_args(name: &str, args: &Args) -> Result<Filter, String> {
    let mut filter = Filter::from_name(name).ok_or_else(|| {
        format!(
            "Invalid filter: {name}, expected one of {}",
            Filter::NAMES.join(", ")
        )
    })?;

    match &mut filter {
        Filter::Mean(p) | Filter::Median(p) | Filter::Min(p) | Filter::Max(p) => {
            p.kernel_size = args.kernel_size.unwrap_or(p.kernel_size);
        }
        Filter::Gaussian(p) => {
            p.kernel_size = args.kernel_size.unwrap_or(p.kernel_size);
            p.sigma = args.sigma.unwrap_or(p.sigma);
        }
        Filter::AdaptiveMedian(p) => {
            p.max_kernel_size = args.max_kernel_size.unwrap_or(p.max_kernel_size);
        }
        Filter::Bilateral(p) => {
            p.kernel_size = args.kernel_size.unwrap_or(p.kernel_size);
            p.sigma_spatial = args.sigma_spatial.unwrap_or(p.sigma_spatial);
            p.sigma_intensity = args.sigma_intensity.unwrap_or(p.sigma_intensity);
        }
    }

    Ok(filter)
}

/// Window sizes must be odd and at least 3.
fn check_window_sizes(filter: &Filter) -> Result<(), String> {
    let (name, size) = match filter {
        Filter::Mean(p) | Filter::Median(p) | Filter::Min(p) | Filter::Max(p) => {
            ("kernel_size", p.kernel_size)
        }
        Filter::Gaussian(p) => ("kernel_size", p.kernel_size),
        Filter::Bilateral(p) => ("kernel_size", p.kernel_size),
        Filter::AdaptiveMedian(p) => ("max_kernel_size", p.max_kernel_size),
    };
    if size < 3 || size % 2 == 0 {
        return Err(format!(
            "{filter}: {name} must be an odd number of at least 3, got {size}"
        ));
    }
    Ok(())
}

fn build_chain(args: &Args) -> Result<Vec<Filter>, Box<dyn std::error::Error>> {
    let chain = match &args.chain {
        Some(path) => {
            let json = std::fs::read_to_string(path)?;
            serde_json::from_str::<Vec<Filter>>(&json)?
        }
        None => args
            .filter
            .iter()
            .map(|name| filter_from_args(name, args))
            .collect::<Result<Vec<_>, _>>()?,
    };

    if chain.is_empty() {
        return Err("No filter given, use --filter or --chain".into());
    }

    for filter in &chain {
        check_window_sizes(filter)?;
        filter.validate()?;
    }

    Ok(chain)
}

/// Images produced by one run of the pipeline.
struct Outputs {
    noisy: Option<GenericImage>,
    filtered: GenericImage,
    before: Vec<ChannelStats>,
    after: Vec<ChannelStats>,
}

fn channel_stats<const C: usize>(image: &Image<u8, C>) -> Vec<ChannelStats> {
    let (mean, var) = mean_var(image);
    mean.iter()
        .zip(var.iter())
        .map(|(&mean, &variance)| ChannelStats { mean, variance })
        .collect()
}

fn process<const C: usize>(
    image: Image<u8, C>,
    noise: Option<&Noise>,
    seed: Option<u64>,
    chain: &[Filter],
    wrap: fn(Image<u8, C>) -> GenericImage,
) -> Result<Outputs, Box<dyn std::error::Error>> {
    let noisy = match noise {
        Some(noise) => {
            log::info!("Adding {noise} noise");
            Some(add_noise_with_seed(&image, noise, seed)?)
        }
        None => None,
    };
    let input = noisy.as_ref().unwrap_or(&image);

    let filtered = apply_filter_chain_with_progress(input, chain, |stage, total, filter| {
        log::info!("[{}/{total}] {filter} done", stage + 1);
    })?;

    Ok(Outputs {
        before: channel_stats(input),
        after: channel_stats(&filtered),
        noisy: noisy.map(wrap),
        filtered: wrap(filtered),
    })
}

fn run(args: &Args) -> Result<Report, Box<dyn std::error::Error>> {
    let chain = build_chain(args)?;
    let noise = args
        .noise
        .as_deref()
        .map(|name| {
            Noise::from_name(name, args.amount)
                .ok_or_else(|| format!("Invalid noise: {name}, expected gaussian or salt_pepper"))
        })
        .transpose()?;
    if let Some(noise) = &noise {
        noise.validate()?;
    }

    log::info!("Reading {}", args.input.display());
    let image = if args.grayscale {
        GenericImage::Mono8(F::read_image_mono8(&args.input)?)
    } else {
        F::read_image_any(&args.input)?
    };
    log::info!(
        "Loaded {} image with {} channel(s)",
        image.size(),
        image.num_channels()
    );

    std::fs::create_dir_all(&args.output_dir)?;

    let start = Instant::now();
    let outputs = match image {
        GenericImage::Mono8(image) => {
            process(image, noise.as_ref(), args.seed, &chain, GenericImage::Mono8)?
        }
        GenericImage::Rgb8(image) => {
            process(image, noise.as_ref(), args.seed, &chain, GenericImage::Rgb8)?
        }
    };
    let elapsed = start.elapsed();

    let noisy_path = match &outputs.noisy {
        Some(noisy) => {
            let path = args.output_dir.join("noisy.png");
            F::write_image(&path, noisy)?;
            Some(path)
        }
        None => None,
    };

    let output_path = args.output_dir.join("output.png");
    F::write_image(&output_path, &outputs.filtered)?;

    let report = Report {
        input_path: args.input.clone(),
        chain,
        noise,
        seed: args.seed,
        before: outputs.before,
        after: outputs.after,
        elapsed,
        noisy_path,
        output_path,
    };

    write_log(&args.output_dir.join("log.txt"), &report)?;

    Ok(report)
}

fn write_log(path: &Path, report: &Report) -> Result<(), std::io::Error> {
    std::fs::write(path, report.to_string())?;
    log::info!("Log written to {}", path.display());
    Ok(())
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args: Args = argh::from_env();

    let report = run(&args)?;

    for (c, (before, after)) in report.before.iter().zip(report.after.iter()).enumerate() {
        log::info!(
            "channel {c}: variance {:.2} -> {:.2} ({:.2}% reduction)",
            before.variance,
            after.variance,
            before.variance_reduction(after)
        );
    }
    log::info!(
        "Finished in {:?}, output saved to {}",
        report.elapsed,
        report.output_path.display()
    );

    Ok(())
}
