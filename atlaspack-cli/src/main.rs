use std::path::PathBuf;

use anyhow::{Context, Result};
use atlaspack_core::{build_atlas, config, AtlasConfig, PackResult, VERSION};
use clap::Parser;
use log::LevelFilter;

#[derive(Parser, Debug)]
#[command(name = "atlaspack", version = VERSION, about = "Pack sprites and bitmap-font sheets into a texture atlas")]
struct Cli {
    /// Output atlas image; the descriptor is written beside it
    #[arg(short = 'o', value_name = "OUTPUT")]
    output: PathBuf,
    /// Input images. A font sheet is recognised by a side-car descriptor with the same base name
    #[arg(required = true, value_name = "INPUT")]
    inputs: Vec<PathBuf>,
    /// YAML file with packing settings
    #[arg(long)]
    config: Option<PathBuf>,
    /// First candidate canvas side
    #[arg(long)]
    min_size: Option<u32>,
    /// Largest canvas side to try before giving up
    #[arg(long)]
    max_size: Option<u32>,
    /// Log every placement
    #[arg(short, long, conflicts_with = "quiet")]
    verbose: bool,
    /// Only log warnings and errors
    #[arg(short, long)]
    quiet: bool,
}

fn init_logger(cli: &Cli) {
    let level = if cli.verbose {
        LevelFilter::Debug
    } else if cli.quiet {
        LevelFilter::Warn
    } else {
        LevelFilter::Info
    };
    env_logger::Builder::new()
        .filter_level(level)
        .format_timestamp(None)
        .parse_default_env()
        .init();
}

fn load_config(cli: &Cli) -> Result<AtlasConfig> {
    let mut cfg = match &cli.config {
        Some(path) => config::load_from_path(path)
            .with_context(|| format!("loading config {}", path.display()))?,
        None => AtlasConfig::default(),
    };
    if let Some(min) = cli.min_size { cfg.min_dimension = min; }
    if let Some(max) = cli.max_size { cfg.max_dimension = max; }
    Ok(cfg)
}

fn main() -> Result<()> {
    // Usage errors exit with 1; --help and --version keep clap's behaviour.
    let cli = Cli::try_parse().unwrap_or_else(|e| {
        if e.use_stderr() {
            let _ = e.print();
            std::process::exit(1);
        }
        e.exit()
    });
    init_logger(&cli);

    let cfg = load_config(&cli)?;
    let result = build_atlas(&cli.inputs, &cli.output, &cfg)
        .with_context(|| format!("building atlas {}", cli.output.display()))?;
    match result {
        PackResult::Done { width, height, image, descriptor, placed } => {
            println!("Wrote {}x{} atlas with {} items to {}", width, height, placed, image.display());
            println!("Wrote descriptor {}", descriptor.display());
        }
        PackResult::Empty => println!("Nothing to pack"),
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn flags_override_defaults() {
        let cli = Cli::try_parse_from(["atlaspack", "-o", "out.png", "a.png", "b.png", "--min-size", "64"]).unwrap();
        assert_eq!(cli.inputs.len(), 2);
        let cfg = load_config(&cli).unwrap();
        assert_eq!(cfg.min_dimension, 64);
        assert_eq!(cfg.max_dimension, AtlasConfig::default().max_dimension);
    }

    #[test]
    fn missing_output_or_inputs_is_a_usage_error() {
        assert!(Cli::try_parse_from(["atlaspack", "a.png"]).is_err());
        assert!(Cli::try_parse_from(["atlaspack", "-o", "out.png"]).is_err());
    }

    #[test]
    fn inverted_bounds_are_rejected() {
        let cli = Cli::try_parse_from(["atlaspack", "-o", "o.png", "a.png", "--min-size", "512", "--max-size", "256"]).unwrap();
        let cfg = load_config(&cli).unwrap();
        let err = build_atlas(&cli.inputs, &cli.output, &cfg).unwrap_err();
        assert!(matches!(
            err,
            atlaspack_core::AtlasError::Config(config::ConfigError::MaxBelowMin { min: 512, max: 256 })
        ));
    }
}
