//! Command-line arguments of the bundled binaries.

use clap::Parser;
use std::path::PathBuf;

/// CDM simulator - moving persons observed by a grid of antennas
#[derive(Parser, Debug, Clone, PartialEq)]
#[command(name = "cdm-simulator")]
#[command(author, version, about, long_about = None)]
pub struct SimulatorArgs {
    /// Scenario TOML file (built-in scenario if omitted)
    pub scenario: Option<PathBuf>,

    /// Print measurements instead of sending them to the collector
    #[arg(long)]
    pub dry_run: bool,
}

/// Prints a histogram of the jitter distribution for a curve alpha
#[derive(Parser, Debug, Clone, PartialEq)]
#[command(name = "curve_preview")]
#[command(about, long_about = None)]
pub struct CurvePreviewArgs {
    /// Shape of the curve; useful values lie between 0.01 and 100
    #[arg(value_parser = parse_curve_alpha)]
    pub curve_alpha: f64,
}

fn parse_curve_alpha(raw: &str) -> Result<f64, String> {
    let alpha: f64 = raw
        .parse()
        .map_err(|_| format!("curve alpha must be a number, got {:?}", raw))?;
    if !(alpha.is_finite() && alpha > 0.0) {
        return Err(format!("curve alpha must be larger than 0, got {}", alpha));
    }
    Ok(alpha)
}
