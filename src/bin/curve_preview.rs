//! Prints a histogram of the jitter distribution for a given curve alpha.
//!
//! ```text
//! cargo run --bin curve_preview -- 4
//! ```
//!
//! Useful alphas lie between 0.01 and 100; 1 to 10 is the interesting range.

use cdm_simulator::cli::CurvePreviewArgs;
use cdm_simulator::domains::jitter::sample_unit_deviation;
use clap::Parser;
use rand::thread_rng;

const SAMPLES: usize = 100_000;

fn main() -> anyhow::Result<()> {
    let CurvePreviewArgs { curve_alpha } = CurvePreviewArgs::parse();

    let mut rng = thread_rng();
    let mut buckets = [0.0f64; 10];
    for _ in 0..SAMPLES {
        let r = sample_unit_deviation(&mut rng, curve_alpha)?;
        let n = r.trunc() as i64;
        if n == 0 {
            buckets[4] += 0.5;
            buckets[5] += 0.5;
        } else {
            let index = (n + 5).clamp(0, 9) as usize;
            buckets[index] += 1.0;
        }
    }

    for (i, count) in buckets.iter().enumerate() {
        let label = if i < 5 {
            format!("-0.{}x", 4 - i)
        } else {
            format!("+0.{}x", i - 5)
        };
        let bar = "■".repeat((count / 1000.0).ceil() as usize);
        println!("{} {}", label, bar);
    }
    Ok(())
}
