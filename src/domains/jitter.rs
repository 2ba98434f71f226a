//! Bounded bell-shaped random deviations.
//!
//! Used both to perturb emitted signal strengths and to spread report
//! timing within a tick.

use crate::common::{DomainError, DomainResult};
use rand::Rng;
use serde::{Deserialize, Serialize};
use std::f64::consts::PI;

/// Raw samples are confined to `[-SAMPLE_BOUND, SAMPLE_BOUND]`.
pub const SAMPLE_BOUND: f64 = 5.0;

/// Shape of the deviations applied to a value.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Randomizer {
    /// By how many percent the output may deviate from the input.
    pub max_deviance: f64,

    /// Shape of the deviation distribution. `0.1` keeps almost every value
    /// exact, `4` is a reasonable middle ground, `100` makes a bad measurement
    /// about as likely as a perfect one.
    pub curve_alpha: f64,
}

impl Default for Randomizer {
    fn default() -> Self {
        Self {
            max_deviance: 10.0,
            curve_alpha: 0.5,
        }
    }
}

impl Randomizer {
    pub fn new(max_deviance: f64, curve_alpha: f64) -> Self {
        Self { max_deviance, curve_alpha }
    }

    /// A randomizer that leaves every value untouched.
    pub fn exact() -> Self {
        Self {
            max_deviance: 0.0,
            curve_alpha: 1.0,
        }
    }

    pub fn validate(&self, label: &str) -> DomainResult<()> {
        if !(self.curve_alpha.is_finite() && self.curve_alpha > 0.0) {
            return Err(DomainError::invalid_config(format!(
                "{}: curve_alpha must be positive, got {}",
                label, self.curve_alpha
            )));
        }
        if !(self.max_deviance.is_finite() && self.max_deviance >= 0.0) {
            return Err(DomainError::invalid_config(format!(
                "{}: max_deviance must be non-negative, got {}",
                label, self.max_deviance
            )));
        }
        Ok(())
    }

    pub fn apply<R: Rng + ?Sized>(&self, rng: &mut R, value: f64) -> DomainResult<f64> {
        randomize(rng, value, self)
    }
}

/// Draws a bell-shaped sample in `[-5, 5]`, centred on zero.
///
/// Larger `curve_alpha` flattens the curve towards uniform, smaller values
/// concentrate the mass near zero.
pub fn sample_unit_deviation<R: Rng + ?Sized>(rng: &mut R, curve_alpha: f64) -> DomainResult<f64> {
    if !(curve_alpha > 0.0) {
        return Err(DomainError::invalid_argument(format!(
            "curve_alpha must be positive, got {}",
            curve_alpha
        )));
    }

    loop {
        let u = nonzero_unit(rng);
        let v = nonzero_unit(rng);
        let num = (-curve_alpha * u.ln()).sqrt() * (curve_alpha * PI * v).cos();
        if num.abs() <= SAMPLE_BOUND {
            return Ok(num);
        }
    }
}

fn nonzero_unit<R: Rng + ?Sized>(rng: &mut R) -> f64 {
    loop {
        let x: f64 = rng.gen();
        if x != 0.0 {
            return x;
        }
    }
}

/// Perturbs `value` by at most `max_deviance` percent.
///
/// The raw sample is divided by [`SAMPLE_BOUND`] to give a fraction in
/// `[-1, 1]`, which is then scaled by `max_deviance`.
pub fn randomize<R: Rng + ?Sized>(rng: &mut R, value: f64, randomizer: &Randomizer) -> DomainResult<f64> {
    let fraction = sample_unit_deviation(rng, randomizer.curve_alpha)? / SAMPLE_BOUND;
    let deviation = fraction * randomizer.max_deviance;
    Ok(value + value * (deviation / 100.0))
}
