//! Distance to signal strength conversion.
//!
//! Two independent strategies exist and are selected by configuration:
//! the log-distance [`CalibratedModel`], whose path-loss exponent is derived
//! from two reference measurements, and the [`LinearModel`], which scales
//! distance against a configured maximum range.

pub mod calibrated;
pub mod linear;

pub use calibrated::*;
pub use linear::*;

use crate::common::DomainResult;
use serde::{Deserialize, Serialize};
use std::fmt::Debug;
use std::sync::Arc;

/// The weakest signal (dBm) an antenna still reports.
/// Randomization means an emitted value might be lower.
pub const MAX_DBM: f64 = -90.0;

/// Rounding slack (dB) applied to the range comparison so that a pair sitting
/// exactly on the derived maximum range is included.
pub const RANGE_TOLERANCE_DB: f64 = 1e-9;

pub trait PropagationModel: Send + Sync + Debug {
    fn name(&self) -> &'static str;

    /// Expected signal strength in dBm at `distance` metres.
    fn strength_at(&self, distance: f64) -> DomainResult<f64>;

    /// Distance (metres) at which the expected strength equals [`MAX_DBM`].
    fn max_range(&self) -> f64;

    fn in_range(&self, distance: f64) -> DomainResult<bool> {
        Ok(self.strength_at(distance)? >= MAX_DBM - RANGE_TOLERANCE_DB)
    }
}

pub type DynPropagationModel = Arc<dyn PropagationModel>;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "model", rename_all = "lowercase")]
pub enum PropagationConfig {
    Calibrated {
        first: CalibrationReference,
        second: CalibrationReference,
    },
    Linear {
        #[serde(default = "default_max_range")]
        max_range: f64,
    },
}

pub fn default_max_range() -> f64 {
    1000.0
}

impl Default for PropagationConfig {
    fn default() -> Self {
        PropagationConfig::Linear { max_range: default_max_range() }
    }
}

impl PropagationConfig {
    pub fn build(&self) -> DomainResult<DynPropagationModel> {
        match self {
            PropagationConfig::Calibrated { first, second } => {
                Ok(Arc::new(CalibratedModel::new(*first, *second)?))
            }
            PropagationConfig::Linear { max_range } => Ok(Arc::new(LinearModel::new(*max_range)?)),
        }
    }
}
