use super::{PropagationModel, MAX_DBM};
use crate::common::{DomainError, DomainResult};

/// Scales distance linearly so that `max_range` maps onto [`MAX_DBM`].
#[derive(Debug, Clone, PartialEq)]
pub struct LinearModel {
    max_range: f64,
}

impl LinearModel {
    pub fn new(max_range: f64) -> DomainResult<Self> {
        if !(max_range.is_finite() && max_range > 0.0) {
            return Err(DomainError::invalid_config(format!(
                "max_range must be positive, got {}",
                max_range
            )));
        }
        Ok(Self { max_range })
    }
}

impl PropagationModel for LinearModel {
    fn name(&self) -> &'static str {
        "linear"
    }

    fn strength_at(&self, distance: f64) -> DomainResult<f64> {
        if !(distance >= 0.0) || !distance.is_finite() {
            return Err(DomainError::invalid_argument(format!(
                "distance must be finite and non-negative, got {}",
                distance
            )));
        }
        Ok(distance / self.max_range * MAX_DBM)
    }

    fn max_range(&self) -> f64 {
        self.max_range
    }
}
