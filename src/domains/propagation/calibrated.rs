use super::{PropagationModel, MAX_DBM};
use crate::common::{DomainError, DomainResult};
use serde::{Deserialize, Serialize};

/// A signal strength measured at a known distance.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CalibrationReference {
    /// Metres, > 0.
    pub distance: f64,
    /// dBm, < 0.
    pub strength: f64,
}

impl CalibrationReference {
    pub fn new(distance: f64, strength: f64) -> Self {
        Self { distance, strength }
    }

    fn validate(&self, label: &str) -> DomainResult<()> {
        if !(self.distance.is_finite() && self.distance > 0.0) {
            return Err(DomainError::invalid_config(format!(
                "{} calibration distance must be positive, got {}",
                label, self.distance
            )));
        }
        if !(self.strength.is_finite() && self.strength < 0.0) {
            return Err(DomainError::invalid_config(format!(
                "{} calibration strength must be negative, got {}",
                label, self.strength
            )));
        }
        Ok(())
    }
}

/// Log-distance path loss model calibrated from two reference measurements.
#[derive(Debug, Clone, PartialEq)]
pub struct CalibratedModel {
    near: CalibrationReference,
    far: CalibrationReference,
    path_loss_exponent: f64,
}

impl CalibratedModel {
    pub fn new(near: CalibrationReference, far: CalibrationReference) -> DomainResult<Self> {
        near.validate("first")?;
        far.validate("second")?;
        if near.distance == far.distance {
            return Err(DomainError::invalid_config(format!(
                "calibration distances must differ, both are {}",
                near.distance
            )));
        }

        let path_loss_exponent =
            (near.strength - far.strength) / (10.0 * (far.distance / near.distance).log10());

        Ok(Self { near, far, path_loss_exponent })
    }

    pub fn path_loss_exponent(&self) -> f64 {
        self.path_loss_exponent
    }

    pub fn references(&self) -> (CalibrationReference, CalibrationReference) {
        (self.near, self.far)
    }
}

impl PropagationModel for CalibratedModel {
    fn name(&self) -> &'static str {
        "calibrated"
    }

    fn strength_at(&self, distance: f64) -> DomainResult<f64> {
        if !(distance > 0.0) {
            return Err(DomainError::invalid_argument(format!(
                "distance must be positive for the calibrated model, got {}",
                distance
            )));
        }
        Ok(self.near.strength
            - 10.0 * self.path_loss_exponent * (distance / self.near.distance).log10())
    }

    fn max_range(&self) -> f64 {
        self.near.distance
            * 10f64.powf((self.near.strength - MAX_DBM) / (10.0 * self.path_loss_exponent))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn reference_model() -> CalibratedModel {
        CalibratedModel::new(
            CalibrationReference::new(1.0, -20.0),
            CalibrationReference::new(10.0, -70.0),
        )
        .unwrap()
    }

    #[test]
    fn test_exponent_from_reference_points() {
        let model = reference_model();
        assert!((model.path_loss_exponent() - 5.0).abs() < 1e-12);
    }

    #[test]
    fn test_round_trip_at_calibration_points() {
        let cases = [
            ((1.0, -20.0), (10.0, -70.0)),
            ((2.0, -35.0), (40.0, -80.0)),
            ((50.0, -60.0), (5.0, -41.5)),
        ];
        for ((d0, s0), (d1, s1)) in cases {
            let model = CalibratedModel::new(
                CalibrationReference::new(d0, s0),
                CalibrationReference::new(d1, s1),
            )
            .unwrap();
            assert!((model.strength_at(d0).unwrap() - s0).abs() < 1e-9);
            assert!((model.strength_at(d1).unwrap() - s1).abs() < 1e-9);
        }
    }

    #[test]
    fn test_strength_decreases_with_distance() {
        let model = reference_model();
        let mut previous = model.strength_at(0.1).unwrap();
        for step in 1..500 {
            let current = model.strength_at(0.1 + step as f64 * 0.25).unwrap();
            assert!(current <= previous);
            previous = current;
        }
    }

    #[test]
    fn test_max_range_boundary() {
        let model = reference_model();
        let max_range = model.max_range();
        assert!((max_range - 10f64.powf(1.4)).abs() < 1e-9);
        assert!((model.strength_at(max_range).unwrap() - MAX_DBM).abs() < 1e-9);

        assert!(model.in_range(max_range).unwrap());
        assert!(model.in_range(max_range * 0.999).unwrap());
        assert!(!model.in_range(max_range * 1.001).unwrap());
    }

    #[test]
    fn test_equal_distances_rejected() {
        let result = CalibratedModel::new(
            CalibrationReference::new(5.0, -20.0),
            CalibrationReference::new(5.0, -70.0),
        );
        match result {
            Err(DomainError::InvalidConfiguration { reason }) => {
                assert!(reason.contains("must differ"));
            }
            other => panic!("Expected InvalidConfiguration, got {:?}", other),
        }
    }

    #[test]
    fn test_non_positive_distance_faults() {
        let model = reference_model();
        assert!(matches!(model.strength_at(0.0), Err(DomainError::InvalidArgument { .. })));
        assert!(model.strength_at(-3.0).is_err());
        assert!(model.in_range(0.0).is_err());
    }

    #[test]
    fn test_reference_sign_checks() {
        assert!(CalibratedModel::new(
            CalibrationReference::new(0.0, -20.0),
            CalibrationReference::new(10.0, -70.0),
        )
        .is_err());
        assert!(CalibratedModel::new(
            CalibrationReference::new(1.0, 5.0),
            CalibrationReference::new(10.0, -70.0),
        )
        .is_err());
    }
}
