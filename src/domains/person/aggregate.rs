use crate::domains::geometry::{to_displacement, Direction, Position};
use crate::domains::jitter::Randomizer;

/// A simulated phone owner moving across the plane.
#[derive(Debug, Clone, PartialEq)]
pub struct Person {
    /// IMSI-like subscriber number. Only its hash ever leaves the process.
    pub imsi: u64,
    pub position: Position,
    pub direction: Direction,
    pub signal_strength: Randomizer,
}

impl Person {
    pub fn new(imsi: u64, position: Position, direction: Direction, signal_strength: Randomizer) -> Self {
        Self {
            imsi,
            position,
            direction,
            signal_strength,
        }
    }

    /// Moves the person along its heading for `delta_seconds`.
    pub fn advance(&mut self, delta_seconds: f64) {
        if self.direction.is_stationary() {
            return;
        }
        let delta = to_displacement(self.direction.bearing, self.direction.speed * delta_seconds);
        self.position.translate(delta);
    }
}
