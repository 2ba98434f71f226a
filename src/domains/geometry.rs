use serde::{Deserialize, Serialize};

/// A point on the simulation plane, in metres.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(from = "[f64; 2]", into = "[f64; 2]")]
pub struct Position {
    pub x: f64,
    pub y: f64,
}

impl Position {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    pub fn is_finite(&self) -> bool {
        self.x.is_finite() && self.y.is_finite()
    }

    /// Euclidean distance to `other`.
    pub fn distance_to(&self, other: &Position) -> f64 {
        distance(*self, *other)
    }

    pub fn translate(&mut self, delta: Position) {
        self.x += delta.x;
        self.y += delta.y;
    }
}

impl From<[f64; 2]> for Position {
    fn from([x, y]: [f64; 2]) -> Self {
        Self { x, y }
    }
}

impl From<Position> for [f64; 2] {
    fn from(p: Position) -> Self {
        [p.x, p.y]
    }
}

/// Heading and speed of a moving person.
///
/// `bearing` is a planar angle in degrees measured counter-clockwise from the
/// positive x axis (not a compass bearing). `speed` is metres per second.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Direction {
    pub bearing: f64,
    pub speed: f64,
}

impl Direction {
    pub fn is_stationary(&self) -> bool {
        self.speed == 0.0
    }
}

pub fn distance(a: Position, b: Position) -> f64 {
    let dx = a.x - b.x;
    let dy = a.y - b.y;
    (dx * dx + dy * dy).sqrt()
}

/// Turns a bearing (degrees) and a magnitude into an x/y displacement of the
/// same length.
pub fn to_displacement(bearing_degrees: f64, magnitude: f64) -> Position {
    let theta = bearing_degrees.to_radians();
    Position {
        x: magnitude * theta.cos(),
        y: magnitude * theta.sin(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPS: f64 = 1e-9;

    #[test]
    fn test_distance_is_euclidean() {
        let d = distance(Position::new(0.0, 0.0), Position::new(3.0, 4.0));
        assert!((d - 5.0).abs() < EPS);
        assert_eq!(distance(Position::new(2.0, 2.0), Position::new(2.0, 2.0)), 0.0);
    }

    #[test]
    fn test_displacement_uses_planar_angle() {
        let east = to_displacement(0.0, 2.0);
        assert!((east.x - 2.0).abs() < EPS && east.y.abs() < EPS);

        let north = to_displacement(90.0, 1.0);
        assert!(north.x.abs() < EPS && (north.y - 1.0).abs() < EPS);

        let south = to_displacement(270.0, 1.0);
        assert!(south.x.abs() < EPS && (south.y + 1.0).abs() < EPS);
    }

    #[test]
    fn test_position_deserializes_from_pair() {
        let p: Position = serde_json::from_str("[1.5, -2.0]").unwrap();
        assert_eq!(p, Position::new(1.5, -2.0));
        assert_eq!(serde_json::to_string(&p).unwrap(), "[1.5,-2.0]");
    }
}
