use super::{AntennaConfig, PersonConfig};
use crate::domains::geometry::{Direction, Position};
use crate::domains::jitter::Randomizer;
use serde::{Deserialize, Serialize};

/// A rectangular lattice of antennas.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AntennaGridConfig {
    pub corner_position: Position,
    pub rows: u32,
    pub columns: u32,
    /// Metres between rows.
    pub vertical_spacing: f64,
    /// Metres between columns.
    pub horizontal_spacing: f64,
}

/// A rectangular lattice of persons sharing one heading and randomizer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PersonGridConfig {
    pub corner_position: Position,
    pub rows: u32,
    pub columns: u32,
    pub vertical_spacing: f64,
    pub horizontal_spacing: f64,
    #[serde(default)]
    pub direction: Direction,
    #[serde(default)]
    pub signal_strength: Randomizer,
}

/// Column-major walk over a grid: all rows of the first column, then the next.
fn lattice(corner: Position, rows: u32, columns: u32, dy: f64, dx: f64) -> impl Iterator<Item = Position> {
    (0..columns).flat_map(move |col| {
        (0..rows).map(move |row| Position::new(corner.x + col as f64 * dx, corner.y + row as f64 * dy))
    })
}

pub fn antenna_grid(grid: &AntennaGridConfig) -> Vec<AntennaConfig> {
    lattice(
        grid.corner_position,
        grid.rows,
        grid.columns,
        grid.vertical_spacing,
        grid.horizontal_spacing,
    )
    .map(|position| AntennaConfig { position })
    .collect()
}

pub fn person_grid(grid: &PersonGridConfig) -> Vec<PersonConfig> {
    lattice(
        grid.corner_position,
        grid.rows,
        grid.columns,
        grid.vertical_spacing,
        grid.horizontal_spacing,
    )
    .map(|position| PersonConfig {
        imsi: None,
        position,
        direction: grid.direction,
        signal_strength: grid.signal_strength,
    })
    .collect()
}
