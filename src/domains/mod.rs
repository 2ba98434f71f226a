pub mod antenna;
pub mod geometry;
pub mod jitter;
pub mod logger;
pub mod person;
pub mod propagation;
pub mod simulation;

pub use antenna::*;
pub use geometry::*;
pub use jitter::*;
pub use logger::*;
pub use person::*;
pub use propagation::*;
pub use simulation::*;
