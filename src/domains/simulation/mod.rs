pub mod clock;
pub mod ports;
pub mod scenario;
pub mod scheduler;
pub mod task;

pub use clock::*;
pub use ports::*;
pub use scenario::*;
pub use scheduler::*;
pub use task::*;
