pub mod buffered_logger;
pub mod console_collector;
pub mod console_logger;
pub mod file_logger;
pub mod grpc_collector;
pub mod hashing;
pub mod in_memory_collector;
pub mod multi_logger;

pub use buffered_logger::*;
pub use console_collector::*;
pub use console_logger::*;
pub use file_logger::*;
pub use grpc_collector::*;
pub use hashing::*;
pub use in_memory_collector::*;
pub use multi_logger::*;
