use crate::domains::logger::DomainLogger;
use chrono::Local;
use std::sync::Arc;

struct ConsoleLogger;

impl ConsoleLogger {
    fn stamp() -> String {
        Local::now().format("%H:%M:%S%.3f").to_string()
    }
}

impl DomainLogger for ConsoleLogger {
    fn info(&self, msg: &str) {
        println!("{} INFO  {}", Self::stamp(), msg);
    }

    fn warn(&self, msg: &str) {
        eprintln!("{} WARN  {}", Self::stamp(), msg);
    }

    fn error(&self, msg: &str) {
        eprintln!("{} ERROR {}", Self::stamp(), msg);
    }
}

/// Console-backed logger, the fallback when no log file can be opened.
pub fn init_console_logger() -> Arc<dyn DomainLogger> {
    Arc::new(ConsoleLogger)
}
