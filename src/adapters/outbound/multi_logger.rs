use crate::domains::logger::{DomainLogger, DynLogger};
use std::sync::Arc;

/// Forwards every message to each of its sinks in order.
pub struct MultiLogger {
    sinks: Vec<DynLogger>,
}

impl MultiLogger {
    pub fn new(sinks: Vec<DynLogger>) -> Self {
        Self { sinks }
    }
}

impl DomainLogger for MultiLogger {
    fn info(&self, msg: &str) {
        self.sinks.iter().for_each(|s| s.info(msg));
    }

    fn warn(&self, msg: &str) {
        self.sinks.iter().for_each(|s| s.warn(msg));
    }

    fn error(&self, msg: &str) {
        self.sinks.iter().for_each(|s| s.error(msg));
    }
}

/// A fan-out with no sinks: every message is discarded. Default logger for
/// simulations built in tests.
pub fn init_noop_logger() -> DynLogger {
    Arc::new(MultiLogger::new(Vec::new()))
}

/// File logger when `path` is given and can be opened, console otherwise.
/// Any `extra` sinks receive every message as well.
pub fn init_combined_logger(path: Option<&str>, extra: Vec<DynLogger>) -> DynLogger {
    let primary = match path {
        Some(path) => match crate::adapters::outbound::init_file_logger(path, "cdm-simulator") {
            Ok(logger) => logger,
            Err(e) => {
                tracing::warn!("{}; falling back to console logging", e);
                crate::adapters::outbound::init_console_logger()
            }
        },
        None => crate::adapters::outbound::init_console_logger(),
    };

    if extra.is_empty() {
        return primary;
    }
    let mut sinks = vec![primary];
    sinks.extend(extra);
    Arc::new(MultiLogger::new(sinks))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    #[derive(Default)]
    struct Counting {
        lines: Mutex<usize>,
    }

    impl DomainLogger for Counting {
        fn info(&self, _msg: &str) {
            *self.lines.lock().unwrap() += 1;
        }
        fn warn(&self, _msg: &str) {
            *self.lines.lock().unwrap() += 1;
        }
        fn error(&self, _msg: &str) {
            *self.lines.lock().unwrap() += 1;
        }
    }

    #[test]
    fn test_every_sink_sees_every_level() {
        let a = Arc::new(Counting::default());
        let b = Arc::new(Counting::default());
        let multi = MultiLogger::new(vec![a.clone() as DynLogger, b.clone() as DynLogger]);
        multi.info("i");
        multi.warn("w");
        multi.error("e");
        assert_eq!(*a.lines.lock().unwrap(), 3);
        assert_eq!(*b.lines.lock().unwrap(), 3);
    }

    #[test]
    fn test_noop_logger_accepts_everything() {
        let noop = init_noop_logger();
        noop.info("ignored");
        noop.warn("ignored");
        noop.error("ignored");
    }
}
