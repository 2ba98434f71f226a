use crate::domains::logger::DomainLogger;
use chrono::Utc;
use std::sync::Arc;

/// Forwards domain messages to the `log` facade, which `fast_log` writes to
/// the console and a file.
struct FastLogBridge {
    component: &'static str,
}

impl DomainLogger for FastLogBridge {
    fn info(&self, msg: &str) {
        log::info!("{} [{}] {}", Utc::now().to_rfc3339(), self.component, msg);
    }

    fn warn(&self, msg: &str) {
        log::warn!("{} [{}] {}", Utc::now().to_rfc3339(), self.component, msg);
    }

    fn error(&self, msg: &str) {
        log::error!("{} [{}] {}", Utc::now().to_rfc3339(), self.component, msg);
    }
}

/// Installs `fast_log` as the global `log` backend writing to `path` and
/// returns a domain logger tagged with `component`.
pub fn init_file_logger(path: &str, component: &'static str) -> Result<Arc<dyn DomainLogger>, String> {
    fast_log::init(
        fast_log::config::Config::new()
            .console()
            .file(path)
            .level(log::LevelFilter::Info),
    )
    .map_err(|e| format!("Failed to initialize fast_log at {}: {}", path, e))?;
    Ok(Arc::new(FastLogBridge { component }))
}
