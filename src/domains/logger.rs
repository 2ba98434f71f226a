use std::sync::Arc;

/// Domain-level logging port (Hexagonal port).
///
/// The simulation reports registration outcomes, skipped pairs and dropped
/// measurements through it. Logging never fails from the domain's point of
/// view.
pub trait DomainLogger: Send + Sync + 'static {
    fn info(&self, msg: &str);
    fn warn(&self, msg: &str);
    fn error(&self, msg: &str);
}

pub type DynLogger = Arc<dyn DomainLogger>;
