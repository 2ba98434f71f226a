use cdm_simulator::adapters::outbound::{init_buffered_logger, init_combined_logger, init_noop_logger, MultiLogger};
use cdm_simulator::domains::logger::{DomainLogger, DynLogger};
use std::sync::{Arc, Mutex};
use std::time::Duration;

struct BridgeCapture {
    messages: Arc<Mutex<Vec<String>>>,
}

impl BridgeCapture {
    fn new() -> Self { Self { messages: Arc::new(Mutex::new(Vec::new())) } }
}

impl DomainLogger for BridgeCapture {
    fn info(&self, msg: &str) { self.messages.lock().unwrap().push(format!("INFO:{}", msg)); }
    fn warn(&self, msg: &str) { self.messages.lock().unwrap().push(format!("WARN:{}", msg)); }
    fn error(&self, msg: &str) { self.messages.lock().unwrap().push(format!("ERR:{}", msg)); }
}

#[tokio::test]
async fn test_buffered_and_noop_logger() {
    let capture = Arc::new(BridgeCapture::new());
    let bridge = capture.clone() as DynLogger;

    let buffered = init_buffered_logger(bridge.clone(), 8);
    buffered.info("Successfully registered antenna antenna-0, id: 1");
    buffered.warn("Could not register antenna antenna-1");
    buffered.error("Log error for antenna 1");

    // Let the forwarding task drain the queue
    tokio::time::sleep(Duration::from_millis(50)).await;

    let msgs = capture.messages.lock().unwrap();
    assert_eq!(msgs.len(), 3);
    assert!(msgs[0].starts_with("INFO:Successfully registered"));
    assert!(msgs[1].starts_with("WARN:Could not register"));
    assert!(msgs[2].starts_with("ERR:Log error"));

    let noop = init_noop_logger();
    noop.info("ignored");
    noop.error("ignored-err");
}

#[test]
fn test_multi_logger_fans_out() {
    let first = Arc::new(BridgeCapture::new());
    let second = Arc::new(BridgeCapture::new());
    let multi = MultiLogger::new(vec![first.clone() as DynLogger, second.clone() as DynLogger]);

    multi.warn("Skipping person 7");

    for capture in [&first, &second] {
        assert_eq!(*capture.messages.lock().unwrap(), vec!["WARN:Skipping person 7".to_string()]);
    }
}

#[test]
fn test_combined_logger_forwards_to_extra_sinks() {
    let capture = Arc::new(BridgeCapture::new());
    let logger = init_combined_logger(None, vec![capture.clone() as DynLogger]);

    logger.info("Simulation started");

    assert_eq!(*capture.messages.lock().unwrap(), vec!["INFO:Simulation started".to_string()]);
}
