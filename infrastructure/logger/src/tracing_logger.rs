use business::domain::logger::Logger;
use tracing::{debug, error, info, warn};

pub struct TracingLogger;

impl Logger for TracingLogger {
    fn info(&self, message: &str) {
        info!(target: "Agent -- ", "{}", message);
    }
    fn warn(&self, message: &str) {
        warn!(target: "Agent -- ", "{}", message);
    }
    fn error(&self, message: &str) {
        error!(target: "Agent -- ", "{}", message);
    }
    fn debug(&self, message: &str) {
        debug!(target: "Agent -- ", "{}", message);
    }
}
