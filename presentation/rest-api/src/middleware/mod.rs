pub mod metrics;
pub mod recovery;
