//! Synthetic web access log traffic generator
//! Simulates independent browsing sessions and publishes one access log
//! line per user action to a Kafka topic, for load-testing downstream
//! log-ingestion pipelines.

pub mod config;
pub mod coordinator;
pub mod event;
pub mod partition;
pub mod sink;
pub mod stats;
pub mod worker;

// Re-export commonly used types
pub use config::RunConfig;
pub use coordinator::{ActiveWorkers, Coordinator};
pub use event::{LogEvent, StatusCode};
pub use partition::partition_for;
pub use sink::{KafkaSink, PublishSink, SinkError};
pub use stats::{RunStats, RunSummary};
pub use worker::SimulatedUser;

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
