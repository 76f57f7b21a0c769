//! Publish sink abstraction over the Kafka producer
//! Workers own one sink each and close it when their session drains

use crate::partition::partition_for;
use async_trait::async_trait;
use log::warn;
use rdkafka::config::ClientConfig;
use rdkafka::producer::{FutureProducer, FutureRecord, Producer};
use std::time::Duration;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum SinkError {
    #[error("Kafka error: {0}")]
    Kafka(#[from] rdkafka::error::KafkaError),

    #[error("Producer configuration error: {0}")]
    Config(String),
}

/// Opaque destination for access log lines.
///
/// Publish failures are per-event: the caller logs them and moves on, they
/// never abort the session. `close` is idempotent and flushes buffered sends.
#[async_trait]
pub trait PublishSink: Send + Sync {
    async fn publish(&self, topic: &str, key: &str, payload: &[u8]) -> Result<(), SinkError>;

    async fn close(&mut self);
}

/// Kafka-backed sink over an rdkafka `FutureProducer`
pub struct KafkaSink {
    producer: FutureProducer,
    partitions: Option<i32>,
    send_timeout: Duration,
    closed: bool,
}

impl KafkaSink {
    /// Create a producer bound to the given broker list.
    ///
    /// When `partitions` is set, records are routed explicitly via
    /// `partition_for`; otherwise the attached key leaves routing to the
    /// broker's consistent key hash.
    pub fn connect(brokers: &str, partitions: Option<i32>) -> Result<Self, SinkError> {
        let producer: FutureProducer = ClientConfig::new()
            .set("bootstrap.servers", brokers)
            .set("message.timeout.ms", "5000")
            .set("request.required.acks", "1")
            .create()?;

        Ok(Self {
            producer,
            partitions,
            send_timeout: Duration::from_secs(5),
            closed: false,
        })
    }

    /// Whether this sink has already been closed and drained
    pub fn is_closed(&self) -> bool {
        self.closed
    }
}

#[async_trait]
impl PublishSink for KafkaSink {
    async fn publish(&self, topic: &str, key: &str, payload: &[u8]) -> Result<(), SinkError> {
        let mut record = FutureRecord::to(topic).key(key).payload(payload);
        if let Some(count) = self.partitions {
            record = record.partition(partition_for(key, count));
        }

        match self.producer.send(record, self.send_timeout).await {
            Ok(_) => Ok(()),
            Err((e, _)) => Err(SinkError::Kafka(e)),
        }
    }

    async fn close(&mut self) {
        if self.closed {
            return;
        }
        self.closed = true;

        if let Err(e) = self.producer.flush(Duration::from_secs(10)) {
            warn!("Flush on close failed: {}", e);
        }
    }
}
