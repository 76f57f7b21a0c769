//! Configuration module for the traffic generator
//! Handles CLI argument parsing and validation

use clap::Parser;
use std::fmt;
use std::time::Duration;

#[derive(Parser, Clone, Debug)]
#[command(name = "weblog_gen", about = "Synthetic web access log traffic generator")]
#[command(version = "1.0")]
pub struct RunConfig {
    /// Kafka brokers
    #[arg(long, help = "Comma-separated list of Kafka broker host:port pairs")]
    pub brokers: String,

    /// Destination topic
    #[arg(long, default_value = "weblogs", help = "Kafka topic for access log messages")]
    pub topic: String,

    /// Number of simulated users
    #[arg(long, default_value = "10", help = "Number of concurrent users to simulate")]
    pub users: usize,

    /// Run duration in seconds
    #[arg(long, default_value = "120", help = "Number of seconds to simulate user traffic")]
    pub run_secs: u64,

    /// Minimum think time in seconds
    #[arg(long, default_value = "5", help = "Minimum think time between simulated actions (seconds)")]
    pub think_min: u64,

    /// Maximum think time in seconds
    #[arg(long, default_value = "10", help = "Maximum think time between simulated actions (seconds)")]
    pub think_max: u64,

    /// Explicit partition count for client-address routing
    #[arg(long, help = "Route each client to one of N partitions explicitly; defaults to broker-side key hashing")]
    pub partitions: Option<i32>,

    /// Base seed for per-user random sources
    #[arg(long, help = "Seed user random sources for reproducible runs")]
    pub seed: Option<u64>,

    /// Suppress all output
    #[arg(long, help = "Suppress event echo and progress messages")]
    pub silent: bool,
}

impl RunConfig {
    /// Validate configuration parameters
    pub fn validate(&self) -> anyhow::Result<()> {
        if self.brokers.trim().is_empty() {
            anyhow::bail!("Broker list must not be empty");
        }

        if self.topic.trim().is_empty() {
            anyhow::bail!("Topic must not be empty");
        }

        if self.users == 0 {
            anyhow::bail!("User count must be greater than 0");
        }

        if self.run_secs == 0 {
            anyhow::bail!("Run duration must be at least 1 second");
        }

        if self.think_min == 0 || self.think_max == 0 {
            anyhow::bail!("Think times must be at least 1 second");
        }

        if self.think_min > self.think_max {
            anyhow::bail!("Minimum think time must not exceed maximum think time");
        }

        if let Some(partitions) = self.partitions {
            if partitions <= 0 {
                anyhow::bail!("Partition count must be greater than 0");
            }
        }

        Ok(())
    }

    /// Total wall-clock time each user stays active
    pub fn run_duration(&self) -> Duration {
        Duration::from_secs(self.run_secs)
    }

    /// Minimum think time in milliseconds
    pub fn think_min_ms(&self) -> u64 {
        self.think_min * 1000
    }

    /// Maximum think time in milliseconds
    pub fn think_max_ms(&self) -> u64 {
        self.think_max * 1000
    }
}

impl fmt::Display for RunConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "RunConfig {{ topic: {}, users: {}, run_secs: {}, think: {}-{}s, silent: {} }}",
            self.topic, self.users, self.run_secs, self.think_min, self.think_max, self.silent
        )
    }
}
