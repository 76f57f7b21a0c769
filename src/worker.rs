//! Simulated user session worker
//! One task per user: generate, publish, think, repeat until the deadline

use crate::config::RunConfig;
use crate::event::LogEvent;
use crate::sink::PublishSink;
use crate::stats::RunStats;
use log::{error, info};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::sync::Arc;
use std::time::Duration;
use tokio::time::{sleep, Instant};
use tokio_util::sync::CancellationToken;

/// Identity and lifetime of one simulated browsing session.
/// Fixed at spawn time, immutable for the worker's lifetime.
#[derive(Debug, Clone)]
pub struct SimulatedUser {
    pub client_addr: String,
    pub session_id: String,
    pub run_duration: Duration,
    pub seed: Option<u64>,
}

/// Run one user session to completion.
///
/// Loops until the run deadline or cancellation: generates an access log
/// event, echoes it to stderr unless silent, publishes it keyed by the
/// client address, then sleeps a think time drawn uniformly from the
/// configured bounds. Publish failures are logged and absorbed here; they
/// never affect other sessions. The sink is closed before the task ends.
pub async fn run_user<S: PublishSink>(
    user: SimulatedUser,
    mut sink: S,
    config: Arc<RunConfig>,
    stats: Arc<RunStats>,
    cancel: CancellationToken,
) {
    if !config.silent {
        info!(
            "Starting user simulator: addr={}, session={}, run_secs={}",
            user.client_addr,
            user.session_id,
            user.run_duration.as_secs()
        );
    }

    let mut rng = match user.seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    };

    let deadline = Instant::now() + user.run_duration;

    while Instant::now() < deadline && !cancel.is_cancelled() {
        let event = LogEvent::generate(&mut rng, &user.client_addr, &user.session_id);
        let line = event.to_string();

        if !config.silent {
            eprintln!("{line}");
        }

        match sink
            .publish(&config.topic, &user.client_addr, line.as_bytes())
            .await
        {
            Ok(()) => stats.count_event(line.len()),
            Err(e) => {
                error!("[{}] Publish failed: {}", user.session_id, e);
                stats.count_error();
            }
        }

        let think_ms = rng.gen_range(config.think_min_ms()..=config.think_max_ms());
        tokio::select! {
            _ = sleep(Duration::from_millis(think_ms)) => {}
            _ = cancel.cancelled() => {}
        }
    }

    sink.close().await;

    if !config.silent {
        info!("Stopping user simulator with session {}", user.session_id);
    }
}
