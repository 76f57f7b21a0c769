//! Run coordination
//! Spawns one task per simulated user and blocks until every session stops

use crate::config::RunConfig;
use crate::sink::{KafkaSink, PublishSink, SinkError};
use crate::stats::{RunStats, RunSummary};
use crate::worker::{self, SimulatedUser};
use log::{error, info, warn};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Notify;
use tokio_util::sync::CancellationToken;
use uuid::Uuid;

const HEARTBEAT: Duration = Duration::from_secs(2);

/// Count of user sessions still running, with wakeups for the waiter.
///
/// Sessions hold a guard for their whole lifetime, so the count can never
/// go negative and reaches zero exactly when the last session terminates,
/// on any exit path.
#[derive(Debug, Default)]
pub struct ActiveWorkers {
    count: AtomicUsize,
    notify: Notify,
}

impl ActiveWorkers {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register one session; the returned guard decrements on drop
    pub fn register(self: &Arc<Self>) -> WorkerGuard {
        self.count.fetch_add(1, Ordering::SeqCst);
        WorkerGuard(Arc::clone(self))
    }

    pub fn active(&self) -> usize {
        self.count.load(Ordering::SeqCst)
    }

    /// Block until the count reaches zero, logging a progress heartbeat
    /// while sessions remain
    pub async fn wait_idle(&self, heartbeat: Duration, silent: bool) {
        loop {
            let notified = self.notify.notified();
            if self.active() == 0 {
                return;
            }

            let _ = tokio::time::timeout(heartbeat, notified).await;

            let remaining = self.active();
            if remaining == 0 {
                return;
            }
            if !silent {
                info!("Waiting for {} users to finish.", remaining);
            }
        }
    }
}

/// Keeps one session counted in `ActiveWorkers` until dropped
pub struct WorkerGuard(Arc<ActiveWorkers>);

impl Drop for WorkerGuard {
    fn drop(&mut self) {
        self.0.count.fetch_sub(1, Ordering::SeqCst);
        self.0.notify.notify_waiters();
    }
}

/// Spawns the configured number of user sessions and waits them out
pub struct Coordinator {
    config: Arc<RunConfig>,
}

impl Coordinator {
    pub fn new(config: RunConfig) -> Self {
        Self {
            config: Arc::new(config),
        }
    }

    /// Run the full simulation against Kafka.
    ///
    /// Returns once every user session has stopped. Ctrl-C cancels the
    /// run cooperatively: sessions finish their current action, drain
    /// their producers, and the wait completes normally.
    pub async fn run(&self) -> anyhow::Result<RunSummary> {
        let cancel = CancellationToken::new();

        let token = cancel.clone();
        let signal_listener = tokio::spawn(async move {
            if tokio::signal::ctrl_c().await.is_ok() {
                warn!("Interrupt received, draining user sessions");
                token.cancel();
            }
        });

        let result = self
            .run_with_sink(cancel, |config| {
                KafkaSink::connect(&config.brokers, config.partitions)
            })
            .await;

        signal_listener.abort();
        result
    }

    /// Run the simulation against sinks produced by `factory`.
    ///
    /// One sink per session; a factory failure costs only that session.
    pub async fn run_with_sink<S, F>(
        &self,
        cancel: CancellationToken,
        factory: F,
    ) -> anyhow::Result<RunSummary>
    where
        S: PublishSink + 'static,
        F: Fn(&RunConfig) -> Result<S, SinkError>,
    {
        self.config.validate()?;

        let stats = Arc::new(RunStats::new());
        let active = Arc::new(ActiveWorkers::new());

        let mut addr_rng = match self.config.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };

        for i in 0..self.config.users {
            let user = SimulatedUser {
                client_addr: format!("192.168.1.{}", addr_rng.gen_range(0..=255)),
                session_id: Uuid::new_v4().to_string(),
                run_duration: self.config.run_duration(),
                seed: self.config.seed.map(|seed| seed.wrapping_add(i as u64)),
            };

            // Registered before spawn so the wait below cannot observe
            // zero between spawning and the first session starting
            let guard = active.register();

            match factory(&self.config) {
                Ok(sink) => {
                    let config = Arc::clone(&self.config);
                    let stats = Arc::clone(&stats);
                    let cancel = cancel.clone();
                    tokio::spawn(async move {
                        let _guard = guard;
                        worker::run_user(user, sink, config, stats, cancel).await;
                    });
                }
                Err(e) => {
                    error!(
                        "User {} failed to acquire a producer: {}",
                        user.session_id, e
                    );
                    drop(guard);
                }
            }
        }

        active.wait_idle(HEARTBEAT, self.config.silent).await;

        if !self.config.silent {
            info!("All users have finished. Exiting...");
            stats.log_final();
        }

        Ok(stats.summary())
    }
}
