//! End-to-end simulation test through the public API with an in-memory sink

use async_trait::async_trait;
use chrono::{DateTime, Duration, NaiveDateTime, Utc};
use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use tokio_util::sync::CancellationToken;
use weblog_gen::{partition_for, Coordinator, PublishSink, RunConfig, SinkError};

/// Records every published (topic, key, payload) triple
#[derive(Clone, Default)]
struct CapturingSink {
    records: Arc<Mutex<Vec<(String, String, String)>>>,
}

#[async_trait]
impl PublishSink for CapturingSink {
    async fn publish(&self, topic: &str, key: &str, payload: &[u8]) -> Result<(), SinkError> {
        self.records.lock().unwrap().push((
            topic.to_string(),
            key.to_string(),
            String::from_utf8_lossy(payload).into_owned(),
        ));
        Ok(())
    }

    async fn close(&mut self) {}
}

fn config(users: usize, run_secs: u64) -> RunConfig {
    RunConfig {
        brokers: "localhost:9092".to_string(),
        topic: "weblogs".to_string(),
        users,
        run_secs,
        think_min: 1,
        think_max: 2,
        partitions: Some(12),
        seed: Some(7),
        silent: true,
    }
}

#[tokio::test(start_paused = true)]
async fn simulated_run_publishes_ordered_per_client_records() {
    let records = Arc::new(Mutex::new(Vec::new()));
    let coordinator = Coordinator::new(config(8, 30));

    let sink_records = Arc::clone(&records);
    let summary = coordinator
        .run_with_sink(CancellationToken::new(), move |_| {
            Ok(CapturingSink {
                records: Arc::clone(&sink_records),
            })
        })
        .await
        .expect("run should complete");

    let records = records.lock().unwrap();
    assert_eq!(summary.events as usize, records.len());
    assert!(summary.events > 0);
    assert_eq!(summary.publish_errors, 0);

    // Every record goes to the configured topic, keyed by a synthetic
    // client address that maps to a stable partition
    let mut partitions_by_key: HashMap<String, i32> = HashMap::new();
    for (topic, key, payload) in records.iter() {
        assert_eq!(topic, "weblogs");
        assert!(key.starts_with("192.168.1."));

        let partition = partition_for(key, 12);
        let previous = partitions_by_key.entry(key.clone()).or_insert(partition);
        assert_eq!(*previous, partition);

        let fields: Vec<&str> = payload.split(' ').collect();
        assert_eq!(fields.len(), 8);
        assert_eq!(fields[2], key.as_str());
        assert_eq!(fields[5], "GET");
        assert_eq!(fields[7], "500");
    }

    // 30s run with 1-2s think time: each of the 8 users produced a bounded
    // number of events
    for count in partitions_by_key.keys().map(|key| {
        records
            .iter()
            .filter(|(_, record_key, _)| record_key == key)
            .count()
    }) {
        assert!(count >= 1);
        assert!(count <= 31);
    }
}

#[tokio::test]
async fn event_timestamps_stay_within_the_run_window() {
    let records = Arc::new(Mutex::new(Vec::new()));
    let mut run_config = config(2, 2);
    run_config.think_min = 1;
    run_config.think_max = 1;
    let coordinator = Coordinator::new(run_config);

    let run_start = Utc::now();
    let sink_records = Arc::clone(&records);
    coordinator
        .run_with_sink(CancellationToken::new(), move |_| {
            Ok(CapturingSink {
                records: Arc::clone(&sink_records),
            })
        })
        .await
        .expect("run should complete");

    // Two-second run with one-second think time: every event stamp lies
    // between the run start and start + run + one think interval
    let earliest = run_start - Duration::seconds(1);
    let latest = run_start + Duration::seconds(2 + 1 + 2);

    let records = records.lock().unwrap();
    assert!(!records.is_empty());
    for (_, _, payload) in records.iter() {
        let fields: Vec<&str> = payload.split(' ').collect();
        let stamp: DateTime<Utc> = NaiveDateTime::parse_from_str(
            &format!("{} {}", fields[0], fields[1]),
            "%Y-%m-%d %H:%M:%S%.3f",
        )
        .expect("timestamp fields should parse")
        .and_utc();

        assert!(stamp >= earliest, "event stamped before the run started");
        assert!(stamp <= latest, "event stamped after the run window closed");
    }
}

#[tokio::test(start_paused = true)]
async fn seeded_runs_use_reproducible_client_addresses() {
    let mut address_sets = Vec::new();

    for _ in 0..2 {
        let records = Arc::new(Mutex::new(Vec::new()));
        let coordinator = Coordinator::new(config(4, 2));

        let sink_records = Arc::clone(&records);
        coordinator
            .run_with_sink(CancellationToken::new(), move |_| {
                Ok(CapturingSink {
                    records: Arc::clone(&sink_records),
                })
            })
            .await
            .expect("run should complete");

        let mut addrs: Vec<String> = records
            .lock()
            .unwrap()
            .iter()
            .map(|(_, key, _)| key.clone())
            .collect();
        addrs.sort();
        addrs.dedup();
        address_sets.push(addrs);
    }

    assert_eq!(address_sets[0], address_sets[1]);
}
