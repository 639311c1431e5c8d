//! Bounded-concurrency fan-out of the TCP prober over a batch of candidate
//! IPs, producing the sorted survivor list for the speed stage.

use crate::tcp_prober::probe;
use edgescan_core::{sort_ping_results, ByteMeter, CancelToken, PingResult, ProbeConfig};
use std::net::IpAddr;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use tokio::sync::Semaphore;
use tracing::info;

/// Snapshot passed to the progress callback after every completed probe.
#[derive(Debug, Clone, Copy)]
pub struct LatencyProgress {
    pub completed: usize,
    pub total: usize,
    pub successes: usize,
}

/// Run the latency stage: probe every IP under a `max_ping_workers`
/// concurrency cap, keep only candidates with at least one successful
/// connect, and return them sorted by (loss ascending, RTT ascending).
///
/// On cancellation, no further work is scheduled but already-spawned
/// probes are always awaited to completion (each is bounded by
/// `probe_timeout_ms * probe_count`); the caller is expected to treat a
/// cancelled run's survivors as unreliable and discard them, per the
/// stage's cancellation contract.
pub async fn scan<F>(
    ips: Vec<IpAddr>,
    config: &ProbeConfig,
    meter: Arc<ByteMeter>,
    cancel: CancelToken,
    mut on_progress: F,
) -> Vec<PingResult>
where
    F: FnMut(LatencyProgress) + Send + 'static,
{
    let total = ips.len();
    let semaphore = Arc::new(Semaphore::new(config.max_ping_workers));
    let results = Arc::new(Mutex::new(Vec::new()));
    let completed = Arc::new(AtomicUsize::new(0));
    let successes = Arc::new(AtomicUsize::new(0));

    let mut handles = Vec::with_capacity(total);

    for ip in ips {
        if cancel.is_cancelled() {
            break;
        }

        let permit = match semaphore.clone().acquire_owned().await {
            Ok(permit) => permit,
            Err(_) => break,
        };

        let config = config.clone();
        let meter = Arc::clone(&meter);
        let cancel = cancel.clone();
        let results = Arc::clone(&results);

        handles.push(tokio::spawn(async move {
            let _permit = permit;
            let outcome = probe(ip, &config, &meter, &cancel).await;
            if outcome.received > 0 {
                let record = PingResult {
                    ip,
                    sent: outcome.sent,
                    received: outcome.received,
                    mean_rtt_ms: outcome.mean_rtt_ms(),
                };
                results.lock().unwrap().push(record);
            }
            outcome.received > 0
        }));
    }

    for handle in handles {
        if let Ok(found) = handle.await {
            let done = completed.fetch_add(1, Ordering::Relaxed) + 1;
            let found_total = if found {
                successes.fetch_add(1, Ordering::Relaxed) + 1
            } else {
                successes.load(Ordering::Relaxed)
            };
            on_progress(LatencyProgress {
                completed: done,
                total,
                successes: found_total,
            });
        }
    }

    let mut survivors = Arc::try_unwrap(results)
        .map(|m| m.into_inner().unwrap())
        .unwrap_or_else(|arc| arc.lock().unwrap().clone());

    info!(
        total,
        survivors = survivors.len(),
        "latency stage complete"
    );

    sort_ping_results(&mut survivors);
    survivors
}
