//! Bounded-concurrency throughput measurement of the latency survivors.

use crate::throughput_estimator::measure;
use edgescan_core::{sort_speed_results, ByteMeter, CancelToken, PingResult, SortOrder, SpeedConfig, SpeedResult};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use tokio::sync::Semaphore;
use tracing::info;

/// Snapshot passed to the progress callback after every completed measurement.
#[derive(Debug, Clone, Copy)]
pub struct SpeedProgress {
    pub completed: usize,
    pub total: usize,
    pub successes: usize,
}

/// Which of the two documented speed-stage modes to run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SpeedMode {
    /// Measure the first `top_k` survivors regardless of outcome.
    TopK,
    /// Walk survivors in order until `find_first_n` successes accumulate.
    FindFirstN,
}

/// Run the speed stage over `survivors` (already sorted by the latency
/// stage) and return the successfully-measured candidates, sorted per
/// `config.sort_order`.
pub async fn scan<F>(
    survivors: &[PingResult],
    mode: SpeedMode,
    config: &SpeedConfig,
    meter: Arc<ByteMeter>,
    cancel: CancelToken,
    mut on_progress: F,
) -> Vec<SpeedResult>
where
    F: FnMut(SpeedProgress) + Send + 'static,
{
    let candidates: Vec<PingResult> = match mode {
        SpeedMode::TopK => {
            let k = config.top_k.min(survivors.len());
            survivors[..k].to_vec()
        }
        SpeedMode::FindFirstN => survivors.to_vec(),
    };
    let total = candidates.len();
    let target_successes = match mode {
        SpeedMode::TopK => None,
        SpeedMode::FindFirstN => Some(config.find_first_n),
    };

    let semaphore = Arc::new(Semaphore::new(config.max_speed_workers));
    let results = Arc::new(Mutex::new(Vec::new()));
    let completed = Arc::new(AtomicUsize::new(0));
    let successes = Arc::new(AtomicUsize::new(0));

    let mut handles = Vec::with_capacity(total);

    for candidate in candidates {
        if cancel.is_cancelled() {
            break;
        }
        if let Some(n) = target_successes {
            if successes.load(Ordering::Relaxed) >= n {
                break;
            }
        }

        let permit = match semaphore.clone().acquire_owned().await {
            Ok(permit) => permit,
            Err(_) => break,
        };

        let config = config.clone();
        let meter = Arc::clone(&meter);
        let cancel_clone = cancel.clone();
        let results = Arc::clone(&results);
        let successes_clone = Arc::clone(&successes);

        handles.push(tokio::spawn(async move {
            let _permit = permit;
            let throughput = measure(candidate.ip, &config, &meter, &cancel_clone).await;
            if throughput > 0.0 {
                let record = SpeedResult {
                    ip: candidate.ip,
                    sent: candidate.sent,
                    received: candidate.received,
                    mean_rtt_ms: candidate.mean_rtt_ms,
                    throughput_mbps: throughput,
                };
                results.lock().unwrap().push(record);
                successes_clone.fetch_add(1, Ordering::Relaxed);
            }
            throughput > 0.0
        }));
    }

    for handle in handles {
        if handle.await.is_ok() {
            let done = completed.fetch_add(1, Ordering::Relaxed) + 1;
            on_progress(SpeedProgress {
                completed: done,
                total,
                successes: successes.load(Ordering::Relaxed),
            });
        }
    }

    let mut measured = Arc::try_unwrap(results)
        .map(|m| m.into_inner().unwrap())
        .unwrap_or_else(|arc| arc.lock().unwrap().clone());

    info!(
        total,
        measured = measured.len(),
        "speed stage complete"
    );

    sort_speed_results(&mut measured, config.sort_order);
    measured
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::net::IpAddr;
    use tokio::io::{AsyncReadExt, AsyncWriteExt};
    use tokio::net::TcpListener;

    async fn spawn_fixed_body_server(body_len: usize) -> std::net::SocketAddr {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            loop {
                let Ok((mut stream, _)) = listener.accept().await else {
                    break;
                };
                tokio::spawn(async move {
                    let mut buf = [0u8; 1024];
                    let _ = stream.read(&mut buf).await;
                    let body = vec![b'a'; body_len];
                    let response = format!(
                        "HTTP/1.1 200 OK\r\nContent-Length: {}\r\nConnection: close\r\n\r\n",
                        body.len()
                    );
                    let _ = stream.write_all(response.as_bytes()).await;
                    let _ = stream.write_all(&body).await;
                    let _ = stream.shutdown().await;
                });
            }
        });
        addr
    }

    fn ping(ip: IpAddr) -> PingResult {
        PingResult {
            ip,
            sent: 4,
            received: 4,
            mean_rtt_ms: 10.0,
        }
    }

    #[tokio::test]
    async fn empty_survivors_yields_empty_results() {
        let config = SpeedConfig {
            speed_timeout_secs: 2,
            max_speed_workers: 3,
            min_valid_bytes: 256,
            probe_urls: vec!["http://127.0.0.1:1/".to_string()],
            find_first_n: 10,
            top_k: 10,
            sort_order: SortOrder::default(),
        };
        let meter = ByteMeter::new();
        let cancel = CancelToken::new();
        let out = scan(&[], SpeedMode::TopK, &config, meter, cancel, |_| {}).await;
        assert!(out.is_empty());
    }

    #[tokio::test]
    async fn top_k_measures_and_ranks_reachable_candidate() {
        let addr = spawn_fixed_body_server(64 * 1024).await;
        let url = format!("http://{}/", addr);
        let config = SpeedConfig {
            speed_timeout_secs: 3,
            max_speed_workers: 3,
            min_valid_bytes: 256,
            probe_urls: vec![url],
            find_first_n: 10,
            top_k: 10,
            sort_order: SortOrder::default(),
        };
        let meter = ByteMeter::new();
        let cancel = CancelToken::new();
        let survivors = vec![ping(addr.ip())];
        let out = scan(&survivors, SpeedMode::TopK, &config, meter, cancel, |_| {}).await;
        assert_eq!(out.len(), 1);
        assert!(out[0].throughput_mbps > 0.0);
    }

    #[tokio::test]
    async fn cancel_before_scheduling_yields_empty() {
        let config = SpeedConfig {
            speed_timeout_secs: 2,
            max_speed_workers: 3,
            min_valid_bytes: 256,
            probe_urls: vec!["http://127.0.0.1:1/".to_string()],
            find_first_n: 10,
            top_k: 10,
            sort_order: SortOrder::default(),
        };
        let meter = ByteMeter::new();
        let cancel = CancelToken::new();
        cancel.cancel();
        let survivors = vec![ping(IpAddr::V4(std::net::Ipv4Addr::new(192, 0, 2, 1)))];
        let out = scan(&survivors, SpeedMode::TopK, &config, meter, cancel, |_| {}).await;
        assert!(out.is_empty());
    }
}
