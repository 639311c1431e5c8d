//! Serial TCP-connect reachability probing of a single candidate IP.

use edgescan_core::{ByteMeter, CancelToken, ProbeConfig};
use std::net::{IpAddr, SocketAddr};
use std::time::{Duration, Instant};
use tokio::net::TcpStream;
use tokio::time::timeout;
use tracing::trace;

/// Raw outcome of probing one IP: attempts made, successes, and the sum
/// of elapsed time over the successful attempts (the caller divides by
/// `received` to get the mean).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ProbeOutcome {
    pub sent: u32,
    pub received: u32,
    pub sum_rtt: Duration,
}

/// Run `config.probe_count` sequential connect attempts against `ip:443`,
/// charging `config.probe_bytes` to `meter` after every attempt regardless
/// of outcome. Aborts early (returning whatever was collected so far) if
/// `cancel` fires between attempts.
pub async fn probe(
    ip: IpAddr,
    config: &ProbeConfig,
    meter: &ByteMeter,
    cancel: &CancelToken,
) -> ProbeOutcome {
    let addr = SocketAddr::new(ip, 443);
    let deadline = Duration::from_millis(config.probe_timeout_ms);

    let mut received = 0u32;
    let mut sum_rtt = Duration::ZERO;

    for attempt in 0..config.probe_count {
        if cancel.is_cancelled() {
            break;
        }

        let start = Instant::now();
        match timeout(deadline, TcpStream::connect(addr)).await {
            Ok(Ok(_stream)) => {
                let elapsed = start.elapsed();
                received += 1;
                sum_rtt += elapsed;
                trace!(%ip, attempt, elapsed_ms = elapsed.as_millis() as u64, "probe ok");
            }
            Ok(Err(e)) => {
                trace!(%ip, attempt, error = %e, "probe connect failed");
            }
            Err(_) => {
                trace!(%ip, attempt, "probe timed out");
            }
        }

        meter.add(config.probe_bytes);
    }

    ProbeOutcome {
        sent: config.probe_count,
        received,
        sum_rtt,
    }
}

impl ProbeOutcome {
    pub fn mean_rtt_ms(&self) -> f64 {
        if self.received == 0 {
            return 0.0;
        }
        sum_rtt_ms(self.sum_rtt) / self.received as f64
    }
}

fn sum_rtt_ms(d: Duration) -> f64 {
    d.as_secs_f64() * 1000.0
}
