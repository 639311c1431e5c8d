//! Core value types shared by the scanner and CLI crates.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::net::IpAddr;

/// Outcome of TCP-probing a single candidate IP during the latency stage.
///
/// Invariant: `received <= sent`, and `sent` always equals the configured
/// probe count. A record is only ever constructed for `received > 0` --
/// candidates with zero successful probes are dropped, not emitted with a
/// meaningless mean RTT.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PingResult {
    pub ip: IpAddr,
    pub sent: u32,
    pub received: u32,
    /// Arithmetic mean over successful attempts only, in milliseconds.
    pub mean_rtt_ms: f64,
}

impl PingResult {
    pub fn loss_rate(&self) -> f64 {
        (self.sent - self.received) as f64 / self.sent as f64
    }
}

impl fmt::Display for PingResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} ({}/{} recv, {:.1}ms)",
            self.ip, self.received, self.sent, self.mean_rtt_ms
        )
    }
}

/// Outcome of the HTTPS throughput measurement for a single candidate IP.
///
/// `throughput_mbps` is the final, already-converted MB/s figure (see the
/// estimator module for the normalization pipeline). A value of `0.0` is
/// never stored here -- candidates that fail to clear `MIN_VALID_BYTES`
/// are dropped by the speed scanner, not recorded with a zero speed.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SpeedResult {
    pub ip: IpAddr,
    pub sent: u32,
    pub received: u32,
    pub mean_rtt_ms: f64,
    pub throughput_mbps: f64,
}

impl SpeedResult {
    pub fn loss_rate(&self) -> f64 {
        (self.sent - self.received) as f64 / self.sent as f64
    }
}

impl fmt::Display for SpeedResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} loss={:.2} rtt={:.1}ms speed={:.2}MB/s",
            self.ip,
            self.loss_rate(),
            self.mean_rtt_ms,
            self.throughput_mbps
        )
    }
}

/// Final ordering applied to speed-stage results before they are reported.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum SortOrder {
    /// Highest throughput first (ties broken by lower RTT). Default.
    #[default]
    ThroughputDesc,
    /// Lowest round-trip time first (ties broken by higher throughput).
    RttAsc,
}

impl fmt::Display for SortOrder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SortOrder::ThroughputDesc => write!(f, "throughput"),
            SortOrder::RttAsc => write!(f, "rtt"),
        }
    }
}

impl std::str::FromStr for SortOrder {
    type Err = crate::error::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "throughput" | "speed" => Ok(SortOrder::ThroughputDesc),
            "rtt" | "latency" => Ok(SortOrder::RttAsc),
            other => Err(crate::error::Error::Config(format!(
                "unknown sort order '{other}', expected 'throughput' or 'rtt'"
            ))),
        }
    }
}

/// Sort a slice of `SpeedResult` in place per the given order.
pub fn sort_speed_results(results: &mut [SpeedResult], order: SortOrder) {
    match order {
        SortOrder::ThroughputDesc => results.sort_by(|a, b| {
            b.throughput_mbps
                .partial_cmp(&a.throughput_mbps)
                .unwrap_or(std::cmp::Ordering::Equal)
                .then_with(|| a.mean_rtt_ms.partial_cmp(&b.mean_rtt_ms).unwrap())
        }),
        SortOrder::RttAsc => results.sort_by(|a, b| {
            a.mean_rtt_ms
                .partial_cmp(&b.mean_rtt_ms)
                .unwrap_or(std::cmp::Ordering::Equal)
                .then_with(|| {
                    b.throughput_mbps
                        .partial_cmp(&a.throughput_mbps)
                        .unwrap()
                })
        }),
    }
}

/// Sort a slice of `PingResult` by (loss ascending, mean RTT ascending),
/// the fixed ordering the latency stage always applies to its survivors.
pub fn sort_ping_results(results: &mut [PingResult]) {
    results.sort_by(|a, b| {
        a.loss_rate()
            .partial_cmp(&b.loss_rate())
            .unwrap_or(std::cmp::Ordering::Equal)
            .then_with(|| a.mean_rtt_ms.partial_cmp(&b.mean_rtt_ms).unwrap())
    });
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::net::Ipv4Addr;

    fn ip(o: u8) -> IpAddr {
        IpAddr::V4(Ipv4Addr::new(1, 2, 3, o))
    }

    #[test]
    fn loss_rate_computed_from_sent_received() {
        let r = PingResult {
            ip: ip(1),
            sent: 4,
            received: 3,
            mean_rtt_ms: 10.0,
        };
        assert!((r.loss_rate() - 0.25).abs() < 1e-9);
    }

    #[test]
    fn ping_sort_orders_by_loss_then_rtt() {
        let mut results = vec![
            PingResult { ip: ip(1), sent: 4, received: 3, mean_rtt_ms: 5.0 }, // loss 0.25
            PingResult { ip: ip(2), sent: 4, received: 4, mean_rtt_ms: 30.0 }, // loss 0.0
            PingResult { ip: ip(3), sent: 4, received: 4, mean_rtt_ms: 10.0 }, // loss 0.0
        ];
        sort_ping_results(&mut results);
        assert_eq!(results[0].ip, ip(3));
        assert_eq!(results[1].ip, ip(2));
        assert_eq!(results[2].ip, ip(1));
    }

    #[test]
    fn speed_sort_throughput_desc_default() {
        let mut results = vec![
            SpeedResult { ip: ip(1), sent: 4, received: 4, mean_rtt_ms: 10.0, throughput_mbps: 1.0 },
            SpeedResult { ip: ip(2), sent: 4, received: 4, mean_rtt_ms: 10.0, throughput_mbps: 5.0 },
        ];
        sort_speed_results(&mut results, SortOrder::ThroughputDesc);
        assert_eq!(results[0].ip, ip(2));
    }

    #[test]
    fn sort_order_parses_known_aliases() {
        assert_eq!("throughput".parse::<SortOrder>().unwrap(), SortOrder::ThroughputDesc);
        assert_eq!("rtt".parse::<SortOrder>().unwrap(), SortOrder::RttAsc);
        assert!("bogus".parse::<SortOrder>().is_err());
    }
}
