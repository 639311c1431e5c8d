//! Two-stage measurement pipeline: bounded-concurrency TCP latency
//! probing followed by bounded-concurrency HTTPS throughput measurement.
//!
//! # Example
//!
//! ```no_run
//! use edgescan_core::{ByteMeter, CancelToken, Config};
//! use edgescan_scanner::{ip_generator, latency_scanner, speed_scanner};
//! use std::sync::Arc;
//!
//! # async fn example() {
//! let config = Config::default();
//! let ips = ip_generator::generate(&config.cidr_blocks);
//! let meter = ByteMeter::new();
//! let cancel = CancelToken::new();
//!
//! let survivors = latency_scanner::scan(ips, &config.probing, Arc::clone(&meter), cancel.clone(), |_| {}).await;
//! let measured = speed_scanner::scan(
//!     &survivors,
//!     speed_scanner::SpeedMode::TopK,
//!     &config.speed,
//!     meter,
//!     cancel,
//!     |_| {},
//! )
//! .await;
//! # let _ = measured;
//! # }
//! ```

pub mod ewma;
pub mod ip_generator;
pub mod latency_scanner;
pub mod speed_scanner;
pub mod tcp_prober;
pub mod throughput_estimator;

pub use latency_scanner::{scan as scan_latency, LatencyProgress};
pub use speed_scanner::{scan as scan_speed, SpeedMode, SpeedProgress};
