//! Core types and configuration shared by the edge-IP scanner and its CLI.
//!
//! # Examples
//!
//! ```
//! use edgescan_core::Config;
//!
//! let config = Config::default();
//! assert!(config.validate().is_ok());
//! assert_eq!(config.speed.top_k, 500);
//! ```

pub mod byte_meter;
pub mod cancel;
pub mod config;
pub mod error;
pub mod types;

pub use byte_meter::ByteMeter;
pub use cancel::CancelToken;
pub use config::{Config, OutputConfig, ProbeConfig, SpeedConfig};
pub use error::{Error, Result};
pub use types::{sort_ping_results, sort_speed_results, PingResult, SortOrder, SpeedResult};
