//! Configuration for the latency and speed scanning stages.

use crate::error::{Error, Result};
use crate::types::SortOrder;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Top-level configuration, loadable from a TOML file and overridable by CLI flags.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// CIDR blocks (IPv4 and/or IPv6) to draw candidate IPs from.
    #[serde(default)]
    pub cidr_blocks: Vec<String>,
    pub probing: ProbeConfig,
    pub speed: SpeedConfig,
    pub output: OutputConfig,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            cidr_blocks: Vec::new(),
            probing: ProbeConfig::default(),
            speed: SpeedConfig::default(),
            output: OutputConfig::default(),
        }
    }
}

impl Config {
    pub fn load_from_file(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path)
            .map_err(|e| Error::Config(format!("failed to read config file {path:?}: {e}")))?;
        Self::load_from_str(&contents)
    }

    pub fn load_from_str(contents: &str) -> Result<Self> {
        let config: Config = toml::from_str(contents)?;
        config.validate()?;
        Ok(config)
    }

    pub fn save_to_file(&self, path: &Path) -> Result<()> {
        let contents = toml::to_string_pretty(self)?;
        std::fs::write(path, contents)
            .map_err(|e| Error::Config(format!("failed to write config file {path:?}: {e}")))?;
        Ok(())
    }

    pub fn validate(&self) -> Result<()> {
        self.probing.validate()?;
        self.speed.validate()?;
        self.output.validate()?;
        Ok(())
    }
}

/// Tuning for the latency (TCP probe) stage.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProbeConfig {
    /// Number of serial connect attempts per IP.
    #[serde(default = "default_probe_count")]
    pub probe_count: u32,
    /// Per-connect deadline, in milliseconds.
    #[serde(default = "default_probe_timeout_ms")]
    pub probe_timeout_ms: u64,
    /// Fixed byte-meter charge per probe attempt (handshake overhead accounting).
    #[serde(default = "default_probe_bytes")]
    pub probe_bytes: u64,
    /// Concurrency cap for the latency stage fan-out.
    #[serde(default = "default_max_ping_workers")]
    pub max_ping_workers: usize,
}

fn default_probe_count() -> u32 {
    4
}
fn default_probe_timeout_ms() -> u64 {
    1_000
}
fn default_probe_bytes() -> u64 {
    80
}
fn default_max_ping_workers() -> usize {
    200
}

impl Default for ProbeConfig {
    fn default() -> Self {
        Self {
            probe_count: default_probe_count(),
            probe_timeout_ms: default_probe_timeout_ms(),
            probe_bytes: default_probe_bytes(),
            max_ping_workers: default_max_ping_workers(),
        }
    }
}

impl ProbeConfig {
    fn validate(&self) -> Result<()> {
        if self.probe_count == 0 {
            return Err(Error::Config("probe_count must be > 0".into()));
        }
        if self.probe_timeout_ms == 0 {
            return Err(Error::Config("probe_timeout_ms must be > 0".into()));
        }
        if self.max_ping_workers == 0 {
            return Err(Error::Config("max_ping_workers must be > 0".into()));
        }
        Ok(())
    }
}

/// Tuning for the throughput (HTTPS speed) stage.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SpeedConfig {
    /// Wall-clock deadline for a single throughput measurement, in seconds.
    #[serde(default = "default_speed_timeout_secs")]
    pub speed_timeout_secs: u64,
    /// Concurrency cap for the speed stage fan-out.
    #[serde(default = "default_max_speed_workers")]
    pub max_speed_workers: usize,
    /// Minimum bytes read before a measurement is considered valid.
    #[serde(default = "default_min_valid_bytes")]
    pub min_valid_bytes: u64,
    /// URLs tried in order until one returns an acceptable status.
    #[serde(default = "default_probe_urls")]
    pub probe_urls: Vec<String>,
    /// Stop the find-first-N mode once this many successes accumulate.
    #[serde(default = "default_find_first_n")]
    pub find_first_n: usize,
    /// Candidates advancing from the latency stage to the speed stage.
    #[serde(default = "default_top_k")]
    pub top_k: usize,
    /// Final ranking applied to speed-stage survivors.
    #[serde(default)]
    pub sort_order: SortOrder,
}

fn default_speed_timeout_secs() -> u64 {
    10
}
fn default_max_speed_workers() -> usize {
    3
}
fn default_min_valid_bytes() -> u64 {
    256
}
fn default_probe_urls() -> Vec<String> {
    vec![
        "https://speed.cloudflare.com/__down?bytes=104857600".to_string(),
        "https://cf.xiu2.xyz/url".to_string(),
    ]
}
fn default_find_first_n() -> usize {
    10
}
fn default_top_k() -> usize {
    500
}

impl Default for SpeedConfig {
    fn default() -> Self {
        Self {
            speed_timeout_secs: default_speed_timeout_secs(),
            max_speed_workers: default_max_speed_workers(),
            min_valid_bytes: default_min_valid_bytes(),
            probe_urls: default_probe_urls(),
            find_first_n: default_find_first_n(),
            top_k: default_top_k(),
            sort_order: SortOrder::default(),
        }
    }
}

impl SpeedConfig {
    fn validate(&self) -> Result<()> {
        if self.speed_timeout_secs == 0 {
            return Err(Error::Config("speed_timeout_secs must be > 0".into()));
        }
        if self.max_speed_workers == 0 {
            return Err(Error::Config("max_speed_workers must be > 0".into()));
        }
        if self.probe_urls.is_empty() {
            return Err(Error::Config("probe_urls must not be empty".into()));
        }
        if !(10..=1000).contains(&self.top_k) {
            return Err(Error::Config(format!(
                "top_k must be between 10 and 1000, got {}",
                self.top_k
            )));
        }
        Ok(())
    }
}

/// Output/reporting configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OutputConfig {
    /// Path the results file is written to.
    #[serde(default = "default_output_path")]
    pub path: PathBuf,
}

fn default_output_path() -> PathBuf {
    PathBuf::from("clean_ips.txt")
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            path: default_output_path(),
        }
    }
}

impl OutputConfig {
    fn validate(&self) -> Result<()> {
        if self.path.as_os_str().is_empty() {
            return Err(Error::Config("output path must not be empty".into()));
        }
        Ok(())
    }
}
