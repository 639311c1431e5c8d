//! CLI argument parsing.

use clap::Parser;
use edgescan_core::SortOrder;
use std::path::PathBuf;

/// Scans CDN CIDR ranges for edge IPs with low latency and high throughput.
#[derive(Parser, Debug)]
#[command(
    name = "edgescan",
    version,
    about = "Finds low-latency, high-throughput edge IPs for a set of CDN CIDR ranges",
    after_help = "EXAMPLES:\n\
    # Scan the ranges listed in a config file\n\
    edgescan --config edgescan.toml\n\n\
    # Scan specific CIDR blocks from the command line, keep the top 200 by speed\n\
    edgescan --top-k 200 173.245.48.0/20 103.21.244.0/22\n\n\
    # Rank survivors by RTT instead of throughput\n\
    edgescan --sort rtt 173.245.48.0/20",
    author = "edge-ip-scanner contributors"
)]
pub struct Args {
    /// CIDR blocks to scan (IPv4 and/or IPv6). Ignored if empty and a config
    /// file supplies `cidr_blocks`.
    #[arg(value_name = "CIDR", help_heading = "TARGET SPECIFICATION")]
    pub cidr_blocks: Vec<String>,

    /// Path to a TOML config file. CLI flags override values it sets.
    #[arg(
        short = 'c',
        long,
        value_name = "FILE",
        help_heading = "TARGET SPECIFICATION"
    )]
    pub config: Option<PathBuf>,

    /// Number of latency-stage survivors advanced to the speed stage.
    #[arg(
        short = 'k',
        long = "top-k",
        value_name = "N",
        value_parser = clap::value_parser!(usize).range(10..=1000),
        help_heading = "SCAN OPTIONS"
    )]
    pub top_k: Option<usize>,

    /// Final ranking applied to speed-stage survivors.
    #[arg(
        long,
        value_name = "throughput|rtt",
        help_heading = "SCAN OPTIONS"
    )]
    pub sort: Option<SortOrder>,

    /// Path the results report is written to.
    #[arg(
        short = 'o',
        long,
        value_name = "FILE",
        help_heading = "OUTPUT"
    )]
    pub output: Option<PathBuf>,

    /// Increase verbosity (-v, -vv).
    #[arg(short, long, action = clap::ArgAction::Count, help_heading = "OUTPUT")]
    pub verbose: u8,

    /// Suppress progress bars and the startup banner.
    #[arg(short = 'q', long, help_heading = "OUTPUT")]
    pub quiet: bool,
}
