//! edgescan CLI
//!
//! Wires the config/CLI-flag merge, the IP generator, both scan stages, and
//! the `clean_ips.txt` report writer into a single run.

use anyhow::Result;
use clap::Parser;
use edgescan_cli::error::{exit_codes, CliError};
use edgescan_cli::error_formatter::create_error_formatter;
use edgescan_cli::progress::{ProgressTracker, ScanStage};
use edgescan_cli::{args::Args, banner::Banner, output};
use edgescan_core::{ByteMeter, CancelToken, Config};
use edgescan_scanner::{ip_generator, latency_scanner, speed_scanner};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tracing::info;

#[tokio::main]
async fn main() {
    let args = Args::parse();
    init_logging(args.verbose);

    match run(args).await {
        Ok(exit_code) => std::process::exit(exit_code),
        Err(err) => {
            let formatter = create_error_formatter();
            eprint!("{}", formatter.format_error(err.as_ref()));
            let exit_code = err
                .downcast_ref::<CliError>()
                .map(CliError::exit_code)
                .unwrap_or(exit_codes::GENERAL_ERROR);
            std::process::exit(exit_code);
        }
    }
}

async fn run(args: Args) -> Result<i32> {
    let mut config = match &args.config {
        Some(path) => Config::load_from_file(path).map_err(CliError::from)?,
        None => Config::default(),
    };

    if !args.cidr_blocks.is_empty() {
        config.cidr_blocks = args.cidr_blocks.clone();
    }
    if let Some(top_k) = args.top_k {
        config.speed.top_k = top_k;
    }
    if let Some(sort) = args.sort {
        config.speed.sort_order = sort;
    }
    if let Some(output) = &args.output {
        config.output.path = output.clone();
    }
    config.validate().map_err(CliError::from)?;

    if config.cidr_blocks.is_empty() {
        return Err(CliError::no_cidr_blocks().into());
    }

    if !args.quiet {
        Banner::default().print();
    }

    let cancel = CancelToken::new();
    install_ctrlc_handler(cancel.clone());

    let meter = ByteMeter::new();

    info!(blocks = config.cidr_blocks.len(), "generating candidate IPs");
    let ips = ip_generator::generate(&config.cidr_blocks);
    if ips.is_empty() {
        return Err(CliError::no_cidr_blocks().into());
    }

    let latency_bar = (!args.quiet).then(|| ProgressTracker::new(ScanStage::Latency, ips.len()));
    let total_ips = ips.len();
    let survivors = latency_scanner::scan(
        ips,
        &config.probing,
        Arc::clone(&meter),
        cancel.clone(),
        move |p| {
            if let Some(bar) = &latency_bar {
                bar.update(p.completed, p.total, p.successes);
                if p.completed == total_ips {
                    bar.finish(p.successes);
                }
            }
        },
    )
    .await;

    let survivors = if cancel.is_cancelled() {
        info!("latency stage cancelled; discarding survivors as unreliable");
        Vec::new()
    } else {
        survivors
    };
    info!(survivors = survivors.len(), "latency stage complete");

    let speed_total = config.speed.top_k.min(survivors.len());
    let speed_bar = (!args.quiet).then(|| ProgressTracker::new(ScanStage::Speed, speed_total));
    let measured = speed_scanner::scan(
        &survivors,
        speed_scanner::SpeedMode::TopK,
        &config.speed,
        Arc::clone(&meter),
        cancel.clone(),
        move |p| {
            if let Some(bar) = &speed_bar {
                bar.update(p.completed, p.total, p.successes);
                if p.completed == speed_total {
                    bar.finish(p.successes);
                }
            }
        },
    )
    .await;

    info!(
        measured = measured.len(),
        bytes = meter.total(),
        "speed stage complete"
    );

    let formatter = output::TextFormatter::new(!args.quiet);
    println!("{}", formatter.format_results(&measured));

    output::write_clean_ips(&config.output.path, &measured).map_err(|e| {
        CliError::OutputWriteError {
            path: config.output.path.clone(),
            source: std::io::Error::new(std::io::ErrorKind::Other, e.to_string()),
        }
    })?;

    if measured.is_empty() {
        Ok(exit_codes::GENERAL_ERROR)
    } else {
        Ok(exit_codes::SUCCESS)
    }
}

/// Close `cancel` on the first Ctrl+C; a second press force-exits the process.
fn install_ctrlc_handler(cancel: CancelToken) {
    let force_exit = Arc::new(AtomicBool::new(false));
    tokio::spawn(async move {
        loop {
            if tokio::signal::ctrl_c().await.is_err() {
                return;
            }
            if force_exit.swap(true, Ordering::SeqCst) {
                std::process::exit(exit_codes::CANCELLED);
            }
            cancel.cancel();
        }
    });
}

fn init_logging(verbose: u8) {
    use tracing_subscriber::{fmt, EnvFilter};

    let level = match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .with_line_number(false)
        .compact()
        .init();
}
