//! HTTPS throughput measurement for a single candidate IP.
//!
//! The estimator dials the candidate IP directly (bypassing DNS) while
//! keeping the URL's original host as the TLS SNI, then reads the
//! response body under a wall-clock deadline, feeding a [`SliceEwma`]
//! with bytes-read-per-slice samples so a slow start or a single bursty
//! slice doesn't dominate the final figure.

use crate::ewma::SliceEwma;
use edgescan_core::{ByteMeter, CancelToken, SpeedConfig};
use reqwest::StatusCode;
use std::net::{IpAddr, SocketAddr};
use std::time::{Duration, Instant};
use tracing::{debug, trace};

/// Reference constant the raw EWMA average is normalized against before
/// the MB/s conversion. Kept as its own named constant (rather than
/// folded into the MB divisor) so its provenance -- an calibration figure
/// carried over unchanged -- stays legible rather than silently merged
/// into "a constant that makes the numbers look right".
const ESTIMATOR_REFERENCE_SECONDS: f64 = 120.0;
const BYTES_PER_MEGABYTE: f64 = 1024.0 * 1024.0;
const ACCEPTABLE_STATUSES: [u16; 4] = [200, 204, 301, 302];
const CHUNK_READ_TIMEOUT: Duration = Duration::from_millis(500);

/// Measure throughput to `ip` by requesting each of `config.probe_urls`
/// in order until one yields an acceptable response. Returns `0.0` if no
/// URL responds usefully, the body is too small, or the run is
/// cancelled before any useful data arrives.
pub async fn measure(
    ip: IpAddr,
    config: &SpeedConfig,
    meter: &ByteMeter,
    cancel: &CancelToken,
) -> f64 {
    for url in &config.probe_urls {
        if cancel.is_cancelled() {
            return 0.0;
        }
        match measure_one_url(ip, url, config, meter, cancel).await {
            Some(throughput) => return throughput,
            None => continue,
        }
    }
    0.0
}

async fn measure_one_url(
    ip: IpAddr,
    url: &str,
    config: &SpeedConfig,
    meter: &ByteMeter,
    cancel: &CancelToken,
) -> Option<f64> {
    let parsed = reqwest::Url::parse(url).ok()?;
    let host = parsed.host_str()?.to_string();
    let port = parsed.port_or_known_default().unwrap_or(443);

    let client = reqwest::Client::builder()
        .danger_accept_invalid_certs(true)
        .redirect(reqwest::redirect::Policy::none())
        .pool_max_idle_per_host(0)
        .resolve(&host, SocketAddr::new(ip, port))
        .build()
        .ok()?;

    let wall_deadline = Duration::from_secs(config.speed_timeout_secs);
    let response = match tokio::time::timeout(
        wall_deadline,
        client
            .get(url)
            .header("User-Agent", "Mozilla/5.0 (compatible; edge-ip-scanner/1.0)")
            .header("Accept", "*/*")
            .header("Connection", "close")
            .send(),
    )
    .await
    {
        Ok(Ok(resp)) => resp,
        Ok(Err(e)) => {
            trace!(%ip, url, error = %e, "request failed");
            return None;
        }
        Err(_) => {
            trace!(%ip, url, "request timed out before headers");
            return None;
        }
    };

    if !ACCEPTABLE_STATUSES.contains(&response.status().as_u16()) {
        trace!(%ip, url, status = %response.status(), "unacceptable status");
        return None;
    }
    let status_is_redirect = matches!(
        response.status(),
        StatusCode::MOVED_PERMANENTLY | StatusCode::FOUND
    );

    let content_length = response.content_length();
    let throughput = read_body_with_deadline(response, wall_deadline, config, meter, cancel).await;

    if status_is_redirect && content_length.unwrap_or(0) == 0 {
        // A bare redirect with no body still counts as "this edge answered",
        // but there is nothing to measure -- fall through to the next URL.
        return None;
    }

    throughput
}

async fn read_body_with_deadline(
    mut response: reqwest::Response,
    wall_deadline: Duration,
    config: &SpeedConfig,
    meter: &ByteMeter,
    cancel: &CancelToken,
) -> Option<f64> {
    let slice_duration = wall_deadline / 100;
    let content_length = response.content_length();

    let start = Instant::now();
    let mut next_slice_at = start + slice_duration;
    let mut content_read: u64 = 0;
    let mut last_content_read: u64 = 0;
    let mut ewma = SliceEwma::default();

    loop {
        let now = Instant::now();
        if now >= next_slice_at {
            let delta = (content_read - last_content_read) as f64;
            ewma.push(delta);
            last_content_read = content_read;
            next_slice_at += slice_duration;
        }

        if cancel.is_cancelled() {
            meter.add(content_read);
            return Some(0.0);
        }

        if now >= start + wall_deadline {
            break;
        }

        let remaining = (start + wall_deadline).saturating_duration_since(now);
        let chunk_timeout = remaining.min(CHUNK_READ_TIMEOUT);

        match tokio::time::timeout(chunk_timeout, response.chunk()).await {
            Ok(Ok(Some(chunk))) => {
                content_read += chunk.len() as u64;
            }
            Ok(Ok(None)) => {
                // EOF. Unknown length bodies simply end here; known-length
                // bodies that close early get their final partial slice
                // scaled up so a short tail isn't underweighted.
                if let Some(total) = content_length {
                    let elapsed_in_slice = Instant::now()
                        .saturating_duration_since(next_slice_at - slice_duration)
                        .as_secs_f64();
                    let fraction = (elapsed_in_slice / slice_duration.as_secs_f64()).clamp(0.01, 1.0);
                    if total > 0 {
                        let delta = (content_read - last_content_read) as f64 / fraction;
                        ewma.push(delta);
                    }
                }
                break;
            }
            Ok(Err(e)) => {
                debug!(error = %e, "body read error");
                break;
            }
            Err(_) => {
                // per-chunk read timeout; loop back around to re-check the
                // wall deadline and slice boundary.
            }
        }
    }

    meter.add(content_read);

    if content_read < config.min_valid_bytes {
        return Some(0.0);
    }

    let raw = ewma.value() / (wall_deadline.as_secs_f64() / ESTIMATOR_REFERENCE_SECONDS);
    Some(raw / BYTES_PER_MEGABYTE)
}
