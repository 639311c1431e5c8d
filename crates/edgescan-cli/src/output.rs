//! Result table rendering and the `clean_ips.txt` report writer.

use anyhow::{Context, Result};
use chrono::Utc;
use colored::*;
use edgescan_core::SpeedResult;
use std::io::Write;
use std::path::Path;

/// Colorized, human-readable table printed to stdout after the speed stage.
pub struct TextFormatter {
    colorize: bool,
}

impl TextFormatter {
    pub fn new(colorize: bool) -> Self {
        Self { colorize }
    }

    fn format_ip(&self, result: &SpeedResult) -> String {
        if self.colorize {
            result.ip.to_string().bright_blue().bold().to_string()
        } else {
            result.ip.to_string()
        }
    }

    fn format_throughput(&self, mbps: f64) -> String {
        let text = format!("{:.2} MB/s", mbps);
        if self.colorize {
            text.green().bold().to_string()
        } else {
            text
        }
    }

    fn format_header(&self, text: &str) -> String {
        if self.colorize {
            format!("\n{}\n", text.bright_white().bold())
        } else {
            format!("\n{}\n", text)
        }
    }

    /// Render `results` (already sorted) as a results table.
    pub fn format_results(&self, results: &[SpeedResult]) -> String {
        let mut output = String::new();
        output.push_str(&self.format_header("=== Edge IP Scan Results ==="));
        output.push_str(&format!("Total: {}\n\n", results.len()));

        if results.is_empty() {
            output.push_str("No clean IPs found.\n");
            return output;
        }

        for (rank, result) in results.iter().enumerate() {
            output.push_str(&format!(
                "{:4}. {:40} sent {:2} recv {:2} loss {:5.1}% {:7.2}ms {}\n",
                rank + 1,
                self.format_ip(result),
                result.sent,
                result.received,
                result.loss_rate() * 100.0,
                result.mean_rtt_ms,
                self.format_throughput(result.throughput_mbps),
            ));
        }

        output
    }
}

/// Write the final `clean_ips.txt` report to `path`.
///
/// Format:
/// ```text
/// # Edge IP Scan Results
/// # Generated: 2026-07-27 12:00:00
/// # Total: 3
/// # Format: rank. ip | Sent: n | Recv: n | Loss: x.xx | y.yyms | z.zz MB/s
/// # ------------------------------------------------------------------
/// 1. 198.51.100.7 | Sent: 4 | Recv: 4 | Loss: 0.00 | 12.34ms | 18.42 MB/s
/// # End of results
/// ```
pub fn write_clean_ips(path: &Path, results: &[SpeedResult]) -> Result<()> {
    let mut contents = String::new();
    contents.push_str("# Edge IP Scan Results\n");
    contents.push_str(&format!(
        "# Generated: {}\n",
        Utc::now().format("%Y-%m-%d %H:%M:%S")
    ));
    contents.push_str(&format!("# Total: {}\n", results.len()));
    contents.push_str(
        "# Format: rank. ip | Sent: n | Recv: n | Loss: x.xx | y.yyms | z.zz MB/s\n",
    );
    contents.push_str("# ------------------------------------------------------------------\n");

    for (rank, result) in results.iter().enumerate() {
        contents.push_str(&format!(
            "{}. {} | Sent: {} | Recv: {} | Loss: {:.2} | {:.2}ms | {:.2} MB/s\n",
            rank + 1,
            result.ip,
            result.sent,
            result.received,
            result.loss_rate(),
            result.mean_rtt_ms,
            result.throughput_mbps,
        ));
    }

    contents.push_str("# End of results\n");

    let mut file =
        std::fs::File::create(path).with_context(|| format!("creating {}", path.display()))?;
    file.write_all(contents.as_bytes())
        .with_context(|| format!("writing {}", path.display()))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::net::{IpAddr, Ipv4Addr};

    fn sample_result() -> SpeedResult {
        SpeedResult {
            ip: IpAddr::V4(Ipv4Addr::new(198, 51, 100, 7)),
            sent: 4,
            received: 4,
            mean_rtt_ms: 12.34,
            throughput_mbps: 18.42,
        }
    }

    #[test]
    fn format_results_empty_says_no_clean_ips() {
        let formatter = TextFormatter::new(false);
        let output = formatter.format_results(&[]);
        assert!(output.contains("No clean IPs found."));
    }

    #[test]
    fn format_results_lists_each_ip() {
        let formatter = TextFormatter::new(false);
        let output = formatter.format_results(&[sample_result()]);
        assert!(output.contains("198.51.100.7"));
        assert!(output.contains("18.42 MB/s"));
    }

    #[test]
    fn write_clean_ips_produces_expected_shape() {
        let dir = std::env::temp_dir().join(format!("edgescan-test-{}", std::process::id()));
        std::fs::create_dir_all(&dir).unwrap();
        let path = dir.join("clean_ips.txt");

        write_clean_ips(&path, &[sample_result()]).unwrap();
        let text = std::fs::read_to_string(&path).unwrap();

        assert!(text.starts_with("# Edge IP Scan Results\n"));
        assert!(text.contains("# Total: 1\n"));
        assert!(text.contains(
            "1. 198.51.100.7 | Sent: 4 | Recv: 4 | Loss: 0.00 | 12.34ms | 18.42 MB/s\n"
        ));
        assert!(text.trim_end().ends_with("# End of results"));

        std::fs::remove_file(&path).unwrap();
        std::fs::remove_dir(&dir).unwrap();
    }

    #[test]
    fn write_clean_ips_handles_empty_results() {
        let dir = std::env::temp_dir().join(format!("edgescan-test-empty-{}", std::process::id()));
        std::fs::create_dir_all(&dir).unwrap();
        let path = dir.join("clean_ips.txt");

        write_clean_ips(&path, &[]).unwrap();
        let text = std::fs::read_to_string(&path).unwrap();
        assert!(text.contains("# Total: 0\n"));
        assert!(text.trim_end().ends_with("# End of results"));

        std::fs::remove_file(&path).unwrap();
        std::fs::remove_dir(&dir).unwrap();
    }
}
