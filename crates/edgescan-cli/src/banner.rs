//! Startup banner for the CLI.

use colored::Colorize;

/// Single-line startup banner: name, version, and a short tagline.
pub struct Banner {
    version: String,
}

impl Banner {
    /// Create a new banner with version information.
    ///
    /// # Examples
    ///
    /// ```
    /// use edgescan_cli::banner::Banner;
    ///
    /// let banner = Banner::new(env!("CARGO_PKG_VERSION"));
    /// banner.print();
    /// ```
    pub fn new(version: &str) -> Self {
        Self {
            version: version.to_string(),
        }
    }

    /// Print the banner line.
    pub fn print(&self) {
        println!(
            "{} {} {} {}",
            "edgescan".bright_cyan().bold(),
            self.version.bright_green(),
            "─".bright_black(),
            "CDN edge IP latency and throughput scanner".bright_white()
        );
    }
}

impl Default for Banner {
    fn default() -> Self {
        Self::new(env!("CARGO_PKG_VERSION"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn banner_creation_stores_version() {
        let banner = Banner::new("0.1.0");
        assert_eq!(banner.version, "0.1.0");
    }

    #[test]
    fn default_banner_uses_crate_version() {
        let banner = Banner::default();
        assert!(!banner.version.is_empty());
    }
}
