//! User-friendly error message formatting with colors and recovery suggestions.

use colored::*;
use std::error::Error as StdError;
use std::fmt;
use std::io::IsTerminal;

/// Error formatter for user-facing error messages.
pub struct ErrorFormatter {
    colorize: bool,
}

impl ErrorFormatter {
    /// Create a new error formatter.
    ///
    /// `colorize` controls whether terminal colors are used (auto-detected from TTY).
    pub fn new(colorize: bool) -> Self {
        Self { colorize }
    }

    /// Format an error with its full cause chain and a recovery suggestion.
    pub fn format_error(&self, error: &dyn StdError) -> String {
        let mut output = String::new();

        let header = if self.colorize {
            format!("{}", "Error:".red().bold())
        } else {
            "Error:".to_string()
        };
        output.push_str(&format!("{} {}\n", header, error));

        let causes = self.format_error_chain(error);
        if !causes.is_empty() {
            output.push('\n');
            output.push_str(&causes);
        }

        if let Some(suggestion) = self.extract_suggestion(error) {
            output.push('\n');
            output.push_str(&self.format_suggestion(&suggestion));
        }

        output
    }

    fn format_error_chain(&self, error: &dyn StdError) -> String {
        let mut output = String::new();
        let mut current = error.source();
        let mut indent_level = 0;

        while let Some(cause) = current {
            if indent_level == 0 {
                output.push_str(&self.format_chain_header());
            }

            let indent = "  ".repeat(indent_level);
            let arrow = if self.colorize {
                "→".yellow().to_string()
            } else {
                "→".to_string()
            };

            output.push_str(&format!("{}{} {}\n", indent, arrow, cause));

            current = cause.source();
            indent_level += 1;
        }

        output
    }

    fn format_chain_header(&self) -> String {
        if self.colorize {
            format!("{}\n", "Caused by:".bright_black().bold())
        } else {
            "Caused by:\n".to_string()
        }
    }

    fn format_suggestion(&self, suggestion: &str) -> String {
        if self.colorize {
            format!("{} {}\n", "Suggestion:".cyan().bold(), suggestion.cyan())
        } else {
            format!("Suggestion: {}\n", suggestion)
        }
    }

    /// Extract a recovery suggestion by matching known error message patterns.
    fn extract_suggestion(&self, error: &dyn StdError) -> Option<String> {
        let error_str = error.to_string();

        if error_str.contains("too many open files") {
            return Some(
                "Lower max_ping_workers/max_speed_workers in the config, or raise the open file descriptor limit (ulimit -n)"
                    .to_string(),
            );
        }

        if error_str.contains("no CIDR blocks") {
            return Some(
                "Specify one or more CIDR blocks on the command line or via --config".to_string(),
            );
        }

        if error_str.contains("top_k must be between") {
            return Some("Pass --top-k with a value between 10 and 1000".to_string());
        }

        if error_str.contains("timed out") || error_str.contains("timeout") {
            return Some(
                "Increase probe_timeout_ms or speed_timeout_secs in the config".to_string(),
            );
        }

        if error_str.contains("failed to write results") {
            return Some(
                "Check that the output directory exists and is writable, or pass --output with a different path"
                    .to_string(),
            );
        }

        None
    }

    pub fn format_warning(&self, message: &str) -> String {
        if self.colorize {
            format!("{} {}\n", "Warning:".yellow().bold(), message.yellow())
        } else {
            format!("Warning: {}\n", message)
        }
    }

    pub fn format_info(&self, message: &str) -> String {
        if self.colorize {
            format!("{} {}\n", "Info:".cyan().bold(), message)
        } else {
            format!("Info: {}\n", message)
        }
    }

    pub fn format_success(&self, message: &str) -> String {
        if self.colorize {
            format!("{} {}\n", "Success:".green().bold(), message.green())
        } else {
            format!("Success: {}\n", message)
        }
    }
}

/// Create an error formatter with auto-detected color support.
pub fn create_error_formatter() -> ErrorFormatter {
    ErrorFormatter::new(std::io::stdout().is_terminal())
}

impl fmt::Display for ErrorFormatter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ErrorFormatter {{ colorize: {} }}", self.colorize)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io;

    fn create_test_error_chain() -> io::Error {
        io::Error::new(
            io::ErrorKind::Other,
            io::Error::new(io::ErrorKind::PermissionDenied, "Permission denied"),
        )
    }

    #[test]
    fn format_error_no_color() {
        let formatter = ErrorFormatter::new(false);
        let err = io::Error::new(io::ErrorKind::NotFound, "File not found");
        let output = formatter.format_error(&err);

        assert!(output.contains("Error:"));
        assert!(output.contains("File not found"));
        assert!(!output.contains("\x1b["));
    }

    #[test]
    fn format_error_with_color() {
        let formatter = ErrorFormatter::new(true);
        let err = io::Error::new(io::ErrorKind::NotFound, "File not found");
        let output = formatter.format_error(&err);

        assert!(output.contains("Error:"));
        assert!(output.contains("File not found"));
    }

    #[test]
    fn format_error_chain() {
        let formatter = ErrorFormatter::new(false);
        let err = create_test_error_chain();
        let output = formatter.format_error(&err);

        assert!(output.contains("Error:"));
        if output.contains("Caused by:") {
            assert!(output.contains("→"));
        }
    }

    #[test]
    fn extract_suggestion_too_many_files() {
        let formatter = ErrorFormatter::new(false);
        let err = io::Error::new(io::ErrorKind::Other, "too many open files");
        let output = formatter.format_error(&err);

        assert!(output.contains("Suggestion:"));
        assert!(output.contains("max_ping_workers"));
    }

    #[test]
    fn extract_suggestion_top_k_out_of_range() {
        let formatter = ErrorFormatter::new(false);
        let err = io::Error::new(io::ErrorKind::Other, "top_k must be between 10 and 1000, got 3");
        let output = formatter.format_error(&err);

        assert!(output.contains("Suggestion:"));
        assert!(output.contains("--top-k"));
    }

    #[test]
    fn extract_suggestion_timeout() {
        let formatter = ErrorFormatter::new(false);
        let err = io::Error::new(io::ErrorKind::TimedOut, "timeout occurred");
        let output = formatter.format_error(&err);

        assert!(output.contains("Suggestion:"));
        assert!(output.contains("timeout"));
    }

    #[test]
    fn format_warning() {
        let formatter = ErrorFormatter::new(false);
        let output = formatter.format_warning("This is a test warning");

        assert!(output.contains("Warning:"));
        assert!(output.contains("This is a test warning"));
    }

    #[test]
    fn format_info() {
        let formatter = ErrorFormatter::new(false);
        let output = formatter.format_info("This is a test info message");

        assert!(output.contains("Info:"));
        assert!(output.contains("This is a test info message"));
    }

    #[test]
    fn format_success() {
        let formatter = ErrorFormatter::new(false);
        let output = formatter.format_success("Operation completed successfully");

        assert!(output.contains("Success:"));
        assert!(output.contains("Operation completed successfully"));
    }

    #[test]
    fn no_suggestion_for_generic_error() {
        let formatter = ErrorFormatter::new(false);
        let err = io::Error::new(io::ErrorKind::Other, "Some generic error");
        let output = formatter.format_error(&err);

        assert!(!output.contains("Suggestion:"));
    }

    #[test]
    fn create_error_formatter_auto_detect() {
        let formatter = create_error_formatter();
        assert!(formatter.colorize == std::io::stdout().is_terminal());
    }
}
