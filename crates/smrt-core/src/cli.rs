//! Output formats and exit statuses of the `smrt` binary.
//!
//! # Examples
//!
//! ```
//! use smrt_core::cli::{ExitCode, OutputFormat};
//!
//! let format: OutputFormat = "json".parse().unwrap();
//! assert!(format.is_machine_readable());
//!
//! assert_eq!(ExitCode::PARTIAL_FAILURE.code(), 3);
//! assert!(!ExitCode::PARTIAL_FAILURE.is_success());
//! ```

use std::fmt;
use std::str::FromStr;

/// How a command prints its report.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum OutputFormat {
    /// Pretty-printed JSON
    Json,
    /// One `path = value` line per leaf
    Text,
    /// Colorized tree for terminals
    #[default]
    Pretty,
}

impl OutputFormat {
    /// Every format, in the order shown in help output.
    pub const ALL: [Self; 3] = [Self::Json, Self::Text, Self::Pretty];

    /// Name accepted by `--format`.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Json => "json",
            Self::Text => "text",
            Self::Pretty => "pretty",
        }
    }

    /// `false` only for [`OutputFormat::Pretty`], whose layout may change
    /// between releases.
    #[must_use]
    pub const fn is_machine_readable(&self) -> bool {
        !matches!(self, Self::Pretty)
    }
}

impl fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for OutputFormat {
    type Err = crate::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|format| format.as_str().eq_ignore_ascii_case(s))
            .ok_or_else(|| {
                crate::Error::InvalidArgument(format!(
                    "unknown output format '{s}' (use json, text or pretty)"
                ))
            })
    }
}

/// Process exit status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct ExitCode(u8);

impl ExitCode {
    /// Everything succeeded.
    pub const SUCCESS: Self = Self(0);

    /// Some files failed to scan; the output covers the others.
    pub const PARTIAL_FAILURE: Self = Self(3);

    /// Bad configuration, arguments or input files.
    pub const INVALID_INPUT: Self = Self(2);

    /// Any other failure.
    pub const ERROR: Self = Self(1);

    /// Numeric status passed to the operating system.
    #[must_use]
    pub const fn code(&self) -> u8 {
        self.0
    }

    /// Returns `true` for [`ExitCode::SUCCESS`].
    #[must_use]
    pub const fn is_success(&self) -> bool {
        self.0 == 0
    }

    /// Short description used in logs.
    #[must_use]
    pub const fn describe(&self) -> &'static str {
        match self.0 {
            0 => "success",
            2 => "invalid input",
            3 => "partial failure",
            _ => "error",
        }
    }
}

impl From<ExitCode> for std::process::ExitCode {
    fn from(code: ExitCode) -> Self {
        Self::from(code.0)
    }
}

impl fmt::Display for ExitCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.0, self.describe())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_output_format_parsing() {
        assert_eq!("JSON".parse::<OutputFormat>().unwrap(), OutputFormat::Json);
        assert_eq!("text".parse::<OutputFormat>().unwrap(), OutputFormat::Text);
        for format in OutputFormat::ALL {
            assert_eq!(format.to_string().parse::<OutputFormat>().unwrap(), format);
        }
        let err = "yaml".parse::<OutputFormat>().unwrap_err();
        assert!(err.to_string().contains("yaml"));
    }

    #[test]
    fn test_output_format_default_is_for_humans() {
        assert_eq!(OutputFormat::default(), OutputFormat::Pretty);
        assert!(!OutputFormat::Pretty.is_machine_readable());
        assert!(OutputFormat::Text.is_machine_readable());
    }

    #[test]
    fn test_exit_code_values() {
        assert_eq!(ExitCode::default(), ExitCode::SUCCESS);
        assert_eq!(ExitCode::ERROR.code(), 1);
        assert_eq!(ExitCode::INVALID_INPUT.code(), 2);
        assert_eq!(ExitCode::PARTIAL_FAILURE.code(), 3);
        assert!(!ExitCode::ERROR.is_success());
        assert_eq!(ExitCode::PARTIAL_FAILURE.to_string(), "3 (partial failure)");
    }
}
