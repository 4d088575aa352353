//! Subcommand implementations.
//!
//! Each command builds a serializable report, prints it through
//! [`crate::formatters`] and returns an [`ExitCode`](smrt_core::cli::ExitCode).

pub mod completions;
pub mod generate;
pub mod inspect;
pub mod scan;
