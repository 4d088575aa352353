//! smrt CLI library.
//!
//! Commands, configuration and output helpers behind the `smrt` binary,
//! exposed as a library so they can be tested without spawning a process.

#![allow(clippy::unused_async)]
#![allow(clippy::missing_errors_doc)]

pub mod commands;
pub mod config;
pub mod formatters;
pub mod writer;

pub use commands::generate::GenerateArgs;
pub use commands::scan::ScanArgs;
pub use config::Config;
