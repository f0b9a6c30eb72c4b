//! qdbg runs a command and, when it fails, opens a web search for the last
//! line of its error output.

pub mod browser;
pub mod config;
pub mod error;
pub mod execution;
pub mod executor;
pub mod home;
pub mod i18n;
pub mod install;
pub mod logging;
pub mod release;
pub mod runner;
pub mod search;

pub use error::{QdbgError, Result};
pub use execution::{ExecutionResult, Invocation};
pub use runner::{Outcome, Runner};
pub use search::{build_search_url, extract_last_diagnostic_line, ScanDirection};
