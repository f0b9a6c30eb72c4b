use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// Exit status used when the wrapped program cannot be found, as a shell would.
pub const EXIT_COMMAND_NOT_FOUND: i32 = 127;

/// Exit status for a failed command and every other error.
pub const EXIT_FAILURE: i32 = 1;

#[derive(Error, Debug)]
pub enum QdbgError {
    #[error("qdbg requires a command")]
    MissingCommand,

    #[error("command not found: {program}")]
    CommandNotFound {
        program: String,
        #[source]
        source: io::Error,
    },

    #[error("no web browser available to open {url}")]
    BrowserUnavailable { url: String },

    #[error("internal error: {0}")]
    Internal(#[source] io::Error),

    #[error("configuration error: {0}")]
    Config(String),

    #[error("install error: {0}")]
    Install(String),

    #[error("{context}: {}", .path.display())]
    Io {
        context: &'static str,
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

impl QdbgError {
    pub fn exit_code(&self) -> i32 {
        match self {
            QdbgError::CommandNotFound { .. } => EXIT_COMMAND_NOT_FOUND,
            _ => EXIT_FAILURE,
        }
    }

    pub(crate) fn io(context: &'static str, path: impl Into<PathBuf>, source: io::Error) -> Self {
        QdbgError::Io {
            context,
            path: path.into(),
            source,
        }
    }
}

pub type Result<T> = std::result::Result<T, QdbgError>;

#[cfg(test)]
mod tests {
    use super::*;
    use std::error::Error as _;

    #[test]
    fn exit_codes_follow_shell_convention() {
        let not_found = QdbgError::CommandNotFound {
            program: "nope".to_string(),
            source: io::Error::from(io::ErrorKind::NotFound),
        };
        assert_eq!(not_found.exit_code(), 127);
        assert_eq!(QdbgError::MissingCommand.exit_code(), 1);
        assert_eq!(
            QdbgError::BrowserUnavailable { url: "u".into() }.exit_code(),
            1
        );
    }

    #[test]
    fn internal_error_keeps_its_cause() {
        let err = QdbgError::Internal(io::Error::new(io::ErrorKind::Other, "pipe burst"));
        let cause = err.source().expect("internal error has a source");
        assert_eq!(cause.to_string(), "pipe burst");
    }
}
