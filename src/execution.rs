use crate::error::{QdbgError, Result};

/// A program and its arguments. Never empty.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Invocation {
    args: Vec<String>,
}

impl Invocation {
    pub fn new(args: Vec<String>) -> Result<Self> {
        if args.is_empty() {
            return Err(QdbgError::MissingCommand);
        }
        Ok(Self { args })
    }

    pub fn program(&self) -> &str {
        &self.args[0]
    }

    pub fn args(&self) -> &[String] {
        &self.args[1..]
    }
}

impl std::fmt::Display for Invocation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.args.join(" "))
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExecutionResult {
    pub exit_code: i32,   // -1 when terminated by a signal
    pub stdout: Vec<u8>,  // Captured standard output
    pub stderr: Vec<u8>,  // Captured standard error
}

impl ExecutionResult {
    pub fn success(&self) -> bool {
        self.exit_code == 0
    }

    pub fn stdout_text(&self) -> String {
        String::from_utf8_lossy(&self.stdout).into_owned()
    }

    pub fn stderr_text(&self) -> String {
        String::from_utf8_lossy(&self.stderr).into_owned()
    }
}
