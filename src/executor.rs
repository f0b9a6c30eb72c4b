use crate::execution::{ExecutionResult, Invocation};
use std::io::{self, Read};
use std::process::{Command, Stdio};
use std::thread;
use std::time::Instant;

/// Spawns an invocation and captures what it writes.
pub trait ProcessRunner {
    fn run(&self, invocation: &Invocation) -> io::Result<ExecutionResult>;
}

/// Runs the program directly through the OS, no shell in between.
pub struct SystemProcessRunner;

impl ProcessRunner for SystemProcessRunner {
    fn run(&self, invocation: &Invocation) -> io::Result<ExecutionResult> {
        let start_time = Instant::now();

        let mut child = Command::new(invocation.program())
            .args(invocation.args())
            .stdin(Stdio::inherit())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()?;

        let (stdout, stderr) = match (child.stdout.take(), child.stderr.take()) {
            (Some(stdout), Some(stderr)) => (stdout, stderr),
            _ => {
                // Reap the child before reporting.
                let _ = child.kill();
                let _ = child.wait();
                return Err(io::Error::new(io::ErrorKind::Other, "cannot capture child output"));
            }
        };

        // Drain both pipes at once so the child never stalls on a full buffer.
        let stdout_handle = thread::spawn(move || collect(stdout));
        let stderr_handle = thread::spawn(move || collect(stderr));

        let status = child.wait()?;

        let stdout_bytes = stdout_handle
            .join()
            .map_err(|_| io::Error::new(io::ErrorKind::Other, "stdout reader panicked"))??;
        let stderr_bytes = stderr_handle
            .join()
            .map_err(|_| io::Error::new(io::ErrorKind::Other, "stderr reader panicked"))??;

        tracing::debug!(
            command = %invocation,
            exit_code = ?status.code(),
            duration_ms = start_time.elapsed().as_millis() as u64,
            "child process finished"
        );

        Ok(ExecutionResult {
            exit_code: status.code().unwrap_or(-1),
            stdout: stdout_bytes,
            stderr: stderr_bytes,
        })
    }
}

fn collect(mut reader: impl Read) -> io::Result<Vec<u8>> {
    let mut buffer = [0u8; 4096];
    let mut collected = Vec::new();
    loop {
        let bytes_read = reader.read(&mut buffer)?;
        if bytes_read == 0 {
            break;
        }
        collected.extend_from_slice(&buffer[..bytes_read]);
    }
    Ok(collected)
}
