//! Subprocess execution and output capture.

use std::process::Stdio;
use std::time::Duration;

use tokio::io::{AsyncBufReadExt, AsyncRead, BufReader};
use tokio::process::Command;

use crate::convert::error::{ConvertError, Result};

/// Timeout for one bundletool run (10 minutes)
/// `build-apks` re-signs every split, which can be slow on large bundles
pub const TOOL_RUN_TIMEOUT: Duration = Duration::from_secs(600);

/// Immutable snapshot of one subprocess run.
#[derive(Debug, Clone)]
pub struct ProcessOutcome {
    /// Exit code of the process (-1 if terminated by a signal).
    pub exit_code: i32,
    /// Captured stdout text.
    pub stdout: String,
    /// Captured stderr text.
    pub stderr: String,
}

/// Runs the external tool and captures its output.
///
/// The argument vector is passed to the OS exactly as given - never through
/// a shell - so passwords containing shell metacharacters reach the tool
/// literally and cannot trigger injection or quoting bugs.
#[derive(Debug, Clone)]
pub struct ProcessInvoker {
    timeout: Duration,
}

impl Default for ProcessInvoker {
    fn default() -> Self {
        Self::new()
    }
}

impl ProcessInvoker {
    /// Creates an invoker with the default [`TOOL_RUN_TIMEOUT`].
    pub fn new() -> Self {
        Self {
            timeout: TOOL_RUN_TIMEOUT,
        }
    }

    /// Creates an invoker with a custom timeout.
    pub fn with_timeout(timeout: Duration) -> Self {
        Self { timeout }
    }

    /// Spawns `argv[0]` with the remaining elements as arguments and waits
    /// for it to exit.
    ///
    /// Both output streams are drained by two concurrent readers before the
    /// exit status is awaited; draining sequentially or waiting first risks
    /// deadlock once the child fills an OS pipe buffer. The outcome is
    /// assembled only after both readers finished and the process exited.
    pub async fn run(&self, argv: &[String]) -> Result<ProcessOutcome> {
        let (program, args) = argv.split_first().ok_or_else(|| {
            ConvertError::Unexpected("empty command line".to_string())
        })?;

        let mut child = Command::new(program)
            .args(args)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()
            .map_err(|e| ConvertError::Process(format!("failed to run {}: {}", program, e)))?;

        let stdout_pipe = child.stdout.take();
        let stderr_pipe = child.stderr.take();

        // Drain both streams concurrently, then wait for exit. The timeout
        // bounds all three: a hung child holding its pipes open would
        // otherwise stall the readers forever.
        let run = async {
            let (stdout, stderr) = tokio::join!(drain(stdout_pipe), drain(stderr_pipe));
            let status = child.wait().await?;
            Ok::<_, std::io::Error>((status, stdout, stderr))
        };

        let timed = tokio::time::timeout(self.timeout, run).await;
        let (status, stdout, stderr) = match timed {
            Ok(Ok(result)) => result,
            Ok(Err(e)) => {
                return Err(ConvertError::Process(format!(
                    "failed to wait for {}: {}",
                    program, e
                )));
            }
            Err(_elapsed) => {
                if let Err(e) = child.kill().await {
                    log::warn!("Failed to kill {} after timeout: {}", program, e);
                }
                let _ = tokio::time::timeout(Duration::from_secs(10), child.wait()).await;

                return Err(ConvertError::Process(format!(
                    "{} timed out after {:?}",
                    program, self.timeout
                )));
            }
        };

        Ok(ProcessOutcome {
            exit_code: status.code().unwrap_or(-1),
            stdout,
            stderr,
        })
    }
}

/// Reads a child output stream to the end, line by line.
async fn drain<R: AsyncRead + Unpin>(stream: Option<R>) -> String {
    let mut captured = String::new();
    if let Some(stream) = stream {
        let mut lines = BufReader::new(stream).lines();
        while let Ok(Some(line)) = lines.next_line().await {
            captured.push_str(&line);
            captured.push('\n');
        }
    }
    captured
}
