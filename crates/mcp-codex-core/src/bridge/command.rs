//! Running the Codex executable with bounded output capture

use std::process::{ExitStatus, Stdio};

use async_trait::async_trait;
use tokio::io::{AsyncRead, AsyncReadExt};
use tokio::process::Command;

use super::error::{BridgeError, BridgeResult};
use crate::config::{BridgeConfig, QUIET_FLAG};
use crate::resolver::Credential;

const READ_CHUNK: usize = 8 * 1024;

/// Arguments and extra environment for one Codex run
#[derive(Debug, Clone, Default)]
pub struct CommandRequest {
    /// Caller arguments, appended after the quiet flag
    pub args: Vec<String>,
    /// Variables set on the child in addition to the inherited environment
    pub env: Vec<(String, Credential)>,
}

impl CommandRequest {
    pub fn new(args: Vec<String>) -> Self {
        Self {
            args,
            env: Vec::new(),
        }
    }

    pub fn with_env(mut self, key: impl Into<String>, value: Credential) -> Self {
        self.env.push((key.into(), value));
        self
    }
}

/// Something that can run Codex to completion and hand back stdout
#[async_trait]
pub trait CommandRunner: Send + Sync {
    async fn run(&self, request: &CommandRequest) -> BridgeResult<String>;
}

/// Everything observed about a finished child
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CapturedOutput {
    pub exit_code: Option<i32>,
    pub signal: Option<i32>,
    pub stdout: Vec<u8>,
    pub stderr: Vec<u8>,
}

impl CapturedOutput {
    pub fn from_status(status: ExitStatus, stdout: Vec<u8>, stderr: Vec<u8>) -> Self {
        #[cfg(unix)]
        let signal = {
            use std::os::unix::process::ExitStatusExt;
            status.signal()
        };
        #[cfg(not(unix))]
        let signal = None;

        Self {
            exit_code: status.code(),
            signal,
            stdout,
            stderr,
        }
    }

    /// Exit code 0 yields stdout; anything else is `NonZeroExit`
    ///
    /// The failure detail is stderr, or stdout when stderr is empty.
    pub fn classify(self) -> BridgeResult<String> {
        if self.exit_code == Some(0) {
            return Ok(String::from_utf8_lossy(&self.stdout).into_owned());
        }

        let detail = if self.stderr.is_empty() {
            &self.stdout
        } else {
            &self.stderr
        };
        Err(BridgeError::NonZeroExit {
            code: self.exit_code,
            signal: self.signal,
            detail: String::from_utf8_lossy(detail).trim_end().to_string(),
        })
    }
}

/// The real Codex executable
///
/// The child sees `[launcher_args...] -q [request.args...]`, spawned
/// directly (no shell), with stdin closed. Each output stream may grow to
/// `max_output_bytes`; past that the child is killed and the run fails
/// with `OutputTooLarge`.
#[derive(Debug, Clone)]
pub struct CodexCommand {
    program: String,
    launcher_args: Vec<String>,
    max_output_bytes: usize,
}

impl CodexCommand {
    pub fn new(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
            launcher_args: Vec::new(),
            max_output_bytes: crate::config::DEFAULT_MAX_OUTPUT_BYTES,
        }
    }

    pub fn from_config(config: &BridgeConfig) -> Self {
        Self {
            program: config.program.clone(),
            launcher_args: config.launcher_args.clone(),
            max_output_bytes: config.max_output_bytes,
        }
    }

    pub fn with_launcher_args(mut self, args: Vec<String>) -> Self {
        self.launcher_args = args;
        self
    }

    pub fn with_max_output_bytes(mut self, limit: usize) -> Self {
        self.max_output_bytes = limit;
        self
    }

    pub fn program(&self) -> &str {
        &self.program
    }

    /// Full argument vector passed to the program
    pub fn argv(&self, args: &[String]) -> Vec<String> {
        let mut argv = Vec::with_capacity(self.launcher_args.len() + 1 + args.len());
        argv.extend(self.launcher_args.iter().cloned());
        argv.push(QUIET_FLAG.to_string());
        argv.extend(args.iter().cloned());
        argv
    }
}

#[async_trait]
impl CommandRunner for CodexCommand {
    async fn run(&self, request: &CommandRequest) -> BridgeResult<String> {
        let argv = self.argv(&request.args);
        crate::debug_log!("spawning {} with {} args", self.program, argv.len());

        let mut command = Command::new(&self.program);
        command
            .args(&argv)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true);
        for (key, value) in &request.env {
            command.env(key, value.expose());
        }

        let mut child = command.spawn().map_err(|source| BridgeError::LaunchFailure {
            program: self.program.clone(),
            source,
        })?;

        let stdout = child.stdout.take().ok_or_else(|| missing_pipe("stdout"))?;
        let stderr = child.stderr.take().ok_or_else(|| missing_pipe("stderr"))?;

        let captured = futures::try_join!(
            read_bounded(stdout, self.max_output_bytes, "stdout"),
            read_bounded(stderr, self.max_output_bytes, "stderr"),
        );

        let (stdout, stderr) = match captured {
            Ok(streams) => streams,
            Err(e) => {
                crate::warn_log!("{}; killing {}", e, self.program);
                // Reap so the process table entry is released too
                if let Err(kill_err) = child.kill().await {
                    crate::warn_log!("could not kill {}: {}", self.program, kill_err);
                }
                return Err(e);
            }
        };

        let status = child.wait().await.map_err(BridgeError::Capture)?;
        crate::debug_log!(
            "{} finished: {:?}, stdout={}B stderr={}B",
            self.program,
            status,
            stdout.len(),
            stderr.len()
        );

        CapturedOutput::from_status(status, stdout, stderr).classify()
    }
}

fn missing_pipe(stream: &str) -> BridgeError {
    BridgeError::Capture(std::io::Error::new(
        std::io::ErrorKind::Other,
        format!("{} was not captured", stream),
    ))
}

/// Read a stream to EOF, failing once it would exceed `limit` bytes
async fn read_bounded<R>(mut reader: R, limit: usize, stream: &'static str) -> BridgeResult<Vec<u8>>
where
    R: AsyncRead + Unpin,
{
    let mut buffer = Vec::new();
    let mut chunk = vec![0u8; READ_CHUNK];
    loop {
        let n = reader.read(&mut chunk).await.map_err(BridgeError::Capture)?;
        if n == 0 {
            return Ok(buffer);
        }
        if buffer.len() + n > limit {
            return Err(BridgeError::OutputTooLarge { stream, limit });
        }
        buffer.extend_from_slice(&chunk[..n]);
    }
}
