//! Shell-based command execution on the host.

use crate::config::ExecOptions;
use hostkit_core::{EnvStore, ExecFailure, ExecResult, SharedEnv};
use std::process::{ExitStatus, Stdio};
use tokio::io::AsyncReadExt;
use tokio::process::{Child, Command};
use tracing::{debug, info, warn};

const READ_CHUNK: usize = 8192;

/// Runs commands through the platform command interpreter and captures
/// their output.
///
/// Arguments are joined with single spaces and are not escaped; callers quote
/// anything containing spaces or shell metacharacters. There is no timeout: a
/// hung child blocks the call.
#[derive(Debug, Clone)]
pub struct ShellExecutor {
    env: SharedEnv,
    options: ExecOptions,
}

#[derive(Clone, Copy)]
enum Stream {
    Stdout,
    Stderr,
}

/// Bytes read from a child before it exited or was killed.
#[derive(Default)]
struct Captured {
    stdout: Vec<u8>,
    stderr: Vec<u8>,
    overflowed: bool,
    read_error: Option<std::io::Error>,
}

impl ShellExecutor {
    pub fn new(env: SharedEnv, options: ExecOptions) -> Self {
        Self { env, options }
    }

    pub fn options(&self) -> &ExecOptions {
        &self.options
    }

    /// Run `command` with `args`. Never fails: spawn errors, non-zero exits,
    /// signals and buffer overflow are all reported in the returned value.
    pub async fn exec(&self, command: &str, args: &[String]) -> ExecResult {
        let command_line = join_command_line(command, args);
        info!(command = %command_line, "Executing command");

        let mut child = match self.spawn(&command_line) {
            Ok(child) => child,
            Err(e) => {
                warn!(command = %command_line, error = %e, "Failed to spawn process");
                return ExecResult::failure(
                    None,
                    ExecFailure::Spawn {
                        message: e.to_string(),
                    },
                    String::new(),
                    String::new(),
                );
            }
        };

        let captured = self.capture(&mut child).await;
        if captured.overflowed {
            warn!(
                limit = self.options.max_buffer_bytes,
                "Output exceeded buffer limit, killing process"
            );
            let _ = child.kill().await;
        }
        let status = child.wait().await;

        let result = self.finish(status, captured);
        debug!(code = ?result.code, error = ?result.error, "Command completed");
        result
    }

    fn spawn(&self, command_line: &str) -> std::io::Result<Child> {
        let mut cmd = interpreter(command_line);
        cmd.env_clear()
            .envs(self.env.vars())
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true);
        cmd.spawn()
    }

    async fn capture(&self, child: &mut Child) -> Captured {
        let mut captured = Captured::default();
        let (Some(mut stdout), Some(mut stderr)) = (child.stdout.take(), child.stderr.take())
        else {
            return captured;
        };

        let limit = self.options.max_buffer_bytes;
        let mut out_buf = [0u8; READ_CHUNK];
        let mut err_buf = [0u8; READ_CHUNK];
        let mut out_open = true;
        let mut err_open = true;

        while out_open || err_open {
            // Buffer that received the latest chunk, if any.
            let last = tokio::select! {
                read = stdout.read(&mut out_buf), if out_open => match read {
                    Ok(0) => {
                        out_open = false;
                        None
                    }
                    Ok(n) => {
                        captured.stdout.extend_from_slice(&out_buf[..n]);
                        Some(Stream::Stdout)
                    }
                    Err(e) => {
                        captured.read_error = captured.read_error.take().or(Some(e));
                        out_open = false;
                        None
                    }
                },
                read = stderr.read(&mut err_buf), if err_open => match read {
                    Ok(0) => {
                        err_open = false;
                        None
                    }
                    Ok(n) => {
                        captured.stderr.extend_from_slice(&err_buf[..n]);
                        Some(Stream::Stderr)
                    }
                    Err(e) => {
                        captured.read_error = captured.read_error.take().or(Some(e));
                        err_open = false;
                        None
                    }
                },
            };

            let total = captured.stdout.len() + captured.stderr.len();
            if total > limit {
                // The combined size was within the limit before this chunk.
                if let Some(stream) = last {
                    let buf = match stream {
                        Stream::Stdout => &mut captured.stdout,
                        Stream::Stderr => &mut captured.stderr,
                    };
                    buf.truncate(buf.len().saturating_sub(total - limit));
                }
                captured.overflowed = true;
                break;
            }
        }

        captured
    }

    fn finish(&self, status: std::io::Result<ExitStatus>, captured: Captured) -> ExecResult {
        let stdout = String::from_utf8_lossy(&captured.stdout).into_owned();
        let stderr = String::from_utf8_lossy(&captured.stderr).into_owned();

        let status = match status {
            Ok(status) => status,
            Err(e) => {
                return ExecResult::failure(
                    None,
                    ExecFailure::Io {
                        message: e.to_string(),
                    },
                    stdout,
                    stderr,
                );
            }
        };
        let code = status.code();

        if captured.overflowed {
            return ExecResult::failure(
                code,
                ExecFailure::MaxBufferExceeded {
                    limit: self.options.max_buffer_bytes,
                },
                stdout,
                stderr,
            );
        }
        if let Some(e) = captured.read_error {
            return ExecResult::failure(
                code,
                ExecFailure::Io {
                    message: e.to_string(),
                },
                stdout,
                stderr,
            );
        }

        match code {
            Some(0) => ExecResult::success(stdout, stderr),
            Some(code) => {
                ExecResult::failure(Some(code), ExecFailure::NonZeroExit { code }, stdout, stderr)
            }
            None => ExecResult::failure(None, ExecFailure::Signal, stdout, stderr),
        }
    }
}

/// Join a command and its arguments into one interpreter-ready line.
pub fn join_command_line(command: &str, args: &[String]) -> String {
    std::iter::once(command)
        .chain(args.iter().map(String::as_str))
        .collect::<Vec<_>>()
        .join(" ")
}

#[cfg(not(windows))]
fn interpreter(command_line: &str) -> Command {
    let mut cmd = Command::new("/bin/sh");
    cmd.arg("-c").arg(command_line);
    cmd
}

#[cfg(windows)]
fn interpreter(command_line: &str) -> Command {
    let mut cmd = Command::new("cmd.exe");
    cmd.args(["/d", "/s", "/c"]).raw_arg(format!("\"{command_line}\""));
    cmd
}
