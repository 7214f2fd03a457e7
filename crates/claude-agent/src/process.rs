use std::path::{Path, PathBuf};
use std::process::{ExitStatus, Stdio};
use std::sync::{Arc, Mutex};

use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::process::{Child, ChildStdout, Command};

use crate::types::{OutputMode, QueryOptions};
use crate::{ClaudeAgentError, Result};

/// Executable looked up on `PATH` when no explicit path is configured.
pub const DEFAULT_EXECUTABLE: &str = "claude";

// ─── Executable resolution ────────────────────────────────────────────────

/// Resolve the executable to launch.
///
/// An explicit path that exists is used as is; anything else is looked up on
/// the command search path (which also handles `claude.cmd` on Windows).
pub(crate) fn resolve_executable(opts: &QueryOptions) -> Result<PathBuf> {
    let name = opts
        .path_to_executable
        .as_deref()
        .unwrap_or(Path::new(DEFAULT_EXECUTABLE));

    if name.components().count() > 1 && name.is_file() {
        return Ok(name.to_path_buf());
    }
    which::which(name)
        .map_err(|_| ClaudeAgentError::ExecutableNotFound(name.display().to_string()))
}

// ─── Command builder ──────────────────────────────────────────────────────

/// How the child is wired to our stdio.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Wiring {
    /// Child owns the terminal.
    Inherit,
    /// stdout/stderr piped for stream-json rendering.
    Stream,
}

impl Wiring {
    pub(crate) fn for_output(output: OutputMode) -> Self {
        match output {
            OutputMode::Stream => Wiring::Stream,
            OutputMode::Terminal => Wiring::Inherit,
        }
    }
}

pub(crate) fn build_command(exe: &Path, prompt: &str, wiring: Wiring, opts: &QueryOptions) -> Command {
    let mut cmd = Command::new(exe);

    // Allow launching from inside a running Claude session
    cmd.env_remove("CLAUDECODE");

    if let Some(model) = &opts.model {
        cmd.arg("--model").arg(model);
    }

    if wiring == Wiring::Stream {
        cmd.arg("--print")
            .arg("--verbose")
            .arg("--output-format")
            .arg("stream-json")
            .arg("--include-partial-messages");
    }

    if let Some(cwd) = &opts.cwd {
        cmd.current_dir(cwd);
    }

    // Prompt is always the final positional argument
    cmd.arg(prompt);
    cmd
}

// ─── ClaudeProcess ────────────────────────────────────────────────────────

/// A spawned assistant process.
///
/// In [`Wiring::Stream`] stdout is left for the caller to take and stderr is
/// drained into a buffer by a background task, surfaced after exit.
pub(crate) struct ClaudeProcess {
    child: Child,
    stderr_buf: Arc<Mutex<String>>,
}

impl ClaudeProcess {
    pub(crate) fn spawn(mut cmd: Command, wiring: Wiring) -> Result<Self> {
        match wiring {
            Wiring::Inherit => {
                cmd.stdin(Stdio::inherit())
                    .stdout(Stdio::inherit())
                    .stderr(Stdio::inherit());
            }
            Wiring::Stream => {
                cmd.stdin(Stdio::null())
                    .stdout(Stdio::piped())
                    .stderr(Stdio::piped());
            }
        }
        cmd.kill_on_drop(true);

        let mut child = cmd.spawn().map_err(ClaudeAgentError::Io)?;
        tracing::info!(pid = ?child.id(), ?wiring, "claude subprocess spawned");

        let stderr_buf = Arc::new(Mutex::new(String::new()));
        if let Some(stderr) = child.stderr.take() {
            let buf = Arc::clone(&stderr_buf);
            tokio::spawn(async move {
                let mut reader = BufReader::new(stderr).lines();
                while let Ok(Some(line)) = reader.next_line().await {
                    if let Ok(mut b) = buf.lock() {
                        if !b.is_empty() {
                            b.push('\n');
                        }
                        b.push_str(&line);
                    }
                }
            });
        }

        Ok(Self { child, stderr_buf })
    }

    pub(crate) fn take_stdout(&mut self) -> Option<ChildStdout> {
        self.child.stdout.take()
    }

    /// Wait for exit. Cancel-safe, so it can sit in a `select!` loop.
    pub(crate) async fn wait(&mut self) -> Result<ExitStatus> {
        self.child.wait().await.map_err(ClaudeAgentError::Io)
    }

    /// Ask the process to stop: SIGTERM on unix so the assistant can shut
    /// down cleanly, a hard kill elsewhere.
    pub(crate) fn terminate(&mut self) -> Result<()> {
        #[cfg(unix)]
        {
            use nix::sys::signal::{kill, Signal};
            use nix::unistd::Pid;

            let Some(pid) = self.child.id() else {
                return Ok(()); // already reaped
            };
            let pid = i32::try_from(pid)
                .map_err(|_| ClaudeAgentError::Process(format!("pid {pid} out of range")))?;
            kill(Pid::from_raw(pid), Signal::SIGTERM)
                .map_err(|e| ClaudeAgentError::Process(format!("SIGTERM failed: {e}")))
        }
        #[cfg(not(unix))]
        {
            self.child.start_kill().map_err(ClaudeAgentError::Io)
        }
    }

    /// Kill and reap the subprocess (best-effort; errors are silently ignored).
    pub(crate) async fn kill(&mut self) {
        let _ = self.child.kill().await;
    }

    /// Everything the child wrote to stderr so far.
    pub(crate) fn stderr(&self) -> String {
        self.stderr_buf
            .lock()
            .ok()
            .map(|b| b.clone())
            .unwrap_or_default()
    }
}

/// Exit code to report for `status`. A process killed by a signal has no
/// code and counts as a failure.
pub(crate) fn exit_code(status: ExitStatus) -> i32 {
    status.code().unwrap_or(1)
}
