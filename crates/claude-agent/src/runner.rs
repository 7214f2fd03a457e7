use std::sync::Arc;
use std::time::Duration;

use tokio::process::Command;
use tokio_util::sync::CancellationToken;

use crate::process::{self, ClaudeProcess, Wiring};
use crate::watcher::{self, ProgressSource, WatchTiming};
use crate::{stream, ClaudeAgentError, QueryOptions, Result};

/// How long to wait for the stdout renderer to drain after the child exits.
const PUMP_DRAIN: Duration = Duration::from_secs(2);

/// Time an interactive child gets to act on the terminal's Ctrl+C before it
/// is killed.
const INTERRUPT_GRACE: Duration = Duration::from_secs(2);

// ─── RunConfig ────────────────────────────────────────────────────────────

/// How the child is supervised.
#[derive(Clone)]
pub enum RunMode {
    /// The child owns the terminal and runs until the operator ends it.
    Interactive,
    /// The child is stopped once `progress` reports more completed tasks than
    /// it did before spawn.
    Watched {
        progress: Arc<dyn ProgressSource>,
        timing: WatchTiming,
    },
}

impl std::fmt::Debug for RunMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RunMode::Interactive => f.write_str("Interactive"),
            RunMode::Watched { timing, .. } => {
                f.debug_struct("Watched").field("timing", timing).finish()
            }
        }
    }
}

/// Configuration for a single Claude subprocess.
#[derive(Debug, Clone)]
pub struct RunConfig {
    /// Passed as the final positional argument.
    pub prompt: String,
    pub mode: RunMode,
    pub opts: QueryOptions,
}

// ─── RunResult ────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RunResult {
    /// The child's exit code; `0` when the watcher stopped it.
    pub exit_code: i32,
    /// `true` when the child was terminated after finishing a task.
    pub stopped_by_watcher: bool,
}

// ─── Public API ───────────────────────────────────────────────────────────

/// Launch `claude` and supervise it until it exits.
///
/// Fails with [`ClaudeAgentError::ExecutableNotFound`] before spawning
/// anything when the executable cannot be resolved. A fired `interrupt`
/// stops the child and returns [`ClaudeAgentError::Interrupted`]; in watched
/// mode the watcher is stopped first and the child killed at once, while an
/// interactive child is given a moment to exit on the Ctrl+C it shares with
/// us before it is killed.
///
/// ```rust,ignore
/// use claude_agent::runner::{run, RunConfig, RunMode};
///
/// let result = run(
///     RunConfig {
///         prompt: "Read CLAUDE.md".into(),
///         mode: RunMode::Interactive,
///         opts: Default::default(),
///     },
///     CancellationToken::new(),
/// )
/// .await?;
/// ```
pub async fn run(config: RunConfig, interrupt: CancellationToken) -> Result<RunResult> {
    let exe = process::resolve_executable(&config.opts)?;

    match config.mode {
        RunMode::Interactive => {
            let cmd = process::build_command(&exe, &config.prompt, Wiring::Inherit, &config.opts);
            run_interactive(cmd, interrupt, INTERRUPT_GRACE).await
        }
        RunMode::Watched { progress, timing } => {
            let wiring = Wiring::for_output(config.opts.output);
            let cmd = process::build_command(&exe, &config.prompt, wiring, &config.opts);
            supervise(cmd, wiring, progress, timing, interrupt).await
        }
    }
}

// ─── Internal ─────────────────────────────────────────────────────────────

async fn run_interactive(
    cmd: Command,
    interrupt: CancellationToken,
    grace: Duration,
) -> Result<RunResult> {
    let mut process = ClaudeProcess::spawn(cmd, Wiring::Inherit)?;

    let status = tokio::select! {
        biased;
        status = process.wait() => status?,
        _ = interrupt.cancelled() => {
            tracing::info!("interrupted, waiting for claude to exit");
            if tokio::time::timeout(grace, process.wait()).await.is_err() {
                tracing::info!("claude still running, killing it");
                process.kill().await;
            }
            return Err(ClaudeAgentError::Interrupted);
        }
    };

    Ok(RunResult {
        exit_code: process::exit_code(status),
        stopped_by_watcher: false,
    })
}

enum Step {
    Exited(std::process::ExitStatus),
    Terminate,
    WatcherIdle,
    Interrupted,
}

/// Spawn `cmd` with one watcher task beside it.
///
/// The baseline is read before spawn so a task the child completes in its
/// first poll interval is still noticed. At most one termination is issued.
pub(crate) async fn supervise(
    cmd: Command,
    wiring: Wiring,
    progress: Arc<dyn ProgressSource>,
    timing: WatchTiming,
    interrupt: CancellationToken,
) -> Result<RunResult> {
    let baseline = progress.completed();
    let mut process = ClaudeProcess::spawn(cmd, wiring)?;
    let pump = process.take_stdout().map(|s| tokio::spawn(stream::pump(s)));

    let stop = CancellationToken::new();
    let mut watcher = tokio::spawn(watcher::watch(progress, baseline, timing, stop.clone()));
    let mut watcher_live = true;
    tracing::debug!(baseline, "watcher started");

    let result = loop {
        // A child that exits on its own keeps its exit code even when the
        // watcher fires in the same poll.
        let step = tokio::select! {
            biased;
            status = process.wait() => Step::Exited(status?),
            fired = &mut watcher, if watcher_live => {
                watcher_live = false;
                match fired {
                    Ok(true) => Step::Terminate,
                    _ => Step::WatcherIdle,
                }
            }
            _ = interrupt.cancelled() => Step::Interrupted,
        };

        match step {
            Step::Exited(status) => {
                stop.cancel();
                if watcher_live {
                    let _ = watcher.await;
                }
                break RunResult {
                    exit_code: process::exit_code(status),
                    stopped_by_watcher: false,
                };
            }
            Step::Terminate => {
                tracing::info!("task completed, terminating claude");
                process.terminate()?;
                tokio::select! {
                    biased;
                    status = process.wait() => {
                        let status = status?;
                        tracing::debug!(?status, "claude exited after termination");
                    }
                    _ = interrupt.cancelled() => {
                        tracing::info!("interrupted, killing claude");
                        process.kill().await;
                        drain(pump).await;
                        return Err(ClaudeAgentError::Interrupted);
                    }
                    _ = tokio::time::sleep(timing.kill_after) => {
                        tracing::warn!("claude ignored termination, killing it");
                        process.kill().await;
                    }
                }
                break RunResult {
                    exit_code: 0,
                    stopped_by_watcher: true,
                };
            }
            Step::WatcherIdle => continue,
            Step::Interrupted => {
                stop.cancel();
                if watcher_live {
                    let _ = watcher.await;
                }
                tracing::info!("interrupted, killing claude");
                process.kill().await;
                drain(pump).await;
                return Err(ClaudeAgentError::Interrupted);
            }
        }
    };

    drain(pump).await;

    let stderr = process.stderr();
    if !stderr.is_empty() {
        eprintln!("{stderr}");
    }
    Ok(result)
}

async fn drain(pump: Option<tokio::task::JoinHandle<()>>) {
    if let Some(handle) = pump {
        if tokio::time::timeout(PUMP_DRAIN, handle).await.is_err() {
            tracing::debug!("stdout still open after exit, not waiting for it");
        }
    }
}

// ─── Tests ────────────────────────────────────────────────────────────────
