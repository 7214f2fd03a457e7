//! Generation loop: decides, one generation at a time, whether the assistant
//! should be launched again.
//!
//! ```text
//!            planning guide exists
//!  Planning ────────────────────────► (operator runs `ukko plan`)
//!     │ guide removed
//!     ▼
//!  Executing ──conflict file──► PausedConflict
//!     │ │
//!     │ └──all tasks checked──► Complete
//!     └──non-zero exit──► stop, report failure
//! ```
//!
//! Launching itself is behind the [`Launcher`] trait so the loop can be
//! driven by a mock in tests and by the `claude` supervisor in the CLI.

use crate::error::{Result, UkkoError};
use crate::ledger::Progress;
use crate::project::Project;
use async_trait::async_trait;
use std::time::Duration;
use tokio_util::sync::CancellationToken;

pub const PLANNING_PROMPT: &str = "You are the Planning Ukko. Read CLAUDE.md and begin planning.";
pub const EXECUTION_PROMPT: &str = "You are Ukko. Read CLAUDE.md and proceed with your phase.";

// ---------------------------------------------------------------------------
// Launcher
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LaunchMode {
    /// The assistant owns the terminal; used for planning.
    Interactive,
    /// The assistant is supervised and stopped after one task is checked off.
    Watched,
}

/// Runs one assistant process to completion and returns its exit code.
///
/// Implementations return [`UkkoError::ExecutableNotFound`] without spawning
/// anything when the assistant is not installed, and
/// [`UkkoError::Interrupted`] after cleaning up when `interrupt` fires.
#[async_trait]
pub trait Launcher: Send + Sync {
    async fn launch(
        &self,
        prompt: &str,
        mode: LaunchMode,
        interrupt: CancellationToken,
    ) -> Result<i32>;
}

// ---------------------------------------------------------------------------
// Outcomes
// ---------------------------------------------------------------------------

/// Result of one generation attempt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GenerationOutcome {
    Success,
    Failure(i32),
    /// Refused before launch; carries the sentinel's content.
    ConflictDetected(String),
}

impl GenerationOutcome {
    pub fn is_success(&self) -> bool {
        matches!(self, GenerationOutcome::Success)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoopState {
    Planning,
    Executing,
    PausedConflict,
    Complete,
}

/// Why a continuous run stopped.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoopStop {
    Complete,
    PausedConflict(String),
    Failed(i32),
    Interrupted,
}

/// Progress notifications for the caller to render.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoopEvent {
    /// Emitted before each generation of a continuous run.
    Progress(Progress),
    GenerationStarting,
    Outcome(GenerationOutcome),
}

// ---------------------------------------------------------------------------
// GenerationLoop
// ---------------------------------------------------------------------------

pub struct GenerationLoop<'a, L: Launcher + ?Sized> {
    project: &'a Project,
    launcher: &'a L,
    interrupt: CancellationToken,
    pause: Duration,
}

impl<'a, L: Launcher + ?Sized> GenerationLoop<'a, L> {
    /// Delay between generations of a continuous run.
    pub const DEFAULT_PAUSE: Duration = Duration::from_secs(2);

    pub fn new(project: &'a Project, launcher: &'a L, interrupt: CancellationToken) -> Self {
        Self {
            project,
            launcher,
            interrupt,
            pause: Self::DEFAULT_PAUSE,
        }
    }

    pub fn with_pause(mut self, pause: Duration) -> Self {
        self.pause = pause;
        self
    }

    /// Current state, derived from the filesystem.
    pub fn state(&self) -> LoopState {
        if self.project.is_planning_phase() {
            LoopState::Planning
        } else if self.project.conflict().is_present() {
            LoopState::PausedConflict
        } else if self.project.ledger().all_complete() {
            LoopState::Complete
        } else {
            LoopState::Executing
        }
    }

    /// Run the interactive planning session and return its exit code.
    ///
    /// Phase is not re-evaluated afterwards; the next invocation reads the
    /// filesystem again.
    pub async fn plan(&self) -> Result<i32> {
        tracing::info!("starting interactive planning session");
        self.launcher
            .launch(PLANNING_PROMPT, LaunchMode::Interactive, self.interrupt.clone())
            .await
    }

    /// Single-generation mode: refuse on conflict, otherwise run exactly one
    /// watched generation.
    pub async fn run_once<F: FnMut(&LoopEvent)>(&self, on_event: &mut F) -> Result<GenerationOutcome> {
        on_event(&LoopEvent::GenerationStarting);

        let outcome = if let Some(content) = self.project.conflict().read() {
            tracing::info!("conflict sentinel present, generation refused");
            GenerationOutcome::ConflictDetected(content)
        } else {
            let code = self
                .launcher
                .launch(EXECUTION_PROMPT, LaunchMode::Watched, self.interrupt.clone())
                .await?;
            if code == 0 {
                GenerationOutcome::Success
            } else {
                tracing::warn!(exit_code = code, "generation failed");
                GenerationOutcome::Failure(code)
            }
        };

        on_event(&LoopEvent::Outcome(outcome.clone()));
        Ok(outcome)
    }

    /// Continuous mode: generation after generation until the ledger is
    /// complete, a conflict is flagged, a generation fails or the operator
    /// interrupts.
    pub async fn run_continuous<F: FnMut(&LoopEvent)>(&self, mut on_event: F) -> Result<LoopStop> {
        loop {
            let progress = self.project.ledger().snapshot();
            if progress.all_complete() {
                tracing::info!(%progress, "all tasks complete");
                return Ok(LoopStop::Complete);
            }
            if let Some(content) = self.project.conflict().read() {
                tracing::info!("conflict sentinel present, pausing");
                return Ok(LoopStop::PausedConflict(content));
            }
            if self.interrupt.is_cancelled() {
                return Ok(LoopStop::Interrupted);
            }

            on_event(&LoopEvent::Progress(progress));
            match self.run_once(&mut on_event).await {
                Ok(GenerationOutcome::Success) => {}
                Ok(GenerationOutcome::Failure(code)) => return Ok(LoopStop::Failed(code)),
                Ok(GenerationOutcome::ConflictDetected(content)) => {
                    return Ok(LoopStop::PausedConflict(content))
                }
                Err(UkkoError::Interrupted) => return Ok(LoopStop::Interrupted),
                Err(e) => return Err(e),
            }

            tokio::select! {
                _ = self.interrupt.cancelled() => return Ok(LoopStop::Interrupted),
                _ = tokio::time::sleep(self.pause) => {}
            }
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
