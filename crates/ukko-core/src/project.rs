use crate::config::{ConfigFile, Mode};
use crate::conflict::ConflictGate;
use crate::error::{Result, UkkoError};
use crate::ledger::{Progress, TaskLedger};
use crate::paths;
use serde::Serialize;
use std::fmt;
use std::path::{Path, PathBuf};

// ---------------------------------------------------------------------------
// Phase
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Phase {
    /// The planning guide still exists; only interactive planning may run.
    Planning,
    Execution,
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Phase::Planning => f.write_str("PLANNING"),
            Phase::Execution => f.write_str("EXECUTION"),
        }
    }
}

// ---------------------------------------------------------------------------
// Project
// ---------------------------------------------------------------------------

/// A directory containing a `.ukko/` setup.
///
/// All state lives on disk; every accessor re-reads it.
#[derive(Debug, Clone)]
pub struct Project {
    root: PathBuf,
}

impl Project {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Open `root`, failing with [`UkkoError::SetupMissing`] when it has no
    /// `.ukko/` directory.
    pub fn open(root: impl Into<PathBuf>) -> Result<Self> {
        let project = Self::new(root);
        project.ensure_initialized()?;
        Ok(project)
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn ensure_initialized(&self) -> Result<()> {
        let dir = paths::ukko_dir(&self.root);
        if !dir.is_dir() {
            return Err(UkkoError::SetupMissing(PathBuf::from(paths::UKKO_DIR)));
        }
        Ok(())
    }

    pub fn config(&self) -> ConfigFile {
        ConfigFile::for_root(&self.root)
    }

    pub fn ledger(&self) -> TaskLedger {
        TaskLedger::for_root(&self.root)
    }

    pub fn conflict(&self) -> ConflictGate {
        ConflictGate::for_root(&self.root)
    }

    pub fn phase(&self) -> Phase {
        if paths::planning_guide_path(&self.root).exists() {
            Phase::Planning
        } else {
            Phase::Execution
        }
    }

    pub fn is_planning_phase(&self) -> bool {
        self.phase() == Phase::Planning
    }

    pub fn status(&self) -> StatusReport {
        let progress = self.ledger().snapshot();
        StatusReport {
            phase: self.phase(),
            progress,
            all_complete: progress.all_complete(),
            conflict: self.conflict().is_present(),
            mode: self.config().mode(),
        }
    }
}

// ---------------------------------------------------------------------------
// StatusReport
// ---------------------------------------------------------------------------

/// Snapshot rendered by `ukko status`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StatusReport {
    pub phase: Phase,
    pub progress: Progress,
    pub all_complete: bool,
    pub conflict: bool,
    pub mode: Mode,
}
