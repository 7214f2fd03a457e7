use crate::io::read_optional;
use crate::paths;
use regex::Regex;
use serde::Serialize;
use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::OnceLock;

static TOTAL_RE: OnceLock<Regex> = OnceLock::new();
static DONE_RE: OnceLock<Regex> = OnceLock::new();

fn total_re() -> &'static Regex {
    TOTAL_RE.get_or_init(|| Regex::new(r"(?m)^- \[.\]").unwrap())
}

fn done_re() -> &'static Regex {
    DONE_RE.get_or_init(|| Regex::new(r"(?m)^- \[x\]").unwrap())
}

// ---------------------------------------------------------------------------
// Progress
// ---------------------------------------------------------------------------

/// Point-in-time checkbox count of a task ledger.
///
/// `total` counts every `- [?]` line at the start of a line, whatever the
/// bracket holds; `completed` counts only `- [x]`. Since every completed
/// line is also a total line, `completed <= total` always holds.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct Progress {
    pub completed: usize,
    pub total: usize,
}

impl Progress {
    pub fn from_markdown(doc: &str) -> Self {
        Self {
            completed: done_re().find_iter(doc).count(),
            total: total_re().find_iter(doc).count(),
        }
    }

    /// True when there is at least one task and every task is checked.
    pub fn all_complete(&self) -> bool {
        self.total > 0 && self.completed == self.total
    }

    pub fn remaining(&self) -> usize {
        self.total - self.completed
    }
}

impl fmt::Display for Progress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.completed, self.total)
    }
}

// ---------------------------------------------------------------------------
// TaskLedger
// ---------------------------------------------------------------------------

/// The markdown task list the assistant checks off as it works.
///
/// Reads never fail: a missing or unreadable file is zero progress. The
/// assistant may be rewriting the file while we read it; a torn read that
/// undercounts is corrected by the next snapshot.
#[derive(Debug, Clone)]
pub struct TaskLedger {
    path: PathBuf,
}

impl TaskLedger {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn for_root(root: &Path) -> Self {
        Self::new(paths::prd_path(root))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn snapshot(&self) -> Progress {
        read_optional(&self.path)
            .map(|doc| Progress::from_markdown(&doc))
            .unwrap_or_default()
    }

    pub fn completed(&self) -> usize {
        self.snapshot().completed
    }

    pub fn all_complete(&self) -> bool {
        self.snapshot().all_complete()
    }
}
