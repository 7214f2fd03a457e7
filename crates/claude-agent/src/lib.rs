//! `claude-agent`: supervised driver for the Claude CLI subprocess.
//!
//! Launches `claude` either interactively (the child owns the terminal) or
//! under a watcher that stops it once the task ledger shows one more
//! completed task than it did at spawn.
//!
//! # Architecture
//!
//! ```text
//! RunConfig { prompt, mode, opts }
//!     │
//!     ▼
//! runner::run      ← resolves `claude` on PATH, builds the argument list
//!     │
//!     ├── Interactive ─► ClaudeProcess (inherited stdio) ─► exit code
//!     │
//!     └── Watched ─────► ClaudeProcess ──┬─ stream::pump  (stream-json → text)
//!                                        └─ watcher::watch (progress → SIGTERM)
//! ```
//!
//! # Quick start
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use claude_agent::{run, RunConfig, RunMode, WatchTiming};
//! use tokio_util::sync::CancellationToken;
//!
//! let progress = Arc::new(move || ledger.completed());
//! let result = run(
//!     RunConfig {
//!         prompt: "You are Ukko. Read CLAUDE.md and proceed with your phase.".into(),
//!         mode: RunMode::Watched { progress, timing: WatchTiming::default() },
//!         opts: Default::default(),
//!     },
//!     CancellationToken::new(),
//! )
//! .await?;
//! if result.stopped_by_watcher {
//!     println!("task finished");
//! }
//! ```

pub mod error;
pub mod runner;
pub mod stream;
pub mod style;
pub mod types;
pub mod watcher;

pub(crate) mod process;


pub use error::ClaudeAgentError;
pub use process::DEFAULT_EXECUTABLE;
pub use runner::{run, RunConfig, RunMode, RunResult};
pub use stream::{Rendered, StreamRenderer};
pub use types::{OutputMode, QueryOptions};
pub use watcher::{ProgressSource, WatchTiming};

/// Convenience `Result` alias for this crate.
pub type Result<T> = std::result::Result<T, ClaudeAgentError>;
