use std::path::PathBuf;
use std::sync::Arc;

use async_trait::async_trait;
use claude_agent::{
    ClaudeAgentError, OutputMode, QueryOptions, RunConfig, RunMode, WatchTiming,
};
use tokio_util::sync::CancellationToken;
use ukko_core::config::{ConfigFile, UKKO_OUTPUT_KEY};
use ukko_core::generation::{LaunchMode, Launcher};
use ukko_core::ledger::TaskLedger;
use ukko_core::UkkoError;

/// [`Launcher`] backed by the real `claude` executable.
///
/// Model and output strategy are read from the config on every launch, so
/// edits made between generations take effect on the next one.
pub struct ClaudeLauncher {
    root: PathBuf,
    timing: WatchTiming,
}

impl ClaudeLauncher {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            timing: WatchTiming::default(),
        }
    }

    fn options(&self) -> QueryOptions {
        let config = ConfigFile::for_root(&self.root);
        QueryOptions {
            model: config.ukko_model(),
            path_to_executable: None,
            output: OutputMode::parse(&config.get(UKKO_OUTPUT_KEY)),
            cwd: Some(self.root.clone()),
        }
    }
}

#[async_trait]
impl Launcher for ClaudeLauncher {
    async fn launch(
        &self,
        prompt: &str,
        mode: LaunchMode,
        interrupt: CancellationToken,
    ) -> ukko_core::Result<i32> {
        let mode = match mode {
            LaunchMode::Interactive => RunMode::Interactive,
            LaunchMode::Watched => {
                let ledger = TaskLedger::for_root(&self.root);
                RunMode::Watched {
                    progress: Arc::new(move || ledger.completed()),
                    timing: self.timing,
                }
            }
        };
        let config = RunConfig {
            prompt: prompt.to_string(),
            mode,
            opts: self.options(),
        };

        let result = claude_agent::run(config, interrupt)
            .await
            .map_err(into_ukko_error)?;
        if result.stopped_by_watcher {
            tracing::info!("generation stopped after completing a task");
        }
        Ok(result.exit_code)
    }
}

fn into_ukko_error(err: ClaudeAgentError) -> UkkoError {
    match err {
        ClaudeAgentError::ExecutableNotFound(_) => UkkoError::ExecutableNotFound,
        ClaudeAgentError::Interrupted => UkkoError::Interrupted,
        ClaudeAgentError::Io(e) => UkkoError::Io(e),
        ClaudeAgentError::Process(msg) => UkkoError::Launch(msg),
    }
}
