use std::path::Path;

use tokio_util::sync::CancellationToken;
use ukko_core::generation::{GenerationLoop, LoopState};
use ukko_core::project::Project;
use ukko_core::UkkoError;

use crate::cmd::UkkoExit;
use crate::launcher::ClaudeLauncher;
use crate::output::{say, Color};

pub fn run(root: &Path, interrupt: CancellationToken) -> anyhow::Result<()> {
    let project = Project::open(root)?;
    let launcher = ClaudeLauncher::new(root);
    let generation = GenerationLoop::new(&project, &launcher, interrupt);

    if generation.state() != LoopState::Planning {
        say(Color::Yellow, "Planning already complete. Nothing to do.");
        return Ok(());
    }

    say(Color::Blue, "Starting planning phase...");
    match super::runtime()?.block_on(generation.plan()) {
        Ok(0) => Ok(()),
        Ok(code) => {
            tracing::warn!(exit_code = code, "planning session exited non-zero");
            Ok(())
        }
        Err(UkkoError::Interrupted) => {
            println!();
            say(Color::Yellow, "Stopped by user.");
            Err(UkkoExit::Interrupted.into())
        }
        Err(e) => Err(e.into()),
    }
}
