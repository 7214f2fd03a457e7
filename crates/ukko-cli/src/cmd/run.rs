use std::path::Path;

use tokio_util::sync::CancellationToken;
use ukko_core::generation::{GenerationLoop, GenerationOutcome, LoopState};
use ukko_core::project::Project;
use ukko_core::UkkoError;

use crate::cmd::UkkoExit;
use crate::launcher::ClaudeLauncher;
use crate::output::{self, say, Color};

/// Run exactly one generation.
pub fn run(root: &Path, interrupt: CancellationToken) -> anyhow::Result<()> {
    let project = Project::open(root)?;
    let launcher = ClaudeLauncher::new(root);
    let generation = GenerationLoop::new(&project, &launcher, interrupt);

    if generation.state() == LoopState::Planning {
        say(
            Color::Yellow,
            "Still in planning phase. Run 'ukko plan' first.",
        );
        return Err(UkkoExit::StillPlanning.into());
    }

    let mut on_event = output::print_event;

    let outcome = super::runtime()?.block_on(generation.run_once(&mut on_event));
    match outcome {
        Ok(GenerationOutcome::Success) => Ok(()),
        Ok(GenerationOutcome::Failure(code)) => Err(UkkoExit::GenerationFailed(code).into()),
        Ok(GenerationOutcome::ConflictDetected(_)) => Err(UkkoExit::ConflictPending.into()),
        Err(UkkoError::Interrupted) => {
            println!();
            say(Color::Yellow, "Stopped by user.");
            Err(UkkoExit::Interrupted.into())
        }
        Err(e) => Err(e.into()),
    }
}
