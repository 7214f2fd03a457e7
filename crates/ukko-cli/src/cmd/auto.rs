use std::path::Path;

use tokio_util::sync::CancellationToken;
use ukko_core::config::Mode;
use ukko_core::generation::{GenerationLoop, GenerationOutcome, LoopEvent, LoopState, LoopStop};
use ukko_core::project::Project;

use crate::cmd::UkkoExit;
use crate::launcher::ClaudeLauncher;
use crate::output::{self, say, Color};

/// No subcommand: behave according to the phase and the configured mode.
pub fn run(root: &Path, interrupt: CancellationToken) -> anyhow::Result<()> {
    let project = Project::open(root)?;
    let launcher = ClaudeLauncher::new(root);
    let generation = GenerationLoop::new(&project, &launcher, interrupt);

    if generation.state() == LoopState::Planning {
        say(Color::Yellow, "Planning phase not complete.");
        println!("Run 'ukko plan' to start planning.");
        return Ok(());
    }

    if project.config().mode() == Mode::Testing {
        say(
            Color::Yellow,
            "Testing mode: Run 'ukko run' for each generation.",
        );
        output::print_status(&project.status());
        return Ok(());
    }

    say(Color::Blue, "=== Ukko Method - Auto Mode ===");
    println!("Running continuous generations until complete.");
    println!("Press Ctrl+C to stop at any time.");
    println!();

    // A refusal inside a generation prints the conflict itself.
    let mut conflict_shown = false;
    let on_event = |event: &LoopEvent| {
        if matches!(event, LoopEvent::Outcome(GenerationOutcome::ConflictDetected(_))) {
            conflict_shown = true;
        }
        output::print_event(event);
    };

    let stop = super::runtime()?.block_on(generation.run_continuous(on_event))?;
    match stop {
        LoopStop::Complete => {
            say(Color::Green, "All tasks complete! Exiting.");
            Ok(())
        }
        LoopStop::PausedConflict(content) => {
            if !conflict_shown {
                output::print_conflict(&content);
            }
            say(Color::Red, "Conflict detected. Pausing for human review.");
            Ok(())
        }
        LoopStop::Failed(code) => {
            say(
                Color::Yellow,
                "Stopping due to error. Fix the issue and run again.",
            );
            Err(UkkoExit::GenerationFailed(code).into())
        }
        LoopStop::Interrupted => {
            println!();
            say(Color::Yellow, "Stopped by user.");
            Err(UkkoExit::Interrupted.into())
        }
    }
}
