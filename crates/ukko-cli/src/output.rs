use serde::Serialize;
use ukko_core::generation::{GenerationOutcome, LoopEvent};
use ukko_core::paths::CONFLICT_FILE;
use ukko_core::project::{Phase, StatusReport};

pub use claude_agent::style::{paint, Color};

pub fn say(color: Color, text: &str) {
    println!("{}", paint(color, text));
}

pub fn print_json<T: Serialize>(value: &T) -> anyhow::Result<()> {
    let json = serde_json::to_string_pretty(value)?;
    println!("{}", json);
    Ok(())
}

// ---------------------------------------------------------------------------
// Generation events
// ---------------------------------------------------------------------------

pub fn print_event(event: &LoopEvent) {
    match event {
        LoopEvent::Progress(progress) => println!("Progress: {progress}"),
        LoopEvent::GenerationStarting => say(Color::Blue, "Starting Ukko generation..."),
        LoopEvent::Outcome(GenerationOutcome::Success) => {
            println!();
            say(Color::Green, "Generation complete.");
        }
        LoopEvent::Outcome(GenerationOutcome::Failure(code)) => {
            println!();
            say(Color::Red, &format!("Generation failed (exit code {code})."));
            println!("This may be due to API limits, network issues, or an error.");
            println!("Check the output above for details.");
        }
        LoopEvent::Outcome(GenerationOutcome::ConflictDetected(content)) => {
            print_conflict(content);
        }
    }
}

/// The sentinel's content, verbatim, between rules.
pub fn print_conflict(content: &str) {
    say(Color::Red, "CONFLICT DETECTED");
    println!("A previous Ukko flagged an issue that needs human review:");
    println!("---");
    println!("{}", content.trim_end_matches('\n'));
    println!("---");
    println!("Resolve the conflict and delete {CONFLICT_FILE} to continue.");
}

// ---------------------------------------------------------------------------
// Status
// ---------------------------------------------------------------------------

pub fn print_status(report: &StatusReport) {
    say(Color::Blue, "=== Ukko Method Status ===");
    println!();

    match report.phase {
        Phase::Planning => {
            println!("Phase: {}", paint(Color::Yellow, "PLANNING"));
            println!("Run 'ukko plan' to start planning.");
        }
        Phase::Execution => {
            println!("Phase: {}", paint(Color::Green, "EXECUTION"));
            println!("Progress: {} tasks complete", report.progress);
            if report.all_complete {
                say(Color::Green, "All tasks complete!");
            }
        }
    }

    if report.conflict {
        println!();
        say(Color::Red, &format!("CONFLICT: Review {CONFLICT_FILE}"));
    }

    println!();
    println!("Mode: {}", report.mode);
}
