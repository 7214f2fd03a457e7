use std::path::Path;

use anyhow::Context;
use ukko_core::config::ConfigFile;
use ukko_core::template::{self, SetupValues};

use crate::output::{paint, say, Color};

/// Template `CLAUDE.md` from `.ukko/config.yaml`.
pub fn run(root: &Path) -> anyhow::Result<()> {
    say(Color::Blue, "=== Ukko Method Setup ===");
    println!();

    template::ensure_inputs(root)?;
    let values = SetupValues::from_config(&ConfigFile::for_root(root));
    print_detected(&values);

    let backup = template::apply(root, &values).context("failed to template CLAUDE.md")?;

    say(Color::Green, "Setup complete!");
    println!();
    print_applied(&values);

    if !values.ukko_model.is_empty() {
        println!();
        println!("Note: ukko will use --model {}", values.ukko_model);
    }
    println!();
    let backup = backup.strip_prefix(root).unwrap_or(&backup);
    println!("A backup was saved to {}", backup.display());
    println!();
    println!("Next steps:");
    println!("  1. Run 'ukko plan' to start planning phase");
    println!("  2. Or 'ukko status' to check current state");
    Ok(())
}

fn or<'a>(value: &'a str, fallback: &'a str) -> &'a str {
    if value.is_empty() {
        fallback
    } else {
        value
    }
}

fn print_detected(values: &SetupValues) {
    println!("Configuration detected:");
    println!("  - Ukko model: {}", or(&values.ukko_model, "(default)"));
    println!(
        "  - Default agent model: {}",
        or(&values.default_agent_model, "auto")
    );
    println!("  - Agents per swarm: {}", or(&values.agents_per_swarm, "5"));
    println!(
        "  - Target swarms per task: {}",
        or(&values.target_swarms_per_task, "2-5")
    );
    println!(
        "  - Decision triggers: {} items",
        values.decision_triggers.len()
    );
    for trigger in &values.decision_triggers {
        println!("      - {trigger}");
    }
    println!();
}

fn print_applied(values: &SetupValues) {
    let bullet = paint(Color::Green, "*");
    println!("Applied to CLAUDE.md:");
    if !values.agents_per_swarm.is_empty() {
        println!("  {bullet} Agents per swarm: {}", values.agents_per_swarm);
    }
    if !values.target_swarms_per_task.is_empty() {
        println!(
            "  {bullet} Target swarms per task: {}",
            values.target_swarms_per_task
        );
    }
    if !values.decision_triggers.is_empty() {
        println!(
            "  {bullet} Decision triggers: {} items",
            values.decision_triggers.len()
        );
    }
    match values.specific_agent_model() {
        Some(model) => println!("  {bullet} Default agent model: {model}"),
        None => println!("  {bullet} Default agent model: auto (Ukko chooses per-swarm)"),
    }
}
