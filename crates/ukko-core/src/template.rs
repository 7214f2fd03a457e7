//! One-shot templating of `CLAUDE.md` from `.ukko/config.yaml`.
//!
//! Each setting rewrites a known phrase in place, so running setup again
//! after changing the config updates the previous values rather than
//! appending new text.

use crate::config::{
    ConfigFile, AGENTS_PER_SWARM_KEY, DECISION_TRIGGERS_KEY, DEFAULT_AGENT_MODEL_KEY,
    TARGET_SWARMS_KEY, UKKO_MODEL_KEY,
};
use crate::error::{Result, UkkoError};
use crate::{io, paths};
use regex::{NoExpand, Regex};
use std::path::{Path, PathBuf};
use std::sync::OnceLock;

const TRIGGERS_HEADING: &str = "Launch parallel agents when you encounter:";
const EVALUATING_HEADING: &str = "\n\n## Evaluating";
const MODEL_PLACEHOLDER: &str = r#"<parameter name="model">[haiku|sonnet|opus]</parameter>"#;

/// Guidance restored when the agent model is `auto`.
pub const ORIGINAL_MODEL_GUIDANCE: &str = "\
**Model selection:**
- **haiku**: Simple decisions, clear constraints, speed matters
- **sonnet**: Most decisions, balanced quality/cost
- **opus**: Complex architectural decisions, high uncertainty";

struct Patterns {
    agents: Regex,
    swarm_agent: Regex,
    target: Regex,
    triggers: Regex,
    model_placeholder: Regex,
    model_specific: Regex,
    model_guidance: Regex,
}

static PATTERNS: OnceLock<Patterns> = OnceLock::new();

fn patterns() -> &'static Patterns {
    PATTERNS.get_or_init(|| Patterns {
        agents: Regex::new(r"launch \d+ parallel agents").unwrap(),
        swarm_agent: Regex::new(r"Swarm agent 1 of \d+").unwrap(),
        target: Regex::new(r"Target: \d+-\d+ swarm launches").unwrap(),
        triggers: Regex::new(r"Launch parallel agents when you encounter:\n(?:- [^\n]+\n)+")
            .unwrap(),
        model_placeholder: Regex::new(
            r#"<parameter name="model">\[haiku\|sonnet\|opus\]</parameter>"#,
        )
        .unwrap(),
        model_specific: Regex::new(r#"<parameter name="model">(haiku|sonnet|opus)</parameter>"#)
            .unwrap(),
        model_guidance: Regex::new(r"(?s)\*\*Model selection:\*\*.*?\n\n## Evaluating").unwrap(),
    })
}

// ---------------------------------------------------------------------------
// SetupValues
// ---------------------------------------------------------------------------

/// Config values consumed by setup. Empty strings mean "leave as is".
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SetupValues {
    pub agents_per_swarm: String,
    pub target_swarms_per_task: String,
    pub default_agent_model: String,
    pub decision_triggers: Vec<String>,
    /// Not templated; reported so the operator sees what `ukko` will pass.
    pub ukko_model: String,
}

impl SetupValues {
    pub fn from_config(config: &ConfigFile) -> Self {
        Self {
            agents_per_swarm: config.get(AGENTS_PER_SWARM_KEY),
            target_swarms_per_task: config.get(TARGET_SWARMS_KEY),
            default_agent_model: config.get(DEFAULT_AGENT_MODEL_KEY),
            decision_triggers: config.get_list(DECISION_TRIGGERS_KEY),
            ukko_model: config.get(UKKO_MODEL_KEY),
        }
    }

    /// The configured agent model, unless it is unset or `auto`.
    pub fn specific_agent_model(&self) -> Option<&str> {
        let m = self.default_agent_model.as_str();
        (!m.is_empty() && !m.eq_ignore_ascii_case("auto")).then_some(m)
    }
}

// ---------------------------------------------------------------------------
// Rendering
// ---------------------------------------------------------------------------

/// Apply `values` to a CLAUDE.md document.
pub fn render(content: &str, values: &SetupValues) -> String {
    let p = patterns();
    let mut out = content.to_string();

    if !values.agents_per_swarm.is_empty() {
        let n = &values.agents_per_swarm;
        out = replace(&p.agents, &out, &format!("launch {n} parallel agents"));
        out = replace(&p.swarm_agent, &out, &format!("Swarm agent 1 of {n}"));
    }

    if !values.target_swarms_per_task.is_empty() {
        let t = &values.target_swarms_per_task;
        out = replace(&p.target, &out, &format!("Target: {t} swarm launches"));
    }

    if !values.decision_triggers.is_empty() {
        out = replace(&p.triggers, &out, &triggers_block(&values.decision_triggers));
    }

    match values.specific_agent_model() {
        Some(model) => {
            let param = format!(r#"<parameter name="model">{model}</parameter>"#);
            out = replace(&p.model_placeholder, &out, &param);
            out = replace(&p.model_specific, &out, &param);
            let guidance =
                format!("**Model selection:** Using `{model}` (configured in config.yaml)");
            out = replace(&p.model_guidance, &out, &format!("{guidance}{EVALUATING_HEADING}"));
        }
        None => {
            out = replace(&p.model_specific, &out, MODEL_PLACEHOLDER);
            out = replace(
                &p.model_guidance,
                &out,
                &format!("{ORIGINAL_MODEL_GUIDANCE}{EVALUATING_HEADING}"),
            );
        }
    }

    out
}

fn replace(re: &Regex, haystack: &str, with: &str) -> String {
    re.replace_all(haystack, NoExpand(with)).into_owned()
}

/// Heading plus one bullet per trigger (first letter capitalised), with a
/// trailing newline so the following text keeps its position.
fn triggers_block(triggers: &[String]) -> String {
    let mut block = String::from(TRIGGERS_HEADING);
    for trigger in triggers {
        block.push_str("\n- ");
        block.push_str(&capitalize_first(trigger));
    }
    block.push('\n');
    block
}

fn capitalize_first(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

// ---------------------------------------------------------------------------
// apply
// ---------------------------------------------------------------------------

/// Fails with [`UkkoError::FileMissing`] when either the config file or
/// `CLAUDE.md` is absent.
pub fn ensure_inputs(root: &Path) -> Result<()> {
    if !paths::config_path(root).exists() {
        return Err(UkkoError::FileMissing(PathBuf::from(paths::CONFIG_FILE)));
    }
    if !paths::claude_md_path(root).exists() {
        return Err(UkkoError::FileMissing(PathBuf::from(paths::CLAUDE_MD)));
    }
    Ok(())
}

/// Back up `CLAUDE.md`, render it with `values` and write it back.
///
/// Returns the backup path.
pub fn apply(root: &Path, values: &SetupValues) -> Result<PathBuf> {
    ensure_inputs(root)?;
    let claude_md = paths::claude_md_path(root);

    let backup = paths::claude_md_backup_path(root);
    io::backup_file(&claude_md, &backup)?;

    let content = std::fs::read_to_string(&claude_md)?;
    let rendered = render(&content, values);
    io::atomic_write(&claude_md, rendered.as_bytes())?;
    tracing::info!(path = %claude_md.display(), "CLAUDE.md templated");

    Ok(backup)
}
