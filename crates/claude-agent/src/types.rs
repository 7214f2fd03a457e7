use serde::Deserialize;
use std::path::PathBuf;

// ─── Stream-json lines ────────────────────────────────────────────────────

/// One line of `claude --output-format stream-json --include-partial-messages`.
///
/// Only the partial-message envelope is of interest: it carries an `event`
/// object with the Anthropic streaming event. Every other message type
/// (`system`, `assistant`, `result`, …) deserializes with `event: None`.
#[derive(Debug, Clone, Deserialize)]
pub struct StreamLine {
    #[serde(default)]
    pub event: Option<StreamEvent>,
}

/// Streaming event, discriminated by the JSON `"type"` field.
#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum StreamEvent {
    ContentBlockStart {
        content_block: ContentBlock,
    },
    ContentBlockDelta {
        delta: Delta,
    },
    ContentBlockStop {
        #[serde(default)]
        index: u32,
    },
    /// `message_start`, `message_delta`, `ping`, …
    #[serde(other)]
    Other,
}

#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ContentBlock {
    ToolUse {
        #[serde(default = "unknown_tool")]
        name: String,
    },
    #[serde(other)]
    Other,
}

fn unknown_tool() -> String {
    "unknown".to_string()
}

#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Delta {
    TextDelta {
        #[serde(default)]
        text: String,
    },
    /// `input_json_delta`, `thinking_delta`, …
    #[serde(other)]
    Other,
}

// ─── Options ──────────────────────────────────────────────────────────────

/// How a watched run's output reaches the operator.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum OutputMode {
    /// `--print --output-format stream-json`, parsed and rendered live.
    #[default]
    Stream,
    /// The child inherits the terminal; only the watcher stops it.
    Terminal,
}

impl OutputMode {
    /// `terminal` selects [`OutputMode::Terminal`]; anything else streams.
    pub fn parse(value: &str) -> Self {
        if value.trim().eq_ignore_ascii_case("terminal") {
            OutputMode::Terminal
        } else {
            OutputMode::Stream
        }
    }
}

/// Options for one Claude subprocess.
#[derive(Debug, Clone, Default)]
pub struct QueryOptions {
    /// Model name passed as `--model` (omitted when `None`)
    pub model: Option<String>,
    /// Executable to run instead of resolving `claude` on `PATH`
    pub path_to_executable: Option<PathBuf>,
    /// Output strategy for watched runs; interactive runs always inherit
    pub output: OutputMode,
    /// Working directory for the subprocess
    pub cwd: Option<PathBuf>,
}
