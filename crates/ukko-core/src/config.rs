//! Flat `key: value` reader for `.ukko/config.yaml`.
//!
//! The file is deliberately not parsed as YAML. Each query re-reads the file
//! from disk and scans it line by line, so edits made while a loop is running
//! are picked up on the next query. Anything that does not look like
//! `key: value` (or a `key:` list block) is ignored, and a missing file or
//! key resolves to an empty value.

use crate::io::read_optional;
use crate::paths;
use regex::Regex;
use serde::Serialize;
use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::OnceLock;

// ---------------------------------------------------------------------------
// Keys
// ---------------------------------------------------------------------------

pub const MODE_KEY: &str = "mode";
pub const UKKO_MODEL_KEY: &str = "ukko_model";
pub const UKKO_OUTPUT_KEY: &str = "ukko_output";
pub const AGENTS_PER_SWARM_KEY: &str = "agents_per_swarm";
pub const TARGET_SWARMS_KEY: &str = "target_swarms_per_task";
pub const DEFAULT_AGENT_MODEL_KEY: &str = "default_agent_model";
pub const DECISION_TRIGGERS_KEY: &str = "decision_triggers";

// ---------------------------------------------------------------------------
// Mode
// ---------------------------------------------------------------------------

/// How the no-argument `ukko` invocation behaves.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Mode {
    /// Continuous generations until done, conflicted or failed.
    Auto,
    /// One generation per explicit `ukko run`.
    Testing,
}

impl Mode {
    /// Anything other than `testing` (including an unset key) means auto.
    pub fn parse(value: &str) -> Self {
        if value.trim() == "testing" {
            Mode::Testing
        } else {
            Mode::Auto
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Mode::Auto => "auto",
            Mode::Testing => "testing",
        }
    }
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// ConfigFile
// ---------------------------------------------------------------------------

/// Handle on a config file. Holds only the path; every getter re-reads.
#[derive(Debug, Clone)]
pub struct ConfigFile {
    path: PathBuf,
}

impl ConfigFile {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// The config file of the project rooted at `root`.
    pub fn for_root(root: &Path) -> Self {
        Self::new(paths::config_path(root))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn exists(&self) -> bool {
        self.path.exists()
    }

    /// Scalar value for `key`, or `""` when the file or key is missing.
    pub fn get(&self, key: &str) -> String {
        read_optional(&self.path)
            .map(|content| parse_value(&content, key))
            .unwrap_or_default()
    }

    /// List value for `key`, or an empty list when the file or key is missing.
    pub fn get_list(&self, key: &str) -> Vec<String> {
        read_optional(&self.path)
            .map(|content| parse_list(&content, key))
            .unwrap_or_default()
    }

    pub fn mode(&self) -> Mode {
        Mode::parse(&self.get(MODE_KEY))
    }

    /// Model passed to `claude --model`; `None` when unset or blank.
    pub fn ukko_model(&self) -> Option<String> {
        Some(self.get(UKKO_MODEL_KEY)).filter(|m| !m.is_empty())
    }
}

// ---------------------------------------------------------------------------
// Parsing
// ---------------------------------------------------------------------------

/// Find the first `key: value` line (leading whitespace allowed) and return
/// the value with surrounding whitespace and quote characters removed.
pub fn parse_value(content: &str, key: &str) -> String {
    let Ok(re) = Regex::new(&format!(r"^\s*{}:\s*(.+)$", regex::escape(key))) else {
        return String::new();
    };
    content
        .lines()
        .find_map(|line| {
            re.captures(line)
                .and_then(|c| c.get(1))
                .map(|m| unquote(m.as_str()))
        })
        .unwrap_or_default()
}

/// Collect the items of a list block:
///
/// ```yaml
/// decision_triggers:
///   - "architecture choices"
///   - naming conventions
/// ```
///
/// The block starts at an unindented `key:` line and ends at the first
/// non-blank line that is not indented.
pub fn parse_list(content: &str, key: &str) -> Vec<String> {
    let Ok(header) = Regex::new(&format!(r"^{}:\s*$", regex::escape(key))) else {
        return Vec::new();
    };
    let item = item_re();

    let mut items = Vec::new();
    let mut in_list = false;
    for line in content.lines() {
        if !in_list {
            in_list = header.is_match(line);
            continue;
        }
        if let Some(m) = item.captures(line).and_then(|c| c.get(1)) {
            items.push(m.as_str().trim().to_string());
        } else if !line.trim().is_empty() && !line.starts_with(' ') {
            break;
        }
    }
    items
}

static ITEM_RE: OnceLock<Regex> = OnceLock::new();

fn item_re() -> &'static Regex {
    ITEM_RE.get_or_init(|| Regex::new(r#"^\s+-\s+"?([^"]+)"?\s*$"#).unwrap())
}

fn unquote(raw: &str) -> String {
    raw.trim()
        .trim_matches('"')
        .trim_matches('\'')
        .to_string()
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
