use tokio::io::{AsyncBufReadExt, AsyncRead, AsyncWriteExt, BufReader};

use crate::style::{self, Color};
use crate::types::{ContentBlock, Delta, StreamEvent, StreamLine};

// ─── Rendered ─────────────────────────────────────────────────────────────

/// What one stdout line from the child turns into on the operator's screen.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Rendered {
    /// Incremental assistant text, printed without a trailing newline.
    Text(String),
    /// A tool invocation marker, printed on its own line.
    Tool(String),
    /// A line that was not stream-json, forwarded as is.
    Raw(String),
}

// ─── StreamRenderer ───────────────────────────────────────────────────────

/// Turns stream-json lines into display fragments.
///
/// Holds the name of the tool currently being invoked so a tool announced
/// repeatedly within one content block is only shown once. One renderer per
/// child process.
#[derive(Debug, Default)]
pub struct StreamRenderer {
    current_tool: Option<String>,
}

impl StreamRenderer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn feed(&mut self, line: &str) -> Option<Rendered> {
        let trimmed = line.trim();
        if trimmed.is_empty() {
            return None;
        }

        let Ok(value) = serde_json::from_str::<serde_json::Value>(trimmed) else {
            return Some(Rendered::Raw(line.to_string()));
        };
        // Valid JSON of an unexpected shape is protocol noise, not output.
        let parsed = match serde_json::from_value::<StreamLine>(value) {
            Ok(parsed) => parsed,
            Err(e) => {
                tracing::debug!(error = %e, "skipping unrecognized stream-json line");
                return None;
            }
        };

        match parsed.event? {
            StreamEvent::ContentBlockDelta {
                delta: Delta::TextDelta { text },
            } if !text.is_empty() => Some(Rendered::Text(text)),
            StreamEvent::ContentBlockStart {
                content_block: ContentBlock::ToolUse { name },
            } => {
                if self.current_tool.as_deref() == Some(name.as_str()) {
                    return None;
                }
                self.current_tool = Some(name.clone());
                Some(Rendered::Tool(name))
            }
            StreamEvent::ContentBlockStop { .. } => {
                self.current_tool = None;
                None
            }
            _ => None,
        }
    }
}

/// Format a fragment for the terminal.
pub(crate) fn format(rendered: &Rendered, color: bool) -> String {
    match rendered {
        Rendered::Text(t) => t.clone(),
        Rendered::Tool(name) => {
            let marker = style::wrap(Color::Blue, &format!("[Tool: {name}]"), color);
            format!("\n{marker}\n")
        }
        Rendered::Raw(line) => format!("{line}\n"),
    }
}

/// Render everything the child writes to stdout until EOF.
pub(crate) async fn pump<R>(stdout: R)
where
    R: AsyncRead + Unpin,
{
    let color = style::enabled();
    let mut renderer = StreamRenderer::new();
    let mut lines = BufReader::new(stdout).lines();
    let mut out = tokio::io::stdout();

    loop {
        match lines.next_line().await {
            Ok(Some(line)) => {
                let Some(rendered) = renderer.feed(&line) else {
                    continue;
                };
                let text = format(&rendered, color);
                if out.write_all(text.as_bytes()).await.is_err() {
                    break;
                }
                let _ = out.flush().await;
            }
            Ok(None) => break,
            Err(e) => {
                tracing::debug!(error = %e, "stdout read failed");
                break;
            }
        }
    }
    let _ = out.flush().await;
}
