//! ANSI colors for terminal output, shared by the stream renderer and the
//! `ukko` binary.

use std::io::IsTerminal;
use std::sync::OnceLock;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Color {
    Red,
    Green,
    Yellow,
    Blue,
}

impl Color {
    fn code(self) -> &'static str {
        match self {
            Color::Red => "\x1b[0;31m",
            Color::Green => "\x1b[0;32m",
            Color::Yellow => "\x1b[1;33m",
            Color::Blue => "\x1b[0;34m",
        }
    }
}

const RESET: &str = "\x1b[0m";

static ENABLED: OnceLock<bool> = OnceLock::new();

/// Colors are used only when stdout is a terminal and `NO_COLOR` is unset.
pub fn enabled() -> bool {
    *ENABLED.get_or_init(|| {
        std::env::var_os("NO_COLOR").is_none() && std::io::stdout().is_terminal()
    })
}

/// Wrap `text` in `color` when `on`, otherwise return it unchanged.
pub fn wrap(color: Color, text: &str, on: bool) -> String {
    if on {
        format!("{}{text}{RESET}", color.code())
    } else {
        text.to_string()
    }
}

pub fn paint(color: Color, text: &str) -> String {
    wrap(color, text, enabled())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn wrap_adds_and_resets_color() {
        assert_eq!(wrap(Color::Red, "x", true), "\x1b[0;31mx\x1b[0m");
        assert_eq!(wrap(Color::Yellow, "x", true), "\x1b[1;33mx\x1b[0m");
    }

    #[test]
    fn wrap_without_color_is_plain() {
        assert_eq!(wrap(Color::Blue, "[Tool: Read]", false), "[Tool: Read]");
    }
}
