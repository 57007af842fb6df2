//! Text decoration shared by the formatter.
//!
//! Styling is always emitted, independent of whether stdout is a terminal.
//! Plain output is produced afterwards by [`strip_styles`], a pure pass over
//! the finished line.

use colored::{ColoredString, Colorize};
use std::sync::Once;

static FORCE_STYLING: Once = Once::new();

/// Make `colored` emit escape sequences regardless of terminal detection.
pub(crate) fn force_styling() {
    FORCE_STYLING.call_once(|| colored::control::set_override(true));
}

/// Faint text, used for timestamps and the HTTP summary.
pub fn dim(text: &str) -> ColoredString {
    text.dimmed()
}

/// Neutral gray, used for the auxiliary JSON block.
pub fn gray(text: &str) -> ColoredString {
    text.bright_black()
}

/// Remove ANSI escape sequences, leaving the visible text untouched.
///
/// Handles CSI sequences (`ESC [ ... final`), OSC sequences terminated by BEL
/// or `ESC \`, and two-byte escapes.
pub fn strip_styles(text: &str) -> String {
    let mut result = String::with_capacity(text.len());
    let mut chars = text.chars().peekable();

    while let Some(c) = chars.next() {
        if c != '\x1b' {
            result.push(c);
            continue;
        }
        match chars.peek().copied() {
            Some('[') => {
                chars.next();
                // parameters and intermediates run until a final byte in @..~
                for c in chars.by_ref() {
                    if ('@'..='~').contains(&c) {
                        break;
                    }
                }
            }
            Some(']') => {
                chars.next();
                while let Some(c) = chars.next() {
                    if c == '\x07' {
                        break;
                    }
                    if c == '\x1b' && chars.peek() == Some(&'\\') {
                        chars.next();
                        break;
                    }
                }
            }
            Some(_) => {
                chars.next();
            }
            None => {}
        }
    }

    result
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_strip_plain_text_unchanged() {
        assert_eq!(strip_styles("hello world\n"), "hello world\n");
        assert_eq!(strip_styles("INF ℹ️ ok"), "INF ℹ️ ok");
    }

    #[test]
    fn test_strip_sgr_sequences() {
        assert_eq!(strip_styles("\x1b[32mgreen\x1b[0m"), "green");
        assert_eq!(
            strip_styles("\x1b[1;38;2;255;0;0mERR\x1b[0m \x1b[2m12:00:00\x1b[0m"),
            "ERR 12:00:00"
        );
    }

    #[test]
    fn test_strip_osc_sequences() {
        assert_eq!(strip_styles("\x1b]0;title\x07text"), "text");
        assert_eq!(strip_styles("\x1b]8;;http://x\x1b\\link"), "link");
    }

    #[test]
    fn test_strip_styled_output() {
        force_styling();
        let styled = format!("{} {}", dim("a"), gray("b"));
        assert!(styled.contains('\x1b'));
        assert_eq!(strip_styles(&styled), "a b");
    }
}
