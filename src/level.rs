use colored::{ColoredString, Colorize};

/// Display attributes for one severity code.
///
/// The table is built at compile time and never changes, so lookups hand out
/// `&'static` references and are safe from any thread.
pub struct LevelDescriptor {
    /// Numeric severity code, `None` for [`UNKNOWN_LEVEL`].
    pub code: Option<i64>,
    /// Lowercase level word, e.g. `"info"`.
    pub name: &'static str,
    /// Three-letter label shown at the start of each line.
    pub label: &'static str,
    pub icon: &'static str,
    paint: fn(&str) -> ColoredString,
}

impl LevelDescriptor {
    /// Apply this level's color to `text`.
    pub fn paint(&self, text: &str) -> ColoredString {
        (self.paint)(text)
    }

    /// The label, optionally followed by the icon, wrapped in the level
    /// color.
    pub fn prefix(&self, with_icon: bool) -> ColoredString {
        if with_icon {
            self.paint(&format!("{} {}", self.label, self.icon))
        } else {
            self.paint(self.label)
        }
    }
}

impl std::fmt::Debug for LevelDescriptor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LevelDescriptor")
            .field("code", &self.code)
            .field("label", &self.label)
            .finish_non_exhaustive()
    }
}

fn paint_gray(text: &str) -> ColoredString {
    text.truecolor(128, 128, 128)
}

fn paint_yellow(text: &str) -> ColoredString {
    text.truecolor(255, 255, 0)
}

fn paint_green(text: &str) -> ColoredString {
    text.truecolor(0, 255, 0)
}

fn paint_orange(text: &str) -> ColoredString {
    text.truecolor(255, 128, 0)
}

fn paint_red(text: &str) -> ColoredString {
    text.truecolor(255, 0, 0)
}

fn paint_alarm(text: &str) -> ColoredString {
    text.white().on_truecolor(255, 0, 0)
}

pub static LEVELS: [LevelDescriptor; 6] = [
    LevelDescriptor { code: Some(10), name: "trace", label: "TRC", icon: "🔎", paint: paint_gray },
    LevelDescriptor { code: Some(20), name: "debug", label: "DBG", icon: "🪲", paint: paint_yellow },
    LevelDescriptor { code: Some(30), name: "info", label: "INF", icon: "ℹ️", paint: paint_green },
    LevelDescriptor { code: Some(40), name: "warn", label: "WRN", icon: "⚠️", paint: paint_orange },
    LevelDescriptor { code: Some(50), name: "error", label: "ERR", icon: "🔥", paint: paint_red },
    LevelDescriptor { code: Some(60), name: "fatal", label: "FTL", icon: "💣", paint: paint_alarm },
];

pub static UNKNOWN_LEVEL: LevelDescriptor = LevelDescriptor {
    code: None,
    name: "unknown",
    label: "???",
    icon: "🤷",
    paint: paint_gray,
};

/// Level words that, when used as tags, only repeat what the level prefix
/// already shows.
pub const LEVEL_TAG_WORDS: [&str; 7] = ["trace", "debug", "info", "warn", "warning", "error", "fatal"];

/// Find the descriptor for `code`, falling back to [`UNKNOWN_LEVEL`].
pub fn lookup(code: Option<i64>) -> &'static LevelDescriptor {
    code.and_then(|code| LEVELS.iter().find(|level| level.code == Some(code)))
        .unwrap_or(&UNKNOWN_LEVEL)
}

/// Case-insensitive check against [`LEVEL_TAG_WORDS`].
pub fn is_level_word(word: &str) -> bool {
    LEVEL_TAG_WORDS.iter().any(|w| w.eq_ignore_ascii_case(word))
}
