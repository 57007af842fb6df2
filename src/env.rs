//! Environment variable names read by the `logtint` binary.
//!
//! These are purely helpers; the formatter and driver never read the
//! environment themselves.

/// Field consulted first for the message text, e.g. `event`.
pub const LOGTINT_MSG_KEY_ENV: &str = "LOGTINT_MSG_KEY";

/// Verbosity of logtint's own diagnostics (`error`, `warn`, `info`, ...).
pub const LOGTINT_LOG_ENV: &str = "LOGTINT_LOG";

/// Informal standard: any non-empty value disables colored output.
pub const NO_COLOR_ENV: &str = "NO_COLOR";

/// Read an environment variable or fall back to a provided default.
pub fn env_or(key: &str, default: &str) -> String {
    std::env::var(key).unwrap_or_else(|_| default.to_string())
}

/// `true` when `NO_COLOR` is set to a non-empty value.
pub fn no_color_requested() -> bool {
    std::env::var_os(NO_COLOR_ENV).is_some_and(|v| !v.is_empty())
}
