use tracing::Level;

/// What the driver does when the user presses Ctrl+C.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum InterruptPolicy {
    /// Print a newline and keep reading until the producer closes the pipe.
    /// A second interrupt stops immediately.
    Drain,
    /// Print a newline and stop.
    Stop,
}

/// Configuration of the streaming driver.
///
/// **Fields**
/// - `channel_buffer`: number of raw lines the reader task may queue ahead
///   of the formatter.
/// - `continue_on_error`: keep going after a line fails to format (the
///   failure is logged and counted). When `false` the first failure ends
///   the run with [`DriverError::Line`](crate::error::DriverError::Line).
/// - `skip_blank_lines`: ignore lines that are empty or whitespace only.
/// - `interrupt`: reaction to Ctrl+C, see [`InterruptPolicy`].
/// - `log_level`: verbosity of the tool's own diagnostics on stderr.
#[derive(Clone, Debug)]
pub struct DriverConfig {
    pub channel_buffer: usize,
    pub continue_on_error: bool,
    pub skip_blank_lines: bool,
    pub interrupt: InterruptPolicy,
    pub log_level: Level,
}

impl Default for DriverConfig {
    fn default() -> Self {
        Self {
            channel_buffer: 1024,
            continue_on_error: true,
            skip_blank_lines: true,
            interrupt: InterruptPolicy::Drain,
            log_level: Level::WARN,
        }
    }
}

impl DriverConfig {
    /// Smallest accepted `channel_buffer`.
    pub const MIN_CHANNEL_BUFFER: usize = 16;

    /// Copy of this config with degenerate values raised to their minimum.
    pub fn normalized(&self) -> Self {
        Self {
            channel_buffer: self.channel_buffer.max(Self::MIN_CHANNEL_BUFFER),
            ..self.clone()
        }
    }
}

/// Install a global `tracing` subscriber that writes the tool's own
/// diagnostics to stderr, leaving stdout for formatted log lines.
///
/// Fails if a global subscriber is already set.
pub fn init_tracing(level: Level) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_max_level(level)
        .with_target(false)
        .try_init()
}

/// Parse a level name such as `"debug"` or `"WARN"`; unknown names map to
/// `WARN`.
pub fn level_from_name(name: &str) -> Level {
    name.trim().parse().unwrap_or(Level::WARN)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = DriverConfig::default();
        assert_eq!(config.channel_buffer, 1024);
        assert!(config.continue_on_error);
        assert!(config.skip_blank_lines);
        assert_eq!(config.interrupt, InterruptPolicy::Drain);
        assert_eq!(config.log_level, Level::WARN);
    }

    #[test]
    fn test_normalized_clamps_buffer() {
        let config = DriverConfig { channel_buffer: 0, ..Default::default() };
        assert_eq!(config.normalized().channel_buffer, DriverConfig::MIN_CHANNEL_BUFFER);
        let config = DriverConfig { channel_buffer: 64, ..Default::default() };
        assert_eq!(config.normalized().channel_buffer, 64);
    }

    #[test]
    fn test_level_from_name() {
        assert_eq!(level_from_name("debug"), Level::DEBUG);
        assert_eq!(level_from_name(" ERROR "), Level::ERROR);
        assert_eq!(level_from_name("loud"), Level::WARN);
    }
}
