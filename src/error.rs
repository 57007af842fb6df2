use std::error::Error;
use std::io;

/// Boxed error returned by user-supplied filters and sinks.
pub type BoxError = Box<dyn Error + Send + Sync>;

/// Fault raised while formatting a single record.
#[derive(thiserror::Error, Debug)]
pub enum FormatError {
    #[error("filter failed: {0}")]
    Filter(#[source] BoxError),

    #[error("failed to serialize auxiliary fields: {0}")]
    Serialize(#[from] serde_json::Error),
}

/// Error surfaced by the streaming driver.
#[derive(thiserror::Error, Debug)]
pub enum DriverError {
    /// One input line could not be formatted. `input` is the raw line.
    #[error("Unable to process log: {input:?}. error: {source}")]
    Line { input: String, source: FormatError },

    #[error("failed to read input: {0}")]
    Io(#[from] io::Error),

    #[error("failed to write formatted line: {0}")]
    Sink(#[source] BoxError),
}

pub type Result<T> = std::result::Result<T, DriverError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_line_error_renders_input_and_cause() {
        let err = DriverError::Line {
            input: r#"{"msg":"boom"}"#.to_string(),
            source: FormatError::Filter("redaction table missing".into()),
        };
        assert_eq!(
            err.to_string(),
            r#"Unable to process log: "{\"msg\":\"boom\"}". error: filter failed: redaction table missing"#
        );
    }
}
