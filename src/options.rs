use crate::error::BoxError;
use crate::record::LogRecord;
use std::fmt;
use std::sync::Arc;

/// Outcome of a [`RecordFilter`].
#[derive(Debug, Clone, PartialEq)]
pub enum Verdict {
    /// Format this record. It may differ from the one passed in.
    Keep(LogRecord),
    /// Produce no output for this line.
    Suppress,
}

impl From<Option<LogRecord>> for Verdict {
    fn from(record: Option<LogRecord>) -> Self {
        match record {
            Some(record) => Verdict::Keep(record),
            None => Verdict::Suppress,
        }
    }
}

/// Hook run on every record before it is formatted.
///
/// Filters may rewrite, redact or enrich a record, or veto it entirely with
/// [`Verdict::Suppress`]. An `Err` is a fault in the filter itself and is
/// reported for that line only.
pub trait RecordFilter: Send + Sync {
    fn apply(&self, record: LogRecord) -> Result<Verdict, BoxError>;
}

impl<F> RecordFilter for F
where
    F: Fn(LogRecord) -> Result<Verdict, BoxError> + Send + Sync,
{
    fn apply(&self, record: LogRecord) -> Result<Verdict, BoxError> {
        self(record)
    }
}

pub const DEFAULT_MSG_KEY: &str = "msg";

/// Per-call display options for [`format`](crate::format::format).
///
/// Every flag defaults to `false`; `msg_key` defaults to `"msg"`.
#[derive(Clone)]
pub struct FormatOptions {
    /// Render `HH:MM:SS` instead of `HH:MM:SS.mmm`.
    pub hide_ms: bool,
    /// Append the auxiliary fields as a compact JSON object.
    pub show_objects: bool,
    pub hide_icons: bool,
    /// Drop the whole level prefix, icon included.
    pub hide_letters: bool,
    pub hide_timestamp: bool,
    /// Drop the `METHOD url (status/timems)` summary.
    pub hide_web: bool,
    /// Strip every escape sequence from the finished line.
    pub hide_colors: bool,
    /// Field consulted first for the message text.
    pub msg_key: String,
    pub filter: Option<Arc<dyn RecordFilter>>,
}

impl Default for FormatOptions {
    fn default() -> Self {
        Self {
            hide_ms: false,
            show_objects: false,
            hide_icons: false,
            hide_letters: false,
            hide_timestamp: false,
            hide_web: false,
            hide_colors: false,
            msg_key: DEFAULT_MSG_KEY.to_string(),
            filter: None,
        }
    }
}

impl FormatOptions {
    pub fn with_filter(mut self, filter: impl RecordFilter + 'static) -> Self {
        self.filter = Some(Arc::new(filter));
        self
    }

    pub fn with_msg_key(mut self, key: impl Into<String>) -> Self {
        self.msg_key = key.into();
        self
    }
}

impl fmt::Debug for FormatOptions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FormatOptions")
            .field("hide_ms", &self.hide_ms)
            .field("show_objects", &self.show_objects)
            .field("hide_icons", &self.hide_icons)
            .field("hide_letters", &self.hide_letters)
            .field("hide_timestamp", &self.hide_timestamp)
            .field("hide_web", &self.hide_web)
            .field("hide_colors", &self.hide_colors)
            .field("msg_key", &self.msg_key)
            .field("filter", &self.filter.as_ref().map(|_| "<fn>"))
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let options = FormatOptions::default();
        assert!(!options.hide_ms);
        assert!(!options.show_objects);
        assert!(!options.hide_icons);
        assert!(!options.hide_letters);
        assert!(!options.hide_timestamp);
        assert!(!options.hide_web);
        assert!(!options.hide_colors);
        assert_eq!(options.msg_key, "msg");
        assert!(options.filter.is_none());
    }

    #[test]
    fn test_closure_filter() {
        let options = FormatOptions::default()
            .with_filter(|_record: LogRecord| -> Result<Verdict, BoxError> { Ok(Verdict::Suppress) });
        let filter = options.filter.unwrap();
        assert_eq!(filter.apply(LogRecord::new()).unwrap(), Verdict::Suppress);
    }

    #[test]
    fn test_verdict_from_option() {
        assert_eq!(Verdict::from(None), Verdict::Suppress);
        let record = LogRecord::from_text("x", 0);
        assert_eq!(Verdict::from(Some(record.clone())), Verdict::Keep(record));
    }
}
