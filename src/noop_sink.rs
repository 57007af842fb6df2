use crate::error::BoxError;
use crate::sink::LineSink;
use async_trait::async_trait;

/// A sink that simply drops all lines.
///
/// Useful for measuring the overhead of parsing and formatting without any
/// terminal I/O.
#[derive(Clone, Default)]
pub struct NoopSink;

#[async_trait]
impl LineSink for NoopSink {
    async fn write_line(&self, _line: &str) -> Result<(), BoxError> {
        Ok(())
    }
}
