use crate::error::BoxError;
use async_trait::async_trait;
use tokio::io::{AsyncWrite, AsyncWriteExt, Stdout};
use tokio::sync::Mutex;

/// Asynchronous destination for formatted lines produced by the driver.
///
/// Implementations receive lines in input order, each already terminated
/// with `\n`. The driver awaits every write before formatting the next
/// line, so a sink never sees lines out of order.
#[async_trait]
pub trait LineSink: Send + Sync {
    /// Write one formatted line.
    ///
    /// **Returns**
    /// - `Ok(())` once the line has been handed to the destination.
    /// - `Err(..)` if the destination failed (closed pipe, full disk).
    ///   The driver stops and reports it as a sink error.
    async fn write_line(&self, line: &str) -> Result<(), BoxError>;

    /// Flush anything buffered. Default implementation is a no-op.
    async fn flush(&self) -> Result<(), BoxError> {
        Ok(())
    }
}

/// [`LineSink`] over any [`AsyncWrite`], flushing after every line so that
/// output keeps up with a live tail.
pub struct WriterSink<W> {
    writer: Mutex<W>,
}

impl<W> WriterSink<W>
where
    W: AsyncWrite + Unpin + Send,
{
    pub fn new(writer: W) -> Self {
        Self { writer: Mutex::new(writer) }
    }

    pub fn into_inner(self) -> W {
        self.writer.into_inner()
    }
}

impl WriterSink<Stdout> {
    pub fn stdout() -> Self {
        Self::new(tokio::io::stdout())
    }
}

#[async_trait]
impl<W> LineSink for WriterSink<W>
where
    W: AsyncWrite + Unpin + Send,
{
    async fn write_line(&self, line: &str) -> Result<(), BoxError> {
        let mut writer = self.writer.lock().await;
        writer.write_all(line.as_bytes()).await?;
        writer.flush().await?;
        Ok(())
    }

    async fn flush(&self) -> Result<(), BoxError> {
        self.writer.lock().await.flush().await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_writer_sink_appends_lines() {
        let sink = WriterSink::new(Vec::new());
        sink.write_line("first\n").await.unwrap();
        sink.write_line("second\n").await.unwrap();
        sink.flush().await.unwrap();
        assert_eq!(sink.into_inner(), b"first\nsecond\n".to_vec());
    }
}
