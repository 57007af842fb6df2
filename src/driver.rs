use crate::error::{DriverError, Result};
use crate::format::format;
use crate::init::{DriverConfig, InterruptPolicy};
use crate::options::FormatOptions;
use crate::record::{parse, LogRecord};
use crate::sink::LineSink;
use serde::Serialize;
use std::io;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use tokio::io::{AsyncBufReadExt, AsyncRead, BufReader};
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::{debug, warn};

/// Shared counters describing a driver's progress.
#[derive(Clone, Default)]
pub struct DriverStats {
    /// Lines received from the input, blank ones included.
    pub lines_read: Arc<AtomicU64>,
    /// Formatted lines handed to the sink.
    pub lines_written: Arc<AtomicU64>,
    /// Lines vetoed by the filter or skipped as blank.
    pub lines_suppressed: Arc<AtomicU64>,
    /// Lines whose formatting failed.
    pub lines_failed: Arc<AtomicU64>,
}

/// Point-in-time copy of [`DriverStats`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct StatsSnapshot {
    pub lines_read: u64,
    pub lines_written: u64,
    pub lines_suppressed: u64,
    pub lines_failed: u64,
}

impl DriverStats {
    pub fn snapshot(&self) -> StatsSnapshot {
        StatsSnapshot {
            lines_read: self.lines_read.load(Ordering::Relaxed),
            lines_written: self.lines_written.load(Ordering::Relaxed),
            lines_suppressed: self.lines_suppressed.load(Ordering::Relaxed),
            lines_failed: self.lines_failed.load(Ordering::Relaxed),
        }
    }
}

/// Parse and format one raw input line.
///
/// `Ok(None)` means the line is suppressed. A formatting fault is wrapped
/// with the raw line for context.
pub fn process_line(line: &str, options: &FormatOptions) -> Result<Option<String>> {
    format(parse(line), options).map_err(|source| DriverError::Line {
        input: line.to_string(),
        source,
    })
}

/// Reusable single-line entry point for hosts that already split their
/// input, such as a logger's pretty-print hook.
#[derive(Clone, Debug, Default)]
pub struct Prettifier {
    options: Arc<FormatOptions>,
}

impl Prettifier {
    pub fn new(options: FormatOptions) -> Self {
        Self { options: Arc::new(options) }
    }

    pub fn options(&self) -> &FormatOptions {
        &self.options
    }

    /// Format a raw line. A vetoed line yields an empty string.
    pub fn prettify_line(&self, line: &str) -> Result<String> {
        Ok(process_line(line, &self.options)?.unwrap_or_default())
    }

    /// Format an already-structured record. A vetoed record yields an empty
    /// string.
    pub fn prettify_record(&self, record: LogRecord) -> Result<String> {
        let input = serde_json::to_string(&record).unwrap_or_default();
        let line = format(record, &self.options).map_err(|source| DriverError::Line { input, source })?;
        Ok(line.unwrap_or_default())
    }
}

/// Streams raw lines through the formatter into a [`LineSink`].
///
/// Reading happens on a background task feeding a bounded channel; the
/// formatting stage is strictly sequential, so output order always matches
/// input order.
pub struct Driver {
    options: Arc<FormatOptions>,
    config: DriverConfig,
    stats: DriverStats,
}

impl Driver {
    /// Create a driver. `config` is normalized so degenerate values (such as
    /// a zero-length channel) are raised to their minimum.
    pub fn new(options: FormatOptions, config: DriverConfig) -> Self {
        Self {
            options: Arc::new(options),
            config: config.normalized(),
            stats: DriverStats::default(),
        }
    }

    pub fn stats(&self) -> &DriverStats {
        &self.stats
    }

    pub fn config(&self) -> &DriverConfig {
        &self.config
    }

    /// Run until the input is exhausted or an interrupt stops the stream.
    ///
    /// **Parameters**
    /// - `reader`: raw byte input, typically stdin.
    /// - `sink`: destination for formatted lines.
    /// - `interrupts`: one message per Ctrl+C. A closed channel simply means
    ///   no further interrupts will arrive.
    ///
    /// **Returns**
    /// - the final [`StatsSnapshot`] on success.
    /// - `Err(DriverError::Io)` if reading fails, `Err(DriverError::Sink)` if
    ///   writing fails, or `Err(DriverError::Line)` for a formatting fault
    ///   when `continue_on_error` is off.
    pub async fn run<R, S>(&self, reader: R, sink: &S, mut interrupts: mpsc::Receiver<()>) -> Result<StatsSnapshot>
    where
        R: AsyncRead + Unpin + Send + 'static,
        S: LineSink + ?Sized,
    {
        let (mut lines, reader_task) = spawn_line_reader(reader, self.config.channel_buffer);
        let mut interrupted = false;
        let mut interrupts_open = true;

        let outcome = loop {
            tokio::select! {
                biased;

                signal = interrupts.recv(), if interrupts_open => {
                    if signal.is_none() {
                        interrupts_open = false;
                        continue;
                    }
                    // keep the shell prompt off the last formatted line
                    if let Err(e) = sink.write_line("\n").await {
                        break Err(DriverError::Sink(e));
                    }
                    if interrupted || self.config.interrupt == InterruptPolicy::Stop {
                        debug!("interrupted, stopping");
                        break Ok(());
                    }
                    interrupted = true;
                    debug!("interrupted, draining remaining input");
                }
                next = lines.recv() => match next {
                    Some(Ok(line)) => {
                        if let Err(e) = self.handle_line(&line, sink).await {
                            break Err(e);
                        }
                    }
                    Some(Err(e)) => break Err(DriverError::Io(e)),
                    None => break Ok(()),
                },
            }
        };

        reader_task.abort();
        let flushed = sink.flush().await.map_err(DriverError::Sink);
        outcome?;
        flushed?;

        let snapshot = self.stats.snapshot();
        match serde_json::to_string(&snapshot) {
            Ok(json) => debug!(stats = %json, "input finished"),
            Err(e) => warn!(error = %e, "failed to encode driver stats"),
        }
        Ok(snapshot)
    }

    async fn handle_line<S>(&self, line: &str, sink: &S) -> Result<()>
    where
        S: LineSink + ?Sized,
    {
        self.stats.lines_read.fetch_add(1, Ordering::Relaxed);

        if self.config.skip_blank_lines && line.trim().is_empty() {
            self.stats.lines_suppressed.fetch_add(1, Ordering::Relaxed);
            return Ok(());
        }

        match process_line(line, &self.options) {
            Ok(Some(formatted)) => {
                sink.write_line(&formatted).await.map_err(DriverError::Sink)?;
                self.stats.lines_written.fetch_add(1, Ordering::Relaxed);
            }
            Ok(None) => {
                self.stats.lines_suppressed.fetch_add(1, Ordering::Relaxed);
            }
            Err(e) => {
                self.stats.lines_failed.fetch_add(1, Ordering::Relaxed);
                if !self.config.continue_on_error {
                    return Err(e);
                }
                warn!(error = %e, "skipping line");
            }
        }
        Ok(())
    }
}

/// Read `reader` line by line on a background task.
///
/// Invalid UTF-8 is replaced rather than rejected, and `\n` / `\r\n`
/// terminators are removed. The channel closes at end of input or after the
/// first read error.
pub fn spawn_line_reader<R>(reader: R, buffer: usize) -> (mpsc::Receiver<io::Result<String>>, JoinHandle<()>)
where
    R: AsyncRead + Unpin + Send + 'static,
{
    let (tx, rx) = mpsc::channel(buffer.max(1));

    let handle = tokio::spawn(async move {
        let mut reader = BufReader::new(reader);
        let mut buf = Vec::new();
        loop {
            buf.clear();
            match reader.read_until(b'\n', &mut buf).await {
                Ok(0) => break,
                Ok(_) => {
                    if buf.last() == Some(&b'\n') {
                        buf.pop();
                        if buf.last() == Some(&b'\r') {
                            buf.pop();
                        }
                    }
                    let line = String::from_utf8_lossy(&buf).into_owned();
                    if tx.send(Ok(line)).await.is_err() {
                        break;
                    }
                }
                Err(e) => {
                    let _ = tx.send(Err(e)).await;
                    break;
                }
            }
        }
    });

    (rx, handle)
}

/// Forward every Ctrl+C to a channel suitable for [`Driver::run`].
pub fn spawn_interrupt_listener() -> (mpsc::Receiver<()>, JoinHandle<()>) {
    let (tx, rx) = mpsc::channel(4);

    let handle = tokio::spawn(async move {
        loop {
            if let Err(e) = tokio::signal::ctrl_c().await {
                tracing::error!(error = %e, "failed to listen for Ctrl+C");
                return;
            }
            if tx.send(()).await.is_err() {
                return;
            }
        }
    });

    (rx, handle)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::{BoxError, FormatError};
    use crate::options::Verdict;

    fn plain() -> FormatOptions {
        FormatOptions { hide_colors: true, hide_timestamp: true, ..Default::default() }
    }

    #[test]
    fn test_process_line_formats_json_and_text() {
        let out = process_line(r#"{"level":40,"msg":"careful"}"#, &plain()).unwrap();
        assert_eq!(out.as_deref(), Some("WRN ⚠️ careful\n"));

        let out = process_line("panic at the disco", &plain()).unwrap();
        assert_eq!(out.as_deref(), Some("INF ℹ️ panic at the disco\n"));
    }

    #[test]
    fn test_process_line_wraps_faults() {
        let options = plain().with_filter(|_: LogRecord| -> std::result::Result<Verdict, BoxError> {
            Err("bad filter".into())
        });
        let err = process_line("{\"msg\":\"x\"}", &options).unwrap_err();
        match err {
            DriverError::Line { input, source: FormatError::Filter(_) } => assert_eq!(input, "{\"msg\":\"x\"}"),
            other => panic!("unexpected error {other:?}"),
        }
    }

    #[test]
    fn test_prettifier_veto_is_empty_string() {
        let prettifier = Prettifier::new(
            plain().with_filter(|_: LogRecord| -> std::result::Result<Verdict, BoxError> { Ok(Verdict::Suppress) }),
        );
        assert_eq!(prettifier.prettify_line("{\"msg\":\"x\"}").unwrap(), "");
    }

    #[test]
    fn test_prettifier_accepts_records() {
        let prettifier = Prettifier::new(plain());
        let mut record = LogRecord::new();
        record.insert("level", 60);
        record.insert("msg", "down");
        assert_eq!(prettifier.prettify_record(record).unwrap(), "FTL 💣 down\n");
    }
}
