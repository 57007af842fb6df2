use std::io::Cursor;

use async_trait::async_trait;
use tokio::sync::mpsc;
use tracing::{info, Level};

use logtint::driver::Driver;
use logtint::error::BoxError;
use logtint::init::{init_tracing, DriverConfig};
use logtint::options::{FormatOptions, Verdict};
use logtint::record::LogRecord;
use logtint::sink::LineSink;

/// Example of sending formatted lines somewhere other than stdout by
/// implementing `LineSink` directly. Imagine this forwards to a chat
/// channel or a remote terminal.
struct PrefixedSink;

#[async_trait]
impl LineSink for PrefixedSink {
    async fn write_line(&self, line: &str) -> Result<(), BoxError> {
        print!("[ops-console] {line}");
        Ok(())
    }
}

/// Redacts `password` fields and drops health-check noise.
fn redact(mut record: LogRecord) -> Result<Verdict, BoxError> {
    if record.get("msg").and_then(|m| m.as_str()) == Some("health check") {
        return Ok(Verdict::Suppress);
    }
    if record.contains_key("password") {
        record.insert("password", "***");
    }
    Ok(Verdict::Keep(record))
}

#[tokio::main]
async fn main() {
    if let Err(e) = init_tracing(Level::DEBUG) {
        eprintln!("tracing already initialized: {e}");
    }

    let input = concat!(
        "{\"level\":30,\"time\":1698765432123,\"msg\":\"user login\",\"user\":\"ada\",\"password\":\"hunter2\"}\n",
        "{\"level\":20,\"time\":1698765432200,\"msg\":\"health check\"}\n",
        "{\"level\":40,\"time\":1698765432300,\"msg\":\"slow query\",\"table\":\"orders\"}\n",
    );

    let options = FormatOptions { show_objects: true, ..Default::default() }.with_filter(redact);
    let driver = Driver::new(options, DriverConfig::default());
    let (_tx, interrupts) = mpsc::channel(1);

    info!("custom sink example started");
    if let Err(e) = driver.run(Cursor::new(input.as_bytes().to_vec()), &PrefixedSink, interrupts).await {
        eprintln!("run failed: {e}");
    }
}
