use std::io::Cursor;
use std::time::Instant;
use tokio::sync::mpsc;

use logtint::driver::Driver;
use logtint::init::DriverConfig;
use logtint::noop_sink::NoopSink;
use logtint::options::FormatOptions;

#[tokio::main]
async fn main() {
    let n: u64 = 100_000;
    let input: String = (0..n)
        .map(|i| format!("{{\"level\":50,\"time\":1698765432123,\"msg\":\"default load test error\",\"iteration\":{i}}}\n"))
        .collect();

    let driver = Driver::new(FormatOptions::default(), DriverConfig::default());
    let (_tx, interrupts) = mpsc::channel(1);

    let start = Instant::now();
    let stats = match driver.run(Cursor::new(input.into_bytes()), &NoopSink, interrupts).await {
        Ok(stats) => stats,
        Err(e) => {
            eprintln!("load run failed: {e}");
            return;
        }
    };

    let elapsed = start.elapsed();
    println!("default options: formatted {} lines in {:?} (~{:.0} lines/s)",
        stats.lines_written,
        elapsed,
        stats.lines_written as f64 / elapsed.as_secs_f64()
    );
}
