use std::io::Cursor;
use std::time::Instant;
use tokio::sync::mpsc;

use logtint::driver::Driver;
use logtint::env::env_or;
use logtint::init::DriverConfig;
use logtint::noop_sink::NoopSink;
use logtint::options::FormatOptions;

#[tokio::main]
async fn main() {
    let n: u64 = env_or("LOGTINT_LOAD_LINES", "100000").parse().unwrap_or(100_000);

    // every other line is free text so the fallback parser is exercised too
    let input: String = (0..n)
        .map(|i| {
            if i % 2 == 0 {
                format!("{{\"level\":30,\"time\":1698765432123,\"msg\":\"request\",\"req\":{{\"method\":\"GET\",\"url\":\"/items/{i}\"}},\"res\":{{\"statusCode\":200}},\"responseTime\":{i},\"tags\":[\"info\",\"http\"]}}\n")
            } else {
                format!("    at handler (/srv/app.js:{i}:7)\n")
            }
        })
        .collect();

    let options = FormatOptions {
        show_objects: true,
        hide_colors: true,
        ..Default::default()
    };
    let config = DriverConfig {
        channel_buffer: 50_000,
        ..Default::default()
    };

    let driver = Driver::new(options, config);
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
    println!("custom options: formatted {} lines in {:?} (~{:.0} lines/s)",
        stats.lines_written,
        elapsed,
        stats.lines_written as f64 / elapsed.as_secs_f64()
    );
}
