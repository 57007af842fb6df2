use clap::Parser;
use logtint::driver::{spawn_interrupt_listener, Driver};
use logtint::env::{no_color_requested, LOGTINT_LOG_ENV, LOGTINT_MSG_KEY_ENV};
use logtint::init::{init_tracing, level_from_name, DriverConfig, InterruptPolicy};
use logtint::options::{FormatOptions, DEFAULT_MSG_KEY};
use logtint::sink::WriterSink;
use tracing::error;

#[derive(Parser)]
#[command(name = "logtint")]
#[command(about = "Pretty-print newline-delimited JSON logs read from stdin", long_about = None)]
struct Cli {
    /// Omit milliseconds from timestamps
    #[arg(short = 'm', long = "hide-ms")]
    hide_ms: bool,

    /// Append non-standard fields as a JSON object
    #[arg(short = 'o', long = "show-objects")]
    show_objects: bool,

    /// Omit the emoji after the level label
    #[arg(short = 'i', long = "hide-icons")]
    hide_icons: bool,

    /// Omit the level label and icon
    #[arg(short = 'l', long = "hide-letters")]
    hide_letters: bool,

    /// Omit the timestamp
    #[arg(short = 't', long = "hide-timestamp")]
    hide_timestamp: bool,

    /// Omit the HTTP request summary
    #[arg(short = 'w', long = "hide-web")]
    hide_web: bool,

    /// Print plain text without colors
    #[arg(short = 'c', long = "hide-colors")]
    hide_colors: bool,

    /// Field that holds the message text
    #[arg(short = 'k', long = "msg-key", default_value = DEFAULT_MSG_KEY, env = LOGTINT_MSG_KEY_ENV)]
    msg_key: String,

    /// Stop at the first line that fails to format
    #[arg(long = "strict")]
    strict: bool,

    /// Stop on the first Ctrl+C instead of draining remaining input
    #[arg(long = "stop-on-interrupt")]
    stop_on_interrupt: bool,

    /// Verbosity of logtint's own diagnostics on stderr
    #[arg(long = "log-level", default_value = "warn", env = LOGTINT_LOG_ENV)]
    log_level: String,
}

impl Cli {
    fn format_options(&self) -> FormatOptions {
        FormatOptions {
            hide_ms: self.hide_ms,
            show_objects: self.show_objects,
            hide_icons: self.hide_icons,
            hide_letters: self.hide_letters,
            hide_timestamp: self.hide_timestamp,
            hide_web: self.hide_web,
            hide_colors: self.hide_colors || no_color_requested(),
            msg_key: self.msg_key.clone(),
            filter: None,
        }
    }

    fn driver_config(&self) -> DriverConfig {
        DriverConfig {
            continue_on_error: !self.strict,
            interrupt: if self.stop_on_interrupt {
                InterruptPolicy::Stop
            } else {
                InterruptPolicy::Drain
            },
            log_level: level_from_name(&self.log_level),
            ..Default::default()
        }
    }
}

#[tokio::main]
async fn main() {
    let args = Cli::parse();
    let config = args.driver_config();

    if let Err(e) = init_tracing(config.log_level) {
        eprintln!("failed to initialize diagnostics: {e}");
    }

    let driver = Driver::new(args.format_options(), config);
    let sink = WriterSink::stdout();
    let (interrupts, _listener) = spawn_interrupt_listener();

    let code = match driver.run(tokio::io::stdin(), &sink, interrupts).await {
        Ok(_) => 0,
        Err(e) => {
            error!(error = %e, "logtint stopped");
            1
        }
    };

    // A blocking stdin read would otherwise hold up runtime shutdown after
    // an interrupt.
    std::process::exit(code)
}
