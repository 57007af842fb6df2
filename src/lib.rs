pub mod record;
pub mod level;
pub mod style;
pub mod options;
pub mod format;
pub mod error;

pub mod sink;
pub mod noop_sink;
pub mod memory_sink;
pub mod driver;

pub mod init;
pub mod env;

pub use driver::{process_line, Driver, Prettifier};
pub use error::{DriverError, FormatError};
pub use format::format;
pub use options::{FormatOptions, RecordFilter, Verdict};
pub use record::{parse, LogRecord};
