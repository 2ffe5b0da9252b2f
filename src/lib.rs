//! Process-wide leveled logging with debug, info and error channels.
//!
//! Info lines go to standard output, error lines to standard error, and both
//! can be duplicated to any number of extra destinations. A debug channel
//! exists only when requested; without it every `debug*` call is a no-op.
//! Each channel renders `<prefix><date> <time> <message>\n` with the header
//! fields chosen by [`Flags`].
//!
//! ```no_run
//! use leveled_log::{Flags, SharedWriter};
//!
//! leveled_log::info!("starting with ", 4, " workers");
//!
//! let file = std::fs::File::create("service.log").unwrap();
//! leveled_log::init(true, Flags::STD, [SharedWriter::from(file)]);
//! leveled_log::debugf!("config loaded from %q", "/etc/service.toml");
//! leveled_log::errorln!("upstream unavailable:", 503);
//! ```
//!
//! Three formatting styles are offered per channel: print-style (`info!`),
//! printf-style (`infof!`) and println-style (`infoln!`). See [`format`].

use std::error::Error as StdError;
use std::fmt;

pub mod config;
pub mod facility;
pub mod flags;
pub mod format;
pub mod global;
pub mod logging;
mod macros;
pub mod sink;
pub mod value;
pub mod writer;

// Re-export key types
pub use config::{Config, init_with_config};
pub use facility::{Facility, Level};
pub use flags::Flags;
pub use format::{sprint, sprintf, sprintln};
pub use global::{
    current, debug, debugf, debugln, error, errorf, errorln, info, infof, infoln, init,
    init_default, install, set_debug_prefix, set_error_prefix, set_info_prefix,
};
pub use sink::{MemorySink, MultiWriter, SharedWriter, StdStreams};
pub use value::{ToValue, Value};
pub use writer::{Caller, LeveledWriter};

/// Custom error type for the library
#[derive(Debug)]
pub enum Error {
    /// Write failure on a destination
    Io(std::io::Error),
    /// Flags given as text could not be parsed
    InvalidFlags(String),
    /// The `log` bridge could not be installed
    Logger(log::SetLoggerError),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::Io(err) => write!(f, "I/O error: {}", err),
            Error::InvalidFlags(msg) => write!(f, "Invalid flags: {}", msg),
            Error::Logger(err) => write!(f, "Logger error: {}", err),
        }
    }
}

impl StdError for Error {
    fn source(&self) -> Option<&(dyn StdError + 'static)> {
        match self {
            Error::Io(err) => Some(err),
            Error::InvalidFlags(_) => None,
            Error::Logger(err) => Some(err),
        }
    }
}

impl From<std::io::Error> for Error {
    fn from(err: std::io::Error) -> Self {
        Error::Io(err)
    }
}

impl From<log::SetLoggerError> for Error {
    fn from(err: log::SetLoggerError) -> Self {
        Error::Logger(err)
    }
}

/// Type alias for library results
pub type Result<T> = std::result::Result<T, Error>;
