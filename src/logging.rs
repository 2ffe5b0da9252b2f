//! Bridge from the `log` crate facade.
//!
//! Libraries that log through `log::info!` and friends end up on the same
//! channels as direct calls once [`init`] has installed the bridge:
//!
//! | `log` level      | channel |
//! |------------------|---------|
//! | `Error`          | error   |
//! | `Warn`, `Info`   | info    |
//! | `Debug`, `Trace` | debug (dropped when absent) |

use crate::facility::Level;
use crate::global::current;
use crate::writer::Caller;
use crate::Result;

// Re-export the log crate's level filter for callers of `init`
pub use log::LevelFilter;

static BRIDGE: Bridge = Bridge;

struct Bridge;

fn channel_for(level: log::Level) -> Level {
    match level {
        log::Level::Error => Level::Error,
        log::Level::Warn | log::Level::Info => Level::Info,
        log::Level::Debug | log::Level::Trace => Level::Debug,
    }
}

impl log::Log for Bridge {
    fn enabled(&self, metadata: &log::Metadata) -> bool {
        match channel_for(metadata.level()) {
            Level::Debug => current().has_debug(),
            Level::Info | Level::Error => true,
        }
    }

    fn log(&self, record: &log::Record) {
        let facility = current();
        let Some(writer) = facility.channel(channel_for(record.level())) else {
            return;
        };
        let caller = Caller {
            file: record.file().unwrap_or("???"),
            line: record.line().unwrap_or(0),
        };
        let _ = writer.output(caller, &record.args().to_string());
    }

    fn flush(&self) {}
}

/// Route `log` records with a level up to `level` into the current
/// facility.
///
/// Fails if another `log` logger is already installed.
pub fn init(level: LevelFilter) -> Result<()> {
    log::set_logger(&BRIDGE)?;
    log::set_max_level(level);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_level_mapping() {
        assert_eq!(channel_for(log::Level::Error), Level::Error);
        assert_eq!(channel_for(log::Level::Warn), Level::Info);
        assert_eq!(channel_for(log::Level::Info), Level::Info);
        assert_eq!(channel_for(log::Level::Debug), Level::Debug);
        assert_eq!(channel_for(log::Level::Trace), Level::Debug);
    }
}
