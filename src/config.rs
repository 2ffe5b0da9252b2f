//! Initialization options a host application can embed in its own
//! configuration.

use serde::{Deserialize, Serialize};

use crate::facility::{Facility, Level};
use crate::flags::Flags;
use crate::global::replace_with;
use crate::sink::{SharedWriter, StdStreams};

/// Options for [`init_with_config`].
///
/// Every field is optional when deserializing; missing fields take the
/// values of the default facility.
///
/// ```
/// let config: leveled_log::Config =
///     serde_json::from_str(r#"{"debug": true, "flags": "DATE | TIME | SHORT_FILE"}"#).unwrap();
/// assert!(config.debug);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Config {
    /// Create the debug channel
    #[serde(default)]
    pub debug: bool,

    /// Header flags for every channel
    #[serde(default)]
    pub flags: Flags,

    /// Debug prefix in place of `[debug] `
    #[serde(default)]
    pub debug_prefix: Option<String>,

    /// Info prefix in place of `[info]  `
    #[serde(default)]
    pub info_prefix: Option<String>,

    /// Error prefix in place of `[error] `
    #[serde(default)]
    pub error_prefix: Option<String>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            debug: false,
            flags: Flags::STD,
            debug_prefix: None,
            info_prefix: None,
            error_prefix: None,
        }
    }
}

impl Config {
    /// Build a facility over `streams` with `sinks` as extra destinations
    pub fn build<I>(&self, streams: &StdStreams, sinks: I) -> Facility
    where
        I: IntoIterator<Item = SharedWriter>,
    {
        let facility = Facility::with_streams(streams, self.debug, self.flags, sinks);
        let overrides = [
            (Level::Debug, &self.debug_prefix),
            (Level::Info, &self.info_prefix),
            (Level::Error, &self.error_prefix),
        ];
        for (level, prefix) in overrides {
            if let Some(prefix) = prefix {
                facility.set_prefix(level, prefix);
            }
        }
        facility
    }
}

/// Replace the current facility with one built from `config`.
///
/// Equivalent to [`init`](crate::init) followed by the prefix overrides,
/// with no window in which the facility is visible without them.
pub fn init_with_config<I>(config: &Config, sinks: I)
where
    I: IntoIterator<Item = SharedWriter>,
{
    replace_with(|| config.build(&StdStreams::process(), sinks));
}
