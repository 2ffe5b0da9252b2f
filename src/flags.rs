//! Line header flags.

use bitflags::bitflags;
use serde::{Deserialize, Serialize};

use crate::{Error, Result};

bitflags! {
    /// Metadata a [`LeveledWriter`](crate::LeveledWriter) inserts ahead of
    /// every message.
    ///
    /// Bits outside the named set are kept as given and ignored when
    /// rendering, so `Flags::from_bits_retain` accepts any integer.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
    #[serde(transparent)]
    pub struct Flags: u32 {
        /// Local date: `2009/01/23`
        const DATE = 1;
        /// Local time: `01:23:23`
        const TIME = 1 << 1;
        /// Microsecond resolution: `01:23:23.123123`. Implies a time field.
        const MICROSECONDS = 1 << 2;
        /// Full caller path and line: `/a/b/c/main.rs:23`
        const LONG_FILE = 1 << 3;
        /// Final path component and line: `main.rs:23`. Overrides `LONG_FILE`.
        const SHORT_FILE = 1 << 4;
        /// Render date and time in UTC instead of the local time zone
        const UTC = 1 << 5;
        /// Move the prefix from the start of the line to just before the message
        const MSG_PREFIX = 1 << 6;
        /// Initial flags of the default facility
        const STD = Self::DATE.bits() | Self::TIME.bits();
    }
}

impl Flags {
    /// Parse the pipe-separated textual form, e.g. `"DATE | TIME | UTC"`.
    ///
    /// An empty string yields no flags.
    pub fn parse(text: &str) -> Result<Self> {
        bitflags::parser::from_str::<Flags>(text)
            .map_err(|e| Error::InvalidFlags(format!("{:?}: {}", text, e)))
    }

    pub(crate) fn has_timestamp(self) -> bool {
        self.intersects(Flags::DATE | Flags::TIME | Flags::MICROSECONDS)
    }

    pub(crate) fn has_caller(self) -> bool {
        self.intersects(Flags::LONG_FILE | Flags::SHORT_FILE)
    }
}

impl Default for Flags {
    fn default() -> Self {
        Flags::STD
    }
}
