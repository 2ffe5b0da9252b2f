//! The three-channel logging facility.

use std::fmt;

use crate::flags::Flags;
use crate::sink::{MultiWriter, SharedWriter, StdStreams};
use crate::value::Value;
use crate::writer::LeveledWriter;

/// Prefix of the debug channel
pub const DEBUG_PREFIX: &str = "[debug] ";
/// Prefix of the info channel
pub const INFO_PREFIX: &str = "[info]  ";
/// Prefix of the error channel
pub const ERROR_PREFIX: &str = "[error] ";

/// Channel selector
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Level {
    /// Optional channel, only present when debug mode was requested
    Debug,
    /// Standard output plus any extra sinks
    Info,
    /// Standard error plus any extra sinks
    Error,
}

impl Level {
    /// Prefix a freshly initialized channel starts with
    pub fn default_prefix(self) -> &'static str {
        match self {
            Level::Debug => DEBUG_PREFIX,
            Level::Info => INFO_PREFIX,
            Level::Error => ERROR_PREFIX,
        }
    }

    /// Lowercase name
    pub fn as_str(self) -> &'static str {
        match self {
            Level::Debug => "debug",
            Level::Info => "info",
            Level::Error => "error",
        }
    }
}

impl fmt::Display for Level {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Debug, info and error channels.
///
/// The info and error channels always exist; the debug channel exists only
/// when requested at construction. Every operation on an absent channel is a
/// no-op. Write operations never fail: destination errors are dropped.
pub struct Facility {
    debug: Option<LeveledWriter>,
    info: LeveledWriter,
    error: LeveledWriter,
}

impl Facility {
    /// The default facility over the process streams: info to stdout, error
    /// to stderr, date and time headers, no debug channel.
    pub fn standard() -> Self {
        Self::standard_with_streams(&StdStreams::process())
    }

    /// [`Facility::standard`] over the given streams
    pub fn standard_with_streams(streams: &StdStreams) -> Self {
        Self {
            debug: None,
            info: LeveledWriter::new(streams.stdout.clone(), INFO_PREFIX, Flags::STD),
            error: LeveledWriter::new(streams.stderr.clone(), ERROR_PREFIX, Flags::STD),
        }
    }

    /// Build a facility over the process streams.
    ///
    /// Info lines go to stdout followed by every sink in `sinks`, error lines
    /// to stderr followed by the same sinks. With `debug`, a debug channel
    /// writes to stdout only.
    pub fn new<I>(debug: bool, flags: Flags, sinks: I) -> Self
    where
        I: IntoIterator<Item = SharedWriter>,
    {
        Self::with_streams(&StdStreams::process(), debug, flags, sinks)
    }

    /// [`Facility::new`] over the given streams
    pub fn with_streams<I>(streams: &StdStreams, debug: bool, flags: Flags, sinks: I) -> Self
    where
        I: IntoIterator<Item = SharedWriter>,
    {
        let extra: Vec<SharedWriter> = sinks.into_iter().collect();
        let fan_out = |first: &SharedWriter| {
            let mut writers = Vec::with_capacity(extra.len() + 1);
            writers.push(first.clone());
            writers.extend(extra.iter().cloned());
            MultiWriter::new(writers)
        };

        Self {
            debug: debug.then(|| LeveledWriter::new(streams.stdout.clone(), DEBUG_PREFIX, flags)),
            info: LeveledWriter::new(fan_out(&streams.stdout), INFO_PREFIX, flags),
            error: LeveledWriter::new(fan_out(&streams.stderr), ERROR_PREFIX, flags),
        }
    }

    /// The writer behind `level`, if that channel exists
    pub fn channel(&self, level: Level) -> Option<&LeveledWriter> {
        match level {
            Level::Debug => self.debug.as_ref(),
            Level::Info => Some(&self.info),
            Level::Error => Some(&self.error),
        }
    }

    /// Whether the debug channel exists
    pub fn has_debug(&self) -> bool {
        self.debug.is_some()
    }

    /// Print-style line on `level`
    #[track_caller]
    pub fn print(&self, level: Level, args: &[Value<'_>]) {
        if let Some(writer) = self.channel(level) {
            writer.print(args);
        }
    }

    /// Printf-style line on `level`
    #[track_caller]
    pub fn printf(&self, level: Level, format: &str, args: &[Value<'_>]) {
        if let Some(writer) = self.channel(level) {
            writer.printf(format, args);
        }
    }

    /// Println-style line on `level`
    #[track_caller]
    pub fn println(&self, level: Level, args: &[Value<'_>]) {
        if let Some(writer) = self.channel(level) {
            writer.println(args);
        }
    }

    /// Replace the prefix of `level`
    pub fn set_prefix(&self, level: Level, prefix: &str) {
        if let Some(writer) = self.channel(level) {
            writer.set_prefix(prefix);
        }
    }

    #[track_caller]
    pub fn debug(&self, args: &[Value<'_>]) {
        self.print(Level::Debug, args);
    }

    #[track_caller]
    pub fn debugf(&self, format: &str, args: &[Value<'_>]) {
        self.printf(Level::Debug, format, args);
    }

    #[track_caller]
    pub fn debugln(&self, args: &[Value<'_>]) {
        self.println(Level::Debug, args);
    }

    #[track_caller]
    pub fn info(&self, args: &[Value<'_>]) {
        self.print(Level::Info, args);
    }

    #[track_caller]
    pub fn infof(&self, format: &str, args: &[Value<'_>]) {
        self.printf(Level::Info, format, args);
    }

    #[track_caller]
    pub fn infoln(&self, args: &[Value<'_>]) {
        self.println(Level::Info, args);
    }

    #[track_caller]
    pub fn error(&self, args: &[Value<'_>]) {
        self.print(Level::Error, args);
    }

    #[track_caller]
    pub fn errorf(&self, format: &str, args: &[Value<'_>]) {
        self.printf(Level::Error, format, args);
    }

    #[track_caller]
    pub fn errorln(&self, args: &[Value<'_>]) {
        self.println(Level::Error, args);
    }

    pub fn set_debug_prefix(&self, prefix: &str) {
        self.set_prefix(Level::Debug, prefix);
    }

    pub fn set_info_prefix(&self, prefix: &str) {
        self.set_prefix(Level::Info, prefix);
    }

    pub fn set_error_prefix(&self, prefix: &str) {
        self.set_prefix(Level::Error, prefix);
    }
}

impl Default for Facility {
    fn default() -> Self {
        Self::standard()
    }
}

impl fmt::Debug for Facility {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Facility")
            .field("debug", &self.debug)
            .field("info", &self.info)
            .field("error", &self.error)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sink::MemorySink;
    use crate::value::ToValue;
    use regex::Regex;

    struct Captured {
        stdout: MemorySink,
        stderr: MemorySink,
        streams: StdStreams,
    }

    fn captured() -> Captured {
        let stdout = MemorySink::new();
        let stderr = MemorySink::new();
        let streams = StdStreams::new(stdout.clone().into(), stderr.clone().into());
        Captured {
            stdout,
            stderr,
            streams,
        }
    }

    #[test]
    fn test_standard_channels() {
        let cap = captured();
        let facility = Facility::standard_with_streams(&cap.streams);

        assert!(!facility.has_debug());
        assert_eq!(facility.channel(Level::Info).unwrap().prefix(), INFO_PREFIX);
        assert_eq!(facility.channel(Level::Error).unwrap().prefix(), ERROR_PREFIX);
        assert_eq!(facility.channel(Level::Info).unwrap().flags(), Flags::STD);

        facility.info(&["Info".to_value()]);
        facility.error(&["Error".to_value()]);

        let info_re = Regex::new(r"^\[info\]  \d{4}/\d{2}/\d{2} \d{2}:\d{2}:\d{2} (.*)\n$").unwrap();
        let out = cap.stdout.contents();
        let caps = info_re.captures(&out).expect("info line shape");
        assert_eq!(&caps[1], "Info");

        let error_re = Regex::new(r"^\[error\] \d{4}/\d{2}/\d{2} \d{2}:\d{2}:\d{2} (.*)\n$").unwrap();
        let err = cap.stderr.contents();
        let caps = error_re.captures(&err).expect("error line shape");
        assert_eq!(&caps[1], "Error");
    }

    #[test]
    fn test_debug_absent_is_noop() {
        let cap = captured();
        let facility = Facility::with_streams(&cap.streams, false, Flags::empty(), []);

        assert!(facility.channel(Level::Debug).is_none());
        facility.debug(&["d".to_value()]);
        facility.debugf("%d", &[1i32.to_value()]);
        facility.debugln(&["d".to_value()]);
        facility.set_debug_prefix("ignored");

        assert!(cap.stdout.is_empty());
        assert!(cap.stderr.is_empty());
    }

    #[test]
    fn test_debug_goes_to_stdout_only() {
        let cap = captured();
        let file = MemorySink::new();
        let facility = Facility::with_streams(&cap.streams, true, Flags::empty(), [file.clone().into()]);

        facility.set_debug_prefix("");
        facility.debug(&["dbg".to_value()]);

        assert_eq!(cap.stdout.contents(), "dbg\n");
        assert!(cap.stderr.is_empty());
        assert!(file.is_empty());
    }

    #[test]
    fn test_extra_sinks_receive_info_and_error() {
        let cap = captured();
        let file = MemorySink::new();
        let facility = Facility::with_streams(&cap.streams, true, Flags::empty(), [file.clone().into()]);
        for level in [Level::Debug, Level::Info, Level::Error] {
            facility.set_prefix(level, "");
        }

        facility.infoln(&["Info test".to_value()]);
        facility.errorln(&["Error test".to_value()]);
        facility.debugln(&["Debug test".to_value()]);

        assert_eq!(cap.stdout.contents(), "Info test\nDebug test\n");
        assert_eq!(cap.stderr.contents(), "Error test\n");
        assert_eq!(file.contents(), "Info test\nError test\n");
    }

    #[test]
    fn test_prefixes_and_flags_from_constructor() {
        let cap = captured();
        let facility = Facility::with_streams(&cap.streams, true, Flags::SHORT_FILE, []);

        for level in [Level::Debug, Level::Info, Level::Error] {
            let writer = facility.channel(level).unwrap();
            assert_eq!(writer.prefix(), level.default_prefix());
            assert_eq!(writer.flags(), Flags::SHORT_FILE);
        }
    }

    #[test]
    fn test_write_variants() {
        let cap = captured();
        let facility = Facility::with_streams(&cap.streams, false, Flags::empty(), []);
        facility.set_info_prefix("");
        facility.set_error_prefix("E ");

        facility.info(&["a".to_value(), 1i32.to_value(), 2i32.to_value()]);
        facility.infof("%s=%v", &["k".to_value(), true.to_value()]);
        facility.infoln(&["x\n".to_value()]);
        facility.errorf("code %03d", &[7i32.to_value()]);

        assert_eq!(cap.stdout.contents(), "a1 2\nk=true\nx\n\n");
        assert_eq!(cap.stderr.contents(), "E code 007\n");
    }

    #[test]
    fn test_print_newline_rule_uses_whole_message() {
        let cap = captured();
        let facility = Facility::with_streams(&cap.streams, false, Flags::empty(), []);
        facility.set_info_prefix("");

        // Only the final character decides; an inner newline does not count
        facility.info(&["first\n".to_value(), "second".to_value()]);
        facility.info(&["first".to_value(), "second\n".to_value()]);

        assert_eq!(cap.stdout.contents(), "first\nsecond\nfirstsecond\n");
    }

    #[test]
    fn test_call_site_reported() {
        let cap = captured();
        let facility = Facility::with_streams(&cap.streams, false, Flags::SHORT_FILE, []);
        facility.set_info_prefix("");

        let line = line!() + 1;
        facility.info(&["here".to_value()]);

        assert_eq!(cap.stdout.contents(), format!("facility.rs:{}: here\n", line));
    }

    #[test]
    fn test_level_names() {
        assert_eq!(Level::Debug.to_string(), "debug");
        assert_eq!(Level::Info.as_str(), "info");
        assert_eq!(Level::Error.default_prefix(), "[error] ");
    }
}
