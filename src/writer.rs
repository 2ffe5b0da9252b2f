//! A single leveled writer: prefix, flags and destination.

use std::fmt::{self, Write as _};
use std::io::Write;
use std::panic::Location;
use std::sync::{Mutex, MutexGuard, PoisonError};

use chrono::{DateTime, Local, TimeZone, Utc};

use crate::flags::Flags;
use crate::format::{sprint, sprintf, sprintln};
use crate::value::Value;
use crate::Result;

/// Source position reported by the `LONG_FILE` and `SHORT_FILE` flags.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Caller<'a> {
    /// Source file path as the compiler recorded it
    pub file: &'a str,
    /// 1-based line number
    pub line: u32,
}

impl Caller<'static> {
    /// Position of the nearest caller not marked `#[track_caller]`
    #[track_caller]
    pub fn here() -> Self {
        Location::caller().into()
    }
}

impl From<&'static Location<'static>> for Caller<'static> {
    fn from(location: &'static Location<'static>) -> Self {
        Self {
            file: location.file(),
            line: location.line(),
        }
    }
}

struct State {
    prefix: String,
    flags: Flags,
    out: Box<dyn Write + Send>,
}

/// Produces one line per call on its destination:
/// `<prefix><date> <time> <file:line: ><message>\n`.
///
/// All state sits behind one mutex which is held while the line is written,
/// so concurrent calls on the same writer never interleave.
pub struct LeveledWriter {
    state: Mutex<State>,
}

impl LeveledWriter {
    /// Create a writer over `out`
    pub fn new<W: Write + Send + 'static>(out: W, prefix: impl Into<String>, flags: Flags) -> Self {
        Self {
            state: Mutex::new(State {
                prefix: prefix.into(),
                flags,
                out: Box::new(out),
            }),
        }
    }

    /// Current prefix
    pub fn prefix(&self) -> String {
        self.lock().prefix.clone()
    }

    /// Replace the prefix for subsequent lines
    pub fn set_prefix(&self, prefix: &str) {
        let mut state = self.lock();
        state.prefix.clear();
        state.prefix.push_str(prefix);
    }

    /// Current flags
    pub fn flags(&self) -> Flags {
        self.lock().flags
    }

    /// Replace the flags for subsequent lines
    pub fn set_flags(&self, flags: Flags) {
        self.lock().flags = flags;
    }

    /// Write one line. A newline is appended unless `message` already ends
    /// in one.
    pub fn output(&self, caller: Caller<'_>, message: &str) -> Result<()> {
        let now = Utc::now();
        let mut state = self.lock();

        let mut line = String::with_capacity(state.prefix.len() + message.len() + 32);
        let msg_prefix = state.flags.contains(Flags::MSG_PREFIX);
        if !msg_prefix {
            line.push_str(&state.prefix);
        }
        write_header(&mut line, state.flags, now, caller);
        if msg_prefix {
            line.push_str(&state.prefix);
        }
        line.push_str(message);
        if !message.ends_with('\n') {
            line.push('\n');
        }

        state.out.write_all(line.as_bytes())?;
        Ok(())
    }

    /// Print-style line
    #[track_caller]
    pub fn print(&self, args: &[Value<'_>]) {
        let _ = self.output(Caller::here(), &sprint(args));
    }

    /// Printf-style line
    #[track_caller]
    pub fn printf(&self, format: &str, args: &[Value<'_>]) {
        let _ = self.output(Caller::here(), &sprintf(format, args));
    }

    /// Println-style line
    #[track_caller]
    pub fn println(&self, args: &[Value<'_>]) {
        let _ = self.output(Caller::here(), &sprintln(args));
    }

    fn lock(&self) -> MutexGuard<'_, State> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl fmt::Debug for LeveledWriter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let state = self.lock();
        f.debug_struct("LeveledWriter")
            .field("prefix", &state.prefix)
            .field("flags", &state.flags)
            .finish_non_exhaustive()
    }
}

fn write_header(line: &mut String, flags: Flags, now: DateTime<Utc>, caller: Caller<'_>) {
    if flags.has_timestamp() {
        if flags.contains(Flags::UTC) {
            write_timestamp(line, flags, &now);
        } else {
            write_timestamp(line, flags, &now.with_timezone(&Local));
        }
    }

    if flags.has_caller() {
        let file = if flags.contains(Flags::SHORT_FILE) {
            caller.file.rsplit(['/', '\\']).next().unwrap_or(caller.file)
        } else {
            caller.file
        };
        let _ = write!(line, "{}:{}: ", file, caller.line);
    }
}

fn write_timestamp<Tz: TimeZone>(line: &mut String, flags: Flags, t: &DateTime<Tz>)
where
    Tz::Offset: fmt::Display,
{
    if flags.contains(Flags::DATE) {
        let _ = write!(line, "{} ", t.format("%Y/%m/%d"));
    }
    if flags.intersects(Flags::TIME | Flags::MICROSECONDS) {
        let _ = write!(line, "{}", t.format("%H:%M:%S"));
        if flags.contains(Flags::MICROSECONDS) {
            let _ = write!(line, "{}", t.format("%.6f"));
        }
        line.push(' ');
    }
}
