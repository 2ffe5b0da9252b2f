//! The process-wide facility.
//!
//! One [`Facility`] is current at any time. It is created lazily with
//! [`Facility::standard`] on first use and replaced wholesale by [`init`],
//! [`init_default`] or [`install`]. Replacement builds the new instance under
//! a process-wide lock and then swaps the pointer, so a concurrent write
//! sees either the old or the new facility, never a partial one. Writes do
//! not hold any global lock while formatting or writing.

use std::sync::{Arc, LazyLock, Mutex, MutexGuard, PoisonError, RwLock};

use crate::facility::Facility;
use crate::flags::Flags;
use crate::sink::SharedWriter;
use crate::value::Value;

static CURRENT: LazyLock<RwLock<Arc<Facility>>> =
    LazyLock::new(|| RwLock::new(Arc::new(Facility::standard())));

static REINIT: Mutex<()> = Mutex::new(());

/// The current facility
pub fn current() -> Arc<Facility> {
    Arc::clone(&CURRENT.read().unwrap_or_else(PoisonError::into_inner))
}

/// Build a facility with `build` while holding the re-initialization lock,
/// then make it current
pub(crate) fn replace_with(build: impl FnOnce() -> Facility) {
    let _guard = reinit_lock();
    let next = Arc::new(build());
    let previous = {
        let mut slot = CURRENT.write().unwrap_or_else(PoisonError::into_inner);
        std::mem::replace(&mut *slot, next)
    };
    // Writers still holding the old instance keep it alive until they finish
    drop(previous);
}

fn reinit_lock() -> MutexGuard<'static, ()> {
    REINIT.lock().unwrap_or_else(PoisonError::into_inner)
}

/// Reset to the default facility: info to stdout with `[info]  `, error to
/// stderr with `[error] `, date and time headers, no debug channel.
pub fn init_default() {
    replace_with(Facility::standard);
}

/// Replace the current facility.
///
/// Info lines go to stdout and then to each of `sinks`; error lines go to
/// stderr and then to each of `sinks`. With `debug`, a debug channel writing
/// to stdout is created; without it every `debug*` call is a no-op. All
/// channels use `flags`. Prefixes set on the previous facility are lost.
///
/// ```no_run
/// use leveled_log::{Flags, SharedWriter};
///
/// let file = std::fs::File::create("app.log").unwrap();
/// leveled_log::init(true, Flags::STD | Flags::SHORT_FILE, [SharedWriter::from(file)]);
/// leveled_log::infof!("listening on port %d", 8080);
/// ```
pub fn init<I>(debug: bool, flags: Flags, sinks: I)
where
    I: IntoIterator<Item = SharedWriter>,
{
    replace_with(|| Facility::new(debug, flags, sinks));
}

/// Make an already built facility current
pub fn install(facility: Facility) {
    replace_with(|| facility);
}

/// Print-style line on the debug channel, if present
#[track_caller]
pub fn debug(args: &[Value<'_>]) {
    current().debug(args);
}

/// Printf-style line on the debug channel, if present
#[track_caller]
pub fn debugf(format: &str, args: &[Value<'_>]) {
    current().debugf(format, args);
}

/// Println-style line on the debug channel, if present
#[track_caller]
pub fn debugln(args: &[Value<'_>]) {
    current().debugln(args);
}

/// Print-style line on the info channel
#[track_caller]
pub fn info(args: &[Value<'_>]) {
    current().info(args);
}

/// Printf-style line on the info channel
#[track_caller]
pub fn infof(format: &str, args: &[Value<'_>]) {
    current().infof(format, args);
}

/// Println-style line on the info channel
#[track_caller]
pub fn infoln(args: &[Value<'_>]) {
    current().infoln(args);
}

/// Print-style line on the error channel
#[track_caller]
pub fn error(args: &[Value<'_>]) {
    current().error(args);
}

/// Printf-style line on the error channel
#[track_caller]
pub fn errorf(format: &str, args: &[Value<'_>]) {
    current().errorf(format, args);
}

/// Println-style line on the error channel
#[track_caller]
pub fn errorln(args: &[Value<'_>]) {
    current().errorln(args);
}

/// Replace the debug channel prefix; no-op without a debug channel
pub fn set_debug_prefix(prefix: &str) {
    current().set_debug_prefix(prefix);
}

/// Replace the info channel prefix
pub fn set_info_prefix(prefix: &str) {
    current().set_info_prefix(prefix);
}

/// Replace the error channel prefix
pub fn set_error_prefix(prefix: &str) {
    current().set_error_prefix(prefix);
}
