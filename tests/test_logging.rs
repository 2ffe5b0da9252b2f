use leveled_log::logging::{self, LevelFilter};
use leveled_log::{Error, Facility, Flags, MemorySink, StdStreams};
use log::{debug, error, info, trace, warn};
use std::sync::{Mutex, MutexGuard, Once};

static SERIAL: Mutex<()> = Mutex::new(());
static BRIDGE: Once = Once::new();

struct Capture {
    stdout: MemorySink,
    stderr: MemorySink,
    _serial: MutexGuard<'static, ()>,
}

/// Install a facility over in-memory streams and make sure the bridge is up
fn setup(debug_channel: bool) -> Capture {
    let serial = SERIAL.lock().unwrap_or_else(|e| e.into_inner());

    let stdout = MemorySink::new();
    let stderr = MemorySink::new();
    let streams = StdStreams::new(stdout.clone().into(), stderr.clone().into());
    leveled_log::install(Facility::with_streams(&streams, debug_channel, Flags::empty(), []));

    BRIDGE.call_once(|| {
        logging::init(LevelFilter::Trace).expect("bridge installs once");
    });

    Capture {
        stdout,
        stderr,
        _serial: serial,
    }
}

/// Test that log records end up on the matching channels
#[test]
fn test_logging_works() {
    let cap = setup(true);

    trace!("This is a trace message");
    debug!("This is a debug message");
    info!("This is an info message");
    warn!("This is a warning message");
    error!("This is an error message");

    assert_eq!(
        cap.stdout.contents(),
        "[debug] This is a trace message\n\
         [debug] This is a debug message\n\
         [info]  This is an info message\n\
         [info]  This is a warning message\n"
    );

    assert_eq!(cap.stderr.contents(), "[error] This is an error message\n");
}

#[test]
fn test_bridge_install_writes_nothing() {
    let cap = setup(true);

    assert!(cap.stdout.is_empty(), "{:?}", cap.stdout.contents());
    assert!(cap.stderr.is_empty());
}

#[test]
fn test_debug_records_dropped_without_debug_channel() {
    let cap = setup(false);

    debug!("hidden");
    trace!("hidden too");
    info!("shown");

    assert_eq!(cap.stdout.contents(), "[info]  shown\n");
    assert!(cap.stderr.is_empty());
}

#[test]
fn test_record_location_is_used() {
    let cap = setup(false);
    leveled_log::current()
        .channel(leveled_log::Level::Info)
        .unwrap()
        .set_flags(Flags::SHORT_FILE);

    let line = line!() + 1;
    info!("located");

    assert_eq!(
        cap.stdout.contents(),
        format!("[info]  test_logging.rs:{}: located\n", line)
    );
}

#[test]
fn test_second_bridge_install_fails() {
    let _cap = setup(false);

    match logging::init(LevelFilter::Info) {
        Err(Error::Logger(_)) => {}
        other => panic!("expected logger error, got {:?}", other),
    }
}
