//! Output destinations.
//!
//! Channels never own a bare `Write`: every destination is a [`SharedWriter`]
//! so the same file can sit behind both the info and the error channel
//! without their lines interleaving. Several destinations are combined with
//! [`MultiWriter`].

use std::fmt;
use std::io::{self, Write};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

/// Clonable, mutex-guarded handle to a writer.
///
/// Clones refer to the same underlying writer. Each `write_all` holds the
/// lock for the whole buffer, so concurrent lines never interleave.
#[derive(Clone)]
pub struct SharedWriter {
    inner: Arc<Mutex<dyn Write + Send>>,
}

impl SharedWriter {
    /// Wrap a writer
    pub fn new<W: Write + Send + 'static>(writer: W) -> Self {
        Self {
            inner: Arc::new(Mutex::new(writer)),
        }
    }

    /// Handle to the process standard output
    pub fn stdout() -> Self {
        Self::new(io::stdout())
    }

    /// Handle to the process standard error
    pub fn stderr() -> Self {
        Self::new(io::stderr())
    }

    fn lock(&self) -> MutexGuard<'_, dyn Write + Send + 'static> {
        // A writer that panicked mid-line is still usable for the next one
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl Write for SharedWriter {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.lock().write(buf)
    }

    fn write_all(&mut self, buf: &[u8]) -> io::Result<()> {
        self.lock().write_all(buf)
    }

    fn flush(&mut self) -> io::Result<()> {
        self.lock().flush()
    }
}

impl fmt::Debug for SharedWriter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SharedWriter")
            .field("ptr", &Arc::as_ptr(&self.inner).cast::<()>())
            .finish()
    }
}

impl From<std::fs::File> for SharedWriter {
    fn from(file: std::fs::File) -> Self {
        Self::new(file)
    }
}

impl From<MemorySink> for SharedWriter {
    fn from(sink: MemorySink) -> Self {
        Self::new(sink)
    }
}

/// Duplicates every write to an ordered list of destinations.
///
/// Delivery is best-effort: a destination that fails is skipped and the
/// remaining ones still receive the bytes. Failures are not reported.
#[derive(Debug, Clone, Default)]
pub struct MultiWriter {
    writers: Vec<SharedWriter>,
}

impl MultiWriter {
    /// Fan out to `writers`, in order
    pub fn new(writers: Vec<SharedWriter>) -> Self {
        Self { writers }
    }

    /// Append another destination
    pub fn push(&mut self, writer: SharedWriter) {
        self.writers.push(writer);
    }

    /// Destinations in write order
    pub fn writers(&self) -> &[SharedWriter] {
        &self.writers
    }
}

impl Write for MultiWriter {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.write_all(buf)?;
        Ok(buf.len())
    }

    fn write_all(&mut self, buf: &[u8]) -> io::Result<()> {
        for writer in &mut self.writers {
            let _ = writer.write_all(buf);
        }
        Ok(())
    }

    fn flush(&mut self) -> io::Result<()> {
        for writer in &mut self.writers {
            let _ = writer.flush();
        }
        Ok(())
    }
}

/// In-memory destination.
///
/// Clones share one buffer, so a clone handed to a facility can be read back
/// through the original.
#[derive(Debug, Clone, Default)]
pub struct MemorySink {
    buf: Arc<Mutex<Vec<u8>>>,
}

impl MemorySink {
    /// Create an empty sink
    pub fn new() -> Self {
        Self::default()
    }

    /// Everything written so far, lossily decoded as UTF-8
    pub fn contents(&self) -> String {
        String::from_utf8_lossy(&self.lock()).into_owned()
    }

    /// Return the contents and empty the buffer
    pub fn take(&self) -> String {
        let bytes = std::mem::take(&mut *self.lock());
        String::from_utf8_lossy(&bytes).into_owned()
    }

    /// Whether nothing has been written
    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    fn lock(&self) -> MutexGuard<'_, Vec<u8>> {
        self.buf.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl Write for MemorySink {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.lock().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

/// The standard-output and standard-error destinations a facility is built
/// over.
///
/// [`StdStreams::process`] is what the process-wide facade uses; tests and
/// embedders can substitute their own writers.
#[derive(Debug, Clone)]
pub struct StdStreams {
    /// Receives the info and debug channels
    pub stdout: SharedWriter,
    /// Receives the error channel
    pub stderr: SharedWriter,
}

impl StdStreams {
    /// Use the given writers in place of the process streams
    pub fn new(stdout: SharedWriter, stderr: SharedWriter) -> Self {
        Self { stdout, stderr }
    }

    /// The real process streams
    pub fn process() -> Self {
        Self::new(SharedWriter::stdout(), SharedWriter::stderr())
    }
}

impl Default for StdStreams {
    fn default() -> Self {
        Self::process()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::thread;

    struct FailingWriter;

    impl Write for FailingWriter {
        fn write(&mut self, _buf: &[u8]) -> io::Result<usize> {
            Err(io::Error::new(io::ErrorKind::BrokenPipe, "closed"))
        }

        fn flush(&mut self) -> io::Result<()> {
            Err(io::Error::new(io::ErrorKind::BrokenPipe, "closed"))
        }
    }

    #[test]
    fn test_memory_sink_clones_share_buffer() {
        let sink = MemorySink::new();
        let mut writer = sink.clone();
        writer.write_all(b"hello\n").unwrap();

        assert_eq!(sink.contents(), "hello\n");
        assert_eq!(sink.take(), "hello\n");
        assert!(sink.is_empty());
    }

    #[test]
    fn test_multi_writer_duplicates_in_order() {
        let first = MemorySink::new();
        let second = MemorySink::new();
        let mut multi = MultiWriter::new(vec![first.clone().into(), second.clone().into()]);

        multi.write_all(b"line\n").unwrap();
        multi.flush().unwrap();

        assert_eq!(first.contents(), "line\n");
        assert_eq!(second.contents(), "line\n");
        assert_eq!(multi.writers().len(), 2);
    }

    #[test]
    fn test_multi_writer_skips_failed_destination() {
        let after = MemorySink::new();
        let mut multi = MultiWriter::default();
        multi.push(SharedWriter::new(FailingWriter));
        multi.push(after.clone().into());

        assert_eq!(multi.write(b"still here\n").unwrap(), 11);
        assert!(multi.flush().is_ok());
        assert_eq!(after.contents(), "still here\n");
    }

    #[test]
    fn test_shared_writer_reports_own_failure() {
        let mut writer = SharedWriter::new(FailingWriter);
        let err = writer.write_all(b"x").unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::BrokenPipe);
    }

    #[test]
    fn test_shared_writer_serializes_whole_buffers() {
        let sink = MemorySink::new();
        let shared = SharedWriter::from(sink.clone());

        let handles: Vec<_> = (0..8u32)
            .map(|n| {
                let mut writer = shared.clone();
                thread::spawn(move || {
                    let line = format!("{}\n", n.to_string().repeat(64));
                    for _ in 0..50 {
                        writer.write_all(line.as_bytes()).unwrap();
                    }
                })
            })
            .collect();
        for handle in handles {
            handle.join().unwrap();
        }

        let contents = sink.contents();
        assert_eq!(contents.lines().count(), 400);
        for line in contents.lines() {
            assert_eq!(line.len(), 64);
            let first = line.chars().next().unwrap();
            assert!(line.chars().all(|c| c == first), "interleaved line: {}", line);
        }
    }

    #[test]
    fn test_poisoned_writer_still_writes() {
        let sink = MemorySink::new();
        let shared = SharedWriter::from(sink.clone());

        let poisoner = shared.clone();
        let _ = thread::spawn(move || {
            let _guard = poisoner.lock();
            panic!("poison the lock");
        })
        .join();

        let mut writer = shared.clone();
        writer.write_all(b"after panic\n").unwrap();
        assert_eq!(sink.contents(), "after panic\n");
    }
}
