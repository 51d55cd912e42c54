//! Asynchronous double-buffered writer
//!
//! [`AsyncWriter`] fills a fixed-size buffer on the caller's thread. A full
//! buffer is handed to one background worker, which performs the blocking
//! write, while the caller continues in a replacement buffer taken from a
//! small free list. The worker handles requests strictly in submission order,
//! so bytes reach the sink in the order they were written.
//!
//! The first sink error is latched as a sticky fault: every later `write` or
//! `flush` fails with that same error until [`AsyncWriter::reset`].
//!
//! ```
//! use rust_tree_logger::AsyncWriter;
//! use std::io::Write;
//!
//! let mut writer = AsyncWriter::new(std::io::sink(), 4096).unwrap();
//! writer.write_all(b"hello\n").unwrap();
//! writer.flush().unwrap();
//! writer.close().unwrap();
//! ```

use super::error::{LoggerError, Result};
use arc_swap::ArcSwapOption;
use crossbeam_channel::{bounded, Receiver, RecvTimeoutError, Sender};
use parking_lot::Mutex;
use std::io::{self, Write};
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};

/// Pending flush requests before `write` blocks the caller
pub const REQUEST_QUEUE_CAPACITY: usize = 128;

/// Written buffers kept for reuse; extras are dropped
pub const FREE_LIST_CAPACITY: usize = 128;

/// How long `Drop` waits for the worker to drain
pub const DEFAULT_SHUTDOWN_TIMEOUT: Duration = Duration::from_secs(5);

type SharedSink = Arc<Mutex<Box<dyn Write + Send>>>;
type Fault = Arc<ArcSwapOption<io::Error>>;

struct FlushRequest {
    data: Option<(Vec<u8>, SharedSink)>,
    done: Option<Sender<()>>,
}

struct Worker {
    requests: Receiver<FlushRequest>,
    free: Sender<Vec<u8>>,
    fault: Fault,
}

impl Worker {
    fn run(self) {
        let Self {
            requests,
            free,
            fault,
        } = self;

        while let Ok(request) = requests.recv() {
            if let Some((mut buf, sink)) = request.data {
                if !buf.is_empty() {
                    // write_all reports a zero-length write as WriteZero
                    match sink.lock().write_all(&buf) {
                        Ok(()) => {
                            buf.clear();
                            let _ = free.try_send(buf);
                        }
                        Err(e) => latch(&fault, e),
                    }
                }
            }
            if let Some(done) = request.done {
                let _ = done.send(());
            }
        }
    }
}

/// Store `err` unless a fault is already latched.
fn latch(fault: &ArcSwapOption<io::Error>, err: io::Error) {
    let err = Arc::new(err);
    fault.rcu(|current| match current {
        Some(existing) => Some(Arc::clone(existing)),
        None => Some(Arc::clone(&err)),
    });
}

/// Buffering writer that hands full buffers to a background thread.
pub struct AsyncWriter {
    buf: Vec<u8>,
    size: usize,
    sink: SharedSink,
    fault: Fault,
    requests: Option<Sender<FlushRequest>>,
    free: Receiver<Vec<u8>>,
    handle: Option<JoinHandle<()>>,
    submitted: u64,
}

impl AsyncWriter {
    /// Start a writer with a `size`-byte buffer in front of `sink`.
    ///
    /// A `size` of zero is treated as one byte.
    ///
    /// # Errors
    ///
    /// Returns an IO error if the worker thread cannot be spawned.
    pub fn new<W: Write + Send + 'static>(sink: W, size: usize) -> Result<Self> {
        let size = size.max(1);
        let (requests, receiver) = bounded(REQUEST_QUEUE_CAPACITY);
        let (free_sender, free) = bounded(FREE_LIST_CAPACITY);
        let fault: Fault = Arc::new(ArcSwapOption::empty());

        let worker = Worker {
            requests: receiver,
            free: free_sender,
            fault: Arc::clone(&fault),
        };
        let handle = thread::Builder::new()
            .name("logger-aio".to_string())
            .spawn(move || worker.run())
            .map_err(|e| LoggerError::io_operation("starting writer", "cannot spawn worker thread", e))?;

        Ok(Self {
            buf: Vec::with_capacity(size),
            size,
            sink: Arc::new(Mutex::new(Box::new(sink))),
            fault,
            requests: Some(requests),
            free,
            handle: Some(handle),
            submitted: 0,
        })
    }

    /// Bytes that still fit in the active buffer
    pub fn available(&self) -> usize {
        self.size - self.buf.len()
    }

    /// Bytes written into the active buffer and not yet handed off
    pub fn buffered(&self) -> usize {
        self.buf.len()
    }

    pub fn capacity(&self) -> usize {
        self.size
    }

    /// Flush requests handed to the worker so far
    pub fn submitted_requests(&self) -> u64 {
        self.submitted
    }

    /// The latched fault, if any
    pub fn fault(&self) -> Option<Arc<io::Error>> {
        self.fault.load_full()
    }

    fn check(&self) -> Result<()> {
        match self.fault.load_full() {
            Some(fault) => Err(LoggerError::WriterFault(fault)),
            None => Ok(()),
        }
    }

    /// Buffer `data`, handing every buffer that fills up to the worker.
    ///
    /// Blocks only when the request queue is full. A fault latched partway
    /// through is returned as an error even though a prefix of `data` was
    /// already handed off; the [`io::Write`] impl reports that prefix as a
    /// short write instead.
    pub fn write(&mut self, data: &[u8]) -> Result<usize> {
        let (written, outcome) = self.write_some(data);
        outcome.map(|()| written)
    }

    /// Bytes of `data` taken before a fault or close stopped the writer,
    /// together with that failure.
    fn write_some(&mut self, mut data: &[u8]) -> (usize, Result<()>) {
        let mut written = 0;
        while data.len() > self.available() && self.fault.load().is_none() {
            let n = self.available();
            self.buf.extend_from_slice(&data[..n]);
            if let Err(e) = self.submit(None) {
                return (written, Err(e));
            }
            written += n;
            data = &data[n..];
        }
        if let Err(e) = self.check() {
            return (written, Err(e));
        }

        self.buf.extend_from_slice(data);
        (written + data.len(), Ok(()))
    }

    /// Hand the active buffer to the worker and wait until it has been
    /// passed to the sink.
    pub fn flush(&mut self) -> Result<()> {
        self.check()?;
        let done = self.submit_with_signal()?;
        if done.recv().is_err() {
            return Err(LoggerError::WriterClosed);
        }
        self.check()
    }

    /// Like [`flush`](Self::flush) but gives up waiting after `timeout`.
    ///
    /// The buffer has been handed off either way; a timeout only means the
    /// worker has not confirmed it yet.
    pub fn flush_timeout(&mut self, timeout: Duration) -> Result<()> {
        self.check()?;
        let done = self.submit_with_signal()?;
        match done.recv_timeout(timeout) {
            Ok(()) => self.check(),
            Err(RecvTimeoutError::Timeout) => Err(LoggerError::FlushTimeout(timeout)),
            Err(RecvTimeoutError::Disconnected) => Err(LoggerError::WriterClosed),
        }
    }

    /// Discard buffered data, clear the fault and write to `sink` from now on.
    ///
    /// Requests already queued still go to the previous sink.
    pub fn reset<W: Write + Send + 'static>(&mut self, sink: W) {
        self.fault.store(None);
        self.buf.clear();
        self.sink = Arc::new(Mutex::new(Box::new(sink)));
    }

    /// Flush, then stop and join the worker.
    ///
    /// Calling `close` again is a no-op. Writes after `close` fail with
    /// `WriterClosed`.
    pub fn close(&mut self) -> Result<()> {
        if self.requests.is_none() {
            return Ok(());
        }
        let flushed = self.flush();

        drop(self.requests.take());
        if let Some(handle) = self.handle.take() {
            if handle.join().is_err() {
                eprintln!("[LOGGER ERROR] Writer worker thread panicked during shutdown");
            }
        }
        flushed
    }

    fn submit_with_signal(&mut self) -> Result<Receiver<()>> {
        let (done, signal) = bounded(1);
        self.submit(Some(done))?;
        Ok(signal)
    }

    fn submit(&mut self, done: Option<Sender<()>>) -> Result<()> {
        let requests = self.requests.as_ref().ok_or(LoggerError::WriterClosed)?;
        let data = if self.buf.is_empty() {
            None
        } else {
            let replacement = self.fresh_buffer();
            let filled = std::mem::replace(&mut self.buf, replacement);
            Some((filled, Arc::clone(&self.sink)))
        };

        requests
            .send(FlushRequest { data, done })
            .map_err(|_| LoggerError::WriterClosed)?;
        self.submitted += 1;
        Ok(())
    }

    fn fresh_buffer(&self) -> Vec<u8> {
        match self.free.try_recv() {
            Ok(mut buf) => {
                buf.clear();
                buf
            }
            Err(_) => Vec::with_capacity(self.size),
        }
    }
}

impl Write for AsyncWriter {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        match self.write_some(buf) {
            (0, Err(e)) => Err(io::Error::from(e)),
            (written, _) => Ok(written),
        }
    }

    fn flush(&mut self) -> io::Result<()> {
        AsyncWriter::flush(self).map_err(io::Error::from)
    }
}

impl Drop for AsyncWriter {
    fn drop(&mut self) {
        let Some(requests) = self.requests.take() else {
            return;
        };

        // Best effort: pass on what is buffered, then let the worker drain.
        if !self.buf.is_empty() && self.fault.load().is_none() {
            let filled = std::mem::take(&mut self.buf);
            let _ = requests.send(FlushRequest {
                data: Some((filled, Arc::clone(&self.sink))),
                done: None,
            });
        }
        drop(requests);

        if let Some(handle) = self.handle.take() {
            let start = Instant::now();
            loop {
                if handle.is_finished() {
                    if handle.join().is_err() {
                        eprintln!("[LOGGER ERROR] Writer worker thread panicked during shutdown");
                    }
                    break;
                }
                if start.elapsed() >= DEFAULT_SHUTDOWN_TIMEOUT {
                    eprintln!(
                        "[LOGGER WARNING] Writer worker did not finish within {:?}. \
                         Buffered output may be lost.",
                        DEFAULT_SHUTDOWN_TIMEOUT
                    );
                    break;
                }
                thread::sleep(Duration::from_millis(10));
            }
        }
    }
}
