// SPDX-License-Identifier: MIT
#![allow(unsafe_code)]
//
// Background input thread.
//
// The event loop must wake up on its refresh interval even when nobody
// types, so it never blocks in `read()` itself. A worker thread reads raw
// bytes and forwards them over a channel; the loop waits on the channel
// with `recv_timeout`, which doubles as the "poll for a key with a
// timeout" primitive.
//
// On unix the worker polls stdin in short slices and checks a stop flag
// between them, so dropping the reader joins the thread promptly instead
// of leaving it parked in a blocking read.

use std::io::{self, Read};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::mpsc::{self, Receiver, Sender};
use std::thread::{self, JoinHandle};

/// Bytes per read. Key presses are a handful of bytes each.
const CHUNK: usize = 1024;

/// Stop-flag check interval for the stdin worker, in milliseconds.
#[cfg(unix)]
const SLICE_MS: i32 = 50;

/// Handle to the input thread. Dropping it stops the thread.
///
/// ```no_run
/// use dayday_term::reader::StdinReader;
///
/// let (_reader, rx) = StdinReader::spawn().unwrap();
/// if let Ok(bytes) = rx.recv() {
///     println!("read {} bytes", bytes.len());
/// }
/// ```
pub struct StdinReader {
    handle: Option<JoinHandle<()>>,
    stop: Arc<AtomicBool>,
}

impl StdinReader {
    /// Start reading the process's stdin.
    ///
    /// The channel closes at EOF, on a read error, or once stopped.
    ///
    /// # Errors
    ///
    /// Returns the OS error if the thread cannot be spawned.
    pub fn spawn() -> io::Result<(Self, Receiver<Vec<u8>>)> {
        Self::start(|tx, stop| pump_stdin(&tx, &stop))
    }

    /// Start reading an arbitrary byte source with plain blocking reads.
    ///
    /// The stop flag is only checked between reads, so this suits sources
    /// that end on their own (pipes, files, in-memory cursors).
    ///
    /// # Errors
    ///
    /// Returns the OS error if the thread cannot be spawned.
    pub fn from_reader<R>(source: R) -> io::Result<(Self, Receiver<Vec<u8>>)>
    where
        R: Read + Send + 'static,
    {
        Self::start(move |tx, stop| pump(source, &tx, &stop))
    }

    fn start<F>(work: F) -> io::Result<(Self, Receiver<Vec<u8>>)>
    where
        F: FnOnce(Sender<Vec<u8>>, Arc<AtomicBool>) + Send + 'static,
    {
        let (tx, rx) = mpsc::channel();
        let stop = Arc::new(AtomicBool::new(false));
        let flag = Arc::clone(&stop);

        let handle = thread::Builder::new()
            .name("dayday-input".into())
            .spawn(move || work(tx, flag))?;

        Ok((
            Self {
                handle: Some(handle),
                stop,
            },
            rx,
        ))
    }

    /// Ask the thread to exit and wait for it. Safe to call twice.
    pub fn stop(&mut self) {
        self.stop.store(true, Ordering::Relaxed);
        if let Some(handle) = self.handle.take() {
            let _ = handle.join();
        }
    }
}

impl Drop for StdinReader {
    fn drop(&mut self) {
        self.stop();
    }
}

/// Blocking read loop over any source.
fn pump(mut source: impl Read, tx: &Sender<Vec<u8>>, stop: &AtomicBool) {
    let mut buf = [0u8; CHUNK];
    while !stop.load(Ordering::Relaxed) {
        match source.read(&mut buf) {
            Ok(0) => break,
            Ok(n) => {
                if tx.send(buf[..n].to_vec()).is_err() {
                    break;
                }
            }
            Err(e) if e.kind() == io::ErrorKind::Interrupted => {}
            Err(_) => break,
        }
    }
}

#[cfg(unix)]
fn pump_stdin(tx: &Sender<Vec<u8>>, stop: &AtomicBool) {
    use std::os::unix::io::AsRawFd;

    let fd = io::stdin().as_raw_fd();
    let mut buf = [0u8; CHUNK];

    while !stop.load(Ordering::Relaxed) {
        let mut pfd = libc::pollfd {
            fd,
            events: libc::POLLIN,
            revents: 0,
        };
        // SAFETY: `pfd` is a valid pollfd for the duration of the call.
        let ready = unsafe { libc::poll(&raw mut pfd, 1, SLICE_MS) };
        if ready <= 0 {
            continue;
        }

        // SAFETY: `buf` is writable for `buf.len()` bytes.
        let n = unsafe { libc::read(fd, buf.as_mut_ptr().cast(), buf.len()) };
        let Ok(n) = usize::try_from(n) else {
            break;
        };
        if n == 0 || tx.send(buf[..n].to_vec()).is_err() {
            break;
        }
    }
}

#[cfg(not(unix))]
fn pump_stdin(tx: &Sender<Vec<u8>>, stop: &AtomicBool) {
    pump(io::stdin(), tx, stop);
}

// ─── Tests ───────────────────────────────────────────────────────────────────
