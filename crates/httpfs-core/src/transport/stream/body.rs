//! Streaming GET body over a libcurl easy handle.
//!
//! libcurl pushes body data through a callback, so the transfer runs on a
//! worker thread and hands chunks over a bounded channel. The reader pulls
//! them on demand; at most `CHANNEL_DEPTH` chunks are buffered.

use std::cell::{Cell, RefCell};
use std::io::{self, Read};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::mpsc::{self, Receiver, SyncSender};
use std::sync::Arc;
use std::thread::{self, JoinHandle};

use curl::easy::Easy;

use super::headers::HeaderCollector;
use crate::error::TransportError;
use crate::filesystem::{FileStream, StreamSource};
use crate::transport::Response;

const CHANNEL_DEPTH: usize = 16;

enum Frame {
    Head {
        status: u32,
        headers: Vec<(String, String)>,
    },
    Chunk(Vec<u8>),
    Done(Result<(), curl::Error>),
}

/// Starts the transfer and waits for the final response head.
pub(super) fn fetch(easy: Easy) -> Result<Response, TransportError> {
    let (tx, rx) = mpsc::sync_channel(CHANNEL_DEPTH);
    let cancelled = Arc::new(AtomicBool::new(false));
    let worker_cancelled = Arc::clone(&cancelled);

    let worker = thread::Builder::new()
        .name("httpfs-fetch".to_string())
        .spawn(move || run_transfer(easy, &tx, &worker_cancelled))?;

    let mut body = ChannelBody {
        rx: Some(rx),
        worker: Some(worker),
        cancelled,
        chunk: Vec::new(),
        pos: 0,
        done: false,
    };

    match body.recv() {
        Some(Frame::Head { status, headers }) => Ok(Response {
            status,
            headers,
            body: FileStream::new(body),
        }),
        Some(Frame::Done(Err(e))) => Err(TransportError::Curl(e)),
        Some(Frame::Done(Ok(()))) | Some(Frame::Chunk(_)) | None => Err(TransportError::Io(
            io::Error::new(io::ErrorKind::UnexpectedEof, "transfer ended before a response"),
        )),
    }
}

fn run_transfer(mut easy: Easy, tx: &SyncSender<Frame>, cancelled: &AtomicBool) {
    let collector = RefCell::new(HeaderCollector::default());
    let announced = Cell::new(false);

    // Sends the response head once; false when the reader is gone.
    let announce = || {
        if announced.replace(true) {
            return true;
        }
        let collector = collector.borrow();
        let head = Frame::Head {
            status: collector.status().unwrap_or(0),
            headers: collector.headers().to_vec(),
        };
        tx.send(head).is_ok()
    };

    let result = (|| {
        easy.progress(true)?;
        let mut transfer = easy.transfer();
        transfer.header_function(|data| {
            collector.borrow_mut().push(data);
            true
        })?;
        transfer.write_function(|data| {
            if !announce() || tx.send(Frame::Chunk(data.to_vec())).is_err() {
                // short write aborts the transfer
                return Ok(0);
            }
            Ok(data.len())
        })?;
        transfer.progress_function(|_, _, _, _| !cancelled.load(Ordering::Relaxed))?;
        transfer.perform()
    })();

    if !announced.get() && collector.borrow().status().is_some() && !announce() {
        return;
    }
    if let Err(e) = &result {
        tracing::debug!("GET transfer ended: {}", e);
    }
    let _ = tx.send(Frame::Done(result));
}

/// Reader side of a running transfer.
struct ChannelBody {
    rx: Option<Receiver<Frame>>,
    worker: Option<JoinHandle<()>>,
    cancelled: Arc<AtomicBool>,
    chunk: Vec<u8>,
    pos: usize,
    done: bool,
}

impl ChannelBody {
    fn recv(&mut self) -> Option<Frame> {
        self.rx.as_ref()?.recv().ok()
    }

    /// Failure already queued by the worker but not yet seen by the reader.
    ///
    /// Looks at most one channel's worth of frames ahead; unread chunks are
    /// discarded since the stream is being released.
    fn pending_failure(&mut self) -> Option<curl::Error> {
        if self.done {
            return None;
        }
        let rx = self.rx.as_ref()?;
        for _ in 0..=CHANNEL_DEPTH {
            match rx.try_recv() {
                Ok(Frame::Done(result)) => {
                    self.done = true;
                    return result.err();
                }
                Ok(_) => {}
                Err(_) => break,
            }
        }
        None
    }

    fn cancel(&mut self) {
        self.cancelled.store(true, Ordering::Relaxed);
        // the worker's next send fails and aborts the transfer
        self.rx.take();
    }
}

impl Read for ChannelBody {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        loop {
            if self.pos < self.chunk.len() {
                let n = buf.len().min(self.chunk.len() - self.pos);
                buf[..n].copy_from_slice(&self.chunk[self.pos..self.pos + n]);
                self.pos += n;
                return Ok(n);
            }
            if self.done || buf.is_empty() {
                return Ok(0);
            }
            match self.recv() {
                Some(Frame::Chunk(data)) => {
                    self.chunk = data;
                    self.pos = 0;
                }
                Some(Frame::Head { .. }) => {}
                Some(Frame::Done(Ok(()))) => self.done = true,
                Some(Frame::Done(Err(e))) => {
                    self.done = true;
                    return Err(io::Error::new(io::ErrorKind::Other, e));
                }
                None => {
                    self.done = true;
                    return Err(io::Error::new(
                        io::ErrorKind::UnexpectedEof,
                        "transfer stopped before the body was complete",
                    ));
                }
            }
        }
    }
}

impl StreamSource for ChannelBody {
    fn release(&mut self) -> io::Result<()> {
        let failure = self.pending_failure();
        self.cancel();
        if let Some(worker) = self.worker.take() {
            worker
                .join()
                .map_err(|_| io::Error::new(io::ErrorKind::Other, "transfer worker panicked"))?;
        }
        match failure {
            Some(e) => Err(io::Error::new(io::ErrorKind::Other, e)),
            None => Ok(()),
        }
    }
}

impl Drop for ChannelBody {
    fn drop(&mut self) {
        self.cancel();
    }
}
