//! One-directional byte relay between two descriptors
//!
//! A relay polls its source with a short timeout so it can notice the
//! shared stop flag without ever blocking in `read`. The output relay
//! drains what is already buffered once stopped; the input relay quits.

use std::io::{self, Read, Write};
use std::os::fd::BorrowedFd;
use std::sync::atomic::{AtomicBool, Ordering};

use nix::errno::Errno;
use nix::poll::{poll, PollFd, PollFlags, PollTimeout};

/// How long a relay sleeps in `poll` before re-checking the stop flag
const POLL_INTERVAL_MS: u16 = 50;

/// Upper bound on bytes copied after the stop flag is set
const DRAIN_LIMIT: usize = 1 << 20;

const BUFFER_SIZE: usize = 4096;

/// Why a relay returned
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RelayEnd {
    /// The source reached end-of-file (or the pty slave went away)
    SourceClosed,
    /// The stop flag was observed
    Stopped,
}

/// What a relay does once the stop flag is set
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OnStop {
    /// Return immediately
    Quit,
    /// Copy whatever is readable without waiting, then return
    Drain,
}

/// Copy bytes from `source` to `sink` until the source closes or `stop`
/// is set.
///
/// `source_fd` is polled for readiness and must refer to the same open
/// file as `source`. Each chunk is flushed to `sink` as soon as it is read.
pub fn pump(
    source_fd: BorrowedFd<'_>,
    source: &mut dyn Read,
    sink: &mut dyn Write,
    stop: &AtomicBool,
    on_stop: OnStop,
) -> io::Result<RelayEnd> {
    let mut buf = [0u8; BUFFER_SIZE];
    let mut drained = 0usize;

    loop {
        let stopping = stop.load(Ordering::Acquire);
        if stopping && (on_stop == OnStop::Quit || drained >= DRAIN_LIMIT) {
            return Ok(RelayEnd::Stopped);
        }

        let timeout = if stopping {
            PollTimeout::ZERO
        } else {
            PollTimeout::from(POLL_INTERVAL_MS)
        };
        let mut fds = [PollFd::new(source_fd, PollFlags::POLLIN)];
        match poll(&mut fds, timeout) {
            Ok(0) if stopping => return Ok(RelayEnd::Stopped),
            Ok(0) => continue,
            Ok(_) => {}
            Err(Errno::EINTR) => continue,
            Err(e) => return Err(e.into()),
        }

        let revents = fds[0].revents().unwrap_or_else(PollFlags::empty);
        if revents.contains(PollFlags::POLLNVAL) {
            return Ok(RelayEnd::SourceClosed);
        }

        let n = match source.read(&mut buf) {
            Ok(0) => return Ok(RelayEnd::SourceClosed),
            Ok(n) => n,
            Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
            Err(e) if e.kind() == io::ErrorKind::WouldBlock => continue,
            // Linux reports a closed pty slave as EIO on the master
            Err(e) if e.raw_os_error() == Some(Errno::EIO as i32) => {
                return Ok(RelayEnd::SourceClosed)
            }
            Err(e) => return Err(e),
        };

        sink.write_all(&buf[..n])?;
        sink.flush()?;
        if stopping {
            drained += n;
        }
    }
}
