//! Running one program on a fresh pseudo-terminal

use std::fs::File;
use std::io::{self, IsTerminal, Write};
use std::os::fd::{AsFd, BorrowedFd};
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};

use nix::sys::termios::{self, SpecialCharacterIndices};
use portable_pty::{native_pty_system, CommandBuilder, PtyPair, PtySize};

use super::raw_mode::RawModeGuard;
use super::relay::{pump, OnStop, RelayEnd};
use crate::config::PtyDimensions;
use crate::error::{Error, Result};
use crate::execution::ExitStatus;

const CTRL_D: u8 = 0x04;

nix::ioctl_read_bad!(tiocgwinsz, nix::libc::TIOCGWINSZ, nix::libc::winsize);

/// Size of the terminal behind `fd`, if it is one
pub fn terminal_size(fd: BorrowedFd<'_>) -> Option<PtyDimensions> {
    use std::os::fd::AsRawFd;

    let mut size = nix::libc::winsize {
        ws_row: 0,
        ws_col: 0,
        ws_xpixel: 0,
        ws_ypixel: 0,
    };
    // SAFETY: TIOCGWINSZ only writes into the winsize passed to it
    unsafe { tiocgwinsz(fd.as_raw_fd(), &mut size) }.ok()?;

    (size.ws_row > 0 && size.ws_col > 0).then_some(PtyDimensions {
        rows: size.ws_row,
        cols: size.ws_col,
    })
}

/// Find `program` the way `execvp` would: a name containing `/` is used as
/// a path, anything else is searched for on `PATH`.
///
/// A program that exists but can't be executed is reported as
/// `permission denied`, anything else missing as `command not found`.
pub fn locate_program(program: &str) -> Result<PathBuf> {
    use std::os::unix::fs::PermissionsExt;

    if program.is_empty() {
        return Err(Error::exec(program, "command not found"));
    }

    let executable = |path: &Path| match path.metadata() {
        Ok(m) if m.is_file() && m.permissions().mode() & 0o111 != 0 => Some(true),
        Ok(_) => Some(false),
        Err(_) => None,
    };

    if program.contains('/') {
        let path = PathBuf::from(program);
        return match executable(&path) {
            Some(true) => Ok(path),
            Some(false) => Err(Error::exec(program, "permission denied")),
            None => Err(Error::exec(program, "command not found")),
        };
    }

    let mut denied = false;
    if let Some(search) = std::env::var_os("PATH") {
        for candidate in std::env::split_paths(&search).map(|dir| dir.join(program)) {
            match executable(&candidate) {
                Some(true) => return Ok(candidate),
                Some(false) => denied = true,
                None => {}
            }
        }
    }

    if denied {
        Err(Error::exec(program, "permission denied"))
    } else {
        Err(Error::exec(program, "command not found"))
    }
}

/// The two ends of the real terminal an interactive program is attached to
#[derive(Debug)]
pub struct PtyStreams {
    /// Copied to the pseudo-terminal
    pub input: File,
    /// Receives everything the program writes to the pseudo-terminal
    pub output: File,
}

impl PtyStreams {
    /// Duplicates of the shell's own stdin and stdout
    pub fn stdio() -> Result<Self> {
        let input = std::io::stdin()
            .as_fd()
            .try_clone_to_owned()
            .map(File::from)
            .map_err(|e| Error::io("can't duplicate stdin", e))?;
        let output = std::io::stdout()
            .as_fd()
            .try_clone_to_owned()
            .map(File::from)
            .map_err(|e| Error::io("can't duplicate stdout", e))?;
        Ok(Self { input, output })
    }
}

/// Writer that remembers whether the last byte it passed on ended a line
struct LineTracking<W> {
    inner: W,
    at_line_start: bool,
}

impl<W: Write> LineTracking<W> {
    fn new(inner: W) -> Self {
        Self {
            inner,
            at_line_start: true,
        }
    }

    /// Signal end-of-file to the canonical-mode reader on the other side.
    ///
    /// The first EOF character hands a pending partial line to the reader,
    /// so it takes a second one for the reader to see end-of-file.
    fn send_eof(&mut self, eof: u8) -> io::Result<()> {
        if self.at_line_start {
            self.inner.write_all(&[eof])?;
        } else {
            self.inner.write_all(&[eof, eof])?;
        }
        self.at_line_start = true;
        self.inner.flush()
    }
}

impl<W: Write> Write for LineTracking<W> {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        let n = self.inner.write(buf)?;
        if n > 0 {
            self.at_line_start = buf[n - 1] == b'\n';
        }
        Ok(n)
    }

    fn flush(&mut self) -> io::Result<()> {
        self.inner.flush()
    }
}

/// The terminal's end-of-file character, `^D` unless configured otherwise
fn eof_char(fd: BorrowedFd<'_>) -> u8 {
    match termios::tcgetattr(fd) {
        Ok(attrs) => match attrs.control_chars[SpecialCharacterIndices::VEOF as usize] {
            0 => CTRL_D,
            c => c,
        },
        Err(_) => CTRL_D,
    }
}

/// Run `command` on a pseudo-terminal attached to the shell's own stdin
/// and stdout.
pub fn run_in_pty(command: &[String], cwd: &Path, fallback: PtyDimensions) -> Result<ExitStatus> {
    run_with_streams(command, cwd, fallback, PtyStreams::stdio()?)
}

/// Run `command` with a pseudo-terminal as its controlling terminal.
///
/// The real terminal is put into raw mode (when `streams.input` is one)
/// and two relays copy the input to the pty master and the master to the
/// output until the child has been reaped. Both relays have returned when
/// this does. End of input reaches the child as the terminal's EOF
/// character; nothing else is written to the pty.
pub fn run_with_streams(
    command: &[String],
    cwd: &Path,
    fallback: PtyDimensions,
    streams: PtyStreams,
) -> Result<ExitStatus> {
    let (program, args) = command
        .split_first()
        .ok_or_else(|| Error::exec("", "empty command"))?;
    let resolved = locate_program(program)?;

    let PtyStreams { input, output } = streams;
    let dims = terminal_size(output.as_fd())
        .or_else(|| terminal_size(input.as_fd()))
        .unwrap_or_else(|| fallback.with_env_overrides());

    let PtyPair { master, slave } = native_pty_system()
        .openpty(PtySize {
            rows: dims.rows,
            cols: dims.cols,
            pixel_width: 0,
            pixel_height: 0,
        })
        .map_err(|e| Error::exec(program, format!("can't allocate pseudo-terminal: {}", e)))?;

    let mut builder = CommandBuilder::new(program);
    builder.args(args);
    builder.cwd(cwd);

    let mut child = slave
        .spawn_command(builder)
        .map_err(|e| Error::exec(program, e.to_string()))?;
    // Only the child may hold the slave, otherwise the master never sees
    // the hangup when the child exits
    drop(slave);

    debug!(
        "Spawned '{}' (pid {:?}) on a {}x{} pty",
        resolved.display(),
        child.process_id(),
        dims.cols,
        dims.rows
    );

    let mut master_reader = master
        .try_clone_reader()
        .map_err(|e| Error::exec(program, format!("can't read from pseudo-terminal: {}", e)))?;
    // Lives until the child is reaped: dropping it writes into the pty
    let mut pty_input = LineTracking::new(
        master
            .take_writer()
            .map_err(|e| Error::exec(program, format!("can't write to pseudo-terminal: {}", e)))?,
    );
    let master_fd = master
        .as_raw_fd()
        .ok_or_else(|| Error::exec(program, "pseudo-terminal has no descriptor"))?;

    let _raw_mode = if input.is_terminal() {
        match RawModeGuard::enter(&input) {
            Ok(guard) => Some(guard),
            Err(e) => {
                warn!("Running '{}' without raw mode: {}", program, e);
                None
            }
        }
    } else {
        None
    };

    // Anything still buffered in the std handle must land before the
    // child's output
    let _ = std::io::stdout().flush();

    let stop = AtomicBool::new(false);
    let waited = std::thread::scope(|scope| {
        let stop = &stop;
        let pty_input = &mut pty_input;
        // SAFETY: `master` owns this descriptor and outlives the scope
        let pty_fd = unsafe { BorrowedFd::borrow_raw(master_fd) };

        let relay_out = scope.spawn(move || {
            let mut sink = &output;
            let end = pump(pty_fd, &mut master_reader, &mut sink, stop, OnStop::Drain);
            stop.store(true, Ordering::Release);
            end
        });

        let relay_in = scope.spawn(move || {
            let end = pump(input.as_fd(), &mut &input, &mut *pty_input, stop, OnStop::Quit);
            match end {
                Ok(RelayEnd::SourceClosed) => pty_input.send_eof(eof_char(pty_fd))?,
                Ok(RelayEnd::Stopped) => {}
                Err(_) => stop.store(true, Ordering::Release),
            }
            end
        });

        let waited = child.wait();
        stop.store(true, Ordering::Release);

        for (name, relay) in [("output", relay_out), ("input", relay_in)] {
            match relay.join() {
                Ok(Ok(RelayEnd::SourceClosed)) => trace!("{} relay: source closed", name),
                Ok(Ok(RelayEnd::Stopped)) => trace!("{} relay: stopped", name),
                Ok(Err(e)) => debug!("{} relay failed: {}", name, e),
                Err(_) => error!("{} relay panicked", name),
            }
        }
        waited
    });

    let status = waited.map_err(|e| Error::exec(program, format!("wait failed: {}", e)))?;
    if let Some(signal) = status.signal() {
        return Err(Error::exec(program, format!("terminated by signal: {}", signal)));
    }

    Ok(ExitStatus::new(status.exit_code() as i32))
}
