//! Raw mode for the controlling terminal

use std::os::fd::{AsFd, OwnedFd};

use nix::sys::termios::{cfmakeraw, tcgetattr, tcsetattr, SetArg, Termios};

use crate::error::{Error, Result};

/// Puts a terminal into raw mode and restores the saved attributes on drop.
///
/// While an interactive program runs, every keystroke (including Ctrl-C)
/// has to reach it through the pseudo-terminal instead of being handled by
/// the line discipline of the real terminal.
pub struct RawModeGuard {
    fd: OwnedFd,
    original: Termios,
}

impl RawModeGuard {
    /// Switch `fd` to raw mode
    pub fn enter(fd: impl AsFd) -> Result<Self> {
        let fd = fd
            .as_fd()
            .try_clone_to_owned()
            .map_err(|e| Error::io("can't duplicate terminal descriptor", e))?;

        let original = tcgetattr(&fd)
            .map_err(|e| Error::io("can't read terminal attributes", e.into()))?;
        let mut raw = original.clone();
        cfmakeraw(&mut raw);
        tcsetattr(&fd, SetArg::TCSANOW, &raw)
            .map_err(|e| Error::io("can't switch terminal to raw mode", e.into()))?;

        trace!("Terminal switched to raw mode");
        Ok(Self { fd, original })
    }
}

impl Drop for RawModeGuard {
    fn drop(&mut self) {
        match tcsetattr(&self.fd, SetArg::TCSADRAIN, &self.original) {
            Ok(()) => trace!("Terminal attributes restored"),
            Err(e) => error!("Failed to restore terminal attributes: {}", e),
        }
    }
}
