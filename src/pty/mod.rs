//! Pseudoterminal (PTY) execution
//!
//! Interactive programs (editors, pagers, remote shells) get a fresh
//! pseudo-terminal as their controlling terminal. The shell relays its own
//! stdin to the pty master and the master's output to its stdout for as
//! long as the child runs.

mod raw_mode;
mod relay;
mod session;

pub use raw_mode::RawModeGuard;
pub use relay::{pump, OnStop, RelayEnd};
pub use session::{locate_program, run_in_pty, run_with_streams, terminal_size, PtyStreams};
