//! External command execution
//!
//! Every command that is not a builtin ends up here. The executor picks a
//! launch mode from the program name alone: programs on the interactive
//! list run on a pseudo-terminal, everything else inherits the shell's
//! stdin, stdout and stderr. Either way the shell waits for the child.

use std::collections::BTreeSet;
use std::fmt;
use std::path::{Path, PathBuf};
use std::process::Stdio;

use async_trait::async_trait;
use tokio::process::Command;

use crate::config::{Config, PtyDimensions};
use crate::error::{Error, Result};

/// Exit code of a child that terminated normally
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExitStatus {
    pub code: i32,
}

impl ExitStatus {
    pub fn new(code: i32) -> Self {
        Self { code }
    }

    pub fn success(&self) -> bool {
        self.code == 0
    }
}

impl fmt::Display for ExitStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "exit status {}", self.code)
    }
}

/// How a child's I/O is connected
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LaunchMode {
    /// Inherit the shell's standard streams
    Direct,
    /// Run on a pseudo-terminal with relayed I/O
    Interactive,
}

/// The set of program names that need a controlling terminal
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct InteractivePolicy {
    programs: BTreeSet<String>,
}

impl InteractivePolicy {
    pub fn new<I, S>(programs: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            programs: programs.into_iter().map(Into::into).collect(),
        }
    }

    /// Policy from the configured interactive command list
    pub fn from_config(config: &Config) -> Self {
        Self::new(config.interactive_commands.iter().cloned())
    }

    /// Launch mode for `program`; a path counts by its file name, so
    /// `/usr/bin/vim` is as interactive as `vim`
    pub fn classify(&self, program: &str) -> LaunchMode {
        let name = Path::new(program)
            .file_name()
            .and_then(|name| name.to_str())
            .unwrap_or(program);

        if self.programs.contains(name) {
            LaunchMode::Interactive
        } else {
            LaunchMode::Direct
        }
    }

    pub fn programs(&self) -> impl Iterator<Item = &str> {
        self.programs.iter().map(String::as_str)
    }
}

/// Everything a launcher needs to start one command
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LaunchRequest {
    pub argv: Vec<String>,
    pub cwd: PathBuf,
    pub mode: LaunchMode,
    pub pty_size: PtyDimensions,
}

/// Starts a child process and waits for it
#[async_trait]
pub trait Launcher: Send + Sync {
    async fn launch(&self, request: LaunchRequest) -> Result<ExitStatus>;
}

/// Launches real processes
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemLauncher;

#[async_trait]
impl Launcher for SystemLauncher {
    async fn launch(&self, request: LaunchRequest) -> Result<ExitStatus> {
        match request.mode {
            LaunchMode::Direct => run_direct(&request.argv, &request.cwd).await,
            LaunchMode::Interactive => {
                let LaunchRequest {
                    argv,
                    cwd,
                    pty_size,
                    ..
                } = request;
                let program = argv.first().cloned().unwrap_or_default();
                // The relays block on poll/read, so they stay off the runtime
                tokio::task::spawn_blocking(move || crate::pty::run_in_pty(&argv, &cwd, pty_size))
                    .await
                    .map_err(|e| Error::exec(program, format!("pty session failed: {}", e)))?
            }
        }
    }
}

/// Spawn `argv` with inherited standard streams and wait for it
async fn run_direct(argv: &[String], cwd: &Path) -> Result<ExitStatus> {
    let (program, args) = argv
        .split_first()
        .ok_or_else(|| Error::exec("", "empty command"))?;

    let mut child = Command::new(program)
        .args(args)
        .current_dir(cwd)
        .stdin(Stdio::inherit())
        .stdout(Stdio::inherit())
        .stderr(Stdio::inherit())
        .spawn()
        .map_err(|e| launch_error(program, e))?;

    debug!("Spawned '{}' (pid {:?})", program, child.id());

    let status = child
        .wait()
        .await
        .map_err(|e| Error::exec(program, format!("wait failed: {}", e)))?;

    translate_status(program, status)
}

/// Map a spawn failure onto a message a shell user expects
fn launch_error(program: &str, error: std::io::Error) -> Error {
    match error.kind() {
        std::io::ErrorKind::NotFound => Error::exec(program, "command not found"),
        std::io::ErrorKind::PermissionDenied => Error::exec(program, "permission denied"),
        _ => Error::exec(program, error.to_string()),
    }
}

fn translate_status(program: &str, status: std::process::ExitStatus) -> Result<ExitStatus> {
    use std::os::unix::process::ExitStatusExt;

    if let Some(code) = status.code() {
        return Ok(ExitStatus::new(code));
    }

    let reason = match status.signal() {
        Some(signo) => match nix::sys::signal::Signal::try_from(signo) {
            Ok(signal) => format!("terminated by signal {}", signal.as_str()),
            Err(_) => format!("terminated by signal {}", signo),
        },
        None => "terminated abnormally".to_string(),
    };
    Err(Error::exec(program, reason))
}

/// Runs non-builtin commands
pub struct Executor {
    policy: InteractivePolicy,
    launcher: Box<dyn Launcher>,
    pty_size: PtyDimensions,
}

impl Executor {
    /// Executor that launches real processes
    pub fn new(policy: InteractivePolicy, pty_size: PtyDimensions) -> Self {
        Self::with_launcher(policy, pty_size, Box::new(SystemLauncher))
    }

    pub fn with_launcher(
        policy: InteractivePolicy,
        pty_size: PtyDimensions,
        launcher: Box<dyn Launcher>,
    ) -> Self {
        Self {
            policy,
            launcher,
            pty_size,
        }
    }

    /// Executor configured from `config`
    pub fn from_config(config: &Config) -> Self {
        Self::new(InteractivePolicy::from_config(config), config.pty)
    }

    pub fn policy(&self) -> &InteractivePolicy {
        &self.policy
    }

    /// Launch mode `tokens` would run in
    pub fn classify(&self, tokens: &[String]) -> Option<LaunchMode> {
        tokens.first().map(|program| self.policy.classify(program))
    }

    /// Run `tokens` (non-empty, not a builtin) in the current directory
    /// and wait for it to finish
    pub async fn run(&self, tokens: &[String]) -> Result<ExitStatus> {
        let mode = self
            .classify(tokens)
            .ok_or_else(|| Error::exec("", "empty command"))?;
        let cwd = std::env::current_dir()
            .map_err(|e| Error::io("can't determine current directory", e))?;

        info!("Running {:?} in {:?} mode", tokens, mode);
        let status = self
            .launcher
            .launch(LaunchRequest {
                argv: tokens.to_vec(),
                cwd,
                mode,
                pty_size: self.pty_size,
            })
            .await?;
        debug!("'{}' finished with {}", tokens[0], status);
        Ok(status)
    }
}
