//! Test Fixtures
//!
//! Temp-dir backed configuration and history, and a shell wired to them.

use std::io::Write;
use std::path::PathBuf;
use std::sync::{Arc, Mutex};

use mosaicsh::config::PtyDimensions;
use mosaicsh::{
    Config, ConfigLoader, ConfigStore, Executor, HistoryRecorder, InteractivePolicy, Shell,
};
use tempfile::TempDir;

use super::RecordingLauncher;

/// In-memory writer whose contents stay readable after it is boxed
#[derive(Debug, Clone, Default)]
pub struct SharedBuffer(Arc<Mutex<Vec<u8>>>);

impl SharedBuffer {
    pub fn text(&self) -> String {
        String::from_utf8_lossy(&self.0.lock().unwrap()).into_owned()
    }

    pub fn clear(&self) {
        self.0.lock().unwrap().clear();
    }
}

impl Write for SharedBuffer {
    fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
        self.0.lock().unwrap().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> std::io::Result<()> {
        Ok(())
    }
}

/// A private directory holding one config file and one history file
pub struct TestEnv {
    pub dir: TempDir,
}

impl TestEnv {
    pub fn new() -> Self {
        Self {
            dir: TempDir::new().expect("temp dir"),
        }
    }

    pub fn config_path(&self) -> PathBuf {
        self.dir.path().join("config.toml")
    }

    pub fn history_path(&self) -> PathBuf {
        self.dir.path().join("history")
    }

    /// Write raw text to the config file
    pub fn write_config(&self, text: &str) {
        std::fs::write(self.config_path(), text).expect("write config");
    }

    pub fn read_config(&self) -> Config {
        ConfigLoader::new(self.config_path())
            .load()
            .expect("config parses")
    }

    pub fn history(&self) -> String {
        std::fs::read_to_string(self.history_path()).unwrap_or_default()
    }

    /// Store bound to this env's config file
    pub fn store(&self) -> ConfigStore {
        ConfigStore::open(ConfigLoader::new(self.config_path())).0
    }
}

/// Shell with file-backed config and history whose external commands go
/// to `launcher`; returns the shell plus its stdout and stderr buffers
pub fn build_shell(
    env: &TestEnv,
    launcher: &RecordingLauncher,
    interactive: &[&str],
) -> (Shell, SharedBuffer, SharedBuffer) {
    let executor = Executor::with_launcher(
        InteractivePolicy::new(interactive.iter().copied()),
        PtyDimensions::default(),
        Box::new(launcher.clone()),
    );
    let out = SharedBuffer::default();
    let err = SharedBuffer::default();
    let shell = Shell::with_executor(
        env.store(),
        executor,
        Some(HistoryRecorder::with_path(env.history_path())),
    )
    .with_output(Box::new(out.clone()), Box::new(err.clone()));
    (shell, out, err)
}
