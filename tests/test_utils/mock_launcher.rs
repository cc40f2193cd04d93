//! Launcher that records requests instead of spawning processes

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use mosaicsh::error::{Error, Result};
use mosaicsh::execution::{LaunchMode, LaunchRequest, Launcher};
use mosaicsh::ExitStatus;

/// Records every launch; programs answer with a configured exit code
/// (0 by default) or fail as "command not found" when marked missing
#[derive(Debug, Clone, Default)]
pub struct RecordingLauncher {
    requests: Arc<Mutex<Vec<LaunchRequest>>>,
    codes: Arc<Mutex<HashMap<String, i32>>>,
    missing: Arc<Mutex<Vec<String>>>,
}

impl RecordingLauncher {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make `program` exit with `code`
    pub fn exits_with(self, program: &str, code: i32) -> Self {
        self.codes.lock().unwrap().insert(program.to_string(), code);
        self
    }

    /// Make launching `program` fail
    pub fn missing(self, program: &str) -> Self {
        self.missing.lock().unwrap().push(program.to_string());
        self
    }

    pub fn requests(&self) -> Vec<LaunchRequest> {
        self.requests.lock().unwrap().clone()
    }

    /// Argument vectors launched so far
    pub fn argvs(&self) -> Vec<Vec<String>> {
        self.requests().into_iter().map(|r| r.argv).collect()
    }

    pub fn modes(&self) -> Vec<LaunchMode> {
        self.requests().into_iter().map(|r| r.mode).collect()
    }
}

#[async_trait]
impl Launcher for RecordingLauncher {
    async fn launch(&self, request: LaunchRequest) -> Result<ExitStatus> {
        let program = request.argv.first().cloned().unwrap_or_default();
        if self.missing.lock().unwrap().contains(&program) {
            return Err(Error::exec(program, "command not found"));
        }
        let code = self.codes.lock().unwrap().get(&program).copied().unwrap_or(0);
        self.requests.lock().unwrap().push(request);
        Ok(ExitStatus::new(code))
    }
}
