//! `cd`

use std::path::{Path, PathBuf};

use super::{Builtin, BuiltinContext, BuiltinOutcome};
use crate::error::{Error, Result};

/// Change the working directory of the shell process
pub struct CdCommand;

impl Builtin for CdCommand {
    fn name(&self) -> &'static str {
        "cd"
    }

    fn usage(&self) -> &'static str {
        "cd [path]"
    }

    fn summary(&self) -> &'static str {
        "change directory; no path (or an empty one) goes home, ~ expands to home"
    }

    fn execute(&self, args: &[String], _ctx: &mut BuiltinContext<'_>) -> Result<BuiltinOutcome> {
        let home = dirs::home_dir();
        let target = match args.first().map(String::as_str) {
            None | Some("") => home
                .clone()
                .ok_or_else(|| Error::navigation("~", "home directory is unknown"))?,
            Some(path) => expand_home(path, home.as_deref())
                .ok_or_else(|| Error::navigation(path, "home directory is unknown"))?,
        };

        change_dir(&target)?;
        Ok(BuiltinOutcome::Continue)
    }
}

/// Expand a leading `~` or `~/` to `home`.
///
/// Paths that do not start with `~` come back unchanged; `~user` forms are
/// not expanded. Returns `None` when expansion is needed but `home` is
/// unknown.
pub fn expand_home(path: &str, home: Option<&Path>) -> Option<PathBuf> {
    if path == "~" {
        return home.map(Path::to_path_buf);
    }
    match path.strip_prefix("~/") {
        Some(rest) => home.map(|h| h.join(rest)),
        None => Some(PathBuf::from(path)),
    }
}

fn change_dir(target: &Path) -> Result<()> {
    let metadata = std::fs::metadata(target).map_err(|e| {
        let reason = match e.kind() {
            std::io::ErrorKind::NotFound => "no such file or directory".to_string(),
            std::io::ErrorKind::PermissionDenied => "permission denied".to_string(),
            _ => e.to_string(),
        };
        Error::navigation(target, reason)
    })?;

    if !metadata.is_dir() {
        return Err(Error::navigation(target, "not a directory"));
    }

    std::env::set_current_dir(target).map_err(|e| Error::navigation(target, e.to_string()))?;
    debug!("Changed directory to {}", target.display());
    Ok(())
}
