//! Prompt Formatting
//!
//! Renders the prompt template by literal substitution of `{dir}`,
//! `{time}`, `{date}`, `{shell}` and `{version}`. Anything else in braces
//! is left as written. Rendering never fails.

use std::path::{Path, PathBuf};

use chrono::Local;

use crate::ansi;

/// Placeholders understood by [`render`], with a short description each
pub const PLACEHOLDERS: &[(&str, &str)] = &[
    ("{dir}", "current directory, with the home directory shown as ~"),
    ("{time}", "local time, HH:MM:SS"),
    ("{date}", "local date, YYYY-MM-DD"),
    ("{shell}", "shell name"),
    ("{version}", "shell version"),
];

/// Live values substituted into the prompt
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PromptState {
    pub cwd: PathBuf,
    pub home: Option<PathBuf>,
    pub time: String,
    pub date: String,
    pub shell_name: String,
    pub version: String,
}

impl PromptState {
    /// Snapshot of the process state right now
    pub fn capture() -> Self {
        let now = Local::now();
        Self {
            cwd: std::env::current_dir().unwrap_or_else(|_| PathBuf::from("?")),
            home: dirs::home_dir(),
            time: now.format("%H:%M:%S").to_string(),
            date: now.format("%Y-%m-%d").to_string(),
            shell_name: crate::NAME.to_string(),
            version: crate::VERSION.to_string(),
        }
    }
}

/// Show `cwd` with a leading home directory rewritten to `~`
pub fn display_dir(cwd: &Path, home: Option<&Path>) -> String {
    let Some(home) = home.filter(|h| !h.as_os_str().is_empty() && *h != Path::new("/")) else {
        return cwd.display().to_string();
    };

    match cwd.strip_prefix(home) {
        Ok(rest) if rest.as_os_str().is_empty() => "~".to_string(),
        Ok(rest) => format!("~/{}", rest.display()),
        Err(_) => cwd.display().to_string(),
    }
}

/// Render `template` against `state`, wrapped in `color` when it names a
/// palette entry
pub fn render(template: &str, state: &PromptState, color: &str) -> String {
    let dir = display_dir(&state.cwd, state.home.as_deref());
    let values = [
        ("{dir}", dir.as_str()),
        ("{time}", state.time.as_str()),
        ("{date}", state.date.as_str()),
        ("{shell}", state.shell_name.as_str()),
        ("{version}", state.version.as_str()),
    ];

    // Single pass, so substituted text (a directory named "{time}") is
    // never expanded again
    let mut text = String::with_capacity(template.len() + dir.len());
    let mut rest = template;
    while let Some(start) = rest.find('{') {
        text.push_str(&rest[..start]);
        let tail = &rest[start..];
        match values.iter().find(|(placeholder, _)| tail.starts_with(placeholder)) {
            Some((placeholder, value)) => {
                text.push_str(value);
                rest = &tail[placeholder.len()..];
            }
            None => {
                text.push('{');
                rest = &tail[1..];
            }
        }
    }
    text.push_str(rest);

    ansi::paint(&text, color)
}
