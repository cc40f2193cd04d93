//! Unit Tests for Prompt Rendering

use std::path::PathBuf;

use mosaicsh::ansi;
use mosaicsh::config::prompt::{display_dir, render, PromptState};

fn state(cwd: &str, home: Option<&str>) -> PromptState {
    PromptState {
        cwd: PathBuf::from(cwd),
        home: home.map(PathBuf::from),
        time: "23:59:01".to_string(),
        date: "2025-12-31".to_string(),
        shell_name: "mosaicsh".to_string(),
        version: "1.2.3".to_string(),
    }
}

#[test]
fn test_default_template() {
    let s = state("/home/kim/projects", Some("/home/kim"));
    assert_eq!(render("{dir} $ ", &s, "none"), "~/projects $ ");
    assert_eq!(
        render("{dir} $ ", &s, "green"),
        "\x1b[32m~/projects $ \x1b[0m"
    );
}

#[test]
fn test_every_placeholder() {
    let s = state("/srv", Some("/home/kim"));
    assert_eq!(
        render("[{date} {time}] {shell}-{version}:{dir}", &s, "none"),
        "[2025-12-31 23:59:01] mosaicsh-1.2.3:/srv"
    );
}

#[test]
fn test_repeated_and_unknown_placeholders() {
    let s = state("/srv", None);
    assert_eq!(render("{dir}{dir}", &s, "none"), "/srv/srv");
    assert_eq!(render("{host} {DIR} {dir", &s, "none"), "{host} {DIR} {dir");
}

#[test]
fn test_unknown_color_renders_plain() {
    let s = state("/srv", None);
    assert_eq!(render("> ", &s, "ultraviolet"), "> ");
    assert_eq!(render("> ", &s, ""), "> ");
}

#[test]
fn test_every_palette_color_wraps_whole_prompt() {
    let s = state("/srv", None);
    for name in ansi::names().filter(|name| *name != "none") {
        let start = ansi::lookup(name).unwrap().start;
        let out = render("{dir}> ", &s, name);
        assert!(start.starts_with("\x1b["), "{}", name);
        assert_eq!(out, format!("{}/srv> {}", start, ansi::RESET));
    }
}

#[test]
fn test_display_dir() {
    let home = PathBuf::from("/home/kim");
    assert_eq!(display_dir(&home, Some(home.as_path())), "~");
    assert_eq!(
        display_dir(&PathBuf::from("/home/kimberly"), Some(home.as_path())),
        "/home/kimberly"
    );
    assert_eq!(
        display_dir(&PathBuf::from("/etc"), Some(PathBuf::from("/").as_path())),
        "/etc"
    );
    assert_eq!(display_dir(&PathBuf::from("/etc"), None), "/etc");
}
