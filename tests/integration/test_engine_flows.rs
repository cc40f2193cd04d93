//! Integration Tests for the Read Loop
//!
//! Lines go through history, tokenizer, alias resolution, builtin dispatch
//! and the executor exactly as they do in an interactive session; external
//! commands are recorded instead of spawned.

#[path = "../test_utils/mod.rs"]
mod test_utils;

use mosaicsh::{ExitStatus, Flow, LaunchMode};
use test_utils::{build_shell, RecordingLauncher, ScriptedReader, TestEnv};

#[tokio::test]
async fn test_history_records_every_line_before_dispatch() {
    let env = TestEnv::new();
    let launcher = RecordingLauncher::new();
    let (mut shell, _, _) = build_shell(&env, &launcher, &[]);

    let mut reader = ScriptedReader::new(["ls", "", "echo \"unterminated", "cd /does/not/exist", "exit"]);
    let code = shell.run(&mut reader).await;

    assert_eq!(code, 0);
    assert_eq!(
        env.history(),
        "ls\n\necho \"unterminated\ncd /does/not/exist\nexit\n"
    );
}

#[tokio::test]
async fn test_alias_expansion_appends_user_arguments() {
    let env = TestEnv::new();
    let launcher = RecordingLauncher::new();
    let (mut shell, _, _) = build_shell(&env, &launcher, &[]);

    shell.run_line("alias ll 'ls -la'").await.unwrap();
    shell.run_line("ll /tmp 'my dir'").await.unwrap();

    assert_eq!(launcher.argvs(), vec![vec!["ls", "-la", "/tmp", "my dir"]]);
}

#[tokio::test]
async fn test_alias_expansion_is_single_level() {
    let env = TestEnv::new();
    let launcher = RecordingLauncher::new();
    let (mut shell, _, _) = build_shell(&env, &launcher, &[]);

    shell.run_line("alias a b").await.unwrap();
    shell.run_line("alias b 'echo looped'").await.unwrap();
    shell.run_line("a x").await.unwrap();

    // `b` is not expanded a second time
    assert_eq!(launcher.argvs(), vec![vec!["b", "x"]]);
}

#[tokio::test]
async fn test_alias_to_builtin_runs_builtin() {
    let env = TestEnv::new();
    let launcher = RecordingLauncher::new();
    let (mut shell, out, _) = build_shell(&env, &launcher, &[]);

    shell.run_line("alias v version").await.unwrap();
    shell.run_line("v").await.unwrap();

    assert!(out.text().contains(mosaicsh::VERSION));
    assert!(launcher.argvs().is_empty());
}

#[tokio::test]
async fn test_launch_mode_follows_interactive_list() {
    let env = TestEnv::new();
    let launcher = RecordingLauncher::new();
    let (mut shell, _, _) = build_shell(&env, &launcher, &["vim"]);

    shell.run_line("ls").await.unwrap();
    shell.run_line("vim notes.txt").await.unwrap();
    shell.run_line("/usr/bin/vim").await.unwrap();

    assert_eq!(
        launcher.modes(),
        vec![LaunchMode::Direct, LaunchMode::Interactive, LaunchMode::Interactive]
    );
}

#[tokio::test]
async fn test_external_status_is_tracked_not_forwarded() {
    let env = TestEnv::new();
    let launcher = RecordingLauncher::new().exits_with("false", 1);
    let (mut shell, _, _) = build_shell(&env, &launcher, &[]);

    let flow = shell.run_line("false").await.unwrap();
    assert_eq!(flow, Flow::Continue(Some(ExitStatus::new(1))));
    assert_eq!(shell.last_status(), Some(ExitStatus::new(1)));

    let mut reader = ScriptedReader::new(["false"]);
    assert_eq!(shell.run(&mut reader).await, 0);
}

#[tokio::test]
async fn test_errors_are_reported_and_loop_continues() {
    let env = TestEnv::new();
    let launcher = RecordingLauncher::new().missing("nosuchcmd");
    let (mut shell, _, err) = build_shell(&env, &launcher, &[]);

    let mut reader = ScriptedReader::new([
        "echo 'open",
        "set history_size 0",
        "alias cd 'ls -la'",
        "cd /does/not/exist",
        "nosuchcmd",
        "true",
    ]);
    assert_eq!(shell.run(&mut reader).await, 0);

    let err = err.text();
    assert!(err.contains("unterminated single quote"), "{}", err);
    assert!(err.contains("invalid history_size"), "{}", err);
    assert!(err.contains("'cd' is a builtin command"), "{}", err);
    assert!(err.contains("cd: /does/not/exist"), "{}", err);
    assert!(err.contains("nosuchcmd: command not found"), "{}", err);
    assert_eq!(launcher.argvs(), vec![vec!["true"]]);
}

#[tokio::test]
async fn test_exit_stops_reading() {
    let env = TestEnv::new();
    let launcher = RecordingLauncher::new();
    let (mut shell, _, _) = build_shell(&env, &launcher, &[]);

    let mut reader = ScriptedReader::new(["exit", "ls"]);
    assert_eq!(shell.run(&mut reader).await, 0);
    assert_eq!(reader.remaining(), 1);
    assert!(launcher.argvs().is_empty());
}

#[tokio::test]
async fn test_reader_failure_ends_session() {
    let env = TestEnv::new();
    let launcher = RecordingLauncher::new();
    let (mut shell, _, err) = build_shell(&env, &launcher, &[]);

    let mut reader = ScriptedReader::new(["true"]).failing_at_end();
    assert_eq!(shell.run(&mut reader).await, 1);
    assert!(err.text().contains("terminal went away"));
}

#[tokio::test]
async fn test_prompt_reflects_settings() {
    let env = TestEnv::new();
    let launcher = RecordingLauncher::new();
    let (mut shell, _, _) = build_shell(&env, &launcher, &[]);

    let mut reader = ScriptedReader::new(["set color none", "set prompt {shell}>"]);
    shell.run(&mut reader).await;

    assert_eq!(reader.prompts.last().map(String::as_str), Some("mosaicsh>"));
}

#[tokio::test]
async fn test_recall_list_follows_history_size() {
    let env = TestEnv::new();
    let launcher = RecordingLauncher::new();
    let (mut shell, _, _) = build_shell(&env, &launcher, &[]);

    let mut reader = ScriptedReader::new(["   ", "set history_size 50", "ls"]);
    shell.run(&mut reader).await;

    assert_eq!(reader.history_limits, vec![1000, 50]);
    assert_eq!(reader.recalled, vec!["set history_size 50", "ls"]);
}

#[tokio::test]
async fn test_run_command_returns_status() {
    let env = TestEnv::new();
    let launcher = RecordingLauncher::new().exits_with("grep", 2);
    let (mut shell, _, _) = build_shell(&env, &launcher, &[]);

    assert_eq!(shell.run_command("grep x").await, 2);
    assert_eq!(shell.run_command("version").await, 0);
    assert_eq!(shell.run_command("unalias nope").await, 1);
    // -c lines are not recorded
    assert_eq!(env.history(), "");
}
