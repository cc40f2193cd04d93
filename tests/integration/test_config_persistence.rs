//! Integration Tests for Configuration Persistence
//!
//! Every mutation is written back; unreadable or unwritable files degrade
//! to warnings and in-memory settings.

#[path = "../test_utils/mod.rs"]
mod test_utils;

use mosaicsh::config::DEFAULT_HISTORY_SIZE;
use mosaicsh::{ConfigLoader, ConfigStore, Persistence};
use test_utils::{build_shell, RecordingLauncher, TestEnv};

#[tokio::test]
async fn test_mutations_survive_restart() {
    let env = TestEnv::new();
    let launcher = RecordingLauncher::new();
    {
        let (mut shell, _, err) = build_shell(&env, &launcher, &[]);
        shell.run_line("set history_size 50").await.unwrap();
        shell.run_line("set color Cyan").await.unwrap();
        shell.run_line("set prompt {time} {dir} >").await.unwrap();
        shell.run_line("alias ll 'ls -la'").await.unwrap();
        shell.run_line("alias gs git status").await.unwrap();
        shell.run_line("unalias gs").await.unwrap();
        assert_eq!(err.text(), "", "no persistence warnings expected");
    }

    let config = env.read_config();
    assert_eq!(config.history_size, 50);
    assert_eq!(config.color, "cyan");
    assert_eq!(config.prompt, "{time} {dir} >");
    assert_eq!(config.aliases.len(), 1);
    assert_eq!(config.aliases["ll"], "ls -la");

    let (mut shell, _, _) = build_shell(&env, &launcher, &[]);
    shell.run_line("ll").await.unwrap();
    assert_eq!(launcher.argvs(), vec![vec!["ls", "-la"]]);
}

#[test]
fn test_partial_file_takes_defaults() {
    let env = TestEnv::new();
    env.write_config("prompt = \"% \"\n");

    let (store, warnings) = ConfigStore::open(ConfigLoader::new(env.config_path()));
    assert!(warnings.is_empty(), "{:?}", warnings);
    assert_eq!(store.get("prompt").unwrap(), "% ");
    assert_eq!(store.get("color").unwrap(), "green");
    assert_eq!(
        store.get("history_size").unwrap(),
        DEFAULT_HISTORY_SIZE.to_string()
    );
}

#[test]
fn test_invalid_history_size_is_coerced() {
    for raw in ["history_size = 0", "history_size = -4", "history_size = \"lots\"", "history_size = 2.5"] {
        let env = TestEnv::new();
        env.write_config(raw);
        let (store, _) = ConfigStore::open(ConfigLoader::new(env.config_path()));
        assert_eq!(store.config().history_size, DEFAULT_HISTORY_SIZE, "{}", raw);
    }

    let env = TestEnv::new();
    env.write_config("history_size = \"25\"");
    let (store, _) = ConfigStore::open(ConfigLoader::new(env.config_path()));
    assert_eq!(store.config().history_size, 25);
}

#[test]
fn test_corrupt_file_warns_and_is_rewritten() {
    let env = TestEnv::new();
    env.write_config("this is = = not toml [");

    let (mut store, warnings) = ConfigStore::open(ConfigLoader::new(env.config_path()));
    assert_eq!(warnings.len(), 1);
    assert!(warnings[0].contains("using defaults"));
    assert_eq!(store.config().history_size, DEFAULT_HISTORY_SIZE);

    let outcome = store.set("color", "red").unwrap();
    assert_eq!(outcome, Persistence::Saved(env.config_path()));
    assert_eq!(env.read_config().color, "red");
}

#[test]
fn test_invalid_aliases_in_file_are_dropped() {
    let env = TestEnv::new();
    env.write_config("[aliases]\ncd = \"ls\"\nll = \"ls -la\"\nbad = \"echo 'open\"\n");

    let (store, warnings) = ConfigStore::open(ConfigLoader::new(env.config_path()));
    let aliases = &store.config().aliases;
    assert_eq!(aliases.len(), 1);
    assert!(aliases.contains_key("ll"));
    assert_eq!(warnings.len(), 2, "{:?}", warnings);
}

#[test]
fn test_json_config() {
    let env = TestEnv::new();
    let path = env.dir.path().join("config.json");
    std::fs::write(&path, r#"{ "color": "blue", "aliases": { "la": "ls -a" } }"#).unwrap();

    let (mut store, warnings) = ConfigStore::open(ConfigLoader::new(path.clone()));
    assert!(warnings.is_empty());
    assert_eq!(store.get("color").unwrap(), "blue");

    let _ = store.set_alias("l", "ls").unwrap();
    let saved: serde_json::Value =
        serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
    assert_eq!(saved["aliases"]["l"], "ls");
    assert_eq!(saved["aliases"]["la"], "ls -a");
}

#[tokio::test]
async fn test_unwritable_config_keeps_change_in_memory() {
    let env = TestEnv::new();
    // A directory where the file should be makes every save fail
    std::fs::create_dir(env.config_path()).unwrap();

    let launcher = RecordingLauncher::new();
    let (mut shell, _, err) = build_shell(&env, &launcher, &[]);
    err.clear();

    shell.run_line("alias ll 'ls -la'").await.unwrap();
    assert!(err.text().contains("warning: settings kept in memory only"));

    shell.run_line("ll").await.unwrap();
    assert_eq!(launcher.argvs(), vec![vec!["ls", "-la"]]);
}

#[tokio::test]
async fn test_unwritable_history_is_a_warning() {
    let env = TestEnv::new();
    std::fs::create_dir(env.history_path()).unwrap();

    let launcher = RecordingLauncher::new();
    let (mut shell, _, err) = build_shell(&env, &launcher, &[]);

    shell.run_line("true").await.unwrap();
    assert!(err.text().contains("warning:"));
    assert_eq!(launcher.argvs(), vec![vec!["true"]]);
}
