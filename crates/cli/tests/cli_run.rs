//! Runs the `txt2mp3` binary against fake tools.
#![cfg(unix)]

use std::io::Write;
use std::path::Path;
use std::process::Output;

use tempfile::{NamedTempFile, TempDir};
use txt2mp3_core::testing::{FakeTool, FakeToolBehavior};

/// Config pointing both stages at fakes, with no pauses.
fn test_config(synth: &FakeTool, encode: &FakeTool, scratch_root: &Path) -> NamedTempFile {
    let mut file = NamedTempFile::new().unwrap();
    write!(
        file,
        r#"
[synthesizer]
path = "{}"

[encoder]
path = "{}"

[runner]
startup_delay_ms = 0
poll_interval_ms = 5

[jobs]
temp_root = "{}"
fatal_pause_secs = 0
exit_pause_secs = 0
"#,
        synth.path().display(),
        encode.path().display(),
        scratch_root.display()
    )
    .unwrap();
    file
}

async fn run_cli(cwd: &Path, config: Option<&Path>, args: &[&str]) -> Output {
    let mut command = tokio::process::Command::new(env!("CARGO_BIN_EXE_txt2mp3"));
    command
        .current_dir(cwd)
        .env("RUST_LOG", "error")
        .env_remove("TXT2MP3_CONFIG")
        .args(args);
    if let Some(config) = config {
        command.arg("--config").arg(config);
    }
    command.output().await.expect("Failed to run txt2mp3")
}

struct Dirs {
    source: TempDir,
    tools: TempDir,
    scratch: TempDir,
}

impl Dirs {
    fn new() -> Self {
        Self {
            source: TempDir::new().unwrap(),
            tools: TempDir::new().unwrap(),
            scratch: TempDir::new().unwrap(),
        }
    }
}

#[tokio::test]
async fn test_no_argument_prints_usage() {
    let dirs = Dirs::new();
    let output = run_cli(dirs.source.path(), None, &[]).await;

    assert_eq!(output.status.code(), Some(0));
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("Please specify input text file or wildcard pattern."));
}

#[tokio::test]
async fn test_wildcard_batch_converts_all() {
    let dirs = Dirs::new();
    std::fs::write(dirs.source.path().join("a.txt"), "hello").unwrap();
    std::fs::write(dirs.source.path().join("b.txt"), "world").unwrap();
    std::fs::write(dirs.source.path().join("notes.md"), "skip").unwrap();
    let synth = FakeTool::synthesizer(dirs.tools.path(), FakeToolBehavior::succeed()).unwrap();
    let encode = FakeTool::encoder(dirs.tools.path(), FakeToolBehavior::succeed()).unwrap();
    let config = test_config(&synth, &encode, dirs.scratch.path());

    let output = run_cli(dirs.source.path(), Some(config.path()), &["*.txt"]).await;

    assert_eq!(output.status.code(), Some(0));
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("Input: a.txt"));
    assert!(stdout.contains("Input: b.txt"));
    assert_eq!(stdout.matches("Converting from txt to wav: 100%").count(), 2);
    assert_eq!(stdout.matches("Converting from wav to mp3: 100%").count(), 2);

    for base in ["a", "b"] {
        assert!(dirs.source.path().join(format!("{base}.mp3")).is_file());
        assert!(dirs
            .source
            .path()
            .join(format!("converted-text/{base}.txt"))
            .is_file());
    }
    assert!(dirs.source.path().join("notes.md").is_file());
    assert_eq!(std::fs::read_dir(dirs.scratch.path()).unwrap().count(), 0);
}

#[tokio::test]
async fn test_zero_matches_exits_cleanly() {
    let dirs = Dirs::new();
    let synth = FakeTool::synthesizer(dirs.tools.path(), FakeToolBehavior::succeed()).unwrap();
    let encode = FakeTool::encoder(dirs.tools.path(), FakeToolBehavior::succeed()).unwrap();
    let config = test_config(&synth, &encode, dirs.scratch.path());

    let output = run_cli(dirs.source.path(), Some(config.path()), &["*.txt"]).await;

    assert_eq!(output.status.code(), Some(0));
    assert!(synth.invocations().is_empty());
}

#[tokio::test]
async fn test_synthesis_failure_exits_with_1() {
    let dirs = Dirs::new();
    std::fs::write(dirs.source.path().join("speech.txt"), "hello").unwrap();
    let synth = FakeTool::synthesizer(dirs.tools.path(), FakeToolBehavior::fail(2)).unwrap();
    let encode = FakeTool::encoder(dirs.tools.path(), FakeToolBehavior::succeed()).unwrap();
    let config = test_config(&synth, &encode, dirs.scratch.path());

    let output = run_cli(dirs.source.path(), Some(config.path()), &["speech.txt"]).await;

    assert_eq!(output.status.code(), Some(1));
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("Failed to convert speech.txt"));
    assert!(stdout.contains("Exiting in 0 seconds..."));
    assert!(!dirs.source.path().join("speech.mp3").exists());
    assert!(dirs.source.path().join("speech.txt").is_file());
    assert!(encode.invocations().is_empty());
}

/// Falls back to the default 5 second fatal pause, since no config was read.
#[tokio::test]
async fn test_missing_config_file_is_fatal() {
    let dirs = Dirs::new();
    let missing = dirs.tools.path().join("nope.toml");
    let mut command = tokio::process::Command::new(env!("CARGO_BIN_EXE_txt2mp3"));
    let output = command
        .current_dir(dirs.source.path())
        .env("RUST_LOG", "error")
        .arg("--config")
        .arg(&missing)
        .arg("speech.txt")
        .output()
        .await
        .unwrap();

    assert_eq!(output.status.code(), Some(1));
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("Failed to load config"));
    assert!(stdout.contains("Exiting in 5 seconds..."));
}
