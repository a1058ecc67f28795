use std::fs;
use std::path::Path;
use std::process::{Command, Output};

fn termrc(args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_termrc"))
        .args(args)
        .env("RUST_LOG", "warn")
        .output()
        .expect("run termrc")
}

fn write_config(dir: &Path) -> String {
    let path = dir.join("config.toml");
    fs::write(
        &path,
        "appearance = \"dark\"\ndark_theme = \"A\"\nthemes = [\"A\", \"B\"]\n",
    )
    .unwrap();
    path.display().to_string()
}

#[test]
fn keys_lists_bindings() {
    let tmp = tempfile::tempdir().unwrap();
    let cfg = write_config(tmp.path());
    let out = termrc(&["--config", &cfg, "keys"]);
    assert_eq!(out.status.code(), Some(0));
    let stdout = String::from_utf8_lossy(&out.stdout);
    assert!(stdout.contains("CTRL|SHIFT+RightArrow"), "{stdout}");
    assert!(stdout.contains("ThemeNext"), "{stdout}");
}

#[test]
fn next_persists_state() {
    let tmp = tempfile::tempdir().unwrap();
    let cfg = write_config(tmp.path());
    let state = tmp.path().join("state");
    let state_arg = state.display().to_string();

    let out = termrc(&["--config", &cfg, "--state-dir", &state_arg, "next"]);
    assert_eq!(out.status.code(), Some(0), "{}", String::from_utf8_lossy(&out.stderr));
    let stdout = String::from_utf8_lossy(&out.stdout);
    assert!(stdout.contains("theme: B"), "{stdout}");
    assert!(stdout.contains("random: false"), "{stdout}");
    assert_eq!(fs::read_to_string(state.join("theme_current")).unwrap(), "B");
    assert_eq!(fs::read_to_string(state.join("theme_random")).unwrap(), "false");

    let out = termrc(&["--config", &cfg, "--state-dir", &state_arg, "show"]);
    assert_eq!(out.status.code(), Some(0));
    assert!(String::from_utf8_lossy(&out.stdout).contains("theme: B"));
}

#[test]
fn missing_explicit_config_fails() {
    let tmp = tempfile::tempdir().unwrap();
    let missing = tmp.path().join("nope.toml").display().to_string();
    let out = termrc(&["--config", &missing, "show"]);
    assert_eq!(out.status.code(), Some(1));
}
