mod common;

use std::fs;

use termrc::bindings::{Action, BindingParseError, BindingTable, KeySpec, ThemeAction};
use termrc::config::{load_config, load_config_file, validate_config, Config, StatsMode, SYSINFO_COMMAND};
use termrc::store::{FileStore, THEME_CURRENT_KEY, THEME_RANDOM_KEY};
use termrc::{Controller, ControllerSettings, Dispatcher};
use termrc_sdk::events::{Event, EventKind};
use termrc_sdk::host::{HostAction, HostCommand, KeyValueStore};
use termrc_sdk::keys::{Key, KeyChord, Mods};

use common::{controller, read, settings, FakeHost};

fn pinned(dir: &std::path::Path, name: &str) {
    let store = FileStore::new(dir);
    assert!(store.save(THEME_CURRENT_KEY, name));
    assert!(store.save(THEME_RANDOM_KEY, "false"));
}

fn chord(key: Key, mods: Mods) -> Event {
    Event::KeyPress(KeyChord::new(key, mods))
}

#[test]
fn startup_applies_persisted_theme() {
    let tmp = tempfile::tempdir().unwrap();
    pinned(tmp.path(), "B");
    let mut host = FakeHost::with_themes(&["A", "B", "C"]);
    let mut ctl = controller(&host, tmp.path());
    let ran = Dispatcher::with_defaults().dispatch(&mut ctl, &mut host, Event::Startup);
    assert_eq!(ran, 1);
    assert_eq!(host.schemes(), vec!["B"]);
    assert!(host.toasts().is_empty());
}

#[test]
fn theme_chord_rotates_and_notifies() {
    let tmp = tempfile::tempdir().unwrap();
    pinned(tmp.path(), "A");
    let mut host = FakeHost::with_themes(&["A", "B", "C"]);
    let mut ctl = controller(&host, tmp.path());
    let d = Dispatcher::with_defaults();

    d.dispatch(&mut ctl, &mut host, chord(Key::RightArrow, Mods::CTRL | Mods::SHIFT));
    assert_eq!(host.schemes(), vec!["B"]);
    assert_eq!(host.toasts(), vec!["B (fixed)"]);
    assert_eq!(read(tmp.path(), THEME_CURRENT_KEY).as_deref(), Some("B"));

    d.dispatch(&mut ctl, &mut host, chord(Key::LeftArrow, Mods::CTRL | Mods::SHIFT));
    d.dispatch(&mut ctl, &mut host, chord(Key::LeftArrow, Mods::CTRL | Mods::SHIFT));
    assert_eq!(host.schemes(), vec!["B", "A", "C"]);
}

#[test]
fn random_chord_only_flips_the_flag() {
    let tmp = tempfile::tempdir().unwrap();
    pinned(tmp.path(), "C");
    let mut host = FakeHost::with_themes(&["A", "B", "C"]);
    let mut ctl = controller(&host, tmp.path());
    Dispatcher::with_defaults().dispatch(&mut ctl, &mut host, chord(Key::DownArrow, Mods::CTRL | Mods::SHIFT));

    assert!(host.schemes().is_empty());
    assert!(ctl.state().random_enabled);
    assert_eq!(read(tmp.path(), THEME_RANDOM_KEY).as_deref(), Some("true"));
    assert_eq!(host.toasts(), vec!["C (random)"]);
}

#[test]
fn reload_in_random_mode_applies_a_catalog_theme() {
    let tmp = tempfile::tempdir().unwrap();
    let mut host = FakeHost::with_themes(&["A", "B", "C"]);
    let mut ctl = controller(&host, tmp.path());
    Dispatcher::with_defaults().dispatch(&mut ctl, &mut host, Event::ConfigReload);

    let schemes = host.schemes();
    assert_eq!(schemes.len(), 1);
    assert!(["A", "B", "C"].contains(&schemes[0]));
    assert_eq!(read(tmp.path(), THEME_CURRENT_KEY).as_deref(), Some(schemes[0]));
}

#[test]
fn host_binding_is_forwarded() {
    let tmp = tempfile::tempdir().unwrap();
    let mut host = FakeHost::with_themes(&["A"]);
    let mut ctl = controller(&host, tmp.path());
    assert!(ctl.on_key_press(&mut host, KeyChord::new(Key::Char('d'), Mods::SUPER)));
    assert!(ctl.on_key_press(&mut host, KeyChord::new(Key::Char('3'), Mods::SUPER)));
    assert_eq!(
        host.emitted,
        vec![
            HostCommand::Perform(HostAction::SplitHorizontal),
            HostCommand::Perform(HostAction::ActivateTab(3)),
        ]
    );
}

#[test]
fn unbound_key_emits_nothing() {
    let tmp = tempfile::tempdir().unwrap();
    let mut host = FakeHost::with_themes(&["A"]);
    let mut ctl = controller(&host, tmp.path());
    assert!(!ctl.on_key_press(&mut host, KeyChord::new(Key::Char('z'), Mods::ALT)));
    assert!(host.emitted.is_empty());
}

#[test]
fn status_tick_runs_command_and_sets_right_status() {
    let tmp = tempfile::tempdir().unwrap();
    pinned(tmp.path(), "A");
    let mut host = FakeHost::with_themes(&["A"]);
    let mut ctl = controller(&host, tmp.path());
    Dispatcher::with_defaults().dispatch(&mut ctl, &mut host, Event::StatusTick);

    assert_eq!(host.process_calls, 1);
    let [HostCommand::SetRightStatus { line }] = host.emitted.as_slice() else {
        panic!("expected a single status update, got {:?}", host.emitted);
    };
    let text = line.plain();
    assert!(text.starts_with("📌 A"), "{text}");
    assert!(text.contains("CPU: --"), "{text}");
    assert!(text.ends_with("09:05"), "{text}");
}

#[test]
fn empty_catalog_keeps_running() {
    let tmp = tempfile::tempdir().unwrap();
    let mut host = FakeHost::with_themes(&[]);
    let mut ctl = controller(&host, tmp.path());
    let d = Dispatcher::with_defaults();
    d.dispatch(&mut ctl, &mut host, Event::Startup);
    d.dispatch(&mut ctl, &mut host, chord(Key::RightArrow, Mods::CTRL | Mods::SHIFT));
    d.dispatch(&mut ctl, &mut host, Event::ConfigReload);
    assert_eq!(ctl.state().current_name, "Catppuccin Mocha");
    assert!(host.toasts().is_empty());
}

#[test]
fn disabled_notifications_suppress_toasts() {
    let tmp = tempfile::tempdir().unwrap();
    pinned(tmp.path(), "A");
    let mut host = FakeHost::with_themes(&["A", "B"]);
    let mut s = settings();
    s.notifications.enabled = false;
    let mut ctl = Controller::new(&host, Box::new(FileStore::new(tmp.path())), s);
    ctl.apply_theme_action(&mut host, ThemeAction::Next);
    assert_eq!(host.schemes(), vec!["B"]);
    assert!(host.toasts().is_empty());
}

#[test]
fn dispatcher_runs_every_matching_handler() {
    let tmp = tempfile::tempdir().unwrap();
    let mut host = FakeHost::with_themes(&["A"]);
    let mut ctl = controller(&host, tmp.path());
    let d = Dispatcher::new()
        .register(EventKind::Startup, |c, h, _| c.on_startup(h))
        .register(EventKind::Startup, |c, h, _| c.on_startup(h));
    assert_eq!(d.dispatch(&mut ctl, &mut host, Event::Startup), 2);
    assert_eq!(d.dispatch(&mut ctl, &mut host, Event::StatusTick), 0);
    assert_eq!(host.schemes().len(), 2);
}

#[test]
fn config_keys_shadow_defaults_and_bad_specs_are_skipped() {
    let cfg = Config {
        keys: vec![
            KeySpec {
                key: "RightArrow".into(),
                mods: "CTRL|SHIFT".into(),
                action: "ThemePrevious".into(),
            },
            KeySpec {
                key: "Nope".into(),
                mods: String::new(),
                action: "ThemeNext".into(),
            },
            KeySpec {
                key: "q".into(),
                mods: "HYPER".into(),
                action: "ThemeNext".into(),
            },
        ],
        ..Config::default()
    };
    let s = ControllerSettings::from_config(&cfg);
    let right = KeyChord::new(Key::RightArrow, Mods::CTRL | Mods::SHIFT);
    assert_eq!(s.bindings.lookup(&right), Some(&Action::Theme(ThemeAction::Previous)));
    assert_eq!(s.bindings.len(), BindingTable::defaults().len() + 1);
    assert_eq!(s.bindings.effective().len(), BindingTable::defaults().len());

    let (errors, _) = validate_config(&cfg);
    assert_eq!(errors.len(), 2, "{errors:?}");
}

#[test]
fn keys_mods_and_actions_parse_and_print() {
    assert_eq!("cmd|shift".parse::<Mods>().unwrap(), Mods::SUPER | Mods::SHIFT);
    assert_eq!("".parse::<Mods>().unwrap(), Mods::NONE);
    assert_eq!((Mods::SHIFT | Mods::CTRL).to_string(), "CTRL|SHIFT");
    assert_eq!("Q".parse::<Key>().unwrap(), Key::Char('q'));
    assert_eq!("f12".parse::<Key>().unwrap(), Key::Function(12));
    assert!("f99".parse::<Key>().is_err());
    assert_eq!(
        KeyChord::new(Key::LeftArrow, Mods::SUPER | Mods::ALT).to_string(),
        "SUPER|ALT+LeftArrow"
    );

    assert_eq!("ActivateTab:4".parse::<Action>().unwrap(), Action::Host(HostAction::ActivateTab(4)));
    assert!(matches!("ActivateTab:0".parse::<Action>(), Err(BindingParseError::UnknownAction(_))));
    assert_eq!(Action::Host(HostAction::ShowLauncher).to_string(), "ShowLauncher");
    assert_eq!(Action::Theme(ThemeAction::Fix).to_string(), "ThemeFix");
}

#[test]
fn config_loads_in_each_format() {
    let tmp = tempfile::tempdir().unwrap();
    let yaml = tmp.path().join("config.yaml");
    fs::write(
        &yaml,
        "appearance: light\nlight_theme: Paper\nthemes: [Paper, Ink]\nstatus:\n  stats: sysinfo\n",
    )
    .unwrap();
    let cfg = load_config_file(&yaml).unwrap();
    assert_eq!(cfg.theme_names(), vec!["Paper", "Ink"]);
    assert_eq!(cfg.status.stats, StatsMode::Sysinfo);
    assert_eq!(cfg.status.resolve_stats_command(), vec![SYSINFO_COMMAND]);

    let toml_path = tmp.path().join("config.toml");
    fs::write(
        &toml_path,
        "dark_theme = \"Ink\"\n[status]\nstats = \"command\"\nstats_command = [\"vm_stat\"]\n[notifications]\nenabled = false\n",
    )
    .unwrap();
    let cfg = load_config_file(&toml_path).unwrap();
    assert_eq!(cfg.dark_theme, "Ink");
    assert_eq!(cfg.status.resolve_stats_command(), vec!["vm_stat"]);
    assert!(!cfg.notifications.enabled);

    let json = tmp.path().join("config.json");
    fs::write(&json, r#"{"keys":[{"key":"n","mods":"SUPER","action":"ThemeNext"}]}"#).unwrap();
    let cfg = load_config_file(&json).unwrap();
    assert_eq!(cfg.keys.len(), 1);
    assert_eq!(cfg.keys[0].action, "ThemeNext");
}

#[test]
fn explicit_config_must_parse() {
    let tmp = tempfile::tempdir().unwrap();
    let bad = tmp.path().join("bad.toml");
    fs::write(&bad, "themes = 12").unwrap();
    assert!(load_config(Some(&bad)).is_err());
    assert!(load_config(Some(&tmp.path().join("missing.toml"))).is_err());
}

#[test]
fn validation_flags_bad_values() {
    let mut cfg = Config {
        themes: Some(Vec::new()),
        ..Config::default()
    };
    cfg.status.time_format = "%Q".into();
    cfg.status.colors.insert("cpu_low".into(), "not-a-color".into());
    cfg.status.colors.insert("sparkles".into(), "red".into());
    let (errors, warnings) = validate_config(&cfg);
    assert_eq!(errors.len(), 3, "{errors:?}");
    assert!(warnings.iter().any(|w| w.contains("sparkles")), "{warnings:?}");

    let (errors, warnings) = validate_config(&Config::default());
    assert!(errors.is_empty(), "{errors:?}");
    assert!(warnings.is_empty(), "{warnings:?}");
}
