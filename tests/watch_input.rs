use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use termrc::bindings::{Action, BindingTable, ThemeAction};
use termrc::watch::{chord_from_key, WatchView};
use termrc_sdk::host::{HostAction, HostCommand};
use termrc_sdk::keys::{Key, KeyChord, Mods};
use termrc_sdk::render::{Line, Span};

fn key(code: KeyCode, mods: KeyModifiers) -> KeyEvent {
    KeyEvent::new(code, mods)
}

#[test]
fn shifted_char_is_lowercased() {
    let chord = chord_from_key(&key(KeyCode::Char('D'), KeyModifiers::SHIFT | KeyModifiers::SUPER));
    assert_eq!(chord, Some(KeyChord::new(Key::Char('d'), Mods::SUPER | Mods::SHIFT)));
}

#[test]
fn backtab_becomes_shift_tab() {
    let chord = chord_from_key(&key(KeyCode::BackTab, KeyModifiers::NONE));
    assert_eq!(chord, Some(KeyChord::new(Key::Tab, Mods::SHIFT)));
}

#[test]
fn unmapped_keys_are_dropped() {
    assert_eq!(chord_from_key(&key(KeyCode::Insert, KeyModifiers::NONE)), None);
}

#[test]
fn ctrl_shift_right_hits_theme_next() {
    let chord = chord_from_key(&key(
        KeyCode::Right,
        KeyModifiers::CONTROL | KeyModifiers::SHIFT,
    ))
    .unwrap();
    assert_eq!(
        BindingTable::defaults().lookup(&chord),
        Some(&Action::Theme(ThemeAction::Next))
    );
}

#[test]
fn absorb_keeps_latest_state_without_reload() {
    let mut view = WatchView::default();
    let status = Line(vec![Span::raw("CPU: --    ")]);
    let reload = view.absorb(vec![
        HostCommand::Perform(HostAction::SplitHorizontal),
        HostCommand::SetColorScheme { name: "A".into() },
        HostCommand::SetColorScheme { name: "B".into() },
        HostCommand::SetRightStatus {
            line: status.clone(),
        },
        HostCommand::Toast {
            title: "Theme".into(),
            body: "B (fixed)".into(),
            icon: None,
            duration_ms: 4000,
        },
    ]);
    assert!(!reload);
    assert_eq!(view.theme, "B");
    assert_eq!(view.status, status);
    assert_eq!(view.message.as_deref(), Some("Theme: B (fixed)"));
}

#[test]
fn absorb_reports_reload_requests() {
    let mut view = WatchView::default();
    assert!(!view.absorb(Vec::new()));
    assert!(view.absorb(vec![HostCommand::Perform(HostAction::ReloadConfiguration)]));

    assert!(!view.absorb(vec![HostCommand::Perform(HostAction::ActivateTab(2))]));
    assert_eq!(view.message.as_deref(), Some("host action: ActivateTab:2"));
}
