use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use termrc_sdk::host::HostAction;
use termrc_sdk::keys::{Key, KeyChord, KeyParseError, Mods};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ThemeAction {
    Next,
    Previous,
    Fix,
    Random,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    Theme(ThemeAction),
    Host(HostAction),
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum BindingParseError {
    #[error(transparent)]
    Key(#[from] KeyParseError),
    #[error("unknown action '{0}'")]
    UnknownAction(String),
}

impl FromStr for Action {
    type Err = BindingParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let t = s.trim();
        if let Some(n) = t.strip_prefix("ActivateTab:") {
            return match n.trim().parse::<u8>() {
                Ok(n) if n >= 1 => Ok(Action::Host(HostAction::ActivateTab(n))),
                _ => Err(BindingParseError::UnknownAction(t.to_string())),
            };
        }
        let action = match t {
            "ThemeNext" => Action::Theme(ThemeAction::Next),
            "ThemePrevious" => Action::Theme(ThemeAction::Previous),
            "ThemeFix" => Action::Theme(ThemeAction::Fix),
            "ThemeRandom" => Action::Theme(ThemeAction::Random),
            "SplitHorizontal" => Action::Host(HostAction::SplitHorizontal),
            "SplitVertical" => Action::Host(HostAction::SplitVertical),
            "ClosePane" => Action::Host(HostAction::ClosePane),
            "ActivatePaneLeft" => Action::Host(HostAction::ActivatePaneLeft),
            "ActivatePaneRight" => Action::Host(HostAction::ActivatePaneRight),
            "ActivatePaneUp" => Action::Host(HostAction::ActivatePaneUp),
            "ActivatePaneDown" => Action::Host(HostAction::ActivatePaneDown),
            "SpawnTab" => Action::Host(HostAction::SpawnTab),
            "ToggleFullScreen" => Action::Host(HostAction::ToggleFullScreen),
            "ActivateCopyMode" => Action::Host(HostAction::ActivateCopyMode),
            "ShowLauncher" => Action::Host(HostAction::ShowLauncher),
            "ReloadConfiguration" => Action::Host(HostAction::ReloadConfiguration),
            "ClearScrollback" => Action::Host(HostAction::ClearScrollback),
            _ => return Err(BindingParseError::UnknownAction(t.to_string())),
        };
        Ok(action)
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Action::Theme(ThemeAction::Next) => f.write_str("ThemeNext"),
            Action::Theme(ThemeAction::Previous) => f.write_str("ThemePrevious"),
            Action::Theme(ThemeAction::Fix) => f.write_str("ThemeFix"),
            Action::Theme(ThemeAction::Random) => f.write_str("ThemeRandom"),
            Action::Host(HostAction::ActivateTab(n)) => write!(f, "ActivateTab:{n}"),
            Action::Host(a) => write!(f, "{a:?}"),
        }
    }
}

/// A binding as written in the config file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct KeySpec {
    pub key: String,
    #[serde(default)]
    pub mods: String,
    pub action: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Binding {
    pub chord: KeyChord,
    pub action: Action,
}

impl TryFrom<&KeySpec> for Binding {
    type Error = BindingParseError;

    fn try_from(spec: &KeySpec) -> Result<Self, Self::Error> {
        Ok(Binding {
            chord: KeyChord::new(spec.key.parse()?, spec.mods.parse()?),
            action: spec.action.parse()?,
        })
    }
}

#[derive(Debug, Clone, Default)]
pub struct BindingTable {
    bindings: Vec<Binding>,
}

fn bind(key: Key, mods: Mods, action: Action) -> Binding {
    Binding {
        chord: KeyChord::new(key, mods),
        action,
    }
}

impl BindingTable {
    #[must_use]
    pub fn defaults() -> Self {
        use HostAction as H;
        use ThemeAction as T;

        let mut bindings = vec![
            bind(Key::Char('d'), Mods::SUPER, Action::Host(H::SplitHorizontal)),
            bind(Key::Char('d'), Mods::SUPER | Mods::SHIFT, Action::Host(H::SplitVertical)),
            bind(Key::Char('w'), Mods::SUPER, Action::Host(H::ClosePane)),
            bind(Key::LeftArrow, Mods::SUPER | Mods::ALT, Action::Host(H::ActivatePaneLeft)),
            bind(Key::RightArrow, Mods::SUPER | Mods::ALT, Action::Host(H::ActivatePaneRight)),
            bind(Key::UpArrow, Mods::SUPER | Mods::ALT, Action::Host(H::ActivatePaneUp)),
            bind(Key::DownArrow, Mods::SUPER | Mods::ALT, Action::Host(H::ActivatePaneDown)),
            bind(Key::Char('t'), Mods::SUPER, Action::Host(H::SpawnTab)),
            bind(Key::Char('f'), Mods::SUPER | Mods::CTRL, Action::Host(H::ToggleFullScreen)),
            bind(Key::Char('x'), Mods::SUPER | Mods::SHIFT, Action::Host(H::ActivateCopyMode)),
            bind(Key::Char('p'), Mods::SUPER | Mods::SHIFT, Action::Host(H::ShowLauncher)),
            bind(Key::Char('r'), Mods::SUPER, Action::Host(H::ReloadConfiguration)),
            bind(Key::Char('k'), Mods::SUPER, Action::Host(H::ClearScrollback)),
            bind(Key::RightArrow, Mods::CTRL | Mods::SHIFT, Action::Theme(T::Next)),
            bind(Key::LeftArrow, Mods::CTRL | Mods::SHIFT, Action::Theme(T::Previous)),
            bind(Key::UpArrow, Mods::CTRL | Mods::SHIFT, Action::Theme(T::Fix)),
            bind(Key::DownArrow, Mods::CTRL | Mods::SHIFT, Action::Theme(T::Random)),
        ];
        for n in 1..=9u8 {
            let digit = char::from(b'0' + n);
            bindings.push(bind(
                Key::Char(digit),
                Mods::SUPER,
                Action::Host(H::ActivateTab(n)),
            ));
        }
        Self { bindings }
    }

    /// Appends parsed specs; specs that fail to parse are skipped and returned.
    pub fn extend_from_specs(&mut self, specs: &[KeySpec]) -> Vec<(KeySpec, BindingParseError)> {
        let mut rejected = Vec::new();
        for spec in specs {
            match Binding::try_from(spec) {
                Ok(b) => self.bindings.push(b),
                Err(e) => rejected.push((spec.clone(), e)),
            }
        }
        rejected
    }

    /// Exact match on key and modifiers; later bindings shadow earlier ones.
    #[must_use]
    pub fn lookup(&self, chord: &KeyChord) -> Option<&Action> {
        self.bindings
            .iter()
            .rev()
            .find(|b| &b.chord == chord)
            .map(|b| &b.action)
    }

    /// Bindings still reachable after shadowing, in declaration order.
    #[must_use]
    pub fn effective(&self) -> Vec<&Binding> {
        self.bindings
            .iter()
            .enumerate()
            .filter(|(i, b)| !self.bindings[i + 1..].iter().any(|later| later.chord == b.chord))
            .map(|(_, b)| b)
            .collect()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.bindings.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.bindings.is_empty()
    }
}
