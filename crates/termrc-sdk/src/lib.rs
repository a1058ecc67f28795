pub mod types {
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub enum Color {
        Black,
        DarkGray,
        Gray,
        White,
        Red,
        Green,
        Yellow,
        Blue,
        Magenta,
        Cyan,
        Rgb(u8, u8, u8),
    }
}

pub mod host {
    use chrono::{DateTime, Local};

    use super::render::Line;

    /// Scalar string persistence. Implementations never fail loudly:
    /// `load` yields `None` for anything unreadable, `save` reports success as a bool.
    pub trait KeyValueStore {
        fn load(&self, key: &str) -> Option<String>;
        fn save(&self, key: &str, value: &str) -> bool;
    }

    #[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
    pub enum Appearance {
        #[default]
        Dark,
        Light,
    }

    impl Appearance {
        #[must_use]
        pub fn is_dark(self) -> bool {
            matches!(self, Self::Dark)
        }
    }

    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub enum BatteryState {
        Charging,
        Discharging,
        Empty,
        Full,
        Unknown,
    }

    #[derive(Debug, Clone, Copy, PartialEq)]
    pub struct BatteryReading {
        /// Fraction in `0.0..=1.0`.
        pub state_of_charge: f32,
        pub state: BatteryState,
    }

    /// Result of a synchronous child process run.
    #[derive(Debug, Clone, Default, PartialEq, Eq)]
    pub struct ProcessOutput {
        pub success: bool,
        pub stdout: String,
        pub stderr: String,
    }

    impl ProcessOutput {
        #[must_use]
        pub fn failed(stderr: impl Into<String>) -> Self {
            Self {
                success: false,
                stdout: String::new(),
                stderr: stderr.into(),
            }
        }
    }

    /// Actions owned entirely by the host (panes, tabs, windows).
    #[derive(Debug, Clone, PartialEq, Eq)]
    pub enum HostAction {
        SplitHorizontal,
        SplitVertical,
        ClosePane,
        ActivatePaneLeft,
        ActivatePaneRight,
        ActivatePaneUp,
        ActivatePaneDown,
        SpawnTab,
        ActivateTab(u8),
        ToggleFullScreen,
        ActivateCopyMode,
        ShowLauncher,
        ReloadConfiguration,
        ClearScrollback,
    }

    #[derive(Debug, Clone, PartialEq)]
    pub enum HostCommand {
        /// Window visual override applying a color scheme by name.
        SetColorScheme { name: String },
        SetRightStatus { line: Line },
        Toast {
            title: String,
            body: String,
            icon: Option<String>,
            duration_ms: u64,
        },
        Perform(HostAction),
    }

    /// Everything the configuration layer consumes from, and produces to, the terminal host.
    pub trait Host {
        fn appearance(&self) -> Appearance;
        /// Builtin theme names in the host's enumeration order.
        fn builtin_theme_names(&self) -> Vec<String>;
        fn now(&self) -> DateTime<Local>;
        fn battery_info(&self) -> Vec<BatteryReading>;
        fn hostname(&self) -> String;
        /// Runs `argv` to completion. Spawn failures come back as `success: false`.
        fn run_child_process(&mut self, argv: &[String]) -> ProcessOutput;
        fn emit(&mut self, cmd: HostCommand);
    }
}

pub mod keys {
    use std::fmt;
    use std::str::FromStr;

    use bitflags::bitflags;

    bitflags! {
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
        pub struct Mods: u8 {
            const NONE  = 0b0000;
            const SHIFT = 0b0001;
            const ALT   = 0b0010;
            const CTRL  = 0b0100;
            /// Command on macOS, Windows key elsewhere.
            const SUPER = 0b1000;
        }
    }

    impl Default for Mods {
        fn default() -> Self {
            Self::NONE
        }
    }

    #[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
    pub enum KeyParseError {
        #[error("unknown key '{0}'")]
        UnknownKey(String),
        #[error("unknown modifier '{0}'")]
        UnknownModifier(String),
    }

    impl FromStr for Mods {
        type Err = KeyParseError;

        /// Parses `"CTRL|SHIFT"` style lists; empty and `"NONE"` mean no modifiers.
        fn from_str(s: &str) -> Result<Self, Self::Err> {
            let mut mods = Mods::NONE;
            for part in s.split('|').map(str::trim).filter(|p| !p.is_empty()) {
                mods |= match part.to_ascii_uppercase().as_str() {
                    "NONE" => Mods::NONE,
                    "SHIFT" => Mods::SHIFT,
                    "ALT" | "OPT" | "META" => Mods::ALT,
                    "CTRL" => Mods::CTRL,
                    "SUPER" | "CMD" | "WIN" => Mods::SUPER,
                    _ => return Err(KeyParseError::UnknownModifier(part.to_string())),
                };
            }
            Ok(mods)
        }
    }

    impl fmt::Display for Mods {
        fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            if self.is_empty() {
                return f.write_str("NONE");
            }
            let mut parts = Vec::new();
            if self.contains(Mods::SUPER) {
                parts.push("SUPER");
            }
            if self.contains(Mods::CTRL) {
                parts.push("CTRL");
            }
            if self.contains(Mods::ALT) {
                parts.push("ALT");
            }
            if self.contains(Mods::SHIFT) {
                parts.push("SHIFT");
            }
            f.write_str(&parts.join("|"))
        }
    }

    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub enum Key {
        /// Printable key, stored lowercase.
        Char(char),
        LeftArrow,
        RightArrow,
        UpArrow,
        DownArrow,
        Enter,
        Tab,
        Escape,
        Backspace,
        PageUp,
        PageDown,
        Function(u8),
    }

    impl FromStr for Key {
        type Err = KeyParseError;

        fn from_str(s: &str) -> Result<Self, Self::Err> {
            let t = s.trim();
            let mut chars = t.chars();
            if let (Some(c), None) = (chars.next(), chars.next()) {
                return Ok(Key::Char(c.to_ascii_lowercase()));
            }
            let key = match t.to_ascii_lowercase().as_str() {
                "leftarrow" | "left" => Key::LeftArrow,
                "rightarrow" | "right" => Key::RightArrow,
                "uparrow" | "up" => Key::UpArrow,
                "downarrow" | "down" => Key::DownArrow,
                "enter" | "return" => Key::Enter,
                "tab" => Key::Tab,
                "escape" | "esc" => Key::Escape,
                "backspace" => Key::Backspace,
                "pageup" => Key::PageUp,
                "pagedown" => Key::PageDown,
                "space" => Key::Char(' '),
                other => match other.strip_prefix('f').and_then(|n| n.parse::<u8>().ok()) {
                    Some(n) if (1..=24).contains(&n) => Key::Function(n),
                    _ => return Err(KeyParseError::UnknownKey(t.to_string())),
                },
            };
            Ok(key)
        }
    }

    impl fmt::Display for Key {
        fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            match self {
                Key::Char(' ') => f.write_str("Space"),
                Key::Char(c) => write!(f, "{c}"),
                Key::LeftArrow => f.write_str("LeftArrow"),
                Key::RightArrow => f.write_str("RightArrow"),
                Key::UpArrow => f.write_str("UpArrow"),
                Key::DownArrow => f.write_str("DownArrow"),
                Key::Enter => f.write_str("Enter"),
                Key::Tab => f.write_str("Tab"),
                Key::Escape => f.write_str("Escape"),
                Key::Backspace => f.write_str("Backspace"),
                Key::PageUp => f.write_str("PageUp"),
                Key::PageDown => f.write_str("PageDown"),
                Key::Function(n) => write!(f, "F{n}"),
            }
        }
    }

    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct KeyChord {
        pub key: Key,
        pub mods: Mods,
    }

    impl KeyChord {
        #[must_use]
        pub fn new(key: Key, mods: Mods) -> Self {
            Self { key, mods }
        }
    }

    impl fmt::Display for KeyChord {
        fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            if self.mods.is_empty() {
                write!(f, "{}", self.key)
            } else {
                write!(f, "{}+{}", self.mods, self.key)
            }
        }
    }
}

pub mod render {
    use super::types::Color;

    #[derive(Debug, Clone, PartialEq)]
    pub struct Span {
        pub text: String,
        pub color: Option<Color>,
    }

    impl Span {
        pub fn raw(text: impl Into<String>) -> Self {
            Self {
                text: text.into(),
                color: None,
            }
        }

        pub fn colored(text: impl Into<String>, color: Color) -> Self {
            Self {
                text: text.into(),
                color: Some(color),
            }
        }
    }

    #[derive(Debug, Clone, Default, PartialEq)]
    pub struct Line(pub Vec<Span>);

    impl Line {
        /// Text content without color segments.
        #[must_use]
        pub fn plain(&self) -> String {
            self.0.iter().map(|s| s.text.as_str()).collect()
        }
    }
}

pub mod events {
    use crate::keys::KeyChord;

    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub enum Event {
        Startup,
        ConfigReload,
        StatusTick,
        KeyPress(KeyChord),
    }

    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub enum EventKind {
        Startup,
        ConfigReload,
        StatusTick,
        KeyPress,
    }

    impl Event {
        #[must_use]
        pub fn kind(&self) -> EventKind {
            match self {
                Event::Startup => EventKind::Startup,
                Event::ConfigReload => EventKind::ConfigReload,
                Event::StatusTick => EventKind::StatusTick,
                Event::KeyPress(_) => EventKind::KeyPress,
            }
        }
    }
}
