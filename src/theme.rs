use std::collections::HashMap;

use termrc_sdk::types::Color;

pub const DEFAULT_DARK_THEME: &str = "Catppuccin Mocha";
pub const DEFAULT_LIGHT_THEME: &str = "Catppuccin Latte";

/// Builtin color scheme names, in the order the native host enumerates them.
pub const BUILTIN_THEMES: &[&str] = &[
    "Catppuccin Mocha",
    "Catppuccin Macchiato",
    "Catppuccin Frappe",
    "Catppuccin Latte",
    "Tokyo Night",
    "Tokyo Night Storm",
    "Tokyo Night Day",
    "Gruvbox dark, medium (base16)",
    "Gruvbox light, medium (base16)",
    "Dracula (Official)",
    "nord",
    "OneDark (base16)",
    "One Light (base16)",
    "Solarized Dark (Gogh)",
    "Solarized Light (Gogh)",
    "rose-pine",
    "rose-pine-moon",
    "rose-pine-dawn",
    "Kanagawa (Gogh)",
    "Everforest Dark (Gogh)",
    "Monokai Pro (Gogh)",
    "Ayu Mirage",
    "Github Dark",
    "Github Light",
];

/// Colors for each status segment.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StatusPalette {
    pub theme: Color,
    pub hostname: Color,
    pub cpu_low: Color,
    pub cpu_mid: Color,
    pub cpu_high: Color,
    pub mem: Color,
    pub battery: Color,
    pub battery_charging: Color,
    pub time: Color,
    pub placeholder: Color,
}

impl Default for StatusPalette {
    fn default() -> Self {
        Self {
            theme: Color::Magenta,
            hostname: Color::Blue,
            cpu_low: Color::Green,
            cpu_mid: Color::Yellow,
            cpu_high: Color::Red,
            mem: Color::Cyan,
            battery: Color::White,
            battery_charging: Color::Green,
            time: Color::Gray,
            placeholder: Color::DarkGray,
        }
    }
}

impl StatusPalette {
    #[must_use]
    pub fn with_overrides<S: ::std::hash::BuildHasher>(
        overrides: &HashMap<String, String, S>,
    ) -> Self {
        let mut palette = Self::default();
        for (k, v) in overrides {
            palette.apply_token(k, v);
        }
        palette
    }

    /// Returns false when the key is unknown or the value is not a color.
    pub fn apply_token(&mut self, key: &str, value: &str) -> bool {
        let Some(color) = parse_color(value) else {
            return false;
        };
        let slot = match key {
            "theme" => &mut self.theme,
            "hostname" => &mut self.hostname,
            "cpu_low" => &mut self.cpu_low,
            "cpu_mid" => &mut self.cpu_mid,
            "cpu_high" => &mut self.cpu_high,
            "mem" => &mut self.mem,
            "battery" => &mut self.battery,
            "battery_charging" => &mut self.battery_charging,
            "time" => &mut self.time,
            "placeholder" => &mut self.placeholder,
            _ => return false,
        };
        *slot = color;
        true
    }

    #[must_use]
    pub fn cpu_color(&self, pct: f32) -> Color {
        match pct {
            p if p < 40.0 => self.cpu_low,
            p if p < 80.0 => self.cpu_mid,
            _ => self.cpu_high,
        }
    }
}

#[must_use]
pub fn parse_color(spec: &str) -> Option<Color> {
    let s = spec.trim();
    let hex = s.strip_prefix('#').unwrap_or(s);
    if hex.len() == 6 && hex.chars().all(|c| c.is_ascii_hexdigit()) {
        if let (Ok(r), Ok(g), Ok(b)) = (
            u8::from_str_radix(&hex[0..2], 16),
            u8::from_str_radix(&hex[2..4], 16),
            u8::from_str_radix(&hex[4..6], 16),
        ) {
            return Some(Color::Rgb(r, g, b));
        }
    }
    match s.to_ascii_lowercase().as_str() {
        "black" => Some(Color::Black),
        "red" => Some(Color::Red),
        "green" => Some(Color::Green),
        "yellow" => Some(Color::Yellow),
        "blue" => Some(Color::Blue),
        "magenta" => Some(Color::Magenta),
        "cyan" => Some(Color::Cyan),
        "gray" | "grey" => Some(Color::Gray),
        "darkgray" | "darkgrey" => Some(Color::DarkGray),
        "white" => Some(Color::White),
        _ => None,
    }
}

#[must_use]
pub fn to_ratatui(c: Color) -> ratatui::style::Color {
    use ratatui::style::Color as R;
    match c {
        Color::Black => R::Black,
        Color::DarkGray => R::DarkGray,
        Color::Gray => R::Gray,
        Color::White => R::White,
        Color::Red => R::Red,
        Color::Green => R::Green,
        Color::Yellow => R::Yellow,
        Color::Blue => R::Blue,
        Color::Magenta => R::Magenta,
        Color::Cyan => R::Cyan,
        Color::Rgb(r, g, b) => R::Rgb(r, g, b),
    }
}

#[must_use]
pub fn to_crossterm(c: Color) -> crossterm::style::Color {
    use crossterm::style::Color as C;
    match c {
        Color::Black => C::Black,
        Color::DarkGray => C::DarkGrey,
        Color::Gray => C::Grey,
        Color::White => C::White,
        Color::Red => C::Red,
        Color::Green => C::Green,
        Color::Yellow => C::Yellow,
        Color::Blue => C::Blue,
        Color::Magenta => C::Magenta,
        Color::Cyan => C::Cyan,
        Color::Rgb(r, g, b) => C::Rgb { r, g, b },
    }
}
