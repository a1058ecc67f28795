use chrono::format::{Item, StrftimeItems};
use chrono::{DateTime, Local};
use termrc_sdk::host::{BatteryReading, BatteryState, ProcessOutput};
use termrc_sdk::render::{Line, Span};
use tracing::debug;

use crate::error::Fallback;
use crate::selector::ThemeState;
use crate::theme::StatusPalette;

pub const PLACEHOLDER: &str = "--";
pub const DEFAULT_TIME_FORMAT: &str = "%a %b %-d %H:%M";

const CPU_MARKER: &str = "CPU usage:";
const MEM_MARKER: &str = "PhysMem:";

// Fixed widths keep the columns from jittering between ticks. CPU is at most
// `100.0%`; longer memory values are cut.
const CPU_WIDTH: usize = 6;
const MEM_WIDTH: usize = 6;
const BAT_WIDTH: usize = 5;

/// Values scraped out of a process/memory snapshot.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProcessStats {
    /// Percentage digits without the `%`, e.g. `"12.5"`.
    pub cpu: Option<String>,
    /// Value with unit, e.g. `"15G"`.
    pub mem: Option<String>,
}

/// Scans `stdout` line by line; the first line matching each marker wins.
#[must_use]
pub fn parse_process_output(output: &ProcessOutput) -> ProcessStats {
    if !output.success {
        debug!(fallback = %Fallback::ProcessInvocationFailed, stderr = %output.stderr.trim(), "stats");
        return ProcessStats::default();
    }
    let mut stats = ProcessStats::default();
    for line in output.stdout.lines() {
        if stats.cpu.is_none() {
            stats.cpu = value_after(line, CPU_MARKER, |c| c.is_ascii_digit() || c == '.')
                .filter(|v| v.parse::<f32>().is_ok());
        }
        if stats.mem.is_none() {
            stats.mem = value_after(line, MEM_MARKER, |c| c.is_ascii_digit() || c == '.')
                .and_then(|digits| with_unit(line, MEM_MARKER, digits));
        }
        if stats.cpu.is_some() && stats.mem.is_some() {
            break;
        }
    }
    if stats.cpu.is_none() || stats.mem.is_none() {
        debug!(fallback = %Fallback::PatternNotMatched, cpu = stats.cpu.is_some(), mem = stats.mem.is_some(), "stats");
    }
    stats
}

fn value_after(line: &str, marker: &str, accept: impl Fn(char) -> bool) -> Option<String> {
    let rest = &line[line.find(marker)? + marker.len()..];
    let value: String = rest.trim_start().chars().take_while(|&c| accept(c)).collect();
    if value.is_empty() {
        None
    } else {
        Some(value)
    }
}

fn with_unit(line: &str, marker: &str, digits: String) -> Option<String> {
    let rest = &line[line.find(marker)? + marker.len()..];
    let unit: String = rest
        .trim_start()
        .chars()
        .skip(digits.chars().count())
        .take_while(char::is_ascii_alphabetic)
        .collect();
    if unit.is_empty() {
        None
    } else {
        Some(format!("{digits}{unit}"))
    }
}

/// `"87%"`, or `"87%+"` while charging. Only the first reading counts.
#[must_use]
pub fn battery_label(batteries: &[BatteryReading]) -> Option<String> {
    let b = batteries.first()?;
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    let pct = (b.state_of_charge.clamp(0.0, 1.0) * 100.0).round() as u8;
    let suffix = if b.state == BatteryState::Charging { "+" } else { "" };
    Some(format!("{pct}%{suffix}"))
}

/// Formats `now`, falling back to the default layout when `fmt` is not valid strftime.
#[must_use]
pub fn format_time(now: &DateTime<Local>, fmt: &str) -> String {
    let items = StrftimeItems::new(fmt);
    if items.clone().any(|i| matches!(i, Item::Error)) {
        return now.format(DEFAULT_TIME_FORMAT).to_string();
    }
    now.format_with_items(items).to_string()
}

#[must_use]
pub fn is_valid_time_format(fmt: &str) -> bool {
    !StrftimeItems::new(fmt).any(|i| matches!(i, Item::Error))
}

fn fit(value: &str, width: usize) -> String {
    value.chars().take(width).collect()
}

/// Host name up to the first dot.
#[must_use]
pub fn short_hostname(hostname: &str) -> &str {
    let h = hostname.trim();
    h.split('.').next().unwrap_or(h)
}

pub struct StatusInput<'a> {
    pub now: DateTime<Local>,
    pub process: &'a ProcessOutput,
    pub batteries: &'a [BatteryReading],
    pub hostname: &'a str,
    pub theme: &'a ThemeState,
}

#[derive(Debug, Clone)]
pub struct StatusFormatter {
    pub time_format: String,
    pub show_hostname: bool,
    pub palette: StatusPalette,
}

impl Default for StatusFormatter {
    fn default() -> Self {
        Self {
            time_format: DEFAULT_TIME_FORMAT.to_string(),
            show_hostname: true,
            palette: StatusPalette::default(),
        }
    }
}

impl StatusFormatter {
    /// Builds the right-hand status line. Never fails: anything missing renders as `--`.
    #[must_use]
    pub fn render(&self, input: &StatusInput<'_>) -> Line {
        let p = &self.palette;
        let stats = parse_process_output(input.process);
        let mut spans = Vec::new();

        let mode = if input.theme.random_enabled { "🎲" } else { "📌" };
        spans.push(Span::colored(
            format!("{mode} {}", input.theme.current_name),
            p.theme,
        ));
        spans.push(Span::raw("  "));

        if self.show_hostname {
            spans.push(Span::colored(short_hostname(input.hostname).to_string(), p.hostname));
            spans.push(Span::raw("  "));
        }

        let cpu_value = stats
            .cpu
            .as_deref()
            .and_then(|c| c.parse::<f32>().ok())
            .map(|v| v.clamp(0.0, 100.0));
        let cpu_color = cpu_value.map_or(p.placeholder, |v| p.cpu_color(v));
        let cpu = cpu_value.map_or_else(|| PLACEHOLDER.to_string(), |v| format!("{v:.1}%"));
        spans.push(Span::colored(format!("CPU: {cpu:<width$}", width = CPU_WIDTH), cpu_color));

        let mem_color = if stats.mem.is_some() { p.mem } else { p.placeholder };
        let mem = stats
            .mem
            .map_or_else(|| PLACEHOLDER.to_string(), |m| fit(&m, MEM_WIDTH));
        spans.push(Span::colored(format!("MEM: {mem:<width$}", width = MEM_WIDTH), mem_color));

        let charging = input
            .batteries
            .first()
            .is_some_and(|b| b.state == BatteryState::Charging);
        let (bat, bat_color) = match battery_label(input.batteries) {
            Some(label) if charging => (label, p.battery_charging),
            Some(label) => (label, p.battery),
            None => (PLACEHOLDER.to_string(), p.placeholder),
        };
        spans.push(Span::colored(format!("BAT: {bat:<width$}", width = BAT_WIDTH), bat_color));

        spans.push(Span::colored(format_time(&input.now, &self.time_format), p.time));
        Line(spans)
    }
}
