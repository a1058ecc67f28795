use std::fs;
use std::process::Command;

use chrono::{DateTime, Local};
use sysinfo::{CpuRefreshKind, MemoryRefreshKind, RefreshKind, System};
use termrc_sdk::host::{
    Appearance, BatteryReading, BatteryState, Host, HostCommand, ProcessOutput,
};
use tracing::debug;

use crate::config::{AppearancePref, Config, SYSINFO_COMMAND};
use crate::error::Fallback;

/// Runs stats commands; `@sysinfo` is answered in-process with the same text layout
/// `top -l 1` prints, so one parser handles both.
pub struct StatsProbe {
    sys: Option<System>,
}

impl Default for StatsProbe {
    fn default() -> Self {
        Self::new()
    }
}

impl StatsProbe {
    #[must_use]
    pub fn new() -> Self {
        Self { sys: None }
    }

    pub fn run(&mut self, argv: &[String]) -> ProcessOutput {
        match argv.first().map(String::as_str) {
            None => ProcessOutput::failed("no stats command configured"),
            Some(SYSINFO_COMMAND) => self.sysinfo_snapshot(),
            Some(_) => run_argv(argv),
        }
    }

    fn sysinfo_snapshot(&mut self) -> ProcessOutput {
        let sys = self.sys.get_or_insert_with(|| {
            let mut sys = System::new_with_specifics(
                RefreshKind::new()
                    .with_cpu(CpuRefreshKind::everything())
                    .with_memory(MemoryRefreshKind::everything()),
            );
            // CPU usage is a delta; the first reading needs a second sample.
            std::thread::sleep(sysinfo::MINIMUM_CPU_UPDATE_INTERVAL);
            sys.refresh_cpu_specifics(CpuRefreshKind::everything());
            sys
        });
        sys.refresh_cpu_specifics(CpuRefreshKind::everything());
        sys.refresh_memory();

        let cpus = sys.cpus();
        let total = if cpus.is_empty() {
            0.0
        } else {
            #[allow(clippy::cast_precision_loss)]
            let len = cpus.len() as f32;
            cpus.iter().map(sysinfo::Cpu::cpu_usage).sum::<f32>() / len
        };
        let stdout = format!(
            "CPU usage: {total:.2}% user\nPhysMem: {} used\n",
            human_mem(sys.used_memory())
        );
        ProcessOutput {
            success: true,
            stdout,
            stderr: String::new(),
        }
    }
}

/// `15G` / `512M` style, rounded down like `top` prints it.
#[must_use]
pub fn human_mem(bytes: u64) -> String {
    const MIB: u64 = 1024 * 1024;
    const GIB: u64 = 1024 * MIB;
    if bytes >= GIB {
        format!("{}G", bytes / GIB)
    } else {
        format!("{}M", bytes / MIB)
    }
}

/// Runs `argv` synchronously and captures its output.
#[must_use]
pub fn run_argv(argv: &[String]) -> ProcessOutput {
    let Some((program, args)) = argv.split_first() else {
        return ProcessOutput::failed("empty command");
    };
    match Command::new(program).args(args).output() {
        Ok(out) => ProcessOutput {
            success: out.status.success(),
            stdout: String::from_utf8_lossy(&out.stdout).into_owned(),
            stderr: String::from_utf8_lossy(&out.stderr).into_owned(),
        },
        Err(e) => {
            debug!(fallback = %Fallback::ProcessInvocationFailed, program = %program, error = %e, "spawn");
            ProcessOutput::failed(e.to_string())
        }
    }
}

/// Host adapter for running outside a terminal emulator: queries the OS directly
/// and queues emitted commands for the caller to drain.
pub struct NativeHost {
    appearance: AppearancePref,
    themes: Vec<String>,
    probe: StatsProbe,
    outbox: Vec<HostCommand>,
}

impl NativeHost {
    #[must_use]
    pub fn new(cfg: &Config) -> Self {
        Self {
            appearance: cfg.appearance,
            themes: cfg.theme_names(),
            probe: StatsProbe::new(),
            outbox: Vec::new(),
        }
    }

    pub fn take_commands(&mut self) -> Vec<HostCommand> {
        std::mem::take(&mut self.outbox)
    }
}

impl Host for NativeHost {
    fn appearance(&self) -> Appearance {
        match self.appearance {
            AppearancePref::Dark => Appearance::Dark,
            AppearancePref::Light => Appearance::Light,
            AppearancePref::Auto => detect_appearance(),
        }
    }

    fn builtin_theme_names(&self) -> Vec<String> {
        self.themes.clone()
    }

    fn now(&self) -> DateTime<Local> {
        Local::now()
    }

    fn battery_info(&self) -> Vec<BatteryReading> {
        if cfg!(target_os = "macos") {
            read_battery_pmset()
        } else {
            read_battery_sysfs()
        }
    }

    fn hostname(&self) -> String {
        System::host_name().unwrap_or_else(|| "localhost".to_string())
    }

    fn run_child_process(&mut self, argv: &[String]) -> ProcessOutput {
        self.probe.run(argv)
    }

    fn emit(&mut self, cmd: HostCommand) {
        self.outbox.push(cmd);
    }
}

fn detect_appearance() -> Appearance {
    if cfg!(target_os = "macos") {
        let argv: Vec<String> = ["defaults", "read", "-g", "AppleInterfaceStyle"]
            .iter()
            .map(ToString::to_string)
            .collect();
        // The key only exists while dark mode is on.
        let out = run_argv(&argv);
        return if out.success && out.stdout.contains("Dark") {
            Appearance::Dark
        } else {
            Appearance::Light
        };
    }
    match std::env::var("TERMRC_APPEARANCE").ok().as_deref() {
        Some(v) if v.eq_ignore_ascii_case("light") => Appearance::Light,
        _ => Appearance::Dark,
    }
}

fn read_battery_sysfs() -> Vec<BatteryReading> {
    let Ok(entries) = fs::read_dir("/sys/class/power_supply") else {
        return Vec::new();
    };
    let mut readings = Vec::new();
    for entry in entries.flatten() {
        let path = entry.path();
        let kind = fs::read_to_string(path.join("type")).unwrap_or_default();
        if kind.trim() != "Battery" {
            continue;
        }
        let Some(capacity) = fs::read_to_string(path.join("capacity"))
            .ok()
            .and_then(|s| s.trim().parse::<f32>().ok())
        else {
            continue;
        };
        let status = fs::read_to_string(path.join("status")).unwrap_or_default();
        readings.push(BatteryReading {
            state_of_charge: (capacity / 100.0).clamp(0.0, 1.0),
            state: battery_state_from(status.trim()),
        });
    }
    readings
}

fn read_battery_pmset() -> Vec<BatteryReading> {
    let argv: Vec<String> = ["pmset", "-g", "batt"].iter().map(ToString::to_string).collect();
    let out = run_argv(&argv);
    if !out.success {
        return Vec::new();
    }
    parse_pmset(&out.stdout)
}

/// Parses `pmset -g batt` lines such as
/// ` -InternalBattery-0 (id=123)	87%; charging; 1:02 remaining present: true`.
#[must_use]
pub fn parse_pmset(stdout: &str) -> Vec<BatteryReading> {
    let mut readings = Vec::new();
    for line in stdout.lines() {
        let Some(pct_end) = line.find("%;") else {
            continue;
        };
        let digits: String = line[..pct_end]
            .chars()
            .rev()
            .take_while(char::is_ascii_digit)
            .collect::<Vec<_>>()
            .into_iter()
            .rev()
            .collect();
        let Ok(pct) = digits.parse::<f32>() else {
            continue;
        };
        let state = line[pct_end + 2..]
            .split(';')
            .next()
            .map_or(BatteryState::Unknown, |s| battery_state_from(s.trim()));
        readings.push(BatteryReading {
            state_of_charge: (pct / 100.0).clamp(0.0, 1.0),
            state,
        });
    }
    readings
}

fn battery_state_from(s: &str) -> BatteryState {
    match s.to_ascii_lowercase().as_str() {
        "charging" => BatteryState::Charging,
        "discharging" | "not charging" => BatteryState::Discharging,
        "full" | "charged" => BatteryState::Full,
        "empty" => BatteryState::Empty,
        _ => BatteryState::Unknown,
    }
}
