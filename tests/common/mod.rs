#![allow(dead_code)]

use chrono::{DateTime, Local, TimeZone};
use termrc::store::FileStore;
use termrc::{Controller, ControllerSettings};
use termrc_sdk::host::{Appearance, BatteryReading, Host, HostCommand, ProcessOutput};

/// Host double: fixed inputs, records everything emitted.
pub struct FakeHost {
    pub appearance: Appearance,
    pub themes: Vec<String>,
    pub process: ProcessOutput,
    pub batteries: Vec<BatteryReading>,
    pub hostname: String,
    pub emitted: Vec<HostCommand>,
    pub process_calls: usize,
}

impl FakeHost {
    pub fn with_themes(themes: &[&str]) -> Self {
        Self {
            appearance: Appearance::Dark,
            themes: themes.iter().map(ToString::to_string).collect(),
            process: ProcessOutput::failed("not available"),
            batteries: Vec::new(),
            hostname: "devbox.local".to_string(),
            emitted: Vec::new(),
            process_calls: 0,
        }
    }

    pub fn schemes(&self) -> Vec<&str> {
        self.emitted
            .iter()
            .filter_map(|c| match c {
                HostCommand::SetColorScheme { name } => Some(name.as_str()),
                _ => None,
            })
            .collect()
    }

    pub fn toasts(&self) -> Vec<&str> {
        self.emitted
            .iter()
            .filter_map(|c| match c {
                HostCommand::Toast { body, .. } => Some(body.as_str()),
                _ => None,
            })
            .collect()
    }
}

pub fn fixed_now() -> DateTime<Local> {
    Local.with_ymd_and_hms(2024, 5, 17, 9, 5, 0).single().unwrap()
}

impl Host for FakeHost {
    fn appearance(&self) -> Appearance {
        self.appearance
    }

    fn builtin_theme_names(&self) -> Vec<String> {
        self.themes.clone()
    }

    fn now(&self) -> DateTime<Local> {
        fixed_now()
    }

    fn battery_info(&self) -> Vec<BatteryReading> {
        self.batteries.clone()
    }

    fn hostname(&self) -> String {
        self.hostname.clone()
    }

    fn run_child_process(&mut self, _argv: &[String]) -> ProcessOutput {
        self.process_calls += 1;
        self.process.clone()
    }

    fn emit(&mut self, cmd: HostCommand) {
        self.emitted.push(cmd);
    }
}

pub fn settings() -> ControllerSettings {
    let mut s = ControllerSettings::from_config(&termrc::config::Config::default());
    s.stats_command = vec!["top".to_string()];
    s.seed = Some(7);
    s
}

pub fn controller(host: &FakeHost, dir: &std::path::Path) -> Controller {
    Controller::new(host, Box::new(FileStore::new(dir)), settings())
}

pub fn read(dir: &std::path::Path, key: &str) -> Option<String> {
    std::fs::read_to_string(dir.join(key)).ok()
}
