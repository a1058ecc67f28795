#![allow(clippy::uninlined_format_args)]

use std::path::{Path, PathBuf};

use anyhow::Result;
use clap::Parser as ClapParser;
use clap::Subcommand;
use crossterm::style::Stylize;
use termrc::bindings::ThemeAction;
use termrc::config::{self, Config};
use termrc::host::NativeHost;
use termrc::store::{default_state_dir, FileStore, THEME_CURRENT_KEY, THEME_RANDOM_KEY};
use termrc::theme::to_crossterm;
use termrc::{Controller, ControllerSettings, Dispatcher};
use termrc_sdk::events::Event;
use termrc_sdk::host::{HostCommand, KeyValueStore};
use termrc_sdk::render::Line;
use tracing::error;
use tracing_subscriber::EnvFilter;

#[derive(ClapParser, Debug)]
#[command(name = "termrc", version, about = "Terminal theme rotation, key bindings and status line")]
struct Cli {
    /// Config file (TOML/YAML/JSON). Defaults to <config dir>/termrc/config.*
    #[arg(long, value_name = "PATH", global = true)]
    config: Option<PathBuf>,

    /// Directory holding theme_current and theme_random
    #[arg(long, value_name = "DIR", global = true)]
    state_dir: Option<PathBuf>,

    #[command(subcommand)]
    cmd: Option<Cmd>,
}

#[derive(Subcommand, Debug)]
enum Cmd {
    /// Print the current theme and random mode (default)
    Show,
    /// Render one status line
    Status {
        /// No colors
        #[arg(long, default_value_t = false)]
        plain: bool,
    },
    /// Advance to the next theme and pin it
    Next,
    /// Go back to the previous theme and pin it
    Prev,
    /// Pin the current theme
    Fix,
    /// Turn random rotation back on
    Random,
    /// Simulate a config reload (rolls a new theme in random mode)
    Reload,
    /// List the effective key bindings
    Keys,
    /// Full-screen status and key binding view
    Watch,
    /// Diagnose configuration and persisted state
    Doctor {
        /// Write a default config file when none exists
        #[arg(long, default_value_t = false)]
        init: bool,
    },
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new("info"))
        .unwrap_or_else(|_| EnvFilter::new("info"));
    let is_json = matches!(
        std::env::var("TERMRC_LOG_FORMAT").ok().as_deref(),
        Some("json") | Some("JSON")
    );
    if is_json {
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_writer(std::io::stderr)
            .json()
            .init();
    } else {
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_writer(std::io::stderr)
            .init();
    }
}

#[tokio::main]
async fn main() {
    init_tracing();
    let code = match cli_main() {
        Ok(code) => code,
        Err(e) => {
            error!(error = %e, "termrc error");
            1
        }
    };
    std::process::exit(code);
}

fn cli_main() -> Result<i32> {
    let cli = Cli::parse();
    let (cfg, cfg_path) = config::load_config(cli.config.as_deref())?;
    let state_dir = cli
        .state_dir
        .clone()
        .or_else(|| cfg.state_dir.clone())
        .unwrap_or_else(default_state_dir);

    match cli.cmd.unwrap_or(Cmd::Show) {
        Cmd::Keys => {
            let settings = ControllerSettings::from_config(&cfg);
            for b in settings.bindings.effective() {
                println!("{:<24} {}", b.chord.to_string(), b.action);
            }
            Ok(0)
        }
        Cmd::Doctor { init } => doctor(&cfg, cfg_path.as_deref(), &state_dir, init),
        Cmd::Watch => {
            termrc::watch::run(&cfg, &state_dir)?;
            Ok(0)
        }
        cmd => run_event(&cfg, &state_dir, cmd),
    }
}

fn run_event(cfg: &Config, state_dir: &Path, cmd: Cmd) -> Result<i32> {
    let mut host = NativeHost::new(cfg);
    let mut ctl = Controller::new(
        &host,
        Box::new(FileStore::new(state_dir)),
        ControllerSettings::from_config(cfg),
    );
    let dispatcher = Dispatcher::with_defaults();
    dispatcher.dispatch(&mut ctl, &mut host, Event::Startup);

    match cmd {
        Cmd::Status { plain } => {
            let _ = host.take_commands();
            let line = ctl.on_status_tick(&mut host);
            println!("{}", if plain { line.plain() } else { colorize(&line) });
            return Ok(0);
        }
        Cmd::Next => ctl.apply_theme_action(&mut host, ThemeAction::Next),
        Cmd::Prev => ctl.apply_theme_action(&mut host, ThemeAction::Previous),
        Cmd::Fix => ctl.apply_theme_action(&mut host, ThemeAction::Fix),
        Cmd::Random => ctl.apply_theme_action(&mut host, ThemeAction::Random),
        Cmd::Reload => {
            dispatcher.dispatch(&mut ctl, &mut host, Event::ConfigReload);
        }
        _ => {}
    }

    for cmd in host.take_commands() {
        if let HostCommand::Toast { title, body, .. } = cmd {
            eprintln!("{title}: {body}");
        }
    }
    let state = ctl.state();
    println!("theme: {}", state.current_name);
    println!("random: {}", state.random_enabled);
    Ok(0)
}

fn colorize(line: &Line) -> String {
    line.0
        .iter()
        .map(|s| match s.color {
            Some(c) => s.text.clone().with(to_crossterm(c)).to_string(),
            None => s.text.clone(),
        })
        .collect()
}

fn doctor(cfg: &Config, cfg_path: Option<&Path>, state_dir: &Path, init: bool) -> Result<i32> {
    println!("termrc doctor\n=============");

    println!("\nConfig:");
    match cfg_path {
        Some(p) => println!("  \x1b[32m[file]\x1b[0m using: {}", p.display()),
        None => println!(
            "  \x1b[90m[default]\x1b[0m no config file in {}",
            config::config_home().display()
        ),
    }
    if init && cfg_path.is_none() {
        let target = config::config_home().join("config.toml");
        config::save_config(&target, &Config::default())?;
        println!("  \x1b[32m[init]\x1b[0m wrote {}", target.display());
    }

    let (errors, warnings) = config::validate_config(cfg);
    for e in &errors {
        println!("  \x1b[31m[error]\x1b[0m {}", e);
    }
    for w in &warnings {
        println!("  \x1b[33m[warn]\x1b[0m {}", w);
    }
    if errors.is_empty() && warnings.is_empty() {
        println!("  \x1b[32m[ok]\x1b[0m config is valid");
    }

    println!("\nThemes:");
    println!("  catalog: {} names", cfg.theme_names().len());
    println!("  defaults: dark='{}' light='{}'", cfg.dark_theme, cfg.light_theme);

    println!("\nStatus:");
    println!("  stats command: {}", cfg.status.resolve_stats_command().join(" "));
    println!("  interval: {}ms", cfg.status.interval_ms);

    println!("\nState ({}):", state_dir.display());
    let store = FileStore::new(state_dir);
    for key in [THEME_CURRENT_KEY, THEME_RANDOM_KEY] {
        match store.load(key) {
            Some(v) => println!("  {}: '{}'", key, v.trim()),
            None => println!("  \x1b[90m[absent]\x1b[0m {}", key),
        }
    }

    Ok(if errors.is_empty() { 0 } else { 1 })
}
