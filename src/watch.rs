use std::io;
use std::path::Path;
use std::time::{Duration, Instant};

use anyhow::Result;
use chrono::{DateTime, Local};
use crossterm::event::{self, Event as TermEvent, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use crossterm::execute;
use crossterm::terminal::{
    EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode,
};
use ratatui::Terminal;
use ratatui::backend::{Backend, CrosstermBackend};
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Paragraph, Wrap};
use termrc_sdk::events::Event;
use termrc_sdk::host::{
    Appearance, BatteryReading, Host, HostAction, HostCommand, ProcessOutput,
};
use termrc_sdk::keys::{Key, KeyChord, Mods};
use tokio::sync::mpsc;
use tracing::debug;

use crate::bindings::Action;
use crate::config::Config;
use crate::controller::{Controller, ControllerSettings, Dispatcher};
use crate::frame;
use crate::host::{NativeHost, StatsProbe};
use crate::store::FileStore;

/// Samples the stats command off the UI thread so a slow `top` never stalls key handling.
#[must_use]
pub fn start_sampler(argv: Vec<String>, every: Duration) -> mpsc::Receiver<ProcessOutput> {
    let (tx, rx) = mpsc::channel::<ProcessOutput>(8);
    tokio::spawn(async move {
        let mut probe = StatsProbe::new();
        let mut ticker = tokio::time::interval(every);
        loop {
            ticker.tick().await;
            let out = tokio::task::block_in_place(|| probe.run(&argv));
            if tx.send(out).await.is_err() {
                break;
            }
        }
    });
    rx
}

/// Native host whose process runs are served from the background sampler.
pub struct WatchHost {
    inner: NativeHost,
    rx: mpsc::Receiver<ProcessOutput>,
    latest: Option<ProcessOutput>,
}

impl WatchHost {
    #[must_use]
    pub fn new(inner: NativeHost, rx: mpsc::Receiver<ProcessOutput>) -> Self {
        Self {
            inner,
            rx,
            latest: None,
        }
    }

    pub fn take_commands(&mut self) -> Vec<HostCommand> {
        self.inner.take_commands()
    }
}

impl Host for WatchHost {
    fn appearance(&self) -> Appearance {
        self.inner.appearance()
    }

    fn builtin_theme_names(&self) -> Vec<String> {
        self.inner.builtin_theme_names()
    }

    fn now(&self) -> DateTime<Local> {
        self.inner.now()
    }

    fn battery_info(&self) -> Vec<BatteryReading> {
        self.inner.battery_info()
    }

    fn hostname(&self) -> String {
        self.inner.hostname()
    }

    fn run_child_process(&mut self, _argv: &[String]) -> ProcessOutput {
        while let Ok(out) = self.rx.try_recv() {
            self.latest = Some(out);
        }
        self.latest
            .clone()
            .unwrap_or_else(|| ProcessOutput::failed("waiting for first sample"))
    }

    fn emit(&mut self, cmd: HostCommand) {
        self.inner.emit(cmd);
    }
}

/// What the watch screen shows, rebuilt from the commands the controller emits.
#[derive(Debug, Default)]
pub struct WatchView {
    pub theme: String,
    pub status: termrc_sdk::render::Line,
    /// Last toast or forwarded host action.
    pub message: Option<String>,
}

impl WatchView {
    /// Returns true when a binding asked the host to reload its configuration.
    pub fn absorb(&mut self, cmds: Vec<HostCommand>) -> bool {
        let mut reload = false;
        for cmd in cmds {
            match cmd {
                HostCommand::SetColorScheme { name } => self.theme = name,
                HostCommand::SetRightStatus { line } => self.status = line,
                HostCommand::Toast { title, body, .. } => {
                    self.message = Some(format!("{title}: {body}"));
                }
                HostCommand::Perform(HostAction::ReloadConfiguration) => reload = true,
                HostCommand::Perform(a) => {
                    self.message = Some(format!("host action: {}", Action::Host(a)));
                }
            }
        }
        reload
    }
}

#[must_use]
pub fn chord_from_key(key: &KeyEvent) -> Option<KeyChord> {
    let mut mods = Mods::NONE;
    if key.modifiers.contains(KeyModifiers::SHIFT) {
        mods |= Mods::SHIFT;
    }
    if key.modifiers.contains(KeyModifiers::CONTROL) {
        mods |= Mods::CTRL;
    }
    if key.modifiers.contains(KeyModifiers::ALT) {
        mods |= Mods::ALT;
    }
    if key.modifiers.contains(KeyModifiers::SUPER) {
        mods |= Mods::SUPER;
    }
    let k = match key.code {
        KeyCode::Char(c) => Key::Char(c.to_ascii_lowercase()),
        KeyCode::Left => Key::LeftArrow,
        KeyCode::Right => Key::RightArrow,
        KeyCode::Up => Key::UpArrow,
        KeyCode::Down => Key::DownArrow,
        KeyCode::Enter => Key::Enter,
        KeyCode::Tab => Key::Tab,
        KeyCode::BackTab => {
            mods |= Mods::SHIFT;
            Key::Tab
        }
        KeyCode::Esc => Key::Escape,
        KeyCode::Backspace => Key::Backspace,
        KeyCode::PageUp => Key::PageUp,
        KeyCode::PageDown => Key::PageDown,
        KeyCode::F(n) => Key::Function(n),
        _ => return None,
    };
    Some(KeyChord::new(k, mods))
}

/// Full-screen adapter: startup, periodic status ticks and key presses, until `q`/`Esc`.
///
/// # Errors
/// Returns an error when the terminal cannot be set up or drawn.
pub fn run(cfg: &Config, state_dir: &Path) -> Result<()> {
    let interval = Duration::from_millis(cfg.status.interval_ms.max(100));
    let rx = start_sampler(cfg.status.resolve_stats_command(), interval);
    let mut host = WatchHost::new(NativeHost::new(cfg), rx);
    let mut ctl = Controller::new(
        &host,
        Box::new(FileStore::new(state_dir)),
        ControllerSettings::from_config(cfg),
    );
    let dispatcher = Dispatcher::with_defaults();
    let mut view = WatchView::default();
    dispatcher.dispatch(&mut ctl, &mut host, Event::Startup);
    dispatcher.dispatch(&mut ctl, &mut host, Event::StatusTick);
    let _ = view.absorb(host.take_commands());

    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let mut terminal = Terminal::new(CrosstermBackend::new(stdout))?;
    terminal.hide_cursor()?;

    let result = event_loop(&mut terminal, &mut ctl, &mut host, &dispatcher, &mut view, interval);

    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;
    result
}

fn event_loop<B: Backend>(
    terminal: &mut Terminal<B>,
    ctl: &mut Controller,
    host: &mut WatchHost,
    dispatcher: &Dispatcher,
    view: &mut WatchView,
    interval: Duration,
) -> Result<()> {
    let mut last_tick = Instant::now();
    loop {
        terminal.draw(|f| draw(f, view, ctl))?;

        let timeout = interval.saturating_sub(last_tick.elapsed());
        if event::poll(timeout)? {
            if let TermEvent::Key(key) = event::read()? {
                if key.kind != KeyEventKind::Press {
                    continue;
                }
                if key.modifiers.is_empty() && matches!(key.code, KeyCode::Char('q') | KeyCode::Esc)
                {
                    return Ok(());
                }
                if let Some(chord) = chord_from_key(&key) {
                    debug!(%chord, "key press");
                    dispatcher.dispatch(ctl, host, Event::KeyPress(chord));
                }
            }
        }

        if last_tick.elapsed() >= interval {
            dispatcher.dispatch(ctl, host, Event::StatusTick);
            last_tick = Instant::now();
        }

        if view.absorb(host.take_commands()) {
            dispatcher.dispatch(ctl, host, Event::ConfigReload);
            let _ = view.absorb(host.take_commands());
        }
    }
}

fn draw(f: &mut ratatui::Frame, view: &WatchView, ctl: &Controller) {
    let (body, status) = frame::split_main_area(f.area());
    let inner = frame::render_border_block(" termrc ", body, f);

    let state = ctl.state();
    let catalog = ctl.catalog();
    let bold = Style::default().add_modifier(Modifier::BOLD);
    let dim = Style::default().add_modifier(Modifier::DIM);

    let mut lines: Vec<Line> = vec![
        Line::from(vec![
            Span::raw("Theme: "),
            Span::styled(view.theme.clone(), bold),
            Span::styled(
                if state.random_enabled { "  (random)" } else { "  (fixed)" },
                dim,
            ),
        ]),
        Line::from(format!(
            "Catalog: {} themes, position {}",
            catalog.len(),
            catalog.index_of(&state.current_name)
        )),
        Line::from(""),
        Line::styled("Bindings", bold),
    ];
    for b in ctl.bindings().effective() {
        lines.push(Line::from(format!("  {:<24} {}", b.chord.to_string(), b.action)));
    }
    lines.push(Line::from(""));
    lines.push(Line::styled("q / Esc to quit", dim));
    if let Some(msg) = &view.message {
        lines.push(Line::from(msg.clone()));
    }
    f.render_widget(Paragraph::new(lines).wrap(Wrap { trim: false }), inner);

    frame::render_status_bar(frame::to_ratatui_line(&view.status), status, f);
}
