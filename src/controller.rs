use rand::rngs::StdRng;
use rand::SeedableRng;
use termrc_sdk::events::Event;
use termrc_sdk::host::{Host, HostCommand, KeyValueStore};
use termrc_sdk::keys::KeyChord;
use termrc_sdk::render::Line;
use tracing::{debug, info, warn};

use crate::bindings::{Action, BindingTable, ThemeAction};
use crate::catalog::ThemeCatalog;
use crate::config::{Config, NotifyConfig};
use crate::selector::{ThemeDefaults, ThemeSelector, ThemeState};
use crate::status::{StatusFormatter, StatusInput};
use crate::theme::StatusPalette;

/// Everything the controller needs besides the host and the store.
#[derive(Debug, Clone)]
pub struct ControllerSettings {
    pub defaults: ThemeDefaults,
    pub formatter: StatusFormatter,
    pub stats_command: Vec<String>,
    pub notifications: NotifyConfig,
    pub bindings: BindingTable,
    /// Fixed seed for reproducible random picks.
    pub seed: Option<u64>,
}

impl ControllerSettings {
    /// Builds settings from config. Key specs that fail to parse are logged and skipped.
    #[must_use]
    pub fn from_config(cfg: &Config) -> Self {
        let mut bindings = BindingTable::defaults();
        for (spec, err) in bindings.extend_from_specs(&cfg.keys) {
            warn!(key = %spec.key, mods = %spec.mods, action = %spec.action, error = %err, "ignoring key binding");
        }
        Self {
            defaults: ThemeDefaults {
                dark: cfg.dark_theme.clone(),
                light: cfg.light_theme.clone(),
            },
            formatter: StatusFormatter {
                time_format: cfg.status.time_format.clone(),
                show_hostname: cfg.status.show_hostname,
                palette: StatusPalette::with_overrides(&cfg.status.colors),
            },
            stats_command: cfg.status.resolve_stats_command(),
            notifications: cfg.notifications.clone(),
            bindings,
            seed: None,
        }
    }
}

/// Owns the theme state and reacts to host events. Every handler is total: failures
/// are logged and the previous state stays in effect.
#[derive(Debug)]
pub struct Controller {
    selector: ThemeSelector,
    bindings: BindingTable,
    formatter: StatusFormatter,
    stats_command: Vec<String>,
    notifications: NotifyConfig,
    rng: StdRng,
}

impl Controller {
    /// Loads the catalog from the host (once) and restores persisted state.
    pub fn new(host: &dyn Host, store: Box<dyn KeyValueStore>, settings: ControllerSettings) -> Self {
        let catalog = ThemeCatalog::load(host);
        if catalog.is_empty() {
            warn!("host reported no themes; rotation is disabled");
        }
        let selector =
            ThemeSelector::initialize(catalog, store, host.appearance(), &settings.defaults);
        let rng = match settings.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        Self {
            selector,
            bindings: settings.bindings,
            formatter: settings.formatter,
            stats_command: settings.stats_command,
            notifications: settings.notifications,
            rng,
        }
    }

    #[must_use]
    pub fn state(&self) -> &ThemeState {
        self.selector.state()
    }

    #[must_use]
    pub fn catalog(&self) -> &ThemeCatalog {
        self.selector.catalog()
    }

    #[must_use]
    pub fn bindings(&self) -> &BindingTable {
        &self.bindings
    }

    pub fn on_startup(&mut self, host: &mut dyn Host) {
        self.apply(host);
    }

    pub fn on_reload(&mut self, host: &mut dyn Host) {
        match self.selector.on_reload(&mut self.rng) {
            Ok(name) => debug!(theme = %name, "reload"),
            Err(e) => warn!(error = %e, "reload kept current theme"),
        }
        self.apply(host);
    }

    /// Runs the stats command, renders the status line and hands it to the host.
    pub fn on_status_tick(&mut self, host: &mut dyn Host) -> Line {
        let process = host.run_child_process(&self.stats_command);
        let batteries = host.battery_info();
        let hostname = host.hostname();
        let line = self.formatter.render(&StatusInput {
            now: host.now(),
            process: &process,
            batteries: &batteries,
            hostname: &hostname,
            theme: self.selector.state(),
        });
        host.emit(HostCommand::SetRightStatus { line: line.clone() });
        line
    }

    /// Returns false when nothing is bound to `chord`.
    pub fn on_key_press(&mut self, host: &mut dyn Host, chord: KeyChord) -> bool {
        let Some(action) = self.bindings.lookup(&chord).cloned() else {
            debug!(%chord, "unbound key");
            return false;
        };
        debug!(%chord, %action, "key");
        match action {
            Action::Theme(t) => self.apply_theme_action(host, t),
            Action::Host(a) => host.emit(HostCommand::Perform(a)),
        }
        true
    }

    pub fn apply_theme_action(&mut self, host: &mut dyn Host, action: ThemeAction) {
        let result = match action {
            ThemeAction::Next => self.selector.next().map(|_| ()),
            ThemeAction::Previous => self.selector.previous().map(|_| ()),
            ThemeAction::Fix => {
                self.selector.fix();
                Ok(())
            }
            ThemeAction::Random => {
                self.selector.enable_random();
                Ok(())
            }
        };
        if let Err(e) = result {
            warn!(error = %e, ?action, "theme action ignored");
            return;
        }
        if matches!(action, ThemeAction::Next | ThemeAction::Previous) {
            self.apply(host);
        }
        self.notify(host);
    }

    fn apply(&self, host: &mut dyn Host) {
        let name = self.selector.current().to_string();
        info!(theme = %name, random = self.selector.state().random_enabled, "apply theme");
        host.emit(HostCommand::SetColorScheme { name });
    }

    fn notify(&self, host: &mut dyn Host) {
        if !self.notifications.enabled {
            return;
        }
        let state = self.selector.state();
        let mode = if state.random_enabled { "random" } else { "fixed" };
        let body = format!("{} ({mode})", state.current_name);
        host.emit(HostCommand::Toast {
            title: "Theme".to_string(),
            body,
            icon: self.notifications.icon.clone(),
            duration_ms: self.notifications.duration_ms,
        });
    }
}

type Handler = fn(&mut Controller, &mut dyn Host, &Event);

/// Routes host events to handlers registered per event kind.
pub struct Dispatcher {
    handlers: Vec<(termrc_sdk::events::EventKind, Handler)>,
}

impl Default for Dispatcher {
    fn default() -> Self {
        Self::new()
    }
}

impl Dispatcher {
    #[must_use]
    pub fn new() -> Self {
        Self {
            handlers: Vec::new(),
        }
    }

    #[must_use]
    pub fn register(mut self, kind: termrc_sdk::events::EventKind, handler: Handler) -> Self {
        self.handlers.push((kind, handler));
        self
    }

    /// The standard wiring: startup applies, reload rolls, tick renders, keys dispatch.
    #[must_use]
    pub fn with_defaults() -> Self {
        use termrc_sdk::events::EventKind;
        Self::new()
            .register(EventKind::Startup, |c, h, _| c.on_startup(h))
            .register(EventKind::ConfigReload, |c, h, _| c.on_reload(h))
            .register(EventKind::StatusTick, |c, h, _| {
                let _ = c.on_status_tick(h);
            })
            .register(EventKind::KeyPress, |c, h, e| {
                if let Event::KeyPress(chord) = e {
                    let _ = c.on_key_press(h, *chord);
                }
            })
    }

    /// Returns how many handlers ran.
    pub fn dispatch(&self, ctl: &mut Controller, host: &mut dyn Host, event: Event) -> usize {
        let kind = event.kind();
        let mut ran = 0;
        for (k, handler) in &self.handlers {
            if *k == kind {
                handler(ctl, host, &event);
                ran += 1;
            }
        }
        ran
    }
}
