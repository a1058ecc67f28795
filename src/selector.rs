use rand::Rng;
use termrc_sdk::host::{Appearance, KeyValueStore};
use tracing::{debug, info};

use crate::catalog::ThemeCatalog;
use crate::error::{Fallback, ThemeError};
use crate::store::{THEME_CURRENT_KEY, THEME_RANDOM_KEY};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ThemeState {
    pub current_name: String,
    pub random_enabled: bool,
}

/// Appearance-dependent fallback used when no theme name was persisted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ThemeDefaults {
    pub dark: String,
    pub light: String,
}

impl ThemeDefaults {
    #[must_use]
    pub fn for_appearance(&self, appearance: Appearance) -> &str {
        if appearance.is_dark() {
            &self.dark
        } else {
            &self.light
        }
    }
}

#[derive(Debug, Clone, Copy)]
enum Step {
    Forward,
    Backward,
}

/// Owns the theme state and mirrors every mutation to the store.
pub struct ThemeSelector {
    catalog: ThemeCatalog,
    state: ThemeState,
    store: Box<dyn KeyValueStore>,
}

impl std::fmt::Debug for ThemeSelector {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ThemeSelector")
            .field("catalog_len", &self.catalog.len())
            .field("state", &self.state)
            .finish()
    }
}

impl ThemeSelector {
    /// Random mode is on when the flag was never persisted or reads `"true"`.
    /// The current name comes from the store, else the appearance default.
    pub fn initialize(
        catalog: ThemeCatalog,
        store: Box<dyn KeyValueStore>,
        appearance: Appearance,
        defaults: &ThemeDefaults,
    ) -> Self {
        let random_enabled = store
            .load(THEME_RANDOM_KEY)
            .map_or(true, |v| v.trim() == "true");
        let current_name = store
            .load(THEME_CURRENT_KEY)
            .map(|v| v.trim().to_string())
            .filter(|v| !v.is_empty())
            .unwrap_or_else(|| defaults.for_appearance(appearance).to_string());
        debug!(current = %current_name, random_enabled, "theme state initialized");
        Self {
            catalog,
            state: ThemeState {
                current_name,
                random_enabled,
            },
            store,
        }
    }

    #[must_use]
    pub fn state(&self) -> &ThemeState {
        &self.state
    }

    #[must_use]
    pub fn catalog(&self) -> &ThemeCatalog {
        &self.catalog
    }

    #[must_use]
    pub fn current(&self) -> &str {
        &self.state.current_name
    }

    /// Picks a uniformly random catalog entry, makes it current and persists it.
    ///
    /// # Errors
    /// Returns `ThemeError::EmptyCatalog` when there is nothing to pick from.
    pub fn pick_random<R: Rng + ?Sized>(&mut self, rng: &mut R) -> Result<&str, ThemeError> {
        if self.catalog.is_empty() {
            return Err(ThemeError::EmptyCatalog);
        }
        let position = rng.gen_range(1..=self.catalog.len());
        self.set_current(position);
        Ok(&self.state.current_name)
    }

    /// With random mode on, rolls a new theme; otherwise re-asserts the current one.
    ///
    /// # Errors
    /// Returns `ThemeError::EmptyCatalog` only when random mode is on and the catalog is empty.
    pub fn on_reload<R: Rng + ?Sized>(&mut self, rng: &mut R) -> Result<&str, ThemeError> {
        if self.state.random_enabled {
            self.pick_random(rng)
        } else {
            Ok(&self.state.current_name)
        }
    }

    /// # Errors
    /// Returns `ThemeError::EmptyCatalog` when the catalog is empty.
    pub fn next(&mut self) -> Result<&str, ThemeError> {
        self.step(Step::Forward)
    }

    /// # Errors
    /// Returns `ThemeError::EmptyCatalog` when the catalog is empty.
    pub fn previous(&mut self) -> Result<&str, ThemeError> {
        self.step(Step::Backward)
    }

    pub fn fix(&mut self) {
        self.state.random_enabled = false;
        self.persist_random();
        self.persist_current();
    }

    pub fn enable_random(&mut self) {
        self.state.random_enabled = true;
        self.persist_random();
    }

    fn step(&mut self, step: Step) -> Result<&str, ThemeError> {
        let n = self.catalog.len();
        if n == 0 {
            return Err(ThemeError::EmptyCatalog);
        }
        let i = self.catalog.index_of(&self.state.current_name);
        let position = match step {
            Step::Forward => i % n + 1,
            Step::Backward => (i + n - 2) % n + 1,
        };
        self.set_current(position);
        // Cycling by hand pins the theme.
        self.state.random_enabled = false;
        self.persist_random();
        Ok(&self.state.current_name)
    }

    fn set_current(&mut self, position: usize) {
        if let Some(name) = self.catalog.nth(position) {
            self.state.current_name = name.to_string();
            info!(theme = %self.state.current_name, position, "theme selected");
        }
        self.persist_current();
    }

    fn persist_current(&self) {
        if !self.store.save(THEME_CURRENT_KEY, &self.state.current_name) {
            debug!(fallback = %Fallback::FileWriteFailed, key = THEME_CURRENT_KEY, "persist");
        }
    }

    fn persist_random(&self) {
        let v = if self.state.random_enabled {
            "true"
        } else {
            "false"
        };
        if !self.store.save(THEME_RANDOM_KEY, v) {
            debug!(fallback = %Fallback::FileWriteFailed, key = THEME_RANDOM_KEY, "persist");
        }
    }
}
