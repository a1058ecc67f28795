use std::collections::HashSet;

use termrc_sdk::host::Host;
use tracing::debug;

use crate::error::Fallback;

/// Ordered, de-duplicated theme names. Positions are 1-based.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ThemeCatalog {
    names: Vec<String>,
}

impl ThemeCatalog {
    /// Keeps the first occurrence of each name, in the given order.
    pub fn from_names<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut seen = HashSet::new();
        let names = names
            .into_iter()
            .map(Into::into)
            .filter(|n: &String| seen.insert(n.clone()))
            .collect();
        Self { names }
    }

    pub fn load(host: &dyn Host) -> Self {
        Self::from_names(host.builtin_theme_names())
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.names.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    /// 1-based position of `name`, or 1 when it is not in the catalog.
    #[must_use]
    pub fn index_of(&self, name: &str) -> usize {
        match self.names.iter().position(|n| n == name) {
            Some(i) => i + 1,
            None => {
                debug!(fallback = %Fallback::NameNotInCatalog, name, "catalog lookup");
                1
            }
        }
    }

    /// Name at a 1-based position.
    #[must_use]
    pub fn nth(&self, position: usize) -> Option<&str> {
        position
            .checked_sub(1)
            .and_then(|i| self.names.get(i))
            .map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.names.iter().map(String::as_str)
    }
}
