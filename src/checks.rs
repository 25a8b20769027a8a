//! Named check registries and selection filtering.
//!
//! Validators and policy checks are both registered by name and selected
//! from the config's name lists with the same rules:
//!
//! - an empty selection runs every registered check
//! - otherwise only requested checks run, in registration order
//! - requested names that match nothing are reported, never an error

use std::collections::BTreeSet;
use std::fmt;

use tracing::debug;

/// Anything addressable by a stable, unique name.
pub trait NamedCheck {
    /// Returns the check's unique name (e.g. `azure.cli.available`).
    fn name(&self) -> &str;
}

/// An ordered, name-unique collection of checks.
pub struct CheckRegistry<C: ?Sized> {
    checks: Vec<Box<C>>,
}

/// The checks chosen by a selection, plus requested names that matched
/// nothing.
pub struct Selection<'a, C: ?Sized> {
    /// Checks to run, in registration order.
    pub selected: Vec<&'a C>,
    /// Unknown requested names, sorted and de-duplicated.
    pub unknown: Vec<String>,
}

impl<C: ?Sized + NamedCheck> CheckRegistry<C> {
    /// Creates an empty registry.
    #[must_use]
    pub const fn new() -> Self {
        Self { checks: Vec::new() }
    }

    /// Registers a check. A check with the same name is replaced in place.
    pub fn register(&mut self, check: Box<C>) {
        debug!("Registering check: {}", check.name());
        if let Some(slot) = self.checks.iter_mut().find(|c| c.name() == check.name()) {
            *slot = check;
        } else {
            self.checks.push(check);
        }
    }

    /// Builder-style registration.
    #[must_use]
    pub fn with(mut self, check: Box<C>) -> Self {
        self.register(check);
        self
    }

    /// Returns a check by name.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&C> {
        self.checks.iter().find(|c| c.name() == name).map(|c| &**c)
    }

    /// Returns all registered names, in registration order.
    #[must_use]
    pub fn names(&self) -> Vec<&str> {
        self.checks.iter().map(|c| c.name()).collect()
    }

    /// Returns the number of registered checks.
    #[must_use]
    pub fn len(&self) -> usize {
        self.checks.len()
    }

    /// Returns true if nothing is registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.checks.is_empty()
    }

    /// Selects checks by requested names.
    #[must_use]
    pub fn select(&self, requested: &[String]) -> Selection<'_, C> {
        if requested.is_empty() {
            return Selection {
                selected: self.checks.iter().map(|c| &**c).collect(),
                unknown: Vec::new(),
            };
        }

        let wanted: BTreeSet<&str> = requested.iter().map(String::as_str).collect();
        let selected = self
            .checks
            .iter()
            .map(|c| &**c)
            .filter(|c| wanted.contains(c.name()))
            .collect();
        let unknown = wanted
            .into_iter()
            .filter(|name| self.get(name).is_none())
            .map(String::from)
            .collect();

        Selection { selected, unknown }
    }
}

impl<C: ?Sized + NamedCheck> Default for CheckRegistry<C> {
    fn default() -> Self {
        Self::new()
    }
}

impl<C: ?Sized + NamedCheck> fmt::Debug for CheckRegistry<C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CheckRegistry")
            .field("checks", &self.names())
            .finish()
    }
}

impl<C: ?Sized> Selection<'_, C> {
    /// Returns the unknown names as a comma separated list.
    #[must_use]
    pub fn unknown_list(&self) -> String {
        self.unknown.join(", ")
    }
}
