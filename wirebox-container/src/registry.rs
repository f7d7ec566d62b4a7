//! Dependency registry: the name-to-entry store.
//!
//! The registry only stores; resolution, population and factory
//! invocation live in their own modules and read from it.

use std::collections::HashMap;

use tracing::{debug, trace};
use wirebox_support::rendering::suggest_names;

use crate::binding::AUTO;
use crate::entry::Entry;
use crate::error::{InjectError, Result};

/// Stores every registered entry by name.
///
/// Grows monotonically: nothing is ever removed or replaced.
#[derive(Debug)]
pub(crate) struct Registry {
    entries: HashMap<String, Entry>,
    /// Next candidate suffix for anonymous names; only ever increases.
    anonymous: usize,
    max_suggestions: usize,
}

impl Registry {
    /// Creates an empty registry.
    pub fn new(max_suggestions: usize) -> Self {
        Self {
            entries: HashMap::new(),
            anonymous: 0,
            max_suggestions,
        }
    }

    /// Checks that `name` could be inserted.
    ///
    /// # Errors
    /// [`InjectError::ReservedName`] for the auto-wiring sentinel,
    /// [`InjectError::DuplicateName`] if the name is taken.
    pub fn check_name(&self, name: &str) -> Result<()> {
        if name == AUTO {
            return Err(InjectError::ReservedName);
        }
        if self.entries.contains_key(name) {
            return Err(InjectError::DuplicateName {
                name: name.to_string(),
            });
        }
        Ok(())
    }

    /// Stores an entry under a name.
    pub fn insert(&mut self, name: String, entry: Entry) -> Result<()> {
        self.check_name(&name)?;
        debug!(name = %name, ty = %entry.type_info().short_name(), "Registered dependency");
        self.entries.insert(name, entry);
        Ok(())
    }

    /// Looks up an entry by name.
    pub fn get(&self, name: &str) -> Option<&Entry> {
        self.entries.get(name)
    }

    /// Looks up an entry by name, returning its stored key as well.
    pub fn get_key_value(&self, name: &str) -> Option<(&str, &Entry)> {
        self.entries
            .get_key_value(name)
            .map(|(key, entry)| (key.as_str(), entry))
    }

    pub fn contains(&self, name: &str) -> bool {
        self.entries.contains_key(name)
    }

    /// Iterates every entry, in no particular order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &Entry)> {
        self.entries.iter().map(|(name, entry)| (name.as_str(), entry))
    }

    /// Returns the first free `<prefix>.<n>` name.
    ///
    /// The counter advances only past names that are already taken.
    pub fn next_anonymous_name(&mut self, prefix: &str) -> String {
        loop {
            let candidate = format!("{prefix}.{}", self.anonymous);
            if !self.contains(&candidate) {
                return candidate;
            }
            trace!(name = %candidate, "Anonymous name taken, advancing");
            self.anonymous += 1;
        }
    }

    /// Registered names similar to `name`, for error hints.
    pub fn similar_names(&self, name: &str) -> Vec<String> {
        let names: Vec<&str> = self.entries.keys().map(String::as_str).collect();
        suggest_names(name, &names, self.max_suggestions)
    }

    /// All registered names, sorted.
    pub fn names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.entries.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }

    /// Returns the number of registered dependencies.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns true if no dependencies are registered.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
