//! # The Container
//!
//! Stores named values, runs factories and populates annotated fields of
//! everything it stores.
//!
//! # Architecture
//! ```text
//! register(name, def) ──> Factory Invoker ──> Field Populator ──> Registry
//!                              │                    │
//!                              └──> Type Resolver <─┘ (auto-wiring)
//!
//! inject(&mut target) ──> Field Populator
//! get(name)           ──> Registry
//! ```
//!
//! # Examples
//! ```rust
//! use std::sync::Arc;
//! use wirebox_container::prelude::*;
//!
//! struct Mailer {
//!     sender: String,
//! }
//!
//! let mut container = Container::new();
//! container.register("sender", Definition::value(String::from("noreply@example.com"))).unwrap();
//! container
//!     .register("mailer", Factory::new(|sender: String| Arc::new(Mailer { sender })))
//!     .unwrap();
//!
//! let mailer: Arc<Mailer> = container.get_as("mailer").unwrap();
//! assert_eq!(mailer.sender, "noreply@example.com");
//! ```

use std::fmt;
use std::sync::Arc;

use parking_lot::Mutex;
use tracing::{debug, instrument};

use crate::binding::Inject;
use crate::component::{Direct, SharedRef};
use crate::definition::{Definition, Origin};
use crate::entry::Value;
use crate::error::{InjectError, NotAssignableError, NotFoundError, Result};
use crate::factory;
use crate::populate::{populate, populate_fields};
use crate::registry::Registry;
use crate::settings::Settings;
use crate::types::TypeInfo;

// ============================================================
// ContainerBuilder
// ============================================================

/// Configures a [`Container`] before it is created.
///
/// # Examples
/// ```rust
/// use wirebox_container::{Container, Definition};
///
/// let mut container = Container::builder().anonymous_prefix("worker").build();
/// let name = container.register_anonymous(Definition::value(1u8)).unwrap();
/// assert_eq!(name, "worker.0");
/// ```
#[derive(Debug, Clone, Default)]
pub struct ContainerBuilder {
    settings: Settings,
}

impl ContainerBuilder {
    /// Prefix for names generated by [`Container::register_anonymous`].
    pub fn anonymous_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.settings.anonymous_prefix = prefix.into();
        self
    }

    /// How many similar names a lookup error may suggest. `0` disables them.
    pub fn max_suggestions(mut self, max: usize) -> Self {
        self.settings.max_suggestions = max;
        self
    }

    /// Replaces every setting at once, e.g. with values loaded from a config file.
    pub fn settings(mut self, settings: Settings) -> Self {
        self.settings = settings;
        self
    }

    pub fn build(self) -> Container {
        Container::with_settings(self.settings)
    }
}

// ============================================================
// Container
// ============================================================

/// The name-to-entry store and its registration, lookup and injection
/// operations.
///
/// Registration needs `&mut self` and is meant for a single-threaded
/// start-up phase. Afterwards the container can be shared behind an `Arc`:
/// [`get`](Container::get) and [`inject`](Container::inject) only borrow it.
pub struct Container {
    registry: Registry,
    settings: Settings,
}

impl Container {
    /// Creates an empty container with default [`Settings`].
    pub fn new() -> Self {
        Self::with_settings(Settings::default())
    }

    pub fn builder() -> ContainerBuilder {
        ContainerBuilder::default()
    }

    /// Creates an empty container with the given settings.
    pub fn with_settings(settings: Settings) -> Self {
        debug!(
            anonymous_prefix = %settings.anonymous_prefix,
            max_suggestions = settings.max_suggestions,
            "Creating container"
        );
        Self {
            registry: Registry::new(settings.max_suggestions),
            settings,
        }
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    // ── Registration ──

    /// Registers a definition under `name`.
    ///
    /// Factories are invoked first. The resulting value then has its
    /// annotated fields populated, its exposures attached, and is stored.
    /// Nothing is stored unless every step succeeds.
    ///
    /// # Errors
    /// - [`InjectError::ReservedName`]: `name` is `"auto"`
    /// - [`InjectError::DuplicateName`]: `name` is taken
    /// - any factory error, unchanged
    /// - any population error, unchanged
    pub fn register(
        &mut self,
        name: impl Into<String>,
        definition: impl Into<Definition>,
    ) -> Result<()> {
        self.register_named(name.into(), definition.into())
    }

    #[instrument(skip_all, fields(name = %name))]
    fn register_named(&mut self, name: String, definition: Definition) -> Result<()> {
        self.registry.check_name(&name)?;

        let (origin, exposures) = definition.into_parts();
        let mut component = match origin {
            Origin::Ready(component) => component,
            Origin::Factory(factory) => factory::invoke(&self.registry, factory)?,
        };
        populate(&self.registry, &mut *component)?;

        let mut entry = component.into_entry();
        for expose in exposures {
            entry = expose(entry, &name)?;
        }
        self.registry.insert(name, entry)
    }

    /// Registers a definition under a generated `<prefix>.<n>` name and
    /// returns that name.
    ///
    /// Generated names that are already taken are skipped.
    pub fn register_anonymous(&mut self, definition: impl Into<Definition>) -> Result<String> {
        let name = self.registry.next_anonymous_name(&self.settings.anonymous_prefix);
        self.register_named(name.clone(), definition.into())?;
        Ok(name)
    }

    // ── Lookup ──

    /// Returns the value stored under `name`.
    ///
    /// The returned handle shares the stored value; nothing is copied.
    ///
    /// # Errors
    /// [`InjectError::NotFound`] with similar names as suggestions.
    pub fn get(&self, name: &str) -> Result<Value> {
        self.registry
            .get(name)
            .map(|entry| entry.value().clone())
            .ok_or_else(|| self.not_found(name))
    }

    /// Returns the value stored under `name` as a `T`.
    ///
    /// `T` is the stored type or any type the entry was exposed as.
    ///
    /// # Errors
    /// - [`InjectError::NotFound`]: nothing is stored under `name`
    /// - [`InjectError::NotAssignable`]: the entry is not a `T`
    pub fn get_as<T: Clone + 'static>(&self, name: &str) -> Result<T> {
        let entry = self.registry.get(name).ok_or_else(|| self.not_found(name))?;
        entry.extract::<T>().ok_or_else(|| {
            InjectError::NotAssignable(NotAssignableError {
                dependency: name.to_string(),
                target: format!("get_as::<{}>", TypeInfo::of::<T>().short_name()),
                expected: TypeInfo::of::<T>(),
                actual: entry.type_info(),
            })
        })
    }

    // ── Injection ──

    /// Populates the annotated fields of `target` without registering it.
    ///
    /// On failure, fields processed before the failing one keep their new
    /// values.
    #[instrument(skip_all, fields(ty = %TypeInfo::of::<T>().short_name()))]
    pub fn inject<T: Inject + 'static>(&self, target: &mut T) -> Result<()> {
        populate(&self.registry, &mut Direct(target))
    }

    /// Populates a struct behind an `Arc`.
    ///
    /// # Errors
    /// [`InjectError::NotInjectable`] if the `Arc` is shared and `T` has
    /// annotated fields.
    #[instrument(skip_all, fields(ty = %TypeInfo::of::<T>().short_name()))]
    pub fn inject_shared<T: Inject + 'static>(&self, target: &mut Arc<T>) -> Result<()> {
        populate(&self.registry, &mut SharedRef(target))
    }

    /// Populates a struct behind a mutex, holding the lock while doing so.
    #[instrument(skip_all, fields(ty = %TypeInfo::of::<T>().short_name()))]
    pub fn inject_locked<T: Inject + 'static>(&self, target: &Mutex<T>) -> Result<()> {
        let mut guard = target.lock();
        populate_fields(&self.registry, &mut *guard)
    }

    // ── Panicking wrappers ──

    /// Like [`register`](Container::register) but panics on error.
    #[track_caller]
    pub fn must_register(&mut self, name: impl Into<String>, definition: impl Into<Definition>) {
        if let Err(err) = self.register(name, definition) {
            panic!("{err}");
        }
    }

    /// Like [`register_anonymous`](Container::register_anonymous) but panics on error.
    #[track_caller]
    pub fn must_register_anonymous(&mut self, definition: impl Into<Definition>) -> String {
        self.register_anonymous(definition).unwrap_or_else(|err| panic!("{err}"))
    }

    /// Like [`get`](Container::get) but panics on error.
    #[track_caller]
    pub fn must_get(&self, name: &str) -> Value {
        self.get(name).unwrap_or_else(|err| panic!("{err}"))
    }

    /// Like [`inject`](Container::inject) but panics on error.
    #[track_caller]
    pub fn must_inject<T: Inject + 'static>(&self, target: &mut T) {
        if let Err(err) = self.inject(target) {
            panic!("{err}");
        }
    }

    // ── Introspection ──

    pub fn len(&self) -> usize {
        self.registry.len()
    }

    pub fn is_empty(&self) -> bool {
        self.registry.is_empty()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.registry.contains(name)
    }

    /// Every registered name, sorted.
    pub fn names(&self) -> Vec<&str> {
        self.registry.names()
    }

    fn not_found(&self, name: &str) -> InjectError {
        InjectError::NotFound(NotFoundError {
            name: name.to_string(),
            suggestions: self.registry.similar_names(name),
        })
    }
}

impl Default for Container {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for Container {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Container")
            .field("registered", &self.registry.len())
            .field("settings", &self.settings)
            .finish()
    }
}

// ============================================================
// Prelude
// ============================================================

pub mod prelude {
    pub use super::{Container, ContainerBuilder};
    pub use crate::binding::{Binding, Inject};
    pub use crate::definition::Definition;
    pub use crate::entry::{Entry, Value};
    pub use crate::error::{InjectError, Result};
    pub use crate::factory::Factory;
    pub use crate::settings::Settings;
    pub use crate::types::TypeInfo;
}

// ============================================================
// Tests
// ============================================================
