//! Field population.
//!
//! Walks a target's bindings in declaration order, resolves each one by
//! name or by type, checks assignability and writes the value into the
//! field. The first failure stops the walk; fields assigned before it keep
//! their new values.

use tracing::trace;

use crate::binding::{Binding, Inject, Lookup};
use crate::component::Target;
use crate::entry::Entry;
use crate::error::{InjectError, NotAssignableError, NotRegisteredError, Result};
use crate::registry::Registry;
use crate::resolver;

/// Populates `target` from `registry`.
///
/// A target whose fields cannot be reached is fine as long as its type
/// declares no bindings.
///
/// # Errors
/// - [`InjectError::NotInjectable`]: bindings exist but the fields are unreachable
/// - anything [`populate_fields`] returns
pub(crate) fn populate<T: Target + ?Sized>(registry: &Registry, target: &mut T) -> Result<()> {
    let type_info = target.type_info();
    let has_bindings = target.has_bindings();

    match target.visit(&mut |fields: &mut dyn Inject| populate_fields(registry, fields)) {
        Some(result) => result,
        None if !has_bindings => {
            trace!(ty = %type_info.short_name(), "Nothing to inject");
            Ok(())
        }
        None => Err(InjectError::NotInjectable {
            type_name: type_info.type_name(),
        }),
    }
}

/// Resolves and assigns every binding of `fields`.
///
/// # Errors
/// - [`InjectError::NotRegistered`]: a named dependency is missing
/// - [`InjectError::NotAssignable`]: the dependency's type does not fit the field
/// - [`InjectError::NoMatchingType`] / [`InjectError::AmbiguousType`]: auto-wiring failed
pub(crate) fn populate_fields(registry: &Registry, fields: &mut dyn Inject) -> Result<()> {
    for (index, binding) in fields.bindings().into_iter().enumerate() {
        let (dependency, entry) = lookup(registry, &binding)?;
        let expected = binding.type_info();

        let assigned = match entry.value_for(&expected) {
            Some(value) => fields.assign(index, value),
            None => false,
        };
        if !assigned {
            return Err(InjectError::NotAssignable(NotAssignableError {
                dependency: dependency.to_string(),
                target: format!("field `{}`", binding.field()),
                expected,
                actual: entry.type_info(),
            }));
        }

        trace!(field = binding.field(), dependency, "Injected field");
    }
    Ok(())
}

fn lookup<'r>(registry: &'r Registry, binding: &Binding) -> Result<(&'r str, &'r Entry)> {
    match binding.lookup() {
        Lookup::Auto => resolver::resolve(registry, &binding.type_info()),
        Lookup::Named(name) => registry.get_key_value(name).ok_or_else(|| {
            InjectError::NotRegistered(NotRegisteredError {
                dependency: name.to_string(),
                field: binding.field(),
                suggestions: registry.similar_names(name),
            })
        }),
    }
}
