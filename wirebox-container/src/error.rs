//! Error types for wirebox container operations.
//!
//! Every failure names what was asked for and what was found,
//! with a hint where one helps.

use std::fmt;

use wirebox_support::rendering::render_names;

use crate::binding::AUTO;
use crate::types::TypeInfo;

/// Boxed error returned by fallible factories.
pub type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Main error type for all wirebox operations.
#[derive(Debug, thiserror::Error)]
pub enum InjectError {
    /// The registration name is already in use.
    #[error("Dependency already registered: {name:?}")]
    DuplicateName { name: String },

    /// Attempt to register under the auto-wiring sentinel.
    #[error("\"auto\" is reserved for auto-wiring and cannot be used as a dependency name")]
    ReservedName,

    /// `get` on a name that was never registered.
    #[error("{}", .0)]
    NotFound(NotFoundError),

    /// A field annotation names a dependency that does not exist.
    #[error("{}", .0)]
    NotRegistered(NotRegisteredError),

    /// The resolved dependency cannot be assigned to its target.
    #[error("{}", .0)]
    NotAssignable(NotAssignableError),

    /// A type with annotated fields was handed over behind a handle that
    /// cannot be borrowed mutably.
    #[error(
        "{type_name} has annotated fields but is not reachable for in-place injection\n  \
         Hint: register owned structs with Definition::component, register an Arc before \
         sharing it, or wrap it in Arc<Mutex<_>>"
    )]
    NotInjectable { type_name: &'static str },

    /// Type-based resolution found no candidate.
    #[error("No registered dependency is assignable to {requested}")]
    NoMatchingType { requested: TypeInfo },

    /// Type-based resolution found more than one candidate.
    #[error("{}", .0)]
    AmbiguousType(AmbiguousTypeError),

    /// The factory does not declare one or two return values.
    #[error("Unsupported factory {factory}: expected 1 or 2 return values, found {returns}")]
    UnsupportedFactorySignature { factory: &'static str, returns: usize },

    /// The factory's second return value is not an error type.
    #[error("Second return value of factory {factory} must be an error type, found {found}")]
    SecondReturnMustBeError { factory: &'static str, found: TypeInfo },

    /// The factory's own failure, surfaced as-is.
    #[error(transparent)]
    FactoryExecutionFailed(BoxError),
}

/// Error when `get` is called with an unknown name.
#[derive(Debug)]
pub struct NotFoundError {
    /// The name that was requested
    pub name: String,
    /// Registered names that look similar
    pub suggestions: Vec<String>,
}

impl fmt::Display for NotFoundError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Dependency not found: {:?}", self.name)?;
        write_suggestions(f, &self.suggestions)
    }
}

/// Error when an annotation names a dependency that is not registered.
#[derive(Debug)]
pub struct NotRegisteredError {
    /// The dependency named by the annotation
    pub dependency: String,
    /// The annotated field
    pub field: &'static str,
    /// Registered names that look similar
    pub suggestions: Vec<String>,
}

impl fmt::Display for NotRegisteredError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Dependency {:?} is not registered\n  Required by field: {}",
            self.dependency, self.field
        )?;
        write_suggestions(f, &self.suggestions)?;
        write!(
            f,
            "\n  Hint: register {:?} before anything that injects it",
            self.dependency
        )
    }
}

/// Error when a resolved dependency's type does not fit its target.
#[derive(Debug)]
pub struct NotAssignableError {
    /// Name of the resolved dependency
    pub dependency: String,
    /// What was being assigned, e.g. ``field `port` ``
    pub target: String,
    /// The type the target declares
    pub expected: TypeInfo,
    /// The type the dependency actually has
    pub actual: TypeInfo,
}

impl fmt::Display for NotAssignableError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Dependency {:?} is not assignable to {} of type {}\n  Found: {}",
            self.dependency, self.target, self.expected, self.actual
        )
    }
}

/// Error when more than one entry fits the requested type.
#[derive(Debug)]
pub struct AmbiguousTypeError {
    /// The type that was requested
    pub requested: TypeInfo,
    /// Names of every matching entry, sorted
    pub candidates: Vec<String>,
}

impl fmt::Display for AmbiguousTypeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Ambiguous dependency for {}: {} candidates\n  Candidates: {}",
            self.requested,
            self.candidates.len(),
            render_names(&self.candidates)
        )?;
        write!(
            f,
            "\n  Hint: annotate the field with one of the names instead of {AUTO:?}"
        )
    }
}

fn write_suggestions(f: &mut fmt::Formatter<'_>, suggestions: &[String]) -> fmt::Result {
    if !suggestions.is_empty() {
        write!(f, "\n  Did you mean one of:")?;
        for suggestion in suggestions {
            write!(f, "\n    - {suggestion:?}")?;
        }
    }
    Ok(())
}

/// Convenient Result type for wirebox operations.
pub type Result<T> = std::result::Result<T, InjectError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn duplicate_name_display() {
        let err = InjectError::DuplicateName { name: "db".into() };
        assert_eq!(err.to_string(), r#"Dependency already registered: "db""#);
    }

    #[test]
    fn reserved_name_display() {
        let msg = InjectError::ReservedName.to_string();
        assert!(msg.starts_with(r#""auto" is reserved"#));
    }

    #[test]
    fn not_found_error_display() {
        let err = InjectError::NotFound(NotFoundError {
            name: "confg".into(),
            suggestions: vec!["config".into()],
        });

        let msg = format!("{err}");
        assert!(msg.contains("not found"));
        assert!(msg.contains("\"confg\""));
        assert!(msg.contains("Did you mean"));
        assert!(msg.contains("\"config\""));
    }

    #[test]
    fn not_registered_error_display() {
        let err = InjectError::NotRegistered(NotRegisteredError {
            dependency: "type-a".into(),
            field: "field",
            suggestions: vec![],
        });

        let msg = format!("{err}");
        assert!(msg.contains(r#""type-a" is not registered"#));
        assert!(msg.contains("Required by field: field"));
        assert!(!msg.contains("Did you mean"));
    }

    #[test]
    fn not_assignable_error_display() {
        let err = InjectError::NotAssignable(NotAssignableError {
            dependency: "cfg".into(),
            target: "field `port`".into(),
            expected: TypeInfo::of::<i64>(),
            actual: TypeInfo::of::<String>(),
        });

        let msg = format!("{err}");
        assert!(msg.contains(r#""cfg" is not assignable"#));
        assert!(msg.contains("i64"));
        assert!(msg.contains("String"));
    }

    #[test]
    fn ambiguous_type_error_display() {
        let err = InjectError::AmbiguousType(AmbiguousTypeError {
            requested: TypeInfo::of::<String>(),
            candidates: vec!["a".into(), "b".into()],
        });

        let msg = format!("{err}");
        assert!(msg.contains("Ambiguous"));
        assert!(msg.contains("alloc::string::String"));
        assert!(msg.contains(r#""a", "b""#));
    }

    #[test]
    fn factory_failure_is_transparent() {
        let source: BoxError = "random error".into();
        let err = InjectError::FactoryExecutionFailed(source);
        assert_eq!(err.to_string(), "random error");
    }
}
