//! Field annotations as an explicit wiring table.
//!
//! A struct that wants fields injected implements [`Inject`], usually with
//! `#[derive(Inject)]` and `#[inject("name")]` / `#[inject("auto")]` on the
//! fields. The trait hands the populator one [`Binding`] per annotated field
//! and a setter to write resolved values back.

use crate::entry::Value;
use crate::types::TypeInfo;

/// Annotation payload that requests resolution by type.
///
/// Also reserved: it can never be used as a registration name.
pub const AUTO: &str = "auto";

/// How an annotated field finds its dependency.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Lookup {
    /// Exact registered name.
    Named(&'static str),
    /// The unique entry assignable to the field's type.
    Auto,
}

impl Lookup {
    /// Interprets an annotation payload.
    pub fn parse(annotation: &'static str) -> Self {
        if annotation == AUTO {
            Lookup::Auto
        } else {
            Lookup::Named(annotation)
        }
    }
}

/// One annotated field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Binding {
    field: &'static str,
    lookup: Lookup,
    type_info: TypeInfo,
}

impl Binding {
    /// Declares that `field` of type `type_info` is resolved from `annotation`.
    pub fn new(field: &'static str, annotation: &'static str, type_info: TypeInfo) -> Self {
        Self {
            field,
            lookup: Lookup::parse(annotation),
            type_info,
        }
    }

    /// Field name.
    #[inline]
    pub fn field(&self) -> &'static str {
        self.field
    }

    #[inline]
    pub fn lookup(&self) -> Lookup {
        self.lookup
    }

    /// Type the field accepts.
    #[inline]
    pub fn type_info(&self) -> TypeInfo {
        self.type_info
    }
}

/// A struct whose annotated fields can be populated in place.
///
/// `bindings` lists the annotated fields in declaration order; `assign`
/// writes the value for the binding at `index` and returns `false` if the
/// value does not hold the field's type.
///
/// # Examples
/// ```
/// use wirebox_container::{Binding, Inject, TypeInfo, Value};
///
/// #[derive(Default)]
/// struct Server {
///     port: u16,
/// }
///
/// impl Inject for Server {
///     fn bindings(&self) -> Vec<Binding> {
///         vec![Binding::new("port", "http-port", TypeInfo::of::<u16>())]
///     }
///
///     fn assign(&mut self, index: usize, value: &Value) -> bool {
///         match (index, value.downcast_ref::<u16>()) {
///             (0, Some(port)) => {
///                 self.port = *port;
///                 true
///             }
///             _ => false,
///         }
///     }
/// }
/// ```
pub trait Inject {
    fn bindings(&self) -> Vec<Binding>;

    fn assign(&mut self, index: usize, value: &Value) -> bool;
}
