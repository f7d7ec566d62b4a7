//! Core container implementation for wirebox.

pub mod binding;
pub mod component;
pub mod container;
pub mod definition;
pub mod entry;
pub mod error;
pub mod factory;
mod populate;
mod registry;
mod resolver;
pub mod settings;
pub mod types;

pub use binding::{AUTO, Binding, Inject, Lookup};
pub use component::{Component, Target};
#[doc(hidden)]
pub use component::AnnotatedType;
#[doc(hidden)]
pub use inventory;
pub use container::{Container, ContainerBuilder, prelude};
pub use definition::Definition;
pub use entry::{Entry, Value};
pub use error::{
    AmbiguousTypeError, BoxError, InjectError, NotAssignableError, NotFoundError,
    NotRegisteredError, Result,
};
pub use factory::{Factory, FactoryFn, Signature};
pub use settings::Settings;
pub use types::TypeInfo;
