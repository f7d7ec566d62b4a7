//! Factory functions and their invocation.
//!
//! A [`Factory`] is a callable registered in place of a value. Its
//! [`Signature`] declares parameter and return types; parameters are
//! resolved by type from the registry, the callable runs once, and the
//! result becomes the registered value.
//!
//! Typed factories are built from ordinary closures or functions:
//!
//! ```
//! use wirebox_container::{Container, Definition, Factory};
//!
//! let mut container = Container::new();
//! container.register("greeting", Definition::value(String::from("hi"))).unwrap();
//! container
//!     .register("length", Factory::new(|greeting: String| greeting.len()))
//!     .unwrap();
//!
//! assert_eq!(container.get_as::<usize>("length").unwrap(), 2);
//! ```

use std::any::type_name;
use std::fmt;
use std::sync::Arc;

use tracing::{instrument, trace, warn};

use crate::binding::Inject;
use crate::component::{Component, Owned, Plain};
use crate::entry::{Entry, Value};
use crate::error::{BoxError, InjectError, NotAssignableError, Result};
use crate::registry::Registry;
use crate::resolver;
use crate::types::TypeInfo;

/// Declared parameter and return types of a factory.
///
/// A valid signature has one return value, or two where the second is an
/// error type (see [`TypeInfo::error`]).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Signature {
    params: Vec<TypeInfo>,
    returns: Vec<TypeInfo>,
}

impl Signature {
    pub fn new(params: Vec<TypeInfo>, returns: Vec<TypeInfo>) -> Self {
        Self { params, returns }
    }

    /// Parameter types, resolved from the registry in order.
    pub fn params(&self) -> &[TypeInfo] {
        &self.params
    }

    pub fn returns(&self) -> &[TypeInfo] {
        &self.returns
    }

    /// The type of the produced value.
    pub fn produces(&self) -> Option<TypeInfo> {
        self.returns.first().copied()
    }

    /// Checks the return shape.
    ///
    /// # Errors
    /// - [`InjectError::UnsupportedFactorySignature`]: not one or two returns
    /// - [`InjectError::SecondReturnMustBeError`]: second return is not an error type
    pub(crate) fn validate(&self, factory: &'static str) -> Result<()> {
        match self.returns.as_slice() {
            [_] => Ok(()),
            [_, failure] if failure.is_error() => Ok(()),
            [_, failure] => Err(InjectError::SecondReturnMustBeError {
                factory,
                found: *failure,
            }),
            other => Err(InjectError::UnsupportedFactorySignature {
                factory,
                returns: other.len(),
            }),
        }
    }
}

/// A callable whose parameters can be resolved from the registry.
///
/// Implemented for every `FnOnce` of up to eight parameters, each of which
/// must be `Clone + Send + Sync + 'static`. `Args` is the parameter tuple.
pub trait FactoryFn<Args, Out>: 'static {
    /// Parameter types in order.
    fn params() -> Vec<TypeInfo>;

    /// Calls the function with type-erased arguments.
    ///
    /// Fails with the index of the first argument that does not hold its
    /// parameter's type.
    fn invoke(self, args: Vec<Value>) -> std::result::Result<Out, usize>;
}

macro_rules! impl_factory_fn {
    () => {
        impl_factory_fn!(@impl);
    };
    (($first:ident, $first_arg:ident) $(, ($rest:ident, $rest_arg:ident))*) => {
        impl_factory_fn!(@impl ($first, $first_arg) $(, ($rest, $rest_arg))*);
        impl_factory_fn!($(($rest, $rest_arg)),*);
    };
    (@impl $(($param:ident, $arg:ident)),*) => {
        impl<F, Out $(, $param)*> FactoryFn<($($param,)*), Out> for F
        where
            F: FnOnce($($param),*) -> Out + 'static,
            $($param: Clone + Send + Sync + 'static,)*
        {
            fn params() -> Vec<TypeInfo> {
                vec![$(TypeInfo::of::<$param>()),*]
            }

            #[allow(unused_variables, unused_mut, unused_assignments)]
            fn invoke(self, args: Vec<Value>) -> std::result::Result<Out, usize> {
                let mut args = args.into_iter();
                let mut index = 0usize;
                $(
                    let next = args.next();
                    let $arg = match next.as_ref().and_then(|v| v.downcast_ref::<$param>()) {
                        Some(arg) => arg.clone(),
                        None => return Err(index),
                    };
                    index += 1;
                )*
                Ok(self($($arg),*))
            }
        }
    };
}

impl_factory_fn!(
    (A0, a0),
    (A1, a1),
    (A2, a2),
    (A3, a3),
    (A4, a4),
    (A5, a5),
    (A6, a6),
    (A7, a7)
);

pub(crate) enum CallError {
    /// An argument did not hold its parameter's type.
    Argument(usize),
    /// The factory's own failure.
    Failed(BoxError),
}

type Call = Box<dyn FnOnce(Vec<Value>) -> std::result::Result<Box<dyn Component>, CallError>>;

/// A producer registered in place of a value.
///
/// | constructor | callable | stored as |
/// |---|---|---|
/// | [`Factory::new`] | `Fn(..) -> T` | `T` |
/// | [`Factory::fallible`] | `Fn(..) -> Result<T, E>` | `T` |
/// | [`Factory::component`] | `Fn(..) -> T`, `T: Inject` | `Arc<T>`, fields populated |
/// | [`Factory::fallible_component`] | `Fn(..) -> Result<T, E>`, `T: Inject` | `Arc<T>` |
/// | [`Factory::dynamic`] | runtime-declared [`Signature`] | the returned [`Entry`] |
pub struct Factory {
    name: &'static str,
    signature: Signature,
    call: Call,
}

impl Factory {
    /// Wraps an infallible function.
    pub fn new<F, Args, T>(factory: F) -> Self
    where
        F: FactoryFn<Args, T>,
        T: Send + Sync + 'static,
    {
        Self::assemble(factory, vec![TypeInfo::of::<T>()], |value: T| {
            Ok(Box::new(Plain(value)) as Box<dyn Component>)
        })
    }

    /// Wraps a function returning `Result<T, E>`.
    ///
    /// An `Err` fails the registration with that error, unchanged.
    pub fn fallible<F, Args, T, E>(factory: F) -> Self
    where
        F: FactoryFn<Args, std::result::Result<T, E>>,
        T: Send + Sync + 'static,
        E: std::error::Error + Send + Sync + 'static,
    {
        Self::assemble(
            factory,
            vec![TypeInfo::of::<T>(), TypeInfo::error::<E>()],
            |result: std::result::Result<T, E>| {
                result
                    .map(|value| Box::new(Plain(value)) as Box<dyn Component>)
                    .map_err(|err| Box::new(err) as BoxError)
            },
        )
    }

    /// Wraps a function producing a struct whose fields are then injected.
    pub fn component<F, Args, T>(factory: F) -> Self
    where
        F: FactoryFn<Args, T>,
        T: Inject + Send + Sync + 'static,
    {
        Self::assemble(factory, vec![TypeInfo::of::<Arc<T>>()], |value: T| {
            Ok(Box::new(Owned(value)) as Box<dyn Component>)
        })
    }

    /// Fallible form of [`Factory::component`].
    pub fn fallible_component<F, Args, T, E>(factory: F) -> Self
    where
        F: FactoryFn<Args, std::result::Result<T, E>>,
        T: Inject + Send + Sync + 'static,
        E: std::error::Error + Send + Sync + 'static,
    {
        Self::assemble(
            factory,
            vec![TypeInfo::of::<Arc<T>>(), TypeInfo::error::<E>()],
            |result: std::result::Result<T, E>| {
                result
                    .map(|value| Box::new(Owned(value)) as Box<dyn Component>)
                    .map_err(|err| Box::new(err) as BoxError)
            },
        )
    }

    /// Builds a factory from a runtime-declared signature.
    ///
    /// `call` receives one argument per declared parameter, each holding
    /// exactly that parameter's type. The signature is validated before
    /// anything is resolved, and the returned entry must have the declared
    /// first return type.
    ///
    /// ```
    /// use wirebox_container::{Container, Entry, Factory, InjectError, Signature, TypeInfo};
    ///
    /// let factory = Factory::dynamic(
    ///     "pair",
    ///     Signature::new(vec![], vec![TypeInfo::of::<u8>(), TypeInfo::of::<u8>()]),
    ///     |_| Ok(Entry::new(0u8)),
    /// );
    ///
    /// let err = Container::new().register("pair", factory).unwrap_err();
    /// assert!(matches!(err, InjectError::SecondReturnMustBeError { .. }));
    /// ```
    pub fn dynamic(
        name: &'static str,
        signature: Signature,
        call: impl FnOnce(Vec<Value>) -> std::result::Result<Entry, BoxError> + 'static,
    ) -> Self {
        Self {
            name,
            signature,
            call: Box::new(move |args| {
                call(args)
                    .map(|entry| Box::new(entry) as Box<dyn Component>)
                    .map_err(CallError::Failed)
            }),
        }
    }

    /// The factory's name, the function's type name for typed factories.
    pub fn name(&self) -> &'static str {
        self.name
    }

    pub fn signature(&self) -> &Signature {
        &self.signature
    }

    fn assemble<F, Args, Out>(
        factory: F,
        returns: Vec<TypeInfo>,
        finish: fn(Out) -> std::result::Result<Box<dyn Component>, BoxError>,
    ) -> Self
    where
        F: FactoryFn<Args, Out>,
        Out: 'static,
    {
        Self {
            name: type_name::<F>(),
            signature: Signature::new(<F as FactoryFn<Args, Out>>::params(), returns),
            call: Box::new(move |args| {
                let out = factory.invoke(args).map_err(CallError::Argument)?;
                finish(out).map_err(CallError::Failed)
            }),
        }
    }
}

impl fmt::Debug for Factory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Factory")
            .field("name", &self.name)
            .field("signature", &self.signature)
            .finish()
    }
}

/// Validates, resolves parameters, calls the factory and checks its output.
///
/// # Errors
/// - signature errors from [`Signature::validate`]
/// - any resolution error for a parameter, unchanged
/// - [`InjectError::FactoryExecutionFailed`]: the factory's own error
/// - [`InjectError::NotAssignable`]: the output is not the declared type
#[instrument(skip_all, fields(factory = factory.name))]
pub(crate) fn invoke(registry: &Registry, factory: Factory) -> Result<Box<dyn Component>> {
    let Factory {
        name,
        signature,
        call,
    } = factory;
    signature.validate(name)?;

    let mut args = Vec::with_capacity(signature.params().len());
    let mut resolved = Vec::with_capacity(signature.params().len());
    for param in signature.params() {
        let (dependency, entry) = resolver::resolve(registry, param)?;
        let value = entry.value_for(param).ok_or_else(|| {
            not_assignable(
                dependency,
                format!("parameter {} of {name}", args.len()),
                *param,
                entry.type_info(),
            )
        })?;
        args.push(value.clone());
        resolved.push((dependency, *param, entry.type_info()));
    }

    trace!(params = args.len(), "Invoking factory");
    let component = call(args).map_err(|err| match err {
        CallError::Argument(index) => {
            let (dependency, expected, actual) = resolved
                .get(index)
                .copied()
                .unwrap_or(("<missing>", TypeInfo::of::<()>(), TypeInfo::of::<()>()));
            not_assignable(dependency, format!("parameter {index} of {name}"), expected, actual)
        }
        CallError::Failed(source) => {
            warn!(error = %source, "Factory returned an error");
            InjectError::FactoryExecutionFailed(source)
        }
    })?;

    let produced = component.type_info();
    match signature.produces() {
        Some(declared) if declared != produced => Err(not_assignable(
            name,
            format!("return value of {name}"),
            declared,
            produced,
        )),
        _ => Ok(component),
    }
}

fn not_assignable(
    dependency: &str,
    target: String,
    expected: TypeInfo,
    actual: TypeInfo,
) -> InjectError {
    InjectError::NotAssignable(NotAssignableError {
        dependency: dependency.to_string(),
        target,
        expected,
        actual,
    })
}
