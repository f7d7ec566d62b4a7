//! Stored values.
//!
//! An [`Entry`] is what the registry keeps under a name: the shared value,
//! its [`TypeInfo`], and any extra typed views it was exposed as.

use std::any::Any;
use std::fmt;
use std::sync::Arc;

use crate::types::TypeInfo;

/// A type-erased, shared dependency value.
///
/// Cloning a `Value` clones the `Arc`, never the value behind it.
pub type Value = Arc<dyn Any + Send + Sync>;

/// A stored value plus its runtime type information.
///
/// # Examples
/// ```
/// use std::sync::Arc;
/// use wirebox_container::{Entry, TypeInfo};
///
/// trait Greeter: Send + Sync {}
/// struct English;
/// impl Greeter for English {}
///
/// let english = Arc::new(English);
/// let entry = Entry::new(english.clone())
///     .with_view(english as Arc<dyn Greeter>);
///
/// assert!(entry.is_assignable_to(&TypeInfo::of::<Arc<English>>()));
/// assert!(entry.is_assignable_to(&TypeInfo::of::<Arc<dyn Greeter>>()));
/// assert!(!entry.is_assignable_to(&TypeInfo::of::<English>()));
/// ```
#[derive(Clone)]
pub struct Entry {
    value: Value,
    type_info: TypeInfo,
    views: Vec<View>,
}

#[derive(Clone)]
struct View {
    type_info: TypeInfo,
    value: Value,
}

impl Entry {
    /// Wraps a value.
    pub fn new<T: Send + Sync + 'static>(value: T) -> Self {
        Self {
            value: Arc::new(value),
            type_info: TypeInfo::of::<T>(),
            views: Vec::new(),
        }
    }

    /// Adds a view of this entry as another type.
    ///
    /// The entry becomes assignable to `V` as well as to its own type.
    /// A later view of the same type replaces the earlier one. A view of the
    /// entry's own type is dropped, since the stored value already answers
    /// for that type.
    pub fn with_view<V: Send + Sync + 'static>(mut self, view: V) -> Self {
        let type_info = TypeInfo::of::<V>();
        if type_info == self.type_info {
            return self;
        }
        self.views.retain(|v| v.type_info != type_info);
        self.views.push(View {
            type_info,
            value: Arc::new(view),
        });
        self
    }

    /// The stored value.
    #[inline]
    pub fn value(&self) -> &Value {
        &self.value
    }

    /// The stored value's own type.
    #[inline]
    pub fn type_info(&self) -> TypeInfo {
        self.type_info
    }

    /// Every type this entry can be assigned to, own type first.
    pub fn assignable_types(&self) -> impl Iterator<Item = TypeInfo> + '_ {
        std::iter::once(self.type_info).chain(self.views.iter().map(|v| v.type_info))
    }

    /// Returns `true` if this entry can be assigned to `target`.
    pub fn is_assignable_to(&self, target: &TypeInfo) -> bool {
        self.value_for(target).is_some()
    }

    /// Returns the handle to assign into a `target`-typed slot.
    ///
    /// The returned value holds exactly a `target`.
    pub fn value_for(&self, target: &TypeInfo) -> Option<&Value> {
        if self.type_info == *target {
            return Some(&self.value);
        }
        self.views
            .iter()
            .find(|view| view.type_info == *target)
            .map(|view| &view.value)
    }

    /// Clones the value out as a `T`, if the entry is assignable to `T`.
    pub fn extract<T: Clone + 'static>(&self) -> Option<T> {
        self.value_for(&TypeInfo::of::<T>())?
            .downcast_ref::<T>()
            .cloned()
    }
}

impl fmt::Debug for Entry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Entry")
            .field("type", &self.type_info)
            .field(
                "views",
                &self.views.iter().map(|v| v.type_info).collect::<Vec<_>>(),
            )
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    trait Shape: Send + Sync {
        fn area(&self) -> f64;
    }

    struct Square(f64);

    impl Shape for Square {
        fn area(&self) -> f64 {
            self.0 * self.0
        }
    }

    #[test]
    fn plain_value_round_trip() {
        let entry = Entry::new(10i32);
        assert_eq!(entry.type_info(), TypeInfo::of::<i32>());
        assert_eq!(entry.extract::<i32>(), Some(10));
        assert_eq!(entry.extract::<i64>(), None);
    }

    #[test]
    fn arc_values_share_identity() {
        let square = Arc::new(Square(2.0));
        let entry = Entry::new(square.clone());

        let out: Arc<Square> = entry.extract().unwrap();
        assert!(Arc::ptr_eq(&out, &square));
    }

    #[test]
    fn view_is_assignable_and_shared() {
        let square = Arc::new(Square(3.0));
        let entry = Entry::new(square.clone()).with_view(square.clone() as Arc<dyn Shape>);

        let shape: Arc<dyn Shape> = entry.extract().unwrap();
        assert_eq!(shape.area(), 9.0);
        assert_eq!(Arc::strong_count(&square), 4);
    }

    #[test]
    fn value_for_picks_matching_handle() {
        let entry = Entry::new(1u8).with_view(String::from("one"));

        let own = entry.value_for(&TypeInfo::of::<u8>()).unwrap();
        assert_eq!(own.downcast_ref::<u8>(), Some(&1));

        let view = entry.value_for(&TypeInfo::of::<String>()).unwrap();
        assert_eq!(view.downcast_ref::<String>().map(String::as_str), Some("one"));

        assert!(entry.value_for(&TypeInfo::of::<u16>()).is_none());
    }

    #[test]
    fn later_view_replaces_earlier() {
        let entry = Entry::new(())
            .with_view(String::from("first"))
            .with_view(String::from("second"));

        assert_eq!(entry.extract::<String>().as_deref(), Some("second"));
        assert_eq!(entry.assignable_types().count(), 2);
    }

    #[test]
    fn view_of_own_type_is_dropped() {
        let entry = Entry::new(1u8).with_view(2u8);

        assert_eq!(entry.extract::<u8>(), Some(1));
        assert_eq!(entry.assignable_types().count(), 1);
    }

    #[test]
    fn debug_lists_types() {
        let entry = Entry::new(5u32).with_view(5u64);
        let debug = format!("{entry:?}");
        assert!(debug.contains("u32"));
        assert!(debug.contains("u64"));
    }
}
