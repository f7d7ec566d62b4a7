//! Type-based lookup, shared by auto-wired fields and factory parameters.

use tracing::trace;

use crate::entry::Entry;
use crate::error::{AmbiguousTypeError, InjectError, Result};
use crate::registry::Registry;
use crate::types::TypeInfo;

/// Finds the single entry assignable to `target`.
///
/// Scans every entry; there is no tie-break, so two or more candidates are
/// always an error. Candidate names in the error are sorted, which keeps it
/// independent of the map's iteration order.
///
/// # Errors
/// - [`InjectError::NoMatchingType`]: nothing is assignable
/// - [`InjectError::AmbiguousType`]: more than one entry is assignable
pub(crate) fn resolve<'r>(
    registry: &'r Registry,
    target: &TypeInfo,
) -> Result<(&'r str, &'r Entry)> {
    let mut matches: Vec<(&str, &Entry)> = registry
        .iter()
        .filter(|(_, entry)| entry.is_assignable_to(target))
        .collect();

    match matches.len() {
        0 => {
            trace!(ty = %target, "No entry matches type");
            Err(InjectError::NoMatchingType { requested: *target })
        }
        1 => {
            let (name, entry) = matches.remove(0);
            trace!(ty = %target, name, "Resolved by type");
            Ok((name, entry))
        }
        _ => {
            let mut candidates: Vec<String> =
                matches.iter().map(|(name, _)| name.to_string()).collect();
            candidates.sort_unstable();
            trace!(ty = %target, ?candidates, "Ambiguous type");
            Err(InjectError::AmbiguousType(AmbiguousTypeError {
                requested: *target,
                candidates,
            }))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    trait Store: Send + Sync {}
    struct Memory;
    impl Store for Memory {}

    fn registry(entries: Vec<(&str, Entry)>) -> Registry {
        let mut reg = Registry::new(3);
        for (name, entry) in entries {
            reg.insert(name.to_string(), entry).unwrap();
        }
        reg
    }

    #[test]
    fn single_match_resolves() {
        let reg = registry(vec![
            ("port", Entry::new(8080u16)),
            ("host", Entry::new(String::from("localhost"))),
        ]);
        let (name, entry) = resolve(&reg, &TypeInfo::of::<u16>()).unwrap();
        assert_eq!(name, "port");
        assert_eq!(entry.extract::<u16>(), Some(8080));
    }

    #[test]
    fn no_match_names_the_type() {
        let reg = registry(vec![("port", Entry::new(8080u16))]);
        let err = resolve(&reg, &TypeInfo::of::<String>()).unwrap_err();
        assert!(matches!(
            err,
            InjectError::NoMatchingType { requested } if requested.is::<String>()
        ));
        assert!(err.to_string().contains("alloc::string::String"));
    }

    #[test]
    fn two_matches_are_ambiguous() {
        let reg = registry(vec![
            ("b", Entry::new(String::from("dep-2"))),
            ("a", Entry::new(String::from("dep-1"))),
        ]);
        match resolve(&reg, &TypeInfo::of::<String>()).unwrap_err() {
            InjectError::AmbiguousType(err) => {
                assert!(err.requested.is::<String>());
                assert_eq!(err.candidates, vec!["a", "b"]);
            }
            other => panic!("Expected AmbiguousType, got: {other:?}"),
        }
    }

    #[test]
    fn views_take_part_in_matching() {
        let memory = Arc::new(Memory);
        let store = Entry::new(memory.clone()).with_view(memory as Arc<dyn Store>);
        let reg = registry(vec![("store", store)]);

        let (name, _) = resolve(&reg, &TypeInfo::of::<Arc<dyn Store>>()).unwrap();
        assert_eq!(name, "store");
        let (name, _) = resolve(&reg, &TypeInfo::of::<Arc<Memory>>()).unwrap();
        assert_eq!(name, "store");
    }

    #[test]
    fn concrete_and_view_of_same_type_conflict() {
        let memory = Arc::new(Memory);
        let reg = registry(vec![
            ("concrete", Entry::new(memory.clone() as Arc<dyn Store>)),
            ("viewed", Entry::new(1u8).with_view(memory as Arc<dyn Store>)),
        ]);
        assert!(matches!(
            resolve(&reg, &TypeInfo::of::<Arc<dyn Store>>()),
            Err(InjectError::AmbiguousType(_))
        ));
    }
}
