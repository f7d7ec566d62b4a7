//! Container settings.
//!
//! Settings can be built in code through [`ContainerBuilder`] or loaded from
//! an application's configuration with serde; missing keys keep their
//! defaults.
//!
//! [`ContainerBuilder`]: crate::container::ContainerBuilder

use serde::Deserialize;

/// Tunables for a [`Container`](crate::container::Container).
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Prefix of generated names: `<prefix>.<n>`.
    pub anonymous_prefix: String,
    /// Upper bound on "did you mean?" suggestions in errors.
    pub max_suggestions: usize,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            anonymous_prefix: "unnamed".to_string(),
            max_suggestions: 3,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::de::value::{Error as ValueError, MapDeserializer};

    #[test]
    fn defaults() {
        let settings = Settings::default();
        assert_eq!(settings.anonymous_prefix, "unnamed");
        assert_eq!(settings.max_suggestions, 3);
    }

    #[test]
    fn missing_keys_keep_defaults() {
        let map = vec![("anonymous_prefix", "svc")];
        let de: MapDeserializer<'_, _, ValueError> = MapDeserializer::new(map.into_iter());
        let settings = Settings::deserialize(de).unwrap();
        assert_eq!(settings.anonymous_prefix, "svc");
        assert_eq!(settings.max_suggestions, 3);
    }
}
