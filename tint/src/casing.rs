//! Output key casing.
//!
//! The casing applied to projected keys is a process-wide setting read at the
//! moment of projection, so the same decorator class can serialize under
//! different casings as the setting changes.

use std::fmt;
use std::str::FromStr;
use std::sync::atomic::{AtomicU8, Ordering};

use heck::{ToKebabCase, ToLowerCamelCase, ToSnakeCase};
use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// Strategy used to turn attribute identifiers into output keys.
#[derive(Clone, Copy, Debug, Default, Eq, Hash, PartialEq)]
pub enum KeyCasing {
    /// Keys are emitted exactly as declared.
    Identity,
    /// `multi_word_name` becomes `multiWordName`.
    #[default]
    Camel,
    /// `multiWordName` becomes `multi_word_name`.
    Snake,
    /// `multi_word_name` becomes `multi-word-name`.
    Kebab,
}

impl KeyCasing {
    /// Transform `identifier` into an output key.
    ///
    /// # Examples
    ///
    /// ```
    /// use tint::KeyCasing;
    /// assert_eq!(KeyCasing::Camel.transform("multi_word_name"), "multiWordName");
    /// assert_eq!(KeyCasing::Kebab.transform("multi_word_name"), "multi-word-name");
    /// ```
    #[must_use]
    pub fn transform(self, identifier: &str) -> String {
        match self {
            Self::Identity => identifier.to_owned(),
            Self::Camel => identifier.to_lower_camel_case(),
            Self::Snake => identifier.to_snake_case(),
            Self::Kebab => identifier.to_kebab_case(),
        }
    }

    /// Canonical name used in configuration.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Identity => "identity",
            Self::Camel => "camel",
            Self::Snake => "snake",
            Self::Kebab => "kebab",
        }
    }

    const fn to_bits(self) -> u8 {
        match self {
            Self::Identity => 0,
            Self::Camel => 1,
            Self::Snake => 2,
            Self::Kebab => 3,
        }
    }

    const fn from_bits(bits: u8) -> Self {
        match bits {
            0 => Self::Identity,
            2 => Self::Snake,
            3 => Self::Kebab,
            _ => Self::Camel,
        }
    }
}

impl fmt::Display for KeyCasing {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error returned when a casing name is not recognised.
#[derive(Debug, thiserror::Error)]
#[error("unknown key casing '{0}'; expected one of identity, camel, snake, or kebab")]
pub struct UnknownKeyCasing(String);

impl FromStr for KeyCasing {
    type Err = UnknownKeyCasing;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "identity" | "stringify" | "none" => Ok(Self::Identity),
            "camel" | "camel_case" | "lower_camel" => Ok(Self::Camel),
            "snake" | "snake_case" => Ok(Self::Snake),
            "kebab" | "kebab_case" => Ok(Self::Kebab),
            _ => Err(UnknownKeyCasing(s.to_owned())),
        }
    }
}

impl Serialize for KeyCasing {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for KeyCasing {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        raw.parse().map_err(serde::de::Error::custom)
    }
}

static KEY_CASING: AtomicU8 = AtomicU8::new(KeyCasing::Camel.to_bits());

/// Returns the casing currently applied by [`crate::Decorator::as_json`].
#[must_use]
pub fn key_casing() -> KeyCasing {
    KeyCasing::from_bits(KEY_CASING.load(Ordering::Acquire))
}

/// Replaces the process-wide casing, returning the previous value.
pub fn set_key_casing(casing: KeyCasing) -> KeyCasing {
    KeyCasing::from_bits(KEY_CASING.swap(casing.to_bits(), Ordering::AcqRel))
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case(KeyCasing::Identity, "multi_word_name")]
    #[case(KeyCasing::Camel, "multiWordName")]
    #[case(KeyCasing::Snake, "multi_word_name")]
    #[case(KeyCasing::Kebab, "multi-word-name")]
    fn transforms_multi_word_identifiers(#[case] casing: KeyCasing, #[case] expected: &str) {
        assert_eq!(casing.transform("multi_word_name"), expected);
    }

    #[rstest]
    #[case("identity", KeyCasing::Identity)]
    #[case("stringify", KeyCasing::Identity)]
    #[case("camel_case", KeyCasing::Camel)]
    #[case("Snake", KeyCasing::Snake)]
    #[case(" kebab_case ", KeyCasing::Kebab)]
    fn parses_configuration_names(#[case] raw: &str, #[case] expected: KeyCasing) {
        assert_eq!(raw.parse::<KeyCasing>().ok(), Some(expected));
    }

    #[test]
    fn rejects_unknown_names() {
        let err = "shouty".parse::<KeyCasing>().err().map(|e| e.to_string());
        assert_eq!(
            err.as_deref(),
            Some("unknown key casing 'shouty'; expected one of identity, camel, snake, or kebab")
        );
    }

    #[test]
    fn bits_round_trip_every_variant() {
        for casing in [
            KeyCasing::Identity,
            KeyCasing::Camel,
            KeyCasing::Snake,
            KeyCasing::Kebab,
        ] {
            assert_eq!(KeyCasing::from_bits(casing.to_bits()), casing);
        }
    }
}
