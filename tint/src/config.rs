//! Process settings loaded with figment.
//!
//! Settings are layered: defaults, then `tint.toml`, then `TINT_`-prefixed
//! environment variables. Later layers win.

use camino::Utf8Path;
use figment::Figment;
use figment::providers::{Env, Format, Serialized, Toml};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::casing::{KeyCasing, set_key_casing};
use crate::error::TintResult;

/// Process-wide settings.
///
/// # Examples
///
/// ```rust
/// use tint::{KeyCasing, Settings};
///
/// let settings = Settings::default();
/// assert_eq!(settings.key_casing, KeyCasing::Camel);
/// ```
#[derive(Clone, Copy, Debug, Default, Deserialize, Eq, PartialEq, Serialize)]
#[serde(default)]
pub struct Settings {
    /// Casing applied to attribute names when projecting.
    pub key_casing: KeyCasing,
}

impl Settings {
    /// Settings file read from the working directory.
    pub const FILE_NAME: &'static str = "tint.toml";

    /// Prefix of environment variables that override the file.
    pub const ENV_PREFIX: &'static str = "TINT_";

    /// Load settings from `tint.toml` and the environment.
    ///
    /// A missing file is not an error.
    ///
    /// # Errors
    ///
    /// Returns [`crate::TintError::Configuration`] when a source cannot be
    /// parsed or a value has the wrong type.
    pub fn load() -> TintResult<Self> {
        Self::load_from(Utf8Path::new(Self::FILE_NAME))
    }

    /// Load settings from `path` and the environment.
    ///
    /// # Errors
    ///
    /// Returns [`crate::TintError::Configuration`] when a source cannot be
    /// parsed or a value has the wrong type.
    pub fn load_from(path: &Utf8Path) -> TintResult<Self> {
        Ok(Self::figment(path).extract()?)
    }

    /// The layered figment behind [`Settings::load_from`].
    #[must_use]
    pub fn figment(path: &Utf8Path) -> Figment {
        Figment::from(Serialized::defaults(Self::default()))
            .merge(Toml::file(path.as_std_path()))
            .merge(Env::prefixed(Self::ENV_PREFIX))
    }

    /// Make these settings the process-wide defaults.
    pub fn apply(&self) {
        let previous = set_key_casing(self.key_casing);
        debug!(key_casing = %self.key_casing, %previous, "settings applied");
    }
}
