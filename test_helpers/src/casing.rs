//! Serialized access to the process-wide key casing.
//!
//! # Examples
//!
//! ```
//! use test_helpers::casing::use_casing;
//! use tint::{KeyCasing, key_casing};
//!
//! let guard = use_casing(KeyCasing::Kebab);
//! assert_eq!(key_casing(), KeyCasing::Kebab);
//! drop(guard);
//! ```

use parking_lot::{Mutex, MutexGuard};
use tint::{KeyCasing, set_key_casing};

static CASING_MUTEX: Mutex<()> = Mutex::new(());

/// RAII guard restoring the previous casing on drop.
#[must_use = "dropping restores the prior casing"]
pub struct CasingGuard {
    previous: KeyCasing,
    _lock: MutexGuard<'static, ()>,
}

/// Set the process-wide casing until the returned guard is dropped.
///
/// Other callers block until the guard is released.
pub fn use_casing(casing: KeyCasing) -> CasingGuard {
    let lock = CASING_MUTEX.lock();
    let previous = set_key_casing(casing);
    CasingGuard {
        previous,
        _lock: lock,
    }
}

impl Drop for CasingGuard {
    fn drop(&mut self) {
        set_key_casing(self.previous);
    }
}
