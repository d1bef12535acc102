//! Helpers for running settings tests inside a `figment::Jail`.

use anyhow::{Result, anyhow};

/// Executes `f` inside a [`figment::Jail`] and returns its output.
///
/// The jail isolates the working directory and environment variables; both
/// are restored once the closure completes, even when it fails.
///
/// # Errors
///
/// Returns an error if the jail cannot be set up or the closure fails.
pub fn with_jail<F, T>(f: F) -> Result<T>
where
    F: FnOnce(&mut figment::Jail) -> figment::error::Result<T>,
{
    let mut output = None;
    figment::Jail::try_with(|jail| {
        output = Some(f(jail)?);
        Ok(())
    })
    .map_err(|err| anyhow!(err.to_string()))?;
    output.ok_or_else(|| anyhow!("jail closure did not return a value"))
}

/// Converts any displayable error into a [`figment::Error`] so it can be
/// propagated out of a jail closure.
#[must_use]
pub fn jail_error(err: &impl ToString) -> figment::Error {
    figment::Error::from(err.to_string())
}
