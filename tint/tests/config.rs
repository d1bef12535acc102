//! Settings loaded from `tint.toml` and the environment.

use anyhow::{Result, ensure};
use camino::Utf8Path;
use rstest::rstest;
use serial_test::serial;
use test_helpers::figment::jail_error;
use test_helpers::{use_casing, with_jail};
use tint::{KeyCasing, Settings, TintError, key_casing};

#[rstest]
fn defaults_apply_without_sources() -> Result<()> {
    let settings = with_jail(|_| Settings::load().map_err(|err| jail_error(&err)))?;
    ensure!(settings == Settings::default());
    ensure!(settings.key_casing == KeyCasing::Camel);
    Ok(())
}

#[rstest]
#[case::file_only(Some("key_casing = \"snake\""), None, KeyCasing::Snake)]
#[case::env_only(None, Some("kebab"), KeyCasing::Kebab)]
#[case::env_wins(Some("key_casing = \"snake\""), Some("identity"), KeyCasing::Identity)]
#[case::aliases(Some("key_casing = \"camel_case\""), None, KeyCasing::Camel)]
fn settings_layer_file_then_environment(
    #[case] file: Option<&str>,
    #[case] env: Option<&str>,
    #[case] expected: KeyCasing,
) -> Result<()> {
    let settings = with_jail(|jail| {
        if let Some(contents) = file {
            jail.create_file(Settings::FILE_NAME, contents)?;
        }
        if let Some(value) = env {
            jail.set_env("TINT_KEY_CASING", value);
        }
        Settings::load().map_err(|err| jail_error(&err))
    })?;
    ensure!(settings.key_casing == expected, "unexpected {settings:?}");
    Ok(())
}

#[rstest]
fn settings_load_from_an_explicit_path() -> Result<()> {
    let settings = with_jail(|jail| {
        jail.create_file("custom.toml", "key_casing = \"kebab\"")?;
        Settings::load_from(Utf8Path::new("custom.toml")).map_err(|err| jail_error(&err))
    })?;
    ensure!(settings.key_casing == KeyCasing::Kebab);
    Ok(())
}

#[rstest]
fn unknown_casings_are_configuration_errors() -> Result<()> {
    let failed = with_jail(|jail| {
        jail.set_env("TINT_KEY_CASING", "shouting");
        Ok(matches!(Settings::load(), Err(TintError::Configuration(_))))
    })?;
    ensure!(failed, "loading should fail for an unknown casing");
    Ok(())
}

#[rstest]
#[serial]
fn applying_settings_sets_the_global_casing() {
    let guard = use_casing(KeyCasing::Camel);
    Settings {
        key_casing: KeyCasing::Kebab,
    }
    .apply();
    assert_eq!(key_casing(), KeyCasing::Kebab);
    drop(guard);
}
