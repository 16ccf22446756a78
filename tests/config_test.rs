//! Integration tests for Settings layered loading.
//!
//! These tests pass explicit global/config paths (temp directories only) and an
//! explicit env map, so they never read the user's real configuration.

use std::collections::HashMap;
use std::fs;

use tempfile::TempDir;

use orgtree::application::ApplicationError;
use orgtree::config::{IdScheme, Settings};

fn env(pairs: &[(&str, &str)]) -> Option<HashMap<String, String>> {
    Some(
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect(),
    )
}

#[test]
fn given_no_files_when_load_then_returns_defaults() {
    let settings = Settings::load_from(None, None).expect("load settings");

    assert_eq!(settings, Settings::default());
    assert_eq!(settings.director_label, "Director");
    assert_eq!(settings.id_scheme, IdScheme::Sequential);
    assert!(!settings.policy.allow_nested_branch_members);
    assert!(settings.policy.allow_nested_subordinates);
}

#[test]
fn given_global_and_explicit_file_when_load_then_explicit_wins_per_field() {
    let dir = TempDir::new().unwrap();
    let global = dir.path().join("global.toml");
    let local = dir.path().join("local.toml");
    fs::write(
        &global,
        r#"
director_label = "Head Office"
first_id = 10

[policy]
allow_nested_branch_members = true
"#,
    )
    .unwrap();
    fs::write(
        &local,
        r#"
first_id = 500
"#,
    )
    .unwrap();

    let settings = Settings::load_from(Some(&global), Some(&local)).expect("load settings");

    assert_eq!(settings.director_label, "Head Office");
    assert_eq!(settings.first_id, 500);
    assert!(settings.policy.allow_nested_branch_members);
}

#[test]
fn given_missing_global_file_when_load_then_it_is_skipped() {
    let dir = TempDir::new().unwrap();
    let global = dir.path().join("does-not-exist.toml");

    let settings = Settings::load_from(Some(&global), None).expect("load settings");
    assert_eq!(settings, Settings::default());
}

#[test]
fn given_missing_explicit_file_when_load_then_config_error() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("nope.toml");

    let err = Settings::load_from(None, Some(&path)).unwrap_err();
    assert!(matches!(err, ApplicationError::Config { .. }));
}

#[test]
fn given_invalid_toml_when_load_then_config_error_names_file() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("broken.toml");
    fs::write(&path, "id_scheme = \"random\"").unwrap();

    let err = Settings::load_from(None, Some(&path)).unwrap_err();
    assert!(err.to_string().contains("broken.toml"), "error: {err}");
}

#[test]
fn given_empty_director_label_when_load_then_rejected() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("empty.toml");
    fs::write(&path, "director_label = \"  \"").unwrap();

    assert!(Settings::load_from(None, Some(&path)).is_err());
}

#[test]
fn given_env_vars_when_applying_overrides_then_they_replace_file_values() {
    let settings = Settings {
        director_label: "From File".to_string(),
        ..Settings::default()
    };

    let settings = settings
        .with_env_overrides(env(&[
            ("ORGTREE_DIRECTOR_LABEL", "From Env"),
            ("ORGTREE_ID_SCHEME", "uuid"),
            ("ORGTREE_FIRST_ID", "42"),
            ("ORGTREE_POLICY__ALLOW_NESTED_BRANCH_MEMBERS", "true"),
            ("ORGTREE_POLICY__ALLOW_NESTED_SUBORDINATES", "false"),
            ("UNRELATED", "ignored"),
        ]))
        .expect("apply env");

    assert_eq!(settings.director_label, "From Env");
    assert_eq!(settings.id_scheme, IdScheme::Uuid);
    assert_eq!(settings.first_id, 42);
    assert!(settings.policy.allow_nested_branch_members);
    assert!(!settings.policy.allow_nested_subordinates);
}

#[test]
fn given_bad_id_scheme_in_env_when_applying_overrides_then_config_error() {
    let err = Settings::default()
        .with_env_overrides(env(&[("ORGTREE_ID_SCHEME", "sometimes")]))
        .unwrap_err();
    assert!(matches!(err, ApplicationError::Config { .. }));
}

#[test]
fn given_unparseable_first_id_in_env_when_applying_overrides_then_config_error() {
    let err = Settings::default()
        .with_env_overrides(env(&[("ORGTREE_FIRST_ID", "abc")]))
        .unwrap_err();
    assert!(matches!(err, ApplicationError::Config { .. }));
    assert!(err.to_string().contains("first_id"), "error: {err}");
}

#[test]
fn given_negative_first_id_in_env_when_applying_overrides_then_config_error() {
    let err = Settings::default()
        .with_env_overrides(env(&[("ORGTREE_FIRST_ID", "-3")]))
        .unwrap_err();
    assert!(matches!(err, ApplicationError::Config { .. }));
}

#[test]
fn given_unparseable_policy_flag_in_env_when_applying_overrides_then_config_error() {
    for key in [
        "ORGTREE_POLICY__ALLOW_NESTED_BRANCH_MEMBERS",
        "ORGTREE_POLICY__ALLOW_NESTED_SUBORDINATES",
    ] {
        let err = Settings::default()
            .with_env_overrides(env(&[(key, "maybe")]))
            .unwrap_err();
        assert!(matches!(err, ApplicationError::Config { .. }), "{key}: {err}");
        assert!(err.to_string().contains("maybe"), "error: {err}");
    }
}

#[test]
fn given_no_env_vars_when_applying_overrides_then_settings_are_kept() {
    let settings = Settings {
        first_id: 9,
        ..Settings::default()
    };

    let after = settings.clone().with_env_overrides(env(&[])).expect("apply env");
    assert_eq!(after, settings);
}

#[test]
fn given_settings_when_rendering_toml_then_round_trips_field_values() {
    let settings = Settings {
        director_label: "CEO".to_string(),
        id_scheme: IdScheme::Uuid,
        ..Settings::default()
    };

    let rendered = settings.to_toml().unwrap();

    assert!(rendered.contains("director_label = \"CEO\""), "{rendered}");
    assert!(rendered.contains("id_scheme = \"uuid\""), "{rendered}");
    assert!(rendered.contains("[policy]"), "{rendered}");
}
