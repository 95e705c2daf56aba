use governance_core::workflow::AttributionPolicy;
use governance_core::{ConfigurationError, GovernanceConfig};
use std::fs;
use tempfile::TempDir;

fn write_config(contents: &str) -> (TempDir, std::path::PathBuf) {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("governance.toml");
    fs::write(&path, contents).unwrap();
    (dir, path)
}

#[test]
fn test_load_from_file() {
    let (_dir, path) = write_config(
        r#"
environment = "production"
attribution_policy = "require_resolved_by"

[logging]
json = true
"#,
    );

    let config = GovernanceConfig::load_from(&path).unwrap();
    assert_eq!(config.environment, "production");
    assert_eq!(config.attribution_policy, AttributionPolicy::RequireResolvedBy);
    assert_eq!(config.logging.level, "info");
    assert!(config.logging.json);
    assert!(config.logging.with_target);
}

#[test]
fn test_explicit_level_wins_over_environment_default() {
    let (_dir, path) = write_config(
        r#"
environment = "production"

[logging]
level = "governance_core=trace,warn"
"#,
    );

    let config = GovernanceConfig::load_from(&path).unwrap();
    assert_eq!(config.logging.level, "governance_core=trace,warn");
    assert_eq!(
        config.attribution_policy,
        AttributionPolicy::FallbackToLastUpdater
    );
}

#[test]
fn test_invalid_file_values_rejected() {
    let (_dir, path) = write_config(
        r#"
environment = "staging"

[logging]
level = ""
"#,
    );
    assert!(matches!(
        GovernanceConfig::load_from(&path),
        Err(ConfigurationError::Invalid { .. })
    ));

    let (_dir, path) = write_config(r#"attribution_policy = "nobody""#);
    assert!(matches!(
        GovernanceConfig::load_from(&path),
        Err(ConfigurationError::Load(_))
    ));
}

#[test]
fn test_missing_file_is_an_error() {
    let dir = tempfile::tempdir().unwrap();
    let result = GovernanceConfig::load_from(dir.path().join("absent.toml"));
    assert!(matches!(result, Err(ConfigurationError::Load(_))));
}

#[test]
fn test_defaults_are_valid() {
    let config = GovernanceConfig::default();
    assert!(config.validate().is_ok());
    assert_eq!(
        config.attribution_policy,
        AttributionPolicy::FallbackToLastUpdater
    );
}
