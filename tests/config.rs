// ABOUTME: Integration tests for configuration parsing and validation.
// ABOUTME: Tests YAML parsing, env var interpolation, destination merging and discovery.

use funcship::config::*;
use funcship::error::{Error, exit_code};
use funcship::types::{Runtime, StorageSku};
use std::time::Duration;

const MINIMAL: &str = r#"
resourceGroup: rg-test
location: westeurope
storageAccountName: sttest001
functionAppName: func-test
containerName: data
runtimeVersion: "3.11"
"#;

mod parsing {
    use super::*;

    #[test]
    fn parse_minimal_config() {
        let config = ConfigFile::from_yaml(MINIMAL).unwrap().resolve(None).unwrap();

        assert_eq!(config.resource_group.as_str(), "rg-test");
        assert_eq!(config.location.as_str(), "westeurope");
        assert_eq!(config.storage_account.as_str(), "sttest001");
        assert_eq!(config.function_app.as_str(), "func-test");
        assert_eq!(config.container.as_str(), "data");
        assert_eq!(config.runtime, Runtime::Python);
        assert_eq!(config.runtime_version.as_str(), "3.11");
        assert_eq!(config.functions_version, "4");
        assert_eq!(config.storage_sku, StorageSku::StandardLrs);
        assert_eq!(config.step_timeout, Duration::from_secs(600));
        assert!(config.artifact_directory.is_none());
        assert!(config.destination.is_none());
    }

    #[test]
    fn parse_full_config() {
        let yaml = r#"
resourceGroup: rg-recommender
location: West Europe
storageAccountName: strecommender01
storageSku: Standard_ZRS
functionAppName: func-recommender
containerName: recommender-data
artifactDirectory: data
artifacts:
  - clicks.csv
  - embeddings.pickle
runtime: node
runtimeVersion: "20"
functionsVersion: "4"
appDirectory: api
settings:
  LIMIT_DATA_SIZE: "true"
routes:
  - recommend
stepTimeout: 2m
retry:
  credentialAttempts: 3
  publishRetries: 1
  initialBackoff: 500ms
  maxBackoff: 10s
"#;
        let config = ConfigFile::from_yaml(yaml).unwrap().resolve(None).unwrap();

        assert_eq!(config.location.as_str(), "westeurope");
        assert_eq!(config.storage_sku, StorageSku::StandardZrs);
        assert_eq!(config.runtime, Runtime::Node);
        let artifacts: Vec<_> = config.artifacts.unwrap().into_iter().collect();
        assert_eq!(artifacts, vec!["clicks.csv", "embeddings.pickle"]);
        assert_eq!(config.settings["LIMIT_DATA_SIZE"], "true");
        assert_eq!(config.routes, vec!["recommend"]);
        assert_eq!(config.step_timeout, Duration::from_secs(120));
        assert_eq!(config.retry.credential_attempts, 3);
        assert_eq!(config.retry.publish_retries, 1);
        assert_eq!(config.retry.initial_backoff, Duration::from_millis(500));
        assert_eq!(config.retry.max_backoff, Duration::from_secs(10));
    }

    #[test]
    fn missing_function_app_returns_error() {
        let yaml = MINIMAL.replace("functionAppName: func-test\n", "");
        let err = ConfigFile::from_yaml(&yaml).unwrap_err();
        assert!(err.to_string().contains("functionAppName"));
        assert_eq!(err.exit_code(), exit_code::CONFIG);
    }

    #[test]
    fn uppercase_storage_name_returns_error() {
        let yaml = MINIMAL.replace("sttest001", "StTest001");
        assert!(ConfigFile::from_yaml(&yaml).is_err());
    }

    #[test]
    fn unknown_location_returns_error() {
        let yaml = MINIMAL.replace("westeurope", "atlantis");
        assert!(ConfigFile::from_yaml(&yaml).is_err());
    }

    #[test]
    fn unsupported_runtime_version_returns_error() {
        let yaml = MINIMAL.replace("\"3.11\"", "\"2.7\"");
        let err = ConfigFile::from_yaml(&yaml).unwrap().resolve(None).unwrap_err();
        assert!(matches!(err, Error::InvalidConfig(_)));
        assert!(err.to_string().contains("2.7"));
    }

    #[test]
    fn unsupported_functions_version_returns_error() {
        let yaml = format!("{MINIMAL}functionsVersion: \"3\"\n");
        let err = ConfigFile::from_yaml(&yaml).unwrap().resolve(None).unwrap_err();
        assert!(err.to_string().contains("functionsVersion"));
    }

    #[test]
    fn artifacts_require_directory() {
        let yaml = format!("{MINIMAL}artifacts:\n  - a.csv\n");
        let err = ConfigFile::from_yaml(&yaml).unwrap().resolve(None).unwrap_err();
        assert!(err.to_string().contains("artifactDirectory"));
    }

    #[test]
    fn empty_artifact_list_returns_error() {
        let yaml = format!("{MINIMAL}artifactDirectory: data\nartifacts: []\n");
        assert!(ConfigFile::from_yaml(&yaml).is_err());
    }

    #[test]
    fn zero_step_timeout_returns_error() {
        let yaml = format!("{MINIMAL}stepTimeout: 0s\n");
        let err = ConfigFile::from_yaml(&yaml).unwrap().resolve(None).unwrap_err();
        assert!(err.to_string().contains("stepTimeout"));
    }
}

mod env_values {
    use super::*;

    #[test]
    fn literal_value() {
        let value: EnvValue = serde_yaml::from_str("\"plain\"").unwrap();
        assert_eq!(value, EnvValue::Literal("plain".to_string()));
        assert_eq!(value.resolve("KEY").unwrap(), "plain");
    }

    #[test]
    fn env_reference_with_default() {
        let value: EnvValue =
            serde_yaml::from_str("{ env: FUNCSHIP_TEST_UNSET_VAR, default: fallback }").unwrap();
        temp_env::with_var_unset("FUNCSHIP_TEST_UNSET_VAR", || {
            assert_eq!(value.resolve("KEY").unwrap(), "fallback");
        });
    }

    #[test]
    fn resolve_env_values() {
        let yaml = format!(
            "{MINIMAL}settings:\n  API_KEY:\n    env: FUNCSHIP_TEST_VAR\n  MODE: batch\n"
        );
        temp_env::with_var("FUNCSHIP_TEST_VAR", Some("from_environment"), || {
            let config = ConfigFile::from_yaml(&yaml).unwrap().resolve(None).unwrap();
            assert_eq!(config.settings["API_KEY"], "from_environment");
            assert_eq!(config.settings["MODE"], "batch");
        });
    }

    #[test]
    fn missing_env_var_returns_error() {
        let yaml = format!("{MINIMAL}settings:\n  API_KEY:\n    env: FUNCSHIP_TEST_MISSING\n");
        temp_env::with_var_unset("FUNCSHIP_TEST_MISSING", || {
            let err = ConfigFile::from_yaml(&yaml).unwrap().resolve(None).unwrap_err();
            assert!(matches!(err, Error::MissingEnvVar { .. }));
            assert_eq!(err.exit_code(), exit_code::CONFIG);
        });
    }
}

mod destinations {
    use super::*;

    fn with_destinations() -> ConfigFile {
        let yaml = format!(
            r#"{MINIMAL}settings:
  MODE: batch
  LEVEL: info
destinations:
  staging:
    resourceGroup: rg-staging
    functionAppName: func-test-staging
    settings:
      LEVEL: debug
    routes:
      - health
"#
        );
        ConfigFile::from_yaml(&yaml).unwrap()
    }

    #[test]
    fn destination_overrides_names() {
        let config = with_destinations().resolve(Some("staging")).unwrap();
        assert_eq!(config.resource_group.as_str(), "rg-staging");
        assert_eq!(config.function_app.as_str(), "func-test-staging");
        assert_eq!(config.storage_account.as_str(), "sttest001");
        assert_eq!(config.routes, vec!["health"]);
        assert_eq!(config.destination.as_deref(), Some("staging"));
    }

    #[test]
    fn destination_merges_settings() {
        let config = with_destinations().resolve(Some("staging")).unwrap();
        assert_eq!(config.settings["MODE"], "batch");
        assert_eq!(config.settings["LEVEL"], "debug");
    }

    #[test]
    fn unknown_destination_returns_error() {
        let err = with_destinations().resolve(Some("production")).unwrap_err();
        assert!(matches!(err, Error::UnknownDestination(ref name) if name == "production"));
    }
}

mod discovery {
    use super::*;
    use std::fs;

    #[test]
    fn discovers_yml_then_yaml() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("funcship.yaml"), MINIMAL).unwrap();

        let file = ConfigFile::discover(dir.path()).unwrap();
        assert_eq!(file.function_app_name.as_str(), "func-test");
        assert_eq!(file.base_dir, dir.path());
    }

    #[test]
    fn discovers_config_in_dot_directory() {
        let dir = tempfile::tempdir().unwrap();
        fs::create_dir_all(dir.path().join(".funcship")).unwrap();
        fs::write(dir.path().join(CONFIG_FILENAME_DIR), MINIMAL).unwrap();

        assert!(ConfigFile::discover(dir.path()).is_ok());
    }

    #[test]
    fn missing_config_is_reported() {
        let dir = tempfile::tempdir().unwrap();
        let err = DeploymentConfig::load(None, dir.path(), None).unwrap_err();
        assert!(matches!(err, Error::ConfigNotFound(_)));
        assert_eq!(err.exit_code(), exit_code::CONFIG);
    }

    #[test]
    fn explicit_path_wins() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("custom.yml");
        fs::write(&path, MINIMAL).unwrap();

        let config = DeploymentConfig::load(Some(&path), dir.path(), None).unwrap();
        assert_eq!(config.app_directory, dir.path().join("."));
    }

    #[test]
    fn missing_app_directory_fails_at_load() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(
            dir.path().join(CONFIG_FILENAME),
            format!("{MINIMAL}appDirectory: missing\n"),
        )
        .unwrap();

        let err = DeploymentConfig::load(None, dir.path(), None).unwrap_err();
        assert!(matches!(err, Error::InvalidConfig(ref msg) if msg.contains("missing")));
        assert_eq!(err.exit_code(), exit_code::CONFIG);

        fs::create_dir(dir.path().join("missing")).unwrap();
        assert!(DeploymentConfig::load(None, dir.path(), None).is_ok());
    }

    #[test]
    fn init_writes_loadable_template() {
        let dir = tempfile::tempdir().unwrap();
        let path = init_config(dir.path(), Some("func-demo"), false).unwrap();

        assert_eq!(path, dir.path().join(CONFIG_FILENAME));
        let config = DeploymentConfig::load(None, dir.path(), None).unwrap();
        assert_eq!(config.function_app.as_str(), "func-demo");

        let err = init_config(dir.path(), None, false).unwrap_err();
        assert!(matches!(err, Error::AlreadyExists(_)));
        assert!(init_config(dir.path(), None, true).is_ok());
    }
}

mod names {
    use funcship::types::{ContainerName, FunctionAppName, StorageAccountName};
    use proptest::prelude::*;

    proptest! {
        #[test]
        fn storage_names_from_valid_alphabet_are_accepted(name in "[a-z0-9]{3,24}") {
            prop_assert!(StorageAccountName::new(&name).is_ok());
        }

        #[test]
        fn storage_names_with_uppercase_are_rejected(name in "[a-z0-9]{2,20}[A-Z]") {
            prop_assert!(StorageAccountName::new(&name).is_err());
        }

        #[test]
        fn function_app_names_accept_inner_hyphens(
            head in "[a-z0-9]{1,20}",
            tail in "[a-z0-9]{1,20}",
        ) {
            let name = format!("{head}-{tail}");
            prop_assert!(FunctionAppName::new(&name).is_ok());
        }

        #[test]
        fn container_names_reject_double_hyphens(
            head in "[a-z0-9]{1,20}",
            tail in "[a-z0-9]{1,20}",
        ) {
            let name = format!("{head}--{tail}");
            prop_assert!(ContainerName::new(&name).is_err());
        }
    }
}
