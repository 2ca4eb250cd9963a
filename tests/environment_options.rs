//! Options read from prefixed environment variables.

use ssm_config_provider::prelude::*;
use ssm_config_provider::sources::InMemoryParameterStore;
use std::env;
use std::sync::Arc;

fn set_vars(vars: &[(&str, &str)]) {
    for (name, value) in vars {
        // Each test uses its own prefix, so no other thread reads these.
        unsafe { env::set_var(name, value) };
    }
}

fn remove_vars(vars: &[(&str, &str)]) {
    for (name, _) in vars {
        unsafe { env::remove_var(name) };
    }
}

#[test]
fn test_from_env_reads_prefixed_options() {
    let vars = [
        ("SSMCP_ENVTEST_ADD_ENVIRONMENT_PREFIX", "false"),
        ("SSMCP_ENVTEST_TTL", "500"),
        ("SSMCP_ENVTEST_ENVIRONMENT", "qa"),
    ];
    set_vars(&vars);
    let options = ProviderOptions::from_env("SSMCP_ENVTEST");
    remove_vars(&vars);

    let options = options.unwrap();
    assert_eq!(options.ttl_millis(), Some(500));
    assert_eq!(options.add_environment_prefix(), Some(false));
    assert_eq!(options.environment(), Some("qa"));
    assert_eq!(options.region(), None);
}

#[test]
fn test_from_env_rejects_malformed_ttl() {
    let vars = [("SSMCP_BADTTL_TTL", "soon")];
    set_vars(&vars);
    let result = ProviderOptions::from_env("SSMCP_BADTTL");
    remove_vars(&vars);

    assert!(matches!(
        result,
        Err(ConfigError::InvalidOption { option: "ttl", .. })
    ));
}

#[test]
fn test_environment_options_drive_provider() {
    let vars = [
        ("SSMCP_DRIVE_ENVIRONMENT", "staging"),
        ("SSMCP_DRIVE_TTL", "750"),
    ];
    set_vars(&vars);
    let options = ProviderOptions::from_env("SSMCP_DRIVE");
    remove_vars(&vars);

    let store = Arc::new(
        InMemoryParameterStore::new()
            .with_parameter("/global/", "region", "us-east-1")
            .with_parameter("/staging/app/", "region", "eu-west-1"),
    );
    let mut provider = SsmConfigProvider::builder()
        .with_store(Arc::clone(&store))
        .build();
    provider.configure_with(&options.unwrap()).unwrap();

    let bundle = provider.get("app").unwrap();
    assert_eq!(
        store.fetched_paths(),
        vec!["/global/", "/staging/", "/staging/app/"]
    );
    assert_eq!(bundle.get("region"), Some("eu-west-1"));
    assert_eq!(bundle.ttl_millis(), 750);
}
