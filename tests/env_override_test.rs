// Integration tests for environment variable overrides.
// Variables are set through temp-env, which serializes access to the
// process environment between tests.

mod common;

use common::{default_config, expected_valid_config, temp_dir, write_config, VALID_YAML};
use pretty_assertions::assert_eq;
use proptest::prelude::*;
use strata::{init_and_load_with_params, ConfigLoader};

#[test]
fn test_env_overrides_file_and_default() {
    let dir = temp_dir();
    let path = write_config(&dir, "config.yaml", VALID_YAML);

    temp_env::with_vars(
        [
            ("CONFIG_TEST_SERVER_PORT", Some("7070")),
            ("CONFIG_TEST_DATABASE_MAXCONNS", Some("50")),
            ("CONFIG_TEST_LOG_LEVEL", Some("warn")),
        ],
        || {
            let mut conf = default_config();
            let outcome = init_and_load_with_params(&mut conf, &path, "config-test").unwrap();

            assert_eq!(conf.server.port, 7070, "env should beat the file");
            assert_eq!(conf.database.max_conns, 50, "env should beat the default");
            assert_eq!(conf.logs.log_level, "warn");
            assert_eq!(conf.database.user, "test_user");
            assert_eq!(outcome.env_values().len(), 3);
        },
    );
}

#[test]
fn test_env_supplies_required_values_without_file() {
    let dir = temp_dir();

    temp_env::with_vars(
        [
            ("ENVONLY_DATABASE_USER", Some("env_user")),
            ("ENVONLY_DATABASE_PASSWORD", Some("env_pwd")),
            ("ENVONLY_DATABASE_HOST", Some("env_host")),
            ("ENVONLY_DATABASE_PORT", Some("5432")),
            ("ENVONLY_DATABASE_NAME", Some("env_name")),
            ("ENVONLY_SERVER_PORT", Some("8080")),
            ("ENVONLY_LOG_ISJSON", Some("true")),
        ],
        || {
            let mut conf = default_config();
            let outcome = ConfigLoader::new()
                .search_dir(dir.path())
                .env_prefix("envonly")
                .load(&mut conf)
                .unwrap();

            assert!(outcome.used_defaults());
            assert_eq!(conf.database.user, "env_user");
            assert_eq!(conf.database.port, 5432);
            assert_eq!(conf.server.port, 8080);
            assert!(conf.logs.is_json);
            assert_eq!(conf.database.ssl_mode, "disable");
        },
    );
}

#[test]
fn test_env_values_for_string_fields_stay_verbatim() {
    let dir = temp_dir();
    let path = write_config(&dir, "config.yaml", VALID_YAML);

    temp_env::with_vars(
        [
            ("VERBATIM_DATABASE_PASSWORD", Some("007")),
            ("VERBATIM_DATABASE_SSLMODE", Some("true")),
        ],
        || {
            let mut conf = default_config();
            init_and_load_with_params(&mut conf, &path, "verbatim").unwrap();

            assert_eq!(conf.database.password, "007");
            assert_eq!(conf.database.ssl_mode, "true");
        },
    );
}

#[test]
fn test_env_ignored_without_prefix() {
    let dir = temp_dir();
    let path = write_config(&dir, "config.yaml", VALID_YAML);

    temp_env::with_var("NOPREFIX_SERVER_PORT", Some("1"), || {
        let mut conf = default_config();
        let outcome = init_and_load_with_params(&mut conf, &path, "").unwrap();

        assert_eq!(conf, expected_valid_config());
        assert!(outcome.env_values().is_empty());
    });
}

#[test]
fn test_invalid_env_value_names_field() {
    let dir = temp_dir();
    let path = write_config(&dir, "config.yaml", VALID_YAML);

    temp_env::with_var("BADENV_SERVER_PORT", Some("eighty"), || {
        let mut conf = default_config();
        let err = init_and_load_with_params(&mut conf, &path, "badenv").unwrap_err();

        assert!(
            err.to_string().contains("server.port"),
            "error should target server.port: {err}"
        );
    });
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(16))]

    #[test]
    fn prop_loading_twice_yields_identical_config(
        user in "u[a-z0-9_]{0,15}",
        port in 1_i32..65_535,
        max_conns in 1_i32..1_000,
    ) {
        let dir = temp_dir();
        let contents = format!(
            "database:\n  user: {user}\n  password: pwd\n  host: db\n  name: app\n  port: {port}\n  maxConns: {max_conns}\nserver:\n  port: \"{port}\"\n"
        );
        let path = write_config(&dir, "config.yaml", &contents);
        let loader = ConfigLoader::new().config_file(&path).env_prefix("proptest-idem");

        let mut first = default_config();
        let mut second = default_config();
        loader.load(&mut first).unwrap();
        loader.load(&mut second).unwrap();

        prop_assert_eq!(&first, &second);
        prop_assert_eq!(first.database.port, port);
        prop_assert_eq!(first.database.max_conns, max_conns);
        prop_assert_eq!(first.server.port, port);
    }
}
