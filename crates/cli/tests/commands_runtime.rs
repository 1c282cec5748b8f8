use std::env;
use std::sync::{Mutex, OnceLock};

use sellery_cli::commands::{migrate, seed};
use serde_json::Value;

const VALID_ENV: &[(&str, &str)] = &[
    ("SELLERY_AUTH_TOKEN_SECRET", "cli-test-signing-secret"),
    ("SELLERY_LLM_API_KEY", "cli-test-api-key"),
    ("SELLERY_DATABASE_URL", "sqlite::memory:"),
];

#[test]
fn migrate_returns_success_with_valid_env() {
    with_env(VALID_ENV, || {
        let result = migrate::run();
        assert_eq!(result.exit_code, 0, "expected successful migrate run");

        let payload = parse_payload(&result.output);
        assert_eq!(payload["command"], "migrate");
        assert_eq!(payload["status"], "ok");
    });
}

#[test]
fn migrate_returns_config_failure_without_required_env() {
    with_env(&[], || {
        let result = migrate::run();
        assert_eq!(result.exit_code, 2, "expected config validation failure code");

        let payload = parse_payload(&result.output);
        assert_eq!(payload["command"], "migrate");
        assert_eq!(payload["status"], "error");
        assert_eq!(payload["error_class"], "config_validation");
    });
}

#[test]
fn seed_loads_demo_fixtures_with_valid_env() {
    with_env(VALID_ENV, || {
        let result = seed::run();
        assert_eq!(result.exit_code, 0, "expected successful seed run");

        let payload = parse_payload(&result.output);
        assert_eq!(payload["command"], "seed");
        assert_eq!(payload["status"], "ok");
        let message = payload["message"].as_str().unwrap_or_default();
        assert!(message.contains("user(s)"), "seed summary should count users: {message}");
        assert!(message.contains("product(s)"), "seed summary should count products: {message}");
    });
}

#[test]
fn seed_returns_config_failure_without_required_env() {
    with_env(&[], || {
        let result = seed::run();
        assert_eq!(result.exit_code, 2, "expected config validation failure code");

        let payload = parse_payload(&result.output);
        assert_eq!(payload["command"], "seed");
        assert_eq!(payload["error_class"], "config_validation");
    });
}

fn env_lock() -> &'static Mutex<()> {
    static ENV_LOCK: OnceLock<Mutex<()>> = OnceLock::new();
    ENV_LOCK.get_or_init(|| Mutex::new(()))
}

fn with_env(vars: &[(&str, &str)], run: impl FnOnce()) {
    let _guard = env_lock().lock().expect("env lock");

    let all_keys: Vec<&str> = VALID_ENV.iter().map(|(key, _)| *key).collect();
    for key in &all_keys {
        env::remove_var(key);
    }
    for (key, value) in vars {
        env::set_var(key, value);
    }

    run();

    for key in &all_keys {
        env::remove_var(key);
    }
}

fn parse_payload(output: &str) -> Value {
    serde_json::from_str(output).unwrap_or_else(|error| {
        panic!("command output should be JSON, got `{output}`: {error}")
    })
}
