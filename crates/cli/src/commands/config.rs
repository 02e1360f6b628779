use std::env;
use std::fs;
use std::path::Path;

use proposey_core::config::{detect_config_path, AppConfig};
use secrecy::{ExposeSecret, SecretString};
use serde::Serialize;
use toml::Value;

use crate::commands::{load_config, CommandResult};

type EffectiveValue = (&'static str, &'static [&'static str], String);

#[derive(Debug, Serialize)]
struct ConfigEntry {
    key: &'static str,
    value: String,
    source: String,
}

pub fn run() -> CommandResult {
    let config = match load_config("config") {
        Ok(config) => config,
        Err(result) => return result,
    };

    let config_file_path = detect_config_path();
    let config_file_doc = load_config_file_doc(config_file_path.as_deref());

    let entries = effective_values(&config)
        .into_iter()
        .map(|(key, env_keys, value)| ConfigEntry {
            key,
            value,
            source: field_source(
                key,
                env_keys,
                config_file_doc.as_ref(),
                config_file_path.as_deref(),
            ),
        })
        .collect::<Vec<_>>();

    let mut lines = vec!["effective config (source precedence: env > file > default):".to_string()];
    lines.extend(
        entries
            .iter()
            .map(|entry| format!("- {} = {} (source: {})", entry.key, entry.value, entry.source)),
    );

    CommandResult::success_with_data(
        "config",
        lines.join("\n"),
        serde_json::to_value(&entries).ok(),
    )
}

fn effective_values(config: &AppConfig) -> Vec<EffectiveValue> {
    vec![
        entry("database.url", &["PROPOSEY_DATABASE_URL"], config.database.url.clone()),
        entry(
            "database.max_connections",
            &["PROPOSEY_DATABASE_MAX_CONNECTIONS"],
            config.database.max_connections.to_string(),
        ),
        entry(
            "database.timeout_secs",
            &["PROPOSEY_DATABASE_TIMEOUT_SECS"],
            config.database.timeout_secs.to_string(),
        ),
        entry("llm.provider", &["PROPOSEY_LLM_PROVIDER"], config.llm.provider.as_str().to_string()),
        entry("llm.api_key", &["PROPOSEY_LLM_API_KEY"], redact_secret(config.llm.api_key.as_ref())),
        entry(
            "llm.base_url",
            &["PROPOSEY_LLM_BASE_URL"],
            config.llm.base_url.clone().unwrap_or_else(|| "<unset>".to_string()),
        ),
        entry("llm.model", &["PROPOSEY_LLM_MODEL"], config.llm.model.clone()),
        entry(
            "llm.timeout_secs",
            &["PROPOSEY_LLM_TIMEOUT_SECS"],
            config.llm.timeout_secs.to_string(),
        ),
        entry("llm.temperature", &["PROPOSEY_LLM_TEMPERATURE"], config.llm.temperature.to_string()),
        entry(
            "proposals.api_url",
            &["PROPOSEY_PROPOSALS_API_URL"],
            config.proposals.api_url.clone(),
        ),
        entry(
            "proposals.api_key",
            &["PROPOSEY_PROPOSALS_API_KEY"],
            redact_secret(config.proposals.api_key.as_ref()),
        ),
        entry(
            "proposals.company_id",
            &["PROPOSEY_PROPOSALS_COMPANY_ID"],
            config.proposals.company_id.to_string(),
        ),
        entry(
            "proposals.language",
            &["PROPOSEY_PROPOSALS_LANGUAGE"],
            config.proposals.language.clone(),
        ),
        entry(
            "proposals.timeout_secs",
            &["PROPOSEY_PROPOSALS_TIMEOUT_SECS"],
            config.proposals.timeout_secs.to_string(),
        ),
        entry(
            "server.bind_address",
            &["PROPOSEY_SERVER_BIND_ADDRESS"],
            config.server.bind_address.clone(),
        ),
        entry("server.port", &["PROPOSEY_SERVER_PORT"], config.server.port.to_string()),
        entry(
            "server.graceful_shutdown_secs",
            &["PROPOSEY_SERVER_GRACEFUL_SHUTDOWN_SECS"],
            config.server.graceful_shutdown_secs.to_string(),
        ),
        entry(
            "audit.failure_policy",
            &["PROPOSEY_AUDIT_FAILURE_POLICY"],
            format!("{:?}", config.audit.failure_policy),
        ),
        entry(
            "logging.level",
            &["PROPOSEY_LOGGING_LEVEL", "PROPOSEY_LOG_LEVEL"],
            config.logging.level.clone(),
        ),
        entry(
            "logging.format",
            &["PROPOSEY_LOGGING_FORMAT", "PROPOSEY_LOG_FORMAT"],
            format!("{:?}", config.logging.format),
        ),
    ]
}

fn entry(key: &'static str, env_keys: &'static [&'static str], value: String) -> EffectiveValue {
    (key, env_keys, value)
}

fn load_config_file_doc(path: Option<&Path>) -> Option<Value> {
    let path = path?;
    let raw = fs::read_to_string(path).ok()?;
    raw.parse::<Value>().ok()
}

fn field_source(
    key_path: &str,
    env_keys: &[&str],
    config_file_doc: Option<&Value>,
    config_file_path: Option<&Path>,
) -> String {
    if let Some(env_key) = env_keys.iter().find(|key| env::var_os(key).is_some()) {
        return format!("env ({env_key})");
    }

    if let Some(doc) = config_file_doc {
        if contains_path(doc, key_path) {
            let file_path = config_file_path
                .map(|path| path.display().to_string())
                .unwrap_or_else(|| "config file".to_string());
            return format!("file ({file_path})");
        }
    }

    "default".to_string()
}

fn contains_path(root: &Value, key_path: &str) -> bool {
    let mut current = root;
    for key in key_path.split('.') {
        let Some(next) = current.get(key) else {
            return false;
        };
        current = next;
    }
    true
}

/// Keeps a recognisable `sk-` style prefix and hides the rest.
fn redact_secret(secret: Option<&SecretString>) -> String {
    let Some(secret) = secret else {
        return "<unset>".to_string();
    };
    let trimmed = secret.expose_secret().trim();
    if trimmed.is_empty() {
        return "<empty>".to_string();
    }

    if let Some((prefix, _)) = trimmed.split_once('-') {
        return format!("{prefix}-***");
    }

    "<redacted>".to_string()
}
