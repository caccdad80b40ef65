use figment::value::{Dict, Value};
use regex::Regex;
use std::fmt;

const REDACTED: &str = "[REDACTED]";

/// Redacts sensitive values from config trees before they are printed
#[derive(Clone)]
pub struct SecretScrubber {
    secret_key_pattern: Regex,
    url_credentials_pattern: Regex,
    api_key_pattern: Regex,
}

impl SecretScrubber {
    /// Create a new secret scrubber
    pub fn new() -> Self {
        Self {
            // Whole words of a snake_cased key: password, db_password,
            // client_secret, api_key, access_token. Not tokenizer or max_tokens.
            secret_key_pattern: Regex::new(
                r"(?:^|_)(?:passw(?:or)?d|pwd|secret|token|credentials?|api_?key|private_?key)(?:_|$)",
            )
            .expect("valid secret key pattern"),
            // Match user:password@ inside URLs
            url_credentials_pattern: Regex::new(r"(?P<scheme>[a-zA-Z][a-zA-Z0-9+.-]*://)[^/@\s:]+:[^/@\s]+@")
                .expect("valid url credentials pattern"),
            // Match API keys of the form sk-... or sk-ant-...
            api_key_pattern: Regex::new(r"sk-[a-zA-Z0-9-_]{20,}").expect("valid api key pattern"),
        }
    }

    /// Whether values stored under `key` should be hidden
    pub fn is_secret_key(&self, key: &str) -> bool {
        self.secret_key_pattern.is_match(&snake_case(key))
    }

    /// Scrub a single string value of embedded credentials
    pub fn scrub_str(&self, value: &str) -> String {
        let scrubbed = self
            .url_credentials_pattern
            .replace_all(value, format!("${{scheme}}{REDACTED}@"));
        self.api_key_pattern
            .replace_all(&scrubbed, "[API_KEY_REDACTED]")
            .into_owned()
    }

    /// Return a copy of `tree` with secret values replaced
    pub fn scrub_tree(&self, tree: &Dict) -> Dict {
        tree.iter()
            .map(|(key, value)| {
                let value = if self.is_secret_key(key) {
                    redact(value)
                } else {
                    self.scrub_value(value)
                };
                (key.clone(), value)
            })
            .collect()
    }

    fn scrub_value(&self, value: &Value) -> Value {
        match value {
            Value::String(tag, s) => Value::String(*tag, self.scrub_str(s)),
            Value::Dict(tag, dict) => Value::Dict(*tag, self.scrub_tree(dict)),
            Value::Array(tag, items) => {
                Value::Array(*tag, items.iter().map(|v| self.scrub_value(v)).collect())
            }
            other => other.clone(),
        }
    }
}

/// `dbPassword`, `db-password` and `DB.PASSWORD` all become `db_password`.
fn snake_case(key: &str) -> String {
    let mut out = String::with_capacity(key.len() + 4);
    let mut prev_lower = false;
    for ch in key.chars() {
        match ch {
            '-' | '.' | ' ' | '_' => {
                out.push('_');
                prev_lower = false;
            }
            ch if ch.is_ascii_uppercase() => {
                if prev_lower {
                    out.push('_');
                }
                out.push(ch.to_ascii_lowercase());
                prev_lower = false;
            }
            ch => {
                out.push(ch);
                prev_lower = ch.is_ascii_lowercase() || ch.is_ascii_digit();
            }
        }
    }
    out
}

/// Replace every leaf below `value`, keeping the shape of tables
fn redact(value: &Value) -> Value {
    match value {
        Value::Dict(tag, dict) => Value::Dict(
            *tag,
            dict.iter().map(|(k, v)| (k.clone(), redact(v))).collect(),
        ),
        Value::Empty(..) => value.clone(),
        _ => Value::from(REDACTED),
    }
}

impl Default for SecretScrubber {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for SecretScrubber {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SecretScrubber").finish()
    }
}
