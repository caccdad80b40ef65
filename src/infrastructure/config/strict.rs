//! Strict key checking for file layers.
//!
//! Every key in a file layer must name a field of the config struct. Keys are
//! matched case-insensitively and rewritten to the spelling used by the
//! struct, so `SSLMODE`, `sslmode` and `sslMode` all land on the same field.
//!
//! Values are loosened on the way: an explicit null keeps the value of the
//! layer below, and a number or boolean written for a string field becomes
//! its text (`password: 123456` reads as `"123456"`).

use figment::value::{Dict, Num, Tag, Value};

use crate::domain::{ConfigError, ConfigResult};

/// Check `layer` against the default `schema` tree and return it with keys
/// canonicalized.
///
/// A table in `schema` that is empty is treated as an open map and accepts
/// any keys, as does a field whose default is not a table (an `Option` that
/// defaults to `None`, for instance). Other type mismatches are left for
/// the decoder to report.
pub fn conform(layer: Dict, schema: &Dict, origin: &str) -> ConfigResult<Dict> {
    conform_at(layer, schema, origin, &mut Vec::new())
}

fn conform_at(
    layer: Dict,
    schema: &Dict,
    origin: &str,
    path: &mut Vec<String>,
) -> ConfigResult<Dict> {
    if schema.is_empty() {
        return Ok(layer);
    }

    let mut out = Dict::new();
    for (key, value) in layer {
        let Some((canonical, expected)) = lookup(schema, &key) else {
            path.push(key);
            return Err(ConfigError::UnknownKey {
                key: path.join("."),
                origin: origin.to_string(),
            });
        };

        if matches!(value, Value::Empty(..)) {
            continue;
        }

        let canonical = canonical.clone();
        let value = match (value, expected) {
            (Value::Dict(tag, nested), Value::Dict(_, expected)) => {
                path.push(canonical.clone());
                let nested = conform_at(nested, expected, origin, path)?;
                path.pop();
                Value::Dict(tag, nested)
            }
            (value, Value::String(..)) => stringify(value),
            (value, _) => value,
        };

        merge_entry(&mut out, canonical, value);
    }

    Ok(out)
}

/// Find the schema entry for `key`, preferring an exact match.
fn lookup<'a>(schema: &'a Dict, key: &str) -> Option<(&'a String, &'a Value)> {
    schema.get_key_value(key).or_else(|| {
        schema
            .iter()
            .find(|(candidate, _)| candidate.eq_ignore_ascii_case(key))
    })
}

/// Text form of a scalar. Tables and arrays are returned unchanged.
fn stringify(value: Value) -> Value {
    match value {
        Value::Num(tag, num) => Value::String(tag, num_to_string(num)),
        Value::Bool(tag, flag) => Value::String(tag, flag.to_string()),
        Value::Char(tag, ch) => Value::String(tag, ch.to_string()),
        other => other,
    }
}

fn num_to_string(num: Num) -> String {
    match num {
        Num::U8(n) => n.to_string(),
        Num::U16(n) => n.to_string(),
        Num::U32(n) => n.to_string(),
        Num::U64(n) => n.to_string(),
        Num::U128(n) => n.to_string(),
        Num::USize(n) => n.to_string(),
        Num::I8(n) => n.to_string(),
        Num::I16(n) => n.to_string(),
        Num::I32(n) => n.to_string(),
        Num::I64(n) => n.to_string(),
        Num::I128(n) => n.to_string(),
        Num::ISize(n) => n.to_string(),
        Num::F32(n) => n.to_string(),
        Num::F64(n) => n.to_string(),
    }
}

/// Insert `value`, merging tables when two spellings of one key collide.
pub(crate) fn merge_entry(out: &mut Dict, key: String, value: Value) {
    match (out.remove(&key), value) {
        (Some(Value::Dict(_, mut existing)), Value::Dict(tag, incoming)) => {
            for (k, v) in incoming {
                merge_entry(&mut existing, k, v);
            }
            out.insert(key, Value::Dict(tag, existing));
        }
        (_, value) => {
            out.insert(key, value);
        }
    }
}

/// Wrap a plain dict as a table value.
pub(crate) fn table(dict: Dict) -> Value {
    Value::Dict(Tag::Default, dict)
}
