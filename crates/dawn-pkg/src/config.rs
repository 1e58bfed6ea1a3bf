//! Manage and merge the various sources of config:
//! the recipe options file and provided args.

use std::{fs, path::Path};

use anyhow::Context as _;
use serde::{de::DeserializeOwned, Serialize};
use serde_json::Value;

/// Overlays `args` on top of the options file at `path`, on top of defaults.
///
/// Values read from the file always replace defaults. A value from `args`
/// only replaces the file value when it differs from the default, so flags
/// that were not passed keep file values alive.
///
/// # Errors
///
/// Returns an error if the file cannot be read or parsed, or if the merged
/// result no longer deserializes into `A`.
pub fn with_options_file<A>(args: &A, path: Option<&Path>) -> anyhow::Result<A>
where
    A: Clone + Default + Serialize + DeserializeOwned,
{
    let Some(path) = path else {
        return Ok(args.clone());
    };

    let text = fs::read_to_string(path)
        .with_context(|| format!("could not read options file '{}'", path.display()))?;
    let file: toml::Value = toml::from_str(&text)
        .with_context(|| format!("could not parse options file '{}'", path.display()))?;

    let defaults = serde_json::to_value(A::default())?;
    let mut merged = defaults.clone();
    apply(&mut merged, serde_json::to_value(file)?);
    apply_overrides(&mut merged, serde_json::to_value(args)?, &defaults, "");

    let merged = serde_json::from_value(merged)
        .with_context(|| format!("invalid options in '{}'", path.display()))?;
    Ok(merged)
}

/// Recursively applies every value present in `patch`.
fn apply(value: &mut Value, patch: Value) {
    match (value, patch) {
        (Value::Object(old), Value::Object(new)) => {
            for (key, new_value) in new {
                let old_value = old.entry(key).or_insert(Value::Null);
                apply(old_value, new_value);
            }
        }
        (old, new) => *old = new,
    }
}

/// Recursively applies values from `patch` that differ from the default at
/// the same position.
///
/// Inspired by: <https://stackoverflow.com/a/47142105/575773>
fn apply_overrides(value: &mut Value, patch: Value, defaults: &Value, pointer: &str) {
    match (value, patch) {
        (Value::Object(old), Value::Object(new)) => {
            for (key, new_value) in new {
                let child_pointer = format!("{pointer}/{key}");
                let old_value = old.entry(key).or_insert(Value::Null);
                apply_overrides(old_value, new_value, defaults, &child_pointer);
            }
        }
        (old, new) => {
            let Some(default) = defaults.pointer(pointer) else {
                return;
            };
            if new != *default {
                *old = new;
            }
        }
    }
}
