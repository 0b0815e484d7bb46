//! Config file loading and commented-YAML generation.
//!
//! The config file is plain YAML, but we generate it ourselves so every
//! field carries a `#` description line. Unknown or missing fields are
//! reconciled against the defaults on load.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_yaml::Value;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("io error at {path}: {source}")]
    Io { path: PathBuf, source: io::Error },
    #[error("invalid yaml at {path}: {source}")]
    Parse {
        path: PathBuf,
        source: serde_yaml::Error,
    },
    #[error("config validation failed: {0}")]
    Validation(String),
}

#[derive(Debug, Clone, Copy)]
pub struct FieldMeta {
    pub name: &'static str,
    pub description: &'static str,
}

/// Implemented by config structs that know their file name and how each
/// field should be described in the generated YAML.
pub trait ConfigSpec: Serialize + DeserializeOwned + Default {
    const FILE_NAME: &'static str;
    fn fields() -> &'static [FieldMeta];
}

/// Load the config file, creating it with defaults when absent.
///
/// Resolution: an explicit `config_path` wins; otherwise `base_dir/FILE_NAME`
/// when a base dir is given (the `--data-dir` case); otherwise the current
/// directory. User values are merged over the defaults, and the file is
/// rewritten when fields are missing so new options show up with comments.
pub fn load_or_create<T: ConfigSpec>(
    config_path: Option<&Path>,
    base_dir: Option<&Path>,
) -> Result<T, ConfigError> {
    let path = resolve_path::<T>(config_path, base_dir);
    ensure_parent(&path)?;

    if !path.exists() {
        let defaults = T::default();
        write_with_comments(&defaults, &path)?;
        return Ok(defaults);
    }

    let raw = fs::read_to_string(&path).map_err(|source| ConfigError::Io {
        path: path.clone(),
        source,
    })?;
    let user_yaml: Value = serde_yaml::from_str(&raw).map_err(|source| ConfigError::Parse {
        path: path.clone(),
        source,
    })?;

    let mut merged = serde_yaml::to_value(T::default())
        .map_err(|err| ConfigError::Validation(err.to_string()))?;
    merge_values(&mut merged, &user_yaml);

    let config: T =
        serde_yaml::from_value(merged).map_err(|err| ConfigError::Validation(err.to_string()))?;

    if missing_any_field::<T>(&user_yaml) {
        write_with_comments(&config, &path)?;
    }

    Ok(config)
}

pub fn write_with_comments<T: ConfigSpec>(config: &T, path: &Path) -> Result<(), ConfigError> {
    ensure_parent(path)?;
    let yaml = render_with_comments(config)?;
    fs::write(path, yaml).map_err(|source| ConfigError::Io {
        path: path.to_path_buf(),
        source,
    })
}

fn render_with_comments<T: ConfigSpec>(config: &T) -> Result<String, ConfigError> {
    let value =
        serde_yaml::to_value(config).map_err(|err| ConfigError::Validation(err.to_string()))?;
    let Value::Mapping(mapping) = value else {
        return Err(ConfigError::Validation(
            "config must serialize to a mapping".to_string(),
        ));
    };

    let mut lines = Vec::new();
    for field in T::fields() {
        if !field.description.is_empty() {
            lines.push(format!("# {}", field.description.replace('\n', "\n# ")));
        }
        let key = Value::String(field.name.to_string());
        let val = mapping.get(&key).cloned().unwrap_or(Value::Null);
        let rendered = serde_yaml::to_string(&serde_yaml::Mapping::from_iter([(key, val)]))
            .map_err(|err| ConfigError::Validation(err.to_string()))?;
        lines.push(rendered.trim().to_string());
    }
    lines.push(String::new());

    Ok(lines.join("\n"))
}

fn missing_any_field<T: ConfigSpec>(user_yaml: &Value) -> bool {
    let Value::Mapping(map) = user_yaml else {
        return true;
    };
    T::fields()
        .iter()
        .any(|f| !map.contains_key(Value::String(f.name.to_string())))
}

fn merge_values(dest: &mut Value, user: &Value) {
    match (dest, user) {
        (Value::Mapping(dest_map), Value::Mapping(user_map)) => {
            for (key, user_val) in user_map {
                if let Some(dest_val) = dest_map.get_mut(key) {
                    merge_values(dest_val, user_val);
                } else {
                    dest_map.insert(key.clone(), user_val.clone());
                }
            }
        }
        (dest, user) => {
            *dest = user.clone();
        }
    }
}

fn resolve_path<T: ConfigSpec>(path: Option<&Path>, base_dir: Option<&Path>) -> PathBuf {
    if let Some(p) = path {
        p.to_path_buf()
    } else if let Some(base) = base_dir {
        base.join(T::FILE_NAME)
    } else {
        PathBuf::from(T::FILE_NAME)
    }
}

fn ensure_parent(path: &Path) -> Result<(), ConfigError> {
    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
    {
        fs::create_dir_all(parent).map_err(|source| ConfigError::Io {
            path: parent.to_path_buf(),
            source,
        })?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::base_system::context::Config;

    #[test]
    fn creates_file_with_defaults_and_comments() {
        let dir = tempfile::tempdir().unwrap();
        let config: Config = load_or_create(None, Some(dir.path())).unwrap();
        assert!(!config.old_cli);

        let raw = fs::read_to_string(dir.path().join(Config::FILE_NAME)).unwrap();
        assert!(raw.contains("default_search_field:"));
        // every field gets a comment line
        assert!(raw.contains("# "));
    }

    #[test]
    fn merges_partial_user_file_over_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(Config::FILE_NAME);
        fs::write(&path, "default_search_field: author\n").unwrap();

        let config: Config = load_or_create(None, Some(dir.path())).unwrap();
        assert_eq!(config.default_search_field, "author");
        // untouched fields keep their defaults
        assert_eq!(config.request_timeout, Config::default().request_timeout);

        // the file is rewritten with the missing fields filled in
        let raw = fs::read_to_string(&path).unwrap();
        assert!(raw.contains("request_timeout:"));
        assert!(raw.contains("default_search_field: author"));
    }
}
