//! Upgrades raw documents written for older layouts to the current one.
//!
//! Migration runs on the untyped document before any schema parsing. It is
//! an ordered chain of single-version steps; a document enters the chain at
//! its detected version and leaves it at [`CURRENT_VERSION`].

use serde_json::{Map, Value};
use tracing::{debug, warn};

use crate::error::MigrationError;
use crate::mapper::child_path;

/// Layout version produced by [`upgrade`].
pub const CURRENT_VERSION: i64 = 1;

type Result<T> = std::result::Result<T, MigrationError>;

/// One step of the chain, taking a document at `from` to `from + 1`.
struct Migration {
    from: i64,
    apply: fn(Map<String, Value>) -> Result<Map<String, Value>>,
}

const MIGRATIONS: &[Migration] = &[Migration {
    from: 0,
    apply: legacy_to_v1,
}];

/// Work out which layout a raw document was written for.
///
/// An explicit `version` wins. Without one, a root holding nothing but a
/// `functions` map is already current; anything else is the legacy layout.
pub fn detect_version(raw: &Value) -> Result<i64> {
    let Value::Object(root) = raw else {
        return Err(MigrationError::InvalidShape {
            path: String::new(),
            expected: "a dictionary",
        });
    };

    match root.get("version") {
        Some(version) => parse_version(version),
        None if root.len() == 1 && root.get("functions").is_some_and(Value::is_object) => {
            Ok(CURRENT_VERSION)
        }
        None => Ok(0),
    }
}

fn parse_version(version: &Value) -> Result<i64> {
    let parsed = match version {
        Value::Number(n) => n.as_i64(),
        Value::String(s) => s.trim().parse::<i64>().ok(),
        _ => None,
    };
    parsed.ok_or_else(|| MigrationError::InvalidVersion {
        found: version.to_string(),
    })
}

/// Bring `raw` up to [`CURRENT_VERSION`].
///
/// Current documents come back unchanged, so upgrading twice is the same as
/// upgrading once.
pub fn upgrade(raw: Value) -> Result<Value> {
    let version = detect_version(&raw)?;
    if version == CURRENT_VERSION {
        return Ok(raw);
    }
    if version > CURRENT_VERSION {
        return Err(MigrationError::UnsupportedVersion {
            version,
            supported: CURRENT_VERSION,
        });
    }

    let Value::Object(mut document) = raw else {
        return Err(MigrationError::InvalidShape {
            path: String::new(),
            expected: "a dictionary",
        });
    };

    if version == 0 {
        warn!("Migrating legacy configuration document to version {CURRENT_VERSION}");
    }

    let mut at = version;
    while at < CURRENT_VERSION {
        let step = MIGRATIONS
            .iter()
            .find(|step| step.from == at)
            .ok_or(MigrationError::UnsupportedVersion {
                version,
                supported: CURRENT_VERSION,
            })?;
        debug!(from = at, to = at + 1, "Applying migration step");
        document = (step.apply)(document)?;
        at += 1;
    }

    Ok(Value::Object(document))
}

const FUNCTION_KEYS: &[&str] = &["runtime", "test"];

const BUILD_KEYS: &[&str] = &[
    "source",
    "use_docker",
    "compile_dependencies",
    "bundle",
    "package",
    "ignore",
];

const DEPLOY_KEYS: &[&str] = &["handler", "role", "description", "region", "timeout", "tags"];

const VPC_KEYS: &[(&str, &str)] = &[
    ("vpc", "name"),
    ("subnets", "subnets"),
    ("security_groups", "security_groups"),
];

/// Legacy documents map each function name straight to a flat entry.
fn legacy_to_v1(mut root: Map<String, Value>) -> Result<Map<String, Value>> {
    root.remove("version");

    let mut functions = Map::with_capacity(root.len());
    for (name, entry) in root {
        let Value::Object(entry) = entry else {
            return Err(MigrationError::InvalidShape {
                path: name,
                expected: "a dictionary",
            });
        };
        let function = legacy_function(&name, entry)?;
        functions.insert(name, Value::Object(function));
    }

    let mut document = Map::new();
    document.insert("version".to_string(), Value::from(1));
    document.insert("functions".to_string(), Value::Object(functions));
    Ok(document)
}

fn legacy_function(name: &str, entry: Map<String, Value>) -> Result<Map<String, Value>> {
    let mut function = Map::new();
    let mut build = Map::new();
    let mut deploy = Map::new();
    let mut vpc = Map::new();

    for (key, value) in entry {
        let path = child_path(name, &key);
        if value.is_null() {
            continue;
        }

        match key.as_str() {
            k if FUNCTION_KEYS.contains(&k) => {
                function.insert(key, value);
            }
            k if BUILD_KEYS.contains(&k) => {
                build.insert(key, value);
            }
            "requirements" => {
                build.insert(key, legacy_requirements(value, &path)?);
            }
            k if DEPLOY_KEYS.contains(&k) => {
                deploy.insert(key, value);
            }
            "memory" => {
                deploy.insert("memory_size".to_string(), value);
            }
            "dead_letter" => {
                let config = match value {
                    Value::String(_) => wrap("target_arn", value),
                    Value::Object(_) => wrap("target", value),
                    _ => return Err(invalid(path, "a string or a dictionary")),
                };
                deploy.insert("dead_letter_config".to_string(), config);
            }
            "environment" => {
                if !value.is_object() {
                    return Err(invalid(path, "a dictionary"));
                }
                deploy.insert(key, wrap("variables", value));
            }
            "kms_key" => {
                if !value.is_string() {
                    return Err(invalid(path, "a string"));
                }
                deploy.insert(key, wrap("name", value));
            }
            "tracing" => {
                if !value.is_string() {
                    return Err(invalid(path, "a string"));
                }
                deploy.insert("tracing_config".to_string(), wrap("mode", value));
            }
            k => match VPC_KEYS.iter().find(|(legacy, _)| *legacy == k) {
                Some((_, current)) => {
                    vpc.insert((*current).to_string(), value);
                }
                None => return Err(MigrationError::UnknownKey { path }),
            },
        }
    }

    if !vpc.is_empty() {
        deploy.insert("vpc_config".to_string(), Value::Object(vpc));
    }
    function.insert("build".to_string(), Value::Object(build));
    if !deploy.is_empty() {
        function.insert("deploy".to_string(), Value::Object(deploy));
    }
    Ok(function)
}

/// `requirements` was a single file or a list of files.
fn legacy_requirements(value: Value, path: &str) -> Result<Value> {
    match value {
        Value::String(_) => Ok(Value::Array(vec![wrap("file", value)])),
        Value::Array(items) => items
            .into_iter()
            .enumerate()
            .map(|(index, item)| match item {
                Value::String(_) => Ok(wrap("file", item)),
                Value::Object(_) => Ok(item),
                _ => Err(invalid(format!("{path}[{index}]"), "a string")),
            })
            .collect::<Result<Vec<_>>>()
            .map(Value::Array),
        _ => Err(invalid(path.to_string(), "a string or a list")),
    }
}

fn wrap(key: &str, value: Value) -> Value {
    let mut map = Map::new();
    map.insert(key.to_string(), value);
    Value::Object(map)
}

fn invalid(path: String, expected: &'static str) -> MigrationError {
    MigrationError::InvalidShape { path, expected }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn functions_only_root_is_current() {
        let raw = json!({"functions": {"a": {"build": {"source": "a"}}}});
        assert_eq!(detect_version(&raw).unwrap(), CURRENT_VERSION);
    }

    #[test]
    fn root_without_functions_is_legacy() {
        assert_eq!(detect_version(&json!({"a": {"source": "a"}})).unwrap(), 0);
        assert_eq!(detect_version(&json!({})).unwrap(), 0);
    }

    #[test]
    fn non_integer_version_is_rejected() {
        let err = detect_version(&json!({"version": 1.5})).unwrap_err();
        assert!(matches!(err, MigrationError::InvalidVersion { .. }));
        assert_eq!(detect_version(&json!({"version": "1"})).unwrap(), 1);
    }

    #[test]
    fn explicit_version_zero_drops_the_version_key() {
        let upgraded = upgrade(json!({"version": 0, "a": {"source": "src"}})).unwrap();
        assert_eq!(
            upgraded,
            json!({"version": 1, "functions": {"a": {"build": {"source": "src"}}}})
        );
    }

    #[test]
    fn negative_version_has_no_step() {
        let err = upgrade(json!({"version": -1})).unwrap_err();
        assert!(matches!(err, MigrationError::UnsupportedVersion { version: -1, .. }));
    }
}
