//! Field descriptors and the per-value parse rules.

use serde_json::{Map, Value};

use super::class::{ClassSchema, SchemaType};
use crate::error::{Result, SchemaError};

/// Accessor for a nested schema, resolved lazily so schemas may refer to
/// each other without initialisation order issues.
pub type SchemaRef = fn() -> &'static ClassSchema;

/// Semantic type of a field.
#[derive(Debug, Clone)]
pub enum FieldKind {
    /// Any value, passed through untouched.
    Any,
    String,
    /// Integer; `coerce` accepts numeric strings.
    Int { coerce: bool },
    /// Boolean; `coerce` accepts `"true"` / `"false"`.
    Bool { coerce: bool },
    /// One of a fixed set of values, compared by exact equality.
    Choice(Vec<Value>),
    List(Box<Field>),
    Map(Box<Field>),
    /// A nested schema. With `default_field` set, a non-map value is
    /// shorthand for `{default_field: value}`.
    Class {
        schema: SchemaRef,
        default_field: Option<&'static str>,
    },
}

/// Describes one recognised key of a schema.
#[derive(Debug, Clone)]
pub struct Field {
    kind: FieldKind,
    required: bool,
    nullable: bool,
    default: Value,
}

impl Field {
    fn of(kind: FieldKind) -> Self {
        Self {
            kind,
            required: false,
            nullable: false,
            default: Value::Null,
        }
    }

    pub fn any() -> Self {
        Self::of(FieldKind::Any)
    }

    pub fn string() -> Self {
        Self::of(FieldKind::String)
    }

    pub fn int() -> Self {
        Self::of(FieldKind::Int { coerce: false })
    }

    pub fn bool() -> Self {
        Self::of(FieldKind::Bool { coerce: false })
    }

    pub fn choice<I, V>(choices: I) -> Self
    where
        I: IntoIterator<Item = V>,
        V: Into<Value>,
    {
        Self::of(FieldKind::Choice(choices.into_iter().map(Into::into).collect()))
    }

    /// A list of `item`; defaults to the empty list.
    pub fn list(item: Field) -> Self {
        Self::of(FieldKind::List(Box::new(item))).default(Value::Array(Vec::new()))
    }

    /// A string-keyed map of `item`; defaults to the empty map.
    pub fn map(item: Field) -> Self {
        Self::of(FieldKind::Map(Box::new(item))).default(Value::Object(Map::new()))
    }

    /// A nested record described by `T`'s schema.
    pub fn class<T: SchemaType>() -> Self {
        Self::of(FieldKind::Class {
            schema: T::schema,
            default_field: None,
        })
    }

    pub fn required(mut self) -> Self {
        self.required = true;
        self
    }

    pub fn nullable(mut self) -> Self {
        self.nullable = true;
        self
    }

    pub fn default(mut self, value: impl Into<Value>) -> Self {
        self.default = value.into();
        self
    }

    /// Enable light string coercion on integer and boolean fields.
    pub fn coerce(mut self) -> Self {
        match &mut self.kind {
            FieldKind::Int { coerce } | FieldKind::Bool { coerce } => *coerce = true,
            _ => {}
        }
        self
    }

    /// Accept a scalar in place of `{name: scalar}` on a class field.
    pub fn default_field(mut self, name: &'static str) -> Self {
        if let FieldKind::Class { default_field, .. } = &mut self.kind {
            *default_field = Some(name);
        }
        self
    }

    pub fn kind(&self) -> &FieldKind {
        &self.kind
    }

    pub fn is_required(&self) -> bool {
        self.required
    }

    pub fn is_nullable(&self) -> bool {
        self.nullable
    }

    /// Parse a raw value, `None` meaning the key was absent.
    ///
    /// An explicit null on a non-nullable field is treated like an absent
    /// key: required fields fail, optional ones take their default.
    pub fn parse(&self, value: Option<&Value>, path: &str) -> Result<Value> {
        match value {
            Some(Value::Null) if self.nullable => Ok(Value::Null),
            None | Some(Value::Null) => self.get_default(path),
            Some(value) => self.parse_present(value, path),
        }
    }

    fn get_default(&self, path: &str) -> Result<Value> {
        if self.required {
            Err(SchemaError::MissingValue {
                path: path.to_string(),
            })
        } else {
            Ok(self.default.clone())
        }
    }

    fn parse_present(&self, value: &Value, path: &str) -> Result<Value> {
        let wrong_type = |expected| SchemaError::WrongType {
            path: path.to_string(),
            expected,
        };

        match &self.kind {
            FieldKind::Any => Ok(value.clone()),
            FieldKind::String => match value {
                Value::String(_) => Ok(value.clone()),
                _ => Err(wrong_type("a string")),
            },
            FieldKind::Int { coerce } => {
                parse_int(value, *coerce).ok_or_else(|| wrong_type("convertible to an integer"))
            }
            FieldKind::Bool { coerce } => {
                parse_bool(value, *coerce).ok_or_else(|| wrong_type("convertible to a Boolean"))
            }
            FieldKind::Choice(choices) => {
                if choices.contains(value) {
                    Ok(value.clone())
                } else {
                    Err(SchemaError::NotAChoice {
                        path: path.to_string(),
                        choices: choices
                            .iter()
                            .map(|c| match c {
                                Value::String(s) => s.clone(),
                                other => other.to_string(),
                            })
                            .collect::<Vec<_>>()
                            .join(", "),
                    })
                }
            }
            // Strings and maps are iterable in spirit but never lists.
            FieldKind::List(item) => match value {
                Value::Array(items) => items
                    .iter()
                    .enumerate()
                    .map(|(index, item_value)| {
                        item.parse(Some(item_value), &format!("{path}[{index}]"))
                    })
                    .collect::<Result<Vec<_>>>()
                    .map(Value::Array),
                _ => Err(wrong_type("a list")),
            },
            FieldKind::Map(item) => match value {
                Value::Object(entries) => {
                    let mut parsed = Map::with_capacity(entries.len());
                    for (key, item_value) in entries {
                        let item_path = format!("{path}[{key}]");
                        parsed.insert(key.clone(), item.parse(Some(item_value), &item_path)?);
                    }
                    Ok(Value::Object(parsed))
                }
                _ => Err(wrong_type("a dictionary")),
            },
            FieldKind::Class {
                schema,
                default_field,
            } => match (default_field, value) {
                (Some(name), value) if !value.is_object() => {
                    let mut wrapped = Map::new();
                    wrapped.insert((*name).to_string(), value.clone());
                    schema().parse(&Value::Object(wrapped), path)
                }
                _ => schema().parse(value, path),
            },
        }
    }
}

fn parse_int(value: &Value, coerce: bool) -> Option<Value> {
    match value {
        Value::Number(n) => n
            .as_i64()
            .or_else(|| n.as_f64().filter(|f| is_whole_i64(*f)).map(|f| f as i64))
            .map(Value::from),
        Value::String(s) if coerce => s.trim().parse::<i64>().ok().map(Value::from),
        _ => None,
    }
}

/// `i64::MAX as f64` rounds up to 2^63, so the upper bound is exclusive.
fn is_whole_i64(f: f64) -> bool {
    f.fract() == 0.0 && f >= i64::MIN as f64 && f < i64::MAX as f64
}

fn parse_bool(value: &Value, coerce: bool) -> Option<Value> {
    match value {
        Value::Bool(_) => Some(value.clone()),
        Value::String(s) if coerce => match s.trim().to_ascii_lowercase().as_str() {
            "true" => Some(Value::Bool(true)),
            "false" => Some(Value::Bool(false)),
            _ => None,
        },
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn int_coercion_only_when_declared() {
        let strict = Field::int();
        let lenient = Field::int().coerce();

        assert!(strict.parse(Some(&json!("10")), "count").is_err());
        assert_eq!(lenient.parse(Some(&json!("10")), "count").unwrap(), json!(10));
        assert_eq!(strict.parse(Some(&json!(10.0)), "count").unwrap(), json!(10));
        assert!(strict.parse(Some(&json!(10.5)), "count").is_err());
    }

    #[test]
    fn bool_rejects_strings_unless_coerced() {
        assert!(Field::bool().parse(Some(&json!("true")), "flag").is_err());
        assert_eq!(
            Field::bool().coerce().parse(Some(&json!("False")), "flag").unwrap(),
            json!(false)
        );
    }

    #[test]
    fn explicit_null_takes_default_unless_nullable() {
        let field = Field::int().default(128);
        assert_eq!(field.parse(Some(&Value::Null), "memory_size").unwrap(), json!(128));

        let nullable = Field::string().nullable().default("x");
        assert_eq!(nullable.parse(Some(&Value::Null), "v").unwrap(), Value::Null);
    }

    #[test]
    fn string_never_accepts_containers() {
        let field = Field::string();
        assert!(field.parse(Some(&json!(["a"])), "s").is_err());
        assert!(field.parse(Some(&json!({"a": 1})), "s").is_err());
        assert!(field.parse(Some(&json!(5)), "s").is_err());
    }

    #[test]
    fn choice_uses_exact_equality() {
        let field = Field::choice([1, 2]);
        assert!(field.parse(Some(&json!(1)), "n").is_ok());
        assert!(field.parse(Some(&json!("1")), "n").is_err());
    }
}
