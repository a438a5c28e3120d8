//! Schema classes: ordered field tables with an optional validation hook.

use serde::de::DeserializeOwned;
use serde_json::{Map, Value};

use super::field::Field;
use crate::error::{Result, SchemaError};

/// Cross-field check run against a fully populated record.
///
/// Returns an error message when the record is invalid.
pub type Validator = fn(&Record<'_>) -> Option<String>;

/// A named, ordered table of fields.
#[derive(Debug)]
pub struct ClassSchema {
    name: &'static str,
    fields: Vec<(&'static str, Field)>,
    validator: Option<Validator>,
}

impl ClassSchema {
    pub fn new(name: &'static str) -> Self {
        Self {
            name,
            fields: Vec::new(),
            validator: None,
        }
    }

    /// Declare a field. Declaration order is parse order.
    pub fn field(mut self, name: &'static str, field: Field) -> Self {
        self.fields.push((name, field));
        self
    }

    pub fn validator(mut self, validator: Validator) -> Self {
        self.validator = Some(validator);
        self
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    pub fn fields(&self) -> impl Iterator<Item = (&'static str, &Field)> {
        self.fields.iter().map(|(name, field)| (*name, field))
    }

    pub fn get(&self, name: &str) -> Option<&Field> {
        self.fields
            .iter()
            .find(|(field_name, _)| *field_name == name)
            .map(|(_, field)| field)
    }

    /// Validate `data` against this schema and return the normalised record.
    ///
    /// The schema is closed: a key that matches no declared field fails the
    /// whole record. Absent fields receive their defaults, then the
    /// validation hook runs once on the complete record.
    pub fn parse(&self, data: &Value, path: &str) -> Result<Value> {
        let Value::Object(data) = data else {
            return Err(SchemaError::WrongType {
                path: path.to_string(),
                expected: "a dictionary",
            });
        };

        let mut remaining = data.clone();
        let consumed: Vec<_> = self
            .fields
            .iter()
            .map(|(name, field)| (*name, field, remaining.remove(*name)))
            .collect();

        if let Some(unknown) = remaining.keys().next() {
            return Err(SchemaError::UnrecognisedKey {
                path: child_path(path, unknown),
            });
        }

        let mut record = Map::with_capacity(consumed.len());
        for (name, field, value) in consumed {
            let parsed = field.parse(value.as_ref(), &child_path(path, name))?;
            record.insert(name.to_string(), parsed);
        }

        if let Some(validate) = self.validator {
            if let Some(message) = validate(&Record::new(&record)) {
                return Err(SchemaError::Invalid {
                    path: path.to_string(),
                    message,
                });
            }
        }

        Ok(Value::Object(record))
    }
}

/// Join a parent path and a field name with a dot.
pub fn child_path(parent: &str, name: &str) -> String {
    if parent.is_empty() {
        name.to_string()
    } else {
        format!("{parent}.{name}")
    }
}

/// Read-only view of a parsed record handed to validators.
#[derive(Debug, Clone, Copy)]
pub struct Record<'a> {
    values: &'a Map<String, Value>,
}

impl<'a> Record<'a> {
    pub fn new(values: &'a Map<String, Value>) -> Self {
        Self { values }
    }

    pub fn get(&self, name: &str) -> Option<&'a Value> {
        self.values.get(name)
    }

    pub fn str(&self, name: &str) -> Option<&'a str> {
        self.get(name).and_then(Value::as_str)
    }

    /// Whether the field holds a meaningful value.
    ///
    /// Null, empty strings, `false`, zero and empty lists count as unset;
    /// nested records always count as set.
    pub fn is_set(&self, name: &str) -> bool {
        match self.get(name) {
            None | Some(Value::Null) => false,
            Some(Value::String(s)) => !s.is_empty(),
            Some(Value::Bool(b)) => *b,
            Some(Value::Number(n)) => n.as_f64() != Some(0.0),
            Some(Value::Array(items)) => !items.is_empty(),
            Some(Value::Object(_)) => true,
        }
    }

    /// Message for a pair of fields of which exactly one must be set.
    pub fn exactly_one_of(&self, first: &str, second: &str) -> Option<String> {
        if self.is_set(first) == self.is_set(second) {
            Some(format!(
                "You must specify either {first} or {second}, but not both."
            ))
        } else {
            None
        }
    }
}

/// A Rust type whose instances are produced from a [`ClassSchema`].
pub trait SchemaType: DeserializeOwned {
    fn schema() -> &'static ClassSchema;
}

/// Parse a raw document into `T`.
///
/// The generic field rules run first; the normalised record is then bound
/// into the Rust type.
pub fn parse_document<T: SchemaType>(data: &Value) -> Result<T> {
    parse_at::<T>(data, "")
}

/// Like [`parse_document`], reporting errors relative to `path`.
pub fn parse_at<T: SchemaType>(data: &Value, path: &str) -> Result<T> {
    let schema = T::schema();
    let record = schema.parse(data, path)?;
    serde_json::from_value(record).map_err(|e| SchemaError::Binding {
        schema: schema.name(),
        message: e.to_string(),
    })
}
