//! Declarative mapping of raw documents onto typed records.
//!
//! Each record type owns a [`ClassSchema`]: an ordered table of
//! `(name, Field)` pairs built once. One recursive routine interprets the
//! table, so adding a record type means declaring its fields, nothing else.
//!
//! ```
//! use ltools_schema::mapper::{ClassSchema, Field};
//! use serde_json::json;
//!
//! let schema = ClassSchema::new("Entity")
//!     .field("hello", Field::string().required())
//!     .field("count", Field::int().coerce().default(100));
//!
//! let record = schema.parse(&json!({"hello": "world"}), "").unwrap();
//! assert_eq!(record, json!({"hello": "world", "count": 100}));
//! ```

mod class;
mod field;

pub use class::{ClassSchema, Record, SchemaType, Validator, child_path, parse_at, parse_document};
pub use field::{Field, FieldKind, SchemaRef};
