//! Tests for the field mapper: field kinds, closed schemas and typed binding

use std::collections::BTreeMap;
use std::sync::LazyLock;

use ltools_schema::SchemaError;
use ltools_schema::mapper::{ClassSchema, Field, SchemaType, parse_at, parse_document};
use pretty_assertions::assert_eq;
use rstest::rstest;
use serde::Deserialize;
use serde_json::{Value, json};

const FAMOUS_FIVE: [&str; 5] = ["Dick", "Julian", "George", "Anne", "Timmy"];

#[derive(Debug, Deserialize)]
struct Greeting {
    hello: Option<String>,
}

impl SchemaType for Greeting {
    fn schema() -> &'static ClassSchema {
        static SCHEMA: LazyLock<ClassSchema> =
            LazyLock::new(|| ClassSchema::new("Greeting").field("hello", Field::string()));
        &SCHEMA
    }
}

#[derive(Debug, Deserialize)]
struct RequiredGreeting {
    #[allow(dead_code)]
    hello: String,
}

impl SchemaType for RequiredGreeting {
    fn schema() -> &'static ClassSchema {
        static SCHEMA: LazyLock<ClassSchema> = LazyLock::new(|| {
            ClassSchema::new("RequiredGreeting").field("hello", Field::string().required())
        });
        &SCHEMA
    }
}

#[derive(Debug, Deserialize)]
struct Counter {
    count: i64,
    active: bool,
}

impl SchemaType for Counter {
    fn schema() -> &'static ClassSchema {
        static SCHEMA: LazyLock<ClassSchema> = LazyLock::new(|| {
            ClassSchema::new("Counter")
                .field("count", Field::int().coerce().default(100))
                .field("active", Field::bool().default(false))
        });
        &SCHEMA
    }
}

#[derive(Debug, Deserialize)]
struct FiveMember {
    name: Option<String>,
}

impl SchemaType for FiveMember {
    fn schema() -> &'static ClassSchema {
        static SCHEMA: LazyLock<ClassSchema> = LazyLock::new(|| {
            ClassSchema::new("FiveMember").field("name", Field::choice(FAMOUS_FIVE))
        });
        &SCHEMA
    }
}

#[derive(Debug, Deserialize)]
struct Collections {
    names: Vec<String>,
    environment: BTreeMap<String, String>,
    five: Option<FiveMember>,
    members: Vec<FiveMember>,
}

impl SchemaType for Collections {
    fn schema() -> &'static ClassSchema {
        static SCHEMA: LazyLock<ClassSchema> = LazyLock::new(|| {
            ClassSchema::new("Collections")
                .field("names", Field::list(Field::string()))
                .field("environment", Field::map(Field::string()))
                .field("five", Field::class::<FiveMember>())
                .field(
                    "members",
                    Field::list(Field::class::<FiveMember>().default_field("name")),
                )
        });
        &SCHEMA
    }
}

// ============================================================================
// Scalars
// ============================================================================

#[test]
fn test_string_field_maps_value() {
    let result: Greeting = parse_document(&json!({"hello": "world"})).unwrap();
    assert_eq!(result.hello.as_deref(), Some("world"));
}

#[test]
fn test_missing_optional_field_is_none() {
    let result: Greeting = parse_document(&json!({})).unwrap();
    assert_eq!(result.hello, None);
}

#[test]
fn test_unknown_key_is_rejected() {
    let err = parse_document::<Greeting>(&json!({"goodbye": "test"})).unwrap_err();
    assert_eq!(
        err,
        SchemaError::UnrecognisedKey {
            path: "goodbye".to_string()
        }
    );
    assert_eq!(err.to_string(), "Unrecognised value \"goodbye\".");
}

#[test]
fn test_non_dictionary_document_is_rejected() {
    let err = parse_document::<Greeting>(&json!("Hello world")).unwrap_err();
    assert!(matches!(err, SchemaError::WrongType { .. }));
}

#[test]
fn test_missing_required_field() {
    let err = parse_document::<RequiredGreeting>(&json!({})).unwrap_err();
    assert_eq!(err.to_string(), "Required value \"hello\" was not provided.");
}

#[test]
fn test_explicit_null_on_required_field_is_missing() {
    let err = parse_document::<RequiredGreeting>(&json!({"hello": null})).unwrap_err();
    assert!(matches!(err, SchemaError::MissingValue { .. }));
}

#[rstest]
#[case(json!({"count": 10}), 10)]
#[case(json!({"count": "10"}), 10)]
#[case(json!({}), 100)]
#[case(json!({"count": null}), 100)]
fn test_int_field(#[case] data: Value, #[case] expected: i64) {
    let result: Counter = parse_document(&data).unwrap();
    assert_eq!(result.count, expected);
}

#[rstest]
#[case(json!({"count": "ten"}))]
#[case(json!({"count": [10]}))]
#[case(json!({"count": true}))]
#[case(json!({"count": 10.5}))]
#[case(json!({"count": u64::MAX}))]
#[case(json!({"count": 1e30}))]
#[case(json!({"count": -1e30}))]
fn test_int_field_rejects_non_integers(#[case] data: Value) {
    let err = parse_document::<Counter>(&data).unwrap_err();
    assert_eq!(err.path(), "count");
}

#[rstest]
#[case(json!({"active": true}), true)]
#[case(json!({"active": false}), false)]
#[case(json!({}), false)]
fn test_bool_field(#[case] data: Value, #[case] expected: bool) {
    let result: Counter = parse_document(&data).unwrap();
    assert_eq!(result.active, expected);
}

#[test]
fn test_bool_field_without_coercion_rejects_strings() {
    assert!(parse_document::<Counter>(&json!({"active": "true"})).is_err());
}

// ============================================================================
// Choices
// ============================================================================

#[test]
fn test_choice_accepts_member() {
    let result: FiveMember = parse_document(&json!({"name": "Julian"})).unwrap();
    assert_eq!(result.name.as_deref(), Some("Julian"));
}

#[test]
fn test_choice_rejects_non_member() {
    let err = parse_document::<FiveMember>(&json!({"name": "Jack"})).unwrap_err();
    assert_eq!(
        err.to_string(),
        "Value \"name\" must be one of: Dick, Julian, George, Anne, Timmy."
    );
}

#[test]
fn test_missing_choice_is_none() {
    let result: FiveMember = parse_document(&json!({})).unwrap();
    assert_eq!(result.name, None);
}

// ============================================================================
// Lists, maps and nested classes
// ============================================================================

#[test]
fn test_collections_default_to_empty() {
    let result: Collections = parse_document(&json!({})).unwrap();
    assert!(result.names.is_empty());
    assert!(result.environment.is_empty());
    assert!(result.five.is_none());
    assert!(result.members.is_empty());
}

#[test]
fn test_list_field_keeps_order() {
    let result: Collections = parse_document(&json!({"names": FAMOUS_FIVE})).unwrap();
    assert_eq!(result.names, FAMOUS_FIVE);
}

#[rstest]
#[case::string(json!({"names": "5"}), "names")]
#[case::dict(json!({"names": {}}), "names")]
#[case::integers(json!({"names": [0, 1, 2]}), "names[0]")]
#[case::nested_list(json!({"names": ["a", ["b"]]}), "names[1]")]
fn test_list_field_rejects(#[case] data: Value, #[case] path: &str) {
    let err = parse_document::<Collections>(&data).unwrap_err();
    assert_eq!(err.path(), path);
}

#[test]
fn test_map_field() {
    let result: Collections = parse_document(&json!({"environment": {"one": "two"}})).unwrap();
    assert_eq!(result.environment.get("one").map(String::as_str), Some("two"));
}

#[test]
fn test_map_field_errors_are_indexed_by_key() {
    let err = parse_document::<Collections>(&json!({"environment": {"one": []}})).unwrap_err();
    assert_eq!(err.path(), "environment[one]");
}

#[test]
fn test_nested_class() {
    let result: Collections = parse_document(&json!({"five": {"name": "Julian"}})).unwrap();
    assert_eq!(result.five.unwrap().name.as_deref(), Some("Julian"));
}

#[test]
fn test_nested_class_invalid_member() {
    let err = parse_document::<Collections>(&json!({"five": {"name": "Philip"}})).unwrap_err();
    assert_eq!(err.path(), "five.name");
}

#[test]
fn test_list_of_classes_with_shorthand() {
    let data = json!({
        "members": ["Julian", {"name": "Dick"}, "George", {"name": "Anne"}, "Timmy"]
    });
    let result: Collections = parse_document(&data).unwrap();
    let mut names: Vec<_> = result.members.into_iter().filter_map(|m| m.name).collect();
    names.sort();
    let mut expected = FAMOUS_FIVE.to_vec();
    expected.sort();
    assert_eq!(names, expected);
}

#[test]
fn test_unknown_key_in_nested_class_names_full_path() {
    let data = json!({"members": [{"name": "Anne", "dog": "Timmy"}]});
    let err = parse_document::<Collections>(&data).unwrap_err();
    assert_eq!(err.path(), "members[0].dog");
}

#[test]
fn test_parse_at_prefixes_paths() {
    let err = parse_at::<FiveMember>(&json!({"name": 5}), "functions[a]").unwrap_err();
    assert_eq!(err.path(), "functions[a].name");
}

// ============================================================================
// Validators
// ============================================================================

#[test]
fn test_validator_sees_defaults_and_reports_message() {
    let schema = ClassSchema::new("Either")
        .field("left", Field::string())
        .field("right", Field::string())
        .validator(|record| record.exactly_one_of("left", "right"));

    assert!(schema.parse(&json!({"left": "l"}), "").is_ok());
    assert!(schema.parse(&json!({"right": "r"}), "").is_ok());

    let err = schema.parse(&json!({}), "pair").unwrap_err();
    assert_eq!(
        err,
        SchemaError::Invalid {
            path: "pair".to_string(),
            message: "You must specify either left or right, but not both.".to_string(),
        }
    );
    assert!(schema.parse(&json!({"left": "l", "right": "r"}), "").is_err());
}

#[test]
fn test_schema_preserves_declaration_order() {
    let names: Vec<_> = Collections::schema().fields().map(|(name, _)| name).collect();
    assert_eq!(names, vec!["names", "environment", "five", "members"]);
}
