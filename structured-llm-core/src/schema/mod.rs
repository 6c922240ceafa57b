//! Schema derivation for structured extraction
//!
//! Target types describe themselves through `schemars::JsonSchema`, derived at
//! compile time. The resulting JSON Schema is rendered as proto3 message
//! definitions, which is the text embedded in extraction prompts:
//!
//! ```text
//! syntax = "proto3";
//!
//! message Answer {
//!   int64 num = 1;
//! }
//! ```
//!
//! Rendering is deterministic: fields keep declaration order, referenced
//! types follow the root in first-use order. Constructs proto3 cannot
//! express are rejected instead of approximated.

mod proto;

pub use proto::render;

use schemars::gen::SchemaGenerator;
use schemars::JsonSchema;
use thiserror::Error;

/// Errors raised while deriving schema text
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SchemaError {
    #[error("type '{0}' refers to itself")]
    Recursive(String),

    #[error("type '{0}' is not a struct with named fields")]
    NotAMessage(String),

    #[error("unsupported construct at '{path}': {reason}")]
    Unsupported { path: String, reason: String },

    #[error("schema references missing definition '{0}'")]
    MissingDefinition(String),
}

/// Derive proto3 schema text for `T`
pub fn derive<T: JsonSchema>() -> Result<String, SchemaError> {
    let root = SchemaGenerator::default().into_root_schema_for::<T>();
    render(&root)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[allow(dead_code)]
    #[derive(JsonSchema)]
    struct Answer {
        num: i64,
    }

    #[allow(dead_code)]
    #[derive(JsonSchema)]
    enum Mood {
        Happy,
        Grumpy,
    }

    #[allow(dead_code)]
    #[derive(JsonSchema)]
    struct Address {
        street: String,
        zip: Option<u32>,
    }

    #[allow(dead_code)]
    #[derive(JsonSchema)]
    struct Person {
        name: String,
        age: u8,
        height: f32,
        verified: bool,
        tags: Vec<String>,
        /// Where they live
        home: Address,
        work: Option<Address>,
        mood: Mood,
        scores: HashMap<String, f64>,
    }

    #[allow(dead_code)]
    #[derive(JsonSchema)]
    struct Node {
        value: i32,
        children: Vec<Node>,
    }

    #[allow(dead_code)]
    #[derive(JsonSchema)]
    struct Left {
        right: Box<Right>,
    }

    #[allow(dead_code)]
    #[derive(JsonSchema)]
    struct Right {
        left: Option<Box<Left>>,
    }

    #[allow(dead_code)]
    #[derive(JsonSchema)]
    struct Grid {
        cells: Vec<Vec<u8>>,
    }

    #[allow(dead_code)]
    #[derive(JsonSchema)]
    enum Shape {
        Circle { radius: f64 },
        Square { side: f64 },
    }

    #[allow(dead_code)]
    #[derive(JsonSchema)]
    struct Drawing {
        shape: Shape,
    }

    #[test]
    fn test_single_field_message() {
        let schema = derive::<Answer>().unwrap();
        assert_eq!(
            schema,
            "syntax = \"proto3\";\n\nmessage Answer {\n  int64 num = 1;\n}\n"
        );
    }

    #[test]
    fn test_nested_types_follow_root() {
        let schema = derive::<Person>().unwrap();
        let expected = "\
syntax = \"proto3\";

message Person {
  string name = 1;
  uint32 age = 2;
  float height = 3;
  bool verified = 4;
  repeated string tags = 5;
  Address home = 6;
  optional Address work = 7;
  Mood mood = 8;
  map<string, double> scores = 9;
}

message Address {
  string street = 1;
  optional uint32 zip = 2;
}

enum Mood {
  Happy = 0;
  Grumpy = 1;
}
";
        assert_eq!(schema, expected);
    }

    #[test]
    fn test_derivation_is_deterministic() {
        assert_eq!(derive::<Person>().unwrap(), derive::<Person>().unwrap());
    }

    #[test]
    fn test_recursive_root_is_rejected() {
        assert_eq!(
            derive::<Node>().unwrap_err(),
            SchemaError::Recursive("Node".to_string())
        );
    }

    #[test]
    fn test_mutual_recursion_is_rejected() {
        assert!(matches!(
            derive::<Left>().unwrap_err(),
            SchemaError::Recursive(_)
        ));
    }

    #[test]
    fn test_nested_repeated_is_rejected() {
        assert!(matches!(
            derive::<Grid>().unwrap_err(),
            SchemaError::Unsupported { path, .. } if path == "Grid.cells"
        ));
    }

    #[test]
    fn test_data_enum_is_rejected() {
        assert!(matches!(
            derive::<Drawing>().unwrap_err(),
            SchemaError::Unsupported { .. }
        ));
    }

    #[test]
    fn test_non_struct_root_is_rejected() {
        assert!(matches!(
            derive::<Vec<i32>>().unwrap_err(),
            SchemaError::NotAMessage(_)
        ));
        assert!(matches!(
            derive::<Mood>().unwrap_err(),
            SchemaError::NotAMessage(_)
        ));
    }
}
