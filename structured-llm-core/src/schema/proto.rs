//! proto3 rendering of schemars root schemas

use super::SchemaError;
use schemars::schema::{InstanceType, RootSchema, Schema, SchemaObject, SingleOrVec};
use schemars::Map;
use serde_json::Value;
use std::collections::HashSet;

const DEFINITIONS_PREFIX: &str = "#/definitions/";

/// Name used for the root message when the schema carries no title
const DEFAULT_ROOT_NAME: &str = "Root";

/// Render a root schema as proto3 text
///
/// The root becomes the first message. Referenced definitions follow in the
/// order they are first used, each emitted once.
pub fn render(root: &RootSchema) -> Result<String, SchemaError> {
    let name = root
        .schema
        .metadata
        .as_ref()
        .and_then(|m| m.title.clone())
        .unwrap_or_else(|| DEFAULT_ROOT_NAME.to_string());

    if !is_message(&root.schema) {
        return Err(SchemaError::NotAMessage(name));
    }

    let mut writer = ProtoWriter::new(&root.definitions);
    writer.seen.insert(name.clone());
    writer.render_message(&name, &root.schema)?;

    let mut out = String::from("syntax = \"proto3\";\n\n");
    out.push_str(&writer.blocks.join("\n"));
    Ok(out)
}

/// Resolved type of a single field
#[derive(Debug)]
struct FieldType {
    name: String,
    repeated: bool,
    optional: bool,
    map: bool,
}

impl FieldType {
    fn scalar(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            repeated: false,
            optional: false,
            map: false,
        }
    }

    fn label(&self, required: bool) -> &'static str {
        if self.repeated {
            "repeated "
        } else if self.map {
            ""
        } else if self.optional || !required {
            "optional "
        } else {
            ""
        }
    }
}

struct ProtoWriter<'a> {
    definitions: &'a Map<String, Schema>,
    /// Definitions currently being rendered, innermost last
    stack: Vec<String>,
    /// Definitions already emitted or in progress
    seen: HashSet<String>,
    blocks: Vec<String>,
}

impl<'a> ProtoWriter<'a> {
    fn new(definitions: &'a Map<String, Schema>) -> Self {
        Self {
            definitions,
            stack: Vec::new(),
            seen: HashSet::new(),
            blocks: Vec::new(),
        }
    }

    fn render_message(&mut self, name: &str, schema: &SchemaObject) -> Result<(), SchemaError> {
        check_identifier(name, name)?;

        // Reserve the slot so nested messages land after this one.
        let slot = self.blocks.len();
        self.blocks.push(String::new());
        self.stack.push(name.to_string());

        let mut block = format!("message {} {{\n", name);
        if let Some(object) = &schema.object {
            for (index, (field, field_schema)) in object.properties.iter().enumerate() {
                let path = format!("{}.{}", name, field);
                check_identifier(field, &path)?;
                let ty = self.field_type(field_schema, &path)?;
                let required = object.required.contains(field);
                block.push_str(&format!(
                    "  {}{} {} = {};\n",
                    ty.label(required),
                    ty.name,
                    field,
                    index + 1
                ));
            }
        }
        block.push_str("}\n");

        self.stack.pop();
        self.blocks[slot] = block;
        Ok(())
    }

    fn render_enum(&mut self, name: &str, values: &[Value]) -> Result<(), SchemaError> {
        check_identifier(name, name)?;

        let mut block = format!("enum {} {{\n", name);
        for (index, value) in values.iter().enumerate() {
            let variant = value.as_str().ok_or_else(|| SchemaError::Unsupported {
                path: name.to_string(),
                reason: format!("enum value {} is not a string", value),
            })?;
            check_identifier(variant, name)?;
            block.push_str(&format!("  {} = {};\n", variant, index));
        }
        block.push_str("}\n");

        self.blocks.push(block);
        Ok(())
    }

    fn field_type(&mut self, schema: &Schema, path: &str) -> Result<FieldType, SchemaError> {
        let object = match schema {
            Schema::Object(object) => object,
            Schema::Bool(_) => return Err(unsupported(path, "untyped value")),
        };

        if let Some(reference) = &object.reference {
            return self.reference_type(reference, path);
        }

        if let Some(subschemas) = &object.subschemas {
            // schemars wraps a documented `$ref` in a single-element allOf
            if let Some([inner]) = subschemas.all_of.as_deref() {
                return self.field_type(inner, path);
            }
            // Option<T> for non-primitive T is `anyOf: [T, null]`
            let alternatives = subschemas.any_of.as_deref().or(subschemas.one_of.as_deref());
            if let Some(alternatives) = alternatives {
                let present: Vec<&Schema> =
                    alternatives.iter().filter(|s| !is_null(s)).collect();
                if let [inner] = present.as_slice() {
                    if alternatives.len() == 2 {
                        let mut ty = self.field_type(inner, path)?;
                        ty.optional = true;
                        return Ok(ty);
                    }
                }
            }
            return Err(unsupported(path, "union types have no proto3 equivalent"));
        }

        let (instance, nullable) = single_instance_type(object)
            .ok_or_else(|| unsupported(path, "value has no single concrete type"))?;

        let mut ty = match instance {
            InstanceType::String if object.enum_values.is_some() => {
                return Err(unsupported(path, "anonymous enum"));
            }
            InstanceType::String => FieldType::scalar("string"),
            InstanceType::Boolean => FieldType::scalar("bool"),
            InstanceType::Integer => FieldType::scalar(integer_type(object.format.as_deref())),
            InstanceType::Number => FieldType::scalar(number_type(object.format.as_deref())),
            InstanceType::Array => self.array_type(object, path)?,
            InstanceType::Object => self.map_type(object, path)?,
            InstanceType::Null => return Err(unsupported(path, "null-only value")),
        };
        ty.optional |= nullable;
        Ok(ty)
    }

    fn array_type(&mut self, object: &SchemaObject, path: &str) -> Result<FieldType, SchemaError> {
        let items = object
            .array
            .as_ref()
            .and_then(|a| a.items.as_ref())
            .ok_or_else(|| unsupported(path, "array without item type"))?;

        let item = match items {
            SingleOrVec::Single(item) => item,
            SingleOrVec::Vec(_) => return Err(unsupported(path, "tuple")),
        };

        let mut ty = self.field_type(item, path)?;
        if ty.repeated || ty.map {
            return Err(unsupported(path, "nested repeated field"));
        }
        ty.repeated = true;
        ty.optional = false;
        Ok(ty)
    }

    fn map_type(&mut self, object: &SchemaObject, path: &str) -> Result<FieldType, SchemaError> {
        let validation = object
            .object
            .as_ref()
            .ok_or_else(|| unsupported(path, "object without properties"))?;

        if !validation.properties.is_empty() {
            return Err(unsupported(path, "anonymous nested message"));
        }

        let value = validation
            .additional_properties
            .as_ref()
            .ok_or_else(|| unsupported(path, "object without properties"))?;

        let value_ty = self.field_type(value, path)?;
        if value_ty.repeated || value_ty.map {
            return Err(unsupported(path, "map value cannot be repeated"));
        }

        Ok(FieldType {
            name: format!("map<string, {}>", value_ty.name),
            repeated: false,
            optional: false,
            map: true,
        })
    }

    fn reference_type(&mut self, reference: &str, path: &str) -> Result<FieldType, SchemaError> {
        let name = reference
            .strip_prefix(DEFINITIONS_PREFIX)
            .ok_or_else(|| unsupported(path, &format!("external reference {}", reference)))?;

        if self.stack.iter().any(|active| active == name) {
            return Err(SchemaError::Recursive(name.to_string()));
        }

        let definitions = self.definitions;
        let definition = match definitions.get(name) {
            Some(Schema::Object(definition)) => definition,
            Some(Schema::Bool(_)) => return Err(unsupported(path, "untyped definition")),
            None => return Err(SchemaError::MissingDefinition(name.to_string())),
        };

        if let Some(values) = &definition.enum_values {
            if self.seen.insert(name.to_string()) {
                self.render_enum(name, values)?;
            }
            return Ok(FieldType::scalar(name));
        }

        if is_message(definition) {
            if self.seen.insert(name.to_string()) {
                self.render_message(name, definition)?;
            }
            return Ok(FieldType::scalar(name));
        }

        // Newtypes and aliases resolve to their underlying type.
        self.stack.push(name.to_string());
        let ty = self.field_type(&Schema::Object(definition.clone()), path);
        self.stack.pop();
        ty
    }
}

fn unsupported(path: &str, reason: &str) -> SchemaError {
    SchemaError::Unsupported {
        path: path.to_string(),
        reason: reason.to_string(),
    }
}

fn is_message(schema: &SchemaObject) -> bool {
    let is_object = matches!(
        single_instance_type(schema),
        Some((InstanceType::Object, false))
    );
    is_object
        && schema
            .object
            .as_ref()
            .map_or(true, |o| o.additional_properties.is_none() || !o.properties.is_empty())
}

fn is_null(schema: &Schema) -> bool {
    match schema {
        Schema::Object(object) => matches!(single_instance_type(object), Some((InstanceType::Null, _))),
        Schema::Bool(_) => false,
    }
}

/// The one non-null instance type of a schema and whether null is also allowed
fn single_instance_type(schema: &SchemaObject) -> Option<(InstanceType, bool)> {
    match schema.instance_type.as_ref()? {
        SingleOrVec::Single(instance) => Some((**instance, false)),
        SingleOrVec::Vec(instances) => {
            let nullable = instances.contains(&InstanceType::Null);
            let concrete: Vec<InstanceType> = instances
                .iter()
                .copied()
                .filter(|i| *i != InstanceType::Null)
                .collect();
            match concrete.as_slice() {
                [single] => Some((*single, nullable)),
                [] if nullable => Some((InstanceType::Null, false)),
                _ => None,
            }
        }
    }
}

fn integer_type(format: Option<&str>) -> &'static str {
    match format {
        Some("int8") | Some("int16") | Some("int32") => "int32",
        Some("uint8") | Some("uint16") | Some("uint32") => "uint32",
        Some("uint64") | Some("uint") => "uint64",
        _ => "int64",
    }
}

fn number_type(format: Option<&str>) -> &'static str {
    match format {
        Some("float") => "float",
        _ => "double",
    }
}

fn check_identifier(ident: &str, path: &str) -> Result<(), SchemaError> {
    let mut chars = ident.chars();
    let valid = matches!(chars.next(), Some(c) if c.is_ascii_alphabetic() || c == '_')
        && chars.all(|c| c.is_ascii_alphanumeric() || c == '_');
    if valid {
        Ok(())
    } else {
        Err(unsupported(
            path,
            &format!("'{}' is not a valid proto identifier", ident),
        ))
    }
}
