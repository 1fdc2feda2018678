//! Schema derivation: route declaration -> structured-output response format
//!
//! Each declared action path is compiled once into the constrained-output
//! descriptor the remote matcher is asked to answer with, so a match can only
//! ever be that route's literal path plus correctly typed parameters.

use serde::Serialize;
use serde_json::{json, Value};
use thiserror::Error;

use crate::route::{ActionPath, ParamType};

#[derive(Debug, Error, PartialEq, Eq)]
pub enum SchemaError {
    #[error("enum param '{name}' on path '{path}' has no options")]
    EmptyEnum { path: String, name: String },
    #[error("duplicate param '{name}' on path '{path}'")]
    DuplicateParam { path: String, name: String },
}

/// Element-level constraint for one parameter field.
#[derive(Debug, Clone, PartialEq)]
enum FieldConstraint {
    NullableString,
    Enum(Vec<String>),
}

#[derive(Debug, Clone, PartialEq)]
struct FieldSchema {
    name: String,
    constraint: FieldConstraint,
    is_list: bool,
}

impl FieldSchema {
    fn element_format(&self) -> Value {
        match &self.constraint {
            FieldConstraint::NullableString => json!({"type": ["string", "null"]}),
            FieldConstraint::Enum(options) => json!({"type": "string", "enum": options}),
        }
    }

    fn format(&self) -> Value {
        let element = self.element_format();
        if self.is_list {
            json!({"type": "array", "items": element})
        } else {
            element
        }
    }

    fn element_accepts(&self, value: &Value) -> bool {
        match &self.constraint {
            FieldConstraint::NullableString => value.is_string() || value.is_null(),
            FieldConstraint::Enum(options) => {
                value.as_str().map(|s| options.iter().any(|o| o == s)).unwrap_or(false)
            }
        }
    }

    fn accepts(&self, value: &Value) -> bool {
        if self.is_list {
            match value.as_array() {
                Some(items) => items.iter().all(|v| self.element_accepts(v)),
                None => false,
            }
        } else {
            self.element_accepts(value)
        }
    }
}

/// Compiled response-shape descriptor for one action path.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ActionPathSchema {
    pub path: String,
    pub response_format: Value,
    #[serde(skip)]
    fields: Vec<FieldSchema>,
}

impl ActionPathSchema {
    /// Derive the schema for one route. Order-preserving; rejects enum params
    /// without options and duplicate param names at declaration time.
    pub fn compile(route: &ActionPath) -> Result<Self, SchemaError> {
        let mut fields: Vec<FieldSchema> = Vec::with_capacity(route.params.len());
        for param in &route.params {
            if fields.iter().any(|f| f.name == param.name) {
                return Err(SchemaError::DuplicateParam {
                    path: route.path.clone(),
                    name: param.name.clone(),
                });
            }
            let constraint = match param.param_type {
                ParamType::String => FieldConstraint::NullableString,
                ParamType::Enum => {
                    let options = param.enum_options.clone().unwrap_or_default();
                    if options.is_empty() {
                        return Err(SchemaError::EmptyEnum {
                            path: route.path.clone(),
                            name: param.name.clone(),
                        });
                    }
                    FieldConstraint::Enum(options)
                }
            };
            fields.push(FieldSchema { name: param.name.clone(), constraint, is_list: param.is_list });
        }

        let response_format = build_response_format(&route.path, &fields);
        Ok(Self { path: route.path.clone(), response_format, fields })
    }

    /// Whether a candidate `{path, params}` document satisfies this schema:
    /// literal path, exactly the declared params, each correctly typed.
    pub fn accepts(&self, candidate: &Value) -> bool {
        if candidate.get("path").and_then(Value::as_str) != Some(self.path.as_str()) {
            return false;
        }
        let params = match candidate.get("params").and_then(Value::as_object) {
            Some(p) => p,
            None => return false,
        };
        if params.len() != self.fields.len() {
            return false;
        }
        self.fields
            .iter()
            .all(|f| params.get(&f.name).map(|v| f.accepts(v)).unwrap_or(false))
    }
}

fn build_response_format(path: &str, fields: &[FieldSchema]) -> Value {
    let mut properties = serde_json::Map::new();
    let mut required = Vec::with_capacity(fields.len());
    for field in fields {
        properties.insert(field.name.clone(), field.format());
        required.push(Value::String(field.name.clone()));
    }

    json!({
        "type": "json_schema",
        "json_schema": {
            "name": format!("{path}ResponseFormat"),
            "strict": true,
            "schema": {
                "type": "object",
                "properties": {
                    "path": {"type": "string", "const": path},
                    "params": {
                        "type": "object",
                        "properties": Value::Object(properties),
                        "required": required,
                        "additionalProperties": false
                    }
                },
                "required": ["path", "params"],
                "additionalProperties": false
            }
        }
    })
}

/// The compiled schemas for a whole route table, in declaration order.
/// The reserved `notFound` path is never included.
#[derive(Debug, Clone, Default)]
pub struct SchemaSet {
    schemas: Vec<ActionPathSchema>,
}

impl SchemaSet {
    pub fn compile(routes: &[ActionPath]) -> Result<Self, SchemaError> {
        let schemas = routes
            .iter()
            .filter(|r| !r.is_not_found())
            .map(ActionPathSchema::compile)
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self { schemas })
    }

    pub fn schemas(&self) -> &[ActionPathSchema] {
        &self.schemas
    }

    pub fn len(&self) -> usize {
        self.schemas.len()
    }

    pub fn is_empty(&self) -> bool {
        self.schemas.is_empty()
    }
}
