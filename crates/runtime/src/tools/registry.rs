//! Static tool catalog exposed to the model.

use super::ToolError;
use serde_json::{Map, Value, json};
use std::collections::HashMap;

/// The type of a single parameter, with its choices and default.
#[derive(Debug, Clone, PartialEq)]
pub enum ParamKind {
    String {
        choices: Vec<String>,
        default: Option<String>,
    },
    Integer {
        default: Option<i64>,
        minimum: Option<i64>,
    },
    Number {
        default: Option<f64>,
        minimum: Option<f64>,
        maximum: Option<f64>,
    },
    Boolean {
        default: Option<bool>,
    },
    Object(ObjectSchema),
}

/// A named parameter.
#[derive(Debug, Clone, PartialEq)]
pub struct Param {
    pub name: String,
    pub kind: ParamKind,
    pub description: Option<String>,
    pub required: bool,
}

impl Param {
    fn new(name: impl Into<String>, kind: ParamKind) -> Self {
        Self {
            name: name.into(),
            kind,
            description: None,
            required: false,
        }
    }

    pub fn string(name: impl Into<String>) -> Self {
        Self::new(
            name,
            ParamKind::String {
                choices: Vec::new(),
                default: None,
            },
        )
    }

    pub fn integer(name: impl Into<String>) -> Self {
        Self::new(
            name,
            ParamKind::Integer {
                default: None,
                minimum: None,
            },
        )
    }

    pub fn number(name: impl Into<String>) -> Self {
        Self::new(
            name,
            ParamKind::Number {
                default: None,
                minimum: None,
                maximum: None,
            },
        )
    }

    pub fn boolean(name: impl Into<String>) -> Self {
        Self::new(name, ParamKind::Boolean { default: None })
    }

    pub fn object(name: impl Into<String>, schema: ObjectSchema) -> Self {
        Self::new(name, ParamKind::Object(schema))
    }

    /// Restrict a string parameter to a fixed set of values.
    pub fn choices<I, S>(mut self, values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        if let ParamKind::String { choices, .. } = &mut self.kind {
            *choices = values
                .into_iter()
                .map(|s| s.as_ref().to_string())
                .collect();
        }
        self
    }

    /// Set the documented default. Ignored when the value does not fit the kind.
    pub fn default_value(mut self, value: impl Into<Value>) -> Self {
        let value = value.into();
        match &mut self.kind {
            ParamKind::String { default, .. } => {
                *default = value.as_str().map(str::to_string);
            }
            ParamKind::Integer { default, .. } => *default = value.as_i64(),
            ParamKind::Number { default, .. } => *default = value.as_f64(),
            ParamKind::Boolean { default } => *default = value.as_bool(),
            ParamKind::Object(_) => {}
        }
        self
    }

    pub fn minimum(mut self, value: f64) -> Self {
        match &mut self.kind {
            ParamKind::Integer { minimum, .. } => *minimum = Some(value as i64),
            ParamKind::Number { minimum, .. } => *minimum = Some(value),
            _ => {}
        }
        self
    }

    pub fn maximum(mut self, value: f64) -> Self {
        if let ParamKind::Number { maximum, .. } = &mut self.kind {
            *maximum = Some(value);
        }
        self
    }

    pub fn describe(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn required(mut self) -> Self {
        self.required = true;
        self
    }

    /// JSON Schema for this parameter.
    pub fn to_json_schema(&self) -> Value {
        let mut schema = Map::new();
        match &self.kind {
            ParamKind::String { choices, default } => {
                schema.insert("type".into(), json!("string"));
                if !choices.is_empty() {
                    schema.insert("enum".into(), json!(choices));
                }
                if let Some(d) = default {
                    schema.insert("default".into(), json!(d));
                }
            }
            ParamKind::Integer { default, minimum } => {
                schema.insert("type".into(), json!("integer"));
                if let Some(d) = default {
                    schema.insert("default".into(), json!(d));
                }
                if let Some(m) = minimum {
                    schema.insert("minimum".into(), json!(m));
                }
            }
            ParamKind::Number {
                default,
                minimum,
                maximum,
            } => {
                schema.insert("type".into(), json!("number"));
                if let Some(d) = default {
                    schema.insert("default".into(), json!(d));
                }
                if let Some(m) = minimum {
                    schema.insert("minimum".into(), json!(m));
                }
                if let Some(m) = maximum {
                    schema.insert("maximum".into(), json!(m));
                }
            }
            ParamKind::Boolean { default } => {
                schema.insert("type".into(), json!("boolean"));
                if let Some(d) = default {
                    schema.insert("default".into(), json!(d));
                }
            }
            ParamKind::Object(object) => return self.with_description(object.to_json_schema()),
        }
        self.with_description(Value::Object(schema))
    }

    fn with_description(&self, mut schema: Value) -> Value {
        if let (Some(desc), Value::Object(map)) = (&self.description, &mut schema) {
            map.insert("description".into(), json!(desc));
        }
        schema
    }
}

/// An object-shaped parameter list.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ObjectSchema {
    pub params: Vec<Param>,
}

impl ObjectSchema {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn param(mut self, param: Param) -> Self {
        self.params.push(param);
        self
    }

    /// Names of the required parameters, in declaration order.
    pub fn required(&self) -> impl Iterator<Item = &str> {
        self.params
            .iter()
            .filter(|p| p.required)
            .map(|p| p.name.as_str())
    }

    pub fn get(&self, name: &str) -> Option<&Param> {
        self.params.iter().find(|p| p.name == name)
    }

    pub fn to_json_schema(&self) -> Value {
        let properties: Map<String, Value> = self
            .params
            .iter()
            .map(|p| (p.name.clone(), p.to_json_schema()))
            .collect();
        json!({
            "type": "object",
            "properties": properties,
            "required": self.required().collect::<Vec<_>>(),
        })
    }
}

/// A tool definition exposed to the model.
#[derive(Debug, Clone, PartialEq)]
pub struct ToolSpec {
    pub name: String,
    pub description: String,
    pub parameters: ObjectSchema,
}

impl ToolSpec {
    pub fn new(name: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
            parameters: ObjectSchema::new(),
        }
    }

    /// Add a parameter.
    pub fn param(mut self, param: Param) -> Self {
        self.parameters.params.push(param);
        self
    }

    /// JSON Schema for the tool input.
    pub fn input_schema(&self) -> Value {
        self.parameters.to_json_schema()
    }
}

/// Immutable name → spec mapping with unique keys.
///
/// `list` keeps declaration order; `get` is a hash lookup.
#[derive(Debug, Clone, Default)]
pub struct ToolRegistry {
    specs: Vec<ToolSpec>,
    index: HashMap<String, usize>,
}

impl ToolRegistry {
    /// Build a registry, rejecting duplicate names.
    pub fn new(specs: impl IntoIterator<Item = ToolSpec>) -> Result<Self, ToolError> {
        let mut registry = Self::default();
        for spec in specs {
            if registry.index.contains_key(&spec.name) {
                return Err(ToolError::DuplicateTool(spec.name));
            }
            registry
                .index
                .insert(spec.name.clone(), registry.specs.len());
            registry.specs.push(spec);
        }
        Ok(registry)
    }

    pub fn list(&self) -> &[ToolSpec] {
        &self.specs
    }

    pub fn get(&self, name: &str) -> Option<&ToolSpec> {
        self.index.get(name).map(|&i| &self.specs[i])
    }

    pub fn contains(&self, name: &str) -> bool {
        self.index.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.specs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.specs.is_empty()
    }
}
