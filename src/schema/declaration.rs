//! Model declarations in document form
//!
//! One JSON document declares one model type:
//!
//! ```json
//! {
//!   "name": "WithStringList",
//!   "channel": "model-test-channel",
//!   "fields": [
//!     {"name": "messages", "type": "list", "required": true,
//!      "element": {"type": "string"}, "minimum": 1}
//!   ]
//! }
//! ```
//!
//! Documents are loosely typed on purpose: `element` and `model` are kept as
//! raw JSON so that a field type where a field instance belongs (or an inline
//! object where a model type name belongs) is reported as misuse.

use serde::{Deserialize, Deserializer};

use super::errors::{ModelError, ModelResult};
use super::model::{Channel, ModelType};
use super::types::Field;
use super::value::{builtin_type_name, Builtin};

/// Names accepted in the `type` key of a field declaration
pub const FIELD_TYPES: &[&str] = &[
    "string", "integer", "float", "number", "boolean", "datetime", "list", "nested",
];

/// Name of the abstract base type, which cannot be declared
const ABSTRACT_FIELD: &str = "field";

/// Declaration of one model type
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct ModelDeclaration {
    pub name: String,
    pub channel: String,
    #[serde(default)]
    pub fields: Vec<FieldDeclaration>,
}

/// Declaration of one field, or of a list element when `name` is absent
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct FieldDeclaration {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(rename = "type")]
    pub field_type: String,
    #[serde(default)]
    pub required: bool,
    #[serde(default)]
    pub allow_null: bool,
    /// Builtin form; an explicit `null` declares a null default
    #[serde(default, deserialize_with = "present")]
    pub default: Option<Builtin>,
    #[serde(default)]
    pub minimum: Option<usize>,
    #[serde(default)]
    pub maximum: Option<usize>,
    #[serde(default)]
    pub element: Option<Builtin>,
    #[serde(default)]
    pub model: Option<Builtin>,
}

/// Keeps an explicit `null` as `Some(Null)` instead of collapsing it to `None`.
fn present<'de, D>(deserializer: D) -> Result<Option<Builtin>, D::Error>
where
    D: Deserializer<'de>,
{
    Builtin::deserialize(deserializer).map(Some)
}

impl ModelDeclaration {
    /// Parses a declaration document.
    pub fn from_json(content: &str) -> serde_json::Result<Self> {
        serde_json::from_str(content)
    }

    /// Names of the model types this declaration nests, including through
    /// list elements. Malformed parts are skipped here and reported by
    /// [`ModelDeclaration::declare`].
    pub fn dependencies(&self) -> Vec<String> {
        let mut deps = Vec::new();
        for field in &self.fields {
            field.collect_dependencies(&mut deps);
        }
        deps.sort();
        deps.dedup();
        deps
    }

    /// Builds the model type, resolving nested references through `lookup`.
    pub fn declare<F>(&self, lookup: &F) -> ModelResult<ModelType>
    where
        F: Fn(&str) -> Option<ModelType>,
    {
        let mut builder = ModelType::builder(&self.name, Channel::new(&self.channel));
        for declaration in &self.fields {
            let name = declaration.name.as_deref().ok_or_else(|| {
                ModelError::misuse(format!(
                    "model '{}' declares a field without a name",
                    self.name
                ))
            })?;
            builder = builder.field(name, declaration.to_field(name, lookup)?);
        }
        builder.build()
    }
}

impl FieldDeclaration {
    /// Converts the declaration into a field. `path` names it in errors.
    pub fn to_field<F>(&self, path: &str, lookup: &F) -> ModelResult<Field>
    where
        F: Fn(&str) -> Option<ModelType>,
    {
        let mut field = match self.field_type.as_str() {
            "string" => Field::string(),
            "integer" => Field::integer(),
            "float" => Field::float(),
            "number" => Field::number(),
            "boolean" => Field::boolean(),
            "datetime" => Field::datetime(),
            "list" => Field::list(self.element_field(path, lookup)?),
            "nested" => Field::nested(&self.nested_model(path, lookup)?),
            ABSTRACT_FIELD => {
                return Err(ModelError::misuse(format!(
                    "field '{}' uses the abstract field type directly",
                    path
                )))
            }
            other => {
                return Err(ModelError::misuse(format!(
                    "field '{}' has unknown type '{}'",
                    path, other
                )))
            }
        };

        if self.required {
            field = field.required();
        }
        if self.allow_null {
            field = field.allow_null();
        }
        if let Some(minimum) = self.minimum {
            field = field.minimum(minimum);
        }
        if let Some(maximum) = self.maximum {
            field = field.maximum(maximum);
        }
        if let Some(default) = &self.default {
            let converted = field.convert_to_model(default, path).map_err(|e| {
                ModelError::misuse(format!(
                    "default for field '{}' is invalid: {}",
                    path,
                    e.message()
                ))
            })?;
            field = match converted {
                Some(value) => field.default(value),
                None => field.default_null(),
            };
        }

        Ok(field)
    }

    fn element_field<F>(&self, path: &str, lookup: &F) -> ModelResult<Field>
    where
        F: Fn(&str) -> Option<ModelType>,
    {
        match &self.element {
            Some(raw @ Builtin::Object(_)) => {
                let element: FieldDeclaration =
                    serde_json::from_value(raw.clone()).map_err(|e| {
                        ModelError::misuse(format!(
                            "element of field '{}' is not a valid field declaration: {}",
                            path, e
                        ))
                    })?;
                element.to_field(&format!("{}[]", path), lookup)
            }
            Some(Builtin::String(s)) if is_field_type(s) => Err(ModelError::misuse(format!(
                "element of field '{}' must be a field instance, not the field type '{}'",
                path, s
            ))),
            Some(other) => Err(ModelError::misuse(format!(
                "element of field '{}' must be a field instance, got {}",
                path,
                builtin_type_name(other)
            ))),
            None => Err(ModelError::misuse(format!(
                "list field '{}' does not declare an element",
                path
            ))),
        }
    }

    fn nested_model<F>(&self, path: &str, lookup: &F) -> ModelResult<ModelType>
    where
        F: Fn(&str) -> Option<ModelType>,
    {
        match &self.model {
            Some(Builtin::String(s)) if is_field_type(s) => Err(ModelError::misuse(format!(
                "field '{}' must nest a model type, not the field type '{}'",
                path, s
            ))),
            Some(Builtin::String(s)) => lookup(s).ok_or_else(|| {
                ModelError::misuse(format!("field '{}' nests unknown model '{}'", path, s))
            }),
            Some(Builtin::Object(_)) => Err(ModelError::misuse(format!(
                "field '{}' must nest a model type, not an instance",
                path
            ))),
            Some(other) => Err(ModelError::misuse(format!(
                "field '{}' must nest a model type, got {}",
                path,
                builtin_type_name(other)
            ))),
            None => Err(ModelError::misuse(format!(
                "nested field '{}' does not declare a model",
                path
            ))),
        }
    }

    fn collect_dependencies(&self, deps: &mut Vec<String>) {
        match self.field_type.as_str() {
            "nested" => {
                if let Some(Builtin::String(s)) = &self.model {
                    deps.push(s.clone());
                }
            }
            "list" => {
                if let Some(raw @ Builtin::Object(_)) = &self.element {
                    if let Ok(element) = serde_json::from_value::<FieldDeclaration>(raw.clone()) {
                        element.collect_dependencies(deps);
                    }
                }
            }
            _ => {}
        }
    }
}

fn is_field_type(name: &str) -> bool {
    name == ABSTRACT_FIELD || FIELD_TYPES.contains(&name)
}
