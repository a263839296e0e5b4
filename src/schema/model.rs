//! Model types and instances
//!
//! A [`ModelType`] is the immutable, shared descriptor produced once at
//! declaration time. A [`Model`] is one record of that type holding one slot per
//! declared field, in declaration order.
//!
//! Assignment through [`Model::set`] is not validated. Values are checked at
//! `create` (builtin to model), `dump` (model to builtin) and on request with
//! [`Model::validate`].

use std::collections::HashSet;
use std::fmt;
use std::sync::Arc;

use super::convert::{AttributeSource, MISSING};
use super::errors::{ModelError, ModelResult};
use super::types::Field;
use super::value::{BuiltinMap, Slot};
use crate::observability::{Event, Logger};

/// Opaque association between a model type and a routing channel.
///
/// Stored and exposed, never interpreted.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Channel(String);

impl Channel {
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    pub fn name(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Channel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A field bound to its name within a model type
#[derive(Debug, Clone, PartialEq)]
pub struct DeclaredField {
    name: String,
    field: Field,
}

impl DeclaredField {
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn field(&self) -> &Field {
        &self.field
    }
}

#[derive(Debug)]
struct Schema {
    name: String,
    channel: Channel,
    fields: Vec<DeclaredField>,
}

/// Shared handle to a declared model type.
///
/// Cloning is cheap. Two handles are equal only when they come from the same
/// declaration.
#[derive(Clone)]
pub struct ModelType {
    schema: Arc<Schema>,
}

impl ModelType {
    /// Starts declaring a model type.
    pub fn builder(name: impl Into<String>, channel: Channel) -> ModelTypeBuilder {
        ModelTypeBuilder {
            name: name.into(),
            channel,
            fields: Vec::new(),
        }
    }

    pub fn name(&self) -> &str {
        &self.schema.name
    }

    pub fn channel(&self) -> &Channel {
        &self.schema.channel
    }

    /// Declared fields in declaration order
    pub fn fields(&self) -> &[DeclaredField] {
        &self.schema.fields
    }

    pub fn field(&self, name: &str) -> Option<&Field> {
        self.position(name).map(|idx| &self.schema.fields[idx].field)
    }

    fn position(&self, name: &str) -> Option<usize> {
        self.schema.fields.iter().position(|f| f.name == name)
    }

    /// Creates an instance with every field at its default (or Missing).
    ///
    /// Nothing is validated.
    pub fn instance(&self) -> Model {
        Model {
            model_type: self.clone(),
            values: self
                .schema
                .fields
                .iter()
                .map(|f| f.field.default_value())
                .collect(),
        }
    }

    /// Creates a validated instance from a builtin mapping.
    ///
    /// Unknown keys are ignored, absent keys are treated as Missing. The first
    /// violation aborts creation.
    pub fn create(&self, source: &BuiltinMap) -> ModelResult<Model> {
        self.create_nested(source).map_err(|e| {
            Logger::trace(
                Event::CreateRejected.as_str(),
                &[("model", self.name()), ("reason", e.to_string().as_str())],
            );
            e
        })
    }

    /// `create` without the rejection event; the outermost caller logs.
    pub(crate) fn create_nested(&self, source: &BuiltinMap) -> ModelResult<Model> {
        let values = self
            .schema
            .fields
            .iter()
            .map(|f| f.field.to_model(source, &f.name))
            .collect::<ModelResult<Vec<_>>>()?;

        Ok(Model {
            model_type: self.clone(),
            values,
        })
    }
}

impl PartialEq for ModelType {
    fn eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.schema, &other.schema)
    }
}

impl fmt::Debug for ModelType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ModelType")
            .field("name", &self.schema.name)
            .field("channel", &self.schema.channel)
            .finish_non_exhaustive()
    }
}

/// Collects field declarations for a model type.
#[derive(Debug)]
pub struct ModelTypeBuilder {
    name: String,
    channel: Channel,
    fields: Vec<DeclaredField>,
}

impl ModelTypeBuilder {
    /// Declares the next field. Order of calls is the field order.
    pub fn field(mut self, name: impl Into<String>, field: Field) -> Self {
        self.fields.push(DeclaredField {
            name: name.into(),
            field,
        });
        self
    }

    /// Fixes the schema, binding field names and running the misuse checks.
    pub fn build(self) -> ModelResult<ModelType> {
        self.check().map_err(|e| {
            Logger::warn(
                Event::DeclarationRejected.as_str(),
                &[("model", self.name.as_str()), ("reason", e.to_string().as_str())],
            );
            e
        })?;

        let field_count = self.fields.len().to_string();
        Logger::trace(
            Event::ModelDeclared.as_str(),
            &[
                ("channel", self.channel.name()),
                ("fields", field_count.as_str()),
                ("model", self.name.as_str()),
            ],
        );

        Ok(ModelType {
            schema: Arc::new(Schema {
                name: self.name,
                channel: self.channel,
                fields: self.fields,
            }),
        })
    }

    fn check(&self) -> ModelResult<()> {
        if self.name.is_empty() {
            return Err(ModelError::misuse("model name must not be empty"));
        }

        let mut seen = HashSet::new();
        for declared in &self.fields {
            if declared.name.is_empty() {
                return Err(ModelError::misuse(format!(
                    "model '{}' declares a field without a name",
                    self.name
                )));
            }
            if !seen.insert(declared.name.as_str()) {
                return Err(ModelError::misuse(format!(
                    "model '{}' declares field '{}' more than once",
                    self.name, declared.name
                )));
            }
            declared.field.check_declaration(&declared.name)?;
        }
        Ok(())
    }
}

/// One record of a model type
#[derive(Clone)]
pub struct Model {
    model_type: ModelType,
    values: Vec<Slot>,
}

impl Model {
    pub fn model_type(&self) -> &ModelType {
        &self.model_type
    }

    /// Current slot of a declared field, `None` for undeclared names.
    pub fn get(&self, name: &str) -> Option<&Slot> {
        self.model_type.position(name).map(|idx| &self.values[idx])
    }

    /// Assigns a field without validating the value.
    pub fn set(&mut self, name: &str, value: impl Into<Slot>) -> ModelResult<()> {
        let idx = self.model_type.position(name).ok_or_else(|| {
            ModelError::misuse(format!(
                "model '{}' has no field '{}'",
                self.model_type.name(),
                name
            ))
        })?;
        self.values[idx] = value.into();
        Ok(())
    }

    /// Chained form of [`Model::set`].
    pub fn with(mut self, name: &str, value: impl Into<Slot>) -> ModelResult<Self> {
        self.set(name, value)?;
        Ok(self)
    }

    /// Declared fields paired with their current slots
    pub fn iter(&self) -> impl Iterator<Item = (&str, &Slot)> {
        self.model_type
            .fields()
            .iter()
            .zip(&self.values)
            .map(|(f, slot)| (f.name(), slot))
    }

    /// Serializes every declared field into an ordered builtin mapping.
    pub fn dump(&self) -> ModelResult<BuiltinMap> {
        self.dump_nested().map_err(|e| {
            Logger::trace(
                Event::DumpRejected.as_str(),
                &[("model", self.model_type.name()), ("reason", e.to_string().as_str())],
            );
            e
        })
    }

    /// `dump` without the rejection event; the outermost caller logs.
    pub(crate) fn dump_nested(&self) -> ModelResult<BuiltinMap> {
        let mut target = BuiltinMap::new();
        for declared in self.model_type.fields() {
            declared.field().to_builtin(self, declared.name(), &mut target)?;
        }
        Ok(target)
    }

    /// Checks every field in model representation without serializing.
    pub fn validate(&self) -> ModelResult<()> {
        for (declared, slot) in self.model_type.fields().iter().zip(&self.values) {
            let field = declared.field();
            match slot {
                Slot::Missing if field.is_required() => {
                    return Err(ModelError::missing_required(declared.name()))
                }
                Slot::Missing => {}
                Slot::Null => field.validate_model_value(None, declared.name())?,
                Slot::Present(value) => field.validate_model_value(Some(value), declared.name())?,
            }
        }
        Ok(())
    }
}

impl AttributeSource for Model {
    fn attribute(&self, name: &str) -> &Slot {
        self.get(name).unwrap_or(&MISSING)
    }
}

impl PartialEq for Model {
    fn eq(&self, other: &Self) -> bool {
        self.model_type == other.model_type && self.values == other.values
    }
}

impl fmt::Debug for Model {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut s = f.debug_struct(self.model_type.name());
        for (name, slot) in self.iter() {
            s.field(name, slot);
        }
        s.finish()
    }
}
