//! Field type definitions
//!
//! Supported variants:
//! - string: UTF-8 string
//! - integer: 64-bit signed integer
//! - float: 64-bit floating point
//! - number: integer or floating point
//! - boolean: Boolean
//! - datetime: UTC timestamp, ISO-8601 on the wire
//! - list: homogeneous sequence of an element field
//! - nested: embedded model

use super::errors::{ModelError, ModelResult};
use super::model::ModelType;
use super::value::{Slot, Value};

/// Field variants
#[derive(Debug, Clone, PartialEq)]
pub enum FieldKind {
    String,
    Integer,
    Float,
    /// Integer or floating point
    Number,
    Boolean,
    DateTime,
    /// Homogeneous sequence (boxed to allow recursive element fields)
    List(Box<Field>),
    /// Embedded model of the given type
    Nested(ModelType),
}

impl FieldKind {
    /// Returns the type name for error messages
    pub fn type_name(&self) -> &'static str {
        match self {
            FieldKind::String => "string",
            FieldKind::Integer => "integer",
            FieldKind::Float => "float",
            FieldKind::Number => "number",
            FieldKind::Boolean => "boolean",
            FieldKind::DateTime => "datetime",
            FieldKind::List(_) => "list",
            FieldKind::Nested(_) => "nested",
        }
    }
}

/// A typed, constrained schema slot.
///
/// Built with the variant constructors and refined with the chained
/// configuration methods:
///
/// ```ignore
/// let tags = Field::list(Field::string()).required().minimum(1);
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct Field {
    kind: FieldKind,
    required: bool,
    allow_null: bool,
    default: Slot,
    minimum: Option<usize>,
    maximum: Option<usize>,
}

impl Field {
    fn of(kind: FieldKind) -> Self {
        Self {
            kind,
            required: false,
            allow_null: false,
            default: Slot::Missing,
            minimum: None,
            maximum: None,
        }
    }

    pub fn string() -> Self {
        Self::of(FieldKind::String)
    }

    pub fn integer() -> Self {
        Self::of(FieldKind::Integer)
    }

    pub fn float() -> Self {
        Self::of(FieldKind::Float)
    }

    pub fn number() -> Self {
        Self::of(FieldKind::Number)
    }

    pub fn boolean() -> Self {
        Self::of(FieldKind::Boolean)
    }

    pub fn datetime() -> Self {
        Self::of(FieldKind::DateTime)
    }

    /// List of `element` values
    pub fn list(element: Field) -> Self {
        Self::of(FieldKind::List(Box::new(element)))
    }

    /// Embedded instance of `model_type`
    pub fn nested(model_type: &ModelType) -> Self {
        Self::of(FieldKind::Nested(model_type.clone()))
    }

    /// Marks the field as mandatory
    pub fn required(mut self) -> Self {
        self.required = true;
        self
    }

    /// Permits explicit null values
    pub fn allow_null(mut self) -> Self {
        self.allow_null = true;
        self
    }

    /// Value used when none is supplied
    pub fn default(mut self, value: impl Into<Value>) -> Self {
        self.default = Slot::Present(value.into());
        self
    }

    /// Uses null as the default value
    pub fn default_null(mut self) -> Self {
        self.default = Slot::Null;
        self
    }

    /// Minimal number of list elements (inclusive)
    pub fn minimum(mut self, minimum: usize) -> Self {
        self.minimum = Some(minimum);
        self
    }

    /// Maximal number of list elements (inclusive)
    pub fn maximum(mut self, maximum: usize) -> Self {
        self.maximum = Some(maximum);
        self
    }

    pub fn kind(&self) -> &FieldKind {
        &self.kind
    }

    pub fn is_required(&self) -> bool {
        self.required
    }

    pub fn allows_null(&self) -> bool {
        self.allow_null
    }

    /// The declared default; a required list without one defaults to `[]`.
    pub fn default_value(&self) -> Slot {
        match (&self.default, &self.kind) {
            (Slot::Missing, FieldKind::List(_)) if self.required => {
                Slot::Present(Value::List(Vec::new()))
            }
            (default, _) => default.clone(),
        }
    }

    pub fn bounds(&self) -> (Option<usize>, Option<usize>) {
        (self.minimum, self.maximum)
    }

    /// Element field, for lists
    pub fn element(&self) -> Option<&Field> {
        match &self.kind {
            FieldKind::List(element) => Some(element),
            _ => None,
        }
    }

    /// Embedded model type, for nested fields
    pub fn model_type(&self) -> Option<&ModelType> {
        match &self.kind {
            FieldKind::Nested(model_type) => Some(model_type),
            _ => None,
        }
    }

    /// Declaration-time checks, run once when the owning model type is built.
    pub(crate) fn check_declaration(&self, name: &str) -> ModelResult<()> {
        match &self.kind {
            FieldKind::List(element) => {
                if let (Some(min), Some(max)) = (self.minimum, self.maximum) {
                    if min > max {
                        return Err(ModelError::misuse(format!(
                            "field '{}' has minimum {} greater than maximum {}",
                            name, min, max
                        )));
                    }
                }
                element.check_declaration(&format!("{}[]", name))?;
            }
            other => {
                if self.minimum.is_some() || self.maximum.is_some() {
                    return Err(ModelError::misuse(format!(
                        "field '{}' of type {} does not accept element bounds",
                        name,
                        other.type_name()
                    )));
                }
            }
        }

        // only an explicit default; the implied `[]` of a required list is checked per instance
        let checked = match &self.default {
            Slot::Missing => Ok(()),
            Slot::Null => self.validate_model_value(None, name),
            Slot::Present(value) => self.validate_model_value(Some(value), name),
        };
        checked.map_err(|e| {
            ModelError::misuse(format!(
                "default for field '{}' is invalid: {}",
                name,
                e.message()
            ))
        })
    }
}
