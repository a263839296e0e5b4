//! Conversion between builtin and model representation
//!
//! Every conversion validates its input first, so a converted value always
//! satisfies the field it was converted for.

use std::collections::{BTreeMap, HashMap};

use chrono::{DateTime, NaiveDateTime, SecondsFormat, Utc};

use super::errors::{ModelError, ModelResult};
use super::types::{Field, FieldKind};
use super::validator::item_path;
use super::value::{Builtin, BuiltinMap, Slot, Value};

pub(crate) static MISSING: Slot = Slot::Missing;

/// Anything a field can read its named attribute from during `to_builtin`.
///
/// Absent attributes read as `Slot::Missing`.
pub trait AttributeSource {
    fn attribute(&self, name: &str) -> &Slot;
}

impl AttributeSource for HashMap<String, Slot> {
    fn attribute(&self, name: &str) -> &Slot {
        self.get(name).unwrap_or(&MISSING)
    }
}

impl AttributeSource for BTreeMap<String, Slot> {
    fn attribute(&self, name: &str) -> &Slot {
        self.get(name).unwrap_or(&MISSING)
    }
}

impl Field {
    /// Converts a builtin value into model representation. Null yields `None`.
    pub fn convert_to_model(&self, value: &Builtin, name: &str) -> ModelResult<Option<Value>> {
        self.validate_builtin_value(value, name)?;

        let converted = match (self.kind(), value) {
            (_, Builtin::Null) => return Ok(None),
            (FieldKind::String, Builtin::String(s)) => Value::String(s.clone()),
            (FieldKind::DateTime, Builtin::String(s)) => Value::DateTime(parse_datetime(s, name)?),
            (FieldKind::Boolean, Builtin::Bool(b)) => Value::Boolean(*b),
            (FieldKind::Integer | FieldKind::Number, Builtin::Number(n)) if n.is_i64() => {
                Value::Integer(n.as_i64().unwrap_or_default())
            }
            (FieldKind::Float | FieldKind::Number, Builtin::Number(n)) => {
                let f = n.as_f64().ok_or_else(|| {
                    ModelError::violation(name, format!("number {} is not representable", n))
                })?;
                Value::Float(f)
            }
            (FieldKind::List(element), Builtin::Array(items)) => Value::List(
                items
                    .iter()
                    .enumerate()
                    .map(|(idx, item)| element.convert_to_model(item, &item_path(name, idx)))
                    .collect::<ModelResult<Vec<_>>>()?,
            ),
            (FieldKind::Nested(model_type), Builtin::Object(map)) => {
                let model = model_type.create_nested(map).map_err(|e| e.nested_under(name))?;
                Value::Model(model)
            }
            (kind, _) => {
                return Err(ModelError::violation(
                    name,
                    format!("cannot convert to {}", kind.type_name()),
                ))
            }
        };

        Ok(Some(converted))
    }

    /// Converts a model value into builtin representation. `None` is null.
    pub fn convert_from_model(&self, value: Option<&Value>, name: &str) -> ModelResult<Builtin> {
        self.validate_model_value(value, name)?;

        let Some(value) = value else {
            return Ok(Builtin::Null);
        };

        let converted = match value {
            Value::String(s) => Builtin::String(s.clone()),
            Value::Integer(i) => Builtin::from(*i),
            Value::Float(f) => serde_json::Number::from_f64(*f)
                .map(Builtin::Number)
                .ok_or_else(|| {
                    ModelError::violation(name, format!("{} is not a finite number", f))
                })?,
            Value::Boolean(b) => Builtin::Bool(*b),
            Value::DateTime(dt) => Builtin::String(format_datetime(dt)),
            Value::List(items) => {
                // validated above, so the field is a list
                let element = self.element().ok_or_else(|| {
                    ModelError::type_mismatch(name, self.kind().type_name(), "list")
                })?;
                Builtin::Array(
                    items
                        .iter()
                        .enumerate()
                        .map(|(idx, item)| {
                            element.convert_from_model(item.as_ref(), &item_path(name, idx))
                        })
                        .collect::<ModelResult<Vec<_>>>()?,
                )
            }
            Value::Model(model) => {
                Builtin::Object(model.dump_nested().map_err(|e| e.nested_under(name))?)
            }
        };

        Ok(converted)
    }

    /// Writes attribute `name` of `source` into `target` in builtin form.
    ///
    /// Missing values are omitted unless the field is required; null values
    /// are written only when the field allows null.
    pub fn to_builtin<S>(&self, source: &S, name: &str, target: &mut BuiltinMap) -> ModelResult<()>
    where
        S: AttributeSource + ?Sized,
    {
        match source.attribute(name) {
            Slot::Missing => {
                if self.is_required() {
                    return Err(ModelError::missing_required(name));
                }
            }
            Slot::Null => {
                let converted = self.convert_from_model(None, name)?;
                target.insert(name.to_string(), converted);
            }
            Slot::Present(value) => {
                let converted = self.convert_from_model(Some(value), name)?;
                target.insert(name.to_string(), converted);
            }
        }
        Ok(())
    }

    /// Resolves key `name` of a builtin mapping into a model slot.
    ///
    /// Order: default substitution for absent keys, then the required check,
    /// then validation and conversion of supplied values.
    pub fn to_model(&self, source: &BuiltinMap, name: &str) -> ModelResult<Slot> {
        let Some(value) = source.get(name) else {
            let default = self.default_value();
            match &default {
                Slot::Missing if self.is_required() => {
                    return Err(ModelError::missing_required(name))
                }
                Slot::Missing => {}
                Slot::Null => self.validate_model_value(None, name)?,
                Slot::Present(v) => self.validate_model_value(Some(v), name)?,
            }
            return Ok(default);
        };

        Ok(self.convert_to_model(value, name)?.into())
    }
}

/// Formats a timestamp as RFC 3339 UTC with a trailing `Z`.
pub(crate) fn format_datetime(dt: &DateTime<Utc>) -> String {
    dt.to_rfc3339_opts(SecondsFormat::AutoSi, true)
}

/// Parses an ISO-8601 timestamp.
///
/// Strings with an offset are normalized to UTC; strings without one (with or
/// without a trailing `Z`) are taken as UTC.
pub(crate) fn parse_datetime(value: &str, name: &str) -> ModelResult<DateTime<Utc>> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(value) {
        return Ok(dt.with_timezone(&Utc));
    }

    let naive = value.strip_suffix('Z').unwrap_or(value);
    NaiveDateTime::parse_from_str(naive, "%Y-%m-%dT%H:%M:%S%.f")
        .map(|dt| dt.and_utc())
        .map_err(|_| {
            ModelError::violation(name, format!("invalid date time value: '{}'", value))
        })
}
