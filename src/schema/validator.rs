//! Field validation
//!
//! Validation semantics:
//! - null is accepted only when the field allows it
//! - types match exactly (no coercion between string and number etc.)
//! - list lengths respect the inclusive bounds, then every item is checked
//! - the first violation aborts validation
//!
//! Validation never mutates the value.

use super::errors::{ModelError, ModelResult};
use super::types::{Field, FieldKind};
use super::value::{builtin_type_name, Builtin, Value};

impl Field {
    /// Validates a value in model representation. `None` is null.
    pub fn validate_model_value(&self, value: Option<&Value>, name: &str) -> ModelResult<()> {
        let Some(value) = value else {
            return self.check_null(name);
        };

        match (self.kind(), value) {
            (FieldKind::String, Value::String(_))
            | (FieldKind::Integer, Value::Integer(_))
            | (FieldKind::Float, Value::Float(_))
            | (FieldKind::Number, Value::Integer(_) | Value::Float(_))
            | (FieldKind::Boolean, Value::Boolean(_))
            | (FieldKind::DateTime, Value::DateTime(_)) => Ok(()),
            (FieldKind::List(element), Value::List(items)) => {
                self.check_count(items.len(), name)?;
                for (idx, item) in items.iter().enumerate() {
                    element.validate_model_value(item.as_ref(), &item_path(name, idx))?;
                }
                Ok(())
            }
            (FieldKind::Nested(model_type), Value::Model(model)) => {
                if model.model_type() == model_type {
                    Ok(())
                } else {
                    Err(ModelError::type_mismatch(
                        name,
                        &format!("instance of {}", model_type.name()),
                        &format!("instance of {}", model.model_type().name()),
                    ))
                }
            }
            (kind, value) => Err(ModelError::type_mismatch(
                name,
                kind.type_name(),
                value.type_name(),
            )),
        }
    }

    /// Validates a value in builtin representation.
    pub fn validate_builtin_value(&self, value: &Builtin, name: &str) -> ModelResult<()> {
        if value.is_null() {
            return self.check_null(name);
        }

        let matches = match self.kind() {
            FieldKind::String | FieldKind::DateTime => value.is_string(),
            FieldKind::Integer => value.is_i64(),
            FieldKind::Float => value.is_f64(),
            FieldKind::Number => value.is_number(),
            FieldKind::Boolean => value.is_boolean(),
            FieldKind::Nested(_) => value.is_object(),
            FieldKind::List(element) => {
                let Some(items) = value.as_array() else {
                    return Err(self.builtin_mismatch(name, value));
                };
                self.check_count(items.len(), name)?;
                for (idx, item) in items.iter().enumerate() {
                    element.validate_builtin_value(item, &item_path(name, idx))?;
                }
                true
            }
        };

        if matches {
            Ok(())
        } else {
            Err(self.builtin_mismatch(name, value))
        }
    }

    fn check_null(&self, name: &str) -> ModelResult<()> {
        if self.allows_null() {
            Ok(())
        } else {
            Err(ModelError::null_value(name))
        }
    }

    fn check_count(&self, count: usize, name: &str) -> ModelResult<()> {
        let (minimum, maximum) = self.bounds();
        let too_few = minimum.is_some_and(|min| count < min);
        let too_many = maximum.is_some_and(|max| count > max);
        if too_few || too_many {
            return Err(ModelError::count_out_of_bounds(name, minimum, maximum, count));
        }
        Ok(())
    }

    fn builtin_mismatch(&self, name: &str, value: &Builtin) -> ModelError {
        let expected = match self.kind() {
            FieldKind::DateTime => "datetime string",
            FieldKind::Nested(_) => "mapping",
            kind => kind.type_name(),
        };
        ModelError::type_mismatch(name, expected, builtin_type_name(value))
    }
}

/// Creates the error path of a list item.
pub(crate) fn item_path(name: &str, idx: usize) -> String {
    format!("{}[{}]", name, idx)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use serde_json::json;

    #[test]
    fn test_string_rejects_integer() {
        let field = Field::string();
        assert!(field.validate_model_value(Some(&Value::Integer(1)), "test_value").is_err());
        assert!(field.validate_builtin_value(&json!(1), "test_value").is_err());
    }

    #[test]
    fn test_null_handling_ignores_required() {
        for field in [Field::string().required(), Field::string()] {
            let err = field.validate_model_value(None, "test-value").unwrap_err();
            assert!(err.is_violation());
            assert!(field.validate_builtin_value(&json!(null), "test-value").is_err());
        }

        for field in [Field::string().required().allow_null(), Field::string().allow_null()] {
            assert!(field.validate_model_value(None, "test-value").is_ok());
            assert!(field.validate_builtin_value(&json!(null), "test-value").is_ok());
        }
    }

    #[test]
    fn test_float_is_strict_number_is_union() {
        assert!(Field::float().validate_model_value(Some(&Value::Integer(2)), "f").is_err());
        assert!(Field::float().validate_builtin_value(&json!(2), "f").is_err());
        assert!(Field::float().validate_builtin_value(&json!(2.5), "f").is_ok());

        let number = Field::number();
        assert!(number.validate_model_value(Some(&Value::Integer(2)), "n").is_ok());
        assert!(number.validate_model_value(Some(&Value::Float(2.5)), "n").is_ok());
        assert!(number.validate_builtin_value(&json!(2), "n").is_ok());
        assert!(number.validate_builtin_value(&json!(2.5), "n").is_ok());
        assert!(number.validate_builtin_value(&json!("2"), "n").is_err());
    }

    #[test]
    fn test_integer_rejects_float_and_oversized() {
        let field = Field::integer();
        assert!(field.validate_builtin_value(&json!(1.0), "i").is_err());
        assert!(field.validate_builtin_value(&json!(u64::MAX), "i").is_err());
        assert!(field.validate_builtin_value(&json!(-7), "i").is_ok());
    }

    #[test]
    fn test_datetime_representations() {
        let field = Field::datetime();
        assert!(field.validate_model_value(Some(&Value::DateTime(Utc::now())), "d").is_ok());
        assert!(field.validate_model_value(Some(&Value::from("2020-01-01T00:00:00Z")), "d").is_err());
        assert!(field.validate_builtin_value(&json!("2020-01-01T00:00:00Z"), "d").is_ok());
        assert!(field.validate_builtin_value(&json!(12), "d").is_err());
    }

    #[test]
    fn test_list_bounds() {
        let field = Field::list(Field::integer()).minimum(1);
        assert!(field.validate_builtin_value(&json!([]), "test-value").is_err());
        assert!(field.validate_model_value(Some(&Value::List(vec![])), "test-value").is_err());
        assert!(field.validate_builtin_value(&json!([1]), "test-value").is_ok());
        assert!(field.validate_builtin_value(&json!([1, 2]), "test-value").is_ok());
        assert!(field.validate_model_value(Some(&Value::list([1])), "test-value").is_ok());
        assert!(field.validate_model_value(Some(&Value::list([1, 2])), "test-value").is_ok());

        let field = Field::list(Field::integer()).minimum(1).maximum(1);
        assert!(field.validate_builtin_value(&json!([1, 2]), "test-value").is_err());
        assert!(field.validate_model_value(Some(&Value::list([1, 2])), "test-value").is_err());

        let field = Field::list(Field::integer()).maximum(3);
        assert!(field.validate_builtin_value(&json!([1, 2, 3, 4]), "test-value").is_err());
        assert!(field.validate_builtin_value(&json!([1, 2, 3]), "test-value").is_ok());
    }

    #[test]
    fn test_list_item_error_path() {
        let field = Field::list(Field::string());
        let err = field
            .validate_builtin_value(&json!(["rust", 123, "db"]), "tags")
            .unwrap_err();
        assert_eq!(err.field(), Some("tags[1]"));

        let err = field
            .validate_model_value(Some(&Value::List(vec![Some("a".into()), None])), "tags")
            .unwrap_err();
        assert_eq!(err.field(), Some("tags[1]"));
    }

    #[test]
    fn test_list_rejects_non_sequence() {
        let field = Field::list(Field::string()).required();
        assert!(field.validate_builtin_value(&json!("something"), "test-value").is_err());
        assert!(field.validate_model_value(Some(&Value::from("str")), "test-value").is_err());
    }

    #[test]
    fn test_list_allows_null_items_when_element_does() {
        let field = Field::list(Field::integer().allow_null());
        assert!(field.validate_builtin_value(&json!([1, null, 3]), "xs").is_ok());
        assert!(field
            .validate_model_value(Some(&Value::List(vec![Some(1.into()), None])), "xs")
            .is_ok());
    }
}
