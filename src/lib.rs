//! modelwire - declarative model schemas with strict validation
//!
//! Model types are declared from typed fields. Instances convert between a
//! rich in-memory form and a JSON-safe builtin form, and only conforming data
//! crosses that boundary.

pub mod observability;
pub mod schema;

pub use schema::{
    Builtin, BuiltinMap, Channel, Field, FieldKind, Model, ModelError, ModelResult, ModelType,
    Slot, Value,
};
