//! Schema engine for modelwire
//!
//! Model types are declared once, checked at declaration time, and then
//! shared read-only. Values cross the builtin/model boundary only through
//! `create` and `dump`, which validate everything they convert.
//!
//! # Design Principles
//!
//! - Declaration errors (misuse) are separate from data errors (violation)
//! - Missing and null are distinct states
//! - Defaults obey the same constraints as supplied values
//! - Assignment is cheap and unchecked, serialization is strict
//! - First failure wins, no aggregated reports

mod convert;
mod declaration;
mod errors;
mod loader;
mod model;
mod types;
mod validator;
mod value;

pub use convert::AttributeSource;
pub use declaration::{FieldDeclaration, ModelDeclaration, FIELD_TYPES};
pub use errors::{ErrorKind, LoaderError, LoaderResult, ModelError, ModelResult};
pub use loader::SchemaLoader;
pub use model::{Channel, DeclaredField, Model, ModelType, ModelTypeBuilder};
pub use types::{Field, FieldKind};
pub use value::{Builtin, BuiltinMap, Slot, Value};
