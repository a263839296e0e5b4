//! Observable events
//!
//! Events are explicit and typed.

use std::fmt;

/// Observable events in modelwire
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Event {
    /// Model type declared and checked
    ModelDeclared,
    /// Model declaration rejected as misuse
    DeclarationRejected,
    /// Declaration documents loaded from disk
    SchemasLoaded,
    /// Loading declaration documents failed
    SchemasLoadFailed,
    /// `create` rejected its input
    CreateRejected,
    /// `dump` rejected an instance
    DumpRejected,
}

impl Event {
    /// Returns the string representation of the event
    pub fn as_str(&self) -> &'static str {
        match self {
            Event::ModelDeclared => "MODEL_DECLARED",
            Event::DeclarationRejected => "DECLARATION_REJECTED",
            Event::SchemasLoaded => "SCHEMAS_LOADED",
            Event::SchemasLoadFailed => "SCHEMAS_LOAD_FAILED",
            Event::CreateRejected => "CREATE_REJECTED",
            Event::DumpRejected => "DUMP_REJECTED",
        }
    }
}

impl fmt::Display for Event {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_event_names() {
        assert_eq!(Event::ModelDeclared.as_str(), "MODEL_DECLARED");
        assert_eq!(Event::DeclarationRejected.to_string(), "DECLARATION_REJECTED");
        assert_eq!(Event::SchemasLoaded.as_str(), "SCHEMAS_LOADED");
        assert_eq!(Event::SchemasLoadFailed.as_str(), "SCHEMAS_LOAD_FAILED");
        assert_eq!(Event::CreateRejected.as_str(), "CREATE_REJECTED");
        assert_eq!(Event::DumpRejected.as_str(), "DUMP_REJECTED");
    }
}
