//! Generation pipeline
//!
//! The three AI-driven steps (intent, ER diagram, infrastructure code) plus
//! the envelope parsing, prompt templates and file writing they share.

pub mod backend;
pub mod envelope;
pub mod files;
pub mod infra;
pub mod intent;
pub mod prompts;
pub mod schema;

// Re-exports
pub use backend::{Backend, ModuleStyle};
pub use envelope::{Envelope, InfraContext, IntentContext, SchemaContext};
pub use infra::{InfraGenerator, InfraOutput};
pub use intent::IntentExtractor;
pub use schema::{DiagramSummary, ErDiagram, SchemaGenerator};

/// State of one CLI run
///
/// Lives in memory only; the diagram and generated files are the only things
/// written to disk.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SessionContext {
    /// Backend description produced by the intent step
    pub app_description: String,
    /// Latest saved ER diagram
    pub mermaid_diagram: String,
    /// Backend picked by the user, fixed once set
    pub chosen_backend: Option<Backend>,
}

impl SessionContext {
    /// Start a session from the first description and diagram
    pub fn new(app_description: impl Into<String>, mermaid_diagram: impl Into<String>) -> Self {
        Self {
            app_description: app_description.into(),
            mermaid_diagram: mermaid_diagram.into(),
            chosen_backend: None,
        }
    }

    /// Record the backend; a second choice is ignored
    pub fn choose_backend(&mut self, backend: Backend) -> Backend {
        *self.chosen_backend.get_or_insert(backend)
    }
}


#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_backend_is_fixed_once_chosen() {
        let mut session = SessionContext::new("A blog", "erDiagram");
        assert_eq!(session.chosen_backend, None);

        assert_eq!(session.choose_backend(Backend::DocumentStore), Backend::DocumentStore);
        assert_eq!(session.choose_backend(Backend::RelationalOrm), Backend::DocumentStore);
        assert_eq!(session.chosen_backend, Some(Backend::DocumentStore));
    }
}
