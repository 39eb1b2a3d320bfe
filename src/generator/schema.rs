//! ER diagram generation
//!
//! Asks the model for a Mermaid `erDiagram` and saves it to
//! `src/schemas/mermaid.mmd`.

use crate::error::{DbForgeError, Result};
use crate::generator::envelope::{parse_envelope, SchemaContext};
use crate::generator::files::write_text_file;
use crate::generator::prompts;
use crate::llm::LLMProvider;
use std::path::{Path, PathBuf};

/// A diagram that was generated and saved
#[derive(Debug, Clone, PartialEq)]
pub struct ErDiagram {
    /// Diagram text as written, without the trailing newline
    pub text: String,
    /// Where it was saved
    pub path: PathBuf,
}

impl ErDiagram {
    /// Entity and relationship counts
    pub fn summary(&self) -> DiagramSummary {
        DiagramSummary::of(&self.text)
    }
}

/// Rough shape of a Mermaid ER diagram
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DiagramSummary {
    /// Names of entity blocks, in order
    pub entities: Vec<String>,
    /// Number of relationship lines
    pub relationships: usize,
}

impl DiagramSummary {
    /// Scan diagram text for `Name {` blocks and `A ||--o{ B : label` lines
    pub fn of(diagram: &str) -> Self {
        let mut summary = DiagramSummary::default();
        let mut in_block = false;

        for line in diagram.lines().map(str::trim) {
            if in_block {
                if line.starts_with('}') {
                    in_block = false;
                }
                continue;
            }

            if let Some(name) = line.strip_suffix('{') {
                let name = name.trim();
                if !name.is_empty() && !name.contains(char::is_whitespace) {
                    summary.entities.push(name.to_string());
                    in_block = true;
                    continue;
                }
            }

            if line.contains("--") || line.contains("..") {
                summary.relationships += 1;
            }
        }

        summary
    }
}

/// Generates and persists the ER diagram
pub struct SchemaGenerator<'a> {
    client: &'a dyn LLMProvider,
    diagram_path: PathBuf,
}

impl<'a> SchemaGenerator<'a> {
    /// Create a generator that saves to `diagram_path`
    pub fn new(client: &'a dyn LLMProvider, diagram_path: impl Into<PathBuf>) -> Self {
        Self {
            client,
            diagram_path: diagram_path.into(),
        }
    }

    /// Path the diagram is written to
    pub fn diagram_path(&self) -> &Path {
        &self.diagram_path
    }

    /// Generate a diagram for `app_description` and save it
    ///
    /// When the reply has no `mermaid` field nothing is written and
    /// [`DbForgeError::MissingField`] is returned.
    pub async fn generate(&self, app_description: &str) -> Result<ErDiagram> {
        let prompt = prompts::schema_prompt(app_description);
        let reply = self.client.complete(&prompt).await?;

        let envelope = parse_envelope::<SchemaContext>(&reply)?;
        let mermaid = envelope
            .context
            .mermaid
            .as_deref()
            .map(str::trim)
            .filter(|m| !m.is_empty())
            .ok_or_else(|| DbForgeError::missing_field("schema generation", "mermaid"))?;

        write_text_file(&self.diagram_path, mermaid)?;
        tracing::info!(path = %self.diagram_path.display(), "saved ER diagram");

        Ok(ErDiagram {
            text: mermaid.to_string(),
            path: self.diagram_path.clone(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::generator::test_support::ScriptedProvider;

    const DIAGRAM: &str = "erDiagram\n  User {\n    int id PK\n    varchar(100) name\n  }\n  Post {\n    int id PK\n    int userId FK\n  }\n  User ||--o{ Post : writes";

    fn reply_with(mermaid: &str) -> String {
        serde_json::json!({
            "action": "InfraAgent",
            "reason": "Generated Mermaid ER diagram from user input.",
            "context": { "mermaid": mermaid }
        })
        .to_string()
    }

    #[test]
    fn test_summary() {
        let summary = DiagramSummary::of(DIAGRAM);
        assert_eq!(summary.entities, vec!["User", "Post"]);
        assert_eq!(summary.relationships, 1);
    }

    #[test]
    fn test_summary_ignores_types_inside_blocks() {
        let summary = DiagramSummary::of("erDiagram\nA {\n  varchar(100) a--b\n}\n");
        assert_eq!(summary.entities, vec!["A"]);
        assert_eq!(summary.relationships, 0);
    }

    #[tokio::test]
    async fn test_generate_writes_diagram() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("src/schemas/mermaid.mmd");
        let fenced = format!("```json\n{}\n```", reply_with(DIAGRAM));
        let client = ScriptedProvider::new(vec![Ok(fenced)]);

        let diagram = SchemaGenerator::new(&client, &path)
            .generate("Users write posts.")
            .await
            .unwrap();

        assert_eq!(diagram.text, DIAGRAM);
        assert_eq!(diagram.path, path);
        assert_eq!(std::fs::read_to_string(&path).unwrap(), format!("{}\n", DIAGRAM));
        assert!(client.prompts()[0].contains("Users write posts."));
    }

    #[tokio::test]
    async fn test_missing_mermaid_leaves_file_unwritten() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("src/schemas/mermaid.mmd");
        let client = ScriptedProvider::new(vec![Ok(
            r#"{"action":"InfraAgent","reason":"nothing","context":{}}"#.to_string(),
        )]);

        let result = SchemaGenerator::new(&client, &path).generate("blog").await;

        assert!(matches!(
            result,
            Err(DbForgeError::MissingField { ref field, .. }) if field == "mermaid"
        ));
        assert!(!path.exists());
    }

    #[tokio::test]
    async fn test_malformed_reply_leaves_previous_diagram() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("mermaid.mmd");
        std::fs::write(&path, "erDiagram\n").unwrap();
        let client = ScriptedProvider::new(vec![Ok("not json".to_string())]);

        let result = SchemaGenerator::new(&client, &path).generate("blog").await;

        assert!(matches!(result, Err(DbForgeError::Serialization(_))));
        assert_eq!(std::fs::read_to_string(&path).unwrap(), "erDiagram\n");
    }
}
