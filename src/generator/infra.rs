//! Infrastructure code generation
//!
//! Sends the backend template, the project's module style and the ER diagram
//! to the model, then writes the returned files under `src/`.

use crate::error::{DbForgeError, Result};
use crate::generator::backend::{Backend, ModuleStyle};
use crate::generator::envelope::{parse_envelope, InfraContext};
use crate::generator::files::write_generated_files;
use crate::generator::prompts;
use crate::llm::LLMProvider;
use std::path::PathBuf;

/// What the infrastructure step produced
#[derive(Debug, Clone, PartialEq)]
pub struct InfraOutput {
    /// Module style the code was generated for
    pub module_style: ModuleStyle,
    /// Files written, in path order
    pub files: Vec<PathBuf>,
    /// Commands the user should run next
    pub exec_tasks: Vec<String>,
}

/// Generates backend boilerplate from the ER diagram
pub struct InfraGenerator<'a> {
    client: &'a dyn LLMProvider,
    project_root: PathBuf,
    src_dir: PathBuf,
}

impl<'a> InfraGenerator<'a> {
    /// Create a generator for the project at `project_root`, writing into
    /// `src_dir`
    pub fn new(
        client: &'a dyn LLMProvider,
        project_root: impl Into<PathBuf>,
        src_dir: impl Into<PathBuf>,
    ) -> Self {
        Self {
            client,
            project_root: project_root.into(),
            src_dir: src_dir.into(),
        }
    }

    /// Generate and write the backend files
    pub async fn generate(&self, backend: Backend, er_diagram: &str) -> Result<InfraOutput> {
        let module_style = ModuleStyle::detect(&self.project_root);
        tracing::info!(%backend, %module_style, "generating infrastructure code");

        let prompt = prompts::infra_prompt(backend, module_style, er_diagram);
        let reply = self.client.complete(&prompt).await?;

        let envelope = parse_envelope::<InfraContext>(&reply)?;
        let InfraContext { files, exec_tasks } = envelope.context;

        if files.is_empty() {
            return Err(DbForgeError::missing_field("infrastructure generation", "files"));
        }

        let written = write_generated_files(&self.src_dir, &files)?;

        Ok(InfraOutput {
            module_style,
            files: written,
            exec_tasks,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::generator::test_support::ScriptedProvider;
    use std::fs;

    fn prisma_reply() -> String {
        serde_json::json!({
            "action": "CodeGenAgent",
            "reason": "Generated SchemaCode for Database Initialization",
            "context": {
                "files": {
                    "prisma/schema.prisma": "generator client {\n  provider = \"prisma-client-js\"\n}\n\ndatasource db {\n  provider = \"postgresql\"\n}\n\n\n"
                },
                "execTasks": ["npx prisma generate", "npx prisma migrate dev --name init"]
            }
        })
        .to_string()
    }

    #[tokio::test]
    async fn test_generate_writes_files() {
        let dir = tempfile::tempdir().unwrap();
        let src = dir.path().join("src");
        let client = ScriptedProvider::new(vec![Ok(prisma_reply())]);

        let output = InfraGenerator::new(&client, dir.path(), &src)
            .generate(Backend::RelationalOrm, "erDiagram\n  User {\n  }")
            .await
            .unwrap();

        let schema = src.join("prisma/schema.prisma");
        assert_eq!(output.files, vec![schema.clone()]);
        assert_eq!(output.exec_tasks.len(), 2);
        assert_eq!(output.module_style, ModuleStyle::CommonJs);

        let content = fs::read_to_string(&schema).unwrap();
        assert!(content.starts_with("generator client {"));
        assert!(content.ends_with("}\n"));
        assert!(!content.ends_with("\n\n"));
    }

    #[tokio::test]
    async fn test_prompt_carries_module_style_and_diagram() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("package.json"), r#"{"type":"module"}"#).unwrap();
        let client = ScriptedProvider::new(vec![Ok(prisma_reply())]);

        let output = InfraGenerator::new(&client, dir.path(), dir.path().join("src"))
            .generate(Backend::DocumentStore, "erDiagram\n  Order {\n  }")
            .await
            .unwrap();

        assert_eq!(output.module_style, ModuleStyle::Esm);
        let prompt = &client.prompts()[0];
        assert!(prompt.contains("MongoSchemaAgent"));
        assert!(prompt.contains("ModuleType: esm\nER Diagram:\nerDiagram\n  Order {"));
    }

    #[tokio::test]
    async fn test_missing_files_is_error() {
        let dir = tempfile::tempdir().unwrap();
        let client = ScriptedProvider::new(vec![Ok(
            r#"{"action":"CodeGenAgent","reason":"r","context":{"execTasks":["x"]}}"#.to_string(),
        )]);

        let result = InfraGenerator::new(&client, dir.path(), dir.path().join("src"))
            .generate(Backend::DocumentCloud, "erDiagram")
            .await;

        assert!(matches!(result, Err(DbForgeError::MissingField { .. })));
        assert!(!dir.path().join("src").exists());
    }

    #[tokio::test]
    async fn test_malformed_reply_is_error() {
        let dir = tempfile::tempdir().unwrap();
        let client = ScriptedProvider::new(vec![Ok("```json\n{ \"files\": \n```".to_string())]);

        let result = InfraGenerator::new(&client, dir.path(), dir.path().join("src"))
            .generate(Backend::RelationalOrm, "erDiagram")
            .await;

        assert!(matches!(result, Err(DbForgeError::Serialization(_))));
    }
}
