//! Interactive generation flow
//!
//! Describe the app, derive an ER diagram, refine it, pick a backend,
//! install its packages and generate the data-layer code.

use crate::cli::progress::Spinner;
use crate::cli::prompt::Prompter;
use crate::cli::summary;
use crate::config::AppConfig;
use crate::error::{DbForgeError, Result};
use crate::generator::{
    Backend, InfraGenerator, InfraOutput, IntentExtractor, SchemaGenerator, SessionContext,
};
use crate::llm::LLMProvider;
use crate::setup::packages::has_package_manifest;
use crate::setup::{install_packages, CommandRunner, InstallReport, PackageResolver, ProjectLayout};

pub const DESCRIBE_PROMPT: &str = "📝 Describe your app:";
pub const EDIT_CONFIRM_PROMPT: &str = "✏️  Do you want to edit or add to the database design?";
pub const EDIT_PROMPT: &str = "✏️  Enter your changes (like add/remove tables):";
pub const SELECT_PROMPT: &str = "🗃️  Choose your database:";

pub const INTENT_FAILED: &str = "❌ Could not understand your description. Try again.";
pub const SCHEMA_FAILED: &str = "❌ Could not create the schema. Try again.";
pub const EDIT_FAILED: &str = "❌ Failed to apply your changes. Try again.";
pub const UNSUPPORTED_BACKEND: &str = "❌ This database is not supported.";
pub const INFRA_FAILED: &str = "❌ Something went wrong while setting up the database.";

/// How a run ended
#[derive(Debug)]
pub enum RunOutcome {
    /// Backend code was generated
    Completed {
        session: SessionContext,
        installs: Vec<InstallReport>,
        infra: InfraOutput,
    },
    /// A backend was chosen but code generation failed
    InfraFailed {
        session: SessionContext,
        installs: Vec<InstallReport>,
        error: DbForgeError,
    },
    /// Stopped before a backend was chosen, with the message shown to the user
    Aborted(&'static str),
}

/// Request sent to the intent step when the user edits the design
///
/// Always built from the first description, not the latest one.
pub fn edit_request(original_description: &str, edit: &str) -> String {
    format!("{}. {}", original_description, edit)
}

/// Create `.env` and the source folders, then load the configuration
///
/// Values from `lookup` (normally [`crate::config::process_env`]) override
/// the file.
pub fn bootstrap<F>(layout: &ProjectLayout, lookup: F) -> Result<AppConfig>
where
    F: Fn(&str) -> Option<String>,
{
    if layout.ensure_env_file()? {
        println!("✅ .env file created at root");
    }

    let config = AppConfig::load_with(&layout.env_path, lookup)?;

    for dir in layout.scaffold(&config.folders)? {
        println!("📁 Created folder: {}", dir.display());
    }

    Ok(config)
}

/// Drives one run from description to generated files
pub struct Orchestrator<'a> {
    config: &'a AppConfig,
    layout: &'a ProjectLayout,
    intent_client: &'a dyn LLMProvider,
    schema_client: &'a dyn LLMProvider,
    resolver: &'a dyn PackageResolver,
    runner: &'a dyn CommandRunner,
}

impl<'a> Orchestrator<'a> {
    /// `intent_client` serves the intent and infrastructure steps,
    /// `schema_client` the ER diagram step
    pub fn new(
        config: &'a AppConfig,
        layout: &'a ProjectLayout,
        intent_client: &'a dyn LLMProvider,
        schema_client: &'a dyn LLMProvider,
        resolver: &'a dyn PackageResolver,
        runner: &'a dyn CommandRunner,
    ) -> Self {
        Self {
            config,
            layout,
            intent_client,
            schema_client,
            resolver,
            runner,
        }
    }

    /// Run the flow
    ///
    /// Prompt errors (including cancellation) are returned; AI and setup
    /// failures are reported to the user and end in a [`RunOutcome`].
    pub async fn run(&self, prompter: &mut dyn Prompter) -> Result<RunOutcome> {
        let user_input = prompter.input(DESCRIBE_PROMPT)?;

        let spinner = Spinner::start("🤖 Generating initial database idea...");
        let description = match self.describe(&user_input).await {
            Some(description) => {
                spinner.succeed("🤖 Understood your app");
                description
            }
            None => {
                spinner.fail(INTENT_FAILED);
                return Ok(RunOutcome::Aborted(INTENT_FAILED));
            }
        };
        println!("\n💡 {}\n", description);

        let spinner = Spinner::start("📐 Designing the database schema...");
        let diagram = match self.schema_generator().generate(&description).await {
            Ok(diagram) => {
                spinner.succeed(format!(
                    "📐 Schema saved to {}",
                    self.layout.relative(&diagram.path).display()
                ));
                diagram
            }
            Err(e) => {
                tracing::warn!(error = %e, "schema generation failed");
                spinner.fail(SCHEMA_FAILED);
                return Ok(RunOutcome::Aborted(SCHEMA_FAILED));
            }
        };
        println!("{}", summary::diagram_table(&diagram.summary()));

        let mut session = SessionContext::new(description.clone(), diagram.text);
        self.edit_loop(prompter, &description, &mut session).await?;

        let label = prompter.select(SELECT_PROMPT, &self.config.available_db)?;
        let backend = match Backend::from_label(&label) {
            Ok(backend) => session.choose_backend(backend),
            Err(e) => {
                tracing::warn!(error = %e, "backend rejected");
                println!("{}", UNSUPPORTED_BACKEND);
                return Ok(RunOutcome::Aborted(UNSUPPORTED_BACKEND));
            }
        };
        println!("✅ Selected: {}\n", backend);

        let installs = self.install(backend).await;

        let spinner = Spinner::start(format!("⚙️  Generating {} code...", backend));
        let generator =
            InfraGenerator::new(self.intent_client, &self.layout.root, &self.layout.src_dir);

        match generator.generate(backend, &session.mermaid_diagram).await {
            Ok(infra) => {
                spinner.succeed(format!("⚙️  {} code generated", backend));
                println!("{}", summary::files_table(self.layout, &infra.files));
                if !infra.exec_tasks.is_empty() {
                    println!("{}", summary::tasks_table(&infra.exec_tasks));
                }
                self.warn_missing_settings(backend);
                println!("🎉 All done! Your {} setup is ready.", backend);

                Ok(RunOutcome::Completed {
                    session,
                    installs,
                    infra,
                })
            }
            Err(error) => {
                tracing::error!(error = %error, "infrastructure generation failed");
                spinner.fail(INFRA_FAILED);
                Ok(RunOutcome::InfraFailed {
                    session,
                    installs,
                    error,
                })
            }
        }
    }

    fn schema_generator(&self) -> SchemaGenerator<'a> {
        SchemaGenerator::new(self.schema_client, &self.layout.diagram_path)
    }

    /// App description from the intent step, `None` on any failure
    async fn describe(&self, request: &str) -> Option<String> {
        match IntentExtractor::new(self.intent_client).extract(request, None).await {
            Ok(envelope) => {
                let description = envelope.context.description().map(str::to_string);
                if description.is_none() {
                    tracing::warn!(reason = %envelope.reason, "intent reply has no description");
                }
                description
            }
            Err(e) => {
                tracing::warn!(error = %e, "intent extraction failed");
                None
            }
        }
    }

    async fn edit_loop(
        &self,
        prompter: &mut dyn Prompter,
        original_description: &str,
        session: &mut SessionContext,
    ) -> Result<()> {
        while prompter.confirm(EDIT_CONFIRM_PROMPT, false)? {
            let edit = prompter.input(EDIT_PROMPT)?;
            let request = edit_request(original_description, &edit);

            let spinner = Spinner::start("🔁 Updating the design...");
            let Some(description) = self.describe(&request).await else {
                spinner.fail(EDIT_FAILED);
                continue;
            };

            match self.schema_generator().generate(&description).await {
                Ok(diagram) => {
                    spinner.succeed("🔁 Design updated");
                    println!("{}", summary::diagram_table(&diagram.summary()));
                    session.app_description = description;
                    session.mermaid_diagram = diagram.text;
                }
                Err(e) => {
                    tracing::warn!(error = %e, "schema regeneration failed");
                    spinner.fail(EDIT_FAILED);
                }
            }
        }

        Ok(())
    }

    async fn install(&self, backend: Backend) -> Vec<InstallReport> {
        if !has_package_manifest(&self.layout.root) {
            println!("⚠️  No package.json found; npm will create one.");
        }

        println!("📦 Installing packages for {}...", backend);
        let reports = install_packages(backend.setup_commands(), self.resolver, self.runner).await;
        println!("{}", summary::install_table(&reports));
        reports
    }

    fn warn_missing_settings(&self, backend: Backend) {
        let missing: Vec<&str> = backend
            .required_settings(self.config)
            .into_iter()
            .filter(|(_, set)| !set)
            .map(|(key, _)| key)
            .collect();

        if !missing.is_empty() {
            println!(
                "⚠️  Set {} in {} before running the generated code.",
                missing.join(", "),
                self.layout.relative(&self.layout.env_path).display()
            );
        }
    }
}
