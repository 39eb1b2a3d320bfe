//! Prompt templates
//!
//! Templates live under `prompts/` at the crate root and are embedded at build
//! time. Placeholders use the `{{NAME}}` form.

use crate::generator::backend::{Backend, ModuleStyle};
use crate::generator::envelope::IntentContext;

/// Bumped whenever a template's wording or output contract changes
pub const TEMPLATE_VERSION: u32 = 1;

const INTENT_TEMPLATE: &str = include_str!("../../prompts/intent.md");
const SCHEMA_TEMPLATE: &str = include_str!("../../prompts/schema.md");
const SUPABASE_TEMPLATE: &str = include_str!("../../prompts/infra_supabase.md");
const MONGODB_TEMPLATE: &str = include_str!("../../prompts/infra_mongodb.md");
const FIRESTORE_TEMPLATE: &str = include_str!("../../prompts/infra_firestore.md");

/// Prompt for the intent step
pub fn intent_prompt(user_input: &str, prior: Option<&IntentContext>) -> String {
    let prior_block = match prior.and_then(IntentContext::description) {
        Some(description) => format!(
            "\nPrevious project description (source of truth, apply only the user's delta):\n{}\n",
            description
        ),
        None => String::new(),
    };

    INTENT_TEMPLATE
        .replace("{{USER_INPUT}}", user_input.trim())
        .replace("{{PRIOR_CONTEXT}}", &prior_block)
}

/// Prompt for the ER diagram step
pub fn schema_prompt(app_description: &str) -> String {
    SCHEMA_TEMPLATE.replace("{{APP_DESCRIPTION}}", app_description.trim())
}

/// Code generation template for a backend
pub fn infra_template(backend: Backend) -> &'static str {
    match backend {
        Backend::RelationalOrm => SUPABASE_TEMPLATE,
        Backend::DocumentStore => MONGODB_TEMPLATE,
        Backend::DocumentCloud => FIRESTORE_TEMPLATE,
    }
}

/// Prompt for the infrastructure step: template, module style, then diagram
pub fn infra_prompt(backend: Backend, module_style: ModuleStyle, er_diagram: &str) -> String {
    format!(
        "{}\n\nModuleType: {}\nER Diagram:\n{}",
        infra_template(backend).trim_end(),
        module_style,
        er_diagram.trim()
    )
}
