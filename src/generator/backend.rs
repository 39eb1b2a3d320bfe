//! Backend selection
//!
//! The persistence technology the user picks, resolved from the free-form
//! labels listed in `AVAILABLE_DB`.

use crate::config::AppConfig;
use crate::error::{DbForgeError, Result};
use std::fmt;
use std::path::Path;

/// Target persistence technology
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Backend {
    /// PostgreSQL on Supabase through Prisma
    RelationalOrm,
    /// MongoDB Atlas through Mongoose
    DocumentStore,
    /// Firebase Firestore through firebase-admin
    DocumentCloud,
}

impl Backend {
    /// All supported backends
    pub const ALL: [Backend; 3] = [
        Backend::RelationalOrm,
        Backend::DocumentStore,
        Backend::DocumentCloud,
    ];

    /// Resolve a user-facing label, e.g. "Supabase - Prisma ORM"
    pub fn from_label(label: &str) -> Result<Self> {
        let lower = label.trim().to_lowercase();

        Self::ALL
            .into_iter()
            .find(|backend| lower.contains(backend.keyword()))
            .ok_or_else(|| DbForgeError::UnsupportedBackend(label.trim().to_string()))
    }

    /// Substring that identifies this backend in a label
    pub fn keyword(&self) -> &'static str {
        match self {
            Backend::RelationalOrm => "supabase",
            Backend::DocumentStore => "mongo",
            Backend::DocumentCloud => "firebase",
        }
    }

    /// Package install commands run before code generation
    pub fn setup_commands(&self) -> &'static [&'static str] {
        match self {
            Backend::RelationalOrm => {
                &["npm install prisma --save-dev", "npm install @prisma/client"]
            }
            Backend::DocumentStore => &["npm install mongoose"],
            Backend::DocumentCloud => &["npm install firebase-admin"],
        }
    }

    /// Configuration keys that must be filled before the generated code runs,
    /// paired with whether they are set
    pub fn required_settings(&self, config: &AppConfig) -> Vec<(&'static str, bool)> {
        match self {
            Backend::RelationalOrm => vec![
                ("SUPABASE_DATABASE_URL", config.supabase_database_url.is_some()),
                ("SUPABASE_DIRECT_URL", config.supabase_direct_url.is_some()),
            ],
            Backend::DocumentStore => vec![("MONGO_DB_URL", config.mongo_db_url.is_some())],
            Backend::DocumentCloud => vec![(
                "FIREBASE_CREDENTIALS",
                config.firebase_credentials.is_some(),
            )],
        }
    }
}

impl fmt::Display for Backend {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Backend::RelationalOrm => "Supabase (Prisma)",
            Backend::DocumentStore => "MongoDB (Mongoose)",
            Backend::DocumentCloud => "Firebase (Firestore)",
        };
        write!(f, "{}", name)
    }
}

/// JavaScript module convention of the target project
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ModuleStyle {
    /// `import` / `export`
    Esm,
    /// `require` / `module.exports`
    CommonJs,
}

impl ModuleStyle {
    /// Detect from `package.json` in the project root
    ///
    /// Anything other than `"type": "module"`, including a missing or
    /// unreadable manifest, is CommonJS.
    pub fn detect(project_root: &Path) -> Self {
        let manifest = project_root.join("package.json");

        let is_module = std::fs::read_to_string(&manifest)
            .ok()
            .and_then(|text| serde_json::from_str::<serde_json::Value>(&text).ok())
            .and_then(|json| json.get("type").and_then(|t| t.as_str()).map(|t| t == "module"))
            .unwrap_or(false);

        if is_module {
            ModuleStyle::Esm
        } else {
            ModuleStyle::CommonJs
        }
    }

    /// Name used in prompts
    pub fn as_str(&self) -> &'static str {
        match self {
            ModuleStyle::Esm => "esm",
            ModuleStyle::CommonJs => "commonjs",
        }
    }
}

impl fmt::Display for ModuleStyle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
