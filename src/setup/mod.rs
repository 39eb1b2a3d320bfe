//! Project setup
//!
//! Folder scaffolding and backend package installation.

pub mod packages;
pub mod scaffold;

// Re-exports
pub use packages::{
    install_packages, CommandOutcome, CommandRunner, InstallReport, InstallStatus,
    NodeModulesResolver, PackageResolver, ShellCommandRunner,
};
pub use scaffold::ProjectLayout;
