//! Package installation
//!
//! Each backend needs a few npm packages. A [`PackageResolver`] decides whether
//! a package is already available and a [`CommandRunner`] executes the install
//! command with a timeout and a structured outcome.

use crate::error::Result;
use async_trait::async_trait;
use std::path::{Path, PathBuf};
use std::process::Stdio;
use std::time::Duration;
use tokio::process::Command;

/// Answers "is package X resolvable in this environment"
pub trait PackageResolver: Send + Sync {
    /// Whether `package` can already be loaded
    fn is_installed(&self, package: &str) -> bool;
}

/// Resolves packages the way Node does: `node_modules/<pkg>/package.json` in
/// the project directory or any ancestor
pub struct NodeModulesResolver {
    root: PathBuf,
}

impl NodeModulesResolver {
    /// Resolver starting at `root`
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }
}

impl PackageResolver for NodeModulesResolver {
    fn is_installed(&self, package: &str) -> bool {
        self.root.ancestors().any(|dir| {
            dir.join("node_modules")
                .join(package)
                .join("package.json")
                .is_file()
        })
    }
}

/// Result of running one external command
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CommandOutcome {
    /// Exited with status 0
    Succeeded,
    /// Exited non-zero, or was killed by a signal (`None`)
    Failed(Option<i32>),
    /// Did not finish in time and was killed
    TimedOut,
}

impl CommandOutcome {
    /// Whether the command succeeded
    pub fn is_success(&self) -> bool {
        matches!(self, CommandOutcome::Succeeded)
    }
}

/// Runs external commands
#[async_trait]
pub trait CommandRunner: Send + Sync {
    /// Run `command` through the shell and wait for it
    ///
    /// `Err` means the command could not be started at all.
    async fn run(&self, command: &str) -> Result<CommandOutcome>;
}

/// Runs commands through the platform shell with inherited stdio
pub struct ShellCommandRunner {
    working_dir: PathBuf,
    timeout: Duration,
}

impl ShellCommandRunner {
    /// Runner executing in `working_dir`, killing commands after `timeout`
    pub fn new(working_dir: impl Into<PathBuf>, timeout: Duration) -> Self {
        Self {
            working_dir: working_dir.into(),
            timeout,
        }
    }

    fn build_command(&self, command: &str) -> Command {
        #[cfg(windows)]
        let mut cmd = {
            let mut cmd = Command::new("cmd");
            cmd.arg("/C").arg(command);
            cmd
        };
        #[cfg(not(windows))]
        let mut cmd = {
            let mut cmd = Command::new("sh");
            cmd.arg("-c").arg(command);
            cmd
        };

        cmd.current_dir(&self.working_dir)
            .stdin(Stdio::inherit())
            .stdout(Stdio::inherit())
            .stderr(Stdio::inherit())
            .kill_on_drop(true);
        cmd
    }
}

#[async_trait]
impl CommandRunner for ShellCommandRunner {
    async fn run(&self, command: &str) -> Result<CommandOutcome> {
        let mut child = self.build_command(command).spawn()?;

        match tokio::time::timeout(self.timeout, child.wait()).await {
            Ok(status) => {
                let status = status?;
                if status.success() {
                    Ok(CommandOutcome::Succeeded)
                } else {
                    Ok(CommandOutcome::Failed(status.code()))
                }
            }
            Err(_) => {
                tracing::warn!(command, timeout_secs = self.timeout.as_secs(), "command timed out");
                child.kill().await?;
                Ok(CommandOutcome::TimedOut)
            }
        }
    }
}

/// What happened to one install command
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InstallStatus {
    /// Package already resolvable, command skipped
    AlreadyInstalled,
    /// Command ran and finished with this outcome
    Ran(CommandOutcome),
    /// Command could not be started
    SpawnFailed(String),
    /// No package name could be found in the command
    Unrecognized,
}

/// Per-command report of a setup run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InstallReport {
    /// Command as configured
    pub command: String,
    /// Package parsed from the command
    pub package: Option<String>,
    /// What happened
    pub status: InstallStatus,
}

/// Package name installed by an `npm install` command
///
/// `npm install prisma --save-dev` gives `prisma`,
/// `npm install @prisma/client` gives `@prisma/client`.
pub fn package_name(command: &str) -> Option<&str> {
    let mut words = command.split_whitespace();

    if words.next()? != "npm" {
        return None;
    }
    if !matches!(words.next()?, "install" | "i" | "add") {
        return None;
    }

    words.find(|w| !w.starts_with('-'))
}

/// Install each command's package unless it is already resolvable
///
/// Every command is attempted; failures are reported, never returned.
pub async fn install_packages(
    commands: &[&str],
    resolver: &dyn PackageResolver,
    runner: &dyn CommandRunner,
) -> Vec<InstallReport> {
    let mut reports = Vec::with_capacity(commands.len());

    for command in commands {
        let package = package_name(command);

        let status = match package {
            None => {
                tracing::warn!(command, "no package name in install command");
                InstallStatus::Unrecognized
            }
            Some(pkg) if resolver.is_installed(pkg) => InstallStatus::AlreadyInstalled,
            Some(pkg) => {
                tracing::info!(package = pkg, command, "installing package");
                match runner.run(command).await {
                    Ok(outcome) => InstallStatus::Ran(outcome),
                    Err(e) => {
                        tracing::error!(command, error = %e, "failed to start install command");
                        InstallStatus::SpawnFailed(e.to_string())
                    }
                }
            }
        };

        reports.push(InstallReport {
            command: command.to_string(),
            package: package.map(str::to_string),
            status,
        });
    }

    reports
}

/// `true` if `dir` looks like a Node project
pub fn has_package_manifest(dir: &Path) -> bool {
    dir.join("package.json").is_file()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::DbForgeError;
    use std::collections::HashSet;
    use std::sync::Mutex;

    struct FixedResolver(HashSet<&'static str>);

    impl PackageResolver for FixedResolver {
        fn is_installed(&self, package: &str) -> bool {
            self.0.contains(package)
        }
    }

    struct RecordingRunner {
        ran: Mutex<Vec<String>>,
        fail_on: &'static str,
    }

    #[async_trait]
    impl CommandRunner for RecordingRunner {
        async fn run(&self, command: &str) -> Result<CommandOutcome> {
            self.ran.lock().unwrap().push(command.to_string());
            if command.contains(self.fail_on) {
                return Err(DbForgeError::Io(std::io::Error::new(
                    std::io::ErrorKind::NotFound,
                    "npm not found",
                )));
            }
            Ok(CommandOutcome::Succeeded)
        }
    }

    #[test]
    fn test_package_name() {
        assert_eq!(package_name("npm install prisma --save-dev"), Some("prisma"));
        assert_eq!(package_name("npm install @prisma/client"), Some("@prisma/client"));
        assert_eq!(package_name("npm install --save-dev prisma"), Some("prisma"));
        assert_eq!(package_name("npm install firebase-admin"), Some("firebase-admin"));
        assert_eq!(package_name("npm install"), None);
        assert_eq!(package_name("yarn add mongoose"), None);
        assert_eq!(package_name(""), None);
    }

    #[test]
    fn test_node_modules_resolver() {
        let dir = tempfile::tempdir().unwrap();
        let project = dir.path().join("app");
        std::fs::create_dir_all(&project).unwrap();

        let resolver = NodeModulesResolver::new(&project);
        assert!(!resolver.is_installed("@prisma/client"));

        // Installed in a parent directory, like a monorepo root.
        let pkg = dir.path().join("node_modules/@prisma/client");
        std::fs::create_dir_all(&pkg).unwrap();
        std::fs::write(pkg.join("package.json"), "{}").unwrap();
        assert!(resolver.is_installed("@prisma/client"));
        assert!(!resolver.is_installed("prisma"));
    }

    #[tokio::test]
    async fn test_install_skips_present_and_continues_after_failure() {
        let resolver = FixedResolver(["mongoose"].into_iter().collect());
        let runner = RecordingRunner {
            ran: Mutex::new(Vec::new()),
            fail_on: "prisma --save-dev",
        };
        let commands = [
            "npm install prisma --save-dev",
            "npm install mongoose",
            "npm install @prisma/client",
            "echo hello",
        ];

        let reports = install_packages(&commands, &resolver, &runner).await;

        assert!(matches!(reports[0].status, InstallStatus::SpawnFailed(_)));
        assert_eq!(reports[1].status, InstallStatus::AlreadyInstalled);
        assert_eq!(reports[2].status, InstallStatus::Ran(CommandOutcome::Succeeded));
        assert_eq!(reports[2].package.as_deref(), Some("@prisma/client"));
        assert_eq!(reports[3].status, InstallStatus::Unrecognized);

        assert_eq!(
            *runner.ran.lock().unwrap(),
            vec!["npm install prisma --save-dev", "npm install @prisma/client"]
        );
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_shell_runner_outcomes() {
        let dir = tempfile::tempdir().unwrap();
        let runner = ShellCommandRunner::new(dir.path(), Duration::from_secs(10));

        assert_eq!(runner.run("true").await.unwrap(), CommandOutcome::Succeeded);
        assert_eq!(runner.run("exit 3").await.unwrap(), CommandOutcome::Failed(Some(3)));
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_shell_runner_timeout() {
        let dir = tempfile::tempdir().unwrap();
        let runner = ShellCommandRunner::new(dir.path(), Duration::from_millis(200));

        let outcome = runner.run("sleep 5").await.unwrap();
        assert_eq!(outcome, CommandOutcome::TimedOut);
        assert!(!outcome.is_success());
    }

    #[test]
    fn test_has_package_manifest() {
        let dir = tempfile::tempdir().unwrap();
        assert!(!has_package_manifest(dir.path()));
        std::fs::write(dir.path().join("package.json"), "{}").unwrap();
        assert!(has_package_manifest(dir.path()));
    }
}
