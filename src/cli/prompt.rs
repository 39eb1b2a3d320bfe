//! Interactive prompts
//!
//! The orchestrator asks questions through the [`Prompter`] trait so the flow
//! can be driven by a script in tests. [`TerminalPrompter`] is the real
//! implementation on top of rustyline.

use crate::cli::select_menu::{self, MenuResult};
use crate::error::{DbForgeError, Result};
use rustyline::history::DefaultHistory;
use rustyline::{Config, Editor};
use std::io::IsTerminal;
use std::path::PathBuf;

/// Source of user answers
pub trait Prompter {
    /// Free-text answer
    fn input(&mut self, message: &str) -> Result<String>;

    /// Yes/no answer, `default` on empty input
    fn confirm(&mut self, message: &str, default: bool) -> Result<bool>;

    /// One of `choices`, or free text when the user types their own
    fn select(&mut self, message: &str, choices: &[String]) -> Result<String>;
}

/// Parse a yes/no answer, `None` when it is neither
pub fn parse_confirm(answer: &str, default: bool) -> Option<bool> {
    match answer.trim().to_lowercase().as_str() {
        "" => Some(default),
        "y" | "yes" => Some(true),
        "n" | "no" => Some(false),
        _ => None,
    }
}

/// Resolve a typed answer to a list: a 1-based index picks that item,
/// anything else is returned as typed
pub fn resolve_choice(answer: &str, choices: &[String]) -> String {
    let answer = answer.trim();
    answer
        .parse::<usize>()
        .ok()
        .and_then(|n| n.checked_sub(1))
        .and_then(|i| choices.get(i))
        .cloned()
        .unwrap_or_else(|| answer.to_string())
}

/// Prompter reading from the terminal
pub struct TerminalPrompter {
    /// The rustyline editor
    editor: Editor<(), DefaultHistory>,
    /// History file, when a home directory exists
    history_path: Option<PathBuf>,
}

impl TerminalPrompter {
    /// Create a prompter, loading input history if present
    pub fn new() -> Result<Self> {
        let config = Config::builder()
            .history_ignore_space(true)
            .auto_add_history(true)
            .build();

        let mut editor = Editor::<(), DefaultHistory>::with_config(config)?;

        let history_path = dirs::home_dir().map(|p| p.join(".dbforge").join("history"));
        if let Some(path) = &history_path {
            if let Err(e) = editor.load_history(path) {
                tracing::debug!(error = %e, "no prompt history loaded");
            }
        }

        Ok(Self {
            editor,
            history_path,
        })
    }

    /// Persist input history
    pub fn save_history(&mut self) -> Result<()> {
        if let Some(path) = &self.history_path {
            if let Some(parent) = path.parent() {
                std::fs::create_dir_all(parent)?;
            }
            self.editor.save_history(path)?;
        }
        Ok(())
    }

    fn typed_select(&mut self, message: &str, choices: &[String]) -> Result<String> {
        println!("{}", message);
        for (i, choice) in choices.iter().enumerate() {
            println!("  {}) {}", i + 1, choice);
        }
        let answer = self.editor.readline("> ")?;
        Ok(resolve_choice(&answer, choices))
    }
}

impl Prompter for TerminalPrompter {
    fn input(&mut self, message: &str) -> Result<String> {
        let line = self.editor.readline(&format!("{} ", message))?;
        Ok(line.trim().to_string())
    }

    fn confirm(&mut self, message: &str, default: bool) -> Result<bool> {
        let hint = if default { "Y/n" } else { "y/N" };
        loop {
            let line = self.editor.readline(&format!("{} ({}) ", message, hint))?;
            match parse_confirm(&line, default) {
                Some(answer) => return Ok(answer),
                None => println!("Please answer y or n."),
            }
        }
    }

    fn select(&mut self, message: &str, choices: &[String]) -> Result<String> {
        if choices.is_empty() {
            return Err(DbForgeError::Config(
                "AVAILABLE_DB lists no databases to choose from".to_string(),
            ));
        }

        if !std::io::stdout().is_terminal() {
            return self.typed_select(message, choices);
        }

        match select_menu::show_select_menu(message, choices) {
            Ok(MenuResult::Selected(i)) => Ok(choices[i].clone()),
            Ok(MenuResult::Cancelled) => Err(DbForgeError::Cancelled),
            Ok(MenuResult::TextInput) => self.typed_select(message, choices),
            Err(e) => {
                tracing::warn!(error = %e, "selection menu unavailable, falling back to text");
                self.typed_select(message, choices)
            }
        }
    }
}
