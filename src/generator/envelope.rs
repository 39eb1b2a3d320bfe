//! Generation Envelope
//!
//! Every AI step answers with `{ action, reason, context }`. This module strips
//! Markdown code fences from raw replies and parses them into typed envelopes.

use crate::error::Result;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Parsed reply of an AI step
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Envelope<C> {
    /// Next agent the model suggests
    #[serde(default)]
    pub action: String,
    /// Short explanation from the model
    #[serde(default)]
    pub reason: String,
    /// Step-specific payload
    #[serde(default)]
    pub context: C,
}

impl<C: Default> Envelope<C> {
    /// Envelope with an empty context
    pub fn empty(action: impl Into<String>, reason: impl Into<String>) -> Self {
        Self {
            action: action.into(),
            reason: reason.into(),
            context: C::default(),
        }
    }
}

/// Context of the intent step
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct IntentContext {
    /// Short app title
    pub idea: Option<String>,
    /// English paragraph describing entities and relationships
    pub description: Option<String>,
}

impl IntentContext {
    /// Description, if present and not blank
    pub fn description(&self) -> Option<&str> {
        self.description
            .as_deref()
            .map(str::trim)
            .filter(|d| !d.is_empty())
    }
}

/// Context of the schema step
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SchemaContext {
    /// Mermaid ER diagram
    pub mermaid: Option<String>,
}

/// Context of the infrastructure step
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct InfraContext {
    /// Relative path under `src/` to file content
    #[serde(default)]
    pub files: BTreeMap<String, String>,
    /// Follow-up commands for the user to run
    #[serde(default, rename = "execTasks")]
    pub exec_tasks: Vec<String>,
}

/// Remove a surrounding Markdown code fence (with or without a `json` tag)
pub fn strip_code_fences(reply: &str) -> &str {
    let mut text = reply.trim();

    if let Some(rest) = text.strip_prefix("```") {
        let rest = match rest.get(..4) {
            Some(tag) if tag.eq_ignore_ascii_case("json") => &rest[4..],
            _ => rest,
        };
        text = rest.trim_start();
    }

    if let Some(rest) = text.strip_suffix("```") {
        text = rest;
    }

    text.trim()
}

/// Strip fences from a raw reply and parse it as an envelope
pub fn parse_envelope<C: DeserializeOwned + Default>(reply: &str) -> Result<Envelope<C>> {
    let cleaned = strip_code_fences(reply);
    Ok(serde_json::from_str(cleaned)?)
}
