//! Intent extraction
//!
//! Turns the user's free text into a short backend description.

use crate::error::Result;
use crate::generator::envelope::{parse_envelope, Envelope, IntentContext};
use crate::generator::prompts;
use crate::llm::LLMProvider;

/// Action reported when the reply could not be parsed
pub const FALLBACK_ACTION: &str = "IntentAgent";

/// Reason reported when the reply could not be parsed
pub const FALLBACK_REASON: &str =
    "Could not parse response. Ask user to explain their project again.";

/// Extracts the app idea from user input
pub struct IntentExtractor<'a> {
    client: &'a dyn LLMProvider,
}

impl<'a> IntentExtractor<'a> {
    /// Create an extractor backed by `client`
    pub fn new(client: &'a dyn LLMProvider) -> Self {
        Self { client }
    }

    /// Ask the model for an app description
    ///
    /// Transport failures are returned as errors. A reply that is not a valid
    /// envelope yields the fallback envelope with an empty context.
    pub async fn extract(
        &self,
        user_input: &str,
        prior: Option<&IntentContext>,
    ) -> Result<Envelope<IntentContext>> {
        let prompt = prompts::intent_prompt(user_input, prior);
        let reply = self.client.complete(&prompt).await?;

        match parse_envelope::<IntentContext>(&reply) {
            Ok(envelope) => {
                tracing::debug!(
                    action = %envelope.action,
                    reason = %envelope.reason,
                    "intent parsed"
                );
                Ok(envelope)
            }
            Err(e) => {
                tracing::warn!(error = %e, "intent reply was not valid JSON");
                Ok(Envelope::empty(FALLBACK_ACTION, FALLBACK_REASON))
            }
        }
    }
}
