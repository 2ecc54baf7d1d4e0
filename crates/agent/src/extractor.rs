use std::sync::Arc;

use anyhow::Result;

use crate::llm::CompletionClient;
use crate::prompts::{PromptLibrary, NO_ORDER_SENTINEL};

/// Pulls a search key out of free text via a few-shot prompt. Product
/// phrases are passed to the resolver unvalidated; order extraction
/// distinguishes "no number mentioned" through a literal sentinel.
pub struct EntityExtractor {
    client: Arc<dyn CompletionClient>,
    prompts: Arc<PromptLibrary>,
}

impl EntityExtractor {
    pub fn new(client: Arc<dyn CompletionClient>, prompts: Arc<PromptLibrary>) -> Self {
        Self { client, prompts }
    }

    pub async fn product_phrase(&self, message: &str) -> Result<String> {
        let prompt = self.prompts.render_message_only("extract_product", message)?;
        let reply = self.client.complete(&prompt).await?;
        Ok(reply.trim().to_string())
    }

    /// `None` when the completion reply is exactly the sentinel; any other
    /// reply is treated as a genuine order number.
    pub async fn order_number(&self, message: &str) -> Result<Option<String>> {
        let prompt = self.prompts.render_message_only("extract_order", message)?;
        let reply = self.client.complete(&prompt).await?;
        let trimmed = reply.trim();

        if trimmed == NO_ORDER_SENTINEL {
            return Ok(None);
        }
        Ok(Some(trimmed.to_string()))
    }
}
