use std::sync::Arc;

use anyhow::Result;

use crate::llm::CompletionClient;
use crate::prompts::{PromptLibrary, ORDER_MARKER, PRODUCT_MARKER};

/// Two independent binary checks per message, each one completion call.
/// A reply counts as positive when it contains the expected marker token
/// anywhere; anything else, including malformed output, is the negative
/// branch.
pub struct IntentClassifier {
    client: Arc<dyn CompletionClient>,
    prompts: Arc<PromptLibrary>,
}

impl IntentClassifier {
    pub fn new(client: Arc<dyn CompletionClient>, prompts: Arc<PromptLibrary>) -> Self {
        Self { client, prompts }
    }

    pub async fn needs_product_lookup(&self, message: &str) -> Result<bool> {
        let prompt = self.prompts.render_message_only("classify_product", message)?;
        let reply = self.client.complete(&prompt).await?;
        Ok(contains_marker(&reply, PRODUCT_MARKER))
    }

    pub async fn needs_order_lookup(&self, message: &str) -> Result<bool> {
        let prompt = self.prompts.render_message_only("classify_order", message)?;
        let reply = self.client.complete(&prompt).await?;
        Ok(contains_marker(&reply, ORDER_MARKER))
    }
}

/// Substring containment, not equality: the reply may carry extra words
/// around the marker.
fn contains_marker(reply: &str, marker: &str) -> bool {
    reply.contains(marker)
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use crate::llm::testing::ScriptedClient;
    use crate::prompts::PromptLibrary;

    use super::{contains_marker, IntentClassifier};

    fn classifier(replies: &[&str]) -> IntentClassifier {
        IntentClassifier::new(
            Arc::new(ScriptedClient::with_replies(replies)),
            Arc::new(PromptLibrary::new().expect("templates register")),
        )
    }

    #[tokio::test]
    async fn marker_reply_is_positive() {
        let classifier = classifier(&["RETRIEVE_PRODUCT"]);
        assert!(classifier.needs_product_lookup("got any iPhones?").await.expect("check runs"));
    }

    #[tokio::test]
    async fn padded_marker_reply_is_still_positive() {
        let classifier = classifier(&["Sure - RETRIEVE_PRODUCT is the answer."]);
        assert!(classifier.needs_product_lookup("got any iPhones?").await.expect("check runs"));
    }

    #[tokio::test]
    async fn explicit_no_is_negative() {
        let classifier = classifier(&["NO"]);
        assert!(!classifier.needs_product_lookup("hello there").await.expect("check runs"));
    }

    #[tokio::test]
    async fn malformed_output_collapses_to_negative() {
        let classifier = classifier(&["I am not sure what you mean by that."]);
        assert!(!classifier.needs_order_lookup("hello there").await.expect("check runs"));
    }

    #[tokio::test]
    async fn order_check_uses_the_order_marker() {
        let classifier = classifier(&["RETRIEVE_ORDER"]);
        assert!(classifier.needs_order_lookup("where is ORD10001?").await.expect("check runs"));
    }

    #[test]
    fn marker_containment_is_case_sensitive() {
        assert!(contains_marker("RETRIEVE_PRODUCT", "RETRIEVE_PRODUCT"));
        assert!(!contains_marker("retrieve_product", "RETRIEVE_PRODUCT"));
    }
}
