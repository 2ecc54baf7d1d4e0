use std::sync::Arc;

use anyhow::Result;
use clerky_core::catalog::Catalog;
use clerky_core::errors::{ApplicationError, DomainError};
use clerky_core::turn::{advance, TurnEvent, TurnPhase, TurnState};
use tracing::{debug, info};
use uuid::Uuid;

use crate::classifier::IntentClassifier;
use crate::composer::{select_branch, ResponseComposer};
use crate::extractor::EntityExtractor;
use crate::llm::CompletionClient;
use crate::prompts::PromptLibrary;

/// Turn orchestrator. Holds the process-wide catalog and completion client
/// and runs each message through the fixed pipeline: product check ->
/// optional product lookup -> order check -> optional order lookup ->
/// composition. Strictly sequential; the two classification calls never
/// overlap.
pub struct AgentRuntime {
    catalog: Arc<Catalog>,
    classifier: IntentClassifier,
    extractor: EntityExtractor,
    composer: ResponseComposer,
}

impl AgentRuntime {
    pub fn new(catalog: Arc<Catalog>, client: Arc<dyn CompletionClient>) -> Result<Self> {
        let prompts = Arc::new(PromptLibrary::new()?);
        Ok(Self {
            catalog,
            classifier: IntentClassifier::new(client.clone(), prompts.clone()),
            extractor: EntityExtractor::new(client.clone(), prompts.clone()),
            composer: ResponseComposer::new(client, prompts),
        })
    }

    /// Run one full turn. The turn state is created fresh, rebuilt through
    /// the pipeline, and dropped after the response is returned; nothing
    /// carries over to the next message.
    pub async fn handle_message(&self, message: &str) -> Result<String, ApplicationError> {
        let correlation_id = Uuid::new_v4().to_string();
        info!(
            event_name = "agent.turn.started",
            correlation_id = %correlation_id,
            "turn started"
        );

        let mut phase = TurnPhase::Start;
        let mut state = TurnState::new(message);

        let product_flagged =
            self.classifier.needs_product_lookup(message).await.map_err(completion_error)?;
        phase = step(phase, TurnEvent::ProductCheckCompleted)?;
        debug!(
            event_name = "agent.turn.product_checked",
            correlation_id = %correlation_id,
            lookup_needed = product_flagged,
            "product classification completed"
        );

        if product_flagged {
            let phrase =
                self.extractor.product_phrase(message).await.map_err(completion_error)?;
            let matches = self.catalog.match_products(&phrase);
            debug!(
                event_name = "agent.turn.product_resolved",
                correlation_id = %correlation_id,
                match_count = matches.len(),
                "product lookup completed"
            );
            state = state.with_products(matches);
            phase = step(phase, TurnEvent::ProductLookupResolved)?;
        }

        let order_flagged =
            self.classifier.needs_order_lookup(message).await.map_err(completion_error)?;
        phase = step(phase, TurnEvent::OrderCheckCompleted)?;
        debug!(
            event_name = "agent.turn.order_checked",
            correlation_id = %correlation_id,
            lookup_needed = order_flagged,
            "order classification completed"
        );

        if order_flagged {
            let order_number =
                self.extractor.order_number(message).await.map_err(completion_error)?;
            let resolved =
                order_number.as_deref().and_then(|number| self.catalog.resolve_order(number));
            debug!(
                event_name = "agent.turn.order_resolved",
                correlation_id = %correlation_id,
                order_found = resolved.is_some(),
                "order lookup completed"
            );
            state = state.with_order(resolved);
            phase = step(phase, TurnEvent::OrderLookupResolved)?;
        }

        let branch = select_branch(&state);
        let reply = self.composer.compose(&state).await.map_err(completion_error)?;
        step(phase, TurnEvent::ResponseComposed)?;

        info!(
            event_name = "agent.turn.finished",
            correlation_id = %correlation_id,
            branch = branch.label(),
            "turn finished"
        );
        Ok(reply)
    }
}

fn step(phase: TurnPhase, event: TurnEvent) -> Result<TurnPhase, ApplicationError> {
    advance(phase, event).map_err(|error| ApplicationError::Domain(DomainError::from(error)))
}

fn completion_error(error: anyhow::Error) -> ApplicationError {
    ApplicationError::Completion(error.to_string())
}
