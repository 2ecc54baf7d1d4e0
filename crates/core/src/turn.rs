use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::catalog::ResolvedOrder;
use crate::domain::product::Product;

/// Per-turn working state. Created fresh for each incoming message, rebuilt
/// through pure transforms as the router advances, and dropped once the
/// response is returned. `products: None` means no product lookup was
/// attempted; `Some(vec![])` means a lookup ran and found nothing.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct TurnState {
    pub message: String,
    pub products: Option<Vec<Product>>,
    pub order: Option<ResolvedOrder>,
    pub response: Option<String>,
}

impl TurnState {
    pub fn new(message: impl Into<String>) -> Self {
        Self { message: message.into(), ..Self::default() }
    }

    pub fn with_products(self, products: Vec<Product>) -> Self {
        Self { products: Some(products), ..self }
    }

    pub fn with_order(self, order: Option<ResolvedOrder>) -> Self {
        Self { order, ..self }
    }

    pub fn with_response(self, response: impl Into<String>) -> Self {
        Self { response: Some(response.into()), ..self }
    }
}

/// Router positions. One pass per turn: Start -> ProductChecked ->
/// [ProductResolved] -> OrderChecked -> [OrderResolved] -> Done. The two
/// resolution states are skipped when the matching classification came back
/// negative. No transition re-enters an earlier state.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum TurnPhase {
    Start,
    ProductChecked,
    ProductResolved,
    OrderChecked,
    OrderResolved,
    Done,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum TurnEvent {
    ProductCheckCompleted,
    ProductLookupResolved,
    OrderCheckCompleted,
    OrderLookupResolved,
    ResponseComposed,
}

#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum TurnTransitionError {
    #[error("invalid turn transition from {phase:?} using event {event:?}")]
    InvalidTransition { phase: TurnPhase, event: TurnEvent },
}

/// Advance the router. Rejects any edge not on the DAG, including attempts
/// to revisit a completed stage within the same turn.
pub fn advance(phase: TurnPhase, event: TurnEvent) -> Result<TurnPhase, TurnTransitionError> {
    use TurnEvent::{
        OrderCheckCompleted, OrderLookupResolved, ProductCheckCompleted, ProductLookupResolved,
        ResponseComposed,
    };
    use TurnPhase::{Done, OrderChecked, OrderResolved, ProductChecked, ProductResolved, Start};

    let next = match (phase, event) {
        (Start, ProductCheckCompleted) => ProductChecked,
        (ProductChecked, ProductLookupResolved) => ProductResolved,
        (ProductChecked, OrderCheckCompleted) | (ProductResolved, OrderCheckCompleted) => {
            OrderChecked
        }
        (OrderChecked, OrderLookupResolved) => OrderResolved,
        (OrderChecked, ResponseComposed) | (OrderResolved, ResponseComposed) => Done,
        _ => return Err(TurnTransitionError::InvalidTransition { phase, event }),
    };

    Ok(next)
}
