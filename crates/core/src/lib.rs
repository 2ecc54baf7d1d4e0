pub mod catalog;
pub mod config;
pub mod domain;
pub mod errors;
pub mod turn;

pub use catalog::{Catalog, ResolvedOrder};
pub use domain::order::{Order, OrderId, OrderStatus};
pub use domain::product::{Product, ProductId, SpecValue};
pub use errors::{ApplicationError, DomainError, InterfaceError};
pub use turn::{advance, TurnEvent, TurnPhase, TurnState, TurnTransitionError};
