//! Agent runtime - intent routing over a static retail catalog
//!
//! This crate is the conversational core of clerky. Per incoming message it:
//! - classifies the message for product and order relevance (two independent
//!   binary checks against the completion capability)
//! - extracts a product phrase or order number when a check comes back
//!   positive, and resolves it against the catalog
//! - composes the reply through one of five response templates
//!
//! # Architecture
//!
//! One turn is a fixed, strictly sequential pipeline:
//! 1. **Classification** (`classifier`) - product check, then order check
//! 2. **Extraction** (`extractor`) - pull the search key out of free text
//! 3. **Resolution** (`clerky-core::catalog`) - deterministic linear scans
//! 4. **Composition** (`composer`) - branch selection + one prose call
//!
//! The router transition table lives in `clerky-core::turn`; the runtime
//! here drives it and refuses to revisit a completed stage.
//!
//! # Key Types
//!
//! - `AgentRuntime` - turn orchestrator (see `runtime` module)
//! - `CompletionClient` - pluggable seam for the text-completion provider,
//!   so scripted doubles can replace a live endpoint in tests
//!
//! # Trust boundary
//!
//! The completion capability decides *relevance* and renders *prose*. It
//! never touches the catalog: lookups are deterministic scans, and the
//! composer only hands the model facts it interpolated itself.

pub mod classifier;
pub mod composer;
pub mod extractor;
pub mod llm;
pub mod prompts;
pub mod runtime;
