use std::sync::Arc;

use clerky_agent::llm::HttpCompletionClient;
use clerky_agent::runtime::AgentRuntime;
use clerky_core::catalog::Catalog;
use clerky_core::config::{AppConfig, LoadOptions};

use super::CommandResult;

pub fn run(message: &str) -> CommandResult {
    let config = match AppConfig::load(LoadOptions::default()) {
        Ok(config) => config,
        Err(error) => {
            return CommandResult::failure("ask", "config_validation", error.to_string(), 2)
        }
    };

    let client = match HttpCompletionClient::from_config(&config.llm) {
        Ok(client) => Arc::new(client),
        Err(error) => return CommandResult::failure("ask", "client_init", error.to_string(), 3),
    };

    let runtime = match AgentRuntime::new(Arc::new(Catalog::seed()), client) {
        Ok(runtime) => runtime,
        Err(error) => return CommandResult::failure("ask", "runtime_init", error.to_string(), 3),
    };

    let async_runtime = match tokio::runtime::Builder::new_current_thread().enable_all().build() {
        Ok(async_runtime) => async_runtime,
        Err(error) => {
            return CommandResult::failure(
                "ask",
                "runtime_init",
                format!("failed to initialize async runtime: {error}"),
                3,
            )
        }
    };

    match async_runtime.block_on(runtime.handle_message(message)) {
        Ok(reply) => CommandResult::success("ask", reply),
        Err(error) => CommandResult::failure("ask", "turn_failed", error.to_string(), 4),
    }
}
