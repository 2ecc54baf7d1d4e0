use std::io::{self, BufRead, Write};
use std::sync::Arc;

use clerky_agent::llm::HttpCompletionClient;
use clerky_agent::runtime::AgentRuntime;
use clerky_core::catalog::Catalog;
use clerky_core::config::{AppConfig, LoadOptions};

use super::CommandResult;

/// Line-oriented interactive session. Each stdin line is one turn and runs
/// to completion before the next line is read, so turns never overlap. A
/// failed turn prints a notice and the session continues.
pub fn run() -> CommandResult {
    let config = match AppConfig::load(LoadOptions::default()) {
        Ok(config) => config,
        Err(error) => {
            return CommandResult::failure("chat", "config_validation", error.to_string(), 2)
        }
    };

    let client = match HttpCompletionClient::from_config(&config.llm) {
        Ok(client) => Arc::new(client),
        Err(error) => return CommandResult::failure("chat", "client_init", error.to_string(), 3),
    };

    let runtime = match AgentRuntime::new(Arc::new(Catalog::seed()), client) {
        Ok(runtime) => runtime,
        Err(error) => return CommandResult::failure("chat", "runtime_init", error.to_string(), 3),
    };

    let async_runtime = match tokio::runtime::Builder::new_current_thread().enable_all().build() {
        Ok(async_runtime) => async_runtime,
        Err(error) => {
            return CommandResult::failure(
                "chat",
                "runtime_init",
                format!("failed to initialize async runtime: {error}"),
                3,
            )
        }
    };

    let stdin = io::stdin();
    let mut stdout = io::stdout();
    let mut turns = 0u32;

    let _ = writeln!(stdout, "clerky ready - ask about phones or orders (ctrl-d to exit)");
    for line in stdin.lock().lines() {
        let message = match line {
            Ok(message) => message,
            Err(_) => break,
        };
        if message.trim().is_empty() {
            continue;
        }

        match async_runtime.block_on(runtime.handle_message(message.trim())) {
            Ok(reply) => {
                let _ = writeln!(stdout, "{reply}");
            }
            Err(error) => {
                let _ = writeln!(stdout, "[turn failed: {error}]");
            }
        }
        turns += 1;
    }

    CommandResult::success("chat", format!("chat session ended after {turns} turn(s)"))
}
