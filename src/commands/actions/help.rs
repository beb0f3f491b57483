//! Help command handler.
//!
//! Stateless: always returns the same help message.

use log::debug;

use crate::commands::{CommandResult, markdown_response::format_help};

/// Returns formatted help information about available commands.
pub fn handle_help() -> CommandResult {
    debug!("handling help command");

    CommandResult::reply(format_help())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_handle_help() {
        let result = handle_help();
        assert_eq!(result.response, Some(format_help()));
    }
}
