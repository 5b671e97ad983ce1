use std::io::{BufRead, IsTerminal};

use dialoguer::Input;

use crate::error::{ImportError, Result};
use crate::payees::PayeeResolver;

/// Asks on the terminal, or reads answers line by line when stdin is piped.
pub struct TerminalResolver;

impl PayeeResolver for TerminalResolver {
    fn resolve(&mut self, cleaned: &str) -> Result<String> {
        let stdin = std::io::stdin();
        if stdin.is_terminal() {
            let answer: String = Input::new()
                .with_prompt(format!("Enter payee [{cleaned}]"))
                .allow_empty(true)
                .interact_text()?;
            return Ok(answer);
        }
        let mut line = String::new();
        if stdin.lock().read_line(&mut line)? == 0 {
            return Err(ImportError::PromptClosed);
        }
        Ok(line.trim_end_matches(['\r', '\n']).to_string())
    }
}
