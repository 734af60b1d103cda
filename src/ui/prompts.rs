//! Interactive confirmation prompts.

use console::Term;
use dialoguer::Confirm;

use crate::error::{Result, StoreforgeError};

use super::{parse_yes, Prompt};

/// Convert dialoguer errors to StoreforgeError.
fn map_dialoguer_err(e: dialoguer::Error) -> StoreforgeError {
    StoreforgeError::Io(e.into())
}

/// Ask a yes/no question on the terminal.
pub fn prompt_user(prompt: &Prompt, term: &Term) -> Result<bool> {
    Confirm::new()
        .with_prompt(&prompt.question)
        .default(confirm_default(prompt))
        .interact_on(term)
        .map_err(map_dialoguer_err)
}

/// Confirmation prompts never default to yes unless the prompt says so.
fn confirm_default(prompt: &Prompt) -> bool {
    prompt.default.as_deref().is_some_and(parse_yes)
}
