//! Interactive user interface components.
//!
//! This module provides:
//! - [`UserInterface`] trait for UI abstraction
//! - [`TerminalUI`] for interactive terminal usage
//! - [`NonInteractiveUI`] for CI/headless environments
//! - [`MockUI`] for tests
//! - Prompts, spinners, summaries, and tables
//!
//! # Example
//!
//! ```
//! use storeforge::ui::{create_ui, OutputMode, Summary};
//!
//! // Use non-interactive mode for testability
//! let mut ui = create_ui(false, OutputMode::Quiet);
//! ui.show_header("Migration");
//! ui.show_summary(&Summary::new("apply-migration").count("migrated", 3).count("skipped", 0));
//! ```

pub mod mock;
pub mod non_interactive;
pub mod output;
pub mod prompts;
pub mod spinner;
pub mod table;
pub mod terminal;
pub mod theme;

pub use mock::{MockSpinner, MockUI};
pub use non_interactive::NonInteractiveUI;
pub use output::OutputMode;
pub use prompts::prompt_user;
pub use spinner::ProgressSpinner;
pub use table::Table;
pub use terminal::{create_ui, TerminalUI};
pub use theme::{should_use_colors, StoreforgeTheme};

use crate::error::Result;

/// Trait for user interface interactions.
///
/// This trait allows mocking the UI in tests.
pub trait UserInterface {
    /// Get the current output mode.
    fn output_mode(&self) -> OutputMode;

    /// Change the output mode (settings may lower the default).
    fn set_output_mode(&mut self, mode: OutputMode);

    /// Display a message to the user.
    fn message(&mut self, msg: &str);

    /// Display a success message.
    fn success(&mut self, msg: &str);

    /// Display a warning message.
    fn warning(&mut self, msg: &str);

    /// Display an error message.
    fn error(&mut self, msg: &str);

    /// Ask a yes/no question. Anything but an explicit yes is a no.
    fn prompt(&mut self, prompt: &Prompt) -> Result<bool>;

    /// Start a spinner for an operation.
    fn start_spinner(&mut self, message: &str) -> Box<dyn SpinnerHandle>;

    /// Show a header/banner.
    fn show_header(&mut self, title: &str);

    /// Show the end-of-command summary.
    fn show_summary(&mut self, summary: &Summary);

    /// Check if running in interactive mode.
    fn is_interactive(&self) -> bool;
}

/// Handle for controlling a spinner.
pub trait SpinnerHandle {
    /// Update the spinner message.
    fn set_message(&mut self, msg: &str);

    /// Mark the operation as successful.
    fn finish_success(&mut self, msg: &str);

    /// Mark the operation as failed.
    fn finish_error(&mut self, msg: &str);
}

/// A yes/no question to show to the user.
#[derive(Debug, Clone)]
pub struct Prompt {
    /// Unique key for the prompt (used for scripted answers).
    pub key: String,
    /// The question to display.
    pub question: String,
    /// Default value if user just presses enter.
    pub default: Option<String>,
}

impl Prompt {
    /// A yes/no question that defaults to no.
    pub fn confirm(key: &str, question: impl Into<String>) -> Self {
        Self {
            key: key.to_string(),
            question: question.into(),
            default: Some("false".to_string()),
        }
    }
}

/// Parse a scripted confirmation answer.
pub(crate) fn parse_yes(value: &str) -> bool {
    matches!(
        value.trim().to_lowercase().as_str(),
        "y" | "yes" | "true" | "1"
    )
}

/// Structured end-of-command summary.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Summary {
    /// Command name.
    pub title: String,
    /// Labelled counts, in display order.
    pub counts: Vec<(String, usize)>,
    /// Whether the command succeeded overall.
    pub success: bool,
    /// Follow-up notes shown after the counts.
    pub notes: Vec<String>,
}

impl Summary {
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            counts: Vec::new(),
            success: true,
            notes: Vec::new(),
        }
    }

    /// Add a labelled count.
    pub fn count(mut self, label: &str, value: usize) -> Self {
        self.counts.push((label.to_string(), value));
        self
    }

    /// Set the overall outcome.
    pub fn success(mut self, success: bool) -> Self {
        self.success = success;
        self
    }

    /// Add a follow-up note.
    pub fn note(mut self, note: impl Into<String>) -> Self {
        self.notes.push(note.into());
        self
    }

    /// Look up a count by label.
    pub fn get(&self, label: &str) -> Option<usize> {
        self.counts
            .iter()
            .find(|(l, _)| l == label)
            .map(|(_, v)| *v)
    }

    /// `migrated 3 · skipped 0 · errors 1`
    pub fn counts_line(&self) -> String {
        self.counts
            .iter()
            .map(|(label, value)| format!("{} {}", label, value))
            .collect::<Vec<_>>()
            .join(" · ")
    }
}
