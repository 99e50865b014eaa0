//! Terminal output for chat transcripts.
//!
//! This module provides a [`SessionObserver`] implementation that prints
//! transcript messages and session events as plain text, with optional
//! ANSI styling.

use crate::error::Error;
use crate::observer::SessionObserver;
use crate::types::{HistoryEntry, Message, ModelLabel, ModelProbeReport, Sender};

/// ANSI escape code for dim text (used for session events).
const ANSI_DIM: &str = "\x1b[2m";

/// ANSI escape code to reset all styling.
const ANSI_RESET: &str = "\x1b[0m";

/// ANSI escape code for cyan text (used for assistant output).
const ANSI_CYAN: &str = "\x1b[36m";

/// ANSI escape code for red text (used for errors).
const ANSI_RED: &str = "\x1b[31m";

/// Prints transcript messages and session events to stdout.
///
/// The user's own messages are not echoed: the terminal already shows
/// what the user typed at the prompt.
pub struct TranscriptRenderer {
    use_color: bool,
}

impl TranscriptRenderer {
    /// Creates a renderer with ANSI styling enabled.
    pub fn new() -> Self {
        Self { use_color: true }
    }

    /// Creates a renderer with ANSI styling controlled by the caller.
    pub fn with_color(use_color: bool) -> Self {
        Self { use_color }
    }

    fn paint(&self, code: &str, text: &str) -> String {
        if self.use_color {
            format!("{code}{text}{ANSI_RESET}")
        } else {
            text.to_string()
        }
    }

    /// Print an informational message.
    pub fn print_info(&self, info: &str) {
        println!("{}", self.paint(ANSI_DIM, info));
    }

    /// Print an error message.
    pub fn print_error(&self, error: &str) {
        eprintln!("{}", self.paint(ANSI_RED, error));
    }
}

impl Default for TranscriptRenderer {
    fn default() -> Self {
        Self::new()
    }
}

impl SessionObserver for TranscriptRenderer {
    fn message_appended(&self, message: &Message) {
        match message.sender {
            Sender::User => {}
            Sender::Assistant if message.is_image => {
                println!("{}", self.paint(ANSI_CYAN, &format!("[image] {}", message.content)));
            }
            Sender::Assistant => {
                println!("{}", self.paint(ANSI_CYAN, &message.content));
            }
            Sender::Error => {
                self.print_error(&message.content);
            }
        }
    }

    fn session_started(&self, chat_id: &str) {
        self.print_info(&format!("(conversation {chat_id})"));
    }

    fn session_reset(&self) {
        self.print_info("(new conversation)");
    }

    fn model_label_changed(&self, label: &ModelLabel) {
        self.print_info(&format!("(model: {label})"));
    }

    fn history_updated(&self, entries: &[HistoryEntry]) {
        for entry in entries {
            self.print_info(&format!("  {}  {}", entry.id, entry.title));
        }
    }

    fn models_probed(&self, report: &ModelProbeReport) {
        self.print_info(&format!(
            "Probe: {}/{} models answered",
            report.working_count, report.total_tested
        ));
        for name in &report.working_models {
            self.print_info(&format!("  ok      {name}"));
        }
        for name in &report.failed_models {
            self.print_info(&format!("  failed  {name}"));
        }
    }

    fn metadata_error(&self, error: &Error) {
        self.print_info(&format!("(refresh failed: {error})"));
    }
}
