//! State-change notifications for presentation layers.
//!
//! The session core never renders anything. Anything that wants to show
//! session state (a terminal transcript, a test harness) implements
//! [`SessionObserver`] and subscribes before the session is shared. Every
//! method defaults to a no-op so observers implement only what they show.

use crate::error::Error;
use crate::types::{HistoryEntry, Message, ModelLabel, ModelProbeReport, RequestOptions};

/// Observer of chat-session state changes.
///
/// Callbacks run inline on the task driving the session operation; keep
/// them short and non-blocking.
pub trait SessionObserver: Send + Sync {
    /// A message was appended to the transcript.
    fn message_appended(&self, message: &Message) {
        _ = message;
    }

    /// The bridge assigned or confirmed a conversation identifier.
    fn session_started(&self, chat_id: &str) {
        _ = chat_id;
    }

    /// The session was reset: transcript, identifier, and options cleared.
    fn session_reset(&self) {}

    /// The pending gate engaged or released.
    fn pending_changed(&self, pending: bool) {
        _ = pending;
    }

    /// A request option changed.
    fn options_changed(&self, options: &RequestOptions) {
        _ = options;
    }

    /// The displayed model label changed.
    fn model_label_changed(&self, label: &ModelLabel) {
        _ = label;
    }

    /// The available-model list was refreshed.
    fn models_listed(&self, models: &[String]) {
        _ = models;
    }

    /// The conversation history summaries were refreshed.
    fn history_updated(&self, entries: &[HistoryEntry]) {
        _ = entries;
    }

    /// A model probe completed.
    fn models_probed(&self, report: &ModelProbeReport) {
        _ = report;
    }

    /// A metadata or history refresh failed; the session degraded to a
    /// placeholder instead of surfacing the error.
    fn metadata_error(&self, error: &Error) {
        _ = error;
    }
}
