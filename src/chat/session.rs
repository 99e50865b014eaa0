//! Core chat session management.
//!
//! This module provides the `ChatSession` struct: the state machine that
//! owns conversation identity, the single-in-flight pending gate, and the
//! per-request option set, and that orchestrates the optimistic-append →
//! dispatch → conclude sequence for every user action.

use std::fs::File;
use std::io::BufWriter;
use std::path::Path;
use std::sync::{Mutex, MutexGuard};

use serde::{Deserialize, Serialize};
use serde_json::to_writer_pretty;
use time::OffsetDateTime;

use crate::client::Backend;
use crate::error::{Error, Result};
use crate::gate::PendingGate;
use crate::observability;
use crate::observer::SessionObserver;
use crate::types::{
    Attachment, ChatRequest, HistoryEntry, Message, ModelLabel, ModelProbeReport,
    ModelProbeRequest, RequestOptions,
};
use crate::QwenBridge;

/// A chat session against the bridge.
///
/// The session holds all conversation state behind interior mutability so
/// operations take `&self` and independent operations (a send and a
/// metadata refresh, say) may genuinely interleave. Send-class operations
/// (chat, image, probe) are serialized by the pending gate; read-only
/// refreshes are not.
///
/// The lock protecting session state is never held across an await:
/// state is read or mutated in short critical sections between the async
/// steps of an operation.
pub struct ChatSession<B: Backend> {
    backend: B,
    gate: PendingGate,
    state: Mutex<SessionState>,
    observers: Vec<Box<dyn SessionObserver>>,
    started_at: OffsetDateTime,
}

struct SessionState {
    chat_id: Option<String>,
    options: RequestOptions,
    messages: Vec<Message>,
    model_label: ModelLabel,
    available_models: Vec<String>,
    history: Vec<HistoryEntry>,
    request_count: u64,
}

/// Aggregated stats for a chat session.
#[derive(Debug, Clone)]
pub struct SessionStats {
    /// The server-assigned conversation identifier, if one exists.
    pub session_id: Option<String>,
    /// Whether a send-class request is in flight.
    pub pending: bool,
    /// The number of messages in the transcript.
    pub message_count: usize,
    /// The number of send-class requests dispatched.
    pub request_count: u64,
    /// The displayed model label.
    pub model: ModelLabel,
    /// How many models the last refresh reported.
    pub available_models: usize,
    /// How many history summaries the last refresh reported.
    pub history_entries: usize,
    /// When this session object was created.
    pub started_at: OffsetDateTime,
}

impl ChatSession<QwenBridge> {
    /// Creates a new chat session backed by the given bridge client.
    pub fn new(client: QwenBridge) -> Self {
        Self::with_backend(client)
    }
}

impl<B: Backend> ChatSession<B> {
    /// Creates a new chat session over any backend implementation.
    pub fn with_backend(backend: B) -> Self {
        Self {
            backend,
            gate: PendingGate::new(),
            state: Mutex::new(SessionState {
                chat_id: None,
                options: RequestOptions::default(),
                messages: Vec::new(),
                model_label: ModelLabel::Unknown,
                available_models: Vec::new(),
                history: Vec::new(),
                request_count: 0,
            }),
            observers: Vec::new(),
            started_at: OffsetDateTime::now_utc(),
        }
    }

    /// Registers an observer. Subscribe before sharing the session; the
    /// observer set is fixed once operations start.
    pub fn subscribe(&mut self, observer: Box<dyn SessionObserver>) {
        self.observers.push(observer);
    }

    fn state(&self) -> MutexGuard<'_, SessionState> {
        self.state.lock().expect("session state lock poisoned")
    }

    fn notify<F: Fn(&dyn SessionObserver)>(&self, f: F) {
        for observer in &self.observers {
            f(observer.as_ref());
        }
    }

    /// Returns the current conversation identifier, if any.
    pub fn chat_id(&self) -> Option<String> {
        self.state().chat_id.clone()
    }

    /// Returns true while a send-class request is in flight.
    pub fn pending(&self) -> bool {
        self.gate.is_engaged()
    }

    /// Returns a snapshot of the transcript.
    pub fn messages(&self) -> Vec<Message> {
        self.state().messages.clone()
    }

    /// Returns the number of messages in the transcript.
    pub fn message_count(&self) -> usize {
        self.state().messages.len()
    }

    /// Returns a snapshot of the request options.
    pub fn options(&self) -> RequestOptions {
        self.state().options.clone()
    }

    /// Returns the displayed model label.
    pub fn model_label(&self) -> ModelLabel {
        self.state().model_label.clone()
    }

    /// Returns the model names from the last successful refresh.
    pub fn available_models(&self) -> Vec<String> {
        self.state().available_models.clone()
    }

    /// Returns the history summaries from the last successful refresh.
    pub fn history(&self) -> Vec<HistoryEntry> {
        self.state().history.clone()
    }

    /// Selects the agent preset for the next send, or clears it.
    pub fn select_agent(&self, agent_name: Option<String>) {
        let snapshot = {
            let mut state = self.state();
            state.options.agent_name = agent_name;
            state.options.clone()
        };
        self.notify(|o| o.options_changed(&snapshot));
    }

    /// Enables or disables web search for sends.
    pub fn set_web_search(&self, enabled: bool) {
        let snapshot = {
            let mut state = self.state();
            state.options.use_web_search = enabled;
            state.options.clone()
        };
        self.notify(|o| o.options_changed(&snapshot));
    }

    /// Enables or disables thinking mode for sends.
    pub fn set_thinking_mode(&self, enabled: bool) {
        let snapshot = {
            let mut state = self.state();
            state.options.thinking_mode = enabled;
            state.options.clone()
        };
        self.notify(|o| o.options_changed(&snapshot));
    }

    /// Attaches a file to the next send.
    pub fn attach(&self, attachment: Attachment) {
        let snapshot = {
            let mut state = self.state();
            state.options.attachments.push(attachment);
            state.options.clone()
        };
        self.notify(|o| o.options_changed(&snapshot));
    }

    /// Removes all pending attachments.
    pub fn clear_attachments(&self) {
        let snapshot = {
            let mut state = self.state();
            state.options.attachments.clear();
            state.options.clone()
        };
        self.notify(|o| o.options_changed(&snapshot));
    }

    /// Sends a user message through the bridge.
    ///
    /// The user's message is appended to the transcript before the
    /// network call is issued. On success the assistant's reply is
    /// appended and the server-returned `chat_id` becomes the session
    /// identifier. On failure an inline error message is appended, the
    /// identifier is left unchanged, and the error is also returned.
    ///
    /// The call is a no-op when the trimmed text is empty with no
    /// attachments, or when another send-class request is in flight. The
    /// pending gate releases on every exit path.
    pub async fn submit_message(&self, text: &str) -> Result<()> {
        let text = text.trim();
        if text.is_empty() && self.state().options.attachments.is_empty() {
            return Ok(());
        }
        let Some(permit) = self.gate.try_engage() else {
            observability::SESSION_GATE_REJECTIONS.click();
            return Ok(());
        };
        observability::SESSION_SENDS.click();
        self.notify(|o| o.pending_changed(true));
        self.append_message(Message::user(text));

        let (request, attachments) = self.take_request(text);
        let outcome = if attachments.is_empty() {
            self.backend.chat(&request).await
        } else {
            self.backend.chat_with_files(&request, &attachments).await
        };

        drop(permit);
        self.notify(|o| o.pending_changed(false));

        match outcome {
            Ok(exchange) => {
                self.adopt_chat_id(&exchange.chat_id);
                self.append_message(Message::assistant(exchange.response));
                Ok(())
            }
            Err(err) => {
                self.append_message(Message::error(err.to_string()));
                Err(err)
            }
        }
    }

    /// Requests an image from the bridge.
    ///
    /// Same contract as [`ChatSession::submit_message`]: optimistic user
    /// echo, single gated request, unconditional gate release, `chat_id`
    /// adoption on success. The success payload is appended as an image
    /// reference rather than text.
    pub async fn request_image(&self, prompt: &str) -> Result<()> {
        let prompt = prompt.trim();
        if prompt.is_empty() {
            return Ok(());
        }
        let Some(permit) = self.gate.try_engage() else {
            observability::SESSION_GATE_REJECTIONS.click();
            return Ok(());
        };
        observability::SESSION_IMAGES.click();
        self.notify(|o| o.pending_changed(true));
        self.append_message(Message::user(prompt));
        {
            let mut state = self.state();
            state.request_count += 1;
        }

        let outcome = self.backend.generate_image(prompt).await;

        drop(permit);
        self.notify(|o| o.pending_changed(false));

        match outcome {
            Ok(exchange) => {
                self.adopt_chat_id(&exchange.chat_id);
                self.append_message(Message::image(exchange.image_url));
                Ok(())
            }
            Err(err) => {
                self.append_message(Message::error(err.to_string()));
                Err(err)
            }
        }
    }

    /// Probes a set of models with one prompt.
    ///
    /// Probing runs under the same pending gate as sends; a probe started
    /// while another send-class request is in flight returns `Ok(None)`
    /// without dispatching. The report does not enter the transcript; it
    /// is surfaced through the observer and the return value.
    pub async fn probe_models(
        &self,
        prompt: &str,
        models: Vec<String>,
    ) -> Result<Option<ModelProbeReport>> {
        let Some(permit) = self.gate.try_engage() else {
            observability::SESSION_GATE_REJECTIONS.click();
            return Ok(None);
        };
        observability::SESSION_PROBES.click();
        self.notify(|o| o.pending_changed(true));
        {
            let mut state = self.state();
            state.request_count += 1;
        }

        let request = ModelProbeRequest::new(prompt, models);
        let outcome = self.backend.probe_models(&request).await;

        drop(permit);
        self.notify(|o| o.pending_changed(false));

        let report = outcome?;
        self.notify(|o| o.models_probed(&report));
        Ok(Some(report))
    }

    /// Starts a new conversation.
    ///
    /// Clears the identifier, the transcript, and every request option.
    /// Rejected while a request is in flight: an in-flight response must
    /// not append into a cleared transcript or re-adopt a stale
    /// identifier. Returns true if the session was reset.
    pub fn start_new_session(&self) -> bool {
        if self.gate.is_engaged() {
            return false;
        }
        {
            let mut state = self.state();
            state.chat_id = None;
            state.messages.clear();
            state.options = RequestOptions::default();
        }
        self.notify(|o| o.session_reset());
        true
    }

    /// Refreshes the displayed model name and the available-model list.
    ///
    /// The two fetches run concurrently and independently. A failed name
    /// fetch degrades the label to [`ModelLabel::Unavailable`]; a failed
    /// list fetch leaves the previous list in place. Neither failure is
    /// returned: refreshes degrade, they do not block other operations.
    pub async fn refresh_model_metadata(&self) {
        let (name, models) = futures::join!(self.backend.model_name(), self.backend.list_models());

        let label = match name {
            Ok(name) => ModelLabel::Named(name),
            Err(err) => {
                observability::SESSION_REFRESH_FAILURES.click();
                self.notify(|o| o.metadata_error(&err));
                ModelLabel::Unavailable
            }
        };
        self.state().model_label = label.clone();
        self.notify(|o| o.model_label_changed(&label));

        match models {
            Ok(models) => {
                self.state().available_models = models.clone();
                self.notify(|o| o.models_listed(&models));
            }
            Err(err) => {
                observability::SESSION_REFRESH_FAILURES.click();
                self.notify(|o| o.metadata_error(&err));
            }
        }
    }

    /// Refreshes the conversation history summaries.
    ///
    /// A failure leaves the previous summaries in place and degrades to
    /// an observer diagnostic.
    pub async fn refresh_history(&self) {
        match self.backend.history().await {
            Ok(entries) => {
                self.state().history = entries.clone();
                self.notify(|o| o.history_updated(&entries));
            }
            Err(err) => {
                observability::SESSION_REFRESH_FAILURES.click();
                self.notify(|o| o.metadata_error(&err));
            }
        }
    }

    /// Returns the current session statistics snapshot.
    pub fn stats(&self) -> SessionStats {
        let state = self.state();
        SessionStats {
            session_id: state.chat_id.clone(),
            pending: self.gate.is_engaged(),
            message_count: state.messages.len(),
            request_count: state.request_count,
            model: state.model_label.clone(),
            available_models: state.available_models.len(),
            history_entries: state.history.len(),
            started_at: self.started_at,
        }
    }

    /// Saves the transcript to the specified path as versioned JSON.
    pub fn save_transcript_to<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let transcript = TranscriptFile::new(&self.state().messages);
        let file = File::create(path.as_ref())
            .map_err(|err| Error::io("failed to create transcript file", err))?;
        let writer = BufWriter::new(file);
        to_writer_pretty(writer, &transcript).map_err(|err| {
            Error::serialization("failed to serialize transcript", Some(Box::new(err)))
        })
    }

    fn append_message(&self, message: Message) {
        self.state().messages.push(message.clone());
        self.notify(|o| o.message_appended(&message));
    }

    /// Builds the outgoing request and consumes the single-use options:
    /// the agent selection and the attachment list. The web-search and
    /// thinking-mode flags are copied, not consumed.
    fn take_request(&self, prompt: &str) -> (ChatRequest, Vec<Attachment>) {
        let (request, attachments, snapshot) = {
            let mut state = self.state();
            let agent_name = state.options.agent_name.take();
            let attachments = std::mem::take(&mut state.options.attachments);
            let request = ChatRequest {
                prompt: prompt.to_string(),
                chat_id: state.chat_id.clone(),
                agent_name,
                use_web_search: state.options.use_web_search,
                thinking_mode: state.options.thinking_mode,
            };
            state.request_count += 1;
            (request, attachments, state.options.clone())
        };
        self.notify(|o| o.options_changed(&snapshot));
        (request, attachments)
    }

    /// Adopts the server-returned conversation identifier. This is the
    /// sole place session identity is assigned or changed outside of
    /// [`ChatSession::start_new_session`].
    fn adopt_chat_id(&self, chat_id: &str) {
        let changed = {
            let mut state = self.state();
            if state.chat_id.as_deref() == Some(chat_id) {
                false
            } else {
                state.chat_id = Some(chat_id.to_string());
                true
            }
        };
        if changed {
            self.notify(|o| o.session_started(chat_id));
        }
    }
}

#[derive(Serialize, Deserialize)]
struct TranscriptFile {
    version: u8,
    messages: Vec<Message>,
}

impl TranscriptFile {
    fn new(messages: &[Message]) -> Self {
        Self {
            version: 1,
            messages: messages.to_vec(),
        }
    }
}

#[cfg(test)]
mod tests {
    use async_trait::async_trait;

    use super::*;
    use crate::types::{ChatExchange, ImageExchange};

    /// Backend that fails every call; session construction and synchronous
    /// operations never reach it.
    struct UnreachableBackend;

    #[async_trait]
    impl Backend for UnreachableBackend {
        async fn chat(&self, _request: &ChatRequest) -> Result<ChatExchange> {
            Err(Error::unknown("unreachable"))
        }

        async fn chat_with_files(
            &self,
            _request: &ChatRequest,
            _files: &[Attachment],
        ) -> Result<ChatExchange> {
            Err(Error::unknown("unreachable"))
        }

        async fn generate_image(&self, _prompt: &str) -> Result<ImageExchange> {
            Err(Error::unknown("unreachable"))
        }

        async fn model_name(&self) -> Result<String> {
            Err(Error::unknown("unreachable"))
        }

        async fn list_models(&self) -> Result<Vec<String>> {
            Err(Error::unknown("unreachable"))
        }

        async fn history(&self) -> Result<Vec<HistoryEntry>> {
            Err(Error::unknown("unreachable"))
        }

        async fn probe_models(&self, _request: &ModelProbeRequest) -> Result<ModelProbeReport> {
            Err(Error::unknown("unreachable"))
        }
    }

    #[test]
    fn new_session_empty() {
        let session = ChatSession::with_backend(UnreachableBackend);
        assert!(session.chat_id().is_none());
        assert!(!session.pending());
        assert_eq!(session.message_count(), 0);
        assert!(session.options().is_empty());
        assert_eq!(session.model_label(), ModelLabel::Unknown);
    }

    #[test]
    fn options_accumulate_before_send() {
        let session = ChatSession::with_backend(UnreachableBackend);
        session.select_agent(Some("Code Assistant".to_string()));
        session.set_web_search(true);
        session.set_thinking_mode(true);
        session.attach(Attachment::new("a.txt", &b"a"[..]));
        session.attach(Attachment::new("b.txt", &b"b"[..]));

        let options = session.options();
        assert_eq!(options.agent_name.as_deref(), Some("Code Assistant"));
        assert!(options.use_web_search);
        assert!(options.thinking_mode);
        assert_eq!(options.attachments.len(), 2);

        session.clear_attachments();
        assert!(session.options().attachments.is_empty());
    }

    #[test]
    fn new_session_clears_everything() {
        let session = ChatSession::with_backend(UnreachableBackend);
        session.select_agent(Some("Web Dev".to_string()));
        session.set_web_search(true);
        assert!(session.start_new_session());
        assert!(session.chat_id().is_none());
        assert_eq!(session.message_count(), 0);
        assert!(session.options().is_empty());
    }

    #[test]
    fn stats_snapshot() {
        let session = ChatSession::with_backend(UnreachableBackend);
        let stats = session.stats();
        assert!(stats.session_id.is_none());
        assert!(!stats.pending);
        assert_eq!(stats.message_count, 0);
        assert_eq!(stats.request_count, 0);
        assert_eq!(stats.model, ModelLabel::Unknown);
    }

    #[tokio::test]
    async fn empty_submit_is_a_noop() {
        let session = ChatSession::with_backend(UnreachableBackend);
        session.submit_message("   ").await.unwrap();
        assert_eq!(session.message_count(), 0);
        assert!(!session.pending());
    }

    #[tokio::test]
    async fn empty_image_prompt_is_a_noop() {
        let session = ChatSession::with_backend(UnreachableBackend);
        session.request_image("").await.unwrap();
        assert_eq!(session.message_count(), 0);
    }
}
