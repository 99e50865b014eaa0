//! State-machine tests for the chat session, run against a scripted
//! backend. No network is involved.

use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;

use qwintus::chat::ChatSession;
use qwintus::types::{
    Attachment, ChatExchange, ChatRequest, HistoryEntry, ImageExchange, Message, ModelLabel,
    ModelProbeReport, ModelProbeRequest, Sender,
};
use qwintus::{Backend, Error, Result, SessionObserver};

/// Scripted backend: canned replies, recorded requests, optional delay so
/// tests can observe the session mid-flight.
#[derive(Default)]
struct ScriptedBackend {
    chat_replies: Mutex<VecDeque<Result<ChatExchange>>>,
    chat_requests: Mutex<Vec<ChatRequest>>,
    multipart_requests: Mutex<Vec<(ChatRequest, usize)>>,
    image_replies: Mutex<VecDeque<Result<ImageExchange>>>,
    model_names: Mutex<VecDeque<Result<String>>>,
    model_name_calls: AtomicUsize,
    model_lists: Mutex<VecDeque<Result<Vec<String>>>>,
    history_replies: Mutex<VecDeque<Result<Vec<HistoryEntry>>>>,
    probe_replies: Mutex<VecDeque<Result<ModelProbeReport>>>,
    chat_delay: Option<Duration>,
}

impl ScriptedBackend {
    fn new() -> Self {
        Self::default()
    }

    fn with_chat_delay(delay: Duration) -> Self {
        Self {
            chat_delay: Some(delay),
            ..Self::default()
        }
    }

    fn script_chat(&self, reply: Result<ChatExchange>) {
        self.chat_replies.lock().unwrap().push_back(reply);
    }

    fn script_image(&self, reply: Result<ImageExchange>) {
        self.image_replies.lock().unwrap().push_back(reply);
    }

    fn script_model_name(&self, reply: Result<String>) {
        self.model_names.lock().unwrap().push_back(reply);
    }

    fn script_model_list(&self, reply: Result<Vec<String>>) {
        self.model_lists.lock().unwrap().push_back(reply);
    }

    fn script_history(&self, reply: Result<Vec<HistoryEntry>>) {
        self.history_replies.lock().unwrap().push_back(reply);
    }

    fn script_probe(&self, reply: Result<ModelProbeReport>) {
        self.probe_replies.lock().unwrap().push_back(reply);
    }

    fn chat_requests(&self) -> Vec<ChatRequest> {
        self.chat_requests.lock().unwrap().clone()
    }

    fn multipart_requests(&self) -> Vec<(ChatRequest, usize)> {
        self.multipart_requests.lock().unwrap().clone()
    }
}

fn exchange(chat_id: &str, response: &str) -> ChatExchange {
    ChatExchange {
        chat_id: chat_id.to_string(),
        response: response.to_string(),
    }
}

/// Shared handle to a `ScriptedBackend`. The orphan rule forbids
/// implementing the foreign `Backend` trait directly for
/// `Arc<ScriptedBackend>`, so tests wrap the shared state in this local
/// newtype and reach the inner fields through `Deref`.
#[derive(Clone, Default)]
struct SharedBackend(Arc<ScriptedBackend>);

impl SharedBackend {
    fn new() -> Self {
        SharedBackend(Arc::new(ScriptedBackend::new()))
    }

    fn with_chat_delay(delay: Duration) -> Self {
        SharedBackend(Arc::new(ScriptedBackend::with_chat_delay(delay)))
    }
}

impl std::ops::Deref for SharedBackend {
    type Target = ScriptedBackend;

    fn deref(&self) -> &ScriptedBackend {
        &self.0
    }
}

#[async_trait]
impl Backend for SharedBackend {
    async fn chat(&self, request: &ChatRequest) -> Result<ChatExchange> {
        if let Some(delay) = self.chat_delay {
            tokio::time::sleep(delay).await;
        }
        self.chat_requests.lock().unwrap().push(request.clone());
        self.chat_replies
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Err(Error::unknown("unscripted chat call")))
    }

    async fn chat_with_files(
        &self,
        request: &ChatRequest,
        files: &[Attachment],
    ) -> Result<ChatExchange> {
        self.multipart_requests
            .lock()
            .unwrap()
            .push((request.clone(), files.len()));
        self.chat_replies
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Err(Error::unknown("unscripted multipart call")))
    }

    async fn generate_image(&self, _prompt: &str) -> Result<ImageExchange> {
        self.image_replies
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Err(Error::unknown("unscripted image call")))
    }

    async fn model_name(&self) -> Result<String> {
        self.model_name_calls.fetch_add(1, Ordering::Relaxed);
        self.model_names
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Err(Error::unknown("unscripted model call")))
    }

    async fn list_models(&self) -> Result<Vec<String>> {
        self.model_lists
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Err(Error::unknown("unscripted models call")))
    }

    async fn history(&self) -> Result<Vec<HistoryEntry>> {
        self.history_replies
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Err(Error::unknown("unscripted history call")))
    }

    async fn probe_models(&self, _request: &ModelProbeRequest) -> Result<ModelProbeReport> {
        self.probe_replies
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Err(Error::unknown("unscripted probe call")))
    }
}

/// Observer that records pending transitions for ordering assertions.
struct PendingRecorder {
    transitions: Arc<Mutex<Vec<bool>>>,
}

impl SessionObserver for PendingRecorder {
    fn pending_changed(&self, pending: bool) {
        self.transitions.lock().unwrap().push(pending);
    }
}

fn senders(messages: &[Message]) -> Vec<Sender> {
    messages.iter().map(|m| m.sender).collect()
}

#[tokio::test]
async fn success_adopts_chat_id_and_appends_in_order() {
    let backend = SharedBackend::new();
    backend.script_chat(Ok(exchange("abc", "hi")));
    let session = ChatSession::with_backend(backend.clone());

    assert!(session.chat_id().is_none());
    session.submit_message("hello").await.unwrap();

    assert_eq!(session.chat_id().as_deref(), Some("abc"));
    let messages = session.messages();
    assert_eq!(senders(&messages), vec![Sender::User, Sender::Assistant]);
    assert_eq!(messages[0].content, "hello");
    assert_eq!(messages[1].content, "hi");
    assert!(!session.pending());
}

#[tokio::test]
async fn failure_appends_error_and_keeps_identity() {
    let backend = SharedBackend::new();
    backend.script_chat(Err(Error::timeout("timeout", None)));
    let session = ChatSession::with_backend(backend.clone());

    let result = session.submit_message("hello").await;
    assert!(result.is_err());

    assert!(session.chat_id().is_none());
    let messages = session.messages();
    assert_eq!(senders(&messages), vec![Sender::User, Sender::Error]);
    assert_eq!(messages[0].content, "hello");
    assert!(messages[1].content.contains("timeout"));
    assert!(!session.pending());
}

#[tokio::test(start_paused = true)]
async fn concurrent_submits_dispatch_exactly_once() {
    let backend = SharedBackend::with_chat_delay(Duration::from_millis(50));
    backend.script_chat(Ok(exchange("abc", "first reply")));
    backend.script_chat(Ok(exchange("abc", "second reply")));
    let session = ChatSession::with_backend(backend.clone());

    let (first, second) = tokio::join!(
        session.submit_message("first"),
        session.submit_message("second"),
    );
    first.unwrap();
    second.unwrap();

    // The second submit hit the pending gate: one dispatch, one optimistic
    // echo, one reply.
    assert_eq!(backend.chat_requests().len(), 1);
    let messages = session.messages();
    assert_eq!(senders(&messages), vec![Sender::User, Sender::Assistant]);
    assert_eq!(messages[0].content, "first");
    assert_eq!(messages[1].content, "first reply");
}

#[tokio::test(start_paused = true)]
async fn pending_is_visible_mid_flight_and_resets() {
    let backend = SharedBackend::with_chat_delay(Duration::from_millis(50));
    backend.script_chat(Ok(exchange("abc", "hi")));

    let transitions = Arc::new(Mutex::new(Vec::new()));
    let mut session = ChatSession::with_backend(backend.clone());
    session.subscribe(Box::new(PendingRecorder {
        transitions: transitions.clone(),
    }));
    let session = session;

    let observe = async {
        tokio::time::sleep(Duration::from_millis(10)).await;
        assert!(session.pending());
    };
    let (result, _) = tokio::join!(session.submit_message("hello"), observe);
    result.unwrap();

    assert!(!session.pending());
    assert_eq!(*transitions.lock().unwrap(), vec![true, false]);
}

#[tokio::test(start_paused = true)]
async fn new_session_is_rejected_while_pending() {
    let backend = SharedBackend::with_chat_delay(Duration::from_millis(50));
    backend.script_chat(Ok(exchange("abc", "hi")));
    let session = ChatSession::with_backend(backend.clone());

    let reset_attempt = async {
        tokio::time::sleep(Duration::from_millis(10)).await;
        assert!(!session.start_new_session());
    };
    let (result, _) = tokio::join!(session.submit_message("hello"), reset_attempt);
    result.unwrap();

    // The in-flight exchange survived the rejected reset.
    assert_eq!(session.chat_id().as_deref(), Some("abc"));
    assert_eq!(session.message_count(), 2);
}

#[tokio::test]
async fn new_session_clears_everything() {
    let backend = SharedBackend::new();
    backend.script_chat(Ok(exchange("abc", "hi")));
    let session = ChatSession::with_backend(backend.clone());

    session.select_agent(Some("Web Dev".to_string()));
    session.set_web_search(true);
    session.submit_message("hello").await.unwrap();

    assert!(session.start_new_session());
    assert!(session.chat_id().is_none());
    assert_eq!(session.message_count(), 0);
    assert!(session.options().is_empty());
}

#[tokio::test]
async fn agent_selection_is_consumed_by_one_send() {
    let backend = SharedBackend::new();
    backend.script_chat(Ok(exchange("abc", "one")));
    backend.script_chat(Ok(exchange("abc", "two")));
    let session = ChatSession::with_backend(backend.clone());

    session.select_agent(Some("Code Assistant".to_string()));
    session.submit_message("first").await.unwrap();
    session.submit_message("second").await.unwrap();

    let requests = backend.chat_requests();
    assert_eq!(requests.len(), 2);
    assert_eq!(requests[0].agent_name.as_deref(), Some("Code Assistant"));
    assert_eq!(requests[1].agent_name, None);
}

#[tokio::test]
async fn toggles_persist_across_sends() {
    let backend = SharedBackend::new();
    backend.script_chat(Ok(exchange("abc", "one")));
    backend.script_chat(Ok(exchange("abc", "two")));
    let session = ChatSession::with_backend(backend.clone());

    session.set_web_search(true);
    session.set_thinking_mode(true);
    session.submit_message("first").await.unwrap();
    session.submit_message("second").await.unwrap();

    for request in backend.chat_requests() {
        assert!(request.use_web_search);
        assert!(request.thinking_mode);
    }
}

#[tokio::test]
async fn continuation_carries_adopted_chat_id() {
    let backend = SharedBackend::new();
    backend.script_chat(Ok(exchange("abc", "one")));
    backend.script_chat(Ok(exchange("abc", "two")));
    let session = ChatSession::with_backend(backend.clone());

    session.submit_message("first").await.unwrap();
    session.submit_message("second").await.unwrap();

    let requests = backend.chat_requests();
    assert_eq!(requests[0].chat_id, None);
    assert_eq!(requests[1].chat_id.as_deref(), Some("abc"));
}

#[tokio::test]
async fn attachments_switch_to_multipart_and_clear() {
    let backend = SharedBackend::new();
    backend.script_chat(Ok(exchange("abc", "got the file")));
    backend.script_chat(Ok(exchange("abc", "plain again")));
    let session = ChatSession::with_backend(backend.clone());

    session.attach(Attachment::new("notes.txt", &b"hello"[..]));
    session.submit_message("see attached").await.unwrap();

    let multipart = backend.multipart_requests();
    assert_eq!(multipart.len(), 1);
    assert_eq!(multipart[0].0.prompt, "see attached");
    assert_eq!(multipart[0].1, 1);
    assert!(session.options().attachments.is_empty());

    // The next send has no attachments and goes back to the JSON path.
    session.submit_message("plain").await.unwrap();
    assert_eq!(backend.chat_requests().len(), 1);
    assert_eq!(backend.multipart_requests().len(), 1);
}

#[tokio::test]
async fn image_success_appends_reference_and_adopts() {
    let backend = SharedBackend::new();
    backend.script_image(Ok(ImageExchange {
        chat_id: "img-1".to_string(),
        image_url: "https://cdn.example.com/x.png".to_string(),
    }));
    let session = ChatSession::with_backend(backend.clone());

    session.request_image("a red fox").await.unwrap();

    assert_eq!(session.chat_id().as_deref(), Some("img-1"));
    let messages = session.messages();
    assert_eq!(senders(&messages), vec![Sender::User, Sender::Assistant]);
    assert_eq!(messages[0].content, "a red fox");
    assert!(messages[1].is_image);
    assert_eq!(messages[1].content, "https://cdn.example.com/x.png");
}

#[tokio::test]
async fn metadata_refresh_is_uncached_and_stable() {
    let backend = SharedBackend::new();
    backend.script_model_name(Ok("Qwen3-Plus".to_string()));
    backend.script_model_name(Ok("Qwen3-Plus".to_string()));
    backend.script_model_list(Ok(vec!["Qwen3-Plus".to_string()]));
    backend.script_model_list(Ok(vec!["Qwen3-Plus".to_string()]));
    let session = ChatSession::with_backend(backend.clone());

    session.refresh_model_metadata().await;
    session.refresh_model_metadata().await;

    assert_eq!(backend.model_name_calls.load(Ordering::Relaxed), 2);
    assert_eq!(
        session.model_label(),
        ModelLabel::Named("Qwen3-Plus".to_string())
    );
}

#[tokio::test]
async fn metadata_refresh_degrades_on_failure() {
    let backend = SharedBackend::new();
    backend.script_model_name(Err(Error::connection("refused", None)));
    backend.script_model_list(Err(Error::connection("refused", None)));
    let session = ChatSession::with_backend(backend.clone());

    session.refresh_model_metadata().await;

    assert_eq!(session.model_label(), ModelLabel::Unavailable);
    assert!(session.available_models().is_empty());
    // The session stays fully usable afterward.
    backend.script_chat(Ok(exchange("abc", "hi")));
    session.submit_message("hello").await.unwrap();
    assert_eq!(session.message_count(), 2);
}

#[tokio::test]
async fn history_failure_keeps_previous_entries() {
    let backend = SharedBackend::new();
    backend.script_history(Ok(vec![HistoryEntry {
        id: "c-1".to_string(),
        title: "First chat".to_string(),
    }]));
    backend.script_history(Err(Error::api(502, "bad gateway")));
    let session = ChatSession::with_backend(backend.clone());

    session.refresh_history().await;
    assert_eq!(session.history().len(), 1);

    session.refresh_history().await;
    assert_eq!(session.history().len(), 1);
}

#[tokio::test]
async fn probe_reports_and_respects_gate() {
    let backend = SharedBackend::new();
    backend.script_probe(Ok(ModelProbeReport {
        working_count: 1,
        total_tested: 2,
        working_models: vec!["Qwen3-Plus".to_string()],
        failed_models: vec!["Qwen-Audio".to_string()],
    }));
    let session = ChatSession::with_backend(backend.clone());

    let report = session
        .probe_models("ping", vec!["Qwen3-Plus".to_string(), "Qwen-Audio".to_string()])
        .await
        .unwrap()
        .expect("probe should dispatch while idle");
    assert_eq!(report.working_count, 1);
    assert_eq!(report.total_tested, 2);
    assert!(!session.pending());
}

#[tokio::test(start_paused = true)]
async fn probe_is_a_noop_while_send_is_pending() {
    let backend = SharedBackend::with_chat_delay(Duration::from_millis(50));
    backend.script_chat(Ok(exchange("abc", "hi")));
    let session = ChatSession::with_backend(backend.clone());

    let probe = async {
        tokio::time::sleep(Duration::from_millis(10)).await;
        let report = session
            .probe_models("ping", vec!["Qwen3-Plus".to_string()])
            .await
            .unwrap();
        assert!(report.is_none());
    };
    let (result, _) = tokio::join!(session.submit_message("hello"), probe);
    result.unwrap();
}
