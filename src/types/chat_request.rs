use serde::{Deserialize, Serialize};

/// Request body for `POST /api/chat`.
///
/// `chat_id` is `None` for the first message of a new conversation; the
/// bridge assigns an identifier and returns it in the reply. `agent_name`
/// biases a single request toward a named preset and is never a durable
/// setting.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatRequest {
    /// The user's prompt text.
    pub prompt: String,

    /// Conversation to continue, or `None` to start a new one.
    pub chat_id: Option<String>,

    /// Named agent preset for this one request.
    pub agent_name: Option<String>,

    /// Whether the bridge should enable web search for this request.
    pub use_web_search: bool,

    /// Whether the bridge should enable thinking mode for this request.
    pub thinking_mode: bool,
}

impl ChatRequest {
    /// Creates a request for a new conversation with default options.
    pub fn new(prompt: impl Into<String>) -> Self {
        Self {
            prompt: prompt.into(),
            chat_id: None,
            agent_name: None,
            use_web_search: false,
            thinking_mode: false,
        }
    }

    /// Sets the conversation to continue.
    pub fn with_chat_id(mut self, chat_id: Option<String>) -> Self {
        self.chat_id = chat_id;
        self
    }

    /// Sets the agent preset.
    pub fn with_agent(mut self, agent_name: Option<String>) -> Self {
        self.agent_name = agent_name;
        self
    }

    /// Sets the web-search flag.
    pub fn with_web_search(mut self, use_web_search: bool) -> Self {
        self.use_web_search = use_web_search;
        self
    }

    /// Sets the thinking-mode flag.
    pub fn with_thinking_mode(mut self, thinking_mode: bool) -> Self {
        self.thinking_mode = thinking_mode;
        self
    }
}
