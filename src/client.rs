use std::env;
use std::time::{Duration, Instant};

use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderValue};
use reqwest::multipart::{Form, Part};
use reqwest::{Client as ReqwestClient, Response, header};
use serde::Serialize;
use serde::de::DeserializeOwned;

use crate::error::{Error, Result};
use crate::observability;
use crate::types::{
    Attachment, ChatExchange, ChatReply, ChatRequest, HistoryEntry, HistoryReply, ImageExchange,
    ImageReply, ImageRequest, ModelListReply, ModelProbeReply, ModelProbeReport,
    ModelProbeRequest, ModelReply, StorageState,
};

const DEFAULT_API_URL: &str = "http://127.0.0.1:5000/api/";
const DEFAULT_AUTH_URL: &str = "http://127.0.0.1:8000/save_auth";

/// Client for the Qwen bridge API.
///
/// Every method is a single request attempt: the bridge drives a real
/// browser on the other side, so retries would multiply slow, stateful
/// operations. Failures map into [`Error`] and the caller decides what to
/// do next.
#[derive(Debug, Clone)]
pub struct QwenBridge {
    client: ReqwestClient,
    base_url: String,
    auth_url: String,
    timeout: Option<Duration>,
}

impl QwenBridge {
    /// Create a new bridge client.
    ///
    /// The base URL can be provided directly or read from the
    /// QWINTUS_BRIDGE_URL environment variable, falling back to the
    /// default local bridge address.
    pub fn new(base_url: Option<String>) -> Result<Self> {
        let base_url = match base_url {
            Some(url) => url,
            None => env::var("QWINTUS_BRIDGE_URL").unwrap_or_else(|_| DEFAULT_API_URL.to_string()),
        };
        Self::with_options(Some(base_url), None, None)
    }

    /// Create a new client with custom settings.
    ///
    /// `timeout` defaults to none: bridge operations legitimately run for
    /// minutes while a browser renders, so callers opt into a deadline
    /// rather than inheriting one.
    pub fn with_options(
        base_url: Option<String>,
        auth_url: Option<String>,
        timeout: Option<Duration>,
    ) -> Result<Self> {
        let base_url = normalize_base_url(
            base_url.unwrap_or_else(|| DEFAULT_API_URL.to_string()),
        )?;
        let auth_url = auth_url.unwrap_or_else(|| DEFAULT_AUTH_URL.to_string());
        url::Url::parse(&auth_url)?;

        let mut builder = ReqwestClient::builder();
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }
        let client = builder.build().map_err(|e| {
            Error::http_client(
                format!("Failed to build HTTP client: {}", e),
                Some(Box::new(e)),
            )
        })?;

        Ok(Self {
            client,
            base_url,
            auth_url,
            timeout,
        })
    }

    /// Returns the base URL requests are issued against.
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Create and return default headers for API requests.
    fn default_headers(&self) -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(header::ACCEPT, HeaderValue::from_static("application/json"));
        headers
    }

    /// Map a reqwest transport error into our error type.
    fn triage_request_error(&self, e: reqwest::Error) -> Error {
        if e.is_timeout() {
            Error::timeout(
                format!("Request timed out: {}", e),
                self.timeout.map(|t| t.as_secs_f64()),
            )
        } else if e.is_connect() {
            Error::connection(format!("Connection error: {}", e), Some(Box::new(e)))
        } else {
            Error::http_client(format!("Request failed: {}", e), Some(Box::new(e)))
        }
    }

    /// Process API response errors and convert to our Error type.
    async fn process_error_response(response: Response) -> Error {
        let status_code = response.status().as_u16();

        // Non-2xx bodies usually still carry the bridge's status envelope.
        #[derive(serde::Deserialize)]
        struct ErrorBody {
            message: Option<String>,
        }

        let error_body = match response.text().await {
            Ok(body) => body,
            Err(e) => {
                return Error::http_client(
                    format!("Failed to read error response: {}", e),
                    Some(Box::new(e)),
                );
            }
        };

        let message = serde_json::from_str::<ErrorBody>(&error_body)
            .ok()
            .and_then(|body| body.message)
            .unwrap_or(error_body);

        Error::api(status_code, message)
    }

    async fn dispatch(&self, request: reqwest::RequestBuilder) -> Result<Response> {
        observability::CLIENT_REQUESTS.click();
        let start = Instant::now();
        let outcome = request.send().await;
        observability::CLIENT_REQUEST_DURATION.add(start.elapsed().as_secs_f64());

        let response = match outcome {
            Ok(response) => response,
            Err(e) => {
                observability::CLIENT_REQUEST_ERRORS.click();
                return Err(self.triage_request_error(e));
            }
        };

        if !response.status().is_success() {
            observability::CLIENT_REQUEST_ERRORS.click();
            return Err(Self::process_error_response(response).await);
        }

        Ok(response)
    }

    async fn read_json<T: DeserializeOwned>(response: Response) -> Result<T> {
        response.json::<T>().await.map_err(|e| {
            Error::serialization(
                format!("Failed to parse response: {}", e),
                Some(Box::new(e)),
            )
        })
    }

    async fn get_json<T: DeserializeOwned>(&self, path: &str) -> Result<T> {
        let url = format!("{}{}", self.base_url, path);
        let request = self.client.get(&url).headers(self.default_headers());
        let response = self.dispatch(request).await?;
        Self::read_json(response).await
    }

    async fn post_json<B: Serialize + ?Sized, T: DeserializeOwned>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<T> {
        let url = format!("{}{}", self.base_url, path);
        let request = self
            .client
            .post(&url)
            .headers(self.default_headers())
            .json(body);
        let response = self.dispatch(request).await?;
        Self::read_json(response).await
    }

    /// Send a chat prompt and return the assistant's reply.
    pub async fn chat(&self, request: &ChatRequest) -> Result<ChatExchange> {
        let reply: ChatReply = self.post_json("chat", request).await?;
        reply.into_exchange()
    }

    /// Send a chat prompt with file attachments as a multipart form.
    ///
    /// Same keys as the JSON body, with each attachment as a `files`
    /// part. The transport changes; the semantics do not.
    pub async fn chat_with_files(
        &self,
        request: &ChatRequest,
        files: &[Attachment],
    ) -> Result<ChatExchange> {
        let mut form = Form::new()
            .text("prompt", request.prompt.clone())
            .text("use_web_search", request.use_web_search.to_string())
            .text("thinking_mode", request.thinking_mode.to_string());
        if let Some(chat_id) = &request.chat_id {
            form = form.text("chat_id", chat_id.clone());
        }
        if let Some(agent_name) = &request.agent_name {
            form = form.text("agent_name", agent_name.clone());
        }
        for attachment in files {
            let mut part = Part::bytes(attachment.content.to_vec())
                .file_name(attachment.file_name.clone());
            if let Some(content_type) = &attachment.content_type {
                part = part.mime_str(content_type).map_err(|e| {
                    Error::validation(
                        format!("invalid attachment content type: {}", e),
                        Some("content_type".to_string()),
                    )
                })?;
            }
            form = form.part("files", part);
        }

        let url = format!("{}chat", self.base_url);
        let request_builder = self
            .client
            .post(&url)
            .headers(self.default_headers())
            .multipart(form);
        let response = self.dispatch(request_builder).await?;
        let reply: ChatReply = Self::read_json(response).await?;
        reply.into_exchange()
    }

    /// Generate an image from a prompt.
    pub async fn generate_image(&self, prompt: &str) -> Result<ImageExchange> {
        let reply: ImageReply = self.post_json("image", &ImageRequest::new(prompt)).await?;
        reply.into_exchange()
    }

    /// Fetch the display name of the currently selected model.
    pub async fn model_name(&self) -> Result<String> {
        let reply: ModelReply = self.get_json("model").await?;
        reply.into_name()
    }

    /// Fetch the list of available model names.
    pub async fn list_models(&self) -> Result<Vec<String>> {
        let reply: ModelListReply = self.get_json("models").await?;
        reply.into_models()
    }

    /// Fetch conversation history summaries.
    pub async fn history(&self) -> Result<Vec<HistoryEntry>> {
        let reply: HistoryReply = self.get_json("history").await?;
        reply.into_entries()
    }

    /// Probe a set of models with one prompt and report which answered.
    pub async fn probe_models(&self, request: &ModelProbeRequest) -> Result<ModelProbeReport> {
        let reply: ModelProbeReply = self.post_json("test_models", request).await?;
        reply.into_report()
    }

    /// Push a storage-state snapshot to the local auth receiver.
    ///
    /// This is the out-of-band credential export: it targets a separate
    /// fixed endpoint, not the bridge API, and has no response contract
    /// beyond HTTP success.
    pub async fn save_auth_state(&self, state: &StorageState) -> Result<()> {
        let request = self
            .client
            .post(&self.auth_url)
            .headers(self.default_headers())
            .json(state);
        self.dispatch(request).await?;
        Ok(())
    }
}

/// Validate the base URL and guarantee the trailing slash that path
/// concatenation relies on.
fn normalize_base_url(base_url: String) -> Result<String> {
    url::Url::parse(&base_url)?;
    if base_url.ends_with('/') {
        Ok(base_url)
    } else {
        Ok(format!("{}/", base_url))
    }
}

/// The session-facing surface of the bridge.
///
/// `ChatSession` is generic over this trait so the state machine can be
/// exercised against a scripted implementation without a network.
#[async_trait]
pub trait Backend: Send + Sync {
    /// Send a chat prompt.
    async fn chat(&self, request: &ChatRequest) -> Result<ChatExchange>;

    /// Send a chat prompt with attachments.
    async fn chat_with_files(
        &self,
        request: &ChatRequest,
        files: &[Attachment],
    ) -> Result<ChatExchange>;

    /// Generate an image.
    async fn generate_image(&self, prompt: &str) -> Result<ImageExchange>;

    /// Fetch the current model's display name.
    async fn model_name(&self) -> Result<String>;

    /// Fetch the available model names.
    async fn list_models(&self) -> Result<Vec<String>>;

    /// Fetch conversation history summaries.
    async fn history(&self) -> Result<Vec<HistoryEntry>>;

    /// Probe a set of models.
    async fn probe_models(&self, request: &ModelProbeRequest) -> Result<ModelProbeReport>;
}

#[async_trait]
impl Backend for QwenBridge {
    async fn chat(&self, request: &ChatRequest) -> Result<ChatExchange> {
        QwenBridge::chat(self, request).await
    }

    async fn chat_with_files(
        &self,
        request: &ChatRequest,
        files: &[Attachment],
    ) -> Result<ChatExchange> {
        QwenBridge::chat_with_files(self, request, files).await
    }

    async fn generate_image(&self, prompt: &str) -> Result<ImageExchange> {
        QwenBridge::generate_image(self, prompt).await
    }

    async fn model_name(&self) -> Result<String> {
        QwenBridge::model_name(self).await
    }

    async fn list_models(&self) -> Result<Vec<String>> {
        QwenBridge::list_models(self).await
    }

    async fn history(&self) -> Result<Vec<HistoryEntry>> {
        QwenBridge::history(self).await
    }

    async fn probe_models(&self, request: &ModelProbeRequest) -> Result<ModelProbeReport> {
        QwenBridge::probe_models(self, request).await
    }
}
