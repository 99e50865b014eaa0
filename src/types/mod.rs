// Public modules
pub mod attachment;
pub mod chat_reply;
pub mod chat_request;
pub mod history_entry;
pub mod history_reply;
pub mod image_reply;
pub mod image_request;
pub mod message;
pub mod model_label;
pub mod model_list_reply;
pub mod model_reply;
pub mod probe_report;
pub mod probe_request;
pub mod reply_status;
pub mod request_options;
pub mod storage_state;

// Re-exports
pub use attachment::Attachment;
pub use chat_reply::{ChatExchange, ChatReply};
pub use chat_request::ChatRequest;
pub use history_entry::HistoryEntry;
pub use history_reply::HistoryReply;
pub use image_reply::{ImageExchange, ImageReply};
pub use image_request::ImageRequest;
pub use message::{Message, Sender};
pub use model_label::ModelLabel;
pub use model_list_reply::ModelListReply;
pub use model_reply::ModelReply;
pub use probe_report::{ModelProbeReply, ModelProbeReport};
pub use probe_request::ModelProbeRequest;
pub use reply_status::ReplyStatus;
pub use request_options::RequestOptions;
pub use storage_state::{Cookie, OriginState, SameSite, StorageEntry, StorageState};
