//! One-shot prompt sender for the Qwen bridge.
//!
//! Sends a single chat prompt (or image request) through the bridge and
//! prints the result. Useful for scripting and for checking that the
//! bridge is up.
//!
//! # Usage
//!
//! ```bash
//! qwintus-send "What is the capital of France?"
//! qwintus-send --agent "Code Assistant" "Write a hello world in Rust"
//! qwintus-send --image "a lighthouse at dusk"
//! ```

use std::time::Duration;

use arrrg::CommandLine;
use arrrg_derive::CommandLine;

use qwintus::types::ChatRequest;
use qwintus::QwenBridge;

/// Command-line arguments for the qwintus-send tool.
#[derive(CommandLine, Debug, Default, PartialEq, Eq)]
struct SendArgs {
    /// Bridge API base URL.
    #[arrrg(optional, "Bridge API base URL (default: http://127.0.0.1:5000/api/)", "URL")]
    url: Option<String>,

    /// Agent preset for the send.
    #[arrrg(optional, "Agent preset for the send", "NAME")]
    agent: Option<String>,

    /// Continue an existing conversation.
    #[arrrg(optional, "Conversation to continue", "CHAT_ID")]
    chat_id: Option<String>,

    /// Enable web search.
    #[arrrg(flag, "Enable web search")]
    search: bool,

    /// Enable thinking mode.
    #[arrrg(flag, "Enable thinking mode")]
    thinking: bool,

    /// Generate an image instead of a chat reply.
    #[arrrg(flag, "Generate an image instead of a chat reply")]
    image: bool,

    /// Request timeout in seconds.
    #[arrrg(optional, "Request timeout in seconds (default: none)", "SECONDS")]
    timeout: Option<u32>,
}

#[tokio::main]
async fn main() {
    let (args, free) = SendArgs::from_command_line_relaxed("qwintus-send [OPTIONS] PROMPT");
    let prompt = free.join(" ");
    if prompt.trim().is_empty() {
        eprintln!("qwintus-send: a prompt is required");
        std::process::exit(2);
    }

    let url = args
        .url
        .clone()
        .or_else(|| std::env::var("QWINTUS_BRIDGE_URL").ok());
    let timeout = args.timeout.map(|secs| Duration::from_secs(secs.into()));
    let client = match QwenBridge::with_options(url, None, timeout) {
        Ok(client) => client,
        Err(err) => {
            eprintln!("qwintus-send: {err}");
            std::process::exit(1);
        }
    };

    if args.image {
        match client.generate_image(&prompt).await {
            Ok(exchange) => {
                println!("{}", exchange.image_url);
                eprintln!("(conversation {})", exchange.chat_id);
            }
            Err(err) => {
                eprintln!("qwintus-send: {err}");
                std::process::exit(1);
            }
        }
    } else {
        let request = ChatRequest::new(prompt)
            .with_chat_id(args.chat_id.clone())
            .with_agent(args.agent.clone())
            .with_web_search(args.search)
            .with_thinking_mode(args.thinking);
        match client.chat(&request).await {
            Ok(exchange) => {
                println!("{}", exchange.response);
                eprintln!("(conversation {})", exchange.chat_id);
            }
            Err(err) => {
                eprintln!("qwintus-send: {err}");
                std::process::exit(1);
            }
        }
    }
}
