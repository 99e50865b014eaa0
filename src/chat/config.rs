//! Configuration types for the chat application.
//!
//! This module provides CLI argument parsing via `arrrg` and
//! configuration structures for the chat binaries. Flags layer over an
//! optional YAML config file, which layers over defaults.

use std::path::Path;
use std::time::Duration;

use arrrg_derive::CommandLine;
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Command-line arguments for the qwintus-chat tool.
#[derive(CommandLine, Debug, Default, PartialEq, Eq)]
pub struct ChatArgs {
    /// Bridge API base URL.
    #[arrrg(optional, "Bridge API base URL (default: http://127.0.0.1:5000/api/)", "URL")]
    pub url: Option<String>,

    /// Auth receiver URL for storage-state pushes.
    #[arrrg(optional, "Auth receiver URL (default: http://127.0.0.1:8000/save_auth)", "URL")]
    pub auth_url: Option<String>,

    /// Request timeout in seconds.
    #[arrrg(optional, "Request timeout in seconds (default: none)", "SECONDS")]
    pub timeout: Option<u32>,

    /// Agent preset selected at startup.
    #[arrrg(optional, "Agent preset for the first send", "NAME")]
    pub agent: Option<String>,

    /// Enable web search from the start.
    #[arrrg(flag, "Enable web search for sends")]
    pub search: bool,

    /// Enable thinking mode from the start.
    #[arrrg(flag, "Enable thinking mode for sends")]
    pub thinking: bool,

    /// Disable ANSI colors and styles.
    #[arrrg(flag, "Disable ANSI colors/styles")]
    pub no_color: bool,

    /// YAML config file layered under the flags.
    #[arrrg(optional, "YAML config file", "PATH")]
    pub config: Option<String>,
}

/// Configuration for a chat session binary.
///
/// This struct holds the resolved configuration values after processing
/// the config file and command-line arguments.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatConfig {
    /// Bridge API base URL; `None` uses the client default.
    #[serde(default)]
    pub url: Option<String>,

    /// Auth receiver URL; `None` uses the client default.
    #[serde(default)]
    pub auth_url: Option<String>,

    /// Request timeout in seconds; `None` means no deadline.
    #[serde(default)]
    pub timeout_secs: Option<u32>,

    /// Agent preset selected at startup.
    #[serde(default)]
    pub agent: Option<String>,

    /// Whether web search starts enabled.
    #[serde(default)]
    pub web_search: bool,

    /// Whether thinking mode starts enabled.
    #[serde(default)]
    pub thinking_mode: bool,

    /// Whether to use ANSI colors and styles in output.
    #[serde(default = "default_use_color")]
    pub use_color: bool,
}

fn default_use_color() -> bool {
    true
}

impl ChatConfig {
    /// Creates a new ChatConfig with default values.
    pub fn new() -> Self {
        Self {
            url: None,
            auth_url: None,
            timeout_secs: None,
            agent: None,
            web_search: false,
            thinking_mode: false,
            use_color: true,
        }
    }

    /// Loads a configuration from a YAML file.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let contents = std::fs::read_to_string(path)
            .map_err(|err| Error::io(format!("failed to read {}", path.display()), err))?;
        serde_yaml::from_str(&contents).map_err(|err| {
            Error::serialization(
                format!("failed to parse config from {}", path.display()),
                Some(Box::new(err)),
            )
        })
    }

    /// Layers command-line arguments over this configuration.
    pub fn apply_args(mut self, args: &ChatArgs) -> Self {
        if args.url.is_some() {
            self.url = args.url.clone();
        }
        if args.auth_url.is_some() {
            self.auth_url = args.auth_url.clone();
        }
        if args.timeout.is_some() {
            self.timeout_secs = args.timeout;
        }
        if args.agent.is_some() {
            self.agent = args.agent.clone();
        }
        if args.search {
            self.web_search = true;
        }
        if args.thinking {
            self.thinking_mode = true;
        }
        if args.no_color {
            self.use_color = false;
        }
        self
    }

    /// Resolves the configured timeout, if any.
    pub fn timeout(&self) -> Option<Duration> {
        self.timeout_secs.map(|secs| Duration::from_secs(secs.into()))
    }

    /// Sets the base URL.
    pub fn with_url(mut self, url: impl Into<String>) -> Self {
        self.url = Some(url.into());
        self
    }

    /// Sets the startup agent preset.
    pub fn with_agent(mut self, agent: impl Into<String>) -> Self {
        self.agent = Some(agent.into());
        self
    }

    /// Disables ANSI color output.
    pub fn without_color(mut self) -> Self {
        self.use_color = false;
        self
    }
}

impl Default for ChatConfig {
    fn default() -> Self {
        Self::new()
    }
}

impl From<ChatArgs> for ChatConfig {
    fn from(args: ChatArgs) -> Self {
        ChatConfig::new().apply_args(&args)
    }
}
