//! Slash command parsing for the chat application.
//!
//! This module handles parsing of special commands that start with `/`,
//! allowing users to control the session without sending messages to the
//! bridge.

/// A parsed chat command.
///
/// These commands control the chat session and are not sent to the
/// bridge (except `/image` and `/probe`, which dispatch their own
/// requests).
#[derive(Debug, Clone, PartialEq)]
pub enum ChatCommand {
    /// Start a new conversation.
    New,

    /// Generate an image from a prompt.
    Image(String),

    /// Select an agent preset for the next send, or clear it.
    /// `None` clears the current selection.
    Agent(Option<String>),

    /// Toggle web search for sends.
    Search(bool),

    /// Toggle thinking mode for sends.
    Thinking(bool),

    /// Attach a file to the next send.
    Attach(String),

    /// Remove all pending attachments.
    Detach,

    /// Show the current model name.
    Model,

    /// List the available models.
    Models,

    /// Show conversation history summaries.
    History,

    /// Probe the named models (all available models when empty).
    Probe(Vec<String>),

    /// Save the transcript to a file.
    SaveTranscript(String),

    /// Display session statistics.
    Stats,

    /// Display help information.
    Help,

    /// Exit the chat application.
    Quit,

    /// Report a parsing error back to the caller.
    Invalid(String),
}

/// Parses user input for slash commands.
///
/// Returns `Some(ChatCommand)` if the input is a command, or `None` if it
/// should be sent to the bridge as a message.
///
/// # Examples
///
/// ```
/// # use qwintus::chat::parse_command;
/// assert!(parse_command("/quit").is_some());
/// assert!(parse_command("/agent Code Assistant").is_some());
/// assert!(parse_command("Hello there!").is_none());
/// ```
pub fn parse_command(input: &str) -> Option<ChatCommand> {
    let input = input.trim();

    if !input.starts_with('/') {
        return None;
    }

    let mut parts = input[1..].splitn(2, ' ');
    let command = parts.next()?.to_lowercase();
    let argument = parts.next().map(|s| s.trim()).filter(|s| !s.is_empty());

    let result = match command.as_str() {
        "new" | "clear" => ChatCommand::New,
        "image" => match argument {
            Some(prompt) => ChatCommand::Image(prompt.to_string()),
            None => ChatCommand::Invalid("/image requires a prompt".to_string()),
        },
        "agent" => match argument {
            Some(arg) if arg.eq_ignore_ascii_case("off") => ChatCommand::Agent(None),
            Some(arg) => ChatCommand::Agent(Some(arg.to_string())),
            None => ChatCommand::Invalid("/agent requires a name or 'off'".to_string()),
        },
        "search" => match argument.and_then(parse_on_off) {
            Some(value) => ChatCommand::Search(value),
            None => ChatCommand::Invalid("/search expects 'on' or 'off'".to_string()),
        },
        "thinking" => match argument.and_then(parse_on_off) {
            Some(value) => ChatCommand::Thinking(value),
            None => ChatCommand::Invalid("/thinking expects 'on' or 'off'".to_string()),
        },
        "attach" => match argument {
            Some(path) => ChatCommand::Attach(path.to_string()),
            None => ChatCommand::Invalid("/attach requires a file path".to_string()),
        },
        "detach" => ChatCommand::Detach,
        "model" => ChatCommand::Model,
        "models" => ChatCommand::Models,
        "history" => ChatCommand::History,
        "probe" => ChatCommand::Probe(
            argument
                .map(|arg| arg.split_whitespace().map(String::from).collect())
                .unwrap_or_default(),
        ),
        "save" => match argument {
            Some(path) => ChatCommand::SaveTranscript(path.to_string()),
            None => ChatCommand::Invalid("/save requires a file path".to_string()),
        },
        "stats" | "status" => ChatCommand::Stats,
        "help" | "?" => ChatCommand::Help,
        "quit" | "exit" | "q" => ChatCommand::Quit,
        _ => ChatCommand::Invalid(format!("Unknown command: /{}", command)),
    };

    Some(result)
}

fn parse_on_off(value: &str) -> Option<bool> {
    match value.to_lowercase().as_str() {
        "on" | "true" | "yes" => Some(true),
        "off" | "false" | "no" => Some(false),
        _ => None,
    }
}

/// Returns help text describing available commands.
pub fn help_text() -> &'static str {
    "Commands:
  /new                 Start a new conversation
  /image <prompt>      Generate an image
  /agent <name>|off    Select an agent preset for the next send
  /search on|off       Toggle web search
  /thinking on|off     Toggle thinking mode
  /attach <path>       Attach a file to the next send
  /detach              Remove pending attachments
  /model               Show the current model
  /models              List available models
  /history             Show conversation history
  /probe [names...]    Probe models (all available when none given)
  /save <path>         Save the transcript to a file
  /stats               Show session statistics
  /help                Show this help
  /quit                Exit"
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn plain_text_is_not_a_command() {
        assert!(parse_command("hello").is_none());
        assert!(parse_command("  what is /new?  ").is_none());
    }

    #[test]
    fn simple_commands() {
        assert_eq!(parse_command("/new"), Some(ChatCommand::New));
        assert_eq!(parse_command("/clear"), Some(ChatCommand::New));
        assert_eq!(parse_command("/quit"), Some(ChatCommand::Quit));
        assert_eq!(parse_command("/q"), Some(ChatCommand::Quit));
        assert_eq!(parse_command("/stats"), Some(ChatCommand::Stats));
        assert_eq!(parse_command("/detach"), Some(ChatCommand::Detach));
    }

    #[test]
    fn agent_command() {
        assert_eq!(
            parse_command("/agent Code Assistant"),
            Some(ChatCommand::Agent(Some("Code Assistant".to_string())))
        );
        assert_eq!(parse_command("/agent off"), Some(ChatCommand::Agent(None)));
        assert!(matches!(
            parse_command("/agent"),
            Some(ChatCommand::Invalid(_))
        ));
    }

    #[test]
    fn toggle_commands() {
        assert_eq!(parse_command("/search on"), Some(ChatCommand::Search(true)));
        assert_eq!(
            parse_command("/thinking off"),
            Some(ChatCommand::Thinking(false))
        );
        assert!(matches!(
            parse_command("/search maybe"),
            Some(ChatCommand::Invalid(_))
        ));
    }

    #[test]
    fn probe_command() {
        assert_eq!(parse_command("/probe"), Some(ChatCommand::Probe(vec![])));
        assert_eq!(
            parse_command("/probe Qwen3-Plus Qwen-Turbo"),
            Some(ChatCommand::Probe(vec![
                "Qwen3-Plus".to_string(),
                "Qwen-Turbo".to_string()
            ]))
        );
    }

    #[test]
    fn image_command() {
        assert_eq!(
            parse_command("/image a red fox"),
            Some(ChatCommand::Image("a red fox".to_string()))
        );
        assert!(matches!(
            parse_command("/image"),
            Some(ChatCommand::Invalid(_))
        ));
    }

    #[test]
    fn unknown_command() {
        assert!(matches!(
            parse_command("/frobnicate"),
            Some(ChatCommand::Invalid(_))
        ));
    }
}
