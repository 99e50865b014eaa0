use crate::types::Attachment;

/// Modifiers applied to the next outgoing send.
///
/// Agent selection and attachments are single-use: a dispatch consumes
/// them. The web-search and thinking-mode flags are session-scoped
/// toggles and persist across sends until changed or the session resets.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct RequestOptions {
    /// Named agent preset for the next send, if any.
    pub agent_name: Option<String>,

    /// Whether web search is enabled for sends.
    pub use_web_search: bool,

    /// Whether thinking mode is enabled for sends.
    pub thinking_mode: bool,

    /// Files to attach to the next send.
    pub attachments: Vec<Attachment>,
}

impl RequestOptions {
    /// Returns true when no modifier is set.
    pub fn is_empty(&self) -> bool {
        self.agent_name.is_none()
            && !self.use_web_search
            && !self.thinking_mode
            && self.attachments.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_is_empty() {
        assert!(RequestOptions::default().is_empty());
    }

    #[test]
    fn any_modifier_is_not_empty() {
        let options = RequestOptions {
            thinking_mode: true,
            ..RequestOptions::default()
        };
        assert!(!options.is_empty());
    }
}
