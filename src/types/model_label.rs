use std::fmt;

/// Display state for the globally-shown model name.
///
/// The label is pure presentation: it carries no behavioral weight and is
/// synchronized from the bridge on demand. A failed refresh degrades to
/// [`ModelLabel::Unavailable`] rather than surfacing an error.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum ModelLabel {
    /// No refresh has completed yet.
    #[default]
    Unknown,

    /// The bridge reported this model name.
    Named(String),

    /// The last refresh failed.
    Unavailable,
}

impl ModelLabel {
    /// Returns the model name, if one is known.
    pub fn name(&self) -> Option<&str> {
        match self {
            ModelLabel::Named(name) => Some(name),
            _ => None,
        }
    }
}

impl fmt::Display for ModelLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ModelLabel::Unknown => write!(f, "unknown"),
            ModelLabel::Named(name) => write!(f, "{name}"),
            ModelLabel::Unavailable => write!(f, "unavailable"),
        }
    }
}
