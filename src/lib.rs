// Public modules
pub mod chat;
pub mod client;
pub mod error;
pub mod gate;
pub mod observer;
pub mod render;
pub mod types;

mod observability;

// Re-exports
pub use client::{Backend, QwenBridge};
pub use error::{Error, Result};
pub use gate::{PendingGate, PendingPermit};
pub use observability::register_biometrics;
pub use observer::SessionObserver;
pub use types::*;
