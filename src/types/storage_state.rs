//! Browser storage-state snapshot types.
//!
//! These mirror the Playwright `storage_state.json` document that the
//! companion browser extension exports: cookies for the chat origin plus
//! the origin's localStorage and sessionStorage entries. The snapshot is
//! pushed whole to the local `/save_auth` receiver; qwintus never
//! inspects individual credentials.

use std::fs::File;
use std::io::BufReader;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// A single name/value pair from localStorage or sessionStorage.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StorageEntry {
    /// Storage key.
    pub name: String,

    /// Storage value.
    pub value: String,
}

/// Cookie `SameSite` attribute.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SameSite {
    /// Sent only for same-site requests.
    Strict,

    /// Sent for same-site requests and top-level navigations.
    Lax,

    /// Sent for all requests.
    None,
}

/// One browser cookie in the Playwright storage-state shape.
///
/// Snapshots produced by a real browser carry extra bookkeeping fields
/// (`hostOnly`, `storeId`, ...); those are ignored on read and omitted on
/// write.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Cookie {
    /// Cookie name.
    pub name: String,

    /// Cookie value.
    pub value: String,

    /// Cookie domain.
    pub domain: String,

    /// Cookie path.
    pub path: String,

    /// Expiry as a Unix timestamp; absent for session cookies.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub expires: Option<f64>,

    /// Whether the cookie is HTTP-only.
    #[serde(rename = "httpOnly", default)]
    pub http_only: bool,

    /// Whether the cookie requires a secure transport.
    #[serde(default)]
    pub secure: bool,

    /// `SameSite` attribute, when present.
    #[serde(rename = "sameSite", default, skip_serializing_if = "Option::is_none")]
    pub same_site: Option<SameSite>,
}

/// Storage contents for one origin.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OriginState {
    /// The origin, e.g. `https://chat.qwen.ai`.
    pub origin: String,

    /// localStorage entries for the origin.
    #[serde(rename = "localStorage")]
    pub local_storage: Vec<StorageEntry>,

    /// sessionStorage entries for the origin.
    #[serde(rename = "sessionStorage", default, skip_serializing_if = "Vec::is_empty")]
    pub session_storage: Vec<StorageEntry>,
}

/// A complete storage-state snapshot.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct StorageState {
    /// Cookies across all captured domains.
    pub cookies: Vec<Cookie>,

    /// Per-origin storage contents.
    pub origins: Vec<OriginState>,
}

impl StorageState {
    /// Loads a snapshot from a `storage_state.json` file.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let file = File::open(path)
            .map_err(|err| Error::io(format!("failed to open {}", path.display()), err))?;
        let reader = BufReader::new(file);
        serde_json::from_reader(reader).map_err(|err| {
            Error::serialization(
                format!("failed to parse storage state from {}", path.display()),
                Some(Box::new(err)),
            )
        })
    }

    /// Returns the total number of stored entries across all origins.
    pub fn entry_count(&self) -> usize {
        self.origins
            .iter()
            .map(|origin| origin.local_storage.len() + origin.session_storage.len())
            .sum()
    }
}
