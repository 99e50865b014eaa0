//! Storage-state pusher for the local auth receiver.
//!
//! The companion browser extension exports a Playwright-shaped
//! `storage_state.json` snapshot of the chat origin's cookies and
//! storage. This tool pushes a snapshot file to the local `/save_auth`
//! receiver, for setups where the receiver runs on a different machine
//! than the browser that produced the snapshot.
//!
//! # Usage
//!
//! ```bash
//! qwintus-auth storage_state.json
//! qwintus-auth --auth-url http://127.0.0.1:8000/save_auth storage_state.json
//! ```

use arrrg::CommandLine;
use arrrg_derive::CommandLine;

use qwintus::types::StorageState;
use qwintus::QwenBridge;

/// Default snapshot file name, matching what the receiver writes.
const DEFAULT_STATE_FILE: &str = "storage_state.json";

/// Command-line arguments for the qwintus-auth tool.
#[derive(CommandLine, Debug, Default, PartialEq, Eq)]
struct AuthArgs {
    /// Auth receiver URL.
    #[arrrg(optional, "Auth receiver URL (default: http://127.0.0.1:8000/save_auth)", "URL")]
    auth_url: Option<String>,
}

#[tokio::main]
async fn main() {
    let (args, free) = AuthArgs::from_command_line_relaxed("qwintus-auth [OPTIONS] [STATE_FILE]");
    let path = free
        .first()
        .map(String::as_str)
        .unwrap_or(DEFAULT_STATE_FILE);

    let state = match StorageState::load(path) {
        Ok(state) => state,
        Err(err) => {
            eprintln!("qwintus-auth: {err}");
            std::process::exit(1);
        }
    };

    let client = match QwenBridge::with_options(None, args.auth_url.clone(), None) {
        Ok(client) => client,
        Err(err) => {
            eprintln!("qwintus-auth: {err}");
            std::process::exit(1);
        }
    };

    match client.save_auth_state(&state).await {
        Ok(()) => {
            println!(
                "Pushed {} cookie(s) and {} storage entries from {}",
                state.cookies.len(),
                state.entry_count(),
                path
            );
        }
        Err(err) => {
            eprintln!("qwintus-auth: {err}");
            std::process::exit(1);
        }
    }
}
