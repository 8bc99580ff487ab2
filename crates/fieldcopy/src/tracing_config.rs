//! Tracing bootstrap for hosts that want the copier's diagnostics on stderr.
//!
//! The copier only emits `tracing` events; it never installs a subscriber on
//! its own. Applications that already configure `tracing` need nothing from
//! here. Others can call [`init_tracing`] once at startup.
//!
//! Output format is controlled by `FIELDCOPY_LOG_FORMAT`:
//!
//! - `text` (default): Standard `tracing-subscriber` flat output
//! - `tree`: Hierarchical indented output via `tracing-tree`
//! - `json`: One JSON object per span/event
//!
//! ```bash
//! FIELDCOPY_LOG=warn my-app                       # skipped fields only
//! FIELDCOPY_LOG=fieldcopy=trace FIELDCOPY_LOG_FORMAT=tree my-app
//! ```
//!
//! The subscriber is only initialised when `FIELDCOPY_LOG` (or `RUST_LOG`) is
//! set.

use tracing_subscriber::prelude::*;
use tracing_subscriber::{EnvFilter, Registry, fmt};

/// Tracing output format.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFormat {
    /// Standard flat text lines (default).
    Text,
    /// Hierarchical indented tree via `tracing-tree`.
    Tree,
    /// Newline-delimited JSON objects.
    Json,
}

impl LogFormat {
    /// Parse a format name; anything unrecognised is `Text`.
    pub fn parse(value: &str) -> Self {
        match value.trim().to_lowercase().as_str() {
            "tree" => Self::Tree,
            "json" => Self::Json,
            _ => Self::Text,
        }
    }

    fn from_env() -> Self {
        Self::parse(&std::env::var("FIELDCOPY_LOG_FORMAT").unwrap_or_default())
    }
}

/// Build an `EnvFilter` from `FIELDCOPY_LOG`, falling back to `RUST_LOG`.
fn build_filter() -> EnvFilter {
    if let Ok(val) = std::env::var("FIELDCOPY_LOG") {
        EnvFilter::builder().parse_lossy(val)
    } else {
        EnvFilter::from_default_env()
    }
}

/// Initialise the global tracing subscriber.
///
/// Does nothing when neither `FIELDCOPY_LOG` nor `RUST_LOG` is set, or when
/// a global subscriber is already installed.
pub fn init_tracing() {
    let has_own_log = std::env::var("FIELDCOPY_LOG").is_ok();
    let has_rust_log = std::env::var("RUST_LOG").is_ok();
    if !has_own_log && !has_rust_log {
        return;
    }

    let filter = build_filter();
    let installed = match LogFormat::from_env() {
        LogFormat::Tree => {
            let tree_layer = tracing_tree::HierarchicalLayer::default()
                .with_indent_amount(2)
                .with_indent_lines(true)
                .with_targets(true);
            Registry::default().with(filter).with(tree_layer).try_init()
        }
        LogFormat::Json => {
            let json_layer = fmt::layer().json().with_writer(std::io::stderr);
            Registry::default().with(filter).with(json_layer).try_init()
        }
        LogFormat::Text => {
            let text_layer = fmt::layer().with_writer(std::io::stderr);
            Registry::default().with(filter).with(text_layer).try_init()
        }
    };
    if installed.is_err() {
        tracing::debug!("global tracing subscriber already installed; keeping it");
    }
}
