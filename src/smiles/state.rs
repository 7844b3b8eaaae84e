//! SMILES Viewer State
//!
//! Holds the widget HTML. It is read once at startup and only ever shared
//! read-only between requests.

use crate::config::ServerConfig;
use crate::error::AppError;
use std::{
    path::{Path, PathBuf},
    sync::Arc,
};
use tracing::info;

/// Widget file name inside the web directory
pub const WIDGET_FILE_NAME: &str = "widget.html";
/// Directory holding the client-side widget
pub const WEB_DIR_NAME: &str = "web";

// =============================================================================
// Application State
// =============================================================================

/// Shared application state that can be safely passed between threads
pub type SharedState = Arc<AppState>;

/// Immutable data every per-request server is built from
#[derive(Debug, Clone)]
pub struct AppState {
    /// Widget document served as the `ui://` resource
    pub widget_html: Arc<str>,
}

impl AppState {
    /// Creates a state around already-loaded widget HTML.
    pub fn new(widget_html: impl Into<Arc<str>>) -> Self {
        Self {
            widget_html: widget_html.into(),
        }
    }

    /// Loads the widget from the configured path, or from the default
    /// location when none is configured.
    pub async fn load(config: &ServerConfig) -> Result<Self, AppError> {
        let path = match &config.widget_path {
            Some(path) => path.clone(),
            None => {
                let current_dir = std::env::current_dir().unwrap_or_else(|_| PathBuf::from("."));
                Self::locate_widget_file(&current_dir)
            }
        };

        info!("Using widget file: {:?}", path);

        let html = tokio::fs::read_to_string(&path)
            .await
            .map_err(|source| AppError::WidgetAsset {
                path: path.display().to_string(),
                source,
            })?;

        Ok(Self::new(html))
    }

    /// Attempts to locate the widget file using a multi-step strategy
    fn locate_widget_file(current_dir: &Path) -> PathBuf {
        // 1. ./web/widget.html
        // 2. ../web/widget.html (if running from a subdir)
        // 3. Fallback to the relative path
        let candidate = current_dir.join(WEB_DIR_NAME).join(WIDGET_FILE_NAME);
        if candidate.exists() {
            return candidate;
        }

        if let Some(parent) = current_dir.parent() {
            let candidate = parent.join(WEB_DIR_NAME).join(WIDGET_FILE_NAME);
            if candidate.exists() {
                return candidate;
            }
        }

        Path::new(WEB_DIR_NAME).join(WIDGET_FILE_NAME)
    }
}
