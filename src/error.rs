use thiserror::Error;

/// Shell error type
#[derive(Debug, Error)]
pub enum ShellError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Invalid URL '{url}': {source}")]
    InvalidUrl {
        url: String,
        #[source]
        source: url::ParseError,
    },

    #[error("Image error: {0}")]
    Image(#[from] image::ImageError),

    #[error("Could not determine project directories")]
    NoProjectDirs,

    #[error("Lock poisoned: {context}")]
    LockPoisoned { context: &'static str },

    /// Failure reported by the windowing/tray/opener host
    #[error("{operation} failed: {reason}")]
    Host {
        operation: &'static str,
        reason: String,
    },
}

impl ShellError {
    pub fn host(operation: &'static str, reason: impl ToString) -> Self {
        Self::Host {
            operation,
            reason: reason.to_string(),
        }
    }
}

// For host callback returns - converts ShellError to String
impl From<ShellError> for String {
    fn from(e: ShellError) -> Self {
        e.to_string()
    }
}

pub type Result<T, E = ShellError> = std::result::Result<T, E>;
