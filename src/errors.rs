use thiserror::Error;

pub const AUTH_ERROR_CODE: &str = "AUTH_ERROR";
pub const INVALID_TOKEN_RESPONSE_CODE: &str = "INVALID_TOKEN_RESPONSE";

/// Failures produced inside the client before they are folded into an `ApiResponse`.
#[derive(Debug, Error)]
pub enum CatalogueError {
    /// Sign-in rejected by the upstream or a token response without a token.
    #[error("{message}")]
    Auth { message: String, code: String },

    /// Connection error, timeout or non-2xx status.
    #[error("{message}")]
    Transport {
        message: String,
        status: Option<u16>,
        retryable: bool,
    },

    /// Body was not valid JSON.
    #[error("{message}")]
    Decode { message: String },

    /// Caller input rejected before any request was issued.
    #[error("{message}")]
    Validation { message: String },

    #[error("invalid configuration: {message}")]
    Config { message: String },
}

impl CatalogueError {
    pub fn auth(message: impl Into<String>, code: impl Into<String>) -> Self {
        Self::Auth {
            message: message.into(),
            code: code.into(),
        }
    }

    pub fn decode(message: impl Into<String>) -> Self {
        Self::Decode {
            message: message.into(),
        }
    }

    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation {
            message: message.into(),
        }
    }

    pub fn config(message: impl Into<String>) -> Self {
        Self::Config {
            message: message.into(),
        }
    }

    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::Transport { retryable: true, .. })
    }

    pub fn is_unauthorized(&self) -> bool {
        matches!(self, Self::Transport { status: Some(401), .. })
    }

    /// Error code carried by auth failures, if any.
    pub fn code(&self) -> Option<&str> {
        match self {
            Self::Auth { code, .. } => Some(code.as_str()),
            _ => None,
        }
    }
}

impl From<reqwest::Error> for CatalogueError {
    fn from(err: reqwest::Error) -> Self {
        let status = err.status().map(|s| s.as_u16());
        let retryable = match status {
            Some(code) => code == 429 || (500..600).contains(&code),
            None => err.is_connect() || err.is_timeout(),
        };
        let message = with_causes(&err);
        // decode errors from `.json()` are not transport faults
        if err.is_decode() {
            return Self::decode(message);
        }
        Self::Transport {
            message,
            status,
            retryable,
        }
    }
}

/// `err` followed by each distinct cause in its source chain.
fn with_causes(err: &(dyn std::error::Error + 'static)) -> String {
    let mut message = err.to_string();
    let mut source = err.source();
    while let Some(cause) = source {
        let text = cause.to_string();
        if !message.contains(&text) {
            message.push_str(": ");
            message.push_str(&text);
        }
        source = cause.source();
    }
    message
}

impl From<serde_json::Error> for CatalogueError {
    fn from(err: serde_json::Error) -> Self {
        Self::decode(err.to_string())
    }
}
