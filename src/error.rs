use serde::Serialize;

/// Adapter-wide error type. Every fallible function returns `Result<T, AppError>`.
/// Serializes cleanly for the host so callers get structured error messages.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("Configuration error: {0}")]
    Configuration(String),

    #[error("{0}")]
    Validation(String),

    #[error("AiSensy API error: {0}")]
    Remote(String),

    #[error("Transport error: {0}")]
    Transport(String),

    #[error("Serialization error: {0}")]
    Serde(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[cfg(feature = "desktop")]
    #[error("Keyring error: {0}")]
    Keyring(String),

    #[error("{0}")]
    Internal(String),
}

impl AppError {
    /// Stable machine-readable discriminator, also used as the serialized `kind`.
    pub fn kind(&self) -> &'static str {
        match self {
            AppError::Configuration(_) => "configuration",
            AppError::Validation(_) => "validation",
            AppError::Remote(_) => "remote",
            AppError::Transport(_) => "transport",
            AppError::Serde(_) => "serde",
            AppError::Io(_) => "io",
            #[cfg(feature = "desktop")]
            AppError::Keyring(_) => "keyring",
            AppError::Internal(_) => "internal",
        }
    }
}

/// Map a `reqwest` failure onto the taxonomy. Timeouts and connection failures are
/// transport errors; a status error carries the remote status.
impl From<reqwest::Error> for AppError {
    fn from(e: reqwest::Error) -> Self {
        if let Some(status) = e.status() {
            return AppError::Remote(format!("HTTP {}: {}", status.as_u16(), e));
        }
        if e.is_timeout() {
            return AppError::Transport(format!("request timed out: {e}"));
        }
        if e.is_decode() {
            return AppError::Remote(format!("malformed response body: {e}"));
        }
        AppError::Transport(e.to_string())
    }
}

/// Hosts require `Serialize` on returned errors.
/// We serialize as `{ error: "...", kind: "..." }`.
impl Serialize for AppError {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        use serde::ser::SerializeStruct;
        let mut s = serializer.serialize_struct("AppError", 2)?;
        s.serialize_field("error", &self.to_string())?;
        s.serialize_field("kind", self.kind())?;
        s.end()
    }
}
