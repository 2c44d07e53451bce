use thiserror::Error;

/// Errors raised by the configuration and event surfaces around the pipeline.
///
/// The text pipeline itself never returns one of these; its degraded paths are
/// expressed through [`RenderError`] and recovered locally.
#[derive(Debug, Error)]
pub enum NotifyError {
    #[error("Invalid configuration: {0}")]
    ConfigError(String),

    #[error("Failed to parse event payload: {0}")]
    ParseError(String),

    #[error("Failed to serialize message: {0}")]
    SerializeError(String),
}

impl From<serde_json::Error> for NotifyError {
    fn from(error: serde_json::Error) -> Self {
        if error.is_data() || error.is_syntax() || error.is_eof() {
            NotifyError::ParseError(error.to_string())
        } else {
            NotifyError::SerializeError(error.to_string())
        }
    }
}

impl From<regex::Error> for NotifyError {
    fn from(error: regex::Error) -> Self {
        NotifyError::ConfigError(format!("tag pattern did not compile: {}", error))
    }
}

/// Expected rendering outcomes that force the legacy path.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum RenderError {
    #[error("No usable summary and no bullet items to structure")]
    StructuringFailure,
}
