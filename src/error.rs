use thiserror::Error;

#[derive(Debug, Error)]
pub enum AssessError {
    #[error("I/O error while {context}: {source}")]
    Io {
        context: &'static str,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to decode {format} audio: {message}")]
    Decode {
        format: &'static str,
        message: String,
    },
    #[error("unsupported audio format: {0}")]
    UnsupportedFormat(String),
    #[error("invalid input: {message}")]
    InvalidInput { message: String },
}

impl AssessError {
    pub(crate) fn io(context: &'static str, source: std::io::Error) -> Self {
        Self::Io { context, source }
    }

    pub(crate) fn decode(format: &'static str, err: impl std::fmt::Display) -> Self {
        Self::Decode {
            format,
            message: err.to_string(),
        }
    }

    pub(crate) fn invalid_input(message: impl Into<String>) -> Self {
        Self::InvalidInput {
            message: message.into(),
        }
    }
}
