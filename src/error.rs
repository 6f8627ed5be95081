use thiserror::Error;

/// Errors raised by the data-preparation and plotting core.
///
/// Every transformation is single-pass and fail-fast: the first malformed
/// input aborts the call and nothing partial is returned.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DataError {
    /// The input shape or a typed field does not match the expected schema.
    #[error("format error: {0}")]
    Format(String),

    /// A value is out of its domain (unknown month label, empty item set, ...).
    #[error("value error: {0}")]
    Value(String),

    /// The rendering backend failed.
    #[error("render error: {0}")]
    Render(String),
}

impl DataError {
    pub fn format(message: impl Into<String>) -> Self {
        DataError::Format(message.into())
    }

    pub fn value(message: impl Into<String>) -> Self {
        DataError::Value(message.into())
    }

    pub fn render(message: impl Into<String>) -> Self {
        DataError::Render(message.into())
    }
}

/// Application-level error: a message plus the process exit code.
#[derive(Clone)]
pub struct AppError {
    exit_code: u8,
    message: String,
}

impl AppError {
    pub fn new(exit_code: u8, message: impl Into<String>) -> Self {
        Self {
            exit_code,
            message: message.into(),
        }
    }

    pub fn exit_code(&self) -> u8 {
        self.exit_code
    }
}

impl From<DataError> for AppError {
    fn from(err: DataError) -> Self {
        let exit_code = match err {
            DataError::Format(_) | DataError::Value(_) => 2,
            DataError::Render(_) => 4,
        };
        AppError::new(exit_code, err.to_string())
    }
}

impl std::fmt::Display for AppError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::fmt::Debug for AppError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppError")
            .field("exit_code", &self.exit_code)
            .field("message", &self.message)
            .finish()
    }
}

impl std::error::Error for AppError {}
