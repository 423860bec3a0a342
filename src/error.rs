//! Application error type.
//!
//! Every fallible path in the crate returns `AppError`. The binary maps it to a
//! process exit code; library callers can match on [`ErrorKind`].

/// Broad failure category (also selects the exit code).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// A required input file is missing.
    InputNotFound,
    /// Parameters or data shape make the run impossible to start.
    InvalidConfiguration,
    /// An input file exists but could not be parsed.
    Parse,
    /// Reading or writing an artifact failed.
    Io,
}

impl ErrorKind {
    pub fn exit_code(self) -> u8 {
        match self {
            ErrorKind::InputNotFound => 2,
            ErrorKind::Parse => 2,
            ErrorKind::InvalidConfiguration => 3,
            ErrorKind::Io => 4,
        }
    }
}

#[derive(Clone)]
pub struct AppError {
    kind: ErrorKind,
    exit_code: u8,
    message: String,
}

impl AppError {
    pub fn new(kind: ErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            exit_code: kind.exit_code(),
            message: message.into(),
        }
    }

    pub fn input_not_found(path: &std::path::Path) -> Self {
        Self::new(
            ErrorKind::InputNotFound,
            format!("Input not found: '{}'", path.display()),
        )
    }

    pub fn invalid_config(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::InvalidConfiguration, message)
    }

    pub fn parse(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Parse, message)
    }

    pub fn io(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Io, message)
    }

    pub fn kind(&self) -> ErrorKind {
        self.kind
    }

    pub fn exit_code(&self) -> u8 {
        self.exit_code
    }

    pub fn message(&self) -> &str {
        &self.message
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
            .field("kind", &self.kind)
            .field("exit_code", &self.exit_code)
            .field("message", &self.message)
            .finish()
    }
}

impl std::error::Error for AppError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn input_not_found_mentions_path_and_uses_code_2() {
        let err = AppError::input_not_found(std::path::Path::new("data/missing.txt"));
        assert_eq!(err.kind(), ErrorKind::InputNotFound);
        assert_eq!(err.exit_code(), 2);
        assert!(err.to_string().contains("data/missing.txt"));
    }

    #[test]
    fn invalid_config_is_distinct_exit_code() {
        let err = AppError::invalid_config("bad");
        assert_eq!(err.exit_code(), 3);
        assert_eq!(err.message(), "bad");
    }
}
