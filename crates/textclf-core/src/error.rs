//! Error types for textclf

/// Result type alias using textclf's Error type
pub type Result<T> = std::result::Result<T, Error>;

/// Core error type for textclf operations
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Configuration errors (artifact config, server config)
    #[error("configuration error: {0}")]
    Config(String),

    /// Model loading and inference errors
    #[error("classifier error: {0}")]
    Classifier(String),

    /// Tokenizer loading and encoding errors
    #[error("tokenizer error: {0}")]
    Tokenizer(String),
}

impl Error {
    /// Create a new configuration error
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    /// Create a new classifier error
    pub fn classifier(msg: impl Into<String>) -> Self {
        Self::Classifier(msg.into())
    }

    /// Create a new tokenizer error
    pub fn tokenizer(msg: impl Into<String>) -> Self {
        Self::Tokenizer(msg.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_messages_carry_kind() {
        let err = Error::config("model_type missing");
        assert_eq!(err.to_string(), "configuration error: model_type missing");

        let err = Error::tokenizer("bad vocab");
        assert_eq!(err.to_string(), "tokenizer error: bad vocab");
    }

    #[test]
    fn test_classifier_error_message() {
        let err = Error::classifier("Model forward pass failed: boom");
        assert!(matches!(err, Error::Classifier(_)));
        assert_eq!(
            err.to_string(),
            "classifier error: Model forward pass failed: boom"
        );
    }
}
