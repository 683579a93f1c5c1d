use crate::conversation::ConversationError;
use crate::model::ModelError;
use thiserror::Error;

/// Errors that end an orchestration cycle.
///
/// Tool failures never appear here; they are handed to the model as error
/// results instead.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum Error {
    #[error("config error: {0}")]
    Config(String),

    #[error(transparent)]
    Model(#[from] ModelError),

    #[error("conversation error: {0}")]
    Conversation(#[from] ConversationError),
}

impl Error {
    /// Whether asking again later may succeed.
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::Model(e) if e.is_retryable())
    }

    /// Whether the provider rejected the credentials.
    pub fn is_auth(&self) -> bool {
        matches!(self, Self::Model(ModelError::Auth(_)))
    }
}

pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[test]
    fn classification() {
        let limited = Error::from(ModelError::RateLimited {
            retry_after: Some(Duration::from_secs(3)),
        });
        assert!(limited.is_retryable());
        assert!(!limited.is_auth());

        let auth = Error::from(ModelError::Auth("bad key".into()));
        assert!(auth.is_auth());
        assert!(!auth.is_retryable());

        assert!(!Error::Config("x".into()).is_retryable());
    }
}
