//! Shared error types for the services crate.

use thiserror::Error;

use learn_core::flow::FlowError;
use learn_core::model::SessionError;

/// Failures talking to the learning backend.
///
/// Two classes matter to callers: transport failures (the request or its response
/// never made sense) and application failures (`success: false` from the server).
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum ApiError {
    #[error("{0}")]
    Application(String),
    #[error("request failed with status {0}")]
    HttpStatus(reqwest::StatusCode),
    #[error("malformed response: {0}")]
    Malformed(String),
    #[error("backend unavailable: {0}")]
    Unavailable(String),
    #[error("invalid endpoint: {0}")]
    Url(#[from] url::ParseError),
    #[error(transparent)]
    Http(#[from] reqwest::Error),
}

impl ApiError {
    #[must_use]
    pub fn is_transport(&self) -> bool {
        !matches!(self, Self::Application(_))
    }
}

/// Errors emitted by `LearningController`.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum ControllerError {
    #[error("enter a topic to start learning")]
    EmptyTopic,
    #[error("no active learning session")]
    NoSession,
    #[error("no career recommendation to start from")]
    NoRecommendation,
    #[error(transparent)]
    Api(#[from] ApiError),
    #[error(transparent)]
    Flow(#[from] FlowError),
    #[error(transparent)]
    Session(#[from] SessionError),
}

impl ControllerError {
    /// Text for the blocking notification shown to the learner.
    ///
    /// Transport and application failures read the same way.
    #[must_use]
    pub fn user_message(&self) -> String {
        format!("Error: {self}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn application_failures_are_not_transport() {
        assert!(!ApiError::Application("No active session".into()).is_transport());
        assert!(ApiError::Malformed("eof".into()).is_transport());
        assert!(ApiError::Unavailable("offline".into()).is_transport());
    }

    #[test]
    fn both_classes_share_notification_format() {
        let app = ControllerError::from(ApiError::Application("Topic is required".into()));
        let transport = ControllerError::from(ApiError::Unavailable("offline".into()));
        assert_eq!(app.user_message(), "Error: Topic is required");
        assert_eq!(transport.user_message(), "Error: backend unavailable: offline");
    }
}
