//! Boundary to the learning backend.
//!
//! The backend owns the session and scopes guide, note, chat and quiz requests to its
//! own idea of the "current" step; none of these calls name a step.

mod http;
mod memory;
mod wire;

use async_trait::async_trait;
use learn_core::model::{
    AnswerSheet, Difficulty, LearningStats, Persona, Question, QuizScore, Recommendation,
    Resource, Session, SessionError, Step,
};
use url::Url;

use crate::error::ApiError;

pub use http::HttpLearningApi;
pub use memory::{ApiCall, InMemoryLearningApi, InjectedFailure};

/// Server view of an in-progress session, as returned by resume.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SessionSnapshot {
    pub topic: String,
    pub steps: Vec<Step>,
    pub current_index: usize,
    pub persona: Persona,
    pub difficulty: Difficulty,
}

impl SessionSnapshot {
    /// # Errors
    ///
    /// Returns `SessionError` when the snapshot breaks a session invariant.
    pub fn into_session(self) -> Result<Session, SessionError> {
        Session::resume(
            self.topic,
            self.steps,
            self.persona,
            self.difficulty,
            self.current_index,
        )
    }
}

/// Roadmap generated for a freshly started topic.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct StartedRoadmap {
    pub topic: String,
    pub steps: Vec<Step>,
}

/// Server answer to an advance request.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Advance {
    /// The server moved to `index`; `step` carries its details when the server sent them.
    Moved { index: usize, step: Option<Step> },
    Completed,
}

#[async_trait]
pub trait LearningApi: Send + Sync {
    /// `Ok(None)` when the server has no session for this client.
    ///
    /// # Errors
    ///
    /// Returns `ApiError` for transport failures or a malformed snapshot.
    async fn resume_session(&self) -> Result<Option<SessionSnapshot>, ApiError>;

    /// # Errors
    ///
    /// Returns `ApiError` when the roadmap could not be generated.
    async fn start_topic(
        &self,
        topic: &str,
        persona: Persona,
        difficulty: Difficulty,
    ) -> Result<StartedRoadmap, ApiError>;

    /// # Errors
    ///
    /// Returns `ApiError` when the server refuses or cannot be reached.
    async fn next_step(&self) -> Result<Advance, ApiError>;

    /// # Errors
    ///
    /// Returns `ApiError` on failure.
    async fn guide(&self) -> Result<String, ApiError>;

    /// # Errors
    ///
    /// Returns `ApiError` on failure.
    async fn note(&self) -> Result<Option<String>, ApiError>;

    /// # Errors
    ///
    /// Returns `ApiError` on failure.
    async fn save_note(&self, content: &str) -> Result<(), ApiError>;

    /// `topic` and `step_title` are search context for the resource finder.
    ///
    /// `Ok(None)` means the service answered without a resource list at all, which is
    /// not the same as an empty one.
    ///
    /// # Errors
    ///
    /// Returns `ApiError` on failure.
    async fn resources(
        &self,
        topic: &str,
        step_title: &str,
    ) -> Result<Option<Vec<Resource>>, ApiError>;

    /// # Errors
    ///
    /// Returns `ApiError` on failure.
    async fn chat(&self, message: &str) -> Result<String, ApiError>;

    /// # Errors
    ///
    /// Returns `ApiError` on failure.
    async fn clear_chat(&self) -> Result<(), ApiError>;

    /// # Errors
    ///
    /// Returns `ApiError` on failure.
    async fn generate_quiz(&self) -> Result<Vec<Question>, ApiError>;

    /// # Errors
    ///
    /// Returns `ApiError` on failure.
    async fn submit_quiz(
        &self,
        questions: &[Question],
        answers: &AnswerSheet,
    ) -> Result<QuizScore, ApiError>;

    /// # Errors
    ///
    /// Returns `ApiError` on failure.
    async fn generate_assessment(&self) -> Result<Vec<Question>, ApiError>;

    /// # Errors
    ///
    /// Returns `ApiError` on failure.
    async fn analyze_assessment(
        &self,
        questions: &[Question],
        answers: &AnswerSheet,
    ) -> Result<Recommendation, ApiError>;

    /// # Errors
    ///
    /// Returns `ApiError` on failure.
    async fn stats(&self) -> Result<LearningStats, ApiError>;

    /// Download link for the handbook export, if this backend offers one.
    fn export_url(&self) -> Option<Url>;
}
