//! Finite-state machines for the screen switcher, the quiz panel and the career
//! assessment.
//!
//! Every flow is a plain value with a `transition(&self, event)` table that returns the
//! next state or a [`FlowError`]; network calls live outside, in the services layer.

mod assessment;
mod quiz;
mod screen;

use thiserror::Error;

pub use assessment::{AssessmentEvent, AssessmentFlow, AssessmentSheet};
pub use quiz::{QuizEvent, QuizFlow, QuizSheet};
pub use screen::{Overlay, Screen, ScreenEvent, ScreenState};

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum FlowError {
    #[error("{flow}: cannot apply `{event}` while {state}")]
    InvalidTransition {
        flow: &'static str,
        state: &'static str,
        event: &'static str,
    },
    #[error("question {index} is out of range ({total} questions)")]
    QuestionOutOfRange { index: usize, total: usize },
    #[error("option {key} does not exist for question {index}")]
    UnknownOption { index: usize, key: String },
    #[error("no questions were returned")]
    EmptyQuestionSet,
}
