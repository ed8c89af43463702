mod assessment;
mod chat;
mod ids;
mod question;
mod quiz;
mod resource;
mod session;
mod stats;

pub use assessment::Recommendation;
pub use chat::{ChatMessage, ChatRole, ChatTranscript, clean_chat_text};
pub use ids::StepNumber;
pub use question::{AnswerSheet, OptionKey, Question};
pub use quiz::{PASS_MARK_PERCENT, QuestionOutcome, QuizScore};
pub use resource::{Resource, ResourceKind, fallback_resources};
pub use session::{Difficulty, Persona, Session, SessionError, Step, StepProgress};
pub use stats::LearningStats;
