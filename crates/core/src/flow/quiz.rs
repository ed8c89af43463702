use crate::model::{AnswerSheet, OptionKey, Question, QuizScore};

use super::FlowError;

/// Questions on the quiz panel plus the learner's single selection per question.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct QuizSheet {
    questions: Vec<Question>,
    selections: AnswerSheet,
}

impl QuizSheet {
    /// # Errors
    ///
    /// Returns `FlowError::EmptyQuestionSet` when `questions` is empty.
    pub fn new(questions: Vec<Question>) -> Result<Self, FlowError> {
        if questions.is_empty() {
            return Err(FlowError::EmptyQuestionSet);
        }
        Ok(Self {
            questions,
            selections: AnswerSheet::new(),
        })
    }

    #[must_use]
    pub fn questions(&self) -> &[Question] {
        &self.questions
    }

    #[must_use]
    pub fn selections(&self) -> &AnswerSheet {
        &self.selections
    }

    #[must_use]
    pub fn selected(&self, index: usize) -> Option<&OptionKey> {
        self.selections.get(&index)
    }

    #[must_use]
    pub fn answered_count(&self) -> usize {
        self.selections.len()
    }

    /// Record `key` for question `index`, replacing any earlier choice.
    ///
    /// # Errors
    ///
    /// Returns `FlowError::QuestionOutOfRange` or `FlowError::UnknownOption`.
    pub fn select(&mut self, index: usize, key: OptionKey) -> Result<(), FlowError> {
        let question = self
            .questions
            .get(index)
            .ok_or(FlowError::QuestionOutOfRange {
                index,
                total: self.questions.len(),
            })?;
        if !question.has_option(&key) {
            return Err(FlowError::UnknownOption {
                index,
                key: key.to_string(),
            });
        }
        self.selections.insert(index, key);
        Ok(())
    }
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub enum QuizFlow {
    #[default]
    Idle,
    Generating,
    Displaying(QuizSheet),
    Submitting(QuizSheet),
    Submitted { sheet: QuizSheet, score: QuizScore },
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum QuizEvent {
    Generate,
    Generated(Vec<Question>),
    GenerationFailed,
    Select { question: usize, key: OptionKey },
    Submit,
    Scored(QuizScore),
    SubmissionFailed,
    Close,
}

impl QuizEvent {
    fn name(&self) -> &'static str {
        match self {
            Self::Generate => "generate",
            Self::Generated(_) => "generated",
            Self::GenerationFailed => "generation-failed",
            Self::Select { .. } => "select",
            Self::Submit => "submit",
            Self::Scored(_) => "scored",
            Self::SubmissionFailed => "submission-failed",
            Self::Close => "close",
        }
    }
}

impl QuizFlow {
    #[must_use]
    pub fn state_name(&self) -> &'static str {
        match self {
            Self::Idle => "idle",
            Self::Generating => "generating",
            Self::Displaying(_) => "displaying",
            Self::Submitting(_) => "submitting",
            Self::Submitted { .. } => "submitted",
        }
    }

    /// Generation is blocked while a request is in flight.
    #[must_use]
    pub fn can_generate(&self) -> bool {
        !matches!(self, Self::Generating | Self::Submitting(_))
    }

    #[must_use]
    pub fn can_submit(&self) -> bool {
        matches!(self, Self::Displaying(_))
    }

    #[must_use]
    pub fn sheet(&self) -> Option<&QuizSheet> {
        match self {
            Self::Displaying(sheet) | Self::Submitting(sheet) | Self::Submitted { sheet, .. } => {
                Some(sheet)
            }
            Self::Idle | Self::Generating => None,
        }
    }

    #[must_use]
    pub fn score(&self) -> Option<&QuizScore> {
        match self {
            Self::Submitted { score, .. } => Some(score),
            _ => None,
        }
    }

    /// # Errors
    ///
    /// Returns `FlowError::InvalidTransition` for events the current state does not
    /// accept, and sheet errors for bad selections or empty question sets.
    pub fn transition(&self, event: QuizEvent) -> Result<Self, FlowError> {
        match (self, event) {
            (_, QuizEvent::Close) => Ok(Self::Idle),
            (Self::Idle | Self::Displaying(_) | Self::Submitted { .. }, QuizEvent::Generate) => {
                Ok(Self::Generating)
            }
            (Self::Generating, QuizEvent::Generated(questions)) => {
                Ok(Self::Displaying(QuizSheet::new(questions)?))
            }
            (Self::Generating, QuizEvent::GenerationFailed) => Ok(Self::Idle),
            (Self::Displaying(sheet), QuizEvent::Select { question, key }) => {
                let mut sheet = sheet.clone();
                sheet.select(question, key)?;
                Ok(Self::Displaying(sheet))
            }
            (Self::Displaying(sheet), QuizEvent::Submit) => Ok(Self::Submitting(sheet.clone())),
            (Self::Submitting(sheet), QuizEvent::Scored(score)) => Ok(Self::Submitted {
                sheet: sheet.clone(),
                score,
            }),
            (Self::Submitting(sheet), QuizEvent::SubmissionFailed) => {
                Ok(Self::Displaying(sheet.clone()))
            }
            (state, event) => Err(FlowError::InvalidTransition {
                flow: "quiz",
                state: state.state_name(),
                event: event.name(),
            }),
        }
    }
}
