use crate::model::{AnswerSheet, OptionKey, Question, Recommendation};

use super::FlowError;

/// One assessment attempt: the questions, the answers so far and the question on screen.
///
/// `current` only ever moves forward by one per answer.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AssessmentSheet {
    questions: Vec<Question>,
    answers: AnswerSheet,
    current: usize,
}

impl AssessmentSheet {
    fn new(questions: Vec<Question>) -> Result<Self, FlowError> {
        if questions.is_empty() {
            return Err(FlowError::EmptyQuestionSet);
        }
        Ok(Self {
            questions,
            answers: AnswerSheet::new(),
            current: 0,
        })
    }

    #[must_use]
    pub fn questions(&self) -> &[Question] {
        &self.questions
    }

    #[must_use]
    pub fn answers(&self) -> &AnswerSheet {
        &self.answers
    }

    #[must_use]
    pub fn current(&self) -> usize {
        self.current
    }

    #[must_use]
    pub fn total(&self) -> usize {
        self.questions.len()
    }

    #[must_use]
    pub fn current_question(&self) -> &Question {
        &self.questions[self.current]
    }

    #[must_use]
    pub fn is_last(&self) -> bool {
        self.current + 1 >= self.questions.len()
    }
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub enum AssessmentFlow {
    #[default]
    Intro,
    Generating,
    Questions(AssessmentSheet),
    Analyzing(AssessmentSheet),
    Results(Recommendation),
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum AssessmentEvent {
    Start,
    Generated(Vec<Question>),
    GenerationFailed,
    Answer(OptionKey),
    Analyzed(Recommendation),
    AnalysisFailed,
    Reset,
}

impl AssessmentEvent {
    fn name(&self) -> &'static str {
        match self {
            Self::Start => "start",
            Self::Generated(_) => "generated",
            Self::GenerationFailed => "generation-failed",
            Self::Answer(_) => "answer",
            Self::Analyzed(_) => "analyzed",
            Self::AnalysisFailed => "analysis-failed",
            Self::Reset => "reset",
        }
    }
}

impl AssessmentFlow {
    #[must_use]
    pub fn state_name(&self) -> &'static str {
        match self {
            Self::Intro => "intro",
            Self::Generating => "generating",
            Self::Questions(_) => "questions",
            Self::Analyzing(_) => "analyzing",
            Self::Results(_) => "results",
        }
    }

    #[must_use]
    pub fn recommendation(&self) -> Option<&Recommendation> {
        match self {
            Self::Results(recommendation) => Some(recommendation),
            _ => None,
        }
    }

    /// # Errors
    ///
    /// Returns `FlowError::InvalidTransition` for events the current state does not
    /// accept, `FlowError::UnknownOption` for an answer the question does not offer and
    /// `FlowError::EmptyQuestionSet` when generation returns nothing.
    pub fn transition(&self, event: AssessmentEvent) -> Result<Self, FlowError> {
        match (self, event) {
            (_, AssessmentEvent::Reset) => Ok(Self::Intro),
            (Self::Intro | Self::Results(_), AssessmentEvent::Start) => Ok(Self::Generating),
            (Self::Generating, AssessmentEvent::Generated(questions)) => {
                Ok(Self::Questions(AssessmentSheet::new(questions)?))
            }
            (Self::Generating, AssessmentEvent::GenerationFailed) => Ok(Self::Intro),
            (Self::Questions(sheet), AssessmentEvent::Answer(key)) => {
                if !sheet.current_question().has_option(&key) {
                    return Err(FlowError::UnknownOption {
                        index: sheet.current,
                        key: key.to_string(),
                    });
                }
                let mut sheet = sheet.clone();
                sheet.answers.insert(sheet.current, key);
                if sheet.is_last() {
                    Ok(Self::Analyzing(sheet))
                } else {
                    sheet.current += 1;
                    Ok(Self::Questions(sheet))
                }
            }
            (Self::Analyzing(_), AssessmentEvent::Analyzed(recommendation)) => {
                Ok(Self::Results(recommendation))
            }
            (Self::Analyzing(_), AssessmentEvent::AnalysisFailed) => Ok(Self::Intro),
            (state, event) => Err(FlowError::InvalidTransition {
                flow: "assessment",
                state: state.state_name(),
                event: event.name(),
            }),
        }
    }
}
