use std::time::Duration;

use chrono::{DateTime, Utc};
use learn_core::Clock;
use learn_core::flashcards::FlashcardDeck;
use learn_core::flow::{AssessmentFlow, QuizFlow, ScreenState};
use learn_core::model::{ChatTranscript, LearningStats, Recommendation, Resource, Session};

use super::panels::PanelTicket;

/// Request/response state of one side panel.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub enum PanelState<T> {
    #[default]
    Idle,
    Loading,
    Ready(T),
    Failed(String),
}

impl<T> PanelState<T> {
    #[must_use]
    pub fn is_loading(&self) -> bool {
        matches!(self, Self::Loading)
    }

    #[must_use]
    pub fn ready(&self) -> Option<&T> {
        match self {
            Self::Ready(value) => Some(value),
            _ => None,
        }
    }
}

/// Guide text and related links for the step on screen.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct StepPanels {
    pub guide: PanelState<String>,
    pub resources: PanelState<Vec<Resource>>,
}

impl StepPanels {
    pub(crate) fn loading() -> Self {
        Self {
            guide: PanelState::Loading,
            resources: PanelState::Loading,
        }
    }
}

/// Note editor for the current step.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct NoteState {
    pub(crate) draft: String,
    pub(crate) saved_at: Option<DateTime<Utc>>,
}

impl NoteState {
    #[must_use]
    pub fn draft(&self) -> &str {
        &self.draft
    }

    #[must_use]
    pub fn saved_at(&self) -> Option<DateTime<Utc>> {
        self.saved_at
    }

    /// Whether the "Saved!" indicator is still up on `clock`.
    #[must_use]
    pub fn saved_recently(&self, clock: &Clock, window: Duration) -> bool {
        let Some(saved_at) = self.saved_at else {
            return false;
        };
        chrono::Duration::from_std(window)
            .is_ok_and(|window| clock.since(saved_at) < window)
    }
}

/// Requests in flight; each one disables the control that triggered it.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct PendingActions {
    pub starting: bool,
    pub navigating: bool,
    pub saving_note: bool,
    pub chatting: bool,
}

/// Blocking notification shown after a failed action.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Notice {
    pub message: String,
}

impl Notice {
    #[must_use]
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

/// Everything the learning client knows, owned by `LearningController`.
#[derive(Clone, Debug, Default)]
pub struct AppState {
    pub(crate) screen: ScreenState,
    pub(crate) session: Option<Session>,
    pub(crate) flashcards: FlashcardDeck,
    pub(crate) panels: StepPanels,
    pub(crate) chat: ChatTranscript,
    pub(crate) note: NoteState,
    pub(crate) quiz: QuizFlow,
    pub(crate) assessment: AssessmentFlow,
    pub(crate) completed: bool,
    pub(crate) stats: Option<LearningStats>,
    pub(crate) pending: PendingActions,
    pub(crate) notice: Option<Notice>,
    pub(crate) panel_generation: u64,
    pub(crate) panel_ticket: Option<PanelTicket>,
}

impl AppState {
    #[must_use]
    pub fn screen(&self) -> ScreenState {
        self.screen
    }

    #[must_use]
    pub fn session(&self) -> Option<&Session> {
        self.session.as_ref()
    }

    #[must_use]
    pub fn flashcards(&self) -> &FlashcardDeck {
        &self.flashcards
    }

    #[must_use]
    pub fn panels(&self) -> &StepPanels {
        &self.panels
    }

    #[must_use]
    pub fn chat(&self) -> &ChatTranscript {
        &self.chat
    }

    #[must_use]
    pub fn note(&self) -> &NoteState {
        &self.note
    }

    #[must_use]
    pub fn quiz(&self) -> &QuizFlow {
        &self.quiz
    }

    #[must_use]
    pub fn assessment(&self) -> &AssessmentFlow {
        &self.assessment
    }

    #[must_use]
    pub fn recommendation(&self) -> Option<&Recommendation> {
        self.assessment.recommendation()
    }

    /// The learner reached the end of the roadmap.
    #[must_use]
    pub fn is_completed(&self) -> bool {
        self.completed
    }

    #[must_use]
    pub fn stats(&self) -> Option<&LearningStats> {
        self.stats.as_ref()
    }

    #[must_use]
    pub fn pending(&self) -> PendingActions {
        self.pending
    }

    #[must_use]
    pub fn notice(&self) -> Option<&Notice> {
        self.notice.as_ref()
    }

    /// Ticket for the panel responses that are currently allowed to land.
    #[must_use]
    pub fn panel_ticket(&self) -> Option<PanelTicket> {
        self.panel_ticket
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use learn_core::time::{fixed_clock, fixed_now};

    #[test]
    fn saved_indicator_expires_after_window() {
        let note = NoteState {
            draft: "ownership".into(),
            saved_at: Some(fixed_now()),
        };
        let window = Duration::from_secs(2);
        let mut clock = fixed_clock();
        assert!(note.saved_recently(&clock, window));
        clock.advance(chrono::Duration::milliseconds(1999));
        assert!(note.saved_recently(&clock, window));
        clock.advance(chrono::Duration::milliseconds(1));
        assert!(!note.saved_recently(&clock, window));
        assert!(!NoteState::default().saved_recently(&fixed_clock(), window));
    }

    #[test]
    fn panel_state_accessors() {
        let ready = PanelState::Ready(3);
        assert_eq!(ready.ready(), Some(&3));
        assert!(!ready.is_loading());
        assert!(StepPanels::loading().guide.is_loading());
    }
}
