use super::FlowError;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Screen {
    Start,
    #[default]
    Loading,
    Learning,
}

/// Modal shown on top of the learning screen.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Overlay {
    #[default]
    Hidden,
    Completion,
    QuizResults,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ScreenEvent {
    BeginLoading,
    ShowStart,
    ShowLearning,
    OpenCompletion,
    OpenQuizResults,
    CloseOverlay,
}

impl ScreenEvent {
    fn name(self) -> &'static str {
        match self {
            Self::BeginLoading => "begin-loading",
            Self::ShowStart => "show-start",
            Self::ShowLearning => "show-learning",
            Self::OpenCompletion => "open-completion",
            Self::OpenQuizResults => "open-quiz-results",
            Self::CloseOverlay => "close-overlay",
        }
    }
}

/// Which screen is visible and which modal, if any, covers it.
///
/// Starts on `Loading` because the app checks for a resumable session before showing
/// anything else. Holds no business data.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct ScreenState {
    pub screen: Screen,
    pub overlay: Overlay,
}

impl ScreenState {
    /// # Errors
    ///
    /// Returns `FlowError::InvalidTransition` when an overlay is opened outside the
    /// learning screen.
    pub fn transition(&self, event: ScreenEvent) -> Result<Self, FlowError> {
        let (screen, overlay) = match (self.screen, event) {
            (_, ScreenEvent::BeginLoading) => (Screen::Loading, Overlay::Hidden),
            (_, ScreenEvent::ShowStart) => (Screen::Start, Overlay::Hidden),
            (_, ScreenEvent::ShowLearning) => (Screen::Learning, Overlay::Hidden),
            (Screen::Learning, ScreenEvent::OpenCompletion) => {
                (Screen::Learning, Overlay::Completion)
            }
            (Screen::Learning, ScreenEvent::OpenQuizResults) => {
                (Screen::Learning, Overlay::QuizResults)
            }
            (screen, ScreenEvent::CloseOverlay) => (screen, Overlay::Hidden),
            (screen, event) => {
                return Err(FlowError::InvalidTransition {
                    flow: "screen",
                    state: screen_name(screen),
                    event: event.name(),
                });
            }
        };
        Ok(Self { screen, overlay })
    }
}

fn screen_name(screen: Screen) -> &'static str {
    match screen {
        Screen::Start => "start",
        Screen::Loading => "loading",
        Screen::Learning => "learning",
    }
}
