//! Single owner of the learning client's state.
//!
//! Every user action is an `async fn` on [`LearningController`] taking `&mut self`, so
//! actions on one controller run strictly one after another. Pure transitions live in
//! `learn_core::flow`; this module only sequences them around `LearningApi` calls.

mod panels;
mod state;

use std::sync::Arc;

use learn_core::flashcards::FlashcardDeck;
use learn_core::flow::{
    AssessmentEvent, AssessmentFlow, Overlay, QuizEvent, QuizFlow, ScreenEvent,
};
use learn_core::model::{
    ChatRole, Difficulty, LearningStats, OptionKey, Persona, QuizScore, Recommendation, Session,
    fallback_resources,
};
use tracing::{debug, info, warn};
use url::Url;

use crate::Clock;
use crate::api::{Advance, LearningApi};
use crate::config::ControllerConfig;
use crate::error::ControllerError;

pub use panels::{PanelFetch, PanelFetcher, PanelTicket};
pub use state::{AppState, NoteState, Notice, PanelState, PendingActions, StepPanels};

const CHAT_CLEARED: &str = "Chat history cleared.";
const RESOURCES_FAILED: &str = "Error loading resources.";

/// How start-up resolved.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ResumeOutcome {
    Resumed,
    NoSession,
    Failed,
}

/// Result of asking the server to advance.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum NextOutcome {
    /// Now on step `index`.
    Moved(usize),
    /// The server kept the learner on the current step.
    Held,
    Completed,
}

/// What the assessment shows after an answer is registered.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum AssessmentStep {
    /// Next question index.
    Next(usize),
    Recommended(Recommendation),
}

pub struct LearningController {
    api: Arc<dyn LearningApi>,
    config: ControllerConfig,
    clock: Clock,
    state: AppState,
}

impl LearningController {
    #[must_use]
    pub fn new(api: Arc<dyn LearningApi>) -> Self {
        Self {
            api,
            config: ControllerConfig::default(),
            clock: Clock::default(),
            state: AppState::default(),
        }
    }

    #[must_use]
    pub fn with_config(mut self, config: ControllerConfig) -> Self {
        self.config = config;
        self
    }

    #[must_use]
    pub fn with_clock(mut self, clock: Clock) -> Self {
        self.clock = clock;
        self
    }

    #[must_use]
    pub fn state(&self) -> &AppState {
        &self.state
    }

    #[must_use]
    pub fn config(&self) -> &ControllerConfig {
        &self.config
    }

    #[must_use]
    pub fn clock(&self) -> Clock {
        self.clock
    }

    /// Whether the note "Saved!" indicator should still be shown.
    #[must_use]
    pub fn note_saved_recently(&self) -> bool {
        self.state
            .note
            .saved_recently(&self.clock, self.config.saved_indicator)
    }

    // ─── Session lifecycle ───────────────────────────────────────────────

    /// Ask the server for an in-progress session and jump straight to it.
    ///
    /// Never leaves the loading screen up: any failure falls back to the start screen.
    pub async fn resume(&mut self) -> ResumeOutcome {
        self.switch_screen(ScreenEvent::BeginLoading);
        let snapshot = match self.api.resume_session().await {
            Ok(Some(snapshot)) => snapshot,
            Ok(None) => {
                debug!("no session to resume");
                self.switch_screen(ScreenEvent::ShowStart);
                return ResumeOutcome::NoSession;
            }
            Err(err) => {
                self.surface(err.into());
                self.switch_screen(ScreenEvent::ShowStart);
                return ResumeOutcome::Failed;
            }
        };

        match snapshot.into_session() {
            Ok(session) => {
                info!(
                    topic = session.topic(),
                    step = session.current_index(),
                    "resumed session"
                );
                self.install_session(session);
                ResumeOutcome::Resumed
            }
            Err(err) => {
                self.surface(err.into());
                self.switch_screen(ScreenEvent::ShowStart);
                ResumeOutcome::Failed
            }
        }
    }

    /// Start a roadmap for `topic`, replacing any current session on success.
    ///
    /// # Errors
    ///
    /// Returns `ControllerError::EmptyTopic` without calling the server for a blank
    /// topic, or the API/session error; the previous session is kept and the start
    /// screen shown.
    pub async fn start_topic(
        &mut self,
        topic: &str,
        persona: Persona,
        difficulty: Difficulty,
    ) -> Result<(), ControllerError> {
        let topic = topic.trim();
        if topic.is_empty() {
            return Err(self.surface(ControllerError::EmptyTopic));
        }

        self.state.pending.starting = true;
        self.switch_screen(ScreenEvent::BeginLoading);
        let result = self.api.start_topic(topic, persona, difficulty).await;
        self.state.pending.starting = false;

        let session = result
            .map_err(ControllerError::from)
            .and_then(|roadmap| {
                Session::new(roadmap.topic, roadmap.steps, persona, difficulty)
                    .map_err(ControllerError::from)
            });
        match session {
            Ok(session) => {
                info!(topic = session.topic(), steps = session.step_count(), "started topic");
                self.discard_quiz();
                self.install_session(session);
                Ok(())
            }
            Err(err) => {
                self.switch_screen(ScreenEvent::ShowStart);
                Err(self.surface(err))
            }
        }
    }

    /// Drop every piece of client state and show the start screen.
    ///
    /// Local only; the server keeps its session.
    pub fn reset_to_start(&mut self) {
        let stats = self.state.stats.take();
        let generation = self.state.panel_generation;
        self.state = AppState {
            stats,
            panel_generation: generation + 1,
            ..AppState::default()
        };
        self.switch_screen(ScreenEvent::ShowStart);
        info!("reset to start");
    }

    // ─── Navigation ──────────────────────────────────────────────────────

    /// Advance one step, deferring to the index the server returns.
    ///
    /// On the last step this shows completion without a server call.
    ///
    /// # Errors
    ///
    /// Returns `ControllerError::NoSession`, or the API/session error with the index
    /// left unchanged.
    pub async fn next(&mut self) -> Result<NextOutcome, ControllerError> {
        let Some(session) = self.state.session.as_ref() else {
            return Err(self.surface(ControllerError::NoSession));
        };
        if session.is_last_step() {
            self.complete();
            return Ok(NextOutcome::Completed);
        }

        self.state.pending.navigating = true;
        let result = self.api.next_step().await;
        self.state.pending.navigating = false;

        let (index, step) = match result {
            Ok(Advance::Completed) => {
                self.complete();
                return Ok(NextOutcome::Completed);
            }
            Ok(Advance::Moved { index, step }) => (index, step),
            Err(err) => return Err(self.surface(err.into())),
        };

        let Some(session) = self.state.session.as_mut() else {
            return Err(self.surface(ControllerError::NoSession));
        };
        if let Some(step) = step {
            session.fill_step_details(index, step.details().to_vec());
        }
        if index == session.current_index() {
            debug!(index, "server held the current step");
            return Ok(NextOutcome::Held);
        }
        if let Err(err) = session.set_current_index(index) {
            return Err(self.surface(err.into()));
        }
        debug!(index, "advanced");
        self.enter_step();
        Ok(NextOutcome::Moved(index))
    }

    /// Step back locally. Returns `false` on the first step.
    ///
    /// # Errors
    ///
    /// Returns `ControllerError::NoSession` without a session.
    pub fn previous(&mut self) -> Result<bool, ControllerError> {
        let Some(session) = self.state.session.as_mut() else {
            return Err(self.surface(ControllerError::NoSession));
        };
        if !session.retreat() {
            return Ok(false);
        }
        debug!(index = session.current_index(), "stepped back");
        self.enter_step();
        Ok(true)
    }

    /// Jump to any step from the minimap. Local, like [`Self::previous`].
    ///
    /// # Errors
    ///
    /// Returns `ControllerError::NoSession` or an out-of-range `SessionError`.
    pub fn jump_to(&mut self, index: usize) -> Result<(), ControllerError> {
        let Some(session) = self.state.session.as_mut() else {
            return Err(self.surface(ControllerError::NoSession));
        };
        if session.current_index() == index {
            return Ok(());
        }
        if let Err(err) = session.set_current_index(index) {
            return Err(self.surface(err.into()));
        }
        debug!(index, "jumped");
        self.enter_step();
        Ok(())
    }

    /// Leave the learning screen without touching the session.
    pub fn go_home(&mut self) {
        self.switch_screen(ScreenEvent::ShowStart);
    }

    /// # Errors
    ///
    /// Returns `ControllerError::NoSession` when there is nothing to return to.
    pub fn return_to_learning(&mut self) -> Result<(), ControllerError> {
        if self.state.session.is_none() {
            return Err(self.surface(ControllerError::NoSession));
        }
        self.switch_screen(ScreenEvent::ShowLearning);
        Ok(())
    }

    pub fn close_overlay(&mut self) {
        self.switch_screen(ScreenEvent::CloseOverlay);
    }

    // ─── Side panels ─────────────────────────────────────────────────────

    /// Issue a new ticket for the current step and mark its panels loading.
    ///
    /// Any response requested under an earlier ticket is stale from here on.
    pub fn begin_panel_refresh(&mut self) -> Option<PanelTicket> {
        let index = self.state.session.as_ref()?.current_index();
        self.state.panel_generation += 1;
        let ticket = PanelTicket::new(self.state.panel_generation, index);
        self.state.panel_ticket = Some(ticket);
        self.state.panels = StepPanels::loading();
        Some(ticket)
    }

    /// A detached request for the panels under the live ticket.
    #[must_use]
    pub fn panel_fetcher(&self) -> Option<PanelFetcher> {
        let ticket = self.state.panel_ticket?;
        let session = self.state.session.as_ref()?;
        let step = session.steps().get(ticket.step_index())?;
        Some(PanelFetcher {
            api: Arc::clone(&self.api),
            ticket,
            topic: session.topic().to_owned(),
            step_title: step.title().to_owned(),
        })
    }

    /// Whether the panels for the current step still need fetching.
    #[must_use]
    pub fn needs_panel_refresh(&self) -> bool {
        self.state.panel_ticket.is_some() && self.state.panels.guide.is_loading()
    }

    /// Apply fetched panels if they belong to the live ticket. Returns `false` when the
    /// responses were stale and dropped.
    pub fn apply_panels(&mut self, fetch: PanelFetch) -> bool {
        if self.state.panel_ticket != Some(fetch.ticket) {
            debug!(
                step = fetch.ticket.step_index(),
                "discarding stale panel response"
            );
            return false;
        }

        self.state.panels.guide = match fetch.guide {
            Ok(guide) => PanelState::Ready(guide),
            Err(err) => {
                let message = err.to_string();
                self.surface(err.into());
                PanelState::Failed(message)
            }
        };

        match fetch.note {
            Ok(Some(note)) if self.state.note.draft.is_empty() => self.state.note.draft = note,
            Ok(_) => {}
            Err(err) => warn!(error = %err, "failed to load note"),
        }

        let (topic, step_title) = self
            .state
            .session
            .as_ref()
            .and_then(|session| {
                let step = session.steps().get(fetch.ticket.step_index())?;
                Some((session.topic().to_owned(), step.title().to_owned()))
            })
            .unwrap_or_default();
        self.state.panels.resources = match fetch.resources {
            Ok(Some(resources)) => PanelState::Ready(resources),
            Ok(None) => PanelState::Ready(fallback_resources(&topic, &step_title)),
            Err(err) if err.is_transport() => {
                warn!(error = %err, "failed to load resources");
                PanelState::Failed(RESOURCES_FAILED.to_owned())
            }
            Err(err) => {
                debug!(error = %err, "resource service declined, using search links");
                PanelState::Ready(fallback_resources(&topic, &step_title))
            }
        };
        true
    }

    /// Fetch and apply the panels for the live ticket.
    pub async fn refresh_panels(&mut self) -> bool {
        let Some(fetcher) = self.panel_fetcher() else {
            return false;
        };
        let fetch = fetcher.fetch().await;
        self.apply_panels(fetch)
    }

    // ─── Notes ───────────────────────────────────────────────────────────

    pub fn set_note_draft(&mut self, draft: impl Into<String>) {
        self.state.note.draft = draft.into();
    }

    /// Save the draft for the current step. A blank draft is not sent.
    ///
    /// # Errors
    ///
    /// Returns `ControllerError::NoSession` or the API error.
    pub async fn save_note(&mut self) -> Result<bool, ControllerError> {
        if self.state.session.is_none() {
            return Err(self.surface(ControllerError::NoSession));
        }
        if self.state.note.draft.trim().is_empty() {
            return Ok(false);
        }

        self.state.pending.saving_note = true;
        let result = self.api.save_note(&self.state.note.draft).await;
        self.state.pending.saving_note = false;

        match result {
            Ok(()) => {
                self.state.note.saved_at = Some(self.clock.now());
                Ok(true)
            }
            Err(err) => Err(self.surface(err.into())),
        }
    }

    // ─── Chat ────────────────────────────────────────────────────────────

    /// Send `message` to the tutor. A blank message is ignored.
    ///
    /// # Errors
    ///
    /// Returns `ControllerError::NoSession` or the API error; the learner's message
    /// stays in the transcript either way.
    pub async fn send_chat(&mut self, message: &str) -> Result<(), ControllerError> {
        if self.state.session.is_none() {
            return Err(self.surface(ControllerError::NoSession));
        }
        let message = message.trim();
        if message.is_empty() {
            return Ok(());
        }

        self.state.chat.push(ChatRole::User, message, self.clock.now());
        self.state.pending.chatting = true;
        let result = self.api.chat(message).await;
        self.state.pending.chatting = false;

        match result {
            Ok(reply) => {
                self.state
                    .chat
                    .push(ChatRole::Assistant, &reply, self.clock.now());
                Ok(())
            }
            Err(err) => Err(self.surface(err.into())),
        }
    }

    /// # Errors
    ///
    /// Returns the API error; the transcript is kept on failure.
    pub async fn clear_chat(&mut self) -> Result<(), ControllerError> {
        if let Err(err) = self.api.clear_chat().await {
            return Err(self.surface(err.into()));
        }
        self.state.chat.clear();
        self.state
            .chat
            .push(ChatRole::Assistant, CHAT_CLEARED, self.clock.now());
        Ok(())
    }

    // ─── Flashcards ──────────────────────────────────────────────────────

    pub fn flashcards_next(&mut self) {
        self.state.flashcards.next();
    }

    pub fn flashcards_previous(&mut self) {
        self.state.flashcards.previous();
    }

    pub fn flip_flashcard(&mut self) {
        self.state.flashcards.flip();
    }

    // ─── Quiz ────────────────────────────────────────────────────────────

    /// Generate a quiz for the current step.
    ///
    /// # Errors
    ///
    /// Returns `ControllerError::Flow` while a quiz request is already in flight, or the
    /// API error with the quiz panel left empty.
    pub async fn generate_quiz(&mut self) -> Result<(), ControllerError> {
        if self.state.session.is_none() {
            return Err(self.surface(ControllerError::NoSession));
        }
        self.state.quiz = self.quiz_transition(QuizEvent::Generate)?;
        if self.state.screen.overlay == Overlay::QuizResults {
            self.switch_screen(ScreenEvent::CloseOverlay);
        }

        let failure = match self.api.generate_quiz().await {
            Ok(questions) => match self.state.quiz.transition(QuizEvent::Generated(questions)) {
                Ok(quiz) => {
                    self.state.quiz = quiz;
                    return Ok(());
                }
                Err(err) => ControllerError::from(err),
            },
            Err(err) => err.into(),
        };
        self.state.quiz = self.quiz_transition(QuizEvent::GenerationFailed)?;
        Err(self.surface(failure))
    }

    /// # Errors
    ///
    /// Returns `ControllerError::Flow` for an unknown question or option.
    pub fn select_quiz_answer(
        &mut self,
        question: usize,
        key: OptionKey,
    ) -> Result<(), ControllerError> {
        self.state.quiz = self.quiz_transition(QuizEvent::Select { question, key })?;
        Ok(())
    }

    /// Send the selections for scoring and show the result.
    ///
    /// # Errors
    ///
    /// Returns `ControllerError::Flow` when no quiz is displayed, or the API error with
    /// the selections kept.
    pub async fn submit_quiz(&mut self) -> Result<QuizScore, ControllerError> {
        self.state.quiz = self.quiz_transition(QuizEvent::Submit)?;
        let Some(sheet) = self.state.quiz.sheet() else {
            return Err(self.surface(ControllerError::NoSession));
        };

        let result = self
            .api
            .submit_quiz(sheet.questions(), sheet.selections())
            .await;
        match result {
            Ok(score) => {
                self.state.quiz = self.quiz_transition(QuizEvent::Scored(score.clone()))?;
                info!(score = score.score, total = score.total, "quiz scored");
                self.switch_screen(ScreenEvent::OpenQuizResults);
                Ok(score)
            }
            Err(err) => {
                self.state.quiz = self.quiz_transition(QuizEvent::SubmissionFailed)?;
                Err(self.surface(err.into()))
            }
        }
    }

    pub fn close_quiz_results(&mut self) {
        self.discard_quiz();
        self.switch_screen(ScreenEvent::CloseOverlay);
    }

    // ─── Career assessment ───────────────────────────────────────────────

    /// # Errors
    ///
    /// Returns `ControllerError::Flow` mid-attempt, or the API error with the flow back
    /// on the intro.
    pub async fn start_assessment(&mut self) -> Result<(), ControllerError> {
        self.state.assessment = self.assessment_transition(AssessmentEvent::Start)?;

        let failure = match self.api.generate_assessment().await {
            Ok(questions) => match self
                .state
                .assessment
                .transition(AssessmentEvent::Generated(questions))
            {
                Ok(assessment) => {
                    self.state.assessment = assessment;
                    return Ok(());
                }
                Err(err) => ControllerError::from(err),
            },
            Err(err) => err.into(),
        };
        self.state.assessment = self.assessment_transition(AssessmentEvent::GenerationFailed)?;
        Err(self.surface(failure))
    }

    /// Register an answer for the question on screen and move on.
    ///
    /// After the feedback pause the next question is shown; the final answer sends the
    /// whole attempt for analysis.
    ///
    /// # Errors
    ///
    /// Returns `ControllerError::Flow` for an option the question does not offer, or the
    /// analysis error with the flow back on the intro.
    pub async fn answer_assessment(
        &mut self,
        key: OptionKey,
    ) -> Result<AssessmentStep, ControllerError> {
        let next = self.assessment_transition(AssessmentEvent::Answer(key))?;
        if !self.config.feedback_delay.is_zero() {
            tokio::time::sleep(self.config.feedback_delay).await;
        }
        self.state.assessment = next;

        let sheet = match &self.state.assessment {
            AssessmentFlow::Questions(sheet) => return Ok(AssessmentStep::Next(sheet.current())),
            AssessmentFlow::Analyzing(sheet) => sheet,
            other => {
                debug!(state = other.state_name(), "unexpected assessment state after answer");
                return Err(self.surface(ControllerError::NoRecommendation));
            }
        };

        let result = self
            .api
            .analyze_assessment(sheet.questions(), sheet.answers())
            .await;
        match result {
            Ok(recommendation) => {
                info!(domain = %recommendation.recommended_domain, "assessment analyzed");
                self.state.assessment =
                    self.assessment_transition(AssessmentEvent::Analyzed(recommendation.clone()))?;
                Ok(AssessmentStep::Recommended(recommendation))
            }
            Err(err) => {
                self.state.assessment =
                    self.assessment_transition(AssessmentEvent::AnalysisFailed)?;
                Err(self.surface(err.into()))
            }
        }
    }

    pub fn reset_assessment(&mut self) {
        self.state.assessment = self
            .state
            .assessment
            .transition(AssessmentEvent::Reset)
            .unwrap_or_default();
    }

    /// Start a roadmap for the recommended starting topic.
    ///
    /// # Errors
    ///
    /// Returns `ControllerError::NoRecommendation` without results, otherwise whatever
    /// [`Self::start_topic`] returns. The results stay up until the start succeeds.
    pub async fn start_recommended_topic(
        &mut self,
        persona: Persona,
        difficulty: Difficulty,
    ) -> Result<(), ControllerError> {
        let Some(topic) = self
            .state
            .assessment
            .recommendation()
            .map(|rec| rec.starting_topic.clone())
        else {
            return Err(self.surface(ControllerError::NoRecommendation));
        };
        self.start_topic(&topic, persona, difficulty).await?;
        self.reset_assessment();
        Ok(())
    }

    // ─── Dashboard ───────────────────────────────────────────────────────

    /// Refresh the start-screen totals. Failures are logged, not shown.
    ///
    /// # Errors
    ///
    /// Returns the API error.
    pub async fn load_stats(&mut self) -> Result<LearningStats, ControllerError> {
        match self.api.stats().await {
            Ok(stats) => {
                self.state.stats = Some(stats);
                Ok(stats)
            }
            Err(err) => {
                warn!(error = %err, "failed to load stats");
                Err(err.into())
            }
        }
    }

    #[must_use]
    pub fn export_url(&self) -> Option<Url> {
        self.api.export_url()
    }

    pub fn dismiss_notice(&mut self) {
        self.state.notice = None;
    }

    // ─── Internals ───────────────────────────────────────────────────────

    fn install_session(&mut self, session: Session) {
        self.state.session = Some(session);
        self.state.completed = false;
        self.enter_step();
        self.switch_screen(ScreenEvent::ShowLearning);
    }

    // Everything scoped to a single step is rebuilt here.
    fn enter_step(&mut self) {
        let Some(session) = self.state.session.as_ref() else {
            return;
        };
        self.state.flashcards = FlashcardDeck::from_details(
            session.current_step().details(),
            self.config.flashcard_min_len,
        );
        self.state.note = NoteState::default();
        self.state.chat.clear();
        self.discard_quiz();
        if self.state.screen.overlay != Overlay::Hidden {
            self.switch_screen(ScreenEvent::CloseOverlay);
        }
        self.begin_panel_refresh();
    }

    fn complete(&mut self) {
        self.state.completed = true;
        self.switch_screen(ScreenEvent::OpenCompletion);
        info!("roadmap completed");
    }

    fn switch_screen(&mut self, event: ScreenEvent) {
        match self.state.screen.transition(event) {
            Ok(screen) => self.state.screen = screen,
            Err(err) => debug!(error = %err, "ignored screen event"),
        }
    }

    fn discard_quiz(&mut self) {
        self.state.quiz = self
            .state
            .quiz
            .transition(QuizEvent::Close)
            .unwrap_or_default();
    }

    fn quiz_transition(&mut self, event: QuizEvent) -> Result<QuizFlow, ControllerError> {
        self.state
            .quiz
            .transition(event)
            .map_err(|err| self.surface(err.into()))
    }

    fn assessment_transition(
        &mut self,
        event: AssessmentEvent,
    ) -> Result<AssessmentFlow, ControllerError> {
        self.state
            .assessment
            .transition(event)
            .map_err(|err| self.surface(err.into()))
    }

    fn surface(&mut self, err: ControllerError) -> ControllerError {
        warn!(error = %err, "learning action failed");
        self.state.notice = Some(Notice::new(err.user_message()));
        err
    }
}
