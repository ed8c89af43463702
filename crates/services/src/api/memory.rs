use std::collections::{BTreeMap, HashMap};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use async_trait::async_trait;
use learn_core::model::{
    AnswerSheet, Difficulty, LearningStats, OptionKey, Persona, Question, QuestionOutcome,
    QuizScore, Recommendation, Resource, ResourceKind, Step, StepNumber,
};
use url::Url;

use super::{Advance, LearningApi, SessionSnapshot, StartedRoadmap};
use crate::error::ApiError;

/// One entry of the in-memory backend's call log.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ApiCall {
    ResumeSession,
    StartTopic,
    NextStep,
    Guide,
    Note,
    SaveNote,
    Resources,
    Chat,
    ClearChat,
    GenerateQuiz,
    SubmitQuiz,
    GenerateAssessment,
    AnalyzeAssessment,
    Stats,
}

/// Kind of failure to return from the next matching call.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum InjectedFailure {
    /// The request never got an answer.
    Transport,
    /// The backend answered with an error message.
    Application,
}

impl InjectedFailure {
    fn into_error(self, call: ApiCall) -> ApiError {
        match self {
            Self::Transport => ApiError::Unavailable(format!("{call:?} dropped")),
            Self::Application => ApiError::Application(format!("{call:?} failed")),
        }
    }
}

const STAGES: [&str; 5] = [
    "Foundations",
    "Core Concepts",
    "Hands-on Practice",
    "Advanced Patterns",
    "Capstone Project",
];
const QUIZ_LENGTH: u32 = 3;
const QUIZ_ANSWER: &str = "B";
const ASSESSMENT_LENGTH: u32 = 3;
const DEFAULT_ROADMAP_LEN: usize = 5;

struct ServerSession {
    topic: String,
    steps: Vec<Step>,
    current_index: usize,
    persona: Persona,
    difficulty: Difficulty,
    notes: HashMap<usize, String>,
    chat_turns: usize,
}

struct TopicRecord {
    current_index: usize,
    total_steps: usize,
    completed: bool,
}

struct ServerState {
    session: Option<ServerSession>,
    topics: Vec<TopicRecord>,
    calls: Vec<ApiCall>,
    failures: HashMap<ApiCall, InjectedFailure>,
    roadmap_len: usize,
    progress_gate: Option<usize>,
    quiz_keys: Vec<OptionKey>,
}

impl Default for ServerState {
    fn default() -> Self {
        Self {
            session: None,
            topics: Vec::new(),
            calls: Vec::new(),
            failures: HashMap::new(),
            roadmap_len: DEFAULT_ROADMAP_LEN,
            progress_gate: None,
            quiz_keys: Vec::new(),
        }
    }
}

impl ServerState {
    fn record(&mut self, call: ApiCall) -> Result<(), ApiError> {
        self.calls.push(call);
        match self.failures.remove(&call) {
            Some(failure) => Err(failure.into_error(call)),
            None => Ok(()),
        }
    }

    fn session(&self) -> Result<&ServerSession, ApiError> {
        self.session
            .as_ref()
            .ok_or_else(|| ApiError::Application("No active session".into()))
    }

    fn session_mut(&mut self) -> Result<&mut ServerSession, ApiError> {
        self.session
            .as_mut()
            .ok_or_else(|| ApiError::Application("No active session".into()))
    }

    fn sync_topic_record(&mut self, completed: bool) {
        let Some(session) = self.session.as_ref() else {
            return;
        };
        if let Some(record) = self.topics.last_mut() {
            record.current_index = session.current_index;
            record.completed |= completed;
        }
    }
}

/// Deterministic stand-in for the learning backend.
///
/// Mirrors the server's behaviour closely enough to drive the controller end to end:
/// it owns the session and current step, hands out step details lazily, keeps one note
/// per step and scores quizzes with an answer key the client never sees. Every call is
/// logged, and one-shot failures can be injected per call.
#[derive(Clone, Default)]
pub struct InMemoryLearningApi {
    state: Arc<Mutex<ServerState>>,
}

impl InMemoryLearningApi {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of steps generated for new topics.
    #[must_use]
    pub fn with_roadmap_len(self, len: usize) -> Self {
        self.lock().roadmap_len = len.max(1);
        self
    }

    /// Seed a resumable session positioned at `current_index`.
    #[must_use]
    pub fn with_session(self, topic: &str, step_count: usize, current_index: usize) -> Self {
        {
            let mut state = self.lock();
            let steps = roadmap(topic, step_count.max(1), true);
            let current_index = current_index.min(steps.len() - 1);
            state.topics.push(TopicRecord {
                current_index,
                total_steps: steps.len(),
                completed: false,
            });
            state.session = Some(ServerSession {
                topic: topic.to_owned(),
                steps,
                current_index,
                persona: Persona::default(),
                difficulty: Difficulty::default(),
                notes: HashMap::new(),
                chat_turns: 0,
            });
        }
        self
    }

    /// Make the next `call` fail once.
    pub fn fail_next(&self, call: ApiCall, failure: InjectedFailure) {
        self.lock().failures.insert(call, failure);
    }

    /// Stop the server from advancing past `max_index`.
    pub fn set_progress_gate(&self, max_index: Option<usize>) {
        self.lock().progress_gate = max_index;
    }

    #[must_use]
    pub fn calls(&self) -> Vec<ApiCall> {
        self.lock().calls.clone()
    }

    #[must_use]
    pub fn call_count(&self, call: ApiCall) -> usize {
        self.lock().calls.iter().filter(|c| **c == call).count()
    }

    pub fn clear_calls(&self) {
        self.lock().calls.clear();
    }

    #[must_use]
    pub fn server_step_index(&self) -> Option<usize> {
        self.lock().session.as_ref().map(|s| s.current_index)
    }

    #[must_use]
    pub fn note_for(&self, index: usize) -> Option<String> {
        self.lock()
            .session
            .as_ref()
            .and_then(|s| s.notes.get(&index).cloned())
    }

    fn lock(&self) -> MutexGuard<'_, ServerState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

fn roadmap(topic: &str, len: usize, all_details: bool) -> Vec<Step> {
    (0..len)
        .map(|index| {
            let details = if all_details || index == 0 {
                step_details(topic, index)
            } else {
                Vec::new()
            };
            Step::new(StepNumber::from_index(index), step_title(topic, index), details)
        })
        .collect()
}

fn step_title(topic: &str, index: usize) -> String {
    format!("{topic} {}", STAGES[index % STAGES.len()])
}

fn step_details(topic: &str, index: usize) -> Vec<String> {
    let stage = STAGES[index % STAGES.len()];
    vec![
        format!("{stage}: the part of {topic} this step covers"),
        format!("Work through a small {topic} exercise before moving on"),
        "Review".to_owned(),
    ]
}

fn multiple_choice(number: u32, text: String, labels: [&str; 4]) -> Question {
    Question::new(
        number,
        text,
        ["A", "B", "C", "D"]
            .into_iter()
            .zip(labels)
            .map(|(key, label)| (OptionKey::from(key), label.to_owned())),
    )
}

fn recommendation_for(answers: &AnswerSheet) -> Recommendation {
    let mut tally: BTreeMap<&str, usize> = BTreeMap::new();
    for key in answers.values() {
        *tally.entry(key.as_str()).or_default() += 1;
    }
    // Ties go to the alphabetically first key.
    let favourite = tally
        .iter()
        .max_by(|(ka, a), (kb, b)| a.cmp(b).then(kb.cmp(ka)))
        .map_or("A", |(key, _)| *key);
    let (domain, topic, why) = match favourite {
        "B" => (
            "Data Science",
            "Statistics with Python",
            "You enjoy finding patterns in information.",
        ),
        "C" => (
            "UI/UX Design",
            "Design Fundamentals",
            "You care about how people experience products.",
        ),
        "D" => (
            "Cyber Security",
            "Networking Basics",
            "You like understanding how systems can break.",
        ),
        _ => (
            "Software Engineering",
            "Python Programming",
            "You like building things step by step.",
        ),
    };
    Recommendation {
        recommended_domain: domain.to_owned(),
        explanation: why.to_owned(),
        starting_topic: topic.to_owned(),
    }
}

fn link(raw: &str) -> Result<Url, ApiError> {
    Url::parse(raw).map_err(|err| ApiError::Malformed(err.to_string()))
}

#[async_trait]
impl LearningApi for InMemoryLearningApi {
    async fn resume_session(&self) -> Result<Option<SessionSnapshot>, ApiError> {
        let mut state = self.lock();
        state.record(ApiCall::ResumeSession)?;
        Ok(state.session.as_ref().map(|session| SessionSnapshot {
            topic: session.topic.clone(),
            steps: session.steps.clone(),
            current_index: session.current_index,
            persona: session.persona,
            difficulty: session.difficulty,
        }))
    }

    async fn start_topic(
        &self,
        topic: &str,
        persona: Persona,
        difficulty: Difficulty,
    ) -> Result<StartedRoadmap, ApiError> {
        let mut state = self.lock();
        state.record(ApiCall::StartTopic)?;
        let topic = topic.trim();
        if topic.is_empty() {
            return Err(ApiError::Application("Topic is required".into()));
        }
        let server_steps = roadmap(topic, state.roadmap_len, true);
        let client_steps = roadmap(topic, state.roadmap_len, false);
        state.topics.push(TopicRecord {
            current_index: 0,
            total_steps: server_steps.len(),
            completed: false,
        });
        state.session = Some(ServerSession {
            topic: topic.to_owned(),
            steps: server_steps,
            current_index: 0,
            persona,
            difficulty,
            notes: HashMap::new(),
            chat_turns: 0,
        });
        state.quiz_keys.clear();
        Ok(StartedRoadmap {
            topic: topic.to_owned(),
            steps: client_steps,
        })
    }

    async fn next_step(&self) -> Result<Advance, ApiError> {
        let mut state = self.lock();
        state.record(ApiCall::NextStep)?;
        let gate = state.progress_gate;
        let session = state.session_mut()?;
        if session.current_index + 1 >= session.steps.len() {
            state.sync_topic_record(true);
            return Ok(Advance::Completed);
        }
        let target = session.current_index + 1;
        let index = gate.map_or(target, |max| target.min(max.max(session.current_index)));
        session.current_index = index;
        let step = session.steps.get(index).cloned();
        state.sync_topic_record(false);
        Ok(Advance::Moved { index, step })
    }

    async fn guide(&self) -> Result<String, ApiError> {
        let mut state = self.lock();
        state.record(ApiCall::Guide)?;
        let session = state.session()?;
        let step = &session.steps[session.current_index];
        Ok(format!(
            "## {}\n\nA **{}** walkthrough of {} for the {} level.\n\n- Read the key ideas\n- Try the exercise\n",
            step.title(),
            session.persona,
            session.topic,
            session.difficulty,
        ))
    }

    async fn note(&self) -> Result<Option<String>, ApiError> {
        let mut state = self.lock();
        state.record(ApiCall::Note)?;
        let session = state.session()?;
        Ok(session.notes.get(&session.current_index).cloned())
    }

    async fn save_note(&self, content: &str) -> Result<(), ApiError> {
        let mut state = self.lock();
        state.record(ApiCall::SaveNote)?;
        let session = state.session_mut()?;
        let index = session.current_index;
        session.notes.insert(index, content.to_owned());
        Ok(())
    }

    async fn resources(
        &self,
        topic: &str,
        step_title: &str,
    ) -> Result<Option<Vec<Resource>>, ApiError> {
        let mut state = self.lock();
        state.record(ApiCall::Resources)?;
        drop(state);
        let slug = step_title.to_ascii_lowercase().replace(' ', "-");
        Ok(Some(vec![
            Resource {
                title: format!("{step_title} explained"),
                kind: ResourceKind::Article,
                url: link(&format!("https://docs.example.com/{slug}"))?,
            },
            Resource {
                title: format!("{topic} in 10 minutes"),
                kind: ResourceKind::Video,
                url: link(&format!("https://videos.example.com/{slug}"))?,
            },
        ]))
    }

    async fn chat(&self, message: &str) -> Result<String, ApiError> {
        let mut state = self.lock();
        state.record(ApiCall::Chat)?;
        if message.trim().is_empty() {
            return Err(ApiError::Application("Message is required".into()));
        }
        let session = state.session_mut()?;
        session.chat_turns += 1;
        let step = session.steps[session.current_index].title().to_owned();
        Ok(format!("**{step}**\n\nYou asked: {}\n", message.trim()))
    }

    async fn clear_chat(&self) -> Result<(), ApiError> {
        let mut state = self.lock();
        state.record(ApiCall::ClearChat)?;
        state.session_mut()?.chat_turns = 0;
        Ok(())
    }

    async fn generate_quiz(&self) -> Result<Vec<Question>, ApiError> {
        let mut state = self.lock();
        state.record(ApiCall::GenerateQuiz)?;
        let title = {
            let session = state.session()?;
            session.steps[session.current_index].title().to_owned()
        };
        let key = OptionKey::from(QUIZ_ANSWER);
        state.quiz_keys = (0..QUIZ_LENGTH).map(|_| key.clone()).collect();
        Ok((1..=QUIZ_LENGTH)
            .map(|n| {
                multiple_choice(
                    n,
                    format!("{title}: question {n}"),
                    ["Never", "Usually", "Rarely", "Only at runtime"],
                )
                .with_answer_key(&key)
            })
            .collect())
    }

    async fn submit_quiz(
        &self,
        questions: &[Question],
        answers: &AnswerSheet,
    ) -> Result<QuizScore, ApiError> {
        let mut state = self.lock();
        state.record(ApiCall::SubmitQuiz)?;
        if state.quiz_keys.len() != questions.len() {
            return Err(ApiError::Application("Quiz not found".into()));
        }
        let outcomes: Vec<QuestionOutcome> = questions
            .iter()
            .zip(&state.quiz_keys)
            .enumerate()
            .map(|(index, (question, key))| {
                let user_answer = answers.get(&index).cloned();
                QuestionOutcome {
                    number: question
                        .number()
                        .unwrap_or_else(|| u32::try_from(index + 1).unwrap_or(u32::MAX)),
                    correct: user_answer.as_ref() == Some(key),
                    user_answer,
                    correct_answer: Some(key.clone()),
                }
            })
            .collect();
        let total = u32::try_from(outcomes.len()).unwrap_or(u32::MAX);
        let score = u32::try_from(outcomes.iter().filter(|o| o.correct).count()).unwrap_or(0);
        let percentage = if total == 0 {
            0
        } else {
            u8::try_from((score * 100 + total / 2) / total).unwrap_or(100)
        };
        Ok(QuizScore {
            score,
            total,
            percentage,
            outcomes,
        })
    }

    async fn generate_assessment(&self) -> Result<Vec<Question>, ApiError> {
        let mut state = self.lock();
        state.record(ApiCall::GenerateAssessment)?;
        Ok((1..=ASSESSMENT_LENGTH)
            .map(|n| {
                multiple_choice(
                    n,
                    format!("Which activity sounds most fun? ({n})"),
                    [
                        "Building an app",
                        "Digging through data",
                        "Sketching an interface",
                        "Hunting for vulnerabilities",
                    ],
                )
            })
            .collect())
    }

    async fn analyze_assessment(
        &self,
        questions: &[Question],
        answers: &AnswerSheet,
    ) -> Result<Recommendation, ApiError> {
        let mut state = self.lock();
        state.record(ApiCall::AnalyzeAssessment)?;
        if questions.is_empty() {
            return Err(ApiError::Application("No answers provided".into()));
        }
        Ok(recommendation_for(answers))
    }

    async fn stats(&self) -> Result<LearningStats, ApiError> {
        let mut state = self.lock();
        state.record(ApiCall::Stats)?;
        let total_topics = u32::try_from(state.topics.len()).unwrap_or(u32::MAX);
        let completed_topics =
            u32::try_from(state.topics.iter().filter(|t| t.completed).count()).unwrap_or(0);
        let total_steps: usize = state.topics.iter().map(|t| t.total_steps).sum();
        let reached: usize = state.topics.iter().map(|t| t.current_index + 1).sum();
        let progress_percent = if total_steps == 0 {
            0
        } else {
            u8::try_from((reached * 100 + total_steps / 2) / total_steps).unwrap_or(100)
        };
        Ok(LearningStats {
            total_topics,
            completed_topics,
            progress_percent,
        })
    }

    fn export_url(&self) -> Option<Url> {
        None
    }
}
