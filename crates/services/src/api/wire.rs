//! JSON shapes exchanged with the learning backend.

use std::collections::BTreeMap;

use learn_core::model::{
    AnswerSheet, LearningStats, OptionKey, Question, QuestionOutcome, QuizScore, Recommendation,
    Resource, ResourceKind, Step, StepNumber,
};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use url::Url;

use super::{Advance, SessionSnapshot, StartedRoadmap};
use crate::error::ApiError;

/// Decode a `{ "success": ..., ... }` envelope.
///
/// Anything but `success: true` is an application failure carrying the server's
/// `error` (or `message`) text.
pub(crate) fn parse_envelope<T: DeserializeOwned>(body: &str) -> Result<T, ApiError> {
    let value: Value =
        serde_json::from_str(body).map_err(|err| ApiError::Malformed(err.to_string()))?;
    if !is_success(&value) {
        return Err(ApiError::Application(failure_message(&value)));
    }
    serde_json::from_value(value).map_err(|err| ApiError::Malformed(err.to_string()))
}

fn is_success(value: &Value) -> bool {
    value.get("success").and_then(Value::as_bool).unwrap_or(false)
}

fn failure_message(value: &Value) -> String {
    value
        .get("error")
        .or_else(|| value.get("message"))
        .and_then(Value::as_str)
        .unwrap_or("request failed")
        .to_owned()
}

/// Resume answers `success: false` when there is simply nothing to resume.
pub(crate) fn parse_resume(body: &str) -> Result<Option<SessionSnapshot>, ApiError> {
    match parse_envelope::<ResumeDto>(body) {
        Ok(dto) => Ok(Some(dto.into_snapshot())),
        Err(ApiError::Application(_)) => Ok(None),
        Err(err) => Err(err),
    }
}

//
// ─── REQUESTS ──────────────────────────────────────────────────────────────────
//

#[derive(Debug, Serialize)]
pub(crate) struct StartTopicRequest<'a> {
    pub topic: &'a str,
    pub persona: &'static str,
    pub difficulty: &'static str,
}

#[derive(Debug, Serialize)]
pub(crate) struct SaveNoteRequest<'a> {
    pub content: &'a str,
}

#[derive(Debug, Serialize)]
pub(crate) struct ChatRequest<'a> {
    pub message: &'a str,
}

#[derive(Debug, Serialize)]
pub(crate) struct ResourcesRequest<'a> {
    pub topic: &'a str,
    pub step: &'a str,
}

/// Quiz submission and assessment analysis share this body.
#[derive(Debug, Serialize)]
pub(crate) struct AnsweredQuestionsRequest<'a> {
    pub answers: BTreeMap<String, &'a OptionKey>,
    pub questions: &'a [Question],
}

impl<'a> AnsweredQuestionsRequest<'a> {
    pub fn new(questions: &'a [Question], answers: &'a AnswerSheet) -> Self {
        Self {
            answers: answers
                .iter()
                .map(|(index, key)| (index.to_string(), key))
                .collect(),
            questions,
        }
    }
}

//
// ─── RESPONSES ─────────────────────────────────────────────────────────────────
//

#[derive(Debug, Deserialize)]
pub(crate) struct StepDto {
    number: u32,
    title: String,
    #[serde(default)]
    details: Vec<String>,
}

impl StepDto {
    fn into_step(self) -> Step {
        Step::new(StepNumber::new(self.number), self.title, self.details)
    }
}

fn into_steps(steps: Vec<StepDto>) -> Vec<Step> {
    steps.into_iter().map(StepDto::into_step).collect()
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct ResumeDto {
    topic: String,
    steps: Vec<StepDto>,
    current_step_index: usize,
    #[serde(default)]
    persona: Option<String>,
    #[serde(default)]
    difficulty: Option<String>,
}

impl ResumeDto {
    fn into_snapshot(self) -> SessionSnapshot {
        SessionSnapshot {
            topic: self.topic,
            steps: into_steps(self.steps),
            current_index: self.current_step_index,
            persona: parse_tag(self.persona.as_deref()),
            difficulty: parse_tag(self.difficulty.as_deref()),
        }
    }
}

fn parse_tag<T>(raw: Option<&str>) -> T
where
    T: std::str::FromStr + Default,
    T::Err: std::fmt::Display,
{
    let Some(raw) = raw else {
        return T::default();
    };
    raw.parse().unwrap_or_else(|err| {
        tracing::warn!(%err, "unrecognised session tag, using default");
        T::default()
    })
}

#[derive(Debug, Deserialize)]
pub(crate) struct StartDto {
    topic: String,
    steps: Vec<StepDto>,
}

impl From<StartDto> for StartedRoadmap {
    fn from(dto: StartDto) -> Self {
        Self {
            topic: dto.topic,
            steps: into_steps(dto.steps),
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct NextDto {
    #[serde(default)]
    completed: bool,
    #[serde(default)]
    current_step_index: Option<usize>,
    #[serde(default)]
    step: Option<StepDto>,
}

impl TryFrom<NextDto> for Advance {
    type Error = ApiError;

    fn try_from(dto: NextDto) -> Result<Self, Self::Error> {
        if dto.completed {
            return Ok(Advance::Completed);
        }
        let index = dto
            .current_step_index
            .ok_or_else(|| ApiError::Malformed("missing currentStepIndex".into()))?;
        Ok(Advance::Moved {
            index,
            step: dto.step.map(StepDto::into_step),
        })
    }
}

#[derive(Debug, Deserialize)]
pub(crate) struct GuideDto {
    pub guide: String,
}

#[derive(Debug, Deserialize)]
pub(crate) struct NoteDto {
    #[serde(default)]
    pub note: Option<String>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct EmptyDto {}

#[derive(Debug, Deserialize)]
pub(crate) struct ChatDto {
    pub response: String,
}

#[derive(Debug, Deserialize)]
pub(crate) struct ResourceDto {
    title: String,
    #[serde(rename = "type", default)]
    kind: String,
    url: String,
}

#[derive(Debug, Deserialize)]
pub(crate) struct ResourcesDto {
    resources: Option<Vec<ResourceDto>>,
}

impl From<ResourcesDto> for Option<Vec<Resource>> {
    fn from(dto: ResourcesDto) -> Self {
        dto.resources.map(resources_from_dtos)
    }
}

fn resources_from_dtos(items: Vec<ResourceDto>) -> Vec<Resource> {
    items
        .into_iter()
        .filter_map(|item| match Url::parse(&item.url) {
            Ok(url) => Some(Resource {
                title: item.title,
                kind: ResourceKind::from_label(&item.kind),
                url,
            }),
            Err(err) => {
                tracing::debug!(%err, url = %item.url, "skipping resource with invalid url");
                None
            }
        })
        .collect()
}

#[derive(Debug, Deserialize)]
pub(crate) struct QuestionsDto {
    pub questions: Vec<Question>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct OutcomeDto {
    question_number: u32,
    correct: bool,
    #[serde(default)]
    user_answer: Option<String>,
    #[serde(default)]
    correct_answer: Option<String>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct ScoreDto {
    score: u32,
    total: u32,
    percentage: u8,
    #[serde(default)]
    results: Vec<OutcomeDto>,
}

impl From<ScoreDto> for QuizScore {
    fn from(dto: ScoreDto) -> Self {
        Self {
            score: dto.score,
            total: dto.total,
            percentage: dto.percentage,
            outcomes: dto
                .results
                .into_iter()
                .map(|item| QuestionOutcome {
                    number: item.question_number,
                    correct: item.correct,
                    user_answer: item.user_answer.as_deref().map(OptionKey::new),
                    correct_answer: item.correct_answer.as_deref().map(OptionKey::new),
                })
                .collect(),
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct RecommendationDto {
    recommended_domain: String,
    explanation: String,
    starting_topic: String,
}

#[derive(Debug, Deserialize)]
pub(crate) struct AnalysisDto {
    result: RecommendationDto,
}

impl From<AnalysisDto> for Recommendation {
    fn from(dto: AnalysisDto) -> Self {
        Self {
            recommended_domain: dto.result.recommended_domain,
            explanation: dto.result.explanation,
            starting_topic: dto.result.starting_topic,
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct StatsDto {
    total_topics: u32,
    completed_topics: u32,
    progress: u8,
}

impl From<StatsDto> for LearningStats {
    fn from(dto: StatsDto) -> Self {
        Self {
            total_topics: dto.total_topics,
            completed_topics: dto.completed_topics,
            progress_percent: dto.progress,
        }
    }
}
