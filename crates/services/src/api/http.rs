use async_trait::async_trait;
use learn_core::model::{
    AnswerSheet, Difficulty, LearningStats, Persona, Question, QuizScore, Recommendation,
    Resource,
};
use reqwest::{Client, Response};
use serde::Serialize;
use serde::de::DeserializeOwned;
use url::Url;

use super::wire::{
    self, AnalysisDto, AnsweredQuestionsRequest, ChatDto, ChatRequest, EmptyDto, GuideDto,
    NextDto, NoteDto, QuestionsDto, ResourcesDto, ResourcesRequest, SaveNoteRequest, ScoreDto,
    StartDto, StartTopicRequest, StatsDto,
};
use super::{Advance, LearningApi, SessionSnapshot, StartedRoadmap};
use crate::config::ApiConfig;
use crate::error::ApiError;

/// `LearningApi` over HTTP/JSON.
///
/// The backend tracks the session through a cookie, so the client keeps a cookie store
/// for its whole lifetime.
#[derive(Clone)]
pub struct HttpLearningApi {
    client: Client,
    base_url: Url,
}

impl HttpLearningApi {
    /// # Errors
    ///
    /// Returns `ApiError::Http` when the HTTP client cannot be built.
    pub fn new(config: &ApiConfig) -> Result<Self, ApiError> {
        let client = Client::builder()
            .cookie_store(true)
            .timeout(config.timeout)
            .build()?;
        Ok(Self {
            client,
            base_url: config.base_url.clone(),
        })
    }

    fn endpoint(&self, path: &str) -> Result<Url, ApiError> {
        Ok(self.base_url.join(path)?)
    }

    async fn get<T: DeserializeOwned>(&self, path: &str) -> Result<T, ApiError> {
        let response = self.client.get(self.endpoint(path)?).send().await?;
        let body = read_body(response).await?;
        wire::parse_envelope(&body)
    }

    async fn post<T: DeserializeOwned>(&self, path: &str) -> Result<T, ApiError> {
        let response = self.client.post(self.endpoint(path)?).send().await?;
        let body = read_body(response).await?;
        wire::parse_envelope(&body)
    }

    async fn post_json<T, B>(&self, path: &str, payload: &B) -> Result<T, ApiError>
    where
        T: DeserializeOwned,
        B: Serialize + Sync + ?Sized,
    {
        let response = self
            .client
            .post(self.endpoint(path)?)
            .json(payload)
            .send()
            .await?;
        let body = read_body(response).await?;
        wire::parse_envelope(&body)
    }
}

// Error statuses still carry a JSON `{"error": ...}` body worth surfacing; only bodies
// that are not JSON at all fall back to the bare status.
async fn read_body(response: Response) -> Result<String, ApiError> {
    let status = response.status();
    let body = response.text().await?;
    if !status.is_success() && serde_json::from_str::<serde_json::Value>(&body).is_err() {
        return Err(ApiError::HttpStatus(status));
    }
    Ok(body)
}

#[async_trait]
impl LearningApi for HttpLearningApi {
    async fn resume_session(&self) -> Result<Option<SessionSnapshot>, ApiError> {
        let response = self
            .client
            .get(self.endpoint("api/resume-session")?)
            .send()
            .await?;
        let body = read_body(response).await?;
        wire::parse_resume(&body)
    }

    async fn start_topic(
        &self,
        topic: &str,
        persona: Persona,
        difficulty: Difficulty,
    ) -> Result<StartedRoadmap, ApiError> {
        let request = StartTopicRequest {
            topic,
            persona: persona.as_str(),
            difficulty: difficulty.as_str(),
        };
        let dto: StartDto = self.post_json("api/start-topic", &request).await?;
        Ok(dto.into())
    }

    async fn next_step(&self) -> Result<Advance, ApiError> {
        let dto: NextDto = self.post("api/next-step").await?;
        Advance::try_from(dto)
    }

    async fn guide(&self) -> Result<String, ApiError> {
        let dto: GuideDto = self.post("api/get-guide").await?;
        Ok(dto.guide)
    }

    async fn note(&self) -> Result<Option<String>, ApiError> {
        let dto: NoteDto = self.get("api/get-note").await?;
        Ok(dto.note.filter(|note| !note.is_empty()))
    }

    async fn save_note(&self, content: &str) -> Result<(), ApiError> {
        let _: EmptyDto = self
            .post_json("api/save-note", &SaveNoteRequest { content })
            .await?;
        Ok(())
    }

    async fn resources(
        &self,
        topic: &str,
        step_title: &str,
    ) -> Result<Option<Vec<Resource>>, ApiError> {
        let request = ResourcesRequest {
            topic,
            step: step_title,
        };
        let dto: ResourcesDto = self.post_json("api/get-resources", &request).await?;
        Ok(dto.into())
    }

    async fn chat(&self, message: &str) -> Result<String, ApiError> {
        let dto: ChatDto = self.post_json("api/chat", &ChatRequest { message }).await?;
        Ok(dto.response)
    }

    async fn clear_chat(&self) -> Result<(), ApiError> {
        let _: EmptyDto = self.post("api/clear-chat").await?;
        Ok(())
    }

    async fn generate_quiz(&self) -> Result<Vec<Question>, ApiError> {
        let dto: QuestionsDto = self.post("api/generate-quiz").await?;
        Ok(dto.questions)
    }

    async fn submit_quiz(
        &self,
        questions: &[Question],
        answers: &AnswerSheet,
    ) -> Result<QuizScore, ApiError> {
        let request = AnsweredQuestionsRequest::new(questions, answers);
        let dto: ScoreDto = self.post_json("api/submit-quiz", &request).await?;
        Ok(dto.into())
    }

    async fn generate_assessment(&self) -> Result<Vec<Question>, ApiError> {
        let dto: QuestionsDto = self.post("api/generate-assessment").await?;
        Ok(dto.questions)
    }

    async fn analyze_assessment(
        &self,
        questions: &[Question],
        answers: &AnswerSheet,
    ) -> Result<Recommendation, ApiError> {
        let request = AnsweredQuestionsRequest::new(questions, answers);
        let dto: AnalysisDto = self.post_json("api/analyze-assessment", &request).await?;
        Ok(dto.into())
    }

    async fn stats(&self) -> Result<LearningStats, ApiError> {
        let dto: StatsDto = self.get("api/stats").await?;
        Ok(dto.into())
    }

    fn export_url(&self) -> Option<Url> {
        self.endpoint("api/export").ok()
    }
}
