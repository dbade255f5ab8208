//! GeminiAssistant - direct REST implementation of the assistant contract.
//!
//! Calls the Gemini `generateContent` endpoint without any SDK
//! dependency. Structured outputs (roadmaps, adaptive plans) are
//! requested as JSON and parsed tolerantly; chat replies degrade to a
//! categorized friendly message on any failure.

use async_trait::async_trait;
use chrono::{Duration as ChronoDuration, Utc};
use reqwest::{Client, StatusCode};
use serde::{Deserialize, Serialize};
use tracing::warn;
use uuid::Uuid;

use axent_core::assistant::{
    AdaptivePlan, Assistant, AssistantError, ChatMessage, ChatRole, Roadmap,
};
use axent_core::planner::{Difficulty, Subject, Topic, TopicStatus};
use axent_core::user::User;
use axent_infrastructure::config::AssistantConfig;

const BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta/models";
const DEFAULT_MODEL: &str = "gemini-1.5-flash";

/// Display colors cycled over generated subjects.
const SUBJECT_COLORS: &[&str] = &["indigo", "emerald", "amber", "rose", "sky"];

/// Assistant implementation that talks to the Gemini HTTP API.
#[derive(Clone, Debug)]
pub struct GeminiAssistant {
    client: Client,
    api_key: String,
    model: String,
}

impl GeminiAssistant {
    /// Creates a new assistant with the provided API key and model.
    pub fn new(api_key: impl Into<String>, model: impl Into<String>) -> Self {
        Self {
            client: Client::new(),
            api_key: api_key.into(),
            model: model.into(),
        }
    }

    /// Builds an assistant from configuration.
    ///
    /// An empty API key is a credential error; callers surface it with
    /// the categorized user message instead of failing startup.
    pub fn from_config(config: &AssistantConfig) -> Result<Self, AssistantError> {
        if config.api_key.trim().is_empty() {
            return Err(AssistantError::Credential(
                "assistant API key is not configured".to_string(),
            ));
        }
        let model = if config.model.is_empty() {
            DEFAULT_MODEL.to_string()
        } else {
            config.model.clone()
        };
        Ok(Self::new(config.api_key.clone(), model))
    }

    /// Overrides the model after construction.
    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    async fn send_request(
        &self,
        request: &GenerateContentRequest,
    ) -> Result<String, AssistantError> {
        let url = format!(
            "{}/{model}:generateContent?key={api_key}",
            BASE_URL,
            model = self.model,
            api_key = self.api_key
        );

        let response = self
            .client
            .post(url)
            .json(request)
            .send()
            .await
            .map_err(|err| AssistantError::Network(format!("request failed: {err}")))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "failed to read error body".to_string());
            return Err(map_http_error(status, body));
        }

        let parsed: GenerateContentResponse = response
            .json()
            .await
            .map_err(|err| AssistantError::Malformed(format!("invalid response body: {err}")))?;

        extract_text_response(parsed)
    }

    fn request_for(
        prompt: String,
        system_instruction: Option<String>,
        json_mode: bool,
    ) -> GenerateContentRequest {
        GenerateContentRequest {
            contents: vec![Content {
                role: "user".to_string(),
                parts: vec![Part { text: prompt }],
            }],
            system_instruction: system_instruction.map(|text| Content {
                role: "system".to_string(),
                parts: vec![Part { text }],
            }),
            generation_config: Some(GenerationConfig {
                temperature: 0.7,
                response_mime_type: json_mode.then(|| "application/json".to_string()),
            }),
        }
    }

    fn roadmap_prompt(subject_name: &str, branch: Option<&str>) -> String {
        let branch_context = branch
            .map(|b| format!(" for a {b} student"))
            .unwrap_or_default();
        format!(
            "Create a study roadmap for the subject \"{subject_name}\"{branch_context}. \
             Respond with strict JSON only, shaped as: \
             {{\"difficulty\": \"Beginner\"|\"Intermediate\"|\"Advanced\", \
             \"topics\": [{{\"title\": string, \"estimatedHours\": number, \
             \"weightage\": number (1-10), \"weaknessScore\": number (1-10)}}]}}. \
             Produce 6 to 10 topics ordered from fundamentals to advanced."
        )
    }

    fn chat_system_context(user: Option<&User>) -> String {
        let persona = user
            .and_then(|u| u.bot_persona.as_deref())
            .unwrap_or("Highly intelligent academic assistant");
        let knowledge = user
            .and_then(|u| u.bot_knowledge_base.as_deref())
            .map(|k| format!("Specialized Knowledge Focus: {k}\n"))
            .unwrap_or_default();
        let (name, branch) = match user {
            Some(u) => (u.name.as_str(), u.branch.as_str()),
            None => ("the student", "their field"),
        };
        format!(
            "You are AxentBot, an elite engineering study companion.\n\
             STRICT PERSONA GUIDELINE: {persona}\n\
             {knowledge}\
             Student Name: {name}\n\
             Branch: {branch}\n\
             Always provide technically rigorous answers suitable for {branch}. \
             Mention industry applications for technical concepts where relevant."
        )
    }

    fn transcript_prompt(history: &[ChatMessage]) -> String {
        history
            .iter()
            .map(|m| match m.role {
                ChatRole::User => format!("User: {}", m.text),
                ChatRole::Model => format!("Assistant: {}", m.text),
            })
            .collect::<Vec<_>>()
            .join("\n\n")
    }

    fn plan_prompt(user: &User, subjects: &[Subject], topics: &[Topic]) -> String {
        let subject_lines = subjects
            .iter()
            .map(|s| {
                format!(
                    "- {} (difficulty {:?}, exam {}, priority {})",
                    s.title, s.difficulty, s.exam_date, s.priority
                )
            })
            .collect::<Vec<_>>()
            .join("\n");
        let open_topics = topics
            .iter()
            .filter(|t| t.status != TopicStatus::Completed)
            .count();
        format!(
            "Build an adaptive study plan for {name}, who studies {hours} hours on \
             weekdays. Subjects:\n{subject_lines}\nOpen topics: {open_topics}.\n\
             Respond with strict JSON only, shaped as: \
             {{\"visualSchedule\": [{{\"day\": string, \"tasks\": [string]}}], \
             \"subjectBreakdown\": [{{\"subject\": string, \"hours\": number, \
             \"percentage\": number, \"reasoning\": string}}], \
             \"actionableSteps\": [string], \"progressLogic\": string, \
             \"summary\": {{\"completionTimeline\": string, \
             \"confidenceImprovement\": string, \"workloadRiskReduction\": string}}}}",
            name = user.name,
            hours = user.daily_study_hours,
        )
    }
}

#[async_trait]
impl Assistant for GeminiAssistant {
    async fn generate_roadmap(
        &self,
        subject_name: &str,
        user_id: &str,
        branch: Option<&str>,
    ) -> Result<Roadmap, AssistantError> {
        let request = Self::request_for(Self::roadmap_prompt(subject_name, branch), None, true);
        let text = self.send_request(&request).await?;

        match serde_json::from_str::<RoadmapDraft>(strip_code_fences(&text)) {
            Ok(draft) => Ok(roadmap_from_draft(draft, subject_name, user_id)),
            Err(err) => {
                // An unusable roadmap body is reported as an empty topic
                // list, not an error: the caller treats zero topics as
                // "could not generate" and keeps the conversation going.
                warn!(error = %err, subject = subject_name, "roadmap response was not valid JSON");
                Ok(empty_roadmap(subject_name, user_id))
            }
        }
    }

    async fn generate_reply(&self, user: Option<&User>, history: &[ChatMessage]) -> String {
        let request = Self::request_for(
            Self::transcript_prompt(history),
            Some(Self::chat_system_context(user)),
            false,
        );
        match self.send_request(&request).await {
            Ok(text) if !text.trim().is_empty() => text,
            Ok(_) => "I'm sorry, I couldn't process that request. Please rephrase.".to_string(),
            Err(err) => {
                warn!(error = %err, "chat reply failed, degrading to friendly message");
                err.user_message()
            }
        }
    }

    async fn generate_adaptive_plan(
        &self,
        user: &User,
        subjects: &[Subject],
        topics: &[Topic],
    ) -> Result<AdaptivePlan, AssistantError> {
        let request = Self::request_for(Self::plan_prompt(user, subjects, topics), None, true);
        let text = self.send_request(&request).await?;
        serde_json::from_str(strip_code_fences(&text))
            .map_err(|err| AssistantError::Malformed(format!("plan body invalid: {err}")))
    }
}

// ============================================================================
// Wire format
// ============================================================================

#[derive(Serialize)]
struct GenerateContentRequest {
    contents: Vec<Content>,
    #[serde(rename = "systemInstruction", skip_serializing_if = "Option::is_none")]
    system_instruction: Option<Content>,
    #[serde(rename = "generationConfig", skip_serializing_if = "Option::is_none")]
    generation_config: Option<GenerationConfig>,
}

#[derive(Serialize)]
struct Content {
    role: String,
    parts: Vec<Part>,
}

#[derive(Serialize)]
struct Part {
    text: String,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerationConfig {
    temperature: f32,
    #[serde(skip_serializing_if = "Option::is_none")]
    response_mime_type: Option<String>,
}

#[derive(Deserialize)]
struct GenerateContentResponse {
    candidates: Option<Vec<Candidate>>,
}

#[derive(Deserialize)]
struct Candidate {
    content: Option<ContentResponse>,
}

#[derive(Deserialize)]
struct ContentResponse {
    parts: Vec<PartResponse>,
}

#[derive(Deserialize)]
struct PartResponse {
    text: Option<String>,
}

#[derive(Deserialize)]
struct ErrorWrapper {
    error: ErrorBody,
}

#[derive(Deserialize)]
struct ErrorBody {
    message: Option<String>,
}

/// Structured roadmap body requested from the model.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RoadmapDraft {
    #[serde(default)]
    difficulty: Option<Difficulty>,
    #[serde(default)]
    topics: Vec<TopicDraft>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct TopicDraft {
    title: String,
    #[serde(default)]
    estimated_hours: Option<f64>,
    #[serde(default)]
    weightage: Option<u8>,
    #[serde(default)]
    weakness_score: Option<u8>,
}

fn extract_text_response(response: GenerateContentResponse) -> Result<String, AssistantError> {
    response
        .candidates
        .and_then(|mut candidates| candidates.pop())
        .and_then(|candidate| candidate.content)
        .and_then(|content| content.parts.into_iter().find_map(|part| part.text))
        .ok_or_else(|| {
            AssistantError::Malformed("no text in the response candidates".to_string())
        })
}

fn map_http_error(status: StatusCode, body: String) -> AssistantError {
    let message = serde_json::from_str::<ErrorWrapper>(&body)
        .ok()
        .and_then(|wrapper| wrapper.error.message)
        .unwrap_or(body);
    let message = format!("{status}: {message}");

    match status {
        StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => AssistantError::Credential(message),
        StatusCode::TOO_MANY_REQUESTS => AssistantError::Quota(message),
        status if status.is_server_error() => AssistantError::Network(message),
        _ => AssistantError::Other(message),
    }
}

/// Strips a leading/trailing markdown code fence, which models add even
/// in JSON mode.
fn strip_code_fences(text: &str) -> &str {
    let trimmed = text.trim();
    let Some(inner) = trimmed.strip_prefix("```") else {
        return trimmed;
    };
    let inner = inner.strip_prefix("json").unwrap_or(inner);
    inner.strip_suffix("```").unwrap_or(inner).trim()
}

fn pick_color(subject_name: &str) -> String {
    let index = subject_name.len() % SUBJECT_COLORS.len();
    SUBJECT_COLORS[index].to_string()
}

fn new_subject(subject_name: &str, user_id: &str, difficulty: Difficulty) -> Subject {
    // A month of runway is a sane placeholder until the student sets the
    // real exam date.
    let exam_date = (Utc::now() + ChronoDuration::days(30))
        .date_naive()
        .to_string();
    Subject {
        id: Uuid::new_v4().to_string(),
        user_id: user_id.to_string(),
        title: subject_name.to_string(),
        difficulty,
        exam_date,
        priority: 3,
        color: pick_color(subject_name),
        credits: None,
        confidence_level: None,
        grade_points: None,
        marks_percent: None,
    }
}

fn empty_roadmap(subject_name: &str, user_id: &str) -> Roadmap {
    Roadmap {
        subject: new_subject(subject_name, user_id, Difficulty::Intermediate),
        topics: Vec::new(),
    }
}

fn roadmap_from_draft(draft: RoadmapDraft, subject_name: &str, user_id: &str) -> Roadmap {
    let subject = new_subject(
        subject_name,
        user_id,
        draft.difficulty.unwrap_or(Difficulty::Intermediate),
    );
    let topics = draft
        .topics
        .into_iter()
        .map(|t| Topic {
            id: Uuid::new_v4().to_string(),
            subject_id: subject.id.clone(),
            title: t.title,
            estimated_hours: t.estimated_hours.unwrap_or(2.0),
            status: TopicStatus::Todo,
            weightage: t.weightage.unwrap_or(5).clamp(1, 10),
            weakness_score: t.weakness_score.unwrap_or(5).clamp(1, 10),
        })
        .collect();
    Roadmap { subject, topics }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_strip_code_fences() {
        assert_eq!(strip_code_fences("{\"a\":1}"), "{\"a\":1}");
        assert_eq!(strip_code_fences("```json\n{\"a\":1}\n```"), "{\"a\":1}");
        assert_eq!(strip_code_fences("```\n{\"a\":1}\n```"), "{\"a\":1}");
    }

    #[test]
    fn test_map_http_error_categories() {
        let err = map_http_error(StatusCode::UNAUTHORIZED, "{}".to_string());
        assert!(matches!(err, AssistantError::Credential(_)));

        let err = map_http_error(StatusCode::TOO_MANY_REQUESTS, "{}".to_string());
        assert!(matches!(err, AssistantError::Quota(_)));

        let err = map_http_error(StatusCode::SERVICE_UNAVAILABLE, "{}".to_string());
        assert!(matches!(err, AssistantError::Network(_)));

        let err = map_http_error(StatusCode::BAD_REQUEST, "{}".to_string());
        assert!(matches!(err, AssistantError::Other(_)));
    }

    #[test]
    fn test_map_http_error_extracts_api_message() {
        let body = r#"{"error": {"message": "API key not valid"}}"#;
        let err = map_http_error(StatusCode::FORBIDDEN, body.to_string());
        assert!(err.to_string().contains("API key not valid"));
    }

    #[test]
    fn test_roadmap_from_draft_builds_linked_topics() {
        let draft: RoadmapDraft = serde_json::from_str(
            r#"{
                "difficulty": "Advanced",
                "topics": [
                    {"title": "Entropy", "estimatedHours": 3, "weightage": 8, "weaknessScore": 4},
                    {"title": "Enthalpy"}
                ]
            }"#,
        )
        .unwrap();

        let roadmap = roadmap_from_draft(draft, "Thermodynamics", "u-1");
        assert_eq!(roadmap.subject.title, "Thermodynamics");
        assert_eq!(roadmap.subject.user_id, "u-1");
        assert_eq!(roadmap.subject.difficulty, Difficulty::Advanced);
        assert_eq!(roadmap.topics.len(), 2);
        for topic in &roadmap.topics {
            assert_eq!(topic.subject_id, roadmap.subject.id);
            assert_eq!(topic.status, TopicStatus::Todo);
        }
        // Defaults fill the second, sparse topic.
        assert_eq!(roadmap.topics[1].estimated_hours, 2.0);
        assert_eq!(roadmap.topics[1].weightage, 5);
    }

    #[test]
    fn test_weightage_is_clamped_into_range() {
        let draft: RoadmapDraft = serde_json::from_str(
            r#"{"topics": [{"title": "X", "weightage": 99, "weaknessScore": 0}]}"#,
        )
        .unwrap();
        let roadmap = roadmap_from_draft(draft, "Signals", "u-1");
        assert_eq!(roadmap.topics[0].weightage, 10);
        assert_eq!(roadmap.topics[0].weakness_score, 1);
    }

    #[test]
    fn test_from_config_rejects_missing_key() {
        let config = AssistantConfig {
            api_key: "  ".to_string(),
            model: String::new(),
        };
        let err = GeminiAssistant::from_config(&config).unwrap_err();
        assert!(matches!(err, AssistantError::Credential(_)));
    }
}
