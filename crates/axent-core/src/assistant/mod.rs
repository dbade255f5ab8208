//! Assistant contract: roadmap and schedule generation, free-form chat.
//!
//! The state core consumes this as an external collaborator; the concrete
//! client lives in the interaction crate.

pub mod model;

pub use model::{AdaptivePlan, ChatMessage, ChatRole, DayPlan, PlanSummary, Roadmap,
    SubjectAllocation};

use async_trait::async_trait;
use thiserror::Error;

use crate::user::User;

/// Categorized assistant failure.
///
/// Raw errors never reach the UI: every failure is pattern-matched into a
/// category here and rendered as a friendly string via
/// [`user_message`](AssistantError::user_message).
#[derive(Error, Debug, Clone)]
pub enum AssistantError {
    #[error("assistant network error: {0}")]
    Network(String),
    #[error("assistant credential error: {0}")]
    Credential(String),
    #[error("assistant quota exhausted: {0}")]
    Quota(String),
    #[error("assistant returned malformed output: {0}")]
    Malformed(String),
    #[error("assistant error: {0}")]
    Other(String),
}

/// Failure category, used to pick the user-facing message.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AssistantErrorKind {
    Network,
    Credential,
    Quota,
    Malformed,
    Other,
}

impl AssistantError {
    pub fn kind(&self) -> AssistantErrorKind {
        match self {
            AssistantError::Network(_) => AssistantErrorKind::Network,
            AssistantError::Credential(_) => AssistantErrorKind::Credential,
            AssistantError::Quota(_) => AssistantErrorKind::Quota,
            AssistantError::Malformed(_) => AssistantErrorKind::Malformed,
            AssistantError::Other(_) => AssistantErrorKind::Other,
        }
    }

    /// The friendly, categorized message shown in the chat transcript
    /// instead of the raw error.
    pub fn user_message(&self) -> String {
        match self.kind() {
            AssistantErrorKind::Network => {
                "Network error. Check your internet connection and try again.".to_string()
            }
            AssistantErrorKind::Credential => {
                "Invalid or missing assistant API key. Check your configuration.".to_string()
            }
            AssistantErrorKind::Quota => {
                "The assistant is rate-limited right now. Please try again in a moment."
                    .to_string()
            }
            AssistantErrorKind::Malformed | AssistantErrorKind::Other => {
                "The assistant is temporarily unavailable. Please try again.".to_string()
            }
        }
    }
}

/// AI roadmap/schedule generator and chat companion.
#[async_trait]
pub trait Assistant: Send + Sync {
    /// Generates a subject roadmap for the given subject name.
    ///
    /// An empty topic list is a valid "no result" and signals failure to
    /// produce a roadmap, never an error; errors are reserved for
    /// transport and credential problems.
    async fn generate_roadmap(
        &self,
        subject_name: &str,
        user_id: &str,
        branch: Option<&str>,
    ) -> Result<Roadmap, AssistantError>;

    /// Generates a free-form chat reply.
    ///
    /// Infallible by contract: any failure degrades to a clearly labeled
    /// unavailable-state message string.
    async fn generate_reply(&self, user: Option<&User>, history: &[ChatMessage]) -> String;

    /// Generates an adaptive study plan over the learner's current
    /// subjects and topics.
    async fn generate_adaptive_plan(
        &self,
        user: &User,
        subjects: &[crate::planner::Subject],
        topics: &[crate::planner::Topic],
    ) -> Result<AdaptivePlan, AssistantError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_user_message_is_categorized() {
        let network = AssistantError::Network("connection refused".to_string());
        assert!(network.user_message().contains("Network error"));

        let cred = AssistantError::Credential("401".to_string());
        assert!(cred.user_message().contains("API key"));

        let other = AssistantError::Other("boom".to_string());
        assert!(other.user_message().contains("unavailable"));
        // The raw error text never leaks into the friendly message.
        assert!(!other.user_message().contains("boom"));
    }
}
