//! Structured assistant outputs and the chat transcript message.

use serde::{Deserialize, Serialize};

use crate::planner::{Subject, Topic};

/// Speaker role in the assistant transcript.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChatRole {
    User,
    Model,
}

/// One entry of the assistant conversation transcript.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: ChatRole,
    pub text: String,
}

impl ChatMessage {
    pub fn user(text: impl Into<String>) -> Self {
        Self {
            role: ChatRole::User,
            text: text.into(),
        }
    }

    pub fn model(text: impl Into<String>) -> Self {
        Self {
            role: ChatRole::Model,
            text: text.into(),
        }
    }
}

/// A generated subject roadmap.
///
/// `topics.is_empty()` signals an empty/failed generation, not an error.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Roadmap {
    pub subject: Subject,
    pub topics: Vec<Topic>,
}

/// One day of the visual schedule.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DayPlan {
    pub day: String,
    pub tasks: Vec<String>,
}

/// Per-subject hour allocation with reasoning.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubjectAllocation {
    pub subject: String,
    pub hours: f64,
    pub percentage: f64,
    pub reasoning: String,
}

/// Plan summary headline figures.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlanSummary {
    pub completion_timeline: String,
    pub confidence_improvement: String,
    pub workload_risk_reduction: String,
}

/// A structured adaptive study plan.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AdaptivePlan {
    pub visual_schedule: Vec<DayPlan>,
    pub subject_breakdown: Vec<SubjectAllocation>,
    pub actionable_steps: Vec<String>,
    pub progress_logic: String,
    pub summary: PlanSummary,
}
