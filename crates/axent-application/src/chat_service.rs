//! Chat service: the assistant conversation surface.
//!
//! Owns the transcript and the visibility flag, drains the single-slot
//! chat bridge (consume-once), and routes each submitted message either
//! to free-form reply generation or, when the text reads like a
//! plan/schedule request, to adaptive plan generation over the learner's
//! current subjects.

use std::sync::Arc;

use once_cell::sync::Lazy;
use regex::Regex;
use tokio::sync::{watch, Mutex};
use tracing::debug;

use axent_core::assistant::{AdaptivePlan, Assistant, ChatMessage};
use axent_core::chat::ChatBridge;
use axent_core::state::AppStateStore;

const GREETING: &str =
    "Hi! I'm AxentBot, your study companion. Ask me anything, or ask me to build a study plan.";

static PLAN_INTENT: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)\b(make|create|generate|build|prepare)\b.*\b(plan|schedule|timetable|roadmap)\b")
        .expect("plan intent pattern is valid")
});

/// Returns whether the message asks for a study plan rather than a
/// conversational answer.
pub fn is_plan_intent(text: &str) -> bool {
    PLAN_INTENT.is_match(text)
}

/// The assistant conversation surface.
pub struct ChatService {
    store: Arc<AppStateStore>,
    assistant: Arc<dyn Assistant>,
    bridge: ChatBridge,
    transcript: Mutex<Vec<ChatMessage>>,
    visible: watch::Sender<bool>,
}

impl ChatService {
    pub fn new(store: Arc<AppStateStore>, assistant: Arc<dyn Assistant>, bridge: ChatBridge) -> Self {
        let (visible, _) = watch::channel(false);
        Self {
            store,
            assistant,
            bridge,
            transcript: Mutex::new(vec![ChatMessage::model(GREETING)]),
            visible,
        }
    }

    /// The shared pending-message bridge.
    pub fn bridge(&self) -> &ChatBridge {
        &self.bridge
    }

    /// A receiver over the visibility flag.
    pub fn visible(&self) -> watch::Receiver<bool> {
        self.visible.subscribe()
    }

    pub fn open(&self) {
        self.visible.send_replace(true);
    }

    pub fn close(&self) {
        self.visible.send_replace(false);
    }

    /// A clone of the conversation transcript, oldest first.
    pub async fn transcript(&self) -> Vec<ChatMessage> {
        self.transcript.lock().await.clone()
    }

    /// Consumes the pending bridge message, if any: opens the surface
    /// and submits it as if the learner had typed it.
    ///
    /// The slot is cleared atomically on take, so a second drain (or a
    /// concurrent consumer clone) sees nothing.
    pub async fn drain_pending(&self) -> Option<String> {
        let message = self.bridge.take()?;
        debug!("consuming pending bridge message");
        self.open();
        Some(self.submit(&message).await)
    }

    /// Appends the learner message, generates a reply and appends it.
    /// Returns the reply text.
    pub async fn submit(&self, text: &str) -> String {
        self.transcript.lock().await.push(ChatMessage::user(text));
        let reply = self.reply_for(text).await;
        self.transcript
            .lock()
            .await
            .push(ChatMessage::model(reply.clone()));
        reply
    }

    async fn reply_for(&self, text: &str) -> String {
        let state = self.store.snapshot().await;

        if is_plan_intent(text) {
            if let Some(user) = &state.user {
                if state.subjects.is_empty() {
                    return "Add a subject first and I'll build a plan around your exams."
                        .to_string();
                }
                return match self
                    .assistant
                    .generate_adaptive_plan(user, &state.subjects, &state.topics)
                    .await
                {
                    Ok(plan) => render_plan(&plan),
                    Err(err) => err.user_message(),
                };
            }
        }

        let history = self.transcript.lock().await.clone();
        self.assistant.generate_reply(state.user.as_ref(), &history).await
    }
}

/// Renders an adaptive plan as transcript text.
fn render_plan(plan: &AdaptivePlan) -> String {
    let mut out = String::from("Here's your adaptive study plan.\n");

    if !plan.subject_breakdown.is_empty() {
        out.push_str("\nWeekly focus:\n");
        for allocation in &plan.subject_breakdown {
            out.push_str(&format!(
                "- {}: {:.1}h ({:.0}%) - {}\n",
                allocation.subject, allocation.hours, allocation.percentage, allocation.reasoning
            ));
        }
    }

    if !plan.actionable_steps.is_empty() {
        out.push_str("\nNext steps:\n");
        for step in &plan.actionable_steps {
            out.push_str(&format!("- {step}\n"));
        }
    }

    out.push_str(&format!(
        "\nExpected completion: {}",
        plan.summary.completion_timeline
    ));
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use axent_core::assistant::{DayPlan, PlanSummary, SubjectAllocation};

    #[test]
    fn test_plan_intent_matches_requests() {
        assert!(is_plan_intent("Can you create a study plan for me?"));
        assert!(is_plan_intent("make me a SCHEDULE please"));
        assert!(is_plan_intent("generate a revision timetable"));
        assert!(is_plan_intent("build a roadmap for thermodynamics"));
    }

    #[test]
    fn test_plan_intent_ignores_conversation() {
        assert!(!is_plan_intent("what is entropy?"));
        assert!(!is_plan_intent("my plan is going well"));
        assert!(!is_plan_intent("schedule"));
    }

    #[test]
    fn test_render_plan_includes_breakdown_and_steps() {
        let plan = AdaptivePlan {
            visual_schedule: vec![DayPlan {
                day: "Monday".to_string(),
                tasks: vec!["Entropy".to_string()],
            }],
            subject_breakdown: vec![SubjectAllocation {
                subject: "Thermo".to_string(),
                hours: 6.0,
                percentage: 60.0,
                reasoning: "exam is closest".to_string(),
            }],
            actionable_steps: vec!["Revise entropy tonight".to_string()],
            progress_logic: "weakness-weighted".to_string(),
            summary: PlanSummary {
                completion_timeline: "3 weeks".to_string(),
                confidence_improvement: "+20%".to_string(),
                workload_risk_reduction: "-15%".to_string(),
            },
        };

        let text = render_plan(&plan);
        assert!(text.contains("Thermo: 6.0h (60%)"));
        assert!(text.contains("Revise entropy tonight"));
        assert!(text.contains("Expected completion: 3 weeks"));
    }
}
