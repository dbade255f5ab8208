//! Roadmap service: assistant-generated subjects, topics and plans
//! applied to the state store.

use std::sync::Arc;

use thiserror::Error;
use tracing::{info, warn};

use axent_core::assistant::{AdaptivePlan, Assistant, AssistantError};
use axent_core::state::AppStateStore;
use axent_core::AxentError;

/// Failure of a roadmap or plan operation.
#[derive(Error, Debug)]
pub enum RoadmapError {
    /// No active user profile; nothing to attach generated data to.
    #[error("no active user profile")]
    NoUser,
    #[error(transparent)]
    Assistant(#[from] AssistantError),
    #[error(transparent)]
    Store(#[from] AxentError),
}

/// What happened to a roadmap request.
#[derive(Debug, PartialEq, Eq)]
pub enum RoadmapOutcome {
    /// Subject and topics were committed to the store.
    Applied {
        subject_id: String,
        topic_count: usize,
    },
    /// The assistant produced no usable topics; nothing was committed.
    Empty,
    /// The active user changed while generation was in flight; the
    /// result was discarded.
    Stale,
}

/// Generates roadmaps and adaptive plans and applies them to the store.
pub struct RoadmapService {
    store: Arc<AppStateStore>,
    assistant: Arc<dyn Assistant>,
}

impl RoadmapService {
    pub fn new(store: Arc<AppStateStore>, assistant: Arc<dyn Assistant>) -> Self {
        Self { store, assistant }
    }

    /// Generates a roadmap for the named subject and commits it.
    ///
    /// An empty topic list means the assistant could not produce a
    /// roadmap; nothing is committed and the caller decides how to
    /// report it. The result is also discarded when the active user
    /// changed underneath the generation.
    pub async fn generate_and_apply(
        &self,
        subject_name: &str,
    ) -> Result<RoadmapOutcome, RoadmapError> {
        let user = self
            .store
            .snapshot()
            .await
            .user
            .ok_or(RoadmapError::NoUser)?;

        let roadmap = self
            .assistant
            .generate_roadmap(subject_name, &user.id, Some(&user.branch))
            .await?;

        if roadmap.topics.is_empty() {
            warn!(subject = subject_name, "assistant produced an empty roadmap");
            return Ok(RoadmapOutcome::Empty);
        }

        // Generation runs unlocked; re-check the owner before committing.
        let current_uid = self.store.snapshot().await.user.map(|u| u.id);
        if current_uid.as_deref() != Some(user.id.as_str()) {
            warn!(subject = subject_name, "user changed during generation, discarding roadmap");
            return Ok(RoadmapOutcome::Stale);
        }

        let subject_id = roadmap.subject.id.clone();
        let topic_count = roadmap.topics.len();
        self.store.add_subject(roadmap.subject).await?;
        for topic in roadmap.topics {
            self.store.add_topic(topic).await?;
        }
        info!(subject = subject_name, topic_count, "roadmap applied");

        Ok(RoadmapOutcome::Applied {
            subject_id,
            topic_count,
        })
    }

    /// Generates a roadmap per subject name and replaces the planner
    /// state wholesale (the onboarding flow).
    ///
    /// Subjects whose generation comes back empty are skipped. Returns
    /// the committed `(subjects, topics)` counts; `(0, 0)` means nothing
    /// usable was generated or the user changed mid-generation, and the
    /// existing planner state was left alone.
    pub async fn rebuild_curriculum(
        &self,
        subject_names: &[String],
    ) -> Result<(usize, usize), RoadmapError> {
        let user = self
            .store
            .snapshot()
            .await
            .user
            .ok_or(RoadmapError::NoUser)?;

        let mut subjects = Vec::new();
        let mut topics = Vec::new();
        for name in subject_names {
            let roadmap = self
                .assistant
                .generate_roadmap(name, &user.id, Some(&user.branch))
                .await?;
            if roadmap.topics.is_empty() {
                warn!(subject = %name, "skipping subject with an empty roadmap");
                continue;
            }
            subjects.push(roadmap.subject);
            topics.extend(roadmap.topics);
        }
        if subjects.is_empty() {
            return Ok((0, 0));
        }

        let current_uid = self.store.snapshot().await.user.map(|u| u.id);
        if current_uid.as_deref() != Some(user.id.as_str()) {
            warn!("user changed during generation, discarding curriculum");
            return Ok((0, 0));
        }

        let counts = (subjects.len(), topics.len());
        self.store.set_subjects_and_topics(subjects, topics).await;
        info!(subjects = counts.0, topics = counts.1, "curriculum rebuilt");
        Ok(counts)
    }

    /// Generates an adaptive plan over the learner's current subjects
    /// and topics. The plan is advisory; it is returned to the caller,
    /// not committed to the store.
    pub async fn generate_plan(&self) -> Result<AdaptivePlan, RoadmapError> {
        let state = self.store.snapshot().await;
        let user = state.user.as_ref().ok_or(RoadmapError::NoUser)?;
        let plan = self
            .assistant
            .generate_adaptive_plan(user, &state.subjects, &state.topics)
            .await?;
        Ok(plan)
    }
}
