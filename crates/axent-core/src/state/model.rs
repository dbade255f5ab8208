//! The root `AppState` aggregate and its pure mutation layer.
//!
//! Every mutation is a plain method from `(current state, args)` to the
//! next state, applied under the store lock so observers never see a
//! partial update. Integrity rules live here: duplicate ids are rejected
//! at this boundary, and deleting a subject cascade-deletes its topics so
//! no dangling `subject_id` reference can reach the UI or the remote
//! document.

use serde::{Deserialize, Serialize};

use crate::error::{AxentError, Result};
use crate::journal::{Activity, AttendanceRecord, DiaryEntry};
use crate::planner::{Subject, SubjectPatch, Topic, TopicPatch};
use crate::user::{User, UserIdentity};

/// The single root aggregate: everything the application persists.
///
/// Serialized as one JSON document (the snapshot) both to the local cache
/// and, opportunistically, to the remote document store.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AppState {
    /// The active learner profile; `None` before onboarding.
    pub user: Option<User>,
    /// Insertion order is display order; unique by `id`.
    #[serde(default)]
    pub subjects: Vec<Subject>,
    /// Each topic references exactly one subject by `subject_id`.
    #[serde(default)]
    pub topics: Vec<Topic>,
    /// Newest-first.
    #[serde(default)]
    pub diary_entries: Vec<DiaryEntry>,
    /// Newest-first.
    #[serde(default)]
    pub activities: Vec<Activity>,
    /// Newest-first.
    #[serde(default)]
    pub attendance: Vec<AttendanceRecord>,
}

impl AppState {
    /// Creates the empty default aggregate.
    pub fn new() -> Self {
        Self::default()
    }

    /// Replaces the `user` slot wholesale. No validation at this layer.
    pub fn set_user(&mut self, user: Option<User>) {
        self.user = user;
    }

    /// Derives the reduced identity record from the current user, if any.
    pub fn identity(&self) -> Option<UserIdentity> {
        self.user.as_ref().map(User::identity)
    }

    /// Appends a subject, rejecting a duplicate `id` with
    /// [`AxentError::Conflict`].
    pub fn add_subject(&mut self, subject: Subject) -> Result<()> {
        if self.subjects.iter().any(|s| s.id == subject.id) {
            return Err(AxentError::conflict("subject", subject.id));
        }
        self.subjects.push(subject);
        Ok(())
    }

    /// Appends a topic, rejecting a duplicate `id` with
    /// [`AxentError::Conflict`].
    pub fn add_topic(&mut self, topic: Topic) -> Result<()> {
        if self.topics.iter().any(|t| t.id == topic.id) {
            return Err(AxentError::conflict("topic", topic.id));
        }
        self.topics.push(topic);
        Ok(())
    }

    /// Merges patch fields into the matching subject. Silent no-op when
    /// the id is absent. Returns whether a subject was touched.
    pub fn update_subject(&mut self, id: &str, patch: &SubjectPatch) -> bool {
        match self.subjects.iter_mut().find(|s| s.id == id) {
            Some(subject) => {
                patch.apply(subject);
                true
            }
            None => false,
        }
    }

    /// Merges patch fields into the matching topic. Silent no-op when the
    /// id is absent. Returns whether a topic was touched.
    pub fn update_topic(&mut self, id: &str, patch: &TopicPatch) -> bool {
        match self.topics.iter_mut().find(|t| t.id == id) {
            Some(topic) => {
                patch.apply(topic);
                true
            }
            None => false,
        }
    }

    /// Removes the subject with the given id and cascade-deletes its
    /// topics. All other subjects and topics keep their relative order.
    pub fn delete_subject(&mut self, id: &str) {
        self.subjects.retain(|s| s.id != id);
        self.topics.retain(|t| t.subject_id != id);
    }

    /// Removes the topic with the given id.
    pub fn delete_topic(&mut self, id: &str) {
        self.topics.retain(|t| t.id != id);
    }

    /// Atomic bulk replace of both sequences, used when a generator
    /// produces a complete roadmap. No interleaved partial state is ever
    /// observable.
    pub fn set_subjects_and_topics(&mut self, subjects: Vec<Subject>, topics: Vec<Topic>) {
        self.subjects = subjects;
        self.topics = topics;
    }

    /// Prepends a diary entry (newest-first).
    pub fn add_diary_entry(&mut self, entry: DiaryEntry) {
        self.diary_entries.insert(0, entry);
    }

    /// Prepends an activity record (newest-first).
    pub fn add_activity(&mut self, activity: Activity) {
        self.activities.insert(0, activity);
    }

    /// Prepends an attendance record (newest-first).
    pub fn add_attendance(&mut self, record: AttendanceRecord) {
        self.attendance.insert(0, record);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::journal::Mood;
    use crate::planner::{Difficulty, TopicStatus};

    fn subject(id: &str, title: &str) -> Subject {
        Subject {
            id: id.to_string(),
            user_id: "u-1".to_string(),
            title: title.to_string(),
            difficulty: Difficulty::Intermediate,
            exam_date: "2026-05-01".to_string(),
            priority: 3,
            color: "indigo".to_string(),
            credits: None,
            confidence_level: None,
            grade_points: None,
            marks_percent: None,
        }
    }

    fn topic(id: &str, subject_id: &str, title: &str) -> Topic {
        Topic {
            id: id.to_string(),
            subject_id: subject_id.to_string(),
            title: title.to_string(),
            estimated_hours: 2.0,
            status: TopicStatus::Todo,
            weightage: 5,
            weakness_score: 5,
        }
    }

    #[test]
    fn test_default_is_empty() {
        let state = AppState::new();
        assert!(state.user.is_none());
        assert!(state.subjects.is_empty());
        assert!(state.topics.is_empty());
        assert!(state.diary_entries.is_empty());
        assert!(state.activities.is_empty());
        assert!(state.attendance.is_empty());
    }

    #[test]
    fn test_add_subject_rejects_duplicate_id() {
        let mut state = AppState::new();
        state.add_subject(subject("s1", "Thermo")).unwrap();
        let err = state.add_subject(subject("s1", "Other")).unwrap_err();
        assert!(err.is_conflict());
        // The first insert wins; updates are unambiguous.
        assert_eq!(state.subjects.len(), 1);
        assert_eq!(state.subjects[0].title, "Thermo");

        let patch = SubjectPatch {
            title: Some("X".to_string()),
            ..Default::default()
        };
        assert!(state.update_subject("s1", &patch));
        assert_eq!(state.subjects[0].title, "X");
    }

    #[test]
    fn test_update_topic_is_noop_for_unknown_id() {
        let mut state = AppState::new();
        state.add_subject(subject("s1", "Thermo")).unwrap();
        state.add_topic(topic("t1", "s1", "Entropy")).unwrap();

        let patch = TopicPatch {
            status: Some(TopicStatus::Completed),
            ..Default::default()
        };
        assert!(!state.update_topic("missing", &patch));
        assert_eq!(state.topics[0].status, TopicStatus::Todo);
    }

    #[test]
    fn test_delete_subject_cascades_to_its_topics_only() {
        let mut state = AppState::new();
        state.add_subject(subject("s1", "Thermo")).unwrap();
        state.add_subject(subject("s2", "Signals")).unwrap();
        state.add_topic(topic("t1", "s1", "Entropy")).unwrap();
        state.add_topic(topic("t2", "s2", "Fourier")).unwrap();
        state.add_topic(topic("t3", "s1", "Enthalpy")).unwrap();

        state.delete_subject("s1");

        assert_eq!(state.subjects.len(), 1);
        assert_eq!(state.subjects[0].id, "s2");
        assert_eq!(state.topics.len(), 1);
        assert_eq!(state.topics[0].id, "t2");
    }

    #[test]
    fn test_delete_subject_preserves_order_of_survivors() {
        let mut state = AppState::new();
        for id in ["s1", "s2", "s3"] {
            state.add_subject(subject(id, id)).unwrap();
        }
        state.delete_subject("s2");
        let ids: Vec<&str> = state.subjects.iter().map(|s| s.id.as_str()).collect();
        assert_eq!(ids, vec!["s1", "s3"]);
    }

    #[test]
    fn test_histories_prepend_newest_first() {
        let mut state = AppState::new();
        state.add_diary_entry(DiaryEntry {
            id: "d1".to_string(),
            date: "2026-03-01".to_string(),
            title: "first".to_string(),
            content: String::new(),
            mood: Mood::Content,
            is_public: false,
            tags: vec![],
        });
        state.add_diary_entry(DiaryEntry {
            id: "d2".to_string(),
            date: "2026-03-02".to_string(),
            title: "second".to_string(),
            content: String::new(),
            mood: Mood::Happy,
            is_public: false,
            tags: vec![],
        });
        assert_eq!(state.diary_entries[0].id, "d2");
        assert_eq!(state.diary_entries[1].id, "d1");
    }

    #[test]
    fn test_set_subjects_and_topics_replaces_both() {
        let mut state = AppState::new();
        state.add_subject(subject("old", "Old")).unwrap();
        state.add_topic(topic("t-old", "old", "stale")).unwrap();

        state.set_subjects_and_topics(
            vec![subject("s1", "Thermo")],
            vec![topic("t1", "s1", "Entropy")],
        );

        assert_eq!(state.subjects.len(), 1);
        assert_eq!(state.subjects[0].id, "s1");
        assert_eq!(state.topics.len(), 1);
        assert_eq!(state.topics[0].id, "t1");
    }

    #[test]
    fn test_snapshot_round_trips_through_json() {
        let mut state = AppState::new();
        state.add_subject(subject("s1", "Thermo")).unwrap();
        state.add_topic(topic("t1", "s1", "Entropy")).unwrap();

        let json = serde_json::to_string(&state).unwrap();
        let restored: AppState = serde_json::from_str(&json).unwrap();
        assert_eq!(restored, state);
    }
}
