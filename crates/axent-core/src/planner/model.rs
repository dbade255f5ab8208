//! Subject and Topic domain models.
//!
//! Subjects carry an exam deadline and priority; topics belong to exactly
//! one subject and move through a three-state progress pipeline with free
//! transitions (Kanban semantics, no enforced ordering).

use serde::{Deserialize, Serialize};

/// Self-assessed difficulty of a subject.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Difficulty {
    Beginner,
    Intermediate,
    Advanced,
}

/// Progress state of a topic. Any transition between states is legal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TopicStatus {
    Todo,
    InProgress,
    Completed,
}

/// An academic subject with an exam deadline.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Subject {
    pub id: String,
    pub user_id: String,
    pub title: String,
    pub difficulty: Difficulty,
    /// Exam date as an ISO calendar date string (e.g. "2026-05-01").
    pub exam_date: String,
    /// Priority 1-5.
    pub priority: u8,
    /// Display tag, not core-semantic.
    pub color: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub credits: Option<f64>,
    /// Confidence 1-5.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub confidence_level: Option<u8>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub grade_points: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub marks_percent: Option<f64>,
}

/// A curriculum topic referencing its parent subject by id.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Topic {
    pub id: String,
    pub subject_id: String,
    pub title: String,
    pub estimated_hours: f64,
    pub status: TopicStatus,
    /// Exam importance 1-10.
    pub weightage: u8,
    /// Self-assessed difficulty 1-10.
    pub weakness_score: u8,
}

/// Partial update for a subject. Unset fields are left untouched.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubjectPatch {
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub difficulty: Option<Difficulty>,
    #[serde(default)]
    pub exam_date: Option<String>,
    #[serde(default)]
    pub priority: Option<u8>,
    #[serde(default)]
    pub color: Option<String>,
    #[serde(default)]
    pub credits: Option<f64>,
    #[serde(default)]
    pub confidence_level: Option<u8>,
    #[serde(default)]
    pub grade_points: Option<f64>,
    #[serde(default)]
    pub marks_percent: Option<f64>,
}

impl SubjectPatch {
    /// Merges set fields into the target subject. The `id` and `user_id`
    /// join keys are never patched.
    pub fn apply(&self, subject: &mut Subject) {
        if let Some(title) = &self.title {
            subject.title = title.clone();
        }
        if let Some(difficulty) = self.difficulty {
            subject.difficulty = difficulty;
        }
        if let Some(exam_date) = &self.exam_date {
            subject.exam_date = exam_date.clone();
        }
        if let Some(priority) = self.priority {
            subject.priority = priority;
        }
        if let Some(color) = &self.color {
            subject.color = color.clone();
        }
        if let Some(credits) = self.credits {
            subject.credits = Some(credits);
        }
        if let Some(confidence_level) = self.confidence_level {
            subject.confidence_level = Some(confidence_level);
        }
        if let Some(grade_points) = self.grade_points {
            subject.grade_points = Some(grade_points);
        }
        if let Some(marks_percent) = self.marks_percent {
            subject.marks_percent = Some(marks_percent);
        }
    }
}

/// Partial update for a topic. Unset fields are left untouched.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TopicPatch {
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub estimated_hours: Option<f64>,
    #[serde(default)]
    pub status: Option<TopicStatus>,
    #[serde(default)]
    pub weightage: Option<u8>,
    #[serde(default)]
    pub weakness_score: Option<u8>,
}

impl TopicPatch {
    /// Merges set fields into the target topic. The `id` and `subject_id`
    /// join keys are never patched.
    pub fn apply(&self, topic: &mut Topic) {
        if let Some(title) = &self.title {
            topic.title = title.clone();
        }
        if let Some(estimated_hours) = self.estimated_hours {
            topic.estimated_hours = estimated_hours;
        }
        if let Some(status) = self.status {
            topic.status = status;
        }
        if let Some(weightage) = self.weightage {
            topic.weightage = weightage;
        }
        if let Some(weakness_score) = self.weakness_score {
            topic.weakness_score = weakness_score;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_topic() -> Topic {
        Topic {
            id: "t-1".to_string(),
            subject_id: "s-1".to_string(),
            title: "Laplace transforms".to_string(),
            estimated_hours: 3.0,
            status: TopicStatus::Todo,
            weightage: 7,
            weakness_score: 4,
        }
    }

    #[test]
    fn test_topic_patch_only_touches_set_fields() {
        let mut topic = sample_topic();
        let patch = TopicPatch {
            status: Some(TopicStatus::Completed),
            ..Default::default()
        };
        patch.apply(&mut topic);

        assert_eq!(topic.status, TopicStatus::Completed);
        assert_eq!(topic.title, "Laplace transforms");
        assert_eq!(topic.estimated_hours, 3.0);
        assert_eq!(topic.weightage, 7);
        assert_eq!(topic.weakness_score, 4);
        assert_eq!(topic.subject_id, "s-1");
    }

    #[test]
    fn test_subject_patch_never_moves_join_keys() {
        let mut subject = Subject {
            id: "s-1".to_string(),
            user_id: "u-1".to_string(),
            title: "Thermo".to_string(),
            difficulty: Difficulty::Intermediate,
            exam_date: "2026-05-01".to_string(),
            priority: 3,
            color: "indigo".to_string(),
            credits: None,
            confidence_level: None,
            grade_points: None,
            marks_percent: None,
        };
        let patch = SubjectPatch {
            title: Some("Thermodynamics".to_string()),
            priority: Some(5),
            ..Default::default()
        };
        patch.apply(&mut subject);

        assert_eq!(subject.id, "s-1");
        assert_eq!(subject.user_id, "u-1");
        assert_eq!(subject.title, "Thermodynamics");
        assert_eq!(subject.priority, 5);
        assert_eq!(subject.exam_date, "2026-05-01");
    }

    #[test]
    fn test_status_round_trips_as_pascal_case() {
        let json = serde_json::to_string(&TopicStatus::InProgress).unwrap();
        assert_eq!(json, "\"InProgress\"");
    }
}
