//! Diary, activity and attendance record models.
//!
//! These are append-only histories kept newest-first; the store prepends
//! on insert (a presentation invariant, not incidental ordering).

use serde::{Deserialize, Serialize};

/// Mood captured alongside a diary entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Mood {
    Excited,
    Happy,
    Content,
    Stressed,
    Tired,
}

/// Review state of an extracurricular activity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ActivityStatus {
    Approved,
    Pending,
    Rejected,
}

/// Attendance outcome for a class slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AttendanceStatus {
    Present,
    Absent,
}

/// A personal diary entry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DiaryEntry {
    pub id: String,
    pub date: String,
    pub title: String,
    pub content: String,
    pub mood: Mood,
    pub is_public: bool,
    #[serde(default)]
    pub tags: Vec<String>,
}

/// An extracurricular activity record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Activity {
    pub id: String,
    pub title: String,
    pub category: String,
    pub description: String,
    pub date: String,
    pub credits: f64,
    pub status: ActivityStatus,
}

/// A single attendance mark for a subject.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AttendanceRecord {
    pub id: String,
    pub date: String,
    pub subject_id: String,
    pub status: AttendanceStatus,
    pub time: String,
}
