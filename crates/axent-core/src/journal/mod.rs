//! Auxiliary history records: diary entries, activities, attendance.

pub mod model;

pub use model::{Activity, ActivityStatus, AttendanceRecord, AttendanceStatus, DiaryEntry, Mood};
