//! Curriculum planning domain models: subjects and their topics.

pub mod model;

pub use model::{Difficulty, Subject, SubjectPatch, Topic, TopicPatch, TopicStatus};
