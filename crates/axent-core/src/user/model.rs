//! User domain model.
//!
//! Represents the active learner profile: identity, academic context,
//! study-habit preferences and assistant customization.

use serde::{Deserialize, Serialize};

/// Preferred study window for scheduling suggestions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EnergyPreference {
    Morning,
    Night,
}

impl Default for EnergyPreference {
    fn default() -> Self {
        EnergyPreference::Morning
    }
}

/// The active learner profile.
///
/// `id` is immutable once set; it is the join key for remote persistence
/// (the remote snapshot lives at `users/{id}`).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: String,
    pub name: String,
    pub email: String,
    /// Engineering branch / field of study.
    pub branch: String,
    pub energy_preference: EnergyPreference,
    pub daily_study_hours: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub study_hours_weekend: Option<f64>,
    /// Free-text persona override for the assistant.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bot_persona: Option<String>,
    /// Free-text knowledge focus injected into assistant prompts.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bot_knowledge_base: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub student_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub year: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
}

impl User {
    /// Derives the reduced identity record persisted alongside the snapshot.
    ///
    /// The identity record is what the fallback session source polls to
    /// decide whether a local session exists; it must stay in lock-step
    /// with the `user` slot of the aggregate.
    pub fn identity(&self) -> UserIdentity {
        UserIdentity {
            uid: self.id.clone(),
            display_name: self.name.clone(),
            email: self.email.clone(),
        }
    }
}

/// Minimal identity record (cache key B).
///
/// Consumed exclusively by the session layer to decide whether a session
/// exists; cleared together with the snapshot only on explicit logout.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserIdentity {
    pub uid: String,
    pub display_name: String,
    pub email: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_user() -> User {
        User {
            id: "u-1".to_string(),
            name: "Asha Rao".to_string(),
            email: "asha@example.com".to_string(),
            branch: "Computer Science".to_string(),
            energy_preference: EnergyPreference::Night,
            daily_study_hours: 4.0,
            study_hours_weekend: Some(6.0),
            bot_persona: None,
            bot_knowledge_base: None,
            student_id: None,
            year: Some(2),
            phone: None,
        }
    }

    #[test]
    fn test_identity_mirrors_user() {
        let user = sample_user();
        let identity = user.identity();
        assert_eq!(identity.uid, "u-1");
        assert_eq!(identity.display_name, "Asha Rao");
        assert_eq!(identity.email, "asha@example.com");
    }

    #[test]
    fn test_user_serializes_camel_case() {
        let json = serde_json::to_value(sample_user()).unwrap();
        assert!(json.get("energyPreference").is_some());
        assert!(json.get("dailyStudyHours").is_some());
        assert_eq!(json["energyPreference"], "night");
        // Unset optional fields stay off the wire
        assert!(json.get("botPersona").is_none());
    }
}
