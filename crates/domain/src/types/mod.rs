//! Domain types and models
//!
//! Wire contract types (envelope, request params, feedback payloads) and the
//! passive DTOs carried inside envelope data elements.

pub mod envelope;
pub mod feedback;
pub mod notification;
pub mod params;
pub mod team;
pub mod token;
pub mod user;
pub mod workout;

pub use envelope::ResponseEnvelope;
pub use feedback::{FeedbackEvent, MessageKey, SnackbarText, VibrationPattern};
pub use notification::Notification;
pub use params::RequestParams;
pub use team::Team;
pub use token::AuthToken;
pub use user::User;
pub use workout::{Exercise, Workout};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn user_roundtrips_through_envelope_data() {
        let raw = r#"{"id":"u1","email":"a@b.c","firstName":"Ada","lastName":"Lovelace"}"#;
        let envelope = ResponseEnvelope::new(200, "", vec![raw.to_string()]);
        let user: User = envelope.decode_item(0).unwrap();
        assert_eq!(user.display_name(), "Ada Lovelace");
        assert!(!user.is_coach);
        assert_eq!(user.avatar_url, None);
    }

    #[test]
    fn workouts_decode_from_every_element() {
        let envelope = ResponseEnvelope::new(
            200,
            "",
            vec![
                r#"{"id":"w1","name":"Legs","scheduledAt":"2026-03-01T07:30:00Z","exercises":[{"id":"e1","name":"Squat","sets":5,"reps":5,"weightKg":100.0}]}"#.into(),
                r#"{"id":"w2","name":"Rest day"}"#.into(),
            ],
        );
        let workouts: Vec<Workout> = envelope.decode_all().unwrap();
        assert_eq!(workouts.len(), 2);
        assert_eq!(workouts[0].exercises[0].weight_kg, Some(100.0));
        assert!(workouts[1].exercises.is_empty());
    }
}
