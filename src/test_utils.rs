#[cfg(test)]
pub mod fixtures {
    use chrono::Utc;
    use serde_json::json;
    use uuid::Uuid;

    use crate::models::domain::{Attempt, AttemptAnswer, Participant, Topic, User};

    /// Active topic with the given limit and penalty; timed scoring is on when a limit is set.
    pub fn timed_topic(limit_secs: i64, negative_marking: f64) -> Topic {
        let mut topic = Topic::new("General Knowledge");
        topic.time_limit_secs = limit_secs;
        topic.time_based_scoring = limit_secs > 0;
        topic.negative_marking = negative_marking;
        topic
    }

    pub fn student(email: &str) -> User {
        User::new("Test Student", email)
    }

    /// One correct answer, scored 1.
    pub fn attempt(topic_id: &str, email: &str, phone: &str) -> Attempt {
        Attempt {
            id: Uuid::new_v4().to_string(),
            topic_id: topic_id.to_string(),
            user_id: None,
            participant: Participant::new("Test Participant", Some(email), Some(phone)),
            answers: answers(&[true]),
            score: 1.0,
            raw_score: 1.0,
            time_bonus: 0.0,
            time_taken_secs: 30,
            passed: true,
            completed_at: Utc::now(),
            certified: false,
            certified_at: None,
        }
    }

    pub fn answers(correct: &[bool]) -> Vec<AttemptAnswer> {
        correct
            .iter()
            .enumerate()
            .map(|(i, is_correct)| AttemptAnswer {
                question_id: format!("question-{}", i),
                submitted_answer: json!("answer"),
                is_correct: *is_correct,
                marks_obtained: if *is_correct { 1.0 } else { 0.0 },
            })
            .collect()
    }
}

#[cfg(test)]
pub mod test_helpers {
    use actix_web::http::StatusCode;

    /// Asserts that a status code represents an error (4xx or 5xx)
    pub fn assert_error_status(status: StatusCode) {
        assert!(
            status.is_client_error() || status.is_server_error(),
            "Expected error status, got: {}",
            status
        );
    }
}

#[cfg(test)]
mod tests {
    use super::fixtures::*;

    #[test]
    fn test_fixture_attempt_uses_placeholder_phone() {
        let attempt = attempt("topic-1", "Ada@Example.com", "N/A");
        assert_eq!(attempt.participant.email.as_deref(), Some("ada@example.com"));
        assert!(attempt.participant.real_phone().is_none());
        assert_eq!(attempt.correct_count(), 1);
    }

    #[test]
    fn test_fixture_timed_topic() {
        let topic = timed_topic(60, 0.5);
        assert!(topic.time_based_scoring);
        assert!(topic.is_active());
        assert!(!timed_topic(0, 0.0).time_based_scoring);
    }
}
