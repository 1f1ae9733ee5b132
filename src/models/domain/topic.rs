use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Clone, Debug, PartialEq, Deserialize, Serialize)]
pub struct Topic {
    pub id: String,
    pub name: String,
    pub status: TopicStatus,
    /// Seconds allowed for one attempt, 0 means unlimited.
    pub time_limit_secs: i64,
    /// Marks subtracted for every wrong answer.
    pub negative_marking: f64,
    pub time_based_scoring: bool,
    /// 0 means any correct answer passes.
    pub passing_marks: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
}

#[derive(Clone, Debug, PartialEq, Eq, Deserialize, Serialize, Copy)]
#[serde(rename_all = "lowercase")]
pub enum TopicStatus {
    Active,
    Inactive,
}

impl Topic {
    pub fn new(name: &str) -> Self {
        Topic {
            id: Uuid::new_v4().to_string(),
            name: name.to_string(),
            status: TopicStatus::Active,
            time_limit_secs: 0,
            negative_marking: 0.0,
            time_based_scoring: false,
            passing_marks: 0.0,
            created_at: Some(Utc::now()),
        }
    }

    pub fn is_active(&self) -> bool {
        self.status == TopicStatus::Active
    }

    /// Penalty for a wrong answer, never negative.
    pub fn penalty(&self) -> f64 {
        self.negative_marking.max(0.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn topic_status_serializes_lowercase() {
        let json = serde_json::to_string(&TopicStatus::Inactive).expect("status should serialize");
        assert_eq!(json, "\"inactive\"");
    }

    #[test]
    fn new_topic_is_active_without_limits() {
        let topic = Topic::new("Geography");
        assert!(topic.is_active());
        assert_eq!(topic.time_limit_secs, 0);
        assert_eq!(topic.penalty(), 0.0);
    }

    #[test]
    fn penalty_ignores_negative_configuration() {
        let mut topic = Topic::new("Geography");
        topic.negative_marking = -2.0;
        assert_eq!(topic.penalty(), 0.0);
    }
}
