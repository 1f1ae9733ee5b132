use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

pub const QUIZ_MASTER_BADGE: &str = "Quiz Master";

#[derive(Clone, Debug, PartialEq, Deserialize, Serialize)]
pub struct Badge {
    pub id: String,
    pub name: String,
    pub description: String,
    pub icon: String,
    #[serde(rename = "type")]
    pub badge_type: BadgeType,
    pub threshold: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
}

#[derive(Clone, Debug, PartialEq, Eq, Deserialize, Serialize, Copy)]
#[serde(rename_all = "snake_case")]
pub enum BadgeType {
    Points,
    Streak,
    Referral,
    QuizPerfect,
    Other,
}

impl Badge {
    pub fn new(name: &str, description: &str, icon: &str, badge_type: BadgeType, threshold: f64) -> Self {
        Badge {
            id: Uuid::new_v4().to_string(),
            name: name.to_string(),
            description: description.to_string(),
            icon: icon.to_string(),
            badge_type,
            threshold,
            created_at: Some(Utc::now()),
        }
    }

    /// Definition created the first time someone scores full marks.
    pub fn quiz_master() -> Self {
        Badge::new(
            QUIZ_MASTER_BADGE,
            "Scored full marks on a quiz",
            "trophy",
            BadgeType::QuizPerfect,
            1.0,
        )
    }
}
