use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Clone, Debug, PartialEq, Deserialize, Serialize)]
pub struct User {
    pub id: String,
    pub name: String,
    pub email: String,
    #[serde(default)]
    pub role: UserRole,
    #[serde(default)]
    pub points: i64,
    #[serde(default)]
    pub login_streak: i64,
    #[serde(default)]
    pub last_login_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub referred_by: Option<String>,
    #[serde(default)]
    pub badges: Vec<BadgeAward>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
}

#[derive(Clone, Debug, PartialEq, Eq, Deserialize, Serialize, Copy, Default)]
#[serde(rename_all = "lowercase")]
pub enum UserRole {
    #[default]
    Student,
    Admin,
}

#[derive(Clone, Debug, PartialEq, Eq, Deserialize, Serialize)]
pub struct BadgeAward {
    pub badge_id: String,
    pub awarded_at: DateTime<Utc>,
}

impl User {
    pub fn new(name: &str, email: &str) -> Self {
        User {
            id: Uuid::new_v4().to_string(),
            name: name.to_string(),
            email: email.trim().to_lowercase(),
            role: UserRole::Student,
            points: 0,
            login_streak: 0,
            last_login_at: None,
            referred_by: None,
            badges: Vec::new(),
            created_at: Some(Utc::now()),
        }
    }

    pub fn is_student(&self) -> bool {
        self.role == UserRole::Student
    }

    pub fn has_badge(&self, badge_id: &str) -> bool {
        self.badges.iter().any(|b| b.badge_id == badge_id)
    }
}
