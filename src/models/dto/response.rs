use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::models::domain::Badge;

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SubmissionResponse {
    pub message: String,
    pub score: f64,
    pub raw_score: f64,
    pub time_bonus: f64,
    pub passed: bool,
    pub attempt_id: String,
    pub points_earned: i64,
    pub badges_awarded: Vec<String>,
    pub already_attempted: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EligibleResponse {
    pub can_attempt: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AlreadyAttemptedResponse {
    pub message: String,
    pub attempt_id: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CertificationResponse {
    pub message: String,
    pub count: u64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LeaderboardEntry {
    pub rank: usize,
    pub name: String,
    pub score: f64,
    pub completed_at: DateTime<Utc>,
    pub certified: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginRewardResponse {
    pub points_awarded: i64,
    pub streak: i64,
    pub milestone_reached: bool,
    pub points: i64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EarnedBadgeDto {
    pub id: String,
    pub name: String,
    pub description: String,
    pub icon: String,
    #[serde(rename = "type")]
    pub badge_type: String,
    pub threshold: f64,
}

impl From<Badge> for EarnedBadgeDto {
    fn from(badge: Badge) -> Self {
        let badge_type = serde_json::to_value(badge.badge_type)
            .ok()
            .and_then(|v| v.as_str().map(str::to_string))
            .unwrap_or_default();

        EarnedBadgeDto {
            id: badge.id,
            name: badge.name,
            description: badge.description,
            icon: badge.icon,
            badge_type,
            threshold: badge.threshold,
        }
    }
}
