use once_cell::sync::Lazy;
use serde::{Deserialize, Deserializer};
use validator::{Validate, ValidationError};

use crate::models::domain::attempt::PHONE_NOT_APPLICABLE;

static PHONE_REGEX: Lazy<regex::Regex> = Lazy::new(|| {
    regex::Regex::new(r"^[0-9]{10}$").expect("PHONE_REGEX is a valid regex pattern")
});

#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct ParticipantInput {
    #[validate(length(min = 1, max = 200, message = "Name is required"))]
    pub name: String,

    #[serde(default, deserialize_with = "blank_as_none")]
    #[validate(email(message = "Invalid email format"))]
    pub email: Option<String>,

    #[serde(default, deserialize_with = "blank_as_none")]
    #[validate(regex(path = *PHONE_REGEX, message = "Phone number must be exactly 10 digits"))]
    pub phone: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnswerInput {
    pub question_id: String,
    #[serde(default)]
    pub submitted_answer: serde_json::Value,
}

#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct SubmitQuizRequest {
    #[validate(custom(function = validate_id))]
    pub topic_id: String,

    #[validate(nested)]
    pub user: ParticipantInput,

    #[serde(default)]
    pub answers: Vec<AnswerInput>,

    #[validate(range(min = 0, message = "Time taken cannot be negative"))]
    pub time_taken: i64,

    #[serde(default, deserialize_with = "blank_as_none")]
    pub user_id: Option<String>,
}

#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CheckEligibilityRequest {
    #[validate(custom(function = validate_id))]
    pub topic_id: String,

    #[serde(default)]
    pub name: Option<String>,

    #[serde(default, deserialize_with = "blank_as_none")]
    #[validate(email(message = "Invalid email format"))]
    pub email: Option<String>,

    #[serde(default, deserialize_with = "blank_as_none")]
    #[validate(regex(path = *PHONE_REGEX, message = "Phone number must be exactly 10 digits"))]
    pub phone: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LeaderboardParams {
    pub limit: Option<i64>,
}

impl LeaderboardParams {
    pub fn limit(&self) -> i64 {
        self.limit.unwrap_or(10).clamp(1, 100)
    }
}

impl ParticipantInput {
    pub fn has_contact(&self) -> bool {
        self.email.is_some() || self.phone.is_some()
    }
}

/// Ids are UUID strings.
pub fn validate_id(value: &str) -> Result<(), ValidationError> {
    uuid::Uuid::parse_str(value.trim())
        .map(|_| ())
        .map_err(|_| ValidationError::new("invalid_id_format"))
}

/// Treats missing, blank and "N/A" values as absent.
fn blank_as_none<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<String>::deserialize(deserializer)?;
    Ok(value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty() && !v.eq_ignore_ascii_case(PHONE_NOT_APPLICABLE)))
}
