use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Stored in place of a phone number the participant did not give.
pub const PHONE_NOT_APPLICABLE: &str = "N/A";

#[derive(Clone, Debug, PartialEq, Deserialize, Serialize)]
pub struct Attempt {
    pub id: String,
    pub topic_id: String,
    /// None for guests.
    pub user_id: Option<String>,
    pub participant: Participant,
    pub answers: Vec<AttemptAnswer>,
    pub score: f64,
    pub raw_score: f64,
    pub time_bonus: f64,
    pub time_taken_secs: i64,
    pub passed: bool,
    pub completed_at: DateTime<Utc>,
    #[serde(default)]
    pub certified: bool,
    #[serde(default)]
    pub certified_at: Option<DateTime<Utc>>,
}

/// Identity snapshot captured at submission time.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize, Serialize)]
pub struct Participant {
    pub name: String,
    pub email: Option<String>,
    pub phone: String,
}

#[derive(Clone, Debug, PartialEq, Deserialize, Serialize)]
pub struct AttemptAnswer {
    pub question_id: String,
    pub submitted_answer: serde_json::Value,
    pub is_correct: bool,
    pub marks_obtained: f64,
}

impl Participant {
    /// Builds a snapshot with a normalised e-mail and the phone placeholder applied.
    pub fn new(name: &str, email: Option<&str>, phone: Option<&str>) -> Self {
        Participant {
            name: name.trim().to_string(),
            email: normalize_email(email),
            phone: normalize_phone(phone)
                .unwrap_or_else(|| PHONE_NOT_APPLICABLE.to_string()),
        }
    }

    /// Phone number if one was actually given.
    pub fn real_phone(&self) -> Option<&str> {
        if self.phone == PHONE_NOT_APPLICABLE {
            None
        } else {
            Some(&self.phone)
        }
    }
}

pub fn normalize_email(email: Option<&str>) -> Option<String> {
    email
        .map(|e| e.trim().to_lowercase())
        .filter(|e| !e.is_empty())
}

pub fn normalize_phone(phone: Option<&str>) -> Option<String> {
    phone
        .map(str::trim)
        .filter(|p| !p.is_empty() && !p.eq_ignore_ascii_case(PHONE_NOT_APPLICABLE))
        .map(str::to_string)
}

impl Attempt {
    pub fn correct_count(&self) -> usize {
        self.answers.iter().filter(|a| a.is_correct).count()
    }

    pub fn has_correct_answer(&self) -> bool {
        self.answers.iter().any(|a| a.is_correct)
    }
}
