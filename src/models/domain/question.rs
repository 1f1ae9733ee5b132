use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

pub const DEFAULT_MARKS: f64 = 1.0;

#[derive(Clone, Debug, PartialEq, Deserialize, Serialize)]
pub struct Question {
    pub id: String,
    /// None for bank-only questions that are not attached to a topic.
    pub topic_id: Option<String>,
    #[serde(default)]
    pub reusable: bool,
    pub content: QuestionContent,
    #[serde(default)]
    pub options: Vec<String>,
    pub answer_key: AnswerKey,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub marks: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
}

#[derive(Clone, Debug, PartialEq, Eq, Deserialize, Serialize)]
pub struct QuestionContent {
    pub text: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub media_url: Option<String>,
}

/// Correct answer, shaped by question type. `None` means no key was configured.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize, Serialize)]
#[serde(tag = "type", content = "correct", rename_all = "snake_case")]
pub enum AnswerKey {
    FillBlank(Option<String>),
    TrueFalse(Option<String>),
    SingleChoice(Option<String>),
    MultiSelect(Option<Vec<String>>),
    Match(Option<Vec<MatchPair>>),
    Reorder(Option<Vec<String>>),
    Sort(Option<Vec<String>>),
}

#[derive(Clone, Debug, PartialEq, Eq, Deserialize, Serialize)]
pub struct MatchPair {
    pub left: String,
    pub right: String,
}

impl Question {
    pub fn new(topic_id: &str, text: &str, answer_key: AnswerKey) -> Self {
        Question {
            id: Uuid::new_v4().to_string(),
            topic_id: Some(topic_id.to_string()),
            reusable: false,
            content: QuestionContent {
                text: text.to_string(),
                media_url: None,
            },
            options: Vec::new(),
            answer_key,
            marks: None,
            created_at: Some(Utc::now()),
        }
    }

    pub fn with_options(mut self, options: &[&str]) -> Self {
        self.options = options.iter().map(|o| o.to_string()).collect();
        self
    }

    pub fn with_marks(mut self, marks: f64) -> Self {
        self.marks = Some(marks);
        self
    }

    /// Configured marks, falling back to 1 when unset or not positive.
    pub fn marks(&self) -> f64 {
        match self.marks {
            Some(marks) if marks > 0.0 => marks,
            _ => DEFAULT_MARKS,
        }
    }
}
