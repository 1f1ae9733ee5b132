use std::sync::Arc;

use crate::{
    errors::{AppError, AppResult},
    models::dto::{request::validate_id, response::LeaderboardEntry},
    repositories::{AttemptRepository, TopicRepository},
};

pub struct LeaderboardService {
    topics: Arc<dyn TopicRepository>,
    attempts: Arc<dyn AttemptRepository>,
}

impl LeaderboardService {
    pub fn new(topics: Arc<dyn TopicRepository>, attempts: Arc<dyn AttemptRepository>) -> Self {
        Self { topics, attempts }
    }

    /// Highest total score first; earlier completion breaks ties.
    pub async fn leaderboard(&self, topic_id: &str, limit: i64) -> AppResult<Vec<LeaderboardEntry>> {
        validate_id(topic_id)
            .map_err(|_| AppError::ValidationError("Invalid topic id format".to_string()))?;

        if self.topics.find_by_id(topic_id).await?.is_none() {
            return Err(AppError::NotFound(format!(
                "Topic with id '{}' not found",
                topic_id
            )));
        }

        let attempts = self.attempts.top_by_topic(topic_id, limit).await?;

        Ok(attempts
            .into_iter()
            .enumerate()
            .map(|(index, attempt)| LeaderboardEntry {
                rank: index + 1,
                name: attempt.participant.name,
                score: attempt.score,
                completed_at: attempt.completed_at,
                certified: attempt.certified,
            })
            .collect())
    }
}
