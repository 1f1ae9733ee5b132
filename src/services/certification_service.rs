use std::sync::Arc;

use chrono::{DateTime, Utc};

use crate::{
    errors::{AppError, AppResult},
    models::dto::{request::validate_id, response::CertificationResponse},
    repositories::{AttemptRepository, TopicRepository},
};

/// Bulk-promotes a topic's qualifying attempts. An attempt qualifies once it has at least one
/// correct answer; the topic's passing marks play no part here.
pub struct CertificationService {
    topics: Arc<dyn TopicRepository>,
    attempts: Arc<dyn AttemptRepository>,
}

impl CertificationService {
    pub fn new(topics: Arc<dyn TopicRepository>, attempts: Arc<dyn AttemptRepository>) -> Self {
        Self { topics, attempts }
    }

    pub async fn certify(&self, topic_id: &str, now: DateTime<Utc>) -> AppResult<CertificationResponse> {
        validate_id(topic_id)
            .map_err(|_| AppError::ValidationError("Invalid topic id format".to_string()))?;

        if self.topics.find_by_id(topic_id).await?.is_none() {
            return Err(AppError::NotFound(format!(
                "Topic with id '{}' not found",
                topic_id
            )));
        }

        let ids = self.attempts.find_certifiable_ids(topic_id).await?;
        let count = if ids.is_empty() {
            0
        } else {
            self.attempts.mark_certified(&ids, now).await?
        };

        log::info!("Certified {} attempts for topic {}", count, topic_id);

        Ok(CertificationResponse {
            message: format!("{} attempts certified", count),
            count,
        })
    }
}
