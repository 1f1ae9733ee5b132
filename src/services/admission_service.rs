use std::sync::Arc;

use crate::{
    errors::AppResult,
    models::domain::{
        attempt::{normalize_email, normalize_phone},
        Attempt,
    },
    repositories::{AttemptLookup, AttemptRepository},
};

#[derive(Debug, Clone, PartialEq)]
pub enum Eligibility {
    Allowed,
    AlreadyAttempted(Attempt),
}

/// Fast duplicate check before any scoring work. The unique index on attempts is the
/// authoritative guard; this only gives an early, friendly answer.
pub struct AdmissionService {
    attempts: Arc<dyn AttemptRepository>,
}

impl AdmissionService {
    pub fn new(attempts: Arc<dyn AttemptRepository>) -> Self {
        Self { attempts }
    }

    pub async fn check_eligibility(
        &self,
        topic_id: &str,
        email: Option<&str>,
        phone: Option<&str>,
    ) -> AppResult<Eligibility> {
        let lookup = AttemptLookup {
            topic_id: topic_id.to_string(),
            email: normalize_email(email),
            phone: normalize_phone(phone),
        };

        if lookup.is_empty() {
            return Ok(Eligibility::Allowed);
        }

        match self.attempts.find_existing(&lookup).await? {
            Some(existing) => {
                log::info!(
                    "Participant already attempted topic {} as attempt {}",
                    topic_id,
                    existing.id
                );
                Ok(Eligibility::AlreadyAttempted(existing))
            }
            None => Ok(Eligibility::Allowed),
        }
    }
}
