use async_trait::async_trait;
use chrono::{DateTime, Utc};
use futures::TryStreamExt;
use mongodb::{
    bson::{doc, to_bson, Bson, Document},
    options::IndexOptions,
    Collection, IndexModel,
};

use crate::{
    db::{is_duplicate_key_error, Database},
    errors::AppResult,
    models::domain::{Attempt, Participant},
    repositories::InsertOutcome,
};

/// Duplicate-detection query: a topic plus whichever contact details are known.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AttemptLookup {
    pub topic_id: String,
    pub email: Option<String>,
    /// Only real phone numbers, never the placeholder.
    pub phone: Option<String>,
}

impl AttemptLookup {
    pub fn is_empty(&self) -> bool {
        self.email.is_none() && self.phone.is_none()
    }
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait AttemptRepository: Send + Sync {
    /// Any attempt on the topic matching the e-mail OR the phone.
    async fn find_existing(&self, lookup: &AttemptLookup) -> AppResult<Option<Attempt>>;
    /// The attempt holding the exact unique key (topic, e-mail, phone).
    async fn find_by_key(&self, topic_id: &str, participant: &Participant)
        -> AppResult<Option<Attempt>>;
    async fn insert(&self, attempt: Attempt) -> AppResult<InsertOutcome<Attempt>>;
    async fn find_by_user(&self, user_id: &str) -> AppResult<Vec<Attempt>>;
    /// Ids of uncertified attempts on the topic with at least one correct answer.
    async fn find_certifiable_ids(&self, topic_id: &str) -> AppResult<Vec<String>>;
    /// Marks still-uncertified attempts as certified; returns how many changed.
    async fn mark_certified(&self, ids: &[String], certified_at: DateTime<Utc>) -> AppResult<u64>;
    /// Highest scores first, earlier completion breaking ties.
    async fn top_by_topic(&self, topic_id: &str, limit: i64) -> AppResult<Vec<Attempt>>;
    async fn ensure_indexes(&self) -> AppResult<()>;
}

pub struct MongoAttemptRepository {
    collection: Collection<Attempt>,
}

impl MongoAttemptRepository {
    pub fn new(db: &Database, collection_name: &str) -> Self {
        let collection = db.get_collection(collection_name);
        Self { collection }
    }
}

#[async_trait]
impl AttemptRepository for MongoAttemptRepository {
    async fn find_existing(&self, lookup: &AttemptLookup) -> AppResult<Option<Attempt>> {
        let mut alternatives: Vec<Bson> = Vec::new();
        if let Some(email) = &lookup.email {
            alternatives.push(Bson::Document(doc! { "participant.email": email.as_str() }));
        }
        if let Some(phone) = &lookup.phone {
            alternatives.push(Bson::Document(doc! { "participant.phone": phone.as_str() }));
        }

        if alternatives.is_empty() {
            return Ok(None);
        }

        let attempt = self
            .collection
            .find_one(doc! { "topic_id": lookup.topic_id.as_str(), "$or": alternatives })
            .await?;
        Ok(attempt)
    }

    async fn find_by_key(
        &self,
        topic_id: &str,
        participant: &Participant,
    ) -> AppResult<Option<Attempt>> {
        let filter = doc! {
            "topic_id": topic_id,
            "participant.email": to_bson(&participant.email)?,
            "participant.phone": participant.phone.as_str(),
        };
        let attempt = self.collection.find_one(filter).await?;
        Ok(attempt)
    }

    async fn insert(&self, attempt: Attempt) -> AppResult<InsertOutcome<Attempt>> {
        match self.collection.insert_one(&attempt).await {
            Ok(_) => Ok(InsertOutcome::Inserted(attempt)),
            Err(err) if is_duplicate_key_error(&err) => Ok(InsertOutcome::Duplicate),
            Err(err) => Err(err.into()),
        }
    }

    async fn find_by_user(&self, user_id: &str) -> AppResult<Vec<Attempt>> {
        let attempts = self
            .collection
            .find(doc! { "user_id": user_id })
            .await?
            .try_collect()
            .await?;
        Ok(attempts)
    }

    async fn find_certifiable_ids(&self, topic_id: &str) -> AppResult<Vec<String>> {
        let filter = doc! {
            "topic_id": topic_id,
            "certified": { "$ne": true },
            "answers.is_correct": true,
        };
        let ids: Vec<Document> = self
            .collection
            .clone_with_type::<Document>()
            .find(filter)
            .projection(doc! { "id": 1, "_id": 0 })
            .await?
            .try_collect()
            .await?;

        Ok(ids
            .iter()
            .filter_map(|d| d.get_str("id").ok().map(str::to_string))
            .collect())
    }

    async fn mark_certified(&self, ids: &[String], certified_at: DateTime<Utc>) -> AppResult<u64> {
        if ids.is_empty() {
            return Ok(0);
        }

        let result = self
            .collection
            .update_many(
                doc! { "id": { "$in": ids.to_vec() }, "certified": { "$ne": true } },
                doc! { "$set": { "certified": true, "certified_at": to_bson(&certified_at)? } },
            )
            .await?;
        Ok(result.modified_count)
    }

    async fn top_by_topic(&self, topic_id: &str, limit: i64) -> AppResult<Vec<Attempt>> {
        let attempts = self
            .collection
            .find(doc! { "topic_id": topic_id })
            .sort(doc! { "score": -1, "completed_at": 1 })
            .limit(limit)
            .await?
            .try_collect()
            .await?;
        Ok(attempts)
    }

    async fn ensure_indexes(&self) -> AppResult<()> {
        log::info!("Creating indexes for attempts collection");

        let id_index = IndexModel::builder()
            .keys(doc! { "id": 1 })
            .options(
                IndexOptions::builder()
                    .unique(true)
                    .name("id_unique".to_string())
                    .build(),
            )
            .build();

        // One attempt per (topic, e-mail, phone); concurrent duplicates fail here.
        let participant_index = IndexModel::builder()
            .keys(doc! { "topic_id": 1, "participant.email": 1, "participant.phone": 1 })
            .options(
                IndexOptions::builder()
                    .unique(true)
                    .name("topic_participant_unique".to_string())
                    .build(),
            )
            .build();

        let user_index = IndexModel::builder()
            .keys(doc! { "user_id": 1 })
            .options(IndexOptions::builder().name("user_id".to_string()).build())
            .build();

        let leaderboard_index = IndexModel::builder()
            .keys(doc! { "topic_id": 1, "score": -1 })
            .options(IndexOptions::builder().name("topic_score".to_string()).build())
            .build();

        self.collection.create_index(id_index).await?;
        self.collection.create_index(participant_index).await?;
        self.collection.create_index(user_index).await?;
        self.collection.create_index(leaderboard_index).await?;

        log::info!("Successfully created indexes for attempts collection");
        Ok(())
    }
}
