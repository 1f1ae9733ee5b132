use async_trait::async_trait;
use chrono::{DateTime, Utc};
use mongodb::{
    bson::{doc, to_bson},
    options::{IndexOptions, ReturnDocument},
    Collection, IndexModel,
};

use crate::{
    db::Database,
    errors::AppResult,
    models::domain::{user::BadgeAward, User},
};

/// Streak state written on a rewarded login.
#[derive(Clone, Debug, PartialEq)]
pub struct LoginUpdate {
    pub streak: i64,
    pub last_login_at: DateTime<Utc>,
    pub points_delta: i64,
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait UserRepository: Send + Sync {
    async fn find_by_id(&self, id: &str) -> AppResult<Option<User>>;
    async fn find_by_email(&self, email: &str) -> AppResult<Option<User>>;
    /// Atomically adds `delta` points and returns the updated user.
    async fn increment_points(&self, id: &str, delta: i64) -> AppResult<Option<User>>;
    /// Applies a login update only if the stored last login still equals `expected_last_login`.
    /// Returns None when the user is missing or another login got there first.
    async fn record_login(
        &self,
        id: &str,
        expected_last_login: Option<DateTime<Utc>>,
        update: LoginUpdate,
    ) -> AppResult<Option<User>>;
    /// Appends the award unless the user already holds that badge. Returns true if appended.
    async fn add_badge(&self, id: &str, award: BadgeAward) -> AppResult<bool>;
    async fn count_referred_by(&self, id: &str) -> AppResult<u64>;
    async fn ensure_indexes(&self) -> AppResult<()>;
}

pub struct MongoUserRepository {
    collection: Collection<User>,
}

impl MongoUserRepository {
    pub fn new(db: &Database, collection_name: &str) -> Self {
        let collection = db.get_collection(collection_name);
        Self { collection }
    }
}

#[async_trait]
impl UserRepository for MongoUserRepository {
    async fn find_by_id(&self, id: &str) -> AppResult<Option<User>> {
        let user = self.collection.find_one(doc! { "id": id }).await?;
        Ok(user)
    }

    async fn find_by_email(&self, email: &str) -> AppResult<Option<User>> {
        let user = self
            .collection
            .find_one(doc! { "email": email.trim().to_lowercase() })
            .await?;
        Ok(user)
    }

    async fn increment_points(&self, id: &str, delta: i64) -> AppResult<Option<User>> {
        let user = self
            .collection
            .find_one_and_update(doc! { "id": id }, doc! { "$inc": { "points": delta } })
            .return_document(ReturnDocument::After)
            .await?;
        Ok(user)
    }

    async fn record_login(
        &self,
        id: &str,
        expected_last_login: Option<DateTime<Utc>>,
        update: LoginUpdate,
    ) -> AppResult<Option<User>> {
        let filter = doc! {
            "id": id,
            "last_login_at": to_bson(&expected_last_login)?,
        };
        let changes = doc! {
            "$set": {
                "login_streak": update.streak,
                "last_login_at": to_bson(&update.last_login_at)?,
            },
            "$inc": { "points": update.points_delta },
        };

        let user = self
            .collection
            .find_one_and_update(filter, changes)
            .return_document(ReturnDocument::After)
            .await?;
        Ok(user)
    }

    async fn add_badge(&self, id: &str, award: BadgeAward) -> AppResult<bool> {
        let filter = doc! {
            "id": id,
            "badges.badge_id": { "$ne": award.badge_id.as_str() },
        };
        let result = self
            .collection
            .update_one(filter, doc! { "$push": { "badges": to_bson(&award)? } })
            .await?;

        Ok(result.modified_count > 0)
    }

    async fn count_referred_by(&self, id: &str) -> AppResult<u64> {
        let count = self
            .collection
            .count_documents(doc! { "referred_by": id })
            .await?;
        Ok(count)
    }

    async fn ensure_indexes(&self) -> AppResult<()> {
        let id_model = IndexModel::builder()
            .keys(doc! { "id": 1 })
            .options(IndexOptions::builder().unique(true).build())
            .build();
        self.collection.create_index(id_model).await?;
        log::info!("Created unique index on users.id");

        let email_model = IndexModel::builder()
            .keys(doc! { "email": 1 })
            .options(IndexOptions::builder().unique(true).build())
            .build();
        self.collection.create_index(email_model).await?;
        log::info!("Created unique index on users.email");

        let referral_model = IndexModel::builder()
            .keys(doc! { "referred_by": 1 })
            .build();
        self.collection.create_index(referral_model).await?;
        log::info!("Created index on users.referred_by");

        Ok(())
    }
}
