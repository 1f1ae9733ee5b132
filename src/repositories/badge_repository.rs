use async_trait::async_trait;
use futures::TryStreamExt;
use mongodb::{bson::doc, options::IndexOptions, Collection, IndexModel};

use crate::{
    db::{is_duplicate_key_error, Database},
    errors::AppResult,
    models::domain::Badge,
    repositories::InsertOutcome,
};

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait BadgeRepository: Send + Sync {
    async fn find_by_name(&self, name: &str) -> AppResult<Option<Badge>>;
    async fn insert(&self, badge: Badge) -> AppResult<InsertOutcome<Badge>>;
    async fn find_all(&self) -> AppResult<Vec<Badge>>;
    async fn ensure_indexes(&self) -> AppResult<()>;
}

pub struct MongoBadgeRepository {
    collection: Collection<Badge>,
}

impl MongoBadgeRepository {
    pub fn new(db: &Database, collection_name: &str) -> Self {
        let collection = db.get_collection(collection_name);
        Self { collection }
    }
}

#[async_trait]
impl BadgeRepository for MongoBadgeRepository {
    async fn find_by_name(&self, name: &str) -> AppResult<Option<Badge>> {
        let badge = self.collection.find_one(doc! { "name": name }).await?;
        Ok(badge)
    }

    async fn insert(&self, badge: Badge) -> AppResult<InsertOutcome<Badge>> {
        match self.collection.insert_one(&badge).await {
            Ok(_) => Ok(InsertOutcome::Inserted(badge)),
            Err(err) if is_duplicate_key_error(&err) => Ok(InsertOutcome::Duplicate),
            Err(err) => Err(err.into()),
        }
    }

    async fn find_all(&self) -> AppResult<Vec<Badge>> {
        let badges = self
            .collection
            .find(doc! {})
            .await?
            .try_collect()
            .await?;
        Ok(badges)
    }

    async fn ensure_indexes(&self) -> AppResult<()> {
        let id_model = IndexModel::builder()
            .keys(doc! { "id": 1 })
            .options(IndexOptions::builder().unique(true).build())
            .build();
        self.collection.create_index(id_model).await?;

        // Lazily created badges race on first award; the name index settles it.
        let name_model = IndexModel::builder()
            .keys(doc! { "name": 1 })
            .options(IndexOptions::builder().unique(true).build())
            .build();
        self.collection.create_index(name_model).await?;

        log::info!("Created unique indexes on badges.id and badges.name");
        Ok(())
    }
}
