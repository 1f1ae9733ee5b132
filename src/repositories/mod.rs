pub mod attempt_repository;
pub mod badge_repository;
pub mod question_repository;
pub mod topic_repository;
pub mod user_repository;

pub use attempt_repository::{AttemptLookup, AttemptRepository, MongoAttemptRepository};
pub use badge_repository::{BadgeRepository, MongoBadgeRepository};
pub use question_repository::{MongoQuestionRepository, QuestionRepository};
pub use topic_repository::{MongoTopicRepository, TopicRepository};
pub use user_repository::{LoginUpdate, MongoUserRepository, UserRepository};

/// Result of an insert guarded by a unique index.
#[derive(Clone, Debug, PartialEq)]
pub enum InsertOutcome<T> {
    Inserted(T),
    /// Another document already holds the unique key.
    Duplicate,
}
