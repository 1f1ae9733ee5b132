pub mod attempt;
pub mod badge;
pub mod question;
pub mod topic;
pub mod user;
pub use attempt::{Attempt, AttemptAnswer, Participant};
pub use badge::{Badge, BadgeType};
pub use question::{AnswerKey, Question};
pub use topic::{Topic, TopicStatus};
pub use user::{User, UserRole};
