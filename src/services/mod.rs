pub mod admission_service;
pub mod answer_evaluator;
pub mod certification_service;
pub mod gamification_service;
pub mod identity;
pub mod leaderboard_service;
pub mod scoring;
pub mod submission_service;

pub use admission_service::{AdmissionService, Eligibility};
pub use certification_service::CertificationService;
pub use gamification_service::GamificationService;
pub use leaderboard_service::LeaderboardService;
pub use submission_service::SubmissionService;
