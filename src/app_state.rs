use std::sync::Arc;

use crate::{
    config::Config,
    db::Database,
    errors::AppResult,
    repositories::{
        AttemptRepository, BadgeRepository, MongoAttemptRepository, MongoBadgeRepository,
        MongoQuestionRepository, MongoTopicRepository, MongoUserRepository, QuestionRepository,
        TopicRepository, UserRepository,
    },
    services::{
        AdmissionService, CertificationService, GamificationService, LeaderboardService,
        SubmissionService,
    },
};

/// The storage collaborators every service is built from.
#[derive(Clone)]
pub struct Repositories {
    pub topics: Arc<dyn TopicRepository>,
    pub questions: Arc<dyn QuestionRepository>,
    pub users: Arc<dyn UserRepository>,
    pub attempts: Arc<dyn AttemptRepository>,
    pub badges: Arc<dyn BadgeRepository>,
}

#[derive(Clone)]
pub struct AppState {
    pub submission_service: Arc<SubmissionService>,
    pub admission_service: Arc<AdmissionService>,
    pub gamification_service: Arc<GamificationService>,
    pub certification_service: Arc<CertificationService>,
    pub leaderboard_service: Arc<LeaderboardService>,
    /// None when running against non-Mongo repositories.
    pub db: Option<Database>,
}

impl AppState {
    pub async fn new(config: &Config) -> AppResult<Self> {
        let db = Database::connect(config).await?;

        let topics = MongoTopicRepository::new(&db, &config.topics_collection);
        topics.ensure_indexes().await?;
        let questions = MongoQuestionRepository::new(&db, &config.questions_collection);
        questions.ensure_indexes().await?;
        let users = MongoUserRepository::new(&db, &config.users_collection);
        users.ensure_indexes().await?;
        let attempts = MongoAttemptRepository::new(&db, &config.attempts_collection);
        attempts.ensure_indexes().await?;
        let badges = MongoBadgeRepository::new(&db, &config.badges_collection);
        badges.ensure_indexes().await?;

        let repositories = Repositories {
            topics: Arc::new(topics),
            questions: Arc::new(questions),
            users: Arc::new(users),
            attempts: Arc::new(attempts),
            badges: Arc::new(badges),
        };

        let mut state = Self::from_repositories(repositories);
        state.db = Some(db);
        Ok(state)
    }

    pub fn from_repositories(repositories: Repositories) -> Self {
        let Repositories {
            topics,
            questions,
            users,
            attempts,
            badges,
        } = repositories;

        let admission_service = Arc::new(AdmissionService::new(attempts.clone()));
        let gamification_service = Arc::new(GamificationService::new(
            users.clone(),
            attempts.clone(),
            questions.clone(),
            badges,
        ));
        let submission_service = Arc::new(SubmissionService::new(
            topics.clone(),
            questions,
            users,
            attempts.clone(),
            admission_service.clone(),
            gamification_service.clone(),
        ));
        let certification_service =
            Arc::new(CertificationService::new(topics.clone(), attempts.clone()));
        let leaderboard_service = Arc::new(LeaderboardService::new(topics, attempts));

        Self {
            submission_service,
            admission_service,
            gamification_service,
            certification_service,
            leaderboard_service,
            db: None,
        }
    }
}
