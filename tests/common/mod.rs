#![allow(dead_code)]

use std::{
    collections::HashMap,
    sync::{
        atomic::{AtomicBool, Ordering},
        Arc,
    },
};

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde_json::json;
use tokio::sync::RwLock;

use quizcraft_server::{
    errors::AppResult,
    models::{
        domain::{
            user::BadgeAward, AnswerKey, Attempt, Badge, Participant, Question, Topic, User,
        },
        dto::request::{AnswerInput, ParticipantInput, SubmitQuizRequest},
    },
    repositories::{
        AttemptLookup, AttemptRepository, BadgeRepository, InsertOutcome, LoginUpdate,
        QuestionRepository, TopicRepository, UserRepository,
    },
    services::{
        AdmissionService, CertificationService, GamificationService, LeaderboardService,
        SubmissionService,
    },
};

#[derive(Default)]
pub struct InMemoryTopicRepository {
    topics: RwLock<HashMap<String, Topic>>,
}

impl InMemoryTopicRepository {
    pub async fn add(&self, topic: Topic) {
        self.topics.write().await.insert(topic.id.clone(), topic);
    }
}

#[async_trait]
impl TopicRepository for InMemoryTopicRepository {
    async fn find_by_id(&self, id: &str) -> AppResult<Option<Topic>> {
        Ok(self.topics.read().await.get(id).cloned())
    }

    async fn ensure_indexes(&self) -> AppResult<()> {
        Ok(())
    }
}

#[derive(Default)]
pub struct InMemoryQuestionRepository {
    questions: RwLock<Vec<Question>>,
}

impl InMemoryQuestionRepository {
    pub async fn add(&self, question: Question) {
        self.questions.write().await.push(question);
    }

    pub async fn remove(&self, question_id: &str) {
        self.questions.write().await.retain(|q| q.id != question_id);
    }
}

#[async_trait]
impl QuestionRepository for InMemoryQuestionRepository {
    async fn find_by_topic(&self, topic_id: &str) -> AppResult<Vec<Question>> {
        let questions = self.questions.read().await;
        Ok(questions
            .iter()
            .filter(|q| q.topic_id.as_deref() == Some(topic_id))
            .cloned()
            .collect())
    }

    async fn count_by_topic(&self, topic_id: &str) -> AppResult<u64> {
        Ok(self.find_by_topic(topic_id).await?.len() as u64)
    }

    async fn ensure_indexes(&self) -> AppResult<()> {
        Ok(())
    }
}

#[derive(Default)]
pub struct InMemoryUserRepository {
    users: RwLock<HashMap<String, User>>,
}

impl InMemoryUserRepository {
    pub async fn add(&self, user: User) {
        self.users.write().await.insert(user.id.clone(), user);
    }

    pub async fn get(&self, id: &str) -> Option<User> {
        self.users.read().await.get(id).cloned()
    }
}

#[async_trait]
impl UserRepository for InMemoryUserRepository {
    async fn find_by_id(&self, id: &str) -> AppResult<Option<User>> {
        Ok(self.get(id).await)
    }

    async fn find_by_email(&self, email: &str) -> AppResult<Option<User>> {
        let email = email.trim().to_lowercase();
        let users = self.users.read().await;
        Ok(users.values().find(|u| u.email == email).cloned())
    }

    async fn increment_points(&self, id: &str, delta: i64) -> AppResult<Option<User>> {
        let mut users = self.users.write().await;
        Ok(users.get_mut(id).map(|user| {
            user.points += delta;
            user.clone()
        }))
    }

    async fn record_login(
        &self,
        id: &str,
        expected_last_login: Option<DateTime<Utc>>,
        update: LoginUpdate,
    ) -> AppResult<Option<User>> {
        let mut users = self.users.write().await;
        let Some(user) = users.get_mut(id) else {
            return Ok(None);
        };
        if user.last_login_at != expected_last_login {
            return Ok(None);
        }

        user.login_streak = update.streak;
        user.last_login_at = Some(update.last_login_at);
        user.points += update.points_delta;
        Ok(Some(user.clone()))
    }

    async fn add_badge(&self, id: &str, award: BadgeAward) -> AppResult<bool> {
        let mut users = self.users.write().await;
        match users.get_mut(id) {
            Some(user) if !user.has_badge(&award.badge_id) => {
                user.badges.push(award);
                Ok(true)
            }
            _ => Ok(false),
        }
    }

    async fn count_referred_by(&self, id: &str) -> AppResult<u64> {
        let users = self.users.read().await;
        Ok(users
            .values()
            .filter(|u| u.referred_by.as_deref() == Some(id))
            .count() as u64)
    }

    async fn ensure_indexes(&self) -> AppResult<()> {
        Ok(())
    }
}

/// Enforces the (topic, email, phone) key the same way the unique index does.
#[derive(Default)]
pub struct InMemoryAttemptRepository {
    attempts: RwLock<Vec<Attempt>>,
    /// Makes the admission lookup miss, as a concurrent submission would see it.
    stale_reads: AtomicBool,
}

impl InMemoryAttemptRepository {
    pub fn set_stale_reads(&self, stale: bool) {
        self.stale_reads.store(stale, Ordering::SeqCst);
    }

    pub async fn all(&self) -> Vec<Attempt> {
        self.attempts.read().await.clone()
    }

    pub async fn add(&self, attempt: Attempt) {
        self.attempts.write().await.push(attempt);
    }
}

fn same_key(attempt: &Attempt, topic_id: &str, participant: &Participant) -> bool {
    attempt.topic_id == topic_id
        && attempt.participant.email == participant.email
        && attempt.participant.phone == participant.phone
}

#[async_trait]
impl AttemptRepository for InMemoryAttemptRepository {
    async fn find_existing(&self, lookup: &AttemptLookup) -> AppResult<Option<Attempt>> {
        if lookup.is_empty() || self.stale_reads.load(Ordering::SeqCst) {
            return Ok(None);
        }

        let attempts = self.attempts.read().await;
        Ok(attempts
            .iter()
            .find(|a| {
                a.topic_id == lookup.topic_id
                    && ((lookup.email.is_some() && a.participant.email == lookup.email)
                        || lookup.phone.as_deref() == Some(a.participant.phone.as_str()))
            })
            .cloned())
    }

    async fn find_by_key(
        &self,
        topic_id: &str,
        participant: &Participant,
    ) -> AppResult<Option<Attempt>> {
        let attempts = self.attempts.read().await;
        Ok(attempts
            .iter()
            .find(|a| same_key(a, topic_id, participant))
            .cloned())
    }

    async fn insert(&self, attempt: Attempt) -> AppResult<InsertOutcome<Attempt>> {
        let mut attempts = self.attempts.write().await;
        if attempts
            .iter()
            .any(|a| same_key(a, &attempt.topic_id, &attempt.participant))
        {
            return Ok(InsertOutcome::Duplicate);
        }
        attempts.push(attempt.clone());
        Ok(InsertOutcome::Inserted(attempt))
    }

    async fn find_by_user(&self, user_id: &str) -> AppResult<Vec<Attempt>> {
        let attempts = self.attempts.read().await;
        Ok(attempts
            .iter()
            .filter(|a| a.user_id.as_deref() == Some(user_id))
            .cloned()
            .collect())
    }

    async fn find_certifiable_ids(&self, topic_id: &str) -> AppResult<Vec<String>> {
        let attempts = self.attempts.read().await;
        Ok(attempts
            .iter()
            .filter(|a| a.topic_id == topic_id && !a.certified && a.has_correct_answer())
            .map(|a| a.id.clone())
            .collect())
    }

    async fn mark_certified(&self, ids: &[String], certified_at: DateTime<Utc>) -> AppResult<u64> {
        let mut attempts = self.attempts.write().await;
        let mut count = 0;
        for attempt in attempts
            .iter_mut()
            .filter(|a| !a.certified && ids.contains(&a.id))
        {
            attempt.certified = true;
            attempt.certified_at = Some(certified_at);
            count += 1;
        }
        Ok(count)
    }

    async fn top_by_topic(&self, topic_id: &str, limit: i64) -> AppResult<Vec<Attempt>> {
        let attempts = self.attempts.read().await;
        let mut ranked: Vec<Attempt> = attempts
            .iter()
            .filter(|a| a.topic_id == topic_id)
            .cloned()
            .collect();
        ranked.sort_by(|a, b| {
            b.score
                .total_cmp(&a.score)
                .then_with(|| a.completed_at.cmp(&b.completed_at))
        });
        ranked.truncate(limit.max(0) as usize);
        Ok(ranked)
    }

    async fn ensure_indexes(&self) -> AppResult<()> {
        Ok(())
    }
}

#[derive(Default)]
pub struct InMemoryBadgeRepository {
    badges: RwLock<Vec<Badge>>,
}

impl InMemoryBadgeRepository {
    pub async fn all(&self) -> Vec<Badge> {
        self.badges.read().await.clone()
    }
}

#[async_trait]
impl BadgeRepository for InMemoryBadgeRepository {
    async fn find_by_name(&self, name: &str) -> AppResult<Option<Badge>> {
        let badges = self.badges.read().await;
        Ok(badges.iter().find(|b| b.name == name).cloned())
    }

    async fn insert(&self, badge: Badge) -> AppResult<InsertOutcome<Badge>> {
        let mut badges = self.badges.write().await;
        if badges.iter().any(|b| b.name == badge.name) {
            return Ok(InsertOutcome::Duplicate);
        }
        badges.push(badge.clone());
        Ok(InsertOutcome::Inserted(badge))
    }

    async fn find_all(&self) -> AppResult<Vec<Badge>> {
        Ok(self.all().await)
    }

    async fn ensure_indexes(&self) -> AppResult<()> {
        Ok(())
    }
}

/// Services wired over shared in-memory stores.
pub struct Harness {
    pub topics: Arc<InMemoryTopicRepository>,
    pub questions: Arc<InMemoryQuestionRepository>,
    pub users: Arc<InMemoryUserRepository>,
    pub attempts: Arc<InMemoryAttemptRepository>,
    pub badges: Arc<InMemoryBadgeRepository>,
    pub submissions: Arc<SubmissionService>,
    pub gamification: Arc<GamificationService>,
    pub certification: CertificationService,
    pub leaderboard: LeaderboardService,
}

impl Harness {
    pub fn new() -> Self {
        let topics = Arc::new(InMemoryTopicRepository::default());
        let questions = Arc::new(InMemoryQuestionRepository::default());
        let users = Arc::new(InMemoryUserRepository::default());
        let attempts = Arc::new(InMemoryAttemptRepository::default());
        let badges = Arc::new(InMemoryBadgeRepository::default());

        let admission = Arc::new(AdmissionService::new(attempts.clone()));
        let gamification = Arc::new(GamificationService::new(
            users.clone(),
            attempts.clone(),
            questions.clone(),
            badges.clone(),
        ));
        let submissions = Arc::new(SubmissionService::new(
            topics.clone(),
            questions.clone(),
            users.clone(),
            attempts.clone(),
            admission,
            gamification.clone(),
        ));
        let certification = CertificationService::new(topics.clone(), attempts.clone());
        let leaderboard = LeaderboardService::new(topics.clone(), attempts.clone());

        Self {
            topics,
            questions,
            users,
            attempts,
            badges,
            submissions,
            gamification,
            certification,
            leaderboard,
        }
    }

    /// Timed topic (100s, penalty 1) with a single-choice and a true/false question.
    pub async fn capitals_topic(&self) -> (Topic, Vec<Question>) {
        let mut topic = Topic::new("Capitals");
        topic.time_limit_secs = 100;
        topic.negative_marking = 1.0;
        topic.time_based_scoring = true;

        let questions = vec![
            Question::new(
                &topic.id,
                "Capital of France?",
                AnswerKey::SingleChoice(Some("Paris".to_string())),
            )
            .with_options(&["Paris", "Rome", "Madrid"]),
            Question::new(
                &topic.id,
                "Paris is in Europe",
                AnswerKey::TrueFalse(Some("True".to_string())),
            ),
        ];

        self.topics.add(topic.clone()).await;
        for question in &questions {
            self.questions.add(question.clone()).await;
        }
        (topic, questions)
    }
}

pub fn submission(
    topic: &Topic,
    questions: &[Question],
    answers: &[&str],
    email: Option<&str>,
    phone: Option<&str>,
) -> SubmitQuizRequest {
    SubmitQuizRequest {
        topic_id: topic.id.clone(),
        user: ParticipantInput {
            name: "Ada Lovelace".to_string(),
            email: email.map(str::to_string),
            phone: phone.map(str::to_string),
        },
        answers: questions
            .iter()
            .zip(answers)
            .map(|(q, a)| AnswerInput {
                question_id: q.id.clone(),
                submitted_answer: json!(a),
            })
            .collect(),
        time_taken: 40,
        user_id: None,
    }
}
