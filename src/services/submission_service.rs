use std::sync::Arc;

use chrono::Utc;
use uuid::Uuid;
use validator::Validate;

use crate::{
    errors::{AppError, AppResult},
    models::{
        domain::{Attempt, Participant, Topic},
        dto::{request::SubmitQuizRequest, response::SubmissionResponse},
    },
    repositories::{
        AttemptRepository, InsertOutcome, QuestionRepository, TopicRepository, UserRepository,
    },
    services::{
        admission_service::{AdmissionService, Eligibility},
        gamification_service::GamificationService,
        identity::{resolve_identity, ResolvedIdentity},
        scoring::{score_submission, ScoreSummary},
    },
};

const RECORDED_MESSAGE: &str = "Quiz submitted successfully";
const ALREADY_ATTEMPTED_MESSAGE: &str = "You have already attempted this quiz";

pub struct SubmissionService {
    topics: Arc<dyn TopicRepository>,
    questions: Arc<dyn QuestionRepository>,
    users: Arc<dyn UserRepository>,
    attempts: Arc<dyn AttemptRepository>,
    admission: Arc<AdmissionService>,
    gamification: Arc<GamificationService>,
}

impl SubmissionService {
    pub fn new(
        topics: Arc<dyn TopicRepository>,
        questions: Arc<dyn QuestionRepository>,
        users: Arc<dyn UserRepository>,
        attempts: Arc<dyn AttemptRepository>,
        admission: Arc<AdmissionService>,
        gamification: Arc<GamificationService>,
    ) -> Self {
        Self {
            topics,
            questions,
            users,
            attempts,
            admission,
            gamification,
        }
    }

    /// Scores and records one participant's submission.
    ///
    /// A participant who already has an attempt on the topic, whether caught by the
    /// admission check or by the unique index on insert, gets that attempt back with
    /// `already_attempted` set and nothing newly awarded.
    pub async fn submit(&self, request: SubmitQuizRequest) -> AppResult<SubmissionResponse> {
        request.validate()?;
        if !request.user.has_contact() {
            return Err(AppError::ValidationError(
                "Either an email or a phone number is required".to_string(),
            ));
        }

        let topic_id = request.topic_id.trim();
        let participant = Participant::new(
            &request.user.name,
            request.user.email.as_deref(),
            request.user.phone.as_deref(),
        );

        let identity = resolve_identity(
            self.users.as_ref(),
            participant.email.as_deref(),
            request.user_id.as_deref(),
        )
        .await?;

        let topic = self.load_open_topic(topic_id).await?;

        if let Eligibility::AlreadyAttempted(existing) = self
            .admission
            .check_eligibility(&topic.id, participant.email.as_deref(), participant.real_phone())
            .await?
        {
            return Ok(already_attempted(existing));
        }

        let questions = self.questions.find_by_topic(&topic.id).await?;
        let summary = score_submission(&topic, &questions, &request.answers, request.time_taken);

        let attempt = build_attempt(&topic, &identity, participant, &summary, request.time_taken);
        let attempt = match self.attempts.insert(attempt.clone()).await? {
            InsertOutcome::Inserted(attempt) => attempt,
            InsertOutcome::Duplicate => {
                log::info!(
                    "Concurrent submission for topic {} lost the race; returning the stored attempt",
                    topic.id
                );
                let winner = self
                    .attempts
                    .find_by_key(&attempt.topic_id, &attempt.participant)
                    .await?
                    .ok_or_else(|| {
                        AppError::InternalError(format!(
                            "Attempt for topic {} reported as duplicate but not found",
                            attempt.topic_id
                        ))
                    })?;
                return Ok(already_attempted(winner));
            }
        };

        log::info!(
            "Recorded attempt {} for topic {} (score {}, {} correct)",
            attempt.id,
            attempt.topic_id,
            attempt.score,
            summary.correct_count
        );

        let (points_earned, badges_awarded) = self.reward(&identity, &summary).await;

        Ok(SubmissionResponse {
            message: RECORDED_MESSAGE.to_string(),
            score: attempt.score,
            raw_score: attempt.raw_score,
            time_bonus: attempt.time_bonus,
            passed: attempt.passed,
            attempt_id: attempt.id,
            points_earned,
            badges_awarded,
            already_attempted: false,
        })
    }

    async fn load_open_topic(&self, topic_id: &str) -> AppResult<Topic> {
        let topic = self
            .topics
            .find_by_id(topic_id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Topic with id '{}' not found", topic_id)))?;

        if !topic.is_active() {
            return Err(AppError::Forbidden(format!(
                "Topic '{}' is not accepting attempts",
                topic.name
            )));
        }

        Ok(topic)
    }

    /// Completion point and Quiz Master badge. Students only; guests and admins get nothing.
    /// The attempt is already stored: a failed reward write is logged and left out of the result.
    async fn reward(
        &self,
        identity: &ResolvedIdentity,
        summary: &ScoreSummary,
    ) -> (i64, Vec<String>) {
        let ResolvedIdentity::Registered(user) = identity else {
            return (0, Vec::new());
        };
        if !user.is_student() {
            return (0, Vec::new());
        }

        let points_earned = if summary.correct_count > 0 {
            match self.gamification.award_completion_point(&user.id).await {
                Ok(points) => points,
                Err(err) => {
                    log::error!("Failed to award completion point to user {}: {}", user.id, err);
                    0
                }
            }
        } else {
            0
        };

        let mut badges_awarded = Vec::new();
        if summary.perfect {
            match self.gamification.award_quiz_master(&user.id).await {
                Ok(Some(badge)) => badges_awarded.push(badge),
                Ok(None) => {}
                Err(err) => {
                    log::error!("Failed to award Quiz Master badge to user {}: {}", user.id, err);
                }
            }
        }

        (points_earned, badges_awarded)
    }
}

fn build_attempt(
    topic: &Topic,
    identity: &ResolvedIdentity,
    participant: Participant,
    summary: &ScoreSummary,
    time_taken_secs: i64,
) -> Attempt {
    Attempt {
        id: Uuid::new_v4().to_string(),
        topic_id: topic.id.clone(),
        user_id: identity.user_id().map(str::to_string),
        participant,
        answers: summary.answers.clone(),
        score: summary.total_score,
        raw_score: summary.raw_score,
        time_bonus: summary.time_bonus,
        time_taken_secs,
        passed: summary.passed,
        completed_at: Utc::now(),
        certified: false,
        certified_at: None,
    }
}

fn already_attempted(existing: Attempt) -> SubmissionResponse {
    SubmissionResponse {
        message: ALREADY_ATTEMPTED_MESSAGE.to_string(),
        score: existing.score,
        raw_score: existing.raw_score,
        time_bonus: existing.time_bonus,
        passed: existing.passed,
        attempt_id: existing.id,
        points_earned: 0,
        badges_awarded: Vec::new(),
        already_attempted: true,
    }
}
