use std::{collections::HashMap, sync::Arc};

use chrono::{DateTime, Utc};

use crate::{
    errors::{AppError, AppResult},
    models::domain::{
        badge::QUIZ_MASTER_BADGE,
        user::BadgeAward,
        Attempt, Badge, BadgeType, User,
    },
    repositories::{
        AttemptRepository, BadgeRepository, InsertOutcome, LoginUpdate, QuestionRepository,
        UserRepository,
    },
};

pub const LOGIN_POINTS: i64 = 5;
pub const STREAK_MILESTONE_DAYS: i64 = 7;
pub const STREAK_MILESTONE_BONUS: i64 = 20;
pub const COMPLETION_POINTS: i64 = 1;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LoginReward {
    pub points_awarded: i64,
    pub streak: i64,
    pub milestone_reached: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoginOutcome {
    /// None when the user already logged in today.
    pub reward: Option<LoginReward>,
    pub streak: i64,
    pub points: i64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct UserStats {
    pub points: i64,
    pub streak: i64,
    pub referrals: u64,
    pub perfect_quizzes: u64,
}

/// Daily login reward, compared by UTC calendar day rather than elapsed hours.
///
/// First login and any gap longer than a day start a fresh streak of 1; the daily points
/// are awarded either way. A consecutive day extends the streak and every seventh day
/// adds the milestone bonus. A second login on the same day earns nothing.
pub fn login_reward(
    last_login: Option<DateTime<Utc>>,
    current_streak: i64,
    now: DateTime<Utc>,
) -> Option<LoginReward> {
    let Some(last_login) = last_login else {
        return Some(LoginReward {
            points_awarded: LOGIN_POINTS,
            streak: 1,
            milestone_reached: false,
        });
    };

    let days = (now.date_naive() - last_login.date_naive()).num_days();
    match days {
        1 => {
            let streak = current_streak.max(0) + 1;
            let milestone_reached = streak % STREAK_MILESTONE_DAYS == 0;
            let bonus = if milestone_reached {
                STREAK_MILESTONE_BONUS
            } else {
                0
            };
            Some(LoginReward {
                points_awarded: LOGIN_POINTS + bonus,
                streak,
                milestone_reached,
            })
        }
        d if d > 1 => Some(LoginReward {
            points_awarded: LOGIN_POINTS,
            streak: 1,
            milestone_reached: false,
        }),
        // Same day, or a clock that went backwards.
        _ => None,
    }
}

/// Whether a badge's threshold is met by the user's statistics.
pub fn badge_earned(badge: &Badge, stats: &UserStats) -> bool {
    let value = match badge.badge_type {
        BadgeType::Points => stats.points as f64,
        BadgeType::Streak => stats.streak as f64,
        BadgeType::Referral => stats.referrals as f64,
        BadgeType::QuizPerfect => stats.perfect_quizzes as f64,
        BadgeType::Other => return false,
    };
    value >= badge.threshold
}

pub struct GamificationService {
    users: Arc<dyn UserRepository>,
    attempts: Arc<dyn AttemptRepository>,
    questions: Arc<dyn QuestionRepository>,
    badges: Arc<dyn BadgeRepository>,
}

impl GamificationService {
    pub fn new(
        users: Arc<dyn UserRepository>,
        attempts: Arc<dyn AttemptRepository>,
        questions: Arc<dyn QuestionRepository>,
        badges: Arc<dyn BadgeRepository>,
    ) -> Self {
        Self {
            users,
            attempts,
            questions,
            badges,
        }
    }

    pub async fn record_login(&self, user_id: &str, now: DateTime<Utc>) -> AppResult<LoginOutcome> {
        let user = self.find_user(user_id).await?;

        let Some(reward) = login_reward(user.last_login_at, user.login_streak, now) else {
            return Ok(LoginOutcome {
                reward: None,
                streak: user.login_streak,
                points: user.points,
            });
        };

        let update = LoginUpdate {
            streak: reward.streak,
            last_login_at: now,
            points_delta: reward.points_awarded,
        };

        match self
            .users
            .record_login(user_id, user.last_login_at, update)
            .await?
        {
            Some(updated) => {
                log::info!(
                    "Login reward for user {}: +{} points, streak {}",
                    user_id,
                    reward.points_awarded,
                    reward.streak
                );
                Ok(LoginOutcome {
                    reward: Some(reward),
                    streak: updated.login_streak,
                    points: updated.points,
                })
            }
            None => {
                // A concurrent login already applied today's reward.
                let current = self.find_user(user_id).await?;
                Ok(LoginOutcome {
                    reward: None,
                    streak: current.login_streak,
                    points: current.points,
                })
            }
        }
    }

    /// Flat completion point for a student; returns the points actually awarded.
    pub async fn award_completion_point(&self, user_id: &str) -> AppResult<i64> {
        match self.users.increment_points(user_id, COMPLETION_POINTS).await? {
            Some(user) => {
                log::info!(
                    "Awarded {} completion point to user {} (now {})",
                    COMPLETION_POINTS,
                    user_id,
                    user.points
                );
                Ok(COMPLETION_POINTS)
            }
            None => {
                log::warn!("User {} vanished before the completion point was awarded", user_id);
                Ok(0)
            }
        }
    }

    /// Gives the user the Quiz Master badge, creating its definition on first use.
    /// Returns the badge name when newly awarded, None if the user already held it.
    pub async fn award_quiz_master(&self, user_id: &str) -> AppResult<Option<String>> {
        let badge = self.quiz_master_badge().await?;
        let award = BadgeAward {
            badge_id: badge.id.clone(),
            awarded_at: Utc::now(),
        };

        if self.users.add_badge(user_id, award).await? {
            log::info!("Awarded '{}' badge to user {}", badge.name, user_id);
            Ok(Some(badge.name))
        } else {
            Ok(None)
        }
    }

    pub async fn user_stats(&self, user_id: &str) -> AppResult<UserStats> {
        let user = self.find_user(user_id).await?;
        let referrals = self.users.count_referred_by(user_id).await?;
        let attempts = self.attempts.find_by_user(user_id).await?;
        let perfect_quizzes = self.count_perfect(&attempts).await?;

        Ok(UserStats {
            points: user.points,
            streak: user.login_streak,
            referrals,
            perfect_quizzes,
        })
    }

    /// Every badge definition the user currently qualifies for. Read-only: the stored
    /// award list is not touched.
    pub async fn earned_badges(&self, user_id: &str) -> AppResult<Vec<Badge>> {
        let stats = self.user_stats(user_id).await?;
        let badges = self.badges.find_all().await?;

        Ok(badges
            .into_iter()
            .filter(|badge| badge_earned(badge, &stats))
            .collect())
    }

    /// Attempts whose correct answers cover every question the topic has right now.
    async fn count_perfect(&self, attempts: &[Attempt]) -> AppResult<u64> {
        let mut question_counts: HashMap<&str, u64> = HashMap::new();
        let mut perfect = 0;

        for attempt in attempts.iter().filter(|a| !a.answers.is_empty()) {
            let total = match question_counts.get(attempt.topic_id.as_str()) {
                Some(total) => *total,
                None => {
                    let total = self.questions.count_by_topic(&attempt.topic_id).await?;
                    question_counts.insert(attempt.topic_id.as_str(), total);
                    total
                }
            };

            if total > 0 && attempt.correct_count() as u64 == total {
                perfect += 1;
            }
        }

        Ok(perfect)
    }

    async fn quiz_master_badge(&self) -> AppResult<Badge> {
        if let Some(badge) = self.badges.find_by_name(QUIZ_MASTER_BADGE).await? {
            return Ok(badge);
        }

        match self.badges.insert(Badge::quiz_master()).await? {
            InsertOutcome::Inserted(badge) => {
                log::info!("Created '{}' badge definition", badge.name);
                Ok(badge)
            }
            InsertOutcome::Duplicate => self
                .badges
                .find_by_name(QUIZ_MASTER_BADGE)
                .await?
                .ok_or_else(|| {
                    AppError::InternalError(format!(
                        "Badge '{}' reported as duplicate but not found",
                        QUIZ_MASTER_BADGE
                    ))
                }),
        }
    }

    async fn find_user(&self, user_id: &str) -> AppResult<User> {
        self.users
            .find_by_id(user_id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("User with id '{}' not found", user_id)))
    }
}
