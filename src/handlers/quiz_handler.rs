use std::sync::Arc;

use actix_web::{get, post, web, HttpResponse};
use chrono::Utc;
use validator::Validate;

use crate::{
    app_state::AppState,
    errors::AppError,
    models::dto::{
        request::{CheckEligibilityRequest, LeaderboardParams, SubmitQuizRequest},
        response::{AlreadyAttemptedResponse, EligibleResponse},
    },
    services::Eligibility,
};

/// 201 for a newly recorded attempt, 200 when the participant had already attempted.
#[post("/api/quiz/submit")]
pub async fn submit_quiz(
    state: web::Data<Arc<AppState>>,
    request: web::Json<SubmitQuizRequest>,
) -> Result<HttpResponse, AppError> {
    let response = state.submission_service.submit(request.into_inner()).await?;

    if response.already_attempted {
        Ok(HttpResponse::Ok().json(response))
    } else {
        Ok(HttpResponse::Created().json(response))
    }
}

#[post("/api/quiz/check-eligibility")]
pub async fn check_eligibility(
    state: web::Data<Arc<AppState>>,
    request: web::Json<CheckEligibilityRequest>,
) -> Result<HttpResponse, AppError> {
    let request = request.into_inner();
    request.validate()?;

    let eligibility = state
        .admission_service
        .check_eligibility(
            request.topic_id.trim(),
            request.email.as_deref(),
            request.phone.as_deref(),
        )
        .await?;

    match eligibility {
        Eligibility::Allowed => Ok(HttpResponse::Ok().json(EligibleResponse { can_attempt: true })),
        Eligibility::AlreadyAttempted(attempt) => {
            Ok(HttpResponse::Conflict().json(AlreadyAttemptedResponse {
                message: "You have already attempted this quiz".to_string(),
                attempt_id: attempt.id,
            }))
        }
    }
}

#[post("/api/topics/{id}/certify")]
pub async fn certify_topic(
    state: web::Data<Arc<AppState>>,
    id: web::Path<String>,
) -> Result<HttpResponse, AppError> {
    let response = state
        .certification_service
        .certify(id.trim(), Utc::now())
        .await?;
    Ok(HttpResponse::Ok().json(response))
}

#[get("/api/topics/{id}/leaderboard")]
pub async fn topic_leaderboard(
    state: web::Data<Arc<AppState>>,
    id: web::Path<String>,
    query: web::Query<LeaderboardParams>,
) -> Result<HttpResponse, AppError> {
    let entries = state
        .leaderboard_service
        .leaderboard(id.trim(), query.limit())
        .await?;
    Ok(HttpResponse::Ok().json(entries))
}
