use std::sync::Arc;

use actix_web::{get, post, web, HttpResponse};
use chrono::Utc;

use crate::{
    app_state::AppState,
    errors::AppError,
    models::dto::response::{EarnedBadgeDto, LoginRewardResponse},
};

/// Called by the authentication layer after a successful login.
#[post("/api/users/{id}/logins")]
pub async fn record_login(
    state: web::Data<Arc<AppState>>,
    id: web::Path<String>,
) -> Result<HttpResponse, AppError> {
    let outcome = state
        .gamification_service
        .record_login(id.trim(), Utc::now())
        .await?;

    let (points_awarded, milestone_reached) = outcome
        .reward
        .map(|reward| (reward.points_awarded, reward.milestone_reached))
        .unwrap_or((0, false));

    Ok(HttpResponse::Ok().json(LoginRewardResponse {
        points_awarded,
        streak: outcome.streak,
        milestone_reached,
        points: outcome.points,
    }))
}

#[get("/api/users/{id}/badges/earned")]
pub async fn earned_badges(
    state: web::Data<Arc<AppState>>,
    id: web::Path<String>,
) -> Result<HttpResponse, AppError> {
    let badges: Vec<EarnedBadgeDto> = state
        .gamification_service
        .earned_badges(id.trim())
        .await?
        .into_iter()
        .map(EarnedBadgeDto::from)
        .collect();
    Ok(HttpResponse::Ok().json(badges))
}

#[get("/health")]
pub async fn health_check() -> HttpResponse {
    HttpResponse::Ok().json(serde_json::json!({
        "status": "healthy",
        "version": env!("CARGO_PKG_VERSION")
    }))
}

#[get("/health/ready")]
pub async fn health_check_ready(state: web::Data<Arc<AppState>>) -> HttpResponse {
    let db_ok = match &state.db {
        Some(db) => db.health_check().await.is_ok(),
        None => true,
    };

    let response = serde_json::json!({
        "status": if db_ok { "ready" } else { "not_ready" },
        "version": env!("CARGO_PKG_VERSION"),
        "dependencies": {
            "mongodb": if db_ok { "ok" } else { "error" }
        }
    });

    if db_ok {
        HttpResponse::Ok().json(response)
    } else {
        HttpResponse::ServiceUnavailable().json(response)
    }
}
