pub mod quiz_handler;
pub mod user_handler;

use actix_web::web;

pub use quiz_handler::{check_eligibility, certify_topic, submit_quiz, topic_leaderboard};
pub use user_handler::{earned_badges, health_check, health_check_ready, record_login};

pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(health_check)
        .service(health_check_ready)
        .service(submit_quiz)
        .service(check_eligibility)
        .service(certify_topic)
        .service(topic_leaderboard)
        .service(record_login)
        .service(earned_badges);
}
