use std::env;

use secrecy::{ExposeSecret, SecretString};

const DEFAULT_MONGO_CONN_STRING: &str = "mongodb://localhost:27017";

#[derive(Clone, Debug)]
pub struct Config {
    pub mongo_conn_string: SecretString,
    pub mongo_db_name: String,
    pub topics_collection: String,
    pub questions_collection: String,
    pub users_collection: String,
    pub attempts_collection: String,
    pub badges_collection: String,
    pub web_server_host: String,
    pub web_server_port: u16,
    pub cors_allowed_origin: Option<String>,
    pub app_env: String,
}

impl Config {
    pub fn from_env() -> Self {
        dotenvy::dotenv().ok();

        Self {
            mongo_conn_string: SecretString::from(
                env::var("MONGO_CONN_STRING")
                    .unwrap_or_else(|_| DEFAULT_MONGO_CONN_STRING.to_string()),
            ),
            mongo_db_name: env::var("MONGO_DB_NAME")
                .unwrap_or_else(|_| "quizcraft-local".to_string()),
            topics_collection: env_or("TOPICS_COLLECTION", "topics"),
            questions_collection: env_or("QUESTIONS_COLLECTION", "questions"),
            users_collection: env_or("USERS_COLLECTION", "users"),
            attempts_collection: env_or("ATTEMPTS_COLLECTION", "quiz_attempts"),
            badges_collection: env_or("BADGES_COLLECTION", "badges"),
            web_server_host: env_or("WEB_SERVER_HOST", "localhost"),
            web_server_port: env::var("WEB_SERVER_PORT")
                .ok()
                .and_then(|p| p.parse().ok())
                .unwrap_or(8080),
            cors_allowed_origin: env::var("CORS_ALLOWED_ORIGIN")
                .ok()
                .filter(|origin| !origin.trim().is_empty()),
            app_env: env_or("APP_ENV", "development"),
        }
    }

    pub fn is_production(&self) -> bool {
        self.app_env.eq_ignore_ascii_case("production")
    }

    /// Validate that production-critical configuration is set.
    /// Panics if the connection string is still the local default.
    pub fn validate_for_production(&self) {
        if !self.is_production() {
            return;
        }

        if self.mongo_conn_string.expose_secret() == DEFAULT_MONGO_CONN_STRING {
            panic!(
                "FATAL: MONGO_CONN_STRING is using the local default! Set MONGO_CONN_STRING for production."
            );
        }

        if self.cors_allowed_origin.is_none() {
            panic!("FATAL: CORS_ALLOWED_ORIGIN must be set in production.");
        }
    }

    #[cfg(test)]
    pub fn test_config() -> Self {
        Self {
            mongo_conn_string: SecretString::from(DEFAULT_MONGO_CONN_STRING.to_string()),
            mongo_db_name: "quizcraft-test".to_string(),
            topics_collection: "topics".to_string(),
            questions_collection: "questions".to_string(),
            users_collection: "users".to_string(),
            attempts_collection: "quiz_attempts".to_string(),
            badges_collection: "badges".to_string(),
            web_server_host: "127.0.0.1".to_string(),
            web_server_port: 8080,
            cors_allowed_origin: None,
            app_env: "test".to_string(),
        }
    }
}

fn env_or(key: &str, default: &str) -> String {
    env::var(key).unwrap_or_else(|_| default.to_string())
}
