use actix_web::{get, HttpResponse, Responder};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Body of `GET /health`.
#[derive(Debug, Serialize, Deserialize)]
pub struct HealthReport {
    pub status: String,
    /// Crate version the server was built from.
    pub version: String,
    pub timestamp: DateTime<Utc>,
}

impl HealthReport {
    fn now() -> Self {
        HealthReport {
            status: "ok".to_string(),
            version: env!("CARGO_PKG_VERSION").to_string(),
            timestamp: Utc::now(),
        }
    }
}

/// Liveness probe. Answers without touching either store, so it stays up while
/// the database is unreachable.
#[get("/health")]
pub async fn health() -> impl Responder {
    HttpResponse::Ok().json(HealthReport::now())
}
