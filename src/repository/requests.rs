//! Book requests repository

use chrono::Utc;
use sqlx::{Pool, Postgres};

use crate::{error::AppResult, models::request::Request};

#[derive(Clone)]
pub struct RequestsRepository {
    pool: Pool<Postgres>,
}

impl RequestsRepository {
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }

    /// Get request by ID
    pub async fn get(&self, id: i32) -> AppResult<Option<Request>> {
        let request = sqlx::query_as::<_, Request>(
            "SELECT id, requester, title, ip, created FROM requests WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(request)
    }

    /// Most recent requests, newest first
    pub async fn latest(&self, limit: i64) -> AppResult<Vec<Request>> {
        let requests = sqlx::query_as::<_, Request>(
            r#"
            SELECT id, requester, title, ip, created
            FROM requests
            ORDER BY created DESC, id DESC
            LIMIT $1
            "#,
        )
        .bind(limit.max(0))
        .fetch_all(&self.pool)
        .await?;

        Ok(requests)
    }

    /// Store a new request and return its ID
    pub async fn insert(&self, requester: &str, title: &str, ip: &str) -> AppResult<i32> {
        let id = sqlx::query_scalar::<_, i32>(
            r#"
            INSERT INTO requests (requester, title, ip, created)
            VALUES ($1, $2, $3, $4)
            RETURNING id
            "#,
        )
        .bind(requester)
        .bind(title)
        .bind(ip)
        .bind(Utc::now())
        .fetch_one(&self.pool)
        .await?;

        tracing::info!("New request {} for \"{}\" by {}", id, title, requester);

        Ok(id)
    }
}
