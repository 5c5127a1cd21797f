//! Book requests service

use crate::{
    error::AppResult,
    models::request::{NewRequest, Request},
    repository::Repository,
};

#[derive(Clone)]
pub struct RequestsService {
    repository: Repository,
}

impl RequestsService {
    pub fn new(repository: Repository) -> Self {
        Self { repository }
    }

    pub async fn get(&self, id: i32) -> AppResult<Option<Request>> {
        self.repository.requests.get(id).await
    }

    pub async fn latest(&self, limit: i64) -> AppResult<Vec<Request>> {
        self.repository.requests.latest(limit).await
    }

    /// Store a validated request form submitted from `ip`
    pub async fn create(&self, form: &NewRequest, ip: &str) -> AppResult<i32> {
        self.repository
            .requests
            .insert(&form.requester, &form.title, ip)
            .await
    }
}
