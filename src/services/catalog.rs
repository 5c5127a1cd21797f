//! Book catalog service

use crate::{
    error::AppResult,
    models::book::{Book, NewBook},
    repository::Repository,
};

#[derive(Clone)]
pub struct CatalogService {
    repository: Repository,
}

impl CatalogService {
    pub fn new(repository: Repository) -> Self {
        Self { repository }
    }

    pub async fn get_book(&self, volume_id: &str) -> AppResult<Option<Book>> {
        self.repository.books.get(volume_id).await
    }

    pub async fn latest_books(&self, limit: i64) -> AppResult<Vec<Book>> {
        self.repository.books.latest(limit).await
    }

    pub async fn volume_exists(&self, volume_id: &str) -> AppResult<bool> {
        self.repository.books.volume_exists(volume_id).await
    }

    pub async fn upload_book(&self, form: &NewBook) -> AppResult<i32> {
        self.repository.books.insert(form).await
    }

    pub async fn update_book(&self, form: &NewBook) -> AppResult<Option<i32>> {
        self.repository.books.update(form).await
    }

    /// Count one download and return the new total, `None` for an unknown book.
    ///
    /// Read then write, without a transaction: concurrent downloads of the
    /// same book may be counted once.
    pub async fn record_download(&self, volume_id: &str) -> AppResult<Option<i32>> {
        let Some(book) = self.repository.books.get(volume_id).await? else {
            return Ok(None);
        };

        let downloads = book.downloads.saturating_add(1);
        self.repository
            .books
            .set_downloads(volume_id, downloads)
            .await?;

        Ok(Some(downloads))
    }
}
