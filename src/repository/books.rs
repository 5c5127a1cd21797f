//! Books repository for database operations

use chrono::Utc;
use sqlx::{Pool, Postgres};

use crate::{
    error::AppResult,
    models::book::{Book, NewBook},
};

const BOOK_COLUMNS: &str = r#"
    id, volume_id, title, subtitle, publisher, published_date, page_count,
    maturity_rating, authors, categories, description, uploader, price,
    isbn10, isbn13, image_link, downloads, created
"#;

#[derive(Clone)]
pub struct BooksRepository {
    pool: Pool<Postgres>,
}

impl BooksRepository {
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }

    /// Get book by volume ID
    pub async fn get(&self, volume_id: &str) -> AppResult<Option<Book>> {
        let query = format!("SELECT {} FROM books WHERE volume_id = $1", BOOK_COLUMNS);

        let book = sqlx::query_as::<_, Book>(&query)
            .bind(volume_id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(book)
    }

    /// Most recently added books, newest first
    pub async fn latest(&self, limit: i64) -> AppResult<Vec<Book>> {
        let query = format!(
            "SELECT {} FROM books ORDER BY created DESC, id DESC LIMIT $1",
            BOOK_COLUMNS
        );

        let books = sqlx::query_as::<_, Book>(&query)
            .bind(limit.max(0))
            .fetch_all(&self.pool)
            .await?;

        Ok(books)
    }

    /// Check if a volume ID is already in the catalog
    pub async fn volume_exists(&self, volume_id: &str) -> AppResult<bool> {
        let exists: bool =
            sqlx::query_scalar("SELECT EXISTS(SELECT 1 FROM books WHERE volume_id = $1)")
                .bind(volume_id)
                .fetch_one(&self.pool)
                .await?;
        Ok(exists)
    }

    /// Add a new book; the download counter starts at zero
    pub async fn insert(&self, book: &NewBook) -> AppResult<i32> {
        let now = Utc::now();

        let id = sqlx::query_scalar::<_, i32>(
            r#"
            INSERT INTO books (
                volume_id, title, subtitle, publisher, published_date, page_count,
                maturity_rating, authors, categories, description, uploader, price,
                isbn10, isbn13, image_link, downloads, created
            ) VALUES (
                $1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14, $15, 0, $16
            ) RETURNING id
            "#,
        )
        .bind(&book.volume_id)
        .bind(&book.title)
        .bind(&book.subtitle)
        .bind(&book.publisher)
        .bind(&book.published_date)
        .bind(book.page_count_value())
        .bind(&book.maturity_rating)
        .bind(&book.authors)
        .bind(&book.categories)
        .bind(&book.description)
        .bind(&book.uploader)
        .bind(book.price_value())
        .bind(&book.isbn10)
        .bind(&book.isbn13)
        .bind(&book.image_link)
        .bind(now)
        .fetch_one(&self.pool)
        .await?;

        tracing::info!("New book {} uploaded by {}", book.title, book.uploader);

        Ok(id)
    }

    /// Replace the editable fields of a book, keyed by volume ID.
    ///
    /// The uploader and download counter are left untouched. Returns `None`
    /// when no book has this volume ID.
    pub async fn update(&self, book: &NewBook) -> AppResult<Option<i32>> {
        let id = sqlx::query_scalar::<_, i32>(
            r#"
            UPDATE books SET
                title = $1, subtitle = $2, publisher = $3, published_date = $4,
                page_count = $5, maturity_rating = $6, authors = $7, categories = $8,
                description = $9, price = $10, isbn10 = $11, isbn13 = $12, image_link = $13
            WHERE volume_id = $14
            RETURNING id
            "#,
        )
        .bind(&book.title)
        .bind(&book.subtitle)
        .bind(&book.publisher)
        .bind(&book.published_date)
        .bind(book.page_count_value())
        .bind(&book.maturity_rating)
        .bind(&book.authors)
        .bind(&book.categories)
        .bind(&book.description)
        .bind(book.price_value())
        .bind(&book.isbn10)
        .bind(&book.isbn13)
        .bind(&book.image_link)
        .bind(&book.volume_id)
        .fetch_optional(&self.pool)
        .await?;

        if id.is_some() {
            tracing::info!("Book {} edited", book.title);
        }

        Ok(id)
    }

    /// Overwrite the download counter with a value computed by the caller.
    ///
    /// Not an atomic increment: two callers that read the same count before
    /// writing will lose one download.
    pub async fn set_downloads(&self, volume_id: &str, downloads: i32) -> AppResult<()> {
        sqlx::query("UPDATE books SET downloads = $1 WHERE volume_id = $2")
            .bind(downloads)
            .bind(volume_id)
            .execute(&self.pool)
            .await?;
        Ok(())
    }
}
