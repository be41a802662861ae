//! Books repository for database operations

use async_trait::async_trait;
use sqlx::{Pool, Postgres};

use super::{unique_violation, BooksStore};
use crate::{
    error::{AppError, AppResult},
    models::{Book, BookQuery, BookStatus, NewBook},
};

const BOOK_COLUMNS: &str = r#"
    id, isbn, title, author, category, publication_year,
    total_copies, available_copies, status
"#;

#[derive(Clone)]
pub struct BooksRepository {
    pool: Pool<Postgres>,
}

impl BooksRepository {
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl BooksStore for BooksRepository {
    async fn get_by_id(&self, id: i64) -> AppResult<Option<Book>> {
        let book = sqlx::query_as::<_, Book>(&format!(
            "SELECT {} FROM books WHERE id = $1",
            BOOK_COLUMNS
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(book)
    }

    async fn list(&self) -> AppResult<Vec<Book>> {
        let books = sqlx::query_as::<_, Book>(&format!(
            "SELECT {} FROM books ORDER BY id",
            BOOK_COLUMNS
        ))
        .fetch_all(&self.pool)
        .await?;

        Ok(books)
    }

    async fn search(&self, query: &BookQuery) -> AppResult<Vec<Book>> {
        let books = sqlx::query_as::<_, Book>(&format!(
            r#"
            SELECT {} FROM books
            WHERE ($1::TEXT IS NULL OR LOWER(title) LIKE '%' || LOWER($1) || '%')
              AND ($2::TEXT IS NULL OR LOWER(author) LIKE '%' || LOWER($2) || '%')
              AND ($3::TEXT IS NULL OR LOWER(category) LIKE '%' || LOWER($3) || '%')
              AND ($4::TEXT IS NULL OR isbn LIKE '%' || $4 || '%')
            ORDER BY title
            "#,
            BOOK_COLUMNS
        ))
        .bind(&query.title)
        .bind(&query.author)
        .bind(&query.category)
        .bind(&query.isbn)
        .fetch_all(&self.pool)
        .await?;

        Ok(books)
    }

    async fn list_available(&self) -> AppResult<Vec<Book>> {
        let books = sqlx::query_as::<_, Book>(&format!(
            "SELECT {} FROM books WHERE status = $1 AND available_copies > 0 ORDER BY title",
            BOOK_COLUMNS
        ))
        .bind(BookStatus::Available)
        .fetch_all(&self.pool)
        .await?;

        Ok(books)
    }

    async fn isbn_exists(&self, isbn: &str, exclude_id: Option<i64>) -> AppResult<bool> {
        let exists: bool = if let Some(id) = exclude_id {
            sqlx::query_scalar("SELECT EXISTS(SELECT 1 FROM books WHERE isbn = $1 AND id != $2)")
                .bind(isbn)
                .bind(id)
                .fetch_one(&self.pool)
                .await?
        } else {
            sqlx::query_scalar("SELECT EXISTS(SELECT 1 FROM books WHERE isbn = $1)")
                .bind(isbn)
                .fetch_one(&self.pool)
                .await?
        };
        Ok(exists)
    }

    async fn create(&self, book: &NewBook) -> AppResult<Book> {
        sqlx::query_as::<_, Book>(&format!(
            r#"
            INSERT INTO books (
                isbn, title, author, category, publication_year,
                total_copies, available_copies, status
            ) VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            RETURNING {}
            "#,
            BOOK_COLUMNS
        ))
        .bind(&book.isbn)
        .bind(&book.title)
        .bind(&book.author)
        .bind(&book.category)
        .bind(book.publication_year)
        .bind(book.total_copies)
        .bind(book.available_copies)
        .bind(book.status)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| unique_violation(e, format!("ISBN already exists: {}", book.isbn)))
    }

    async fn update(&self, book: &Book) -> AppResult<Book> {
        sqlx::query_as::<_, Book>(&format!(
            r#"
            UPDATE books SET
                isbn = $2, title = $3, author = $4, category = $5,
                publication_year = $6, total_copies = $7,
                available_copies = $8, status = $9
            WHERE id = $1
            RETURNING {}
            "#,
            BOOK_COLUMNS
        ))
        .bind(book.id)
        .bind(&book.isbn)
        .bind(&book.title)
        .bind(&book.author)
        .bind(&book.category)
        .bind(book.publication_year)
        .bind(book.total_copies)
        .bind(book.available_copies)
        .bind(book.status)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| unique_violation(e, format!("ISBN already exists: {}", book.isbn)))?
        .ok_or_else(|| AppError::NotFound(format!("Book not found with id: {}", book.id)))
    }

    async fn delete(&self, id: i64) -> AppResult<()> {
        let result = sqlx::query("DELETE FROM books WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound(format!("Book not found with id: {}", id)));
        }
        Ok(())
    }
}
