//! Repository layer for database operations
//!
//! Each store is a trait so services run unchanged against Postgres or the
//! in-process [`memory`] backend.

pub mod books;
pub mod borrowings;
pub mod memory;
pub mod users;

use std::sync::Arc;

use async_trait::async_trait;
use sqlx::{Pool, Postgres};

use crate::{
    error::{AppError, AppResult},
    models::{Book, BookQuery, BorrowingRecord, NewBook, NewBorrowingRecord, NewUser, Role, User},
};

/// Persisted user accounts
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait UsersStore: Send + Sync {
    /// Round trip used by the readiness check
    async fn ping(&self) -> AppResult<()>;

    async fn get_by_id(&self, id: i64) -> AppResult<Option<User>>;

    /// Case-insensitive email lookup
    async fn get_by_email(&self, email: &str) -> AppResult<Option<User>>;

    async fn email_exists(&self, email: &str, exclude_id: Option<i64>) -> AppResult<bool>;

    async fn list_by_role(&self, role: Role) -> AppResult<Vec<User>>;

    /// Case-insensitive first or last name substring match within `role`
    async fn search_by_name(&self, name: &str, role: Role) -> AppResult<Vec<User>>;

    async fn create(&self, user: &NewUser) -> AppResult<User>;

    /// Save every mutable column of `user`
    async fn update(&self, user: &User) -> AppResult<User>;

    async fn delete(&self, id: i64) -> AppResult<()>;
}

/// Persisted catalog
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait BooksStore: Send + Sync {
    async fn get_by_id(&self, id: i64) -> AppResult<Option<Book>>;

    async fn list(&self) -> AppResult<Vec<Book>>;

    async fn search(&self, query: &BookQuery) -> AppResult<Vec<Book>>;

    /// Books with status AVAILABLE and at least one copy on the shelf
    async fn list_available(&self) -> AppResult<Vec<Book>>;

    async fn isbn_exists(&self, isbn: &str, exclude_id: Option<i64>) -> AppResult<bool>;

    async fn create(&self, book: &NewBook) -> AppResult<Book>;

    async fn update(&self, book: &Book) -> AppResult<Book>;

    async fn delete(&self, id: i64) -> AppResult<()>;
}

/// Persisted borrowing records
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait BorrowingsStore: Send + Sync {
    async fn create(&self, record: &NewBorrowingRecord) -> AppResult<BorrowingRecord>;

    /// Records of `book_id` still ACTIVE or OVERDUE
    async fn count_outstanding_for_book(&self, book_id: i64) -> AppResult<i64>;

    /// Records of `user_id` still ACTIVE or OVERDUE
    async fn count_outstanding_for_user(&self, user_id: i64) -> AppResult<i64>;
}

/// Main repository struct holding one handle per store
#[derive(Clone)]
pub struct Repository {
    pub users: Arc<dyn UsersStore>,
    pub books: Arc<dyn BooksStore>,
    pub borrowings: Arc<dyn BorrowingsStore>,
}

impl Repository {
    /// Create a Postgres-backed repository with the given database pool
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self {
            users: Arc::new(users::UsersRepository::new(pool.clone())),
            books: Arc::new(books::BooksRepository::new(pool.clone())),
            borrowings: Arc::new(borrowings::BorrowingsRepository::new(pool)),
        }
    }

    /// Create a repository backed by process memory
    pub fn in_memory() -> Self {
        let store = memory::MemoryStore::default();
        Self {
            users: Arc::new(store.clone()),
            books: Arc::new(store.clone()),
            borrowings: Arc::new(store),
        }
    }
}

/// Turn a unique-constraint violation into a client error, anything else
/// stays a database error.
pub(crate) fn unique_violation(err: sqlx::Error, message: impl Into<String>) -> AppError {
    match err.as_database_error().and_then(|db| db.code()) {
        Some(code) if code == "23505" => AppError::BusinessRule(message.into()),
        _ => AppError::Database(err),
    }
}
