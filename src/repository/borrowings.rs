//! Borrowing records repository for database operations

use async_trait::async_trait;
use sqlx::{Pool, Postgres};

use super::BorrowingsStore;
use crate::{
    error::AppResult,
    models::{BorrowStatus, BorrowingRecord, NewBorrowingRecord},
};

#[derive(Clone)]
pub struct BorrowingsRepository {
    pool: Pool<Postgres>,
}

impl BorrowingsRepository {
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl BorrowingsStore for BorrowingsRepository {
    async fn create(&self, record: &NewBorrowingRecord) -> AppResult<BorrowingRecord> {
        let record = sqlx::query_as::<_, BorrowingRecord>(
            r#"
            INSERT INTO borrowing_records (user_id, book_id, borrow_date, due_date, status)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING id, user_id, book_id, borrow_date, due_date, return_date,
                      fine_amount, fine_paid, renewal_count, status
            "#,
        )
        .bind(record.user_id)
        .bind(record.book_id)
        .bind(record.borrow_date)
        .bind(record.due_date)
        .bind(BorrowStatus::Active)
        .fetch_one(&self.pool)
        .await?;

        Ok(record)
    }

    async fn count_outstanding_for_book(&self, book_id: i64) -> AppResult<i64> {
        let count = sqlx::query_scalar::<_, i64>(
            "SELECT COUNT(*) FROM borrowing_records WHERE book_id = $1 AND status IN ($2, $3)",
        )
        .bind(book_id)
        .bind(BorrowStatus::Active)
        .bind(BorrowStatus::Overdue)
        .fetch_one(&self.pool)
        .await?;

        Ok(count)
    }

    async fn count_outstanding_for_user(&self, user_id: i64) -> AppResult<i64> {
        let count = sqlx::query_scalar::<_, i64>(
            "SELECT COUNT(*) FROM borrowing_records WHERE user_id = $1 AND status IN ($2, $3)",
        )
        .bind(user_id)
        .bind(BorrowStatus::Active)
        .bind(BorrowStatus::Overdue)
        .fetch_one(&self.pool)
        .await?;

        Ok(count)
    }
}
