//! Borrowing record model
//!
//! Records are persisted and read by the active-borrowing guards; no
//! endpoint creates, renews or returns loans yet.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;

use super::enums::BorrowStatus;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct BorrowingRecord {
    pub id: i64,
    pub user_id: i64,
    pub book_id: i64,
    pub borrow_date: NaiveDate,
    pub due_date: NaiveDate,
    pub return_date: Option<NaiveDate>,
    pub fine_amount: Decimal,
    pub fine_paid: bool,
    pub renewal_count: i32,
    pub status: BorrowStatus,
}

/// Row to insert for a new loan
#[derive(Debug, Clone)]
pub struct NewBorrowingRecord {
    pub user_id: i64,
    pub book_id: i64,
    pub borrow_date: NaiveDate,
    pub due_date: NaiveDate,
}
