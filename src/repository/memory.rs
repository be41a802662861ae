//! In-process store used for development (`database.url = "memory:"`) and
//! for the integration tests.
//!
//! Mirrors the Postgres repositories: sequential ids, unique email and ISBN,
//! last write wins.

use std::collections::BTreeMap;
use std::sync::Arc;

use async_trait::async_trait;
use rust_decimal::Decimal;
use tokio::sync::RwLock;

use super::{BooksStore, BorrowingsStore, UsersStore};
use crate::{
    error::{AppError, AppResult},
    models::{
        Book, BookQuery, BookStatus, BorrowStatus, BorrowingRecord, NewBook, NewBorrowingRecord,
        NewUser, Role, User,
    },
};

#[derive(Default)]
struct Tables {
    users: BTreeMap<i64, User>,
    books: BTreeMap<i64, Book>,
    borrowings: BTreeMap<i64, BorrowingRecord>,
    next_user_id: i64,
    next_book_id: i64,
    next_borrowing_id: i64,
}

fn next_id(counter: &mut i64) -> i64 {
    *counter += 1;
    *counter
}

#[derive(Clone, Default)]
pub struct MemoryStore {
    tables: Arc<RwLock<Tables>>,
}

#[async_trait]
impl UsersStore for MemoryStore {
    async fn ping(&self) -> AppResult<()> {
        Ok(())
    }

    async fn get_by_id(&self, id: i64) -> AppResult<Option<User>> {
        Ok(self.tables.read().await.users.get(&id).cloned())
    }

    async fn get_by_email(&self, email: &str) -> AppResult<Option<User>> {
        let tables = self.tables.read().await;
        Ok(tables
            .users
            .values()
            .find(|u| u.email.eq_ignore_ascii_case(email))
            .cloned())
    }

    async fn email_exists(&self, email: &str, exclude_id: Option<i64>) -> AppResult<bool> {
        let tables = self.tables.read().await;
        Ok(tables
            .users
            .values()
            .any(|u| u.email.eq_ignore_ascii_case(email) && Some(u.id) != exclude_id))
    }

    async fn list_by_role(&self, role: Role) -> AppResult<Vec<User>> {
        let tables = self.tables.read().await;
        Ok(tables.users.values().filter(|u| u.role == role).cloned().collect())
    }

    async fn search_by_name(&self, name: &str, role: Role) -> AppResult<Vec<User>> {
        let needle = name.to_lowercase();
        let matches = |field: &Option<String>| {
            field
                .as_deref()
                .is_some_and(|v| v.to_lowercase().contains(&needle))
        };

        let tables = self.tables.read().await;
        Ok(tables
            .users
            .values()
            .filter(|u| u.role == role && (matches(&u.first_name) || matches(&u.last_name)))
            .cloned()
            .collect())
    }

    async fn create(&self, user: &NewUser) -> AppResult<User> {
        let mut tables = self.tables.write().await;
        if tables.users.values().any(|u| u.email.eq_ignore_ascii_case(&user.email)) {
            return Err(AppError::BusinessRule(format!(
                "Email already exists: {}",
                user.email
            )));
        }

        let created = User {
            id: next_id(&mut tables.next_user_id),
            email: user.email.clone(),
            password: user.password.clone(),
            first_name: user.first_name.clone(),
            last_name: user.last_name.clone(),
            address: user.address.clone(),
            phone_number: user.phone_number.clone(),
            role: user.role,
            registration_date: user.registration_date,
            membership_expiry: user.membership_expiry,
            enabled: user.enabled,
        };
        tables.users.insert(created.id, created.clone());
        Ok(created)
    }

    async fn update(&self, user: &User) -> AppResult<User> {
        let mut tables = self.tables.write().await;
        if !tables.users.contains_key(&user.id) {
            return Err(AppError::NotFound(format!("User not found with id: {}", user.id)));
        }
        if tables
            .users
            .values()
            .any(|u| u.id != user.id && u.email.eq_ignore_ascii_case(&user.email))
        {
            return Err(AppError::BusinessRule(format!(
                "Email already exists: {}",
                user.email
            )));
        }

        tables.users.insert(user.id, user.clone());
        Ok(user.clone())
    }

    async fn delete(&self, id: i64) -> AppResult<()> {
        let mut tables = self.tables.write().await;
        tables
            .users
            .remove(&id)
            .ok_or_else(|| AppError::NotFound(format!("User not found with id: {}", id)))?;
        tables.borrowings.retain(|_, r| r.user_id != id);
        Ok(())
    }
}

#[async_trait]
impl BooksStore for MemoryStore {
    async fn get_by_id(&self, id: i64) -> AppResult<Option<Book>> {
        Ok(self.tables.read().await.books.get(&id).cloned())
    }

    async fn list(&self) -> AppResult<Vec<Book>> {
        Ok(self.tables.read().await.books.values().cloned().collect())
    }

    async fn search(&self, query: &BookQuery) -> AppResult<Vec<Book>> {
        let tables = self.tables.read().await;
        let mut books: Vec<Book> = tables
            .books
            .values()
            .filter(|b| query.matches(b))
            .cloned()
            .collect();
        books.sort_by(|a, b| a.title.cmp(&b.title));
        Ok(books)
    }

    async fn list_available(&self) -> AppResult<Vec<Book>> {
        let tables = self.tables.read().await;
        let mut books: Vec<Book> = tables
            .books
            .values()
            .filter(|b| b.status == BookStatus::Available && b.available_copies > 0)
            .cloned()
            .collect();
        books.sort_by(|a, b| a.title.cmp(&b.title));
        Ok(books)
    }

    async fn isbn_exists(&self, isbn: &str, exclude_id: Option<i64>) -> AppResult<bool> {
        let tables = self.tables.read().await;
        Ok(tables
            .books
            .values()
            .any(|b| b.isbn == isbn && Some(b.id) != exclude_id))
    }

    async fn create(&self, book: &NewBook) -> AppResult<Book> {
        let mut tables = self.tables.write().await;
        if tables.books.values().any(|b| b.isbn == book.isbn) {
            return Err(AppError::BusinessRule(format!(
                "ISBN already exists: {}",
                book.isbn
            )));
        }

        let created = Book {
            id: next_id(&mut tables.next_book_id),
            isbn: book.isbn.clone(),
            title: book.title.clone(),
            author: book.author.clone(),
            category: book.category.clone(),
            publication_year: book.publication_year,
            total_copies: book.total_copies,
            available_copies: book.available_copies,
            status: book.status,
        };
        tables.books.insert(created.id, created.clone());
        Ok(created)
    }

    async fn update(&self, book: &Book) -> AppResult<Book> {
        let mut tables = self.tables.write().await;
        if !tables.books.contains_key(&book.id) {
            return Err(AppError::NotFound(format!("Book not found with id: {}", book.id)));
        }
        if tables
            .books
            .values()
            .any(|b| b.id != book.id && b.isbn == book.isbn)
        {
            return Err(AppError::BusinessRule(format!(
                "ISBN already exists: {}",
                book.isbn
            )));
        }

        tables.books.insert(book.id, book.clone());
        Ok(book.clone())
    }

    async fn delete(&self, id: i64) -> AppResult<()> {
        let mut tables = self.tables.write().await;
        tables
            .books
            .remove(&id)
            .ok_or_else(|| AppError::NotFound(format!("Book not found with id: {}", id)))?;
        tables.borrowings.retain(|_, r| r.book_id != id);
        Ok(())
    }
}

#[async_trait]
impl BorrowingsStore for MemoryStore {
    async fn create(&self, record: &NewBorrowingRecord) -> AppResult<BorrowingRecord> {
        let mut tables = self.tables.write().await;
        if !tables.users.contains_key(&record.user_id) {
            return Err(AppError::NotFound(format!(
                "User not found with id: {}",
                record.user_id
            )));
        }
        if !tables.books.contains_key(&record.book_id) {
            return Err(AppError::NotFound(format!(
                "Book not found with id: {}",
                record.book_id
            )));
        }

        let created = BorrowingRecord {
            id: next_id(&mut tables.next_borrowing_id),
            user_id: record.user_id,
            book_id: record.book_id,
            borrow_date: record.borrow_date,
            due_date: record.due_date,
            return_date: None,
            fine_amount: Decimal::ZERO,
            fine_paid: false,
            renewal_count: 0,
            status: BorrowStatus::Active,
        };
        tables.borrowings.insert(created.id, created.clone());
        Ok(created)
    }

    async fn count_outstanding_for_book(&self, book_id: i64) -> AppResult<i64> {
        let tables = self.tables.read().await;
        Ok(tables
            .borrowings
            .values()
            .filter(|r| r.book_id == book_id && r.status.is_outstanding())
            .count() as i64)
    }

    async fn count_outstanding_for_user(&self, user_id: i64) -> AppResult<i64> {
        let tables = self.tables.read().await;
        Ok(tables
            .borrowings
            .values()
            .filter(|r| r.user_id == user_id && r.status.is_outstanding())
            .count() as i64)
    }
}
