//! Book (catalog entry) model and related types

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::{IntoParams, ToSchema};
use validator::Validate;

use super::{enums::BookStatus, user::not_blank};
use crate::error::{AppError, AppResult};

/// Catalog entry with copy accounting
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Book {
    pub id: i64,
    pub isbn: String,
    pub title: String,
    pub author: String,
    pub category: Option<String>,
    pub publication_year: i32,
    pub total_copies: i32,
    pub available_copies: i32,
    pub status: BookStatus,
}

impl Book {
    /// Copies currently out of the library
    pub fn borrowed_copies(&self) -> i32 {
        self.total_copies - self.available_copies
    }

    /// Resize the stock while keeping every borrowed copy accounted for.
    ///
    /// Leaves the book untouched when `new_total` is smaller than the number
    /// of copies currently out.
    pub fn resize_copies(&mut self, new_total: i32) -> AppResult<()> {
        let borrowed = self.borrowed_copies();
        if new_total < borrowed {
            return Err(AppError::BusinessRule(
                "Cannot set total copies less than currently borrowed copies".to_string(),
            ));
        }
        self.total_copies = new_total;
        self.available_copies = new_total - borrowed;
        Ok(())
    }
}

/// Row to insert for a new catalog entry
#[derive(Debug, Clone)]
pub struct NewBook {
    pub isbn: String,
    pub title: String,
    pub author: String,
    pub category: Option<String>,
    pub publication_year: i32,
    pub total_copies: i32,
    pub available_copies: i32,
    pub status: BookStatus,
}

/// Create book request
#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateBook {
    #[validate(custom(function = "not_blank", message = "ISBN is required"))]
    pub isbn: String,
    #[validate(custom(function = "not_blank", message = "Title is required"))]
    pub title: String,
    #[validate(custom(function = "not_blank", message = "Author is required"))]
    pub author: String,
    pub category: Option<String>,
    pub publication_year: i32,
    #[validate(range(min = 0, message = "Total copies cannot be negative"))]
    pub total_copies: i32,
    /// Defaults to `totalCopies`
    #[validate(range(min = 0, message = "Available copies cannot be negative"))]
    pub available_copies: Option<i32>,
}

/// Update book request; bibliographic fields are replaced wholesale
#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateBook {
    #[validate(custom(function = "not_blank", message = "ISBN is required"))]
    pub isbn: String,
    #[validate(custom(function = "not_blank", message = "Title is required"))]
    pub title: String,
    #[validate(custom(function = "not_blank", message = "Author is required"))]
    pub author: String,
    pub category: Option<String>,
    pub publication_year: i32,
    #[validate(range(min = 0, message = "Total copies cannot be negative"))]
    pub total_copies: Option<i32>,
}

/// Book search filters; absent filters match everything
#[derive(Debug, Clone, Default, Deserialize, IntoParams, ToSchema)]
#[into_params(parameter_in = Query)]
pub struct BookQuery {
    /// Partial title (case-insensitive)
    pub title: Option<String>,
    /// Partial author (case-insensitive)
    pub author: Option<String>,
    /// Partial category (case-insensitive)
    pub category: Option<String>,
    /// Partial ISBN
    pub isbn: Option<String>,
}

impl BookQuery {
    /// In-process equivalent of the SQL search predicate
    pub fn matches(&self, book: &Book) -> bool {
        fn contains_ci(haystack: &str, needle: &str) -> bool {
            haystack.to_lowercase().contains(&needle.to_lowercase())
        }

        self.title.as_deref().map_or(true, |t| contains_ci(&book.title, t))
            && self.author.as_deref().map_or(true, |a| contains_ci(&book.author, a))
            && self.category.as_deref().map_or(true, |c| {
                book.category.as_deref().is_some_and(|bc| contains_ci(bc, c))
            })
            && self.isbn.as_deref().map_or(true, |i| book.isbn.contains(i))
    }
}
