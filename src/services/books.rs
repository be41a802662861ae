//! Catalog management service

use crate::{
    error::{AppError, AppResult},
    models::{Book, BookQuery, BookStatus, CreateBook, NewBook, UpdateBook},
    repository::Repository,
};

#[derive(Clone)]
pub struct BooksService {
    repository: Repository,
}

impl BooksService {
    pub fn new(repository: Repository) -> Self {
        Self { repository }
    }

    pub async fn list_books(&self) -> AppResult<Vec<Book>> {
        self.repository.books.list().await
    }

    /// Get book by ID
    pub async fn get_book(&self, id: i64) -> AppResult<Book> {
        self.repository
            .books
            .get_by_id(id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Book not found with id: {}", id)))
    }

    pub async fn search_books(&self, query: &BookQuery) -> AppResult<Vec<Book>> {
        self.repository.books.search(query).await
    }

    pub async fn available_books(&self) -> AppResult<Vec<Book>> {
        self.repository.books.list_available().await
    }

    /// Add a catalog entry; available copies default to the full stock
    pub async fn add_book(&self, input: CreateBook) -> AppResult<Book> {
        let available_copies = input.available_copies.unwrap_or(input.total_copies);
        if available_copies > input.total_copies {
            return Err(AppError::Validation(
                "Available copies cannot exceed total copies".to_string(),
            ));
        }

        if self.repository.books.isbn_exists(&input.isbn, None).await? {
            return Err(AppError::BusinessRule(format!(
                "Book with ISBN already exists: {}",
                input.isbn
            )));
        }

        let book = NewBook {
            isbn: input.isbn,
            title: input.title,
            author: input.author,
            category: input.category,
            publication_year: input.publication_year,
            total_copies: input.total_copies,
            available_copies,
            status: BookStatus::for_new_copies(available_copies),
        };

        let created = self.repository.books.create(&book).await?;
        tracing::info!(book_id = created.id, isbn = %created.isbn, "Added book");
        Ok(created)
    }

    /// Replace the bibliographic fields and optionally resize the stock
    pub async fn update_book(&self, id: i64, input: UpdateBook) -> AppResult<Book> {
        let mut book = self.get_book(id).await?;

        if input.isbn != book.isbn && self.repository.books.isbn_exists(&input.isbn, Some(id)).await? {
            return Err(AppError::BusinessRule(format!(
                "Book with ISBN already exists: {}",
                input.isbn
            )));
        }

        if let Some(total_copies) = input.total_copies {
            book.resize_copies(total_copies)?;
        }

        book.isbn = input.isbn;
        book.title = input.title;
        book.author = input.author;
        book.category = input.category;
        book.publication_year = input.publication_year;
        book.status = BookStatus::for_circulating_copies(book.available_copies);

        let updated = self.repository.books.update(&book).await?;
        tracing::info!(book_id = id, "Updated book");
        Ok(updated)
    }

    /// Delete a book that has no copy out on loan
    pub async fn delete_book(&self, id: i64) -> AppResult<()> {
        self.get_book(id).await?;

        if self.repository.borrowings.count_outstanding_for_book(id).await? > 0 {
            return Err(AppError::BusinessRule(
                "Cannot delete book that is currently borrowed".to_string(),
            ));
        }

        self.repository.books.delete(id).await?;
        tracing::info!(book_id = id, "Deleted book");
        Ok(())
    }
}
