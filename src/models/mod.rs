//! Data models for the library backend

pub mod book;
pub mod borrowing;
pub mod enums;
pub mod user;

// Re-export commonly used types
pub use book::{Book, BookQuery, CreateBook, NewBook, UpdateBook};
pub use borrowing::{BorrowingRecord, NewBorrowingRecord};
pub use enums::{BookStatus, BorrowStatus, Role};
pub use user::{MemberQuery, MembershipStatus, NewUser, RegisterUser, UpdateMember, User};
