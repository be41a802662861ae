//! Authentication and authorization: password hashing, bearer tokens and
//! the per-request access filter.

pub mod filter;
pub mod jwt;
pub mod password;
pub mod policy;

use crate::models::{Role, User};

/// Identity attached to a request by the access filter
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CurrentUser {
    pub id: i64,
    pub email: String,
    pub role: Role,
}

impl From<&User> for CurrentUser {
    fn from(user: &User) -> Self {
        Self {
            id: user.id,
            email: user.email.clone(),
            role: user.role,
        }
    }
}
