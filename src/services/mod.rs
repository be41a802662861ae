//! Business logic services

pub mod auth;
pub mod books;
pub mod bootstrap;
pub mod users;

use crate::{auth::jwt::TokenService, config::AuthConfig, repository::Repository};

/// Container for all services
#[derive(Clone)]
pub struct Services {
    pub auth: auth::AuthService,
    pub users: users::UsersService,
    pub books: books::BooksService,
    pub tokens: TokenService,
}

impl Services {
    /// Create all services with the given repository
    pub fn new(repository: Repository, auth_config: &AuthConfig) -> Self {
        let tokens = TokenService::new(auth_config);
        let users = users::UsersService::new(repository.clone());

        Self {
            auth: auth::AuthService::new(users.clone(), tokens.clone()),
            users,
            books: books::BooksService::new(repository),
            tokens,
        }
    }
}
