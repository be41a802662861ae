//! Static route policy table evaluated by the access filter

use axum::http::Method;

use crate::models::Role;

/// What a request needs before it may reach a handler
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Access {
    Public,
    Authenticated,
    Role(Role),
}

#[derive(Debug, Clone)]
struct Rule {
    /// Empty matches every method
    methods: Vec<Method>,
    prefix: &'static str,
    access: Access,
}

#[derive(Debug, Clone)]
pub struct RoutePolicy {
    rules: Vec<Rule>,
    fallback: Access,
}

impl RoutePolicy {
    /// Policy of the library API; first matching rule wins
    pub fn library() -> Self {
        let any = |prefix, access| Rule {
            methods: Vec::new(),
            prefix,
            access,
        };

        Self {
            rules: vec![
                any("/api/auth/login", Access::Public),
                any("/api/auth/register", Access::Public),
                any("/health", Access::Public),
                any("/ready", Access::Public),
                any("/swagger-ui", Access::Public),
                any("/api-docs", Access::Public),
                Rule {
                    methods: vec![Method::GET, Method::HEAD],
                    prefix: "/books",
                    access: Access::Public,
                },
                any("/librarian", Access::Role(Role::Librarian)),
                any("/member", Access::Role(Role::Member)),
                any("/books", Access::Role(Role::Librarian)),
            ],
            fallback: Access::Authenticated,
        }
    }

    pub fn evaluate(&self, method: &Method, path: &str) -> Access {
        self.rules
            .iter()
            .find(|rule| {
                (rule.methods.is_empty() || rule.methods.contains(method))
                    && matches_prefix(path, rule.prefix)
            })
            .map_or(self.fallback, |rule| rule.access)
    }
}

impl Default for RoutePolicy {
    fn default() -> Self {
        Self::library()
    }
}

/// Prefix match on a path-segment boundary
fn matches_prefix(path: &str, prefix: &str) -> bool {
    match path.strip_prefix(prefix) {
        Some(rest) => rest.is_empty() || rest.starts_with('/'),
        None => false,
    }
}
