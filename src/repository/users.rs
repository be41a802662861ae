//! Users repository for database operations

use async_trait::async_trait;
use sqlx::{Pool, Postgres};

use super::{unique_violation, UsersStore};
use crate::{
    error::{AppError, AppResult},
    models::{NewUser, Role, User},
};

const USER_COLUMNS: &str = r#"
    id, email, password, first_name, last_name, address, phone_number,
    role, registration_date, membership_expiry, enabled
"#;

#[derive(Clone)]
pub struct UsersRepository {
    pool: Pool<Postgres>,
}

impl UsersRepository {
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl UsersStore for UsersRepository {
    async fn ping(&self) -> AppResult<()> {
        sqlx::query("SELECT 1").execute(&self.pool).await?;
        Ok(())
    }

    async fn get_by_id(&self, id: i64) -> AppResult<Option<User>> {
        let user = sqlx::query_as::<_, User>(&format!(
            "SELECT {} FROM users WHERE id = $1",
            USER_COLUMNS
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(user)
    }

    async fn get_by_email(&self, email: &str) -> AppResult<Option<User>> {
        let user = sqlx::query_as::<_, User>(&format!(
            "SELECT {} FROM users WHERE LOWER(email) = LOWER($1)",
            USER_COLUMNS
        ))
        .bind(email)
        .fetch_optional(&self.pool)
        .await?;

        Ok(user)
    }

    async fn email_exists(&self, email: &str, exclude_id: Option<i64>) -> AppResult<bool> {
        let exists: bool = if let Some(id) = exclude_id {
            sqlx::query_scalar(
                "SELECT EXISTS(SELECT 1 FROM users WHERE LOWER(email) = LOWER($1) AND id != $2)",
            )
            .bind(email)
            .bind(id)
            .fetch_one(&self.pool)
            .await?
        } else {
            sqlx::query_scalar("SELECT EXISTS(SELECT 1 FROM users WHERE LOWER(email) = LOWER($1))")
                .bind(email)
                .fetch_one(&self.pool)
                .await?
        };
        Ok(exists)
    }

    async fn list_by_role(&self, role: Role) -> AppResult<Vec<User>> {
        let users = sqlx::query_as::<_, User>(&format!(
            "SELECT {} FROM users WHERE role = $1 ORDER BY id",
            USER_COLUMNS
        ))
        .bind(role)
        .fetch_all(&self.pool)
        .await?;

        Ok(users)
    }

    async fn search_by_name(&self, name: &str, role: Role) -> AppResult<Vec<User>> {
        let pattern = format!("%{}%", name.to_lowercase());
        let users = sqlx::query_as::<_, User>(&format!(
            r#"
            SELECT {} FROM users
            WHERE (LOWER(first_name) LIKE $1 OR LOWER(last_name) LIKE $1)
              AND role = $2
            ORDER BY last_name, first_name
            "#,
            USER_COLUMNS
        ))
        .bind(pattern)
        .bind(role)
        .fetch_all(&self.pool)
        .await?;

        Ok(users)
    }

    async fn create(&self, user: &NewUser) -> AppResult<User> {
        sqlx::query_as::<_, User>(&format!(
            r#"
            INSERT INTO users (
                email, password, first_name, last_name, address, phone_number,
                role, registration_date, membership_expiry, enabled
            ) VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10)
            RETURNING {}
            "#,
            USER_COLUMNS
        ))
        .bind(&user.email)
        .bind(&user.password)
        .bind(&user.first_name)
        .bind(&user.last_name)
        .bind(&user.address)
        .bind(&user.phone_number)
        .bind(user.role)
        .bind(user.registration_date)
        .bind(user.membership_expiry)
        .bind(user.enabled)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| unique_violation(e, format!("Email already exists: {}", user.email)))
    }

    async fn update(&self, user: &User) -> AppResult<User> {
        sqlx::query_as::<_, User>(&format!(
            r#"
            UPDATE users SET
                email = $2, password = $3, first_name = $4, last_name = $5,
                address = $6, phone_number = $7, role = $8,
                registration_date = $9, membership_expiry = $10, enabled = $11
            WHERE id = $1
            RETURNING {}
            "#,
            USER_COLUMNS
        ))
        .bind(user.id)
        .bind(&user.email)
        .bind(&user.password)
        .bind(&user.first_name)
        .bind(&user.last_name)
        .bind(&user.address)
        .bind(&user.phone_number)
        .bind(user.role)
        .bind(user.registration_date)
        .bind(user.membership_expiry)
        .bind(user.enabled)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| unique_violation(e, format!("Email already exists: {}", user.email)))?
        .ok_or_else(|| AppError::NotFound(format!("User not found with id: {}", user.id)))
    }

    async fn delete(&self, id: i64) -> AppResult<()> {
        let result = sqlx::query("DELETE FROM users WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound(format!("User not found with id: {}", id)));
        }
        Ok(())
    }
}
