//! User and member management service

use chrono::{NaiveDate, Utc};

use crate::{
    auth::password::hash_password,
    error::{AppError, AppResult},
    models::{
        user::{add_years, extended_membership_expiry},
        MemberQuery, MembershipStatus, NewUser, RegisterUser, Role, UpdateMember, User,
    },
    repository::Repository,
};

/// Length of a fresh membership
const MEMBERSHIP_YEARS: i32 = 1;

/// Calendar date the membership rules are evaluated against
pub fn today() -> NaiveDate {
    Utc::now().date_naive()
}

#[derive(Clone)]
pub struct UsersService {
    repository: Repository,
}

impl UsersService {
    pub fn new(repository: Repository) -> Self {
        Self { repository }
    }

    /// Register a new account with the given role.
    ///
    /// Membership starts today and runs for one year.
    pub async fn register_user(&self, input: RegisterUser, role: Role) -> AppResult<User> {
        if self.repository.users.email_exists(&input.email, None).await? {
            return Err(AppError::BusinessRule(format!(
                "Email already exists: {}",
                input.email
            )));
        }

        let registration_date = today();
        let membership_expiry = add_years(registration_date, MEMBERSHIP_YEARS)
            .ok_or_else(|| AppError::Internal("Membership expiry out of range".to_string()))?;

        let user = NewUser {
            email: input.email,
            password: hash_password(&input.password)?,
            first_name: input.first_name,
            last_name: input.last_name,
            address: input.address,
            phone_number: input.phone_number,
            role,
            registration_date,
            membership_expiry,
            enabled: true,
        };

        let created = self.repository.users.create(&user).await?;
        tracing::info!(user_id = created.id, role = %created.role, "Registered user {}", created.email);
        Ok(created)
    }

    pub async fn find_by_email(&self, email: &str) -> AppResult<Option<User>> {
        self.repository.users.get_by_email(email).await
    }

    pub async fn find_by_id(&self, id: i64) -> AppResult<Option<User>> {
        self.repository.users.get_by_id(id).await
    }

    /// Get user by ID
    pub async fn get_by_id(&self, id: i64) -> AppResult<User> {
        self.find_by_id(id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("User not found with id: {}", id)))
    }

    /// Get a user that holds the MEMBER role.
    ///
    /// Librarians are reported as not found so the member endpoints never
    /// reveal or touch staff accounts.
    pub async fn get_member(&self, id: i64) -> AppResult<User> {
        match self.find_by_id(id).await? {
            Some(user) if user.is_member() => Ok(user),
            _ => Err(AppError::NotFound(format!("Member not found with id: {}", id))),
        }
    }

    pub async fn find_by_role(&self, role: Role) -> AppResult<Vec<User>> {
        self.repository.users.list_by_role(role).await
    }

    pub async fn all_members(&self) -> AppResult<Vec<User>> {
        self.find_by_role(Role::Member).await
    }

    /// Search members by exact id, else by partial name, else list them all
    pub async fn search_members(&self, query: &MemberQuery) -> AppResult<Vec<User>> {
        if let Some(id) = query.id {
            return Ok(self
                .find_by_id(id)
                .await?
                .filter(User::is_member)
                .into_iter()
                .collect());
        }

        match query.name.as_deref().map(str::trim) {
            Some(name) if !name.is_empty() => {
                self.repository.users.search_by_name(name, Role::Member).await
            }
            _ => self.all_members().await,
        }
    }

    /// Update the supplied profile fields of a member
    pub async fn update_member(&self, id: i64, changes: UpdateMember) -> AppResult<User> {
        let mut user = self.get_member(id).await?;

        if let Some(email) = changes.email {
            if !email.eq_ignore_ascii_case(&user.email)
                && self.repository.users.email_exists(&email, Some(id)).await?
            {
                return Err(AppError::BusinessRule(format!(
                    "Email already exists: {}",
                    email
                )));
            }
            user.email = email;
        }
        if let Some(first_name) = changes.first_name {
            user.first_name = Some(first_name);
        }
        if let Some(last_name) = changes.last_name {
            user.last_name = Some(last_name);
        }
        if let Some(address) = changes.address {
            user.address = Some(address);
        }
        if let Some(phone_number) = changes.phone_number {
            user.phone_number = Some(phone_number);
        }

        self.repository.users.update(&user).await
    }

    /// Delete a member without outstanding loans
    pub async fn delete_member(&self, id: i64) -> AppResult<()> {
        self.get_member(id).await?;

        if self.repository.borrowings.count_outstanding_for_user(id).await? > 0 {
            return Err(AppError::BusinessRule(
                "Cannot delete user with active borrowings".to_string(),
            ));
        }

        self.repository.users.delete(id).await?;
        tracing::info!(user_id = id, "Deleted member");
        Ok(())
    }

    /// Push a member's expiry `years` years further
    pub async fn extend_membership(&self, id: i64, years: i32) -> AppResult<User> {
        let mut user = self.get_member(id).await?;

        user.membership_expiry = extended_membership_expiry(user.membership_expiry, today(), years)
            .ok_or_else(|| AppError::Validation("Membership extension out of range".to_string()))?;

        let updated = self.repository.users.update(&user).await?;
        tracing::info!(
            user_id = id,
            years,
            expiry = %updated.membership_expiry,
            "Extended membership"
        );
        Ok(updated)
    }

    pub async fn is_membership_valid(&self, id: i64) -> AppResult<bool> {
        Ok(self.get_by_id(id).await?.is_membership_valid_on(today()))
    }

    /// Membership status of a MEMBER account, as seen by librarians
    pub async fn membership_status(&self, id: i64) -> AppResult<MembershipStatus> {
        Ok(status_of(&self.get_member(id).await?))
    }

    /// Membership status of the calling account
    pub async fn own_membership_status(&self, id: i64) -> AppResult<MembershipStatus> {
        Ok(status_of(&self.get_by_id(id).await?))
    }

    /// Cheap round trip to the user store
    pub async fn check_store(&self) -> AppResult<()> {
        self.repository.users.ping().await
    }

    pub async fn disable_member(&self, id: i64) -> AppResult<User> {
        self.set_member_enabled(id, false).await
    }

    pub async fn enable_member(&self, id: i64) -> AppResult<User> {
        self.set_member_enabled(id, true).await
    }

    /// Enable or disable a member account
    pub async fn set_member_enabled(&self, id: i64, enabled: bool) -> AppResult<User> {
        let mut user = self.get_member(id).await?;
        user.enabled = enabled;

        let updated = self.repository.users.update(&user).await?;
        tracing::info!(user_id = id, enabled, "Changed member account state");
        Ok(updated)
    }
}

fn status_of(user: &User) -> MembershipStatus {
    MembershipStatus {
        valid: user.is_membership_valid_on(today()),
        expiry_date: user.membership_expiry,
    }
}
