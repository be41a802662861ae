//! User model and related types

use chrono::{Months, NaiveDate};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::{IntoParams, ToSchema};
use validator::{Validate, ValidationError};

use super::enums::Role;

/// Full user model from database
#[derive(Debug, Clone, Serialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: i64,
    pub email: String,
    /// Hashed password (argon2)
    #[serde(skip_serializing)]
    pub password: String,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub address: Option<String>,
    pub phone_number: Option<String>,
    pub role: Role,
    pub registration_date: NaiveDate,
    pub membership_expiry: NaiveDate,
    pub enabled: bool,
}

impl User {
    pub fn is_member(&self) -> bool {
        self.role == Role::Member
    }

    /// Membership counts as valid while the expiry date lies strictly after
    /// `today` and the account is enabled.
    pub fn is_membership_valid_on(&self, today: NaiveDate) -> bool {
        self.enabled && self.membership_expiry > today
    }
}

/// Expiry date after extending a membership by `years`.
///
/// A membership that is still running is extended from its current expiry,
/// a lapsed one restarts from `today`. Returns `None` on calendar overflow.
pub fn extended_membership_expiry(
    current_expiry: NaiveDate,
    today: NaiveDate,
    years: i32,
) -> Option<NaiveDate> {
    let base = if current_expiry > today {
        current_expiry
    } else {
        today
    };
    add_years(base, years)
}

/// Calendar-aware year shift (Feb 29 clamps to Feb 28)
pub fn add_years(date: NaiveDate, years: i32) -> Option<NaiveDate> {
    let months = Months::new(years.unsigned_abs().checked_mul(12)?);
    if years >= 0 {
        date.checked_add_months(months)
    } else {
        date.checked_sub_months(months)
    }
}

/// Row to insert for a newly registered account
#[derive(Debug, Clone)]
pub struct NewUser {
    pub email: String,
    pub password: String,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub address: Option<String>,
    pub phone_number: Option<String>,
    pub role: Role,
    pub registration_date: NaiveDate,
    pub membership_expiry: NaiveDate,
    pub enabled: bool,
}

pub(crate) fn not_blank(value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        return Err(ValidationError::new("blank"));
    }
    Ok(())
}

/// Registration request (self-service and librarian-driven)
#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct RegisterUser {
    #[validate(email(message = "Invalid email format"))]
    pub email: String,
    #[validate(custom(function = "not_blank", message = "Password is required"))]
    pub password: String,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub address: Option<String>,
    pub phone_number: Option<String>,
}

/// Partial member update; absent fields are left untouched
#[derive(Debug, Clone, Default, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateMember {
    #[validate(email(message = "Invalid email format"))]
    pub email: Option<String>,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub address: Option<String>,
    pub phone_number: Option<String>,
}

/// Member search parameters
#[derive(Debug, Default, Deserialize, IntoParams, ToSchema)]
#[into_params(parameter_in = Query)]
pub struct MemberQuery {
    /// Partial first or last name (case-insensitive)
    pub name: Option<String>,
    /// Exact member ID, takes precedence over `name`
    pub id: Option<i64>,
}

/// Query parameters for a membership extension
#[derive(Debug, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct ExtendMembershipParams {
    /// Number of years to add (default: 1)
    pub years: Option<i32>,
}

/// Membership status response
#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct MembershipStatus {
    pub valid: bool,
    pub expiry_date: NaiveDate,
}
