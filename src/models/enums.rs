//! Shared domain enums, stored as upper-case text columns

use serde::{Deserialize, Serialize};
use sqlx::{Decode, Encode, Postgres};
use utoipa::ToSchema;

/// Maps a text-backed enum onto Postgres `VARCHAR`/`TEXT` columns through its
/// `as_str`/`FromStr` pair.
macro_rules! text_column {
    ($ty:ty) => {
        impl sqlx::Type<Postgres> for $ty {
            fn type_info() -> sqlx::postgres::PgTypeInfo {
                <String as sqlx::Type<Postgres>>::type_info()
            }

            fn compatible(ty: &sqlx::postgres::PgTypeInfo) -> bool {
                <String as sqlx::Type<Postgres>>::compatible(ty)
            }
        }

        impl<'r> Decode<'r, Postgres> for $ty {
            fn decode(
                value: sqlx::postgres::PgValueRef<'r>,
            ) -> Result<Self, sqlx::error::BoxDynError> {
                let s: String = Decode::<Postgres>::decode(value)?;
                s.parse().map_err(|e: String| e.into())
            }
        }

        impl Encode<'_, Postgres> for $ty {
            fn encode_by_ref(
                &self,
                buf: &mut sqlx::postgres::PgArgumentBuffer,
            ) -> sqlx::encode::IsNull {
                <&str as Encode<Postgres>>::encode(self.as_str(), buf)
            }
        }

        impl std::fmt::Display for $ty {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                f.write_str(self.as_str())
            }
        }
    };
}

// ---------------------------------------------------------------------------
// Role
// ---------------------------------------------------------------------------

/// Coarse-grained capability tag gating route access
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "UPPERCASE")]
pub enum Role {
    Librarian,
    Member,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Librarian => "LIBRARIAN",
            Role::Member => "MEMBER",
        }
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            Role::Librarian => "Librarian",
            Role::Member => "Member",
        }
    }
}

impl std::str::FromStr for Role {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_uppercase().as_str() {
            "LIBRARIAN" => Ok(Role::Librarian),
            "MEMBER" => Ok(Role::Member),
            _ => Err(format!("Unknown role code: {}", s)),
        }
    }
}

text_column!(Role);

// ---------------------------------------------------------------------------
// BookStatus
// ---------------------------------------------------------------------------

/// Circulation status of a catalog entry, always derived from its copy counts
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "UPPERCASE")]
pub enum BookStatus {
    Available,
    Borrowed,
    Maintenance,
}

impl BookStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            BookStatus::Available => "AVAILABLE",
            BookStatus::Borrowed => "BORROWED",
            BookStatus::Maintenance => "MAINTENANCE",
        }
    }

    /// Status of a book entering the catalog: with no copy on the shelf it
    /// cannot be out on loan yet, so it is parked in maintenance.
    pub fn for_new_copies(available_copies: i32) -> Self {
        if available_copies > 0 {
            BookStatus::Available
        } else {
            BookStatus::Maintenance
        }
    }

    /// Status of a catalogued book after an edit
    pub fn for_circulating_copies(available_copies: i32) -> Self {
        if available_copies > 0 {
            BookStatus::Available
        } else {
            BookStatus::Borrowed
        }
    }
}

impl std::str::FromStr for BookStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_uppercase().as_str() {
            "AVAILABLE" => Ok(BookStatus::Available),
            "BORROWED" => Ok(BookStatus::Borrowed),
            "MAINTENANCE" => Ok(BookStatus::Maintenance),
            _ => Err(format!("Unknown book status: {}", s)),
        }
    }
}

text_column!(BookStatus);

// ---------------------------------------------------------------------------
// BorrowStatus
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "UPPERCASE")]
pub enum BorrowStatus {
    Active,
    Returned,
    Overdue,
}

impl BorrowStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            BorrowStatus::Active => "ACTIVE",
            BorrowStatus::Returned => "RETURNED",
            BorrowStatus::Overdue => "OVERDUE",
        }
    }

    /// A copy is still out of the library
    pub fn is_outstanding(&self) -> bool {
        matches!(self, BorrowStatus::Active | BorrowStatus::Overdue)
    }
}

impl std::str::FromStr for BorrowStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_uppercase().as_str() {
            "ACTIVE" => Ok(BorrowStatus::Active),
            "RETURNED" => Ok(BorrowStatus::Returned),
            "OVERDUE" => Ok(BorrowStatus::Overdue),
            _ => Err(format!("Unknown borrow status: {}", s)),
        }
    }
}

text_column!(BorrowStatus);
