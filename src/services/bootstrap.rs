//! Default accounts created at startup

use crate::{
    config::BootstrapConfig,
    error::AppResult,
    models::{RegisterUser, Role},
    services::users::UsersService,
};

struct Seed<'a> {
    email: &'a str,
    password: &'a str,
    first_name: &'a str,
    last_name: &'a str,
    role: Role,
}

/// Create the default librarian and member when their emails are unused.
///
/// Running it again is a no-op. Returns the number of accounts created.
pub async fn seed_default_accounts(
    users: &UsersService,
    config: &BootstrapConfig,
) -> AppResult<usize> {
    if !config.enabled {
        return Ok(0);
    }

    let seeds = [
        Seed {
            email: &config.librarian_email,
            password: &config.librarian_password,
            first_name: "System",
            last_name: "Librarian",
            role: Role::Librarian,
        },
        Seed {
            email: &config.member_email,
            password: &config.member_password,
            first_name: "John",
            last_name: "Member",
            role: Role::Member,
        },
    ];

    let mut created = 0;
    for seed in seeds {
        if users.find_by_email(seed.email).await?.is_some() {
            continue;
        }

        users
            .register_user(
                RegisterUser {
                    email: seed.email.to_string(),
                    password: seed.password.to_string(),
                    first_name: Some(seed.first_name.to_string()),
                    last_name: Some(seed.last_name.to_string()),
                    address: None,
                    phone_number: None,
                },
                seed.role,
            )
            .await?;
        tracing::info!(role = %seed.role, "Created default account {}", seed.email);
        created += 1;
    }

    Ok(created)
}
