use anyhow::{Context, Result};

use crate::entities::sea_orm_active_enums::RoleEnum;
use crate::repositories::{NewUser, UserRepository};

/// Creates the principal account when no user holds `email` yet.
pub async fn initialize_principal_user(
    users: &dyn UserRepository,
    email: &str,
    password: &str,
    password_cost: u32,
) -> Result<()> {
    let existing = users
        .find_by_email(email.to_string())
        .await
        .context("Failed to check existing principal")?;

    if existing.is_some() {
        tracing::info!("Principal user already exists, skipping initialization");
        return Ok(());
    }

    tracing::info!("Creating default principal user...");

    let hashed_password =
        bcrypt::hash(password, password_cost).context("Failed to hash principal password")?;

    users
        .insert(NewUser {
            email: email.to_string(),
            password_hash: hashed_password,
            role: RoleEnum::Principal,
            first_name: "Principal".to_string(),
            last_name: "School".to_string(),
        })
        .await
        .context("Failed to insert principal user")?;

    tracing::info!(email = %email, "Principal user created");
    tracing::warn!("Please change the default principal password after first login");

    Ok(())
}
