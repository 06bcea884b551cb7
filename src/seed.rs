use anyhow::Context;
use tracing::info;

use crate::{auth::password::hash_password_blocking, users::UserStore};

pub const SEED_NAME: &str = "username";
pub const SEED_EMAIL: &str = "user@email.com";
pub const SEED_PASSWORD: &str = "userpass";

/// Empties the users table and inserts the fixture user.
pub async fn run(users: &dyn UserStore) -> anyhow::Result<()> {
    users.truncate().await.context("clear users table")?;

    let hash = hash_password_blocking(SEED_PASSWORD.to_string()).await?;
    let user = users
        .create(SEED_NAME, SEED_EMAIL, &hash)
        .await
        .context("insert fixture user")?;

    info!(user_id = %user.id, email = %user.email, "users table seeded");
    Ok(())
}
