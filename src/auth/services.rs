use tracing::{error, info, warn};
use uuid::Uuid;

use crate::{
    auth::{
        dto::{AuthResponse, PublicUser, RegisterInput},
        jwt::TokenIssuer,
        password::hash_password_blocking,
        validation::{validate_registration, ValidationErrors, EMAIL_TAKEN},
    },
    error::ApiError,
    users::{StoreError, UserStore},
};

/// Validates `input`, stores the new user and issues its access token.
///
/// Nothing is written unless every rule passes. A duplicate email that slips
/// past the early lookup is still reported as a validation failure.
pub async fn register(
    users: &dyn UserStore,
    tokens: &dyn TokenIssuer,
    input: RegisterInput,
) -> Result<AuthResponse, ApiError> {
    let registration = validate_registration(&input, users).await?;

    let hash = hash_password_blocking(registration.password.clone()).await?;

    let user = match users
        .create(&registration.name, &registration.email, &hash)
        .await
    {
        Ok(u) => u,
        Err(StoreError::DuplicateEmail) => {
            warn!(email = %registration.email, "email registered concurrently");
            let mut errors = ValidationErrors::default();
            errors.add("email", EMAIL_TAKEN);
            return Err(ApiError::Validation(errors));
        }
        Err(e) => {
            error!(error = %e, "create user failed");
            return Err(e.into());
        }
    };

    let token = tokens.issue(user.id).map_err(|e| {
        error!(error = %e, user_id = %user.id, "token issue failed");
        ApiError::Internal(e)
    })?;

    info!(user_id = %user.id, email = %user.email, "user registered");
    Ok(AuthResponse {
        token,
        user: user.into(),
    })
}

/// Loads the public view of `user_id`, treating an unknown id as unauthenticated.
pub async fn current_user(users: &dyn UserStore, user_id: Uuid) -> Result<PublicUser, ApiError> {
    match users.find_by_id(user_id).await? {
        Some(user) => Ok(user.into()),
        None => {
            warn!(%user_id, "token refers to unknown user");
            Err(ApiError::Unauthenticated)
        }
    }
}
