//! Account creation and password authentication

use argon2::{
    password_hash::{rand_core::OsRng, PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Argon2,
};

use crate::{
    error::{AppError, AppResult},
    models::user::{NewUser, User},
    repository::Repository,
};

#[derive(Clone)]
pub struct UsersService {
    repository: Repository,
}

impl UsersService {
    pub fn new(repository: Repository) -> Self {
        Self { repository }
    }

    /// Check credentials.
    ///
    /// `Ok(None)` covers both an unknown username and a wrong password;
    /// errors are reserved for lookup failures.
    pub async fn authenticate(&self, username: &str, password: &str) -> AppResult<Option<User>> {
        let Some(user) = self.repository.users.get_by_username(username.trim()).await? else {
            return Ok(None);
        };

        if verify_password(&user.password, password)? {
            Ok(Some(user))
        } else {
            tracing::debug!("Password mismatch for {}", user.username);
            Ok(None)
        }
    }

    pub async fn username_taken(&self, username: &str) -> AppResult<bool> {
        self.repository.users.username_exists(username).await
    }

    /// Store a validated signup form with a hashed password
    pub async fn register(&self, form: &NewUser) -> AppResult<i32> {
        let hash = hash_password(&form.password)?;
        self.repository
            .users
            .insert(&form.username, &form.email, &hash)
            .await
    }
}

/// Hash a password using Argon2
pub fn hash_password(password: &str) -> AppResult<String> {
    let salt = SaltString::generate(&mut OsRng);
    let argon2 = Argon2::default();
    let hash = argon2
        .hash_password(password.as_bytes(), &salt)
        .map_err(|e| AppError::Internal(format!("Failed to hash password: {}", e)))?;
    Ok(hash.to_string())
}

fn verify_password(hash: &str, password: &str) -> AppResult<bool> {
    let parsed_hash = PasswordHash::new(hash)
        .map_err(|_| AppError::Internal("Invalid password hash".to_string()))?;
    Ok(Argon2::default()
        .verify_password(password.as_bytes(), &parsed_hash)
        .is_ok())
}
