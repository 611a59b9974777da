/// Account management: registration, credential checks, profile updates.
///
/// Passwords are argon2-hashed PHC strings. Username uniqueness is enforced
/// by the database index, not by a check-then-insert read.
use argon2::{
    password_hash::{rand_core::OsRng, PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Argon2,
};
use sqlx::PgPool;

use crate::{
    error::{AppError, AppResult},
    models::User,
};

const MIN_PASSWORD_LENGTH: usize = 8;

/// Registration payload, with the confirmation field the frontend sends.
#[derive(Debug, serde::Deserialize)]
pub struct Registration {
    #[serde(default)]
    pub username: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub password: String,
    #[serde(default)]
    pub password2: String,
}

pub fn validate_registration(registration: &Registration) -> AppResult<()> {
    if registration.username.trim().is_empty() {
        return Err(AppError::Validation("Username is required".to_string()));
    }
    if registration.email.trim().is_empty() {
        return Err(AppError::Validation("Email is required".to_string()));
    }
    if registration.password.len() < MIN_PASSWORD_LENGTH {
        return Err(AppError::Validation(format!(
            "Password must be at least {} characters",
            MIN_PASSWORD_LENGTH
        )));
    }
    if registration.password != registration.password2 {
        return Err(AppError::Validation("Passwords must match".to_string()));
    }
    Ok(())
}

pub fn hash_password(password: &str) -> AppResult<String> {
    let salt = SaltString::generate(&mut OsRng);
    let hash = Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map_err(|e| AppError::Internal(format!("Password hashing failed: {}", e)))?;
    Ok(hash.to_string())
}

pub fn verify_password(password: &str, password_hash: &str) -> bool {
    let Ok(parsed) = PasswordHash::new(password_hash) else {
        return false;
    };
    Argon2::default()
        .verify_password(password.as_bytes(), &parsed)
        .is_ok()
}

/// Creates the account, relying on the unique index for duplicate detection.
pub async fn register(pool: &PgPool, registration: &Registration) -> AppResult<User> {
    validate_registration(registration)?;
    let password_hash = hash_password(&registration.password)?;

    let user = sqlx::query_as::<_, User>(
        r#"
        INSERT INTO users (username, email, password_hash)
        VALUES ($1, $2, $3)
        ON CONFLICT (username) DO NOTHING
        RETURNING *
        "#,
    )
    .bind(registration.username.trim())
    .bind(registration.email.trim())
    .bind(&password_hash)
    .fetch_optional(pool)
    .await?
    .ok_or_else(|| {
        AppError::Validation("A user with that username already exists".to_string())
    })?;

    tracing::info!(user_id = user.id, username = %user.username, "User registered");
    Ok(user)
}

/// Checks credentials against the stored hash.
///
/// Unknown usernames and wrong passwords produce the same error, so the
/// response does not reveal which of the two was at fault.
pub async fn authenticate(pool: &PgPool, username: &str, password: &str) -> AppResult<User> {
    let user = sqlx::query_as::<_, User>(
        "SELECT * FROM users WHERE username = $1 AND is_active = TRUE",
    )
    .bind(username)
    .fetch_optional(pool)
    .await?;

    match user {
        Some(user) if verify_password(password, &user.password_hash) => Ok(user),
        _ => Err(AppError::Validation("Invalid credentials".to_string())),
    }
}

pub async fn find_active_user(pool: &PgPool, id: i64) -> AppResult<Option<User>> {
    let user =
        sqlx::query_as::<_, User>("SELECT * FROM users WHERE id = $1 AND is_active = TRUE")
            .bind(id)
            .fetch_optional(pool)
            .await?;
    Ok(user)
}

/// Partial profile update; absent fields keep their current value.
#[derive(Debug, Default, serde::Deserialize)]
pub struct ProfileUpdate {
    pub email: Option<String>,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
}

pub async fn update_profile(pool: &PgPool, user_id: i64, update: &ProfileUpdate) -> AppResult<User> {
    let user = sqlx::query_as::<_, User>(
        r#"
        UPDATE users
        SET email = COALESCE($2, email),
            first_name = COALESCE($3, first_name),
            last_name = COALESCE($4, last_name)
        WHERE id = $1
        RETURNING *
        "#,
    )
    .bind(user_id)
    .bind(update.email.as_deref())
    .bind(update.first_name.as_deref())
    .bind(update.last_name.as_deref())
    .fetch_optional(pool)
    .await?
    .ok_or_else(|| AppError::NotFound("User not found".to_string()))?;

    Ok(user)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn registration(password: &str, password2: &str) -> Registration {
        Registration {
            username: "alice".to_string(),
            email: "alice@example.com".to_string(),
            password: password.to_string(),
            password2: password2.to_string(),
        }
    }

    #[test]
    fn test_valid_registration_passes() {
        assert!(validate_registration(&registration("pw12345678", "pw12345678")).is_ok());
    }

    #[test]
    fn test_mismatched_passwords_rejected() {
        let err = validate_registration(&registration("pw12345678", "pw87654321")).unwrap_err();
        assert!(matches!(err, AppError::Validation(_)));
    }

    #[test]
    fn test_short_password_rejected() {
        let err = validate_registration(&registration("short", "short")).unwrap_err();
        assert!(matches!(err, AppError::Validation(_)));
    }

    #[test]
    fn test_blank_username_rejected() {
        let mut reg = registration("pw12345678", "pw12345678");
        reg.username = "   ".to_string();
        assert!(validate_registration(&reg).is_err());
    }

    #[test]
    fn test_blank_email_rejected() {
        let mut reg = registration("pw12345678", "pw12345678");
        reg.email = String::new();
        assert!(validate_registration(&reg).is_err());
    }

    #[test]
    fn test_password_hash_roundtrip() {
        let hash = hash_password("pw12345678").unwrap();
        assert!(hash.starts_with("$argon2"));
        assert!(verify_password("pw12345678", &hash));
        assert!(!verify_password("pw12345679", &hash));
    }

    #[test]
    fn test_verify_against_garbage_hash_is_false() {
        assert!(!verify_password("pw12345678", "not-a-phc-string"));
    }
}
