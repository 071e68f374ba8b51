//! User accounts and authentication.
//!
//! Passwords are stored as `base64(salt)$base64(hash)` derived with
//! PBKDF2-HMAC-SHA256. Authentication failures are reported with one
//! generic message whether the login or the password was wrong.

use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine;
use pbkdf2::pbkdf2_hmac;
use rand::RngCore;
use rusqlite::Connection;
use sha2::Sha256;
use subtle::ConstantTimeEq;
use tracing::info;

use crate::db::repository;
use crate::error::ServiceError;
use crate::models::{User, UserRole};
use crate::validation;

pub const PBKDF2_ITERATIONS: u32 = 600_000;
const SALT_LENGTH: usize = 16;
const HASH_LENGTH: usize = 32;

const BAD_CREDENTIALS: &str = "invalid login or password";

pub fn hash_password(password: &str) -> String {
    let mut salt = [0u8; SALT_LENGTH];
    rand::thread_rng().fill_bytes(&mut salt);

    let mut hash = [0u8; HASH_LENGTH];
    pbkdf2_hmac::<Sha256>(password.as_bytes(), &salt, PBKDF2_ITERATIONS, &mut hash);

    format!("{}${}", BASE64.encode(salt), BASE64.encode(hash))
}

pub fn verify_password(password: &str, stored: &str) -> bool {
    let Some((salt, expected)) = stored.split_once('$') else {
        return false;
    };
    let (Ok(salt), Ok(expected)) = (BASE64.decode(salt), BASE64.decode(expected)) else {
        return false;
    };
    if expected.len() != HASH_LENGTH {
        return false;
    }

    let mut hash = vec![0u8; expected.len()];
    pbkdf2_hmac::<Sha256>(password.as_bytes(), &salt, PBKDF2_ITERATIONS, &mut hash);
    hash.ct_eq(&expected).into()
}

pub fn authenticate(
    conn: &Connection,
    login: &str,
    password: &str,
) -> Result<User, ServiceError> {
    if !validation::is_not_blank(login) || !validation::is_not_blank(password) {
        return Err(ServiceError::Authentication(
            "login and password are required".into(),
        ));
    }

    let user = repository::get_user_by_login(conn, login.trim())?
        .ok_or_else(|| ServiceError::Authentication(BAD_CREDENTIALS.into()))?;

    if !verify_password(password, &user.password_hash) {
        return Err(ServiceError::Authentication(BAD_CREDENTIALS.into()));
    }

    info!("Authenticated user {}", user.login);
    Ok(user)
}

pub fn create_doctor(conn: &Connection, login: &str, password: &str) -> Result<User, ServiceError> {
    create_user(conn, login, password, UserRole::Doctor)
}

pub fn create_assistant(
    conn: &Connection,
    login: &str,
    password: &str,
) -> Result<User, ServiceError> {
    create_user(conn, login, password, UserRole::Assistant)
}

pub fn create_user(
    conn: &Connection,
    login: &str,
    password: &str,
    role: UserRole,
) -> Result<User, ServiceError> {
    let login = login.trim();
    validate_login(login)?;
    validate_password(password)?;

    if repository::get_user_by_login(conn, login)?.is_some() {
        return Err(ServiceError::business("this login is already taken"));
    }

    let mut user = User {
        id: 0,
        login: login.to_string(),
        password_hash: hash_password(password),
        role,
        created_at: None,
    };
    user.id = repository::insert_user(conn, &user)?;
    info!("Created {} account {}", role.as_str(), user.login);
    Ok(user)
}

pub fn change_password(
    conn: &Connection,
    user_id: i64,
    current: &str,
    new_password: &str,
) -> Result<(), ServiceError> {
    let user = repository::get_user_by_id(conn, user_id)?
        .ok_or(ServiceError::not_found("user", user_id))?;

    if !verify_password(current, &user.password_hash) {
        return Err(ServiceError::Authentication(
            "current password is incorrect".into(),
        ));
    }

    validate_password(new_password)?;
    repository::update_user_password(conn, user_id, &hash_password(new_password))?;
    info!("Changed password for user {}", user.login);
    Ok(())
}

fn validate_login(login: &str) -> Result<(), ServiceError> {
    if !validation::is_not_blank(login) {
        return Err(ServiceError::validation("login", "login is required"));
    }
    if login.chars().count() < 3 {
        return Err(ServiceError::validation(
            "login",
            "login must contain at least 3 characters",
        ));
    }
    Ok(())
}

fn validate_password(password: &str) -> Result<(), ServiceError> {
    if !validation::is_not_blank(password) {
        return Err(ServiceError::validation("password", "password is required"));
    }
    if password.chars().count() < 6 {
        return Err(ServiceError::validation(
            "password",
            "password must contain at least 6 characters",
        ));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::open_memory_database;

    #[test]
    fn hash_and_verify_round_trip() {
        let stored = hash_password("s3cret-pass");
        assert!(verify_password("s3cret-pass", &stored));
        assert!(!verify_password("wrong-pass", &stored));
    }

    #[test]
    fn hashes_are_salted() {
        assert_ne!(hash_password("s3cret-pass"), hash_password("s3cret-pass"));
    }

    #[test]
    fn malformed_stored_hash_never_verifies() {
        assert!(!verify_password("anything", "not-a-hash"));
        assert!(!verify_password("anything", "!!$!!"));
        assert!(!verify_password("anything", "$"));
    }

    #[test]
    fn authenticate_accepts_valid_credentials() {
        let conn = open_memory_database().unwrap();
        let created = create_doctor(&conn, "dr.mansouri", "s3cret-pass").unwrap();

        let user = authenticate(&conn, "dr.mansouri", "s3cret-pass").unwrap();
        assert_eq!(user.id, created.id);
        assert!(user.is_doctor());
    }

    #[test]
    fn authenticate_fails_with_one_generic_message() {
        let conn = open_memory_database().unwrap();
        create_doctor(&conn, "dr.mansouri", "s3cret-pass").unwrap();

        let unknown = authenticate(&conn, "nobody", "s3cret-pass");
        let wrong = authenticate(&conn, "dr.mansouri", "wrong-pass");
        for err in [unknown, wrong] {
            match err {
                Err(ServiceError::Authentication(message)) => {
                    assert_eq!(message, BAD_CREDENTIALS)
                }
                other => panic!("expected authentication error, got {other:?}"),
            }
        }
    }

    #[test]
    fn create_user_rejects_short_password_and_duplicate_login() {
        let conn = open_memory_database().unwrap();
        assert!(matches!(
            create_assistant(&conn, "sec.naima", "short"),
            Err(ServiceError::Validation { field: "password", .. })
        ));

        create_assistant(&conn, "sec.naima", "longenough").unwrap();
        assert!(matches!(
            create_assistant(&conn, "sec.naima", "longenough"),
            Err(ServiceError::Business(_))
        ));
    }

    #[test]
    fn change_password_requires_the_current_one() {
        let conn = open_memory_database().unwrap();
        let user = create_doctor(&conn, "dr.mansouri", "s3cret-pass").unwrap();

        assert!(matches!(
            change_password(&conn, user.id, "wrong-pass", "new-secret"),
            Err(ServiceError::Authentication(_))
        ));

        change_password(&conn, user.id, "s3cret-pass", "new-secret").unwrap();
        assert!(authenticate(&conn, "dr.mansouri", "new-secret").is_ok());
    }
}
