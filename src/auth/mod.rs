//! Account registration and login.
//!
//! Admin accounts (the `users` table) store a salted SHA-256 hash; employee
//! records keep the credential exactly as the admin entered it and are
//! compared directly. Hardening beyond this comparison is out of scope.

use rand_core::{OsRng, RngCore};
use sha2::{Digest, Sha256};

use crate::error::ApiError;
use crate::storage::{EmployeeRow, Storage, UserRow};

const HASH_SCHEME: &str = "sha256";

/// Outcome of the combined login endpoint: which table matched.
pub enum LoginIdentity {
    Admin(UserRow),
    Employee(EmployeeRow),
}

/// `sha256$<salt hex>$<digest hex>` with a fresh 16-byte salt.
pub fn hash_password(password: &str) -> String {
    let mut salt = [0u8; 16];
    OsRng.fill_bytes(&mut salt);
    let digest = digest_with_salt(&salt, password);
    format!("{HASH_SCHEME}${}${}", hex::encode(salt), hex::encode(digest))
}

/// Check `given` against a stored `sha256$salt$digest` string. Unparseable
/// stored values never verify.
pub fn verify_password(stored: &str, given: &str) -> bool {
    let mut parts = stored.splitn(3, '$');
    let (scheme, salt_hex, digest_hex) = match (parts.next(), parts.next(), parts.next()) {
        (Some(scheme), Some(salt), Some(digest)) => (scheme, salt, digest),
        _ => return false,
    };
    if scheme != HASH_SCHEME {
        return false;
    }
    let salt = match hex::decode(salt_hex) {
        Ok(s) => s,
        Err(_) => return false,
    };
    hex::encode(digest_with_salt(&salt, given)) == digest_hex
}

fn digest_with_salt(salt: &[u8], password: &str) -> [u8; 32] {
    let mut hasher = Sha256::new();
    hasher.update(salt);
    hasher.update(password.as_bytes());
    hasher.finalize().into()
}

fn is_unique_violation(e: &sqlx::Error) -> bool {
    matches!(e, sqlx::Error::Database(db) if db.is_unique_violation())
}

// ─── Account operations ───────────────────────────────────────────────────────

pub async fn register(storage: &Storage, email: &str, password: &str) -> Result<UserRow, ApiError> {
    if email.is_empty() || password.is_empty() {
        return Err(ApiError::InvalidInput("email and password required".into()));
    }
    storage
        .create_user(email, &hash_password(password))
        .await
        .map_err(|e| {
            if is_unique_violation(&e) {
                ApiError::Conflict("user already exists".into())
            } else {
                e.into()
            }
        })
}

/// Admin login against the `users` table.
pub async fn login(storage: &Storage, email: &str, password: &str) -> Result<UserRow, ApiError> {
    if email.is_empty() || password.is_empty() {
        return Err(ApiError::InvalidInput("email and password required".into()));
    }
    let user = storage
        .get_user_by_email(email)
        .await?
        .ok_or_else(|| ApiError::NotFound("user not found".into()))?;
    if !verify_password(&user.password, password) {
        return Err(ApiError::Unauthorized("invalid password".into()));
    }
    Ok(user)
}

/// Combined login: try admin first, then fall back to an employee record
/// matched by username. Either both lookups miss or the credential is wrong —
/// the caller cannot tell which.
pub async fn combined_login(
    storage: &Storage,
    identifier: &str,
    password: &str,
) -> Result<LoginIdentity, ApiError> {
    if identifier.is_empty() || password.is_empty() {
        return Err(ApiError::InvalidInput("missing email or password".into()));
    }

    if let Some(user) = storage.get_user_by_email(identifier).await? {
        if verify_password(&user.password, password) {
            return Ok(LoginIdentity::Admin(user));
        }
    }

    if let Some(employee) = storage.get_employee_by_username(identifier).await? {
        if employee.password == password {
            return Ok(LoginIdentity::Employee(employee));
        }
    }

    Err(ApiError::Unauthorized("invalid credentials".into()))
}
