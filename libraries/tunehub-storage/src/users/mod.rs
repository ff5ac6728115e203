//! User accounts, credentials, and one-time token queries

use sqlx::sqlite::SqliteRow;
use sqlx::{Row, SqlitePool};
use tunehub_core::{error::Result, types::*};

const COLUMNS: &str = "id, name, age, gender, email, role, is_verified, created_at, \
                       password_hash, password_changed_at";

/// A user together with the secrets needed to authenticate them
#[derive(Debug, Clone)]
pub struct Credentials {
    pub user: User,
    /// bcrypt hash
    pub password_hash: String,
    pub password_changed_at: Option<String>,
}

fn user_from_row(row: &SqliteRow) -> Result<User> {
    let gender: String = row.try_get("gender")?;
    let role: String = row.try_get("role")?;
    Ok(User {
        id: row.try_get("id")?,
        name: row.try_get("name")?,
        age: row.try_get("age")?,
        gender: gender.parse()?,
        email: row.try_get("email")?,
        role: role.parse()?,
        is_verified: row.try_get("is_verified")?,
        created_at: row.try_get("created_at")?,
    })
}

fn credentials_from_row(row: &SqliteRow) -> Result<Credentials> {
    Ok(Credentials {
        user: user_from_row(row)?,
        password_hash: row.try_get("password_hash")?,
        password_changed_at: row.try_get("password_changed_at")?,
    })
}

/// Create an account
///
/// The account starts unverified when an email verification token is given,
/// verified otherwise. A taken email surfaces as `TuneError::Duplicate`.
pub async fn create(
    pool: &SqlitePool,
    user: &NewUser,
    password_hash: &str,
    verification: Option<&TokenDigest>,
) -> Result<User> {
    let id = UserId::generate();
    let created_at = timestamp::now();

    sqlx::query(
        r#"
        INSERT INTO users (
            id, name, age, gender, email, password_hash, role, is_verified,
            email_verification_digest, email_verification_expires_at, created_at
        )
        VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
        "#,
    )
    .bind(&id)
    .bind(&user.name)
    .bind(user.age)
    .bind(user.gender.as_str())
    .bind(&user.email)
    .bind(password_hash)
    .bind(user.role.as_str())
    .bind(verification.is_none())
    .bind(verification.map(|t| t.digest.as_str()))
    .bind(verification.map(|t| t.expires_at.as_str()))
    .bind(&created_at)
    .execute(pool)
    .await?;

    Ok(User {
        id,
        name: user.name.clone(),
        age: user.age,
        gender: user.gender,
        email: user.email.clone(),
        role: user.role,
        is_verified: verification.is_none(),
        created_at,
    })
}

pub async fn get_by_id(pool: &SqlitePool, id: &UserId) -> Result<Option<User>> {
    Ok(get_credentials_by_id(pool, id).await?.map(|c| c.user))
}

pub async fn get_credentials_by_id(pool: &SqlitePool, id: &UserId) -> Result<Option<Credentials>> {
    let row = sqlx::query(&format!("SELECT {COLUMNS} FROM users WHERE id = ?"))
        .bind(id)
        .fetch_optional(pool)
        .await?;

    row.as_ref().map(credentials_from_row).transpose()
}

pub async fn get_credentials_by_email(
    pool: &SqlitePool,
    email: &str,
) -> Result<Option<Credentials>> {
    let row = sqlx::query(&format!("SELECT {COLUMNS} FROM users WHERE email = ?"))
        .bind(email)
        .fetch_optional(pool)
        .await?;

    row.as_ref().map(credentials_from_row).transpose()
}

/// Get all users
pub async fn get_all(pool: &SqlitePool) -> Result<Vec<User>> {
    let rows = sqlx::query(&format!("SELECT {COLUMNS} FROM users ORDER BY created_at, rowid"))
        .fetch_all(pool)
        .await?;

    rows.iter().map(user_from_row).collect()
}

/// Delete a user; returns whether a row was removed
pub async fn delete(pool: &SqlitePool, id: &UserId) -> Result<bool> {
    let result = sqlx::query("DELETE FROM users WHERE id = ?")
        .bind(id)
        .execute(pool)
        .await?;

    Ok(result.rows_affected() > 0)
}

/// Mark the account verified if `digest` matches its pending, unexpired
/// verification token
pub async fn verify_email(
    pool: &SqlitePool,
    email: &str,
    digest: &str,
    now: &str,
) -> Result<Option<User>> {
    let result = sqlx::query(
        r#"
        UPDATE users
        SET is_verified = 1,
            email_verification_digest = NULL,
            email_verification_expires_at = NULL
        WHERE email = ?
          AND email_verification_digest = ?
          AND email_verification_expires_at > ?
        "#,
    )
    .bind(email)
    .bind(digest)
    .bind(now)
    .execute(pool)
    .await?;

    if result.rows_affected() == 0 {
        return Ok(None);
    }
    Ok(get_credentials_by_email(pool, email).await?.map(|c| c.user))
}

/// Store a password reset token; returns false when no account has `email`
pub async fn set_password_reset(pool: &SqlitePool, email: &str, token: &TokenDigest) -> Result<bool> {
    let result = sqlx::query(
        r#"
        UPDATE users
        SET password_reset_digest = ?, password_reset_expires_at = ?
        WHERE email = ?
        "#,
    )
    .bind(&token.digest)
    .bind(&token.expires_at)
    .bind(email)
    .execute(pool)
    .await?;

    Ok(result.rows_affected() > 0)
}

pub async fn clear_password_reset(pool: &SqlitePool, email: &str) -> Result<()> {
    sqlx::query(
        r#"
        UPDATE users
        SET password_reset_digest = NULL, password_reset_expires_at = NULL
        WHERE email = ?
        "#,
    )
    .bind(email)
    .execute(pool)
    .await?;

    Ok(())
}

/// Replace the password of the account holding the unexpired reset token
/// `digest`, consuming the token and recording `now` as the change time
pub async fn reset_password(
    pool: &SqlitePool,
    digest: &str,
    password_hash: &str,
    now: &str,
) -> Result<Option<User>> {
    let mut tx = pool.begin().await?;

    let id: Option<UserId> = sqlx::query_scalar(
        r#"
        SELECT id FROM users
        WHERE password_reset_digest = ? AND password_reset_expires_at > ?
        "#,
    )
    .bind(digest)
    .bind(now)
    .fetch_optional(&mut *tx)
    .await?;

    let Some(id) = id else {
        return Ok(None);
    };

    sqlx::query(
        r#"
        UPDATE users
        SET password_hash = ?,
            password_changed_at = ?,
            password_reset_digest = NULL,
            password_reset_expires_at = NULL
        WHERE id = ?
        "#,
    )
    .bind(password_hash)
    .bind(now)
    .bind(&id)
    .execute(&mut *tx)
    .await?;

    tx.commit().await?;

    get_by_id(pool, &id).await
}
