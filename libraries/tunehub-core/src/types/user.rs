/// User domain types
use crate::error::{Result, TuneError};
use crate::types::validate::required_text;
use crate::types::{timestamp, UserId};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

pub const MIN_AGE: i64 = 12;
pub const MAX_AGE: i64 = 120;
pub const MIN_PASSWORD_LEN: usize = 8;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Gender {
    Male,
    Female,
    Other,
}

impl Gender {
    pub fn as_str(self) -> &'static str {
        match self {
            Gender::Male => "male",
            Gender::Female => "female",
            Gender::Other => "other",
        }
    }
}

impl FromStr for Gender {
    type Err = TuneError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim() {
            "male" => Ok(Gender::Male),
            "female" => Ok(Gender::Female),
            "other" => Ok(Gender::Other),
            _ => Err(TuneError::validation(
                "Gender must be either male, female or other.",
            )),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Admin,
}

impl Role {
    pub fn as_str(self) -> &'static str {
        match self {
            Role::User => "user",
            Role::Admin => "admin",
        }
    }
}

impl FromStr for Role {
    type Err = TuneError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "user" => Ok(Role::User),
            "admin" => Ok(Role::Admin),
            other => Err(TuneError::validation(format!("Unknown role '{other}'"))),
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// User account as exposed by the API (no secrets)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub id: UserId,
    pub name: String,
    pub age: i64,
    pub gender: Gender,
    pub email: String,
    pub role: Role,
    pub is_verified: bool,
    pub created_at: String,
}

/// Sign-up request body
#[derive(Debug, Clone, Default, Deserialize)]
pub struct SignUp {
    pub name: Option<String>,
    pub age: Option<i64>,
    pub gender: Option<String>,
    pub email: Option<String>,
    pub password: Option<String>,
}

/// Validated account data, password still in plain text
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewUser {
    pub name: String,
    pub age: i64,
    pub gender: Gender,
    pub email: String,
    pub password: String,
    pub role: Role,
}

impl SignUp {
    /// Apply the account constraints; new accounts always get the `user` role
    pub fn validate(self) -> Result<NewUser> {
        let name = required_text(self.name, "A user must have a name.", "User", "name", (2, 40))?;

        let age = self
            .age
            .ok_or_else(|| TuneError::validation("A user must have an age."))?;
        if age < MIN_AGE {
            return Err(TuneError::validation(format!(
                "The user must be at least {MIN_AGE} years old."
            )));
        }
        if age > MAX_AGE {
            return Err(TuneError::validation(format!(
                "The user must be at most {MAX_AGE} years old."
            )));
        }

        let gender = self
            .gender
            .ok_or_else(|| TuneError::validation("A user must have a gender."))?
            .parse()?;

        let email = normalize_email(
            self.email
                .as_deref()
                .ok_or_else(|| TuneError::validation("A user must have an email address."))?,
        )?;

        let password = self
            .password
            .ok_or_else(|| TuneError::validation("A user must have a password."))?;
        validate_password(&password)?;

        Ok(NewUser {
            name,
            age,
            gender,
            email,
            password,
            role: Role::User,
        })
    }
}

/// Trim, lowercase, and sanity-check an email address
pub fn normalize_email(raw: &str) -> Result<String> {
    let email = raw.trim().to_lowercase();
    let invalid = || TuneError::validation("Please provide a valid email address.");

    let (local, domain) = email.split_once('@').ok_or_else(invalid)?;
    let domain_ok = domain.contains('.')
        && !domain.contains('@')
        && domain.split('.').all(|label| !label.is_empty());
    if local.is_empty() || !domain_ok || email.chars().any(char::is_whitespace) {
        return Err(invalid());
    }
    Ok(email)
}

pub fn validate_password(password: &str) -> Result<()> {
    if password.chars().count() < MIN_PASSWORD_LEN {
        return Err(TuneError::validation(format!(
            "Password must be at least {MIN_PASSWORD_LEN} characters long."
        )));
    }
    Ok(())
}

/// Stored form of a one-time token (email verification, password reset)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TokenDigest {
    /// Hex SHA-256 of the token that was mailed out
    pub digest: String,
    pub expires_at: String,
}

impl TokenDigest {
    pub fn is_expired_at(&self, now: &str) -> bool {
        self.expires_at.as_str() <= now
    }
}

/// Whether a token issued at `issued_at` (unix seconds) predates a password change
pub fn issued_before_password_change(issued_at: i64, password_changed_at: Option<&str>) -> bool {
    password_changed_at
        .and_then(timestamp::parse)
        .is_some_and(|changed| issued_at < changed.timestamp())
}
