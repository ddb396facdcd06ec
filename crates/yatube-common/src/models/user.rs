//! User model: identities are owned by the auth layer and only referenced here.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::sync::LazyLock;
use validator::Validate;

/// A registered account.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct User {
    pub id: i64,

    /// Unique username (3-150 chars, letters, digits and @.+-_)
    pub username: String,

    pub first_name: String,

    pub last_name: String,

    /// Argon2id password hash
    #[serde(skip_serializing)]
    pub password_hash: String,

    pub date_joined: DateTime<Utc>,
}

impl User {
    /// "First Last", trimmed; empty when neither name is set.
    pub fn full_name(&self) -> String {
        full_name(&self.first_name, &self.last_name)
    }
}

pub(crate) fn full_name(first: &str, last: &str) -> String {
    format!("{first} {last}").trim().to_string()
}

/// Author reference embedded in post and comment views.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AuthorSummary {
    pub id: i64,
    pub username: String,
    pub full_name: String,
}

/// Safe user representation for views (no password hash).
#[derive(Debug, Clone, Serialize)]
pub struct UserResponse {
    pub id: i64,
    pub username: String,
    pub first_name: String,
    pub last_name: String,
    pub full_name: String,
    pub date_joined: DateTime<Utc>,
}

impl From<User> for UserResponse {
    fn from(u: User) -> Self {
        let full_name = u.full_name();
        Self {
            id: u.id,
            username: u.username,
            first_name: u.first_name,
            last_name: u.last_name,
            full_name,
            date_joined: u.date_joined,
        }
    }
}

/// Sign-up form.
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
pub struct SignupForm {
    #[validate(length(min = 3, max = 150, message = "Username must be 3-150 characters"))]
    #[validate(regex(
        path = *USERNAME_REGEX,
        message = "Username can only contain letters, numbers and @/./+/-/_ characters"
    ))]
    pub username: String,

    #[serde(default, skip_serializing)]
    #[validate(length(min = 8, max = 128, message = "Password must be 8-128 characters"))]
    pub password: String,

    #[serde(default)]
    #[validate(length(max = 150))]
    pub first_name: String,

    #[serde(default)]
    #[validate(length(max = 150))]
    pub last_name: String,
}

/// Login form.
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
pub struct LoginForm {
    #[validate(length(min = 1, message = "This field is required."))]
    pub username: String,

    #[serde(default, skip_serializing)]
    #[validate(length(min = 1, message = "This field is required."))]
    pub password: String,
}

static USERNAME_REGEX: LazyLock<regex::Regex> =
    LazyLock::new(|| regex::Regex::new(r"^[\w.@+-]+$").unwrap());

#[cfg(test)]
mod tests {
    use super::*;
    use crate::validation::validate_form;

    fn user(first: &str, last: &str) -> User {
        User {
            id: 1,
            username: "leo".into(),
            first_name: first.into(),
            last_name: last.into(),
            password_hash: String::new(),
            date_joined: Utc::now(),
        }
    }

    #[test]
    fn full_name_skips_missing_parts() {
        assert_eq!(user("", "").full_name(), "");
        assert_eq!(user("Лев", "Толстой").full_name(), "Лев Толстой");
        assert_eq!(user("Лев", "").full_name(), "Лев");
    }

    #[test]
    fn signup_rejects_bad_usernames() {
        let form = SignupForm {
            username: "no spaces".into(),
            password: "long-enough".into(),
            ..Default::default()
        };
        let errors = validate_form(&form).unwrap_err();
        assert_eq!(errors.field("username").len(), 1);
        assert!(errors.field("password").is_empty());
    }

    #[test]
    fn signup_accepts_unicode_letters() {
        let form = SignupForm {
            username: "лев_1828".into(),
            password: "long-enough".into(),
            ..Default::default()
        };
        assert!(validate_form(&form).is_ok());
    }
}
