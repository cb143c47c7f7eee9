//! User wire format

use serde::{Deserialize, Serialize};

use super::require;
use crate::{
    error::{ApiError, ApiResult, FieldErrors},
    models::{NewUser, UpdateUser, User},
    password::hash_password,
    validation::{validate_email, validate_max_len, validate_password, validate_username},
};

/// Public view of a user; the password hash never leaves the service
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct UserOut {
    pub id: i64,
    pub username: String,
    pub email: String,
    pub first_name: String,
    pub last_name: String,
}

impl From<&User> for UserOut {
    fn from(user: &User) -> Self {
        Self {
            id: user.id,
            username: user.username.clone(),
            email: user.email.clone(),
            first_name: user.first_name.clone(),
            last_name: user.last_name.clone(),
        }
    }
}

/// User create/update body; `password` is write-only
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct UserInput {
    pub username: Option<String>,
    pub email: Option<String>,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub password: Option<String>,
}

impl UserInput {
    fn validate(&self, partial: bool) -> FieldErrors {
        let mut errors = FieldErrors::new();

        if let Some(username) = require(&mut errors, "username", &self.username, partial) {
            errors.check("username", validate_username(username));
        }
        if let Some(email) = &self.email {
            errors.check("email", validate_email(email));
        }
        for (field, value) in [
            ("first_name", &self.first_name),
            ("last_name", &self.last_name),
        ] {
            if let Some(value) = value {
                errors.check(field, validate_max_len(value, Some(150)));
            }
        }
        if let Some(password) = require(&mut errors, "password", &self.password, partial) {
            errors.check("password", validate_password(password));
        }

        errors
    }

    /// Validate a create body and hash its password
    pub fn into_new(self) -> ApiResult<NewUser> {
        let errors = self.validate(false);
        let (Some(username), Some(password)) = (self.username, self.password) else {
            return Err(errors.into());
        };
        if !errors.is_empty() {
            return Err(errors.into());
        }

        Ok(NewUser {
            username,
            email: self.email.unwrap_or_default(),
            first_name: self.first_name.unwrap_or_default(),
            last_name: self.last_name.unwrap_or_default(),
            password_hash: hashed(&password)?,
        })
    }

    /// Validate an update body; a present password is re-hashed
    pub fn into_update(self, partial: bool) -> ApiResult<UpdateUser> {
        let errors = self.validate(partial);
        if !errors.is_empty() {
            return Err(errors.into());
        }

        Ok(UpdateUser {
            username: self.username,
            email: self.email,
            first_name: self.first_name,
            last_name: self.last_name,
            password_hash: self.password.as_deref().map(hashed).transpose()?,
        })
    }
}

/// Hash for storage; a hashing failure is a server fault, not bad input
pub fn hashed(password: &str) -> ApiResult<String> {
    hash_password(password).map_err(|e| ApiError::internal("Failed to hash password", e))
}
