use serde::{Deserialize, Serialize};

use crate::error::ApiError;
use crate::users::repo::SafeUser;
use crate::validation::{is_valid_email, FieldErrors};

/// Owner sub-object attached to bookings and calendars; the safe subset of
/// the owning user.
#[derive(Debug, Clone, Serialize)]
pub struct Owner {
    pub id: i32,
    pub email: String,
    pub name: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct CreateUserRequest {
    pub email: Option<String>,
    pub password: Option<String>,
    pub name: Option<String>,
}

/// Validated creation payload; the password is still plaintext here and is
/// hashed by the handler before it reaches storage.
#[derive(Debug)]
pub struct NewUser {
    pub email: String,
    pub password: String,
    pub name: Option<String>,
}

fn is_strong_password(password: &str) -> bool {
    password.len() >= 8
        && password.chars().any(|c| c.is_ascii_lowercase())
        && password.chars().any(|c| c.is_ascii_uppercase())
        && password.chars().any(|c| c.is_ascii_digit())
        && password.chars().any(|c| "@$!%*?&".contains(c))
}

impl CreateUserRequest {
    pub fn validate(self) -> Result<NewUser, ApiError> {
        let mut errors = FieldErrors::new();

        let email = self
            .email
            .map(|e| e.trim().to_lowercase())
            .filter(|e| !e.is_empty());
        match &email {
            None => errors.push("email", "Email is required"),
            Some(e) if !is_valid_email(e) => errors.push("email", "Invalid email format"),
            _ => {}
        }

        match &self.password {
            None => errors.push("password", "Password is required"),
            Some(p) if p.len() < 8 => {
                errors.push("password", "Password must be at least 8 characters long")
            }
            Some(p) if !is_strong_password(p) => errors.push(
                "password",
                "Password must contain at least one uppercase letter, one lowercase letter, one number, and one special character",
            ),
            _ => {}
        }

        errors.into_result("Invalid user data")?;
        Ok(NewUser {
            email: email.unwrap_or_default(),
            password: self.password.unwrap_or_default(),
            name: self.name,
        })
    }
}

#[derive(Debug, Deserialize)]
pub struct UpdateUserRequest {
    pub email: Option<String>,
    pub name: Option<String>,
}

#[derive(Debug)]
pub struct UserChanges {
    pub email: Option<String>,
    pub name: Option<String>,
}

impl UpdateUserRequest {
    pub fn validate(self) -> Result<UserChanges, ApiError> {
        if self.email.is_none() && self.name.is_none() {
            return Err(ApiError::BadRequest(
                "At least one field is required to update".into(),
            ));
        }
        let email = self.email.map(|e| e.trim().to_lowercase());
        if let Some(e) = &email {
            if !is_valid_email(e) {
                let mut errors = FieldErrors::new();
                errors.push("email", "Invalid email format");
                errors.into_result("Invalid user data")?;
            }
        }
        Ok(UserChanges {
            email,
            name: self.name,
        })
    }
}

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub email: Option<String>,
    pub password: Option<String>,
}

impl LoginRequest {
    pub fn validate(self) -> Result<(String, String), ApiError> {
        let mut errors = FieldErrors::new();
        let email = self
            .email
            .map(|e| e.trim().to_lowercase())
            .filter(|e| !e.is_empty());
        match &email {
            None => errors.push("email", "Email is required"),
            Some(e) if !is_valid_email(e) => errors.push("email", "Invalid email format"),
            _ => {}
        }
        if self.password.as_deref().unwrap_or("").is_empty() {
            errors.push("password", "Password is required");
        }
        errors.into_result("Invalid login data")?;
        Ok((email.unwrap_or_default(), self.password.unwrap_or_default()))
    }
}

#[derive(Debug, Serialize)]
pub struct LoginResponse {
    pub token: String,
    pub user: SafeUser,
}
