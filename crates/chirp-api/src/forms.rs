//! Request validation mirroring the HTML form schemas: required fields,
//! e-mail shape, password length, message length. Anything deeper (unique
//! usernames, ownership) belongs to the services.

use chirp_types::api::{LoginRequest, ProfileUpdateRequest, SignupRequest};

use crate::board::MESSAGE_MAX_LEN;
use crate::error::{AppError, AppResult};

pub const PASSWORD_MIN_LEN: usize = 6;

pub fn validate_signup(req: &SignupRequest) -> AppResult<()> {
    require(&req.username, "Username")?;
    valid_email(&req.email)?;
    min_password(&req.password)
}

pub fn validate_login(req: &LoginRequest) -> AppResult<()> {
    require(&req.username, "Username")?;
    min_password(&req.password)
}

pub fn validate_profile_update(req: &ProfileUpdateRequest) -> AppResult<()> {
    require(&req.username, "Username")?;
    valid_email(&req.email)?;
    min_password(&req.password)
}

pub fn validate_message(text: &str) -> AppResult<()> {
    require(text, "Text")?;
    if text.chars().count() > MESSAGE_MAX_LEN {
        return Err(AppError::Validation(format!(
            "Text must be at most {MESSAGE_MAX_LEN} characters"
        )));
    }
    Ok(())
}

fn require(value: &str, field: &str) -> AppResult<()> {
    if value.is_empty() {
        return Err(AppError::Validation(format!("{field} is required")));
    }
    Ok(())
}

fn min_password(password: &str) -> AppResult<()> {
    if password.chars().count() < PASSWORD_MIN_LEN {
        return Err(AppError::Validation(format!(
            "Password must be at least {PASSWORD_MIN_LEN} characters"
        )));
    }
    Ok(())
}

/// Just enough of an address check for a form: one '@' with something on
/// both sides, and a dot somewhere in the domain.
fn valid_email(email: &str) -> AppResult<()> {
    require(email, "E-mail")?;
    let well_formed = match email.split_once('@') {
        Some((local, domain)) => {
            !local.is_empty() && !domain.is_empty() && domain.contains('.') && !domain.contains('@')
        }
        None => false,
    };
    if !well_formed {
        return Err(AppError::Validation("E-mail is not a valid address".into()));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chirp_types::api::SignupRequest;

    fn signup(username: &str, email: &str, password: &str) -> SignupRequest {
        SignupRequest {
            username: username.into(),
            email: email.into(),
            password: password.into(),
            image_url: None,
        }
    }

    #[test]
    fn signup_accepts_well_formed_input() {
        assert!(validate_signup(&signup("user1", "user1@user1.com", "password")).is_ok());
    }

    #[test]
    fn signup_rejects_short_password() {
        assert!(validate_signup(&signup("user1", "user1@user1.com", "pass")).is_err());
    }

    #[test]
    fn signup_rejects_bad_email() {
        for email in ["", "user1", "@user1.com", "user1@", "user1@com", "a@b@c.com"] {
            assert!(
                validate_signup(&signup("user1", email, "password")).is_err(),
                "accepted {email:?}"
            );
        }
    }

    #[test]
    fn message_length_boundary() {
        assert!(validate_message(&"x".repeat(140)).is_ok());
        assert!(validate_message(&"x".repeat(141)).is_err());
        assert!(validate_message("").is_err());
    }
}
