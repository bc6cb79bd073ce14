//! Axum route handler for the post-signup welcome email.

use axum::{extract::State, Json};
use regex::Regex;
use serde::Deserialize;
use serde_json::{json, Value};
use std::sync::OnceLock;

use crate::auth::AuthUser;
use crate::errors::AppError;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct WelcomeEmailRequest {
    pub email: Option<String>,
    pub name: Option<String>,
}

/// POST /api/auth/send-welcome-email
pub async fn handle_send_welcome_email(
    State(state): State<AppState>,
    AuthUser(_user_id): AuthUser,
    Json(request): Json<WelcomeEmailRequest>,
) -> Result<Json<Value>, AppError> {
    let (email, name) = match (request.email, request.name) {
        (Some(email), Some(name)) if !email.is_empty() && !name.is_empty() => (email, name),
        _ => {
            return Err(AppError::Validation(
                "Email and name are required".to_string(),
            ))
        }
    };

    if !is_valid_email(&email) {
        return Err(AppError::Validation("Invalid email format".to_string()));
    }

    state
        .mailer
        .send_welcome(&email, &name)
        .await
        .map_err(|e| AppError::Email(e.to_string()))?;

    Ok(Json(json!({
        "success": true,
        "message": "Welcome email sent successfully",
    })))
}

fn is_valid_email(email: &str) -> bool {
    static EMAIL_RE: OnceLock<Regex> = OnceLock::new();
    EMAIL_RE
        .get_or_init(|| Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").expect("valid regex"))
        .is_match(email)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_valid_emails_pass() {
        assert!(is_valid_email("awa@example.com"));
        assert!(is_valid_email("a.b+c@sub.domain.org"));
    }

    #[test]
    fn test_invalid_emails_fail() {
        assert!(!is_valid_email("no-at-sign"));
        assert!(!is_valid_email("two@@example.com"));
        assert!(!is_valid_email("spaces in@example.com"));
        assert!(!is_valid_email("missing@tld"));
        assert!(!is_valid_email("@example.com"));
    }
}
