//! Transactional email via the Resend HTTP API.

pub mod handlers;

use async_trait::async_trait;
use reqwest::Client;
use serde_json::json;
use thiserror::Error;
use tracing::info;

const RESEND_API_URL: &str = "https://api.resend.com";
const FROM_ADDRESS: &str = "AfriShop <noreply@afrishop.com>";

#[derive(Debug, Error)]
pub enum EmailError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Email API error (status {status}): {message}")]
    Api { status: u16, message: String },
}

/// Seam for outbound email so handlers can be tested without a network.
#[async_trait]
pub trait Mailer: Send + Sync {
    async fn send_welcome(&self, to: &str, name: &str) -> Result<(), EmailError>;
}

/// Production mailer backed by Resend.
pub struct ResendMailer {
    client: Client,
    api_key: String,
    base_url: String,
}

impl ResendMailer {
    pub fn new(api_key: String) -> Self {
        Self::with_base_url(api_key, RESEND_API_URL)
    }

    /// Mailer pointed at a custom base URL (for testing with wiremock).
    pub fn with_base_url(api_key: String, base_url: &str) -> Self {
        Self {
            client: Client::builder()
                .timeout(std::time::Duration::from_secs(30))
                .build()
                .expect("Failed to build HTTP client"),
            api_key,
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }
}

#[async_trait]
impl Mailer for ResendMailer {
    async fn send_welcome(&self, to: &str, name: &str) -> Result<(), EmailError> {
        let body = json!({
            "from": FROM_ADDRESS,
            "to": [to],
            "subject": "Welcome to AfriShop!",
            "html": welcome_email_html(name),
        });

        let response = self
            .client
            .post(format!("{}/emails", self.base_url))
            .bearer_auth(&self.api_key)
            .json(&body)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            return Err(EmailError::Api {
                status: status.as_u16(),
                message,
            });
        }

        info!("Welcome email sent to {to}");
        Ok(())
    }
}

/// Welcome email body. Inline styles only: email clients strip everything else.
fn welcome_email_html(name: &str) -> String {
    format!(
        r#"<!DOCTYPE html>
<html lang="en">
  <head>
    <meta charset="UTF-8">
    <title>Welcome to AfriShop</title>
  </head>
  <body style="margin: 0; padding: 0; font-family: -apple-system, 'Segoe UI', Roboto, Arial, sans-serif; background-color: #f9fafb;">
    <table role="presentation" style="max-width: 600px; margin: 0 auto; background-color: #ffffff; border-radius: 8px;">
      <tr>
        <td style="padding: 40px 40px 32px; text-align: center; border-bottom: 1px solid #e5e7eb;">
          <h1 style="margin: 0; font-size: 28px; color: #111827;"><span style="color: #ea580c;">Afri</span>Shop</h1>
        </td>
      </tr>
      <tr>
        <td style="padding: 40px;">
          <h2 style="margin: 0 0 16px; font-size: 24px; color: #111827;">Welcome to AfriShop, {name}!</h2>
          <p style="margin: 0 0 16px; font-size: 16px; line-height: 24px; color: #4b5563;">
            Your account is ready. You are now part of the community of African
            entrepreneurs turning their vision into reality.
          </p>
          <ul style="margin: 0 0 24px; padding-left: 24px; font-size: 16px; line-height: 24px; color: #4b5563;">
            <li style="margin-bottom: 12px;">Build your Shopify store in a few clicks</li>
            <li style="margin-bottom: 12px;">Import products from AliExpress, Amazon, and Jumia</li>
            <li style="margin-bottom: 12px;">Manage your catalog and orders easily</li>
            <li style="margin-bottom: 12px;">Grow your e-commerce business</li>
          </ul>
          <div style="text-align: center; margin: 32px 0;">
            <a href="https://afrishop.com/dashboard" style="display: inline-block; padding: 14px 32px; background-color: #ea580c; color: #ffffff; text-decoration: none; font-size: 16px; font-weight: 600; border-radius: 6px;">
              Go to my dashboard
            </a>
          </div>
        </td>
      </tr>
      <tr>
        <td style="padding: 32px 40px; background-color: #f9fafb; border-top: 1px solid #e5e7eb; font-size: 14px; color: #6b7280;">
          <p style="margin: 0 0 8px;">Need help? We're here for you.</p>
          <p style="margin: 0;">Email: <a href="mailto:support@afrishop.com" style="color: #ea580c; text-decoration: none;">support@afrishop.com</a></p>
        </td>
      </tr>
    </table>
  </body>
</html>"#
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{body_partial_json, header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    #[test]
    fn test_welcome_html_includes_name() {
        let html = welcome_email_html("Awa");
        assert!(html.contains("Welcome to AfriShop, Awa!"));
        assert!(html.contains("afrishop.com/dashboard"));
    }

    #[tokio::test]
    async fn test_send_welcome_posts_to_resend() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/emails"))
            .and(header("Authorization", "Bearer re_test"))
            .and(body_partial_json(serde_json::json!({
                "to": ["awa@example.com"],
                "subject": "Welcome to AfriShop!",
            })))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(serde_json::json!({ "id": "email_123" })),
            )
            .mount(&server)
            .await;

        let mailer = ResendMailer::with_base_url("re_test".to_string(), &server.uri());
        mailer.send_welcome("awa@example.com", "Awa").await.unwrap();
    }

    #[tokio::test]
    async fn test_send_welcome_surfaces_api_error() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/emails"))
            .respond_with(ResponseTemplate::new(422).set_body_string("invalid to address"))
            .mount(&server)
            .await;

        let mailer = ResendMailer::with_base_url("re_test".to_string(), &server.uri());
        let err = mailer.send_welcome("bad", "Awa").await.unwrap_err();
        match err {
            EmailError::Api { status, .. } => assert_eq!(status, 422),
            other => panic!("expected Api error, got {other:?}"),
        }
    }
}
