use chrono::{Duration, TimeZone, Utc};
use classicflix_config::Session;
use reqwest::Client;
use serde_json::{json, Value};

use crate::error::{Result, SourceError};
use crate::http;
use crate::supabase::api::SERVICE;

fn auth_url(base_url: &str, path: &str) -> String {
    format!("{}/auth/v1/{}", base_url.trim_end_matches('/'), path)
}

/// Session from a GoTrue token response
///
/// Sign-up answers with a bare user object while the email is still
/// unconfirmed; that yields `None`.
pub fn parse_session(body: &Value) -> Option<Session> {
    let access_token = body.get("access_token")?.as_str()?.to_string();
    let user = body.get("user")?;
    let user_id = user.get("id")?.as_str()?.to_string();

    let expires_at = body
        .get("expires_at")
        .and_then(Value::as_i64)
        .and_then(|secs| Utc.timestamp_opt(secs, 0).single())
        .or_else(|| {
            body.get("expires_in")
                .and_then(Value::as_i64)
                .map(|secs| Utc::now() + Duration::seconds(secs))
        });

    Some(Session {
        access_token,
        refresh_token: body.get("refresh_token").and_then(Value::as_str).map(str::to_string),
        user_id,
        email: user.get("email").and_then(Value::as_str).map(str::to_string),
        expires_at,
    })
}

async fn post_credentials(client: &Client, url: &str, anon_key: &str, email: &str, password: &str) -> Result<Value> {
    let response = client
        .post(url)
        .header("apikey", anon_key)
        .json(&json!({ "email": email, "password": password }))
        .send()
        .await?;
    http::read_json(SERVICE, response).await
}

pub async fn sign_in(client: &Client, base_url: &str, anon_key: &str, email: &str, password: &str) -> Result<Session> {
    let url = auth_url(base_url, "token?grant_type=password");
    let body = post_credentials(client, &url, anon_key, email, password).await?;
    parse_session(&body).ok_or_else(|| SourceError::parse(SERVICE, "token response without a session"))
}

/// Register a new account. Returns `None` when the project requires email confirmation.
pub async fn sign_up(
    client: &Client,
    base_url: &str,
    anon_key: &str,
    email: &str,
    password: &str,
) -> Result<Option<Session>> {
    let url = auth_url(base_url, "signup");
    let body = post_credentials(client, &url, anon_key, email, password).await?;
    Ok(parse_session(&body))
}

pub async fn sign_out(client: &Client, base_url: &str, anon_key: &str, access_token: &str) -> Result<()> {
    let response = client
        .post(auth_url(base_url, "logout"))
        .header("apikey", anon_key)
        .header("Authorization", format!("Bearer {}", access_token))
        .send()
        .await?;
    http::check_status(SERVICE, response).await?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_session_from_token_response() {
        let body = json!({
            "access_token": "jwt",
            "token_type": "bearer",
            "expires_in": 3600,
            "expires_at": 1893456000,
            "refresh_token": "r1",
            "user": {"id": "8d3c", "email": "ana@example.com"}
        });
        let session = parse_session(&body).unwrap();
        assert_eq!(session.access_token, "jwt");
        assert_eq!(session.user_id, "8d3c");
        assert_eq!(session.email.as_deref(), Some("ana@example.com"));
        assert_eq!(session.refresh_token.as_deref(), Some("r1"));
        assert_eq!(session.expires_at.unwrap().timestamp(), 1893456000);
    }

    #[test]
    fn test_parse_session_unconfirmed_signup() {
        let body = json!({"id": "8d3c", "email": "ana@example.com", "confirmation_sent_at": "2024-01-01T00:00:00Z"});
        assert!(parse_session(&body).is_none());
    }
}
