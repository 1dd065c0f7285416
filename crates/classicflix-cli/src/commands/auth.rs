use super::prompts;
use crate::commands::context::AppContext;
use crate::output::Output;
use classicflix_config::Session;
use color_eyre::eyre::eyre;
use color_eyre::Result;
use serde_json::json;

fn read_password(confirm: bool) -> Result<String> {
    if let Ok(password) = std::env::var("CLASSICFLIX_PASSWORD") {
        return Ok(password);
    }
    let password = if confirm {
        prompts::prompt_new_password("Password")?
    } else {
        prompts::prompt_password("Password")?
    };
    if password.is_empty() {
        return Err(eyre!("Password cannot be empty"));
    }
    Ok(password)
}

fn read_email(email: Option<String>) -> Result<String> {
    let email = match email {
        Some(email) => email,
        None => prompts::prompt_string("Email", None)?,
    };
    let email = email.trim().to_string();
    if !email.contains('@') {
        return Err(eyre!("'{}' is not an email address", email));
    }
    Ok(email)
}

fn session_json(session: &Session) -> serde_json::Value {
    json!({
        "userId": session.user_id,
        "email": session.email,
        "expiresAt": session.expires_at.map(|t| t.to_rfc3339()),
    })
}

pub async fn run_login(email: Option<String>, ctx: &mut AppContext, output: &Output) -> Result<()> {
    let mut client = ctx.require_supabase()?;
    let email = read_email(email)?;
    let password = read_password(false)?;

    let session = client
        .sign_in(&email, &password)
        .await
        .map_err(|e| eyre!("Sign-in failed: {}", e))?;

    ctx.credentials.set_session(&session);
    ctx.save_credentials()?;

    if output.is_human() {
        output.success(format!("Signed in as {}", session.email.as_deref().unwrap_or(email.as_str())));
    } else {
        output.data(&json!({ "signedIn": true, "session": session_json(&session) }));
    }
    Ok(())
}

pub async fn run_signup(email: Option<String>, ctx: &mut AppContext, output: &Output) -> Result<()> {
    let mut client = ctx.require_supabase()?;
    let email = read_email(email)?;
    let password = read_password(true)?;

    let session = client
        .sign_up(&email, &password)
        .await
        .map_err(|e| eyre!("Sign-up failed: {}", e))?;

    match session {
        Some(session) => {
            ctx.credentials.set_session(&session);
            ctx.save_credentials()?;
            if output.is_human() {
                output.success(format!("Account created. Signed in as {}", email));
            } else {
                output.data(&json!({ "signedIn": true, "session": session_json(&session) }));
            }
        }
        None => {
            if output.is_human() {
                output.success("Account created. Check your email to confirm it, then run 'classicflix auth login'.");
            } else {
                output.data(&json!({ "signedIn": false, "confirmationRequired": true }));
            }
        }
    }
    Ok(())
}

pub async fn run_logout(ctx: &mut AppContext, output: &Output) -> Result<()> {
    if ctx.credentials.get_session().is_none() {
        output.info("Not signed in");
        return Ok(());
    }

    if let Some(mut client) = ctx.supabase() {
        if let Err(e) = client.sign_out().await {
            tracing::warn!(error = %e, "Server sign-out failed, clearing the local session anyway");
        }
    }

    ctx.credentials.clear_session();
    ctx.save_credentials()?;
    output.success("Signed out");
    Ok(())
}

pub fn run_status(ctx: &AppContext, output: &Output) -> Result<()> {
    let session = ctx.credentials.get_session();

    if !output.is_human() {
        output.data(&json!({
            "signedIn": session.as_ref().map(|s| !s.is_expired()).unwrap_or(false),
            "session": session.as_ref().map(session_json),
        }));
        return Ok(());
    }

    match session {
        Some(session) if session.is_expired() => {
            output.warn("Session expired. Sign in again with: classicflix auth login <email>");
        }
        Some(session) => {
            output.info(format!(
                "Signed in as {} (user {})",
                session.email.as_deref().unwrap_or("<unknown email>"),
                session.user_id
            ));
            if let Some(expires) = session.expires_at {
                output.info(format!("Session expires at {}", expires.to_rfc3339()));
            }
        }
        None => output.info("Not signed in"),
    }
    Ok(())
}
