use std::io::{self, BufRead, Write};

use crate::{
    config::{self, AuthSession, Endpoints},
    error, info,
    management::TokenStore,
    spotify::{auth::Authorizer, client::AuthenticatedClient},
    success,
    types::AuthenticateStatus,
    utils, warning,
};

fn publish_authorize_url(url: &str) {
    info!("Authorize spotlike in your browser:\n{}", url);
    if webbrowser::open(url).is_err() {
        warning!(
            "Failed to open browser. Please navigate to the following URL manually:\n{}",
            url
        )
    }
}

fn prompt(label: &str) -> String {
    print!("{}: ", label);
    let _ = io::stdout().flush();

    let mut value = String::new();
    if let Err(e) = io::stdin().lock().read_line(&mut value) {
        error!("Cannot read {}. Err: {}", label, e);
    }
    value.trim().to_string()
}

/// Fills in missing client credentials from stdin.
fn ensure_credentials(mut session: AuthSession) -> AuthSession {
    if session.client_id.is_empty() {
        session.client_id = prompt(config::CLIENT_ID_VAR);
    }
    if session.client_secret.is_empty() {
        session.client_secret = prompt(config::CLIENT_SECRET_VAR);
    }
    if session.redirect_uri.is_empty() {
        session.redirect_uri = prompt(&format!(
            "{} (e.g. http://localhost:8080/callback)",
            config::REDIRECT_URI_VAR
        ));
    }
    session
}

fn authorizer(session: AuthSession) -> Authorizer {
    Authorizer::new(session, Endpoints::from_env()).on_authorize_url(publish_authorize_url)
}

async fn interactive(session: AuthSession) -> AuthenticatedClient {
    match authorizer(session).authenticate().await {
        (_, Ok(client)) => client,
        (AuthenticateStatus::AuthenticateFailedInvalidUri, Err(e)) => {
            error!("{}. Use a redirect URI like http://localhost:8080/callback", e)
        }
        (_, Err(e)) => error!("{}", e),
    }
}

pub async fn auth() {
    let session = ensure_credentials(AuthSession::from_env());

    let client = if session.has_refresh_token() {
        info!("Using stored refresh token...");
        match authorizer(session.clone()).authenticate().await {
            (_, Ok(client)) => client,
            (_, Err(e)) if e.is_authentication_failure() => {
                warning!("Stored refresh token was rejected: {}", e);
                if let Err(e) = TokenStore::clear().await {
                    warning!("Failed to clear stored refresh token. Err: {}", e);
                }
                interactive(session.with_refresh_token("")).await
            }
            (_, Err(e)) => error!("Cannot reach Spotify. Err: {}", e),
        }
    } else {
        interactive(session).await
    };

    let store = TokenStore::new(client.token().await);
    let Some(refresh_token) = store.refresh_token() else {
        error!("Spotify did not issue a refresh token.");
    };

    if let Err(e) = store.persist().await {
        warning!("Failed to save refresh token. Err: {}", e);
    }

    success!("Authentication successful!");
    info!(
        "To reuse this session, run:\n{}",
        utils::export_command(refresh_token)
    );
}

/// Client for commands that need an existing session.
pub async fn authenticated_client() -> AuthenticatedClient {
    if !config::is_environment_configured() {
        error!("Missing credentials or refresh token. Please run spotlike auth");
    }

    match Authorizer::from_env().authenticate().await {
        (_, Ok(client)) => client,
        (_, Err(e)) if e.is_authentication_failure() => {
            error!(
                "Stored refresh token was rejected. Please run spotlike auth\n Error: {}",
                e
            )
        }
        (_, Err(e)) => error!("Failed to authenticate. Err: {}", e),
    }
}
