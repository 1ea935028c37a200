use std::{sync::Arc, time::Duration};

use tokio::sync::oneshot;
use url::Url;

use crate::{
    config::{self, AuthSession, Endpoints},
    error::{Error, Result},
    management::TokenStore,
    server::{CallbackServer, CallbackState},
    spotify::client::{AuthenticatedClient, TokenExchange},
    types::AuthenticateStatus,
    utils,
};

/// Scopes requested on every authorization; not configurable.
pub const SCOPES: [&str; 4] = [
    "user-follow-read",
    "user-follow-modify",
    "user-library-read",
    "user-library-modify",
];

/// Bytes of entropy in each state token.
pub const STATE_BYTES: isize = 16;

type UrlHandler = Arc<dyn Fn(&str) + Send + Sync>;

/// A freshly built authorization URL and the state token embedded in it.
#[derive(Debug, Clone)]
pub struct AuthorizationRequest {
    pub url: String,
    pub state: String,
}

/// Runs the OAuth2 authorization code flow for one `AuthSession`.
///
/// Each instance owns its configuration; nothing is shared between
/// authorizers, so independent attempts can run side by side.
pub struct Authorizer {
    exchange: TokenExchange,
    timeout: Duration,
    on_authorize_url: UrlHandler,
}

impl Authorizer {
    pub fn new(session: AuthSession, endpoints: Endpoints) -> Self {
        Authorizer {
            exchange: TokenExchange::new(session, endpoints),
            timeout: config::auth_timeout(),
            on_authorize_url: Arc::new(|_: &str| {}),
        }
    }

    pub fn from_env() -> Self {
        Self::new(AuthSession::from_env(), Endpoints::from_env())
    }

    /// Deadline for the interactive wait.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Called with the authorization URL once the listener is bound.
    pub fn on_authorize_url<F>(mut self, handler: F) -> Self
    where
        F: Fn(&str) + Send + Sync + 'static,
    {
        self.on_authorize_url = Arc::new(handler);
        self
    }

    pub fn session(&self) -> &AuthSession {
        self.exchange.session()
    }

    pub fn is_environment_configured(&self) -> bool {
        self.session().is_complete()
    }

    /// Generates a new state token and returns the provider's authorization
    /// URL carrying it.
    pub fn build_authorization_url(&self) -> Result<AuthorizationRequest> {
        let state = utils::generate_state(STATE_BYTES)?;
        let session = self.session();

        let mut url = Url::parse(&self.exchange.endpoints().authorize_url)?;
        url.query_pairs_mut()
            .append_pair("client_id", &session.client_id)
            .append_pair("response_type", "code")
            .append_pair("redirect_uri", &session.redirect_uri)
            .append_pair("scope", &SCOPES.join(" "))
            .append_pair("state", &state);

        Ok(AuthorizationRequest {
            url: url.to_string(),
            state,
        })
    }

    /// Authenticates, preferring the stored refresh token.
    ///
    /// With a refresh token no listener is started and no authorization URL is
    /// built. Otherwise the interactive flow runs until the callback arrives,
    /// fails, or the deadline passes.
    pub async fn authenticate(&self) -> (AuthenticateStatus, Result<AuthenticatedClient>) {
        let result = if self.session().has_refresh_token() {
            self.authenticate_with_refresh_token().await
        } else {
            self.authenticate_interactive().await
        };

        let status = match &result {
            Ok(_) => AuthenticateStatus::AuthenticatedSuccessfully,
            Err(e) => e.status(),
        };
        (status, result)
    }

    async fn authenticate_with_refresh_token(&self) -> Result<AuthenticatedClient> {
        let store = TokenStore::from_refresh_token(&self.session().refresh_token);
        let client = store.build_client_from_refresh_token(&self.exchange)?;

        // forces the lazy refresh so a rejected token surfaces here
        client.current_user().await?;
        Ok(client)
    }

    async fn authenticate_interactive(&self) -> Result<AuthenticatedClient> {
        let session = self.session();
        if session.client_id.is_empty() {
            return Err(Error::MissingCredentials(config::CLIENT_ID_VAR));
        }
        if session.client_secret.is_empty() {
            return Err(Error::MissingCredentials(config::CLIENT_SECRET_VAR));
        }

        let port = utils::redirect_port(&session.redirect_uri)?;
        let path = utils::redirect_path(&session.redirect_uri)?;
        let request = self.build_authorization_url()?;

        let (handoff, result) = oneshot::channel();
        let state = CallbackState::new(request.state.clone(), self.exchange.clone(), handoff);
        let server = CallbackServer::bind(port, &path, state).await?;

        (self.on_authorize_url)(&request.url);

        let outcome = tokio::time::timeout(self.timeout, result).await;
        server.shutdown().await;

        match outcome {
            Ok(Ok(result)) => result,
            Ok(Err(_)) => Err(Error::AuthenticationFailed(
                "callback listener stopped before completing".to_string(),
            )),
            Err(_) => Err(Error::AuthenticationTimeout(self.timeout)),
        }
    }
}
