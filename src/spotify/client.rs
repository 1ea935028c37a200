use std::{fmt, sync::Arc, time::Duration};

use reqwest::{Client, Method, Response, StatusCode, header::CONTENT_LENGTH};
use serde::de::DeserializeOwned;
use tokio::{sync::Mutex, time::sleep};

use crate::{
    config::{AuthSession, Endpoints},
    error::{Error, Result},
    types::{Paging, Token, TokenResponse, User},
    warning,
};

const MAX_RETRIES: u32 = 3;
const MAX_RETRY_AFTER_SECS: u64 = 120;
const MIN_RETRY_AFTER_SECS: u64 = 1;
const BAD_GATEWAY_DELAY: Duration = Duration::from_secs(2);

/// Talks to the provider's token endpoint on behalf of one `AuthSession`.
#[derive(Clone)]
pub struct TokenExchange {
    http: Client,
    session: AuthSession,
    endpoints: Endpoints,
}

impl TokenExchange {
    pub fn new(session: AuthSession, endpoints: Endpoints) -> Self {
        TokenExchange {
            http: Client::new(),
            session,
            endpoints,
        }
    }

    pub fn session(&self) -> &AuthSession {
        &self.session
    }

    pub fn endpoints(&self) -> &Endpoints {
        &self.endpoints
    }

    /// Exchanges an authorization code for a token pair. Every failure,
    /// including transport errors, is an `AuthenticationFailed`.
    pub async fn exchange_code(&self, code: &str) -> Result<Token> {
        let response = self
            .http
            .post(&self.endpoints.token_url)
            .basic_auth(&self.session.client_id, Some(&self.session.client_secret))
            .form(&[
                ("grant_type", "authorization_code"),
                ("code", code),
                ("redirect_uri", self.session.redirect_uri.as_str()),
            ])
            .send()
            .await
            .map_err(|e| Error::AuthenticationFailed(format!("token request failed: {}", e)))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(Error::AuthenticationFailed(format!(
                "token exchange rejected ({}): {}",
                status, body
            )));
        }

        let token: TokenResponse = response.json().await.map_err(|e| {
            Error::AuthenticationFailed(format!("malformed token response: {}", e))
        })?;
        Ok(token.into_token(""))
    }

    /// Trades a refresh token for a fresh access token.
    ///
    /// A 4xx answer means the provider rejected the refresh token and is
    /// reported as `AuthenticationFailed`; transport problems stay `Network`.
    pub async fn refresh(&self, refresh_token: &str) -> Result<Token> {
        if refresh_token.is_empty() {
            return Err(Error::AuthenticationFailed(
                "no refresh token available".to_string(),
            ));
        }

        let response = self
            .http
            .post(&self.endpoints.token_url)
            .basic_auth(&self.session.client_id, Some(&self.session.client_secret))
            .form(&[
                ("grant_type", "refresh_token"),
                ("refresh_token", refresh_token),
            ])
            .send()
            .await?;

        let status = response.status();
        if status.is_client_error() {
            let body = response.text().await.unwrap_or_default();
            return Err(Error::AuthenticationFailed(format!(
                "refresh token rejected ({}): {}",
                status, body
            )));
        }
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(Error::Http { status, body });
        }

        let token: TokenResponse = decode(response).await?;
        Ok(token.into_token(refresh_token))
    }

    pub fn client(&self, token: Token) -> AuthenticatedClient {
        AuthenticatedClient::new(self.clone(), token)
    }
}

/// HTTP transport carrying a token pair that refreshes itself on expiry.
///
/// Clones share the same token, so a refresh through one clone is seen by
/// all of them.
#[derive(Clone)]
pub struct AuthenticatedClient {
    http: Client,
    exchange: TokenExchange,
    token: Arc<Mutex<Token>>,
}

impl fmt::Debug for AuthenticatedClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AuthenticatedClient")
            .field("api_url", &self.exchange.endpoints.api_url)
            .finish_non_exhaustive()
    }
}

impl AuthenticatedClient {
    pub fn new(exchange: TokenExchange, token: Token) -> Self {
        AuthenticatedClient {
            http: exchange.http.clone(),
            exchange,
            token: Arc::new(Mutex::new(token)),
        }
    }

    pub async fn token(&self) -> Token {
        self.token.lock().await.clone()
    }

    pub async fn refresh_token(&self) -> String {
        self.token.lock().await.refresh_token.clone()
    }

    /// Current access token, refreshed first when missing or about to expire.
    pub async fn access_token(&self) -> Result<String> {
        let mut token = self.token.lock().await;
        if token.is_expired() {
            *token = self.exchange.refresh(&token.refresh_token).await?;
        }
        Ok(token.access_token.clone())
    }

    async fn force_refresh(&self) -> Result<()> {
        let mut token = self.token.lock().await;
        *token = self.exchange.refresh(&token.refresh_token).await?;
        Ok(())
    }

    fn url(&self, path: &str) -> String {
        format!(
            "{}{}",
            self.exchange.endpoints.api_url.trim_end_matches('/'),
            path
        )
    }

    async fn send(&self, method: Method, url: &str, query: &[(&str, &str)]) -> Result<Response> {
        let mut attempt = 0;

        loop {
            let access_token = self.access_token().await?;
            let mut request = self
                .http
                .request(method.clone(), url)
                .query(query)
                .bearer_auth(&access_token);
            if method == Method::PUT {
                request = request.header(CONTENT_LENGTH, "0");
            }

            let response = request.send().await?;
            let status = response.status();
            if status.is_success() {
                return Ok(response);
            }

            if attempt < MAX_RETRIES {
                match status {
                    StatusCode::TOO_MANY_REQUESTS => {
                        let retry_after = retry_after_secs(&response);
                        if retry_after <= MAX_RETRY_AFTER_SECS {
                            attempt += 1;
                            sleep(Duration::from_secs(retry_after)).await;
                            continue;
                        }
                        warning!(
                            "Retry after has reached an abnormal high of {} seconds.",
                            retry_after
                        );
                    }
                    StatusCode::BAD_GATEWAY => {
                        attempt += 1;
                        sleep(BAD_GATEWAY_DELAY).await;
                        continue;
                    }
                    // access token revoked early; one forced refresh
                    StatusCode::UNAUTHORIZED if attempt == 0 => {
                        attempt += 1;
                        self.force_refresh().await?;
                        continue;
                    }
                    _ => {}
                }
            }

            let body = response.text().await.unwrap_or_default();
            return Err(Error::Http { status, body });
        }
    }

    pub async fn get_json<T: DeserializeOwned>(
        &self,
        path: &str,
        query: &[(&str, &str)],
    ) -> Result<T> {
        let response = self.send(Method::GET, &self.url(path), query).await?;
        decode(response).await
    }

    /// Fetches every page of a paging object by following `next`.
    pub async fn get_all<T: DeserializeOwned>(
        &self,
        path: &str,
        query: &[(&str, &str)],
    ) -> Result<Vec<T>> {
        let mut page: Paging<T> = self.get_json(path, query).await?;
        let mut items = std::mem::take(&mut page.items);

        while let Some(next) = page.next.take() {
            page = decode(self.send(Method::GET, &next, &[]).await?).await?;
            items.append(&mut page.items);
        }

        Ok(items)
    }

    pub async fn put(&self, path: &str, query: &[(&str, &str)]) -> Result<()> {
        self.send(Method::PUT, &self.url(path), query).await?;
        Ok(())
    }

    pub async fn current_user(&self) -> Result<User> {
        self.get_json("/me", &[]).await
    }
}

/// Reads the body and decodes it as JSON. A body that arrives but does not
/// match `T` is an `Error::Serde`, not a transport error.
async fn decode<T: DeserializeOwned>(response: Response) -> Result<T> {
    let body = response.bytes().await?;
    Ok(serde_json::from_slice(&body)?)
}

fn retry_after_secs(response: &Response) -> u64 {
    response
        .headers()
        .get("retry-after")
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.parse::<u64>().ok())
        .unwrap_or(MIN_RETRY_AFTER_SECS)
        .max(MIN_RETRY_AFTER_SECS)
}
