use std::path::Path;

use crate::{
    config::{self, REFRESH_TOKEN_VAR},
    error::{Error, Result},
    spotify::client::{AuthenticatedClient, TokenExchange},
    types::Token,
    utils,
};

/// Holds the current token pair between authentication and persistence.
pub struct TokenStore {
    token: Option<Token>,
}

impl TokenStore {
    pub fn new(token: Token) -> Self {
        TokenStore { token: Some(token) }
    }

    pub fn from_refresh_token(refresh_token: &str) -> Self {
        if refresh_token.is_empty() {
            return TokenStore { token: None };
        }
        TokenStore {
            token: Some(Token::from_refresh_token(refresh_token)),
        }
    }

    pub fn has_refresh_token(&self) -> bool {
        self.refresh_token().is_some()
    }

    pub fn refresh_token(&self) -> Option<&str> {
        self.token
            .as_ref()
            .map(|t| t.refresh_token.as_str())
            .filter(|t| !t.is_empty())
    }

    /// Builds a client from the stored refresh token without any network
    /// traffic. The first request made through it performs the refresh.
    pub fn build_client_from_refresh_token(
        &self,
        exchange: &TokenExchange,
    ) -> Result<AuthenticatedClient> {
        let refresh_token = self
            .refresh_token()
            .ok_or(Error::MissingCredentials(REFRESH_TOKEN_VAR))?;
        Ok(exchange.client(Token::from_refresh_token(refresh_token)))
    }

    /// Writes the refresh token into the data-dir `.env` file.
    pub async fn persist(&self) -> Result<()> {
        self.persist_to(&config::env_path()).await
    }

    pub async fn persist_to(&self, path: &Path) -> Result<()> {
        let refresh_token = self
            .refresh_token()
            .ok_or(Error::MissingCredentials(REFRESH_TOKEN_VAR))?;

        if let Some(parent) = path.parent() {
            async_fs::create_dir_all(parent).await?;
        }

        let contents = read_or_empty(path).await?;
        let updated = utils::upsert_env_var(&contents, REFRESH_TOKEN_VAR, refresh_token);
        async_fs::write(path, updated).await?;
        Ok(())
    }

    /// Removes a stored refresh token from the data-dir `.env` file.
    pub async fn clear() -> Result<()> {
        Self::clear_at(&config::env_path()).await
    }

    pub async fn clear_at(path: &Path) -> Result<()> {
        if !path.is_file() {
            return Ok(());
        }
        let contents = read_or_empty(path).await?;
        async_fs::write(path, utils::remove_env_var(&contents, REFRESH_TOKEN_VAR)).await?;
        Ok(())
    }
}

async fn read_or_empty(path: &Path) -> Result<String> {
    match async_fs::read_to_string(path).await {
        Ok(contents) => Ok(contents),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(String::new()),
        Err(e) => Err(Error::Io(e)),
    }
}
