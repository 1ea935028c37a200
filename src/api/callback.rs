use std::sync::Arc;

use axum::{
    extract::{Query, State},
    http::StatusCode,
    response::Html,
};
use serde::Deserialize;

use crate::{
    error::{Error, Result},
    server::CallbackState,
    types::Token,
    warning,
};

#[derive(Debug, Deserialize)]
pub struct CallbackParams {
    pub code: Option<String>,
    pub state: Option<String>,
    pub error: Option<String>,
}

const SUCCESS_BODY: &str = "<h2>Authentication successful.</h2><p>Close this browser window.</p>";
const FAILED_BODY: &str = "<h4>Authentication failed.</h4>";
const MISMATCH_BODY: &str = "<h4>Not found.</h4>";
const COMPLETED_BODY: &str = "<h4>Authentication already completed.</h4>";

pub async fn callback(
    State(ctx): State<Arc<CallbackState>>,
    Query(params): Query<CallbackParams>,
) -> (StatusCode, Html<&'static str>) {
    let Some(handoff) = ctx.take_handoff().await else {
        return (StatusCode::GONE, Html(COMPLETED_BODY));
    };

    let exchanged = exchange(&ctx, &params).await;

    // checked even when the exchange failed; an earlier failure wins
    let state_matches = params.state.as_deref() == Some(ctx.expected_state.as_str());
    if !state_matches {
        warning!("Callback state does not match the authorization request.");
    }

    let outcome = match exchanged {
        Err(e) => {
            warning!("Token exchange failed: {}", e);
            Err((StatusCode::FORBIDDEN, FAILED_BODY, e))
        }
        Ok(_) if !state_matches => Err((StatusCode::NOT_FOUND, MISMATCH_BODY, Error::StateMismatch)),
        Ok(token) => Ok(token),
    };

    match outcome {
        Ok(token) => {
            let client = ctx.exchange.client(token);
            let _ = handoff.send(Ok(client));
            (StatusCode::OK, Html(SUCCESS_BODY))
        }
        Err((status, body, e)) => {
            let _ = handoff.send(Err(e));
            (status, Html(body))
        }
    }
}

async fn exchange(ctx: &CallbackState, params: &CallbackParams) -> Result<Token> {
    if let Some(error) = &params.error {
        return Err(Error::AuthenticationFailed(format!(
            "authorization denied: {}",
            error
        )));
    }

    match params.code.as_deref() {
        Some(code) if !code.is_empty() => ctx.exchange.exchange_code(code).await,
        _ => Err(Error::AuthenticationFailed(
            "callback carried no authorization code".to_string(),
        )),
    }
}
