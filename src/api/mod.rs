//! # API Module
//!
//! HTTP handlers for the short-lived callback listener that spotlike runs
//! during interactive authentication.
//!
//! ## Endpoints
//!
//! - [`callback`] - Receives Spotify's redirect (`code`, `state`), exchanges the
//!   authorization code for a token pair, verifies the CSRF state token and hands
//!   the authenticated client to the waiting caller. Answers 403 when the
//!   exchange fails, 404 when the state does not match and 410 once the attempt
//!   has already been completed.
//! - [`root`] - Catch-all for every other path. Returns an empty 200 so browser
//!   probes such as `/favicon.ico` never interfere with the flow.
//!
//! ## Usage Example
//!
//! ```rust,ignore
//! use axum::{Router, routing::get};
//! use spotlike::api::{callback, root};
//!
//! let app = Router::new()
//!     .route("/callback", get(callback))
//!     .fallback(root)
//!     .with_state(state);
//! ```

mod callback;
mod root;

pub use callback::{CallbackParams, callback};
pub use root::root;
