//! # Spotify Integration Module
//!
//! This module is the integration layer between spotlike and the Spotify Web
//! API. It owns the OAuth 2.0 authorization code flow, the authenticated HTTP
//! transport, and the catalog operations built on top of it.
//!
//! ## Architecture
//!
//! ```text
//! CLI Layer
//!     ↓
//! Spotify Integration Layer
//!     ├── Authentication (authorization code flow, refresh shortcut)
//!     ├── Client (bearer transport, lazy refresh, retries)
//!     ├── Catalog (artists, albums, tracks)
//!     └── Search / Like
//!     ↓
//! HTTP Layer (reqwest, JSON)
//! ```
//!
//! ## Core Modules
//!
//! ### Authentication
//!
//! [`auth`] - The [`auth::Authorizer`] builds the authorization URL with a fresh
//! CSRF state token, runs the local callback listener, and waits for the
//! result with a deadline. When a refresh token is available it skips the
//! browser entirely and validates the token with a single API call.
//!
//! ### Client
//!
//! [`client`] - [`client::AuthenticatedClient`] attaches the bearer token to
//! every request and refreshes it when it is missing or about to expire:
//! - **429 Too Many Requests**: honors `Retry-After` up to 120 seconds
//! - **502 Bad Gateway**: retried after a short delay
//! - **401 Unauthorized**: one forced refresh, then the request is retried
//!
//! ### Catalog
//!
//! [`artists`], [`albums`], [`tracks`] - lookups, library membership checks
//! and library writes for each content kind.
//!
//! ### Search and Like
//!
//! [`search`] - free-text search and ID resolution (artist, then album, then
//! track). [`like`] - idempotent like operations, including the batch
//! variants that like every album of an artist or every track of an album.
//!
//! ## API Coverage
//!
//! - `GET /me`
//! - `GET /search`
//! - `GET /artists/{id}`, `GET /artists/{id}/albums`
//! - `GET /albums/{id}`, `GET /albums/{id}/tracks`
//! - `GET /tracks/{id}`
//! - `GET /me/following/contains`, `PUT /me/following`
//! - `GET /me/albums/contains`, `PUT /me/albums`
//! - `GET /me/tracks/contains`, `PUT /me/tracks`
//! - `POST /api/token` - code exchange and refresh
//!
//! ## Usage Patterns
//!
//! ```rust,ignore
//! let authorizer = Authorizer::from_env();
//! let (_, client) = authorizer.authenticate().await;
//! let client = client?;
//!
//! let found = spotify::search::search_by_id(&client, "4aawyAB9vmqN3uQ7FjRGTy").await?;
//! let results = spotify::like::like_album_by_id(&client, &found.id, false).await?;
//! ```

pub mod albums;
pub mod artists;
pub mod auth;
pub mod client;
pub mod like;
pub mod search;
pub mod tracks;
