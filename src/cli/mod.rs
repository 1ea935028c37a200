//! # CLI Module
//!
//! The command-line layer of spotlike. It collects credentials, drives the
//! authentication core, calls the search and like operations, and renders
//! their results. It is the only layer that decides exit codes.
//!
//! ## Commands
//!
//! - [`auth`] - Authenticates (refresh token first, browser flow otherwise),
//!   stores the refresh token and prints the matching `export` command
//! - [`search`] - Free-text search or ID lookup, rendered as a table
//! - [`like`] - Likes an artist, album or track, or every album of an artist /
//!   every track of an album, and reports each item's outcome
//!
//! ## Usage Patterns
//!
//! ```bash
//! spotlike auth                                   # Authorize with Spotify
//! spotlike search --type album "In Rainbows"      # Find an album
//! spotlike search --id 4aawyAB9vmqN3uQ7FjRGTy     # Resolve an ID
//! spotlike like artist-albums 4Z8W4fKeB5YxbusRsdQVPb
//! ```
//!
//! ## Error Handling
//!
//! Fatal problems go through the `error!` macro, which prints and exits. A
//! rejected refresh token during `auth` is cleared from the stored
//! configuration and followed by a fresh browser authorization. Per-item
//! failures of batch likes are shown in the result table and summarized with
//! a warning.

mod auth;
mod like;
mod search;

pub use auth::auth;
pub use auth::authenticated_client;
pub use like::LikeTarget;
pub use like::like;
pub use search::search;
