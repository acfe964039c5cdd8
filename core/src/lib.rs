//! Client library for a forum-style community service.
//!
//! # Overview
//! Authenticates a user, fetches and mutates posts, comments and users, and
//! hands the parsed entities back to the host application.
//!
//! # Design
//! - `parser` turns raw response bodies into typed entities or an
//!   `ErrorCode`. Null handling is decided once, in the serde attributes of
//!   `model`.
//! - A post response side-loads comments and users; they land in an
//!   `Included` store that can be filtered by kind.
//! - Managers (`UserManager`, `PostManager`, `AccountManager`) own a
//!   transport and a mutable copy of their entity and refresh it in place.
//! - `CommunityClient` only builds `HttpRequest` values; the network is
//!   reached through the `Transport` trait (`UreqTransport` by default).
//! - Authentication state lives in an explicit `Session` handle shared by
//!   every client built from it.
//!
//! ```no_run
//! use community_core::{AccountManager, ClientConfig, ErrorCode, PostManager, UreqTransport};
//!
//! let (_session, client) = ClientConfig::from_env().connect();
//! let mut account = AccountManager::new(client.clone(), UreqTransport::new());
//! if account.login("alice", "secret", false)? == ErrorCode::Success {
//!     let mut posts = PostManager::new(client, UreqTransport::new());
//!     posts.get(1)?;
//!     println!("{}", posts.post());
//! }
//! # Ok::<(), community_core::ApiError>(())
//! ```

pub mod client;
pub mod code;
pub mod config;
pub mod error;
pub mod http;
pub mod included;
pub mod manager;
pub mod model;
pub mod parser;
pub mod session;

pub use client::CommunityClient;
pub use code::ErrorCode;
pub use config::ClientConfig;
pub use error::ApiError;
#[cfg(feature = "ureq")]
pub use http::UreqTransport;
pub use http::{HttpMethod, HttpRequest, HttpResponse, Transport};
pub use included::{Included, IncludedModel, Resource};
pub use manager::{AccountManager, ManagerState, PostManager, UserManager};
pub use model::{Comment, Model, ModelKind, Post, Token, User, UNSET_ID};
pub use parser::{PostDetail, PostListing};
pub use session::Session;
