//! User profiles by id or name, and the user directory.
//!
//! A lookup refreshes the manager's own user through `fetch`; the directory
//! is kept apart in `all_users` and never changes `state()`.

use std::collections::HashMap;
use std::fmt;

use log::info;

use super::{fetch, ManagerState, Remote};
use crate::client::CommunityClient;
use crate::code::ErrorCode;
use crate::error::ApiError;
use crate::http::Transport;
use crate::model::{Model, ModelKind, User};
use crate::parser;

/// Loads one user profile, plus the user directory on request.
pub struct UserManager<T> {
    pub(crate) remote: Remote<T>,
    pub(crate) user: User,
    pub(crate) state: ManagerState,
    all_users: HashMap<i64, User>,
}

impl<T: Transport> UserManager<T> {
    pub fn new(client: CommunityClient, transport: T) -> Self {
        Self {
            remote: Remote { client, transport },
            user: User::empty(),
            state: ManagerState::Empty,
            all_users: HashMap::new(),
        }
    }

    pub fn user(&self) -> &User {
        &self.user
    }

    pub fn state(&self) -> ManagerState {
        self.state
    }

    /// Every user from the last successful `get_all`, keyed by id.
    pub fn all_users(&self) -> &HashMap<i64, User> {
        &self.all_users
    }

    pub fn transport(&self) -> &T {
        &self.remote.transport
    }

    pub fn client(&self) -> &CommunityClient {
        &self.remote.client
    }

    /// Load the user with `id`, replacing every field of this manager.
    pub fn get(&mut self, id: i64) -> Result<ErrorCode, ApiError> {
        info!("fetch user {id}");
        let request = self.remote.client.build_get_user(id)?;
        fetch(&mut self.state, &self.remote, request, |body| {
            parser::parse_user_into(body, &mut self.user)
        })
    }

    /// Load the user called `name`.
    pub fn get_by_name(&mut self, name: &str) -> Result<ErrorCode, ApiError> {
        info!("fetch user {name:?}");
        let request = self.remote.client.build_get_user_by_name(name)?;
        fetch(&mut self.state, &self.remote, request, |body| {
            parser::parse_user_into(body, &mut self.user)
        })
    }

    /// Replace `all_users` with the full user list. The manager's own user
    /// and state are left alone.
    pub fn get_all(&mut self) -> Result<ErrorCode, ApiError> {
        info!("fetch user list");
        let request = self.remote.client.build_list_users()?;
        let reply = self.remote.call(request)?;
        if reply.code.is_success() {
            parser::parse_users_into(&reply.body, &mut self.all_users)?;
        }
        Ok(reply.code)
    }

    /// Profile editing has no endpoint yet.
    pub fn update(&mut self) -> Result<ErrorCode, ApiError> {
        Err(ApiError::NotImplemented {
            operation: "UserManager::update",
        })
    }

    pub fn delete(&mut self) -> Result<ErrorCode, ApiError> {
        Err(ApiError::NotImplemented {
            operation: "UserManager::delete",
        })
    }

    /// Reset the user to its sentinel values.
    pub fn clear(&mut self) -> &mut Self {
        self.user = User::empty();
        self.state = ManagerState::Empty;
        self
    }
}

impl<T> Model for UserManager<T> {
    fn kind(&self) -> ModelKind {
        ModelKind::User
    }

    fn id(&self) -> i64 {
        self.user.id
    }
}

impl<T> fmt::Display for UserManager<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "UserManager({:?}, {})", self.state, self.user)
    }
}
