//! Sign-in, registration and token lifetime for the current account.
//!
//! # Design
//! The account wraps a `UserManager` for its own profile and adds the token.
//! Sign-in decodes user and token together before assigning either, and only
//! then copies the token into the shared `Session`.

use std::fmt;

use log::info;

use super::{ManagerState, UserManager};
use crate::client::CommunityClient;
use crate::code::ErrorCode;
use crate::error::ApiError;
use crate::http::{HttpRequest, Transport};
use crate::model::{Model, ModelKind, Token, User};
use crate::parser;

/// The signed-in account: its own profile plus the bearer token.
///
/// A successful login, register or token renewal stores the token here and
/// mirrors it into the shared `Session`, so every other manager built on the
/// same session authenticates with it from its next request on.
pub struct AccountManager<T> {
    profile: UserManager<T>,
    token: Token,
}

impl<T: Transport> AccountManager<T> {
    pub fn new(client: CommunityClient, transport: T) -> Self {
        Self {
            profile: UserManager::new(client, transport),
            token: Token::empty(),
        }
    }

    pub fn user(&self) -> &User {
        self.profile.user()
    }

    pub fn token(&self) -> &Token {
        &self.token
    }

    pub fn state(&self) -> ManagerState {
        self.profile.state()
    }

    pub fn transport(&self) -> &T {
        self.profile.transport()
    }

    pub fn client(&self) -> &CommunityClient {
        self.profile.client()
    }

    pub fn is_logged_in(&self) -> bool {
        !self.token.is_empty()
    }

    pub fn login(&mut self, name: &str, password: &str, remember: bool) -> Result<ErrorCode, ApiError> {
        info!("login as {name:?}");
        let request = self.profile.remote.client.build_login(name, password, remember)?;
        self.sign_in(request)
    }

    /// Create an account. On success the new account is signed in.
    pub fn register(
        &mut self,
        name: &str,
        password: &str,
        email: &str,
        accept_terms: bool,
    ) -> Result<ErrorCode, ApiError> {
        info!("register {name:?}");
        let request = self
            .profile
            .remote
            .client
            .build_register(name, password, email, accept_terms)?;
        self.sign_in(request)
    }

    fn sign_in(&mut self, request: HttpRequest) -> Result<ErrorCode, ApiError> {
        let reply = self.profile.remote.call(request)?;
        if !reply.code.is_success() {
            return Ok(reply.code);
        }
        parser::parse_login_into(&reply.body, &mut self.profile.user, &mut self.token)?;
        self.profile.state = ManagerState::Loaded;
        self.profile.remote.client.session().set_token(self.token.value.clone());
        Ok(reply.code)
    }

    /// Renew the token this account currently holds.
    pub fn token_renew(&mut self) -> Result<ErrorCode, ApiError> {
        let current = self.token.value.clone();
        self.token_renew_with(&current)
    }

    /// Exchange `token` for a fresh one and adopt it.
    pub fn token_renew_with(&mut self, token: &str) -> Result<ErrorCode, ApiError> {
        info!("renew token");
        let request = self.profile.remote.client.build_token_renew(token)?;
        let reply = self.profile.remote.call(request)?;
        if !reply.code.is_success() {
            return Ok(reply.code);
        }
        parser::parse_token_into(&reply.body, &mut self.token)?;
        self.profile.remote.client.session().set_token(self.token.value.clone());
        Ok(reply.code)
    }

    /// Ask the server to send the verification email for `user_id` again.
    pub fn resend_verify_email(&mut self, user_id: i64) -> Result<ErrorCode, ApiError> {
        info!("resend verification email for user {user_id}");
        let request = self.profile.remote.client.build_resend_verify_email(user_id)?;
        self.profile.remote.code(request)
    }

    /// Reload the account's profile as user `id`.
    pub fn get(&mut self, id: i64) -> Result<ErrorCode, ApiError> {
        self.profile.get(id)
    }

    pub fn update(&mut self) -> Result<ErrorCode, ApiError> {
        self.profile.update()
    }

    pub fn delete(&mut self) -> Result<ErrorCode, ApiError> {
        self.profile.delete()
    }

    /// Forget the account locally and drop the session token. No request is
    /// sent.
    pub fn logout(&mut self) {
        info!("logout");
        self.profile.clear();
        self.token = Token::empty();
        self.profile.remote.client.session().clear_token();
    }
}

impl<T> Model for AccountManager<T> {
    fn kind(&self) -> ModelKind {
        ModelKind::User
    }

    fn id(&self) -> i64 {
        self.profile.user.id
    }
}

impl<T> fmt::Display for AccountManager<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "AccountManager({}, {})", self.profile.user, self.token)
    }
}
