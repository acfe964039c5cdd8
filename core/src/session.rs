//! Shared authentication state: user agent and bearer token.
//!
//! # Design
//! `Session` is a cheap, cloneable handle over one `RwLock`. Every manager
//! holds a clone and reads it when building a request; login and token
//! renewal write it. Writes replace the token outright (last write wins) and
//! a request already built keeps the headers it was built with.

use std::sync::{Arc, PoisonError, RwLock};

use crate::error::ApiError;

#[derive(Debug, Default)]
struct SessionState {
    user_agent: Option<String>,
    token: String,
}

/// Handle to the process-wide session.
#[derive(Debug, Clone, Default)]
pub struct Session {
    inner: Arc<RwLock<SessionState>>,
}

impl Session {
    /// An uninitialized session. Building any request fails with
    /// `NotInitialized` until `init` is called.
    pub fn new() -> Self {
        Self::default()
    }

    /// A session initialized with `user_agent`.
    pub fn with_user_agent(user_agent: impl Into<String>) -> Self {
        let session = Self::new();
        session.init(user_agent);
        session
    }

    pub fn init(&self, user_agent: impl Into<String>) {
        let mut state = self.inner.write().unwrap_or_else(PoisonError::into_inner);
        state.user_agent = Some(user_agent.into());
    }

    pub fn is_initialized(&self) -> bool {
        self.inner
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .user_agent
            .is_some()
    }

    pub fn user_agent(&self) -> Result<String, ApiError> {
        self.inner
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .user_agent
            .clone()
            .ok_or(ApiError::NotInitialized)
    }

    pub fn set_token(&self, token: impl Into<String>) {
        let mut state = self.inner.write().unwrap_or_else(PoisonError::into_inner);
        state.token = token.into();
    }

    pub fn clear_token(&self) {
        self.set_token(String::new());
    }

    /// The current bearer token, empty when logged out.
    pub fn token(&self) -> String {
        self.inner.read().unwrap_or_else(PoisonError::into_inner).token.clone()
    }

    /// Headers every request carries: the user agent, and the bearer token
    /// when one is held.
    pub(crate) fn headers(&self) -> Result<Vec<(String, String)>, ApiError> {
        let state = self.inner.read().unwrap_or_else(PoisonError::into_inner);
        let user_agent = state.user_agent.clone().ok_or(ApiError::NotInitialized)?;
        let mut headers = vec![("user-agent".to_string(), user_agent)];
        if !state.token.is_empty() {
            headers.push(("authorization".to_string(), format!("Bearer {}", state.token)));
        }
        Ok(headers)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn uninitialized_session_rejects_headers() {
        let session = Session::new();
        assert!(!session.is_initialized());
        assert!(matches!(session.user_agent(), Err(ApiError::NotInitialized)));
        assert!(matches!(session.headers(), Err(ApiError::NotInitialized)));
    }

    #[test]
    fn headers_include_token_only_when_set() {
        let session = Session::with_user_agent("community-test/1.0");
        assert_eq!(
            session.headers().unwrap(),
            vec![("user-agent".to_string(), "community-test/1.0".to_string())]
        );

        session.set_token("abc");
        let headers = session.headers().unwrap();
        assert_eq!(headers.len(), 2);
        assert_eq!(headers[1], ("authorization".to_string(), "Bearer abc".to_string()));
    }

    #[test]
    fn clones_share_state() {
        let session = Session::with_user_agent("ua");
        let other = session.clone();
        other.set_token("shared");
        assert_eq!(session.token(), "shared");
        session.clear_token();
        assert_eq!(other.token(), "");
    }

    #[test]
    fn last_write_wins_across_threads() {
        let session = Session::with_user_agent("ua");
        let handles: Vec<_> = (0..4)
            .map(|i| {
                let s = session.clone();
                std::thread::spawn(move || s.set_token(format!("t{i}")))
            })
            .collect();
        for h in handles {
            h.join().unwrap();
        }
        assert!(session.token().starts_with('t'));
    }
}
