//! Client configuration.
//!
//! `ClientConfig` deserializes with defaults so a host can embed it as a
//! section of its own config file, or it can be read from the environment:
//!
//! ```text
//! COMMUNITY_BASE_URL=https://community.example.com/api
//! COMMUNITY_USER_AGENT=my-app/2.1
//! ```

use serde::Deserialize;

use crate::client::CommunityClient;
use crate::session::Session;

pub const DEFAULT_BASE_URL: &str = "http://localhost:3000";

/// Where the API lives and how the client identifies itself.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct ClientConfig {
    pub base_url: String,
    pub user_agent: String,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            user_agent: default_user_agent(),
        }
    }
}

fn default_user_agent() -> String {
    format!("community-core/{}", env!("CARGO_PKG_VERSION"))
}

impl ClientConfig {
    /// Read `COMMUNITY_BASE_URL` and `COMMUNITY_USER_AGENT`, keeping the
    /// default for each one that is unset.
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            base_url: std::env::var("COMMUNITY_BASE_URL").unwrap_or(defaults.base_url),
            user_agent: std::env::var("COMMUNITY_USER_AGENT").unwrap_or(defaults.user_agent),
        }
    }

    /// An initialized session and a client bound to it.
    pub fn connect(&self) -> (Session, CommunityClient) {
        let session = Session::with_user_agent(self.user_agent.clone());
        let client = CommunityClient::new(&self.base_url, session.clone());
        (session, client)
    }
}
