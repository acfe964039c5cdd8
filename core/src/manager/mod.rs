//! Stateful managers over one remote entity each.
//!
//! # Design
//! A manager owns a `CommunityClient`, a transport and a mutable copy of its
//! entity. Operations take `&mut self`, so one network round-trip plus parse
//! is a single critical section over the manager's fields; sharing a manager
//! across threads needs the caller's own lock.
//!
//! Every operation returns `Ok(ErrorCode)` once the server has answered with
//! a decodable envelope, whatever the code. `Err` is reserved for transport
//! failures, malformed bodies and programming errors. Fields are only
//! assigned after the full body decoded, so a failed call leaves them as they
//! were.

mod account;
mod post;
mod user;

pub use account::AccountManager;
pub use post::PostManager;
pub use user::UserManager;

use log::{debug, warn};

use crate::client::CommunityClient;
use crate::code::ErrorCode;
use crate::error::ApiError;
use crate::http::{HttpRequest, Transport};
use crate::parser;

/// Load state of a manager's own entity.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ManagerState {
    /// Nothing loaded, fields hold their sentinel values.
    Empty,
    /// A fetch is in flight.
    Loading,
    /// The last fetch succeeded.
    Loaded,
    /// The server refused the last fetch. Fields keep whatever they held
    /// before that call.
    Error(ErrorCode),
}

/// A decoded response: the outcome code and the raw body for further parsing.
pub(crate) struct Reply {
    pub(crate) code: ErrorCode,
    pub(crate) body: String,
}

/// The request builder and transport a manager talks through.
pub(crate) struct Remote<T> {
    pub(crate) client: CommunityClient,
    pub(crate) transport: T,
}

impl<T: Transport> Remote<T> {
    /// Execute `request` and decode the envelope code. Any status other than
    /// 200 is reported as `UnknownException` without looking at the body.
    pub(crate) fn call(&self, request: HttpRequest) -> Result<Reply, ApiError> {
        let endpoint = request.url.split('?').next().unwrap_or_default().to_string();
        debug!("{:?} {}", request.method, endpoint);

        let response = self.transport.execute(&request)?;
        if response.status != 200 {
            warn!("{} answered HTTP {}", endpoint, response.status);
            return Ok(Reply {
                code: ErrorCode::UnknownException,
                body: response.body,
            });
        }

        let code = parser::decode_code(&response.body)?;
        if code.is_success() {
            debug!("{} -> {}", endpoint, code);
        } else {
            warn!("{} -> {}", endpoint, code);
        }
        Ok(Reply {
            code,
            body: response.body,
        })
    }

    /// Execute `request` and return only the decoded code.
    pub(crate) fn code(&self, request: HttpRequest) -> Result<ErrorCode, ApiError> {
        Ok(self.call(request)?.code)
    }
}

/// Run a fetch that loads a manager's own entity, tracking `state` around it.
///
/// `apply` runs only for `Success` replies and is expected to assign the
/// decoded fields. On `Err` the state returns to what it was before.
pub(crate) fn fetch<T: Transport>(
    state: &mut ManagerState,
    remote: &Remote<T>,
    request: HttpRequest,
    apply: impl FnOnce(&str) -> Result<(), ApiError>,
) -> Result<ErrorCode, ApiError> {
    let previous = std::mem::replace(state, ManagerState::Loading);
    let result = remote.call(request).and_then(|reply| {
        if reply.code.is_success() {
            apply(&reply.body)?;
        }
        Ok(reply.code)
    });
    *state = match &result {
        Ok(ErrorCode::Success) => ManagerState::Loaded,
        Ok(code) => ManagerState::Error(*code),
        Err(_) => previous,
    };
    result
}
