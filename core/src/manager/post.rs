//! Post detail, the post listing, and writes on posts and comments.
//!
//! # Design
//! Writes answer with an id at most, so `create` and `create_comment` follow
//! a successful write with a reload of the post. The write's own code is what
//! the caller gets back: a reload that fails only shows up in `state()` and
//! the log, never as a failed write the caller might retry.

use std::collections::HashMap;
use std::fmt;

use log::{info, warn};

use super::{fetch, ManagerState, Remote};
use crate::client::CommunityClient;
use crate::code::ErrorCode;
use crate::error::ApiError;
use crate::http::Transport;
use crate::included::Included;
use crate::model::{Model, ModelKind, Post, UNSET_ID};
use crate::parser;

/// Loads one post with its comments and their authors, and acts on posts
/// and comments.
///
/// After a successful `get` the included store holds the post's comments
/// followed by the users they reference, both in the order the server sent
/// them. `get_all` replaces it with the users side-loaded by the listing.
pub struct PostManager<T> {
    remote: Remote<T>,
    post: Post,
    included: Included,
    all_posts: HashMap<i64, Post>,
    last_created: Option<i64>,
    state: ManagerState,
}

impl<T: Transport> PostManager<T> {
    pub fn new(client: CommunityClient, transport: T) -> Self {
        Self {
            remote: Remote { client, transport },
            post: Post::empty(),
            included: Included::new(),
            all_posts: HashMap::new(),
            last_created: None,
            state: ManagerState::Empty,
        }
    }

    pub fn post(&self) -> &Post {
        &self.post
    }

    pub fn included(&self) -> &Included {
        &self.included
    }

    /// Every post from the last successful `get_all`, keyed by id.
    pub fn all_posts(&self) -> &HashMap<i64, Post> {
        &self.all_posts
    }

    /// Id of the post most recently published through `create`, whether or
    /// not the reload that followed succeeded.
    pub fn last_created_id(&self) -> Option<i64> {
        self.last_created
    }

    pub fn state(&self) -> ManagerState {
        self.state
    }

    pub fn transport(&self) -> &T {
        &self.remote.transport
    }

    pub fn client(&self) -> &CommunityClient {
        &self.remote.client
    }

    /// Load post `id`, replacing the post and the whole included store.
    pub fn get(&mut self, id: i64) -> Result<ErrorCode, ApiError> {
        info!("fetch post {id}");
        let request = self.remote.client.build_get_post(id)?;
        fetch(&mut self.state, &self.remote, request, |body| {
            parser::parse_post_into(body, &mut self.post, &mut self.included)
        })
    }

    /// Replace `all_posts` and the included store with the post listing.
    pub fn get_all(&mut self) -> Result<ErrorCode, ApiError> {
        info!("fetch post list");
        let request = self.remote.client.build_list_posts()?;
        let reply = self.remote.call(request)?;
        if reply.code.is_success() {
            parser::parse_posts_into(&reply.body, &mut self.all_posts, &mut self.included)?;
        }
        Ok(reply.code)
    }

    /// Publish a new post, then load it. Two round trips: the create call
    /// only answers with the new id.
    pub fn create(&mut self, title: &str, content: &str) -> Result<ErrorCode, ApiError> {
        info!("create post {title:?}");
        let request = self.remote.client.build_create_post(title, content)?;
        let reply = self.remote.call(request)?;
        if !reply.code.is_success() {
            return Ok(reply.code);
        }
        let id = parser::parse_created_post_id(&reply.body)?;
        self.last_created = Some(id);
        self.reload(id);
        Ok(reply.code)
    }

    /// Comment on the loaded post, then reload it so the new comment shows
    /// up in the included store. Without a loaded post nothing is sent and
    /// the answer is `PostNotFound`.
    pub fn create_comment(&mut self, content: &str) -> Result<ErrorCode, ApiError> {
        let post_id = self.post.id;
        if post_id == UNSET_ID {
            warn!("comment without a loaded post");
            return Ok(ErrorCode::PostNotFound);
        }
        info!("comment on post {post_id}");
        let request = self.remote.client.build_create_comment(post_id, content)?;
        let code = self.remote.code(request)?;
        if code.is_success() {
            self.reload(post_id);
        }
        Ok(code)
    }

    fn reload(&mut self, id: i64) {
        match self.get(id) {
            Ok(ErrorCode::Success) => {}
            Ok(code) => warn!("reload of post {id} answered {code}"),
            Err(e) => warn!("reload of post {id} failed: {e}"),
        }
    }

    pub fn like(&mut self, id: i64) -> Result<ErrorCode, ApiError> {
        info!("like post {id}");
        let request = self.remote.client.build_like_post(id, false)?;
        self.remote.code(request)
    }

    pub fn unlike(&mut self, id: i64) -> Result<ErrorCode, ApiError> {
        info!("unlike post {id}");
        let request = self.remote.client.build_like_post(id, true)?;
        self.remote.code(request)
    }

    pub fn like_comment(&mut self, id: i64) -> Result<ErrorCode, ApiError> {
        info!("like comment {id}");
        let request = self.remote.client.build_like_comment(id, false)?;
        self.remote.code(request)
    }

    pub fn unlike_comment(&mut self, id: i64) -> Result<ErrorCode, ApiError> {
        info!("unlike comment {id}");
        let request = self.remote.client.build_like_comment(id, true)?;
        self.remote.code(request)
    }

    /// Post editing has no endpoint yet.
    pub fn update(&mut self) -> Result<ErrorCode, ApiError> {
        Err(ApiError::NotImplemented {
            operation: "PostManager::update",
        })
    }

    pub fn delete(&mut self) -> Result<ErrorCode, ApiError> {
        Err(ApiError::NotImplemented {
            operation: "PostManager::delete",
        })
    }

    /// Reset the post and the included store.
    pub fn clear(&mut self) -> &mut Self {
        self.post = Post::empty();
        self.included.clear();
        self.state = ManagerState::Empty;
        self
    }
}

impl<T> Model for PostManager<T> {
    fn kind(&self) -> ModelKind {
        ModelKind::Post
    }

    fn id(&self) -> i64 {
        self.post.id
    }
}

impl<T> fmt::Display for PostManager<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "PostManager({:?}, {}, included={}, all_posts={})",
            self.state,
            self.post,
            self.included.len(),
            self.all_posts.len()
        )
    }
}
