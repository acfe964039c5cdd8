//! Domain entities decoded from the community API.
//!
//! # Design
//! Each entity is a plain value type whose serde attributes *are* the wire
//! contract: keys are camelCase, optional fields are `Option` and decode to
//! `None` when absent or `null`, and every other field is required. A missing
//! required field is a parse error, never a silent default.
//!
//! Managers keep their own copy of an entity and replace it wholesale after
//! each successful parse. Entities placed in the included store are never
//! touched again. The `Model` trait is the shared read capability across
//! both.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Local id marking an entity that has not been loaded yet.
pub const UNSET_ID: i64 = -1;

/// Discriminator for the concrete entity kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ModelKind {
    User,
    Post,
    Comment,
}

impl fmt::Display for ModelKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ModelKind::User => write!(f, "user"),
            ModelKind::Post => write!(f, "post"),
            ModelKind::Comment => write!(f, "comment"),
        }
    }
}

/// Fields every entity exposes.
pub trait Model: fmt::Display {
    fn kind(&self) -> ModelKind;

    /// Id assigned by the server, `UNSET_ID` before the first load.
    fn id(&self) -> i64;
}

/// A community member.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    #[serde(rename = "userId")]
    pub id: i64,
    #[serde(rename = "userName")]
    pub name: String,
    #[serde(rename = "userDisplayName")]
    pub display_name: String,
    #[serde(rename = "userAvatar", default, skip_serializing_if = "Option::is_none")]
    pub avatar: Option<String>,
    #[serde(rename = "userRole")]
    pub role: i64,
    /// Opaque server timestamp.
    #[serde(rename = "userCreatedDate")]
    pub created_date: String,
    #[serde(rename = "userPoints", default, skip_serializing_if = "Option::is_none")]
    pub points: Option<i64>,
}

impl User {
    /// The not-yet-loaded user a manager starts from.
    pub fn empty() -> Self {
        Self {
            id: UNSET_ID,
            name: String::new(),
            display_name: String::new(),
            avatar: None,
            role: -1,
            created_date: String::new(),
            points: None,
        }
    }
}

impl Default for User {
    fn default() -> Self {
        Self::empty()
    }
}

impl Model for User {
    fn kind(&self) -> ModelKind {
        ModelKind::User
    }

    fn id(&self) -> i64 {
        self.id
    }
}

impl fmt::Display for User {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "User(id={}, name={}, display_name={}, role={}, avatar={}, created={}",
            self.id,
            self.name,
            self.display_name,
            self.role,
            self.avatar.as_deref().unwrap_or("-"),
            self.created_date
        )?;
        if let Some(points) = self.points {
            write!(f, ", points={points}")?;
        }
        write!(f, ")")
    }
}

/// A forum thread's opening post.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Post {
    #[serde(rename = "postId")]
    pub id: i64,
    pub title: String,
    pub created_user_id: i64,
    pub content: String,
    pub created_date: String,
    // The last-comment trio travels together on the wire but each field is
    // decoded independently.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_comment_id: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_comment_user_id: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_comment_date: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub edited_date: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub edited_user_id: Option<i64>,
    pub view_count: i64,
    pub comment_count: i64,
    pub like_count: i64,
}

impl Post {
    pub fn empty() -> Self {
        Self {
            id: UNSET_ID,
            title: String::new(),
            created_user_id: UNSET_ID,
            content: String::new(),
            created_date: String::new(),
            last_comment_id: None,
            last_comment_user_id: None,
            last_comment_date: None,
            edited_date: None,
            edited_user_id: None,
            view_count: -1,
            comment_count: -1,
            like_count: -1,
        }
    }
}

impl Default for Post {
    fn default() -> Self {
        Self::empty()
    }
}

impl Model for Post {
    fn kind(&self) -> ModelKind {
        ModelKind::Post
    }

    fn id(&self) -> i64 {
        self.id
    }
}

impl fmt::Display for Post {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Post(id={}, title={}, author={}, created={}, views={}, comments={}, likes={}",
            self.id,
            self.title,
            self.created_user_id,
            self.created_date,
            self.view_count,
            self.comment_count,
            self.like_count
        )?;
        if let Some(id) = self.last_comment_id {
            write!(f, ", last_comment={id}")?;
        }
        if let Some(date) = &self.edited_date {
            write!(f, ", edited={date}")?;
        }
        write!(f, ")")
    }
}

/// A reply under a post.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Comment {
    #[serde(rename = "commentId", alias = "id")]
    pub id: i64,
    pub post_id: i64,
    pub created_user_id: i64,
    pub created_date: String,
    pub content: String,
    pub like_count: i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub edited_date: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub edited_user_id: Option<i64>,
    #[serde(rename = "isHidden")]
    pub hidden: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hidden_date: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hidden_user_id: Option<i64>,
    /// Recorded by the server, never sent by the client.
    pub ip_address: String,
}

impl Model for Comment {
    fn kind(&self) -> ModelKind {
        ModelKind::Comment
    }

    fn id(&self) -> i64 {
        self.id
    }
}

impl fmt::Display for Comment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Comment(id={}, post={}, author={}, created={}, likes={}, hidden={})",
            self.id, self.post_id, self.created_user_id, self.created_date, self.like_count, self.hidden
        )
    }
}

/// Bearer token issued on login, register and renew.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Token {
    pub value: String,
    /// Expiry in epoch seconds, `-1` when no token is held.
    pub exp: i64,
}

impl Token {
    pub fn empty() -> Self {
        Self {
            value: String::new(),
            exp: -1,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.value.is_empty()
    }
}

impl Default for Token {
    fn default() -> Self {
        Self::empty()
    }
}

// The token value is a credential and never appears in the display form.
impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_empty() {
            write!(f, "Token(none)")
        } else {
            write!(f, "Token(exp={})", self.exp)
        }
    }
}
