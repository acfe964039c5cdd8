//! Response parser: raw JSON bodies in, typed entities or codes out.
//!
//! # Design
//! Every endpoint answers with the envelope `{"code": <int>, "data": ...}`.
//! Field extraction and null handling live entirely in the serde attributes
//! of `crate::model`, so the freestanding (`parse_*`) and in-place
//! (`parse_*_into`) paths share one decoder and cannot diverge.
//!
//! The `_into` variants decode the whole body into fresh values before they
//! touch the target. A malformed body therefore leaves the target exactly as
//! it was, including for composite payloads such as login (user + token) and
//! post detail (post + comments + users).

use std::collections::HashMap;

use serde::de::DeserializeOwned;
use serde::Deserialize;

use crate::code::ErrorCode;
use crate::error::ApiError;
use crate::included::Included;
use crate::model::{Comment, Post, Token, User};

#[derive(Deserialize)]
struct CodeEnvelope {
    code: i64,
}

#[derive(Deserialize)]
struct DataEnvelope<T> {
    data: Option<T>,
}

#[derive(Deserialize)]
struct LoginData {
    user: User,
    token: Token,
}

#[derive(Deserialize)]
struct TokenData {
    token: Token,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct PostData {
    post_info: Post,
    comments: Vec<Comment>,
    users: Vec<User>,
}

#[derive(Deserialize)]
struct PostsData {
    posts: Vec<Post>,
    #[serde(default)]
    users: Vec<User>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct CreatedPost {
    post_id: i64,
}

/// A post together with its side-loaded comments and authors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PostDetail {
    pub post: Post,
    pub included: Included,
}

/// The post listing keyed by id, plus any side-loaded users.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PostListing {
    pub posts: HashMap<i64, Post>,
    pub included: Included,
}

/// Decode the envelope's `code` field. A body without one is malformed.
pub fn decode_code(body: &str) -> Result<ErrorCode, ApiError> {
    let envelope: CodeEnvelope = serde_json::from_str(body)?;
    Ok(ErrorCode::decode(envelope.code))
}

fn data<T: DeserializeOwned>(body: &str) -> Result<T, ApiError> {
    let envelope: DataEnvelope<T> = serde_json::from_str(body)?;
    envelope
        .data
        .ok_or_else(|| ApiError::MalformedPayload("missing `data`".to_string()))
}

fn keyed<T, I>(items: I, id: impl Fn(&T) -> i64) -> HashMap<i64, T>
where
    I: IntoIterator<Item = T>,
{
    let mut map = HashMap::new();
    for item in items {
        map.insert(id(&item), item);
    }
    map
}

pub fn parse_user(body: &str) -> Result<User, ApiError> {
    data(body)
}

pub fn parse_user_into(body: &str, target: &mut User) -> Result<(), ApiError> {
    *target = parse_user(body)?;
    Ok(())
}

/// Users from `{"data": [...]}`, keyed by id. Later duplicates win.
pub fn parse_users(body: &str) -> Result<HashMap<i64, User>, ApiError> {
    let users: Vec<User> = data(body)?;
    Ok(keyed(users, |u| u.id))
}

/// Replace the contents of `target` with the decoded users.
pub fn parse_users_into(body: &str, target: &mut HashMap<i64, User>) -> Result<(), ApiError> {
    let users = parse_users(body)?;
    target.clear();
    target.extend(users);
    Ok(())
}

pub fn parse_token(body: &str) -> Result<Token, ApiError> {
    let token: TokenData = data(body)?;
    Ok(token.token)
}

pub fn parse_token_into(body: &str, target: &mut Token) -> Result<(), ApiError> {
    *target = parse_token(body)?;
    Ok(())
}

/// Login and register answer with `{"data": {"user": ..., "token": ...}}`.
pub fn parse_login(body: &str) -> Result<(User, Token), ApiError> {
    let login: LoginData = data(body)?;
    Ok((login.user, login.token))
}

/// Assigns the user first, then the token. Nothing is assigned unless both
/// halves decode.
pub fn parse_login_into(body: &str, user: &mut User, token: &mut Token) -> Result<(), ApiError> {
    let (new_user, new_token) = parse_login(body)?;
    *user = new_user;
    *token = new_token;
    Ok(())
}

fn post_detail(post: PostData) -> PostDetail {
    let mut included = Included::new();
    included.extend(post.comments.into_iter().map(Into::into));
    included.extend(post.users.into_iter().map(Into::into));
    PostDetail {
        post: post.post_info,
        included,
    }
}

/// `{"data": {"postInfo": ..., "comments": [...], "users": [...]}}`.
/// Comments are included before users, each in payload order.
pub fn parse_post(body: &str) -> Result<PostDetail, ApiError> {
    let post: PostData = data(body)?;
    Ok(post_detail(post))
}

/// Replace `target` and the whole of `included` with the decoded post.
pub fn parse_post_into(body: &str, target: &mut Post, included: &mut Included) -> Result<(), ApiError> {
    let detail = parse_post(body)?;
    *target = detail.post;
    *included = detail.included;
    Ok(())
}

/// `{"data": {"posts": [...], "users": [...]}}`; `users` may be omitted.
pub fn parse_posts(body: &str) -> Result<PostListing, ApiError> {
    let listing: PostsData = data(body)?;
    let mut included = Included::new();
    included.extend(listing.users.into_iter().map(Into::into));
    Ok(PostListing {
        posts: keyed(listing.posts, |p| p.id),
        included,
    })
}

pub fn parse_posts_into(
    body: &str,
    posts: &mut HashMap<i64, Post>,
    included: &mut Included,
) -> Result<(), ApiError> {
    let listing = parse_posts(body)?;
    posts.clear();
    posts.extend(listing.posts);
    *included = listing.included;
    Ok(())
}

/// Id of a freshly created post, from `{"data": {"postId": ...}}`.
pub fn parse_created_post_id(body: &str) -> Result<i64, ApiError> {
    let created: CreatedPost = data(body)?;
    Ok(created.post_id)
}
