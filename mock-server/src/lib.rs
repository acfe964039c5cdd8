use std::collections::{HashMap, HashSet};
use std::sync::Arc;
use std::time::{SystemTime, UNIX_EPOCH};

use axum::{
    extract::{Path, Query, State},
    http::HeaderMap,
    routing::{get, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use tokio::{net::TcpListener, sync::RwLock};
use uuid::Uuid;

pub const SUCCESS: i64 = 0;
pub const REGISTER_SAME_NAME: i64 = 10;
pub const REGISTER_SAME_EMAIL: i64 = 11;
pub const TERM_NOT_ACCEPTED: i64 = 12;
pub const LOGIN_CREDENTIALS_INVALID: i64 = 21;
pub const USER_NOT_FOUND: i64 = 30;
pub const ACCOUNT_ALREADY_VERIFIED: i64 = 42;
pub const TOKEN_REQUIRED: i64 = 50;
pub const TOKEN_SIGNATURE_INVALID: i64 = 53;
pub const NO_UPDATE_NEEDED: i64 = 54;
pub const POST_NOT_FOUND: i64 = 60;
pub const COMMENT_NOT_FOUND: i64 = 70;
pub const INVALID_PARAMETERS: i64 = 1001;

const DAY_SECS: i64 = 24 * 60 * 60;

#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserInfo {
    pub user_id: i64,
    pub user_name: String,
    pub user_display_name: String,
    pub user_avatar: Option<String>,
    pub user_role: i64,
    pub user_created_date: String,
    pub user_points: Option<i64>,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PostInfo {
    pub post_id: i64,
    pub title: String,
    pub created_user_id: i64,
    pub content: String,
    pub created_date: String,
    pub last_comment_id: Option<i64>,
    pub last_comment_user_id: Option<i64>,
    pub last_comment_date: Option<String>,
    pub edited_date: Option<String>,
    pub edited_user_id: Option<i64>,
    pub view_count: i64,
    pub comment_count: i64,
    pub like_count: i64,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CommentInfo {
    pub comment_id: i64,
    pub post_id: i64,
    pub created_user_id: i64,
    pub created_date: String,
    pub content: String,
    pub like_count: i64,
    pub edited_date: Option<String>,
    pub edited_user_id: Option<i64>,
    pub is_hidden: bool,
    pub hidden_date: Option<String>,
    pub hidden_user_id: Option<i64>,
    pub ip_address: String,
}

struct Account {
    info: UserInfo,
    password: String,
    email: String,
    verified: bool,
}

#[derive(Clone, Copy, PartialEq, Eq, Hash)]
enum LikeTarget {
    Post(i64),
    Comment(i64),
}

#[derive(Default)]
pub struct Forum {
    accounts: Vec<Account>,
    posts: Vec<PostInfo>,
    comments: Vec<CommentInfo>,
    tokens: HashMap<String, i64>,
    likes: HashSet<(LikeTarget, i64)>,
}

pub type Db = Arc<RwLock<Forum>>;

fn now() -> i64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs() as i64)
        .unwrap_or_default()
}

fn timestamp() -> String {
    now().to_string()
}

fn reply(code: i64) -> Json<Value> {
    Json(json!({ "code": code }))
}

fn reply_data(data: Value) -> Json<Value> {
    Json(json!({ "code": SUCCESS, "data": data }))
}

impl Forum {
    /// The forum `app()` starts from: user 1 `admin` (password `admin123`,
    /// verified) and post 1 "Welcome" with one comment by that user.
    pub fn seeded() -> Self {
        let mut forum = Forum::default();
        let admin = forum.add_account("admin", "admin123", "admin@community.test");
        forum.accounts[0].info.user_role = 2;
        forum.accounts[0].verified = true;
        let post_id = forum.add_post(admin, "Welcome", "First post of the community.");
        forum.add_comment(admin, post_id, "Say hello below.");
        forum
    }

    fn add_account(&mut self, name: &str, password: &str, email: &str) -> i64 {
        let id = self.accounts.len() as i64 + 1;
        self.accounts.push(Account {
            info: UserInfo {
                user_id: id,
                user_name: name.to_string(),
                user_display_name: name.to_string(),
                user_avatar: None,
                user_role: 0,
                user_created_date: timestamp(),
                user_points: Some(0),
            },
            password: password.to_string(),
            email: email.to_string(),
            verified: false,
        });
        id
    }

    fn add_post(&mut self, user_id: i64, title: &str, content: &str) -> i64 {
        let id = self.posts.len() as i64 + 1;
        self.posts.push(PostInfo {
            post_id: id,
            title: title.to_string(),
            created_user_id: user_id,
            content: content.to_string(),
            created_date: timestamp(),
            last_comment_id: None,
            last_comment_user_id: None,
            last_comment_date: None,
            edited_date: None,
            edited_user_id: None,
            view_count: 0,
            comment_count: 0,
            like_count: 0,
        });
        id
    }

    fn add_comment(&mut self, user_id: i64, post_id: i64, content: &str) -> Option<i64> {
        let id = self.comments.len() as i64 + 1;
        let created = timestamp();
        let post = self.posts.iter_mut().find(|p| p.post_id == post_id)?;
        post.comment_count += 1;
        post.last_comment_id = Some(id);
        post.last_comment_user_id = Some(user_id);
        post.last_comment_date = Some(created.clone());
        self.comments.push(CommentInfo {
            comment_id: id,
            post_id,
            created_user_id: user_id,
            created_date: created,
            content: content.to_string(),
            like_count: 0,
            edited_date: None,
            edited_user_id: None,
            is_hidden: false,
            hidden_date: None,
            hidden_user_id: None,
            ip_address: "127.0.0.1".to_string(),
        });
        Some(id)
    }

    fn user(&self, id: i64) -> Option<&UserInfo> {
        self.accounts.iter().map(|a| &a.info).find(|u| u.user_id == id)
    }

    /// Users referenced by `ids`, once each, in first-seen order.
    fn users_for(&self, ids: impl IntoIterator<Item = i64>) -> Vec<UserInfo> {
        let mut seen = HashSet::new();
        ids.into_iter()
            .filter(|id| seen.insert(*id))
            .filter_map(|id| self.user(id).cloned())
            .collect()
    }

    fn issue_token(&mut self, user_id: i64, remember: bool) -> Value {
        let value = Uuid::new_v4().to_string();
        self.tokens.insert(value.clone(), user_id);
        let lifetime = if remember { 30 * DAY_SECS } else { DAY_SECS };
        json!({ "value": value, "exp": now() + lifetime })
    }

    fn sign_in(&mut self, user_id: i64, remember: bool) -> Json<Value> {
        let token = self.issue_token(user_id, remember);
        match self.user(user_id) {
            Some(user) => reply_data(json!({ "user": user, "token": token })),
            None => reply(USER_NOT_FOUND),
        }
    }

    /// Resolve the bearer token in `headers` to a user id, or the code to
    /// answer with.
    fn authenticate(&self, headers: &HeaderMap) -> Result<i64, i64> {
        let token = headers
            .get("authorization")
            .and_then(|v| v.to_str().ok())
            .and_then(|v| v.strip_prefix("Bearer "))
            .ok_or(TOKEN_REQUIRED)?;
        self.tokens.get(token).copied().ok_or(TOKEN_SIGNATURE_INVALID)
    }
}

/// Every route answers HTTP 200 with `{"code": .., "data": ..}`; failures
/// carry only `code`. Optional fields go out as explicit `null`.
pub fn app() -> Router {
    let db: Db = Arc::new(RwLock::new(Forum::seeded()));
    Router::new()
        .route("/account/login", post(login))
        .route("/account/register", post(register))
        .route("/token/renew", get(renew_token))
        .route("/email/verify/send", get(send_verify_email))
        .route("/user", get(list_users))
        .route("/user/{id}", get(get_user))
        .route("/post", get(list_posts).post(create_post))
        .route("/post/{id}", get(get_post))
        .route("/comment", post(create_comment))
        .route("/like/post", get(like_post))
        .route("/like/comment", get(like_comment))
        .with_state(db)
}

pub async fn run(listener: TcpListener) -> Result<(), std::io::Error> {
    axum::serve(listener, app()).await
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginBody {
    pub name: String,
    pub password: String,
    #[serde(default)]
    pub is_remember: bool,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RegisterBody {
    pub name: String,
    pub password: String,
    pub email: String,
    #[serde(default)]
    pub is_accept_term: bool,
}

#[derive(Deserialize)]
pub struct CreatePostBody {
    pub title: String,
    pub content: String,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateCommentBody {
    pub post_id: i64,
    pub content: String,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RenewQuery {
    pub token: String,
    #[serde(default)]
    pub is_remember: bool,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VerifyQuery {
    pub user_id: i64,
}

#[derive(Deserialize)]
pub struct UserQuery {
    pub name: Option<String>,
}

#[derive(Deserialize)]
pub struct LikeQuery {
    pub id: i64,
    #[serde(default)]
    pub cancel: bool,
}

async fn login(State(db): State<Db>, Json(input): Json<LoginBody>) -> Json<Value> {
    let mut forum = db.write().await;
    let user_id = forum
        .accounts
        .iter()
        .find(|a| a.info.user_name == input.name && a.password == input.password)
        .map(|a| a.info.user_id);
    match user_id {
        Some(id) => forum.sign_in(id, input.is_remember),
        None => reply(LOGIN_CREDENTIALS_INVALID),
    }
}

async fn register(State(db): State<Db>, Json(input): Json<RegisterBody>) -> Json<Value> {
    if !input.is_accept_term {
        return reply(TERM_NOT_ACCEPTED);
    }
    if input.name.is_empty() || input.password.is_empty() {
        return reply(INVALID_PARAMETERS);
    }
    let mut forum = db.write().await;
    if forum.accounts.iter().any(|a| a.info.user_name == input.name) {
        return reply(REGISTER_SAME_NAME);
    }
    if forum.accounts.iter().any(|a| a.email == input.email) {
        return reply(REGISTER_SAME_EMAIL);
    }
    let id = forum.add_account(&input.name, &input.password, &input.email);
    forum.sign_in(id, false)
}

async fn renew_token(State(db): State<Db>, Query(query): Query<RenewQuery>) -> Json<Value> {
    let mut forum = db.write().await;
    let Some(user_id) = forum.tokens.remove(&query.token) else {
        return reply(TOKEN_SIGNATURE_INVALID);
    };
    let token = forum.issue_token(user_id, query.is_remember);
    reply_data(json!({ "token": token }))
}

async fn send_verify_email(State(db): State<Db>, Query(query): Query<VerifyQuery>) -> Json<Value> {
    let forum = db.read().await;
    match forum.accounts.iter().find(|a| a.info.user_id == query.user_id) {
        None => reply(USER_NOT_FOUND),
        Some(a) if a.verified => reply(ACCOUNT_ALREADY_VERIFIED),
        Some(_) => reply(SUCCESS),
    }
}

async fn list_users(State(db): State<Db>, Query(query): Query<UserQuery>) -> Json<Value> {
    let forum = db.read().await;
    match query.name {
        Some(name) => match forum.accounts.iter().find(|a| a.info.user_name == name) {
            Some(a) => reply_data(json!(a.info)),
            None => reply(USER_NOT_FOUND),
        },
        None => {
            let users: Vec<&UserInfo> = forum.accounts.iter().map(|a| &a.info).collect();
            reply_data(json!(users))
        }
    }
}

async fn get_user(State(db): State<Db>, Path(id): Path<i64>) -> Json<Value> {
    let forum = db.read().await;
    match forum.user(id) {
        Some(user) => reply_data(json!(user)),
        None => reply(USER_NOT_FOUND),
    }
}

async fn list_posts(State(db): State<Db>) -> Json<Value> {
    let forum = db.read().await;
    let users = forum.users_for(forum.posts.iter().map(|p| p.created_user_id));
    reply_data(json!({ "posts": forum.posts, "users": users }))
}

async fn get_post(State(db): State<Db>, Path(id): Path<i64>) -> Json<Value> {
    let mut forum = db.write().await;
    let Some(post) = forum.posts.iter_mut().find(|p| p.post_id == id) else {
        return reply(POST_NOT_FOUND);
    };
    post.view_count += 1;
    let post = post.clone();
    let comments: Vec<CommentInfo> = forum.comments.iter().filter(|c| c.post_id == id).cloned().collect();
    let authors = std::iter::once(post.created_user_id).chain(comments.iter().map(|c| c.created_user_id));
    let users = forum.users_for(authors);
    reply_data(json!({ "postInfo": post, "comments": comments, "users": users }))
}

async fn create_post(State(db): State<Db>, headers: HeaderMap, Json(input): Json<CreatePostBody>) -> Json<Value> {
    let mut forum = db.write().await;
    let user_id = match forum.authenticate(&headers) {
        Ok(id) => id,
        Err(code) => return reply(code),
    };
    if input.title.trim().is_empty() {
        return reply(INVALID_PARAMETERS);
    }
    let id = forum.add_post(user_id, &input.title, &input.content);
    reply_data(json!({ "postId": id }))
}

async fn create_comment(
    State(db): State<Db>,
    headers: HeaderMap,
    Json(input): Json<CreateCommentBody>,
) -> Json<Value> {
    let mut forum = db.write().await;
    let user_id = match forum.authenticate(&headers) {
        Ok(id) => id,
        Err(code) => return reply(code),
    };
    match forum.add_comment(user_id, input.post_id, &input.content) {
        Some(id) => reply_data(json!({ "commentId": id })),
        None => reply(POST_NOT_FOUND),
    }
}

/// Toggle one like. Liking twice, or cancelling a like that does not exist,
/// answers `NO_UPDATE_NEEDED`.
fn toggle_like(forum: &mut Forum, headers: &HeaderMap, target: LikeTarget, cancel: bool) -> Json<Value> {
    let user_id = match forum.authenticate(headers) {
        Ok(id) => id,
        Err(code) => return reply(code),
    };
    let counter = match target {
        LikeTarget::Post(id) => forum.posts.iter_mut().find(|p| p.post_id == id).map(|p| &mut p.like_count),
        LikeTarget::Comment(id) => forum
            .comments
            .iter_mut()
            .find(|c| c.comment_id == id)
            .map(|c| &mut c.like_count),
    };
    let Some(counter) = counter else {
        return reply(match target {
            LikeTarget::Post(_) => POST_NOT_FOUND,
            LikeTarget::Comment(_) => COMMENT_NOT_FOUND,
        });
    };
    let key = (target, user_id);
    let changed = if cancel {
        forum.likes.remove(&key)
    } else {
        forum.likes.insert(key)
    };
    if !changed {
        return reply(NO_UPDATE_NEEDED);
    }
    *counter += if cancel { -1 } else { 1 };
    reply(SUCCESS)
}

async fn like_post(State(db): State<Db>, headers: HeaderMap, Query(query): Query<LikeQuery>) -> Json<Value> {
    let mut forum = db.write().await;
    toggle_like(&mut forum, &headers, LikeTarget::Post(query.id), query.cancel)
}

async fn like_comment(State(db): State<Db>, headers: HeaderMap, Query(query): Query<LikeQuery>) -> Json<Value> {
    let mut forum = db.write().await;
    toggle_like(&mut forum, &headers, LikeTarget::Comment(query.id), query.cancel)
}
