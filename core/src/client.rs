//! HTTP request builder for every community endpoint.
//!
//! # Design
//! `CommunityClient` holds the base URL and a `Session` handle and never
//! touches the network. Each `build_*` method snapshots the session headers
//! into a self-contained `HttpRequest`, so a request keeps the token that was
//! current when it was built even if a later login replaces it. Executing
//! the request and decoding the response is left to the managers.

use serde::Serialize;

use crate::error::ApiError;
use crate::http::{HttpMethod, HttpRequest};
use crate::session::Session;

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct LoginBody<'a> {
    name: &'a str,
    password: &'a str,
    is_remember: bool,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct RegisterBody<'a> {
    name: &'a str,
    password: &'a str,
    email: &'a str,
    is_accept_term: bool,
}

#[derive(Serialize)]
struct CreatePostBody<'a> {
    title: &'a str,
    content: &'a str,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct CreateCommentBody<'a> {
    post_id: i64,
    content: &'a str,
}

/// Builds requests against one community API root.
#[derive(Debug, Clone)]
pub struct CommunityClient {
    base_url: String,
    session: Session,
}

impl CommunityClient {
    pub fn new(base_url: &str, session: Session) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            session,
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    fn url(&self, path: &str) -> String {
        format!("{}/{path}", self.base_url)
    }

    fn get(&self, path: &str) -> Result<HttpRequest, ApiError> {
        Ok(HttpRequest {
            method: HttpMethod::Get,
            url: self.url(path),
            headers: self.session.headers()?,
            body: None,
        })
    }

    fn post<B: Serialize>(&self, path: &str, body: &B) -> Result<HttpRequest, ApiError> {
        let body = serde_json::to_string(body).map_err(|e| ApiError::Serialization(e.to_string()))?;
        let mut headers = self.session.headers()?;
        headers.push(("content-type".to_string(), "application/json".to_string()));
        Ok(HttpRequest {
            method: HttpMethod::Post,
            url: self.url(path),
            headers,
            body: Some(body),
        })
    }

    pub fn build_login(&self, name: &str, password: &str, remember: bool) -> Result<HttpRequest, ApiError> {
        self.post(
            "account/login",
            &LoginBody {
                name,
                password,
                is_remember: remember,
            },
        )
    }

    pub fn build_register(
        &self,
        name: &str,
        password: &str,
        email: &str,
        accept_terms: bool,
    ) -> Result<HttpRequest, ApiError> {
        self.post(
            "account/register",
            &RegisterBody {
                name,
                password,
                email,
                is_accept_term: accept_terms,
            },
        )
    }

    pub fn build_token_renew(&self, token: &str) -> Result<HttpRequest, ApiError> {
        self.get(&format!(
            "token/renew?token={}&isRemember=true",
            urlencoding::encode(token)
        ))
    }

    pub fn build_resend_verify_email(&self, user_id: i64) -> Result<HttpRequest, ApiError> {
        self.get(&format!("email/verify/send?userId={user_id}"))
    }

    pub fn build_list_users(&self) -> Result<HttpRequest, ApiError> {
        self.get("user")
    }

    pub fn build_get_user(&self, id: i64) -> Result<HttpRequest, ApiError> {
        self.get(&format!("user/{id}"))
    }

    pub fn build_get_user_by_name(&self, name: &str) -> Result<HttpRequest, ApiError> {
        self.get(&format!("user?name={}", urlencoding::encode(name)))
    }

    pub fn build_list_posts(&self) -> Result<HttpRequest, ApiError> {
        self.get("post")
    }

    pub fn build_get_post(&self, id: i64) -> Result<HttpRequest, ApiError> {
        self.get(&format!("post/{id}"))
    }

    pub fn build_create_post(&self, title: &str, content: &str) -> Result<HttpRequest, ApiError> {
        self.post("post", &CreatePostBody { title, content })
    }

    pub fn build_create_comment(&self, post_id: i64, content: &str) -> Result<HttpRequest, ApiError> {
        self.post("comment", &CreateCommentBody { post_id, content })
    }

    /// Like a post, or withdraw the like when `cancel` is set.
    pub fn build_like_post(&self, id: i64, cancel: bool) -> Result<HttpRequest, ApiError> {
        self.get(&like_path("post", id, cancel))
    }

    /// Like a comment, or withdraw the like when `cancel` is set.
    pub fn build_like_comment(&self, id: i64, cancel: bool) -> Result<HttpRequest, ApiError> {
        self.get(&like_path("comment", id, cancel))
    }
}

fn like_path(target: &str, id: i64, cancel: bool) -> String {
    if cancel {
        format!("like/{target}?id={id}&cancel=true")
    } else {
        format!("like/{target}?id={id}")
    }
}
