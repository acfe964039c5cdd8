//! Verify request builders and parsers against JSON test vectors stored in
//! `test-vectors/`.
//!
//! Each vector file describes inputs, the expected request, a simulated
//! response and either the expected decoded result or the expected error.
//! Request bodies and results are compared as parsed JSON, so key order in
//! the vector files does not matter.

use std::collections::HashMap;

use community_core::{
    parser, ApiError, Comment, CommunityClient, ErrorCode, HttpMethod, HttpRequest, HttpResponse, Post,
    Session, Token, User,
};
use serde_json::Value;

const BASE_URL: &str = "http://localhost:3000";
const USER_AGENT: &str = "community-test/1.0";

fn client(token: Option<&str>) -> CommunityClient {
    let session = Session::with_user_agent(USER_AGENT);
    if let Some(token) = token {
        session.set_token(token);
    }
    CommunityClient::new(BASE_URL, session)
}

fn load(raw: &str) -> Vec<Value> {
    let vectors: Value = serde_json::from_str(raw).unwrap();
    vectors["cases"].as_array().unwrap().clone()
}

fn parse_method(s: &str) -> HttpMethod {
    match s {
        "GET" => HttpMethod::Get,
        "POST" => HttpMethod::Post,
        other => panic!("unknown method: {other}"),
    }
}

fn check_request(name: &str, req: &HttpRequest, expected: &Value) {
    assert_eq!(req.method, parse_method(expected["method"].as_str().unwrap()), "{name}: method");
    assert_eq!(req.url, format!("{BASE_URL}{}", expected["path"].as_str().unwrap()), "{name}: url");

    let expected_headers: Vec<(String, String)> = expected["headers"]
        .as_array()
        .unwrap()
        .iter()
        .map(|h| {
            let pair = h.as_array().unwrap();
            (pair[0].as_str().unwrap().to_string(), pair[1].as_str().unwrap().to_string())
        })
        .collect();
    assert_eq!(req.headers, expected_headers, "{name}: headers");

    match expected.get("body") {
        Some(body) => {
            let sent: Value = serde_json::from_str(req.body.as_deref().unwrap()).unwrap();
            assert_eq!(&sent, body, "{name}: body");
        }
        None => assert!(req.body.is_none(), "{name}: unexpected body"),
    }
}

fn simulated(case: &Value) -> HttpResponse {
    let sim = &case["simulated_response"];
    HttpResponse {
        status: sim["status"].as_u64().unwrap() as u16,
        headers: Vec::new(),
        body: sim["body"].as_str().unwrap().to_string(),
    }
}

/// Check the envelope code, or the expected error when the case has one.
/// Returns the body when a result should be decoded from it.
fn check_outcome<R>(name: &str, case: &Value, parse: impl Fn(&str) -> Result<R, ApiError>) -> Option<R> {
    let response = simulated(case);
    assert_eq!(response.status, 200, "{name}: vectors only simulate 200 responses");

    if let Some(kind) = case.get("expected_error") {
        let err = match parse(&response.body) {
            Ok(_) => panic!("{name}: expected {kind}, parsed successfully"),
            Err(err) => err,
        };
        match kind.as_str().unwrap() {
            "MalformedPayload" => assert!(matches!(err, ApiError::MalformedPayload(_)), "{name}: {err}"),
            other => panic!("{name}: unknown expected_error {other}"),
        }
        return None;
    }

    let code = parser::decode_code(&response.body).unwrap();
    let expected = ErrorCode::decode(case["expected_code"].as_i64().unwrap());
    assert_eq!(code, expected, "{name}: code");

    case.get("expected_result")?;
    Some(parse(&response.body).unwrap())
}

fn users_in_order(value: &Value) -> Vec<User> {
    serde_json::from_value(value.clone()).unwrap()
}

// ---------------------------------------------------------------------------
// Account
// ---------------------------------------------------------------------------

#[test]
fn login_test_vectors() {
    let c = client(None);
    for case in load(include_str!("../../test-vectors/login.json")) {
        let name = case["name"].as_str().unwrap();
        let input = &case["input"];

        let req = c
            .build_login(
                input["name"].as_str().unwrap(),
                input["password"].as_str().unwrap(),
                input["remember"].as_bool().unwrap(),
            )
            .unwrap();
        check_request(name, &req, &case["expected_request"]);

        if let Some((user, token)) = check_outcome(name, &case, parser::parse_login) {
            let expected = &case["expected_result"];
            let expected_user: User = serde_json::from_value(expected["user"].clone()).unwrap();
            let expected_token: Token = serde_json::from_value(expected["token"].clone()).unwrap();
            assert_eq!(user, expected_user, "{name}: user");
            assert_eq!(token, expected_token, "{name}: token");
        }
    }
}

#[test]
fn token_renew_test_vectors() {
    for case in load(include_str!("../../test-vectors/token_renew.json")) {
        let name = case["name"].as_str().unwrap();
        let token = case["input"]["token"].as_str().unwrap();

        let req = client(Some(token)).build_token_renew(token).unwrap();
        check_request(name, &req, &case["expected_request"]);

        if let Some(renewed) = check_outcome(name, &case, parser::parse_token) {
            let expected: Token = serde_json::from_value(case["expected_result"].clone()).unwrap();
            assert_eq!(renewed, expected, "{name}: token");
        }
    }
}

// ---------------------------------------------------------------------------
// Posts
// ---------------------------------------------------------------------------

#[test]
fn post_test_vectors() {
    let c = client(None);
    for case in load(include_str!("../../test-vectors/post.json")) {
        let name = case["name"].as_str().unwrap();

        let req = c.build_get_post(case["input"]["id"].as_i64().unwrap()).unwrap();
        check_request(name, &req, &case["expected_request"]);

        if let Some(detail) = check_outcome(name, &case, parser::parse_post) {
            let expected = &case["expected_result"];
            let expected_post: Post = serde_json::from_value(expected["post"].clone()).unwrap();
            let expected_comments: Vec<Comment> = serde_json::from_value(expected["comments"].clone()).unwrap();
            let expected_users = users_in_order(&expected["users"]);

            assert_eq!(detail.post, expected_post, "{name}: post");
            let comments: Vec<Comment> = detail.included.ordered::<Comment>().into_iter().cloned().collect();
            assert_eq!(comments, expected_comments, "{name}: comments");
            let users: Vec<User> = detail.included.ordered::<User>().into_iter().cloned().collect();
            assert_eq!(users, expected_users, "{name}: users");
        }
    }
}

#[test]
fn like_test_vectors() {
    let c = client(Some("tok-alice"));
    for case in load(include_str!("../../test-vectors/likes.json")) {
        let name = case["name"].as_str().unwrap();
        let input = &case["input"];
        let id = input["id"].as_i64().unwrap();
        let cancel = input["cancel"].as_bool().unwrap();

        let req = match input["target"].as_str().unwrap() {
            "post" => c.build_like_post(id, cancel),
            "comment" => c.build_like_comment(id, cancel),
            other => panic!("{name}: unknown like target {other}"),
        }
        .unwrap();
        check_request(name, &req, &case["expected_request"]);

        check_outcome(name, &case, parser::decode_code);
    }
}

// ---------------------------------------------------------------------------
// Users
// ---------------------------------------------------------------------------

#[test]
fn user_test_vectors() {
    let c = client(None);
    for case in load(include_str!("../../test-vectors/users.json")) {
        let name = case["name"].as_str().unwrap();
        let lookup = case["input"]["name"].as_str();

        let req = match lookup {
            Some(user_name) => c.build_get_user_by_name(user_name),
            None => c.build_list_users(),
        }
        .unwrap();
        check_request(name, &req, &case["expected_request"]);

        match lookup {
            Some(_) => {
                if let Some(user) = check_outcome(name, &case, parser::parse_user) {
                    let expected: User = serde_json::from_value(case["expected_result"].clone()).unwrap();
                    assert_eq!(user, expected, "{name}: user");
                }
            }
            None => {
                if let Some(users) = check_outcome(name, &case, parser::parse_users) {
                    let expected: HashMap<i64, User> = users_in_order(&case["expected_result"])
                        .into_iter()
                        .map(|u| (u.id, u))
                        .collect();
                    assert_eq!(users, expected, "{name}: users");
                }
            }
        }
    }
}
