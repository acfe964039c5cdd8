//! Full forum lifecycle against the live mock server.
//!
//! # Design
//! Starts the mock server on a random port, then drives the managers over
//! real HTTP through `UreqTransport`. Every manager shares one `Session`, so
//! the token obtained by the account manager authenticates the post
//! manager's requests too.

use community_core::{
    AccountManager, ApiError, ClientConfig, Comment, CommunityClient, ErrorCode, HttpMethod, HttpRequest,
    ManagerState, Post, PostManager, Session, Transport, UreqTransport, User, UserManager,
};

fn start_server() -> String {
    let std_listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    let addr = std_listener.local_addr().unwrap();
    std_listener.set_nonblocking(true).unwrap();

    std::thread::spawn(move || {
        let rt = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()
            .unwrap();
        rt.block_on(async {
            let listener = tokio::net::TcpListener::from_std(std_listener).unwrap();
            mock_server::run(listener).await
        })
    });

    format!("http://{addr}")
}

fn config(base_url: String) -> ClientConfig {
    let _ = env_logger::builder().is_test(true).try_init();
    ClientConfig {
        base_url,
        user_agent: "community-test/1.0".to_string(),
    }
}

#[test]
fn forum_lifecycle() {
    let (session, client) = config(start_server()).connect();
    let mut account = AccountManager::new(client.clone(), UreqTransport::new());
    let mut posts = PostManager::new(client.clone(), UreqTransport::new());
    let mut users = UserManager::new(client, UreqTransport::new());

    // Step 1: anonymous writes are refused with a code, not an error.
    assert_eq!(posts.create("early", "too soon").unwrap(), ErrorCode::TokenRequired);
    assert_eq!(posts.state(), ManagerState::Empty);

    // Step 2: bad credentials leave the account signed out.
    assert_eq!(
        account.login("admin", "wrong", false).unwrap(),
        ErrorCode::LoginCredentialsInvalid
    );
    assert!(!account.is_logged_in());

    // Step 3: register a fresh account, which signs it in.
    assert_eq!(
        account.register("bob", "hunter2", "bob@community.test", true).unwrap(),
        ErrorCode::Success
    );
    assert!(account.is_logged_in());
    assert_eq!(account.user().name, "bob");
    assert_eq!(account.state(), ManagerState::Loaded);
    assert_eq!(session.token(), account.token().value);
    let bob_id = account.user().id;

    // Step 4: the seeded admin is already verified; bob is not.
    assert_eq!(account.resend_verify_email(1).unwrap(), ErrorCode::AccountAlreadyVerified);
    assert_eq!(account.resend_verify_email(bob_id).unwrap(), ErrorCode::Success);

    // Step 5: create a post; the manager loads it right away.
    assert_eq!(posts.create("Hello", "From bob").unwrap(), ErrorCode::Success);
    let post_id = posts.post().id;
    assert_eq!(posts.post().title, "Hello");
    assert_eq!(posts.post().created_user_id, bob_id);
    assert_eq!(posts.post().view_count, 1);
    assert!(posts.included().ordered::<Comment>().is_empty());
    assert_eq!(posts.state(), ManagerState::Loaded);
    assert_eq!(posts.last_created_id(), Some(post_id));

    // Step 6: comment on it; the reload side-loads the comment and author.
    assert_eq!(posts.create_comment("first!").unwrap(), ErrorCode::Success);
    let comments = posts.included().ordered::<Comment>();
    assert_eq!(comments.len(), 1);
    assert_eq!(comments[0].content, "first!");
    assert_eq!(comments[0].created_user_id, bob_id);
    let comment_id = comments[0].id;
    let authors = posts.included().by_kind::<User>();
    assert_eq!(authors.len(), 1);
    assert_eq!(authors[&bob_id].name, "bob");
    assert_eq!(posts.post().comment_count, 1);
    assert_eq!(posts.post().last_comment_id, Some(comment_id));

    // Step 7: likes toggle; repeating one is a no-op code.
    assert_eq!(posts.like(post_id).unwrap(), ErrorCode::Success);
    assert_eq!(posts.like(post_id).unwrap(), ErrorCode::NoUpdateNeeded);
    assert_eq!(posts.like_comment(comment_id).unwrap(), ErrorCode::Success);
    assert_eq!(posts.unlike_comment(comment_id).unwrap(), ErrorCode::Success);
    assert_eq!(posts.like_comment(9999).unwrap(), ErrorCode::CommentNotFound);
    posts.get(post_id).unwrap();
    assert_eq!(posts.post().like_count, 1);
    assert_eq!(posts.included().ordered::<Comment>()[0].like_count, 0);

    // Step 8: a missing post keeps what was loaded.
    assert_eq!(posts.get(9999).unwrap(), ErrorCode::PostNotFound);
    assert_eq!(posts.state(), ManagerState::Error(ErrorCode::PostNotFound));
    assert_eq!(posts.post().id, post_id);

    // Step 9: the listing holds both posts and both authors.
    assert_eq!(posts.get_all().unwrap(), ErrorCode::Success);
    assert_eq!(posts.all_posts().len(), 2);
    assert_eq!(posts.included().by_kind::<User>().len(), 2);

    // Step 10: user lookups.
    assert_eq!(users.get_by_name("bob").unwrap(), ErrorCode::Success);
    assert_eq!(users.user().id, bob_id);
    assert_eq!(users.get(9999).unwrap(), ErrorCode::UserNotFound);
    assert_eq!(users.user().id, bob_id);
    assert_eq!(users.get_all().unwrap(), ErrorCode::Success);
    assert_eq!(users.all_users().len(), 2);
    assert!(matches!(users.update(), Err(ApiError::NotImplemented { .. })));

    // Step 11: renewing retires the old token everywhere.
    let old_token = account.token().value.clone();
    assert_eq!(account.token_renew().unwrap(), ErrorCode::Success);
    assert_ne!(account.token().value, old_token);
    assert_eq!(session.token(), account.token().value);
    assert_eq!(posts.unlike(post_id).unwrap(), ErrorCode::Success);
    assert_eq!(
        account.token_renew_with(&old_token).unwrap(),
        ErrorCode::TokenSignatureInvalid
    );

    // Step 12: logout forgets everything locally; writes need a token again.
    account.logout();
    assert!(!account.is_logged_in());
    assert_eq!(account.user(), &User::empty());
    assert_eq!(account.state(), ManagerState::Empty);
    assert_eq!(session.token(), "");
    assert_eq!(posts.like(post_id).unwrap(), ErrorCode::TokenRequired);

    // Step 13: sign back in as the seeded admin.
    assert_eq!(account.login("admin", "admin123", true).unwrap(), ErrorCode::Success);
    assert_eq!(account.user().role, 2);
    assert_eq!(account.user().avatar, None);
}

#[test]
fn error_statuses_come_back_as_responses() {
    let base_url = start_server();
    let transport = UreqTransport::new();

    let missing = HttpRequest {
        method: HttpMethod::Get,
        url: format!("{base_url}/no/such/route"),
        headers: vec![("user-agent".to_string(), "community-test/1.0".to_string())],
        body: None,
    };
    let response = transport.execute(&missing).unwrap();
    assert_eq!(response.status, 404);

    // axum rejects a body that does not match the route's JSON shape
    let rejected = HttpRequest {
        method: HttpMethod::Post,
        url: format!("{base_url}/post"),
        headers: vec![("content-type".to_string(), "application/json".to_string())],
        body: Some(r#"{"not_title":1}"#.to_string()),
    };
    let response = transport.execute(&rejected).unwrap();
    assert_eq!(response.status, 422);

    let session = Session::with_user_agent("community-test/1.0");
    let client = CommunityClient::new(&format!("{base_url}/missing"), session);
    let mut posts = PostManager::new(client, UreqTransport::new());

    assert_eq!(posts.get(1).unwrap(), ErrorCode::UnknownException);
    assert_eq!(posts.state(), ManagerState::Error(ErrorCode::UnknownException));
    assert_eq!(posts.post(), &Post::empty());
}

#[test]
fn unreachable_server_is_a_transport_error() {
    let (_session, client) = config("http://127.0.0.1:9".to_string()).connect();
    let mut posts = PostManager::new(client, UreqTransport::new());

    let err = posts.get(1).unwrap_err();

    assert!(matches!(err, ApiError::Transport(_)));
    assert_eq!(posts.state(), ManagerState::Empty);
}
