//! API integration tests driving the real router through tower's `oneshot`.

use std::sync::Arc;

use axum::body::Body;
use axum::http::{header, Request, StatusCode};
use axum::Router;
use http_body_util::BodyExt;
use serde_json::{json, Value};
use tempfile::TempDir;
use tower::ServiceExt;

use bloglist_server::config::{AppState, Config};
use bloglist_server::router::router;
use bloglist_server::store::JsonStore;

const MISSING_ID: &str = "00000000-0000-0000-0000-000000000000";

async fn test_app() -> (Router, TempDir) {
    let dir = TempDir::new().unwrap();
    let config = Config::with_base_dir(dir.path());
    let store = Arc::new(JsonStore::new(config.clone()).await.unwrap());
    let app = router(AppState { config, store });
    (app, dir)
}

fn request(method: &str, path: &str, token: Option<&str>, body: Option<&Value>) -> Request<Body> {
    let mut builder = Request::builder().method(method).uri(path);
    if let Some(token) = token {
        builder = builder.header(header::AUTHORIZATION, format!("Bearer {}", token));
    }
    match body {
        Some(body) => builder
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    }
}

async fn send(
    app: &Router,
    method: &str,
    path: &str,
    token: Option<&str>,
    body: Option<Value>,
) -> (StatusCode, Value) {
    let response = app
        .clone()
        .oneshot(request(method, path, token, body.as_ref()))
        .await
        .unwrap();

    let status = response.status();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let value = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };

    (status, value)
}

async fn register(app: &Router, username: &str, password: &str) -> Value {
    let (status, body) = send(
        app,
        "POST",
        "/api/users",
        None,
        Some(json!({ "username": username, "name": username, "password": password })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    body
}

async fn login(app: &Router, username: &str, password: &str) -> String {
    let (status, body) = send(
        app,
        "POST",
        "/api/login",
        None,
        Some(json!({ "username": username, "password": password })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    body["token"].as_str().unwrap().to_string()
}

fn new_blog() -> Value {
    json!({
        "title": "Go To Statement Considered Harmful",
        "author": "Edsger W. Dijkstra",
        "url": "http://www.u.arizona.edu/~rubinson/copyright_violations/Go_To_Considered_Harmful.html",
        "likes": 3,
    })
}

// ----- users -----

#[tokio::test]
async fn creates_a_user_and_never_leaks_the_password_hash() {
    let (app, _dir) = test_app().await;

    let created = register(&app, "testinguser", "correct horse").await;
    assert_eq!(created["username"], "testinguser");
    assert!(created.get("password_hash").is_none());
    assert!(created.get("password").is_none());

    let (status, users) = send(&app, "GET", "/api/users", None, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(users.as_array().unwrap().len(), 1);
    assert!(users[0].get("password_hash").is_none());
}

#[tokio::test]
async fn short_password_is_rejected_with_a_json_400() {
    let (app, _dir) = test_app().await;

    let response = app
        .clone()
        .oneshot(request(
            "POST",
            "/api/users",
            None,
            Some(&json!({ "username": "validname", "name": "x", "password": "1" })),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let content_type = response
        .headers()
        .get(header::CONTENT_TYPE)
        .unwrap()
        .to_str()
        .unwrap()
        .to_string();
    assert!(content_type.starts_with("application/json"));

    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let body: Value = serde_json::from_slice(&bytes).unwrap();
    assert!(body["error"].as_str().unwrap().contains("password"));
}

#[tokio::test]
async fn short_username_is_rejected() {
    let (app, _dir) = test_app().await;

    let (status, body) = send(
        &app,
        "POST",
        "/api/users",
        None,
        Some(json!({ "username": "a", "name": "x", "password": "long enough" })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"].as_str().unwrap().contains("username"));
}

#[tokio::test]
async fn duplicate_username_is_rejected() {
    let (app, _dir) = test_app().await;

    register(&app, "takenname", "password one").await;

    let (status, body) = send(
        &app,
        "POST",
        "/api/users",
        None,
        Some(json!({ "username": "takenname", "name": "y", "password": "password two" })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"]
        .as_str()
        .unwrap()
        .contains("username is already taken"));
}

#[tokio::test]
async fn listed_users_expand_their_blogs() {
    let (app, _dir) = test_app().await;

    register(&app, "author", "password").await;
    let token = login(&app, "author", "password").await;
    send(&app, "POST", "/api/blogs", Some(&token), Some(new_blog())).await;

    let (status, users) = send(&app, "GET", "/api/users", None, None).await;
    assert_eq!(status, StatusCode::OK);

    let blogs = users[0]["blogs"].as_array().unwrap();
    assert_eq!(blogs.len(), 1);
    assert_eq!(blogs[0]["title"], "Go To Statement Considered Harmful");
    assert!(blogs[0].get("url").is_some());
    assert!(blogs[0].get("likes").is_none());
}

// ----- login -----

#[tokio::test]
async fn login_with_wrong_password_or_unknown_user_is_indistinguishable() {
    let (app, _dir) = test_app().await;

    register(&app, "realuser", "right password").await;

    let (status, body) = send(
        &app,
        "POST",
        "/api/login",
        None,
        Some(json!({ "username": "realuser", "password": "wrong password" })),
    )
    .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["error"], "invalid username or password");

    let (status, body) = send(
        &app,
        "POST",
        "/api/login",
        None,
        Some(json!({ "username": "nosuchuser", "password": "whatever" })),
    )
    .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["error"], "invalid username or password");
}

// ----- blogs -----

#[tokio::test]
async fn blog_creation_requires_a_valid_token() {
    let (app, _dir) = test_app().await;

    let (status, body) = send(&app, "POST", "/api/blogs", None, Some(new_blog())).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["error"], "token missing or invalid");

    let (status, _) = send(&app, "POST", "/api/blogs", Some("x"), Some(new_blog())).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn bearer_prefix_is_matched_case_insensitively() {
    let (app, _dir) = test_app().await;

    register(&app, "author", "password").await;
    let token = login(&app, "author", "password").await;

    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/api/blogs")
                .header(header::AUTHORIZATION, format!("bearer {}", token))
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(new_blog().to_string()))
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::CREATED);
}

#[tokio::test]
async fn blog_creation_with_a_valid_token_returns_201_with_the_submitted_fields() {
    let (app, _dir) = test_app().await;

    register(&app, "author", "password").await;
    let token = login(&app, "author", "password").await;

    let (status, created) = send(&app, "POST", "/api/blogs", Some(&token), Some(new_blog())).await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(created["title"], "Go To Statement Considered Harmful");
    assert_eq!(created["author"], "Edsger W. Dijkstra");
    assert_eq!(created["likes"], 3);
    assert_eq!(created["user"]["username"], "author");

    let (_, blogs) = send(&app, "GET", "/api/blogs", None, None).await;
    assert_eq!(blogs.as_array().unwrap().len(), 1);
}

#[tokio::test]
async fn blog_likes_default_to_zero_when_omitted() {
    let (app, _dir) = test_app().await;

    register(&app, "author", "password").await;
    let token = login(&app, "author", "password").await;

    let mut blog = new_blog();
    blog.as_object_mut().unwrap().remove("likes");

    let (status, created) = send(&app, "POST", "/api/blogs", Some(&token), Some(blog)).await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(created["likes"], 0);
}

#[tokio::test]
async fn blog_creation_without_title_or_url_is_rejected() {
    let (app, _dir) = test_app().await;

    register(&app, "author", "password").await;
    let token = login(&app, "author", "password").await;

    let mut no_title = new_blog();
    no_title.as_object_mut().unwrap().remove("title");
    let (status, _) = send(&app, "POST", "/api/blogs", Some(&token), Some(no_title)).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let mut no_url = new_blog();
    no_url.as_object_mut().unwrap().remove("url");
    let (status, _) = send(&app, "POST", "/api/blogs", Some(&token), Some(no_url)).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn fetching_a_blog_by_id_handles_missing_and_malformed_ids() {
    let (app, _dir) = test_app().await;

    let (status, _) = send(&app, "GET", &format!("/api/blogs/{}", MISSING_ID), None, None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, body) = send(&app, "GET", "/api/blogs/not-an-id", None, None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "invalid id provided");
}

#[tokio::test]
async fn only_the_owner_may_update_or_delete_a_blog() {
    let (app, _dir) = test_app().await;

    register(&app, "owner", "password").await;
    register(&app, "intruder", "password").await;
    let owner_token = login(&app, "owner", "password").await;
    let intruder_token = login(&app, "intruder", "password").await;

    let (_, created) = send(&app, "POST", "/api/blogs", Some(&owner_token), Some(new_blog())).await;
    let blog_path = format!("/api/blogs/{}", created["id"].as_str().unwrap());

    let (status, body) = send(
        &app,
        "PUT",
        &blog_path,
        Some(&intruder_token),
        Some(json!({ "likes": 100 })),
    )
    .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["error"], "invalid user");

    let (status, _) = send(&app, "DELETE", &blog_path, Some(&intruder_token), None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    // A failed update must not have written anything.
    let (_, fetched) = send(&app, "GET", &blog_path, None, None).await;
    assert_eq!(fetched["likes"], 3);
}

#[tokio::test]
async fn owner_can_update_likes() {
    let (app, _dir) = test_app().await;

    register(&app, "owner", "password").await;
    let token = login(&app, "owner", "password").await;

    let (_, created) = send(&app, "POST", "/api/blogs", Some(&token), Some(new_blog())).await;
    let blog_path = format!("/api/blogs/{}", created["id"].as_str().unwrap());

    let (status, updated) = send(
        &app,
        "PUT",
        &blog_path,
        Some(&token),
        Some(json!({ "likes": 11 })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(updated["likes"], 11);

    let (_, fetched) = send(&app, "GET", &blog_path, None, None).await;
    assert_eq!(fetched["likes"], 11);
}

#[tokio::test]
async fn mutating_missing_or_malformed_ids_fails_with_404_and_400() {
    let (app, _dir) = test_app().await;

    register(&app, "owner", "password").await;
    let token = login(&app, "owner", "password").await;

    let missing = format!("/api/blogs/{}", MISSING_ID);
    let (status, _) = send(&app, "PUT", &missing, Some(&token), Some(json!({ "likes": 1 }))).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    let (status, _) = send(&app, "DELETE", &missing, Some(&token), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, _) = send(
        &app,
        "PUT",
        "/api/blogs/xc,",
        Some(&token),
        Some(json!({ "likes": 1 })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    let (status, _) = send(&app, "DELETE", "/api/blogs/xc,", Some(&token), None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

// ----- comments -----

#[tokio::test]
async fn comment_creation_expands_the_parent_blog() {
    let (app, _dir) = test_app().await;

    register(&app, "author", "password").await;
    let token = login(&app, "author", "password").await;
    let (_, created) = send(&app, "POST", "/api/blogs", Some(&token), Some(new_blog())).await;
    let blog_id = created["id"].as_str().unwrap().to_string();

    let (status, comment) = send(
        &app,
        "POST",
        &format!("/api/blogs/{}/comments", blog_id),
        None,
        Some(json!({ "content": "great read" })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(comment["content"], "great read");
    assert_eq!(comment["blog"]["title"], "Go To Statement Considered Harmful");
    assert_eq!(comment["blog"]["author"], "Edsger W. Dijkstra");

    // The comment id lands in the parent blog's comment list.
    let (_, fetched) = send(&app, "GET", &format!("/api/blogs/{}", blog_id), None, None).await;
    let comments = fetched["comments"].as_array().unwrap();
    assert_eq!(comments.len(), 1);
    assert_eq!(comments[0], comment["id"]);
}

#[tokio::test]
async fn commenting_on_a_missing_blog_fails() {
    let (app, _dir) = test_app().await;

    let (status, _) = send(
        &app,
        "POST",
        &format!("/api/blogs/{}/comments", MISSING_ID),
        None,
        Some(json!({ "content": "lost" })),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, _) = send(
        &app,
        "POST",
        "/api/blogs/bogus/comments",
        None,
        Some(json!({ "content": "lost" })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

// ----- infrastructure -----

#[tokio::test]
async fn unknown_routes_return_the_unknown_endpoint_error() {
    let (app, _dir) = test_app().await;

    let (status, body) = send(&app, "GET", "/api/nonsense", None, None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"], "unknown endpoint");
}

#[tokio::test]
async fn reset_endpoint_wipes_the_store_in_test_mode() {
    let (app, _dir) = test_app().await;

    register(&app, "shortlived", "password").await;

    let (status, _) = send(&app, "POST", "/api/testing/reset", None, None).await;
    assert_eq!(status, StatusCode::NO_CONTENT);

    let (_, users) = send(&app, "GET", "/api/users", None, None).await;
    assert!(users.as_array().unwrap().is_empty());
}

// ----- end to end -----

#[tokio::test]
async fn register_login_create_and_delete_round_trip() {
    let (app, _dir) = test_app().await;

    register(&app, "testing", "testing").await;
    let token = login(&app, "testing", "testing").await;

    let (_, before) = send(&app, "GET", "/api/blogs", None, None).await;
    let count_before = before.as_array().unwrap().len();

    let (status, created) = send(&app, "POST", "/api/blogs", Some(&token), Some(new_blog())).await;
    assert_eq!(status, StatusCode::CREATED);
    let blog_path = format!("/api/blogs/{}", created["id"].as_str().unwrap());

    let (_, after) = send(&app, "GET", "/api/blogs", None, None).await;
    assert_eq!(after.as_array().unwrap().len(), count_before + 1);

    let (_, expanded) = send(&app, "GET", &blog_path, None, None).await;

    let (status, deleted) = send(&app, "DELETE", &blog_path, Some(&token), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(deleted, expanded);

    let (status, _) = send(&app, "GET", &blog_path, None, None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}
