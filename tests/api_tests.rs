use std::sync::Arc;

use axum::http::StatusCode;
use axum_test::TestServer;
use serde_json::json;

use movieguru::api::{create_router, AppState};
use movieguru::db::MemoryStore;
use movieguru::error::AppResult;
use movieguru::models::{Genre, MovieRecord, Suggestion};
use movieguru::services::providers::CatalogProvider;
use movieguru::services::suggestions::SuggestionProvider;

/// Suggestion stub returning a fixed title list; genre mapping always fails
struct StubSuggestions {
    titles: Vec<Suggestion>,
}

#[async_trait::async_trait]
impl SuggestionProvider for StubSuggestions {
    async fn suggest_titles(&self, _mood: &str) -> Vec<Suggestion> {
        self.titles.clone()
    }

    async fn suggest_genres(&self, _mood: &str) -> Option<Vec<Genre>> {
        None
    }
}

/// Catalog stub that matches every title with a canned record
struct StubCatalog;

fn canned_record(title: &str) -> MovieRecord {
    MovieRecord {
        id: 27205,
        title: title.to_string(),
        poster_path: Some("/poster.jpg".to_string()),
        overview: Some("A canned overview.".to_string()),
        release_date: Some("2010-07-15".to_string()),
        vote_average: Some(8.4),
        ai_reason: None,
    }
}

#[async_trait::async_trait]
impl CatalogProvider for StubCatalog {
    async fn search_by_title(&self, title: &str) -> AppResult<Option<MovieRecord>> {
        Ok(Some(canned_record(title)))
    }

    async fn search_by_keyword(&self, text: &str) -> AppResult<Vec<MovieRecord>> {
        Ok(vec![canned_record(text)])
    }

    async fn discover_by_genres(&self, _genres: &[Genre]) -> AppResult<Vec<MovieRecord>> {
        Ok(Vec::new())
    }

    fn supports_genre_discovery(&self) -> bool {
        false
    }

    fn name(&self) -> &'static str {
        "stub"
    }
}

fn server_with(state: AppState) -> TestServer {
    TestServer::new(create_router(state)).unwrap()
}

/// No providers configured: only the store and static fallback behind the API
fn bare_server() -> TestServer {
    server_with(AppState::with_parts(Arc::new(MemoryStore::new()), None, None))
}

/// Full stack with stubbed providers
fn stubbed_server(titles: Vec<Suggestion>) -> TestServer {
    server_with(AppState::with_parts(
        Arc::new(MemoryStore::new()),
        Some(Arc::new(StubSuggestions { titles })),
        Some(Arc::new(StubCatalog)),
    ))
}

#[tokio::test]
async fn test_health_check() {
    let server = bare_server();
    let response = server.get("/health").await;
    response.assert_status_ok();
}

#[tokio::test]
async fn test_recommend_requires_mood() {
    let server = stubbed_server(Vec::new());

    let response = server.post("/api/recommend").json(&json!({})).await;
    response.assert_status(StatusCode::BAD_REQUEST);

    let response = server
        .post("/api/recommend")
        .json(&json!({ "mood": "   " }))
        .await;
    response.assert_status(StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_recommend_enriches_suggestions() {
    let server = stubbed_server(vec![Suggestion {
        title: "Inception".to_string(),
        reason: Some("dream logic".to_string()),
    }]);

    let response = server
        .post("/api/recommend")
        .json(&json!({ "mood": "mind-bending" }))
        .await;
    response.assert_status_ok();

    let body: serde_json::Value = response.json();
    assert_eq!(body["mood"], "mind-bending");
    assert!(body["explanation"]
        .as_str()
        .unwrap()
        .contains("mind-bending"));
    let movies = body["movies"].as_array().unwrap();
    assert_eq!(movies.len(), 1);
    assert_eq!(movies[0]["title"], "Inception");
    assert_eq!(movies[0]["ai_reason"], "dream logic");
}

#[tokio::test]
async fn test_recommend_static_fallback_when_unconfigured() {
    let server = bare_server();

    let response = server
        .post("/api/recommend")
        .json(&json!({ "mood": "anything" }))
        .await;
    response.assert_status_ok();

    let body: serde_json::Value = response.json();
    let movies = body["movies"].as_array().unwrap();
    assert_eq!(movies.len(), 3);
    assert_eq!(movies[0]["title"], "Inception");
    assert_eq!(
        body["explanation"],
        "We couldn't connect services, but try these favorites!"
    );
}

#[tokio::test]
async fn test_recommend_records_history() {
    let server = stubbed_server(Vec::new());

    let response = server
        .post("/api/recommend")
        .json(&json!({ "mood": "cozy", "email": "a@b.c" }))
        .await;
    response.assert_status_ok();

    // The history write is fire-and-forget; give it a few scheduler turns
    let mut entries = Vec::new();
    for _ in 0..50 {
        let response = server.get("/api/history").add_query_param("email", "a@b.c").await;
        entries = response.json::<Vec<serde_json::Value>>();
        if !entries.is_empty() {
            break;
        }
        tokio::time::sleep(std::time::Duration::from_millis(5)).await;
    }

    assert_eq!(entries.len(), 1);
    assert_eq!(entries[0]["mood"], "cozy");
    assert_eq!(entries[0]["email"], "a@b.c");
    assert!(entries[0]["result_count"].as_u64().unwrap() >= 1);
}

#[tokio::test]
async fn test_history_without_email_is_empty() {
    let server = bare_server();
    let response = server.get("/api/history").await;
    response.assert_status_ok();
    assert!(response.json::<Vec<serde_json::Value>>().is_empty());
}

#[tokio::test]
async fn test_signup_login_flow() {
    let server = bare_server();

    let response = server
        .post("/api/signup")
        .json(&json!({ "email": "a@b.c", "password": "pw" }))
        .await;
    response.assert_status_ok();
    let account: serde_json::Value = response.json();
    assert_eq!(account["email"], "a@b.c");
    assert_eq!(account["profileIcon"], "👤");
    assert!(account["favorites"].as_array().unwrap().is_empty());

    // Duplicate signup is rejected
    let response = server
        .post("/api/signup")
        .json(&json!({ "email": "a@b.c", "password": "pw" }))
        .await;
    response.assert_status(StatusCode::BAD_REQUEST);

    // Wrong password
    let response = server
        .post("/api/login")
        .json(&json!({ "email": "a@b.c", "password": "nope" }))
        .await;
    response.assert_status(StatusCode::UNAUTHORIZED);

    // Correct credentials
    let response = server
        .post("/api/login")
        .json(&json!({ "email": "a@b.c", "password": "pw" }))
        .await;
    response.assert_status_ok();
}

#[tokio::test]
async fn test_signup_requires_credentials() {
    let server = bare_server();
    let response = server
        .post("/api/signup")
        .json(&json!({ "email": "a@b.c" }))
        .await;
    response.assert_status(StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_favorites_toggle() {
    let server = bare_server();
    server
        .post("/api/signup")
        .json(&json!({ "email": "a@b.c", "password": "pw" }))
        .await
        .assert_status_ok();

    let movie = json!({ "id": 27205, "title": "Inception" });

    let response = server
        .post("/api/favorites")
        .json(&json!({ "email": "a@b.c", "movie": movie.clone() }))
        .await;
    response.assert_status_ok();
    let body: serde_json::Value = response.json();
    assert_eq!(body["status"], "added");
    assert_eq!(body["favorites"].as_array().unwrap().len(), 1);

    // Same movie again toggles it off
    let response = server
        .post("/api/favorites")
        .json(&json!({ "email": "a@b.c", "movie": movie }))
        .await;
    let body: serde_json::Value = response.json();
    assert_eq!(body["status"], "removed");
    assert!(body["favorites"].as_array().unwrap().is_empty());

    let response = server
        .post("/api/favorites")
        .json(&json!({ "email": "a@b.c", "action": "get" }))
        .await;
    response.assert_status_ok();
    assert!(response.json::<Vec<serde_json::Value>>().is_empty());
}

#[tokio::test]
async fn test_favorites_unknown_user() {
    let server = bare_server();
    let response = server
        .post("/api/favorites")
        .json(&json!({ "email": "ghost@b.c", "action": "get" }))
        .await;
    response.assert_status(StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_post_lifecycle() {
    let server = stubbed_server(Vec::new());

    // Create, enriched from the stub catalog
    let response = server
        .post("/api/posts")
        .json(&json!({
            "email": "a@b.c",
            "movieTitle": "Inception",
            "content": "Loved it",
            "rating": 9
        }))
        .await;
    response.assert_status(StatusCode::CREATED);
    let post: serde_json::Value = response.json();
    let post_id = post["id"].as_str().unwrap().to_string();
    assert_eq!(post["moviePoster"], "/poster.jpg");
    assert_eq!(post["movieYear"], "2010-07-15");
    assert_eq!(post["rating"], 9);

    // Listed with its id
    let response = server.get("/api/posts").await;
    let posts: Vec<serde_json::Value> = response.json();
    assert_eq!(posts.len(), 1);
    assert_eq!(posts[0]["id"], post_id.as_str());

    // Only the author may edit
    let response = server
        .put(&format!("/api/posts/{post_id}"))
        .json(&json!({ "email": "other@b.c", "content": "hijack" }))
        .await;
    response.assert_status(StatusCode::FORBIDDEN);

    let response = server
        .put(&format!("/api/posts/{post_id}"))
        .json(&json!({ "email": "a@b.c", "content": "Loved it even more" }))
        .await;
    response.assert_status_ok();
    let edited: serde_json::Value = response.json();
    assert_eq!(edited["content"], "Loved it even more");

    // Comment
    let response = server
        .post(&format!("/api/posts/{post_id}/comments"))
        .json(&json!({ "email": "other@b.c", "content": "Agreed!" }))
        .await;
    response.assert_status(StatusCode::CREATED);
    let comment: serde_json::Value = response.json();
    assert_eq!(comment["author"], "other@b.c");
    assert!(comment["id"].as_str().is_some());

    // Delete, author only
    let response = server
        .delete(&format!("/api/posts/{post_id}"))
        .json(&json!({ "email": "other@b.c" }))
        .await;
    response.assert_status(StatusCode::FORBIDDEN);

    let response = server
        .delete(&format!("/api/posts/{post_id}"))
        .json(&json!({ "email": "a@b.c" }))
        .await;
    response.assert_status_ok();

    let response = server.get("/api/posts").await;
    assert!(response.json::<Vec<serde_json::Value>>().is_empty());
}

#[tokio::test]
async fn test_create_post_requires_fields() {
    let server = bare_server();
    let response = server
        .post("/api/posts")
        .json(&json!({ "email": "a@b.c", "content": "no title" }))
        .await;
    response.assert_status(StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_comment_on_missing_post() {
    let server = bare_server();
    let response = server
        .post("/api/posts/does-not-exist/comments")
        .json(&json!({ "email": "a@b.c", "content": "hi" }))
        .await;
    response.assert_status(StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_profile_icon_propagates_to_posts() {
    let server = stubbed_server(Vec::new());
    server
        .post("/api/signup")
        .json(&json!({ "email": "a@b.c", "password": "pw" }))
        .await
        .assert_status_ok();

    server
        .post("/api/posts")
        .json(&json!({
            "email": "a@b.c",
            "movieTitle": "Heat",
            "content": "classic",
            "profileIcon": "👤"
        }))
        .await
        .assert_status(StatusCode::CREATED);

    let response = server
        .put("/api/profile/icon")
        .json(&json!({ "email": "a@b.c", "profileIcon": "🎬" }))
        .await;
    response.assert_status_ok();
    let body: serde_json::Value = response.json();
    assert_eq!(body["profileIcon"], "🎬");
    assert_eq!(body["postsUpdated"], true);

    let response = server.get("/api/posts").await;
    let posts: Vec<serde_json::Value> = response.json();
    assert_eq!(posts[0]["profileIcon"], "🎬");
}
