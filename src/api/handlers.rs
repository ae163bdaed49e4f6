use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use uuid::Uuid;

use crate::error::{AppError, AppResult};
use crate::models::{user::DEFAULT_PROFILE_ICON, Comment, MovieRecord, Post, RecommendationResult, User};
use crate::services::history::HISTORY_COLLECTION;

use super::AppState;

const USERS: &str = "users";
const POSTS: &str = "posts";

const HISTORY_LIMIT: usize = 20;
const POSTS_LIMIT: usize = 50;

// Request/Response types

#[derive(Debug, Deserialize)]
pub struct CredentialsRequest {
    pub email: Option<String>,
    pub password: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct AccountResponse {
    pub email: String,
    pub favorites: Vec<MovieRecord>,
    #[serde(rename = "profileIcon")]
    pub profile_icon: String,
}

impl From<&User> for AccountResponse {
    fn from(user: &User) -> Self {
        Self {
            email: user.email.clone(),
            favorites: user.favorites.clone(),
            profile_icon: user.profile_icon.clone(),
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct IconRequest {
    pub email: Option<String>,
    #[serde(rename = "profileIcon")]
    pub profile_icon: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct RecommendRequest {
    pub mood: Option<String>,
    pub email: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct FavoritesRequest {
    pub email: Option<String>,
    pub action: Option<String>,
    pub movie: Option<MovieRecord>,
}

#[derive(Debug, Deserialize)]
pub struct HistoryQuery {
    pub email: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct CreatePostRequest {
    pub email: Option<String>,
    #[serde(rename = "movieTitle")]
    pub movie_title: Option<String>,
    pub content: Option<String>,
    pub rating: Option<u8>,
    #[serde(default)]
    pub anonymous: bool,
    #[serde(rename = "profileIcon")]
    pub profile_icon: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct EditPostRequest {
    pub email: Option<String>,
    #[serde(rename = "movieTitle")]
    pub movie_title: Option<String>,
    pub content: Option<String>,
    pub rating: Option<u8>,
}

#[derive(Debug, Deserialize)]
pub struct AuthorRequest {
    pub email: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct CommentRequest {
    pub email: Option<String>,
    pub content: Option<String>,
    #[serde(rename = "profileIcon")]
    pub profile_icon: Option<String>,
}

// Helpers

fn required(field: Option<String>, message: &str) -> AppResult<String> {
    field
        .filter(|v| !v.trim().is_empty())
        .ok_or_else(|| AppError::InvalidInput(message.to_string()))
}

fn to_doc<T: Serialize>(value: &T) -> AppResult<Value> {
    serde_json::to_value(value).map_err(|e| AppError::Internal(e.to_string()))
}

fn from_doc<T: serde::de::DeserializeOwned>(doc: Value) -> AppResult<T> {
    serde_json::from_value(doc).map_err(|e| AppError::Internal(format!("Corrupt document: {e}")))
}

async fn load_user(state: &AppState, email: &str) -> AppResult<Option<User>> {
    match state.store.get(USERS, email).await? {
        Some(doc) => Ok(Some(from_doc(doc)?)),
        None => Ok(None),
    }
}

async fn save_user(state: &AppState, user: &User) -> AppResult<()> {
    state.store.put(USERS, &user.email, to_doc(user)?).await
}

/// Newest-first by RFC 3339 timestamp (lexicographic order matches time order)
fn sort_newest_first(docs: &mut [(String, Value)]) {
    docs.sort_by(|(_, a), (_, b)| {
        let a = a.get("timestamp").and_then(Value::as_str).unwrap_or("");
        let b = b.get("timestamp").and_then(Value::as_str).unwrap_or("");
        b.cmp(a)
    });
}

// Handlers

/// Health check endpoint
pub async fn health_check() -> (StatusCode, Json<Value>) {
    (StatusCode::OK, Json(json!({ "status": "healthy" })))
}

/// Create an account; the email doubles as the document id
pub async fn signup(
    State(state): State<AppState>,
    Json(request): Json<CredentialsRequest>,
) -> AppResult<Json<AccountResponse>> {
    let email = required(request.email, "Email and password required")?;
    let password = required(request.password, "Email and password required")?;

    if load_user(&state, &email).await?.is_some() {
        return Err(AppError::InvalidInput("User already exists".to_string()));
    }

    let user = User::new(email, password);
    save_user(&state, &user).await?;

    tracing::info!(email = %user.email, "User created");
    Ok(Json(AccountResponse::from(&user)))
}

pub async fn login(
    State(state): State<AppState>,
    Json(request): Json<CredentialsRequest>,
) -> AppResult<Json<AccountResponse>> {
    let email = required(request.email, "Email and password required")?;
    let password = required(request.password, "Email and password required")?;

    let mut user = load_user(&state, &email)
        .await?
        .ok_or_else(|| AppError::Unauthenticated("Invalid credentials".to_string()))?;

    if user.password != password {
        return Err(AppError::Unauthenticated("Invalid credentials".to_string()));
    }

    // Old accounts may predate the icon field
    if user.profile_icon.is_empty() {
        user.profile_icon = DEFAULT_PROFILE_ICON.to_string();
        save_user(&state, &user).await?;
    }

    Ok(Json(AccountResponse::from(&user)))
}

/// Update the profile icon and rewrite it on the user's visible posts and comments
pub async fn update_profile_icon(
    State(state): State<AppState>,
    Json(request): Json<IconRequest>,
) -> AppResult<Json<Value>> {
    let email = required(request.email, "Email and profileIcon required")?;
    let icon = required(request.profile_icon, "Email and profileIcon required")?;

    let mut user = load_user(&state, &email)
        .await?
        .ok_or_else(|| AppError::NotFound("User not found".to_string()))?;
    user.profile_icon = icon.clone();
    save_user(&state, &user).await?;

    let mut posts_updated = false;
    for (post_id, doc) in state.store.list(POSTS).await? {
        let mut post: Post = from_doc(doc)?;
        let mut changed = false;

        if post.author == email && !post.anonymous && post.profile_icon != icon {
            post.profile_icon = icon.clone();
            changed = true;
        }
        for comment in &mut post.comments {
            if comment.author == email && comment.profile_icon != icon {
                comment.profile_icon = icon.clone();
                changed = true;
            }
        }

        if changed {
            state.store.put(POSTS, &post_id, to_doc(&post)?).await?;
            posts_updated = true;
        }
    }

    Ok(Json(json!({
        "profileIcon": icon,
        "postsUpdated": posts_updated,
    })))
}

/// Resolve a mood into movie recommendations. The only caller-visible failure
/// on this path is a missing mood; everything upstream degrades internally.
pub async fn recommend(
    State(state): State<AppState>,
    Json(request): Json<RecommendRequest>,
) -> AppResult<Json<RecommendationResult>> {
    let mood = request
        .mood
        .as_deref()
        .map(str::trim)
        .unwrap_or_default()
        .to_string();
    if mood.is_empty() {
        return Err(AppError::InvalidInput("Mood is required".to_string()));
    }

    let result = state.resolver.resolve(&mood, request.email.as_deref()).await;
    Ok(Json(result))
}

/// Fetch or toggle favorites, matching the original single-endpoint shape:
/// `action: "get"` reads, anything else toggles the supplied movie by id
pub async fn favorites(
    State(state): State<AppState>,
    Json(request): Json<FavoritesRequest>,
) -> AppResult<Json<Value>> {
    let email = required(request.email, "Email required")?;

    let mut user = load_user(&state, &email)
        .await?
        .ok_or_else(|| AppError::NotFound("User not found".to_string()))?;

    if request.action.as_deref() == Some("get") {
        return Ok(Json(to_doc(&user.favorites)?));
    }

    let movie = request
        .movie
        .ok_or_else(|| AppError::InvalidInput("Movie data required".to_string()))?;

    let status = match user.favorites.iter().position(|fav| fav.id == movie.id) {
        Some(index) => {
            user.favorites.remove(index);
            "removed"
        }
        None => {
            user.favorites.push(movie);
            "added"
        }
    };
    save_user(&state, &user).await?;

    Ok(Json(json!({
        "status": status,
        "favorites": user.favorites,
    })))
}

/// Recent search history for a user, newest first. Degrades to an empty list
/// rather than erroring: history is never worth failing a page load over.
pub async fn history(
    State(state): State<AppState>,
    Query(query): Query<HistoryQuery>,
) -> Json<Vec<Value>> {
    let Some(email) = query.email.filter(|e| !e.is_empty()) else {
        return Json(Vec::new());
    };

    match state
        .store
        .filter_equals(HISTORY_COLLECTION, "email", &json!(email))
        .await
    {
        Ok(mut entries) => {
            sort_newest_first(&mut entries);
            Json(
                entries
                    .into_iter()
                    .take(HISTORY_LIMIT)
                    .map(|(_, doc)| doc)
                    .collect(),
            )
        }
        Err(e) => {
            tracing::error!(error = %e, "History read failed");
            Json(Vec::new())
        }
    }
}

/// Recent posts, newest first, document ids injected
pub async fn get_posts(State(state): State<AppState>) -> Json<Vec<Value>> {
    match state.store.list(POSTS).await {
        Ok(mut posts) => {
            sort_newest_first(&mut posts);
            Json(
                posts
                    .into_iter()
                    .take(POSTS_LIMIT)
                    .map(|(id, mut doc)| {
                        doc["id"] = json!(id);
                        doc
                    })
                    .collect(),
            )
        }
        Err(e) => {
            tracing::error!(error = %e, "Posts read failed");
            Json(Vec::new())
        }
    }
}

/// Create a post, best-effort enriched with catalog metadata for the movie
pub async fn create_post(
    State(state): State<AppState>,
    Json(request): Json<CreatePostRequest>,
) -> AppResult<(StatusCode, Json<Value>)> {
    let email = required(request.email, "Missing required fields")?;
    let movie_title = required(request.movie_title, "Missing required fields")?;
    let content = required(request.content, "Missing required fields")?;

    // Poster/plot enrichment is cosmetic; a dead catalog must not block posting
    let mut movie_poster = None;
    let mut movie_year = None;
    let mut movie_plot = None;
    if let Some(catalog) = &state.catalog {
        match catalog.search_by_title(&movie_title).await {
            Ok(Some(record)) => {
                movie_poster = record.poster_path;
                movie_year = record.release_date;
                movie_plot = record.overview;
            }
            Ok(None) => {}
            Err(e) => {
                tracing::warn!(title = %movie_title, error = %e, "Post enrichment lookup failed");
            }
        }
    }

    let post = Post {
        author: email,
        movie_title,
        content,
        rating: request.rating.unwrap_or(5),
        anonymous: request.anonymous,
        profile_icon: request
            .profile_icon
            .unwrap_or_else(|| DEFAULT_PROFILE_ICON.to_string()),
        movie_poster,
        movie_year,
        movie_plot,
        timestamp: chrono::Utc::now().to_rfc3339(),
        comments: Vec::new(),
    };

    let mut doc = to_doc(&post)?;
    let id = state.store.add(POSTS, doc.clone()).await?;
    doc["id"] = json!(id);

    Ok((StatusCode::CREATED, Json(doc)))
}

pub async fn edit_post(
    State(state): State<AppState>,
    Path(post_id): Path<String>,
    Json(request): Json<EditPostRequest>,
) -> AppResult<Json<Value>> {
    let email = required(request.email, "Email required")?;

    let doc = state
        .store
        .get(POSTS, &post_id)
        .await?
        .ok_or_else(|| AppError::NotFound("Post not found".to_string()))?;
    let mut post: Post = from_doc(doc)?;

    if post.author != email {
        return Err(AppError::Unauthorized("Unauthorized".to_string()));
    }

    if let Some(movie_title) = request.movie_title {
        post.movie_title = movie_title;
    }
    if let Some(content) = request.content {
        post.content = content;
    }
    if let Some(rating) = request.rating {
        post.rating = rating;
    }

    let mut doc = to_doc(&post)?;
    state.store.put(POSTS, &post_id, doc.clone()).await?;
    doc["id"] = json!(post_id);

    Ok(Json(doc))
}

pub async fn delete_post(
    State(state): State<AppState>,
    Path(post_id): Path<String>,
    Json(request): Json<AuthorRequest>,
) -> AppResult<Json<Value>> {
    let email = required(request.email, "Email required")?;

    let doc = state
        .store
        .get(POSTS, &post_id)
        .await?
        .ok_or_else(|| AppError::NotFound("Post not found".to_string()))?;
    let post: Post = from_doc(doc)?;

    if post.author != email {
        return Err(AppError::Unauthorized("Unauthorized".to_string()));
    }

    state.store.delete(POSTS, &post_id).await?;
    Ok(Json(json!({ "message": "Post deleted" })))
}

pub async fn add_comment(
    State(state): State<AppState>,
    Path(post_id): Path<String>,
    Json(request): Json<CommentRequest>,
) -> AppResult<(StatusCode, Json<Comment>)> {
    let email = required(request.email, "Email and content required")?;
    let content = required(request.content, "Email and content required")?;

    let doc = state
        .store
        .get(POSTS, &post_id)
        .await?
        .ok_or_else(|| AppError::NotFound("Post not found".to_string()))?;
    let mut post: Post = from_doc(doc)?;

    let comment = Comment {
        id: Uuid::new_v4().to_string(),
        author: email,
        content,
        profile_icon: request
            .profile_icon
            .unwrap_or_else(|| DEFAULT_PROFILE_ICON.to_string()),
        timestamp: chrono::Utc::now().to_rfc3339(),
    };
    post.comments.push(comment.clone());
    state.store.put(POSTS, &post_id, to_doc(&post)?).await?;

    Ok((StatusCode::CREATED, Json(comment)))
}
