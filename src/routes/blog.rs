// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Blog content routes, backed by the WordPress-compatible API.

use axum::{
    extract::{Path, Query, State},
    routing::get,
    Json, Router,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

use crate::error::{AppError, Result};
use crate::models::BlogPost;
use crate::AppState;

pub fn routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/api/blog/posts", get(list_posts))
        .route("/api/blog/posts/{slug}", get(get_post))
}

#[derive(Deserialize)]
struct PostsQuery {
    #[serde(default = "default_page")]
    page: u32,
    #[serde(default = "default_per_page")]
    per_page: u32,
}

fn default_page() -> u32 {
    1
}

fn default_per_page() -> u32 {
    9
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct PostsResponse {
    posts: Vec<BlogPost>,
    total_pages: u32,
}

async fn list_posts(
    State(state): State<Arc<AppState>>,
    Query(query): Query<PostsQuery>,
) -> Result<Json<PostsResponse>> {
    if query.page == 0 || query.per_page == 0 || query.per_page > 50 {
        return Err(AppError::BadRequest("Invalid pagination".to_string()));
    }

    let (posts, total_pages) = state.blog.list_posts(query.page, query.per_page).await;
    Ok(Json(PostsResponse { posts, total_pages }))
}

async fn get_post(
    State(state): State<Arc<AppState>>,
    Path(slug): Path<String>,
) -> Result<Json<BlogPost>> {
    state
        .blog
        .get_post_by_slug(&slug)
        .await
        .map(Json)
        .ok_or_else(|| AppError::NotFound(format!("Blog post {slug} not found")))
}
