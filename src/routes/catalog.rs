// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Course catalog and registration lookup routes.
//!
//! Catalog reads relay the backend envelope as-is; pages inspect the
//! `success` flag the same way they would client-side.

use axum::{
    extract::{Path, Query, State},
    routing::get,
    Json, Router,
};
use axum_extra::extract::cookie::CookieJar;
use serde::Deserialize;
use std::sync::Arc;

use crate::api_client::ApiResponse;
use crate::error::{AppError, Result};
use crate::models::{ClassInfo, Course, CourseDetails, District, Institution};
use crate::services::ServiceResult;
use crate::session::CookieSessionStore;
use crate::AppState;

const MAX_SEARCH_TERM_LEN: usize = 100;
const MAX_PAGE_SIZE: u32 = 100;

pub fn routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/api/classes", get(get_classes))
        .route("/api/courses", get(get_courses))
        .route("/api/courses/{id}", get(get_course_details))
        .route("/api/institutions", get(search_institutions))
        .route("/api/districts", get(search_districts))
}

async fn get_classes(State(state): State<Arc<AppState>>) -> Json<ApiResponse<Vec<ClassInfo>>> {
    Json(state.catalog.get_classes().await)
}

#[derive(Deserialize)]
struct CoursesQuery {
    #[serde(default = "default_page")]
    page: u32,
    #[serde(default = "default_limit")]
    limit: u32,
    /// Filter by class id
    class: Option<String>,
}

fn default_page() -> u32 {
    1
}

fn default_limit() -> u32 {
    10
}

async fn get_courses(
    State(state): State<Arc<AppState>>,
    Query(query): Query<CoursesQuery>,
) -> Result<Json<ApiResponse<Vec<Course>>>> {
    if query.page == 0 || query.limit == 0 || query.limit > MAX_PAGE_SIZE {
        return Err(AppError::BadRequest("Invalid pagination".to_string()));
    }

    Ok(Json(
        state
            .catalog
            .get_courses(query.page, query.limit, query.class.as_deref())
            .await,
    ))
}

async fn get_course_details(
    State(state): State<Arc<AppState>>,
    Path(course_id): Path<String>,
) -> Result<Json<ApiResponse<CourseDetails>>> {
    if course_id.is_empty() || course_id.len() > 64 {
        return Err(AppError::BadRequest("Invalid course id".to_string()));
    }

    Ok(Json(state.catalog.get_course_details(&course_id).await))
}

#[derive(Deserialize)]
struct SearchQuery {
    term: Option<String>,
    #[serde(default = "default_page")]
    page: u32,
    #[serde(default = "default_limit")]
    limit: u32,
}

async fn search_institutions(
    State(state): State<Arc<AppState>>,
    Query(query): Query<SearchQuery>,
    jar: CookieJar,
) -> Result<(CookieJar, Json<ServiceResult<Vec<Institution>>>)> {
    validate_search(&query)?;

    let mut sessions = CookieSessionStore::new(jar, &state.config);
    let result = state
        .catalog
        .search_institutions(&mut sessions, query.term.as_deref(), query.page, query.limit)
        .await;

    Ok((sessions.into_jar(), Json(result)))
}

async fn search_districts(
    State(state): State<Arc<AppState>>,
    Query(query): Query<SearchQuery>,
    jar: CookieJar,
) -> Result<(CookieJar, Json<ServiceResult<Vec<District>>>)> {
    validate_search(&query)?;

    let mut sessions = CookieSessionStore::new(jar, &state.config);
    let result = state
        .catalog
        .search_districts(&mut sessions, query.term.as_deref())
        .await;

    Ok((sessions.into_jar(), Json(result)))
}

fn validate_search(query: &SearchQuery) -> Result<()> {
    if let Some(term) = &query.term {
        if term.len() > MAX_SEARCH_TERM_LEN {
            return Err(AppError::BadRequest("Search term too long".to_string()));
        }
    }
    if query.page == 0 || query.limit == 0 || query.limit > MAX_PAGE_SIZE {
        return Err(AppError::BadRequest("Invalid pagination".to_string()));
    }
    Ok(())
}
