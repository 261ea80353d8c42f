// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Payment routes.

use axum::{
    extract::{Query, State},
    routing::{get, post},
    Json, Router,
};
use axum_extra::extract::cookie::CookieJar;
use serde::Deserialize;
use std::sync::Arc;

use crate::api_client::ApiResponse;
use crate::error::{ApiError, AppError, Result};
use crate::models::{InitiatePaymentData, PaymentGateway, PaymentHistoryEntry};
use crate::session::CookieSessionStore;
use crate::AppState;

pub fn routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/api/payments/initiate", post(initiate_payment))
        .route("/api/payments/history", get(payment_history))
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct InitiatePaymentPayload {
    course_id: String,
    payment_type: PaymentGateway,
}

/// Start a course purchase; responds with the gateway's hosted payment URL.
async fn initiate_payment(
    State(state): State<Arc<AppState>>,
    jar: CookieJar,
    Json(payload): Json<InitiatePaymentPayload>,
) -> Result<(CookieJar, Json<ApiResponse<InitiatePaymentData>>)> {
    if payload.course_id.is_empty() || payload.course_id.len() > 64 {
        return Err(AppError::BadRequest("Invalid course id".to_string()));
    }

    let mut sessions = CookieSessionStore::new(jar, &state.config);
    let mut result = state
        .payments
        .initiate_payment(&mut sessions, &payload.course_id, payload.payment_type)
        .await;

    // Structured gateway errors become typed HTTP errors; synthesized
    // failures (no session, transport) stay in the envelope.
    if let Some(details) = result.error.take() {
        return Err(AppError::Backend(ApiError::from_details(
            result.status_code,
            details,
        )));
    }

    Ok((sessions.into_jar(), Json(result)))
}

#[derive(Deserialize)]
struct HistoryQuery {
    #[serde(default = "default_page")]
    page: u32,
    #[serde(default = "default_limit")]
    limit: u32,
}

fn default_page() -> u32 {
    1
}

fn default_limit() -> u32 {
    10
}

async fn payment_history(
    State(state): State<Arc<AppState>>,
    Query(query): Query<HistoryQuery>,
    jar: CookieJar,
) -> Result<(CookieJar, Json<ApiResponse<Vec<PaymentHistoryEntry>>>)> {
    if query.page == 0 || query.limit == 0 || query.limit > 100 {
        return Err(AppError::BadRequest("Invalid pagination".to_string()));
    }

    let mut sessions = CookieSessionStore::new(jar, &state.config);
    let result = state
        .payments
        .get_payment_history(&mut sessions, query.page, query.limit)
        .await;

    Ok((sessions.into_jar(), Json(result)))
}
