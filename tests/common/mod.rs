// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

use std::sync::Arc;

use brritto_web::config::Config;
use brritto_web::models::AuthSession;
use brritto_web::routes::create_router;
use brritto_web::time_utils::now_epoch_millis;
use brritto_web::AppState;

/// Create a test app over an unreachable backend.
///
/// Backend-dependent paths degrade into normalized failures, which is exactly
/// what these tests exercise; everything session- and cookie-shaped works
/// without a backend.
#[allow(dead_code)]
pub fn create_test_app() -> (axum::Router, Arc<AppState>) {
    let config = Config::default();
    let state = Arc::new(AppState::from_config(config));
    (create_router(state.clone()), state)
}

/// Serialized session cookie value, expiring `ttl_ms` from now.
#[allow(dead_code)]
pub fn session_value(profile_completed: Option<bool>, ttl_ms: i64) -> String {
    let session = AuthSession {
        access_token: "test-access".to_string(),
        refresh_token: "test-refresh".to_string(),
        mobile: "01812345678".to_string(),
        expires_at: now_epoch_millis() + ttl_ms,
        profile_completed,
    };
    serde_json::to_string(&session).unwrap()
}

/// `Cookie:` header for a session with the given profile flag.
#[allow(dead_code)]
pub fn session_cookie_header(profile_completed: Option<bool>, ttl_ms: i64) -> String {
    format!("brritto_session={}", session_value(profile_completed, ttl_ms))
}
