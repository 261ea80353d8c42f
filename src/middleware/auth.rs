// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Page-route gating by session state.
//!
//! Protected path prefixes need a session with a completed profile; the
//! login/signup pages bounce authenticated users back to `/`. A session
//! whose profile is explicitly incomplete counts as unauthenticated for
//! protected routes: those users only ever see the registration step.

use std::sync::Arc;

use axum::{
    extract::{Request, State},
    middleware::Next,
    response::{IntoResponse, Redirect, Response},
};
use axum_extra::extract::cookie::CookieJar;

use crate::models::AuthSession;
use crate::time_utils::now_epoch_millis;
use crate::AppState;

/// Gate page routes on session presence and profile completion.
///
/// The middleware only inspects the cookie; clearing corrupt or expired
/// values is left to the session store on the next service call.
pub async fn route_guard(
    State(state): State<Arc<AppState>>,
    jar: CookieJar,
    request: Request,
    next: Next,
) -> Response {
    let path = request.uri().path().to_string();
    let config = &state.config;

    let is_protected = config.protected_routes.iter().any(|p| path.starts_with(p));
    let is_auth_route = config.auth_routes.iter().any(|p| path.starts_with(p));

    if !is_protected && !is_auth_route {
        return next.run(request).await;
    }

    let session = jar
        .get(&config.session_cookie_name)
        .and_then(|c| serde_json::from_str::<AuthSession>(c.value()).ok())
        .filter(|s| s.expires_at > now_epoch_millis());

    let authenticated = session.is_some();
    let profile_incomplete =
        session.as_ref().and_then(|s| s.profile_completed) == Some(false);

    if is_protected && !authenticated {
        let login_url = format!("/login?redirect={}", urlencoding::encode(&path));
        tracing::debug!(path = %path, "Redirecting unauthenticated request to login");
        return Redirect::temporary(&login_url).into_response();
    }

    // An incomplete profile may only go to the registration step
    if is_protected && profile_incomplete {
        tracing::debug!(path = %path, "Redirecting incomplete profile to login");
        return Redirect::temporary("/login").into_response();
    }

    if is_auth_route && authenticated && !profile_incomplete {
        return Redirect::temporary("/").into_response();
    }

    next.run(request).await
}
