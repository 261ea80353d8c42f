// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Login wizard and session endpoints.
//!
//! Each wizard endpoint rebuilds the [`AuthFlow`] from the request's cookies,
//! drives one action, and returns the resulting snapshot. Session and wizard
//! cookies are carried on separate jars whose deltas never overlap.

use axum::{
    extract::{Query, State},
    routing::{get, post},
    Json, Router,
};
use axum_extra::extract::cookie::CookieJar;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
#[cfg(feature = "binding-generation")]
use ts_rs::TS;

use crate::flow::{AuthFlow, CookieFlowStore, FlowOutcome, FlowSnapshot};
use crate::models::RegistrationForm;
use crate::services::{ServiceGateway, ServiceResult};
use crate::session::{CookieSessionStore, SessionStore};
use crate::AppState;

pub fn routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/auth/send-otp", post(send_otp))
        .route("/auth/verify", post(verify_otp))
        .route("/auth/resend-otp", post(resend_otp))
        .route("/auth/register", post(register))
        .route("/auth/back", post(back_to_phone))
        .route("/auth/logout", post(logout))
        .route("/auth/refresh", post(refresh))
        .route("/auth/flow", get(get_flow))
        .route("/auth/session", get(get_session_status))
}

/// Optional redirect target carried by the login page.
#[derive(Deserialize)]
pub struct FlowQuery {
    #[serde(default)]
    redirect: Option<String>,
}

#[derive(Deserialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[serde(rename_all = "camelCase")]
pub struct SendOtpPayload {
    mobile: String,
}

#[derive(Deserialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[serde(rename_all = "camelCase")]
pub struct VerifyOtpPayload {
    otp: String,
}

/// Wizard exit target.
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RedirectTarget {
    pub to: String,
    /// Whether the client must do a full page load (so the header re-reads
    /// the cached profile)
    pub hard: bool,
}

/// Response of every wizard endpoint.
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FlowResponse {
    #[serde(flatten)]
    pub snapshot: FlowSnapshot,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub redirect: Option<RedirectTarget>,
}

impl FlowResponse {
    fn new(snapshot: FlowSnapshot, outcome: FlowOutcome) -> Self {
        let redirect = match outcome {
            FlowOutcome::Stay => None,
            FlowOutcome::Redirect { to, hard } => Some(RedirectTarget { to, hard }),
        };
        Self { snapshot, redirect }
    }
}

/// Session status for client components.
#[derive(Serialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
#[serde(rename_all = "camelCase")]
pub struct SessionStatus {
    pub authenticated: bool,
    pub profile_completed: Option<bool>,
}

/// Run one wizard action and package the response.
///
/// The closure receives the flow built from this request's cookies; the two
/// jars (session, wizard) are returned so their cookie deltas apply.
macro_rules! drive_flow {
    ($state:expr, $jar:expr, $redirect:expr, |$flow:ident| $action:block) => {{
        let state = $state;
        let mut sessions = CookieSessionStore::new($jar.clone(), &state.config);
        let flow_store = CookieFlowStore::new($jar, state.config.cookie_secure());
        let gateway = ServiceGateway {
            auth: &state.auth,
            students: &state.students,
            sessions: &mut sessions,
        };

        #[allow(unused_mut)]
        let mut $flow = AuthFlow::resume(gateway, flow_store, $redirect);
        let outcome = $action;
        let body = FlowResponse::new($flow.snapshot(), outcome);
        let flow_jar = $flow.into_store().into_jar();

        (sessions.into_jar(), flow_jar, Json(body))
    }};
}

/// Phone step: dispatch an OTP.
async fn send_otp(
    State(state): State<Arc<AppState>>,
    Query(query): Query<FlowQuery>,
    jar: CookieJar,
    Json(payload): Json<SendOtpPayload>,
) -> impl axum::response::IntoResponse {
    drive_flow!(state, jar, query.redirect, |flow| {
        // A stale OTP step from a previous attempt restarts from phone;
        // the registration step stays locked until logout.
        if flow.step() == crate::flow::AuthStep::Otp {
            flow.back_to_phone();
        }
        flow.set_mobile(payload.mobile);
        flow.submit_phone().await
    })
}

/// OTP step: verify and log in.
async fn verify_otp(
    State(state): State<Arc<AppState>>,
    Query(query): Query<FlowQuery>,
    jar: CookieJar,
    Json(payload): Json<VerifyOtpPayload>,
) -> impl axum::response::IntoResponse {
    drive_flow!(state, jar, query.redirect, |flow| {
        flow.set_otp(payload.otp);
        flow.submit_otp().await
    })
}

/// OTP step: resend the code.
async fn resend_otp(
    State(state): State<Arc<AppState>>,
    jar: CookieJar,
) -> impl axum::response::IntoResponse {
    drive_flow!(state, jar, None, |flow| { flow.resend_otp().await })
}

/// Registration step: submit the profile form.
async fn register(
    State(state): State<Arc<AppState>>,
    Query(query): Query<FlowQuery>,
    jar: CookieJar,
    Json(form): Json<RegistrationForm>,
) -> impl axum::response::IntoResponse {
    drive_flow!(state, jar, query.redirect, |flow| {
        flow.set_registration_form(form);
        flow.submit_registration().await
    })
}

/// Back from the OTP step to the phone step.
async fn back_to_phone(
    State(state): State<Arc<AppState>>,
    jar: CookieJar,
) -> impl axum::response::IntoResponse {
    drive_flow!(state, jar, None, |flow| {
        flow.back_to_phone();
        FlowOutcome::Stay
    })
}

/// Log out from any step.
async fn logout(
    State(state): State<Arc<AppState>>,
    jar: CookieJar,
) -> impl axum::response::IntoResponse {
    drive_flow!(state, jar, None, |flow| { flow.logout().await })
}

/// Current wizard snapshot, for server-side rendering of the login page.
async fn get_flow(
    State(state): State<Arc<AppState>>,
    Query(query): Query<FlowQuery>,
    jar: CookieJar,
) -> impl axum::response::IntoResponse {
    drive_flow!(state, jar, query.redirect, |flow| { FlowOutcome::Stay })
}

/// Refresh the access token using the refresh token.
async fn refresh(
    State(state): State<Arc<AppState>>,
    jar: CookieJar,
) -> (CookieJar, Json<ServiceResult<()>>) {
    let mut sessions = CookieSessionStore::new(jar, &state.config);
    let result = state.auth.refresh_access_token(&mut sessions).await;
    (sessions.into_jar(), Json(result))
}

/// Whether the caller is authenticated, and the profile-completed flag.
async fn get_session_status(
    State(state): State<Arc<AppState>>,
    jar: CookieJar,
) -> (CookieJar, Json<SessionStatus>) {
    let mut sessions = CookieSessionStore::new(jar, &state.config);
    let session = sessions.get_session();

    let status = SessionStatus {
        authenticated: session.is_some(),
        profile_completed: session.and_then(|s| s.profile_completed),
    };

    (sessions.into_jar(), Json(status))
}
