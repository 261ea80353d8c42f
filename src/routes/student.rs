// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Student profile routes.

use axum::{
    extract::State,
    routing::{get, put},
    Json, Router,
};
use axum_extra::extract::cookie::CookieJar;
use serde::Serialize;
use std::sync::Arc;

use crate::models::{ProfileUpdateRequest, RegistrationForm, StudentProfile};
use crate::services::ServiceResult;
use crate::session::CookieSessionStore;
use crate::validators::{is_form_valid, validate_registration_form, FormErrors};
use crate::AppState;

pub fn routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/api/me", get(get_me))
        .route("/api/me/profile", put(update_profile))
}

/// Current student's profile.
async fn get_me(
    State(state): State<Arc<AppState>>,
    jar: CookieJar,
) -> (CookieJar, Json<ServiceResult<StudentProfile>>) {
    let mut sessions = CookieSessionStore::new(jar, &state.config);
    let result = state.auth.get_student_profile(&mut sessions).await;
    (sessions.into_jar(), Json(result))
}

/// Profile update response: the service result plus field-level validation
/// errors when the form never reached the backend.
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct UpdateProfileResponse {
    success: bool,
    message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    data: Option<StudentProfile>,
    #[serde(skip_serializing_if = "FormErrors::is_empty")]
    errors: FormErrors,
}

/// Update the profile outside the wizard (e.g. a profile settings page).
async fn update_profile(
    State(state): State<Arc<AppState>>,
    jar: CookieJar,
    Json(form): Json<RegistrationForm>,
) -> (CookieJar, Json<UpdateProfileResponse>) {
    let errors = validate_registration_form(&form);
    if !is_form_valid(&errors) {
        return (
            jar,
            Json(UpdateProfileResponse {
                success: false,
                message: "Please correct the highlighted fields".to_string(),
                data: None,
                errors,
            }),
        );
    }

    let mut sessions = CookieSessionStore::new(jar, &state.config);
    let request = ProfileUpdateRequest::from(&form);
    let result = state
        .students
        .update_student_profile(&mut sessions, &request)
        .await;

    let response = UpdateProfileResponse {
        success: result.success,
        message: result.message,
        data: result.data,
        errors: FormErrors::new(),
    };

    (sessions.into_jar(), Json(response))
}
