// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Authentication operations: OTP dispatch, login, logout, token refresh,
//! profile fetch.
//!
//! Each operation coordinates the backend API client with an injected
//! [`SessionStore`] and returns a uniform [`ServiceResult`]; no failure path
//! escapes as an error.

use serde_json::json;

use crate::api_client::{ApiClient, ApiResponse};
use crate::error::ApiError;
use crate::models::auth::RefreshTokenData;
use crate::models::{LoginData, LoginOutcome, SendOtpData, StudentProfile};
use crate::services::{non_empty, ServiceResult};
use crate::session::SessionStore;

/// Authentication service over the platform backend.
#[derive(Clone)]
pub struct AuthService {
    api: ApiClient,
}

impl AuthService {
    pub fn new(api: ApiClient) -> Self {
        Self { api }
    }

    /// Send an OTP to a phone number.
    ///
    /// Surfaces the backend's `profileCompleted` hint so the wizard can decide
    /// later whether the registration step is needed. No session is created.
    pub async fn send_otp(&self, mobile: &str) -> ServiceResult<SendOtpData> {
        let response: ApiResponse<SendOtpData> = self
            .api
            .post("/web/auth/send-otp", json!({ "mobileNumber": mobile }), None)
            .await;

        if !response.success {
            return ServiceResult::failure(non_empty(
                response.message,
                "Failed to send OTP. Please try again.",
            ));
        }

        ServiceResult::ok(
            non_empty(response.message, "OTP sent successfully"),
            response.data.unwrap_or_default(),
        )
    }

    /// Verify an OTP and create the session.
    ///
    /// After a successful login the full profile is fetched with the new
    /// access token; a failed fetch is non-fatal and degrades the
    /// profile-completed flag to `false` instead of aborting the login.
    pub async fn verify_otp_and_login<S: SessionStore>(
        &self,
        sessions: &mut S,
        mobile: &str,
        otp: &str,
    ) -> ServiceResult<LoginOutcome> {
        match self.try_login(sessions, mobile, otp).await {
            Ok((message, outcome)) => ServiceResult::ok(message, outcome),
            Err(err) => {
                tracing::warn!(
                    code = %err.code,
                    trace_id = err.trace_id.as_deref().unwrap_or("-"),
                    "OTP verification failed"
                );
                ServiceResult::failure(err.message)
            }
        }
    }

    /// The raising half of the login flow; the public wrapper above catches.
    async fn try_login<S: SessionStore>(
        &self,
        sessions: &mut S,
        mobile: &str,
        otp: &str,
    ) -> Result<(String, LoginOutcome), ApiError> {
        let response: ApiResponse<LoginData> = self
            .api
            .post(
                "/web/auth/login",
                json!({ "mobileNumber": mobile, "otp": otp }),
                None,
            )
            .await;

        if !response.success {
            return Err(raise(response));
        }

        let tokens = response
            .data
            .ok_or_else(|| ApiError::new(500, "Invalid response from server"))?;

        // Fetch the profile with the freshly issued token. Failure here must
        // not abort the login: the flag degrades to false and the wizard will
        // route the user through registration.
        let profile_response: ApiResponse<StudentProfile> = self
            .api
            .get("/web/student/profile", Some(&tokens.access_token))
            .await;

        let (profile, profile_completed) = match profile_response {
            ApiResponse {
                success: true,
                data: Some(profile),
                ..
            } => {
                let completed = profile.profile_completed;
                (Some(profile), completed)
            }
            other => {
                tracing::warn!(
                    status_code = other.status_code,
                    "Profile fetch after login failed, treating profile as incomplete"
                );
                (None, false)
            }
        };

        sessions.create_session(
            &tokens.access_token,
            &tokens.refresh_token,
            mobile,
            Some(profile_completed),
        );

        Ok((
            non_empty(response.message, "Login successful"),
            LoginOutcome { profile },
        ))
    }

    /// Log out: best-effort backend call, unconditional local session delete.
    pub async fn logout<S: SessionStore>(&self, sessions: &mut S) -> ServiceResult<()> {
        if let Some(session) = sessions.get_session() {
            let response: ApiResponse<serde_json::Value> = self
                .api
                .post("/web/auth/logout", json!({}), Some(&session.access_token))
                .await;

            if !response.success {
                tracing::warn!(
                    status_code = response.status_code,
                    "Backend logout failed, clearing local session anyway"
                );
            }
        }

        sessions.delete_session();
        ServiceResult::ok_empty("Logged out")
    }

    /// Refresh the access token.
    ///
    /// Fail-closed: any failure deletes the session so the user has to
    /// authenticate again.
    pub async fn refresh_access_token<S: SessionStore>(
        &self,
        sessions: &mut S,
    ) -> ServiceResult<()> {
        let Some(session) = sessions.get_session() else {
            return ServiceResult::failure("No active session");
        };

        let response: ApiResponse<RefreshTokenData> = self
            .api
            .post("/web/auth/refresh", json!({}), Some(&session.refresh_token))
            .await;

        match response {
            ApiResponse {
                success: true,
                data: Some(tokens),
                ..
            } => {
                sessions.update_session(&tokens.access_token, &tokens.refresh_token);
                ServiceResult::ok_empty("Token refreshed successfully")
            }
            other => {
                tracing::info!(
                    status_code = other.status_code,
                    "Token refresh failed, deleting session"
                );
                sessions.delete_session();
                ServiceResult::failure("Session expired. Please login again.")
            }
        }
    }

    /// Fetch the student profile for the current session.
    pub async fn get_student_profile<S: SessionStore>(
        &self,
        sessions: &mut S,
    ) -> ServiceResult<StudentProfile> {
        let Some(session) = sessions.get_session() else {
            return ServiceResult::failure("Not authenticated");
        };

        let response: ApiResponse<StudentProfile> = self
            .api
            .get("/web/student/profile", Some(&session.access_token))
            .await;

        match response {
            ApiResponse {
                success: true,
                data: Some(profile),
                ..
            } => ServiceResult::ok("Profile fetched successfully", profile),
            other => ServiceResult::failure(non_empty(other.message, "Failed to fetch profile")),
        }
    }
}

/// Turn a failed response into the raised error form, preferring the
/// structured backend payload when one was preserved.
fn raise<T>(response: ApiResponse<T>) -> ApiError {
    match response.error {
        Some(details) => ApiError::from_details(response.status_code, details),
        None => ApiError::new(
            response.status_code,
            non_empty(response.message, "Failed to verify OTP. Please try again."),
        ),
    }
}
