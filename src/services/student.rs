// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Student profile updates.

use crate::api_client::{ApiClient, ApiResponse};
use crate::models::{ProfileUpdateRequest, StudentProfile};
use crate::services::{non_empty, ServiceResult};
use crate::session::SessionStore;

#[derive(Clone)]
pub struct StudentService {
    api: ApiClient,
}

impl StudentService {
    pub fn new(api: ApiClient) -> Self {
        Self { api }
    }

    /// Complete the profile of a user who verified an OTP but has not
    /// registered yet.
    ///
    /// On success the session is re-created with `profile_completed = true`
    /// so the route middleware stops forcing the registration step.
    pub async fn update_student_profile<S: SessionStore>(
        &self,
        sessions: &mut S,
        request: &ProfileUpdateRequest,
    ) -> ServiceResult<StudentProfile> {
        let Some(session) = sessions.get_session() else {
            return ServiceResult::failure("Not authenticated. Please login again.");
        };

        let body = match serde_json::to_value(request) {
            Ok(body) => body,
            Err(err) => {
                tracing::error!(error = %err, "Failed to serialize profile update");
                return ServiceResult::failure("Failed to update profile. Please try again.");
            }
        };

        let response: ApiResponse<StudentProfile> = self
            .api
            .put("/web/student/profile", body, Some(&session.access_token))
            .await;

        if !response.success {
            return ServiceResult::failure(non_empty(
                response.message,
                "Failed to update profile. Please try again.",
            ));
        }

        sessions.create_session(
            &session.access_token,
            &session.refresh_token,
            &session.mobile,
            Some(true),
        );

        ServiceResult {
            success: true,
            message: non_empty(response.message, "Profile updated successfully"),
            data: response.data,
        }
    }
}
