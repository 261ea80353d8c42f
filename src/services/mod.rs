// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Services module - coordination layer between handlers, the backend API,
//! and the session store.

pub mod auth;
pub mod blog;
pub mod catalog;
pub mod payment;
pub mod student;

use serde::Serialize;

pub use auth::AuthService;
pub use blog::BlogClient;
pub use catalog::CatalogService;
pub use payment::PaymentService;
pub use student::StudentService;

/// Uniform service outcome.
///
/// Service functions never let errors escape; failures are reported through
/// this shape with a short, user-presentable message.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ServiceResult<T> {
    pub success: bool,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
}

impl<T> ServiceResult<T> {
    pub fn ok(message: impl Into<String>, data: T) -> Self {
        Self {
            success: true,
            message: message.into(),
            data: Some(data),
        }
    }

    pub fn ok_empty(message: impl Into<String>) -> Self {
        Self {
            success: true,
            message: message.into(),
            data: None,
        }
    }

    pub fn failure(message: impl Into<String>) -> Self {
        Self {
            success: false,
            message: message.into(),
            data: None,
        }
    }
}

/// Backend messages can be empty on synthesized failures; fall back to a
/// stable user-facing text.
pub(crate) fn non_empty(message: String, fallback: &str) -> String {
    if message.is_empty() {
        fallback.to_string()
    } else {
        message
    }
}

/// Production [`AuthGateway`](crate::flow::AuthGateway): the auth and student
/// services bound to one request's session store.
pub struct ServiceGateway<'a, S> {
    pub auth: &'a AuthService,
    pub students: &'a StudentService,
    pub sessions: &'a mut S,
}

impl<S: crate::session::SessionStore> crate::flow::AuthGateway for ServiceGateway<'_, S> {
    async fn send_otp(
        &mut self,
        mobile: &str,
    ) -> ServiceResult<crate::models::SendOtpData> {
        self.auth.send_otp(mobile).await
    }

    async fn verify_otp(
        &mut self,
        mobile: &str,
        otp: &str,
    ) -> ServiceResult<crate::models::LoginOutcome> {
        self.auth
            .verify_otp_and_login(self.sessions, mobile, otp)
            .await
    }

    async fn update_profile(
        &mut self,
        request: &crate::models::ProfileUpdateRequest,
    ) -> ServiceResult<crate::models::StudentProfile> {
        self.students
            .update_student_profile(self.sessions, request)
            .await
    }

    async fn logout(&mut self) -> ServiceResult<()> {
        self.auth.logout(self.sessions).await
    }
}
