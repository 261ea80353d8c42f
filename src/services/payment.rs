// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Payment initiation and history.
//!
//! The gateway itself is an opaque external collaborator: the backend returns
//! a hosted payment URL and we relay it.

use serde_json::json;

use crate::api_client::{ApiClient, ApiResponse};
use crate::models::{InitiatePaymentData, PaymentGateway, PaymentHistoryEntry};
use crate::session::SessionStore;

#[derive(Clone)]
pub struct PaymentService {
    api: ApiClient,
}

impl PaymentService {
    pub fn new(api: ApiClient) -> Self {
        Self { api }
    }

    /// Initiate a payment for a course enrollment.
    pub async fn initiate_payment<S: SessionStore>(
        &self,
        sessions: &mut S,
        course_id: &str,
        gateway: PaymentGateway,
    ) -> ApiResponse<InitiatePaymentData> {
        let Some(session) = sessions.get_session() else {
            return ApiResponse::failure(401, "Please login to continue");
        };

        self.api
            .post(
                "/web/payments/initiate",
                json!({
                    "courseId": course_id,
                    "description": "Course purchase",
                    "paymentType": gateway,
                }),
                Some(&session.access_token),
            )
            .await
    }

    /// Paginated payment history for the current student.
    pub async fn get_payment_history<S: SessionStore>(
        &self,
        sessions: &mut S,
        page: u32,
        limit: u32,
    ) -> ApiResponse<Vec<PaymentHistoryEntry>> {
        let Some(session) = sessions.get_session() else {
            return ApiResponse::failure(401, "Please login to view payment history");
        };

        let endpoint = format!("/web/payments/history?page={page}&limit={limit}");
        self.api.get(&endpoint, Some(&session.access_token)).await
    }
}
