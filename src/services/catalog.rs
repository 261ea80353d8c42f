// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Course catalog and registration-form lookups.
//!
//! Public catalog reads relay the backend envelope unchanged; the
//! institution/district searches are session-scoped and return the uniform
//! service shape like the auth operations do.

use crate::api_client::{ApiClient, ApiResponse};
use crate::models::catalog::NestedList;
use crate::models::{ClassInfo, Course, CourseDetails, District, Institution};
use crate::services::ServiceResult;
use crate::session::SessionStore;

#[derive(Clone)]
pub struct CatalogService {
    api: ApiClient,
}

impl CatalogService {
    pub fn new(api: ApiClient) -> Self {
        Self { api }
    }

    /// All classes, sorted by priority on the backend.
    pub async fn get_classes(&self) -> ApiResponse<Vec<ClassInfo>> {
        self.api.get("/web/classes", None).await
    }

    /// Paginated course listing, optionally filtered by class.
    pub async fn get_courses(
        &self,
        page: u32,
        limit: u32,
        class_id: Option<&str>,
    ) -> ApiResponse<Vec<Course>> {
        let mut endpoint = format!("/web/courses?page={page}&limit={limit}");
        if let Some(class_id) = class_id {
            endpoint.push_str(&format!("&class={}", urlencoding::encode(class_id)));
        }

        self.api.get(&endpoint, None).await
    }

    /// Course details by id.
    pub async fn get_course_details(&self, course_id: &str) -> ApiResponse<CourseDetails> {
        let endpoint = format!("/web/courses/{}", urlencoding::encode(course_id));
        self.api.get(&endpoint, None).await
    }

    /// Search institutions for the registration form.
    pub async fn search_institutions<S: SessionStore>(
        &self,
        sessions: &mut S,
        term: Option<&str>,
        page: u32,
        limit: u32,
    ) -> ServiceResult<Vec<Institution>> {
        let Some(session) = sessions.get_session() else {
            return ServiceResult::failure("Not authenticated");
        };

        let mut endpoint = format!("/students/institution?page={page}&limit={limit}");
        if let Some(term) = term {
            endpoint.push_str(&format!("&term={}", urlencoding::encode(term)));
        }

        let response: ApiResponse<NestedList<Institution>> =
            self.api.get(&endpoint, Some(&session.access_token)).await;

        if !response.success {
            return ServiceResult::failure("Failed to fetch institutions");
        }

        ServiceResult::ok(
            "Institutions fetched successfully",
            response.data.map(|list| list.data).unwrap_or_default(),
        )
    }

    /// Search districts for the registration form.
    pub async fn search_districts<S: SessionStore>(
        &self,
        sessions: &mut S,
        term: Option<&str>,
    ) -> ServiceResult<Vec<District>> {
        let Some(session) = sessions.get_session() else {
            return ServiceResult::failure("Not authenticated");
        };

        let mut endpoint = "/students/district".to_string();
        if let Some(term) = term {
            endpoint.push_str(&format!("?term={}", urlencoding::encode(term)));
        }

        let response: ApiResponse<NestedList<District>> =
            self.api.get(&endpoint, Some(&session.access_token)).await;

        if !response.success {
            return ServiceResult::failure("Failed to fetch districts");
        }

        ServiceResult::ok(
            "Districts fetched successfully",
            response.data.map(|list| list.data).unwrap_or_default(),
        )
    }
}
