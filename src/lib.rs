// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@kernel.org>

//! Brritto web backend: session-owning front-end server for the Brritto
//! learning platform.
//!
//! This crate fronts the platform's REST backend for the web client. It owns
//! the HTTP-only session cookie, drives the phone/OTP/registration login
//! wizard, and proxies catalog, payment, and blog reads.

pub mod api_client;
pub mod config;
pub mod error;
pub mod flow;
pub mod middleware;
pub mod models;
pub mod routes;
pub mod services;
pub mod session;
pub mod time_utils;
pub mod validators;

use api_client::ApiClient;
use config::Config;
use services::{AuthService, BlogClient, CatalogService, PaymentService, StudentService};

/// Shared application state.
pub struct AppState {
    pub config: Config,
    pub auth: AuthService,
    pub students: StudentService,
    pub catalog: CatalogService,
    pub payments: PaymentService,
    pub blog: BlogClient,
}

impl AppState {
    /// Assemble all services over a single backend client.
    pub fn from_config(config: Config) -> Self {
        let api = ApiClient::new(&config.api_base_url);
        let blog = BlogClient::new(config.blog_api_url.clone(), config.blog_api_key.clone());

        Self {
            auth: AuthService::new(api.clone()),
            students: StudentService::new(api.clone()),
            catalog: CatalogService::new(api.clone()),
            payments: PaymentService::new(api),
            blog,
            config,
        }
    }
}
