// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@kernel.org>

//! Data models for the application.

pub mod auth;
pub mod blog;
pub mod catalog;
pub mod payment;

pub use auth::{
    AuthSession, CachedProfile, Gender, LoginData, LoginOutcome, ProfileUpdateRequest,
    RegistrationForm, SendOtpData, StudentProfile,
};
pub use blog::BlogPost;
pub use catalog::{ClassInfo, Course, CourseDetails, District, Institution};
pub use payment::{InitiatePaymentData, PaymentGateway, PaymentHistoryEntry};
