// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Form validators for the login wizard.
//!
//! All functions here are pure and total: same input, same output, no side
//! effects, and nothing ever panics or errors.

use std::collections::BTreeMap;

use serde::Serialize;
use validator::ValidateEmail;

use crate::models::RegistrationForm;

/// Outcome of validating a single input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Validation {
    pub is_valid: bool,
    pub error: Option<String>,
}

impl Validation {
    fn ok() -> Self {
        Self {
            is_valid: true,
            error: None,
        }
    }

    fn fail(message: impl Into<String>) -> Self {
        Self {
            is_valid: false,
            error: Some(message.into()),
        }
    }
}

/// Field identifiers for the wizard's error map.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum FormField {
    Mobile,
    Otp,
    Name,
    Email,
    District,
    Institution,
    Class,
    Terms,
    General,
}

/// Field-scoped validation errors; an absent key means the field is valid.
pub type FormErrors = BTreeMap<FormField, String>;

/// Strip formatting characters (whitespace, hyphens, parentheses) from a
/// phone number.
pub fn sanitize_phone(phone: &str) -> String {
    phone
        .chars()
        .filter(|c| !c.is_whitespace() && !matches!(c, '-' | '(' | ')'))
        .collect()
}

/// Whether the input is a valid Bangladesh mobile number: `01`, operator
/// digit 3-9, 11 digits total.
pub fn is_valid_bd_phone(phone: &str) -> bool {
    let cleaned = sanitize_phone(phone);
    let bytes = cleaned.as_bytes();

    bytes.len() == 11
        && bytes.iter().all(|b| b.is_ascii_digit())
        && bytes.starts_with(b"01")
        && (b'3'..=b'9').contains(&bytes[2])
}

/// Validate a phone number, with a human-readable error on failure.
pub fn validate_phone(phone: &str) -> Validation {
    if phone.is_empty() {
        return Validation::fail("Phone number is required");
    }

    if !is_valid_bd_phone(phone) {
        return Validation::fail(
            "Please enter a valid 11-digit BD phone number (e.g., 01812345678)",
        );
    }

    Validation::ok()
}

/// Validate an OTP entry: exactly 6 characters.
pub fn validate_otp(otp: &str) -> Validation {
    if otp.is_empty() || otp.chars().count() != 6 {
        return Validation::fail("Please enter a valid 6-digit OTP");
    }
    Validation::ok()
}

/// Validate the registration form as a whole.
///
/// Returns a message for every failing field. Email is optional and only
/// format-checked when non-empty.
pub fn validate_registration_form(form: &RegistrationForm) -> FormErrors {
    let mut errors = FormErrors::new();

    if form.name.trim().chars().count() < 2 {
        errors.insert(FormField::Name, "Name must be at least 2 characters".to_string());
    }

    if !form.email.is_empty() && !form.email.validate_email() {
        errors.insert(
            FormField::Email,
            "Please enter a valid email address".to_string(),
        );
    }

    if form.district.trim().chars().count() < 2 {
        errors.insert(FormField::District, "District is required".to_string());
    }

    if form.institution_short_name.trim().chars().count() < 2 {
        errors.insert(
            FormField::Institution,
            "Please select or enter an institution".to_string(),
        );
    }

    if form.class_id.is_empty() {
        errors.insert(FormField::Class, "Please select a class".to_string());
    }

    if !form.terms_accepted {
        errors.insert(
            FormField::Terms,
            "You must accept the terms and privacy policy".to_string(),
        );
    }

    errors
}

/// Whether the form validation passed.
pub fn is_form_valid(errors: &FormErrors) -> bool {
    errors.is_empty()
}
