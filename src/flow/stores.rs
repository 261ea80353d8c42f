// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Client-visible persistence for the login wizard.
//!
//! Two concerns live here, both deliberately *not* HTTP-only because they are
//! UI conveniences and never a security boundary:
//! - the wizard snapshot, scoped to the browser session, which lets a reload
//!   resume at the saved step;
//! - the advisory profile mirror (display name) the header reads right after
//!   registration, kept for up to a year like the local storage it replaces.

use std::mem;

use axum_extra::extract::cookie::{Cookie, CookieJar, SameSite};
use serde::{Deserialize, Serialize};

use crate::flow::AuthStep;
use crate::models::CachedProfile;

/// Cookie holding the wizard snapshot (session-scoped).
pub const WIZARD_COOKIE: &str = "brritto_auth_flow";
/// Cookie holding the advisory profile mirror.
pub const PROFILE_COOKIE: &str = "brritto_profile";

const PROFILE_MAX_AGE_DAYS: i64 = 365;

/// Persisted wizard progress. Deliberately excludes the OTP code.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WizardSnapshot {
    pub step: AuthStep,
    pub mobile: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub profile_completed: Option<bool>,
}

/// Reload-surviving storage for the wizard snapshot.
pub trait WizardStore {
    fn load(&self) -> Option<WizardSnapshot>;
    fn save(&mut self, snapshot: &WizardSnapshot);
    fn clear(&mut self);
}

/// Advisory client-side cache of the profile display data.
pub trait ProfileCache {
    fn store_profile(&mut self, profile: &CachedProfile);
}

/// Cookie-backed implementation of both stores.
pub struct CookieFlowStore {
    jar: CookieJar,
    secure: bool,
}

impl CookieFlowStore {
    pub fn new(jar: CookieJar, secure: bool) -> Self {
        Self { jar, secure }
    }

    /// Hand the jar back for inclusion in the response.
    pub fn into_jar(self) -> CookieJar {
        self.jar
    }

    fn set(&mut self, name: &'static str, value: String, max_age: Option<time::Duration>) {
        let mut builder = Cookie::build((name, value))
            .path("/")
            .secure(self.secure)
            .same_site(SameSite::Lax);
        if let Some(max_age) = max_age {
            builder = builder.max_age(max_age);
        }

        self.jar = mem::take(&mut self.jar).add(builder.build());
    }

    fn remove(&mut self, name: &'static str) {
        let removal = Cookie::build((name, "")).path("/").build();
        self.jar = mem::take(&mut self.jar).remove(removal);
    }
}

impl WizardStore for CookieFlowStore {
    fn load(&self) -> Option<WizardSnapshot> {
        let raw = self.jar.get(WIZARD_COOKIE)?;
        match serde_json::from_str(raw.value()) {
            Ok(snapshot) => Some(snapshot),
            Err(err) => {
                tracing::debug!(error = %err, "Ignoring unreadable wizard cookie");
                None
            }
        }
    }

    fn save(&mut self, snapshot: &WizardSnapshot) {
        match serde_json::to_string(snapshot) {
            // Session-scoped: no Max-Age, the browser drops it on close
            Ok(value) => self.set(WIZARD_COOKIE, value, None),
            Err(err) => tracing::error!(error = %err, "Failed to serialize wizard snapshot"),
        }
    }

    fn clear(&mut self) {
        self.remove(WIZARD_COOKIE);
    }
}

impl ProfileCache for CookieFlowStore {
    fn store_profile(&mut self, profile: &CachedProfile) {
        match serde_json::to_string(profile) {
            Ok(value) => self.set(
                PROFILE_COOKIE,
                value,
                Some(time::Duration::days(PROFILE_MAX_AGE_DAYS)),
            ),
            Err(err) => tracing::error!(error = %err, "Failed to serialize profile mirror"),
        }
    }
}

/// In-memory implementation for tests.
#[derive(Debug, Default)]
pub struct MemoryFlowStore {
    pub snapshot: Option<WizardSnapshot>,
    pub cached_profile: Option<CachedProfile>,
}

impl MemoryFlowStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl WizardStore for MemoryFlowStore {
    fn load(&self) -> Option<WizardSnapshot> {
        self.snapshot.clone()
    }

    fn save(&mut self, snapshot: &WizardSnapshot) {
        self.snapshot = Some(snapshot.clone());
    }

    fn clear(&mut self) {
        self.snapshot = None;
    }
}

impl ProfileCache for MemoryFlowStore {
    fn store_profile(&mut self, profile: &CachedProfile) {
        self.cached_profile = Some(profile.clone());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_snapshot_round_trip_through_memory_store() {
        let mut store = MemoryFlowStore::new();
        let snapshot = WizardSnapshot {
            step: AuthStep::Registration,
            mobile: "01812345678".to_string(),
            profile_completed: Some(false),
        };

        store.save(&snapshot);
        assert_eq!(store.load(), Some(snapshot));

        store.clear();
        assert!(store.load().is_none());
    }

    #[test]
    fn test_snapshot_wire_format() {
        let snapshot = WizardSnapshot {
            step: AuthStep::Otp,
            mobile: "01812345678".to_string(),
            profile_completed: None,
        };

        let json = serde_json::to_string(&snapshot).unwrap();
        assert_eq!(json, r#"{"step":"otp","mobile":"01812345678"}"#);
    }
}
