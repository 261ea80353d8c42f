// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Session management over an HTTP-only cookie.
//!
//! Tokens live only in the cookie; client-side script never sees them. The
//! [`SessionStore`] trait keeps services and the login flow testable without
//! a real cookie jar: implementations only provide raw string storage, the
//! serialization and expiry rules live in the provided methods.

use std::mem;

use axum_extra::extract::cookie::{Cookie, CookieJar, SameSite};

use crate::config::Config;
use crate::models::AuthSession;
use crate::time_utils::{expiry_from_now, now_epoch_millis};

/// Repository for the authenticated session.
///
/// Implementations supply the raw cookie-value slot (`read_raw`, `write_raw`,
/// `clear_raw`) and the configured max-age; everything else is derived.
pub trait SessionStore {
    fn read_raw(&self) -> Option<String>;
    fn write_raw(&mut self, value: String);
    fn clear_raw(&mut self);
    fn max_age_secs(&self) -> i64;

    /// Create (or overwrite) the session.
    fn create_session(
        &mut self,
        access_token: &str,
        refresh_token: &str,
        mobile: &str,
        profile_completed: Option<bool>,
    ) {
        let session = AuthSession {
            access_token: access_token.to_string(),
            refresh_token: refresh_token.to_string(),
            mobile: mobile.to_string(),
            expires_at: expiry_from_now(self.max_age_secs()),
            profile_completed,
        };

        match serde_json::to_string(&session) {
            Ok(value) => self.write_raw(value),
            Err(err) => {
                // Serialization of a plain struct cannot realistically fail;
                // if it somehow does, leave no half-written session behind.
                tracing::error!(error = %err, "Failed to serialize session");
                self.clear_raw();
            }
        }
    }

    /// Read the current session.
    ///
    /// Corrupt or expired values are cleared and reported as no session;
    /// the caller never sees an error.
    fn get_session(&mut self) -> Option<AuthSession> {
        let raw = self.read_raw()?;

        match serde_json::from_str::<AuthSession>(&raw) {
            Ok(session) if session.expires_at > now_epoch_millis() => Some(session),
            Ok(_) => {
                tracing::debug!("Session expired, clearing cookie");
                self.clear_raw();
                None
            }
            Err(err) => {
                tracing::warn!(error = %err, "Corrupt session cookie, clearing");
                self.clear_raw();
                None
            }
        }
    }

    /// Remove the session.
    fn delete_session(&mut self) {
        self.clear_raw();
    }

    /// Replace the tokens, preserving the phone number of the existing
    /// session. Returns `false` when there is no session to update.
    fn update_session(&mut self, access_token: &str, refresh_token: &str) -> bool {
        let Some(session) = self.get_session() else {
            tracing::warn!("Failed to update session: no active session found");
            return false;
        };

        self.create_session(access_token, refresh_token, &session.mobile, None);
        true
    }

    fn is_authenticated(&mut self) -> bool {
        self.get_session().is_some()
    }
}

/// Session store over the request's cookie jar.
///
/// Mutations are collected in the jar; handlers return it so the deltas are
/// applied to the response.
pub struct CookieSessionStore {
    jar: CookieJar,
    name: String,
    max_age_secs: i64,
    secure: bool,
}

impl CookieSessionStore {
    pub fn new(jar: CookieJar, config: &Config) -> Self {
        Self {
            jar,
            name: config.session_cookie_name.clone(),
            max_age_secs: config.session_max_age,
            secure: config.cookie_secure(),
        }
    }

    /// Hand the jar back for inclusion in the response.
    pub fn into_jar(self) -> CookieJar {
        self.jar
    }
}

impl SessionStore for CookieSessionStore {
    fn read_raw(&self) -> Option<String> {
        self.jar.get(&self.name).map(|c| c.value().to_string())
    }

    fn write_raw(&mut self, value: String) {
        let cookie = Cookie::build((self.name.clone(), value))
            .path("/")
            .http_only(true)
            .secure(self.secure)
            .same_site(SameSite::Lax)
            .max_age(time::Duration::seconds(self.max_age_secs))
            .build();

        self.jar = mem::take(&mut self.jar).add(cookie);
    }

    fn clear_raw(&mut self) {
        let removal = Cookie::build((self.name.clone(), "")).path("/").build();
        self.jar = mem::take(&mut self.jar).remove(removal);
    }

    fn max_age_secs(&self) -> i64 {
        self.max_age_secs
    }
}

/// In-memory session store mirroring the cookie semantics, for tests.
#[derive(Debug)]
pub struct MemorySessionStore {
    value: Option<String>,
    max_age_secs: i64,
}

impl Default for MemorySessionStore {
    fn default() -> Self {
        Self::new()
    }
}

impl MemorySessionStore {
    pub fn new() -> Self {
        Self {
            value: None,
            max_age_secs: 86400,
        }
    }

    /// Inject a raw cookie value (corrupt or hand-built) for tests.
    pub fn set_raw(&mut self, value: impl Into<String>) {
        self.value = Some(value.into());
    }
}

impl SessionStore for MemorySessionStore {
    fn read_raw(&self) -> Option<String> {
        self.value.clone()
    }

    fn write_raw(&mut self, value: String) {
        self.value = Some(value);
    }

    fn clear_raw(&mut self) {
        self.value = None;
    }

    fn max_age_secs(&self) -> i64 {
        self.max_age_secs
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_session_round_trip() {
        let mut store = MemorySessionStore::new();
        store.create_session("access-1", "refresh-1", "01812345678", Some(false));

        let session = store.get_session().expect("session should exist");
        assert_eq!(session.access_token, "access-1");
        assert_eq!(session.refresh_token, "refresh-1");
        assert_eq!(session.mobile, "01812345678");
        assert_eq!(session.profile_completed, Some(false));
        assert!(session.expires_at > now_epoch_millis());
    }

    #[test]
    fn test_expired_session_is_cleared_idempotently() {
        let mut store = MemorySessionStore::new();
        let expired = AuthSession {
            access_token: "access".to_string(),
            refresh_token: "refresh".to_string(),
            mobile: "01812345678".to_string(),
            expires_at: now_epoch_millis() - 1000,
            profile_completed: None,
        };
        store.set_raw(serde_json::to_string(&expired).unwrap());

        assert!(store.get_session().is_none());
        // First read deleted the cookie; the slot stays empty
        assert!(store.read_raw().is_none());
        assert!(store.get_session().is_none());
    }

    #[test]
    fn test_corrupt_session_is_cleared() {
        let mut store = MemorySessionStore::new();
        store.set_raw("{not json");

        assert!(store.get_session().is_none());
        assert!(store.read_raw().is_none());
    }

    #[test]
    fn test_update_session_preserves_mobile() {
        let mut store = MemorySessionStore::new();
        store.create_session("old-access", "old-refresh", "01912345678", Some(true));

        assert!(store.update_session("new-access", "new-refresh"));

        let session = store.get_session().unwrap();
        assert_eq!(session.access_token, "new-access");
        assert_eq!(session.refresh_token, "new-refresh");
        assert_eq!(session.mobile, "01912345678");
    }

    #[test]
    fn test_update_without_session_fails() {
        let mut store = MemorySessionStore::new();
        assert!(!store.update_session("access", "refresh"));
        assert!(!store.is_authenticated());
    }

    #[test]
    fn test_create_overwrites_existing_session() {
        let mut store = MemorySessionStore::new();
        store.create_session("a1", "r1", "01812345678", None);
        store.create_session("a2", "r2", "01712345678", Some(true));

        let session = store.get_session().unwrap();
        assert_eq!(session.access_token, "a2");
        assert_eq!(session.mobile, "01712345678");
    }
}
