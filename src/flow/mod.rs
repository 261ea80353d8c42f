// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! The login wizard state machine: phone → OTP → registration.
//!
//! The machine only moves forward through successful service calls; it resets
//! to the phone step on explicit back-navigation or logout. The registration
//! step is sticky: once entered it survives a reload (restored from the
//! wizard store) and cannot be left through browser back-navigation, only
//! through logout or a successful submission.
//!
//! Dependencies are injected as traits so the machine is testable without an
//! HTTP or cookie environment: [`AuthGateway`] for the service calls,
//! [`WizardStore`] for the reload-surviving snapshot, and [`ProfileCache`]
//! for the advisory client-side profile mirror.

pub mod stores;

use serde::Serialize;
#[cfg(feature = "binding-generation")]
use ts_rs::TS;

pub use stores::{
    CookieFlowStore, MemoryFlowStore, ProfileCache, WizardSnapshot, WizardStore,
};

use crate::models::{
    CachedProfile, LoginOutcome, ProfileUpdateRequest, RegistrationForm, SendOtpData,
    StudentProfile,
};
use crate::services::ServiceResult;
use crate::validators::{
    is_form_valid, is_valid_bd_phone, validate_otp, validate_phone, validate_registration_form,
    FormErrors, FormField,
};

/// Service calls the wizard depends on.
///
/// The production implementation wraps the auth/student services together
/// with the request's session store; tests script the outcomes directly.
#[allow(async_fn_in_trait)]
pub trait AuthGateway {
    async fn send_otp(&mut self, mobile: &str) -> ServiceResult<SendOtpData>;
    async fn verify_otp(&mut self, mobile: &str, otp: &str) -> ServiceResult<LoginOutcome>;
    async fn update_profile(
        &mut self,
        request: &ProfileUpdateRequest,
    ) -> ServiceResult<StudentProfile>;
    async fn logout(&mut self) -> ServiceResult<()>;
}

/// Wizard step identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, serde::Deserialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
#[serde(rename_all = "lowercase")]
pub enum AuthStep {
    Phone,
    Otp,
    Registration,
}

/// Step state with exactly the form data reachable at that step, so
/// registration fields cannot exist before the registration step.
#[derive(Debug, Clone)]
pub enum StepState {
    Phone {
        mobile: String,
    },
    Otp {
        mobile: String,
        otp: String,
    },
    Registration {
        mobile: String,
        form: RegistrationForm,
    },
}

impl StepState {
    pub fn step(&self) -> AuthStep {
        match self {
            StepState::Phone { .. } => AuthStep::Phone,
            StepState::Otp { .. } => AuthStep::Otp,
            StepState::Registration { .. } => AuthStep::Registration,
        }
    }

    pub fn mobile(&self) -> &str {
        match self {
            StepState::Phone { mobile }
            | StepState::Otp { mobile, .. }
            | StepState::Registration { mobile, .. } => mobile,
        }
    }
}

/// Header/progress copy for a step.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
#[serde(rename_all = "camelCase")]
pub struct StepInfo {
    pub title: &'static str,
    pub subtitle: &'static str,
    pub index: u8,
}

/// Step copy for the auth header and progress bar.
pub fn step_info(step: AuthStep) -> StepInfo {
    match step {
        AuthStep::Phone => StepInfo {
            title: "Welcome",
            subtitle: "Enter your phone number to continue",
            index: 0,
        },
        AuthStep::Otp => StepInfo {
            title: "Verify OTP",
            subtitle: "Enter the OTP sent to your phone",
            index: 1,
        },
        AuthStep::Registration => StepInfo {
            title: "Complete Profile",
            subtitle: "Fill in your details to finish registration",
            index: 2,
        },
    }
}

/// How an action left the wizard.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FlowOutcome {
    /// Stay in the wizard (the snapshot tells the UI what changed)
    Stay,
    /// Leave the wizard for `to`; `hard` requests a full page load so
    /// profile-reading UI re-initializes
    Redirect { to: String, hard: bool },
}

/// Serializable view of the wizard for rendering.
#[derive(Debug, Clone, Serialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
#[serde(rename_all = "camelCase")]
pub struct FlowSnapshot {
    pub step: AuthStep,
    pub step_info: StepInfo,
    pub mobile: String,
    pub profile_completed: Option<bool>,
    #[cfg_attr(feature = "binding-generation", ts(type = "Record<string, string>"))]
    pub errors: FormErrors,
    pub success_message: String,
    pub is_loading: bool,
    pub is_valid_phone: bool,
    pub show_progress: bool,
}

/// The wizard itself.
pub struct AuthFlow<G, S> {
    gateway: G,
    store: S,
    redirect_url: Option<String>,
    step: StepState,
    /// Profile-completed hint captured from the OTP dispatch; the flag on a
    /// freshly fetched profile always takes precedence over it
    profile_completed: Option<bool>,
    errors: FormErrors,
    success_message: String,
    is_loading: bool,
}

impl<G, S> AuthFlow<G, S>
where
    G: AuthGateway,
    S: WizardStore + ProfileCache,
{
    /// Start a fresh wizard at the phone step.
    pub fn new(gateway: G, store: S, redirect_url: Option<String>) -> Self {
        Self {
            gateway,
            store,
            redirect_url,
            step: StepState::Phone {
                mobile: String::new(),
            },
            profile_completed: None,
            errors: FormErrors::new(),
            success_message: String::new(),
            is_loading: false,
        }
    }

    /// Start the wizard, restoring a persisted snapshot if one exists.
    ///
    /// This is what makes the registration step survive a page reload.
    pub fn resume(gateway: G, store: S, redirect_url: Option<String>) -> Self {
        let mut flow = Self::new(gateway, store, redirect_url);

        if let Some(snapshot) = flow.store.load() {
            flow.profile_completed = snapshot.profile_completed;
            flow.step = match snapshot.step {
                AuthStep::Phone => StepState::Phone {
                    mobile: snapshot.mobile,
                },
                AuthStep::Otp => StepState::Otp {
                    mobile: snapshot.mobile,
                    otp: String::new(),
                },
                AuthStep::Registration => StepState::Registration {
                    mobile: snapshot.mobile,
                    form: RegistrationForm::default(),
                },
            };
        }

        flow
    }

    /// Recover the injected store (and its pending mutations).
    pub fn into_store(self) -> S {
        self.store
    }

    // ─── Form data ───────────────────────────────────────────────

    /// Set the phone number; only meaningful on the phone step.
    pub fn set_mobile(&mut self, mobile: impl Into<String>) {
        if let StepState::Phone { mobile: current } = &mut self.step {
            *current = mobile.into();
        }
    }

    /// Set the OTP entry; only meaningful on the OTP step.
    pub fn set_otp(&mut self, otp: impl Into<String>) {
        if let StepState::Otp { otp: current, .. } = &mut self.step {
            *current = otp.into();
        }
    }

    /// Replace the registration form; only meaningful on that step.
    pub fn set_registration_form(&mut self, form: RegistrationForm) {
        if let StepState::Registration { form: current, .. } = &mut self.step {
            *current = form;
        }
    }

    // ─── Actions ─────────────────────────────────────────────────

    /// Phone step submission: validate, dispatch the OTP, advance.
    pub async fn submit_phone(&mut self) -> FlowOutcome {
        let StepState::Phone { mobile } = &self.step else {
            return FlowOutcome::Stay;
        };
        let mobile = mobile.clone();

        let check = validate_phone(&mobile);
        if !check.is_valid {
            self.errors = field_error(FormField::Mobile, check.error);
            return FlowOutcome::Stay;
        }

        self.begin_request();
        let result = self.gateway.send_otp(&mobile).await;
        self.is_loading = false;

        if result.success {
            self.success_message = result.message;
            self.profile_completed = result.data.and_then(|d| d.profile_completed);
            self.step = StepState::Otp {
                mobile,
                otp: String::new(),
            };
            self.persist();
        } else {
            self.errors = field_error(FormField::General, Some(result.message));
        }

        FlowOutcome::Stay
    }

    /// OTP step submission: validate, verify, then either finish the login
    /// or fall into the registration step.
    pub async fn submit_otp(&mut self) -> FlowOutcome {
        let StepState::Otp { mobile, otp } = &self.step else {
            return FlowOutcome::Stay;
        };
        let (mobile, otp) = (mobile.clone(), otp.clone());

        let check = validate_otp(&otp);
        if !check.is_valid {
            self.errors = field_error(FormField::Otp, check.error);
            return FlowOutcome::Stay;
        }

        self.begin_request();
        let result = self.gateway.verify_otp(&mobile, &otp).await;
        self.is_loading = false;

        if !result.success {
            self.errors = field_error(FormField::General, Some(result.message));
            return FlowOutcome::Stay;
        }

        let outcome = result.data.unwrap_or_default();
        if let Some(profile) = &outcome.profile {
            self.store.store_profile(&CachedProfile::from(profile));
        }

        // Precedence rule: the flag on the freshly fetched profile wins;
        // the hint from the OTP dispatch only fills in when the fetch failed.
        let resolved = outcome
            .profile
            .as_ref()
            .map(|p| p.profile_completed)
            .or(self.profile_completed);

        if resolved == Some(false) {
            self.success_message = "OTP verified! Please complete your profile.".to_string();
            self.profile_completed = Some(false);
            self.step = StepState::Registration {
                mobile,
                form: RegistrationForm::default(),
            };
            self.persist();
            FlowOutcome::Stay
        } else {
            self.success_message = result.message;
            self.store.clear();
            FlowOutcome::Redirect {
                to: sanitize_redirect(self.redirect_url.as_deref()),
                hard: false,
            }
        }
    }

    /// Registration step submission: validate the whole form, update the
    /// profile, cache the display name, and leave with a hard redirect.
    pub async fn submit_registration(&mut self) -> FlowOutcome {
        let StepState::Registration { form, .. } = &self.step else {
            return FlowOutcome::Stay;
        };

        let form_errors = validate_registration_form(form);
        if !is_form_valid(&form_errors) {
            self.errors = form_errors;
            return FlowOutcome::Stay;
        }
        let request = ProfileUpdateRequest::from(form);
        let fallback_name = form.name.clone();

        self.begin_request();
        let result = self.gateway.update_profile(&request).await;
        self.is_loading = false;

        if !result.success {
            self.errors = field_error(FormField::General, Some(result.message));
            return FlowOutcome::Stay;
        }

        // Cache at least the name so the header can greet the user after the
        // reload, even when the backend response carried no profile body.
        let cached = match &result.data {
            Some(profile) => CachedProfile::from(profile),
            None => CachedProfile {
                name: fallback_name,
            },
        };
        self.store.store_profile(&cached);

        self.success_message = "Profile completed successfully!".to_string();
        self.store.clear();

        FlowOutcome::Redirect {
            to: sanitize_redirect(self.redirect_url.as_deref()),
            hard: true,
        }
    }

    /// Resend the OTP; the step never changes, only the messages do.
    pub async fn resend_otp(&mut self) -> FlowOutcome {
        let StepState::Otp { mobile, otp } = &mut self.step else {
            return FlowOutcome::Stay;
        };
        otp.clear();
        let mobile = mobile.clone();

        self.begin_request();
        let result = self.gateway.send_otp(&mobile).await;
        self.is_loading = false;

        if result.success {
            self.success_message = "OTP resent successfully".to_string();
        } else {
            self.errors = field_error(FormField::General, Some(result.message));
        }

        FlowOutcome::Stay
    }

    /// Back from the OTP step to the phone step. Clears the OTP entry, the
    /// messages, and the captured profile-completed hint.
    pub fn back_to_phone(&mut self) {
        let StepState::Otp { mobile, .. } = &self.step else {
            return;
        };

        self.step = StepState::Phone {
            mobile: mobile.clone(),
        };
        self.profile_completed = None;
        self.errors.clear();
        self.success_message.clear();
        self.store.clear();
    }

    /// Log out from any step: backend call is best-effort, local state always
    /// resets to a fresh phone step.
    pub async fn logout(&mut self) -> FlowOutcome {
        self.is_loading = true;
        let result = self.gateway.logout().await;
        self.is_loading = false;

        if !result.success {
            tracing::warn!(message = %result.message, "Logout service call failed");
        }

        self.store.clear();
        self.step = StepState::Phone {
            mobile: String::new(),
        };
        self.profile_completed = None;
        self.errors.clear();
        self.success_message.clear();

        FlowOutcome::Stay
    }

    /// Browser back-navigation. On the registration step the event is
    /// neutralized (the caller must re-push the current URL); the step never
    /// changes. Returns whether the event was neutralized.
    pub fn handle_back_navigation(&mut self) -> bool {
        self.back_navigation_locked()
    }

    /// Whether back-navigation is currently locked.
    pub fn back_navigation_locked(&self) -> bool {
        matches!(self.step, StepState::Registration { .. })
    }

    // ─── Derived values ──────────────────────────────────────────

    pub fn step(&self) -> AuthStep {
        self.step.step()
    }

    pub fn is_loading(&self) -> bool {
        self.is_loading
    }

    /// The multi-step progress UI is only shown to new users: profile known
    /// to be incomplete, or already on the registration step.
    pub fn show_progress(&self) -> bool {
        self.profile_completed == Some(false)
            || matches!(self.step, StepState::Registration { .. })
    }

    /// Current state for rendering.
    pub fn snapshot(&self) -> FlowSnapshot {
        FlowSnapshot {
            step: self.step.step(),
            step_info: step_info(self.step.step()),
            mobile: self.step.mobile().to_string(),
            profile_completed: self.profile_completed,
            errors: self.errors.clone(),
            success_message: self.success_message.clone(),
            is_loading: self.is_loading,
            is_valid_phone: is_valid_bd_phone(self.step.mobile()),
            show_progress: self.show_progress(),
        }
    }

    // ─── Internals ───────────────────────────────────────────────

    fn begin_request(&mut self) {
        self.is_loading = true;
        self.errors.clear();
        self.success_message.clear();
    }

    /// Save the wizard snapshot so a reload resumes at the current step.
    /// The OTP code itself is never persisted.
    fn persist(&mut self) {
        self.store.save(&WizardSnapshot {
            step: self.step.step(),
            mobile: self.step.mobile().to_string(),
            profile_completed: self.profile_completed,
        });
    }
}

/// Only same-origin relative paths may be redirect targets; everything else
/// (absolute URLs, protocol-relative `//host` paths) falls back to `/`.
pub fn sanitize_redirect(redirect_url: Option<&str>) -> String {
    match redirect_url {
        Some(path) if path.starts_with('/') && !path.starts_with("//") => path.to_string(),
        _ => "/".to_string(),
    }
}

fn field_error(field: FormField, message: Option<String>) -> FormErrors {
    let mut errors = FormErrors::new();
    if let Some(message) = message {
        errors.insert(field, message);
    }
    errors
}
