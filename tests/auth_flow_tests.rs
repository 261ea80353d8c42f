// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Login wizard state machine tests.
//!
//! The wizard runs against a scripted gateway and an in-memory store, so
//! every transition and persistence rule is observable without HTTP.

use brritto_web::flow::{
    AuthFlow, AuthGateway, AuthStep, FlowOutcome, MemoryFlowStore, WizardStore,
};
use brritto_web::models::{
    LoginOutcome, ProfileUpdateRequest, RegistrationForm, SendOtpData, StudentProfile,
};
use brritto_web::services::ServiceResult;

/// Gateway with scripted outcomes.
struct MockGateway {
    send_otp: ServiceResult<SendOtpData>,
    verify: ServiceResult<LoginOutcome>,
    update: ServiceResult<StudentProfile>,
    logout: ServiceResult<()>,
}

impl Default for MockGateway {
    fn default() -> Self {
        Self {
            send_otp: ServiceResult::ok("OTP sent successfully", SendOtpData::default()),
            verify: ServiceResult::ok("Login successful", LoginOutcome::default()),
            update: ServiceResult::failure("unscripted"),
            logout: ServiceResult::ok_empty("Logged out"),
        }
    }
}

impl AuthGateway for MockGateway {
    async fn send_otp(&mut self, _mobile: &str) -> ServiceResult<SendOtpData> {
        self.send_otp.clone()
    }

    async fn verify_otp(&mut self, _mobile: &str, _otp: &str) -> ServiceResult<LoginOutcome> {
        self.verify.clone()
    }

    async fn update_profile(
        &mut self,
        _request: &ProfileUpdateRequest,
    ) -> ServiceResult<StudentProfile> {
        self.update.clone()
    }

    async fn logout(&mut self) -> ServiceResult<()> {
        self.logout.clone()
    }
}

fn profile(completed: bool) -> StudentProfile {
    StudentProfile {
        id: "student-1".to_string(),
        name: "Rahim Uddin".to_string(),
        mobile_number: "01812345678".to_string(),
        mobile_verified: true,
        image: None,
        profile_completed: completed,
        is_active: true,
        gender: None,
        address: None,
        institution: None,
        active_class: None,
    }
}

fn valid_registration() -> RegistrationForm {
    RegistrationForm {
        name: "Rahim Uddin".to_string(),
        district: "Dhaka".to_string(),
        institution_id: Some("inst-1".to_string()),
        institution_short_name: "DRMC".to_string(),
        class_id: "class-9".to_string(),
        class_name: "Class 9".to_string(),
        terms_accepted: true,
        ..RegistrationForm::default()
    }
}

/// Drive a fresh wizard through the phone step.
async fn advance_to_otp(
    gateway: MockGateway,
    redirect: Option<String>,
) -> AuthFlow<MockGateway, MemoryFlowStore> {
    let mut flow = AuthFlow::new(gateway, MemoryFlowStore::new(), redirect);
    flow.set_mobile("01812345678");
    assert_eq!(flow.submit_phone().await, FlowOutcome::Stay);
    assert_eq!(flow.step(), AuthStep::Otp);
    flow
}

// ─── Phone step ──────────────────────────────────────────────────

#[tokio::test]
async fn scenario_a_phone_submit_records_hint_and_advances() {
    let gateway = MockGateway {
        send_otp: ServiceResult::ok(
            "OTP sent successfully",
            SendOtpData {
                profile_completed: Some(false),
            },
        ),
        ..MockGateway::default()
    };

    let mut flow = AuthFlow::new(gateway, MemoryFlowStore::new(), None);
    flow.set_mobile("01812345678");
    let outcome = flow.submit_phone().await;

    assert_eq!(outcome, FlowOutcome::Stay);
    assert_eq!(flow.step(), AuthStep::Otp);
    assert!(flow.show_progress(), "new-user flow must show progress UI");
    assert!(!flow.is_loading());
}

#[tokio::test]
async fn invalid_phone_never_reaches_the_gateway() {
    let mut flow = AuthFlow::new(MockGateway::default(), MemoryFlowStore::new(), None);
    flow.set_mobile("0181234");
    let outcome = flow.submit_phone().await;

    assert_eq!(outcome, FlowOutcome::Stay);
    assert_eq!(flow.step(), AuthStep::Phone);
    let snapshot = flow.snapshot();
    assert!(!snapshot.errors.is_empty());
    assert!(flow.into_store().snapshot.is_none(), "nothing persisted");
}

#[tokio::test]
async fn failed_otp_dispatch_stays_on_phone_with_general_error() {
    let gateway = MockGateway {
        send_otp: ServiceResult::failure("Too many attempts"),
        ..MockGateway::default()
    };

    let mut flow = AuthFlow::new(gateway, MemoryFlowStore::new(), None);
    flow.set_mobile("01812345678");
    flow.submit_phone().await;

    assert_eq!(flow.step(), AuthStep::Phone);
    let snapshot = flow.snapshot();
    assert_eq!(
        snapshot.errors.values().next().map(String::as_str),
        Some("Too many attempts")
    );
}

#[tokio::test]
async fn returning_user_sees_no_progress_ui() {
    let gateway = MockGateway {
        send_otp: ServiceResult::ok(
            "OTP sent successfully",
            SendOtpData {
                profile_completed: Some(true),
            },
        ),
        ..MockGateway::default()
    };

    let flow = advance_to_otp(gateway, None).await;
    assert!(!flow.show_progress());
}

// ─── OTP step ────────────────────────────────────────────────────

#[tokio::test]
async fn scenario_b_completed_profile_exits_to_root() {
    let gateway = MockGateway {
        verify: ServiceResult::ok(
            "Login successful",
            LoginOutcome {
                profile: Some(profile(true)),
            },
        ),
        ..MockGateway::default()
    };

    let mut flow = advance_to_otp(gateway, None).await;
    flow.set_otp("123456");
    let outcome = flow.submit_otp().await;

    assert_eq!(
        outcome,
        FlowOutcome::Redirect {
            to: "/".to_string(),
            hard: false,
        }
    );

    // Wizard persistence is cleared on exit
    assert!(flow.into_store().snapshot.is_none());
}

#[tokio::test]
async fn completed_profile_exit_honors_safe_redirect() {
    let gateway = MockGateway {
        verify: ServiceResult::ok(
            "Login successful",
            LoginOutcome {
                profile: Some(profile(true)),
            },
        ),
        ..MockGateway::default()
    };

    let mut flow = advance_to_otp(gateway, Some("/courses/abc".to_string())).await;
    flow.set_otp("123456");

    assert_eq!(
        flow.submit_otp().await,
        FlowOutcome::Redirect {
            to: "/courses/abc".to_string(),
            hard: false,
        }
    );
}

#[tokio::test]
async fn external_redirect_target_falls_back_to_root() {
    let gateway = MockGateway {
        verify: ServiceResult::ok(
            "Login successful",
            LoginOutcome {
                profile: Some(profile(true)),
            },
        ),
        ..MockGateway::default()
    };

    for target in ["https://evil.example/", "//evil.example/x"] {
        let gateway = MockGateway {
            verify: gateway.verify.clone(),
            ..MockGateway::default()
        };
        let mut flow = advance_to_otp(gateway, Some(target.to_string())).await;
        flow.set_otp("123456");
        assert_eq!(
            flow.submit_otp().await,
            FlowOutcome::Redirect {
                to: "/".to_string(),
                hard: false,
            }
        );
    }
}

#[tokio::test]
async fn scenario_c_incomplete_profile_enters_registration_and_survives_reload() {
    let gateway = MockGateway {
        verify: ServiceResult::ok(
            "Login successful",
            LoginOutcome {
                profile: Some(profile(false)),
            },
        ),
        ..MockGateway::default()
    };

    let mut flow = advance_to_otp(gateway, None).await;
    flow.set_otp("123456");
    let outcome = flow.submit_otp().await;

    assert_eq!(outcome, FlowOutcome::Stay);
    assert_eq!(flow.step(), AuthStep::Registration);
    assert!(flow.show_progress());

    // Simulated page reload: a new wizard over the persisted store resumes
    // at the registration step, not at phone.
    let store = flow.into_store();
    let restored = AuthFlow::resume(MockGateway::default(), store, None);
    assert_eq!(restored.step(), AuthStep::Registration);
    assert_eq!(restored.snapshot().mobile, "01812345678");
}

#[tokio::test]
async fn fetched_profile_flag_wins_over_send_otp_hint() {
    // Hint said incomplete, but the fetched profile says completed: the
    // fresher signal wins and the user exits the wizard.
    let gateway = MockGateway {
        send_otp: ServiceResult::ok(
            "OTP sent successfully",
            SendOtpData {
                profile_completed: Some(false),
            },
        ),
        verify: ServiceResult::ok(
            "Login successful",
            LoginOutcome {
                profile: Some(profile(true)),
            },
        ),
        ..MockGateway::default()
    };

    let mut flow = advance_to_otp(gateway, None).await;
    flow.set_otp("123456");

    assert!(matches!(
        flow.submit_otp().await,
        FlowOutcome::Redirect { .. }
    ));
}

#[tokio::test]
async fn hint_decides_when_profile_fetch_failed() {
    // No profile in the verify outcome (fetch failed); the hint from the
    // phone step routes the user into registration.
    let gateway = MockGateway {
        send_otp: ServiceResult::ok(
            "OTP sent successfully",
            SendOtpData {
                profile_completed: Some(false),
            },
        ),
        verify: ServiceResult::ok("Login successful", LoginOutcome { profile: None }),
        ..MockGateway::default()
    };

    let mut flow = advance_to_otp(gateway, None).await;
    flow.set_otp("123456");

    assert_eq!(flow.submit_otp().await, FlowOutcome::Stay);
    assert_eq!(flow.step(), AuthStep::Registration);
}

#[tokio::test]
async fn short_otp_is_rejected_locally() {
    let mut flow = advance_to_otp(MockGateway::default(), None).await;
    flow.set_otp("123");

    assert_eq!(flow.submit_otp().await, FlowOutcome::Stay);
    assert_eq!(flow.step(), AuthStep::Otp);
    assert!(flow
        .snapshot()
        .errors
        .values()
        .any(|m| m.contains("6-digit")));
}

#[tokio::test]
async fn failed_verification_stays_on_otp() {
    let gateway = MockGateway {
        verify: ServiceResult::failure("The OTP you entered is incorrect"),
        ..MockGateway::default()
    };

    let mut flow = advance_to_otp(gateway, None).await;
    flow.set_otp("123456");

    assert_eq!(flow.submit_otp().await, FlowOutcome::Stay);
    assert_eq!(flow.step(), AuthStep::Otp);
    assert!(flow
        .snapshot()
        .errors
        .values()
        .any(|m| m.contains("incorrect")));
}

#[tokio::test]
async fn resend_clears_the_otp_and_stays() {
    let mut flow = advance_to_otp(MockGateway::default(), None).await;
    flow.set_otp("999999");

    assert_eq!(flow.resend_otp().await, FlowOutcome::Stay);
    assert_eq!(flow.step(), AuthStep::Otp);
    assert_eq!(flow.snapshot().success_message, "OTP resent successfully");
}

#[tokio::test]
async fn back_to_phone_resets_hint_and_messages() {
    let gateway = MockGateway {
        send_otp: ServiceResult::ok(
            "OTP sent successfully",
            SendOtpData {
                profile_completed: Some(false),
            },
        ),
        ..MockGateway::default()
    };

    let mut flow = advance_to_otp(gateway, None).await;
    assert!(flow.show_progress());

    flow.back_to_phone();

    assert_eq!(flow.step(), AuthStep::Phone);
    assert!(!flow.show_progress(), "hint must be reset");
    let snapshot = flow.snapshot();
    assert!(snapshot.errors.is_empty());
    assert!(snapshot.success_message.is_empty());
    // Phone number is kept in the form for convenience
    assert_eq!(snapshot.mobile, "01812345678");
}

// ─── Registration step ───────────────────────────────────────────

async fn advance_to_registration(gateway: MockGateway) -> AuthFlow<MockGateway, MemoryFlowStore> {
    let gateway = MockGateway {
        verify: ServiceResult::ok(
            "Login successful",
            LoginOutcome {
                profile: Some(profile(false)),
            },
        ),
        ..gateway
    };

    let mut flow = advance_to_otp(gateway, None).await;
    flow.set_otp("123456");
    assert_eq!(flow.submit_otp().await, FlowOutcome::Stay);
    assert_eq!(flow.step(), AuthStep::Registration);
    flow
}

#[tokio::test]
async fn registration_submit_exits_with_hard_redirect_and_clears_wizard() {
    let gateway = MockGateway {
        update: ServiceResult::ok("Profile updated successfully", profile(true)),
        ..MockGateway::default()
    };

    let mut flow = advance_to_registration(gateway).await;
    flow.set_registration_form(valid_registration());
    let outcome = flow.submit_registration().await;

    assert_eq!(
        outcome,
        FlowOutcome::Redirect {
            to: "/".to_string(),
            hard: true,
        }
    );

    let store = flow.into_store();
    assert!(store.snapshot.is_none(), "wizard persistence cleared");
    assert_eq!(
        store.cached_profile.map(|p| p.name),
        Some("Rahim Uddin".to_string())
    );
}

#[tokio::test]
async fn registration_caches_form_name_when_backend_returns_no_profile() {
    let gateway = MockGateway {
        update: ServiceResult {
            success: true,
            message: "Profile updated successfully".to_string(),
            data: None,
        },
        ..MockGateway::default()
    };

    let mut flow = advance_to_registration(gateway).await;
    let mut form = valid_registration();
    form.name = "Karima Akter".to_string();
    flow.set_registration_form(form);

    assert!(matches!(
        flow.submit_registration().await,
        FlowOutcome::Redirect { hard: true, .. }
    ));
    assert_eq!(
        flow.into_store().cached_profile.map(|p| p.name),
        Some("Karima Akter".to_string())
    );
}

#[tokio::test]
async fn invalid_registration_form_reports_field_errors_and_stays() {
    let mut flow = advance_to_registration(MockGateway::default()).await;
    flow.set_registration_form(RegistrationForm::default());

    assert_eq!(flow.submit_registration().await, FlowOutcome::Stay);
    assert_eq!(flow.step(), AuthStep::Registration);

    let snapshot = flow.snapshot();
    assert!(snapshot.errors.len() >= 4, "all failing fields reported");

    // Registration stays persisted: a reload still lands here
    let restored = AuthFlow::resume(MockGateway::default(), flow.into_store(), None);
    assert_eq!(restored.step(), AuthStep::Registration);
}

#[tokio::test]
async fn scenario_d_back_navigation_is_neutralized_on_registration() {
    let mut flow = advance_to_registration(MockGateway::default()).await;

    assert!(flow.back_navigation_locked());
    assert!(flow.handle_back_navigation(), "event must be neutralized");
    assert_eq!(flow.step(), AuthStep::Registration, "step unchanged");

    // And the explicit phone-step back action does nothing here either
    flow.back_to_phone();
    assert_eq!(flow.step(), AuthStep::Registration);
}

#[tokio::test]
async fn back_navigation_is_not_locked_before_registration() {
    let mut flow = AuthFlow::new(MockGateway::default(), MemoryFlowStore::new(), None);
    assert!(!flow.back_navigation_locked());
    assert!(!flow.handle_back_navigation());
    assert_eq!(flow.step(), AuthStep::Phone);
}

// ─── Logout ──────────────────────────────────────────────────────

#[tokio::test]
async fn logout_from_registration_resets_everything() {
    let mut flow = advance_to_registration(MockGateway::default()).await;
    flow.set_registration_form(valid_registration());

    assert_eq!(flow.logout().await, FlowOutcome::Stay);
    assert_eq!(flow.step(), AuthStep::Phone);

    let snapshot = flow.snapshot();
    assert!(snapshot.mobile.is_empty(), "form reset");
    assert!(snapshot.errors.is_empty());
    assert!(!snapshot.show_progress);
    assert!(flow.into_store().snapshot.is_none(), "persistence cleared");
}

#[tokio::test]
async fn logout_succeeds_locally_even_when_backend_call_fails() {
    let gateway = MockGateway {
        logout: ServiceResult::failure("backend unreachable"),
        ..MockGateway::default()
    };

    let mut flow = advance_to_registration(gateway).await;
    flow.logout().await;

    assert_eq!(flow.step(), AuthStep::Phone);
    assert!(flow.into_store().snapshot.is_none());
}

// ─── Persistence details ─────────────────────────────────────────

#[tokio::test]
async fn otp_code_is_never_persisted() {
    let mut flow = advance_to_otp(MockGateway::default(), None).await;
    flow.set_otp("123456");

    let store = flow.into_store();
    let saved = store.load().expect("otp step snapshot saved");
    assert_eq!(saved.step, AuthStep::Otp);
    assert_eq!(saved.mobile, "01812345678");
    assert!(!serde_json::to_string(&saved).unwrap().contains("123456"));
}
