//! Authentication and student-profile models.

use serde::{Deserialize, Serialize};

/// Server-held session, serialized into the HTTP-only cookie.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthSession {
    pub access_token: String,
    pub refresh_token: String,
    /// Canonical BD mobile number the session was created for
    pub mobile: String,
    /// Expiry as epoch milliseconds
    pub expires_at: i64,
    /// Tri-state: absent means the backend never told us
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub profile_completed: Option<bool>,
}

/// Data returned by the OTP-dispatch endpoint.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SendOtpData {
    /// Hint whether this phone number already has a completed profile
    pub profile_completed: Option<bool>,
}

/// Tokens returned by the login endpoint.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginData {
    pub access_token: String,
    pub refresh_token: String,
}

/// Tokens returned by the refresh endpoint.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RefreshTokenData {
    pub access_token: String,
    pub refresh_token: String,
}

/// Result of a successful OTP verification.
///
/// The profile is present when the post-login fetch succeeded; its absence
/// means the profile-completed signal was degraded to `false` at session
/// creation.
#[derive(Debug, Clone, Default, Serialize)]
pub struct LoginOutcome {
    pub profile: Option<StudentProfile>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum Gender {
    #[default]
    Male,
    Female,
    Other,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct StudentAddress {
    pub district: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct StudentInstitution {
    #[serde(rename = "_id")]
    pub id: String,
    pub institution_short_name: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct StudentActiveClass {
    #[serde(rename = "_id")]
    pub id: String,
    pub name: String,
}

/// Student profile as returned by the backend.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StudentProfile {
    #[serde(rename = "_id")]
    pub id: String,
    pub name: String,
    pub mobile_number: String,
    #[serde(default)]
    pub mobile_verified: bool,
    #[serde(default)]
    pub image: Option<String>,
    #[serde(default)]
    pub profile_completed: bool,
    #[serde(default)]
    pub is_active: bool,
    #[serde(default)]
    pub gender: Option<Gender>,
    #[serde(default)]
    pub address: Option<StudentAddress>,
    #[serde(default)]
    pub institution: Option<StudentInstitution>,
    #[serde(default)]
    pub active_class: Option<StudentActiveClass>,
}

/// Denormalized profile mirror cached client-side for immediate UI rendering.
/// Advisory only; never a security boundary.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CachedProfile {
    pub name: String,
}

impl From<&StudentProfile> for CachedProfile {
    fn from(profile: &StudentProfile) -> Self {
        Self {
            name: profile.name.clone(),
        }
    }
}

/// Registration form, submitted as a whole on the final wizard step.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct RegistrationForm {
    pub name: String,
    /// Optional; only format-checked when non-empty
    pub email: String,
    pub gender: Gender,
    pub district: String,
    /// Backend id of the selected institution; `None` for free-text entries
    pub institution_id: Option<String>,
    pub institution_short_name: String,
    pub class_id: String,
    pub class_name: String,
    pub terms_accepted: bool,
}

/// Wire payload for the profile-update endpoint.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProfileUpdateRequest {
    pub name: String,
    pub gender: Gender,
    pub address: AddressPayload,
    pub institution: InstitutionPayload,
    pub class: ClassPayload,
    pub cls: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct AddressPayload {
    pub district: String,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct InstitutionPayload {
    #[serde(rename = "_id")]
    pub id: Option<String>,
    pub institution_short_name: String,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ClassPayload {
    #[serde(rename = "_id")]
    pub id: String,
    pub class_name: String,
}

impl From<&RegistrationForm> for ProfileUpdateRequest {
    fn from(form: &RegistrationForm) -> Self {
        Self {
            name: form.name.clone(),
            gender: form.gender,
            address: AddressPayload {
                district: form.district.clone(),
            },
            institution: InstitutionPayload {
                id: form.institution_id.clone(),
                institution_short_name: form.institution_short_name.clone(),
            },
            class: ClassPayload {
                id: form.class_id.clone(),
                class_name: form.class_name.clone(),
            },
            cls: form.class_name.clone(),
        }
    }
}
