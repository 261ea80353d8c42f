//! Course catalog and registration lookup models.

use serde::{Deserialize, Serialize};
#[cfg(feature = "binding-generation")]
use ts_rs::TS;

/// A class (grade level) with its course count, from `/web/classes`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
#[serde(rename_all = "camelCase")]
pub struct ClassInfo {
    #[serde(rename = "_id")]
    pub id: String,
    pub class_name: String,
    #[serde(default)]
    pub priority: i32,
    #[serde(default)]
    pub course_count: u32,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct CourseClassRef {
    #[serde(rename = "_id")]
    pub id: String,
    pub class_name: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct CourseCategoryRef {
    #[serde(rename = "_id")]
    pub id: String,
    pub category_short_name: String,
}

/// Course summary from the paginated `/web/courses` listing.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
#[serde(rename_all = "camelCase")]
pub struct Course {
    #[serde(rename = "_id")]
    pub id: String,
    pub course_name: String,
    #[serde(default)]
    pub course_image: String,
    #[serde(default)]
    pub actual_price: f64,
    #[serde(default)]
    pub discounted_price: f64,
    #[serde(default)]
    pub class: CourseClassRef,
    #[serde(default)]
    pub course_category: Option<CourseCategoryRef>,
    #[serde(default)]
    pub is_free: bool,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct CourseSubject {
    #[serde(rename = "_id")]
    pub id: String,
    pub subject_name: String,
}

/// Full course details from `/web/courses/{id}`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CourseDetails {
    #[serde(rename = "_id")]
    pub id: String,
    pub course_name: String,
    #[serde(default)]
    pub course_image: String,
    #[serde(default)]
    pub actual_price: f64,
    #[serde(default)]
    pub discounted_price: f64,
    #[serde(default)]
    pub class: CourseClassRef,
    #[serde(default)]
    pub course_category: Option<CourseCategoryRef>,
    #[serde(default)]
    pub subjects: Vec<CourseSubject>,
    #[serde(default)]
    pub description: Option<String>,
}

/// Institution option for the registration form.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Institution {
    #[serde(rename = "_id")]
    pub id: String,
    #[serde(default)]
    pub name: String,
    pub institution_short_name: String,
}

/// District option for the registration form.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct District {
    #[serde(rename = "_id")]
    pub id: String,
    pub name: String,
}

/// List payload used by the institution/district search endpoints, which nest
/// the items under a second `data` key.
#[derive(Debug, Clone, Deserialize)]
pub struct NestedList<T> {
    #[serde(default = "Vec::new")]
    pub data: Vec<T>,
}
