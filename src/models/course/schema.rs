//! Declarative list of course attributes.
//!
//! This is the single source of truth for which settings a course record
//! carries, their value kind, and their default. Bump [`SCHEMA_VERSION`]
//! whenever an entry is added, removed, or changes its default.

use serde_json::{Value, json};

pub const SCHEMA_VERSION: i32 = 1;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    String,
    Boolean,
    Integer,
    Float,
    List,
    Dict,
    Date,
    TabList,
}

impl FieldKind {
    /// Whether a submitted JSON value fits this kind. Null is handled by the
    /// caller (it means "use the default").
    pub fn accepts(self, value: &Value) -> bool {
        match self {
            FieldKind::String => value.is_string(),
            FieldKind::Boolean => value.is_boolean(),
            FieldKind::Integer => value.is_i64() || value.is_u64(),
            FieldKind::Float => value.is_number(),
            FieldKind::List => value.is_array(),
            FieldKind::Dict => value.is_object(),
            FieldKind::Date | FieldKind::TabList => false,
        }
    }
}

/// Default value of a course attribute.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum FieldDefault {
    Null,
    Bool(bool),
    Int(i64),
    Float(f64),
    Str(&'static str),
    EmptyList,
    EmptyDict,
}

impl FieldDefault {
    pub fn to_value(self) -> Value {
        match self {
            FieldDefault::Null => Value::Null,
            FieldDefault::Bool(b) => json!(b),
            FieldDefault::Int(i) => json!(i),
            FieldDefault::Float(f) => json!(f),
            FieldDefault::Str(s) => json!(s),
            FieldDefault::EmptyList => json!([]),
            FieldDefault::EmptyDict => json!({}),
        }
    }
}

#[derive(Debug, Clone, Copy)]
pub struct CourseField {
    pub name: &'static str,
    pub kind: FieldKind,
    pub default: FieldDefault,
    /// False for attributes whose values cannot be expressed in plain JSON
    /// (dates, the tab list). Those are never settable from a descriptor.
    pub json_representable: bool,
}

const fn field(name: &'static str, kind: FieldKind, default: FieldDefault) -> CourseField {
    let json_representable = !matches!(kind, FieldKind::Date | FieldKind::TabList);
    CourseField { name, kind, default, json_representable }
}

use FieldDefault as D;
use FieldKind as K;

/// Every course attribute, in declaration order.
pub const COURSE_FIELDS: &[CourseField] = &[
    field("display_name", K::String, D::Str("Empty")),
    field("start", K::Date, D::Null),
    field("end", K::Date, D::Null),
    field("enrollment_start", K::Date, D::Null),
    field("enrollment_end", K::Date, D::Null),
    field("announcement", K::Date, D::Null),
    field("certificate_available_date", K::Date, D::Null),
    field("tabs", K::TabList, D::EmptyList),
    field("advertised_start", K::String, D::Null),
    field("textbooks", K::List, D::EmptyList),
    field("wiki_slug", K::String, D::Null),
    field("lti_passports", K::List, D::EmptyList),
    field("cosmetic_display_price", K::Integer, D::Int(0)),
    field("pre_requisite_courses", K::List, D::EmptyList),
    field("grading_policy", K::Dict, D::EmptyDict),
    field("show_calculator", K::Boolean, D::Bool(false)),
    field("course_edit_method", K::String, D::Str("Studio")),
    field("show_timezone", K::Boolean, D::Bool(true)),
    field("due_date_display_format", K::String, D::Null),
    field("enrollment_domain", K::String, D::Null),
    field("certificates_show_before_end", K::Boolean, D::Bool(false)),
    field("certificates_display_behavior", K::String, D::Str("end")),
    field("course_image", K::String, D::Str("images_course_image.jpg")),
    field("banner_image", K::String, D::Str("images_course_image.jpg")),
    field("video_thumbnail_image", K::String, D::Str("images_course_image.jpg")),
    field("issue_badges", K::Boolean, D::Bool(true)),
    field("hide_progress_tab", K::Boolean, D::Bool(false)),
    field("display_organization", K::String, D::Null),
    field("display_coursenumber", K::String, D::Null),
    field("max_student_enrollments_allowed", K::Integer, D::Null),
    field("allow_public_wiki_access", K::Boolean, D::Bool(true)),
    field("invitation_only", K::Boolean, D::Bool(false)),
    field("course_survey_name", K::String, D::Null),
    field("course_survey_required", K::Boolean, D::Bool(false)),
    field("catalog_visibility", K::String, D::Str("both")),
    field("social_sharing_url", K::String, D::Null),
    field("language", K::String, D::Null),
    field("teams_configuration", K::Dict, D::EmptyDict),
    field("enable_proctored_exams", K::Boolean, D::Bool(false)),
    field("allow_proctoring_opt_out", K::Boolean, D::Bool(false)),
    field("enable_timed_exams", K::Boolean, D::Bool(false)),
    field("minimum_grade_credit", K::Float, D::Float(0.8)),
    field("self_paced", K::Boolean, D::Bool(false)),
    field("enable_subsection_gating", K::Boolean, D::Bool(false)),
    field("learning_info", K::List, D::EmptyList),
    field("instructor_info", K::Dict, D::EmptyDict),
    field("mobile_available", K::Boolean, D::Bool(false)),
    field("video_upload_pipeline", K::Dict, D::EmptyDict),
    field("no_grade", K::Boolean, D::Bool(false)),
    field("disable_progress_graph", K::Boolean, D::Bool(false)),
    field("advanced_modules", K::List, D::EmptyList),
    field("discussion_topics", K::Dict, D::EmptyDict),
    field("discussion_blackouts", K::List, D::EmptyList),
];

pub fn find(name: &str) -> Option<&'static CourseField> {
    COURSE_FIELDS.iter().find(|f| f.name == name)
}

/// Attributes that may be set from a course descriptor.
pub fn settable_fields() -> impl Iterator<Item = &'static CourseField> {
    COURSE_FIELDS.iter().filter(|f| f.json_representable)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn names_are_unique() {
        let mut seen = HashSet::new();
        for f in COURSE_FIELDS {
            assert!(seen.insert(f.name), "duplicate course field {}", f.name);
        }
    }

    #[test]
    fn dates_and_tabs_are_not_settable() {
        for name in [
            "start",
            "end",
            "enrollment_start",
            "enrollment_end",
            "announcement",
            "certificate_available_date",
            "tabs",
        ] {
            let field = find(name).expect("declared");
            assert!(!field.json_representable, "{name} should not be settable");
            assert!(settable_fields().all(|f| f.name != name));
        }
        assert!(settable_fields().any(|f| f.name == "display_name"));
        assert!(settable_fields().any(|f| f.name == "mobile_available"));
        assert!(find("invalid_field").is_none());
    }

    #[test]
    fn kinds_accept_matching_json() {
        assert!(FieldKind::String.accepts(&json!("x")));
        assert!(!FieldKind::String.accepts(&json!(1)));
        assert!(FieldKind::Float.accepts(&json!(1)));
        assert!(!FieldKind::Integer.accepts(&json!(1.5)));
        assert!(FieldKind::Dict.accepts(&json!({"a": 1})));
        assert!(!FieldKind::Date.accepts(&json!("2020-01-01")));
    }

    #[test]
    fn defaults_render_as_json() {
        assert_eq!(find("display_name").unwrap().default.to_value(), json!("Empty"));
        assert_eq!(find("mobile_available").unwrap().default.to_value(), json!(false));
        assert_eq!(find("grading_policy").unwrap().default.to_value(), json!({}));
        assert_eq!(find("wiki_slug").unwrap().default.to_value(), Value::Null);
    }
}
