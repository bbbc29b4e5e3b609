//! Course generator tests against an in-memory store.

mod common;

use serde_json::{Value, json};

use common::*;
use learnhub::generator::{CourseGenerator, GenerateError, check_request};
use learnhub::models::course::CourseKey;
use learnhub::models::course::schema::{self, SCHEMA_VERSION};

// --- Helpers ---

fn document(courses: Value) -> String {
    json!({ "courses": courses }).to_string()
}

fn course(org: &str, fields: Value) -> Value {
    json!({
        "organization": org,
        "number": "1",
        "run": "1",
        "user": "user@email.com",
        "fields": fields,
    })
}

fn key(org: &str) -> CourseKey {
    CourseKey::new(org, "1", "1")
}

// --- Document-level errors ---

#[tokio::test]
async fn refuses_to_run_outside_development() {
    let store = MemoryStore::with_default_accounts();
    let generator = CourseGenerator::new(&store, FALLBACK_USER);
    let input = document(json!([course("test-course-generator", json!({"display_name": "x"}))]));

    let err = generator.run(&input, false).await.unwrap_err();
    assert!(matches!(err, GenerateError::NotDevelopment));
    assert_eq!(err.to_string(), "Command should only be run in development environments");
    assert!(store.courses().is_empty());
}

#[tokio::test]
async fn rejects_invalid_json() {
    let store = MemoryStore::with_default_accounts();
    let generator = CourseGenerator::new(&store, FALLBACK_USER);
    let err = generator.run("invalid_json", true).await.unwrap_err();
    assert_eq!(err.to_string(), "Invalid JSON object");
}

#[tokio::test]
async fn rejects_missing_and_malformed_course_lists() {
    let store = MemoryStore::with_default_accounts();
    let generator = CourseGenerator::new(&store, FALLBACK_USER);

    let err = generator.run(r#"{"course": []}"#, true).await.unwrap_err();
    assert_eq!(err.to_string(), "JSON object is missing courses list");

    let err = generator.run(r#"{"courses": "none"}"#, true).await.unwrap_err();
    assert_eq!(err.to_string(), "JSON object courses must be a list");
}

#[test]
fn request_checks_need_no_store() {
    assert!(matches!(
        check_request("arg", false),
        Err(GenerateError::NotDevelopment)
    ));
    assert_eq!(
        check_request("invalid_json", true).unwrap_err().to_string(),
        "Invalid JSON object"
    );
    let courses = check_request(
        &document(json!([course("test-course-generator", json!({"display_name": "x"}))])),
        true,
    )
    .unwrap();
    assert_eq!(courses.len(), 1);
}

// --- Per-course outcomes ---

#[tokio::test]
async fn creates_course_with_defaults_filled_in() {
    let store = MemoryStore::with_default_accounts();
    let generator = CourseGenerator::new(&store, FALLBACK_USER);
    let input = document(json!([course(
        "test-course-generator",
        json!({"display_name": "test-course", "mobile_available": true}),
    )]));

    let report = generator.run(&input, true).await.unwrap();
    assert_eq!(report.created.len(), 1);
    assert!(report.skipped.is_empty());
    assert!(report.failed.is_empty());

    let created = &report.created[0];
    assert_eq!(created.key.to_string(), "course-v1:test-course-generator+1+1");
    assert!(created.ignored_fields.is_empty());
    assert!(!created.defaulted_fields.contains(&"display_name".to_string()));
    assert!(!created.defaulted_fields.contains(&"mobile_available".to_string()));
    assert!(created.defaulted_fields.contains(&"invitation_only".to_string()));

    let stored = store.course(&key("test-course-generator")).unwrap();
    assert_eq!(stored.owner_id, store.user_id("user").unwrap());
    assert_eq!(stored.schema_version, SCHEMA_VERSION);
    assert_eq!(stored.fields["display_name"], json!("test-course"));
    assert_eq!(stored.fields["mobile_available"], json!(true));
    assert_eq!(stored.fields["invitation_only"], json!(false));
    assert_eq!(stored.fields.len(), schema::settable_fields().count());
}

#[tokio::test]
async fn unknown_fields_are_reported_and_dropped() {
    let store = MemoryStore::with_default_accounts();
    let generator = CourseGenerator::new(&store, FALLBACK_USER);
    let input = document(json!([course(
        "test-course-generator",
        json!({"display_name": "test-course", "invalid_field": "invalid_value"}),
    )]));

    let report = generator.run(&input, true).await.unwrap();
    assert_eq!(report.created.len(), 1);
    assert_eq!(report.created[0].ignored_fields, vec!["invalid_field"]);

    let stored = store.course(&key("test-course-generator")).unwrap();
    assert!(!stored.fields.contains_key("invalid_field"));
}

#[tokio::test]
async fn mistyped_values_fall_back_to_defaults() {
    let store = MemoryStore::with_default_accounts();
    let generator = CourseGenerator::new(&store, FALLBACK_USER);
    let input = document(json!([course(
        "test-course-generator",
        json!({"display_name": "test-course", "mobile_available": "yes"}),
    )]));

    let report = generator.run(&input, true).await.unwrap();
    assert_eq!(report.created[0].mistyped_fields, vec!["mobile_available"]);
    let stored = store.course(&key("test-course-generator")).unwrap();
    assert_eq!(stored.fields["mobile_available"], json!(false));
}

#[tokio::test]
async fn course_missing_settings_is_skipped() {
    let store = MemoryStore::with_default_accounts();
    let generator = CourseGenerator::new(&store, FALLBACK_USER);
    let input = document(json!([
        {"number": "1", "run": "1", "fields": {"display_name": "test-course"}},
        course("second-org", json!({"display_name": "second"})),
    ]));

    let report = generator.run(&input, true).await.unwrap();
    assert_eq!(report.skipped.len(), 1);
    assert_eq!(report.skipped[0].index, 0);
    assert_eq!(
        report.skipped[0].reasons,
        vec![r#"Course json is missing the following settings: ["organization"]"#]
    );

    assert_eq!(report.created.len(), 1);
    assert_eq!(store.courses().len(), 1);
    assert!(store.course(&key("second-org")).is_some());
}

#[tokio::test]
async fn course_without_display_name_is_skipped() {
    let store = MemoryStore::with_default_accounts();
    let generator = CourseGenerator::new(&store, FALLBACK_USER);
    let input = document(json!([course("test-course-generator", json!({}))]));

    let report = generator.run(&input, true).await.unwrap();
    assert_eq!(report.skipped[0].reasons, vec!["Fields json is missing display_name"]);
    assert!(store.courses().is_empty());
}

#[tokio::test]
async fn non_string_display_name_is_skipped() {
    let store = MemoryStore::with_default_accounts();
    let generator = CourseGenerator::new(&store, FALLBACK_USER);
    let input = document(json!([course("test-course-generator", json!({"display_name": 5}))]));

    let report = generator.run(&input, true).await.unwrap();
    assert!(report.created.is_empty());
    assert_eq!(
        report.skipped[0].reasons,
        vec!["Fields json display_name must be a string"]
    );
    assert!(store.courses().is_empty());
}

#[tokio::test]
async fn unknown_user_fails_the_course() {
    let store = MemoryStore::with_default_accounts();
    let generator = CourseGenerator::new(&store, FALLBACK_USER);
    let mut entry = course("test-course-generator", json!({"display_name": "x"}));
    entry["user"] = json!("nobody@example.com");

    let report = generator.run(&document(json!([entry])), true).await.unwrap();
    assert_eq!(report.failed.len(), 1);
    assert_eq!(report.failed[0].reason, "Unknown user 'nobody@example.com'");
    assert!(store.courses().is_empty());
}

#[tokio::test]
async fn owner_defaults_to_fallback_user() {
    let store = MemoryStore::with_default_accounts();
    let generator = CourseGenerator::new(&store, FALLBACK_USER);
    let mut entry = course("test-course-generator", json!({"display_name": "x"}));
    entry.as_object_mut().unwrap().remove("user");

    let report = generator.run(&document(json!([entry])), true).await.unwrap();
    assert_eq!(report.created.len(), 1);
    let stored = store.course(&key("test-course-generator")).unwrap();
    assert_eq!(stored.owner_id, store.user_id("edx").unwrap());
}

#[tokio::test]
async fn owner_may_be_given_by_username() {
    let store = MemoryStore::with_default_accounts();
    let generator = CourseGenerator::new(&store, FALLBACK_USER);
    let mut entry = course("test-course-generator", json!({"display_name": "x"}));
    entry["user"] = json!("user");

    generator.run(&document(json!([entry])), true).await.unwrap();
    let stored = store.course(&key("test-course-generator")).unwrap();
    assert_eq!(stored.owner_id, store.user_id("user").unwrap());
}

#[tokio::test]
async fn duplicate_course_fails_without_overwriting() {
    let store = MemoryStore::with_default_accounts();
    let generator = CourseGenerator::new(&store, FALLBACK_USER);
    let input = document(json!([
        course("test-course-generator", json!({"display_name": "first"})),
        course("test-course-generator", json!({"display_name": "second"})),
    ]));

    let report = generator.run(&input, true).await.unwrap();
    assert_eq!(report.created.len(), 1);
    assert_eq!(report.failed.len(), 1);
    assert_eq!(
        report.failed[0].reason,
        "Course course-v1:test-course-generator+1+1 already exists"
    );

    let stored = store.course(&key("test-course-generator")).unwrap();
    assert_eq!(stored.fields["display_name"], json!("first"));
}

#[tokio::test]
async fn restricted_field_set_is_honoured() {
    let store = MemoryStore::with_default_accounts();
    let allowed = ["display_name", "mobile_available"]
        .into_iter()
        .filter_map(schema::find);
    let generator = CourseGenerator::with_fields(&store, FALLBACK_USER, allowed);
    let input = document(json!([course(
        "test-course-generator",
        json!({"display_name": "x", "invitation_only": true}),
    )]));

    let report = generator.run(&input, true).await.unwrap();
    let created = &report.created[0];
    assert_eq!(created.ignored_fields, vec!["invitation_only"]);
    assert_eq!(created.defaulted_fields, vec!["mobile_available"]);

    let stored = store.course(&key("test-course-generator")).unwrap();
    assert_eq!(stored.fields.len(), 2);
}
