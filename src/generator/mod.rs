//! Bulk course creation from a JSON description.
//!
//! Input shape: `{"courses": [{organization, number, run, fields, user?}, ...]}`.
//! Problems with the document itself abort the run with a [`GenerateError`].
//! Problems with a single course are logged and recorded in the
//! [`GenerationReport`]; the remaining courses are still processed.

pub mod descriptor;
pub mod fields;

use std::fmt;
use std::future::Future;

use serde_json::Value;
use sqlx::PgPool;

use crate::models::course::schema::{self, CourseField};
use crate::models::course::{self, CourseKey, NewCourse};
use crate::models::user;

pub use descriptor::{CourseDescriptor, parse_descriptor};
pub use fields::{FieldSelection, select_fields};

#[derive(Debug)]
pub enum GenerateError {
    NotDevelopment,
    InvalidJson(serde_json::Error),
    MissingCourses,
    CoursesNotList,
}

impl fmt::Display for GenerateError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GenerateError::NotDevelopment => {
                write!(f, "Command should only be run in development environments")
            }
            GenerateError::InvalidJson(_) => write!(f, "Invalid JSON object"),
            GenerateError::MissingCourses => write!(f, "JSON object is missing courses list"),
            GenerateError::CoursesNotList => write!(f, "JSON object courses must be a list"),
        }
    }
}

impl std::error::Error for GenerateError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            GenerateError::InvalidJson(e) => Some(e),
            _ => None,
        }
    }
}

/// Where generated courses go and where their owners come from.
pub trait CourseStore {
    /// Look up an account by email (if `identifier` contains `@`) or username.
    fn resolve_owner(
        &self,
        identifier: &str,
    ) -> impl Future<Output = Result<Option<i64>, sqlx::Error>> + Send;

    fn course_exists(&self, key: &CourseKey) -> impl Future<Output = Result<bool, sqlx::Error>> + Send;

    fn create_course(&self, new: &NewCourse) -> impl Future<Output = Result<i64, sqlx::Error>> + Send;
}

impl CourseStore for PgPool {
    async fn resolve_owner(&self, identifier: &str) -> Result<Option<i64>, sqlx::Error> {
        Ok(user::find_by_identifier(self, identifier).await?.map(|u| u.id))
    }

    async fn course_exists(&self, key: &CourseKey) -> Result<bool, sqlx::Error> {
        course::exists(self, key).await
    }

    async fn create_course(&self, new: &NewCourse) -> Result<i64, sqlx::Error> {
        course::create(self, new).await
    }
}

#[derive(Debug, Clone)]
pub struct CreatedCourse {
    pub id: i64,
    pub key: CourseKey,
    pub ignored_fields: Vec<String>,
    pub mistyped_fields: Vec<String>,
    pub defaulted_fields: Vec<String>,
}

#[derive(Debug, Clone)]
pub struct SkippedCourse {
    /// Position in the input list.
    pub index: usize,
    pub reasons: Vec<String>,
}

#[derive(Debug, Clone)]
pub struct FailedCourse {
    pub key: CourseKey,
    pub reason: String,
}

#[derive(Debug, Clone, Default)]
pub struct GenerationReport {
    pub created: Vec<CreatedCourse>,
    pub skipped: Vec<SkippedCourse>,
    pub failed: Vec<FailedCourse>,
}

/// Creates courses from descriptors against a store.
pub struct CourseGenerator<'a, S> {
    store: &'a S,
    allowed: Vec<&'static CourseField>,
    fallback_user: String,
}

impl<'a, S: CourseStore> CourseGenerator<'a, S> {
    /// Uses the settable attributes of the current course schema.
    pub fn new(store: &'a S, fallback_user: impl Into<String>) -> Self {
        Self::with_fields(store, fallback_user, schema::settable_fields())
    }

    pub fn with_fields<I>(store: &'a S, fallback_user: impl Into<String>, allowed: I) -> Self
    where
        I: IntoIterator<Item = &'static CourseField>,
    {
        Self {
            store,
            allowed: allowed.into_iter().collect(),
            fallback_user: fallback_user.into(),
        }
    }

    /// Parse the input document and create every valid course in it.
    pub async fn run(&self, input: &str, development: bool) -> Result<GenerationReport, GenerateError> {
        let courses = check_request(input, development)?;
        Ok(self.generate(&courses).await)
    }

    /// Create each course in turn. Per-course failures never stop the loop.
    pub async fn generate(&self, courses: &[Value]) -> GenerationReport {
        let mut report = GenerationReport::default();

        for (index, raw) in courses.iter().enumerate() {
            let descriptor = match parse_descriptor(raw) {
                Ok(d) => d,
                Err(reasons) => {
                    for reason in &reasons {
                        log::warn!("{reason}");
                    }
                    log::warn!("Can't create course, proceeding to next course");
                    report.skipped.push(SkippedCourse { index, reasons });
                    continue;
                }
            };

            let key = descriptor.key.clone();
            match self.create_one(descriptor).await {
                Ok(created) => {
                    log::info!("Created {}", created.key);
                    report.created.push(created);
                }
                Err(reason) => {
                    log::error!("Failed to create {key}: {reason}");
                    report.failed.push(FailedCourse { key, reason });
                }
            }
        }

        log::info!(
            "Course generation finished: created={}, skipped={}, failed={}",
            report.created.len(),
            report.skipped.len(),
            report.failed.len()
        );
        report
    }

    async fn create_one(&self, descriptor: CourseDescriptor) -> Result<CreatedCourse, String> {
        let selection = select_fields(&descriptor.fields, self.allowed.iter().copied());
        if !selection.ignored.is_empty() {
            log::info!(
                "The following settings are not valid course fields and will not be used: {:?}",
                selection.ignored
            );
        }
        if !selection.mistyped.is_empty() {
            log::info!(
                "The following settings have values of the wrong type and will not be used: {:?}",
                selection.mistyped
            );
        }
        if !selection.defaulted.is_empty() {
            log::info!(
                "The following course fields were not set by the user and will be set to their default values: {:?}",
                selection.defaulted
            );
        }

        let identifier = descriptor.user.as_deref().unwrap_or(self.fallback_user.as_str());
        let owner_id = self
            .store
            .resolve_owner(identifier)
            .await
            .map_err(|e| format!("Database error: {e}"))?
            .ok_or_else(|| format!("Unknown user '{identifier}'"))?;

        let exists = self
            .store
            .course_exists(&descriptor.key)
            .await
            .map_err(|e| format!("Database error: {e}"))?;
        if exists {
            return Err(format!("Course {} already exists", descriptor.key));
        }

        let FieldSelection { ignored, mistyped, defaulted, record, .. } = selection;
        let new = NewCourse {
            key: descriptor.key,
            owner_id,
            fields: record,
            schema_version: schema::SCHEMA_VERSION,
        };
        let id = self
            .store
            .create_course(&new)
            .await
            .map_err(|e| format!("Database error: {e}"))?;

        Ok(CreatedCourse {
            id,
            key: new.key,
            ignored_fields: ignored,
            mistyped_fields: mistyped,
            defaulted_fields: defaulted,
        })
    }
}

/// Request-level checks: the environment first, then the document.
///
/// Needs no store, so callers can reject a request before connecting.
pub fn check_request(input: &str, development: bool) -> Result<Vec<Value>, GenerateError> {
    if !development {
        return Err(GenerateError::NotDevelopment);
    }
    parse_courses(input)
}

/// Extract the `courses` list from the input document.
pub fn parse_courses(input: &str) -> Result<Vec<Value>, GenerateError> {
    let document: Value = serde_json::from_str(input).map_err(GenerateError::InvalidJson)?;
    match document.get("courses") {
        None => Err(GenerateError::MissingCourses),
        Some(Value::Array(courses)) => Ok(courses.clone()),
        Some(_) => Err(GenerateError::CoursesNotList),
    }
}
