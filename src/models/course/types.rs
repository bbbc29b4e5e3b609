use std::fmt;

use serde_json::{Map, Value};
use sqlx::FromRow;

/// Identity of a course: organization, catalog number and run.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CourseKey {
    pub organization: String,
    pub number: String,
    pub run: String,
}

impl CourseKey {
    pub fn new(organization: impl Into<String>, number: impl Into<String>, run: impl Into<String>) -> Self {
        Self {
            organization: organization.into(),
            number: number.into(),
            run: run.into(),
        }
    }
}

impl fmt::Display for CourseKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "course-v1:{}+{}+{}", self.organization, self.number, self.run)
    }
}

/// Stored course row.
#[derive(Debug, Clone, FromRow)]
pub struct Course {
    pub id: i64,
    pub organization: String,
    pub number: String,
    pub run: String,
    pub owner_id: i64,
    pub fields: sqlx::types::Json<Map<String, Value>>,
    pub schema_version: i32,
    pub created_at: String,
}

impl Course {
    pub fn key(&self) -> CourseKey {
        CourseKey::new(&self.organization, &self.number, &self.run)
    }
}

/// New course data for creation. `fields` holds the full attribute map,
/// defaults included.
#[derive(Debug, Clone)]
pub struct NewCourse {
    pub key: CourseKey,
    pub owner_id: i64,
    pub fields: Map<String, Value>,
    pub schema_version: i32,
}
