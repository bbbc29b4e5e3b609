use serde_json::{Map, Value};

use crate::models::course::CourseKey;

const REQUIRED_SETTINGS: [&str; 4] = ["organization", "number", "run", "fields"];

/// A course entry from the generator input that passed the structural checks.
#[derive(Debug, Clone)]
pub struct CourseDescriptor {
    pub key: CourseKey,
    pub fields: Map<String, Value>,
    pub user: Option<String>,
}

/// Check one entry of the `courses` list.
///
/// On failure returns every problem found, each already phrased for the log.
pub fn parse_descriptor(raw: &Value) -> Result<CourseDescriptor, Vec<String>> {
    let Some(course) = raw.as_object() else {
        return Err(vec!["Course json must be an object".to_string()]);
    };

    let mut problems = Vec::new();

    let missing: Vec<&str> = REQUIRED_SETTINGS
        .into_iter()
        .filter(|key| !course.contains_key(*key))
        .collect();
    if !missing.is_empty() {
        problems.push(format!("Course json is missing the following settings: {missing:?}"));
    }

    let fields = match course.get("fields") {
        None => None,
        Some(Value::Object(fields)) => {
            match fields.get("display_name") {
                None | Some(Value::Null) => {
                    problems.push("Fields json is missing display_name".to_string())
                }
                Some(Value::String(_)) => {}
                Some(_) => problems.push("Fields json display_name must be a string".to_string()),
            }
            Some(fields.clone())
        }
        Some(_) => {
            problems.push("Course fields must be an object".to_string());
            None
        }
    };

    let organization = key_part(course, "organization", &mut problems);
    let number = key_part(course, "number", &mut problems);
    let run = key_part(course, "run", &mut problems);

    let user = match course.get("user") {
        None | Some(Value::Null) => None,
        Some(Value::String(user)) => Some(user.clone()),
        Some(_) => {
            problems.push("Course user must be a string".to_string());
            None
        }
    };

    match (organization, number, run, fields) {
        (Some(organization), Some(number), Some(run), Some(fields)) if problems.is_empty() => {
            Ok(CourseDescriptor {
                key: CourseKey::new(organization, number, run),
                fields,
                user,
            })
        }
        _ => Err(problems),
    }
}

/// Missing parts are reported by the required-settings check.
fn key_part(course: &Map<String, Value>, name: &str, problems: &mut Vec<String>) -> Option<String> {
    match course.get(name)? {
        Value::String(s) if !s.trim().is_empty() => Some(s.clone()),
        Value::String(_) => {
            problems.push(format!("Course setting {name} must not be empty"));
            None
        }
        _ => {
            problems.push(format!("Course setting {name} must be a string"));
            None
        }
    }
}
