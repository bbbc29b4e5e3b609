use serde_json::{Map, Value};

use crate::models::course::schema::CourseField;

/// Result of filtering submitted course fields against the schema.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FieldSelection {
    /// Accepted values, keyed by attribute name.
    pub values: Map<String, Value>,
    /// Submitted keys that are not settable attributes.
    pub ignored: Vec<String>,
    /// Settable attributes whose value has the wrong JSON type.
    pub mistyped: Vec<String>,
    /// Settable attributes left unset, in schema order.
    pub defaulted: Vec<String>,
    /// Accepted values merged over the defaults of every allowed attribute.
    pub record: Map<String, Value>,
}

/// Keep submitted fields that the schema allows. Null values are dropped and
/// left to their defaults.
pub fn select_fields<'a, I>(submitted: &Map<String, Value>, allowed: I) -> FieldSelection
where
    I: IntoIterator<Item = &'a CourseField>,
{
    let allowed: Vec<&CourseField> = allowed.into_iter().collect();
    let mut selection = FieldSelection::default();

    for (name, value) in submitted {
        match allowed.iter().find(|f| f.name == name.as_str()) {
            None => selection.ignored.push(name.clone()),
            Some(_) if value.is_null() => {}
            Some(field) if !field.kind.accepts(value) => selection.mistyped.push(name.clone()),
            Some(_) => {
                selection.values.insert(name.clone(), value.clone());
            }
        }
    }

    selection.defaulted = allowed
        .iter()
        .filter(|f| !selection.values.contains_key(f.name))
        .map(|f| f.name.to_string())
        .collect();

    selection.record = allowed
        .iter()
        .map(|f| (f.name.to_string(), f.default.to_value()))
        .collect();
    for (name, value) in &selection.values {
        selection.record.insert(name.clone(), value.clone());
    }

    selection
}
