//! Field-by-field validation of prospective registration data.
//!
//! A [`ValidationRequest`] holds whichever recognised fields the client
//! submitted. [`validate`] produces one decision per submitted field: an
//! empty string when the value is acceptable, otherwise a message that can
//! be shown next to the form input. Fields never affect each other except
//! `confirm_email` (compared against `email`) and `password` (compared
//! against `username`).

pub mod countries;
pub mod messages;
pub mod rules;

use std::collections::BTreeMap;
use std::future::Future;

use serde::ser::{Serialize, SerializeMap, Serializer};

/// Registration form fields the validator knows about.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum FieldName {
    Name,
    Email,
    ConfirmEmail,
    Username,
    Password,
    Country,
}

impl FieldName {
    pub const ALL: [FieldName; 6] = [
        FieldName::Name,
        FieldName::Email,
        FieldName::ConfirmEmail,
        FieldName::Username,
        FieldName::Password,
        FieldName::Country,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            FieldName::Name => "name",
            FieldName::Email => "email",
            FieldName::ConfirmEmail => "confirm_email",
            FieldName::Username => "username",
            FieldName::Password => "password",
            FieldName::Country => "country",
        }
    }

    pub fn parse(raw: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|f| f.as_str() == raw)
    }
}

/// Character set accepted in usernames.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum UsernameCharset {
    /// `A-Z a-z 0-9 _ -`
    #[default]
    Ascii,
    /// Any Unicode word character plus `-`.
    Unicode,
}

#[derive(Debug, Clone, Copy, Default)]
pub struct ValidationSettings {
    pub username_charset: UsernameCharset,
}

/// Submitted values keyed by recognised field.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ValidationRequest {
    values: BTreeMap<FieldName, String>,
}

impl ValidationRequest {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build from raw key/value pairs. Unknown keys are dropped.
    pub fn from_pairs<I, K, V>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: Into<String>,
    {
        let mut request = Self::new();
        for (key, value) in pairs {
            match FieldName::parse(key.as_ref()) {
                Some(field) => {
                    request.values.insert(field, value.into());
                }
                None => log::debug!("Dropping unrecognised validation field {:?}", key.as_ref()),
            }
        }
        request
    }

    pub fn with(mut self, field: FieldName, value: impl Into<String>) -> Self {
        self.values.insert(field, value.into());
        self
    }

    pub fn get(&self, field: FieldName) -> Option<&str> {
        self.values.get(&field).map(String::as_str)
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

/// Per-field outcome: empty string means valid.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ValidationDecision {
    decisions: BTreeMap<FieldName, String>,
}

impl ValidationDecision {
    pub fn get(&self, field: FieldName) -> Option<&str> {
        self.decisions.get(&field).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.decisions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.decisions.is_empty()
    }

    /// True when every reported field passed.
    pub fn all_valid(&self) -> bool {
        self.decisions.values().all(String::is_empty)
    }

    pub fn iter(&self) -> impl Iterator<Item = (FieldName, &str)> {
        self.decisions.iter().map(|(f, m)| (*f, m.as_str()))
    }

    fn record(&mut self, field: FieldName, outcome: Option<String>) {
        self.decisions.insert(field, outcome.unwrap_or_default());
    }
}

impl Serialize for ValidationDecision {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.decisions.len()))?;
        for (field, message) in &self.decisions {
            map.serialize_entry(field.as_str(), message)?;
        }
        map.end()
    }
}

/// Read access to existing accounts for conflict checks.
///
/// Each lookup returns the stored value of the colliding account so the
/// message can name it.
pub trait AccountLookup {
    fn existing_username(
        &self,
        username: &str,
    ) -> impl Future<Output = Result<Option<String>, sqlx::Error>> + Send;

    fn existing_email(
        &self,
        email: &str,
    ) -> impl Future<Output = Result<Option<String>, sqlx::Error>> + Send;
}

/// Validate every recognised field present in `request`.
///
/// Only store failures are returned as errors; field problems are reported
/// in the decision map.
pub async fn validate<S>(
    request: &ValidationRequest,
    store: &S,
    settings: ValidationSettings,
) -> Result<ValidationDecision, sqlx::Error>
where
    S: AccountLookup,
{
    let mut decision = ValidationDecision::default();
    let email = request.get(FieldName::Email);
    let username = request.get(FieldName::Username);

    if let Some(name) = request.get(FieldName::Name) {
        decision.record(FieldName::Name, rules::validate_name(name));
    }

    if let Some(email) = email {
        let outcome = match rules::validate_email_format(email) {
            Some(msg) => Some(msg),
            None => store
                .existing_email(email)
                .await?
                .map(|existing| messages::email_conflict(&existing)),
        };
        decision.record(FieldName::Email, outcome);
    }

    if let Some(confirm) = request.get(FieldName::ConfirmEmail) {
        decision.record(FieldName::ConfirmEmail, rules::validate_confirm_email(confirm, email));
    }

    if let Some(username) = username {
        let outcome = match rules::validate_username_format(username, settings.username_charset) {
            Some(msg) => Some(msg),
            None => store
                .existing_username(username)
                .await?
                .map(|existing| messages::username_conflict(&existing)),
        };
        decision.record(FieldName::Username, outcome);
    }

    if let Some(password) = request.get(FieldName::Password) {
        decision.record(FieldName::Password, rules::validate_password(password, username));
    }

    if let Some(country) = request.get(FieldName::Country) {
        decision.record(FieldName::Country, rules::validate_country(country));
    }

    Ok(decision)
}
