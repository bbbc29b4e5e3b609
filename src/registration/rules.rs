//! Per-field checks. Each returns `None` when the value passes, or the
//! message to show the user. Conflict checks live in `super::validate`
//! because they need the account store.

use std::sync::LazyLock;

use regex::Regex;

use super::countries;
use super::messages::*;
use super::UsernameCharset;

static EMAIL_USER_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)^[-!#$%&'*+/=?^_`{}|~0-9a-z]+(\.[-!#$%&'*+/=?^_`{}|~0-9a-z]+)*$")
        .expect("email user regex")
});

static EMAIL_DOMAIN_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)^(?:[a-z0-9](?:[a-z0-9-]{0,61}[a-z0-9])?\.)+[a-z0-9-]{2,63}$")
        .expect("email domain regex")
});

static USERNAME_ASCII_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[-a-zA-Z0-9_]+$").expect("ascii username regex"));

static USERNAME_UNICODE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[-\w]+$").expect("unicode username regex"));

const DOMAIN_ALLOWLIST: &[&str] = &["localhost"];

fn char_len(value: &str) -> usize {
    value.chars().count()
}

/// Full name: required, bounded, and not a link.
pub fn validate_name(name: &str) -> Option<String> {
    let trimmed = name.trim();
    if trimmed.is_empty() {
        return Some(NAME_REQUIRED_MSG.to_string());
    }
    if char_len(trimmed) > NAME_MAX_LENGTH {
        return Some(name_too_long());
    }
    let lower = trimmed.to_lowercase();
    if ["http://", "https://", "www."].iter().any(|p| lower.contains(p)) {
        return Some(NAME_INVALID_MSG.to_string());
    }
    None
}

/// Length then syntax. The conflict check runs afterwards, only if both pass.
pub fn validate_email_format(email: &str) -> Option<String> {
    let len = char_len(email);
    if !(EMAIL_MIN_LENGTH..=EMAIL_MAX_LENGTH).contains(&len) {
        return Some(email_bad_length());
    }
    if !is_valid_email(email) {
        return Some(email_invalid(email));
    }
    None
}

/// Syntactic check: dot-atom local part, hostname domain with a TLD (or an
/// allow-listed bare host).
pub fn is_valid_email(email: &str) -> bool {
    let Some((user, domain)) = email.rsplit_once('@') else {
        return false;
    };
    if user.is_empty() || domain.is_empty() || !EMAIL_USER_RE.is_match(user) {
        return false;
    }
    if DOMAIN_ALLOWLIST.contains(&domain.to_ascii_lowercase().as_str()) {
        return true;
    }
    EMAIL_DOMAIN_RE.is_match(domain) && !domain.ends_with('-')
}

pub fn validate_confirm_email(confirm_email: &str, email: Option<&str>) -> Option<String> {
    if email == Some(confirm_email) {
        None
    } else {
        Some(EMAIL_INVALID_CONFIRM_MSG.to_string())
    }
}

/// Length then character set. The conflict check runs afterwards.
pub fn validate_username_format(username: &str, charset: UsernameCharset) -> Option<String> {
    let len = char_len(username);
    if !(USERNAME_MIN_LENGTH..=USERNAME_MAX_LENGTH).contains(&len) {
        return Some(username_bad_length());
    }
    let (re, msg) = match charset {
        UsernameCharset::Ascii => (&*USERNAME_ASCII_RE, USERNAME_INVALID_CHARS_ASCII),
        UsernameCharset::Unicode => (&*USERNAME_UNICODE_RE, USERNAME_INVALID_CHARS_UNICODE),
    };
    if !re.is_match(username) {
        return Some(msg.to_string());
    }
    None
}

/// `username` is the value submitted alongside, if any.
pub fn validate_password(password: &str, username: Option<&str>) -> Option<String> {
    if password.is_empty() {
        return Some(PASSWORD_EMPTY_MSG.to_string());
    }
    let len = char_len(password);
    if len < PASSWORD_MIN_LENGTH {
        return Some(PASSWORD_BAD_MIN_LENGTH_MSG.to_string());
    }
    if len > PASSWORD_MAX_LENGTH {
        return Some(PASSWORD_BAD_MAX_LENGTH_MSG.to_string());
    }
    if username == Some(password) {
        return Some(PASSWORD_EQUALS_USERNAME_MSG.to_string());
    }
    None
}

pub fn validate_country(country: &str) -> Option<String> {
    if countries::is_known(country) {
        None
    } else {
        Some(COUNTRY_INVALID_MSG.to_string())
    }
}
