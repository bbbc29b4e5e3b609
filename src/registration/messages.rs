//! Length limits and user-facing messages for registration fields.

pub const NAME_MAX_LENGTH: usize = 255;

pub const EMAIL_MIN_LENGTH: usize = 3;
pub const EMAIL_MAX_LENGTH: usize = 254;

pub const USERNAME_MIN_LENGTH: usize = 2;
pub const USERNAME_MAX_LENGTH: usize = 30;

pub const PASSWORD_MIN_LENGTH: usize = 2;
pub const PASSWORD_MAX_LENGTH: usize = 75;

pub const NAME_REQUIRED_MSG: &str = "Enter your full name.";
pub const NAME_INVALID_MSG: &str = "Enter a valid name.";

pub const EMAIL_INVALID_CONFIRM_MSG: &str = "The email addresses do not match.";

pub const USERNAME_INVALID_CHARS_ASCII: &str =
    "Usernames can only contain letters (A-Z, a-z), numerals (0-9), underscores (_), and hyphens (-).";
pub const USERNAME_INVALID_CHARS_UNICODE: &str =
    "Usernames can only contain letters, numerals, underscores (_), and hyphens (-).";

pub const PASSWORD_EMPTY_MSG: &str = "Please enter your password.";
pub const PASSWORD_BAD_MIN_LENGTH_MSG: &str = "Password is not long enough.";
pub const PASSWORD_BAD_MAX_LENGTH_MSG: &str = "Password is too long.";
pub const PASSWORD_EQUALS_USERNAME_MSG: &str = "Password cannot be the same as the username.";

pub const COUNTRY_INVALID_MSG: &str = "Select your country or region of residence.";

pub fn name_too_long() -> String {
    format!("Your legal name must be a maximum of {NAME_MAX_LENGTH} characters long.")
}

pub fn email_bad_length() -> String {
    format!(
        "Enter a valid email address that contains at least {EMAIL_MIN_LENGTH} characters \
         and at most {EMAIL_MAX_LENGTH} characters."
    )
}

pub fn email_invalid(email: &str) -> String {
    format!("'{email}' is not a valid email address.")
}

pub fn email_conflict(existing: &str) -> String {
    format!(
        "It looks like {existing} belongs to an existing account. \
         Try again with a different email address."
    )
}

pub fn username_bad_length() -> String {
    format!("Username must be between {USERNAME_MIN_LENGTH} and {USERNAME_MAX_LENGTH} characters long.")
}

pub fn username_conflict(existing: &str) -> String {
    format!(
        "It looks like {existing} belongs to an existing account. \
         Try again with a different username."
    )
}
