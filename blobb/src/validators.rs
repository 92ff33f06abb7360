use std::sync::LazyLock;

use email_address::EmailAddress;
use regex::Regex;

static USERNAME_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[A-Za-z0-9_]{1,32}$").expect("username pattern is valid"));

/// Returns `true` if the provided string is a syntactically valid email address.
pub fn is_valid_email(value: &str) -> bool {
    EmailAddress::is_valid(value)
}

/// Returns `true` if the value is 1-32 ASCII letters, digits or underscores.
pub fn is_valid_username(value: &str) -> bool {
    USERNAME_PATTERN.is_match(value)
}

/// Canonical form used for username uniqueness and lookups.
pub fn normalize_username(value: &str) -> String {
    value.to_ascii_lowercase()
}
