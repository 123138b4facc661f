// src/core/commons.rs

/// Quotes a word for POSIX shells, leaving plain words untouched.
///
/// Anything outside `[A-Za-z0-9_@%+=:,./~-]` triggers quoting; embedded single
/// quotes are closed, emitted as `"'"`, and reopened.
pub fn posix_quote(value: &str) -> String {
    let is_plain = !value.is_empty()
        && value
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || "_@%+=:,./~-".contains(c));
    if is_plain {
        return value.to_string();
    }
    format!("'{}'", value.replace('\'', "'\"'\"'"))
}

/// Quotes a string as a PowerShell single-quoted literal.
pub fn pwsh_quote(value: &str) -> String {
    format!("'{}'", value.replace('\'', "''"))
}
