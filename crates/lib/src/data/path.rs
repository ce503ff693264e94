//! Separator-delimited paths into nested property trees.
//!
//! Paths are plain strings such as `"access.site.login"`. The separator is
//! configurable per call so that callers holding keys which themselves contain
//! dots (for example permission names) can address them with another
//! separator such as `'/'`.

/// The default path separator.
pub const SEPARATOR: char = '.';

/// Normalizes a path string by dropping empty components.
///
/// - Empty string "" → empty string (refers to the root)
/// - Leading separators ".user" → "user"
/// - Trailing separators "user." → "user"
/// - Repeated separators "user..profile" → "user.profile"
///
/// # Examples
///
/// ```rust
/// # use tessera::data::path::normalize_path;
/// assert_eq!(normalize_path("", '.'), "");
/// assert_eq!(normalize_path(".user", '.'), "user");
/// assert_eq!(normalize_path("user..profile.", '.'), "user.profile");
/// assert_eq!(normalize_path("a//b", '/'), "a/b");
/// ```
pub fn normalize_path(input: &str, separator: char) -> String {
    if input.is_empty() {
        return String::new();
    }

    let mut buf = [0u8; 4];
    let separator_str: &str = separator.encode_utf8(&mut buf);
    segments(input, separator).join(separator_str)
}

/// Splits a path into its non-empty components.
pub fn segments(path: &str, separator: char) -> Vec<&str> {
    path.split(separator)
        .filter(|component| !component.is_empty())
        .collect()
}

/// Joins a prefix and a suffix path with `separator`, ignoring empty sides.
///
/// ```rust
/// # use tessera::data::path::join;
/// assert_eq!(join("access", "site.login", '.'), "access.site.login");
/// assert_eq!(join("", "site", '.'), "site");
/// assert_eq!(join("access", "", '.'), "access");
/// ```
pub fn join(prefix: &str, suffix: &str, separator: char) -> String {
    match (prefix.is_empty(), suffix.is_empty()) {
        (true, _) => suffix.to_string(),
        (false, true) => prefix.to_string(),
        (false, false) => format!("{prefix}{separator}{suffix}"),
    }
}

/// Returns true if `path` equals `ancestor` or lies below it.
pub fn is_within(path: &str, ancestor: &str, separator: char) -> bool {
    if ancestor.is_empty() {
        return true;
    }
    match path.strip_prefix(ancestor) {
        Some("") => true,
        Some(rest) => rest.starts_with(separator),
        None => false,
    }
}
