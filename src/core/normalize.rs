/// Canonical form of a free-text location or category value
///
/// Trims surrounding whitespace and lowercases. Unset input becomes the
/// empty string, which callers treat as "not specified".
#[inline]
pub fn normalize(value: Option<&str>) -> String {
    value.map(|s| s.trim().to_lowercase()).unwrap_or_default()
}

/// Whether a value survives normalization as a real constraint
#[inline]
pub fn is_set(value: Option<&str>) -> bool {
    value.is_some_and(|s| !s.trim().is_empty())
}

/// Normalized value, or `None` when blank
#[inline]
pub fn normalized(value: Option<&str>) -> Option<String> {
    let n = normalize(value);
    if n.is_empty() { None } else { Some(n) }
}
