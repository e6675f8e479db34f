/// Join two url path
pub fn join(base: &str, other: &str) -> String {
    let be = base.ends_with('/');
    let os = other.starts_with('/');
    if be && os {
        return format!("{}{}", base, &other[1..]);
    }

    if !be && !os {
        return format!("{}/{}", base, other);
    }

    format!("{}{}", base, other)
}

/// true when `value` parses as an absolute http(s) url
pub fn is_http_url(value: &str) -> bool {
    matches!(url::Url::parse(value), Ok(parsed) if parsed.scheme() == "http" || parsed.scheme() == "https")
}
