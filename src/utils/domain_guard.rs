//! Self-referential domain protection.
//!
//! A short link pointing back at the service's own domain would redirect to
//! itself, so such targets are refused before anything is stored.

/// Reduces a URL to its bare host.
///
/// Strips one leading `http://`, then one leading `https://`, then one
/// leading `www.`, and cuts at the first `/`. Malformed input may reduce to an
/// empty string.
fn bare_host(url: &str) -> &str {
    let rest = url.strip_prefix("http://").unwrap_or(url);
    let rest = rest.strip_prefix("https://").unwrap_or(rest);
    let rest = rest.strip_prefix("www.").unwrap_or(rest);
    rest.split('/').next().unwrap_or(rest)
}

/// Returns `false` if `candidate` aliases `own_domain`.
///
/// Rejects the raw input when it equals `own_domain` verbatim, and any input
/// whose bare host equals `own_domain`. The comparison is literal.
/// `own_domain` must be non-empty, otherwise every empty host is refused.
pub fn is_allowed(candidate: &str, own_domain: &str) -> bool {
    if candidate == own_domain {
        return false;
    }

    bare_host(candidate) != own_domain
}

/// Prepends `http://` unless the URL starts with `http`.
///
/// Inputs starting with `http` (including `https://...`) are returned as-is.
/// Inputs shorter than four characters are expected to be rejected by the
/// caller beforehand; they are prefixed like any other.
pub fn enforce_scheme(url: &str) -> String {
    if url.starts_with("http") {
        url.to_string()
    } else {
        format!("http://{}", url)
    }
}
