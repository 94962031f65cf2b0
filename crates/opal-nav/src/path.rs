//! URL parsing and path resolution.
//!
//! Pure functions: no DOM, no network, no session state. The one
//! deliberate difference from a general-purpose URL library is that
//! relative and fragment-only references are first-class values here,
//! because they are the majority of what a link click hands us.

use opal_types::{NavError, Result};

// -----------------------------------------------------------------------
// ParsedUrl
// -----------------------------------------------------------------------

/// A parsed URL reference, possibly relative.
///
/// `directory` + `filename` always reconstructs the pathname, and
/// `directory` ends in `/` whenever it is non-empty. `search` carries
/// its leading `?` and `hash` its leading `#`, so `href()` is plain
/// concatenation and `parse_url(u.href())` returns `u` unchanged for
/// any value this module produces.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ParsedUrl {
    /// Scheme including the trailing colon (`"http:"`), or empty for
    /// scheme-relative and relative references.
    pub protocol: String,
    /// Authority (host and optional port), or empty.
    pub host: String,
    /// Path up to and including the last slash.
    pub directory: String,
    /// Path after the last slash.
    pub filename: String,
    /// Query string including the leading `?`, or empty.
    pub search: String,
    /// Fragment including the leading `#`, or empty.
    pub hash: String,
}

impl ParsedUrl {
    /// The full path: `directory` + `filename`.
    pub fn pathname(&self) -> String {
        format!("{}{}", self.directory, self.filename)
    }

    /// Reassemble the reference. Inverse of [`parse_url`] for values
    /// produced by this module.
    pub fn href(&self) -> String {
        let authority = if self.protocol.is_empty() && self.host.is_empty() {
            String::new()
        } else {
            format!("{}//{}", self.protocol, self.host)
        };
        format!(
            "{authority}{}{}{}{}",
            self.directory, self.filename, self.search, self.hash
        )
    }

    /// True for references that carry only a fragment (`#id`): no
    /// path, query, or authority.
    pub fn is_bare_fragment(&self) -> bool {
        self.host.is_empty()
            && self.directory.is_empty()
            && self.filename.is_empty()
            && self.search.is_empty()
            && !self.hash.is_empty()
    }

    /// The fragment without its `#`, if any.
    pub fn fragment(&self) -> Option<&str> {
        self.hash.strip_prefix('#').filter(|f| !f.is_empty())
    }

    /// The tuple native back/forward reconciliation matches on.
    ///
    /// Hash alone is not enough: two pages in different directories may
    /// share a fragment identifier once the user has crossed directory
    /// boundaries and come back.
    pub fn location_key(&self) -> (&str, &str, &str) {
        (&self.directory, &self.filename, self.fragment().unwrap_or(""))
    }
}

// -----------------------------------------------------------------------
// Parsing
// -----------------------------------------------------------------------

/// Parse a URL reference. Deterministic, no I/O.
///
/// A bare fragment (`#id`) parses with empty directory and filename;
/// substituting the document location for those is the engine's job,
/// keeping this function DOM-free.
///
/// Fails with [`NavError::MalformedUrl`] when the reference carries an
/// unparseable scheme (e.g. `ht!tp://x`).
pub fn parse_url(raw: &str) -> Result<ParsedUrl> {
    let mut url = ParsedUrl::default();
    let mut rest = raw;

    if let Some(idx) = rest.find("://") {
        let scheme = &rest[..idx];
        if !is_valid_scheme(scheme) {
            return Err(NavError::MalformedUrl(raw.to_string()));
        }
        url.protocol = format!("{}:", scheme.to_ascii_lowercase());
        rest = &rest[idx + 3..];
        let authority_end = rest
            .find(['/', '?', '#'])
            .unwrap_or(rest.len());
        url.host = rest[..authority_end].to_string();
        rest = &rest[authority_end..];
    } else if let Some(after) = rest.strip_prefix("//") {
        // Scheme-relative authority form.
        let authority_end = after.find(['/', '?', '#']).unwrap_or(after.len());
        url.host = after[..authority_end].to_string();
        rest = &after[authority_end..];
    }

    if let Some(idx) = rest.find('#') {
        url.hash = rest[idx..].to_string();
        rest = &rest[..idx];
    }
    if let Some(idx) = rest.find('?') {
        url.search = rest[idx..].to_string();
        rest = &rest[..idx];
    }

    // An authority with no path is the root path.
    let path = if rest.is_empty() && !url.host.is_empty() {
        "/"
    } else {
        rest
    };
    let (directory, filename) = split_path(path);
    url.directory = directory.to_string();
    url.filename = filename.to_string();

    Ok(url)
}

/// Split a pathname at the last slash: `(directory, filename)`.
fn split_path(path: &str) -> (&str, &str) {
    match path.rfind('/') {
        Some(idx) => path.split_at(idx + 1),
        None => ("", path),
    }
}

fn is_valid_scheme(scheme: &str) -> bool {
    let mut chars = scheme.chars();
    match chars.next() {
        Some(c) if c.is_ascii_alphabetic() => {},
        _ => return false,
    }
    chars.all(|c| c.is_ascii_alphanumeric() || matches!(c, '+' | '-' | '.'))
}

// -----------------------------------------------------------------------
// Reference classification
// -----------------------------------------------------------------------

/// True iff the reference is a bare fragment identifier with no path
/// component: these denote internal pages (markup already in the
/// current document) and never trigger a load.
pub fn is_page_id(reference: &str) -> bool {
    match reference.strip_prefix('#') {
        Some(id) => !id.is_empty() && !id.contains(['/', '?', '#']),
        None => false,
    }
}

/// True for path references that must be resolved against a base
/// directory before use: not empty, no scheme or authority, not
/// rooted, not fragment-only, not query-only.
pub fn is_relative(reference: &str) -> bool {
    !reference.is_empty()
        && !reference.starts_with(['/', '#', '?'])
        && !reference.starts_with("//")
        && !has_scheme(reference)
}

/// True for rooted paths (`/app/...`).
pub fn is_absolute_path(reference: &str) -> bool {
    reference.starts_with('/') && !reference.starts_with("//")
}

fn has_scheme(reference: &str) -> bool {
    match reference.find("://") {
        Some(idx) => is_valid_scheme(&reference[..idx]),
        None => false,
    }
}

// -----------------------------------------------------------------------
// Resolution
// -----------------------------------------------------------------------

/// Resolve a relative path against a base directory, collapsing `.`
/// and `..` segments. The output never contains residual dot segments.
///
/// The base must be a *directory* (trailing slash); resolving against
/// the wrong base is exactly the bug this engine exists to prevent, so
/// callers always pass the active page's directory, never the
/// document's.
pub fn make_path_absolute(relative: &str, base_directory: &str) -> String {
    let joined = if relative.starts_with('/') {
        relative.to_string()
    } else {
        format!("{base_directory}{relative}")
    };
    collapse_dot_segments(&joined)
}

/// Resolve any reference form against a base URL: fragment-only and
/// query-only references keep the base's path, relative paths resolve
/// against the base's directory, and already-absolute references pass
/// through untouched.
pub fn make_url_absolute(reference: &str, base: &ParsedUrl) -> Result<ParsedUrl> {
    let parsed = parse_url(reference)?;
    if !parsed.protocol.is_empty() || !parsed.host.is_empty() {
        return Ok(parsed);
    }

    let mut resolved = base.clone();
    if parsed.is_bare_fragment() {
        resolved.hash = parsed.hash;
        return Ok(resolved);
    }
    if parsed.directory.is_empty() && parsed.filename.is_empty() {
        // Query-only (`?foo=1`) reference.
        resolved.search = parsed.search;
        resolved.hash = parsed.hash;
        return Ok(resolved);
    }

    let absolute = make_path_absolute(&parsed.pathname(), &base.directory);
    let (directory, filename) = split_path(&absolute);
    resolved.directory = directory.to_string();
    resolved.filename = filename.to_string();
    resolved.search = parsed.search;
    resolved.hash = parsed.hash;
    Ok(resolved)
}

fn collapse_dot_segments(path: &str) -> String {
    let rooted = path.starts_with('/');
    // A path ending in a dot segment names a directory.
    let dir_result =
        path.ends_with('/') || path.ends_with("/..") || path.ends_with("/.") || path == ".." || path == ".";

    let mut stack: Vec<&str> = Vec::new();
    for segment in path.split('/') {
        match segment {
            "" | "." => {},
            ".." => {
                stack.pop();
            },
            seg => stack.push(seg),
        }
    }

    let mut out = String::new();
    if rooted {
        out.push('/');
    }
    out.push_str(&stack.join("/"));
    if dir_result && !out.ends_with('/') {
        out.push('/');
    }
    out
}

// -----------------------------------------------------------------------
// Query encoding
// -----------------------------------------------------------------------

/// Build an `application/x-www-form-urlencoded` query string (without
/// the leading `?`) from field name/value pairs.
pub fn encode_query(fields: &[(String, String)]) -> String {
    fields
        .iter()
        .map(|(name, value)| format!("{}={}", encode_component(name), encode_component(value)))
        .collect::<Vec<_>>()
        .join("&")
}

fn encode_component(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    for byte in raw.bytes() {
        match byte {
            b'A'..=b'Z' | b'a'..=b'z' | b'0'..=b'9' | b'-' | b'_' | b'.' | b'~' => {
                out.push(byte as char);
            },
            b' ' => out.push('+'),
            _ => out.push_str(&format!("%{byte:02X}")),
        }
    }
    out
}
