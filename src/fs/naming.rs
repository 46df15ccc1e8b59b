//! Filename sanitization for untrusted course and material names.

/// Map a raw, untrusted display name to a filesystem-safe one.
///
/// Replaces every character illegal on common filesystems with `_`, then
/// percent-decodes the result so names the origin returned already escaped
/// become human-readable. Total and deterministic: never fails, and two
/// distinct inputs may collapse to the same output (callers accept the
/// ambiguity).
#[must_use]
pub fn sanitize(raw_name: &str) -> String {
    let replaced: String = raw_name
        .chars()
        .map(|c| match c {
            '<' | '>' | ':' | '"' | '/' | '\\' | '|' | '?' | '*' => '_',
            c if c.is_control() => '_',
            c => c,
        })
        .collect();

    urlencoding::decode(&replaced)
        .map(|decoded| decoded.into_owned())
        .unwrap_or(replaced)
}
