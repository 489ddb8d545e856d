//! Remote archive fetch (spec.md §4.2 "Remote fetch"): `http(s)://` segments
//! are downloaded to a temp file named by sanitizing the URL.

use std::io::Write;
use std::path::PathBuf;

use crate::error::ResolveError;
use crate::temp_registry::TempRegistry;

/// Downloads `url` to a uniquely-named temp file, registers it for cleanup,
/// and returns its path.
pub fn fetch_to_temp_file(url: &str, temp_registry: &TempRegistry) -> Result<PathBuf, ResolveError> {
    let mut response = ureq::get(url)
        .call()
        .map_err(|e| ResolveError::RemoteFetch { url: url.to_string(), message: e.to_string() })?;

    let bytes = response
        .body_mut()
        .read_to_vec()
        .map_err(|e| ResolveError::RemoteFetch { url: url.to_string(), message: e.to_string() })?;

    let suffix = sanitize_url_for_filename(url);
    let mut temp = tempfile::Builder::new()
        .prefix("classgraph-remote-")
        .suffix(&suffix)
        .tempfile()
        .map_err(|source| ResolveError::Io { path: url.to_string(), source })?;
    temp.write_all(&bytes).map_err(|source| ResolveError::Io { path: url.to_string(), source })?;
    let (_, temp_path) = temp.keep().map_err(|e| ResolveError::Io { path: url.to_string(), source: e.error })?;

    temp_registry.register(temp_path.clone());
    Ok(temp_path)
}

/// Derives a filesystem-safe suffix from `url` for the temp file's name —
/// anything that isn't alphanumeric, `.`, or `-` becomes `_`.
fn sanitize_url_for_filename(url: &str) -> String {
    let sanitized: String = url
        .chars()
        .map(|c| if c.is_ascii_alphanumeric() || c == '.' || c == '-' { c } else { '_' })
        .collect();
    format!("-{sanitized}")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sanitizes_special_characters() {
        let s = sanitize_url_for_filename("https://example.com/a/b.jar");
        assert!(!s.contains('/'));
        assert!(!s.contains(':'));
    }
}
