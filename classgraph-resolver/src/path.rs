//! Classpath-element path grammar (spec.md §4.2 "Path normalization", §6
//! "Path grammar"): `p0 [! p1 [! p2 ...]]`, `/` as the intra-archive
//! separator, `!` as the archive-boundary separator.

/// A parsed `!`-delimited classpath-element path. `outer` is a filesystem
/// path or a `http(s)://` URL; `inner` is the (possibly empty) chain of
/// entry paths inside successively nested archives.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClasspathPath {
    pub outer: String,
    pub inner: Vec<String>,
}

impl ClasspathPath {
    pub fn parse(path: &str) -> Self {
        let normalized = strip_trailing_boundary(path);
        let mut segments = normalized.split('!');
        let outer = segments.next().unwrap_or("").to_string();
        let inner = segments
            .map(|segment| segment.strip_prefix('/').unwrap_or(segment).to_string())
            .collect();
        Self { outer, inner }
    }

    pub fn is_remote(&self) -> bool {
        self.outer.starts_with("http://") || self.outer.starts_with("https://")
    }

    /// Reassembles the canonical string form, e.g. for re-querying the
    /// resolver after the outer segment has been canonicalized.
    pub fn to_path_string(&self) -> String {
        let mut s = self.outer.clone();
        for segment in &self.inner {
            s.push('!');
            s.push_str(segment);
        }
        s
    }

    /// `true` if this path has at least one nested-archive segment.
    pub fn has_inner_segments(&self) -> bool {
        !self.inner.is_empty()
    }
}

/// Strips any trailing `!`, `!/`, `/!`, `/!/` (spec.md §6).
fn strip_trailing_boundary(path: &str) -> &str {
    let mut s = path;
    loop {
        let stripped = s
            .strip_suffix("/!/")
            .or_else(|| s.strip_suffix("/!"))
            .or_else(|| s.strip_suffix("!/"))
            .or_else(|| s.strip_suffix('!'));
        match stripped {
            Some(next) => s = next,
            None => return s,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn plain_filesystem_path_has_no_inner_segments() {
        let p = ClasspathPath::parse("/a/b/c.jar");
        assert_eq!(p.outer, "/a/b/c.jar");
        assert!(p.inner.is_empty());
    }

    #[test]
    fn nested_archive_chain_splits_on_bang() {
        let p = ClasspathPath::parse("outer.jar!BOOT-INF/classes!inner.jar");
        assert_eq!(p.outer, "outer.jar");
        assert_eq!(p.inner, vec!["BOOT-INF/classes".to_string(), "inner.jar".to_string()]);
    }

    #[test]
    fn trailing_boundary_variants_are_stripped() {
        for suffix in ["!", "!/", "/!", "/!/"] {
            let p = ClasspathPath::parse(&format!("a.jar{suffix}"));
            assert_eq!(p.outer, "a.jar", "suffix {suffix:?}");
            assert!(p.inner.is_empty(), "suffix {suffix:?}");
        }
    }

    #[test]
    fn leading_slash_on_inner_segment_is_removed() {
        let p = ClasspathPath::parse("outer.jar!/p/C.class");
        assert_eq!(p.inner, vec!["p/C.class".to_string()]);
    }

    #[test]
    fn remote_outer_segment_is_detected() {
        assert!(ClasspathPath::parse("https://example.com/a.jar").is_remote());
        assert!(!ClasspathPath::parse("/a.jar").is_remote());
    }
}
