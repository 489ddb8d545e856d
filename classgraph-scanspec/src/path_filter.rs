//! Whitelist/blacklist package-prefix matching.
//!
//! Names are accepted in either dotted (`com.example.Foo`) or slash-separated
//! (`com/example/Foo`) form; matching always normalizes to dots first.

/// A whitelist/blacklist pair of package-prefix patterns.
///
/// A name is whitelisted if it falls under some whitelist prefix (or the
/// whitelist is empty, meaning "everything") and does not fall under any
/// blacklist prefix. Blacklist always wins over whitelist.
#[derive(Debug, Clone, Default)]
pub struct PathFilter {
    whitelist: Vec<String>,
    blacklist: Vec<String>,
}

impl PathFilter {
    pub fn new(whitelist: impl IntoIterator<Item = String>, blacklist: impl IntoIterator<Item = String>) -> Self {
        Self {
            whitelist: whitelist.into_iter().map(|p| normalize(&p)).collect(),
            blacklist: blacklist.into_iter().map(|p| normalize(&p)).collect(),
        }
    }

    /// True if `fqn` (dotted or slash-separated) is whitelisted and not
    /// blacklisted.
    pub fn is_whitelisted(&self, fqn: &str) -> bool {
        let dotted = normalize(fqn);
        if self.blacklist.iter().any(|p| prefix_matches(p, &dotted)) {
            return false;
        }
        self.whitelist.is_empty() || self.whitelist.iter().any(|p| prefix_matches(p, &dotted))
    }
}

fn normalize(name: &str) -> String {
    name.replace('/', ".")
}

/// `prefix` matches `name` if `name` equals `prefix` or starts with
/// `prefix` followed by a `.` — a prefix match must land on a package
/// boundary, not split an identifier (`com.example` must not match
/// `com.exampleX`).
fn prefix_matches(prefix: &str, name: &str) -> bool {
    if prefix.is_empty() {
        return true;
    }
    name == prefix || (name.starts_with(prefix) && name[prefix.len()..].starts_with('.'))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_whitelist_accepts_everything_not_blacklisted() {
        let f = PathFilter::new([], ["com.excluded".to_string()]);
        assert!(f.is_whitelisted("com.example.Foo"));
        assert!(!f.is_whitelisted("com.excluded.Foo"));
    }

    #[test]
    fn whitelist_prefix_is_package_boundary_aware() {
        let f = PathFilter::new(["com.example".to_string()], []);
        assert!(f.is_whitelisted("com.example.Foo"));
        assert!(f.is_whitelisted("com.example"));
        assert!(!f.is_whitelisted("com.exampleX.Foo"));
        assert!(!f.is_whitelisted("com.other.Foo"));
    }

    #[test]
    fn slash_separated_input_is_normalized() {
        let f = PathFilter::new(["com.example".to_string()], []);
        assert!(f.is_whitelisted("com/example/Foo"));
    }

    #[test]
    fn blacklist_overrides_whitelist() {
        let f = PathFilter::new(
            ["com".to_string()],
            ["com.example.internal".to_string()],
        );
        assert!(f.is_whitelisted("com.example.Foo"));
        assert!(!f.is_whitelisted("com.example.internal.Bar"));
    }
}
