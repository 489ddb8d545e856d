//! Extraction of referenced class names from field descriptors and generic
//! `Signature` attributes (spec.md §4.1 step 9).
//!
//! The grammar is intentionally loose — it is run over raw descriptor/
//! signature text rather than through a full signature parse (that's
//! `classgraph-signature`'s job, and it isn't used by the graph). A leading
//! `+`/`-` is only meaningful inside `<...>` type-argument wildcards, but
//! per spec.md §9's Open Question (b) this implementation accepts them
//! uniformly, mirroring the regex exactly rather than special-casing
//! wildcard context.

use regex::Regex;
use std::sync::OnceLock;

fn pattern() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"(?:^\[*|[;<]+)[+-]?L([^;<>*]+)").unwrap())
}

/// Every class name referenced by a field descriptor or generic signature
/// string, normalized to dotted form. Order follows first occurrence in
/// `text`; duplicates are not deduplicated here (the caller folds them into
/// a set).
pub fn referenced_class_names(text: &str) -> Vec<String> {
    pattern()
        .captures_iter(text)
        .map(|c| c[1].replace('/', "."))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn plain_object_descriptor() {
        assert_eq!(referenced_class_names("Lp/C;"), vec!["p.C"]);
    }

    #[test]
    fn array_of_object() {
        assert_eq!(referenced_class_names("[Lp/C;"), vec!["p.C"]);
    }

    #[test]
    fn generic_signature_with_type_arguments() {
        assert_eq!(
            referenced_class_names("Ljava/util/List<Lp/Element;>;"),
            vec!["java.util.List", "p.Element"]
        );
    }

    #[test]
    fn wildcard_bounds() {
        assert_eq!(
            referenced_class_names("Ljava/util/List<+Lp/Upper;>;"),
            vec!["java.util.List", "p.Upper"]
        );
    }

    #[test]
    fn primitive_descriptor_has_no_matches() {
        assert!(referenced_class_names("I").is_empty());
    }
}
