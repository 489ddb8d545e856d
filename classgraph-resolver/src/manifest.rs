//! `META-INF/MANIFEST.MF` parsing (spec.md §4.2 "Manifest parsing", §6
//! "Manifest grammar").

use std::collections::HashMap;

/// Substrings of `Implementation-Title` / `Specification-Title` that mark a
/// jar as part of the runtime itself (spec.md §4.2 "system-jar detection").
const SYSTEM_IMPLEMENTATION_TITLE_MARKER: &str = "Java Runtime Environment";
const SYSTEM_SPECIFICATION_TITLE_MARKER: &str = "Java Platform API Specification";

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ManifestInfo {
    pub class_path: Vec<String>,
    pub spring_boot_classes: Option<String>,
    pub spring_boot_lib: Option<String>,
    pub is_system_jar: bool,
}

/// Parses the three fields the resolver cares about out of a manifest's raw
/// text, joining continuation lines first.
pub fn parse(content: &str) -> ManifestInfo {
    let fields = unfold_fields(content);

    let class_path = fields
        .get("Class-Path")
        .map(|v| v.split_whitespace().map(str::to_string).collect())
        .unwrap_or_default();

    let is_system_jar = fields
        .get("Implementation-Title")
        .map(|v| v.contains(SYSTEM_IMPLEMENTATION_TITLE_MARKER))
        .unwrap_or(false)
        || fields
            .get("Specification-Title")
            .map(|v| v.contains(SYSTEM_SPECIFICATION_TITLE_MARKER))
            .unwrap_or(false);

    ManifestInfo {
        class_path,
        spring_boot_classes: fields.get("Spring-Boot-Classes").cloned(),
        spring_boot_lib: fields.get("Spring-Boot-Lib").cloned(),
        is_system_jar,
    }
}

/// Joins manifest continuation lines (spec.md §6: any of `CR`, `LF`, `CRLF`
/// followed by a single space continues the previous line) and splits the
/// result into `Key: Value` fields.
fn unfold_fields(content: &str) -> HashMap<String, String> {
    let normalized = content.replace("\r\n", "\n").replace('\r', "\n");

    let mut logical_lines: Vec<String> = Vec::new();
    for line in normalized.split('\n') {
        if let Some(continuation) = line.strip_prefix(' ') {
            if let Some(last) = logical_lines.last_mut() {
                last.push_str(continuation);
                continue;
            }
        }
        logical_lines.push(line.to_string());
    }

    logical_lines
        .into_iter()
        .filter_map(|line| line.split_once(": ").map(|(k, v)| (k.to_string(), v.to_string())))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn class_path_is_space_delimited() {
        let info = parse("Manifest-Version: 1.0\nClass-Path: a.jar b.jar\n");
        assert_eq!(info.class_path, vec!["a.jar".to_string(), "b.jar".to_string()]);
    }

    #[test]
    fn continuation_lines_are_joined() {
        let info = parse("Manifest-Version: 1.0\nClass-Path: a.jar b.\n jar c.jar\n");
        assert_eq!(info.class_path, vec!["a.jar".to_string(), "b.jar".to_string(), "c.jar".to_string()]);
    }

    #[test]
    fn crlf_continuation_is_joined() {
        let info = parse("Manifest-Version: 1.0\r\nSpring-Boot-Classes: BOOT-INF/cla\r\n sses/\r\n");
        assert_eq!(info.spring_boot_classes.as_deref(), Some("BOOT-INF/classes/"));
    }

    #[test]
    fn system_jar_detected_by_implementation_title() {
        let info = parse("Implementation-Title: Java Runtime Environment\n");
        assert!(info.is_system_jar);
    }

    #[test]
    fn ordinary_jar_is_not_system() {
        let info = parse("Implementation-Title: my-app\n");
        assert!(!info.is_system_jar);
    }
}
