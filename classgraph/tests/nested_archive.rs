//! spec.md §8 scenario 6: a Spring-Boot-layout jar with a nested lib jar is
//! resolved, its classes-root is detected, and the nested jar is extracted
//! and scanned too.

mod common;

use std::fs::File;
use std::io::{Cursor, Write};

use classgraph_scanspec::ScanSpec;
use common::simple_class;

#[test]
fn spring_boot_layout_with_nested_lib_jar() {
    let dir = tempfile::tempdir().unwrap();

    let mut inner_writer = zip::ZipWriter::new(Cursor::new(Vec::new()));
    inner_writer.start_file("q/B.class", zip::write::SimpleFileOptions::default()).unwrap();
    inner_writer.write_all(&simple_class("q.B")).unwrap();
    let inner_bytes = inner_writer.finish().unwrap().into_inner();

    let outer_path = dir.path().join("outer.jar");
    let outer_file = File::create(&outer_path).unwrap();
    let mut outer_writer = zip::ZipWriter::new(outer_file);
    outer_writer
        .start_file("BOOT-INF/classes/p/A.class", zip::write::SimpleFileOptions::default())
        .unwrap();
    outer_writer.write_all(&simple_class("p.A")).unwrap();
    outer_writer
        .start_file("BOOT-INF/lib/inner.jar", zip::write::SimpleFileOptions::default())
        .unwrap();
    outer_writer.write_all(&inner_bytes).unwrap();
    outer_writer.finish().unwrap();

    let spec = ScanSpec::builder().whitelist_packages(["p", "q"]).build();
    let root = outer_path.to_str().unwrap().to_string();
    let result = classgraph::scan(&spec, &[root]).expect("scan succeeds");

    let names = result.all_class_names();
    assert!(names.contains(&"p.A".to_string()), "expected p.A in {names:?}");
    assert!(names.contains(&"q.B".to_string()), "expected q.B in {names:?}");
}
