//! Exercises `classgraph::scan` end to end over real `.class` bytes written
//! to a temp directory, covering spec.md §8 scenario 1 (single interface,
//! single implementer) and scenario 2 (transitive subclass inheritance).

mod common;

use classgraph_scanspec::ScanSpec;
use common::{write_class, ClassFileBuilder};

#[test]
fn single_interface_single_implementer_end_to_end() {
    let dir = tempfile::tempdir().unwrap();

    let mut iface = ClassFileBuilder::interface();
    let iface_this = iface.class("p.I");
    let object_class = iface.class("java.lang.Object");
    iface.this_class = iface_this;
    iface.super_class = object_class;
    write_class(dir.path(), "p/I.class", iface.build());

    let mut class = ClassFileBuilder::new();
    let class_this = class.class("p.C");
    let class_super = class.class("java.lang.Object");
    let class_iface = class.class("p.I");
    class.this_class = class_this;
    class.super_class = class_super;
    class.interfaces.push(class_iface);
    write_class(dir.path(), "p/C.class", class.build());

    let spec = ScanSpec::builder().whitelist_packages(["p"]).build();
    let root = dir.path().to_str().unwrap().to_string();
    let result = classgraph::scan(&spec, &[root]).expect("scan succeeds");

    let names = result.all_class_names();
    assert!(names.contains(&"p.C".to_string()));
    assert!(names.contains(&"p.I".to_string()));

    let implementers = result.classes_implementing("p.I");
    assert_eq!(implementers, vec!["p.C".to_string()]);
    assert!(result.subclasses_of("p.C").is_empty());
    assert!(result.superinterfaces_of("p.I").is_empty());
}

#[test]
fn transitive_subclass_inherits_interface_end_to_end() {
    let dir = tempfile::tempdir().unwrap();

    let mut iface = ClassFileBuilder::interface();
    let iface_this = iface.class("p.I");
    let object_class = iface.class("java.lang.Object");
    iface.this_class = iface_this;
    iface.super_class = object_class;
    write_class(dir.path(), "p/I.class", iface.build());

    let mut base = ClassFileBuilder::new();
    let base_this = base.class("p.A");
    let base_super = base.class("java.lang.Object");
    let base_iface = base.class("p.I");
    base.this_class = base_this;
    base.super_class = base_super;
    base.interfaces.push(base_iface);
    write_class(dir.path(), "p/A.class", base.build());

    let mut mid = ClassFileBuilder::new();
    let mid_this = mid.class("p.B");
    let mid_super = mid.class("p.A");
    mid.this_class = mid_this;
    mid.super_class = mid_super;
    write_class(dir.path(), "p/B.class", mid.build());

    let mut leaf = ClassFileBuilder::new();
    let leaf_this = leaf.class("p.C");
    let leaf_super = leaf.class("p.B");
    leaf.this_class = leaf_this;
    leaf.super_class = leaf_super;
    write_class(dir.path(), "p/C.class", leaf.build());

    let spec = ScanSpec::builder().whitelist_packages(["p"]).build();
    let root = dir.path().to_str().unwrap().to_string();
    let result = classgraph::scan(&spec, &[root]).expect("scan succeeds");

    let mut implementers = result.classes_implementing("p.I");
    implementers.sort();
    assert_eq!(implementers, vec!["p.A".to_string(), "p.B".to_string(), "p.C".to_string()]);

    let mut subclasses = result.subclasses_of("p.A");
    subclasses.sort();
    assert_eq!(subclasses, vec!["p.B".to_string(), "p.C".to_string()]);
}
