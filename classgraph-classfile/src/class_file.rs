//! The classfile decoder proper (spec.md §4.1).

use std::collections::{HashMap, HashSet};
use std::io::Read;

use classgraph_scanspec::{ConstantValue, LogLevel, LogRecord, ScanSpec};

use crate::access_flags::{ClassAccessFlags, FieldAccessFlags};
use crate::annotations::read_annotation;
use crate::constant_pool::ConstantPool;
use crate::decoded::{ClassKind, ClassNameRegistry, DecodeOutcome, DecodedClass};
use crate::error::{self, ClassFileError};
use crate::field_types::referenced_class_names;
use crate::stream::ClassFileStream;

/// The fixed 4-byte magic every classfile must begin with.
pub const CLASS_MAGIC: u32 = 0xCAFE_BABE;

/// The root of the class hierarchy; the decoder emits no record for it
/// (spec.md §4.1 step 5).
pub const ROOT_CLASS_NAME: &str = "java.lang.Object";

const ATTR_CONSTANT_VALUE: &str = "ConstantValue";
const ATTR_RUNTIME_VISIBLE_ANNOTATIONS: &str = "RuntimeVisibleAnnotations";
const ATTR_SIGNATURE: &str = "Signature";

/// Decode one classfile from `reader`.
///
/// `relative_path`, if given, is the archive-relative path of this entry
/// (e.g. `p/C.class`); if the decoded FQN doesn't match it the file is
/// rejected (spec.md §4.1 "Error conditions").
pub fn decode<R: Read>(
    reader: &mut R,
    relative_path: Option<&str>,
    scan_spec: &ScanSpec,
    registry: &dyn ClassNameRegistry,
) -> error::Result<DecodeOutcome> {
    let mut s = ClassFileStream::new(reader);

    // 1. Magic.
    let magic = s.read_u4()?;
    if magic != CLASS_MAGIC {
        return Err(ClassFileError::BadMagicNumber(magic));
    }

    // 2. Versions — skipped, not needed by the graph.
    let _minor_version = s.read_u2()?;
    let _major_version = s.read_u2()?;

    // 3. Constant pool.
    let cp = ConstantPool::read_from_stream(&mut s)?;

    // 4. Access flags.
    let access_flags_raw = s.read_u2()?;
    let access_flags = ClassAccessFlags::from_bits(access_flags_raw)
        .ok_or(ClassFileError::BadClassAccessFlags(access_flags_raw))?;
    let kind = classify(access_flags);

    // 5. This-class name.
    let this_class_index = s.read_u2()?;
    let name = cp
        .class_name(this_class_index)?
        .ok_or(ClassFileError::ConstantPoolEntryWrongKind(this_class_index, "Class"))?;

    if name == ROOT_CLASS_NAME {
        return Ok(DecodeOutcome::RootClass);
    }

    if let Some(path) = relative_path {
        let expected = path.strip_suffix(".class").unwrap_or(path).replace('/', ".");
        if expected != name {
            return Err(ClassFileError::NameDoesNotMatchPath {
                fqn: name,
                path: path.to_string(),
            });
        }
    }

    // 6. Masking check.
    if !registry.try_register(&name) {
        return Ok(DecodeOutcome::Masked { fqn: name });
    }

    // 7. Superclass.
    let super_class_index = s.read_u2()?;
    let superclass_name = cp.class_name(super_class_index)?;

    // 8. Interfaces.
    let interfaces_count = s.read_u2()?;
    let mut interface_names = Vec::with_capacity(interfaces_count as usize);
    for _ in 0..interfaces_count {
        let idx = s.read_u2()?;
        if let Some(n) = cp.class_name(idx)? {
            interface_names.push(n);
        }
    }

    // 9. Fields.
    let mut field_type_names = HashSet::new();
    let mut static_final_field_values = HashMap::new();
    let fields_count = s.read_u2()?;
    for _ in 0..fields_count {
        decode_field(
            &mut s,
            &cp,
            &name,
            scan_spec,
            &mut field_type_names,
            &mut static_final_field_values,
        )?;
    }

    // 10. Methods — read-and-skip entirely; the core never inspects method
    // bodies or signatures (spec.md §1 Non-goals).
    let methods_count = s.read_u2()?;
    for _ in 0..methods_count {
        skip_method(&mut s)?;
    }

    // 11. Class attributes.
    let mut annotation_names = HashSet::new();
    let attributes_count = s.read_u2()?;
    for _ in 0..attributes_count {
        let attr_name_index = s.read_u2()?;
        let attr_name = cp.utf8(attr_name_index)?.to_string();
        let length = s.read_u4()?;
        if attr_name == ATTR_RUNTIME_VISIBLE_ANNOTATIONS {
            let num_annotations = s.read_u2()?;
            for _ in 0..num_annotations {
                if let Some(type_name) = read_annotation(&mut s, &cp)? {
                    annotation_names.insert(type_name);
                }
            }
        } else {
            s.skip(length as usize)?;
        }
    }

    Ok(DecodeOutcome::Accepted(DecodedClass {
        name,
        kind,
        superclass_name,
        interface_names,
        annotation_names,
        field_type_names,
        static_final_field_values,
    }))
}

fn classify(flags: ClassAccessFlags) -> ClassKind {
    if flags.contains(ClassAccessFlags::ACC_ANNOTATION) {
        ClassKind::Annotation
    } else if flags.contains(ClassAccessFlags::ACC_INTERFACE) {
        ClassKind::Interface
    } else {
        ClassKind::StandardClass
    }
}

#[allow(clippy::too_many_arguments)]
fn decode_field<R: Read>(
    s: &mut ClassFileStream<R>,
    cp: &ConstantPool,
    class_name: &str,
    scan_spec: &ScanSpec,
    field_type_names: &mut HashSet<String>,
    static_final_field_values: &mut HashMap<String, ConstantValue>,
) -> error::Result<()> {
    let access_flags_raw = s.read_u2()?;
    let access_flags = FieldAccessFlags::from_bits(access_flags_raw)
        .ok_or(ClassFileError::BadFieldAccessFlags(access_flags_raw))?;
    let name_index = s.read_u2()?;
    let field_name = cp.utf8(name_index)?.to_string();
    let descriptor_index = s.read_u2()?;
    let descriptor = cp.utf8(descriptor_index)?.to_string();

    if scan_spec.enable_field_scanning {
        for referenced in referenced_class_names(&descriptor) {
            if scan_spec.path_filter.is_whitelisted(&referenced) {
                field_type_names.insert(referenced);
            }
        }
    }

    let wants_value = scan_spec.wants_static_final_field(class_name, &field_name);
    let mut found_constant_value = false;

    let attributes_count = s.read_u2()?;
    for _ in 0..attributes_count {
        let attr_name_index = s.read_u2()?;
        let attr_name = cp.utf8(attr_name_index)?.to_string();
        let length = s.read_u4()?;

        match attr_name.as_str() {
            ATTR_CONSTANT_VALUE if access_flags.is_static_final() && wants_value => {
                let constantvalue_index = s.read_u2()?;
                let value = coerce_constant_value(&descriptor, constantvalue_index, cp)?;
                scan_spec.deliver_static_final_field(class_name, &field_name, &value);
                static_final_field_values.insert(field_name.clone(), value);
                found_constant_value = true;
            }
            ATTR_SIGNATURE if scan_spec.enable_field_scanning => {
                let signature_index = s.read_u2()?;
                let signature = cp.utf8(signature_index)?;
                for referenced in referenced_class_names(signature) {
                    if scan_spec.path_filter.is_whitelisted(&referenced) {
                        field_type_names.insert(referenced);
                    }
                }
            }
            _ => {
                s.skip(length as usize)?;
            }
        }
    }

    // Open question (a) in spec.md §9: emit at most one diagnostic for a
    // requested static-final field that turned out not to be
    // constant-initialized, instead of once per non-`ConstantValue`
    // attribute on the field.
    if wants_value && !found_constant_value {
        scan_spec.log(LogRecord::new(
            LogLevel::Warn,
            0,
            format!(
                "static final field {class_name}.{field_name} was requested for constant \
                 capture but has no ConstantValue attribute"
            ),
        ));
    }

    Ok(())
}

fn coerce_constant_value(descriptor: &str, index: u16, cp: &ConstantPool) -> error::Result<ConstantValue> {
    Ok(match descriptor {
        "B" => ConstantValue::Byte(cp.integer(index)? as i8),
        "C" => ConstantValue::Char(cp.integer(index)? as u16),
        "S" => ConstantValue::Short(cp.integer(index)? as i16),
        "Z" => ConstantValue::Boolean(cp.integer(index)? != 0),
        "I" => ConstantValue::Int(cp.integer(index)?),
        "J" => ConstantValue::Long(cp.long(index)?),
        "F" => ConstantValue::Float(cp.float(index)?),
        "D" => ConstantValue::Double(cp.double(index)?),
        _ => ConstantValue::String(cp.string_constant(index)?),
    })
}

fn skip_method<R: Read>(s: &mut ClassFileStream<R>) -> error::Result<()> {
    let _access_flags = s.read_u2()?;
    let _name_index = s.read_u2()?;
    let _descriptor_index = s.read_u2()?;
    let attributes_count = s.read_u2()?;
    for _ in 0..attributes_count {
        let _attr_name_index = s.read_u2()?;
        let length = s.read_u4()?;
        s.skip(length as usize)?;
    }
    Ok(())
}
