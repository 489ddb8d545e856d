//! Annotation decoding (spec.md §4.1a).
//!
//! Element values are parsed only to consume their exact byte length; the
//! decoder records nothing but the annotation's type name. Annotations in
//! the reserved meta-annotation package (`java.lang.annotation`, the
//! language's own retention/target/documented markers) are dropped at this
//! boundary and never reach a [`crate::decoded::DecodedClass`].

use std::io::Read;

use crate::constant_pool::ConstantPool;
use crate::error::{self, ClassFileError};
use crate::stream::ClassFileStream;

/// The package prefix of the JVM's own meta-annotation markers
/// (`@Retention`, `@Target`, `@Documented`, `@Inherited`, ...).
pub const META_ANNOTATION_PACKAGE: &str = "java.lang.annotation";

pub fn is_meta_annotation(type_name: &str) -> bool {
    type_name == META_ANNOTATION_PACKAGE
        || type_name.starts_with(&format!("{META_ANNOTATION_PACKAGE}."))
}

/// Parse one `annotation` structure (JVM spec §4.7.16.1), returning its type
/// name with meta-annotations filtered out (returns `None` for those).
pub fn read_annotation<R: Read>(s: &mut ClassFileStream<R>, cp: &ConstantPool) -> error::Result<Option<String>> {
    let type_index = s.read_u2()?;
    let descriptor = cp.utf8(type_index)?;
    let type_name = descriptor_to_class_name(descriptor);

    let num_pairs = s.read_u2()?;
    for _ in 0..num_pairs {
        let _element_name_index = s.read_u2()?;
        skip_element_value(s, cp)?;
    }

    if is_meta_annotation(&type_name) {
        Ok(None)
    } else {
        Ok(Some(type_name))
    }
}

/// Consume one `element_value` structure without retaining its value
/// (spec.md §4.1a: "element values are traversed for byte-accuracy only").
fn skip_element_value<R: Read>(s: &mut ClassFileStream<R>, cp: &ConstantPool) -> error::Result<()> {
    let tag = s.read_u1()? as char;
    match tag {
        'B' | 'C' | 'D' | 'F' | 'I' | 'J' | 'S' | 'Z' | 's' => {
            s.read_u2()?;
        }
        'e' => {
            s.read_u2()?; // type_name_index
            s.read_u2()?; // const_name_index
        }
        'c' => {
            s.read_u2()?; // class_info_index
        }
        '@' => {
            read_annotation(s, cp)?;
        }
        '[' => {
            let count = s.read_u2()?;
            for _ in 0..count {
                skip_element_value(s, cp)?;
            }
        }
        other => return Err(ClassFileError::UnknownElementValueTag(other)),
    }
    Ok(())
}

/// Strips the leading `L` and trailing `;` of a class-type descriptor
/// (`Lpkg/Cls;`) and normalizes `/` to `.`.
fn descriptor_to_class_name(descriptor: &str) -> String {
    let inner = descriptor
        .strip_prefix('L')
        .and_then(|s| s.strip_suffix(';'))
        .unwrap_or(descriptor);
    inner.replace('/', ".")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn meta_annotation_package_detected() {
        assert!(is_meta_annotation("java.lang.annotation.Retention"));
        assert!(is_meta_annotation("java.lang.annotation"));
        assert!(!is_meta_annotation("java.lang.annotationX.Foo"));
        assert!(!is_meta_annotation("p.MyAnnotation"));
    }

    #[test]
    fn descriptor_strips_l_and_semicolon() {
        assert_eq!(descriptor_to_class_name("Lp/Outer;"), "p.Outer");
    }
}
