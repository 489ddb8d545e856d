//! Reconciling the programmer-view and JVM-internal-view parameter lists of
//! one method (spec.md §4.4 "Merge rule").
//!
//! The programmer view comes from `MethodParameters` / debug info and omits
//! compiler-synthesized parameters; the internal view is the method
//! descriptor itself and is always complete. The internal view's count is
//! canonical.

use crate::ast::TypeSignature;
use crate::error::{Result, SignatureError};

/// Parameter access flags from the `MethodParameters` attribute (JVM spec
/// §4.7.24) that mark a parameter as compiler-introduced.
pub const ACC_SYNTHETIC: u16 = 0x1000;
pub const ACC_MANDATED: u16 = 0x8000;

fn is_compiler_introduced(flags: u16) -> bool {
    flags & (ACC_SYNTHETIC | ACC_MANDATED) != 0
}

/// Merges `internal` (the method descriptor's parameter types, one
/// `internal_flags` entry per type) with `programmer` (the subset visible to
/// source-level reflection). Returns the merged list, ordered like
/// `internal`. Synthetic/mandated parameters are taken verbatim from
/// `internal`; every other parameter must structurally agree between the two
/// views under ["equal ignoring type parameters"](equal_ignoring_type_parameters),
/// or the merge is rejected.
pub fn merge_parameter_lists(
    internal: &[TypeSignature],
    internal_flags: &[u16],
    programmer: &[TypeSignature],
) -> Result<Vec<TypeSignature>> {
    if internal.len() != internal_flags.len() {
        return Err(SignatureError::MergeMismatch(format!(
            "internal parameter count {} does not match flag count {}",
            internal.len(),
            internal_flags.len()
        )));
    }

    let mut merged = Vec::with_capacity(internal.len());
    let mut programmer_iter = programmer.iter();

    for (internal_type, &flags) in internal.iter().zip(internal_flags) {
        if is_compiler_introduced(flags) {
            merged.push(internal_type.clone());
            continue;
        }
        let programmer_type = programmer_iter.next().ok_or_else(|| {
            SignatureError::MergeMismatch(
                "programmer-view parameter list has fewer entries than the internal view's \
                 non-synthetic parameters"
                    .to_string(),
            )
        })?;
        if !equal_ignoring_type_parameters(internal_type, programmer_type) {
            return Err(SignatureError::MergeMismatch(format!(
                "programmer view {programmer_type:?} disagrees with internal view {internal_type:?}"
            )));
        }
        merged.push(programmer_type.clone());
    }

    if programmer_iter.next().is_some() {
        return Err(SignatureError::MergeMismatch(
            "programmer-view parameter list has more entries than the internal view can account for"
                .to_string(),
        ));
    }

    Ok(merged)
}

/// Structural equality that disregards generic type arguments — a type
/// variable is considered compatible with anything, since its bound isn't
/// resolvable from a parameter type alone.
fn equal_ignoring_type_parameters(a: &TypeSignature, b: &TypeSignature) -> bool {
    use crate::ast::ReferenceTypeSignature as Ref;
    match (a, b) {
        (TypeSignature::Base(x), TypeSignature::Base(y)) => x == y,
        (TypeSignature::Reference(Ref::TypeVariable(_)), _) => true,
        (_, TypeSignature::Reference(Ref::TypeVariable(_))) => true,
        (TypeSignature::Reference(Ref::Array(x)), TypeSignature::Reference(Ref::Array(y))) => {
            equal_ignoring_type_parameters(x, y)
        }
        (TypeSignature::Reference(Ref::Class(x)), TypeSignature::Reference(Ref::Class(y))) => {
            x.full_name() == y.full_name()
        }
        _ => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::parse_field_signature;

    fn t(descriptor: &str) -> TypeSignature {
        if descriptor.len() == 1 {
            TypeSignature::Base(crate::ast::BaseType::from_code(descriptor.chars().next().unwrap()).unwrap())
        } else {
            TypeSignature::Reference(parse_field_signature(descriptor).unwrap())
        }
    }

    #[test]
    fn synthetic_leading_parameter_passes_through() {
        let internal = vec![t("Lp/Outer;"), t("I")];
        let flags = vec![ACC_SYNTHETIC, 0];
        let programmer = vec![t("I")];
        let merged = merge_parameter_lists(&internal, &flags, &programmer).unwrap();
        assert_eq!(merged, internal);
    }

    #[test]
    fn mismatched_non_synthetic_parameter_is_rejected() {
        let internal = vec![t("I")];
        let flags = vec![0];
        let programmer = vec![t("Lp/C;")];
        let err = merge_parameter_lists(&internal, &flags, &programmer).unwrap_err();
        assert!(matches!(err, SignatureError::MergeMismatch(_)));
    }

    #[test]
    fn equal_counts_with_no_synthetic_parameters_merge_cleanly() {
        let internal = vec![t("I"), t("Lp/C;")];
        let flags = vec![0, 0];
        let programmer = vec![t("I"), t("Lp/C;")];
        let merged = merge_parameter_lists(&internal, &flags, &programmer).unwrap();
        assert_eq!(merged.len(), 2);
    }
}
