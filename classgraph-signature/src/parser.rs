//! Recursive-descent parser over the productions sketched in spec.md §4.4.
//! Every `parse_*` function takes a `&mut Cursor` positioned at the start of
//! its production and leaves it just past the end of what it consumed;
//! nothing here ever panics or throws — parse failures are [`SignatureError`]
//! values the caller can match on or propagate with `?`.

use crate::ast::*;
use crate::cursor::Cursor;
use crate::error::{Result, SignatureError};

/// Parses a complete field signature (always a reference type).
pub fn parse_field_signature(text: &str) -> Result<ReferenceTypeSignature> {
    let mut cursor = Cursor::new(text);
    let result = parse_reference_type_signature(&mut cursor)?;
    require_exhausted(&cursor)?;
    Ok(result)
}

/// Parses a complete method signature.
pub fn parse_method_signature(text: &str) -> Result<MethodSignature> {
    let mut cursor = Cursor::new(text);
    let result = parse_method_signature_inner(&mut cursor)?;
    require_exhausted(&cursor)?;
    Ok(result)
}

/// Parses a complete class signature.
pub fn parse_class_signature(text: &str) -> Result<ClassSignature> {
    let mut cursor = Cursor::new(text);
    let result = parse_class_signature_inner(&mut cursor)?;
    require_exhausted(&cursor)?;
    Ok(result)
}

fn require_exhausted(cursor: &Cursor) -> Result<()> {
    if cursor.is_at_end() {
        Ok(())
    } else {
        Err(SignatureError::TrailingInput(cursor.position()))
    }
}

fn parse_type_signature(cursor: &mut Cursor) -> Result<TypeSignature> {
    cursor.require_not_at_end()?;
    let c = cursor.peek().unwrap();
    if let Some(base) = BaseType::from_code(c) {
        cursor.advance();
        return Ok(TypeSignature::Base(base));
    }
    match c {
        'L' | 'T' | '[' => Ok(TypeSignature::Reference(parse_reference_type_signature(cursor)?)),
        other => Err(SignatureError::UnexpectedChar { expected: 'L', found: other, pos: cursor.position() }),
    }
}

fn parse_reference_type_signature(cursor: &mut Cursor) -> Result<ReferenceTypeSignature> {
    cursor.require_not_at_end()?;
    match cursor.peek().unwrap() {
        'L' => Ok(ReferenceTypeSignature::Class(parse_class_type_signature(cursor)?)),
        'T' => {
            cursor.advance();
            let name = cursor.take_while(|c| c != ';');
            cursor.expect(';')?;
            Ok(ReferenceTypeSignature::TypeVariable(name))
        }
        '[' => {
            cursor.advance();
            Ok(ReferenceTypeSignature::Array(Box::new(parse_type_signature(cursor)?)))
        }
        other => Err(SignatureError::UnexpectedChar { expected: 'L', found: other, pos: cursor.position() }),
    }
}

fn parse_class_type_signature(cursor: &mut Cursor) -> Result<ClassTypeSignature> {
    cursor.expect('L')?;
    let outer = parse_simple_class_type_signature(cursor)?;
    let mut suffixes = Vec::new();
    while cursor.consume_if('.') {
        suffixes.push(parse_simple_class_type_signature(cursor)?);
    }
    cursor.expect(';')?;
    Ok(ClassTypeSignature { outer, suffixes })
}

fn parse_simple_class_type_signature(cursor: &mut Cursor) -> Result<SimpleClassTypeSignature> {
    let raw = cursor.take_while(|c| c != ';' && c != '.' && c != '<');
    let name = raw.replace('/', ".");
    let type_arguments = if cursor.peek() == Some('<') { parse_type_arguments(cursor)? } else { Vec::new() };
    Ok(SimpleClassTypeSignature { name, type_arguments })
}

fn parse_type_arguments(cursor: &mut Cursor) -> Result<Vec<TypeArgument>> {
    cursor.expect('<')?;
    let mut args = Vec::new();
    while cursor.peek() != Some('>') {
        cursor.require_not_at_end()?;
        args.push(parse_type_argument(cursor)?);
    }
    cursor.expect('>')?;
    Ok(args)
}

fn parse_type_argument(cursor: &mut Cursor) -> Result<TypeArgument> {
    match cursor.peek() {
        Some('*') => {
            cursor.advance();
            Ok(TypeArgument::Wildcard)
        }
        Some('+') => {
            cursor.advance();
            Ok(TypeArgument::Extends(parse_reference_type_signature(cursor)?))
        }
        Some('-') => {
            cursor.advance();
            Ok(TypeArgument::Super(parse_reference_type_signature(cursor)?))
        }
        _ => Ok(TypeArgument::Exact(parse_reference_type_signature(cursor)?)),
    }
}

fn parse_type_parameters(cursor: &mut Cursor) -> Result<Vec<TypeParameter>> {
    if cursor.peek() != Some('<') {
        return Ok(Vec::new());
    }
    cursor.expect('<')?;
    let mut params = Vec::new();
    while cursor.peek() != Some('>') {
        cursor.require_not_at_end()?;
        params.push(parse_type_parameter(cursor)?);
    }
    cursor.expect('>')?;
    Ok(params)
}

fn parse_type_parameter(cursor: &mut Cursor) -> Result<TypeParameter> {
    let name = cursor.take_while(|c| c != ':');
    cursor.expect(':')?;
    let class_bound = match cursor.peek() {
        Some('L') | Some('[') | Some('T') => Some(parse_reference_type_signature(cursor)?),
        _ => None,
    };
    let mut interface_bounds = Vec::new();
    while cursor.consume_if(':') {
        interface_bounds.push(parse_reference_type_signature(cursor)?);
    }
    Ok(TypeParameter { name, class_bound, interface_bounds })
}

fn parse_method_signature_inner(cursor: &mut Cursor) -> Result<MethodSignature> {
    let type_parameters = parse_type_parameters(cursor)?;
    cursor.expect('(')?;
    let mut parameter_types = Vec::new();
    while cursor.peek() != Some(')') {
        cursor.require_not_at_end()?;
        parameter_types.push(parse_type_signature(cursor)?);
    }
    cursor.expect(')')?;
    let return_type = parse_type_signature(cursor)?;

    let mut throws = Vec::new();
    while cursor.consume_if('^') {
        throws.push(match cursor.peek() {
            Some('T') => {
                cursor.advance();
                let name = cursor.take_while(|c| c != ';');
                cursor.expect(';')?;
                ThrowsSignature::TypeVariable(name)
            }
            _ => ThrowsSignature::Class(parse_class_type_signature(cursor)?),
        });
    }

    Ok(MethodSignature { type_parameters, parameter_types, return_type, throws })
}

fn parse_class_signature_inner(cursor: &mut Cursor) -> Result<ClassSignature> {
    let type_parameters = parse_type_parameters(cursor)?;
    let superclass = parse_class_type_signature(cursor)?;
    let mut superinterfaces = Vec::new();
    while cursor.peek() == Some('L') {
        superinterfaces.push(parse_class_type_signature(cursor)?);
    }
    Ok(ClassSignature { type_parameters, superclass, superinterfaces })
}
