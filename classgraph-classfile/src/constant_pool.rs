//! The constant pool (spec.md §4.1 step 3).
//!
//! Entries are 1-indexed; slot 0 is unused. `Long`/`Double` entries occupy
//! two logical slots — the slot immediately after them is left as
//! [`RawEntry::Unused`]. Decoding is two passes: the first pass reads every
//! entry's raw bytes (storing UTF-8 entries as decoded strings, everything
//! else as indices), the second pass resolves the indirect `Class`/`String`
//! entries against the UTF-8 entries they point at, which permits forward
//! references.

use std::io::Read;

use crate::error::{self, ClassFileError};
use crate::stream::ClassFileStream;

mod tags {
    pub const UTF8: u8 = 1;
    pub const INTEGER: u8 = 3;
    pub const FLOAT: u8 = 4;
    pub const LONG: u8 = 5;
    pub const DOUBLE: u8 = 6;
    pub const CLASS: u8 = 7;
    pub const STRING: u8 = 8;
    pub const FIELDREF: u8 = 9;
    pub const METHODREF: u8 = 10;
    pub const INTERFACE_METHODREF: u8 = 11;
    pub const NAME_AND_TYPE: u8 = 12;
    pub const METHOD_HANDLE: u8 = 15;
    pub const METHOD_TYPE: u8 = 16;
    pub const INVOKE_DYNAMIC: u8 = 18;
}

/// One raw constant-pool entry, before indirect resolution.
#[derive(Debug, Clone)]
pub enum RawEntry {
    Utf8(String),
    Integer(i32),
    Float(u32),
    Long(i64),
    Double(u64),
    Class { name_index: u16 },
    String { string_index: u16 },
    Fieldref { class_index: u16, name_and_type_index: u16 },
    Methodref { class_index: u16, name_and_type_index: u16 },
    InterfaceMethodref { class_index: u16, name_and_type_index: u16 },
    NameAndType { name_index: u16, descriptor_index: u16 },
    MethodHandle { reference_kind: u8, reference_index: u16 },
    MethodType { descriptor_index: u16 },
    InvokeDynamic { bootstrap_method_attr_index: u16, name_and_type_index: u16 },
    /// The slot after a `Long`/`Double` entry.
    Unused,
}

/// The decoded constant pool of one classfile.
#[derive(Debug)]
pub struct ConstantPool {
    /// 1-indexed; `entries[0]` is the `Unused` sentinel for slot 0.
    entries: Vec<RawEntry>,
    /// Resolved `Class`/`String` entries — `resolved[i]` is `Some` only for
    /// those two entry kinds, holding the dotted class name or the string
    /// constant's text.
    resolved: Vec<Option<String>>,
}

impl ConstantPool {
    pub fn read_from_stream<R: Read>(s: &mut ClassFileStream<R>) -> error::Result<Self> {
        let count = s.read_u2()?;
        let slots = count.saturating_sub(1) as usize;

        let mut entries = Vec::with_capacity(slots + 1);
        entries.push(RawEntry::Unused); // slot 0, unused

        let mut i = 0usize;
        while i < slots {
            let entry = read_entry(s)?;
            let occupies_two_slots = matches!(entry, RawEntry::Long(_) | RawEntry::Double(_));
            entries.push(entry);
            i += 1;
            if occupies_two_slots {
                entries.push(RawEntry::Unused);
                i += 1;
            }
        }
        // A Long/Double in the final slot can push `entries.len()` one past
        // `slots + 1`; that's fine, the out-of-range unused slot is never
        // addressed.

        let resolved = resolve_pass(&entries);
        Ok(Self { entries, resolved })
    }

    fn get(&self, index: u16) -> error::Result<&RawEntry> {
        self.entries
            .get(index as usize)
            .ok_or(ClassFileError::ConstantPoolIndexOutOfRange(index))
    }

    /// A UTF-8 constant's decoded text.
    pub fn utf8(&self, index: u16) -> error::Result<&str> {
        match self.get(index)? {
            RawEntry::Utf8(s) => Ok(s.as_str()),
            _ => Err(ClassFileError::ConstantPoolEntryWrongKind(index, "Utf8")),
        }
    }

    /// A `Class` constant's name, resolved to dotted form (`/` → `.`).
    /// Returns `None` if `index` is 0 (used for "no superclass", i.e.
    /// `java.lang.Object`).
    pub fn class_name(&self, index: u16) -> error::Result<Option<String>> {
        if index == 0 {
            return Ok(None);
        }
        match self.resolved.get(index as usize) {
            Some(Some(name)) => Ok(Some(name.clone())),
            _ => Err(ClassFileError::ConstantPoolEntryWrongKind(index, "Class")),
        }
    }

    /// A `String` constant's text.
    pub fn string_constant(&self, index: u16) -> error::Result<String> {
        match self.get(index)? {
            RawEntry::String { .. } => Ok(self.resolved[index as usize].clone().unwrap()),
            _ => Err(ClassFileError::ConstantPoolEntryWrongKind(index, "String")),
        }
    }

    pub fn integer(&self, index: u16) -> error::Result<i32> {
        match self.get(index)? {
            RawEntry::Integer(v) => Ok(*v),
            _ => Err(ClassFileError::ConstantPoolEntryWrongKind(index, "Integer")),
        }
    }

    pub fn float(&self, index: u16) -> error::Result<f32> {
        match self.get(index)? {
            RawEntry::Float(bits) => Ok(f32::from_bits(*bits)),
            _ => Err(ClassFileError::ConstantPoolEntryWrongKind(index, "Float")),
        }
    }

    pub fn long(&self, index: u16) -> error::Result<i64> {
        match self.get(index)? {
            RawEntry::Long(v) => Ok(*v),
            _ => Err(ClassFileError::ConstantPoolEntryWrongKind(index, "Long")),
        }
    }

    pub fn double(&self, index: u16) -> error::Result<f64> {
        match self.get(index)? {
            RawEntry::Double(bits) => Ok(f64::from_bits(*bits)),
            _ => Err(ClassFileError::ConstantPoolEntryWrongKind(index, "Double")),
        }
    }
}

fn read_entry<R: Read>(s: &mut ClassFileStream<R>) -> error::Result<RawEntry> {
    let tag = s.read_u1()?;
    match tag {
        tags::UTF8 => {
            let len = s.read_u2()?;
            let bytes = s.read_dynamic(len as usize)?;
            Ok(RawEntry::Utf8(String::from_utf8(bytes)?))
        }
        tags::INTEGER => Ok(RawEntry::Integer(s.read_u4()? as i32)),
        tags::FLOAT => Ok(RawEntry::Float(s.read_u4()?)),
        tags::LONG => Ok(RawEntry::Long(i64::from_be_bytes(s.read::<8>()?))),
        tags::DOUBLE => Ok(RawEntry::Double(u64::from_be_bytes(s.read::<8>()?))),
        tags::CLASS => Ok(RawEntry::Class { name_index: s.read_u2()? }),
        tags::STRING => Ok(RawEntry::String { string_index: s.read_u2()? }),
        tags::FIELDREF => Ok(RawEntry::Fieldref {
            class_index: s.read_u2()?,
            name_and_type_index: s.read_u2()?,
        }),
        tags::METHODREF => Ok(RawEntry::Methodref {
            class_index: s.read_u2()?,
            name_and_type_index: s.read_u2()?,
        }),
        tags::INTERFACE_METHODREF => Ok(RawEntry::InterfaceMethodref {
            class_index: s.read_u2()?,
            name_and_type_index: s.read_u2()?,
        }),
        tags::NAME_AND_TYPE => Ok(RawEntry::NameAndType {
            name_index: s.read_u2()?,
            descriptor_index: s.read_u2()?,
        }),
        tags::METHOD_HANDLE => Ok(RawEntry::MethodHandle {
            reference_kind: s.read_u1()?,
            reference_index: s.read_u2()?,
        }),
        tags::METHOD_TYPE => Ok(RawEntry::MethodType { descriptor_index: s.read_u2()? }),
        tags::INVOKE_DYNAMIC => Ok(RawEntry::InvokeDynamic {
            bootstrap_method_attr_index: s.read_u2()?,
            name_and_type_index: s.read_u2()?,
        }),
        other => Err(ClassFileError::UnknownConstantPoolTag(other)),
    }
}

/// Second pass: resolve `Class`/`String` entries against the `Utf8` entries
/// they index into. Forward references are fine since the whole raw table
/// already exists.
fn resolve_pass(entries: &[RawEntry]) -> Vec<Option<String>> {
    entries
        .iter()
        .map(|entry| match entry {
            RawEntry::Class { name_index } => utf8_at(entries, *name_index).map(|s| s.replace('/', ".")),
            RawEntry::String { string_index } => utf8_at(entries, *string_index),
            _ => None,
        })
        .collect()
}

fn utf8_at(entries: &[RawEntry], index: u16) -> Option<String> {
    match entries.get(index as usize) {
        Some(RawEntry::Utf8(s)) => Some(s.clone()),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    fn build(entries_bytes: &[u8], count: u16) -> ConstantPool {
        let mut header = Vec::new();
        header.extend_from_slice(&count.to_be_bytes());
        header.extend_from_slice(entries_bytes);
        let mut cursor = Cursor::new(header);
        let mut stream = ClassFileStream::new(&mut cursor);
        ConstantPool::read_from_stream(&mut stream).unwrap()
    }

    #[test]
    fn resolves_class_name_through_utf8() {
        // count = 3 (2 real entries): #1 Utf8 "p/C", #2 Class -> #1
        let mut bytes = Vec::new();
        bytes.push(tags::UTF8);
        bytes.extend_from_slice(&3u16.to_be_bytes());
        bytes.extend_from_slice(b"p/C");
        bytes.push(tags::CLASS);
        bytes.extend_from_slice(&1u16.to_be_bytes());

        let cp = build(&bytes, 3);
        assert_eq!(cp.class_name(2).unwrap().as_deref(), Some("p.C"));
        assert_eq!(cp.class_name(0).unwrap(), None);
    }

    #[test]
    fn long_occupies_two_slots() {
        // count = 3 (1 Long entry, occupying slots 1 and 2)
        let mut bytes = Vec::new();
        bytes.push(tags::LONG);
        bytes.extend_from_slice(&42i64.to_be_bytes());

        let cp = build(&bytes, 3);
        assert_eq!(cp.long(1).unwrap(), 42);
        assert!(matches!(cp.entries[2], RawEntry::Unused));
    }

    #[test]
    fn unknown_tag_rejects() {
        let bytes = vec![200u8];
        let mut header = Vec::new();
        header.extend_from_slice(&2u16.to_be_bytes());
        header.extend_from_slice(&bytes);
        let mut cursor = Cursor::new(header);
        let mut stream = ClassFileStream::new(&mut cursor);
        let err = ConstantPool::read_from_stream(&mut stream).unwrap_err();
        assert!(matches!(err, ClassFileError::UnknownConstantPoolTag(200)));
    }
}
