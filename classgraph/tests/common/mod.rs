//! Shared minimal classfile builder for the facade's integration tests.

use std::fs;
use std::path::Path;

pub struct ClassFileBuilder {
    constants: Vec<u8>,
    constant_count: u16,
    access_flags: u16,
    pub this_class: u16,
    pub super_class: u16,
    pub interfaces: Vec<u16>,
}

impl ClassFileBuilder {
    pub fn new() -> Self {
        Self {
            constants: Vec::new(),
            constant_count: 1,
            access_flags: 0x0021, // ACC_PUBLIC | ACC_SUPER
            this_class: 0,
            super_class: 0,
            interfaces: Vec::new(),
        }
    }

    pub fn interface() -> Self {
        let mut b = Self::new();
        b.access_flags = 0x0601; // ACC_PUBLIC | ACC_INTERFACE | ACC_ABSTRACT
        b
    }

    pub fn utf8(&mut self, s: &str) -> u16 {
        self.constants.push(1);
        self.constants.extend_from_slice(&(s.len() as u16).to_be_bytes());
        self.constants.extend_from_slice(s.as_bytes());
        self.constant_count += 1;
        self.constant_count - 1
    }

    pub fn class(&mut self, dotted_name: &str) -> u16 {
        let name_index = self.utf8(&dotted_name.replace('.', "/"));
        self.constants.push(7);
        self.constants.extend_from_slice(&name_index.to_be_bytes());
        self.constant_count += 1;
        self.constant_count - 1
    }

    pub fn build(self) -> Vec<u8> {
        let mut out = Vec::new();
        out.extend_from_slice(&0xCAFEBABEu32.to_be_bytes());
        out.extend_from_slice(&0u16.to_be_bytes());
        out.extend_from_slice(&52u16.to_be_bytes());
        out.extend_from_slice(&self.constant_count.to_be_bytes());
        out.extend_from_slice(&self.constants);
        out.extend_from_slice(&self.access_flags.to_be_bytes());
        out.extend_from_slice(&self.this_class.to_be_bytes());
        out.extend_from_slice(&self.super_class.to_be_bytes());
        out.extend_from_slice(&(self.interfaces.len() as u16).to_be_bytes());
        for i in &self.interfaces {
            out.extend_from_slice(&i.to_be_bytes());
        }
        out.extend_from_slice(&0u16.to_be_bytes()); // fields_count
        out.extend_from_slice(&0u16.to_be_bytes()); // methods_count
        out.extend_from_slice(&0u16.to_be_bytes()); // attributes_count
        out
    }
}

/// Builds a trivial `name extends java.lang.Object` classfile's bytes.
pub fn simple_class(name: &str) -> Vec<u8> {
    let mut b = ClassFileBuilder::new();
    let this_class = b.class(name);
    let super_class = b.class("java.lang.Object");
    b.this_class = this_class;
    b.super_class = super_class;
    b.build()
}

pub fn write_class(dir: &Path, relative: &str, bytes: Vec<u8>) {
    let path = dir.join(relative);
    fs::create_dir_all(path.parent().unwrap()).unwrap();
    fs::write(path, bytes).unwrap();
}
