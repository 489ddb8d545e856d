//! Access-flag bitmasks (JVM spec §4.1, §4.5), used only to classify a
//! class and to recognize static-final fields.

bitflags::bitflags! {
    pub struct ClassAccessFlags: u16 {
        /// Declared public; may be accessed from outside its package.
        const ACC_PUBLIC = 0x0001;
        /// Declared final; no subclasses allowed.
        const ACC_FINAL = 0x0010;
        /// Treat superclass methods specially when invoked by invokespecial.
        const ACC_SUPER = 0x0020;
        /// Is an interface, not a class.
        const ACC_INTERFACE = 0x0200;
        /// Declared abstract; must not be instantiated.
        const ACC_ABSTRACT = 0x0400;
        /// Declared synthetic; not present in the source code.
        const ACC_SYNTHETIC = 0x1000;
        /// Declared as an annotation type.
        const ACC_ANNOTATION = 0x2000;
        /// Declared as an enum type.
        const ACC_ENUM = 0x4000;
    }
}

bitflags::bitflags! {
    pub struct FieldAccessFlags: u16 {
        const ACC_PUBLIC = 0x0001;
        const ACC_PRIVATE = 0x0002;
        const ACC_PROTECTED = 0x0004;
        const ACC_STATIC = 0x0008;
        /// Declared final; combined with `ACC_STATIC` marks a static-final
        /// field (spec.md §4.1 step 9).
        const ACC_FINAL = 0x0010;
        const ACC_VOLATILE = 0x0040;
        const ACC_TRANSIENT = 0x0080;
        const ACC_SYNTHETIC = 0x1000;
        const ACC_ENUM = 0x4000;
    }
}

impl FieldAccessFlags {
    /// `ACC_STATIC | ACC_FINAL` together indicate a static-final field
    /// whose `ConstantValue` attribute the decoder should coerce and
    /// deliver to the scan spec's sink.
    pub fn is_static_final(self) -> bool {
        self.contains(Self::ACC_STATIC) && self.contains(Self::ACC_FINAL)
    }
}
