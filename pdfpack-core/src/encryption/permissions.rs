//! PDF permissions according to ISO 32000-1 Table 22

use bitflags::bitflags;

bitflags! {
    /// User access permissions, written to the `P` entry.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct Permissions: u32 {
        /// Print the document
        const PRINT = 1 << 2;
        /// Modify document contents
        const MODIFY_CONTENTS = 1 << 3;
        /// Copy text and graphics
        const COPY = 1 << 4;
        /// Add or modify text annotations
        const MODIFY_ANNOTATIONS = 1 << 5;
        /// Fill in form fields
        const FILL_FORMS = 1 << 8;
        /// Extract text and graphics (accessibility)
        const ACCESSIBILITY = 1 << 9;
        /// Assemble the document (insert, rotate, delete pages)
        const ASSEMBLE = 1 << 10;
        /// Print in high quality
        const PRINT_HIGH_QUALITY = 1 << 11;
        /// Bits 7-8 and 13-32, which revision 3 and later expect to be set
        const RESERVED = 0xFFFF_F0C0;
    }
}

impl Permissions {
    /// Every operation allowed, reserved bits included.
    pub fn full() -> Self {
        Self::all()
    }

    /// The signed value stored in the encryption dictionary and mixed into
    /// the document key.
    pub fn p_value(self) -> i32 {
        self.bits() as i32
    }
}
