//! Inline formatting bitmask.

use bitflags::bitflags;

bitflags! {
    /// Active inline styles on a [`Node::Text`](crate::Node::Text) node.
    ///
    /// Bits combine freely (bold + italic is legal). The empty mask means
    /// unformatted text; there is no bit for "default".
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct FormatMask: u8 {
        const BOLD = 1;
        const ITALIC = 1 << 1;
        const STRIKETHROUGH = 1 << 2;
        const UNDERLINE = 1 << 3;
        const CODE = 1 << 4;
    }
}
