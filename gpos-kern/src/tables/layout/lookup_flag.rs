//! The lookup flag type.
//!
//! This is kind-of-but-not-quite-exactly a bit enumeration: the high byte
//! holds a mark attachment class rather than flags.

/// The [LookupFlag](https://learn.microsoft.com/en-us/typography/opentype/spec/chapter2#lookupFlag) bit enumeration.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct LookupFlag(u16);

impl LookupFlag {
    /// This bit relates only to the correct processing of GPOS type 3 (cursive attachment) lookups
    pub const RIGHT_TO_LEFT: Self = LookupFlag(0x0001);
    /// If set, skips over base glyphs
    pub const IGNORE_BASE_GLYPHS: Self = LookupFlag(0x0002);
    /// If set, skips over ligatures
    pub const IGNORE_LIGATURES: Self = LookupFlag(0x0004);
    /// If set, skips over all combining marks
    pub const IGNORE_MARKS: Self = LookupFlag(0x0008);
    /// If set, the lookup table is followed by a MarkFilteringSet field.
    pub const USE_MARK_FILTERING_SET: Self = LookupFlag(0x0010);

    const RESERVED_MASK: u16 = 0x00E0;

    pub fn from_bits(bits: u16) -> Self {
        Self(bits)
    }

    /// Raw transmutation to u16.
    pub fn to_bits(self) -> u16 {
        self.0
    }

    pub fn is_empty(self) -> bool {
        self.0 == 0
    }

    /// `true` if any of the three reserved bits is set.
    pub fn has_reserved_bits(self) -> bool {
        self.0 & Self::RESERVED_MASK != 0
    }

    /// Returns `true` if all of the flags in `other` are contained within `self`.
    #[inline]
    pub const fn contains(&self, other: Self) -> bool {
        (self.0 & other.0) == other.0
    }

    /// If not zero, skips over all marks of attachment type different from specified.
    pub fn mark_attachment_class(self) -> Option<u16> {
        let val = self.0 & 0xff00;
        if val == 0 {
            None
        } else {
            Some(val >> 8)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn flag_bits() {
        let flag = LookupFlag::from_bits(0x0301);
        assert!(flag.contains(LookupFlag::RIGHT_TO_LEFT));
        assert!(!flag.contains(LookupFlag::IGNORE_MARKS));
        assert!(!flag.has_reserved_bits());
        assert_eq!(flag.mark_attachment_class(), Some(3));
        assert!(LookupFlag::from_bits(0x0020).has_reserved_bits());
        assert!(LookupFlag::from_bits(0x0080).has_reserved_bits());
        assert!(LookupFlag::default().is_empty());
        assert_eq!(LookupFlag::default().mark_attachment_class(), None);
    }
}
