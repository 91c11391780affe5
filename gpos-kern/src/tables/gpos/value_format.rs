//! The GPOS ValueFormat flags

/// Flags describing which fields are present in a ValueRecord.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct ValueFormat(u16);

impl ValueFormat {
    /// Includes horizontal adjustment for placement
    pub const X_PLACEMENT: Self = ValueFormat(0x0001);
    /// Includes vertical adjustment for placement
    pub const Y_PLACEMENT: Self = ValueFormat(0x0002);
    /// Includes horizontal adjustment for advance
    pub const X_ADVANCE: Self = ValueFormat(0x0004);
    /// Includes vertical adjustment for advance
    pub const Y_ADVANCE: Self = ValueFormat(0x0008);
    /// Includes Device table (non-variable font) / VariationIndex table (variable font) for horizontal placement
    pub const X_PLACEMENT_DEVICE: Self = ValueFormat(0x0010);
    /// Includes Device table (non-variable font) / VariationIndex table (variable font) for vertical placement
    pub const Y_PLACEMENT_DEVICE: Self = ValueFormat(0x0020);
    /// Includes Device table (non-variable font) / VariationIndex table (variable font) for horizontal advance
    pub const X_ADVANCE_DEVICE: Self = ValueFormat(0x0040);
    /// Includes Device table (non-variable font) / VariationIndex table (variable font) for vertical advance
    pub const Y_ADVANCE_DEVICE: Self = ValueFormat(0x0080);

    /// Fields that a kerning lookup should not carry: we only read the x advance.
    pub const IGNORED_FIELDS: Self = ValueFormat(0x0001 | 0x0002 | 0x0008);

    const RESERVED_MASK: u16 = 0xFF00;

    pub fn from_bits(bits: u16) -> Self {
        Self(bits)
    }

    pub fn bits(self) -> u16 {
        self.0
    }

    pub fn is_empty(self) -> bool {
        self.0 == 0
    }

    pub fn has_reserved_bits(self) -> bool {
        self.0 & Self::RESERVED_MASK != 0
    }

    #[inline]
    pub fn contains(self, other: Self) -> bool {
        self.0 & other.0 == other.0
    }

    #[inline]
    pub fn intersects(self, other: Self) -> bool {
        self.0 & other.0 != 0
    }

    /// Return the number of bytes required to store a ValueRecord in this format.
    ///
    /// Reserved bits do not count; callers reject them beforehand.
    #[inline]
    pub fn record_byte_len(self) -> usize {
        (self.0 & 0x00FF).count_ones() as usize * 2
    }

    /// Byte offset of the x advance field within a ValueRecord, if present.
    ///
    /// Placement fields come first and have to be skipped.
    pub fn x_advance_offset(self) -> Option<usize> {
        self.contains(Self::X_ADVANCE)
            .then(|| (self.0 & 0x0003).count_ones() as usize * 2)
    }
}

impl std::ops::BitOr for ValueFormat {
    type Output = Self;

    fn bitor(self, rhs: Self) -> Self::Output {
        Self(self.0 | rhs.0)
    }
}
