//! [Pair adjustment](https://learn.microsoft.com/en-us/typography/opentype/spec/gpos#lookup-type-2-pair-adjustment-positioning-subtable) subtables

use types::{FixedSize, GlyphId16};

use super::ValueFormat;
use crate::array::{Array, ComputedArray};
use crate::error::BuildError;
use crate::read::{FontRead, ReadWithArgs};
use crate::tables::layout::{ClassDef, CoverageTable};
use crate::{FontData, ReadError};

const FORMAT2_HEADER_LEN: usize = 16;

/// A pair adjustment subtable (lookup type 2).
#[derive(Clone, Copy, Debug)]
pub enum PairPos<'a> {
    /// Adjustments for individual glyph pairs.
    Format1(PairPosFormat1<'a>),
    /// Adjustments for pairs of glyph classes.
    Format2(PairPosFormat2<'a>),
}

#[derive(Clone, Copy, Debug)]
pub struct PairPosFormat1<'a> {
    data: FontData<'a>,
    coverage_offset: u16,
    value_format1: ValueFormat,
    value_format2: ValueFormat,
    pair_set_offsets: Array<'a, u16>,
}

/// A second glyph and the adjustment for the first glyph of the pair.
///
/// The value record for the second glyph is skipped.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PairValueRecord {
    pub second_glyph: GlyphId16,
    pub x_advance: i16,
}

impl<'a> ReadWithArgs<'a> for PairValueRecord {
    type Args = (ValueFormat, ValueFormat);

    fn compute_size(args: &Self::Args) -> usize {
        let (value_format1, value_format2) = *args;
        GlyphId16::RAW_BYTE_LEN + value_format1.record_byte_len() + value_format2.record_byte_len()
    }

    fn read_with_args(data: FontData<'a>, args: &Self::Args) -> Result<Self, ReadError> {
        Ok(PairValueRecord {
            second_glyph: data.read_at(0)?,
            x_advance: read_x_advance(data, GlyphId16::RAW_BYTE_LEN, args.0)?,
        })
    }
}

#[derive(Clone, Copy, Debug)]
pub struct PairPosFormat2<'a> {
    data: FontData<'a>,
    coverage_offset: u16,
    value_format1: ValueFormat,
    value_format2: ValueFormat,
    class_def1_offset: u16,
    class_def2_offset: u16,
    class1_count: u16,
    class2_count: u16,
}

impl<'a> FontRead<'a> for PairPos<'a> {
    fn read(data: FontData<'a>) -> Result<Self, ReadError> {
        let mut cursor = data.cursor();
        match cursor.read::<u16>()? {
            1 => {
                let coverage_offset = cursor.read()?;
                let value_format1 = ValueFormat::from_bits(cursor.read()?);
                let value_format2 = ValueFormat::from_bits(cursor.read()?);
                let pair_set_count: u16 = cursor.read()?;
                let pair_set_offsets =
                    Array::read(data, cursor.position(), pair_set_count as usize)?;
                Ok(PairPos::Format1(PairPosFormat1 {
                    data,
                    coverage_offset,
                    value_format1,
                    value_format2,
                    pair_set_offsets,
                }))
            }
            2 => Ok(PairPos::Format2(PairPosFormat2 {
                data,
                coverage_offset: cursor.read()?,
                value_format1: ValueFormat::from_bits(cursor.read()?),
                value_format2: ValueFormat::from_bits(cursor.read()?),
                class_def1_offset: cursor.read()?,
                class_def2_offset: cursor.read()?,
                class1_count: cursor.read()?,
                class2_count: cursor.read()?,
            })),
            other => Err(ReadError::InvalidFormat(other)),
        }
    }
}

impl<'a> PairPos<'a> {
    /// Read a subtable, reporting an unknown format as such.
    pub(crate) fn read_subtable(data: FontData<'a>) -> Result<Self, BuildError> {
        PairPos::read(data).map_err(|err| match err {
            ReadError::InvalidFormat(format) => BuildError::InvalidPairPosFormat(format),
            other => other.into(),
        })
    }

    pub fn value_format1(&self) -> ValueFormat {
        match self {
            PairPos::Format1(table) => table.value_format1,
            PairPos::Format2(table) => table.value_format1,
        }
    }

    pub fn value_format2(&self) -> ValueFormat {
        match self {
            PairPos::Format1(table) => table.value_format2,
            PairPos::Format2(table) => table.value_format2,
        }
    }

    pub fn coverage(&self) -> Result<CoverageTable<'a>, ReadError> {
        match self {
            PairPos::Format1(table) => table.coverage(),
            PairPos::Format2(table) => table.coverage(),
        }
    }

    /// Check everything a query may later read from this subtable.
    pub fn validate(&self) -> Result<(), BuildError> {
        for format in [self.value_format1(), self.value_format2()] {
            if format.has_reserved_bits() {
                return Err(BuildError::ReservedValueFormat(format.bits()));
            }
        }
        match self {
            PairPos::Format1(table) => table.validate(),
            PairPos::Format2(table) => table.validate(),
        }
    }

    /// The x advance adjustment for the first glyph of the pair.
    ///
    /// Returns `None` if no record in this subtable applies to the pair.
    /// Any other fields of the value records are ignored.
    pub fn x_advance(&self, first: GlyphId16, second: GlyphId16) -> Option<i16> {
        match self {
            PairPos::Format1(table) => table.x_advance(first, second),
            PairPos::Format2(table) => table.x_advance(first, second),
        }
    }
}

impl<'a> PairPosFormat1<'a> {
    pub fn coverage(&self) -> Result<CoverageTable<'a>, ReadError> {
        CoverageTable::read(self.data.resolve_offset(self.coverage_offset)?)
    }

    pub fn pair_set_count(&self) -> u16 {
        self.pair_set_offsets.len() as u16
    }

    /// The pair value records of the pair set at `index`, sorted by second glyph.
    pub fn pair_set(&self, index: usize) -> Result<ComputedArray<'a, PairValueRecord>, ReadError> {
        let offset = self
            .pair_set_offsets
            .get(index)
            .ok_or(ReadError::OutOfBounds)?;
        let pair_set = self.data.resolve_offset(offset)?;
        let count: u16 = pair_set.read_at(0)?;
        ComputedArray::read(
            pair_set,
            2,
            count as usize,
            (self.value_format1, self.value_format2),
        )
    }

    fn validate(&self) -> Result<(), BuildError> {
        let coverage_glyphs = self.coverage()?.glyph_count()?;
        // More covered glyphs than pair sets is allowed by OpenType, but
        // we only support tables with a pair set for every covered glyph.
        if coverage_glyphs > u32::from(self.pair_set_count()) {
            return Err(BuildError::CoverageExceedsPairSets {
                coverage_glyphs,
                pair_set_count: self.pair_set_count(),
            });
        }
        for index in 0..self.pair_set_offsets.len() {
            self.pair_set(index)?;
        }
        Ok(())
    }

    fn x_advance(&self, first: GlyphId16, second: GlyphId16) -> Option<i16> {
        let coverage_index = self.coverage().ok()?.get(first)?;
        let records = self.pair_set(coverage_index as usize).ok()?;
        let idx = records
            .binary_search_by(|rec| rec.second_glyph.cmp(&second))
            .ok()?;
        records.get(idx).map(|rec| rec.x_advance)
    }
}

impl<'a> PairPosFormat2<'a> {
    pub fn coverage(&self) -> Result<CoverageTable<'a>, ReadError> {
        CoverageTable::read(self.data.resolve_offset(self.coverage_offset)?)
    }

    pub fn class1_count(&self) -> u16 {
        self.class1_count
    }

    pub fn class2_count(&self) -> u16 {
        self.class2_count
    }

    pub fn class_def1(&self) -> Result<ClassDef<'a>, ReadError> {
        ClassDef::read(self.data.resolve_offset(self.class_def1_offset)?)
    }

    pub fn class_def2(&self) -> Result<ClassDef<'a>, ReadError> {
        ClassDef::read(self.data.resolve_offset(self.class_def2_offset)?)
    }

    fn class2_record_len(&self) -> usize {
        self.value_format1.record_byte_len() + self.value_format2.record_byte_len()
    }

    fn validate(&self) -> Result<(), BuildError> {
        let record_count = self.class1_count as usize * self.class2_count as usize;
        self.data
            .read_array_bytes(FORMAT2_HEADER_LEN, record_count, self.class2_record_len())?;
        self.coverage()?.glyph_count()?;
        for (class_def, class_count) in [
            (self.class_def1()?, self.class1_count),
            (self.class_def2()?, self.class2_count),
        ] {
            let max_class = class_def.max_class()?;
            if max_class >= class_count {
                return Err(BuildError::ClassCountTooSmall {
                    max_class,
                    class_count,
                });
            }
        }
        Ok(())
    }

    fn x_advance(&self, first: GlyphId16, second: GlyphId16) -> Option<i16> {
        self.coverage().ok()?.get(first)?;
        let class1 = self.class_def1().ok()?.get(first);
        let class2 = self.class_def2().ok()?.get(second);
        if class1 >= self.class1_count || class2 >= self.class2_count {
            return None;
        }
        let record_index = class1 as usize * self.class2_count as usize + class2 as usize;
        let record_start = FORMAT2_HEADER_LEN + record_index * self.class2_record_len();
        read_x_advance(self.data, record_start, self.value_format1).ok()
    }
}

/// Read the x advance of the ValueRecord at `record_start`, or zero if the
/// format has no x advance.
fn read_x_advance(
    data: FontData<'_>,
    record_start: usize,
    format: ValueFormat,
) -> Result<i16, ReadError> {
    match format.x_advance_offset() {
        Some(offset) => data.read_at(record_start + offset),
        None => Ok(0),
    }
}
