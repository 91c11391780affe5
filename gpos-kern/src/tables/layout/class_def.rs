//! The [Class Definition](https://learn.microsoft.com/en-us/typography/opentype/spec/chapter2#class-definition-table) table

use types::{BigEndian, FixedSize, GlyphId16};

use super::coverage::find_range;
use crate::array::Array;
use crate::read::{FontRead, ReadRecord};
use crate::{FontData, ReadError};

/// A class definition table, assigning glyphs to classes.
///
/// Glyphs that are not assigned a class explicitly belong to class 0.
#[derive(Clone, Copy, Debug)]
pub enum ClassDef<'a> {
    Format1(ClassDefFormat1<'a>),
    Format2(Array<'a, ClassRangeRecord>),
}

/// Class values for a contiguous run of glyphs.
#[derive(Clone, Copy, Debug)]
pub struct ClassDefFormat1<'a> {
    start_glyph_id: GlyphId16,
    class_values: Array<'a, u16>,
}

/// A range of glyphs sharing a class, in a format 2 [`ClassDef`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ClassRangeRecord {
    start_glyph_id: BigEndian<GlyphId16>,
    end_glyph_id: BigEndian<GlyphId16>,
    class: BigEndian<u16>,
}

impl ClassRangeRecord {
    pub fn start_glyph_id(&self) -> GlyphId16 {
        self.start_glyph_id.get()
    }

    pub fn end_glyph_id(&self) -> GlyphId16 {
        self.end_glyph_id.get()
    }

    pub fn class(&self) -> u16 {
        self.class.get()
    }
}

impl FixedSize for ClassRangeRecord {
    const RAW_BYTE_LEN: usize = GlyphId16::RAW_BYTE_LEN * 2 + u16::RAW_BYTE_LEN;
}

impl ReadRecord for ClassRangeRecord {
    fn read_record(bytes: &[u8]) -> Option<Self> {
        Some(ClassRangeRecord {
            start_glyph_id: BigEndian::from_slice(bytes.get(0..2)?)?,
            end_glyph_id: BigEndian::from_slice(bytes.get(2..4)?)?,
            class: BigEndian::from_slice(bytes.get(4..6)?)?,
        })
    }
}

impl<'a> FontRead<'a> for ClassDef<'a> {
    fn read(data: FontData<'a>) -> Result<Self, ReadError> {
        let mut cursor = data.cursor();
        match cursor.read::<u16>()? {
            1 => {
                let start_glyph_id = cursor.read()?;
                let glyph_count: u16 = cursor.read()?;
                let class_values = Array::read(data, cursor.position(), glyph_count as usize)?;
                Ok(ClassDef::Format1(ClassDefFormat1 {
                    start_glyph_id,
                    class_values,
                }))
            }
            2 => {
                let range_count: u16 = cursor.read()?;
                Array::read(data, cursor.position(), range_count as usize).map(ClassDef::Format2)
            }
            other => Err(ReadError::InvalidFormat(other)),
        }
    }
}

impl ClassDef<'_> {
    /// Validate the table and return the largest class value it assigns.
    ///
    /// Format 2 ranges must be strictly increasing and must not overlap.
    pub fn max_class(&self) -> Result<u16, ReadError> {
        match self {
            ClassDef::Format1(table) => Ok(table.class_values.iter().max().unwrap_or(0)),
            ClassDef::Format2(ranges) => {
                let mut max_class = 0;
                let mut prev_end: Option<GlyphId16> = None;
                for range in ranges.iter() {
                    if prev_end.is_some_and(|prev| range.start_glyph_id() <= prev) {
                        return Err(ReadError::MalformedData("class ranges out of order"));
                    }
                    if range.end_glyph_id() < range.start_glyph_id() {
                        return Err(ReadError::MalformedData("class range end < start"));
                    }
                    max_class = max_class.max(range.class());
                    prev_end = Some(range.end_glyph_id());
                }
                Ok(max_class)
            }
        }
    }

    /// Return the class of `gid`; glyphs without an explicit class are in class 0.
    pub fn get(&self, gid: GlyphId16) -> u16 {
        match self {
            ClassDef::Format1(table) => gid
                .to_u16()
                .checked_sub(table.start_glyph_id.to_u16())
                .and_then(|idx| table.class_values.get(idx as usize))
                .unwrap_or(0),
            ClassDef::Format2(ranges) => {
                find_range(ranges, gid, |rec| (rec.start_glyph_id(), rec.end_glyph_id()))
                    .map(|rec| rec.class())
                    .unwrap_or(0)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use font_test_data::bebuffer::BeBuffer;

    fn class_def(buf: &BeBuffer) -> ClassDef<'_> {
        ClassDef::read(FontData::new(buf.as_slice())).unwrap()
    }

    #[test]
    fn format1() {
        let buf = BeBuffer::new()
            .push(1u16)
            .push(10u16)
            .push(3u16)
            .extend([2u16, 0, 7]);
        let table = class_def(&buf);
        assert_eq!(table.max_class(), Ok(7));
        assert_eq!(table.get(GlyphId16::new(9)), 0);
        assert_eq!(table.get(GlyphId16::new(10)), 2);
        assert_eq!(table.get(GlyphId16::new(11)), 0);
        assert_eq!(table.get(GlyphId16::new(12)), 7);
        assert_eq!(table.get(GlyphId16::new(13)), 0);
    }

    #[test]
    fn format2() {
        let buf = BeBuffer::new().push(2u16).push(1u16).extend([10u16, 20, 1]);
        let table = class_def(&buf);
        assert_eq!(table.max_class(), Ok(1));
        assert_eq!(table.get(GlyphId16::new(5)), 0);
        assert_eq!(table.get(GlyphId16::new(15)), 1);
        assert_eq!(table.get(GlyphId16::new(25)), 0);
    }

    #[test]
    fn format2_validation() {
        let buf = BeBuffer::new()
            .push(2u16)
            .push(2u16)
            .extend([10u16, 20, 1])
            .extend([15u16, 30, 2]);
        assert!(class_def(&buf).max_class().is_err());

        let buf = BeBuffer::new().push(2u16).push(1u16).extend([20u16, 10, 1]);
        assert!(class_def(&buf).max_class().is_err());
    }

    #[test]
    fn truncated_headers() {
        // format 1 needs six bytes of header
        let buf = BeBuffer::new().push(1u16).push(10u16);
        assert!(ClassDef::read(FontData::new(buf.as_slice())).is_err());
        let buf = BeBuffer::new().push(2u16).push(2u16).extend([10u16, 20, 1]);
        assert!(ClassDef::read(FontData::new(buf.as_slice())).is_err());
        let buf = BeBuffer::new().push(3u16).push(0u16);
        assert_eq!(
            ClassDef::read(FontData::new(buf.as_slice())).err(),
            Some(ReadError::InvalidFormat(3))
        );
    }
}
