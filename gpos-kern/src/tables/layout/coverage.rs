//! The [Coverage](https://learn.microsoft.com/en-us/typography/opentype/spec/chapter2#coverage-table) table

use std::cmp::Ordering;

use types::{BigEndian, FixedSize, GlyphId16};

use crate::array::Array;
use crate::read::{FontRead, ReadRecord};
use crate::{FontData, ReadError};

/// A coverage table, mapping a set of glyphs to dense coverage indices.
#[derive(Clone, Copy, Debug)]
pub enum CoverageTable<'a> {
    /// A sorted array of glyph ids; the coverage index is the array index.
    Format1(Array<'a, GlyphId16>),
    /// Sorted, non-overlapping ranges of glyph ids.
    Format2(Array<'a, RangeRecord>),
}

/// A range of glyphs in a format 2 [`CoverageTable`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct RangeRecord {
    start_glyph_id: BigEndian<GlyphId16>,
    end_glyph_id: BigEndian<GlyphId16>,
    start_coverage_index: BigEndian<u16>,
}

impl RangeRecord {
    pub fn start_glyph_id(&self) -> GlyphId16 {
        self.start_glyph_id.get()
    }

    pub fn end_glyph_id(&self) -> GlyphId16 {
        self.end_glyph_id.get()
    }

    /// Coverage index of `start_glyph_id`.
    pub fn start_coverage_index(&self) -> u16 {
        self.start_coverage_index.get()
    }
}

impl FixedSize for RangeRecord {
    const RAW_BYTE_LEN: usize = GlyphId16::RAW_BYTE_LEN * 2 + u16::RAW_BYTE_LEN;
}

impl ReadRecord for RangeRecord {
    fn read_record(bytes: &[u8]) -> Option<Self> {
        Some(RangeRecord {
            start_glyph_id: BigEndian::from_slice(bytes.get(0..2)?)?,
            end_glyph_id: BigEndian::from_slice(bytes.get(2..4)?)?,
            start_coverage_index: BigEndian::from_slice(bytes.get(4..6)?)?,
        })
    }
}

impl<'a> FontRead<'a> for CoverageTable<'a> {
    fn read(data: FontData<'a>) -> Result<Self, ReadError> {
        let format: u16 = data.read_at(0)?;
        let count: u16 = data.read_at(2)?;
        match format {
            1 => Array::read(data, 4, count as usize).map(CoverageTable::Format1),
            2 => Array::read(data, 4, count as usize).map(CoverageTable::Format2),
            other => Err(ReadError::InvalidFormat(other)),
        }
    }
}

impl CoverageTable<'_> {
    /// Validate the table and return the number of glyphs it covers.
    ///
    /// For format 2, ranges must be strictly increasing and non-overlapping,
    /// and each range's start coverage index must equal the number of glyphs
    /// covered by the ranges before it.
    pub fn glyph_count(&self) -> Result<u32, ReadError> {
        match self {
            CoverageTable::Format1(glyphs) => Ok(glyphs.len() as u32),
            CoverageTable::Format2(ranges) => {
                let mut glyph_count = 0u32;
                let mut prev_end: Option<u16> = None;
                for range in ranges.iter() {
                    let start = range.start_glyph_id().to_u16();
                    let end = range.end_glyph_id().to_u16();
                    if prev_end.is_some_and(|prev| start <= prev) {
                        return Err(ReadError::MalformedData("coverage ranges out of order"));
                    }
                    if end < start {
                        return Err(ReadError::MalformedData("coverage range end < start"));
                    }
                    if u32::from(range.start_coverage_index()) != glyph_count {
                        return Err(ReadError::MalformedData(
                            "coverage range has wrong start index",
                        ));
                    }
                    glyph_count += u32::from(end - start) + 1;
                    prev_end = Some(end);
                }
                Ok(glyph_count)
            }
        }
    }

    /// Return the coverage index of `gid`, or `None` if it is not covered.
    pub fn get(&self, gid: GlyphId16) -> Option<u16> {
        match self {
            CoverageTable::Format1(glyphs) => glyphs
                .binary_search_by(|glyph| glyph.cmp(&gid))
                .ok()
                .and_then(|idx| u16::try_from(idx).ok()),
            CoverageTable::Format2(ranges) => {
                let range = find_range(ranges, gid, |rec| {
                    (rec.start_glyph_id(), rec.end_glyph_id())
                })?;
                let delta = gid.to_u16() - range.start_glyph_id().to_u16();
                range.start_coverage_index().checked_add(delta)
            }
        }
    }

    /// Iterate over the covered glyphs, in coverage index order.
    pub fn iter(&self) -> impl Iterator<Item = GlyphId16> + '_ {
        // all one expression so that we have a single return type
        let (iter1, iter2) = match self {
            CoverageTable::Format1(glyphs) => (Some(glyphs.iter()), None),
            CoverageTable::Format2(ranges) => {
                let iter = ranges.iter().flat_map(|rec| {
                    (rec.start_glyph_id().to_u16()..=rec.end_glyph_id().to_u16()).map(GlyphId16::new)
                });
                (None, Some(iter))
            }
        };
        iter1
            .into_iter()
            .flatten()
            .chain(iter2.into_iter().flatten())
    }
}

/// Find the range containing `gid` in an array of ranges sorted by start glyph.
pub(crate) fn find_range<T: ReadRecord>(
    ranges: &Array<'_, T>,
    gid: GlyphId16,
    bounds: impl Fn(&T) -> (GlyphId16, GlyphId16),
) -> Option<T> {
    let idx = ranges
        .binary_search_by(|rec| {
            let (start, end) = bounds(rec);
            if gid < start {
                Ordering::Greater
            } else if gid > end {
                Ordering::Less
            } else {
                Ordering::Equal
            }
        })
        .ok()?;
    ranges.get(idx)
}

#[cfg(test)]
mod tests {
    use super::*;
    use font_test_data::bebuffer::BeBuffer;

    fn coverage(buf: &BeBuffer) -> CoverageTable<'_> {
        CoverageTable::read(FontData::new(buf.as_slice())).unwrap()
    }

    #[test]
    fn format1_lookup() {
        let buf = BeBuffer::new().push(1u16).push(3u16).extend([5u16, 9, 20]);
        let table = coverage(&buf);
        assert_eq!(table.glyph_count(), Ok(3));
        assert_eq!(table.get(GlyphId16::new(7)), None);
        assert_eq!(table.get(GlyphId16::new(9)), Some(1));
        assert_eq!(table.get(GlyphId16::new(5)), Some(0));
        assert_eq!(table.get(GlyphId16::new(20)), Some(2));
        assert_eq!(table.get(GlyphId16::new(21)), None);
    }

    #[test]
    fn format2_lookup() {
        let buf = BeBuffer::new()
            .push(2u16)
            .push(2u16)
            .extend([10u16, 12, 0])
            .extend([20u16, 20, 3]);
        let table = coverage(&buf);
        assert_eq!(table.glyph_count(), Ok(4));
        assert_eq!(table.get(GlyphId16::new(9)), None);
        assert_eq!(table.get(GlyphId16::new(10)), Some(0));
        assert_eq!(table.get(GlyphId16::new(12)), Some(2));
        assert_eq!(table.get(GlyphId16::new(15)), None);
        assert_eq!(table.get(GlyphId16::new(20)), Some(3));
        assert_eq!(
            table.iter().map(|gid| gid.to_u16()).collect::<Vec<_>>(),
            vec![10, 11, 12, 20]
        );
    }

    #[test]
    fn format2_validation() {
        // overlapping
        let buf = BeBuffer::new()
            .push(2u16)
            .push(2u16)
            .extend([10u16, 12, 0])
            .extend([12u16, 14, 3]);
        assert!(coverage(&buf).glyph_count().is_err());

        // end before start
        let buf = BeBuffer::new().push(2u16).push(1u16).extend([10u16, 9, 0]);
        assert!(coverage(&buf).glyph_count().is_err());

        // index gap
        let buf = BeBuffer::new()
            .push(2u16)
            .push(2u16)
            .extend([10u16, 12, 0])
            .extend([20u16, 20, 4]);
        assert!(coverage(&buf).glyph_count().is_err());
    }

    #[test]
    fn bad_format_and_bounds() {
        let buf = BeBuffer::new().push(3u16).push(0u16);
        assert_eq!(
            CoverageTable::read(FontData::new(buf.as_slice())).err(),
            Some(ReadError::InvalidFormat(3))
        );
        // declares three glyphs, has two
        let buf = BeBuffer::new().push(1u16).push(3u16).extend([5u16, 9]);
        assert_eq!(
            CoverageTable::read(FontData::new(buf.as_slice())).err(),
            Some(ReadError::OutOfBounds)
        );
        let buf = BeBuffer::new().push(1u16);
        assert!(CoverageTable::read(FontData::new(buf.as_slice())).is_err());
    }
}
