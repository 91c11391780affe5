//! raw font bytes

use std::ops::Range;

use types::{FixedSize, Scalar};

use crate::read::{ReadError, ReadRecord};

/// A reference to raw binary font data.
///
/// This is a wrapper around a byte slice, that remembers where the slice
/// starts relative to the data it was split from. Every read is checked
/// against the end of the slice, so a sub-table can never read into (or past)
/// bytes that do not belong to it.
#[derive(Debug, Default, Clone, Copy)]
pub struct FontData<'a> {
    total_pos: usize,
    bytes: &'a [u8],
}

/// A cursor for sequentially reading fields out of a [`FontData`].
pub struct Cursor<'a> {
    pos: usize,
    data: FontData<'a>,
}

impl<'a> FontData<'a> {
    /// Create a new `FontData` with these bytes.
    pub const fn new(bytes: &'a [u8]) -> Self {
        FontData {
            total_pos: 0,
            bytes,
        }
    }

    /// The length of the data, in bytes
    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    /// `true` if the data has a length of zero bytes.
    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    /// The position of the start of this data in the outermost buffer.
    pub fn position(&self) -> usize {
        self.total_pos
    }

    /// Return the data starting at `pos`, or `None` if `pos` is past the end.
    pub fn split_off(&self, pos: usize) -> Option<FontData<'a>> {
        self.bytes.get(pos..).map(|bytes| FontData {
            bytes,
            total_pos: self.total_pos.saturating_add(pos),
        })
    }

    pub fn slice(&self, range: Range<usize>) -> Option<FontData<'a>> {
        let total_pos = self.total_pos.saturating_add(range.start);
        self.bytes
            .get(range)
            .map(|bytes| FontData { bytes, total_pos })
    }

    /// Resolve an offset relative to the start of this data.
    ///
    /// The offset must leave at least one readable byte; a table header is
    /// then read from the returned data with the usual checks.
    pub fn resolve_offset(&self, offset: impl Into<usize>) -> Result<FontData<'a>, ReadError> {
        let offset = offset.into();
        self.split_off(offset)
            .filter(|data| !data.is_empty())
            .ok_or(ReadError::OutOfBounds)
    }

    pub fn read_at<T: Scalar>(&self, offset: usize) -> Result<T, ReadError> {
        self.field_bytes::<T>(offset)
            .and_then(T::read)
            .ok_or(ReadError::OutOfBounds)
    }

    /// Read a fixed-size record, such as a [`TagRecord`](crate::tables::layout::TagRecord).
    pub fn read_record<T: ReadRecord>(&self, offset: usize) -> Result<T, ReadError> {
        self.field_bytes::<T>(offset)
            .and_then(T::read_record)
            .ok_or(ReadError::OutOfBounds)
    }

    fn field_bytes<T: FixedSize>(&self, offset: usize) -> Option<&'a [u8]> {
        offset
            .checked_add(T::RAW_BYTE_LEN)
            .and_then(|end| self.bytes.get(offset..end))
    }

    /// Return the `count * item_len` bytes starting at `offset`.
    pub fn read_array_bytes(
        &self,
        offset: usize,
        count: usize,
        item_len: usize,
    ) -> Result<FontData<'a>, ReadError> {
        count
            .checked_mul(item_len)
            .and_then(|len| offset.checked_add(len))
            .and_then(|end| self.slice(offset..end))
            .ok_or(ReadError::OutOfBounds)
    }

    pub(crate) fn cursor(&self) -> Cursor<'a> {
        Cursor {
            pos: 0,
            data: *self,
        }
    }

    pub fn as_bytes(&self) -> &'a [u8] {
        self.bytes
    }
}

impl<'a> Cursor<'a> {
    pub(crate) fn advance_by(&mut self, n_bytes: usize) {
        self.pos = self.pos.saturating_add(n_bytes);
    }

    pub(crate) fn read<T: Scalar>(&mut self) -> Result<T, ReadError> {
        let temp = self.data.read_at(self.pos);
        self.advance_by(T::RAW_BYTE_LEN);
        temp
    }

    /// The current position, relative to the start of the cursor's data.
    pub(crate) fn position(&self) -> usize {
        self.pos
    }
}

impl<'a> From<&'a [u8]> for FontData<'a> {
    fn from(src: &'a [u8]) -> FontData<'a> {
        FontData::new(src)
    }
}
