//! Traits for interpreting font data

use types::{FixedSize, Scalar};

use crate::font_data::FontData;

/// A type that can be read from raw table data.
///
/// Implementations are responsible for ensuring that every array or field
/// they later hand out is inside the provided data; after a successful
/// `read`, accessors can rely on the header fields being present.
pub trait FontRead<'a>: Sized {
    /// Read an instance of `Self` from the provided data, checking that the
    /// header and any declared arrays are in bounds.
    fn read(data: FontData<'a>) -> Result<Self, ReadError>;
}

/// A record stored in a table array.
///
/// Scalars are read through [`Scalar`]; this trait covers the small
/// multi-field records (tag records, coverage and class ranges) whose
/// fields are stored as [`BigEndian`](types::BigEndian) values.
pub trait ReadRecord: FixedSize {
    /// Decode a record from exactly `RAW_BYTE_LEN` bytes.
    ///
    /// Returns `None` if the slice has the wrong length.
    fn read_record(bytes: &[u8]) -> Option<Self>;
}

impl<T: Scalar> ReadRecord for T {
    #[inline]
    fn read_record(bytes: &[u8]) -> Option<Self> {
        Scalar::read(bytes)
    }
}

/// A record whose size depends on fields of the table that contains it.
///
/// Pair value records are the example here: their length is set by the
/// two value formats in the subtable header.
pub trait ReadWithArgs<'a>: Sized {
    type Args: Copy;

    /// The encoded size of one record, given `args`.
    fn compute_size(args: &Self::Args) -> usize;

    /// Read one record from data of exactly `compute_size(args)` bytes.
    fn read_with_args(data: FontData<'a>, args: &Self::Args) -> Result<Self, ReadError>;
}

/// An error that occurs when reading font data
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReadError {
    /// An offset or count pointed past the end of the data.
    OutOfBounds,
    /// A table declared a format we do not know how to read.
    InvalidFormat(u16),
    /// The data is in bounds, but internally inconsistent.
    MalformedData(&'static str),
}

impl std::fmt::Display for ReadError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ReadError::OutOfBounds => write!(f, "An offset was out of bounds"),
            ReadError::InvalidFormat(x) => write!(f, "Invalid format '{x}'"),
            ReadError::MalformedData(msg) => write!(f, "Malformed data: '{msg}'"),
        }
    }
}

impl std::error::Error for ReadError {}

#[cfg(test)]
mod tests {
    use types::{BigEndian, GlyphId16, Tag};

    use super::*;

    #[test]
    fn scalars_are_big_endian() {
        assert_eq!(u16::read_record(&[0x12, 0x34]), Some(0x1234));
        assert_eq!(i16::read_record(&[0xFF, 0xCE]), Some(-50));
        assert_eq!(u32::read_record(&[0, 1, 0, 0]), Some(0x0001_0000));
        assert_eq!(Tag::read_record(b"kern"), Some(Tag::new(b"kern")));
        assert_eq!(GlyphId16::read_record(&[0, 42]), Some(GlyphId16::new(42)));
        assert_eq!(
            BigEndian::<i16>::from_slice(&[0xFF, 0xCE]).map(|raw| raw.get()),
            Some(-50)
        );
    }

    #[test]
    fn wrong_length_is_none() {
        assert_eq!(u16::read_record(&[0x12]), None);
        assert_eq!(u32::read_record(&[0, 0, 0]), None);
        assert_eq!(Tag::read_record(b"ker"), None);
    }
}
