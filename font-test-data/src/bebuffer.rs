//! A buffer of big-endian bytes, for writing tables by hand in tests.

use std::collections::HashMap;

use font_types::Scalar;

/// A convenience type for generating a buffer of big-endian bytes.
#[derive(Debug, Clone, Default)]
pub struct BeBuffer {
    data: Vec<u8>,
    tagged_locations: HashMap<String, usize>,
}

impl BeBuffer {
    pub fn new() -> Self {
        Default::default()
    }

    /// The current length of the buffer in bytes.
    pub fn len(&self) -> usize {
        self.data.len()
    }

    /// Returns `true` if the buffer contains zero bytes.
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Return a reference to the contents of the buffer
    pub fn as_slice(&self) -> &[u8] {
        &self.data
    }

    pub fn into_vec(self) -> Vec<u8> {
        self.data
    }

    /// Write any scalar to this buffer.
    pub fn push(mut self, item: impl Scalar) -> Self {
        self.data.extend(item.to_raw().as_ref());
        self
    }

    /// Write a scalar, remembering its position so it can be patched with
    /// [`write_at`](Self::write_at).
    pub fn push_with_tag(mut self, item: impl Scalar, tag: &str) -> Self {
        self.tagged_locations
            .insert(tag.to_string(), self.data.len());
        self.data.extend(item.to_raw().as_ref());
        self
    }

    /// Write multiple scalars into the buffer
    pub fn extend<T: Scalar>(mut self, iter: impl IntoIterator<Item = T>) -> Self {
        for item in iter {
            self.data.extend(item.to_raw().as_ref());
        }
        self
    }

    /// Append bytes that are already encoded, such as a compiled subtable.
    pub fn append(mut self, bytes: &[u8]) -> Self {
        self.data.extend_from_slice(bytes);
        self
    }

    pub fn offset_for(&self, tag: &str) -> usize {
        // panic on unrecognized tags
        self.tagged_locations.get(tag).copied().unwrap()
    }

    pub fn write_at(&mut self, tag: &str, item: impl Scalar) {
        let offset = self.offset_for(tag);
        let raw = item.to_raw();
        let new_data: &[u8] = raw.as_ref();
        let data = &mut self.data[offset..];

        if data.len() < new_data.len() {
            panic!("not enough room left in buffer for the requested write.");
        }

        for (left, right) in data.iter_mut().zip(new_data) {
            *left = *right
        }
    }
}

impl std::ops::Deref for BeBuffer {
    type Target = [u8];
    fn deref(&self) -> &Self::Target {
        &self.data
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn big_endian_with_patch() {
        let mut buf = BeBuffer::new()
            .push(1u16)
            .push_with_tag(0u16, "offset")
            .extend([-2i16, 3])
            .append(&[0xAB]);
        buf.write_at("offset", 0x0102u16);
        assert_eq!(buf.offset_for("offset"), 2);
        assert_eq!(
            buf.as_slice(),
            &[0x00, 0x01, 0x01, 0x02, 0xFF, 0xFE, 0x00, 0x03, 0xAB]
        );
    }
}
