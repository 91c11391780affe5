//! Custom array types

use std::cmp::Ordering;
use std::marker::PhantomData;

use crate::read::{ReadRecord, ReadWithArgs};
use crate::{FontData, ReadError};

/// A bounds-checked array of fixed-size big-endian items.
///
/// The whole array is checked against the end of its data when it is
/// created, so indexing can only fail for indices past `len()`.
#[derive(Clone, Copy)]
pub struct Array<'a, T> {
    data: FontData<'a>,
    phantom: PhantomData<T>,
}

impl<'a, T: ReadRecord> Array<'a, T> {
    /// Read `count` items starting at `offset` in `data`.
    pub(crate) fn read(data: FontData<'a>, offset: usize, count: usize) -> Result<Self, ReadError> {
        let data = data.read_array_bytes(offset, count, T::RAW_BYTE_LEN)?;
        Ok(Array {
            data,
            phantom: PhantomData,
        })
    }

    pub fn len(&self) -> usize {
        self.data.len() / T::RAW_BYTE_LEN
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn get(&self, idx: usize) -> Option<T> {
        self.data.read_record(idx.checked_mul(T::RAW_BYTE_LEN)?).ok()
    }

    pub fn first(&self) -> Option<T> {
        self.get(0)
    }

    pub fn iter(&self) -> impl Iterator<Item = T> + 'a
    where
        T: 'a,
    {
        let data = self.data;
        (0..self.len()).filter_map(move |idx| data.read_record(idx * T::RAW_BYTE_LEN).ok())
    }

    /// Binary search the array with a comparator function.
    ///
    /// This has the same contract as [`slice::binary_search_by`]: the array
    /// must be sorted with respect to `f`, otherwise the result is unspecified
    /// (but the search still terminates and never reads out of bounds).
    pub fn binary_search_by<F>(&self, f: F) -> Result<usize, usize>
    where
        F: FnMut(&T) -> Ordering,
    {
        binary_search_by(self.len(), |idx| self.get(idx), f)
    }
}

/// An array of records whose size is only known at runtime.
///
/// The size of each item is computed from `args` when the array is
/// created, and every item is read with the same arguments.
#[derive(Clone, Copy)]
pub struct ComputedArray<'a, T: ReadWithArgs<'a>> {
    data: FontData<'a>,
    item_len: usize,
    args: T::Args,
}

impl<'a, T: ReadWithArgs<'a>> ComputedArray<'a, T> {
    /// Read `count` items starting at `offset` in `data`.
    pub(crate) fn read(
        data: FontData<'a>,
        offset: usize,
        count: usize,
        args: T::Args,
    ) -> Result<Self, ReadError> {
        let item_len = T::compute_size(&args);
        let data = data.read_array_bytes(offset, count, item_len)?;
        Ok(ComputedArray {
            data,
            item_len,
            args,
        })
    }

    pub fn len(&self) -> usize {
        // item_len is never zero for records read from a table
        self.data.len().checked_div(self.item_len).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn get(&self, idx: usize) -> Option<T> {
        let start = idx.checked_mul(self.item_len)?;
        let item = self.data.slice(start..start.checked_add(self.item_len)?)?;
        T::read_with_args(item, &self.args).ok()
    }

    /// Binary search the array with a comparator function.
    ///
    /// See [`Array::binary_search_by`].
    pub fn binary_search_by<F>(&self, f: F) -> Result<usize, usize>
    where
        F: FnMut(&T) -> Ordering,
    {
        binary_search_by(self.len(), |idx| self.get(idx), f)
    }
}

impl<'a, T: ReadWithArgs<'a>> std::fmt::Debug for ComputedArray<'a, T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ComputedArray")
            .field("len", &self.len())
            .field("item_len", &self.item_len)
            .finish()
    }
}

fn binary_search_by<T>(
    len: usize,
    get: impl Fn(usize) -> Option<T>,
    mut f: impl FnMut(&T) -> Ordering,
) -> Result<usize, usize> {
    let mut lo = 0;
    let mut hi = len;
    while lo < hi {
        let mid = lo + (hi - lo) / 2;
        let Some(item) = get(mid) else {
            return Err(lo);
        };
        match f(&item) {
            Ordering::Less => lo = mid + 1,
            Ordering::Greater => hi = mid,
            Ordering::Equal => return Ok(mid),
        }
    }
    Err(lo)
}

impl<T: ReadRecord + std::fmt::Debug> std::fmt::Debug for Array<'_, T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_list().entries(self.iter()).finish()
    }
}
