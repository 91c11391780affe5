//! Selecting features, and the lookups they reference.

use types::Tag;

use super::{Feature, FeatureList, LangSys};
use crate::ReadError;

/// The `kern` feature tag: the default filter for kerning.
pub const KERN: Tag = Tag::new(b"kern");

/// Decides which features contribute lookups to a kerning index.
///
/// This is implemented for a single [`Tag`] (exact match), for slices and
/// arrays of tags (membership), and for closures wrapped with [`filter_fn`].
pub trait FeatureFilter {
    fn accept(&self, tag: Tag) -> bool;
}

impl FeatureFilter for Tag {
    fn accept(&self, tag: Tag) -> bool {
        *self == tag
    }
}

impl FeatureFilter for [Tag] {
    fn accept(&self, tag: Tag) -> bool {
        self.contains(&tag)
    }
}

impl<const N: usize> FeatureFilter for [Tag; N] {
    fn accept(&self, tag: Tag) -> bool {
        self.contains(&tag)
    }
}

impl<T: FeatureFilter + ?Sized> FeatureFilter for &T {
    fn accept(&self, tag: Tag) -> bool {
        (**self).accept(tag)
    }
}

/// A [`FeatureFilter`] backed by a closure. See [`filter_fn`].
#[derive(Clone, Copy, Debug)]
pub struct FromFn<F>(F);

/// Create a [`FeatureFilter`] from a predicate over feature tags.
///
/// ```
/// # use gpos_kern::{filter_fn, FeatureFilter, types::Tag};
/// let filter = filter_fn(|tag: Tag| tag == Tag::new(b"kern") || tag == Tag::new(b"dist"));
/// assert!(filter.accept(Tag::new(b"dist")));
/// ```
pub fn filter_fn<F: Fn(Tag) -> bool>(f: F) -> FromFn<F> {
    FromFn(f)
}

impl<F: Fn(Tag) -> bool> FeatureFilter for FromFn<F> {
    fn accept(&self, tag: Tag) -> bool {
        (self.0)(tag)
    }
}

impl<'a> FeatureList<'a> {
    /// Returns the tag and feature at the given index.
    pub fn get(&self, index: u16) -> Result<(Tag, Feature<'a>), ReadError> {
        let record = self
            .feature_records()
            .get(index as usize)
            .ok_or(ReadError::OutOfBounds)?;
        Ok((record.tag(), self.feature(&record)?))
    }
}

/// Mark every lookup referenced by an accepted feature of `lang_sys`.
///
/// Both the required feature and the listed features go through the filter.
/// The returned vector has one entry per lookup in the lookup list.
pub(crate) fn collect_lookup_indices(
    features: &FeatureList<'_>,
    lang_sys: &LangSys<'_>,
    filter: &(impl FeatureFilter + ?Sized),
    lookup_count: u16,
) -> Result<Vec<bool>, ReadError> {
    let mut used = vec![false; lookup_count as usize];
    for feature_index in lang_sys.all_feature_indices() {
        let record = features
            .feature_records()
            .get(feature_index as usize)
            .ok_or(ReadError::OutOfBounds)?;
        if !filter.accept(record.tag()) {
            continue;
        }
        let feature = features.feature(&record)?;
        for lookup_index in feature.lookup_indices().iter() {
            *used
                .get_mut(lookup_index as usize)
                .ok_or(ReadError::OutOfBounds)? = true;
        }
    }
    Ok(used)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tag_filters() {
        let kern = Tag::new(b"kern");
        let dist = Tag::new(b"dist");
        assert!(KERN.accept(kern));
        assert!(!KERN.accept(dist));
        assert!([kern, dist].accept(dist));
        let tags: &[Tag] = &[dist];
        assert!(tags.accept(dist));
        assert!(!tags.accept(kern));
        assert!(filter_fn(|tag: Tag| tag != kern).accept(dist));
        assert!(!filter_fn(|_| false).accept(kern));
    }
}
