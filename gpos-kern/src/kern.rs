//! Building an index of kerning lookups, and querying it.

use types::{GlyphId16, Tag};

use crate::error::{BuildError, Warning, Warnings};
use crate::read::FontRead;
use crate::tables::gpos::{Gpos, PairPos, ValueFormat, EXTENSION, PAIR_ADJUSTMENT};
use crate::tables::layout::{collect_lookup_indices, FeatureFilter, LangSysSelector, Lookup, KERN};
use crate::FontData;

/// The pair adjustment lookups that apply to one script and language.
///
/// This borrows the GPOS data it was built from; queries re-read the
/// lookups from there, which is cheap since everything was checked when the
/// index was built.
#[derive(Clone, Debug)]
pub struct LookupIndex<'a> {
    data: FontData<'a>,
    lookups: Vec<usize>,
    warnings: Vec<Warning>,
}

impl<'a> LookupIndex<'a> {
    /// Build the index for the `kern` feature of the given script and language.
    ///
    /// With no script, the `DFLT` script is used; see [`LangSysSelector`]
    /// for how missing scripts and languages fall back.
    pub fn build(
        data: &'a [u8],
        script: Option<Tag>,
        language: Option<Tag>,
    ) -> Result<Self, BuildError> {
        Self::build_with(data, &LangSysSelector::new(script, language), &KERN)
    }

    /// Build the index for an arbitrary selection of features.
    ///
    /// The whole table is validated first; any structural problem fails the
    /// build even if it is in a part of the table that would not be used.
    pub fn build_with(
        data: &'a [u8],
        selector: &LangSysSelector,
        filter: &(impl FeatureFilter + ?Sized),
    ) -> Result<Self, BuildError> {
        let data = FontData::new(data);
        let mut warnings = Warnings::default();
        let gpos = Gpos::read(data)
            .and_then(|gpos| gpos.validate(&mut warnings).map(|_| gpos))
            .inspect_err(|err| log::debug!("GPOS rejected: {err}"))?;

        let Some(lang_sys) = gpos.script_list()?.resolve(selector)? else {
            return Ok(LookupIndex {
                data,
                lookups: Vec::new(),
                warnings: warnings.into_vec(),
            });
        };

        let lookup_list = gpos.lookup_list()?;
        let mut selected = collect_lookup_indices(
            &gpos.feature_list()?,
            &lang_sys,
            filter,
            lookup_list.lookup_count(),
        )?;

        for (lookup_index, is_selected) in selected.iter_mut().enumerate() {
            if *is_selected {
                let lookup = lookup_list.get(lookup_index as u16)?;
                *is_selected = classify_lookup(lookup_index as u16, &lookup, &mut warnings)?;
            }
        }

        let count = selected.iter().filter(|is_selected| **is_selected).count();
        let mut lookups = Vec::with_capacity(count);
        for (lookup_index, _) in selected.iter().enumerate().filter(|(_, sel)| **sel) {
            lookups.push(lookup_list.get(lookup_index as u16)?.position());
        }
        log::debug!(
            "selected {count} of {} lookups for {selector:?}",
            lookup_list.lookup_count()
        );

        Ok(LookupIndex {
            data,
            lookups,
            warnings: warnings.into_vec(),
        })
    }

    /// The x advance adjustment for `first` when followed by `second`, in
    /// font design units.
    ///
    /// This is the sum over every subtable of every selected lookup; pairs
    /// that nothing applies to get zero. Lookups may share subtables, so the
    /// sum saturates at the bounds of `i32`.
    pub fn query(&self, first: GlyphId16, second: GlyphId16) -> i32 {
        self.pair_positions()
            .filter_map(|subtable| subtable.x_advance(first, second))
            .fold(0i32, |sum, delta| sum.saturating_add(delta.into()))
    }

    fn pair_positions(&self) -> impl Iterator<Item = PairPos<'a>> + '_ {
        let data = self.data;
        self.lookups
            .iter()
            .filter_map(move |offset| Lookup::read(data.split_off(*offset)?).ok())
            .flat_map(|lookup| lookup.subtables())
            .filter_map(|subtable| PairPos::read(subtable.ok()?).ok())
    }

    /// The number of selected lookups.
    pub fn lookup_count(&self) -> usize {
        self.lookups.len()
    }

    /// `true` if no lookups were selected; every query returns zero.
    pub fn is_empty(&self) -> bool {
        self.lookups.is_empty()
    }

    /// The offsets of the selected lookups from the start of the GPOS table,
    /// in lookup list order.
    pub fn lookup_offsets(&self) -> &[usize] {
        &self.lookups
    }

    /// Problems found while building that did not prevent it.
    pub fn warnings(&self) -> &[Warning] {
        &self.warnings
    }
}

/// Decide whether a lookup referenced by a selected feature is used.
///
/// Only pair adjustment lookups are; anything else is reported and dropped.
/// Lookup flags and value record fields other than the first glyph's x
/// advance are reported once per lookup and then ignored.
fn classify_lookup(
    lookup_index: u16,
    lookup: &Lookup<'_>,
    warnings: &mut Warnings,
) -> Result<bool, BuildError> {
    match lookup.lookup_type() {
        PAIR_ADJUSTMENT => (),
        // already reported by validation
        EXTENSION => return Ok(false),
        lookup_type => {
            warnings.push(Warning::NotPairAdjustment {
                lookup_index,
                lookup_type,
            });
            return Ok(false);
        }
    }
    let flag = lookup.lookup_flag();
    if !flag.is_empty() {
        warnings.push(Warning::LookupFlagIgnored {
            lookup_index,
            flag: flag.to_bits(),
        });
    }

    let mut second_value_reported = false;
    let mut ignored_fields_reported = false;
    for subtable in lookup.subtables() {
        let subtable = PairPos::read_subtable(subtable?)?;
        if !subtable.value_format2().is_empty() && !second_value_reported {
            second_value_reported = true;
            warnings.push(Warning::SecondValueIgnored { lookup_index });
        }
        let value_format = subtable.value_format1();
        if value_format.intersects(ValueFormat::IGNORED_FIELDS) && !ignored_fields_reported {
            ignored_fields_reported = true;
            warnings.push(Warning::ValueFieldsIgnored {
                lookup_index,
                value_format: value_format.bits(),
            });
        }
    }
    Ok(true)
}

#[cfg(test)]
#[path = "tests/test_kern.rs"]
mod tests;
