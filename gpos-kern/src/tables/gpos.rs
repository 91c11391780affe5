//! the [GPOS] table
//!
//! [GPOS]: https://docs.microsoft.com/en-us/typography/opentype/spec/gpos

mod pair_pos;
mod value_format;

pub use pair_pos::{PairPos, PairPosFormat1, PairPosFormat2, PairValueRecord};
pub use value_format::ValueFormat;

use std::collections::HashSet;

use types::Tag;

use super::layout::{FeatureList, LangSys, LookupFlag, LookupList, ScriptList, DFLT};
use crate::error::{BuildError, Warning, Warnings};
use crate::read::FontRead;
use crate::{FontData, ReadError};

/// 'GPOS'
pub const TAG: Tag = Tag::new(b"GPOS");

/// The size of a version 1.0 header.
pub const MIN_HEADER_LEN: usize = 10;

/// Lookup type 2: pair adjustment
pub const PAIR_ADJUSTMENT: u16 = 2;
/// Lookup type 3: cursive attachment
pub const CURSIVE_ATTACHMENT: u16 = 3;
/// Lookup type 9: extension positioning
pub const EXTENSION: u16 = 9;

/// The header of a GPOS table, version 1.0 or 1.1.
#[derive(Clone, Copy, Debug)]
pub struct Gpos<'a> {
    data: FontData<'a>,
    minor_version: u16,
    script_list_offset: u16,
    feature_list_offset: u16,
    lookup_list_offset: u16,
    feature_variations_offset: Option<u32>,
}

impl<'a> Gpos<'a> {
    /// Read the header.
    ///
    /// This checks the version and that the header fits; it does not look
    /// at any of the subtables. See [`Gpos::validate`].
    pub fn read(data: FontData<'a>) -> Result<Self, BuildError> {
        if data.len() < MIN_HEADER_LEN {
            return Err(BuildError::TableTooShort(data.len()));
        }
        let mut cursor = data.cursor();
        let major: u16 = cursor.read()?;
        let minor: u16 = cursor.read()?;
        if major != 1 || minor > 1 {
            return Err(BuildError::UnsupportedVersion { major, minor });
        }
        let script_list_offset = cursor.read()?;
        let feature_list_offset = cursor.read()?;
        let lookup_list_offset = cursor.read()?;
        let feature_variations_offset = if minor == 1 {
            Some(cursor.read()?)
        } else {
            None
        };
        Ok(Gpos {
            data,
            minor_version: minor,
            script_list_offset,
            feature_list_offset,
            lookup_list_offset,
            feature_variations_offset,
        })
    }

    pub fn minor_version(&self) -> u16 {
        self.minor_version
    }

    pub fn script_list(&self) -> Result<ScriptList<'a>, ReadError> {
        ScriptList::read(self.data.resolve_offset(self.script_list_offset)?)
    }

    pub fn feature_list(&self) -> Result<FeatureList<'a>, ReadError> {
        FeatureList::read(self.data.resolve_offset(self.feature_list_offset)?)
    }

    pub fn lookup_list(&self) -> Result<LookupList<'a>, ReadError> {
        LookupList::read(self.data.resolve_offset(self.lookup_list_offset)?)
    }

    /// Walk the whole table, checking every offset and count that a later
    /// selection or query will follow.
    ///
    /// Lookups we don't use are only checked as far as their headers, apart
    /// from the lookup flag. Findings that don't make the table unusable are
    /// pushed to `warnings`.
    pub(crate) fn validate(&self, warnings: &mut Warnings) -> Result<(), BuildError> {
        // feature variations are never interpreted, but the offset has to
        // leave room for the header
        if let Some(offset) = self.feature_variations_offset {
            let offset = usize::try_from(offset).map_err(|_| ReadError::OutOfBounds)?;
            if offset > self.data.len().saturating_sub(8) {
                return Err(ReadError::OutOfBounds.into());
            }
        }

        let script_list = self.script_list()?;
        let feature_list = self.feature_list()?;
        let lookup_list = self.lookup_list()?;

        let feature_count = feature_list.feature_count();
        if let Some(index) = check_script_list(&script_list, warnings)? {
            if index >= feature_count {
                return Err(BuildError::FeatureIndexOutOfRange {
                    index,
                    count: feature_count,
                });
            }
        }

        let lookup_count = lookup_list.lookup_count();
        if let Some(index) = check_feature_list(&feature_list)? {
            if index >= lookup_count {
                return Err(BuildError::LookupIndexOutOfRange {
                    index,
                    count: lookup_count,
                });
            }
        }

        check_lookup_list(&lookup_list, warnings)
    }
}

/// Returns the largest feature index referenced by any language system.
fn check_script_list(
    script_list: &ScriptList<'_>,
    warnings: &mut Warnings,
) -> Result<Option<u16>, BuildError> {
    let mut max_index = None;
    for (i, record) in script_list.script_records().iter().enumerate() {
        let script = script_list.script(&record)?;
        if record.tag() == DFLT {
            if !script.has_default_lang_sys() {
                return Err(BuildError::MissingDefaultLangSys);
            }
            if i != 0 {
                warnings.push(Warning::DefaultScriptNotFirst { position: i as u16 });
            }
        }
        if let Some(lang_sys) = script.default_lang_sys() {
            max_index = max_index.max(check_lang_sys(&lang_sys?)?);
        }
        for lang_record in script.lang_sys_records().iter() {
            let lang_sys = script.lang_sys(&lang_record)?;
            max_index = max_index.max(check_lang_sys(&lang_sys)?);
        }
    }
    Ok(max_index)
}

fn check_lang_sys(lang_sys: &LangSys<'_>) -> Result<Option<u16>, BuildError> {
    // no support for feature table substitution
    if lang_sys.lookup_order_offset() != 0 {
        return Err(BuildError::LookupOrderNotSupported);
    }
    Ok(lang_sys.all_feature_indices().max())
}

/// Returns the largest lookup index referenced by any feature.
fn check_feature_list(feature_list: &FeatureList<'_>) -> Result<Option<u16>, BuildError> {
    let mut max_index = None;
    for record in feature_list.feature_records().iter() {
        let feature = feature_list.feature(&record)?;
        // contents depend on the feature tag; we only check the offset
        if feature.feature_params_offset() as usize > feature.data_len() {
            return Err(ReadError::OutOfBounds.into());
        }
        max_index = max_index.max(feature.lookup_indices().iter().max());
    }
    Ok(max_index)
}

fn check_lookup_list(
    lookup_list: &LookupList<'_>,
    warnings: &mut Warnings,
) -> Result<(), BuildError> {
    // offsets may be shared; each lookup and subtable is checked once
    let mut seen_lookups = HashSet::new();
    let mut seen_subtables = HashSet::new();
    for lookup_index in 0..lookup_list.lookup_count() {
        let lookup = lookup_list.get(lookup_index)?;
        if !seen_lookups.insert(lookup.position()) {
            continue;
        }
        let flag = lookup.lookup_flag();
        if flag.has_reserved_bits() {
            return Err(BuildError::ReservedLookupFlag {
                lookup_index,
                flag: flag.to_bits(),
            });
        }
        let lookup_type = lookup.lookup_type();
        if lookup_type == EXTENSION {
            warnings.push(Warning::ExtensionLookup { lookup_index });
            continue;
        }
        if flag.contains(LookupFlag::RIGHT_TO_LEFT) && lookup_type != CURSIVE_ATTACHMENT {
            return Err(BuildError::RightToLeftNotCursive {
                lookup_index,
                lookup_type,
            });
        }
        for subtable in lookup.subtables() {
            let subtable = subtable?;
            // other lookup types are never selected, so we don't look inside
            if lookup_type == PAIR_ADJUSTMENT && seen_subtables.insert(subtable.position()) {
                PairPos::read_subtable(subtable)?.validate()?;
            }
        }
    }
    Ok(())
}

#[cfg(test)]
#[path = "../tests/test_gpos.rs"]
mod spec_tests;
