//! OpenType Layout common table formats

mod class_def;
mod coverage;
mod feature;
mod lookup_flag;
mod script;

pub use class_def::{ClassDef, ClassDefFormat1, ClassRangeRecord};
pub use coverage::{CoverageTable, RangeRecord};
pub use feature::{filter_fn, FeatureFilter, FromFn, KERN};
pub use lookup_flag::LookupFlag;
pub use script::{LangSysSelector, DFLT};

pub(crate) use feature::collect_lookup_indices;

use types::{BigEndian, FixedSize, Tag};

use crate::array::Array;
use crate::read::{FontRead, ReadRecord};
use crate::{FontData, ReadError};

/// A tag and an offset, as used by script, language system and feature records.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct TagRecord {
    tag: BigEndian<Tag>,
    offset: BigEndian<u16>,
}

impl TagRecord {
    pub fn tag(&self) -> Tag {
        self.tag.get()
    }

    /// Offset to the record's table, from the start of the containing list.
    pub fn offset(&self) -> u16 {
        self.offset.get()
    }
}

impl FixedSize for TagRecord {
    const RAW_BYTE_LEN: usize = Tag::RAW_BYTE_LEN + u16::RAW_BYTE_LEN;
}

impl ReadRecord for TagRecord {
    fn read_record(bytes: &[u8]) -> Option<Self> {
        Some(TagRecord {
            tag: BigEndian::from_slice(bytes.get(0..4)?)?,
            offset: BigEndian::from_slice(bytes.get(4..6)?)?,
        })
    }
}

/// The [ScriptList](https://learn.microsoft.com/en-us/typography/opentype/spec/chapter2#script-list-table-and-script-record) table
#[derive(Clone, Copy, Debug)]
pub struct ScriptList<'a> {
    data: FontData<'a>,
    records: Array<'a, TagRecord>,
}

impl<'a> FontRead<'a> for ScriptList<'a> {
    fn read(data: FontData<'a>) -> Result<Self, ReadError> {
        let count: u16 = data.read_at(0)?;
        let records = Array::read(data, 2, count as usize)?;
        Ok(ScriptList { data, records })
    }
}

impl<'a> ScriptList<'a> {
    pub fn script_records(&self) -> &Array<'a, TagRecord> {
        &self.records
    }

    pub fn script_count(&self) -> u16 {
        self.records.len() as u16
    }

    /// Read the script table for a record of this list.
    pub fn script(&self, record: &TagRecord) -> Result<Script<'a>, ReadError> {
        Script::read(self.data.resolve_offset(record.offset())?)
    }
}

/// A [Script](https://learn.microsoft.com/en-us/typography/opentype/spec/chapter2#script-table-and-language-system-record) table
#[derive(Clone, Copy, Debug)]
pub struct Script<'a> {
    data: FontData<'a>,
    default_lang_sys_offset: u16,
    records: Array<'a, TagRecord>,
}

impl<'a> FontRead<'a> for Script<'a> {
    fn read(data: FontData<'a>) -> Result<Self, ReadError> {
        let default_lang_sys_offset = data.read_at(0)?;
        let count: u16 = data.read_at(2)?;
        let records = Array::read(data, 4, count as usize)?;
        Ok(Script {
            data,
            default_lang_sys_offset,
            records,
        })
    }
}

impl<'a> Script<'a> {
    pub fn has_default_lang_sys(&self) -> bool {
        self.default_lang_sys_offset != 0
    }

    /// The default language system, if the offset is not null.
    pub fn default_lang_sys(&self) -> Option<Result<LangSys<'a>, ReadError>> {
        self.has_default_lang_sys().then(|| {
            self.data
                .resolve_offset(self.default_lang_sys_offset)
                .and_then(LangSys::read)
        })
    }

    pub fn lang_sys_records(&self) -> &Array<'a, TagRecord> {
        &self.records
    }

    pub fn lang_sys(&self, record: &TagRecord) -> Result<LangSys<'a>, ReadError> {
        LangSys::read(self.data.resolve_offset(record.offset())?)
    }
}

/// A [LangSys](https://learn.microsoft.com/en-us/typography/opentype/spec/chapter2#language-system-table) table
#[derive(Clone, Copy, Debug)]
pub struct LangSys<'a> {
    lookup_order_offset: u16,
    required_feature_index: u16,
    feature_indices: Array<'a, u16>,
}

impl<'a> FontRead<'a> for LangSys<'a> {
    fn read(data: FontData<'a>) -> Result<Self, ReadError> {
        let mut cursor = data.cursor();
        let lookup_order_offset = cursor.read()?;
        let required_feature_index = cursor.read()?;
        let count: u16 = cursor.read()?;
        let feature_indices = Array::read(data, cursor.position(), count as usize)?;
        Ok(LangSys {
            lookup_order_offset,
            required_feature_index,
            feature_indices,
        })
    }
}

impl<'a> LangSys<'a> {
    /// Sentinel for "no required feature".
    pub const NO_REQUIRED_FEATURE: u16 = 0xFFFF;

    /// Reserved; must be null for us to use this language system.
    pub fn lookup_order_offset(&self) -> u16 {
        self.lookup_order_offset
    }

    pub fn required_feature_index(&self) -> Option<u16> {
        (self.required_feature_index != Self::NO_REQUIRED_FEATURE)
            .then_some(self.required_feature_index)
    }

    pub fn feature_indices(&self) -> &Array<'a, u16> {
        &self.feature_indices
    }

    /// The required feature (if any) followed by the listed features.
    pub fn all_feature_indices(&self) -> impl Iterator<Item = u16> + 'a {
        self.required_feature_index()
            .into_iter()
            .chain(self.feature_indices.iter())
    }
}

/// The [FeatureList](https://learn.microsoft.com/en-us/typography/opentype/spec/chapter2#feature-list-table) table
#[derive(Clone, Copy, Debug)]
pub struct FeatureList<'a> {
    data: FontData<'a>,
    records: Array<'a, TagRecord>,
}

impl<'a> FontRead<'a> for FeatureList<'a> {
    fn read(data: FontData<'a>) -> Result<Self, ReadError> {
        let count: u16 = data.read_at(0)?;
        let records = Array::read(data, 2, count as usize)?;
        Ok(FeatureList { data, records })
    }
}

impl<'a> FeatureList<'a> {
    pub fn feature_records(&self) -> &Array<'a, TagRecord> {
        &self.records
    }

    pub fn feature_count(&self) -> u16 {
        self.records.len() as u16
    }

    pub fn feature(&self, record: &TagRecord) -> Result<Feature<'a>, ReadError> {
        Feature::read(self.data.resolve_offset(record.offset())?)
    }
}

/// A [Feature](https://learn.microsoft.com/en-us/typography/opentype/spec/chapter2#feature-table) table
#[derive(Clone, Copy, Debug)]
pub struct Feature<'a> {
    data: FontData<'a>,
    feature_params_offset: u16,
    lookup_indices: Array<'a, u16>,
}

impl<'a> FontRead<'a> for Feature<'a> {
    fn read(data: FontData<'a>) -> Result<Self, ReadError> {
        let feature_params_offset = data.read_at(0)?;
        let count: u16 = data.read_at(2)?;
        let lookup_indices = Array::read(data, 4, count as usize)?;
        Ok(Feature {
            data,
            feature_params_offset,
            lookup_indices,
        })
    }
}

impl<'a> Feature<'a> {
    pub fn feature_params_offset(&self) -> u16 {
        self.feature_params_offset
    }

    /// The length of the data this feature's offsets are relative to.
    pub(crate) fn data_len(&self) -> usize {
        self.data.len()
    }

    pub fn lookup_indices(&self) -> &Array<'a, u16> {
        &self.lookup_indices
    }
}

/// The [LookupList](https://learn.microsoft.com/en-us/typography/opentype/spec/chapter2#lookup-list-table) table
#[derive(Clone, Copy, Debug)]
pub struct LookupList<'a> {
    data: FontData<'a>,
    offsets: Array<'a, u16>,
}

impl<'a> FontRead<'a> for LookupList<'a> {
    fn read(data: FontData<'a>) -> Result<Self, ReadError> {
        let count: u16 = data.read_at(0)?;
        let offsets = Array::read(data, 2, count as usize)?;
        Ok(LookupList { data, offsets })
    }
}

impl<'a> LookupList<'a> {
    pub fn lookup_count(&self) -> u16 {
        self.offsets.len() as u16
    }

    pub fn get(&self, index: u16) -> Result<Lookup<'a>, ReadError> {
        let offset = self
            .offsets
            .get(index as usize)
            .ok_or(ReadError::OutOfBounds)?;
        Lookup::read(self.data.resolve_offset(offset)?)
    }
}

/// A [Lookup](https://learn.microsoft.com/en-us/typography/opentype/spec/chapter2#lookup-table) table
#[derive(Clone, Copy, Debug)]
pub struct Lookup<'a> {
    data: FontData<'a>,
    lookup_type: u16,
    lookup_flag: LookupFlag,
    subtable_offsets: Array<'a, u16>,
    mark_filtering_set: Option<u16>,
}

impl<'a> FontRead<'a> for Lookup<'a> {
    fn read(data: FontData<'a>) -> Result<Self, ReadError> {
        let mut cursor = data.cursor();
        let lookup_type = cursor.read()?;
        let lookup_flag = LookupFlag::from_bits(cursor.read()?);
        let count: u16 = cursor.read()?;
        let subtable_offsets = Array::read(data, cursor.position(), count as usize)?;
        cursor.advance_by(count as usize * u16::RAW_BYTE_LEN);
        let mark_filtering_set = if lookup_flag.contains(LookupFlag::USE_MARK_FILTERING_SET) {
            Some(cursor.read()?)
        } else {
            None
        };
        Ok(Lookup {
            data,
            lookup_type,
            lookup_flag,
            subtable_offsets,
            mark_filtering_set,
        })
    }
}

impl<'a> Lookup<'a> {
    pub fn lookup_type(&self) -> u16 {
        self.lookup_type
    }

    pub fn lookup_flag(&self) -> LookupFlag {
        self.lookup_flag
    }

    pub fn mark_filtering_set(&self) -> Option<u16> {
        self.mark_filtering_set
    }

    /// Offset of this lookup from the start of the outermost buffer.
    pub fn position(&self) -> usize {
        self.data.position()
    }

    pub fn subtable_count(&self) -> u16 {
        self.subtable_offsets.len() as u16
    }

    /// The data for each subtable, resolved relative to this lookup.
    pub fn subtables(&self) -> impl Iterator<Item = Result<FontData<'a>, ReadError>> + 'a {
        let data = self.data;
        self.subtable_offsets
            .iter()
            .map(move |offset| data.resolve_offset(offset))
    }
}

#[cfg(test)]
#[path = "../tests/layout.rs"]
mod spec_tests;
