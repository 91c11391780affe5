//! GPOS test data: examples from the OpenType spec, and builders for
//! synthetic tables.

use std::collections::BTreeMap;

use font_types::Tag;

use crate::bebuffer::BeBuffer;

// https://learn.microsoft.com/en-us/typography/opentype/spec/gpos#example-4-pairposformat1-subtable
#[rustfmt::skip]
pub static PAIRPOSFORMAT1: &[u8] = &[
    0x00, 0x01, // format 1
    0x00, 0x1E, // coverage offset 30
    0x00, 0x04, // valueFormat1: X_ADVANCE
    0x00, 0x01, // valueFormat2: X_PLACEMENT
    0x00, 0x02, // pairSetCount
    0x00, 0x0E, // pairSetOffsets[0]: 14
    0x00, 0x16, // pairSetOffsets[1]: 22
    // PairSet 0
    0x00, 0x01, // pairValueCount
    0x00, 0x59, // secondGlyph
    0xFF, 0xE2, // valueRecord1.xAdvance: -30
    0xFF, 0xEC, // valueRecord2.xPlacement: -20
    // PairSet 1
    0x00, 0x01, // pairValueCount
    0x00, 0x59, // secondGlyph
    0xFF, 0xD8, // valueRecord1.xAdvance: -40
    0xFF, 0xE7, // valueRecord2.xPlacement: -25
    // Coverage
    0x00, 0x01, // format 1
    0x00, 0x02, // glyphCount
    0x00, 0x2D, // glyph 45
    0x00, 0x31, // glyph 49
];

// https://learn.microsoft.com/en-us/typography/opentype/spec/gpos#example-5-pairposformat2-subtable
#[rustfmt::skip]
pub static PAIRPOSFORMAT2: &[u8] = &[
    0x00, 0x02, // format 2
    0x00, 0x18, // coverage offset 24
    0x00, 0x04, // valueFormat1: X_ADVANCE
    0x00, 0x00, // valueFormat2: none
    0x00, 0x22, // classDef1 offset 34
    0x00, 0x32, // classDef2 offset 50
    0x00, 0x02, // class1Count
    0x00, 0x02, // class2Count
    0x00, 0x00, // class1Records[0].class2Records[0].xAdvance
    0x00, 0x00, // class1Records[0].class2Records[1].xAdvance
    0x00, 0x00, // class1Records[1].class2Records[0].xAdvance
    0xFF, 0xCE, // class1Records[1].class2Records[1].xAdvance: -50
    // Coverage
    0x00, 0x01, // format 1
    0x00, 0x03, // glyphCount
    0x00, 0x46, 0x00, 0x47, 0x00, 0x49,
    // ClassDef1
    0x00, 0x02, // format 2
    0x00, 0x02, // classRangeCount
    0x00, 0x46, 0x00, 0x47, 0x00, 0x01, // 70..=71: class 1
    0x00, 0x49, 0x00, 0x49, 0x00, 0x01, // 73: class 1
    // ClassDef2
    0x00, 0x02, // format 2
    0x00, 0x01, // classRangeCount
    0x00, 0x6A, 0x00, 0x6B, 0x00, 0x01, // 106..=107: class 1
];

/// A complete table: the DFLT script's default language system has a
/// single `kern` feature whose only lookup moves glyph 200 closer to glyph
/// 100 by 50 units.
#[rustfmt::skip]
pub static SIMPLE_KERN: &[u8] = &[
    0x00, 0x01, 0x00, 0x00, // version 1.0
    0x00, 0x0A,             // scriptListOffset 10
    0x00, 0x1E,             // featureListOffset 30
    0x00, 0x2C,             // lookupListOffset 44
    // ScriptList (10)
    0x00, 0x01,             // scriptCount
    b'D', b'F', b'L', b'T', 0x00, 0x08,
    // Script (18)
    0x00, 0x04,             // defaultLangSysOffset
    0x00, 0x00,             // langSysCount
    // LangSys (22)
    0x00, 0x00,             // lookupOrderOffset
    0xFF, 0xFF,             // requiredFeatureIndex: none
    0x00, 0x01,             // featureIndexCount
    0x00, 0x00,             // featureIndices[0]
    // FeatureList (30)
    0x00, 0x01,             // featureCount
    b'k', b'e', b'r', b'n', 0x00, 0x08,
    // Feature (38)
    0x00, 0x00,             // featureParamsOffset
    0x00, 0x01,             // lookupIndexCount
    0x00, 0x00,             // lookupListIndices[0]
    // LookupList (44)
    0x00, 0x01,             // lookupCount
    0x00, 0x04,             // lookupOffsets[0]
    // Lookup (48)
    0x00, 0x02,             // lookupType: pair adjustment
    0x00, 0x00,             // lookupFlag
    0x00, 0x01,             // subTableCount
    0x00, 0x08,             // subtableOffsets[0]
    // PairPosFormat1 (56)
    0x00, 0x01,             // format
    0x00, 0x12,             // coverageOffset 18
    0x00, 0x04,             // valueFormat1: X_ADVANCE
    0x00, 0x00,             // valueFormat2
    0x00, 0x01,             // pairSetCount
    0x00, 0x0C,             // pairSetOffsets[0]
    // PairSet
    0x00, 0x01,             // pairValueCount
    0x00, 0xC8,             // secondGlyph 200
    0xFF, 0xCE,             // xAdvance -50
    // Coverage
    0x00, 0x01,             // format 1
    0x00, 0x01,             // glyphCount
    0x00, 0x64,             // glyph 100
];

/// The value of `requiredFeatureIndex` when there is no required feature.
pub const NO_REQUIRED_FEATURE: u16 = 0xFFFF;

/// Assembles a GPOS table from its scripts, features and lookups.
///
/// Every offset is computed; tables are written in the order they are
/// declared, each list followed by the tables it points to.
#[derive(Clone, Debug, Default)]
pub struct GposBuilder {
    feature_variations_offset: Option<u32>,
    scripts: Vec<ScriptDef>,
    features: Vec<FeatureDef>,
    lookups: Vec<LookupDef>,
}

impl GposBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// A table where the default language system of the `DFLT` script has a
    /// single `kern` feature pointing at `lookup`.
    pub fn with_kern_lookup(lookup: LookupDef) -> Self {
        Self::new()
            .script(ScriptDef::new(b"DFLT").default_lang_sys(LangSysDef::new([0])))
            .feature(b"kern", [0])
            .lookup(lookup)
    }

    /// Write a version 1.1 header with the given feature variations offset.
    pub fn version_1_1(mut self, feature_variations_offset: u32) -> Self {
        self.feature_variations_offset = Some(feature_variations_offset);
        self
    }

    pub fn script(mut self, script: ScriptDef) -> Self {
        self.scripts.push(script);
        self
    }

    pub fn feature(self, tag: &[u8; 4], lookup_indices: impl IntoIterator<Item = u16>) -> Self {
        self.feature_def(FeatureDef::new(tag, lookup_indices))
    }

    pub fn feature_def(mut self, feature: FeatureDef) -> Self {
        self.features.push(feature);
        self
    }

    pub fn lookup(mut self, lookup: LookupDef) -> Self {
        self.lookups.push(lookup);
        self
    }

    pub fn build(&self) -> Vec<u8> {
        let script_list = tag_list(
            self.scripts
                .iter()
                .map(|script| (script.tag, script.compile())),
        );
        let feature_list = tag_list(
            self.features
                .iter()
                .map(|feature| (feature.tag, feature.compile())),
        );
        let lookups: Vec<_> = self.lookups.iter().map(LookupDef::compile).collect();
        let lookup_offsets = offsets_after(2 + 2 * lookups.len(), &lookups);
        let lookup_list = BeBuffer::new()
            .push(lookups.len() as u16)
            .extend(lookup_offsets);
        let lookup_list = append_all(lookup_list, &lookups);

        let header_len = if self.feature_variations_offset.is_some() {
            14
        } else {
            10
        };
        let lists = [script_list, feature_list, lookup_list];
        let mut buf = BeBuffer::new()
            .push(1u16)
            .push(self.feature_variations_offset.map_or(0u16, |_| 1))
            .extend(offsets_after(header_len, &lists));
        if let Some(offset) = self.feature_variations_offset {
            buf = buf.push(offset);
        }
        append_all(buf, &lists)
    }
}

/// A script table, with an optional default language system.
#[derive(Clone, Debug)]
pub struct ScriptDef {
    tag: Tag,
    default_lang_sys: Option<LangSysDef>,
    lang_sys: Vec<(Tag, LangSysDef)>,
}

impl ScriptDef {
    pub fn new(tag: &[u8; 4]) -> Self {
        ScriptDef {
            tag: Tag::new(tag),
            default_lang_sys: None,
            lang_sys: Vec::new(),
        }
    }

    pub fn default_lang_sys(mut self, lang_sys: LangSysDef) -> Self {
        self.default_lang_sys = Some(lang_sys);
        self
    }

    pub fn lang_sys(mut self, tag: &[u8; 4], lang_sys: LangSysDef) -> Self {
        self.lang_sys.push((Tag::new(tag), lang_sys));
        self
    }

    fn compile(&self) -> Vec<u8> {
        let mut tables: Vec<_> = self.default_lang_sys.iter().map(LangSysDef::compile).collect();
        tables.extend(self.lang_sys.iter().map(|(_, lang_sys)| lang_sys.compile()));
        let offsets = offsets_after(4 + 6 * self.lang_sys.len(), &tables);
        let (default_offset, record_offsets) = match self.default_lang_sys {
            Some(_) => (offsets[0], &offsets[1..]),
            None => (0, &offsets[..]),
        };
        let mut buf = BeBuffer::new()
            .push(default_offset)
            .push(self.lang_sys.len() as u16);
        for ((tag, _), offset) in self.lang_sys.iter().zip(record_offsets) {
            buf = buf.push(*tag).push(*offset);
        }
        append_all(buf, &tables)
    }
}

/// A language system table.
#[derive(Clone, Debug)]
pub struct LangSysDef {
    lookup_order_offset: u16,
    required_feature_index: u16,
    feature_indices: Vec<u16>,
}

impl LangSysDef {
    pub fn new(feature_indices: impl IntoIterator<Item = u16>) -> Self {
        LangSysDef {
            lookup_order_offset: 0,
            required_feature_index: NO_REQUIRED_FEATURE,
            feature_indices: feature_indices.into_iter().collect(),
        }
    }

    pub fn required_feature(mut self, index: u16) -> Self {
        self.required_feature_index = index;
        self
    }

    /// Set the reserved lookup order offset.
    pub fn lookup_order(mut self, offset: u16) -> Self {
        self.lookup_order_offset = offset;
        self
    }

    fn compile(&self) -> Vec<u8> {
        BeBuffer::new()
            .push(self.lookup_order_offset)
            .push(self.required_feature_index)
            .push(self.feature_indices.len() as u16)
            .extend(self.feature_indices.iter().copied())
            .into_vec()
    }
}

/// A feature table and its tag.
#[derive(Clone, Debug)]
pub struct FeatureDef {
    tag: Tag,
    params_offset: u16,
    lookup_indices: Vec<u16>,
}

impl FeatureDef {
    pub fn new(tag: &[u8; 4], lookup_indices: impl IntoIterator<Item = u16>) -> Self {
        FeatureDef {
            tag: Tag::new(tag),
            params_offset: 0,
            lookup_indices: lookup_indices.into_iter().collect(),
        }
    }

    /// Set the feature params offset; nothing is written there.
    pub fn params_offset(mut self, offset: u16) -> Self {
        self.params_offset = offset;
        self
    }

    fn compile(&self) -> Vec<u8> {
        BeBuffer::new()
            .push(self.params_offset)
            .push(self.lookup_indices.len() as u16)
            .extend(self.lookup_indices.iter().copied())
            .into_vec()
    }
}

/// A lookup table and its (already compiled) subtables.
#[derive(Clone, Debug)]
pub struct LookupDef {
    lookup_type: u16,
    lookup_flag: u16,
    mark_filtering_set: Option<u16>,
    subtables: Vec<Vec<u8>>,
}

impl LookupDef {
    pub fn new(lookup_type: u16) -> Self {
        LookupDef {
            lookup_type,
            lookup_flag: 0,
            mark_filtering_set: None,
            subtables: Vec::new(),
        }
    }

    /// A pair adjustment lookup with a single subtable.
    pub fn pair_pos(subtable: Vec<u8>) -> Self {
        Self::new(2).subtable(subtable)
    }

    pub fn flag(mut self, flag: u16) -> Self {
        self.lookup_flag = flag;
        self
    }

    /// Sets the USE_MARK_FILTERING_SET flag and writes the set index.
    pub fn mark_filtering_set(mut self, set: u16) -> Self {
        self.lookup_flag |= 0x0010;
        self.mark_filtering_set = Some(set);
        self
    }

    pub fn subtable(mut self, subtable: Vec<u8>) -> Self {
        self.subtables.push(subtable);
        self
    }

    fn compile(&self) -> Vec<u8> {
        let header_len =
            6 + 2 * self.subtables.len() + 2 * usize::from(self.mark_filtering_set.is_some());
        let mut buf = BeBuffer::new()
            .push(self.lookup_type)
            .push(self.lookup_flag)
            .push(self.subtables.len() as u16)
            .extend(offsets_after(header_len, &self.subtables));
        if let Some(set) = self.mark_filtering_set {
            buf = buf.push(set);
        }
        append_all(buf, &self.subtables)
    }
}

/// Builds a PairPos format 1 subtable from individual glyph pairs.
///
/// Pair sets and their records are written in glyph order, with a format 1
/// coverage table after them.
#[derive(Clone, Debug, Default)]
pub struct PairPosFormat1Builder {
    value_format1: u16,
    value_format2: u16,
    pair_sets: BTreeMap<u16, BTreeMap<u16, (Vec<i16>, Vec<i16>)>>,
}

impl PairPosFormat1Builder {
    pub fn new(value_format1: u16, value_format2: u16) -> Self {
        PairPosFormat1Builder {
            value_format1,
            value_format2,
            ..Default::default()
        }
    }

    /// Add a pair; the values are the fields of each value record, in order.
    pub fn pair(mut self, first: u16, second: u16, value1: &[i16], value2: &[i16]) -> Self {
        assert_eq!(value1.len(), value_record_fields(self.value_format1));
        assert_eq!(value2.len(), value_record_fields(self.value_format2));
        self.pair_sets
            .entry(first)
            .or_default()
            .insert(second, (value1.to_vec(), value2.to_vec()));
        self
    }

    pub fn build(&self) -> Vec<u8> {
        let pair_sets: Vec<_> = self
            .pair_sets
            .values()
            .map(|records| {
                let mut buf = BeBuffer::new().push(records.len() as u16);
                for (second, (value1, value2)) in records {
                    buf = buf
                        .push(*second)
                        .extend(value1.iter().copied())
                        .extend(value2.iter().copied());
                }
                buf.into_vec()
            })
            .collect();
        let header_len = 10 + 2 * pair_sets.len();
        let coverage_offset = header_len + pair_sets.iter().map(Vec::len).sum::<usize>();
        let first_glyphs: Vec<_> = self.pair_sets.keys().copied().collect();
        let buf = BeBuffer::new()
            .push(1u16)
            .push(coverage_offset as u16)
            .push(self.value_format1)
            .push(self.value_format2)
            .push(pair_sets.len() as u16)
            .extend(offsets_after(header_len, &pair_sets));
        let mut bytes = append_all(buf, &pair_sets);
        bytes.extend(coverage_format1(&first_glyphs));
        bytes
    }
}

/// Builds a PairPos format 2 subtable.
///
/// Cells of the class matrix that are not set are written as zeros.
#[derive(Clone, Debug, Default)]
pub struct PairPosFormat2Builder {
    value_format1: u16,
    value_format2: u16,
    class1_count: u16,
    class2_count: u16,
    coverage: Vec<u16>,
    class_def1: Vec<(u16, u16, u16)>,
    class_def2: Vec<(u16, u16, u16)>,
    values: BTreeMap<(u16, u16), (Vec<i16>, Vec<i16>)>,
}

impl PairPosFormat2Builder {
    pub fn new(value_format1: u16, value_format2: u16, class1_count: u16, class2_count: u16) -> Self {
        PairPosFormat2Builder {
            value_format1,
            value_format2,
            class1_count,
            class2_count,
            ..Default::default()
        }
    }

    pub fn coverage(mut self, glyphs: impl IntoIterator<Item = u16>) -> Self {
        self.coverage = glyphs.into_iter().collect();
        self
    }

    /// Ranges of `(start, end, class)` for the first glyph.
    pub fn class_def1(mut self, ranges: &[(u16, u16, u16)]) -> Self {
        self.class_def1 = ranges.to_vec();
        self
    }

    /// Ranges of `(start, end, class)` for the second glyph.
    pub fn class_def2(mut self, ranges: &[(u16, u16, u16)]) -> Self {
        self.class_def2 = ranges.to_vec();
        self
    }

    pub fn value(mut self, class1: u16, class2: u16, value1: &[i16], value2: &[i16]) -> Self {
        assert_eq!(value1.len(), value_record_fields(self.value_format1));
        assert_eq!(value2.len(), value_record_fields(self.value_format2));
        self.values
            .insert((class1, class2), (value1.to_vec(), value2.to_vec()));
        self
    }

    pub fn build(&self) -> Vec<u8> {
        let record_fields =
            value_record_fields(self.value_format1) + value_record_fields(self.value_format2);
        let matrix_len =
            self.class1_count as usize * self.class2_count as usize * record_fields * 2;
        let children = [
            coverage_format1(&self.coverage),
            class_def_format2(&self.class_def1),
            class_def_format2(&self.class_def2),
        ];
        let offsets = offsets_after(16 + matrix_len, &children);
        let mut buf = BeBuffer::new()
            .push(2u16)
            .push(offsets[0])
            .push(self.value_format1)
            .push(self.value_format2)
            .push(offsets[1])
            .push(offsets[2])
            .push(self.class1_count)
            .push(self.class2_count);
        for class1 in 0..self.class1_count {
            for class2 in 0..self.class2_count {
                buf = match self.values.get(&(class1, class2)) {
                    Some((value1, value2)) => buf
                        .extend(value1.iter().copied())
                        .extend(value2.iter().copied()),
                    None => buf.extend(std::iter::repeat(0i16).take(record_fields)),
                };
            }
        }
        append_all(buf, &children)
    }
}

/// A format 1 coverage table for the given (sorted) glyphs.
pub fn coverage_format1(glyphs: &[u16]) -> Vec<u8> {
    BeBuffer::new()
        .push(1u16)
        .push(glyphs.len() as u16)
        .extend(glyphs.iter().copied())
        .into_vec()
}

/// A format 2 class definition table from `(start, end, class)` ranges.
pub fn class_def_format2(ranges: &[(u16, u16, u16)]) -> Vec<u8> {
    let mut buf = BeBuffer::new().push(2u16).push(ranges.len() as u16);
    for (start, end, class) in ranges {
        buf = buf.push(*start).push(*end).push(*class);
    }
    buf.into_vec()
}

/// The number of 16-bit fields in a value record of this format.
pub fn value_record_fields(value_format: u16) -> usize {
    (value_format & 0x00FF).count_ones() as usize
}

/// A list of tag records followed by the tables they point to.
fn tag_list(records: impl Iterator<Item = (Tag, Vec<u8>)>) -> Vec<u8> {
    let (tags, tables): (Vec<_>, Vec<_>) = records.unzip();
    let offsets = offsets_after(2 + 6 * tags.len(), &tables);
    let mut buf = BeBuffer::new().push(tags.len() as u16);
    for (tag, offset) in tags.into_iter().zip(offsets) {
        buf = buf.push(tag).push(offset);
    }
    append_all(buf, &tables)
}

/// The offset of each table when they are written in order after a header
/// of `header_len` bytes.
fn offsets_after(header_len: usize, tables: &[Vec<u8>]) -> Vec<u16> {
    let mut offset = header_len;
    tables
        .iter()
        .map(|table| {
            let this = u16::try_from(offset).expect("offset does not fit in 16 bits");
            offset += table.len();
            this
        })
        .collect()
}

fn append_all(buf: BeBuffer, tables: &[Vec<u8>]) -> Vec<u8> {
    tables
        .iter()
        .fold(buf, |buf, table| buf.append(table))
        .into_vec()
}
