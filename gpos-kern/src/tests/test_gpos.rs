use super::*;
use font_test_data::bebuffer::BeBuffer;
use font_test_data::gpos::{
    self as test_data, FeatureDef, GposBuilder, LangSysDef, LookupDef, PairPosFormat1Builder,
    PairPosFormat2Builder, ScriptDef,
};
use pretty_assertions::assert_eq;
use types::GlyphId16;

fn gid(raw: u16) -> GlyphId16 {
    GlyphId16::new(raw)
}

fn validate(data: &[u8]) -> Result<Vec<Warning>, BuildError> {
    let mut warnings = Warnings::default();
    Gpos::read(FontData::new(data))?.validate(&mut warnings)?;
    Ok(warnings.into_vec())
}

fn validate_subtable(subtable: Vec<u8>) -> Result<Vec<Warning>, BuildError> {
    validate(&GposBuilder::with_kern_lookup(LookupDef::pair_pos(subtable)).build())
}

#[test]
fn pairposformat1() {
    // https://learn.microsoft.com/en-us/typography/opentype/spec/gpos#example-4-pairposformat1-subtable
    let table = PairPos::read(test_data::PAIRPOSFORMAT1.into()).unwrap();
    assert_eq!(table.value_format1(), ValueFormat::X_ADVANCE);
    assert_eq!(table.value_format2(), ValueFormat::X_PLACEMENT);
    let PairPos::Format1(format1) = table else {
        panic!("wrong format");
    };
    assert_eq!(format1.pair_set_count(), 2);
    assert_eq!(format1.coverage().unwrap().glyph_count(), Ok(2));
    assert_eq!(table.validate(), Ok(()));

    assert_eq!(table.x_advance(gid(0x2D), gid(0x59)), Some(-30));
    assert_eq!(table.x_advance(gid(0x31), gid(0x59)), Some(-40));
    assert_eq!(table.x_advance(gid(0x2D), gid(0x5A)), None);
    assert_eq!(table.x_advance(gid(0x2E), gid(0x59)), None);
}

#[test]
fn pairposformat2() {
    // https://learn.microsoft.com/en-us/typography/opentype/spec/gpos#example-5-pairposformat2-subtable
    let table = PairPos::read(test_data::PAIRPOSFORMAT2.into()).unwrap();
    assert_eq!(table.value_format1(), ValueFormat::X_ADVANCE);
    assert!(table.value_format2().is_empty());
    let PairPos::Format2(format2) = table else {
        panic!("wrong format");
    };
    assert_eq!(format2.class1_count(), 2);
    assert_eq!(format2.class2_count(), 2);
    assert_eq!(format2.class_def1().unwrap().max_class(), Ok(1));
    assert_eq!(table.validate(), Ok(()));

    assert_eq!(table.x_advance(gid(0x46), gid(0x6A)), Some(-50));
    assert_eq!(table.x_advance(gid(0x49), gid(0x6B)), Some(-50));
    // covered, but the second glyph is in class 0
    assert_eq!(table.x_advance(gid(0x47), gid(0x50)), Some(0));
    // not covered
    assert_eq!(table.x_advance(gid(0x48), gid(0x6A)), None);
}

#[test]
fn placement_fields_are_skipped() {
    let format = ValueFormat::X_PLACEMENT
        | ValueFormat::Y_PLACEMENT
        | ValueFormat::X_ADVANCE
        | ValueFormat::Y_ADVANCE;
    let data = PairPosFormat1Builder::new(format.bits(), 0)
        .pair(10, 20, &[1, 2, -30, 4], &[])
        .pair(10, 21, &[5, 6, -70, 8], &[])
        .build();
    let table = PairPos::read(FontData::new(&data)).unwrap();
    assert_eq!(table.x_advance(gid(10), gid(20)), Some(-30));
    assert_eq!(table.x_advance(gid(10), gid(21)), Some(-70));

    let data = PairPosFormat2Builder::new(format.bits(), 0, 1, 2)
        .coverage([10])
        .class_def2(&[(20, 20, 1)])
        .value(0, 1, &[1, 2, -30, 4], &[])
        .build();
    let table = PairPos::read(FontData::new(&data)).unwrap();
    assert_eq!(table.validate(), Ok(()));
    assert_eq!(table.x_advance(gid(10), gid(20)), Some(-30));
}

#[test]
fn second_value_record_sets_stride() {
    let data = PairPosFormat1Builder::new(0x0004, 0x0005)
        .pair(1, 2, &[-10], &[100, 200])
        .pair(1, 3, &[-20], &[300, 400])
        .pair(1, 4, &[-40], &[500, 600])
        .build();
    let table = PairPos::read(FontData::new(&data)).unwrap();
    assert_eq!(table.validate(), Ok(()));
    assert_eq!(table.x_advance(gid(1), gid(2)), Some(-10));
    assert_eq!(table.x_advance(gid(1), gid(3)), Some(-20));
    assert_eq!(table.x_advance(gid(1), gid(4)), Some(-40));
}

#[test]
fn pair_set_records() {
    let table = PairPos::read(test_data::PAIRPOSFORMAT1.into()).unwrap();
    let PairPos::Format1(format1) = table else {
        panic!("expected format 1");
    };
    let pair_set = format1.pair_set(1).unwrap();
    assert_eq!(pair_set.len(), 1);
    assert_eq!(
        pair_set.get(0),
        Some(PairValueRecord {
            second_glyph: gid(0x59),
            x_advance: -40,
        })
    );
    assert_eq!(pair_set.get(1), None);
    assert!(format1.pair_set(2).is_err());
}

#[test]
fn format2_second_value_record_sets_stride() {
    let data = PairPosFormat2Builder::new(0x0004, 0x0005, 2, 2)
        .coverage([10, 11])
        .class_def1(&[(11, 11, 1)])
        .class_def2(&[(21, 21, 1)])
        .value(0, 0, &[-10], &[100, 200])
        .value(0, 1, &[-20], &[300, 400])
        .value(1, 0, &[-30], &[500, 600])
        .value(1, 1, &[-40], &[700, 800])
        .build();
    let table = PairPos::read(FontData::new(&data)).unwrap();
    assert_eq!(table.validate(), Ok(()));
    assert_eq!(table.x_advance(gid(10), gid(20)), Some(-10));
    assert_eq!(table.x_advance(gid(10), gid(21)), Some(-20));
    assert_eq!(table.x_advance(gid(11), gid(20)), Some(-30));
    assert_eq!(table.x_advance(gid(11), gid(21)), Some(-40));
}

#[test]
fn no_x_advance_is_zero() {
    let data = PairPosFormat1Builder::new(ValueFormat::Y_ADVANCE.bits(), 0)
        .pair(1, 2, &[-10], &[])
        .build();
    let table = PairPos::read(FontData::new(&data)).unwrap();
    assert_eq!(table.x_advance(gid(1), gid(2)), Some(0));
}

#[test]
fn header() {
    let gpos = Gpos::read(test_data::SIMPLE_KERN.into()).unwrap();
    assert_eq!(gpos.minor_version(), 0);
    assert_eq!(validate(test_data::SIMPLE_KERN), Ok(vec![]));

    let data = GposBuilder::with_kern_lookup(LookupDef::new(2))
        .version_1_1(0)
        .build();
    let gpos = Gpos::read(FontData::new(&data)).unwrap();
    assert_eq!(gpos.minor_version(), 1);
    assert_eq!(validate(&data), Ok(vec![]));
}

#[test]
fn short_or_unknown_header() {
    assert_eq!(
        Gpos::read(FontData::new(&test_data::SIMPLE_KERN[..9])).err(),
        Some(BuildError::TableTooShort(9))
    );
    let data = BeBuffer::new().extend([2u16, 0, 10, 10, 10]);
    assert_eq!(
        Gpos::read(FontData::new(&data)).err(),
        Some(BuildError::UnsupportedVersion { major: 2, minor: 0 })
    );
    let data = BeBuffer::new().extend([1u16, 2, 10, 10, 10, 0, 0]);
    assert_eq!(
        Gpos::read(FontData::new(&data)).err(),
        Some(BuildError::UnsupportedVersion { major: 1, minor: 2 })
    );
    // a 1.1 header needs the feature variations offset
    let data = BeBuffer::new().extend([1u16, 1, 10, 10, 10]);
    assert_eq!(
        Gpos::read(FontData::new(&data)).err(),
        Some(BuildError::Read(ReadError::OutOfBounds))
    );
}

#[test]
fn feature_variations_out_of_bounds() {
    let data = GposBuilder::with_kern_lookup(LookupDef::new(2))
        .version_1_1(0xFFFF)
        .build();
    assert_eq!(
        validate(&data),
        Err(BuildError::Read(ReadError::OutOfBounds))
    );
}

#[test]
fn dflt_needs_default_lang_sys() {
    let data = GposBuilder::new()
        .script(ScriptDef::new(b"DFLT").lang_sys(b"TRK ", LangSysDef::new([])))
        .build();
    assert_eq!(validate(&data), Err(BuildError::MissingDefaultLangSys));
}

#[test]
fn dflt_not_first_is_a_warning() {
    let data = GposBuilder::new()
        .script(ScriptDef::new(b"cyrl").default_lang_sys(LangSysDef::new([])))
        .script(ScriptDef::new(b"DFLT").default_lang_sys(LangSysDef::new([])))
        .build();
    assert_eq!(
        validate(&data),
        Ok(vec![Warning::DefaultScriptNotFirst { position: 1 }])
    );
}

#[test]
fn lookup_order_is_rejected() {
    let data = GposBuilder::new()
        .script(
            ScriptDef::new(b"latn")
                .lang_sys(b"TRK ", LangSysDef::new([]).lookup_order(4)),
        )
        .build();
    assert_eq!(validate(&data), Err(BuildError::LookupOrderNotSupported));
}

#[test]
fn indices_out_of_range() {
    let data = GposBuilder::new()
        .script(ScriptDef::new(b"DFLT").default_lang_sys(LangSysDef::new([0, 1])))
        .feature(b"kern", [])
        .build();
    assert_eq!(
        validate(&data),
        Err(BuildError::FeatureIndexOutOfRange { index: 1, count: 1 })
    );

    let data = GposBuilder::new()
        .script(ScriptDef::new(b"DFLT").default_lang_sys(LangSysDef::new([]).required_feature(0)))
        .build();
    assert_eq!(
        validate(&data),
        Err(BuildError::FeatureIndexOutOfRange { index: 0, count: 0 })
    );

    let data = GposBuilder::new()
        .feature(b"kern", [0, 2])
        .lookup(LookupDef::new(2))
        .lookup(LookupDef::new(2))
        .build();
    assert_eq!(
        validate(&data),
        Err(BuildError::LookupIndexOutOfRange { index: 2, count: 2 })
    );
}

#[test]
fn feature_params_out_of_bounds() {
    let data = GposBuilder::new()
        .feature_def(FeatureDef::new(b"kern", []).params_offset(0xFFFF))
        .build();
    assert_eq!(
        validate(&data),
        Err(BuildError::Read(ReadError::OutOfBounds))
    );
}

#[test]
fn lookup_flags() {
    let data = GposBuilder::new()
        .lookup(LookupDef::new(2).flag(0x0020))
        .build();
    assert_eq!(
        validate(&data),
        Err(BuildError::ReservedLookupFlag {
            lookup_index: 0,
            flag: 0x0020
        })
    );

    let rtl = LookupFlag::RIGHT_TO_LEFT.to_bits();
    let data = GposBuilder::new()
        .lookup(LookupDef::new(3).flag(rtl))
        .lookup(LookupDef::new(2).flag(rtl))
        .build();
    assert_eq!(
        validate(&data),
        Err(BuildError::RightToLeftNotCursive {
            lookup_index: 1,
            lookup_type: 2
        })
    );

    // other flags are fine here; they are only reported if the lookup is used
    let data = GposBuilder::new()
        .lookup(LookupDef::new(2).flag(0x0008).mark_filtering_set(0))
        .build();
    assert_eq!(validate(&data), Ok(vec![]));
}

#[test]
fn extension_lookups_warn_once() {
    let data = GposBuilder::new()
        .lookup(LookupDef::new(9))
        .lookup(LookupDef::new(2))
        .lookup(LookupDef::new(9))
        .build();
    assert_eq!(
        validate(&data),
        Ok(vec![Warning::ExtensionLookup { lookup_index: 0 }])
    );
}

#[test]
fn other_lookup_types_are_not_inspected() {
    let data = GposBuilder::new()
        .lookup(LookupDef::new(4).subtable(vec![0xFF, 0xFF]))
        .build();
    assert_eq!(validate(&data), Ok(vec![]));
}

#[test]
fn reserved_value_format() {
    let subtable = PairPosFormat1Builder::new(0x0104, 0)
        .pair(1, 2, &[-10], &[])
        .build();
    assert_eq!(
        validate_subtable(subtable),
        Err(BuildError::ReservedValueFormat(0x0104))
    );
}

#[test]
fn unknown_pair_pos_format() {
    let subtable = BeBuffer::new().extend([3u16, 0, 0, 0]).into_vec();
    assert_eq!(
        validate_subtable(subtable),
        Err(BuildError::InvalidPairPosFormat(3))
    );
}

#[test]
fn every_pair_set_is_checked() {
    let mut subtable = test_data::PAIRPOSFORMAT1.to_vec();
    // second pair set offset
    subtable[12..14].copy_from_slice(&0x0100u16.to_be_bytes());
    assert_eq!(
        validate_subtable(subtable),
        Err(BuildError::Read(ReadError::OutOfBounds))
    );

    // the last pair set claims more records than the subtable holds
    let mut subtable = test_data::PAIRPOSFORMAT1.to_vec();
    subtable[22..24].copy_from_slice(&0x0100u16.to_be_bytes());
    assert_eq!(
        validate_subtable(subtable),
        Err(BuildError::Read(ReadError::OutOfBounds))
    );
}

#[test]
fn coverage_larger_than_pair_sets() {
    let subtable = BeBuffer::new()
        // format, coverage offset, value formats, one pair set at 12
        .extend([1u16, 18, 0x0004, 0, 1, 12])
        .extend([1u16, 7])
        .push(-50i16)
        // two covered glyphs
        .extend([1u16, 2, 5, 6])
        .into_vec();
    assert_eq!(
        validate_subtable(subtable),
        Err(BuildError::CoverageExceedsPairSets {
            coverage_glyphs: 2,
            pair_set_count: 1,
        })
    );
}

#[test]
fn class_matrix_out_of_bounds() {
    let mut subtable = test_data::PAIRPOSFORMAT2.to_vec();
    // class1Count
    subtable[12..14].copy_from_slice(&100u16.to_be_bytes());
    assert_eq!(
        validate_subtable(subtable),
        Err(BuildError::Read(ReadError::OutOfBounds))
    );
}

#[test]
fn class_count_too_small() {
    let subtable = PairPosFormat2Builder::new(0x0004, 0, 1, 2)
        .coverage([10])
        .class_def2(&[(20, 20, 1), (21, 21, 2)])
        .build();
    assert_eq!(
        validate_subtable(subtable),
        Err(BuildError::ClassCountTooSmall {
            max_class: 2,
            class_count: 2
        })
    );
}

#[test]
fn malformed_coverage() {
    let subtable = PairPosFormat2Builder::new(0x0004, 0, 1, 1)
        .coverage([10])
        .build();
    let mut subtable = subtable;
    // coverage format
    let coverage_offset = u16::from_be_bytes([subtable[2], subtable[3]]) as usize;
    subtable[coverage_offset + 1] = 3;
    assert_eq!(
        validate_subtable(subtable),
        Err(BuildError::Read(ReadError::InvalidFormat(3)))
    );
}
