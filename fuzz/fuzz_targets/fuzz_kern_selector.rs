#![no_main]

use gpos_kern::{
    filter_fn,
    types::{GlyphId16, Tag},
    LangSysSelector, LookupIndex,
};
use libfuzzer_sys::{arbitrary, fuzz_target};

#[derive(Debug, arbitrary::Arbitrary)]
struct Input {
    script: Option<[u8; 4]>,
    language: Option<[u8; 4]>,
    fallback_to_default: bool,
    any_feature: bool,
    pairs: Vec<(u16, u16)>,
    table: Vec<u8>,
}

fuzz_target!(|input: Input| {
    let selector = LangSysSelector {
        script: input.script.map(Tag::from_be_bytes),
        language: input.language.map(Tag::from_be_bytes),
        fallback_to_default: input.fallback_to_default,
    };
    let any_feature = input.any_feature;
    let filter = filter_fn(|tag| any_feature || tag == gpos_kern::KERN);
    let Ok(index) = LookupIndex::build_with(&input.table, &selector, &filter) else {
        return;
    };
    for (first, second) in input.pairs.iter().take(64) {
        let first = GlyphId16::new(*first);
        let second = GlyphId16::new(*second);
        assert_eq!(index.query(first, second), index.query(first, second));
    }
});
