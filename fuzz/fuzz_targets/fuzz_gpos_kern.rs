#![no_main]

use gpos_kern::{
    types::{GlyphId16, Tag},
    LookupIndex,
};
use libfuzzer_sys::fuzz_target;

const PAIRS: &[(u16, u16)] = &[(0, 0), (1, 2), (100, 200), (0xFFFF, 0xFFFF)];

fuzz_target!(|data: &[u8]| {
    for script in [None, Some(Tag::new(b"latn"))] {
        let Ok(index) = LookupIndex::build(data, script, None) else {
            continue;
        };
        for (first, second) in PAIRS {
            let _ = index.query(GlyphId16::new(*first), GlyphId16::new(*second));
        }
    }
});
