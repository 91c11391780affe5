//! Print the GPOS pair kerning of a font.
//!
//! The kerning index is built for the requested script and language, then
//! the adjustment of each requested glyph pair is printed in design units.
//! Set `RUST_LOG=gpos_kern=debug` to see how lookups were selected.

use std::str::FromStr;

use gpos_kern::{
    tables::gpos,
    types::{GlyphId16, Tag},
    LangSysSelector, LookupIndex, KERN,
};
use read_fonts::FontRef;

mod pair;

use pair::Pair;

fn main() -> Result<(), Error> {
    env_logger::init();
    let args = flags::Args::from_env().map_err(Error::new)?;
    let bytes = std::fs::read(&args.input)
        .map_err(|e| Error(format!("failed to read '{}': {e}", args.input.display())))?;
    let gpos_data = if args.raw {
        bytes.as_slice()
    } else {
        gpos_table(&bytes, args.index.unwrap_or(0))?
    };

    let selector = LangSysSelector {
        script: args.script.as_deref().map(parse_tag).transpose()?,
        language: args.lang.as_deref().map(parse_tag).transpose()?,
        fallback_to_default: !args.no_fallback,
    };
    let features = match &args.features {
        Some(tags) => make_tag_list(tags)?,
        None => vec![KERN],
    };
    log::info!("building index for {selector:?}, features {features:?}");

    let index = LookupIndex::build_with(gpos_data, &selector, features.as_slice())
        .map_err(|e| Error(format!("GPOS table rejected: {e}")))?;
    print_summary(&index);

    for pair in &args.pair {
        let delta = index.query(GlyphId16::new(pair.first), GlyphId16::new(pair.second));
        println!("{:>5} {:>5} {delta:>6}", pair.first, pair.second);
    }
    Ok(())
}

fn gpos_table(font_data: &[u8], index: u32) -> Result<&[u8], Error> {
    let font = FontRef::from_index(font_data, index).map_err(Error::new)?;
    font.table_data(gpos::TAG)
        .map(|data| data.as_bytes())
        .ok_or_else(|| Error::new("font has no GPOS table"))
}

fn print_summary(index: &LookupIndex) {
    println!("{} lookups selected", index.lookup_count());
    for offset in index.lookup_offsets() {
        println!("  lookup at 0x{offset:04X}");
    }
    if !index.warnings().is_empty() {
        println!("warnings:");
        for warning in index.warnings() {
            println!("  {warning}");
        }
    }
}

fn parse_tag(raw: &str) -> Result<Tag, Error> {
    Tag::from_str(raw)
        .map_err(|e| Error(format!("Invalid tag '{}': {e}", raw.escape_default())))
}

fn make_tag_list(inp: &str) -> Result<Vec<Tag>, Error> {
    inp.split_whitespace().map(parse_tag).collect()
}

#[derive(Debug, Clone)]
struct Error(String);

impl Error {
    fn new(t: impl std::fmt::Display) -> Self {
        Self(t.to_string())
    }
}

impl std::fmt::Display for Error {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        self.0.fmt(f)
    }
}

impl std::error::Error for Error {}

mod flags {
    use super::Pair;
    use std::path::PathBuf;

    xflags::xflags! {
        /// Print the pair kerning in a font's GPOS table
        cmd args
            {
                required input: PathBuf
                /// The input is a bare GPOS table, not a font file
                optional --raw
                /// Index of the font in a collection
                optional -i, --index index: u32
                /// Script tag; DFLT if omitted
                optional -s, --script script: String
                /// Language system tag
                optional -l, --lang lang: String
                /// Space separated feature tags to use instead of 'kern'
                optional -f, --features features: String
                /// Never fall back to the DFLT script
                optional --no-fallback
                /// A glyph pair, as FIRST,SECOND
                repeated -p, --pair pair: Pair
            }
    }
}
