//! Pair kerning from OpenType GPOS tables
//!
//! This crate reads the simple kerning a text layout system without a full
//! shaping engine can use: the x advance adjustments of pair adjustment
//! lookups referenced by the `kern` feature of one script and language.
//!
//! Building a [`LookupIndex`] validates the whole table up front. After that,
//! queries cannot fail: glyph pairs that nothing applies to simply get zero.
//!
//! Only GPOS versions 1.0 and 1.1, and pair adjustment lookups (type 2,
//! formats 1 and 2) are supported. Lookup flags, extension lookups,
//! contextual positioning, device tables and feature variations are not
//! interpreted; where these are found, a [`Warning`] is recorded.
//!
//! # Example
//!
//! ```
//! use gpos_kern::{types::{GlyphId16, Tag}, LookupIndex};
//! # let gpos_data = font_test_data::gpos::SIMPLE_KERN;
//! let index = LookupIndex::build(gpos_data, Some(Tag::new(b"latn")), None).unwrap();
//! let delta = index.query(GlyphId16::new(100), GlyphId16::new(200));
//! assert_eq!(delta, -50);
//! ```
//!
//! Results are in font design units; scale them by the font size and units
//! per em before use.

#![cfg_attr(docsrs, feature(doc_auto_cfg))]
#![forbid(unsafe_code)]

/// Public re-export of the font-types crate.
pub extern crate font_types as types;

pub mod array;
mod error;
mod font_data;
mod kern;
mod read;
pub mod tables;

pub use error::{BuildError, Warning};
pub use font_data::FontData;
pub use kern::LookupIndex;
pub use read::{FontRead, ReadError, ReadRecord, ReadWithArgs};
pub use tables::layout::{filter_fn, FeatureFilter, LangSysSelector, DFLT, KERN};
