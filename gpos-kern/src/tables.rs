//! The layout tables needed for kerning.

pub mod gpos;
pub mod layout;
