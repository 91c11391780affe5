//! test data shared between the gpos-kern crates.

pub mod bebuffer;
pub mod gpos;
