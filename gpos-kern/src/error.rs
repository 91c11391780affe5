//! Build failures and diagnostics

use crate::ReadError;

/// The reasons a GPOS table can be refused.
///
/// Any of these aborts [`LookupIndex::build`](crate::LookupIndex::build);
/// no partial index is produced.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum BuildError {
    #[error("table is {0} bytes, shorter than the GPOS header")]
    TableTooShort(usize),
    #[error("GPOS version {major}.{minor} is not supported")]
    UnsupportedVersion { major: u16, minor: u16 },
    #[error(transparent)]
    Read(#[from] ReadError),
    #[error("LangSys with non-null lookupOrderOffset is not supported")]
    LookupOrderNotSupported,
    #[error("the DFLT script has no default LangSys")]
    MissingDefaultLangSys,
    #[error("feature index {index} out of range for {count} features")]
    FeatureIndexOutOfRange { index: u16, count: u16 },
    #[error("lookup index {index} out of range for {count} lookups")]
    LookupIndexOutOfRange { index: u16, count: u16 },
    #[error("lookup {lookup_index} has reserved lookup flag bits set (0x{flag:04X})")]
    ReservedLookupFlag { lookup_index: u16, flag: u16 },
    #[error("lookup {lookup_index} of type {lookup_type} has the right-to-left flag set")]
    RightToLeftNotCursive { lookup_index: u16, lookup_type: u16 },
    #[error("value format 0x{0:04X} has reserved bits set")]
    ReservedValueFormat(u16),
    #[error("invalid PairPos format {0}")]
    InvalidPairPosFormat(u16),
    #[error("coverage has {coverage_glyphs} glyphs but only {pair_set_count} pair sets")]
    CoverageExceedsPairSets {
        coverage_glyphs: u32,
        pair_set_count: u16,
    },
    #[error("class {max_class} is used but the class count is {class_count}")]
    ClassCountTooSmall { max_class: u16, class_count: u16 },
}

/// Non-fatal findings made while building a lookup index.
///
/// Each of these describes data that was skipped or only partially honored.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Warning {
    /// An extension lookup (type 9) was found; it is never followed.
    ExtensionLookup { lookup_index: u16 },
    /// The `DFLT` script exists but is not the first script record.
    DefaultScriptNotFirst { position: u16 },
    /// A lookup referenced by a selected feature is not a pair adjustment.
    NotPairAdjustment { lookup_index: u16, lookup_type: u16 },
    /// A selected lookup has lookup flags, which are not honored.
    LookupFlagIgnored { lookup_index: u16, flag: u16 },
    /// A selected lookup has values for the second glyph, which are ignored.
    SecondValueIgnored { lookup_index: u16 },
    /// A selected lookup has placement or y-advance values, which are ignored.
    ValueFieldsIgnored { lookup_index: u16, value_format: u16 },
}

impl std::fmt::Display for Warning {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Warning::ExtensionLookup { lookup_index } => {
                write!(f, "lookup {lookup_index}: extension lookups are not supported, ignored")
            }
            Warning::DefaultScriptNotFirst { position } => {
                write!(f, "expected DFLT script to be first, found at {position}")
            }
            Warning::NotPairAdjustment {
                lookup_index,
                lookup_type,
            } => write!(
                f,
                "lookup {lookup_index}: type {lookup_type} is not pair adjustment, ignored"
            ),
            Warning::LookupFlagIgnored { lookup_index, flag } => write!(
                f,
                "lookup {lookup_index}: lookup flag 0x{flag:04X} will not be honored"
            ),
            Warning::SecondValueIgnored { lookup_index } => write!(
                f,
                "lookup {lookup_index}: valueFormat2 != 0, second glyph values ignored"
            ),
            Warning::ValueFieldsIgnored {
                lookup_index,
                value_format,
            } => write!(
                f,
                "lookup {lookup_index}: value format 0x{value_format:04X} requests fields other than x advance, only x advance is used"
            ),
        }
    }
}

/// Collects warnings during a build, logging each one as it arrives.
#[derive(Debug, Default)]
pub(crate) struct Warnings {
    items: Vec<Warning>,
    extension_reported: bool,
}

impl Warnings {
    pub(crate) fn push(&mut self, warning: Warning) {
        if let Warning::ExtensionLookup { .. } = warning {
            if self.extension_reported {
                return;
            }
            self.extension_reported = true;
        }
        log::warn!("{warning}");
        self.items.push(warning);
    }

    pub(crate) fn into_vec(self) -> Vec<Warning> {
        self.items
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn extension_warning_is_reported_once() {
        let mut warnings = Warnings::default();
        warnings.push(Warning::ExtensionLookup { lookup_index: 1 });
        warnings.push(Warning::SecondValueIgnored { lookup_index: 2 });
        warnings.push(Warning::ExtensionLookup { lookup_index: 3 });
        assert_eq!(
            warnings.into_vec(),
            vec![
                Warning::ExtensionLookup { lookup_index: 1 },
                Warning::SecondValueIgnored { lookup_index: 2 },
            ]
        );
    }

    #[test]
    fn read_errors_convert() {
        let err: BuildError = ReadError::OutOfBounds.into();
        assert_eq!(err, BuildError::Read(ReadError::OutOfBounds));
        assert_eq!(err.to_string(), "An offset was out of bounds");
    }
}
