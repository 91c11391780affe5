//! Choosing a language system from a script and language.

use types::Tag;

use super::{LangSys, ScriptList};
use crate::ReadError;

/// The default script tag.
pub const DFLT: Tag = Tag::new(b"DFLT");

/// Selects the [`LangSys`] whose features are used for kerning.
///
/// With no script, the `DFLT` script is used. If the requested script does
/// not exist, the `DFLT` script is used instead, but only when it is the
/// first script record. Within the script, the requested language is used if
/// present, else the script's default language system.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct LangSysSelector {
    pub script: Option<Tag>,
    pub language: Option<Tag>,
    /// Fall back to the `DFLT` script when the script is missing or unknown.
    pub fallback_to_default: bool,
}

impl Default for LangSysSelector {
    fn default() -> Self {
        Self {
            script: None,
            language: None,
            fallback_to_default: true,
        }
    }
}

impl LangSysSelector {
    pub fn new(script: Option<Tag>, language: Option<Tag>) -> Self {
        Self {
            script,
            language,
            ..Default::default()
        }
    }

    pub fn with_script(mut self, script: Tag) -> Self {
        self.script = Some(script);
        self
    }

    pub fn with_language(mut self, language: Tag) -> Self {
        self.language = Some(language);
        self
    }

    /// Never substitute the `DFLT` script.
    pub fn without_fallback(mut self) -> Self {
        self.fallback_to_default = false;
        self
    }
}

impl<'a> ScriptList<'a> {
    /// Returns the index of the first script with the given tag.
    ///
    /// Records are expected to be sorted by tag, but this is not enforced,
    /// so this is a linear scan.
    pub fn index_for_tag(&self, tag: Tag) -> Option<u16> {
        self.script_records()
            .iter()
            .position(|rec| rec.tag() == tag)
            .map(|index| index as u16)
    }

    /// Locate the language system chosen by `selector`.
    ///
    /// Returns `Ok(None)` when nothing matches; this is not an error.
    pub fn resolve(&self, selector: &LangSysSelector) -> Result<Option<LangSys<'a>>, ReadError> {
        let script_tag = match selector.script {
            Some(tag) => tag,
            None if selector.fallback_to_default => DFLT,
            None => return Ok(None),
        };
        let record = match self.index_for_tag(script_tag) {
            Some(index) => self.script_records().get(index as usize),
            None if selector.fallback_to_default => self
                .script_records()
                .first()
                .filter(|first| first.tag() == DFLT),
            None => None,
        };
        let Some(record) = record else {
            log::debug!("no script matching '{script_tag}'");
            return Ok(None);
        };
        let script = self.script(&record)?;
        if let Some(language) = selector.language {
            if let Some(lang_record) = script
                .lang_sys_records()
                .iter()
                .find(|rec| rec.tag() == language)
            {
                return script.lang_sys(&lang_record).map(Some);
            }
        }
        script.default_lang_sys().transpose()
    }
}
