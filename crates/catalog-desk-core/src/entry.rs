use serde::Serialize;

use crate::identity::MessageIdentity;

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
pub struct MessageEntry {
    pub source_text: String,
    pub context: Option<String>,
    pub translation: String,
    pub fuzzy: bool,
    pub occurrences: Vec<String>,
    pub obsolete: bool,
}

impl MessageEntry {
    pub fn new(source_text: impl Into<String>, translation: impl Into<String>) -> Self {
        Self {
            source_text: source_text.into(),
            translation: translation.into(),
            ..Self::default()
        }
    }

    pub fn with_context(mut self, context: impl Into<String>) -> Self {
        self.context = Some(context.into());
        self
    }

    pub fn identity(&self) -> MessageIdentity {
        MessageIdentity::of(&self.source_text, self.context.as_deref())
    }

    pub fn is_translated(&self) -> bool {
        !self.obsolete && !self.fuzzy && !self.translation.is_empty()
    }

    pub fn is_untranslated(&self) -> bool {
        !self.obsolete && !self.fuzzy && self.translation.is_empty()
    }
}
