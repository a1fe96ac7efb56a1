use catalog_desk_core::{Catalog, CatalogKind, MessageEntry, MetadataStamp};

use crate::po::{PoDocument, PoHeader, parse_po, render_po};

pub const LAST_TRANSLATOR: &str = "Last-Translator";
pub const TRANSLATED_USING: &str = "X-Translated-Using";
pub const REVISION_DATE: &str = "PO-Revision-Date";

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GettextCatalog {
    document: PoDocument,
}

impl GettextCatalog {
    pub fn parse(input: &str) -> Result<Self, crate::po::PoParseError> {
        Ok(Self {
            document: parse_po(input)?,
        })
    }

    pub fn render(&self) -> String {
        render_po(&self.document)
    }

    pub fn header(&self) -> Option<&PoHeader> {
        self.document.header.as_ref()
    }

    fn entry_mut(&mut self, position: usize) -> Option<&mut MessageEntry> {
        self.document.entries.get_mut(position)
    }
}

impl Catalog for GettextCatalog {
    fn kind(&self) -> CatalogKind {
        CatalogKind::Gettext
    }

    fn entries(&self) -> &[MessageEntry] {
        &self.document.entries
    }

    fn set_translation(&mut self, position: usize, translation: String) {
        if let Some(entry) = self.entry_mut(position) {
            entry.translation = translation;
        }
    }

    fn set_fuzzy(&mut self, position: usize, fuzzy: bool) {
        if let Some(entry) = self.entry_mut(position) {
            entry.fuzzy = fuzzy;
        }
    }

    fn set_context(&mut self, position: usize, context: Option<String>) {
        if let Some(entry) = self.entry_mut(position) {
            entry.context = context;
        }
    }

    fn update_metadata(&mut self, stamp: &MetadataStamp) {
        let header = self.document.header.get_or_insert_with(PoHeader::default);
        header.set(LAST_TRANSLATOR, stamp.last_translator.as_str());
        header.set(TRANSLATED_USING, stamp.translated_using.as_str());
        header.set(REVISION_DATE, stamp.revision_date.as_str());
    }

    fn metadata(&self) -> Vec<(String, String)> {
        self.document
            .header
            .as_ref()
            .map(|header| header.metadata.clone())
            .unwrap_or_default()
    }
}
