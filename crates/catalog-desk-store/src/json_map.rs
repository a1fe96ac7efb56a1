use catalog_desk_core::{Catalog, CatalogKind, MessageEntry, MetadataStamp};
use serde_json::{Map, Value};

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct JsonCatalog {
    entries: Vec<MessageEntry>,
}

#[derive(Debug, thiserror::Error)]
pub enum JsonCatalogError {
    #[error("invalid json: {0}")]
    Syntax(#[from] serde_json::Error),
    #[error("expected a top-level object")]
    NotAnObject,
    #[error("value for key {0:?} is not a string")]
    NonStringValue(String),
}

impl JsonCatalog {
    pub fn parse(input: &str) -> Result<Self, JsonCatalogError> {
        let value: Value = serde_json::from_str(input)?;
        let Value::Object(map) = value else {
            return Err(JsonCatalogError::NotAnObject);
        };
        let mut entries = Vec::with_capacity(map.len());
        for (key, value) in map {
            let Value::String(translation) = value else {
                return Err(JsonCatalogError::NonStringValue(key));
            };
            entries.push(MessageEntry::new(key, translation));
        }
        Ok(Self { entries })
    }

    pub fn render(&self) -> Result<String, serde_json::Error> {
        let map: Map<String, Value> = self
            .entries
            .iter()
            .map(|entry| {
                (
                    entry.source_text.clone(),
                    Value::String(entry.translation.clone()),
                )
            })
            .collect();
        let mut out = serde_json::to_string_pretty(&Value::Object(map))?;
        out.push('\n');
        Ok(out)
    }
}

impl Catalog for JsonCatalog {
    fn kind(&self) -> CatalogKind {
        CatalogKind::Json
    }

    fn entries(&self) -> &[MessageEntry] {
        &self.entries
    }

    fn set_translation(&mut self, position: usize, translation: String) {
        if let Some(entry) = self.entries.get_mut(position) {
            entry.translation = translation;
        }
    }

    fn set_fuzzy(&mut self, _position: usize, _fuzzy: bool) {}

    fn set_context(&mut self, _position: usize, _context: Option<String>) {}

    fn update_metadata(&mut self, _stamp: &MetadataStamp) {}
}

#[cfg(test)]
mod tests {
    use super::{JsonCatalog, JsonCatalogError};
    use catalog_desk_core::{Catalog, MessageIdentity, MetadataStamp};

    const CATALOG: &str = r#"{
  "zebra": "Zebre",
  "apple {count}": "Pomme {count}",
  "empty": ""
}
"#;

    #[test]
    fn keeps_file_order() {
        let catalog = JsonCatalog::parse(CATALOG).expect("parse");
        let keys: Vec<&str> = catalog
            .entries()
            .iter()
            .map(|entry| entry.source_text.as_str())
            .collect();
        assert_eq!(keys, vec!["zebra", "apple {count}", "empty"]);
        assert_eq!(catalog.render().expect("render"), CATALOG);
    }

    #[test]
    fn rejects_non_string_values() {
        let err = JsonCatalog::parse(r#"{"a": 1}"#).expect_err("error");
        assert!(matches!(err, JsonCatalogError::NonStringValue(key) if key == "a"));
        assert!(matches!(
            JsonCatalog::parse("[]").expect_err("error"),
            JsonCatalogError::NotAnObject
        ));
    }

    #[test]
    fn unsupported_mutations_are_ignored() {
        let mut catalog = JsonCatalog::parse(CATALOG).expect("parse");
        let before = catalog.clone();
        catalog.set_fuzzy(0, true);
        catalog.set_context(0, Some("ctx".to_string()));
        catalog.update_metadata(&MetadataStamp {
            last_translator: "x".to_string(),
            translated_using: "y".to_string(),
            revision_date: "z".to_string(),
        });
        assert_eq!(catalog, before);
        assert!(catalog.metadata().is_empty());
    }

    #[test]
    fn keys_are_identities_without_context() {
        let mut catalog = JsonCatalog::parse(CATALOG).expect("parse");
        let position = catalog
            .position_of(&MessageIdentity::of("empty", None))
            .expect("position");
        catalog.set_translation(position, "Vide".to_string());
        assert!(catalog.render().expect("render").contains("\"empty\": \"Vide\""));
    }
}
