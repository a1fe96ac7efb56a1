use std::path::PathBuf;

use catalog_desk_core::CatalogKind;
use chrono::{DateTime, Utc};
use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CatalogResource {
    pub id: u64,
    pub name: String,
    pub file_location: PathBuf,
    pub language_code: String,
    pub kind: CatalogKind,
    pub last_compiled_at: Option<DateTime<Utc>>,
    pub is_valid: bool,
}

impl CatalogResource {
    pub fn new(
        id: u64,
        name: impl Into<String>,
        file_location: impl Into<PathBuf>,
        language_code: impl Into<String>,
        kind: CatalogKind,
    ) -> Self {
        Self {
            id,
            name: name.into(),
            file_location: file_location.into(),
            language_code: language_code.into(),
            kind,
            last_compiled_at: None,
            is_valid: true,
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct ResourceRegistry {
    resources: Vec<CatalogResource>,
}

impl ResourceRegistry {
    pub fn new(resources: Vec<CatalogResource>) -> Self {
        Self { resources }
    }

    pub fn get(&self, id: u64) -> Option<&CatalogResource> {
        self.resources.iter().find(|resource| resource.id == id)
    }

    pub fn iter(&self) -> impl Iterator<Item = &CatalogResource> {
        self.resources.iter()
    }

    pub fn refresh_validity(&mut self) -> usize {
        let mut flipped = 0;
        for resource in &mut self.resources {
            let exists = resource.file_location.is_file();
            if resource.is_valid != exists {
                resource.is_valid = exists;
                flipped += 1;
            }
        }
        flipped
    }

    pub fn mark_invalid(&mut self, id: u64) -> bool {
        match self.resources.iter_mut().find(|resource| resource.id == id) {
            Some(resource) => {
                resource.is_valid = false;
                true
            }
            None => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{CatalogResource, ResourceRegistry};
    use catalog_desk_core::CatalogKind;
    use std::fs;
    use std::path::PathBuf;
    use std::time::{SystemTime, UNIX_EPOCH};

    fn temp_path(name: &str) -> PathBuf {
        let nanos = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .expect("time")
            .as_nanos();
        std::env::temp_dir().join(format!("catalog_desk_resource_{name}_{nanos}"))
    }

    #[test]
    fn refresh_marks_missing_files_invalid() {
        let present = temp_path("present.po");
        fs::write(&present, "").expect("write");
        let mut registry = ResourceRegistry::new(vec![
            CatalogResource::new(1, "present", &present, "fr", CatalogKind::Gettext),
            CatalogResource::new(2, "missing", temp_path("missing.po"), "de", CatalogKind::Gettext),
        ]);

        assert_eq!(registry.refresh_validity(), 1);
        assert!(registry.get(1).expect("present").is_valid);
        assert!(!registry.get(2).expect("missing").is_valid);

        fs::remove_file(&present).expect("cleanup");
    }

    #[test]
    fn mark_invalid_flips_known_ids() {
        let mut registry = ResourceRegistry::new(vec![CatalogResource::new(
            3,
            "app",
            "locale/fr.json",
            "fr",
            CatalogKind::Json,
        )]);
        assert!(registry.mark_invalid(3));
        assert!(!registry.mark_invalid(99));
        assert!(!registry.get(3).expect("resource").is_valid);
        assert_eq!(registry.iter().count(), 1);
    }
}
