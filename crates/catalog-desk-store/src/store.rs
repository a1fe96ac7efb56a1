use std::fs::{self, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU64, Ordering};

use catalog_desk_core::{Catalog, CatalogKind};
use tracing::debug;

use crate::error::{StoreError, StoreResult};
use crate::gettext::GettextCatalog;
use crate::json_map::JsonCatalog;
use crate::resource::CatalogResource;

const TEMP_ATTEMPTS: usize = 16;
static TEMP_COUNTER: AtomicU64 = AtomicU64::new(0);

pub trait StoredCatalog: Catalog {
    fn render(&self) -> StoreResult<String>;
}

impl StoredCatalog for GettextCatalog {
    fn render(&self) -> StoreResult<String> {
        Ok(GettextCatalog::render(self))
    }
}

impl StoredCatalog for JsonCatalog {
    fn render(&self) -> StoreResult<String> {
        Ok(JsonCatalog::render(self)?)
    }
}

pub trait CatalogStore {
    fn load(&self, resource: &CatalogResource) -> StoreResult<Box<dyn StoredCatalog>>;

    fn persist(&self, catalog: &dyn StoredCatalog, resource: &CatalogResource) -> StoreResult<()>;
}

#[derive(Debug, Clone, Copy, Default)]
pub struct FileCatalogStore;

impl FileCatalogStore {
    pub fn new() -> Self {
        Self
    }
}

impl CatalogStore for FileCatalogStore {
    fn load(&self, resource: &CatalogResource) -> StoreResult<Box<dyn StoredCatalog>> {
        let path = &resource.file_location;
        let contents =
            fs::read_to_string(path).map_err(|err| StoreError::unreadable(path, err))?;
        let catalog: Box<dyn StoredCatalog> = match resource.kind {
            CatalogKind::Gettext => Box::new(
                GettextCatalog::parse(&contents).map_err(|err| StoreError::unreadable(path, err))?,
            ),
            CatalogKind::Json => Box::new(
                JsonCatalog::parse(&contents).map_err(|err| StoreError::unreadable(path, err))?,
            ),
        };
        debug!(
            catalog = resource.id,
            entries = catalog.entries().len(),
            "loaded catalog"
        );
        Ok(catalog)
    }

    fn persist(&self, catalog: &dyn StoredCatalog, resource: &CatalogResource) -> StoreResult<()> {
        let rendered = catalog.render()?;
        write_atomic(&resource.file_location, rendered.as_bytes())
    }
}

/// Replaces `path` with `contents` through a sibling temp file and a rename,
/// so readers see either the old document or the new one.
pub fn write_atomic(path: &Path, contents: &[u8]) -> StoreResult<()> {
    let (temp_path, mut file) = create_temp_output(path)?;
    let written = file
        .write_all(contents)
        .and_then(|()| file.sync_all());
    drop(file);
    if let Err(err) = written {
        let _ = fs::remove_file(&temp_path);
        return Err(StoreError::write(path, err));
    }
    if let Err(err) = fs::rename(&temp_path, path) {
        let _ = fs::remove_file(&temp_path);
        return Err(StoreError::write(path, err));
    }
    Ok(())
}

fn create_temp_output(path: &Path) -> StoreResult<(PathBuf, fs::File)> {
    let parent = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    let file_name = path.file_name().and_then(|name| name.to_str()).ok_or_else(|| {
        StoreError::write(
            path,
            std::io::Error::new(std::io::ErrorKind::InvalidInput, "path has no file name"),
        )
    })?;
    for _ in 0..TEMP_ATTEMPTS {
        let attempt = TEMP_COUNTER.fetch_add(1, Ordering::Relaxed);
        let temp_path = parent.join(format!(".{file_name}.tmp.{}.{attempt}", std::process::id()));
        match OpenOptions::new().write(true).create_new(true).open(&temp_path) {
            Ok(file) => return Ok((temp_path, file)),
            Err(err) if err.kind() == std::io::ErrorKind::AlreadyExists => continue,
            Err(err) => return Err(StoreError::write(path, err)),
        }
    }
    Err(StoreError::write(
        path,
        std::io::Error::new(
            std::io::ErrorKind::AlreadyExists,
            "failed to allocate temporary output path",
        ),
    ))
}
