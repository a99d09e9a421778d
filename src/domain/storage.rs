use super::Manifest;
use crate::error::Result;
use std::path::{Path, PathBuf};

/// Destination for published viewer output.
pub trait Storage: Send + Sync {
    /// Writes `{name}.html`. Callers keep names distinct.
    fn save_page(&self, name: &str, html: &str) -> Result<PathBuf>;
    fn save_manifest(&self, manifest: &Manifest) -> Result<PathBuf>;
    /// Copies a local image into the image directory as `name`, returning its
    /// public path.
    fn save_image(&self, source: &Path, name: &str) -> Result<String>;
}

pub struct StorageKeys;

impl StorageKeys {
    pub const IMAGES_DIR: &'static str = "images";
    pub const INDEX_PAGE: &'static str = "index";
    pub const MANIFEST: &'static str = "devlogs";
}
