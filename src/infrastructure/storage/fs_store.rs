use crate::domain::{Manifest, Storage, StorageKeys};
use crate::error::{DevlogError, Result};
use crate::utils::sanitize_filename;
use std::fs;
use std::path::{Path, PathBuf};

#[derive(Clone)]
pub struct FileSystemStore {
    out_dir: PathBuf,
}

impl FileSystemStore {
    pub fn new(out_dir: impl Into<PathBuf>) -> Self {
        Self {
            out_dir: out_dir.into(),
        }
    }

    pub fn out_dir(&self) -> &Path {
        &self.out_dir
    }

    fn get_path_for_key(&self, key: &str, subdir: Option<&str>, extension: &str) -> PathBuf {
        let file = format!("{}.{}", sanitize_filename(key), extension);
        if let Some(dir) = subdir {
            self.out_dir.join(dir).join(file)
        } else {
            self.out_dir.join(file)
        }
    }

    fn ensure_dir(&self, dir: &Path) -> Result<()> {
        if !dir.exists() {
            fs::create_dir_all(dir)?;
        }
        Ok(())
    }

    fn write_file(&self, path: &Path, content: &str) -> Result<()> {
        if let Some(parent) = path.parent() {
            self.ensure_dir(parent)?;
        }
        fs::write(path, content)?;
        Ok(())
    }
}

impl Storage for FileSystemStore {
    fn save_page(&self, name: &str, html: &str) -> Result<PathBuf> {
        let path = self.get_path_for_key(name, None, "html");
        self.write_file(&path, html)?;
        Ok(path)
    }

    fn save_manifest(&self, manifest: &Manifest) -> Result<PathBuf> {
        let path = self.get_path_for_key(StorageKeys::MANIFEST, None, "json");
        self.write_file(&path, &serde_json::to_string_pretty(manifest)?)?;
        Ok(path)
    }

    fn save_image(&self, source: &Path, name: &str) -> Result<String> {
        let file_name = sanitize_filename(name);
        if file_name.is_empty() || file_name.chars().all(|c| c == '.') {
            return Err(DevlogError::Other(format!("Invalid image name {:?}", name)));
        }

        let images_dir = self.out_dir.join(StorageKeys::IMAGES_DIR);
        self.ensure_dir(&images_dir)?;
        fs::copy(source, images_dir.join(&file_name))?;

        Ok(format!("{}/{}", StorageKeys::IMAGES_DIR, file_name))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pages_are_written_under_sanitized_names() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileSystemStore::new(dir.path().join("public"));

        let path = store.save_page("v1/2 notes", "<p>hi</p>").unwrap();
        assert_eq!(path, dir.path().join("public").join("v1_2_notes.html"));
        assert_eq!(fs::read_to_string(path).unwrap(), "<p>hi</p>");
    }

    #[test]
    fn images_are_copied() {
        let dir = tempfile::tempdir().unwrap();
        let source = dir.path().join("shot 1.png");
        fs::write(&source, b"png").unwrap();

        let store = FileSystemStore::new(dir.path().join("out"));
        assert_eq!(store.save_image(&source, "shot 1.png").unwrap(), "images/shot_1.png");
        assert!(dir.path().join("out/images/shot_1.png").exists());

        assert!(store.save_image(&dir.path().join("missing.png"), "missing.png").is_err());
        assert!(store.save_image(&source, "..").is_err());
    }
}
