use std::fs;
use std::path::{Path, PathBuf};

use super::{validate_key, KeyValueStore, StorageError, StorageResult};

/// One JSON file per key under a data directory
///
/// `<dir>/<key>.json`. Writes go to a sibling temp file first and are
/// renamed into place, so a crash mid-write never leaves half a blob.
#[derive(Debug, Clone)]
pub struct FileStore {
    dir: PathBuf,
}

impl FileStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Path of the file backing `key`
    pub fn path_for(&self, key: &str) -> StorageResult<PathBuf> {
        validate_key(key)?;
        Ok(self.dir.join(format!("{}.json", key)))
    }
}

fn io_error(path: &Path, source: std::io::Error) -> StorageError {
    StorageError::Io {
        path: path.to_path_buf(),
        source,
    }
}

impl KeyValueStore for FileStore {
    fn get(&self, key: &str) -> StorageResult<Option<String>> {
        let path = self.path_for(key)?;

        if !path.exists() {
            return Ok(None);
        }

        fs::read_to_string(&path)
            .map(Some)
            .map_err(|e| io_error(&path, e))
    }

    fn set(&mut self, key: &str, value: &str) -> StorageResult<()> {
        let path = self.path_for(key)?;

        // 确保目录存在
        fs::create_dir_all(&self.dir).map_err(|e| io_error(&self.dir, e))?;

        let tmp_path = self.dir.join(format!(".{}.json.tmp", key));
        fs::write(&tmp_path, value).map_err(|e| io_error(&tmp_path, e))?;
        fs::rename(&tmp_path, &path).map_err(|e| io_error(&path, e))?;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_get_missing_file_is_none() {
        let dir = TempDir::new().unwrap();
        let store = FileStore::new(dir.path());
        assert_eq!(store.get("smartTimeTable").unwrap(), None);
    }

    #[test]
    fn test_set_creates_directory_and_file() {
        let dir = TempDir::new().unwrap();
        let nested = dir.path().join("data").join("stt");
        let mut store = FileStore::new(&nested);

        store.set("smartTimeTable", r#"{"tasks":[]}"#).unwrap();

        let path = nested.join("smartTimeTable.json");
        assert!(path.exists());
        assert_eq!(fs::read_to_string(path).unwrap(), r#"{"tasks":[]}"#);
        assert_eq!(
            store.get("smartTimeTable").unwrap().as_deref(),
            Some(r#"{"tasks":[]}"#)
        );
    }

    #[test]
    fn test_no_temp_file_left_behind() {
        let dir = TempDir::new().unwrap();
        let mut store = FileStore::new(dir.path());
        store.set("k", "v").unwrap();

        let names: Vec<_> = fs::read_dir(dir.path())
            .unwrap()
            .map(|e| e.unwrap().file_name().to_string_lossy().to_string())
            .collect();
        assert_eq!(names, vec!["k.json".to_string()]);
    }

    #[test]
    fn test_key_cannot_escape_directory() {
        let dir = TempDir::new().unwrap();
        let mut store = FileStore::new(dir.path());
        assert!(matches!(
            store.set("../outside", "x"),
            Err(StorageError::InvalidKey(_))
        ));
    }

    #[test]
    fn test_write_failure_is_reported() {
        let dir = TempDir::new().unwrap();
        // 用普通文件占住目录位置
        let blocker = dir.path().join("blocker");
        fs::write(&blocker, "").unwrap();
        let mut store = FileStore::new(blocker.join("inner"));

        assert!(matches!(store.set("k", "v"), Err(StorageError::Io { .. })));
    }
}
