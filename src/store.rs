use std::{fmt::Display, path::PathBuf};

use hashbrown::HashMap;

///A durable string-keyed store. Values are replaced whole on every write.
pub trait KeyValueStore {
    fn get(&self, key: &str) -> Result<Option<String>, StoreError>;

    fn set(&mut self, key: &str, value: &str) -> Result<(), StoreError>;
}

#[derive(Debug)]
pub enum StoreError {
    NoHomeDirError(),
    KeyIsDir(PathBuf),
    IoError(PathBuf, std::io::Error),
    SerdeError(serde_json::Error),
}

impl Display for StoreError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::NoHomeDirError() => f.write_str("Unable to find user home directory"),
            Self::KeyIsDir(path) => f.write_fmt(format_args!(
                "Store entry is directory: {}",
                path.to_str().unwrap_or("unknown")
            )),
            Self::IoError(path, err) => f.write_fmt(format_args!(
                "IoError: {err}, path: {}",
                path.to_str().unwrap_or("unknown")
            )),
            Self::SerdeError(err) => f.write_fmt(format_args!("SerdeError: {err}")),
        }
    }
}

const DEFAULT_HOME_DATA_DIR: &str = ".config/vocabr";

pub fn default_data_dir() -> Result<PathBuf, StoreError> {
    let path = dirs::home_dir();
    if let Some(mut path) = path {
        path.push(DEFAULT_HOME_DATA_DIR);
        Ok(path)
    } else {
        Err(StoreError::NoHomeDirError())
    }
}

///Stores each key as `<key>.json` inside one directory.
pub struct FileStore {
    dir: PathBuf,
}

impl FileStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    fn path_for(&self, key: &str) -> PathBuf {
        self.dir.join(format!("{key}.json"))
    }
}

impl KeyValueStore for FileStore {
    fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        let path = self.path_for(key);

        if let Ok(metadata) = std::fs::metadata(&path) {
            if metadata.is_file() {
                let value = std::fs::read_to_string(&path)
                    .map_err(|err| StoreError::IoError(path.clone(), err))?;
                Ok(Some(value))
            } else {
                Err(StoreError::KeyIsDir(path))
            }
        } else {
            Ok(None)
        }
    }

    ///Writes to a sibling temp file first so a crash never leaves a half-written value.
    fn set(&mut self, key: &str, value: &str) -> Result<(), StoreError> {
        let path = self.path_for(key);

        if !self.dir.exists() {
            std::fs::create_dir_all(&self.dir)
                .map_err(|err| StoreError::IoError(self.dir.clone(), err))?;
        }

        let tmp = self.dir.join(format!("{key}.json.tmp"));
        std::fs::write(&tmp, value).map_err(|err| StoreError::IoError(tmp.clone(), err))?;
        std::fs::rename(&tmp, &path).map_err(|err| StoreError::IoError(path.clone(), err))?;

        Ok(())
    }
}

///Process-local store, used when no durable location is available.
#[derive(Default)]
pub struct MemoryStore {
    values: HashMap<String, String>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        Ok(self.values.get(key).cloned())
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), StoreError> {
        self.values.insert(key.to_owned(), value.to_owned());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::{FileStore, KeyValueStore, MemoryStore, StoreError};

    #[test]
    fn file_store_missing_key() {
        let dir = tempfile::tempdir().expect("Unable to create temp dir");
        let store = FileStore::new(dir.path());
        assert!(matches!(store.get("absent"), Ok(None)));
    }

    #[test]
    fn file_store_save_load_nested() {
        let dir = tempfile::tempdir().expect("Unable to create temp dir");
        let nested = dir.path().join("config").join("vocabr");

        {
            let mut store = FileStore::new(&nested);
            assert!(store.set("flashcards_stats_v1", "{}").is_ok());
            assert!(store.set("flashcards_stats_v1", r#"{"A1:food":{}}"#).is_ok());
        }

        let store = FileStore::new(&nested);
        assert_eq!(
            store.get("flashcards_stats_v1").ok().flatten().as_deref(),
            Some(r#"{"A1:food":{}}"#)
        );
        assert!(!nested.join("flashcards_stats_v1.json.tmp").exists());
    }

    #[test]
    fn file_store_key_is_dir() {
        let dir = tempfile::tempdir().expect("Unable to create temp dir");
        std::fs::create_dir(dir.path().join("theme.json")).expect("Unable to create dir");
        let store = FileStore::new(dir.path());
        assert!(store
            .get("theme")
            .is_err_and(|err| matches!(err, StoreError::KeyIsDir(_))));
    }

    #[test]
    fn memory_store_round_trip() {
        let mut store = MemoryStore::new();
        assert!(matches!(store.get("theme"), Ok(None)));
        assert!(store.set("theme", "\"dark\"").is_ok());
        assert_eq!(store.get("theme").ok().flatten().as_deref(), Some("\"dark\""));
    }
}
