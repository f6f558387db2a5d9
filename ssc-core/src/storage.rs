use std::{
    collections::HashMap,
    fs,
    fs::File,
    io,
    io::{BufReader, Write},
    path::{Path, PathBuf},
    sync::Arc,
};

use parking_lot::Mutex;
use serde_json::Value;

use crate::error::Error;

pub type StoreHandle = Arc<dyn KeyValueStore + Send + Sync>;

/// Opaque persistence of JSON values by string key. A missing key reads as
/// `None`.
pub trait KeyValueStore {
    fn get(&self, key: &str) -> Result<Option<Value>, Error>;
    fn set(&self, key: &str, value: &Value) -> Result<(), Error>;
    fn remove(&self, key: &str) -> Result<(), Error>;
}

#[derive(Default)]
pub struct MemoryStore {
    values: Mutex<HashMap<String, String>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn handle() -> StoreHandle {
        Arc::new(Self::new())
    }

    /// Stores `raw` verbatim, bypassing JSON encoding.
    pub fn set_raw(&self, key: &str, raw: &str) {
        self.values.lock().insert(key.to_owned(), raw.to_owned());
    }

    pub fn get_raw(&self, key: &str) -> Option<String> {
        self.values.lock().get(key).cloned()
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Result<Option<Value>, Error> {
        match self.values.lock().get(key) {
            Some(raw) => Ok(Some(serde_json::from_str(raw)?)),
            None => Ok(None),
        }
    }

    fn set(&self, key: &str, value: &Value) -> Result<(), Error> {
        let raw = serde_json::to_string(value)?;
        self.values.lock().insert(key.to_owned(), raw);
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<(), Error> {
        self.values.lock().remove(key);
        Ok(())
    }
}

/// One JSON file per key, kept in a single directory.
pub struct FileStore {
    base: PathBuf,
}

impl FileStore {
    pub fn new(base: PathBuf) -> Result<StoreHandle, Error> {
        mkdir_if_not_exists(&base)?;
        Ok(Arc::new(Self { base }))
    }

    fn key_path(&self, key: &str) -> Result<PathBuf, Error> {
        let valid = !key.is_empty()
            && key
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-');
        if valid {
            Ok(self.base.join(format!("{}.json", key)))
        } else {
            Err(Error::InvalidStorageKey(key.to_owned()))
        }
    }
}

impl KeyValueStore for FileStore {
    fn get(&self, key: &str) -> Result<Option<Value>, Error> {
        let file = match File::open(self.key_path(key)?) {
            Ok(file) => file,
            Err(err) if err.kind() == io::ErrorKind::NotFound => return Ok(None),
            Err(err) => return Err(err.into()),
        };
        Ok(Some(serde_json::from_reader(BufReader::new(file))?))
    }

    fn set(&self, key: &str, value: &Value) -> Result<(), Error> {
        let path = self.key_path(key)?;
        log::debug!("saving {:?} to store: {:?}", key, path);
        let mut file = File::create(path)?;
        serde_json::to_writer(&mut file, value)?;
        file.flush()?;
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<(), Error> {
        fs::remove_file(self.key_path(key)?).or_else(|err| {
            if err.kind() == io::ErrorKind::NotFound {
                Ok(())
            } else {
                Err(err.into())
            }
        })
    }
}

pub fn mkdir_if_not_exists(path: &Path) -> io::Result<()> {
    fs::create_dir_all(path).or_else(|err| {
        if err.kind() == io::ErrorKind::AlreadyExists {
            Ok(())
        } else {
            Err(err)
        }
    })
}
