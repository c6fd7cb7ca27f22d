use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use serde::{Serialize, de::DeserializeOwned};

use crate::store::StoreError;
use crate::store::schema::{SCHEMA_VERSION, Tables};

const TABLES_FILE: &str = "powerhell.json";

/// File backend for the account store: one JSON document per data directory.
pub struct JsonStore {
    base_dir: PathBuf,
}

impl JsonStore {
    pub fn with_base_dir(base_dir: PathBuf) -> Result<Self, StoreError> {
        fs::create_dir_all(&base_dir)?;
        Ok(Self { base_dir })
    }

    pub fn base_dir(&self) -> &Path {
        &self.base_dir
    }

    fn file_path(&self, name: &str) -> PathBuf {
        self.base_dir.join(name)
    }

    /// Missing file yields `None`; an unreadable or unparseable file is an error
    /// so callers never overwrite data they could not read.
    fn load<T: DeserializeOwned>(&self, name: &str) -> Result<Option<T>, StoreError> {
        let path = self.file_path(name);
        if !path.exists() {
            return Ok(None);
        }
        let content = fs::read_to_string(&path)?;
        Ok(Some(serde_json::from_str(&content)?))
    }

    fn save<T: Serialize>(&self, name: &str, data: &T) -> Result<(), StoreError> {
        let path = self.file_path(name);
        let tmp_path = path.with_extension("tmp");

        let json = serde_json::to_string_pretty(data)?;
        let mut file = fs::File::create(&tmp_path)?;
        file.write_all(json.as_bytes())?;
        file.sync_all()?;

        fs::rename(&tmp_path, &path)?;
        Ok(())
    }

    pub fn load_tables(&self) -> Result<Tables, StoreError> {
        match self.load::<Tables>(TABLES_FILE)? {
            Some(tables) if tables.schema_version != SCHEMA_VERSION => {
                Err(StoreError::SchemaMismatch {
                    found: tables.schema_version,
                    expected: SCHEMA_VERSION,
                })
            }
            Some(tables) => Ok(tables),
            None => Ok(Tables::default()),
        }
    }

    pub fn save_tables(&self, tables: &Tables) -> Result<(), StoreError> {
        self.save(TABLES_FILE, tables)
    }
}

/// Per-user application data directory, created on first run.
pub fn default_data_dir() -> PathBuf {
    dirs::data_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("powerhell")
}
