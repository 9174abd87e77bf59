use crate::state::CrawlSnapshot;
use crate::storage::traits::{StateResult, StateStore};
use crate::StateError;
use std::fs::{self, File};
use std::io::{BufWriter, ErrorKind, Write};
use std::path::PathBuf;

const FILE_SUFFIX: &str = "_crawler_state.json";

/// Snapshot store backed by one pretty-printed JSON file per crawl key
#[derive(Debug, Clone)]
pub struct JsonStateStore {
    dir: PathBuf,
}

impl JsonStateStore {
    /// Creates a store that keeps its files in `dir`
    ///
    /// The directory is created on first save if it does not exist.
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// Returns the path of the state file for `key`
    pub fn path_for(&self, key: &str) -> PathBuf {
        self.dir.join(format!("{}{}", key, FILE_SUFFIX))
    }
}

impl StateStore for JsonStateStore {
    fn load(&self, key: &str) -> StateResult<Option<CrawlSnapshot>> {
        let path = self.path_for(key);

        let content = match fs::read_to_string(&path) {
            Ok(content) => content,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(e.into()),
        };

        let snapshot = serde_json::from_str(&content).map_err(|source| StateError::Corrupt {
            path: path.display().to_string(),
            source,
        })?;

        tracing::debug!("Loaded state from {}", path.display());
        Ok(Some(snapshot))
    }

    fn save(&self, key: &str, snapshot: &CrawlSnapshot) -> StateResult<()> {
        fs::create_dir_all(&self.dir)?;

        let path = self.path_for(key);
        let temp_path = self.dir.join(format!("{}{}.tmp", key, FILE_SUFFIX));

        {
            let file = File::create(&temp_path)?;
            let mut writer = BufWriter::new(file);
            serde_json::to_writer_pretty(&mut writer, snapshot)?;
            writer.write_all(b"\n")?;
            let file = writer.into_inner().map_err(|e| e.into_error())?;
            file.sync_all()?;
        }

        if let Err(e) = fs::rename(&temp_path, &path) {
            let _ = fs::remove_file(&temp_path);
            return Err(e.into());
        }

        tracing::debug!("Wrote state to {}", path.display());
        Ok(())
    }
}
