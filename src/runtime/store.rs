use crate::schedule::index::chapter_file_name;
use crate::types::{ClassificationNode, MasterIndex};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

const MASTER_INDEX_FILE: &str = "index.json";
const LAW_TABLE_FILE: &str = "import_law_table.json";

/// Persistence seam for processed chapters and the master index.
pub trait ScheduleStore: Send + Sync {
    fn store_chapter(&self, chapter: u32, forest: &[ClassificationNode]) -> Result<(), String>;
    fn store_master_index(&self, index: &MasterIndex) -> Result<(), String>;
}

/// Stores every document as pretty-printed JSON under one data directory:
/// `j_<NN>_tariff_data.json` per chapter plus `index.json`. The same
/// directory may carry a hand-maintained `import_law_table.json` mapping
/// 2-character law codes to law details.
pub struct FsScheduleStore {
    dir: PathBuf,
}

impl FsScheduleStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// Open the store, creating the data directory if needed.
    pub fn create(dir: impl Into<PathBuf>) -> Result<Self, String> {
        let store = Self::new(dir);
        std::fs::create_dir_all(&store.dir)
            .map_err(|e| format!("Failed to create data dir {}: {e}", store.dir.display()))?;
        Ok(store)
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub fn chapter_path(&self, chapter: u32) -> PathBuf {
        self.dir.join(chapter_file_name(chapter))
    }

    pub fn load_chapter(&self, chapter: u32) -> Result<Vec<ClassificationNode>, String> {
        let path = self.chapter_path(chapter);
        let text = std::fs::read_to_string(&path)
            .map_err(|e| format!("Failed to read {}: {e}", path.display()))?;
        serde_json::from_str(&text).map_err(|e| format!("Invalid chapter JSON {}: {e}", path.display()))
    }

    pub fn load_master_index(&self) -> Result<MasterIndex, String> {
        let path = self.dir.join(MASTER_INDEX_FILE);
        let text = std::fs::read_to_string(&path)
            .map_err(|e| format!("Failed to read {}: {e}", path.display()))?;
        serde_json::from_str(&text).map_err(|e| format!("Invalid index JSON {}: {e}", path.display()))
    }

    /// The law table is optional reference data; a missing file is an empty
    /// table, a present-but-invalid one is an error.
    pub fn load_law_table(&self) -> Result<BTreeMap<String, serde_json::Value>, String> {
        let path = self.dir.join(LAW_TABLE_FILE);
        let text = match std::fs::read_to_string(&path) {
            Ok(text) => text,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(BTreeMap::new()),
            Err(e) => return Err(format!("Failed to read {}: {e}", path.display())),
        };
        serde_json::from_str(&text)
            .map_err(|e| format!("Invalid law table JSON {}: {e}", path.display()))
    }

    fn write_json<T: serde::Serialize>(&self, file_name: &str, value: &T) -> Result<(), String> {
        let path = self.dir.join(file_name);
        let json = serde_json::to_string_pretty(value)
            .map_err(|e| format!("Failed to serialize {file_name}: {e}"))?;
        std::fs::write(&path, json).map_err(|e| format!("Failed to write {}: {e}", path.display()))
    }
}

impl ScheduleStore for FsScheduleStore {
    fn store_chapter(&self, chapter: u32, forest: &[ClassificationNode]) -> Result<(), String> {
        self.write_json(&chapter_file_name(chapter), &forest)
    }

    fn store_master_index(&self, index: &MasterIndex) -> Result<(), String> {
        self.write_json(MASTER_INDEX_FILE, index)
    }
}
