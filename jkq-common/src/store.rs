//! Whole-file JSON store for the question dataset

use std::fs;
use std::path::{Path, PathBuf};

use crate::models::QuestionRecord;
use crate::{Error, Result};

/// Dataset store backed by a single JSON file holding an ordered record
/// list.
///
/// `load` reads the full list; `save` rewrites the file as one atomic
/// operation (temp file in the same directory, then rename). Callers decide
/// when a rewrite is warranted; an unchanged dataset is never written.
pub struct QuestionStore {
    path: PathBuf,
}

impl QuestionStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Load all records. The dataset pre-exists; a missing file is an
    /// error, not an empty dataset.
    pub fn load(&self) -> Result<Vec<QuestionRecord>> {
        if !self.path.exists() {
            return Err(Error::NotFound(format!(
                "dataset file {}",
                self.path.display()
            )));
        }
        let content = fs::read_to_string(&self.path)?;
        Ok(serde_json::from_str(&content)?)
    }

    /// Rewrite the dataset in full, pretty-printed, via temp file + rename
    /// so a crash mid-write cannot leave a truncated dataset behind.
    pub fn save(&self, records: &[QuestionRecord]) -> Result<()> {
        let json = serde_json::to_string_pretty(records)?;
        let tmp_path = self.tmp_path();
        fs::write(&tmp_path, json)?;
        fs::rename(&tmp_path, &self.path)?;
        Ok(())
    }

    fn tmp_path(&self) -> PathBuf {
        let mut name = self
            .path
            .file_name()
            .map(|n| n.to_os_string())
            .unwrap_or_else(|| "dataset".into());
        name.push(".tmp");
        self.path.with_file_name(name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_records() -> Vec<QuestionRecord> {
        serde_json::from_str(
            r#"[
                {"Frage": "Was ist Niederwild?", "Antwort": "Feldhase", "Pruefungsfach": "Wildbiologie"},
                {"Frage": "Was gehört alles zum Hochwild?", "Antwort": "Rotwild"}
            ]"#,
        )
        .unwrap()
    }

    #[test]
    fn save_then_load_round_trips() {
        let dir = tempfile::tempdir().unwrap();
        let store = QuestionStore::new(dir.path().join("questions.json"));

        store.save(&sample_records()).unwrap();
        let loaded = store.load().unwrap();

        assert_eq!(loaded.len(), 2);
        assert_eq!(loaded[0].frage, "Was ist Niederwild?");
        assert_eq!(loaded[0].extra.get("Pruefungsfach").unwrap(), "Wildbiologie");
    }

    #[test]
    fn load_missing_file_is_not_found() {
        let dir = tempfile::tempdir().unwrap();
        let store = QuestionStore::new(dir.path().join("missing.json"));
        match store.load() {
            Err(Error::NotFound(_)) => {}
            other => panic!("expected NotFound, got {other:?}"),
        }
    }

    #[test]
    fn save_leaves_no_temp_file_behind() {
        let dir = tempfile::tempdir().unwrap();
        let store = QuestionStore::new(dir.path().join("questions.json"));
        store.save(&sample_records()).unwrap();

        let names: Vec<_> = fs::read_dir(dir.path())
            .unwrap()
            .map(|e| e.unwrap().file_name().into_string().unwrap())
            .collect();
        assert_eq!(names, vec!["questions.json".to_string()]);
    }
}
