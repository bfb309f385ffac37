use std::fs;
use std::path::{Path, PathBuf};
use tracing::debug;

use super::CaseBook;
use crate::MuddaResult;

/// A case book persisted as one pretty-printed JSON document.
#[derive(Debug, Clone)]
pub struct JsonFileStore {
    path: PathBuf,
}

impl JsonFileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Load the book; a missing file is an empty book.
    pub fn load(&self) -> MuddaResult<CaseBook> {
        if !self.path.exists() {
            debug!(path = %self.path.display(), "store file absent, starting empty");
            return Ok(CaseBook::new());
        }
        let contents = fs::read_to_string(&self.path)?;
        if contents.trim().is_empty() {
            return Ok(CaseBook::new());
        }
        Ok(serde_json::from_str(&contents)?)
    }

    /// Write the whole book. The file is replaced by rename, so readers
    /// never observe a half-written store.
    pub fn save(&self, book: &CaseBook) -> MuddaResult<()> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)?;
        }
        let json = serde_json::to_string_pretty(book)?;
        let tmp = self.path.with_extension("json.tmp");
        fs::write(&tmp, json)?;
        fs::rename(&tmp, &self.path)?;
        debug!(path = %self.path.display(), "store saved");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::case::CaseForm;
    use tempfile::TempDir;

    #[test]
    fn test_missing_file_is_empty_book() {
        let dir = TempDir::new().unwrap();
        let store = JsonFileStore::new(dir.path().join("book.json"));
        assert_eq!(store.load().unwrap(), CaseBook::new());
    }

    #[test]
    fn test_empty_file_is_empty_book() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("book.json");
        fs::write(&path, "").unwrap();
        assert_eq!(JsonFileStore::new(path).load().unwrap(), CaseBook::new());
    }

    #[test]
    fn test_save_creates_parent_dirs() {
        let dir = TempDir::new().unwrap();
        let store = JsonFileStore::new(dir.path().join("nested/deeper/book.json"));
        store.save(&CaseBook::new()).unwrap();
        assert!(store.path().is_file());
    }

    #[test]
    fn test_save_and_reload() {
        let dir = TempDir::new().unwrap();
        let store = JsonFileStore::new(dir.path().join("book.json"));

        let mut book = CaseBook::new();
        book.register_bank("Himalayan Bank").unwrap();
        let input = CaseForm {
            case_number: "MU2001".into(),
            petitioner: Some("Himalayan Bank".into()),
            principal_amount: "50000".into(),
            interest_rate: "12.5".into(),
            issue_date: "2081-04-01".into(),
            final_date: "2081-10-15".into(),
            tax_rate: "0.005".into(),
            ..Default::default()
        }
        .clean()
        .unwrap();
        book.create_case(&input).unwrap();
        store.save(&book).unwrap();

        let reloaded = store.load().unwrap();
        assert_eq!(reloaded, book);
        let record = reloaded.case("MU2001").unwrap();
        assert_eq!(record.recompute().unwrap(), record.amounts);
    }
}
