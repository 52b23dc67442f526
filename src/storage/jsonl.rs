//! One JSONL file per collection: one JSON document per line.

use std::fs::{self, File, OpenOptions};
use std::io::{BufRead, BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};

use serde_json::Value;
use tracing::{debug, info, warn};

use super::{Collection, StorageConfig, StorageError};

/// The backing file of a collection.
#[derive(Debug, Clone)]
pub struct CollectionFile {
    path: PathBuf,
}

impl CollectionFile {
    pub fn at(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn open(config: &StorageConfig, collection: Collection) -> Self {
        Self::at(config.collection_path(collection))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn create_parent(&self) -> Result<(), StorageError> {
        match self.path.parent() {
            Some(dir) => Ok(fs::create_dir_all(dir)?),
            None => Ok(()),
        }
    }

    /// Every document in file order.
    ///
    /// A file that does not exist yet holds no documents. Lines that are not
    /// valid JSON are logged and dropped; the next rewrite removes them.
    pub fn load(&self) -> Result<Vec<Value>, StorageError> {
        let file = match File::open(&self.path) {
            Ok(f) => f,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => return Err(e.into()),
        };

        let mut docs = Vec::new();
        for (idx, line) in BufReader::new(file).lines().enumerate() {
            let line = line?;
            if line.trim().is_empty() {
                continue;
            }
            match serde_json::from_str::<Value>(&line) {
                Ok(doc) => docs.push(doc),
                Err(e) => warn!("Skipping line {} of {:?}: {}", idx + 1, self.path, e),
            }
        }

        debug!("Loaded {} documents from {:?}", docs.len(), self.path);
        Ok(docs)
    }

    /// Documents for which `keep` returns true.
    pub fn load_filtered(&self, keep: impl Fn(&Value) -> bool) -> Result<Vec<Value>, StorageError> {
        Ok(self.load()?.into_iter().filter(|d| keep(d)).collect())
    }

    /// Add one document at the end of the file.
    pub fn append(&self, doc: &Value) -> Result<(), StorageError> {
        self.create_parent()?;
        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)?;
        writeln!(file, "{}", serde_json::to_string(doc)?)?;
        Ok(())
    }

    /// Replace the file's contents.
    ///
    /// The new contents go to a sibling `.tmp` file that is then renamed over
    /// the collection, so a reader sees either the old or the new file.
    pub fn replace(&self, docs: &[Value]) -> Result<(), StorageError> {
        self.create_parent()?;
        let staging = self.path.with_extension("jsonl.tmp");

        {
            let mut out = BufWriter::new(File::create(&staging)?);
            for doc in docs {
                serde_json::to_writer(&mut out, doc)?;
                out.write_all(b"\n")?;
            }
            out.flush()?;
        }

        fs::rename(&staging, &self.path)?;
        info!("Rewrote {:?} with {} documents", self.path, docs.len());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use tempfile::TempDir;

    fn names(docs: &[Value]) -> Vec<&str> {
        docs.iter().map(|d| d["name"].as_str().unwrap()).collect()
    }

    #[test]
    fn test_missing_file_is_empty() {
        let tmp = TempDir::new().unwrap();
        let file = CollectionFile::at(tmp.path().join("clubs.jsonl"));
        assert!(file.load().unwrap().is_empty());
    }

    #[test]
    fn test_append_creates_directories() {
        let tmp = TempDir::new().unwrap();
        let file = CollectionFile::at(tmp.path().join("deep").join("clubs.jsonl"));

        file.append(&json!({"id": "c1", "name": "Club Táchira"})).unwrap();
        file.append(&json!({"id": "c2", "name": "Ávila Tenis"})).unwrap();

        assert_eq!(names(&file.load().unwrap()), vec!["Club Táchira", "Ávila Tenis"]);
    }

    #[test]
    fn test_replace_swaps_contents() {
        let tmp = TempDir::new().unwrap();
        let file = CollectionFile::at(tmp.path().join("players.jsonl"));
        file.append(&json!({"name": "Old"})).unwrap();

        file.replace(&[json!({"name": "Ana"}), json!({"name": "Beto"})])
            .unwrap();

        assert_eq!(names(&file.load().unwrap()), vec!["Ana", "Beto"]);
        assert!(!file.path().with_extension("jsonl.tmp").exists());
    }

    #[test]
    fn test_replace_with_nothing_empties_file() {
        let tmp = TempDir::new().unwrap();
        let file = CollectionFile::at(tmp.path().join("matches.jsonl"));
        file.append(&json!({"name": "m1"})).unwrap();

        file.replace(&[]).unwrap();
        assert!(file.load().unwrap().is_empty());
    }

    #[test]
    fn test_garbage_lines_are_dropped() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("players.jsonl");
        std::fs::write(&path, "{\"name\":\"Ana\"}\n{broken\n\n{\"name\":\"Beto\"}\n").unwrap();

        let docs = CollectionFile::at(path).load().unwrap();
        assert_eq!(names(&docs), vec!["Ana", "Beto"]);
    }

    #[test]
    fn test_load_filtered() {
        let tmp = TempDir::new().unwrap();
        let file = CollectionFile::at(tmp.path().join("leagues.jsonl"));
        file.replace(&[
            json!({"name": "Spring", "active": true}),
            json!({"name": "Winter", "active": false}),
        ])
        .unwrap();

        let active = file.load_filtered(|d| d["active"] == true).unwrap();
        assert_eq!(names(&active), vec!["Spring"]);
    }

    #[test]
    fn test_open_uses_collection_path() {
        let config = StorageConfig::new(PathBuf::from("/srv/league"));
        let file = CollectionFile::open(&config, Collection::Players);
        assert_eq!(file.path(), Path::new("/srv/league/collections/players.jsonl"));
    }
}
