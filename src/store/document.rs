use std::collections::BTreeMap;
use std::marker::PhantomData;
use std::path::{Path, PathBuf};
use std::sync::{Mutex, MutexGuard};

use crate::foundation::error::{CollageError, CollageResult};

/// A whole-document record keyed by its id.
pub trait Document:
    Clone + serde::Serialize + serde::de::DeserializeOwned + Send + Sync + 'static
{
    /// Storage key.
    fn id(&self) -> &str;
}

/// Keyed object store with whole-document semantics: every save replaces the full record.
pub trait DocumentStore<D: Document>: Send + Sync {
    /// Load one document; `Ok(None)` when absent.
    fn get(&self, id: &str) -> CollageResult<Option<D>>;
    /// Insert or replace a document.
    fn save(&self, doc: &D) -> CollageResult<()>;
    /// Remove a document; absent ids are not an error.
    fn delete(&self, id: &str) -> CollageResult<()>;
    /// Every stored document, ordered by id.
    fn get_all(&self) -> CollageResult<Vec<D>>;
}

/// Mutex-guarded in-memory store.
#[derive(Debug)]
pub struct MemoryStore<D> {
    docs: Mutex<BTreeMap<String, D>>,
}

impl<D> Default for MemoryStore<D> {
    fn default() -> Self {
        Self {
            docs: Mutex::new(BTreeMap::new()),
        }
    }
}

impl<D: Document> MemoryStore<D> {
    /// Empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Store pre-filled with `docs`.
    pub fn with_documents(docs: impl IntoIterator<Item = D>) -> Self {
        let map = docs
            .into_iter()
            .map(|d| (d.id().to_string(), d))
            .collect();
        Self {
            docs: Mutex::new(map),
        }
    }

    fn lock(&self) -> CollageResult<MutexGuard<'_, BTreeMap<String, D>>> {
        self.docs
            .lock()
            .map_err(|_| CollageError::storage("memory store lock poisoned"))
    }
}

impl<D: Document> DocumentStore<D> for MemoryStore<D> {
    fn get(&self, id: &str) -> CollageResult<Option<D>> {
        Ok(self.lock()?.get(id).cloned())
    }

    fn save(&self, doc: &D) -> CollageResult<()> {
        self.lock()?.insert(doc.id().to_string(), doc.clone());
        Ok(())
    }

    fn delete(&self, id: &str) -> CollageResult<()> {
        self.lock()?.remove(id);
        Ok(())
    }

    fn get_all(&self) -> CollageResult<Vec<D>> {
        Ok(self.lock()?.values().cloned().collect())
    }
}

/// One pretty-printed JSON file per document: `<root>/<id>.json`.
///
/// Writes go through a temporary file and a rename, so a reader never sees half a document.
#[derive(Debug)]
pub struct JsonDirStore<D> {
    root: PathBuf,
    _doc: PhantomData<fn() -> D>,
}

impl<D> Clone for JsonDirStore<D> {
    fn clone(&self) -> Self {
        Self {
            root: self.root.clone(),
            _doc: PhantomData,
        }
    }
}

impl<D: Document> JsonDirStore<D> {
    /// Store rooted at `root`; the directory is created on first save.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            _doc: PhantomData,
        }
    }

    /// Directory holding the documents.
    pub fn root(&self) -> &Path {
        &self.root
    }

    fn path_for(&self, id: &str) -> CollageResult<PathBuf> {
        let ok = !id.is_empty()
            && id
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_');
        if !ok {
            return Err(CollageError::validation(format!(
                "document id '{id}' is not a safe file name"
            )));
        }
        Ok(self.root.join(format!("{id}.json")))
    }

    fn read(path: &Path) -> CollageResult<D> {
        let text = std::fs::read_to_string(path)
            .map_err(|e| CollageError::storage(format!("read '{}': {e}", path.display())))?;
        serde_json::from_str(&text)
            .map_err(|e| CollageError::serde(format!("parse '{}': {e}", path.display())))
    }
}

impl<D: Document> DocumentStore<D> for JsonDirStore<D> {
    fn get(&self, id: &str) -> CollageResult<Option<D>> {
        let path = self.path_for(id)?;
        if !path.exists() {
            return Ok(None);
        }
        Self::read(&path).map(Some)
    }

    #[tracing::instrument(skip(self, doc), fields(id = doc.id()))]
    fn save(&self, doc: &D) -> CollageResult<()> {
        let path = self.path_for(doc.id())?;
        std::fs::create_dir_all(&self.root).map_err(|e| {
            CollageError::storage(format!("create '{}': {e}", self.root.display()))
        })?;
        let json = serde_json::to_string_pretty(doc)?;
        let tmp = path.with_extension("json.tmp");
        std::fs::write(&tmp, json)
            .map_err(|e| CollageError::storage(format!("write '{}': {e}", tmp.display())))?;
        std::fs::rename(&tmp, &path)
            .map_err(|e| CollageError::storage(format!("rename '{}': {e}", path.display())))?;
        Ok(())
    }

    fn delete(&self, id: &str) -> CollageResult<()> {
        let path = self.path_for(id)?;
        match std::fs::remove_file(&path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(CollageError::storage(format!(
                "delete '{}': {e}",
                path.display()
            ))),
        }
    }

    fn get_all(&self) -> CollageResult<Vec<D>> {
        let entries = match std::fs::read_dir(&self.root) {
            Ok(entries) => entries,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => return Err(e.into()),
        };
        let mut paths = Vec::new();
        for entry in entries {
            let path = entry?.path();
            if path.extension().and_then(|e| e.to_str()) == Some("json") {
                paths.push(path);
            }
        }
        paths.sort();
        paths.iter().map(|p| Self::read(p)).collect()
    }
}

#[cfg(test)]
#[path = "../../tests/unit/store/document.rs"]
mod tests;
