//! Persistence bridge
//!
//! Mirrors the store's export document into a storage sink after every change
//! and hydrates the store from that sink once at startup. Writes are whole
//! document replacements; a failed write is logged and the next change retries.

use std::cell::RefCell;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::rc::Rc;
use tracing::{debug, error, info, warn};

use crate::constants::storage::{APP_DIR, STORAGE_KEY};
use crate::error::SinkError;
use crate::store::{ListenerId, PropertiesStore, StoreChange};

/// Byte-level home for the persisted document
pub trait StorageSink {
    /// Stored document text, `None` when nothing has been saved yet
    fn read(&self) -> Result<Option<String>, SinkError>;

    fn write(&mut self, contents: &str) -> Result<(), SinkError>;
}

/// Stores the document as a single JSON file
#[derive(Debug, Clone)]
pub struct FileSink {
    path: PathBuf,
}

impl FileSink {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// `<data dir>/design-props/<storage key>.json`
    pub fn default_path() -> PathBuf {
        let mut path = dirs::data_dir().unwrap_or_else(|| PathBuf::from("."));
        path.push(APP_DIR);
        path.push(format!("{STORAGE_KEY}.json"));
        path
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn io_error(&self, source: std::io::Error) -> SinkError {
        SinkError::Io {
            path: self.path.display().to_string(),
            source,
        }
    }
}

impl Default for FileSink {
    fn default() -> Self {
        Self::new(Self::default_path())
    }
}

impl StorageSink for FileSink {
    fn read(&self) -> Result<Option<String>, SinkError> {
        match fs::read_to_string(&self.path) {
            Ok(contents) if contents.trim().is_empty() => Ok(None),
            Ok(contents) => Ok(Some(contents)),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(self.io_error(e)),
        }
    }

    fn write(&mut self, contents: &str) -> Result<(), SinkError> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent).map_err(|e| self.io_error(e))?;
        }
        fs::write(&self.path, contents).map_err(|e| self.io_error(e))
    }
}

/// In-memory sink; clones share the same slot
#[derive(Debug, Clone, Default)]
pub struct MemorySink {
    slot: Rc<RefCell<Option<String>>>,
}

impl MemorySink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_contents(contents: impl Into<String>) -> Self {
        Self {
            slot: Rc::new(RefCell::new(Some(contents.into()))),
        }
    }

    pub fn contents(&self) -> Option<String> {
        self.slot.borrow().clone()
    }
}

impl StorageSink for MemorySink {
    fn read(&self) -> Result<Option<String>, SinkError> {
        Ok(self.contents())
    }

    fn write(&mut self, contents: &str) -> Result<(), SinkError> {
        *self.slot.borrow_mut() = Some(contents.to_string());
        Ok(())
    }
}

fn write_document<S: StorageSink>(sink: &mut S, document: &serde_json::Value) {
    let result = serde_json::to_string(document)
        .map_err(SinkError::from)
        .and_then(|text| sink.write(&text));
    if let Err(e) = result {
        error!(error = %e, "Failed to persist design properties document");
    }
}

/// Hydrate `store` from `sink`, then keep the sink in sync with every change.
///
/// Returns the listener id so the bridge can be detached with `unsubscribe`.
/// A sink that cannot be read is left untouched and nothing is subscribed.
pub fn attach<S>(store: &mut PropertiesStore, mut sink: S) -> Result<ListenerId, SinkError>
where
    S: StorageSink + 'static,
{
    match sink.read()? {
        Some(contents) => {
            info!("Found persisted design properties, restoring");
            store.set_has_persisted_data(true);
            if let Err(e) = store.populate_from_json(&contents) {
                warn!(error = %e, "Persisted document could not be restored");
            }
        }
        None => debug!("No persisted design properties found"),
    }

    // The first mirror happens right away, like every later change
    write_document(&mut sink, &store.export_json());

    Ok(store.subscribe(Box::new(move |change: &StoreChange<'_>| {
        debug!(kind = ?change.kind, "Persisting design properties");
        write_document(&mut sink, change.document);
    })))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::property::DesignProperty;
    use serde_json::{Value, json};

    const SAVED: &str =
        r#"{"designProperties":{"Button":[{"name":"Bold","description":"d","type":"Toggle","class":"bold"}]}}"#;

    fn parsed(sink: &MemorySink) -> Value {
        serde_json::from_str(&sink.contents().unwrap()).unwrap()
    }

    #[test]
    fn test_attach_hydrates_from_sink() {
        let mut store = PropertiesStore::new();
        attach(&mut store, MemorySink::with_contents(SAVED)).unwrap();
        assert!(store.has_persisted_data());
        assert_eq!(store.property_names_of("Button"), vec!["Bold"]);
    }

    #[test]
    fn test_attach_without_saved_data() {
        let sink = MemorySink::new();
        let mut store = PropertiesStore::new();
        attach(&mut store, sink.clone()).unwrap();
        assert!(!store.has_persisted_data());
        assert!(store.is_empty());
        assert_eq!(parsed(&sink), json!({"designProperties": {}}));
    }

    #[test]
    fn test_every_mutation_is_mirrored() {
        let sink = MemorySink::with_contents(SAVED);
        let mut store = PropertiesStore::new();
        attach(&mut store, sink.clone()).unwrap();

        store.add_element("Card");
        store.add_property_to_element("Card", DesignProperty::toggle("Flat", "d", "flat"));
        assert_eq!(parsed(&sink)["designProperties"]["Card"][0]["class"], "flat");

        store.delete_element("Button");
        assert!(parsed(&sink)["designProperties"].get("Button").is_none());
    }

    #[test]
    fn test_corrupt_persisted_data_leaves_empty_store() {
        let sink = MemorySink::with_contents(r#"{"something":"else"}"#);
        let mut store = PropertiesStore::new();
        attach(&mut store, sink.clone()).unwrap();
        assert!(store.has_persisted_data());
        assert!(store.is_empty());
        assert_eq!(parsed(&sink), json!({"designProperties": {}}));
    }

    #[test]
    fn test_detach_stops_mirroring() {
        let sink = MemorySink::new();
        let mut store = PropertiesStore::new();
        let id = attach(&mut store, sink.clone()).unwrap();
        assert!(store.unsubscribe(id));
        store.add_element("Card");
        store.add_property_to_element("Card", DesignProperty::toggle("Flat", "d", "flat"));
        assert_eq!(parsed(&sink), json!({"designProperties": {}}));
    }

    #[test]
    fn test_file_sink_roundtrip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("save.json");

        let mut store = PropertiesStore::new();
        attach(&mut store, FileSink::new(&path)).unwrap();
        store.add_element("Button");
        store.add_property_to_element("Button", DesignProperty::toggle("Bold", "d", "bold"));

        let mut restored = PropertiesStore::new();
        attach(&mut restored, FileSink::new(&path)).unwrap();
        assert!(restored.has_persisted_data());
        assert_eq!(restored.export_json(), store.export_json());
    }

    #[test]
    fn test_file_sink_missing_file_reads_none() {
        let dir = tempfile::tempdir().unwrap();
        let sink = FileSink::new(dir.path().join("absent.json"));
        assert!(sink.read().unwrap().is_none());
    }

    #[test]
    fn test_unreadable_file_is_not_overwritten() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("save.json");
        let mut original = SAVED.as_bytes().to_vec();
        original.push(0xFF);
        fs::write(&path, &original).unwrap();

        let mut store = PropertiesStore::new();
        let result = attach(&mut store, FileSink::new(&path));
        assert!(matches!(result, Err(SinkError::Io { .. })));
        assert!(!store.has_persisted_data());

        store.add_element("Card");
        assert_eq!(fs::read(&path).unwrap(), original);
    }
}
