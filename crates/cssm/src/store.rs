//! Cross-document registry of translation tables.

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use crate::table::TranslationTable;

/// Lifecycle of a store entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ModuleState {
    /// Created by a reference to a file that has not been processed.
    Placeholder,
    /// The document is being walked right now.
    Processing,
    /// The document finished processing; its table is frozen.
    Processed,
}

/// One file's translations as seen by other files.
#[derive(Debug, Clone)]
pub struct ModuleEntry {
    table: TranslationTable,
    source: Option<Arc<str>>,
    state: ModuleState,
}

impl ModuleEntry {
    fn placeholder() -> Self {
        Self {
            table: TranslationTable::new(),
            source: None,
            state: ModuleState::Placeholder,
        }
    }

    /// The file's translation table.
    pub fn table(&self) -> &TranslationTable {
        &self.table
    }

    /// The file's source text, once known.
    pub fn source(&self) -> Option<&str> {
        self.source.as_deref()
    }

    /// Current lifecycle state.
    pub fn state(&self) -> ModuleState {
        self.state
    }

    /// Whether the entry only stands in for a file not processed yet.
    pub fn is_placeholder(&self) -> bool {
        self.state == ModuleState::Placeholder
    }

    pub(crate) fn parts_mut(&mut self) -> (&mut TranslationTable, &str, ModuleState) {
        (
            &mut self.table,
            self.source.as_deref().unwrap_or(""),
            self.state,
        )
    }
}

/// Restores the store when a document fails part-way through.
#[derive(Debug)]
pub(crate) struct Checkpoint {
    key: PathBuf,
    previous: Option<ModuleEntry>,
}

/// Store changes a document made to other files' entries.
#[derive(Debug, Default)]
pub(crate) struct Journal {
    /// Placeholder entries the document created.
    pub(crate) created: Vec<PathBuf>,
    /// Existing placeholder tables as they were before the document first
    /// added to them.
    pub(crate) touched: Vec<(PathBuf, TranslationTable)>,
}

impl Journal {
    /// Remember `table` unless `path` is already journaled.
    pub(crate) fn snapshot(&mut self, path: &Path, table: &TranslationTable) {
        let known = self.created.iter().any(|p| p == path)
            || self.touched.iter().any(|(p, _)| p == path);
        if !known {
            self.touched.push((path.to_path_buf(), table.clone()));
        }
    }
}

/// Registry of translation tables keyed by resolved file path.
///
/// The store lives for one build session. Entries are added as documents are
/// processed and replaced when a document is processed again; names already
/// copied into other documents are not updated. Call [`reset`](Self::reset)
/// between independent builds.
#[derive(Debug, Clone, Default)]
pub struct ModuleStore {
    modules: HashMap<PathBuf, ModuleEntry>,
}

impl ModuleStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Get the entry for a resolved path.
    pub fn get(&self, path: &Path) -> Option<&ModuleEntry> {
        self.modules.get(path)
    }

    /// Get the translation table for a resolved path.
    pub fn table(&self, path: &Path) -> Option<&TranslationTable> {
        self.modules.get(path).map(ModuleEntry::table)
    }

    /// Check if a path has an entry.
    pub fn contains(&self, path: &Path) -> bool {
        self.modules.contains_key(path)
    }

    /// Whether the path has a real (non-placeholder) entry.
    pub fn is_resolved(&self, path: &Path) -> bool {
        self.modules.get(path).is_some_and(|e| !e.is_placeholder())
    }

    /// Get the number of entries.
    pub fn len(&self) -> usize {
        self.modules.len()
    }

    /// Check if the store is empty.
    pub fn is_empty(&self) -> bool {
        self.modules.is_empty()
    }

    /// Iterate over all entries.
    pub fn iter(&self) -> impl Iterator<Item = (&Path, &ModuleEntry)> {
        self.modules.iter().map(|(k, v)| (k.as_path(), v))
    }

    /// Remove every entry.
    pub fn reset(&mut self) {
        self.modules.clear();
    }

    /// Get the entry for `path`, creating a placeholder if absent.
    ///
    /// Returns the entry and whether it was created by this call.
    pub(crate) fn entry_or_placeholder(&mut self, path: &Path) -> (&mut ModuleEntry, bool) {
        let created = !self.modules.contains_key(path);
        let entry = self
            .modules
            .entry(path.to_path_buf())
            .or_insert_with(ModuleEntry::placeholder);
        (entry, created)
    }

    /// Register a document as in progress before walking it.
    pub(crate) fn begin(&mut self, path: &Path, source: Arc<str>) -> Checkpoint {
        let entry = ModuleEntry {
            table: TranslationTable::new(),
            source: Some(source),
            state: ModuleState::Processing,
        };
        let previous = self.modules.insert(path.to_path_buf(), entry);
        Checkpoint {
            key: path.to_path_buf(),
            previous,
        }
    }

    /// Freeze a document's final table.
    pub(crate) fn commit(&mut self, checkpoint: Checkpoint, table: TranslationTable) {
        let source = self
            .modules
            .remove(&checkpoint.key)
            .and_then(|e| e.source);
        self.modules.insert(
            checkpoint.key,
            ModuleEntry {
                table,
                source,
                state: ModuleState::Processed,
            },
        );
    }

    /// Undo a failed document: restore placeholder tables it added to, drop
    /// placeholders it created and restore the entry it replaced.
    pub(crate) fn rollback(&mut self, checkpoint: Checkpoint, journal: Journal) {
        for (path, table) in journal.touched {
            if let Some(entry) = self.modules.get_mut(&path).filter(|e| e.is_placeholder()) {
                entry.table = table;
            }
        }
        for path in &journal.created {
            if self.modules.get(path).is_some_and(ModuleEntry::is_placeholder) {
                self.modules.remove(path);
            }
        }

        match checkpoint.previous {
            Some(previous) => {
                self.modules.insert(checkpoint.key, previous);
            }
            None => {
                self.modules.remove(&checkpoint.key);
            }
        }
    }
}
