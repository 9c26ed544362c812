//! Cross-file reference resolution.
//!
//! A [`ModuleContext`] carries the state of one document while it is being
//! processed: its translation table, its import bindings and the shared
//! [`ModuleStore`]. Directive front-ends bind external names through it and
//! the selector rewriter asks it for scoped names.
//!
//! Every change it makes to entries of other files is journaled so a failed
//! document can be rolled back.

mod path;

use std::collections::HashMap;
use std::path::{Path, PathBuf};

pub use path::{DefaultPathResolver, PathResolver, has_extension, normalize, with_default_extension};

use crate::config::{Config, MissingReferencePolicy};
use crate::logging::targets;
use crate::naming::Seed;
use crate::rewrite::ClassNames;
use crate::store::{Journal, ModuleState, ModuleStore};
use crate::table::TranslationTable;
use crate::{Error, Result};

/// Per-document resolution state.
pub struct ModuleContext<'a> {
    config: &'a Config,
    store: &'a mut ModuleStore,
    path: PathBuf,
    directory: PathBuf,
    source: &'a str,
    table: TranslationTable,
    /// `:import` aliases mapped to store keys.
    imports: HashMap<String, PathBuf>,
    journal: Journal,
}

impl<'a> ModuleContext<'a> {
    /// Create the context for the document stored under `path`.
    pub fn new(config: &'a Config, store: &'a mut ModuleStore, path: &Path, source: &'a str) -> Self {
        let directory = path.parent().map(Path::to_path_buf).unwrap_or_default();
        Self {
            config,
            store,
            path: path.to_path_buf(),
            directory,
            source,
            table: TranslationTable::new(),
            imports: HashMap::new(),
            journal: Journal::default(),
        }
    }

    /// The active configuration.
    pub fn config(&self) -> &Config {
        self.config
    }

    /// The document's own translations so far.
    pub fn table(&self) -> &TranslationTable {
        &self.table
    }

    /// Store key of the file an `:import` alias refers to.
    pub fn import(&self, alias: &str) -> Option<&Path> {
        self.imports.get(alias).map(PathBuf::as_path)
    }

    /// Map a declared path to its store key, appending the default
    /// extension when the path has none.
    pub fn resolve_path(&self, declared: &str) -> PathBuf {
        let declared = with_default_extension(declared, &self.config.extension);
        self.config.path_resolver.resolve(&declared, &self.directory)
    }

    /// Make sure `target` has a store entry, applying the missing reference
    /// policy when it has not been processed.
    pub fn require_module(&mut self, target: &Path) -> Result<()> {
        if !self.store.is_resolved(target) {
            match self.config.missing_reference {
                MissingReferencePolicy::Error => return Err(Error::unresolved(target)),
                MissingReferencePolicy::Warn => {
                    tracing::warn!(
                        target: targets::RESOLVE,
                        "'{}' not found or not imported yet",
                        target.display()
                    );
                }
                MissingReferencePolicy::Ignore => {}
            }
        }

        self.ensure_entry(target);
        Ok(())
    }

    /// The scoped name `target` uses (or will use) for `class_name`.
    ///
    /// Names are generated from the target's seed so every file that refers
    /// to the class agrees on it. Tables of processed files are frozen and
    /// never modified here.
    pub fn remote_name(&mut self, target: &Path, class_name: &str) -> String {
        let generator = self.config.name_generator.clone();
        self.ensure_entry(target);
        let (entry, _) = self.store.entry_or_placeholder(target);
        let (table, source, state) = entry.parts_mut();
        let seed = Seed::new(target, source);

        if state == ModuleState::Placeholder {
            self.journal.snapshot(target, table);
        }
        if state != ModuleState::Processed {
            return table.translate(class_name, &seed, generator.as_ref());
        }

        match table.get(class_name) {
            Some(scoped) => scoped.to_string(),
            None => {
                tracing::warn!(
                    target: targets::RESOLVE,
                    "'{}' does not define class '{}'",
                    target.display(),
                    class_name
                );
                generator.generate(class_name, &seed)
            }
        }
    }

    /// Bind an externally scoped name into this document's table.
    ///
    /// A label keeps the first name it was given in this document. Binding
    /// it to a different name fails with a syntax error naming `directive`.
    pub fn bind(&mut self, directive: &str, label: &str, scoped: String) -> Result<()> {
        match self.table.get(label) {
            Some(existing) if existing == scoped => Ok(()),
            Some(existing) => Err(Error::syntax(
                directive,
                format!("'{label}' is already bound to '{existing}'"),
            )),
            None => {
                tracing::debug!(target: targets::RESOLVE, "bound '{}' to '{}'", label, scoped);
                self.table.bind(label, scoped);
                Ok(())
            }
        }
    }

    /// Declare an `:import` alias for the file stored under `target`.
    pub fn add_import(&mut self, alias: impl Into<String>, target: PathBuf) {
        self.imports.insert(alias.into(), target);
    }

    /// Consume the context, returning the table and the journal of store
    /// changes made for other files.
    pub(crate) fn finish(self) -> (TranslationTable, Journal) {
        (self.table, self.journal)
    }

    fn ensure_entry(&mut self, target: &Path) {
        let (_, created) = self.store.entry_or_placeholder(target);
        if created {
            self.journal.created.push(target.to_path_buf());
        }
    }
}

impl ClassNames for ModuleContext<'_> {
    fn local(&mut self, class_name: &str) -> String {
        let seed = Seed::new(&self.path, self.source);
        self.table
            .translate(class_name, &seed, self.config.name_generator.as_ref())
    }

    fn composed(&mut self, alias: &str, remote: &str) -> Option<String> {
        let target = self.imports.get(alias)?.clone();
        Some(self.remote_name(&target, remote))
    }
}
